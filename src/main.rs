//! gsheet CLI - move tabular data between Google Sheets and TSV.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use gsheet_frame::{
    extract_spreadsheet_id, Authenticator, Cell, DownloadOptions, Frame, Header, SheetRange,
    SheetsClient, UploadOptions,
};

/// CLI tool for moving tabular data between Google Sheets and TSV.
#[derive(Parser)]
#[command(name = "gsheet")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to credentials JSON: a service account key, or an installed-app
    /// client secret when --token is given.
    #[arg(long, env = "GOOGLE_APPLICATION_CREDENTIALS")]
    credentials: PathBuf,

    /// Path to the persisted user token JSON (authorized-user mode).
    #[arg(long, env = "GSHEET_TOKEN")]
    token: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List sheet names in a spreadsheet.
    Sheets {
        /// Spreadsheet URL or ID.
        spreadsheet: String,
    },

    /// Create a new sheet in a spreadsheet.
    CreateSheet {
        /// Spreadsheet URL or ID.
        spreadsheet: String,

        /// Title for the new sheet.
        title: String,
    },

    /// Download a range and print it as TSV.
    Download {
        /// Spreadsheet URL or ID.
        spreadsheet: String,

        /// Sheet name.
        sheet: String,

        /// Cell span like A1:C100 (defaults to the whole sheet).
        #[arg(long)]
        cells: Option<String>,

        /// Row index holding the column names.
        #[arg(long, default_value_t = 0)]
        header_row: usize,
    },

    /// Upload a TSV file to a range.
    Upload {
        /// TSV file to upload; the first line is the header row.
        file: PathBuf,

        /// Spreadsheet URL or ID.
        spreadsheet: String,

        /// Sheet name.
        sheet: String,

        /// Cell span like A1:C100 (defaults to the whole sheet).
        #[arg(long)]
        cells: Option<String>,

        /// Treat every line as data and write no header row.
        #[arg(long)]
        no_header: bool,
    },

    /// List files in a Drive folder.
    ListFiles {
        /// Folder ID.
        folder: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let auth = Authenticator::from_files(&cli.credentials, cli.token.as_ref())
        .with_context(|| format!("Failed to load credentials from {:?}", cli.credentials))?;
    let client = SheetsClient::new(auth);

    match cli.command {
        Commands::Sheets { spreadsheet } => {
            let id = extract_spreadsheet_id(&spreadsheet)
                .with_context(|| format!("Invalid spreadsheet URL or ID: {}", spreadsheet))?;

            let names = client
                .sheet_names(&id)
                .await
                .with_context(|| format!("Failed to list sheets of: {}", id))?;

            for name in names {
                println!("{}", name);
            }
        }

        Commands::CreateSheet { spreadsheet, title } => {
            let id = extract_spreadsheet_id(&spreadsheet)
                .with_context(|| format!("Invalid spreadsheet URL or ID: {}", spreadsheet))?;

            match client
                .create_sheet(&id, &title)
                .await
                .with_context(|| format!("Failed to create sheet: {}", title))?
            {
                Some(sheet_id) => println!("Created sheet {:?} (id {})", title, sheet_id),
                None => println!("Sheet {:?} already exists", title),
            }
        }

        Commands::Download {
            spreadsheet,
            sheet,
            cells,
            header_row,
        } => {
            let id = extract_spreadsheet_id(&spreadsheet)
                .with_context(|| format!("Invalid spreadsheet URL or ID: {}", spreadsheet))?;
            let range = range_for(&sheet, cells);

            let options = DownloadOptions {
                header: Header::Row(header_row),
                ..Default::default()
            };
            let frame = client
                .download_with(&id, &range, &options)
                .await
                .with_context(|| format!("Failed to download range: {}", range))?;

            println!("{}", frame.columns().join("\t"));
            for row in frame.rows() {
                let line: Vec<String> = row.iter().map(Cell::to_string).collect();
                println!("{}", line.join("\t"));
            }
        }

        Commands::Upload {
            file,
            spreadsheet,
            sheet,
            cells,
            no_header,
        } => {
            let id = extract_spreadsheet_id(&spreadsheet)
                .with_context(|| format!("Invalid spreadsheet URL or ID: {}", spreadsheet))?;
            let range = range_for(&sheet, cells);

            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read TSV file: {:?}", file))?;
            let frame = parse_tsv(&content, no_header)
                .with_context(|| format!("Empty TSV file: {:?}", file))?;

            let options = UploadOptions {
                write_header: !no_header,
                ..Default::default()
            };
            let update = client
                .upload_with(&frame, &id, &range, &options)
                .await
                .with_context(|| format!("Failed to upload range: {}", range))?;

            println!(
                "Updated {} cells in {}",
                update.updated_cells.unwrap_or(0),
                update.updated_range.as_deref().unwrap_or("?")
            );
        }

        Commands::ListFiles { folder } => {
            let files = client
                .list_files(&folder)
                .await
                .with_context(|| format!("Failed to list files in folder: {}", folder))?;

            if files.is_empty() {
                println!("No files found.");
            } else {
                for file in files {
                    println!("{}", file);
                }
            }
        }
    }

    Ok(())
}

fn range_for(sheet: &str, cells: Option<String>) -> SheetRange {
    match cells {
        Some(cells) => SheetRange::with_cells(sheet, cells),
        None => SheetRange::new(sheet),
    }
}

/// Parse TSV text into a frame. With `no_header` the columns are named by
/// position and every line is data.
fn parse_tsv(content: &str, no_header: bool) -> Option<Frame> {
    let mut lines = content.lines().filter(|line| !line.is_empty());

    let mut frame = if no_header {
        let first: Vec<&str> = lines.clone().next()?.split('\t').collect();
        Frame::new((0..first.len()).map(|i| i.to_string()).collect())
    } else {
        Frame::new(lines.next()?.split('\t').map(str::to_string).collect())
    };

    for line in lines {
        frame.push_row(line.split('\t').collect::<Vec<_>>());
    }
    Some(frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tsv_with_header() {
        let frame = parse_tsv("a\tb\n1\t2\n3\t4\n", false).unwrap();
        assert_eq!(frame.columns(), &["a", "b"]);
        assert_eq!(frame.num_rows(), 2);
    }

    #[test]
    fn test_parse_tsv_no_header() {
        let frame = parse_tsv("1\t2\n3\t4\n", true).unwrap();
        assert_eq!(frame.columns(), &["0", "1"]);
        assert_eq!(frame.num_rows(), 2);
    }

    #[test]
    fn test_parse_tsv_empty() {
        assert!(parse_tsv("", false).is_none());
    }

    #[test]
    fn test_range_for() {
        assert_eq!(range_for("s", None).to_string(), "'s'!A1:ZZ900000");
        assert_eq!(
            range_for("s", Some("A1:B2".to_string())).to_string(),
            "'s'!A1:B2"
        );
    }
}
