use std::path::PathBuf;

use clap::Parser;
use dialoguer::Confirm;
use koas::report;
use tracing::instrument;

use super::{AppStore, terminal::Colorize};

const BYTE_ORDER_MARK: &str = "\u{feff}";

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum Format {
    /// A full backup that can be imported again
    #[default]
    Json,
    /// Comma-separated values, one row per requirement
    Csv,
    /// A spreadsheet-readable table
    Xls,
}

impl Format {
    const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Xls => "xls",
        }
    }
}

#[derive(Debug, Parser)]
pub struct Export {
    /// Export format
    #[arg(long, short, value_enum, default_value = "json")]
    format: Format,

    /// File to write to
    ///
    /// Writes to stdout if not given. The format's extension is added if the
    /// path has none.
    #[arg(long, short)]
    output: Option<PathBuf>,
}

impl Export {
    #[instrument(level = "debug", skip(store))]
    pub fn run(self, store: &AppStore) -> anyhow::Result<()> {
        let contents = match self.format {
            Format::Json => store.export_snapshot()?,
            Format::Csv => format!("{BYTE_ORDER_MARK}{}", report::to_csv(store.data())),
            Format::Xls => report::to_spreadsheet(store.data()),
        };

        let Some(path) = self.output else {
            print!("{contents}");
            return Ok(());
        };

        let path = if path.extension().is_none() {
            path.with_extension(self.format.extension())
        } else {
            path
        };
        std::fs::write(&path, contents)?;
        println!(
            "{}",
            format!("✅ Exported to {}", path.display()).success()
        );
        Ok(())
    }
}

#[derive(Debug, Parser)]
pub struct Import {
    /// A JSON backup produced by 'koas export'
    file: PathBuf,

    /// Skip confirmation prompts
    #[arg(long, short)]
    yes: bool,
}

impl Import {
    #[instrument(level = "debug", skip(store))]
    pub fn run(self, store: &mut AppStore) -> anyhow::Result<()> {
        let text = std::fs::read_to_string(&self.file)?;

        if !self.yes && !confirm("Importing replaces all current data. Continue?")? {
            println!("Cancelled");
            return Ok(());
        }

        store.import_snapshot(&text)?;
        let total = store.global_progress().total;
        println!(
            "{}",
            format!("✅ Imported {total} requirements from {}", self.file.display()).success()
        );
        Ok(())
    }
}

#[derive(Debug, Parser)]
pub struct Reset {
    /// Skip confirmation prompts
    #[arg(long, short)]
    yes: bool,
}

impl Reset {
    #[instrument(level = "debug", skip(store))]
    pub fn run(self, store: &mut AppStore) -> anyhow::Result<()> {
        if !self.yes && !confirm(&"Delete ALL data? This cannot be undone.".warning())? {
            println!("Cancelled");
            return Ok(());
        }

        store.reset_all()?;
        println!("{}", "✅ All data deleted".success());
        Ok(())
    }
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
}
