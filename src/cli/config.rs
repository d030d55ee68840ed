use std::path::Path;

use clap::Parser;
use koas::Config;
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Default, Parser)]
pub struct Configure {
    /// Persist data under this key
    ///
    /// Data stored under the previous key is left where it is.
    #[arg(long, value_name = "KEY")]
    storage_key: Option<String>,

    /// Keep at most this many activity log entries
    #[arg(long, value_name = "N", conflicts_with = "unlimited_log")]
    activity_log_limit: Option<usize>,

    /// Keep every activity log entry
    #[arg(long)]
    unlimited_log: bool,
}

impl Configure {
    #[instrument(level = "debug")]
    pub fn run(self, path: &Path) -> anyhow::Result<()> {
        let mut config = Config::load_or_default(path);

        if self.apply(&mut config) {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            config.save(path)?;
            println!(
                "{}",
                format!("✅ Configuration saved to {}", path.display()).success()
            );
        }

        println!("storage key:        {}", config.storage_key());
        println!(
            "activity log limit: {}",
            config
                .activity_log_limit
                .map_or_else(|| "none".to_string(), |limit| limit.to_string())
        );
        Ok(())
    }

    /// Returns `true` if anything changed.
    fn apply(&self, config: &mut Config) -> bool {
        let mut changed = self
            .storage_key
            .as_deref()
            .is_some_and(|key| config.set_storage_key(key));
        if let Some(limit) = self.activity_log_limit {
            changed |= config.activity_log_limit.replace(limit) != Some(limit);
        }
        if self.unlimited_log {
            changed |= config.activity_log_limit.take().is_some();
        }
        changed
    }
}
