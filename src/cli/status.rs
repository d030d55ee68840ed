use clap::Parser;
use koas::{ProgressStats, Status as RequirementStatus, domain::progress};
use tracing::instrument;

use super::{
    AppStore,
    terminal::{Colorize, is_narrow, progress_bar},
};

#[derive(Debug, Parser, Default)]
#[command(about = "Show overall and per-department progress")]
pub struct Status {
    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Suppress headers and format for scripting
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Status {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, store: &AppStore) -> anyhow::Result<()> {
        let data = store.snapshot();
        let global = store.global_progress();
        let departments: Vec<_> = data
            .departments
            .iter()
            .map(|d| (d.short_name.as_str(), progress::aggregate(&d.requirements)))
            .collect();

        match self.output {
            OutputFormat::Json => Self::output_json(&global, &departments)?,
            OutputFormat::Table if self.quiet => Self::output_quiet(&global),
            OutputFormat::Table => {
                if data.profile.is_none() {
                    println!("{}", "No profile yet. Run 'koas setup' to create one.".dim());
                    println!();
                }
                if global.total == 0 {
                    println!("No requirements recorded yet. Add one with 'koas add'.");
                    return Ok(());
                }
                Self::output_table(&global, &departments);
            }
        }

        Ok(())
    }

    fn output_json(global: &ProgressStats, departments: &[(&str, ProgressStats)]) -> anyhow::Result<()> {
        use serde_json::json;

        let departments: Vec<_> = departments
            .iter()
            .map(|(name, stats)| json!({ "department": name, "progress": stats }))
            .collect();

        let output = json!({
            "global": global,
            "departments": departments,
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    fn output_quiet(global: &ProgressStats) {
        println!(
            "total={} not_started={} ongoing={} done={} nilai={} completed={:.1}",
            global.total,
            global.not_started,
            global.ongoing,
            global.done,
            global.nilai,
            global.percentage.completed
        );
    }

    fn output_table(global: &ProgressStats, departments: &[(&str, ProgressStats)]) {
        let narrow = is_narrow();

        println!("Progress keseluruhan");
        println!("{}", "────────────────────".dim());
        println!(
            "{} {:.0}% ({} of {})",
            progress_bar(global.percentage.completed, if narrow { 10 } else { 24 }).success(),
            global.percentage.completed,
            global.completed(),
            global.total
        );
        println!();

        for status in RequirementStatus::ALL {
            println!(
                "{} {:<16} {}",
                status.icon(),
                status.label(),
                global.count(status).to_string().status(status)
            );
        }

        println!();
        if narrow {
            for (name, stats) in departments.iter().filter(|(_, s)| s.total > 0) {
                println!("{name}: {:.0}%", stats.percentage.completed);
            }
        } else {
            println!("{:<10} {:>5} {:>5}  Progress", "Dept", "Total", "Done");
            for (name, stats) in departments {
                let line = format!(
                    "{name:<10} {:>5} {:>5}  {} {:.0}%",
                    stats.total,
                    stats.completed(),
                    progress_bar(stats.percentage.completed, 12),
                    stats.percentage.completed
                );
                if stats.total == 0 {
                    println!("{}", line.dim());
                } else {
                    println!("{line}");
                }
            }
        }
    }
}
