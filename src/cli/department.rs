use clap::Parser;
use koas::domain::progress;
use tracing::instrument;

use super::{
    AppStore, find_department,
    terminal::{Colorize, progress_bar},
};

#[derive(Debug, Parser)]
pub struct Departments {
    /// Order by completion, most completed first
    #[arg(long)]
    rank: bool,
}

impl Departments {
    #[instrument(level = "debug", skip(store))]
    pub fn run(self, store: &AppStore) -> anyhow::Result<()> {
        let data = store.data();
        let rows = if self.rank {
            progress::ranked_departments(&data.departments)
        } else {
            data.departments
                .iter()
                .map(|d| (d, progress::aggregate(&d.requirements)))
                .collect()
        };

        println!("{:<3} {:<22} {:<8} {:>5}  Progress", "", "Department", "Short", "Total");
        for (department, stats) in rows {
            println!(
                "{:<3} {:<22} {:<8} {:>5}  {} {:.0}%",
                department.icon,
                department.name,
                department.short_name.info(),
                stats.total,
                progress_bar(stats.percentage.completed, 12),
                stats.percentage.completed
            );
        }
        Ok(())
    }
}

#[derive(Debug, Parser)]
pub struct List {
    /// Department id or short name
    department: String,
}

impl List {
    #[instrument(level = "debug", skip(store))]
    pub fn run(self, store: &AppStore) -> anyhow::Result<()> {
        let department = find_department(store.data(), &self.department)?;
        let stats = progress::aggregate(&department.requirements);

        println!("{} {}", department.icon, department.name);
        println!(
            "{}",
            format!(
                "{} requirements, {:.0}% completed",
                stats.total, stats.percentage.completed
            )
            .dim()
        );
        println!();

        if department.requirements.is_empty() {
            println!(
                "No requirements yet. Add one with 'koas add {} <name>'.",
                department.id
            );
            return Ok(());
        }

        for (position, requirement) in department.requirements.iter().enumerate() {
            let status = requirement.status();
            let checklist = if requirement.checklist.is_empty() {
                String::new()
            } else {
                format!(
                    " [{}/{}]",
                    requirement.completed_count(),
                    requirement.checklist.len()
                )
            };
            let grade = requirement
                .grade()
                .map(|grade| format!(" nilai {grade}"))
                .unwrap_or_default();
            println!(
                "{:>3}. {} {}{}{}  {}",
                position + 1,
                status.icon(),
                requirement.name,
                checklist.dim(),
                grade.status(status),
                status.label().status(status)
            );
        }
        Ok(())
    }
}
