use std::path::{Path, PathBuf};

mod checklist;
mod config;
mod department;
mod profile;
mod requirement;
mod status;
mod terminal;
mod transfer;

use checklist::Check;
use clap::ArgAction;
use config::Configure;
use department::{Departments, List};
use koas::{AppData, ChecklistItem, Config, Department, FileBackend, Requirement, Store};
use profile::{Activity, Profile, Settings, Setup};
use requirement::{Add, Delete, Grade, Show, Update};
use status::Status;
use transfer::{Export, Import, Reset};

/// The store every command reads from and writes through.
pub type AppStore = Store<FileBackend>;

const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The directory the tracker's data and configuration live in
    ///
    /// Defaults to `koas-tracker` inside the platform data directory.
    #[arg(short, long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let root = match self.root {
            Some(root) => root,
            None => default_root()?,
        };
        let config_path = root.join(CONFIG_FILE);
        let config = Config::load_or_default(&config_path);
        let mut store = Store::open(FileBackend::new(root), &config);
        tracing::debug!("Data directory: {}", store.backend().root().display());

        self.command
            .unwrap_or_else(|| Command::Status(Status::default()))
            .run(&mut store, &config_path)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

fn default_root() -> anyhow::Result<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join("koas-tracker"))
        .ok_or_else(|| anyhow::anyhow!("Could not locate a data directory; pass --root"))
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Show overall and per-department progress (default)
    Status(Status),

    /// Set up or edit your profile
    Setup(Setup),

    /// Show your profile
    Profile(Profile),

    /// Change application settings
    #[command(subcommand)]
    Settings(Settings),

    /// List departments with their progress
    Departments(Departments),

    /// List the requirements of a department
    List(List),

    /// Show a requirement in detail
    Show(Show),

    /// Add a requirement to a department
    Add(Add),

    /// Edit a requirement
    Update(Update),

    /// Record the grade (nilai) of a requirement
    Grade(Grade),

    /// Delete a requirement and its checklist
    Delete(Delete),

    /// Manage a requirement's checklist
    #[command(subcommand)]
    Check(Check),

    /// Show recent activity
    Activity(Activity),

    /// Export data as a JSON backup, CSV or spreadsheet
    Export(Export),

    /// Restore data from a JSON backup
    ///
    /// This replaces all current data.
    Import(Import),

    /// Delete all data and start fresh
    Reset(Reset),

    /// Show or change the storage configuration
    Config(Configure),
}

impl Command {
    fn run(self, store: &mut AppStore, config_path: &Path) -> anyhow::Result<()> {
        match self {
            Self::Status(command) => command.run(store)?,
            Self::Setup(command) => command.run(store)?,
            Self::Profile(command) => command.run(store)?,
            Self::Settings(command) => command.run(store)?,
            Self::Departments(command) => command.run(store)?,
            Self::List(command) => command.run(store)?,
            Self::Show(command) => command.run(store)?,
            Self::Add(command) => command.run(store)?,
            Self::Update(command) => command.run(store)?,
            Self::Grade(command) => command.run(store)?,
            Self::Delete(command) => command.run(store)?,
            Self::Check(command) => command.run(store)?,
            Self::Activity(command) => command.run(store)?,
            Self::Export(command) => command.run(store)?,
            Self::Import(command) => command.run(store)?,
            Self::Reset(command) => command.run(store)?,
            Self::Config(command) => command.run(config_path)?,
        }
        Ok(())
    }
}

/// Finds a department by id or short name (case-insensitive).
fn find_department<'a>(data: &'a AppData, query: &str) -> anyhow::Result<&'a Department> {
    data.departments
        .iter()
        .find(|d| d.id.eq_ignore_ascii_case(query) || d.short_name.eq_ignore_ascii_case(query))
        .ok_or_else(|| {
            anyhow::anyhow!("Department '{query}' not found. Run 'koas departments' to list them.")
        })
}

/// Finds a requirement by 1-based position, id, or name.
fn find_requirement<'a>(department: &'a Department, query: &str) -> anyhow::Result<&'a Requirement> {
    find_by_reference(
        &department.requirements,
        query,
        |r| &r.id,
        |r| &r.name,
    )
    .map_err(|e| anyhow::anyhow!("{e} requirement '{query}' in {}", department.name))
}

/// Finds a checklist item by 1-based position, id, or text.
fn find_checklist_item<'a>(
    requirement: &'a Requirement,
    query: &str,
) -> anyhow::Result<&'a ChecklistItem> {
    find_by_reference(
        &requirement.checklist,
        query,
        |item| &item.id,
        |item| &item.text,
    )
    .map_err(|e| anyhow::anyhow!("{e} checklist item '{query}' in {}", requirement.name))
}

/// Resolves a department and requirement reference to their ids.
fn resolve(store: &AppStore, department: &str, requirement: &str) -> anyhow::Result<(String, String)> {
    let department = find_department(store.data(), department)?;
    let requirement = find_requirement(department, requirement)?;
    Ok((department.id.clone(), requirement.id.clone()))
}

#[derive(Debug, PartialEq, Eq)]
enum ReferenceError {
    NotFound,
    Ambiguous,
}

impl std::fmt::Display for ReferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "No"),
            Self::Ambiguous => write!(f, "More than one"),
        }
    }
}

fn find_by_reference<'a, T>(
    items: &'a [T],
    query: &str,
    id: impl Fn(&T) -> &str,
    name: impl Fn(&T) -> &str,
) -> Result<&'a T, ReferenceError> {
    if let Ok(position) = query.parse::<usize>() {
        if let Some(item) = position.checked_sub(1).and_then(|i| items.get(i)) {
            return Ok(item);
        }
    }

    if let Some(item) = items.iter().find(|item| id(item) == query) {
        return Ok(item);
    }

    let mut matches = items
        .iter()
        .filter(|item| name(item).eq_ignore_ascii_case(query));
    match (matches.next(), matches.next()) {
        (Some(item), None) => Ok(item),
        (Some(_), Some(_)) => Err(ReferenceError::Ambiguous),
        (None, _) => Err(ReferenceError::NotFound),
    }
}

#[cfg(test)]
mod tests {
    use koas::{RequirementDraft, RequirementType};

    use super::*;

    fn department() -> Department {
        let mut department = Department::seed().remove(0);
        for name in ["Scaling", "Root planing", "scaling"] {
            department.requirements.push(Requirement::from_draft(
                RequirementDraft::new(name, RequirementType::Pasien),
                chrono::Utc::now(),
            ));
        }
        department
    }

    #[test]
    fn finds_department_by_id_or_short_name() {
        let data = AppData::default();
        assert_eq!(find_department(&data, "perio").unwrap().id, "periodonsia");
        assert_eq!(find_department(&data, "Radiologi").unwrap().id, "radiologi");
        assert!(find_department(&data, "cardio").is_err());
    }

    #[test]
    fn finds_requirement_by_position_id_and_name() {
        let department = department();
        let id = department.requirements[1].id.clone();

        assert_eq!(find_requirement(&department, "2").unwrap().id, id);
        assert_eq!(find_requirement(&department, &id).unwrap().id, id);
        assert_eq!(find_requirement(&department, "root PLANING").unwrap().id, id);
    }

    #[test]
    fn reports_ambiguous_and_missing_names() {
        let department = department();
        let names = &department.requirements;

        assert_eq!(
            find_by_reference(names, "scaling", |r| &r.id, |r| &r.name).unwrap_err(),
            ReferenceError::Ambiguous
        );
        assert_eq!(
            find_by_reference(names, "9", |r| &r.id, |r| &r.name).unwrap_err(),
            ReferenceError::NotFound
        );
    }
}
