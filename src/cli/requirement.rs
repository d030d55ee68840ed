use clap::Parser;
use dialoguer::Confirm;
use koas::{
    ChecklistItem, Gender, PatientInfo, RequirementDraft, RequirementType, RequirementUpdate,
};
use tracing::instrument;

use super::{AppStore, find_department, find_requirement, resolve, terminal::Colorize};

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum Kind {
    Pasien,
    NonPasien,
}

impl From<Kind> for RequirementType {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Pasien => Self::Pasien,
            Kind::NonPasien => Self::NonPasien,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum GenderArg {
    L,
    P,
}

impl From<GenderArg> for Gender {
    fn from(gender: GenderArg) -> Self {
        match gender {
            GenderArg::L => Self::L,
            GenderArg::P => Self::P,
        }
    }
}

#[derive(Debug, Parser)]
pub struct Add {
    /// Department id or short name
    department: String,

    /// Name of the requirement
    name: String,

    /// A patient requirement (implied by any patient detail)
    #[arg(long)]
    patient: bool,

    /// Checklist item (repeatable)
    #[arg(long = "item", short = 'i', value_name = "TEXT")]
    items: Vec<String>,

    /// Notes
    #[arg(long, short, default_value = "")]
    notes: String,

    /// Patient medical record code
    #[arg(long)]
    rm_code: Option<String>,

    /// Patient age
    #[arg(long)]
    age: Option<u32>,

    /// Patient gender
    #[arg(long, value_enum)]
    gender: Option<GenderArg>,
}

impl Add {
    #[instrument(level = "debug", skip(store))]
    pub fn run(self, store: &mut AppStore) -> anyhow::Result<()> {
        let department = find_department(store.data(), &self.department)?;
        let department_id = department.id.clone();
        let department_name = department.name.clone();

        let has_details = self.rm_code.is_some() || self.age.is_some() || self.gender.is_some();
        let kind = if self.patient || has_details {
            RequirementType::Pasien
        } else {
            RequirementType::NonPasien
        };
        let patient = has_details.then(|| PatientInfo {
            rm_code: self.rm_code,
            age: self.age,
            gender: self.gender.map(Gender::from),
            notes: None,
        });

        let draft = RequirementDraft {
            name: self.name,
            kind,
            checklist: self.items.into_iter().map(ChecklistItem::new).collect(),
            notes: self.notes,
            patient,
        };

        let Some(requirement) = store.add_requirement(&department_id, draft)? else {
            anyhow::bail!("Department {department_name} disappeared while adding");
        };

        let position = store
            .data()
            .department(&department_id)
            .map_or(0, |d| d.requirements.len());
        println!(
            "{}",
            format!(
                "✅ Added '{}' to {department_name} as #{position}",
                requirement.name
            )
            .success()
        );
        Ok(())
    }
}

#[derive(Debug, Parser)]
pub struct Update {
    /// Department id or short name
    department: String,

    /// Requirement position, id or name
    requirement: String,

    /// New name
    #[arg(long)]
    name: Option<String>,

    /// New notes
    #[arg(long, short)]
    notes: Option<String>,

    /// New requirement type
    #[arg(long = "type", value_enum)]
    kind: Option<Kind>,
}

impl Update {
    #[instrument(level = "debug", skip(store))]
    pub fn run(self, store: &mut AppStore) -> anyhow::Result<()> {
        let (department_id, requirement_id) = resolve(store, &self.department, &self.requirement)?;

        let update = RequirementUpdate {
            name: self.name,
            notes: self.notes,
            kind: self.kind.map(RequirementType::from),
            ..RequirementUpdate::default()
        };
        if update == RequirementUpdate::default() {
            anyhow::bail!("Nothing to update; pass --name, --notes or --type");
        }

        store.update_requirement(&department_id, &requirement_id, update)?;
        println!("{}", "✅ Requirement updated".success());
        Ok(())
    }
}

#[derive(Debug, Parser)]
pub struct Grade {
    /// Department id or short name
    department: String,

    /// Requirement position, id or name
    requirement: String,

    /// The grade, e.g. 'A' or '85'
    grade: String,
}

impl Grade {
    #[instrument(level = "debug", skip(store))]
    pub fn run(self, store: &mut AppStore) -> anyhow::Result<()> {
        let (department_id, requirement_id) = resolve(store, &self.department, &self.requirement)?;
        store.set_grade(&department_id, &requirement_id, &self.grade)?;
        println!("{}", format!("⭐ Nilai {} recorded", self.grade).success());
        Ok(())
    }
}

#[derive(Debug, Parser)]
pub struct Delete {
    /// Department id or short name
    department: String,

    /// Requirement position, id or name
    requirement: String,

    /// Skip confirmation prompts
    #[arg(long, short)]
    yes: bool,
}

impl Delete {
    #[instrument(level = "debug", skip(store))]
    pub fn run(self, store: &mut AppStore) -> anyhow::Result<()> {
        let department = find_department(store.data(), &self.department)?;
        let requirement = find_requirement(department, &self.requirement)?;
        let (department_id, requirement_id, name) = (
            department.id.clone(),
            requirement.id.clone(),
            requirement.name.clone(),
        );

        if !self.yes {
            let confirmed = Confirm::new()
                .with_prompt(format!(
                    "Delete '{name}' and its {} checklist items?",
                    requirement.checklist.len()
                ))
                .default(false)
                .interact()?;
            if !confirmed {
                println!("Cancelled");
                return Ok(());
            }
        }

        store.delete_requirement(&department_id, &requirement_id)?;
        println!("{}", format!("✅ Deleted '{name}'").success());
        Ok(())
    }
}

#[derive(Debug, Parser)]
pub struct Show {
    /// Department id or short name
    department: String,

    /// Requirement position, id or name
    requirement: String,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

impl Show {
    #[instrument(level = "debug", skip(store))]
    pub fn run(self, store: &AppStore) -> anyhow::Result<()> {
        let department = find_department(store.data(), &self.department)?;
        let requirement = find_requirement(department, &self.requirement)?;
        let status = requirement.status();

        if matches!(self.output, OutputFormat::Json) {
            let mut value = serde_json::to_value(requirement)?;
            value["status"] = serde_json::to_value(status)?;
            println!("{}", serde_json::to_string_pretty(&value)?);
            return Ok(());
        }

        println!("{} {}", status.icon(), requirement.name);
        println!(
            "{} · {} · {}",
            department.name.dim(),
            requirement.kind.label().info(),
            status.label().status(status)
        );
        if let Some(grade) = requirement.grade() {
            println!("Nilai: {}", grade.status(status));
        }
        println!(
            "{}",
            format!(
                "Added {}, updated {}",
                requirement.created_at.format("%d/%m/%Y"),
                requirement.updated_at.format("%d/%m/%Y %H:%M")
            )
            .dim()
        );

        if let Some(patient) = &requirement.patient {
            println!();
            println!("Pasien");
            if let Some(rm_code) = &patient.rm_code {
                println!("  No. RM: {rm_code}");
            }
            if let Some(age) = patient.age {
                println!("  Usia:   {age}");
            }
            if let Some(gender) = patient.gender {
                println!("  Gender: {gender:?}");
            }
            if let Some(notes) = &patient.notes {
                println!("  {notes}");
            }
        }

        if !requirement.notes.is_empty() {
            println!();
            println!("{}", requirement.notes);
        }

        println!();
        if requirement.checklist.is_empty() {
            println!("{}", "No checklist items".dim());
        } else {
            println!(
                "Checklist {}/{} ({}%)",
                requirement.completed_count(),
                requirement.checklist.len(),
                requirement.checklist_percentage()
            );
            for (position, item) in requirement.checklist.iter().enumerate() {
                let mark = if item.done { "[x]".success() } else { "[ ]".to_string() };
                let completed = item
                    .completed_at
                    .map(|at| format!("  {}", at.format("%d/%m/%Y")).dim())
                    .unwrap_or_default();
                println!("{:>3}. {mark} {}{completed}", position + 1, item.text);
            }
        }
        Ok(())
    }
}
