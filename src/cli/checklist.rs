use clap::Parser;
use tracing::instrument;

use super::{AppStore, find_checklist_item, find_department, find_requirement, resolve, terminal::Colorize};

#[derive(Debug, clap::Subcommand)]
pub enum Check {
    /// Append an item to a requirement's checklist
    Add(AddItem),

    /// Tick or untick a checklist item
    Toggle(Toggle),

    /// Remove an item from a requirement's checklist
    Remove(Remove),
}

impl Check {
    pub fn run(self, store: &mut AppStore) -> anyhow::Result<()> {
        match self {
            Self::Add(command) => command.run(store),
            Self::Toggle(command) => command.run(store),
            Self::Remove(command) => command.run(store),
        }
    }
}

#[derive(Debug, Parser)]
pub struct AddItem {
    /// Department id or short name
    department: String,

    /// Requirement position, id or name
    requirement: String,

    /// Text of the new item
    text: String,
}

impl AddItem {
    #[instrument(level = "debug", skip(store))]
    fn run(self, store: &mut AppStore) -> anyhow::Result<()> {
        let (department_id, requirement_id) = resolve(store, &self.department, &self.requirement)?;
        let Some(item) = store.add_checklist_item(&department_id, &requirement_id, &self.text)?
        else {
            anyhow::bail!("Requirement '{}' not found", self.requirement);
        };
        println!("{}", format!("✅ Added '{}'", item.text).success());
        Ok(())
    }
}

/// Identifies one checklist item.
#[derive(Debug, Parser)]
pub struct ItemRef {
    /// Department id or short name
    department: String,

    /// Requirement position, id or name
    requirement: String,

    /// Checklist item position, id or text
    item: String,
}

impl ItemRef {
    fn resolve(&self, store: &AppStore) -> anyhow::Result<(String, String, String)> {
        let department = find_department(store.data(), &self.department)?;
        let requirement = find_requirement(department, &self.requirement)?;
        let item = find_checklist_item(requirement, &self.item)?;
        Ok((department.id.clone(), requirement.id.clone(), item.id.clone()))
    }
}

#[derive(Debug, Parser)]
pub struct Toggle {
    #[command(flatten)]
    item: ItemRef,
}

impl Toggle {
    #[instrument(level = "debug", skip(store))]
    fn run(self, store: &mut AppStore) -> anyhow::Result<()> {
        let (department_id, requirement_id, item_id) = self.item.resolve(store)?;
        store.toggle_checklist(&department_id, &requirement_id, &item_id)?;

        let data = store.data();
        let Some(requirement) = data.requirement(&department_id, &requirement_id) else {
            return Ok(());
        };
        if let Some(item) = requirement.checklist_item(&item_id) {
            let mark = if item.done { "[x]" } else { "[ ]" };
            println!("{mark} {}", item.text);
        }
        let status = requirement.status();
        println!(
            "{}",
            format!(
                "{}/{} done · {}",
                requirement.completed_count(),
                requirement.checklist.len(),
                status.label()
            )
            .status(status)
        );
        Ok(())
    }
}

#[derive(Debug, Parser)]
pub struct Remove {
    #[command(flatten)]
    item: ItemRef,
}

impl Remove {
    #[instrument(level = "debug", skip(store))]
    fn run(self, store: &mut AppStore) -> anyhow::Result<()> {
        let (department_id, requirement_id, item_id) = self.item.resolve(store)?;
        store.remove_checklist_item(&department_id, &requirement_id, &item_id)?;
        println!("{}", "✅ Checklist item removed".success());
        Ok(())
    }
}
