use chrono::Utc;
use clap::Parser;
use dialoguer::Input;
use koas::UserProfile;
use tracing::instrument;

use super::{AppStore, terminal::Colorize};

#[derive(Debug, Parser)]
pub struct Setup {
    /// Full name
    #[arg(long)]
    name: Option<String>,

    /// University or faculty
    #[arg(long)]
    university: Option<String>,

    /// Cohort year
    #[arg(long)]
    angkatan: Option<String>,

    /// Rotation period
    #[arg(long)]
    periode: Option<String>,
}

impl Setup {
    /// Fills in a field from its flag, prompting (with the current value as
    /// the default) when the flag was not given.
    fn field(flag: Option<String>, prompt: &str, current: Option<&str>) -> anyhow::Result<String> {
        if let Some(value) = flag {
            return Ok(value);
        }
        let mut input = Input::<String>::new().with_prompt(prompt);
        if let Some(current) = current {
            input = input.default(current.to_string());
        }
        Ok(input.interact_text()?)
    }

    #[instrument(level = "debug", skip(store))]
    pub fn run(self, store: &mut AppStore) -> anyhow::Result<()> {
        let existing = store.data().profile.clone();
        let current = existing.as_ref();

        let profile = UserProfile {
            name: Self::field(self.name, "Nama", current.map(|p| p.name.as_str()))?,
            university: Self::field(
                self.university,
                "Universitas",
                current.map(|p| p.university.as_str()),
            )?,
            angkatan: Self::field(self.angkatan, "Angkatan", current.map(|p| p.angkatan.as_str()))?,
            periode: Self::field(self.periode, "Periode", current.map(|p| p.periode.as_str()))?,
            created_at: current.map_or_else(Utc::now, |p| p.created_at),
        };

        store.update_profile(profile)?;
        if !store.data().settings.has_onboarded {
            store.complete_onboarding()?;
        }
        println!("{}", "✅ Profile saved".success());
        Ok(())
    }
}

#[derive(Debug, Parser)]
pub struct Profile {}

impl Profile {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, store: &AppStore) -> anyhow::Result<()> {
        let Some(profile) = &store.data().profile else {
            println!("No profile yet. Run 'koas setup' to create one.");
            return Ok(());
        };

        println!("{}", profile.name);
        println!("Universitas: {}", profile.university);
        println!("Angkatan:    {}", profile.angkatan);
        println!("Periode:     {}", profile.periode);
        println!(
            "{}",
            format!("Since {}", profile.created_at.format("%d/%m/%Y")).dim()
        );
        Ok(())
    }
}

#[derive(Debug, clap::Subcommand)]
pub enum Settings {
    /// Show the current settings
    Show,

    /// Switch dark mode on or off
    DarkMode,

    /// Mark onboarding as complete
    Onboarded,
}

impl Settings {
    #[instrument(level = "debug", skip(store))]
    pub fn run(self, store: &mut AppStore) -> anyhow::Result<()> {
        match self {
            Self::Show => {
                let settings = store.data().settings;
                println!("dark mode:  {}", on_off(settings.dark_mode));
                println!("onboarded:  {}", on_off(settings.has_onboarded));
            }
            Self::DarkMode => {
                let dark_mode = store.toggle_dark_mode()?;
                println!("Dark mode {}", on_off(dark_mode).info());
            }
            Self::Onboarded => {
                store.complete_onboarding()?;
                println!("{}", "✅ Onboarding complete".success());
            }
        }
        Ok(())
    }
}

const fn on_off(value: bool) -> &'static str {
    if value { "on" } else { "off" }
}

#[derive(Debug, Parser)]
pub struct Activity {
    /// Number of entries to show
    #[arg(short, default_value_t = 10)]
    n: usize,
}

impl Activity {
    #[instrument(level = "debug", skip(store))]
    pub fn run(self, store: &AppStore) -> anyhow::Result<()> {
        let data = store.data();
        let entries = data.recent_activity(self.n);
        if entries.is_empty() {
            println!("No activity yet.");
            return Ok(());
        }

        for entry in entries {
            let department = data
                .department(&entry.department_id)
                .map_or(entry.department_id.as_str(), |d| d.short_name.as_str());
            let requirement = data
                .requirement(&entry.department_id, &entry.requirement_id)
                .map(|r| format!(" · {}", r.name))
                .unwrap_or_default();
            println!(
                "{} {}{} {}",
                entry.timestamp.format("%d/%m/%Y %H:%M").to_string().dim(),
                department.info(),
                requirement,
                entry.action
            );
        }
        Ok(())
    }
}
