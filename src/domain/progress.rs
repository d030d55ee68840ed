use serde::Serialize;

use crate::domain::{Department, Requirement, Status};

/// Share of requirements in each status, as plain (unrounded) percentages
/// in the range 0-100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Percentages {
    /// Not started.
    pub not_started: f64,
    /// On going.
    pub ongoing: f64,
    /// Done but not graded.
    pub done: f64,
    /// Graded.
    pub nilai: f64,
    /// Done and graded together.
    pub completed: f64,
}

/// Requirement counts per derived status.
///
/// Computed fresh on every call; nothing here is cached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressStats {
    /// Number of requirements counted.
    pub total: usize,
    /// Requirements with [`Status::NotStarted`].
    pub not_started: usize,
    /// Requirements with [`Status::OnGoing`].
    pub ongoing: usize,
    /// Requirements with [`Status::Done`].
    pub done: usize,
    /// Requirements with [`Status::Nilai`].
    pub nilai: usize,
    /// Each count as a share of `total`.
    pub percentage: Percentages,
}

impl ProgressStats {
    /// Number of requirements counted under `status`.
    #[must_use]
    pub const fn count(&self, status: Status) -> usize {
        match status {
            Status::NotStarted => self.not_started,
            Status::OnGoing => self.ongoing,
            Status::Done => self.done,
            Status::Nilai => self.nilai,
        }
    }

    /// Done plus graded.
    #[must_use]
    pub const fn completed(&self) -> usize {
        self.done + self.nilai
    }

    fn record(&mut self, status: Status) {
        self.total += 1;
        match status {
            Status::NotStarted => self.not_started += 1,
            Status::OnGoing => self.ongoing += 1,
            Status::Done => self.done += 1,
            Status::Nilai => self.nilai += 1,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn with_percentages(mut self) -> Self {
        if self.total == 0 {
            return Self::default();
        }
        let total = self.total as f64;
        let share = |count: usize| count as f64 / total * 100.0;
        self.percentage = Percentages {
            not_started: share(self.not_started),
            ongoing: share(self.ongoing),
            done: share(self.done),
            nilai: share(self.nilai),
            completed: share(self.completed()),
        };
        self
    }
}

/// Aggregates the derived statuses of `requirements`.
///
/// An empty input yields all-zero counts and percentages.
#[must_use]
pub fn aggregate<'a>(requirements: impl IntoIterator<Item = &'a Requirement>) -> ProgressStats {
    requirements
        .into_iter()
        .fold(ProgressStats::default(), |mut stats, requirement| {
            stats.record(requirement.status());
            stats
        })
        .with_percentages()
}

/// Aggregates a single department's requirements.
///
/// An unknown department id yields empty stats.
#[must_use]
pub fn department_progress(departments: &[Department], department_id: &str) -> ProgressStats {
    departments
        .iter()
        .find(|d| d.id == department_id)
        .map_or_else(ProgressStats::default, |d| aggregate(&d.requirements))
}

/// Aggregates every requirement in every department.
#[must_use]
pub fn global_progress(departments: &[Department]) -> ProgressStats {
    aggregate(departments.iter().flat_map(|d| d.requirements.iter()))
}

/// Departments paired with their progress, most completed first.
///
/// Ties keep catalogue order.
#[must_use]
pub fn ranked_departments(departments: &[Department]) -> Vec<(&Department, ProgressStats)> {
    let mut ranked: Vec<_> = departments
        .iter()
        .map(|d| (d, aggregate(&d.requirements)))
        .collect();
    ranked.sort_by(|(_, a), (_, b)| b.percentage.completed.total_cmp(&a.percentage.completed));
    ranked
}
