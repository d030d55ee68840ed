//! Property tests for status derivation, progress aggregation and snapshot
//! round-trips over generated data.

#![allow(missing_docs)]

use chrono::{DateTime, TimeZone, Utc};
use koas::{
    AppData, Requirement, RequirementDraft, RequirementType, Status,
    domain::{derive_status, mutation, progress},
    storage::{export_snapshot, parse_snapshot},
};
use proptest::{collection::vec, prelude::*, sample::Index};

const TOLERANCE: f64 = 1e-9;

fn at(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_735_689_600 + seconds, 0).unwrap()
}

/// Free-text grades, including the empty string.
fn grade() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop_oneof![
        Just(String::new()),
        "[A-E][+-]?",
        "[0-9]{1,3}",
    ])
}

/// A requirement whose checklist items are done according to `done`.
fn requirement(done: &[bool], grade: Option<String>) -> Requirement {
    let draft = done.iter().enumerate().fold(
        RequirementDraft::new("Scaling", RequirementType::Pasien),
        |draft, (i, _)| draft.with_item(format!("Step {i}")),
    );
    let mut requirement = Requirement::from_draft(draft, at(0));
    for (item, &done) in requirement.checklist.iter_mut().zip(done) {
        if done {
            item.toggle(at(60));
        }
    }
    requirement.grade = grade;
    requirement
}

fn arb_requirement() -> impl Strategy<Value = Requirement> {
    (vec(any::<bool>(), 0..12), grade()).prop_map(|(done, grade)| requirement(&done, grade))
}

#[derive(Debug, Clone)]
enum Op {
    Add { department: Index, items: usize },
    Toggle { requirement: Index, item: Index },
    Grade { requirement: Index, grade: String },
    AddItem { requirement: Index },
    RemoveItem { requirement: Index, item: Index },
    Delete { requirement: Index },
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (any::<Index>(), 0usize..5).prop_map(|(department, items)| Op::Add { department, items }),
        4 => (any::<Index>(), any::<Index>()).prop_map(|(requirement, item)| Op::Toggle { requirement, item }),
        2 => (any::<Index>(), "[A-E]?").prop_map(|(requirement, grade)| Op::Grade { requirement, grade }),
        1 => any::<Index>().prop_map(|requirement| Op::AddItem { requirement }),
        1 => (any::<Index>(), any::<Index>()).prop_map(|(requirement, item)| Op::RemoveItem { requirement, item }),
        1 => any::<Index>().prop_map(|requirement| Op::Delete { requirement }),
    ]
}

/// `(department id, requirement id)` of every requirement.
fn addresses(data: &AppData) -> Vec<(String, String)> {
    data.departments
        .iter()
        .flat_map(|d| d.requirements.iter().map(|r| (d.id.clone(), r.id.clone())))
        .collect()
}

/// Applies `op` at time `now`; operations without a target leave the data
/// unchanged.
fn apply(data: AppData, op: &Op, now: DateTime<Utc>) -> AppData {
    let targets = addresses(&data);
    let pick = |index: &Index| (!targets.is_empty()).then(|| &targets[index.index(targets.len())]);

    let next = match op {
        Op::Add { department, items } => {
            let id = data.departments[department.index(data.departments.len())].id.clone();
            let draft = (0..*items).fold(
                RequirementDraft::new("Generated", RequirementType::NonPasien),
                |draft, i| draft.with_item(format!("Item {i}")),
            );
            mutation::add_requirement(&data, &id, draft, now).map(|(next, _)| next)
        }
        Op::Toggle { requirement, item } => pick(requirement).and_then(|(d, r)| {
            let checklist = &data.requirement(d, r)?.checklist;
            let item = &checklist.get(item.index(checklist.len().max(1)))?.id;
            mutation::toggle_checklist(&data, d, r, item, now)
        }),
        Op::Grade { requirement, grade } => pick(requirement)
            .and_then(|(d, r)| mutation::set_grade(&data, d, r, grade, now)),
        Op::AddItem { requirement } => pick(requirement).and_then(|(d, r)| {
            mutation::add_checklist_item(&data, d, r, "Extra", now).map(|(next, _)| next)
        }),
        Op::RemoveItem { requirement, item } => pick(requirement).and_then(|(d, r)| {
            let checklist = &data.requirement(d, r)?.checklist;
            let item = &checklist.get(item.index(checklist.len().max(1)))?.id;
            mutation::remove_checklist_item(&data, d, r, item, now)
        }),
        Op::Delete { requirement } => {
            pick(requirement).and_then(|(d, r)| mutation::delete_requirement(&data, d, r))
        }
    };
    next.unwrap_or(data)
}

fn arb_data() -> impl Strategy<Value = AppData> {
    vec(arb_op(), 0..40).prop_map(|ops| {
        ops.iter()
            .zip(0..)
            .fold(AppData::default(), |data, (op, step)| apply(data, op, at(step * 90)))
    })
}

proptest! {
    /// Each derivation rule holds for every checklist and grade.
    #[test]
    fn status_follows_grade_then_checklist(requirement in arb_requirement()) {
        let status = derive_status(&requirement);
        let done = requirement.completed_count();
        let total = requirement.checklist.len();

        if requirement.grade.as_deref().is_some_and(|grade| !grade.is_empty()) {
            prop_assert_eq!(status, Status::Nilai);
        } else if total == 0 || done == 0 {
            prop_assert_eq!(status, Status::NotStarted);
        } else if done == total {
            prop_assert_eq!(status, Status::Done);
        } else {
            prop_assert_eq!(status, Status::OnGoing);
        }
    }

    /// `completed_at` is set exactly for done items.
    #[test]
    fn completed_at_tracks_done(requirement in arb_requirement()) {
        for item in &requirement.checklist {
            prop_assert_eq!(item.done, item.completed_at.is_some());
        }
    }

    /// Counts add up to the total and percentages to one hundred.
    #[test]
    fn percentages_sum_to_one_hundred(requirements in vec(arb_requirement(), 1..60)) {
        let stats = progress::aggregate(&requirements);
        let p = stats.percentage;

        prop_assert_eq!(stats.total, requirements.len());
        prop_assert_eq!(stats.not_started + stats.ongoing + stats.done + stats.nilai, stats.total);
        prop_assert!((p.not_started + p.ongoing + p.done + p.nilai - 100.0).abs() < TOLERANCE);
        prop_assert!((p.completed - (p.done + p.nilai)).abs() < TOLERANCE);
        for status in Status::ALL {
            let expected = requirements.iter().filter(|r| r.status() == status).count();
            prop_assert_eq!(stats.count(status), expected);
        }
    }

    /// Global progress is the aggregate of every requirement, and the
    /// department totals add up to it.
    #[test]
    fn department_progress_adds_up_to_global(data in arb_data()) {
        let global = progress::global_progress(&data.departments);
        let per_department: usize = data
            .departments
            .iter()
            .map(|d| progress::department_progress(&data.departments, &d.id).total)
            .sum();

        prop_assert_eq!(global, progress::aggregate(data.requirements()));
        prop_assert_eq!(per_department, global.total);
        if global.total == 0 {
            prop_assert_eq!(global, koas::ProgressStats::default());
        }
    }

    /// Ranking is ordered by completed share and keeps every department.
    #[test]
    fn ranking_is_descending(data in arb_data()) {
        let ranked = progress::ranked_departments(&data.departments);

        prop_assert_eq!(ranked.len(), data.departments.len());
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].1.percentage.completed >= pair[1].1.percentage.completed);
        }
    }

    /// A snapshot parses back into the data it was exported from.
    #[test]
    fn snapshot_round_trips(data in arb_data()) {
        let text = export_snapshot(&data).unwrap();
        prop_assert_eq!(parse_snapshot(&text).unwrap(), data);
    }
}

#[test]
fn empty_input_aggregates_to_zero() {
    let stats = progress::aggregate(std::iter::empty());

    assert_eq!(stats.total, 0);
    assert_eq!(stats, koas::ProgressStats::default());
    assert!(stats.percentage.completed.abs() < TOLERANCE);
}
