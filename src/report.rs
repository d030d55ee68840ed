//! One row per requirement, rendered as CSV or as an HTML table that
//! spreadsheet software opens directly.

use std::fmt::{self, Write};

use chrono::{DateTime, Utc};

use crate::{AppData, Status};

const HEADERS: [&str; 9] = [
    "Departemen",
    "Requirement",
    "Status",
    "Checklist Selesai",
    "Total Checklist",
    "Persentase",
    "Catatan",
    "Tanggal Mulai",
    "Tanggal Selesai",
];

const PLACEHOLDER: &str = "-";

/// A single requirement flattened for tabular export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Department display name.
    pub department: String,
    /// Requirement name.
    pub requirement: String,
    /// Derived status.
    pub status: Status,
    /// Completed checklist items.
    pub completed: usize,
    /// All checklist items.
    pub total: usize,
    /// Rounded checklist completion, 0-100.
    pub percentage: u32,
    /// Notes, or `-` when empty.
    pub notes: String,
    /// When the requirement was added.
    pub started: DateTime<Utc>,
    /// Latest checklist completion, for done or graded requirements.
    pub finished: Option<DateTime<Utc>>,
}

impl Row {
    fn cells(&self) -> [String; 9] {
        [
            self.department.clone(),
            self.requirement.clone(),
            self.status.label().to_string(),
            self.completed.to_string(),
            self.total.to_string(),
            format!("{}%", self.percentage),
            self.notes.clone(),
            format_date(self.started),
            self.finished
                .map_or_else(|| PLACEHOLDER.to_string(), format_date),
        ]
    }
}

/// Flattens every requirement, in catalogue then insertion order.
#[must_use]
pub fn rows(data: &AppData) -> Vec<Row> {
    data.departments
        .iter()
        .flat_map(|department| {
            department.requirements.iter().map(|requirement| {
                let status = requirement.status();
                Row {
                    department: department.name.clone(),
                    requirement: requirement.name.clone(),
                    status,
                    completed: requirement.completed_count(),
                    total: requirement.checklist.len(),
                    percentage: requirement.checklist_percentage(),
                    notes: if requirement.notes.is_empty() {
                        PLACEHOLDER.to_string()
                    } else {
                        requirement.notes.clone()
                    },
                    started: requirement.created_at,
                    finished: status
                        .is_completed()
                        .then(|| requirement.last_completed_at())
                        .flatten(),
                }
            })
        })
        .collect()
}

/// Renders the data as CSV. Every cell is double-quoted.
#[must_use]
pub fn to_csv(data: &AppData) -> String {
    let header = HEADERS.map(str::to_string);
    std::iter::once(header)
        .chain(rows(data).iter().map(Row::cells))
        .map(|cells| {
            cells
                .iter()
                .map(|cell| format!("\"{}\"", cell.replace('"', "\"\"")))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders the data as an HTML table, with the status cell coloured by
/// status.
#[must_use]
pub fn to_spreadsheet(data: &AppData) -> String {
    Spreadsheet(data).to_string()
}

/// An HTML table of every requirement that spreadsheet software opens
/// directly.
#[derive(Debug, Clone, Copy)]
pub struct Spreadsheet<'a>(pub &'a AppData);

impl fmt::Display for Spreadsheet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<html><head><meta charset=\"utf-8\"></head><body><table border=\"1\">\
             <tr style=\"background-color: #4F46E5; color: white; font-weight: bold;\">"
        )?;
        for header in HEADERS {
            write!(f, "<th>{header}</th>")?;
        }
        write!(f, "</tr>")?;

        for row in rows(self.0) {
            write_row(f, &row)?;
        }

        write!(f, "</table></body></html>")
    }
}

fn write_row(f: &mut impl fmt::Write, row: &Row) -> fmt::Result {
    let [department, requirement, status, completed, total, percentage, notes, started, finished] =
        row.cells();
    write!(
        f,
        "<tr><td>{}</td><td>{}</td>",
        escape(&department),
        escape(&requirement)
    )?;
    write!(
        f,
        "<td style=\"color: {}; font-weight: bold;\">{status}</td>",
        row.status.colour()
    )?;
    for centred in [completed, total, percentage] {
        write!(f, "<td style=\"text-align: center;\">{centred}</td>")?;
    }
    write!(
        f,
        "<td>{}</td><td>{started}</td><td>{finished}</td></tr>",
        escape(&notes)
    )
}

fn format_date(at: DateTime<Utc>) -> String {
    at.format("%-d/%-m/%Y").to_string()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
