//! Terminal capability detection and utilities

use koas::Status;
use owo_colors::{OwoColorize, colors::css};

/// Detects whether colored output should be enabled
pub fn supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// Detects terminal width, returning None if not available
pub fn terminal_width() -> Option<u16> {
    terminal_size::terminal_size().map(|(w, _)| w.0)
}

/// Check if terminal is narrow (< 60 columns)
pub fn is_narrow() -> bool {
    terminal_width().is_some_and(|w| w < 60)
}

/// Extension trait for colorizing output
pub trait Colorize {
    /// Color as success (green)
    fn success(&self) -> String;
    /// Color as warning (amber)
    fn warning(&self) -> String;
    /// Color as info (blue)
    fn info(&self) -> String;
    /// Dim the text
    fn dim(&self) -> String;
    /// Color according to a requirement status
    fn status(&self, status: Status) -> String;
}

impl Colorize for str {
    fn success(&self) -> String {
        if supports_color() {
            self.fg::<css::Green>().to_string()
        } else {
            self.to_string()
        }
    }

    fn warning(&self) -> String {
        if supports_color() {
            self.fg::<css::Orange>().to_string()
        } else {
            self.to_string()
        }
    }

    fn info(&self) -> String {
        if supports_color() {
            self.fg::<css::LightBlue>().to_string()
        } else {
            self.to_string()
        }
    }

    fn dim(&self) -> String {
        if supports_color() {
            self.dimmed().to_string()
        } else {
            self.to_string()
        }
    }

    fn status(&self, status: Status) -> String {
        match status {
            Status::NotStarted => self.dim(),
            Status::OnGoing => self.warning(),
            Status::Done => self.success(),
            Status::Nilai if supports_color() => self.fg::<css::Gold>().bold().to_string(),
            Status::Nilai => self.to_string(),
        }
    }
}

impl Colorize for String {
    fn success(&self) -> String {
        self.as_str().success()
    }

    fn warning(&self) -> String {
        self.as_str().warning()
    }

    fn info(&self) -> String {
        self.as_str().info()
    }

    fn dim(&self) -> String {
        self.as_str().dim()
    }

    fn status(&self, status: Status) -> String {
        self.as_str().status(status)
    }
}

/// Renders a percentage (0-100) as a fixed-width bar.
pub fn progress_bar(percentage: f64, width: usize) -> String {
    let filled = filled_cells(percentage, width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn filled_cells(percentage: f64, width: usize) -> usize {
    let share = percentage.clamp(0.0, 100.0) / 100.0;
    ((share * width as f64).round() as usize).min(width)
}
