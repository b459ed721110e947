//! Terminal output
//!
//! Human-readable messages go through [`OutputFormatter`]. In JSON mode the
//! decorative messages are suppressed so stdout only carries JSON documents.

use crate::core::{StatusBadge, TicketRow};
use crate::error::Result;
use colored::{ColoredString, Colorize};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Copy)]
pub struct OutputFormatter {
    json: bool,
}

impl OutputFormatter {
    pub fn new(json: bool, no_color: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self { json }
    }

    pub const fn is_json(&self) -> bool {
        self.json
    }

    pub fn success(&self, message: &str) {
        if !self.json {
            println!("{}", message.green());
        }
    }

    pub fn info(&self, message: &str) {
        if !self.json {
            println!("{message}");
        }
    }

    pub fn warning(&self, message: &str) {
        if !self.json {
            eprintln!("{} {message}", "Warning:".yellow().bold());
        }
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {message}", "Error:".red().bold());
    }

    /// Print a value as pretty JSON on stdout
    pub fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        serde_json::to_writer_pretty(&mut stdout, value)?;
        writeln!(stdout)?;
        Ok(())
    }

    /// Print a ticket list as an aligned table
    pub fn print_ticket_table(&self, rows: &[TicketRow]) {
        let number_w = column_width(rows, "NUMBER", |r| r.number.as_str());
        let status_w = column_width(rows, "STATUS", |r| r.status.as_str());
        let facility_w = column_width(rows, "FACILITY", |r| r.facility.as_str());
        let category_w = column_width(rows, "CATEGORY", |r| r.category.as_str());

        println!(
            "{:<number_w$}  {:<status_w$}  {:<facility_w$}  {:<category_w$}  {:<16}  {}",
            "NUMBER".bold(),
            "STATUS".bold(),
            "FACILITY".bold(),
            "CATEGORY".bold(),
            "CREATED".bold(),
            "TITLE".bold(),
        );
        for row in rows {
            println!(
                "{:<number_w$}  {}  {:<facility_w$}  {:<category_w$}  {:<16}  {}",
                row.number,
                badge(row.badge, &format!("{:<status_w$}", row.status)),
                row.facility,
                row.category,
                row.created,
                row.title,
            );
        }
    }
}

fn column_width(rows: &[TicketRow], header: &str, field: impl Fn(&TicketRow) -> &str) -> usize {
    rows.iter()
        .map(|r| field(r).chars().count())
        .max()
        .unwrap_or(0)
        .max(header.len())
}

/// Colour a status label: active orange, closed grey, anything else yellow
pub fn badge(badge: StatusBadge, label: &str) -> ColoredString {
    match badge {
        StatusBadge::Active => label.truecolor(255, 140, 0).bold(),
        StatusBadge::Closed => label.bright_black(),
        StatusBadge::Pending => label.yellow(),
    }
}
