use crate::api::Ticket;
use crate::cli::commands::ExportFormat;
use crate::core::{AuthorNames, TicketRow};
use crate::error::Result;

/// Serialize tickets in the requested format
///
/// JSON and YAML keep the full API shape. CSV holds one flattened row per
/// ticket, the same columns the list view shows.
pub fn export_tickets(
    tickets: &[Ticket],
    format: ExportFormat,
    current_user_id: Option<String>,
) -> Result<String> {
    match format {
        ExportFormat::Json => {
            let mut content = serde_json::to_string_pretty(tickets)?;
            content.push('\n');
            Ok(content)
        },
        ExportFormat::Yaml => Ok(serde_yaml::to_string(tickets)?),
        ExportFormat::Csv => export_csv(tickets, current_user_id),
    }
}

fn export_csv(tickets: &[Ticket], current_user_id: Option<String>) -> Result<String> {
    let mut authors = AuthorNames::new(current_user_id);
    // Header row even when there are no tickets
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(vec![]);
    writer.write_record(TicketRow::HEADERS)?;
    for ticket in tickets {
        writer.serialize(TicketRow::new(ticket, &mut authors))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
