use super::common::{not_found_as, HandlerContext};
use super::export::export_tickets;
use crate::api::{
    ReplyRequest, Setting, SolutionRequest, Ticket, TicketStatusFilter, UpdateTicketRequest,
};
use crate::cli::commands::ExportFormat;
use crate::cli::output::badge;
use crate::cli::OutputFormatter;
use crate::core::{
    time::format_timestamp, validation, AuthorNames, FormOptions, SortOrder, StatusBadge,
    TicketDraft, TicketFilter, TicketRow, CATEGORY_OPTIONS_KEY, FACILITY_OPTIONS_KEY,
};
use crate::error::{HelpdeskError, Result};
use crate::interactive::InteractiveMode;
use colored::Colorize;
use std::path::PathBuf;
use tracing::warn;

pub struct ListParams {
    pub closed: bool,
    pub search: Option<String>,
    pub regex: bool,
    pub category: Option<String>,
    pub facility: Option<String>,
    pub sort: String,
    pub limit: Option<usize>,
}

const fn tab(closed: bool) -> TicketStatusFilter {
    if closed {
        TicketStatusFilter::Closed
    } else {
        TicketStatusFilter::Open
    }
}

/// Handle `tickets list`
pub async fn handle_list(
    ctx: &HandlerContext,
    params: ListParams,
    output: &OutputFormatter,
) -> Result<()> {
    let session = ctx.require_login()?;
    let filter = TicketFilter::new()
        .search(params.search.as_deref(), params.regex)?
        .category(params.category)
        .facility(params.facility)
        .sort(params.sort.parse::<SortOrder>()?)
        .limit(params.limit);

    let status = tab(params.closed);
    let list = ctx.run(ctx.client.tickets().list(Some(status))).await?;
    let tickets = filter.apply(list.tickets);

    if output.is_json() {
        return output.print_json(&tickets);
    }

    if tickets.is_empty() {
        output.info(&format!("No {status} tickets found."));
        return Ok(());
    }

    let mut authors = AuthorNames::new(session.user_id);
    let rows: Vec<TicketRow> = tickets
        .iter()
        .map(|ticket| TicketRow::new(ticket, &mut authors))
        .collect();
    output.print_ticket_table(&rows);
    output.info(&format!("\n{} {status} ticket(s)", rows.len()));
    Ok(())
}

async fn fetch_ticket(ctx: &HandlerContext, ticket_id: &str) -> Result<Ticket> {
    ctx.run(ctx.client.tickets().get(ticket_id))
        .await
        .map_err(|e| {
            not_found_as(e, || HelpdeskError::TicketNotFound {
                id: ticket_id.to_string(),
            })
        })
}

/// Handle `tickets show`
pub async fn handle_show(ctx: &HandlerContext, ticket_id: &str, output: &OutputFormatter) -> Result<()> {
    let session = ctx.require_login()?;
    let ticket = fetch_ticket(ctx, ticket_id).await?;
    print_ticket(&ticket, session.user_id, output)
}

fn print_ticket(ticket: &Ticket, user_id: Option<String>, output: &OutputFormatter) -> Result<()> {
    if output.is_json() {
        return output.print_json(ticket);
    }

    let mut authors = AuthorNames::new(user_id);
    let row = TicketRow::new(ticket, &mut authors);

    output.info(&format!("{} {}", row.number.bold(), row.title.bold()));
    output.info(&format!(
        "Status:   {}",
        badge(StatusBadge::from_status(&ticket.status), &row.status)
    ));
    output.info(&format!("Facility: {}", row.facility));
    output.info(&format!("Category: {}", row.category));
    if let Some(priority) = &ticket.priority {
        output.info(&format!("Priority: {priority}"));
    }
    output.info(&format!("Author:   {}", row.author));
    output.info(&format!("Created:  {}", row.created));
    if let Some(updated) = &ticket.updated_at {
        output.info(&format!("Updated:  {}", format_timestamp(updated)));
    }
    output.info(&format!("\n{}\n", row.description));

    if let Some(feedback) = ticket.ai_feedback.as_deref().filter(|f| !f.is_empty()) {
        output.info(&format!("{}\n{feedback}\n", "Suggested answer:".cyan()));
    }

    let replies = ticket.replies();
    if replies.is_empty() {
        output.info("No replies yet.");
        return Ok(());
    }
    output.info(&format!("{} ({})", "Replies".bold(), replies.len()));
    for reply in replies {
        let author = authors.resolve(reply.author.as_deref(), reply.author_name.as_deref());
        let when = reply.created_at.as_deref().map(format_timestamp).unwrap_or_default();
        let marker = if ticket.is_solution(reply) {
            format!(" {}", "[solution]".green())
        } else {
            String::new()
        };
        output.info(&format!("\n#{} {author} {when}{marker}", reply.reply_id));
        output.info(&reply.message);
    }
    Ok(())
}

pub struct CreateParams {
    pub title: Option<String>,
    pub description: Option<String>,
    pub facility: Option<String>,
    pub category: Option<String>,
}

/// Load the facility and category choices, falling back to the built-in
/// lists for any setting that cannot be read
pub async fn load_form_options(ctx: &HandlerContext) -> FormOptions {
    let auth = ctx.client.auth();
    let (facility, category) = tokio::join!(
        auth.get_setting(FACILITY_OPTIONS_KEY),
        auth.get_setting(CATEGORY_OPTIONS_KEY),
    );
    let ok = |result: Result<Setting>, key: &str| match result {
        Ok(setting) => Some(setting),
        Err(e) => {
            warn!("Using default {key}: {e}");
            None
        },
    };
    let facility = ok(facility, FACILITY_OPTIONS_KEY);
    let category = ok(category, CATEGORY_OPTIONS_KEY);
    FormOptions::from_settings(facility.as_ref(), category.as_ref())
}

/// Handle `tickets create`
pub async fn handle_create(
    ctx: &HandlerContext,
    params: CreateParams,
    output: &OutputFormatter,
) -> Result<()> {
    ctx.require_login()?;
    let options = load_form_options(ctx).await;

    let mut draft = TicketDraft::new()
        .title(params.title)
        .description(params.description)
        .facility(params.facility)
        .category(params.category);
    if !(draft.has_title() && draft.has_facility() && draft.has_category()) {
        draft = InteractiveMode::new().complete_ticket(draft, &options)?;
    }
    let request = draft.build(&options)?;

    if !ctx.confirm("Are you sure you want to create this ticket?")? {
        output.info("Ticket creation cancelled.");
        return Ok(());
    }

    let ticket = ctx.run(ctx.client.tickets().create(&request)).await?;
    if output.is_json() {
        return output.print_json(&ticket);
    }
    output.success(&format!(
        "Created ticket {} ({})",
        ticket.ticket_number.as_deref().unwrap_or(&ticket.ticket_id),
        ticket.title
    ));
    Ok(())
}

pub struct UpdateParams {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

/// Handle `tickets update`
pub async fn handle_update(
    ctx: &HandlerContext,
    ticket_id: &str,
    params: UpdateParams,
    output: &OutputFormatter,
) -> Result<()> {
    ctx.require_login()?;
    let request = UpdateTicketRequest {
        title: params.title.as_deref().map(validation::validate_title).transpose()?,
        description: params.description,
        status: params.status.map(|s| s.trim().to_lowercase()),
    };
    if request.is_empty() {
        return Err(HelpdeskError::InvalidInput(
            "Nothing to update: give a title, description or status".to_string(),
        ));
    }

    let ticket = ctx
        .run(ctx.client.tickets().update(ticket_id, &request))
        .await
        .map_err(|e| {
            not_found_as(e, || HelpdeskError::TicketNotFound {
                id: ticket_id.to_string(),
            })
        })?;

    if output.is_json() {
        return output.print_json(&ticket);
    }
    output.success(&format!("Updated ticket {}", ticket.ticket_id));
    Ok(())
}

/// Handle `tickets reply`: post the reply, then show the refreshed ticket
pub async fn handle_reply(
    ctx: &HandlerContext,
    ticket_id: &str,
    message: &str,
    output: &OutputFormatter,
) -> Result<()> {
    let session = ctx.require_login()?;
    let request = ReplyRequest {
        message: validation::validate_message(message)?,
    };

    ctx.run(ctx.client.tickets().reply(ticket_id, &request))
        .await
        .map_err(|e| {
            not_found_as(e, || HelpdeskError::TicketNotFound {
                id: ticket_id.to_string(),
            })
        })?;

    let ticket = fetch_ticket(ctx, ticket_id).await?;
    if !output.is_json() {
        output.success("Reply added.\n");
    }
    print_ticket(&ticket, session.user_id, output)
}

/// Handle `tickets solve`
pub async fn handle_solve(
    ctx: &HandlerContext,
    ticket_id: &str,
    solution: Option<String>,
    status: Option<String>,
    output: &OutputFormatter,
) -> Result<()> {
    ctx.require_login()?;
    let request = SolutionRequest {
        solution,
        status: Some(status.map_or_else(|| "closed".to_string(), |s| s.trim().to_lowercase())),
    };

    let ticket = ctx
        .run(ctx.client.tickets().update_solution(ticket_id, &request))
        .await
        .map_err(|e| {
            not_found_as(e, || HelpdeskError::TicketNotFound {
                id: ticket_id.to_string(),
            })
        })?;

    if output.is_json() {
        return output.print_json(&ticket);
    }
    output.success(&format!(
        "Ticket {} is now {}",
        ticket.ticket_id,
        StatusBadge::label(&ticket.status)
    ));
    Ok(())
}

/// Handle `tickets export`
pub async fn handle_export(
    ctx: &HandlerContext,
    format: ExportFormat,
    destination: Option<PathBuf>,
    closed: bool,
    output: &OutputFormatter,
) -> Result<()> {
    let session = ctx.require_login()?;
    let list = ctx.run(ctx.client.tickets().list(Some(tab(closed)))).await?;
    let tickets = TicketFilter::new().apply(list.tickets);
    let content = export_tickets(&tickets, format, session.user_id)?;

    match destination {
        Some(path) => {
            std::fs::write(&path, content)?;
            output.success(&format!(
                "Exported {} ticket(s) to {}",
                tickets.len(),
                path.display()
            ));
        },
        None => print!("{content}"),
    }
    Ok(())
}
