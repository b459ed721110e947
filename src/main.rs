//! helpdesk - command-line client for the help desk service
//!
//! Parses the command line, builds the handler context and dispatches to
//! the command handlers.

use clap::Parser;
use helpdesk_client::cli::handlers::{
    HandlerContext, auth, config as config_handlers, settings, tickets, users,
};
use helpdesk_client::cli::{
    Cli, Commands, ConfigCommands, FcmCommands, OutputFormatter, SettingCommands, TicketCommands,
    UserCommands,
};
use helpdesk_client::error::{HelpdeskError, Result};
use std::process;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let formatter = OutputFormatter::new(cli.json, cli.no_color);

    if let Err(e) = run(cli, &formatter).await {
        handle_error(&e, &formatter);
        process::exit(1);
    }
}

async fn run(cli: Cli, formatter: &OutputFormatter) -> Result<()> {
    init_logging(cli.verbose);

    let ctx = HandlerContext::from_cli(&cli)?;
    dispatch_command(cli.command, &ctx, formatter).await
}

/// Log to stderr when `--verbose` is given or `RUST_LOG` is set
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("helpdesk_client=debug,helpdesk=debug")
    } else {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => return,
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn dispatch_command(
    command: Commands,
    ctx: &HandlerContext,
    formatter: &OutputFormatter,
) -> Result<()> {
    match command {
        Commands::Login {
            username,
            password,
            code,
        } => {
            auth::handle_login(
                ctx,
                auth::LoginParams {
                    username,
                    password,
                    code,
                },
                formatter,
            )
            .await
        },
        Commands::Logout => auth::handle_logout(ctx, formatter),
        Commands::Whoami => auth::handle_whoami(ctx, formatter).await,
        Commands::Refresh => auth::handle_refresh(ctx, formatter).await,
        Commands::Status => auth::handle_status(ctx, formatter).await,
        Commands::Fcm {
            command: FcmCommands::Register { token },
        } => auth::handle_fcm_register(ctx, token, formatter).await,
        Commands::Tickets { command } => dispatch_ticket_command(command, ctx, formatter).await,
        Commands::Users { command } => dispatch_user_command(command, ctx, formatter).await,
        Commands::Settings { command } => match command {
            SettingCommands::List => settings::handle_list(ctx, formatter).await,
            SettingCommands::Get { key } => settings::handle_get(ctx, &key, formatter).await,
            SettingCommands::Set { key, data } => {
                settings::handle_set(ctx, &key, &data, formatter).await
            },
        },
        Commands::Config { command } => match command {
            ConfigCommands::Show => config_handlers::handle_show(ctx, formatter),
            ConfigCommands::Path => config_handlers::handle_path(ctx, formatter),
        },
    }
}

async fn dispatch_ticket_command(
    command: TicketCommands,
    ctx: &HandlerContext,
    formatter: &OutputFormatter,
) -> Result<()> {
    match command {
        TicketCommands::List {
            closed,
            search,
            regex,
            category,
            facility,
            sort,
            limit,
        } => {
            tickets::handle_list(
                ctx,
                tickets::ListParams {
                    closed,
                    search,
                    regex,
                    category,
                    facility,
                    sort,
                    limit,
                },
                formatter,
            )
            .await
        },
        TicketCommands::Show { ticket_id } => tickets::handle_show(ctx, &ticket_id, formatter).await,
        TicketCommands::Create {
            title,
            description,
            facility,
            category,
        } => {
            tickets::handle_create(
                ctx,
                tickets::CreateParams {
                    title,
                    description,
                    facility,
                    category,
                },
                formatter,
            )
            .await
        },
        TicketCommands::Update {
            ticket_id,
            title,
            description,
            status,
        } => {
            tickets::handle_update(
                ctx,
                &ticket_id,
                tickets::UpdateParams {
                    title,
                    description,
                    status,
                },
                formatter,
            )
            .await
        },
        TicketCommands::Reply { ticket_id, message } => {
            tickets::handle_reply(ctx, &ticket_id, &message, formatter).await
        },
        TicketCommands::Solve {
            ticket_id,
            solution,
            status,
        } => tickets::handle_solve(ctx, &ticket_id, solution, status, formatter).await,
        TicketCommands::Export {
            format,
            output,
            closed,
        } => tickets::handle_export(ctx, format, output, closed, formatter).await,
    }
}

async fn dispatch_user_command(
    command: UserCommands,
    ctx: &HandlerContext,
    formatter: &OutputFormatter,
) -> Result<()> {
    match command {
        UserCommands::List => users::handle_list(ctx, formatter).await,
        UserCommands::Create {
            username,
            name,
            role,
            password,
        } => {
            users::handle_create(
                ctx,
                users::UserParams {
                    username,
                    name,
                    role,
                    password,
                },
                formatter,
            )
            .await
        },
        UserCommands::Update {
            username,
            name,
            role,
            password,
        } => {
            users::handle_update(
                ctx,
                username,
                users::UserParams {
                    username: None,
                    name,
                    role,
                    password,
                },
                formatter,
            )
            .await
        },
        UserCommands::GenerateCode { user_id, wait } => {
            users::handle_generate_code(ctx, user_id, wait, formatter).await
        },
    }
}

fn handle_error(error: &HelpdeskError, formatter: &OutputFormatter) {
    formatter.error(&error.user_message());

    let suggestions = error.suggestions();
    if !suggestions.is_empty() {
        formatter.info("\nSuggestions:");
        for suggestion in &suggestions {
            formatter.info(&format!("  • {suggestion}"));
        }
    }

    if formatter.is_json() {
        let _ = formatter.print_json(&serde_json::json!({
            "status": "error",
            "error": error.to_string(),
            "http_status": error.status(),
            "suggestions": suggestions,
            "recoverable": error.is_recoverable(),
            "is_auth_error": error.is_auth_error(),
            "is_config_error": error.is_config_error(),
        }));
    }

    if tracing::enabled!(tracing::Level::DEBUG) {
        eprintln!("\nDebug information:");
        eprintln!("{error:?}");
    }
}
