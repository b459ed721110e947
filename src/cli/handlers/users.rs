use super::common::HandlerContext;
use crate::api::GenerateCodeRequest;
use crate::cli::OutputFormatter;
use crate::core::{CodeCountdown, UserDraft};
use crate::error::Result;
use crate::interactive::InteractiveMode;
use chrono::Utc;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Handle `users list`
pub async fn handle_list(ctx: &HandlerContext, output: &OutputFormatter) -> Result<()> {
    ctx.require_admin()?;
    let list = ctx.run(ctx.client.auth().list_users()).await?;

    if output.is_json() {
        return output.print_json(&list.users);
    }
    if list.users.is_empty() {
        output.info("No users found.");
        return Ok(());
    }

    let username_w = list
        .users
        .iter()
        .map(|u| u.username.chars().count())
        .max()
        .unwrap_or(0)
        .max("USERNAME".len());
    output.info(&format!(
        "{:<8}  {:<username_w$}  {:<6}  {}",
        "ID", "USERNAME", "ROLE", "NAME"
    ));
    for user in &list.users {
        output.info(&format!(
            "{:<8}  {:<username_w$}  {:<6}  {}",
            user.user_id,
            user.username,
            user.role.as_deref().unwrap_or("-"),
            user.name.as_deref().unwrap_or("-"),
        ));
    }
    Ok(())
}

pub struct UserParams {
    pub username: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub password: Option<String>,
}

/// Handle `users create`
pub async fn handle_create(
    ctx: &HandlerContext,
    params: UserParams,
    output: &OutputFormatter,
) -> Result<()> {
    ctx.require_admin()?;
    let mode = InteractiveMode::new();

    let username = match params.username {
        Some(u) => u,
        None => mode.input("Username", true)?,
    };
    let name = match params.name {
        Some(n) => n,
        None => mode.input("Name", true)?,
    };
    let role = match params.role {
        Some(r) => r,
        None => mode.select_role()?,
    };
    let password = match params.password {
        Some(p) => p,
        None => mode.password("Password", true)?,
    };

    let request = UserDraft::new()
        .username(Some(username))
        .name(Some(name))
        .role(Some(role))
        .password(Some(password))
        .build_create()?;

    if !ctx.confirm(&format!("Create user '{}'?", request.username))? {
        output.info("User creation cancelled.");
        return Ok(());
    }

    let response = ctx.run(ctx.client.auth().create_user(&request)).await?;
    if output.is_json() {
        return output.print_json(&response);
    }
    output.success(&format!("Created user {} ({})", request.username, request.role));
    Ok(())
}

/// Handle `users update`; the username cannot be changed
pub async fn handle_update(
    ctx: &HandlerContext,
    username: String,
    params: UserParams,
    output: &OutputFormatter,
) -> Result<()> {
    ctx.require_admin()?;
    let request = UserDraft::new()
        .username(Some(username))
        .name(params.name)
        .role(params.role)
        .password(params.password)
        .build_update()?;

    if !ctx.confirm(&format!("Update user '{}'?", request.username))? {
        output.info("User update cancelled.");
        return Ok(());
    }

    let response = ctx.run(ctx.client.auth().update_user(&request)).await?;
    if output.is_json() {
        return output.print_json(&response);
    }
    output.success(&format!("Updated user {}", request.username));
    Ok(())
}

/// Handle `users generate-code`
pub async fn handle_generate_code(
    ctx: &HandlerContext,
    user_id: Option<String>,
    wait: bool,
    output: &OutputFormatter,
) -> Result<()> {
    ctx.require_admin()?;
    let response = ctx
        .run(ctx.client.auth().generate_code(&GenerateCodeRequest { user_id }))
        .await?;
    let countdown = CodeCountdown::start(response.expires_at, Utc::now());

    if output.is_json() {
        return output.print_json(&serde_json::json!({
            "code": response.code,
            "expires_at": response.expires_at,
            "expires_in": countdown.initial(),
        }));
    }

    output.success(&format!("Login code: {}", response.code.bold()));
    output.info(&format!("Valid for {} seconds", countdown.initial()));
    if wait {
        wait_for_expiry(&countdown).await;
        output.warning("The login code has expired.");
    }
    Ok(())
}

async fn wait_for_expiry(countdown: &CodeCountdown) {
    let bar = ProgressBar::new(countdown.initial());
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.cyan/blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    loop {
        let remaining = countdown.remaining_at(Utc::now());
        bar.set_position(remaining);
        bar.set_message(format!(
            "{remaining}s left ({:.0}%)",
            countdown.progress(remaining) * 100.0
        ));
        if remaining == 0 {
            break;
        }
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = ticker.tick() => {},
        }
    }
    bar.finish_and_clear();
}
