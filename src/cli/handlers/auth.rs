//! Session commands: login, logout, whoami, refresh, status and push
//! notification registration

use super::common::HandlerContext;
use crate::api::{
    AuthRequest, AuthRequestByCode, AuthResponse, FcmRequest, RefreshRequest, UserProfile,
};
use crate::cli::OutputFormatter;
use crate::error::{HelpdeskError, Result};
use crate::interactive::InteractiveMode;
use crate::storage::Session;
use tracing::{debug, info};

pub struct LoginParams {
    pub username: Option<String>,
    pub password: Option<String>,
    pub code: Option<String>,
}

/// Handle the login command
///
/// A still-valid stored token short-circuits the login. Otherwise the user
/// authenticates with a one-time code or a username and password, and the
/// profile from `/auth/me` is stored next to the new tokens.
pub async fn handle_login(
    ctx: &HandlerContext,
    params: LoginParams,
    output: &OutputFormatter,
) -> Result<()> {
    if let Some(profile) = current_profile(ctx).await? {
        return report_profile(&profile, "Already logged in", output);
    }

    let response = match params.code {
        Some(code) => {
            let request = AuthRequestByCode { code: code.trim().to_string() };
            ctx.run(ctx.client.auth().login_by_code(&request)).await
        },
        None => {
            let mode = InteractiveMode::new();
            let username = match params.username {
                Some(u) => u,
                None => mode.input("Username", true)?,
            };
            let password = match params.password {
                Some(p) => p,
                None => mode.password("Password", false)?,
            };
            let request = AuthRequest { username, password };
            ctx.run(ctx.client.auth().login(&request)).await
        },
    }
    .map_err(login_failure)?;

    store_tokens(ctx, &response)?;
    let profile = ctx.run(ctx.client.auth().me()).await?;
    store_profile(ctx, &profile)?;
    info!(user = %profile.username, "logged in");

    report_profile(&profile, "Logged in", output)
}

/// The profile behind the stored token, or `None` if there is no usable token
async fn current_profile(ctx: &HandlerContext) -> Result<Option<UserProfile>> {
    if !ctx.session()?.has_token() {
        return Ok(None);
    }
    match ctx.run(ctx.client.auth().me()).await {
        Ok(profile) => Ok(Some(profile)),
        Err(HelpdeskError::Cancelled) => Err(HelpdeskError::Cancelled),
        Err(e) => {
            debug!("stored token not usable: {e}");
            Ok(None)
        },
    }
}

fn login_failure(error: HelpdeskError) -> HelpdeskError {
    match error.status() {
        Some(400 | 401) => HelpdeskError::custom("Login failed: invalid credentials"),
        _ => error,
    }
}

fn store_tokens(ctx: &HandlerContext, response: &AuthResponse) -> Result<()> {
    let token = response
        .token
        .clone()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| HelpdeskError::custom("Login failed: the server returned no token"))?;
    let refresh_token = response.refresh_token.clone();

    ctx.sessions.update(&mut |session: &mut Session| {
        session.token = Some(token.clone());
        if refresh_token.is_some() {
            session.refresh_token.clone_from(&refresh_token);
        }
    })?;
    Ok(())
}

fn store_profile(ctx: &HandlerContext, profile: &UserProfile) -> Result<()> {
    ctx.sessions.update(&mut |session: &mut Session| {
        session.user_id = Some(profile.user_id.clone());
        session.username = Some(profile.username.clone());
        session.name.clone_from(&profile.name);
        session.role.clone_from(&profile.role);
    })?;
    Ok(())
}

fn report_profile(profile: &UserProfile, headline: &str, output: &OutputFormatter) -> Result<()> {
    if output.is_json() {
        return output.print_json(&serde_json::json!({
            "status": headline,
            "user": profile,
        }));
    }

    let name = profile.name.as_deref().unwrap_or(&profile.username);
    output.success(&format!("{headline} as {name} ({})", profile.username));
    if let Some(role) = &profile.role {
        output.info(&format!("Role: {role}"));
    }
    Ok(())
}

/// Handle the logout command
pub fn handle_logout(ctx: &HandlerContext, output: &OutputFormatter) -> Result<()> {
    if !ctx.session()?.has_token() {
        output.info("You are not logged in.");
        return Ok(());
    }
    if !ctx.confirm("Are you sure you want to logout?")? {
        output.info("Logout cancelled.");
        return Ok(());
    }

    ctx.sessions.clear_tokens()?;
    if output.is_json() {
        output.print_json(&serde_json::json!({ "status": "logged_out" }))
    } else {
        output.success("Logged out.");
        Ok(())
    }
}

/// Handle the whoami command
pub async fn handle_whoami(ctx: &HandlerContext, output: &OutputFormatter) -> Result<()> {
    ctx.require_login()?;
    let profile = ctx.run(ctx.client.auth().me()).await?;
    store_profile(ctx, &profile)?;

    if output.is_json() {
        return output.print_json(&profile);
    }
    output.info(&format!("User ID:  {}", profile.user_id));
    output.info(&format!("Username: {}", profile.username));
    output.info(&format!("Name:     {}", profile.name.as_deref().unwrap_or("-")));
    output.info(&format!("Role:     {}", profile.role.as_deref().unwrap_or("-")));
    Ok(())
}

/// Handle the refresh command
pub async fn handle_refresh(ctx: &HandlerContext, output: &OutputFormatter) -> Result<()> {
    let refresh_token = ctx
        .session()?
        .refresh_token
        .filter(|t| !t.is_empty())
        .ok_or(HelpdeskError::NotAuthenticated)?;

    let response = ctx
        .run(ctx.client.auth().refresh(&RefreshRequest { refresh_token }))
        .await?;
    store_tokens(ctx, &response)?;

    if output.is_json() {
        output.print_json(&serde_json::json!({ "status": "refreshed" }))
    } else {
        output.success("Session refreshed.");
        Ok(())
    }
}

/// Handle the status command: the home page greeting
pub async fn handle_status(ctx: &HandlerContext, output: &OutputFormatter) -> Result<()> {
    let session = ctx.session()?;
    let profile = current_profile(ctx).await?;

    if output.is_json() {
        return output.print_json(&serde_json::json!({
            "logged_in": profile.is_some(),
            "api_url": ctx.config.api.base_url,
            "user": profile,
        }));
    }

    match profile {
        Some(profile) => {
            store_profile(ctx, &profile)?;
            let name = profile.name.as_deref().unwrap_or(&profile.username);
            output.success(&format!("Welcome, {name}!"));
            output.info(&format!("Signed in to {}", ctx.config.api.base_url));
        },
        None if session.has_token() => {
            output.warning("Your session is no longer valid. Please log in again.");
        },
        None => output.info("Welcome! Run 'helpdesk login' to sign in."),
    }
    Ok(())
}

/// Handle `fcm register`
pub async fn handle_fcm_register(
    ctx: &HandlerContext,
    token: String,
    output: &OutputFormatter,
) -> Result<()> {
    ctx.require_login()?;
    let response = ctx
        .run(ctx.client.auth().register_fcm(&FcmRequest { fcm_token: token }))
        .await?;

    if output.is_json() {
        output.print_json(&response)
    } else {
        output.success("Device registered for notifications.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;

    #[test]
    fn test_login_failure_message() {
        let unauthorized = HelpdeskError::Api(ApiError::new("u", 401, "", serde_json::Value::Null));
        assert_eq!(
            login_failure(unauthorized).to_string(),
            "Login failed: invalid credentials"
        );

        let unavailable = HelpdeskError::Api(ApiError::new("u", 503, "", serde_json::Value::Null));
        assert_eq!(login_failure(unavailable).status(), Some(503));
    }
}
