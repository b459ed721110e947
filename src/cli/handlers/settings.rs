use super::common::{not_found_as, HandlerContext};
use crate::api::{Setting, UpdateSettingRequest};
use crate::cli::OutputFormatter;
use crate::core::{time::format_timestamp, validation};
use crate::error::{HelpdeskError, Result};
use colored::Colorize;

/// Handle `settings list`
pub async fn handle_list(ctx: &HandlerContext, output: &OutputFormatter) -> Result<()> {
    ctx.require_admin()?;
    let list = ctx.run(ctx.client.auth().list_settings()).await?;

    if output.is_json() {
        return output.print_json(&list.settings);
    }
    if list.settings.is_empty() {
        output.info("No settings found.");
        return Ok(());
    }
    for setting in &list.settings {
        print_setting(setting, output)?;
    }
    Ok(())
}

/// Handle `settings get`
pub async fn handle_get(ctx: &HandlerContext, key: &str, output: &OutputFormatter) -> Result<()> {
    ctx.require_admin()?;
    let setting = ctx
        .run(ctx.client.auth().get_setting(key))
        .await
        .map_err(|e| {
            not_found_as(e, || HelpdeskError::SettingNotFound {
                key: key.to_string(),
            })
        })?;

    if output.is_json() {
        return output.print_json(&setting);
    }
    print_setting(&setting, output)
}

/// Handle `settings set`; the data must be a JSON document
pub async fn handle_set(
    ctx: &HandlerContext,
    key: &str,
    data: &str,
    output: &OutputFormatter,
) -> Result<()> {
    ctx.require_admin()?;
    let request = UpdateSettingRequest {
        key_id: key.to_string(),
        data: validation::parse_setting_data(data)?,
    };

    let response = ctx.run(ctx.client.auth().update_setting(&request)).await?;
    if output.is_json() {
        return output.print_json(&response);
    }
    output.success("Setting updated successfully!");
    Ok(())
}

fn print_setting(setting: &Setting, output: &OutputFormatter) -> Result<()> {
    output.info(&format!("{}", setting.key_id.bold()));
    let updated_by = setting
        .updated_by_name
        .as_deref()
        .or(setting.updated_by.as_deref());
    match (setting.updated_at.as_deref(), updated_by) {
        (Some(at), Some(by)) => output.info(&format!("  updated {} by {by}", format_timestamp(at))),
        (Some(at), None) => output.info(&format!("  updated {}", format_timestamp(at))),
        (None, Some(by)) => output.info(&format!("  updated by {by}")),
        (None, None) => {},
    }
    for line in serde_json::to_string_pretty(&setting.data)?.lines() {
        output.info(&format!("  {line}"));
    }
    output.info("");
    Ok(())
}
