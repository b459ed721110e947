use super::common::HandlerContext;
use crate::cli::OutputFormatter;
use crate::error::Result;

/// Handle `config show`
pub fn handle_show(ctx: &HandlerContext, output: &OutputFormatter) -> Result<()> {
    if output.is_json() {
        return output.print_json(&ctx.config);
    }
    output.info(serde_yaml::to_string(&ctx.config)?.trim_end());
    Ok(())
}

/// Handle `config path`
pub fn handle_path(ctx: &HandlerContext, output: &OutputFormatter) -> Result<()> {
    let config = ctx.config_path();
    let session = ctx.session_path();

    if output.is_json() {
        return output.print_json(&serde_json::json!({
            "config": config,
            "session": session,
        }));
    }
    match config {
        Some(path) => output.info(&format!("Configuration: {}", path.display())),
        None => output.info("Configuration: (no platform configuration directory)"),
    }
    if let Some(path) = session {
        output.info(&format!("Session:       {}", path.display()));
    }
    Ok(())
}
