//! Command-line interface
//!
//! Argument definitions live in [`commands`], output formatting in
//! [`output`] and the per-command logic in [`handlers`].

pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{
    Cli, Commands, ConfigCommands, ExportFormat, FcmCommands, SettingCommands, TicketCommands,
    UserCommands,
};
pub use output::OutputFormatter;
