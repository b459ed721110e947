use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Command-line client for the help desk service
#[derive(Parser, Debug)]
#[command(name = "helpdesk", version, about, long_about = None)]
pub struct Cli {
    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable coloured output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log requests and internal steps to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Base URL of the help desk API
    #[arg(long, global = true, env = "HELPDESK_API_URL")]
    pub api_url: Option<String>,

    /// Configuration file to read instead of the default one
    #[arg(long, global = true, env = "HELPDESK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Where the login session is stored
    #[arg(long, global = true, env = "HELPDESK_SESSION_FILE")]
    pub session_file: Option<PathBuf>,

    /// Answer yes to every confirmation
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in with a username and password or a one-time code
    Login {
        #[arg(short, long, conflicts_with = "code")]
        username: Option<String>,

        #[arg(short, long, env = "HELPDESK_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// One-time login code generated by an administrator
        #[arg(long)]
        code: Option<String>,
    },

    /// Forget the stored tokens
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Exchange the stored refresh token for a new access token
    Refresh,

    /// Check whether the stored session is still valid
    Status,

    /// Push notification registration
    Fcm {
        #[command(subcommand)]
        command: FcmCommands,
    },

    /// Work with tickets
    #[command(visible_alias = "t")]
    Tickets {
        #[command(subcommand)]
        command: TicketCommands,
    },

    /// Manage user accounts (admin)
    Users {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Manage server settings (admin)
    Settings {
        #[command(subcommand)]
        command: SettingCommands,
    },

    /// Inspect the local configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum FcmCommands {
    /// Register a device token for push notifications
    Register { token: String },
}

#[derive(Subcommand, Debug)]
pub enum TicketCommands {
    /// List tickets of the open or closed tab
    #[command(visible_alias = "ls")]
    List {
        /// Show the closed tab instead of the open one
        #[arg(long)]
        closed: bool,

        /// Filter by title, description or ticket number
        #[arg(short, long)]
        search: Option<String>,

        /// Treat the search text as a regular expression
        #[arg(long, requires = "search")]
        regex: bool,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        facility: Option<String>,

        /// newest or oldest
        #[arg(long, default_value = "newest")]
        sort: String,

        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show a ticket with its replies
    Show { ticket_id: String },

    /// Open a new ticket; missing fields are prompted for
    Create {
        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(long)]
        facility: Option<String>,

        #[arg(long)]
        category: Option<String>,
    },

    /// Change the title, description or status of a ticket
    Update {
        ticket_id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        status: Option<String>,
    },

    /// Add a reply to a ticket
    Reply { ticket_id: String, message: String },

    /// Mark a reply as the solution or change the resolution status
    Solve {
        ticket_id: String,

        /// Reply id to mark as the solution
        #[arg(long)]
        solution: Option<String>,

        #[arg(long)]
        status: Option<String>,
    },

    /// Export a ticket tab to a file or stdout
    Export {
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,

        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long)]
        closed: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Yaml,
    Csv,
}

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// List all accounts
    #[command(visible_alias = "ls")]
    List,

    /// Create an account
    Create {
        #[arg(short, long)]
        username: Option<String>,

        #[arg(short, long)]
        name: Option<String>,

        /// admin or user
        #[arg(short, long)]
        role: Option<String>,

        #[arg(short, long, env = "HELPDESK_NEW_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Change the name, role or password of an account
    Update {
        username: String,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        role: Option<String>,

        #[arg(short, long)]
        password: Option<String>,
    },

    /// Generate a one-time login code
    GenerateCode {
        #[arg(long)]
        user_id: Option<String>,

        /// Keep running and show a countdown until the code expires
        #[arg(long)]
        wait: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum SettingCommands {
    /// List all settings
    #[command(visible_alias = "ls")]
    List,

    /// Show one setting
    Get { key: String },

    /// Replace the data of a setting with a JSON document
    Set { key: String, data: String },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Print the configuration and session file locations
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ticket_list() {
        let cli = Cli::try_parse_from([
            "helpdesk", "--json", "tickets", "list", "--closed", "-s", "heater", "--limit", "5",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Tickets {
                command: TicketCommands::List { closed, search, limit, .. },
            } => {
                assert!(closed);
                assert_eq!(search.as_deref(), Some("heater"));
                assert_eq!(limit, Some(5));
            },
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_login_code_conflicts_with_username() {
        assert!(Cli::try_parse_from(["helpdesk", "login", "--code", "123", "-u", "bob"]).is_err());
        assert!(Cli::try_parse_from(["helpdesk", "login", "--code", "123"]).is_ok());
    }

    #[test]
    fn test_regex_requires_search() {
        assert!(Cli::try_parse_from(["helpdesk", "tickets", "list", "--regex"]).is_err());
    }
}
