use crate::api::{ApiClient, CancelableRequest};
use crate::cli::Cli;
use crate::config::Config;
use crate::error::{HelpdeskError, Result};
use crate::storage::{FileSessionStore, Session, SessionRepository, SessionTokens};
use dialoguer::{theme::ColorfulTheme, Confirm};
use std::path::PathBuf;
use std::sync::Arc;

/// Common context for all handler operations
pub struct HandlerContext {
    pub config: Config,
    pub sessions: Arc<dyn SessionRepository>,
    pub client: ApiClient,
    session_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    assume_yes: bool,
}

impl HandlerContext {
    /// Build the context from the global command-line flags
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config = Config::load(cli.config.as_deref())?.with_base_url(cli.api_url.clone());
        let store = match &cli.session_file {
            Some(path) => FileSessionStore::new(path),
            None => FileSessionStore::at_default_location()?,
        };
        let session_path = Some(store.path().to_path_buf());
        let mut context = Self::new(config, Arc::new(store), cli.yes)?;
        context.session_path = session_path;
        context.config_path = cli.config.clone().or_else(Config::default_path);
        Ok(context)
    }

    /// Build a context around any session repository
    pub fn new(
        config: Config,
        sessions: Arc<dyn SessionRepository>,
        assume_yes: bool,
    ) -> Result<Self> {
        let tokens = Arc::new(SessionTokens(Arc::clone(&sessions)));
        let client = ApiClient::new(config.api_config(Some(tokens))?)?;
        Ok(Self {
            config,
            sessions,
            client,
            session_path: None,
            config_path: None,
            assume_yes,
        })
    }

    pub fn session_path(&self) -> Option<&std::path::Path> {
        self.session_path.as_deref()
    }

    /// Configuration file in effect, explicit or the platform default
    pub fn config_path(&self) -> Option<&std::path::Path> {
        self.config_path.as_deref()
    }

    /// Await a request, cancelling it if the user presses Ctrl-C
    pub async fn run<T: Send + 'static>(&self, request: CancelableRequest<T>) -> Result<T> {
        let handle = request.handle();
        let watcher = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::debug!("interrupt received, cancelling request");
                handle.cancel();
            }
        });
        let result = request.await;
        watcher.abort();
        result
    }

    pub fn session(&self) -> Result<Session> {
        self.sessions.load()
    }

    /// The stored session, failing if nobody is logged in
    pub fn require_login(&self) -> Result<Session> {
        let session = self.session()?;
        if session.has_token() {
            Ok(session)
        } else {
            Err(HelpdeskError::NotAuthenticated)
        }
    }

    /// The stored session, failing unless it belongs to an administrator
    pub fn require_admin(&self) -> Result<Session> {
        let session = self.require_login()?;
        if session.is_admin() {
            Ok(session)
        } else {
            Err(HelpdeskError::PermissionDenied(
                "this command is only available to administrators".to_string(),
            ))
        }
    }

    /// Ask for confirmation unless `--yes` was given
    pub fn confirm(&self, prompt: &str) -> Result<bool> {
        if self.assume_yes {
            return Ok(true);
        }
        Ok(Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(false)
            .interact()?)
    }
}

/// Replace a 404 from the API with a more specific error
pub fn not_found_as(error: HelpdeskError, replacement: impl FnOnce() -> HelpdeskError) -> HelpdeskError {
    if error.status() == Some(404) {
        replacement()
    } else {
        error
    }
}
