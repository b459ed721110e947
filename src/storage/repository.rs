use super::session::Session;
use crate::api::TokenResolver;
use crate::error::Result;
use secrecy::SecretString;
use std::sync::{Arc, Mutex, PoisonError};

/// Repository trait for the locally cached session
///
/// This trait defines the interface for persisting the credentials and
/// identity of the logged-in user, allowing for different storage
/// implementations.
pub trait SessionRepository: Send + Sync {
    /// Loads the stored session, or an empty one if nothing is stored
    fn load(&self) -> Result<Session>;

    /// Replaces the stored session
    fn save(&self, session: &Session) -> Result<()>;

    /// Removes everything that is stored
    fn clear(&self) -> Result<()>;

    /// Forgets the access and refresh tokens but keeps the identity fields
    fn clear_tokens(&self) -> Result<()> {
        let mut session = self.load()?;
        session.token = None;
        session.refresh_token = None;
        self.save(&session)
    }

    /// Applies `update` to the stored session and saves the result
    fn update(&self, update: &mut dyn FnMut(&mut Session)) -> Result<Session> {
        let mut session = self.load()?;
        update(&mut session);
        self.save(&session)?;
        Ok(session)
    }
}

/// Exposes a session repository as the API client's token source
pub struct SessionTokens(pub Arc<dyn SessionRepository>);

impl TokenResolver for SessionTokens {
    fn resolve(&self) -> Option<SecretString> {
        match self.0.load() {
            Ok(session) => session.token.filter(|t| !t.is_empty()).map(SecretString::from),
            Err(e) => {
                tracing::warn!("Failed to read session: {e}");
                None
            },
        }
    }
}

/// Session repository kept in memory, for tests and embedding
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    session: Mutex<Session>,
}

impl InMemorySessionStore {
    pub fn new(session: Session) -> Self {
        Self {
            session: Mutex::new(session),
        }
    }
}

impl SessionRepository for InMemorySessionStore {
    fn load(&self) -> Result<Session> {
        Ok(self
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, session: &Session) -> Result<()> {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = session.clone();
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.save(&Session::default())
    }
}
