//! Session tokens and the refresh-and-retry-once policy

use std::sync::RwLock;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::paging::{Filters, PageRequest};

use super::PageSource;

/// Renews the session after a 401
#[async_trait]
pub trait SessionRefresher: Send + Sync {
    /// Obtain fresh credentials
    ///
    /// # Errors
    ///
    /// Any error means the session cannot be recovered silently.
    async fn refresh(&self) -> Result<(), ApiError>;
}

/// Access token shared between the HTTP source and the refresher
///
/// The token is zeroed on drop and never appears in Debug output.
#[derive(Default)]
pub struct TokenStore {
    access_token: RwLock<Option<SecretString>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: String) -> Self {
        let store = Self::new();
        store.set(token);
        store
    }

    pub fn set(&self, token: String) {
        if let Ok(mut slot) = self.access_token.write() {
            *slot = Some(SecretString::from(token));
        }
    }

    pub fn clear(&self) {
        if let Ok(mut slot) = self.access_token.write() {
            *slot = None;
        }
    }

    /// Current token as a plain string, for the Authorization header
    pub fn bearer(&self) -> Option<String> {
        self.access_token
            .read()
            .ok()
            .and_then(|slot| slot.as_ref().map(|t| t.expose_secret().to_string()))
    }

    pub fn is_set(&self) -> bool {
        self.access_token
            .read()
            .map(|slot| slot.is_some())
            .unwrap_or(false)
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore")
            .field("access_token", &if self.is_set() { "[REDACTED]" } else { "None" })
            .finish()
    }
}

/// Fetch a page, recovering from one 401
///
/// On `Unauthorized` the session is refreshed once and the same request is
/// retried once. A failed refresh, a missing refresher or a second 401 all
/// surface as `SessionExpired`. Other errors pass through untouched.
pub async fn fetch_with_refresh<T, F>(
    source: &dyn PageSource<T, F>,
    session: Option<&dyn SessionRefresher>,
    request: &PageRequest<F>,
) -> Result<Vec<T>, ApiError>
where
    T: Send,
    F: Filters,
{
    match source.fetch_page(request).await {
        Err(ApiError::Unauthorized) => {
            let Some(session) = session else {
                warn!("Request for page {} unauthorized and no session refresher is configured", request.page);
                return Err(ApiError::SessionExpired);
            };

            info!("Request for page {} unauthorized, refreshing session", request.page);
            if let Err(e) = session.refresh().await {
                warn!("Session refresh failed: {}", e);
                return Err(ApiError::SessionExpired);
            }

            match source.fetch_page(request).await {
                Err(ApiError::Unauthorized) => {
                    warn!("Retried request for page {} still unauthorized", request.page);
                    Err(ApiError::SessionExpired)
                }
                other => other,
            }
        }
        other => other,
    }
}
