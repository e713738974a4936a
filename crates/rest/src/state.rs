//! Application state for the Leadboard HTTP API.
//!
//! Handlers share one row store and one configuration.

use std::sync::Arc;

use leadboard_persistence::core::RowStore;

use crate::config::ServerConfig;

/// Shared application state.
///
/// # Type Parameters
///
/// * `S` - The row store backend (must implement [`RowStore`])
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use leadboard_persistence::backends::memory::MemoryBackend;
/// use leadboard_rest::{AppState, ServerConfig};
///
/// let state = AppState::new(Arc::new(MemoryBackend::new()), ServerConfig::for_testing());
/// assert_eq!(state.default_page_size(), 25);
/// ```
pub struct AppState<S> {
    /// The row store.
    storage: Arc<S>,

    /// Server configuration.
    config: Arc<ServerConfig>,
}

// S sits behind an Arc, so it does not need to be Clone itself.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S: RowStore> AppState<S> {
    /// Creates a new AppState with the given storage and configuration.
    pub fn new(storage: Arc<S>, config: ServerConfig) -> Self {
        Self {
            storage,
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the row store.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns the page size used when `limit` is absent or unparseable.
    pub fn default_page_size(&self) -> u32 {
        self.config.default_page_size
    }

    /// Returns the page size ceiling.
    pub fn max_page_size(&self) -> u32 {
        self.config.max_page_size
    }

    /// Returns whether data routes require a session token.
    pub fn auth_enabled(&self) -> bool {
        self.config.enable_auth
    }

    /// Returns the token secret as bytes, empty when none is configured.
    pub fn jwt_secret(&self) -> &[u8] {
        self.config
            .jwt_secret
            .as_deref()
            .map(str::as_bytes)
            .unwrap_or_default()
    }
}
