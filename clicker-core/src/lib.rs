//! Clicker Core
//!
//! Platform-agnostic session logic for the Clicker app: the user profile, the
//! confirmed balance and the queue of clicks waiting to be sent to the balance
//! service. This crate has no browser dependencies; the web front-end supplies
//! the network and storage collaborators through the traits below.

pub mod config;
pub mod error;
pub mod memory;
pub mod numbers;
pub mod profile;
pub mod state;
pub mod store;
pub mod wire;

pub use config::ClientConfig;
pub use error::{StoreError, TransportError, ValidationError};
pub use memory::MemoryStorage;
pub use numbers::group_thousands;
pub use profile::UserProfile;
pub use state::{ClickBatch, PersistedSession, SessionState};
pub use store::{SessionStore, StoreOptions, Subscription};
pub use wire::{AddClicksRequest, AddClicksResponse, BalanceRequest, BalanceResponse};

/// Remote balance service.
/// Platform-specific implementations perform the actual HTTP calls.
#[async_trait::async_trait(?Send)]
pub trait BalanceApi {
    /// Read the confirmed balance of a user.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] on network failure, a non-success status
    /// or an unreadable body.
    async fn get_balance(&self, request: &BalanceRequest)
    -> Result<BalanceResponse, TransportError>;

    /// Add a batch of clicks and return the resulting balance.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] on network failure, a non-success status
    /// or an unreadable body.
    async fn add_clicks(
        &self,
        request: &AddClicksRequest,
    ) -> Result<AddClicksResponse, TransportError>;
}

/// Trait for abstracting persistence of the session between page loads
/// Platform-specific implementations should provide this
pub trait SessionStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load a saved session
    ///
    /// # Errors
    ///
    /// Returns an error if the stored session cannot be read or parsed.
    fn load_session(&self, key: &str) -> Result<Option<PersistedSession>, Self::Error>;

    /// Save the session
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    fn save_session(&self, key: &str, session: &PersistedSession) -> Result<(), Self::Error>;

    /// Delete the saved session
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be removed.
    fn clear_session(&self, key: &str) -> Result<(), Self::Error>;
}
