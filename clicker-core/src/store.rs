//! Session store: shared state handle plus the two synchronization operations.
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::config::ClientConfig;
use crate::error::StoreError;
use crate::profile::UserProfile;
use crate::state::{ClickBatch, PersistedSession, SessionState};
use crate::wire::BalanceRequest;
use crate::{BalanceApi, SessionStorage};

type Listener = Rc<dyn Fn()>;

#[derive(Default)]
struct Listeners {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(u64, Listener)>>,
}

impl Listeners {
    fn add(&self, listener: Listener) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.entries.borrow_mut().push((id, listener));
        id
    }

    fn notify(&self) {
        // Listeners may subscribe or read the store while being notified.
        let current: Vec<Listener> = self
            .entries
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in current {
            listener();
        }
    }
}

/// Keeps a change listener registered until dropped.
#[must_use = "the listener is removed when the subscription is dropped"]
pub struct Subscription {
    listeners: Weak<Listeners>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners
                .entries
                .borrow_mut()
                .retain(|(id, _)| *id != self.id);
        }
    }
}

/// Construction-time policy of a [`SessionStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// Allows [`SessionStore::set_balance`].
    pub dev_mode: bool,
    pub storage_key: String,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}

impl StoreOptions {
    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            dev_mode: config.dev_mode,
            storage_key: config.storage_key.clone(),
        }
    }
}

struct Shared<A, S> {
    state: RefCell<SessionState>,
    api: A,
    storage: S,
    options: StoreOptions,
    listeners: Rc<Listeners>,
    last_saved: RefCell<Option<PersistedSession>>,
    flushes_in_flight: Cell<u32>,
    flushes_confirmed: Cell<u64>,
}

/// Handle to the clicker session.
///
/// Clones share the same state. The handle is meant for a single-threaded
/// event loop: no borrow of the state is held across an `.await`, so clicks
/// recorded while a request is pending land in the queue immediately.
pub struct SessionStore<A, S> {
    shared: Rc<Shared<A, S>>,
}

impl<A, S> Clone for SessionStore<A, S> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<A, S> PartialEq for SessionStore<A, S> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }
}

impl<A, S> SessionStore<A, S>
where
    A: BalanceApi,
    S: SessionStorage,
{
    pub fn new(api: A, storage: S, options: StoreOptions) -> Self {
        Self {
            shared: Rc::new(Shared {
                state: RefCell::new(SessionState::new()),
                api,
                storage,
                options,
                listeners: Rc::new(Listeners::default()),
                last_saved: RefCell::new(None),
                flushes_in_flight: Cell::new(0),
                flushes_confirmed: Cell::new(0),
            }),
        }
    }

    #[must_use]
    pub fn options(&self) -> &StoreOptions {
        &self.shared.options
    }

    #[must_use]
    pub fn api(&self) -> &A {
        &self.shared.api
    }

    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.shared.state.borrow().clone()
    }

    pub fn with_state<R>(&self, read: impl FnOnce(&SessionState) -> R) -> R {
        read(&self.shared.state.borrow())
    }

    #[must_use]
    pub fn user(&self) -> Option<UserProfile> {
        self.with_state(|state| state.user().cloned())
    }

    #[must_use]
    pub fn user_id(&self) -> Option<String> {
        self.with_state(SessionState::user_id)
    }

    #[must_use]
    pub fn balance(&self) -> u64 {
        self.with_state(SessionState::balance)
    }

    #[must_use]
    pub fn display_balance(&self) -> u64 {
        self.with_state(SessionState::display_balance)
    }

    #[must_use]
    pub fn pending_clicks(&self) -> u64 {
        self.with_state(SessionState::pending_clicks)
    }

    #[must_use]
    pub fn click_count(&self) -> u64 {
        self.with_state(SessionState::click_count)
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.with_state(SessionState::is_loading)
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.with_state(|state| state.error().map(str::to_string))
    }

    #[must_use]
    pub fn formatted_balance(&self) -> String {
        self.with_state(SessionState::formatted_balance)
    }

    #[must_use]
    pub fn formatted_click_count(&self) -> String {
        self.with_state(SessionState::formatted_click_count)
    }

    /// Whether a click batch is currently waiting for the server.
    #[must_use]
    pub fn is_flushing(&self) -> bool {
        self.shared.flushes_in_flight.get() > 0
    }

    /// Register a listener called after every state change.
    pub fn subscribe(&self, listener: impl Fn() + 'static) -> Subscription {
        let id = self.shared.listeners.add(Rc::new(listener));
        Subscription {
            listeners: Rc::downgrade(&self.shared.listeners),
            id,
        }
    }

    fn update<R>(&self, apply: impl FnOnce(&mut SessionState) -> R) -> R {
        let (result, persisted) = {
            let mut state = self.shared.state.borrow_mut();
            let result = apply(&mut state);
            (result, state.persisted())
        };
        self.persist(persisted);
        self.shared.listeners.notify();
        result
    }

    fn persist(&self, persisted: PersistedSession) {
        if self.shared.last_saved.borrow().as_ref() == Some(&persisted) {
            return;
        }
        match self
            .shared
            .storage
            .save_session(&self.shared.options.storage_key, &persisted)
        {
            Ok(()) => *self.shared.last_saved.borrow_mut() = Some(persisted),
            Err(err) => log::warn!("Failed to persist session: {err}"),
        }
    }

    /// Restore the saved session, if any.
    ///
    /// Returns whether a saved session was found.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] when the saved entry cannot be read; the
    /// in-memory state is left untouched.
    pub fn hydrate(&self) -> Result<bool, StoreError> {
        let saved = self
            .shared
            .storage
            .load_session(&self.shared.options.storage_key)
            .map_err(|err| StoreError::Storage(err.to_string()))?;
        let Some(saved) = saved else {
            return Ok(false);
        };
        *self.shared.last_saved.borrow_mut() = Some(saved.clone());
        self.update(|state| state.restore(saved));
        log::debug!("Session restored from storage");
        Ok(true)
    }

    /// Store a frozen copy of `profile` as the current user.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] when `profile` is not an object; the
    /// rejection is logged and the previous user is kept.
    pub fn set_user(&self, profile: &Value) -> Result<(), StoreError> {
        let outcome = {
            let mut state = self.shared.state.borrow_mut();
            state.set_user(profile)
        };
        match outcome {
            Ok(()) => {
                self.update(|_| ());
                Ok(())
            }
            Err(err) => {
                log::warn!("Ignoring user profile: {err}");
                Err(err.into())
            }
        }
    }

    pub fn record_click(&self) {
        self.update(SessionState::record_click);
    }

    pub fn reset_click_count(&self) {
        self.update(SessionState::reset_click_count);
    }

    /// Overwrite the confirmed balance directly.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ReadOnly`] unless the store was built in development mode.
    pub fn set_balance(&self, balance: u64) -> Result<(), StoreError> {
        if !self.shared.options.dev_mode {
            log::warn!("Rejected direct balance write outside development mode");
            return Err(StoreError::ReadOnly);
        }
        self.update(|state| state.set_balance(balance));
        Ok(())
    }

    /// Read the confirmed balance from the server.
    ///
    /// A missing or blank id sets the error flag without any request. Any
    /// transport failure is stored in the error flag as well. Loading is
    /// cleared on every exit path. A balance read before a flush that was
    /// confirmed while the read was pending is stale and is discarded.
    ///
    /// # Errors
    ///
    /// Returns the validation or transport error that was recorded.
    #[allow(clippy::future_not_send)] // The store is a single-threaded `Rc` handle.
    pub async fn fetch_balance(&self, user_id: Option<&str>) -> Result<u64, StoreError> {
        let user_id = self.update(|state| state.begin_fetch(user_id))?;
        let _loading = LoadingGuard { store: self };
        let flushes_before = self.shared.flushes_confirmed.get();

        let outcome = self
            .shared
            .api
            .get_balance(&BalanceRequest { user_id })
            .await
            .map(|response| response.balance);
        let outcome = match outcome {
            Ok(stale) if self.shared.flushes_confirmed.get() != flushes_before => {
                log::debug!("Discarding balance {stale} read before a confirmed flush");
                Ok(self.balance())
            }
            Err(err) => {
                log::error!("Failed to fetch balance: {err}");
                Err(err)
            }
            fresh => fresh,
        };
        self.update(|state| state.finish_fetch(&outcome));
        Ok(outcome?)
    }

    /// Send all pending clicks and reconcile the balance.
    ///
    /// Returns `Ok(None)` without a request when nothing is pending or the id
    /// is missing. On failure the batch is put back into the queue and the
    /// error is logged; the shared error flag is not touched.
    ///
    /// # Errors
    ///
    /// Returns the transport error of a failed request.
    #[allow(clippy::future_not_send)] // The store is a single-threaded `Rc` handle.
    pub async fn send_clicks(&self, user_id: Option<&str>) -> Result<Option<u64>, StoreError> {
        let Some(batch) = self.update(|state| state.begin_flush(user_id)) else {
            return Ok(None);
        };
        let request = batch.request();
        let mut flight = FlightGuard::new(self, batch);

        match self.shared.api.add_clicks(&request).await {
            Ok(response) => {
                if let Some(batch) = flight.batch.take() {
                    self.update(|state| state.confirm_flush(batch, response.new_balance));
                    let confirmed = &self.shared.flushes_confirmed;
                    confirmed.set(confirmed.get().wrapping_add(1));
                }
                log::debug!(
                    "Flushed {} clicks, balance now {}",
                    request.clicks,
                    response.new_balance
                );
                Ok(Some(response.new_balance))
            }
            Err(err) => {
                log::error!("Failed to send {} clicks: {err}", request.clicks);
                Err(err.into())
            }
        }
    }
}

/// Clears the loading flag when a balance read ends, however it ends.
struct LoadingGuard<'a, A, S>
where
    A: BalanceApi,
    S: SessionStorage,
{
    store: &'a SessionStore<A, S>,
}

impl<A, S> Drop for LoadingGuard<'_, A, S>
where
    A: BalanceApi,
    S: SessionStorage,
{
    fn drop(&mut self) {
        self.store.update(|state| state.set_loading(false));
    }
}

/// Tracks a batch in flight; an unconfirmed batch goes back into the queue on drop.
///
/// This also covers a flush future dropped before the response arrives.
struct FlightGuard<'a, A, S>
where
    A: BalanceApi,
    S: SessionStorage,
{
    store: &'a SessionStore<A, S>,
    batch: Option<ClickBatch>,
}

impl<'a, A, S> FlightGuard<'a, A, S>
where
    A: BalanceApi,
    S: SessionStorage,
{
    fn new(store: &'a SessionStore<A, S>, batch: ClickBatch) -> Self {
        let in_flight = &store.shared.flushes_in_flight;
        in_flight.set(in_flight.get() + 1);
        Self {
            store,
            batch: Some(batch),
        }
    }
}

impl<A, S> Drop for FlightGuard<'_, A, S>
where
    A: BalanceApi,
    S: SessionStorage,
{
    fn drop(&mut self) {
        let in_flight = &self.store.shared.flushes_in_flight;
        in_flight.set(in_flight.get().saturating_sub(1));
        if let Some(batch) = self.batch.take() {
            self.store.update(|state| state.revert_flush(batch));
        }
    }
}
