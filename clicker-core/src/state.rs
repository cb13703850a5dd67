//! Session state and its synchronous transitions.
//!
//! Every mutation of the session goes through a method here. The async
//! operations in [`crate::store`] only sequence these transitions around the
//! network calls, so the counting rules can be tested without any I/O.
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{TransportError, ValidationError};
use crate::numbers::group_thousands;
use crate::profile::UserProfile;
use crate::wire::AddClicksRequest;

/// Observable state of the clicker session.
///
/// `optimistic_delta` always equals the clicks recorded locally that are not
/// yet reflected in `balance`: pending clicks plus any batch in flight.
/// `counted_pending` is the part of the queue still included in
/// `click_count`; a reset bumps `reset_epoch` so batches captured before it
/// no longer lower the count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    user: Option<UserProfile>,
    balance: u64,
    optimistic_delta: u64,
    pending_clicks: u64,
    click_count: u64,
    counted_pending: u64,
    reset_epoch: u64,
    loading: bool,
    error: Option<String>,
}

/// Clicks captured for one flush.
///
/// Must be handed back through [`SessionState::confirm_flush`] or
/// [`SessionState::revert_flush`].
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a captured batch must be confirmed or reverted"]
pub struct ClickBatch {
    user_id: String,
    clicks: u64,
    counted: u64,
    epoch: u64,
}

impl ClickBatch {
    #[must_use]
    pub fn clicks(&self) -> u64 {
        self.clicks
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    #[must_use]
    pub fn request(&self) -> AddClicksRequest {
        AddClicksRequest {
            user_id: self.user_id.clone(),
            clicks: self.clicks,
        }
    }
}

/// Subset of the session that survives a reload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedSession {
    pub user: Option<UserProfile>,
    pub balance: u64,
    pub click_count: u64,
    pub pending_clicks: u64,
}

fn required_id(user_id: Option<&str>) -> Option<&str> {
    user_id.map(str::trim).filter(|id| !id.is_empty())
}

impl SessionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn user_id(&self) -> Option<String> {
        self.user.as_ref().and_then(UserProfile::id)
    }

    #[must_use]
    pub fn balance(&self) -> u64 {
        self.balance
    }

    /// Confirmed balance plus clicks awaiting confirmation.
    #[must_use]
    pub fn display_balance(&self) -> u64 {
        self.balance.saturating_add(self.optimistic_delta)
    }

    #[must_use]
    pub fn pending_clicks(&self) -> u64 {
        self.pending_clicks
    }

    #[must_use]
    pub fn click_count(&self) -> u64 {
        self.click_count
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn formatted_balance(&self) -> String {
        group_thousands(self.display_balance())
    }

    #[must_use]
    pub fn formatted_click_count(&self) -> String {
        group_thousands(self.click_count)
    }

    /// Replace the profile with a frozen copy of `value`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] and leaves the current profile untouched
    /// when `value` is not a JSON object.
    pub fn set_user(&mut self, value: &Value) -> Result<(), ValidationError> {
        self.user = Some(UserProfile::from_value(value)?);
        Ok(())
    }

    pub fn record_click(&mut self) {
        self.click_count = self.click_count.saturating_add(1);
        self.pending_clicks = self.pending_clicks.saturating_add(1);
        self.optimistic_delta = self.optimistic_delta.saturating_add(1);
        self.counted_pending = self.counted_pending.saturating_add(1);
    }

    pub fn reset_click_count(&mut self) {
        self.click_count = 0;
        self.counted_pending = 0;
        self.reset_epoch = self.reset_epoch.wrapping_add(1);
    }

    /// Clicks of `batch` still included in `click_count`.
    fn still_counted(&self, batch: &ClickBatch) -> u64 {
        if batch.epoch == self.reset_epoch {
            batch.counted
        } else {
            0
        }
    }

    pub fn set_balance(&mut self, balance: u64) {
        self.balance = balance;
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Validate the id and enter the loading state of a balance read.
    ///
    /// # Errors
    ///
    /// Records and returns [`ValidationError::MissingUserId`] when the id is
    /// absent or blank; nothing else changes.
    pub fn begin_fetch(&mut self, user_id: Option<&str>) -> Result<String, ValidationError> {
        let Some(id) = required_id(user_id) else {
            let err = ValidationError::MissingUserId;
            self.error = Some(err.to_string());
            return Err(err);
        };
        self.loading = true;
        self.error = None;
        Ok(id.to_string())
    }

    /// Apply the outcome of a balance read. Loading is left to the caller.
    pub fn finish_fetch(&mut self, outcome: &Result<u64, TransportError>) {
        match outcome {
            Ok(balance) => self.balance = *balance,
            Err(err) => self.error = Some(err.to_string()),
        }
    }

    /// Capture all pending clicks for sending, optimistically clearing the queue.
    ///
    /// Returns `None` when there is nothing to send or no usable id.
    pub fn begin_flush(&mut self, user_id: Option<&str>) -> Option<ClickBatch> {
        let id = required_id(user_id)?;
        if self.pending_clicks == 0 {
            return None;
        }
        let clicks = std::mem::take(&mut self.pending_clicks);
        let counted = std::mem::take(&mut self.counted_pending);
        Some(ClickBatch {
            user_id: id.to_string(),
            clicks,
            counted,
            epoch: self.reset_epoch,
        })
    }

    /// Reconcile with the balance the server reports after accepting `batch`.
    ///
    /// Clicks recorded while the batch was in flight stay pending and keep
    /// contributing to the display balance. Only clicks still counted since the
    /// last reset are taken off `click_count`.
    pub fn confirm_flush(&mut self, batch: ClickBatch, new_balance: u64) {
        let counted = self.still_counted(&batch);
        self.balance = new_balance;
        self.optimistic_delta = self.optimistic_delta.saturating_sub(batch.clicks);
        self.click_count = self.click_count.saturating_sub(counted);
    }

    /// Put an unsent batch back into the queue, on top of anything recorded since.
    pub fn revert_flush(&mut self, batch: ClickBatch) {
        let counted = self.still_counted(&batch);
        self.pending_clicks = self.pending_clicks.saturating_add(batch.clicks);
        self.counted_pending = self.counted_pending.saturating_add(counted);
    }

    /// The subset written to storage.
    ///
    /// A batch in flight is saved as still pending, so a reload before the
    /// response arrives resends it rather than dropping it.
    #[must_use]
    pub fn persisted(&self) -> PersistedSession {
        PersistedSession {
            user: self.user.clone(),
            balance: self.balance,
            click_count: self.click_count,
            pending_clicks: self.optimistic_delta,
        }
    }

    /// Restore the persisted subset. Transient flags are reset.
    pub fn restore(&mut self, saved: PersistedSession) {
        self.user = saved.user;
        self.balance = saved.balance;
        self.click_count = saved.click_count;
        self.pending_clicks = saved.pending_clicks;
        self.optimistic_delta = saved.pending_clicks;
        self.counted_pending = saved.click_count.min(saved.pending_clicks);
        self.loading = false;
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn clicked(n: u64) -> SessionState {
        let mut state = SessionState::new();
        for _ in 0..n {
            state.record_click();
        }
        state
    }

    #[test]
    fn clicks_accumulate_everywhere() {
        let state = clicked(3);
        assert_eq!(state.click_count(), 3);
        assert_eq!(state.pending_clicks(), 3);
        assert_eq!(state.display_balance(), 3);
        assert_eq!(state.balance(), 0);
    }

    #[test]
    fn reset_is_idempotent_and_keeps_pending() {
        let mut state = clicked(4);
        state.reset_click_count();
        assert_eq!(state.click_count(), 0);
        state.reset_click_count();
        assert_eq!(state.click_count(), 0);
        assert_eq!(state.pending_clicks(), 4);
    }

    #[test]
    fn begin_flush_requires_clicks_and_id() {
        let mut empty = SessionState::new();
        assert!(empty.begin_flush(Some("u1")).is_none());

        let mut state = clicked(2);
        assert!(state.begin_flush(None).is_none());
        assert!(state.begin_flush(Some("")).is_none());
        assert_eq!(state.pending_clicks(), 2);
    }

    #[test]
    fn confirmed_flush_reconciles_balance() {
        let mut state = clicked(5);
        let batch = state.begin_flush(Some("u1")).unwrap();
        assert_eq!(batch.clicks(), 5);
        assert_eq!(batch.user_id(), "u1");
        assert_eq!(state.pending_clicks(), 0);
        assert_eq!(state.display_balance(), 5);

        state.confirm_flush(batch, 5);
        assert_eq!(state.balance(), 5);
        assert_eq!(state.display_balance(), 5);
        assert_eq!(state.click_count(), 0);
    }

    #[test]
    fn clicks_during_flight_survive_confirmation() {
        let mut state = clicked(5);
        let batch = state.begin_flush(Some("u1")).unwrap();
        state.record_click();
        state.record_click();
        state.confirm_flush(batch, 105);
        assert_eq!(state.balance(), 105);
        assert_eq!(state.pending_clicks(), 2);
        assert_eq!(state.display_balance(), 107);
        assert_eq!(state.click_count(), 2);
    }

    #[test]
    fn reset_during_flight_keeps_later_clicks_counted() {
        let mut state = clicked(5);
        let batch = state.begin_flush(Some("u1")).unwrap();
        state.reset_click_count();
        state.record_click();
        state.record_click();
        state.confirm_flush(batch, 5);
        assert_eq!(state.pending_clicks(), 2);
        assert_eq!(state.click_count(), 2);
        assert_eq!(state.display_balance(), 7);
    }

    #[test]
    fn batch_reverted_after_reset_is_not_subtracted_again() {
        let mut state = clicked(5);
        let batch = state.begin_flush(Some("u1")).unwrap();
        state.reset_click_count();
        state.record_click();
        state.revert_flush(batch);
        assert_eq!(state.pending_clicks(), 6);
        assert_eq!(state.click_count(), 1);

        let retry = state.begin_flush(Some("u1")).unwrap();
        assert_eq!(retry.clicks(), 6);
        state.record_click();
        state.confirm_flush(retry, 6);
        assert_eq!(state.click_count(), 1);
        assert_eq!(state.pending_clicks(), 1);
        assert_eq!(state.display_balance(), 7);
    }

    #[test]
    fn reverted_flush_conserves_clicks() {
        let mut state = clicked(5);
        let batch = state.begin_flush(Some("u1")).unwrap();
        for _ in 0..3 {
            state.record_click();
        }
        state.revert_flush(batch);
        assert_eq!(state.pending_clicks(), 8);
        assert_eq!(state.click_count(), 8);
        assert_eq!(state.display_balance(), 8);
        assert!(state.error().is_none());
    }

    #[test]
    fn fetch_guard_records_error_without_loading() {
        let mut state = SessionState::new();
        state.set_balance(7);
        assert_eq!(state.begin_fetch(None), Err(ValidationError::MissingUserId));
        assert_eq!(state.begin_fetch(Some("")), Err(ValidationError::MissingUserId));
        assert_eq!(state.error(), Some("User ID is required"));
        assert!(!state.is_loading());
        assert_eq!(state.balance(), 7);
    }

    #[test]
    fn fetch_clears_previous_error() {
        let mut state = SessionState::new();
        let _ = state.begin_fetch(None);
        assert_eq!(state.begin_fetch(Some("u1")).as_deref(), Ok("u1"));
        assert!(state.is_loading());
        assert!(state.error().is_none());
        state.finish_fetch(&Ok(40));
        assert_eq!(state.balance(), 40);
        state.finish_fetch(&Err(TransportError::Network("offline".into())));
        assert_eq!(state.error(), Some("Network error: offline"));
        assert_eq!(state.balance(), 40);
    }

    #[test]
    fn set_user_rejects_non_objects_and_keeps_previous() {
        let mut state = SessionState::new();
        state.set_user(&json!({"id": "u1"})).unwrap();
        assert!(state.set_user(&json!(42)).is_err());
        assert!(state.set_user(&Value::Null).is_err());
        assert_eq!(state.user_id().as_deref(), Some("u1"));
    }

    #[test]
    fn restore_rebuilds_optimistic_delta() {
        let mut state = SessionState::new();
        state.restore(PersistedSession {
            user: None,
            balance: 10,
            click_count: 4,
            pending_clicks: 3,
        });
        assert_eq!(state.display_balance(), 13);
        assert_eq!(state.persisted().pending_clicks, 3);

        let batch = state.begin_flush(Some("u1")).unwrap();
        state.confirm_flush(batch, 13);
        assert_eq!(state.click_count(), 1);
        assert_eq!(state.display_balance(), 13);
    }

    #[test]
    fn in_flight_batch_is_persisted_as_pending() {
        let mut state = clicked(4);
        let batch = state.begin_flush(Some("u1")).unwrap();
        assert_eq!(state.pending_clicks(), 0);
        assert_eq!(state.persisted().pending_clicks, 4);
        state.confirm_flush(batch, 4);
        assert_eq!(state.persisted().pending_clicks, 0);
    }

    #[test]
    fn persisted_keys_are_camel_case() {
        let mut state = clicked(2);
        state.set_user(&json!({"id": "u1"})).unwrap();
        let value = serde_json::to_value(state.persisted()).unwrap();
        assert_eq!(
            value,
            json!({"user": {"id": "u1"}, "balance": 0, "clickCount": 2, "pendingClicks": 2})
        );
    }

    #[test]
    fn formatting_uses_display_balance() {
        let mut state = clicked(1);
        state.set_balance(1_233);
        assert_eq!(state.formatted_balance(), "1,234");
        assert_eq!(state.formatted_click_count(), "1");
    }
}
