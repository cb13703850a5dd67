//! Periodic flushing of pending clicks.
use clicker_core::{BalanceApi, SessionStorage, SessionStore};
#[cfg(target_arch = "wasm32")]
use yew::prelude::*;

#[cfg(target_arch = "wasm32")]
use crate::app::state::WebSessionStore;

/// The user id to flush for, or `None` when a flush now would be pointless.
///
/// Ticks are skipped while a batch is already in flight; anything clicked in
/// the meantime goes out with the next tick.
#[must_use]
pub fn flush_target<A, S>(store: &SessionStore<A, S>) -> Option<String>
where
    A: BalanceApi,
    S: SessionStorage,
{
    if store.is_flushing() || store.pending_clicks() == 0 {
        return None;
    }
    store.user_id()
}

#[cfg(target_arch = "wasm32")]
pub fn flush_now(store: &WebSessionStore) {
    let Some(user_id) = flush_target(store) else {
        return;
    };
    let store = store.clone();
    wasm_bindgen_futures::spawn_local(async move {
        // Failures are logged and rolled back by the store.
        let _ = store.send_clicks(Some(&user_id)).await;
    });
}

/// Flush every `interval_ms`, and when the page goes to the background.
#[cfg(target_arch = "wasm32")]
#[hook]
pub fn use_flush_timer(store: &WebSessionStore, interval_ms: u32) {
    let store = store.clone();
    use_effect_with(interval_ms, move |&interval_ms| {
        let tick_store = store.clone();
        let interval = gloo::timers::callback::Interval::new(interval_ms, move || {
            flush_now(&tick_store);
        });
        let on_hidden = gloo::events::EventListener::new(
            &crate::dom::document(),
            "visibilitychange",
            move |_| {
                if crate::dom::page_hidden() {
                    flush_now(&store);
                }
            },
        );
        move || {
            drop(interval);
            drop(on_hidden);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use clicker_core::{
        AddClicksRequest, AddClicksResponse, BalanceRequest, BalanceResponse, MemoryStorage,
        StoreOptions, TransportError,
    };
    use futures::FutureExt;
    use futures::future::pending;
    use serde_json::json;

    /// Never answers, leaving the batch in flight.
    struct StalledApi;

    #[async_trait::async_trait(?Send)]
    impl BalanceApi for StalledApi {
        async fn get_balance(
            &self,
            _request: &BalanceRequest,
        ) -> Result<BalanceResponse, TransportError> {
            pending().await
        }

        async fn add_clicks(
            &self,
            _request: &AddClicksRequest,
        ) -> Result<AddClicksResponse, TransportError> {
            pending().await
        }
    }

    fn store() -> SessionStore<StalledApi, MemoryStorage> {
        SessionStore::new(StalledApi, MemoryStorage::new(), StoreOptions::default())
    }

    #[test]
    fn idle_store_needs_no_flush() {
        let store = store();
        store.set_user(&json!({"id": "u1"})).unwrap();
        assert_eq!(flush_target(&store), None);
        store.record_click();
        assert_eq!(flush_target(&store).as_deref(), Some("u1"));
    }

    #[test]
    fn anonymous_clicks_stay_queued() {
        let store = store();
        store.record_click();
        assert_eq!(flush_target(&store), None);
    }

    #[test]
    fn ticks_are_skipped_while_in_flight() {
        let store = store();
        store.set_user(&json!({"id": "u1"})).unwrap();
        store.record_click();

        let mut flight = Box::pin(store.send_clicks(Some("u1")));
        assert!((&mut flight).now_or_never().is_none());
        store.record_click();
        assert!(store.is_flushing());
        assert_eq!(flush_target(&store), None);

        drop(flight);
        assert_eq!(store.pending_clicks(), 2);
        assert_eq!(flush_target(&store).as_deref(), Some("u1"));
    }
}
