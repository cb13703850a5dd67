#[cfg(target_arch = "wasm32")]
use crate::app::state::AppState;
use clicker_core::{BalanceApi, SessionStorage, SessionStore};
use serde_json::Value;
#[cfg(target_arch = "wasm32")]
use yew::prelude::*;

/// Bring the session up: restore the saved state, adopt the host-provided
/// user, read the balance and send clicks left over from the last visit.
#[allow(clippy::future_not_send)] // The store is a single-threaded `Rc` handle.
pub async fn bootstrap_session<A, S>(store: &SessionStore<A, S>, host_user: Option<Value>)
where
    A: BalanceApi,
    S: SessionStorage,
{
    if let Err(err) = store.hydrate() {
        log::warn!("Starting with a fresh session: {err}");
    }
    if let Some(profile) = host_user {
        // Rejections are logged by the store; the restored user stays.
        let _ = store.set_user(&profile);
    }

    let user_id = store.user_id();
    if user_id.is_none() {
        log::info!("No user available, balance sync is disabled");
    }
    // A missing id is reported through the store's error flag.
    let _ = store.fetch_balance(user_id.as_deref()).await;
    let _ = store.send_clicks(user_id.as_deref()).await;
}

#[cfg(target_arch = "wasm32")]
#[hook]
pub fn use_bootstrap(app_state: &AppState) {
    let store = app_state.store.clone();

    use_effect_with((), move |()| {
        wasm_bindgen_futures::spawn_local(async move {
            bootstrap_session(&store, crate::dom::telegram_user()).await;
        });
        || {}
    });
}
