use crate::net::HttpBalanceApi;
use crate::router::Route;
use crate::storage::LocalSessionStorage;
use clicker_core::{ClientConfig, SessionState, SessionStore, StoreOptions};
use std::collections::HashSet;
use std::rc::Rc;
use yew::prelude::*;

/// The session store wired to the browser collaborators.
pub type WebSessionStore = SessionStore<HttpBalanceApi, LocalSessionStorage>;

#[must_use]
pub fn build_store(config: &ClientConfig) -> WebSessionStore {
    SessionStore::new(
        HttpBalanceApi::new(config),
        LocalSessionStorage,
        StoreOptions::from_config(config),
    )
}

#[derive(Clone)]
pub struct AppState {
    pub config: Rc<ClientConfig>,
    pub store: WebSessionStore,
    /// Snapshot taken for this render.
    pub session: SessionState,
    /// Lazy views that have been navigated to at least once.
    pub visited: UseStateHandle<HashSet<Route>>,
}

/// Create the store once per app and re-render whenever it changes.
#[hook]
pub fn use_app_state() -> AppState {
    let config = use_memo((), |()| crate::config::client_config());
    let store = {
        let config = Rc::clone(&config);
        use_memo((), move |()| build_store(&config))
    };
    let refresh = use_force_update();
    {
        let store = (*store).clone();
        use_effect_with((), move |()| {
            let subscription = store.subscribe(move || refresh.force_update());
            move || drop(subscription)
        });
    }

    AppState {
        config,
        session: store.snapshot(),
        store: (*store).clone(),
        visited: use_state(HashSet::<Route>::new),
    }
}

impl AppState {
    #[must_use]
    pub fn dev_mode(&self) -> bool {
        self.store.options().dev_mode
    }
}
