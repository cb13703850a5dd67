use crate::app::state::{AppState, WebSessionStore};
use crate::router::Route;
use yew::prelude::*;
use yew_router::prelude::Navigator;

#[derive(Clone)]
pub struct AppHandlers {
    pub click: Callback<()>,
    pub reset_click_count: Callback<()>,
    pub navigate: Callback<Route>,
    /// Present only in development mode.
    pub dev_set_balance: Option<Callback<u64>>,
}

impl AppHandlers {
    #[must_use]
    pub fn new(state: &AppState, navigator: Option<Navigator>) -> Self {
        Self {
            click: build_click(&state.store),
            reset_click_count: build_reset_click_count(&state.store),
            navigate: build_navigate(navigator),
            dev_set_balance: state
                .dev_mode()
                .then(|| build_dev_set_balance(&state.store)),
        }
    }
}

fn build_click(store: &WebSessionStore) -> Callback<()> {
    let store = store.clone();
    Callback::from(move |()| store.record_click())
}

fn build_reset_click_count(store: &WebSessionStore) -> Callback<()> {
    let store = store.clone();
    Callback::from(move |()| store.reset_click_count())
}

fn build_navigate(navigator: Option<Navigator>) -> Callback<Route> {
    Callback::from(move |route: Route| {
        if let Some(nav) = navigator.as_ref() {
            nav.push(&route);
        }
    })
}

fn build_dev_set_balance(store: &WebSessionStore) -> Callback<u64> {
    let store = store.clone();
    Callback::from(move |balance: u64| {
        if let Err(err) = store.set_balance(balance) {
            log::warn!("Balance override rejected: {err}");
        }
    })
}
