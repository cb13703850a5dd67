#[cfg(target_arch = "wasm32")]
use crate::router::Route;
#[cfg(target_arch = "wasm32")]
use yew::prelude::*;
#[cfg(target_arch = "wasm32")]
use yew_router::prelude::*;

pub mod bootstrap;
pub mod flush;
pub mod routing;
pub mod state;
pub mod view;

pub use state::{AppState, WebSessionStore};

#[cfg(target_arch = "wasm32")]
#[function_component(App)]
pub fn app() -> Html {
    let router_base = crate::paths::router_base().map(AttrValue::from);
    html! {
        <BrowserRouter basename={router_base}>
            <AppInner />
        </BrowserRouter>
    }
}

#[cfg(target_arch = "wasm32")]
#[function_component(AppInner)]
pub fn app_inner() -> Html {
    let app_state = state::use_app_state();
    bootstrap::use_bootstrap(&app_state);
    flush::use_flush_timer(&app_state.store, app_state.config.flush_interval_ms);

    let navigator = use_navigator();
    let route = use_route::<Route>().unwrap_or(Route::NotFound);
    routing::use_lazy_views(&app_state.visited, route);

    view::render_app(&app_state, route, navigator)
}
