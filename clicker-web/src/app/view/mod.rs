mod handlers;

pub use handlers::AppHandlers;

use crate::app::routing::is_view_ready;
use crate::app::state::AppState;
use crate::components::shell::AppShell;
use crate::router::Route;
use yew::prelude::*;
use yew_router::prelude::Navigator;

pub fn render_app(state: &AppState, route: Route, navigator: Option<Navigator>) -> Html {
    let handlers = AppHandlers::new(state, navigator);
    let view_ready = is_view_ready(route, &state.visited);

    html! {
        <AppShell
            route={route}
            view_ready={view_ready}
            session={state.session.clone()}
            on_click={handlers.click}
            on_reset_click_count={handlers.reset_click_count}
            on_navigate={handlers.navigate}
            on_dev_set_balance={handlers.dev_set_balance}
        />
    }
}
