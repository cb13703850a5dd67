use crate::components::nav_bar::NavBar;
use crate::pages::{
    friends::FriendsPage, home::HomePage, loading::LoadingView, not_found::NotFound,
    swap::SwapPage, tasks::TasksPage,
};
use crate::router::Route;
use clicker_core::SessionState;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct AppShellProps {
    pub route: Route,
    /// False while a lazy view is being brought in.
    pub view_ready: bool,
    pub session: SessionState,
    pub on_click: Callback<()>,
    pub on_reset_click_count: Callback<()>,
    pub on_navigate: Callback<Route>,
    #[prop_or_default]
    pub on_dev_set_balance: Option<Callback<u64>>,
}

fn render_view(p: &AppShellProps) -> Html {
    if !p.view_ready {
        return html! { <LoadingView /> };
    }
    let session = &p.session;
    match p.route {
        Route::Home => html! {
            <HomePage
                balance={AttrValue::from(session.formatted_balance())}
                click_count={AttrValue::from(session.formatted_click_count())}
                loading={session.is_loading()}
                error={session.error().map(|e| AttrValue::from(e.to_string()))}
                on_click={p.on_click.clone()}
                on_reset_click_count={p.on_reset_click_count.clone()}
                on_dev_set_balance={p.on_dev_set_balance.clone()}
            />
        },
        Route::Friends => html! {
            <FriendsPage user_id={session.user_id().map(AttrValue::from)} />
        },
        Route::Swap => html! {
            <SwapPage balance={AttrValue::from(session.formatted_balance())} />
        },
        Route::Tasks => html! { <TasksPage /> },
        Route::NotFound => {
            let go_home = {
                let cb = p.on_navigate.clone();
                Callback::from(move |()| cb.emit(Route::Home))
            };
            html! { <NotFound on_go_home={go_home} /> }
        }
    }
}

/// Page chrome: greeting header, the routed view and the tab bar.
#[function_component(AppShell)]
pub fn app_shell(p: &AppShellProps) -> Html {
    let greeting = p
        .session
        .user()
        .and_then(|user| user.name().map(str::to_string))
        .map_or_else(|| String::from("Welcome"), |name| format!("Hi, {name}"));

    html! {
        <div class="app-shell" data-route={p.route.name()}>
            <header class="app-header" role="banner">
                <span class="greeting">{ greeting }</span>
            </header>
            <main id="main" role="main">
                { render_view(p) }
            </main>
            <NavBar active={p.route} on_navigate={p.on_navigate.clone()} />
        </div>
    }
}
