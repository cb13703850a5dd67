use crate::router::{NAV_MAP, Route};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub active: Route,
    pub on_navigate: Callback<Route>,
}

/// Bottom tab bar listing the navigation table in order.
#[function_component(NavBar)]
pub fn nav_bar(p: &Props) -> Html {
    let tabs = NAV_MAP.iter().map(|entry| {
        let route = entry.route;
        let onclick = {
            let cb = p.on_navigate.clone();
            Callback::from(move |_: MouseEvent| cb.emit(route))
        };
        let active = p.active == route;
        html! {
            <li key={entry.name}>
                <button
                    type="button"
                    class={classes!("nav-tab", active.then_some("nav-tab-active"))}
                    aria-current={active.then_some("page")}
                    data-testid={format!("nav-{}", entry.name)}
                    {onclick}
                >
                    { entry.label }
                </button>
            </li>
        }
    });

    html! {
        <nav class="nav-bar" aria-label="Main">
            <ul>{ for tabs }</ul>
        </nav>
    }
}
