use yew::prelude::*;

/// Placeholder shown while a lazily loaded view is brought in.
#[function_component(LoadingView)]
pub fn loading_view() -> Html {
    html! {
        <section class="panel loading" aria-busy="true" data-testid="view-loading">
            <p>{ "Loading…" }</p>
        </section>
    }
}
