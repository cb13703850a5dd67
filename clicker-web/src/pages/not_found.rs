use yew::prelude::*;

/// Shown when the path matches no entry of the navigation table.
#[derive(Properties, PartialEq)]
pub struct Props {
    pub on_go_home: Callback<()>,
}

#[function_component(NotFound)]
pub fn not_found(props: &Props) -> Html {
    let go_home = {
        let cb = props.on_go_home.clone();
        Callback::from(move |_| cb.emit(()))
    };

    html! {
        <section class="panel not-found" aria-live="assertive" data-testid="not-found">
            <h1>{ "Nothing here" }</h1>
            <p>{ "This page does not exist." }</p>
            <button type="button" onclick={go_home}>
                { "Back to tapping" }
            </button>
        </section>
    }
}
