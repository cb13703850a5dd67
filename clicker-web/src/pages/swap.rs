use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub struct SwapPageProps {
    pub balance: AttrValue,
}

#[function_component(SwapPage)]
pub fn swap_page(props: &SwapPageProps) -> Html {
    html! {
        <section class="panel swap" data-testid="swap-screen">
            <h1>{ "Swap" }</h1>
            <p>
                { "Available: " }
                <strong>{ props.balance.clone() }</strong>
            </p>
            <p class="muted">{ "Swapping opens soon." }</p>
        </section>
    }
}
