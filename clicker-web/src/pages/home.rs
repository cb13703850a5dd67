use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub struct HomePageProps {
    /// Display balance, already formatted.
    pub balance: AttrValue,
    pub click_count: AttrValue,
    pub loading: bool,
    #[prop_or_default]
    pub error: Option<AttrValue>,
    pub on_click: Callback<()>,
    pub on_reset_click_count: Callback<()>,
    #[prop_or_default]
    pub on_dev_set_balance: Option<Callback<u64>>,
}

#[function_component(HomePage)]
pub fn home_page(props: &HomePageProps) -> Html {
    let on_tap = {
        let cb = props.on_click.clone();
        Callback::from(move |_: MouseEvent| cb.emit(()))
    };
    let on_reset = {
        let cb = props.on_reset_click_count.clone();
        Callback::from(move |_: MouseEvent| cb.emit(()))
    };
    let coin_src = crate::paths::asset_path("static/img/coin.svg");

    let dev_tools = props.on_dev_set_balance.as_ref().map(|cb| {
        let cb = cb.clone();
        html! {
            <div class="dev-tools" data-testid="dev-tools">
                <button type="button" onclick={Callback::from(move |_: MouseEvent| cb.emit(0))}>
                    { "Zero balance" }
                </button>
            </div>
        }
    });

    html! {
        <section class="home" data-testid="home-screen">
            <div class="balance" aria-live="polite">
                <span class="balance-label">{ "Balance" }</span>
                <strong class="balance-value" data-testid="balance">{ props.balance.clone() }</strong>
                if props.loading {
                    <span class="balance-sync" data-testid="balance-loading">{ "Syncing…" }</span>
                }
            </div>
            if let Some(error) = props.error.clone() {
                <p class="error" role="alert" data-testid="balance-error">{ error }</p>
            }
            <button
                type="button"
                class="tap-button"
                aria-label="Tap to earn"
                data-testid="tap-button"
                onclick={on_tap}
            >
                <img src={coin_src} alt="" />
            </button>
            <div class="click-count">
                <span>{ "Clicks this session: " }</span>
                <span data-testid="click-count">{ props.click_count.clone() }</span>
                <button type="button" class="link-button" onclick={on_reset}>{ "Reset" }</button>
            </div>
            { for dev_tools }
        </section>
    }
}
