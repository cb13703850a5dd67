use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub struct FriendsPageProps {
    #[prop_or_default]
    pub user_id: Option<AttrValue>,
}

#[function_component(FriendsPage)]
pub fn friends_page(props: &FriendsPageProps) -> Html {
    html! {
        <section class="panel friends" data-testid="friends-screen">
            <h1>{ "Friends" }</h1>
            <p>{ "Invite friends and tap together." }</p>
            if let Some(user_id) = props.user_id.clone() {
                <p class="invite-code">
                    { "Your invite code: " }
                    <code data-testid="invite-code">{ user_id }</code>
                </p>
            } else {
                <p class="muted">{ "Open the app from the bot to get an invite code." }</p>
            }
        </section>
    }
}
