use yew::prelude::*;
use yew_router::prelude::*;

use crate::session::Session;
use crate::Route;

#[function_component]
pub fn Profile() -> Html {
    let session = use_context::<Session>();
    let user = session.and_then(|s| s.user);

    let Some(user) = user else {
        return html! { <Redirect<Route> to={Route::Pricing} /> };
    };

    html! {
        <div class="profile-container">
            <style>
                {".profile-container {
                    max-width: 480px;
                    margin: 4rem auto;
                    padding: 2rem;
                    background: #fff;
                    border-radius: 8px;
                    box-shadow: 0 4px 16px rgba(0, 0, 0, 0.1);
                }
                .profile-row {
                    display: flex;
                    justify-content: space-between;
                    padding: 0.75rem 0;
                    border-bottom: 1px solid #eee;
                }"}
            </style>
            <h1 class="profile-title">{"Profile"}</h1>
            <div class="profile-row">
                <span>{"Email"}</span>
                <span>{&user.email}</span>
            </div>
            <div class="profile-row">
                <span>{"Subscription"}</span>
                <span>{user.subscription_label()}</span>
            </div>
            <Link<Route> to={Route::Pricing} classes="back-link">
                {"Change plan"}
            </Link<Route>>
        </div>
    }
}
