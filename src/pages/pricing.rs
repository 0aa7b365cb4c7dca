use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::api::HttpSubscriptionApi;
use crate::pages::pricing_flow::{confirm_subscription, finish_confirm, load_subscription, request_otp};
use crate::pages::pricing_state::{PricingAction, PricingState, LOGIN_HINT};
use crate::profile::models::{Plan, User};
use crate::session::Session;
use crate::Route;

#[derive(Properties, PartialEq)]
pub struct PricingProps {
    #[prop_or_default]
    pub user: Option<User>,
    /// Replaces the session user after a confirmed subscription.
    pub on_user_change: Callback<User>,
}

#[function_component(PricingPage)]
pub fn pricing_page() -> Html {
    let session = use_context::<Session>();
    let user = session.as_ref().and_then(|s| s.user.clone());
    let on_user_change = {
        let set_user = session.map(|s| s.set_user);
        Callback::from(move |updated: User| {
            if let Some(set_user) = &set_user {
                set_user.emit(Some(updated));
            }
        })
    };

    html! {
        <Pricing {user} {on_user_change} />
    }
}

#[function_component(Pricing)]
pub fn pricing(props: &PricingProps) -> Html {
    let state = use_reducer(PricingState::default);
    let navigator = use_navigator();
    let has_user = props.user.as_ref().map_or(false, User::is_signed_in);

    // Fetch subscription status whenever the user changes
    {
        let dispatcher = state.dispatcher();
        use_effect_with_deps(move |user: &Option<User>| {
            if let Some(user) = user.clone().filter(User::is_signed_in) {
                spawn_local(async move {
                    let api = HttpSubscriptionApi::default();
                    dispatcher.dispatch(load_subscription(&api, &user.email).await);
                });
            }
            || ()
        }, props.user.clone());
    }

    let on_send_otp = {
        let state = state.clone();
        let user = props.user.clone();
        Callback::from(move |_: MouseEvent| {
            let snapshot = (*state).clone();
            let dispatcher = state.dispatcher();
            let user = user.clone();
            spawn_local(async move {
                let api = HttpSubscriptionApi::default();
                dispatcher.dispatch(request_otp(&api, &snapshot, user.as_ref()).await);
            });
        })
    };

    let on_otp_input = {
        let dispatcher = state.dispatcher();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            dispatcher.dispatch(PricingAction::SetOtp(input.value()));
        })
    };

    let on_submit = {
        let state = state.clone();
        let user = props.user.clone();
        let on_user_change = props.on_user_change.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let snapshot = (*state).clone();
            let dispatcher = state.dispatcher();
            let user = user.clone();
            let on_user_change = on_user_change.clone();
            let navigator = navigator.clone();
            spawn_local(async move {
                let api = HttpSubscriptionApi::default();
                let outcome = confirm_subscription(&api, &snapshot, user.as_ref()).await;
                let action = finish_confirm(
                    outcome,
                    |updated| on_user_change.emit(updated),
                    || {
                        if let Some(navigator) = navigator {
                            navigator.push(&Route::Profile);
                        }
                    },
                );
                dispatcher.dispatch(action);
            });
        })
    };

    let plan_tile = |plan: Plan| {
        let on_select = {
            let dispatcher = state.dispatcher();
            Callback::from(move |_: MouseEvent| dispatcher.dispatch(PricingAction::SelectPlan(plan)))
        };
        let on_enter = {
            let dispatcher = state.dispatcher();
            Callback::from(move |_: MouseEvent| dispatcher.dispatch(PricingAction::Hover(Some(plan))))
        };
        let on_leave = {
            let dispatcher = state.dispatcher();
            Callback::from(move |_: MouseEvent| dispatcher.dispatch(PricingAction::Hover(None)))
        };

        html! {
            <div
                class={classes!("pricing-option", state.is_selected(plan).then(|| "selected"))}
                onclick={on_select}
                onmouseenter={on_enter}
                onmouseleave={on_leave}
            >
                <h2>{plan.title()}</h2>
                <p>{plan.description()}</p>
                {
                    if state.shows_login_hint(plan, has_user) {
                        html! { <div class="hover-message">{LOGIN_HINT}</div> }
                    } else {
                        html! {}
                    }
                }
            </div>
        }
    };

    html! {
        <div class="pricing-page">
            <style>
                {".pricing-page {
                    min-height: 100vh;
                    padding: 1.5rem;
                    background: #f9fafb;
                }
                .pricing-page h1 {
                    text-align: center;
                    color: #1d4ed8;
                    margin-bottom: 2rem;
                }
                .pricing-options {
                    display: flex;
                    justify-content: center;
                    gap: 1.5rem;
                    margin-bottom: 1.5rem;
                }
                .pricing-option {
                    cursor: pointer;
                    padding: 1.5rem;
                    width: 100%;
                    max-width: 20rem;
                    background: #fff;
                    border: 2px solid transparent;
                    border-radius: 8px;
                    box-shadow: 0 4px 16px rgba(0, 0, 0, 0.1);
                    text-align: center;
                    transition: background 0.2s;
                }
                .pricing-option:hover {
                    background: #dbeafe;
                }
                .pricing-option.selected {
                    border-color: #3b82f6;
                }
                .hover-message {
                    font-size: 0.875rem;
                    color: #6b7280;
                    margin-top: 0.5rem;
                }
                .otp-button {
                    width: 100%;
                    max-width: 20rem;
                    padding: 0.5rem;
                    background: #2563eb;
                    color: #fff;
                    border: none;
                    border-radius: 6px;
                    font-weight: 600;
                    cursor: pointer;
                }
                .otp-button:disabled {
                    background: #9ca3af;
                    cursor: default;
                }
                .otp-form {
                    margin-top: 1.5rem;
                    display: flex;
                    flex-direction: column;
                    gap: 1rem;
                }
                .otp-form input {
                    max-width: 20rem;
                    padding: 0.75rem;
                    border: 1px solid #d1d5db;
                    border-radius: 6px;
                }
                .status-message {
                    margin-top: 1rem;
                    text-align: center;
                    color: #ef4444;
                }"}
            </style>
            <h1>{"Choose Your Subscription"}</h1>
            <div class="pricing-options">
                { plan_tile(Plan::Free) }
                { plan_tile(Plan::Year) }
            </div>

            {
                if state.shows_send_otp(has_user) {
                    html! {
                        <button
                            class="otp-button"
                            onclick={on_send_otp}
                            disabled={state.send_otp_disabled()}
                        >
                            {state.send_otp_label()}
                        </button>
                    }
                } else {
                    html! {}
                }
            }

            {
                if state.shows_otp_form() {
                    html! {
                        <form class="otp-form" onsubmit={on_submit}>
                            <label for="otp">{"Enter OTP:"}</label>
                            <input
                                type="text"
                                id="otp"
                                value={state.otp.clone()}
                                oninput={on_otp_input}
                                placeholder="Enter OTP"
                                required=true
                            />
                            <button type="submit" class="otp-button">
                                {"Confirm Subscription"}
                            </button>
                        </form>
                    }
                } else {
                    html! {}
                }
            }

            {
                if state.shows_status() {
                    html! { <p class="status-message">{&state.status}</p> }
                } else {
                    html! {}
                }
            }
        </div>
    }
}
