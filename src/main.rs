use yew::prelude::*;
use yew_router::prelude::*;
use log::{info, Level};

mod api;
mod config;
mod session;
mod profile {
    pub mod models;
    pub mod profile;
}
mod pages {
    pub mod pricing;
    pub mod pricing_flow;
    pub mod pricing_state;
}

use pages::pricing::PricingPage;
use profile::models::User;
use profile::profile::Profile;
use session::Session;

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/pricing")]
    Pricing,
    #[at("/profile")]
    Profile,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Home => {
            html! { <Redirect<Route> to={Route::Pricing} /> }
        },
        Route::Pricing => {
            info!("Rendering Pricing page");
            html! { <PricingPage /> }
        },
        Route::Profile => {
            info!("Rendering Profile page");
            html! { <Profile /> }
        },
        Route::NotFound => {
            info!("Rendering NotFound page");
            html! {
                <div class="not-found">
                    <h1>{"Page not found"}</h1>
                    <Link<Route> to={Route::Pricing}>{"See plans"}</Link<Route>>
                </div>
            }
        },
    }
}

#[derive(Properties, PartialEq)]
pub struct NavProps {
    pub logged_in: bool,
    pub on_logout: Callback<()>,
}

#[function_component(Nav)]
pub fn nav(props: &NavProps) -> Html {
    let NavProps { logged_in, on_logout } = props;

    let handle_logout = {
        let on_logout = on_logout.clone();
        Callback::from(move |_: MouseEvent| {
            on_logout.emit(());
        })
    };

    html! {
        <nav class="top-nav">
            <div class="nav-content">
                <Link<Route> to={Route::Pricing} classes="nav-link">
                    {"Pricing"}
                </Link<Route>>
                {
                    if *logged_in {
                        html! {
                            <>
                                <Link<Route> to={Route::Profile} classes="nav-profile-link">
                                    {"Profile"}
                                </Link<Route>>
                                <button onclick={handle_logout} class="nav-logout-button">
                                    {"Logout"}
                                </button>
                            </>
                        }
                    } else {
                        html! {}
                    }
                }
            </div>
        </nav>
    }
}

#[function_component]
fn App() -> Html {
    let user = use_state(session::load_user);

    let set_user = {
        let user = user.clone();
        Callback::from(move |next: Option<User>| {
            session::store_user(next.as_ref());
            user.set(next);
        })
    };

    let handle_logout = {
        let set_user = set_user.clone();
        Callback::from(move |_| {
            info!("Logging out");
            set_user.emit(None);
        })
    };

    let session = Session {
        user: (*user).clone(),
        set_user,
    };

    html! {
        <ContextProvider<Session> context={session}>
            <BrowserRouter>
                <Nav logged_in={user.is_some()} on_logout={handle_logout} />
                <Switch<Route> render={switch} />
            </BrowserRouter>
        </ContextProvider<Session>>
    }
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(Level::Info).expect("error initializing log");

    info!("Starting application");
    yew::Renderer::<App>::new().render();
}
