use shared::UserProfile;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct AuthButtonProps {
    pub user: Option<UserProfile>,
    pub credits: Option<u32>,
    pub loading: bool,
    pub login_url: Option<String>,
    pub on_logout: Callback<()>,
}

#[function_component(AuthButton)]
pub fn auth_button(props: &AuthButtonProps) -> Html {
    let handle_login = {
        let login_url = props.login_url.clone();
        Callback::from(move |_: MouseEvent| {
            let Some(url) = login_url.as_deref() else {
                log::error!("❌ AuthButton: no login URL configured");
                return;
            };
            let Some(window) = web_sys::window() else {
                log::error!("❌ AuthButton: no window to navigate from");
                return;
            };
            if let Err(e) = window.location().set_href(url) {
                log::error!("❌ AuthButton: failed to navigate to {}: {:?}", url, e);
            }
        })
    };

    let handle_logout = {
        let on_logout = props.on_logout.clone();
        Callback::from(move |_: MouseEvent| on_logout.emit(()))
    };

    if props.loading {
        return html! {
            <div class="auth-button-container">
                <div class="auth-loading">
                    <i class="fa-solid fa-spinner fa-spin"></i>
                    {" Loading..."}
                </div>
            </div>
        };
    }

    match &props.user {
        Some(user) => {
            html! {
                <div class="auth-button-container">
                    <div class="user-info">
                        <div class="user-details">
                            <span class="user-name">{&user.name}</span>
                            <span class="user-email">{&user.email}</span>
                        </div>
                        <span class="credits-badge" title="Remaining API credits">
                            <i class="fa-solid fa-coins"></i>
                            { match props.credits {
                                Some(credits) => format!(" {} credits", credits),
                                None => " ...".to_string(),
                            }}
                        </span>
                        <button
                            class="logout-button"
                            onclick={handle_logout}
                            title="Logout"
                        >
                            <i class="fa-solid fa-sign-out-alt"></i>
                            {" Logout"}
                        </button>
                    </div>
                </div>
            }
        }
        None => {
            html! {
                <div class="auth-button-container">
                    <button
                        class="login-button"
                        onclick={handle_login}
                        title="Log in to try the APIs"
                    >
                        <i class="fa-solid fa-right-to-bracket"></i>
                        {" Login"}
                    </button>
                </div>
            }
        }
    }
}
