mod api;
mod components;

use components::api_card::render_api_cards;
use components::auth_button::AuthButton;
use components::demo_modal::render_demo_modal;
use components::header::{render_header, render_hero, render_integration};
use components::toast::{Toast, ToastKind, render_toasts};
use components::utils::generate_id;
use gloo_events::EventListener;
use gloo_timers::callback::Timeout;
use shared::{Modality, Session, UserProfile, VisionConfig};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::KeyboardEvent;
use yew::prelude::*;

// Yew msg components
pub enum Msg {
    // Startup
    ConfigLoaded(VisionConfig),

    // Session
    ProfileLoaded(UserProfile),
    ProfileFailed,
    RefreshCredits(String),
    CreditsLoaded(u32),
    Logout,

    // Demos
    OpenDemo(Modality),
    CloseDemo,

    // Toasts
    Notify(ToastKind, String),
    DismissToast(u64),
}

// Main component
pub struct App {
    config: Rc<VisionConfig>,
    token: Option<String>,
    profile: Option<UserProfile>,
    session: Option<Session>,
    auth_loading: bool,
    active_demo: Option<Modality>,
    toasts: Vec<Toast>,
    _key_listener: Option<EventListener>,
}

impl Component for App {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let token = api::capture_token_from_url().or_else(api::stored_token);

        let link = ctx.link().clone();
        spawn_local(async move {
            let config = match api::load_config().await {
                Ok(config) => config,
                Err(e) => {
                    log::warn!("using default configuration: {}", e);
                    VisionConfig::default()
                }
            };
            link.send_message(Msg::ConfigLoaded(config));
        });

        let link = ctx.link().clone();
        let key_listener = web_sys::window().map(|window| {
            EventListener::new(&window, "keydown", move |event| {
                let is_escape = event
                    .dyn_ref::<KeyboardEvent>()
                    .is_some_and(|e| e.key() == "Escape");
                if is_escape {
                    link.send_message(Msg::CloseDemo);
                }
            })
        });

        Self {
            config: Rc::new(VisionConfig::default()),
            auth_loading: token.is_some(),
            token,
            profile: None,
            session: None,
            active_demo: None,
            toasts: Vec::new(),
            _key_listener: key_listener,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            // Startup
            Msg::ConfigLoaded(config) => self.handle_config_loaded(ctx, config),

            // Session
            Msg::ProfileLoaded(profile) => self.handle_profile_loaded(ctx, profile),
            Msg::ProfileFailed => {
                api::clear_token();
                self.token = None;
                self.auth_loading = false;
                true
            }
            Msg::RefreshCredits(user_id) => {
                self.refresh_credits(ctx, user_id);
                false
            }
            Msg::CreditsLoaded(credits) => match self.session.as_mut() {
                Some(session) => {
                    session.apply_credits(credits);
                    true
                }
                None => false,
            },
            Msg::Logout => self.handle_logout(),

            // Demos
            Msg::OpenDemo(modality) => {
                log::info!("opening {} demo", modality);
                self.active_demo = Some(modality);
                true
            }
            Msg::CloseDemo => self.active_demo.take().is_some(),

            // Toasts
            Msg::Notify(kind, message) => self.handle_notify(ctx, kind, message),
            Msg::DismissToast(id) => {
                let before = self.toasts.len();
                self.toasts.retain(|toast| toast.id != id);
                self.toasts.len() != before
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let auth = html! {
            <AuthButton
                user={self.profile.clone()}
                credits={self.session.as_ref().and_then(|s| s.credits_remaining)}
                loading={self.auth_loading}
                login_url={self.config.login_url().ok().map(|url| url.to_string())}
                on_logout={link.callback(|_| Msg::Logout)}
            />
        };

        html! {
            <div class="container">
                { render_header(auth) }

                <main class="main-content">
                    { render_hero() }
                    { render_api_cards(link) }
                    { render_integration(&self.config) }
                </main>

                {
                    match self.active_demo {
                        Some(modality) => render_demo_modal(
                            modality,
                            &self.config,
                            self.session.as_ref().map(|s| s.user_id.clone()),
                            link,
                        ),
                        None => html! {},
                    }
                }
                { render_toasts(&self.toasts, link) }

                <footer class="app-footer">
                    <p>{"Vision APIs | Fullstack Rust WASM"}</p>
                </footer>
            </div>
        }
    }
}

// Handler methods
impl App {
    fn handle_config_loaded(&mut self, ctx: &Context<Self>, config: VisionConfig) -> bool {
        log::info!("API base: {}", config.api_base_url);
        self.config = Rc::new(config);

        if let Some(token) = self.token.clone() {
            let config = Rc::clone(&self.config);
            let link = ctx.link().clone();
            spawn_local(async move {
                match api::fetch_user_info(&config, &token).await {
                    Ok(profile) => link.send_message(Msg::ProfileLoaded(profile)),
                    Err(e) => {
                        log::error!("❌ Failed to fetch user info: {}", e);
                        link.send_message(Msg::ProfileFailed);
                    }
                }
            });
        }
        true
    }

    fn handle_profile_loaded(&mut self, ctx: &Context<Self>, profile: UserProfile) -> bool {
        self.auth_loading = false;
        let Some(token) = self.token.clone() else {
            return false;
        };
        self.session = Some(Session::new(&profile, token));
        self.refresh_credits(ctx, profile.id.clone());
        self.profile = Some(profile);
        true
    }

    fn refresh_credits(&self, ctx: &Context<Self>, user_id: String) {
        let Some(token) = self.token.clone() else {
            return;
        };
        let config = Rc::clone(&self.config);
        let link = ctx.link().clone();
        spawn_local(async move {
            match api::fetch_credits(&config, &token, &user_id).await {
                Ok(credits) => link.send_message(Msg::CreditsLoaded(credits)),
                Err(e) => log::warn!("credits refresh failed for {}: {}", user_id, e),
            }
        });
    }

    fn handle_logout(&mut self) -> bool {
        api::clear_token();
        self.token = None;
        self.profile = None;
        self.session = None;
        log::info!("👋 Logged out");
        true
    }

    fn handle_notify(&mut self, ctx: &Context<Self>, kind: ToastKind, message: String) -> bool {
        let id = generate_id();
        self.toasts.push(Toast { id, kind, message });

        let link = ctx.link().clone();
        Timeout::new(self.config.toast_duration_ms, move || {
            link.send_message(Msg::DismissToast(id))
        })
        .forget();
        true
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("App starting...");
    yew::Renderer::<App>::new().render();
}
