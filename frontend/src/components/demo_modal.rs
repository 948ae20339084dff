use super::super::{App, Msg};
use super::demo_panel::DemoPanel;
use super::toast::ToastKind;
use shared::{Modality, VisionConfig};
use std::rc::Rc;
use yew::html::Scope;
use yew::prelude::*;

pub fn render_demo_modal(
    modality: Modality,
    config: &Rc<VisionConfig>,
    user_id: Option<String>,
    link: &Scope<App>,
) -> Html {
    let on_credits = link.callback(Msg::RefreshCredits);
    let on_notify = link.callback(|(kind, message): (ToastKind, String)| Msg::Notify(kind, message));

    html! {
        <div class="modal-backdrop" onclick={link.callback(|_| Msg::CloseDemo)}>
            <div
                class="modal"
                role="dialog"
                onclick={Callback::from(|e: MouseEvent| e.stop_propagation())}
            >
                <div class="modal-header">
                    <h2>{ modality.demo_title() }</h2>
                    <button
                        class="modal-close"
                        title="Close"
                        onclick={link.callback(|_| Msg::CloseDemo)}
                    >
                        <i class="fa-solid fa-times"></i>
                    </button>
                </div>
                <DemoPanel
                    key={modality.to_string()}
                    {modality}
                    config={config.clone()}
                    {user_id}
                    {on_credits}
                    {on_notify}
                />
            </div>
        </div>
    }
}
