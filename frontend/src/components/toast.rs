use super::super::{App, Msg};
use yew::html::Scope;
use yew::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

pub fn render_toasts(toasts: &[Toast], link: &Scope<App>) -> Html {
    if toasts.is_empty() {
        return html! {};
    }

    html! {
        <div class="toast-stack">
            { for toasts.iter().map(|toast| {
                let id = toast.id;
                let (class, icon) = match toast.kind {
                    ToastKind::Success => ("toast toast-success", "fa-solid fa-circle-check"),
                    ToastKind::Error => ("toast toast-error", "fa-solid fa-circle-exclamation"),
                };
                html! {
                    <div class={class} key={id.to_string()}>
                        <i class={icon}></i>
                        <p>{ &toast.message }</p>
                        <button
                            class="toast-close"
                            title="Dismiss"
                            onclick={link.callback(move |_| Msg::DismissToast(id))}
                        >
                            <i class="fa-solid fa-times"></i>
                        </button>
                    </div>
                }
            })}
        </div>
    }
}
