//! Introductory modal with the two exit actions.

use ccvis_viz::intro::DismissAction;
use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct IntroModalProps {
    pub title: String,
    pub body: String,
    pub on_dismiss: EventHandler<DismissAction>,
}

#[component]
pub fn IntroModal(props: IntroModalProps) -> Element {
    let on_dismiss = props.on_dismiss;

    rsx! {
        div {
            style: "position: fixed; inset: 0; z-index: 10; display: flex; align-items: center; justify-content: center; background: rgba(0,0,0,0.55);",
            div {
                role: "dialog",
                style: "max-width: 480px; padding: 20px 24px; background: #fff; border-radius: 6px; font-family: system-ui, -apple-system, sans-serif;",
                h2 {
                    style: "margin: 0 0 8px 0; font-size: 18px;",
                    "{props.title}"
                }
                p {
                    style: "margin: 0 0 16px 0; font-size: 14px; line-height: 1.4; color: #333;",
                    "{props.body}"
                }
                div {
                    style: "display: flex; gap: 8px; justify-content: flex-end;",
                    button {
                        onclick: move |_| on_dismiss.call(DismissAction::ContinueAndSuppress),
                        "Continuar y no volver a mostrar"
                    }
                    button {
                        onclick: move |_| on_dismiss.call(DismissAction::Continue),
                        "Continuar"
                    }
                }
            }
        }
    }
}
