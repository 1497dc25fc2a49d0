//! Error display component.

use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct ErrorDisplayProps {
    pub message: String,
    /// Shows a close button when set
    #[props(default)]
    pub on_dismiss: Option<EventHandler<()>>,
}

/// Displays an error message in a styled box.
#[component]
pub fn ErrorDisplay(props: ErrorDisplayProps) -> Element {
    let on_dismiss = props.on_dismiss;
    rsx! {
        div {
            style: "padding: 8px 12px; margin: 8px 0; background: #FFEBEE; color: #C62828; border-radius: 4px; border: 1px solid #EF9A9A; display: flex; justify-content: space-between;",
            span {
                strong { "Error: " }
                "{props.message}"
            }
            if let Some(handler) = on_dismiss {
                button {
                    style: "border: none; background: none; color: #C62828; cursor: pointer;",
                    onclick: move |_| handler.call(()),
                    "×"
                }
            }
        }
    }
}
