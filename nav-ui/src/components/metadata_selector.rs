//! Labelled dropdown over a metadata list.

use dioxus::prelude::*;

/// One `<option>`: submitted value and visible label.
#[derive(Clone, PartialEq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

#[derive(Props, Clone, PartialEq)]
pub struct MetadataSelectorProps {
    pub id: String,
    pub label: String,
    pub options: Vec<SelectOption>,
    pub selected: String,
    /// Shown instead of the dropdown while the list is empty
    #[props(default = "Loading...".to_string())]
    pub placeholder: String,
    pub onchange: EventHandler<String>,
}

/// Dropdown selector; reports the chosen value through `onchange`.
#[component]
pub fn MetadataSelector(props: MetadataSelectorProps) -> Element {
    let onchange = props.onchange;
    let on_change = move |evt: Event<FormData>| {
        onchange.call(evt.value());
    };

    rsx! {
        div {
            style: "margin: 4px 0;",
            label {
                r#for: "{props.id}",
                style: "font-weight: bold; margin-right: 8px;",
                "{props.label}: "
            }
            if props.options.is_empty() {
                span { style: "color: #666;", "{props.placeholder}" }
            } else {
                select {
                    id: "{props.id}",
                    onchange: on_change,
                    for option in props.options.iter() {
                        option {
                            value: "{option.value}",
                            selected: option.value == props.selected,
                            "{option.label}"
                        }
                    }
                }
            }
        }
    }
}
