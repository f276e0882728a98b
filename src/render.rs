//! Toast element construction.
//!
//! Three layouts exist: a header row with icon and title ([`Mode::TitleIcon`]), a
//! solid colored icon rail beside the message ([`Mode::Icon`]) and a plain
//! single-row message ([`Mode::Message`]). Class names come from the host's CSS
//! utility framework.

use serde::Serialize;

use crate::dom::Element;
use crate::options::ToastConfig;
use crate::types::Variant;

pub const CLOSE_CLASS: &str = "btn-close";
pub const ACTIONS_CLASS: &str = "bt-actions";
pub const APPROVE_CLASS: &str = "bt-approve";
pub const DENY_CLASS: &str = "bt-deny";
pub const BODY_CLASS: &str = "toast-body";

pub(crate) const ID_DATA: &str = "bt-id";

const SHELL_CLASSES: &str = "toast border-0 rounded-3 shadow-sm overflow-hidden";
const APPROVE_LABEL: &str = "OK";
const DENY_LABEL: &str = "Cancel";

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    TitleIcon,
    Icon,
    Message,
}

impl Mode {
    pub fn select(config: &ToastConfig) -> Self {
        match (config.has_title(), config.no_icon) {
            (true, false) => Self::TitleIcon,
            (false, false) => Self::Icon,
            (_, true) => Self::Message,
        }
    }
}

/// Class sets a toast resolves to; recorded in debug snapshots.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ResolvedClasses {
    pub subtle: String,
    pub solid: String,
    pub icon: String,
}

impl ResolvedClasses {
    pub fn for_config(config: &ToastConfig) -> Self {
        Self {
            subtle: subtle_classes(config.variant),
            solid: solid_classes(config.variant),
            icon: if config.no_icon {
                String::new()
            } else {
                config.icon_class.clone()
            },
        }
    }
}

fn text_emphasis_class(variant: Variant) -> String {
    match variant {
        Variant::Light => "text-body".to_string(),
        Variant::Dark => "text-dark-emphasis".to_string(),
        other => format!("text-{other}-emphasis"),
    }
}

/// Body surfaces: tinted background with matching text.
pub fn subtle_classes(variant: Variant) -> String {
    format!("bg-{variant}-subtle {}", text_emphasis_class(variant))
}

/// Header and rail surfaces: solid background, white text.
pub fn solid_classes(variant: Variant) -> String {
    format!("bg-{variant} text-white")
}

/// Builds the detached toast element for `text`.
pub fn build(text: &str, config: &ToastConfig) -> Element {
    let classes = ResolvedClasses::for_config(config);
    let shell = Element::div()
        .class(SHELL_CLASSES)
        .attr("role", "alert")
        .attr("aria-live", config.aria_live.as_str())
        .attr("aria-atomic", "true")
        .data(ID_DATA, config.id.as_str());
    let body = body(text, config);

    match Mode::select(config) {
        Mode::Message => shell.class(&classes.subtle).child(
            Element::div()
                .class("d-flex align-items-center")
                .child(body.class("flex-grow-1"))
                .maybe_child(close_button(config, "me-2 m-auto")),
        ),
        Mode::Icon => shell.class(&classes.subtle).child(
            Element::div()
                .class("d-flex align-items-stretch")
                .child(
                    Element::div()
                        .class("d-flex align-items-center justify-content-center px-3 py-2")
                        .class(&classes.solid)
                        .child(Element::new("span").class("bt-icon").class(&classes.icon)),
                )
                .child(body.class("flex-grow-1"))
                .maybe_child(close_button(config, "me-2 m-auto")),
        ),
        Mode::TitleIcon => {
            let close_tone = if config.variant == Variant::Light {
                ""
            } else {
                "btn-close-white"
            };
            shell
                .child(
                    Element::div()
                        .class("toast-header border-0")
                        .class(&classes.solid)
                        .child(
                            Element::new("span")
                                .class("me-2 d-inline-flex align-items-center bt-icon")
                                .class(&classes.icon),
                        )
                        .child(Element::new("strong").class("me-auto").text(config.title.as_str()))
                        .maybe_child(close_button(config, close_tone)),
                )
                .child(body.class(&classes.subtle))
        }
    }
}

fn body(text: &str, config: &ToastConfig) -> Element {
    Element::div()
        .class(BODY_CLASS)
        .text(text)
        .maybe_child(config.has_actions().then(|| action_row(config)))
}

fn close_button(config: &ToastConfig, extra: &str) -> Option<Element> {
    config.dismissible.then(|| {
        Element::new("button")
            .class(CLOSE_CLASS)
            .class(extra)
            .attr("type", "button")
            .attr("aria-label", "Close")
            .data("bs-dismiss", "toast")
    })
}

fn action_row(config: &ToastConfig) -> Element {
    let approve = config.has_approve().then(|| {
        action_button(
            &format!("btn btn-sm btn-{} {APPROVE_CLASS}", config.variant),
            label(&config.approve_text, APPROVE_LABEL),
            "approve",
        )
    });
    let deny = config.has_deny().then(|| {
        action_button(
            &format!("btn btn-sm btn-outline-secondary {DENY_CLASS}"),
            label(&config.deny_text, DENY_LABEL),
            "deny",
        )
    });
    Element::div()
        .class(ACTIONS_CLASS)
        .class("mt-2 pt-2 border-top d-flex gap-2 justify-content-end")
        .maybe_child(deny)
        .maybe_child(approve)
}

fn action_button(classes: &str, text: &str, action: &str) -> Element {
    Element::new("button")
        .class(classes)
        .attr("type", "button")
        .data("bt-action", action)
        .text(text)
}

fn label<'a>(configured: &'a str, fallback: &'a str) -> &'a str {
    if configured.is_empty() { fallback } else { configured }
}
