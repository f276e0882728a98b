//! Toast options and their normalization.
//!
//! [`ToastOptions`] is the loose, partially specified record callers hand in (from
//! code, a JSON value or the settings file). [`normalize`] turns it into a fully
//! populated [`ToastConfig`]; nothing downstream ever sees an absent field.
//!
//! Malformed values never surface as errors: every deserialized field is wrapped
//! in [`DefaultOnError`], so a wrong type or an unknown enum member reads as
//! "not given" and picks up the default.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_with::{DefaultOnError, DurationMilliSeconds, serde_as};
use uuid::Uuid;

use crate::config::NumericMillis;
use crate::config::defaults::{DEFAULT_ARIA_LIVE, DEFAULT_DELAY, DEFAULT_EXTENDED_DELAY, ID_PREFIX};
use crate::interaction::{ActionHandler, CallbackResult, ClickEvent, ClickHandler, ToastContext};
use crate::types::{DuplicatePolicy, Position, Variant};

/// Partially specified toast options. Every field is optional.
#[serde_as]
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToastOptions {
    #[serde_as(as = "DefaultOnError")]
    pub id: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    pub position: Option<Position>,
    #[serde_as(as = "DefaultOnError")]
    pub autohide: Option<bool>,
    #[serde_as(as = "DefaultOnError<Option<NumericMillis>>")]
    pub delay: Option<Duration>,
    #[serde_as(as = "DefaultOnError")]
    pub dismissible: Option<bool>,
    #[serde_as(as = "DefaultOnError")]
    pub title: Option<String>,
    #[serde(alias = "aria_live")]
    #[serde_as(as = "DefaultOnError")]
    pub aria_live: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    pub variant: Option<Variant>,
    #[serde(alias = "no_icon")]
    #[serde_as(as = "DefaultOnError")]
    pub no_icon: Option<bool>,
    #[serde(alias = "icon_class")]
    #[serde_as(as = "DefaultOnError")]
    pub icon_class: Option<String>,
    #[serde(alias = "progress_bar")]
    #[serde_as(as = "DefaultOnError")]
    pub progress_bar: Option<bool>,
    #[serde(alias = "extended_delay")]
    #[serde_as(as = "DefaultOnError<Option<NumericMillis>>")]
    pub extended_delay: Option<Duration>,
    #[serde(alias = "pause_on_hover")]
    #[serde_as(as = "DefaultOnError")]
    pub pause_on_hover: Option<bool>,
    #[serde(alias = "prevent_duplicates")]
    #[serde_as(as = "DefaultOnError")]
    pub prevent_duplicates: Option<bool>,
    #[serde(alias = "dedupe_key")]
    #[serde_as(as = "DefaultOnError")]
    pub dedupe_key: Option<String>,
    #[serde(alias = "on_duplicate")]
    #[serde_as(as = "DefaultOnError")]
    pub on_duplicate: Option<DuplicatePolicy>,
    #[serde(alias = "newest_on_top")]
    #[serde_as(as = "DefaultOnError")]
    pub newest_on_top: Option<bool>,
    #[serde_as(as = "DefaultOnError")]
    pub debug: Option<bool>,
    #[serde(alias = "dismiss_on_click")]
    #[serde_as(as = "DefaultOnError")]
    pub dismiss_on_click: Option<bool>,
    #[serde(alias = "approve_text")]
    #[serde_as(as = "DefaultOnError")]
    pub approve_text: Option<String>,
    #[serde(alias = "deny_text")]
    #[serde_as(as = "DefaultOnError")]
    pub deny_text: Option<String>,
    #[serde(skip)]
    pub on_click: Option<ClickHandler>,
    #[serde(skip)]
    pub on_approve: Option<ActionHandler>,
    #[serde(skip)]
    pub on_deny: Option<ActionHandler>,
}

impl ToastOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads options from a loosely typed JSON value.
    ///
    /// Anything that is not an object yields empty options.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match Self::deserialize(value) {
            Ok(options) => options,
            Err(err) => {
                tracing::debug!(error = %err, "ignoring malformed toast options");
                Self::default()
            }
        }
    }

    #[must_use]
    pub fn on_click<F>(mut self, handler: F) -> Self
    where
        F: Fn(&ClickEvent, &ToastContext) -> CallbackResult + 'static,
    {
        self.on_click = Some(ClickHandler::new(handler));
        self
    }

    #[must_use]
    pub fn on_approve<F>(mut self, handler: F) -> Self
    where
        F: Fn(&ToastContext) -> CallbackResult + 'static,
    {
        self.on_approve = Some(ActionHandler::new(handler));
        self
    }

    #[must_use]
    pub fn on_deny<F>(mut self, handler: F) -> Self
    where
        F: Fn(&ToastContext) -> CallbackResult + 'static,
    {
        self.on_deny = Some(ActionHandler::new(handler));
        self
    }

    #[must_use]
    pub(crate) fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = Some(variant);
        self
    }

    /// Fills every absent field from `base`.
    ///
    /// Identity fields (`id`, `dedupe_key`) are per toast and never inherited.
    #[must_use]
    pub fn layered_over(self, base: &Self) -> Self {
        Self {
            id: self.id,
            position: self.position.or(base.position),
            autohide: self.autohide.or(base.autohide),
            delay: self.delay.or(base.delay),
            dismissible: self.dismissible.or(base.dismissible),
            title: self.title.or_else(|| base.title.clone()),
            aria_live: self.aria_live.or_else(|| base.aria_live.clone()),
            variant: self.variant.or(base.variant),
            no_icon: self.no_icon.or(base.no_icon),
            icon_class: self.icon_class.or_else(|| base.icon_class.clone()),
            progress_bar: self.progress_bar.or(base.progress_bar),
            extended_delay: self.extended_delay.or(base.extended_delay),
            pause_on_hover: self.pause_on_hover.or(base.pause_on_hover),
            prevent_duplicates: self.prevent_duplicates.or(base.prevent_duplicates),
            dedupe_key: self.dedupe_key,
            on_duplicate: self.on_duplicate.or(base.on_duplicate),
            newest_on_top: self.newest_on_top.or(base.newest_on_top),
            debug: self.debug.or(base.debug),
            dismiss_on_click: self.dismiss_on_click.or(base.dismiss_on_click),
            approve_text: self.approve_text.or_else(|| base.approve_text.clone()),
            deny_text: self.deny_text.or_else(|| base.deny_text.clone()),
            on_click: self.on_click.or_else(|| base.on_click.clone()),
            on_approve: self.on_approve.or_else(|| base.on_approve.clone()),
            on_deny: self.on_deny.or_else(|| base.on_deny.clone()),
        }
    }
}

/// Fully resolved toast configuration. Immutable once built.
#[serde_as]
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct ToastConfig {
    pub id: String,
    pub position: Position,
    pub autohide: bool,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub delay: Duration,
    pub dismissible: bool,
    pub title: String,
    pub aria_live: String,
    pub variant: Variant,
    pub no_icon: bool,
    pub icon_class: String,
    pub progress_bar: bool,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub extended_delay: Duration,
    pub pause_on_hover: bool,
    pub prevent_duplicates: bool,
    /// Explicit dedup identity; empty means "derive from content".
    pub dedupe_key: String,
    pub on_duplicate: DuplicatePolicy,
    pub newest_on_top: bool,
    pub debug: bool,
    pub dismiss_on_click: bool,
    pub approve_text: String,
    pub deny_text: String,
    #[serde(skip)]
    pub on_click: Option<ClickHandler>,
    #[serde(skip)]
    pub on_approve: Option<ActionHandler>,
    #[serde(skip)]
    pub on_deny: Option<ActionHandler>,
}

impl ToastConfig {
    pub fn has_title(&self) -> bool {
        !self.title.is_empty()
    }

    pub fn has_approve(&self) -> bool {
        !self.approve_text.is_empty() || self.on_approve.is_some()
    }

    pub fn has_deny(&self) -> bool {
        !self.deny_text.is_empty() || self.on_deny.is_some()
    }

    pub fn has_actions(&self) -> bool {
        self.has_approve() || self.has_deny()
    }
}

/// Applies defaults to `options`. Total and side-effect free apart from id
/// generation.
pub fn normalize(options: &ToastOptions) -> ToastConfig {
    let variant = options.variant.unwrap_or_default();
    ToastConfig {
        id: non_empty(options.id.as_deref()).map_or_else(generate_id, str::to_string),
        position: options.position.unwrap_or_default(),
        autohide: options.autohide.unwrap_or(true),
        delay: options.delay.unwrap_or(DEFAULT_DELAY),
        dismissible: options.dismissible.unwrap_or(true),
        title: options.title.clone().unwrap_or_default(),
        aria_live: non_empty(options.aria_live.as_deref())
            .unwrap_or(DEFAULT_ARIA_LIVE)
            .to_string(),
        variant,
        no_icon: options.no_icon.unwrap_or(false),
        icon_class: non_empty(options.icon_class.as_deref())
            .map_or_else(|| default_icon_class(variant), str::to_string),
        progress_bar: options.progress_bar.unwrap_or(false),
        extended_delay: options.extended_delay.unwrap_or(DEFAULT_EXTENDED_DELAY),
        pause_on_hover: options.pause_on_hover.unwrap_or(true),
        prevent_duplicates: options.prevent_duplicates.unwrap_or(false),
        dedupe_key: options.dedupe_key.clone().unwrap_or_default(),
        on_duplicate: options.on_duplicate.unwrap_or_default(),
        newest_on_top: options.newest_on_top.unwrap_or(false),
        debug: options.debug.unwrap_or(false),
        dismiss_on_click: options.dismiss_on_click.unwrap_or(true),
        approve_text: options.approve_text.clone().unwrap_or_default(),
        deny_text: options.deny_text.clone().unwrap_or_default(),
        on_click: options.on_click.clone(),
        on_approve: options.on_approve.clone(),
        on_deny: options.on_deny.clone(),
    }
}

/// Time-ordered identity with a random tail, e.g. `bt_0190f3c4...`.
pub fn generate_id() -> String {
    format!("{ID_PREFIX}{}", Uuid::now_v7().simple())
}

fn default_icon_class(variant: Variant) -> String {
    format!("btoast-{variant}-icon")
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::{ToastOptions, normalize};
    use crate::types::{DuplicatePolicy, Position, Variant};
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn empty_options_get_every_default() {
        let config = normalize(&ToastOptions::default());
        assert!(config.id.starts_with("bt_"));
        assert_eq!(config.position, Position::TopRight);
        assert!(config.autohide);
        assert_eq!(config.delay, Duration::from_millis(4_000));
        assert!(config.dismissible);
        assert_eq!(config.title, "");
        assert_eq!(config.aria_live, "polite");
        assert_eq!(config.variant, Variant::Dark);
        assert!(!config.no_icon);
        assert_eq!(config.icon_class, "btoast-dark-icon");
        assert!(!config.progress_bar);
        assert_eq!(config.extended_delay, Duration::from_millis(1_000));
        assert!(config.pause_on_hover);
        assert!(!config.prevent_duplicates);
        assert_eq!(config.dedupe_key, "");
        assert_eq!(config.on_duplicate, DuplicatePolicy::Reshow);
        assert!(!config.newest_on_top);
        assert!(!config.debug);
        assert!(config.dismiss_on_click);
        assert!(!config.has_actions());
    }

    #[test]
    fn unknown_enum_members_fall_back() {
        let options = ToastOptions::from_json(&json!({
            "variant": "purple",
            "position": "middle",
            "onDuplicate": "explode"
        }));
        let config = normalize(&options);
        assert_eq!(config.variant, Variant::Dark);
        assert_eq!(config.position, Position::TopRight);
        assert_eq!(config.on_duplicate, DuplicatePolicy::Reshow);
    }

    #[test]
    fn wrong_types_fall_back_to_defaults() {
        let options = ToastOptions::from_json(&json!({
            "delay": "soon",
            "extendedDelay": -250,
            "autohide": "nope",
            "title": 42,
            "progressBar": [1, 2],
            "somethingElse": true
        }));
        let config = normalize(&options);
        assert_eq!(config.delay, Duration::from_millis(4_000));
        assert_eq!(config.extended_delay, Duration::from_millis(1_000));
        assert!(config.autohide);
        assert_eq!(config.title, "");
        assert!(!config.progress_bar);
    }

    #[test]
    fn string_delays_are_not_numbers() {
        let options = ToastOptions::from_json(&json!({
            "delay": "750",
            "extendedDelay": "2s"
        }));
        let config = normalize(&options);
        assert_eq!(config.delay, Duration::from_secs(4));
        assert_eq!(config.extended_delay, Duration::from_secs(1));
    }

    #[test]
    fn well_formed_json_is_honoured() {
        let options = ToastOptions::from_json(&json!({
            "id": "saved-1",
            "variant": "success",
            "position": "bottom-center",
            "title": "Done",
            "delay": 100,
            "extendedDelay": 2000,
            "noIcon": true,
            "iconClass": "bi bi-check",
            "preventDuplicates": true,
            "onDuplicate": "ignore",
            "approveText": "Undo"
        }));
        let config = normalize(&options);
        assert_eq!(config.id, "saved-1");
        assert_eq!(config.variant, Variant::Success);
        assert_eq!(config.position, Position::BottomCenter);
        assert_eq!(config.title, "Done");
        assert_eq!(config.delay, Duration::from_millis(100));
        assert_eq!(config.extended_delay, Duration::from_secs(2));
        assert!(config.no_icon);
        assert_eq!(config.icon_class, "bi bi-check");
        assert!(config.prevent_duplicates);
        assert_eq!(config.on_duplicate, DuplicatePolicy::Ignore);
        assert!(config.has_approve());
        assert!(!config.has_deny());
    }

    #[test]
    fn non_object_json_yields_defaults() {
        let config = normalize(&ToastOptions::from_json(&json!("success")));
        assert_eq!(config.variant, Variant::Dark);
    }

    #[test]
    fn blank_id_is_regenerated() {
        let options = ToastOptions {
            id: Some("   ".into()),
            ..ToastOptions::default()
        };
        let first = normalize(&options);
        let second = normalize(&options);
        assert!(first.id.starts_with("bt_"));
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn layering_prefers_call_site_values() {
        let base = ToastOptions {
            id: Some("base".into()),
            variant: Some(Variant::Info),
            position: Some(Position::BottomLeft),
            delay: Some(Duration::from_secs(9)),
            dedupe_key: Some("shared".into()),
            ..ToastOptions::default()
        };
        let call = ToastOptions {
            variant: Some(Variant::Danger),
            ..ToastOptions::default()
        };
        let merged = call.layered_over(&base);
        assert_eq!(merged.variant, Some(Variant::Danger));
        assert_eq!(merged.position, Some(Position::BottomLeft));
        assert_eq!(merged.delay, Some(Duration::from_secs(9)));
        assert_eq!(merged.id, None);
        assert_eq!(merged.dedupe_key, None);
    }

    #[test]
    fn handler_alone_enables_its_button() {
        let options = ToastOptions::new().on_deny(|_| Ok(()));
        let config = normalize(&options);
        assert!(config.has_deny());
        assert!(!config.has_approve());
        assert!(config.has_actions());
    }
}
