//! The toast orchestrator.
//!
//! [`Toaster`] owns the three host capabilities and every live toast. All state
//! changes happen inside a call: `show`, `hide` and `dispose` from the
//! application, and `dispatch`, `fire_timer` and `fire_frame` from the host when
//! an event, timer or animation frame comes due.

use std::collections::HashMap;
use std::num::NonZeroUsize;

use chrono::{DateTime, Utc};
use lru::LruCache;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::autohide::Autohide;
use crate::config::Settings;
use crate::dedup::{KEY_DATA, compute_key};
use crate::dom::{NodeId, Placement, Surface};
use crate::error::Error;
use crate::host::{FrameId, HostEvent, InstanceId, Scheduler, TimerId, ToastWidget};
use crate::interaction::{ClickEvent, ClickZone, Requests, ToastContext, classify_click, invoke_guarded};
use crate::lifecycle::{Cleanup, OnceListeners};
use crate::options::{ToastConfig, ToastOptions, normalize};
use crate::progress::ProgressDriver;
use crate::registry::ContainerRegistry;
use crate::render::{self, Mode, ResolvedClasses};
use crate::types::{DuplicatePolicy, Variant};

/// What the caller gets back from a successful `show`.
///
/// The handle only identifies the toast. Hide it with [`Toaster::hide`] and
/// release it immediately with [`Toaster::dispose`]; both take the handle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToastHandle {
    pub id: String,
    pub element: NodeId,
    pub instance: InstanceId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastState {
    Pending,
    Visible,
    Hiding,
    Removed,
}

/// Recorded for toasts shown with `debug` enabled.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugSnapshot {
    pub id: String,
    pub state: ToastState,
    pub started_at: DateTime<Utc>,
    pub key: String,
    pub mode: Mode,
    pub classes: ResolvedClasses,
    pub options: ToastConfig,
}

#[derive(Debug)]
struct ToastEntry {
    config: ToastConfig,
    instance: InstanceId,
    state: ToastState,
    autohide: Autohide,
    progress: ProgressDriver,
}

impl ToastEntry {
    fn handle(&self, element: NodeId) -> ToastHandle {
        ToastHandle {
            id: self.config.id.clone(),
            element,
            instance: self.instance,
        }
    }
}

fn visible_mut(toasts: &mut HashMap<NodeId, ToastEntry>, element: NodeId) -> Option<&mut ToastEntry> {
    toasts
        .get_mut(&element)
        .filter(|entry| entry.state == ToastState::Visible)
}

pub struct Toaster<S, W, C> {
    surface: S,
    widget: W,
    scheduler: C,
    defaults: ToastOptions,
    containers: ContainerRegistry,
    toasts: HashMap<NodeId, ToastEntry>,
    hidden: OnceListeners<NodeId, Cleanup>,
    snapshots: LruCache<String, DebugSnapshot>,
}

impl<S, W, C> Toaster<S, W, C>
where
    S: Surface,
    W: ToastWidget,
    C: Scheduler,
{
    pub fn new(surface: S, widget: W, scheduler: C) -> Self {
        Self::with_settings(surface, widget, scheduler, Settings::default())
    }

    pub fn with_settings(surface: S, widget: W, scheduler: C, settings: Settings) -> Self {
        Self {
            surface,
            widget,
            scheduler,
            defaults: settings.defaults,
            containers: ContainerRegistry::new(),
            toasts: HashMap::new(),
            hidden: OnceListeners::new(),
            snapshots: LruCache::new(settings.debug_history),
        }
    }

    /// Shows `message` as a toast.
    ///
    /// Returns `None` when the host widget is unavailable; nothing is touched in
    /// that case. A duplicate (with `prevent_duplicates`) returns the handle of
    /// the toast already on screen.
    pub fn show(&mut self, message: &str, options: ToastOptions) -> Option<ToastHandle> {
        if !self.widget.is_available() {
            warn!(error = %Error::MissingWidget, "toast not shown");
            return None;
        }

        let config = normalize(&options.layered_over(&self.defaults));
        let container = self.containers.get_or_create(&mut self.surface, config.position);
        let key = compute_key(message, &config);

        if config.prevent_duplicates {
            if let Some(existing) = self.find_duplicate(container, &key) {
                return self.on_duplicate(existing, config.on_duplicate, &key);
            }
        }

        let mut element = render::build(message, &config);
        element.set_data(KEY_DATA, key.as_str());
        let node = self.surface.create(element);
        let placement = if config.newest_on_top {
            Placement::Prepend
        } else {
            Placement::Append
        };
        self.surface.insert(container, node, placement);

        let mut autohide = Autohide::for_config(&config);
        let instance = self.widget.create(node, autohide.widget_options(&config));
        let mut progress = if ProgressDriver::applies(&config) {
            ProgressDriver::attach(&mut self.surface, node, config.variant)
        } else {
            ProgressDriver::disabled()
        };

        if autohide.is_local() {
            autohide.start(&mut self.scheduler, &mut progress);
        } else {
            progress.reset(&mut self.scheduler, config.delay);
        }

        let mut entry = ToastEntry {
            config,
            instance,
            state: ToastState::Pending,
            autohide,
            progress,
        };
        self.widget.show(instance);
        entry.state = ToastState::Visible;

        if entry.config.debug {
            self.record_snapshot(&entry, &key);
        }

        self.hidden.register(node, Cleanup::StopProgress);
        self.hidden.register(node, Cleanup::RemoveElement);

        info!(
            toast_id = %entry.config.id,
            position = %entry.config.position,
            variant = %entry.config.variant,
            key = %key,
            local_autohide = entry.autohide.is_local(),
            "toast shown"
        );
        let handle = entry.handle(node);
        self.toasts.insert(node, entry);
        Some(handle)
    }

    pub fn primary(&mut self, message: &str, options: ToastOptions) -> Option<ToastHandle> {
        self.show(message, options.with_variant(Variant::Primary))
    }

    pub fn secondary(&mut self, message: &str, options: ToastOptions) -> Option<ToastHandle> {
        self.show(message, options.with_variant(Variant::Secondary))
    }

    pub fn success(&mut self, message: &str, options: ToastOptions) -> Option<ToastHandle> {
        self.show(message, options.with_variant(Variant::Success))
    }

    pub fn info(&mut self, message: &str, options: ToastOptions) -> Option<ToastHandle> {
        self.show(message, options.with_variant(Variant::Info))
    }

    pub fn warning(&mut self, message: &str, options: ToastOptions) -> Option<ToastHandle> {
        self.show(message, options.with_variant(Variant::Warning))
    }

    pub fn danger(&mut self, message: &str, options: ToastOptions) -> Option<ToastHandle> {
        self.show(message, options.with_variant(Variant::Danger))
    }

    pub fn dark(&mut self, message: &str, options: ToastOptions) -> Option<ToastHandle> {
        self.show(message, options.with_variant(Variant::Dark))
    }

    pub fn light(&mut self, message: &str, options: ToastOptions) -> Option<ToastHandle> {
        self.show(message, options.with_variant(Variant::Light))
    }

    /// Asks the host widget to hide the toast. Removal follows its hidden
    /// notification.
    pub fn hide(&mut self, handle: &ToastHandle) {
        self.hide_element(handle.element);
    }

    /// Releases the widget instance and removes the element right away, without
    /// waiting for a hidden notification.
    pub fn dispose(&mut self, handle: &ToastHandle) {
        self.dispose_element(handle.element);
    }

    /// Delivers a host event for the toast rooted at `element`.
    pub fn dispatch(&mut self, element: NodeId, event: HostEvent) {
        match event {
            HostEvent::Hidden => self.on_hidden(element),
            HostEvent::PointerEnter => {
                if let Some(entry) = visible_mut(&mut self.toasts, element) {
                    entry.autohide.pointer_enter(&mut self.scheduler, &mut entry.progress);
                }
            }
            HostEvent::PointerLeave => {
                if let Some(entry) = visible_mut(&mut self.toasts, element) {
                    entry.autohide.pointer_leave(&mut self.scheduler, &mut entry.progress);
                }
            }
            HostEvent::Click { target } => self.on_click(element, target),
        }
    }

    /// A timer handed out by the scheduler expired.
    pub fn fire_timer(&mut self, timer: TimerId) {
        let expired = self
            .toasts
            .iter_mut()
            .find_map(|(node, entry)| entry.autohide.expire(timer).then_some(*node));
        match expired {
            Some(element) => {
                debug!(toast = %element, "toast autohide timer expired");
                self.hide_element(element);
            }
            None => debug!(?timer, "stale timer ignored"),
        }
    }

    /// An animation frame requested through the scheduler came due.
    pub fn fire_frame(&mut self, frame: FrameId) {
        let surface = &mut self.surface;
        let scheduler = &mut self.scheduler;
        let drawn = self
            .toasts
            .values_mut()
            .find(|entry| entry.progress.owns_frame(frame))
            .and_then(|entry| entry.progress.on_frame(surface, scheduler, frame));
        if drawn.is_none() {
            debug!(?frame, "stale frame ignored");
        }
    }

    /// `None` for elements that are not (or no longer) live toasts.
    pub fn state(&self, element: NodeId) -> Option<ToastState> {
        self.toasts.get(&element).map(|entry| entry.state)
    }

    pub fn live_count(&self) -> usize {
        self.toasts.len()
    }

    pub fn debug_snapshot(&self, id: &str) -> Option<&DebugSnapshot> {
        self.snapshots.peek(id)
    }

    /// Capacity of the debug snapshot history.
    pub fn debug_history(&self) -> NonZeroUsize {
        self.snapshots.cap()
    }

    pub const fn containers(&self) -> &ContainerRegistry {
        &self.containers
    }

    pub const fn defaults(&self) -> &ToastOptions {
        &self.defaults
    }

    pub const fn surface(&self) -> &S {
        &self.surface
    }

    pub const fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub const fn widget(&self) -> &W {
        &self.widget
    }

    pub const fn widget_mut(&mut self) -> &mut W {
        &mut self.widget
    }

    pub const fn scheduler(&self) -> &C {
        &self.scheduler
    }

    pub const fn scheduler_mut(&mut self) -> &mut C {
        &mut self.scheduler
    }

    fn find_duplicate(&self, container: NodeId, key: &str) -> Option<NodeId> {
        self.surface.children(container).into_iter().find(|child| {
            self.toasts.contains_key(child)
                && self.surface.data(*child, KEY_DATA).as_deref() == Some(key)
        })
    }

    fn on_duplicate(&mut self, existing: NodeId, policy: DuplicatePolicy, key: &str) -> Option<ToastHandle> {
        let entry = self.toasts.get_mut(&existing)?;
        match policy {
            DuplicatePolicy::Ignore => {
                debug!(toast_id = %entry.config.id, key, "duplicate toast ignored");
            }
            DuplicatePolicy::Reshow => {
                debug!(toast_id = %entry.config.id, key, "duplicate toast reshown");
                let instance = self.widget.get_or_create(existing);
                self.widget.show(instance);
                entry.instance = instance;
                entry.state = ToastState::Visible;
                if entry.autohide.is_local() {
                    entry.autohide.start(&mut self.scheduler, &mut entry.progress);
                } else {
                    entry.progress.reset(&mut self.scheduler, entry.config.delay);
                }
                let id = entry.config.id.clone();
                self.update_snapshot(&id, ToastState::Visible);
            }
        }
        self.toasts.get(&existing).map(|entry| entry.handle(existing))
    }

    fn hide_element(&mut self, element: NodeId) {
        let Some(entry) = self.toasts.get_mut(&element) else {
            return;
        };
        entry.autohide.cancel(&mut self.scheduler);
        self.widget.hide(entry.instance);
        if entry.state == ToastState::Visible {
            entry.state = ToastState::Hiding;
            let id = entry.config.id.clone();
            self.update_snapshot(&id, ToastState::Hiding);
        }
    }

    fn dispose_element(&mut self, element: NodeId) {
        let Some(mut entry) = self.toasts.remove(&element) else {
            return;
        };
        self.widget.dispose(entry.instance);
        entry.autohide.cancel(&mut self.scheduler);
        entry.progress.stop(&mut self.scheduler);
        self.hidden.forget(&element);
        self.surface.remove(element);
        self.update_snapshot(&entry.config.id, ToastState::Removed);
        debug!(toast_id = %entry.config.id, "toast disposed");
    }

    fn on_hidden(&mut self, element: NodeId) {
        let cleanups = self.hidden.fire(&element);
        if cleanups.is_empty() {
            debug!(toast = %element, "hidden notification for unknown toast ignored");
            return;
        }
        for cleanup in cleanups {
            match cleanup {
                Cleanup::StopProgress => {
                    if let Some(entry) = self.toasts.get_mut(&element) {
                        entry.progress.stop(&mut self.scheduler);
                    }
                }
                Cleanup::RemoveElement => self.remove_element(element),
            }
        }
    }

    fn remove_element(&mut self, element: NodeId) {
        let Some(mut entry) = self.toasts.remove(&element) else {
            return;
        };
        entry.autohide.cancel(&mut self.scheduler);
        entry.progress.stop(&mut self.scheduler);
        self.surface.remove(element);
        self.update_snapshot(&entry.config.id, ToastState::Removed);
        debug!(toast_id = %entry.config.id, "toast removed");
    }

    fn on_click(&mut self, element: NodeId, target: NodeId) {
        let Some(zone) = classify_click(&self.surface, element, target) else {
            return;
        };
        let Some(entry) = self.toasts.get(&element) else {
            return;
        };
        let context = ToastContext::new(&entry.config.id, element, entry.instance);
        match zone {
            ClickZone::Close => {
                debug!(toast_id = %entry.config.id, "toast closed");
                self.hide_element(element);
            }
            ClickZone::Actions => {}
            ClickZone::Approve => {
                if let Some(handler) = entry.config.on_approve.clone() {
                    invoke_guarded("onApprove", context.id(), || handler.call(&context));
                }
                self.apply_requests(element, context.into_requests());
            }
            ClickZone::Deny => {
                if let Some(handler) = entry.config.on_deny.clone() {
                    invoke_guarded("onDeny", context.id(), || handler.call(&context));
                }
                self.apply_requests(element, context.into_requests());
            }
            ClickZone::Body => {
                let dismiss = entry.config.dismiss_on_click;
                if let Some(handler) = entry.config.on_click.clone() {
                    let event = ClickEvent { target };
                    invoke_guarded("onClick", context.id(), || handler.call(&event, &context));
                }
                self.apply_requests(element, context.into_requests());
                if dismiss {
                    self.hide_element(element);
                }
            }
        }
    }

    fn apply_requests(&mut self, element: NodeId, requests: Requests) {
        if requests.dispose {
            self.dispose_element(element);
        } else if requests.hide {
            self.hide_element(element);
        }
        for (message, options) in requests.shows {
            self.show(&message, options);
        }
    }

    fn record_snapshot(&mut self, entry: &ToastEntry, key: &str) {
        let snapshot = DebugSnapshot {
            id: entry.config.id.clone(),
            state: entry.state,
            started_at: Utc::now(),
            key: key.to_string(),
            mode: Mode::select(&entry.config),
            classes: ResolvedClasses::for_config(&entry.config),
            options: entry.config.clone(),
        };
        match serde_json::to_string(&snapshot) {
            Ok(json) => debug!(toast_id = %snapshot.id, snapshot = %json, "toast debug snapshot"),
            Err(err) => warn!(toast_id = %snapshot.id, error = %err, "toast debug snapshot not serializable"),
        }
        self.snapshots.put(snapshot.id.clone(), snapshot);
    }

    fn update_snapshot(&mut self, id: &str, state: ToastState) {
        if let Some(snapshot) = self.snapshots.peek_mut(id) {
            snapshot.state = state;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ToastState, Toaster};
    use crate::dom::Surface;
    use crate::host::HostEvent;
    use crate::options::ToastOptions;
    use crate::sim::{MemoryDom, SimClock, SimScheduler, SimWidget};
    use crate::types::{Position, Variant};

    fn toaster() -> Toaster<MemoryDom, SimWidget, SimScheduler> {
        let clock = SimClock::new();
        Toaster::new(
            MemoryDom::new(),
            SimWidget::new(clock.clone()),
            SimScheduler::new(clock),
        )
    }

    #[test]
    fn show_inserts_into_the_position_container() {
        let mut toaster = toaster();
        let handle = toaster
            .show(
                "hello",
                ToastOptions {
                    position: Some(Position::BottomCenter),
                    ..ToastOptions::default()
                },
            )
            .unwrap();
        let container = toaster.containers().get(Position::BottomCenter).unwrap();
        assert_eq!(toaster.surface().children(container), vec![handle.element]);
        assert_eq!(toaster.state(handle.element), Some(ToastState::Visible));
        assert_eq!(toaster.widget().show_count(handle.instance), 1);
    }

    #[test]
    fn hidden_notification_removes_exactly_once() {
        let mut toaster = toaster();
        let handle = toaster.show("bye", ToastOptions::default()).unwrap();
        toaster.hide(&handle);
        assert_eq!(toaster.state(handle.element), Some(ToastState::Hiding));
        toaster.dispatch(handle.element, HostEvent::Hidden);
        toaster.dispatch(handle.element, HostEvent::Hidden);
        assert_eq!(toaster.surface().removal_count(handle.element), 1);
        assert_eq!(toaster.state(handle.element), None);
        assert_eq!(toaster.live_count(), 0);
    }

    #[test]
    fn variant_helpers_force_the_variant() {
        let mut toaster = toaster();
        let handle = toaster
            .danger(
                "oops",
                ToastOptions {
                    variant: Some(Variant::Light),
                    debug: Some(true),
                    ..ToastOptions::default()
                },
            )
            .unwrap();
        let snapshot = toaster.debug_snapshot(&handle.id).unwrap();
        assert_eq!(snapshot.options.variant, Variant::Danger);
    }

    #[test]
    fn unavailable_widget_leaves_the_surface_untouched() {
        let mut toaster = toaster();
        toaster.widget_mut().set_available(false);
        assert!(toaster.show("nope", ToastOptions::default()).is_none());
        assert!(toaster.containers().is_empty());
        let body = toaster.surface().body();
        assert!(toaster.surface().children(body).is_empty());
    }

    #[test]
    fn dispose_skips_the_hidden_path() {
        let mut toaster = toaster();
        let handle = toaster.show("gone", ToastOptions::default()).unwrap();
        toaster.dispose(&handle);
        assert!(toaster.widget().is_disposed(handle.instance));
        assert_eq!(toaster.surface().removal_count(handle.element), 1);
        toaster.dispatch(handle.element, HostEvent::Hidden);
        assert_eq!(toaster.surface().removal_count(handle.element), 1);
        assert_eq!(toaster.scheduler().pending_timers(), 0);
    }
}
