//! Click routing and user callback isolation.

use std::cell::RefCell;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;

use tracing::warn;

use crate::dom::{NodeId, Surface};
use crate::error::CallbackFault;
use crate::host::InstanceId;
use crate::options::ToastOptions;
use crate::render::{ACTIONS_CLASS, APPROVE_CLASS, CLOSE_CLASS, DENY_CLASS};

pub type CallbackResult = std::result::Result<(), Box<dyn std::error::Error>>;

/// A click delivered to a toast.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClickEvent {
    pub target: NodeId,
}

/// What a callback sees of its toast.
///
/// `hide`, `dispose` and `show` are requests: they are carried out once the
/// callback has returned.
#[derive(Debug)]
pub struct ToastContext {
    id: String,
    element: NodeId,
    instance: InstanceId,
    requests: RefCell<Requests>,
}

#[derive(Debug, Default)]
pub(crate) struct Requests {
    pub(crate) hide: bool,
    pub(crate) dispose: bool,
    pub(crate) shows: Vec<(String, ToastOptions)>,
}

impl ToastContext {
    pub(crate) fn new(id: &str, element: NodeId, instance: InstanceId) -> Self {
        Self {
            id: id.to_string(),
            element,
            instance,
            requests: RefCell::new(Requests::default()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub const fn element(&self) -> NodeId {
        self.element
    }

    pub const fn instance(&self) -> InstanceId {
        self.instance
    }

    pub fn hide(&self) {
        self.requests.borrow_mut().hide = true;
    }

    pub fn dispose(&self) {
        self.requests.borrow_mut().dispose = true;
    }

    /// Queues another toast, shown right after this callback returns.
    pub fn show(&self, message: impl Into<String>, options: ToastOptions) {
        self.requests
            .borrow_mut()
            .shows
            .push((message.into(), options));
    }

    pub(crate) fn into_requests(self) -> Requests {
        self.requests.into_inner()
    }
}

type ClickFn = dyn Fn(&ClickEvent, &ToastContext) -> CallbackResult;
type ActionFn = dyn Fn(&ToastContext) -> CallbackResult;

/// `onClick` callback.
#[derive(Clone)]
pub struct ClickHandler(Rc<ClickFn>);

impl ClickHandler {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&ClickEvent, &ToastContext) -> CallbackResult + 'static,
    {
        Self(Rc::new(handler))
    }

    pub(crate) fn call(&self, event: &ClickEvent, context: &ToastContext) -> CallbackResult {
        (self.0)(event, context)
    }
}

impl fmt::Debug for ClickHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClickHandler(..)")
    }
}

/// `onApprove` / `onDeny` callback.
#[derive(Clone)]
pub struct ActionHandler(Rc<ActionFn>);

impl ActionHandler {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&ToastContext) -> CallbackResult + 'static,
    {
        Self(Rc::new(handler))
    }

    pub(crate) fn call(&self, context: &ToastContext) -> CallbackResult {
        (self.0)(context)
    }
}

impl fmt::Debug for ActionHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ActionHandler(..)")
    }
}

/// Part of a toast a click landed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickZone {
    Close,
    Approve,
    Deny,
    /// Inside the action row but not on a button.
    Actions,
    Body,
}

/// Classifies `target` relative to the toast rooted at `root`; `None` when the
/// click happened outside the toast.
pub fn classify_click<S: Surface>(surface: &S, root: NodeId, target: NodeId) -> Option<ClickZone> {
    if !surface.contains(root, target) {
        return None;
    }
    let within = |class: &str| {
        surface
            .closest(target, class)
            .is_some_and(|node| surface.contains(root, node))
    };
    let zone = if within(CLOSE_CLASS) {
        ClickZone::Close
    } else if within(APPROVE_CLASS) {
        ClickZone::Approve
    } else if within(DENY_CLASS) {
        ClickZone::Deny
    } else if within(ACTIONS_CLASS) {
        ClickZone::Actions
    } else {
        ClickZone::Body
    };
    Some(zone)
}

/// Runs a user callback, turning errors and panics into a logged [`CallbackFault`].
pub(crate) fn invoke_guarded<F>(callback: &'static str, toast_id: &str, run: F) -> Option<CallbackFault>
where
    F: FnOnce() -> CallbackResult,
{
    let fault = match catch_unwind(AssertUnwindSafe(run)) {
        Ok(Ok(())) => return None,
        Ok(Err(err)) => CallbackFault::Failed {
            callback,
            message: err.to_string(),
        },
        Err(payload) => CallbackFault::Panicked {
            callback,
            message: panic_message(payload.as_ref()),
        },
    };
    warn!(toast_id, callback = fault.callback(), error = %fault, "toast callback fault ignored");
    Some(fault)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string())
}

#[cfg(test)]
mod tests {
    use super::{ClickZone, ToastContext, classify_click, invoke_guarded};
    use crate::dom::{Element, NodeId, Surface};
    use crate::error::CallbackFault;
    use crate::host::InstanceId;
    use crate::options::{ToastOptions, normalize};
    use crate::render::build;
    use crate::sim::MemoryDom;

    #[test]
    fn guarded_callback_passes_success_through() {
        assert!(invoke_guarded("onClick", "t", || Ok(())).is_none());
    }

    #[test]
    fn guarded_callback_swallows_errors() {
        let fault = invoke_guarded("onApprove", "t", || Err("backend offline".into()));
        match fault {
            Some(CallbackFault::Failed { callback, message }) => {
                assert_eq!(callback, "onApprove");
                assert_eq!(message, "backend offline");
            }
            other => panic!("unexpected fault: {other:?}"),
        }
    }

    #[test]
    fn guarded_callback_swallows_panics() {
        let fault = invoke_guarded("onDeny", "t", || panic!("boom"));
        assert!(matches!(
            fault,
            Some(CallbackFault::Panicked { callback: "onDeny", ref message }) if message == "boom"
        ));
    }

    #[test]
    fn context_collects_requests() {
        let context = ToastContext::new("t", crate::dom::NodeId::new(1), InstanceId::new(7));
        context.hide();
        context.show("next", ToastOptions::default());
        let requests = context.into_requests();
        assert!(requests.hide);
        assert!(!requests.dispose);
        assert_eq!(requests.shows.len(), 1);
    }

    #[test]
    fn clicks_are_classified_by_control() {
        let options = ToastOptions {
            title: Some("Sync".into()),
            approve_text: Some("Retry".into()),
            deny_text: Some("Skip".into()),
            ..ToastOptions::default()
        };
        let mut dom = MemoryDom::new();
        let root = dom.create(build("Upload failed", &normalize(&options)));
        let find = |dom: &MemoryDom, class: &str| dom.query(root, class);

        let close = find(&dom, "btn-close");
        let approve = find(&dom, "bt-approve");
        let deny = find(&dom, "bt-deny");
        let actions = find(&dom, "bt-actions");
        let body = find(&dom, "toast-body");
        assert!(close.is_some() && approve.is_some() && deny.is_some());

        let zone = |target: Option<NodeId>| target.and_then(|t| classify_click(&dom, root, t));
        assert_eq!(zone(close), Some(ClickZone::Close));
        assert_eq!(zone(approve), Some(ClickZone::Approve));
        assert_eq!(zone(deny), Some(ClickZone::Deny));
        assert_eq!(zone(actions), Some(ClickZone::Actions));
        assert_eq!(zone(body), Some(ClickZone::Body));

        let stranger = dom.create(Element::div());
        assert_eq!(classify_click(&dom, root, stranger), None);
    }
}
