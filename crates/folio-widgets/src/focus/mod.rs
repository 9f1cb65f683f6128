#![forbid(unsafe_code)]

//! Focus management: remembering and restoring focus around overlays, soft
//! focus for drawer panels, and the Tab trap (see [`trap`]).
//!
//! # Ownership
//!
//! The [`FocusManager`] is the only writer of "previously focused element"
//! state. Overlays hold an opaque [`FocusToken`] for the duration they are
//! open; the element itself stays in the manager. Restoring consumes the
//! token, so a token can be honoured at most once.
//!
//! # Failure Modes
//!
//! - `restore` for an element that has been removed from the document (or is
//!   no longer focusable) is a no-op returning `false`.
//! - `land` on a missing element returns `false`.
//! - Nothing here panics.

pub mod trap;

use ahash::AHashMap;
use folio_core::platform::Document;
use folio_core::ElementId;

pub use trap::{FocusTrap, TrapMove, focusable_within, is_focusable};

/// Handle to a remembered focus position.
#[derive(Debug, PartialEq, Eq, Hash)]
#[must_use = "a token that is never restored or discarded leaks its slot"]
pub struct FocusToken(u64);

/// Scoped acquisition/release of keyboard focus.
#[derive(Debug, Default)]
pub struct FocusManager {
    next: u64,
    remembered: AHashMap<u64, Option<ElementId>>,
}

impl FocusManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the currently focused element (possibly none).
    pub fn remember<D: Document + ?Sized>(&mut self, doc: &D) -> FocusToken {
        let token = self.next;
        self.next += 1;
        self.remembered.insert(token, doc.active_element());
        FocusToken(token)
    }

    /// Return focus to the element captured by `token` if it is still
    /// attached. Releases the slot either way.
    pub fn restore<D: Document + ?Sized>(&mut self, token: FocusToken, doc: &mut D) -> bool {
        let Some(Some(target)) = self.remembered.remove(&token.0) else {
            return false;
        };
        if !doc.contains(&target) {
            #[cfg(feature = "tracing")]
            tracing::debug!(element = %target, "focus restore target detached");
            return false;
        }
        doc.focus(&target)
    }

    /// Release a token without moving focus.
    pub fn discard(&mut self, token: FocusToken) {
        self.remembered.remove(&token.0);
    }

    /// The element a token will restore to.
    #[must_use]
    pub fn remembered(&self, token: &FocusToken) -> Option<&ElementId> {
        self.remembered.get(&token.0).and_then(Option::as_ref)
    }

    /// Number of outstanding tokens.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.remembered.len()
    }

    /// Soft focus: move focus onto `target` without trapping it there.
    ///
    /// Non-interactive targets (a drawer panel, an overlay without
    /// focusable content) are made programmatically focusable with
    /// `tabindex="-1"` first, which keeps them out of the Tab order.
    pub fn land<D: Document + ?Sized>(&self, target: &ElementId, doc: &mut D) -> bool {
        if !doc.contains(target) {
            return false;
        }
        if !is_focusable(&*doc, target) && doc.attribute(target, "tabindex").is_none() {
            doc.set_attribute(target, "tabindex", "-1");
        }
        doc.focus(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_harness::{ElementSpec, HeadlessDocument};

    fn page() -> HeadlessDocument {
        let mut doc = HeadlessDocument::new();
        doc.append("body", ElementSpec::new("button").id("trigger"));
        doc.append("body", ElementSpec::new("div").id("panel"));
        doc
    }

    #[test]
    fn remember_then_restore_returns_focus() {
        let mut doc = page();
        let mut focus = FocusManager::new();
        let id = ElementId::new("trigger");
        assert!(doc.focus(&id));

        let token = focus.remember(&doc);
        assert_eq!(focus.remembered(&token), Some(&id));
        assert!(focus.land(&ElementId::new("panel"), &mut doc));
        assert_eq!(doc.active_element(), Some(ElementId::new("panel")));

        assert!(focus.restore(token, &mut doc));
        assert_eq!(doc.active_element(), Some(id));
        assert_eq!(focus.outstanding(), 0);
    }

    #[test]
    fn restore_to_detached_element_is_noop() {
        let mut doc = page();
        let mut focus = FocusManager::new();
        assert!(doc.focus(&ElementId::new("trigger")));
        let token = focus.remember(&doc);
        doc.remove("trigger");

        assert!(!focus.restore(token, &mut doc));
        assert_eq!(doc.active_element(), None);
        assert_eq!(focus.outstanding(), 0);
    }

    #[test]
    fn restore_with_nothing_remembered() {
        let mut doc = page();
        let mut focus = FocusManager::new();
        let token = focus.remember(&doc);
        assert!(focus.remembered(&token).is_none());
        assert!(!focus.restore(token, &mut doc));
    }

    #[test]
    fn land_marks_plain_elements_programmatically_focusable() {
        let mut doc = page();
        let focus = FocusManager::new();
        let panel = ElementId::new("panel");
        assert!(focus.land(&panel, &mut doc));
        assert_eq!(doc.attribute(&panel, "tabindex").as_deref(), Some("-1"));
        assert!(!focus.land(&ElementId::new("nope"), &mut doc));
    }

    #[test]
    fn discard_releases_without_moving() {
        let mut doc = page();
        let mut focus = FocusManager::new();
        assert!(doc.focus(&ElementId::new("trigger")));
        let token = focus.remember(&doc);
        focus.discard(token);
        assert_eq!(focus.outstanding(), 0);
    }
}
