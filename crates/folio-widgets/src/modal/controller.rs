#![forbid(unsafe_code)]

//! Open/close lifecycle for one modal overlay.
//!
//! ```text
//!            open()                     close() / backdrop / Escape / native dismissal
//!  Closed ───────────▶ Open ───────────────────────────────────────────────▶ Closed
//! ```
//!
//! Transitions are synchronous. Every close trigger converges on
//! [`ModalController::close`], so the trigger indicator and focus restore
//! stay correct no matter which one fires, or how many fire for the same
//! keypress.
//!
//! # Invariants
//!
//! - While open, the controller holds exactly one [`FocusToken`]; it is
//!   released on close.
//! - The trigger's `aria-expanded` mirrors the open state.
//! - `open` on an open overlay and `close` on a closed one change nothing.
//!
//! # Failure Modes
//!
//! - Overlay element missing: `open` returns `Unchanged(MissingOverlay)`.
//! - Missing trigger or close control: those parts are skipped, the overlay
//!   still works.
//! - Prior focus target removed while open: focus is not restored (no panic).

use folio_core::platform::{Document, Platform};
use folio_core::{ElementId, Miss};

use crate::focus::{FocusManager, FocusToken, FocusTrap, TrapMove, focusable_within};

/// The elements that make up an overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayParts {
    /// The overlay container (e.g. a `<dialog>`). A click whose target is this
    /// element itself is a backdrop click.
    pub overlay: ElementId,
    /// Control whose expansion indicator mirrors the open state.
    pub trigger: Option<ElementId>,
    /// Explicit close control inside the overlay.
    pub close: Option<ElementId>,
    /// Attribute written on the trigger.
    pub expanded_attr: String,
}

impl OverlayParts {
    #[must_use]
    pub fn new(overlay: impl Into<ElementId>) -> Self {
        Self {
            overlay: overlay.into(),
            trigger: None,
            close: None,
            expanded_attr: "aria-expanded".to_owned(),
        }
    }

    #[must_use]
    pub fn trigger(mut self, trigger: impl Into<ElementId>) -> Self {
        self.trigger = Some(trigger.into());
        self
    }

    #[must_use]
    pub fn close(mut self, close: impl Into<ElementId>) -> Self {
        self.close = Some(close.into());
        self
    }
}

/// Open/closed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    Open,
}

/// Result of a lifecycle request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalTransition {
    Opened,
    Closed,
    Unchanged(Miss),
}

impl ModalTransition {
    #[must_use]
    pub fn changed(&self) -> bool {
        !matches!(self, Self::Unchanged(_))
    }
}

/// Why a click closes the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseTarget {
    CloseControl,
    Backdrop,
}

/// Lifecycle controller for one overlay.
#[derive(Debug)]
pub struct ModalController {
    parts: OverlayParts,
    trap: Option<FocusTrap>,
    state: ModalState,
    prior: Option<FocusToken>,
}

impl ModalController {
    /// A controller that traps Tab while open.
    #[must_use]
    pub fn new(parts: OverlayParts) -> Self {
        let trap = Some(FocusTrap::new(parts.overlay.clone()));
        Self {
            parts,
            trap,
            state: ModalState::Closed,
            prior: None,
        }
    }

    /// Enable or disable the Tab trap.
    #[must_use]
    pub fn with_trap(mut self, enabled: bool) -> Self {
        self.trap = enabled.then(|| FocusTrap::new(self.parts.overlay.clone()));
        self
    }

    #[must_use]
    pub fn parts(&self) -> &OverlayParts {
        &self.parts
    }

    #[must_use]
    pub fn state(&self) -> ModalState {
        self.state
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == ModalState::Open
    }

    #[must_use]
    pub fn traps_focus(&self) -> bool {
        self.trap.is_some()
    }

    /// Why [`open`](Self::open) would be a no-op right now, if it would.
    ///
    /// Lets a caller check before it disturbs anything else on the page.
    #[must_use]
    pub fn open_blocker<P: Platform + ?Sized>(&self, platform: &P) -> Option<Miss> {
        if self.is_open() {
            return Some(Miss::AlreadyOpen);
        }
        if !platform.contains(&self.parts.overlay) {
            return Some(Miss::MissingOverlay(self.parts.overlay.to_string()));
        }
        None
    }

    /// Closed → Open.
    ///
    /// Remembers the focused element, presents the overlay modally, flips
    /// the trigger indicator on and focuses the first focusable descendant
    /// (or the overlay itself when it has none).
    pub fn open<P: Platform + ?Sized>(
        &mut self,
        platform: &mut P,
        focus: &mut FocusManager,
    ) -> ModalTransition {
        if let Some(miss) = self.open_blocker(&*platform) {
            #[cfg(feature = "tracing")]
            tracing::debug!(overlay = %self.parts.overlay, reason = %miss, "open ignored");
            return ModalTransition::Unchanged(miss);
        }
        let overlay = self.parts.overlay.clone();

        self.prior = Some(focus.remember(&*platform));
        platform.show_modal(&overlay);
        self.state = ModalState::Open;
        self.set_indicator(platform, true);

        match focusable_within(&*platform, &overlay).first() {
            Some(first) => {
                platform.focus(first);
            }
            None => {
                focus.land(&overlay, platform);
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(overlay = %overlay, "overlay opened");
        ModalTransition::Opened
    }

    /// Open → Closed.
    ///
    /// Hides the overlay (a no-op on the platform side if it already closed
    /// itself), flips the trigger indicator off and restores focus.
    pub fn close<P: Platform + ?Sized>(
        &mut self,
        platform: &mut P,
        focus: &mut FocusManager,
    ) -> ModalTransition {
        if !self.is_open() {
            return ModalTransition::Unchanged(Miss::AlreadyClosed);
        }
        self.state = ModalState::Closed;
        platform.hide(&self.parts.overlay);
        self.set_indicator(platform, false);
        if let Some(token) = self.prior.take() {
            focus.restore(token, platform);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(overlay = %self.parts.overlay, "overlay closed");
        ModalTransition::Closed
    }

    /// The platform dismissed the overlay on its own. Brings the controller
    /// back in line through the regular close path.
    pub fn on_dismissed<P: Platform + ?Sized>(
        &mut self,
        platform: &mut P,
        focus: &mut FocusManager,
    ) -> ModalTransition {
        self.close(platform, focus)
    }

    /// Apply the Tab trap. `None` when closed or untrapped.
    pub fn on_tab<D: Document + ?Sized>(&self, doc: &mut D, backwards: bool) -> Option<TrapMove> {
        if !self.is_open() {
            return None;
        }
        self.trap.as_ref().map(|trap| trap.on_tab(doc, backwards))
    }

    /// Classify a click. The close control matches on any element inside
    /// it; the backdrop only when the overlay element itself is the target.
    #[must_use]
    pub fn close_target<D: Document + ?Sized>(
        &self,
        doc: &D,
        target: &ElementId,
    ) -> Option<CloseTarget> {
        if !self.is_open() {
            return None;
        }
        if *target == self.parts.overlay {
            return Some(CloseTarget::Backdrop);
        }
        match &self.parts.close {
            Some(close) if doc.is_within(close, target) => Some(CloseTarget::CloseControl),
            _ => None,
        }
    }

    /// Whether `target` is (inside) the trigger control.
    #[must_use]
    pub fn is_trigger<D: Document + ?Sized>(&self, doc: &D, target: &ElementId) -> bool {
        self.parts
            .trigger
            .as_ref()
            .is_some_and(|trigger| doc.is_within(trigger, target))
    }

    fn set_indicator<D: Document + ?Sized>(&self, doc: &mut D, expanded: bool) {
        if let Some(trigger) = &self.parts.trigger {
            let value = if expanded { "true" } else { "false" };
            doc.set_attribute(trigger, &self.parts.expanded_attr, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::platform::OverlayHost;
    use folio_harness::{HeadlessDocument, standard_page};

    fn id(s: &str) -> ElementId {
        ElementId::new(s)
    }

    fn nav() -> ModalController {
        ModalController::new(OverlayParts::new("nav-modal").trigger("nav-toggle").close("nav-close"))
    }

    fn opened() -> (HeadlessDocument, ModalController, FocusManager) {
        let mut doc = standard_page();
        let mut focus = FocusManager::new();
        let mut modal = nav();
        assert!(doc.focus(&id("nav-toggle")));
        assert_eq!(modal.open(&mut doc, &mut focus), ModalTransition::Opened);
        (doc, modal, focus)
    }

    #[test]
    fn open_presents_modal_and_moves_focus_inside() {
        let (doc, modal, focus) = opened();
        assert!(modal.is_open());
        assert!(doc.is_open(&id("nav-modal")));
        assert!(doc.is_inert("main"));
        assert_eq!(
            doc.attribute(&id("nav-toggle"), "aria-expanded").as_deref(),
            Some("true")
        );
        assert_eq!(doc.active_element(), Some(id("nav-close")));
        assert_eq!(focus.outstanding(), 1);
    }

    #[test]
    fn close_restores_focus_and_indicator() {
        let (mut doc, mut modal, mut focus) = opened();
        assert_eq!(modal.close(&mut doc, &mut focus), ModalTransition::Closed);
        assert!(!doc.is_open(&id("nav-modal")));
        assert_eq!(
            doc.attribute(&id("nav-toggle"), "aria-expanded").as_deref(),
            Some("false")
        );
        assert_eq!(doc.active_element(), Some(id("nav-toggle")));
        assert_eq!(focus.outstanding(), 0);
    }

    #[test]
    fn repeated_transitions_are_noops() {
        let (mut doc, mut modal, mut focus) = opened();
        assert_eq!(
            modal.open(&mut doc, &mut focus),
            ModalTransition::Unchanged(Miss::AlreadyOpen)
        );
        assert_eq!(focus.outstanding(), 1);

        modal.close(&mut doc, &mut focus);
        assert!(doc.focus(&id("A-header")));
        assert_eq!(
            modal.close(&mut doc, &mut focus),
            ModalTransition::Unchanged(Miss::AlreadyClosed)
        );
        assert_eq!(doc.active_element(), Some(id("A-header")));
    }

    #[test]
    fn native_dismissal_converges_on_close() {
        let (mut doc, mut modal, mut focus) = opened();
        doc.dismiss("nav-modal");
        assert_eq!(modal.on_dismissed(&mut doc, &mut focus), ModalTransition::Closed);
        assert_eq!(doc.active_element(), Some(id("nav-toggle")));
        assert_eq!(
            modal.on_dismissed(&mut doc, &mut focus),
            ModalTransition::Unchanged(Miss::AlreadyClosed)
        );
    }

    #[test]
    fn missing_overlay_is_ignored() {
        let mut doc = HeadlessDocument::new();
        let mut focus = FocusManager::new();
        let mut modal = nav();
        assert_eq!(
            modal.open_blocker(&doc),
            Some(Miss::MissingOverlay("nav-modal".into()))
        );
        assert_eq!(
            modal.open(&mut doc, &mut focus),
            ModalTransition::Unchanged(Miss::MissingOverlay("nav-modal".into()))
        );
        assert!(!modal.is_open());
        assert_eq!(focus.outstanding(), 0);
    }

    #[test]
    fn empty_overlay_focuses_itself() {
        let mut doc = HeadlessDocument::new();
        doc.append("body", folio_harness::ElementSpec::new("dialog").id("bare"));
        let mut focus = FocusManager::new();
        let mut modal = ModalController::new(OverlayParts::new("bare"));
        modal.open(&mut doc, &mut focus);
        assert_eq!(doc.active_element(), Some(id("bare")));
    }

    #[test]
    fn click_classification() {
        let (doc, modal, _) = opened();
        assert_eq!(
            modal.close_target(&doc, &id("nav-modal")),
            Some(CloseTarget::Backdrop)
        );
        assert_eq!(
            modal.close_target(&doc, &id("nav-close")),
            Some(CloseTarget::CloseControl)
        );
        assert_eq!(modal.close_target(&doc, &id("nav-link-A")), None);
        assert!(modal.is_trigger(&doc, &id("nav-toggle")));
        assert!(!modal.is_trigger(&doc, &id("nav-close")));
    }

    #[test]
    fn tab_trap_only_while_open_and_enabled() {
        let (mut doc, mut modal, mut focus) = opened();
        assert!(doc.focus(&id("nav-link-B")));
        assert_eq!(
            modal.on_tab(&mut doc, false),
            Some(TrapMove::Wrapped(id("nav-close")))
        );
        modal.close(&mut doc, &mut focus);
        assert_eq!(modal.on_tab(&mut doc, false), None);

        let untrapped = nav().with_trap(false);
        assert!(!untrapped.traps_focus());
    }
}
