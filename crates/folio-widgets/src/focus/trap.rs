#![forbid(unsafe_code)]

//! Tab/Shift+Tab containment inside an open overlay.
//!
//! # Invariants
//!
//! - The focusable list is recomputed from the document on every key event;
//!   overlay content may change while it is open (a lightbox swapping its
//!   image, a menu loading links).
//! - Order is document order restricted to interactive elements: links with
//!   `href`, buttons, inputs (except `type=hidden`), selects, textareas, and
//!   anything with an explicit `tabindex >= 0`. A negative `tabindex` removes
//!   even a native control from the list. Disabled and unrendered elements
//!   are skipped.
//! - Tab on the last element wraps to the first; Shift+Tab on the first
//!   wraps to the last. Both cancel the platform's own focus movement.
//!   Between those edges the platform moves focus itself.

use folio_core::platform::Document;
use folio_core::ElementId;

/// Whether `id` takes part in sequential keyboard navigation.
#[must_use]
pub fn is_focusable<D: Document + ?Sized>(doc: &D, id: &ElementId) -> bool {
    if !doc.is_rendered(id) || doc.attribute(id, "disabled").is_some() {
        return false;
    }
    if let Some(order) = doc.attribute(id, "tabindex") {
        return order.trim().parse::<i32>().is_ok_and(|n| n >= 0);
    }
    match doc.tag(id).as_deref() {
        Some("a" | "area") => doc.attribute(id, "href").is_some(),
        Some("input") => doc.attribute(id, "type").is_none_or(|t| t != "hidden"),
        Some("button" | "select" | "textarea") => true,
        _ => false,
    }
}

/// Focusable descendants of `root` in document order.
#[must_use]
pub fn focusable_within<D: Document + ?Sized>(doc: &D, root: &ElementId) -> Vec<ElementId> {
    doc.descendants(root)
        .into_iter()
        .filter(|id| is_focusable(doc, id))
        .collect()
}

/// What the trap did with a Tab press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrapMove {
    /// Focus was on an edge and wrapped around to the other end.
    Wrapped(ElementId),
    /// Focus was outside the focusable list (on the overlay itself, or lost)
    /// and was pulled back in.
    Entered(ElementId),
    /// Nothing inside is focusable; focus stays on the overlay.
    Held,
    /// Focus is strictly inside the list; let the platform move it.
    Pass,
}

impl TrapMove {
    /// Whether the platform's default Tab handling must be cancelled.
    #[inline]
    #[must_use]
    pub fn prevents_default(&self) -> bool {
        !matches!(self, Self::Pass)
    }
}

/// Focus trap bound to one overlay element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusTrap {
    root: ElementId,
}

impl FocusTrap {
    #[must_use]
    pub fn new(root: impl Into<ElementId>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &ElementId {
        &self.root
    }

    /// Handle Tab (`backwards == false`) or Shift+Tab.
    pub fn on_tab<D: Document + ?Sized>(&self, doc: &mut D, backwards: bool) -> TrapMove {
        let focusables = focusable_within(&*doc, &self.root);
        let (Some(first), Some(last)) = (focusables.first(), focusables.last()) else {
            return TrapMove::Held;
        };
        let current = doc.active_element();
        let position = current
            .as_ref()
            .and_then(|c| focusables.iter().position(|f| f == c));

        let target = match position {
            None => {
                let target = if backwards { last } else { first };
                doc.focus(target);
                return TrapMove::Entered(target.clone());
            }
            Some(0) if backwards => last,
            Some(n) if !backwards && n + 1 == focusables.len() => first,
            Some(_) => return TrapMove::Pass,
        };
        doc.focus(target);
        TrapMove::Wrapped(target.clone())
    }
}
