#![forbid(unsafe_code)]

//! Platform capability traits.
//!
//! The core is written against these traits only. A browser adapter maps
//! them onto the DOM (`querySelectorAll`, `dialog.showModal()`,
//! `scrollIntoView`, `history.replaceState`); the headless document in
//! `folio-harness` implements them in memory for tests.
//!
//! # Contract for implementors
//!
//! - Every method must tolerate ids that do not resolve: getters return
//!   `None`/`false`/empty, setters do nothing. The core relies on this to
//!   degrade to no-ops instead of failing.
//! - Element order returned by [`Document::query_all`] and
//!   [`Document::descendants`] is document (tree) order.
//! - [`Location::replace_fragment`] must replace the current history entry,
//!   never push a new one.

use crate::ElementId;

/// Read/write access to the element tree.
pub trait Document {
    /// Whether `id` resolves to an element attached to the document.
    fn contains(&self, id: &ElementId) -> bool;

    /// All elements matching `selector`, in document order.
    ///
    /// Selectors are opaque to the core; they come from configuration and
    /// only need to be understood by the adapter.
    fn query_all(&self, selector: &str) -> Vec<ElementId>;

    /// First descendant of `root` matching `selector`.
    fn query_within(&self, root: &ElementId, selector: &str) -> Option<ElementId>;

    /// Nearest inclusive ancestor of `id` matching `selector`.
    fn closest(&self, id: &ElementId, selector: &str) -> Option<ElementId>;

    /// Whether `ancestor` is `id` or contains it.
    fn is_within(&self, ancestor: &ElementId, id: &ElementId) -> bool;

    /// Descendants of `root` (excluding `root`) in document order.
    fn descendants(&self, root: &ElementId) -> Vec<ElementId>;

    /// Lowercase tag name.
    fn tag(&self, id: &ElementId) -> Option<String>;

    fn attribute(&self, id: &ElementId, name: &str) -> Option<String>;

    fn set_attribute(&mut self, id: &ElementId, name: &str, value: &str);

    fn set_text(&mut self, id: &ElementId, text: &str);

    /// Show or hide a single element.
    fn set_hidden(&mut self, id: &ElementId, hidden: bool);

    /// Whether the element is displayed: attached, and neither it nor any
    /// ancestor is hidden.
    fn is_rendered(&self, id: &ElementId) -> bool;

    /// The element holding keyboard focus, if any.
    fn active_element(&self) -> Option<ElementId>;

    /// Move keyboard focus. Returns whether focus actually landed.
    fn focus(&mut self, id: &ElementId) -> bool;
}

/// Native-or-emulated modal presentation.
pub trait OverlayHost {
    /// Present `overlay` modally. While shown, everything outside it must be
    /// inert to pointer, keyboard and assistive technology.
    fn show_modal(&mut self, overlay: &ElementId);

    /// Dismiss `overlay`. Dismissing a closed overlay does nothing.
    fn hide(&mut self, overlay: &ElementId);

    fn is_open(&self, overlay: &ElementId) -> bool;
}

/// How a scroll request should animate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
    #[default]
    Smooth,
    Instant,
}

pub trait Scroller {
    /// Ask for `id` to be scrolled into view.
    fn bring_into_view(&mut self, id: &ElementId, behavior: ScrollBehavior);
}

/// The document address.
pub trait Location {
    /// The raw fragment including its leading `#`, or an empty string.
    fn fragment(&self) -> String;

    /// Replace the current history entry's fragment. An empty string clears
    /// the fragment (the address keeps path and query).
    fn replace_fragment(&mut self, fragment: &str);
}

/// Everything the core needs from its host.
pub trait Platform: Document + OverlayHost + Scroller + Location {}

impl<T: Document + OverlayHost + Scroller + Location> Platform for T {}
