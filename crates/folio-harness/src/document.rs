#![forbid(unsafe_code)]

//! In-memory document implementing every folio platform capability.
//!
//! [`HeadlessDocument`] is a small element tree with just enough browser
//! behaviour to exercise the core honestly:
//!
//! - closed `<dialog>` elements and everything under a `hidden` element are
//!   not rendered, and unrendered elements cannot take focus;
//! - while an overlay is shown modally, everything outside the topmost one is
//!   inert and refuses focus;
//! - removing a subtree that holds focus drops focus back to nothing;
//! - fragment replacement rewrites the current history entry, while
//!   [`HeadlessDocument::navigate`] pushes one, like following a link.
//!
//! Every request the core makes is recorded (scrolls, fragment writes) so
//! tests can assert on side effects as well as state.

use std::collections::BTreeMap;

use ahash::AHashMap;
use folio_core::platform::{Document, Location, OverlayHost, ScrollBehavior, Scroller};
use folio_core::ElementId;

use crate::selector::Selector;

/// Declarative description of an element to append.
#[derive(Debug, Clone)]
pub struct ElementSpec {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, String)>,
    text: String,
    hidden: bool,
}

impl ElementSpec {
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            id: None,
            classes: Vec::new(),
            attrs: Vec::new(),
            text: String::new(),
            hidden: false,
        }
    }

    #[must_use]
    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_owned());
        self
    }

    #[must_use]
    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_owned());
        self
    }

    #[must_use]
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.push((name.to_owned(), value.to_owned()));
        self
    }

    #[must_use]
    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_owned();
        self
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}

/// One recorded scroll request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollRecord {
    pub target: ElementId,
    pub behavior: ScrollBehavior,
}

#[derive(Debug, Clone)]
struct Node {
    id: ElementId,
    tag: String,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
    text: String,
    hidden: bool,
    parent: Option<usize>,
    children: Vec<usize>,
    attached: bool,
}

/// Headless stand-in for a browser document, its location and history.
#[derive(Debug, Clone)]
pub struct HeadlessDocument {
    nodes: Vec<Node>,
    by_id: AHashMap<String, usize>,
    root: usize,
    next_auto: u32,
    active: Option<usize>,
    fragment: String,
    history: Vec<String>,
    fragment_writes: usize,
    modal: Vec<usize>,
    scrolls: Vec<ScrollRecord>,
}

impl Default for HeadlessDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessDocument {
    /// An empty document containing only `<body id="body">`.
    #[must_use]
    pub fn new() -> Self {
        let body = Node {
            id: ElementId::new("body"),
            tag: "body".to_owned(),
            classes: Vec::new(),
            attrs: BTreeMap::new(),
            text: String::new(),
            hidden: false,
            parent: None,
            children: Vec::new(),
            attached: true,
        };
        let mut by_id = AHashMap::new();
        by_id.insert("body".to_owned(), 0);
        Self {
            nodes: vec![body],
            by_id,
            root: 0,
            next_auto: 0,
            active: None,
            fragment: String::new(),
            history: vec![String::new()],
            fragment_writes: 0,
            modal: Vec::new(),
            scrolls: Vec::new(),
        }
    }

    /// Set the fragment the page was loaded with. Does not add history.
    #[must_use]
    pub fn with_fragment(mut self, raw: &str) -> Self {
        self.fragment = raw.to_owned();
        if let Some(entry) = self.history.last_mut() {
            *entry = raw.to_owned();
        }
        self
    }

    /// The `<body>` element.
    #[must_use]
    pub fn body(&self) -> ElementId {
        self.nodes[self.root].id.clone()
    }

    /// Append an element under `parent` and return its id. Elements without
    /// an explicit id get a generated `node-N` one.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not an attached element or the id is taken;
    /// both are fixture bugs.
    pub fn append(&mut self, parent: &str, spec: ElementSpec) -> ElementId {
        let parent_ix = match self.by_id.get(parent) {
            Some(&ix) => ix,
            None => panic!("append: no attached parent {parent:?}"),
        };
        let id = match spec.id {
            Some(id) => id,
            None => {
                self.next_auto += 1;
                format!("node-{}", self.next_auto)
            }
        };
        assert!(
            !self.by_id.contains_key(&id),
            "append: duplicate element id {id:?}"
        );

        let ix = self.nodes.len();
        self.nodes.push(Node {
            id: ElementId::new(id.clone()),
            tag: spec.tag,
            classes: spec.classes,
            attrs: spec.attrs.into_iter().collect(),
            text: spec.text,
            hidden: spec.hidden,
            parent: Some(parent_ix),
            children: Vec::new(),
            attached: true,
        });
        self.nodes[parent_ix].children.push(ix);
        self.by_id.insert(id, ix);
        self.nodes[ix].id.clone()
    }

    /// Detach `id` and its subtree. Focus inside the subtree is dropped and
    /// overlays inside it stop being open.
    pub fn remove(&mut self, id: &str) {
        let Some(&ix) = self.by_id.get(id) else {
            return;
        };
        if ix == self.root {
            return;
        }
        if let Some(parent) = self.nodes[ix].parent {
            self.nodes[parent].children.retain(|&c| c != ix);
        }
        let mut subtree = vec![ix];
        subtree.extend(self.preorder(ix));
        for n in subtree {
            self.nodes[n].attached = false;
            let key = self.nodes[n].id.as_str().to_owned();
            self.by_id.remove(&key);
            if self.active == Some(n) {
                self.active = None;
            }
            self.modal.retain(|&m| m != n);
        }
    }

    /// Follow an in-page link or type a new fragment: pushes a history entry.
    /// The host is responsible for then dispatching `Event::FragmentChanged`.
    pub fn navigate(&mut self, raw: &str) {
        self.fragment = raw.to_owned();
        self.history.push(raw.to_owned());
    }

    /// Step back one history entry. Returns whether there was one.
    pub fn back(&mut self) -> bool {
        if self.history.len() < 2 {
            return false;
        }
        self.history.pop();
        self.fragment = self.history.last().cloned().unwrap_or_default();
        true
    }

    /// Close an overlay the way the platform does on its own (e.g. a native
    /// dialog's built-in Escape handling), without going through the core.
    pub fn dismiss(&mut self, overlay: &str) {
        if let Some(&ix) = self.by_id.get(overlay) {
            self.close_overlay(ix);
        }
    }

    /// Put focus on `id` the way a user click would, bypassing focusability
    /// rules for non-interactive elements but still honouring inertness.
    pub fn click_focus(&mut self, id: &str) -> bool {
        match self.by_id.get(id) {
            Some(&ix) if !self.inert_ix(ix) => {
                self.active = Some(ix);
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Number of `replace_fragment` calls observed.
    #[must_use]
    pub fn fragment_writes(&self) -> usize {
        self.fragment_writes
    }

    #[must_use]
    pub fn scrolls(&self) -> &[ScrollRecord] {
        &self.scrolls
    }

    #[must_use]
    pub fn text(&self, id: &str) -> Option<&str> {
        self.by_id.get(id).map(|&ix| self.nodes[ix].text.as_str())
    }

    /// The element's own `hidden` flag (not inherited visibility).
    #[must_use]
    pub fn is_hidden(&self, id: &str) -> bool {
        self.by_id
            .get(id)
            .is_some_and(|&ix| self.nodes[ix].hidden)
    }

    /// Whether `id` is inert because a modal overlay outside it is open.
    #[must_use]
    pub fn is_inert(&self, id: &str) -> bool {
        self.by_id.get(id).is_some_and(|&ix| self.inert_ix(ix))
    }

    /// Open overlays, oldest first.
    #[must_use]
    pub fn open_overlays(&self) -> Vec<ElementId> {
        self.modal.iter().map(|&ix| self.nodes[ix].id.clone()).collect()
    }

    fn ix(&self, id: &ElementId) -> Option<usize> {
        self.by_id.get(id.as_str()).copied()
    }

    fn preorder(&self, start: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack: Vec<usize> = self.nodes[start].children.iter().rev().copied().collect();
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.nodes[n].children.iter().rev().copied());
        }
        out
    }

    fn ancestors_inclusive(&self, ix: usize) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(Some(ix), move |&n| self.nodes[n].parent)
    }

    fn matches(&self, ix: usize, sel: &Selector) -> bool {
        let node = &self.nodes[ix];
        if sel.tag.as_deref().is_some_and(|t| t != node.tag) {
            return false;
        }
        if sel.id.as_deref().is_some_and(|id| node.id != id) {
            return false;
        }
        if !sel.classes.iter().all(|c| node.classes.contains(c)) {
            return false;
        }
        sel.attrs.iter().all(|(name, value)| match (node.attrs.get(name), value) {
            (Some(_), None) => true,
            (Some(actual), Some(expected)) => actual == expected,
            (None, _) => false,
        })
    }

    fn rendered_ix(&self, ix: usize) -> bool {
        if !self.nodes[ix].attached {
            return false;
        }
        self.ancestors_inclusive(ix).all(|n| {
            let node = &self.nodes[n];
            !node.hidden && (node.tag != "dialog" || self.modal.contains(&n))
        })
    }

    fn inert_ix(&self, ix: usize) -> bool {
        match self.modal.last() {
            Some(&top) => !self.ancestors_inclusive(ix).any(|n| n == top),
            None => false,
        }
    }

    fn focusable_ix(&self, ix: usize) -> bool {
        let node = &self.nodes[ix];
        if node.attrs.contains_key("disabled") {
            return false;
        }
        if node.attrs.contains_key("tabindex") {
            return true;
        }
        match node.tag.as_str() {
            "a" | "area" => node.attrs.contains_key("href"),
            "input" => node.attrs.get("type").is_none_or(|t| t != "hidden"),
            "button" | "select" | "textarea" => true,
            _ => false,
        }
    }

    fn close_overlay(&mut self, ix: usize) {
        self.modal.retain(|&m| m != ix);
        self.nodes[ix].attrs.remove("open");
        if self.active.is_some_and(|a| self.ancestors_inclusive(a).any(|n| n == ix)) {
            self.active = None;
        }
    }
}

impl Document for HeadlessDocument {
    fn contains(&self, id: &ElementId) -> bool {
        self.ix(id).is_some()
    }

    fn query_all(&self, selector: &str) -> Vec<ElementId> {
        let Some(sel) = Selector::parse(selector) else {
            return Vec::new();
        };
        let mut all = vec![self.root];
        all.extend(self.preorder(self.root));
        all.into_iter()
            .filter(|&ix| self.matches(ix, &sel))
            .map(|ix| self.nodes[ix].id.clone())
            .collect()
    }

    fn query_within(&self, root: &ElementId, selector: &str) -> Option<ElementId> {
        let sel = Selector::parse(selector)?;
        let root = self.ix(root)?;
        self.preorder(root)
            .into_iter()
            .find(|&ix| self.matches(ix, &sel))
            .map(|ix| self.nodes[ix].id.clone())
    }

    fn closest(&self, id: &ElementId, selector: &str) -> Option<ElementId> {
        let sel = Selector::parse(selector)?;
        let ix = self.ix(id)?;
        self.ancestors_inclusive(ix)
            .find(|&n| self.matches(n, &sel))
            .map(|n| self.nodes[n].id.clone())
    }

    fn is_within(&self, ancestor: &ElementId, id: &ElementId) -> bool {
        match (self.ix(ancestor), self.ix(id)) {
            (Some(a), Some(ix)) => self.ancestors_inclusive(ix).any(|n| n == a),
            _ => false,
        }
    }

    fn descendants(&self, root: &ElementId) -> Vec<ElementId> {
        match self.ix(root) {
            Some(ix) => self
                .preorder(ix)
                .into_iter()
                .map(|n| self.nodes[n].id.clone())
                .collect(),
            None => Vec::new(),
        }
    }

    fn tag(&self, id: &ElementId) -> Option<String> {
        self.ix(id).map(|ix| self.nodes[ix].tag.clone())
    }

    fn attribute(&self, id: &ElementId, name: &str) -> Option<String> {
        let ix = self.ix(id)?;
        self.nodes[ix].attrs.get(name).cloned()
    }

    fn set_attribute(&mut self, id: &ElementId, name: &str, value: &str) {
        if let Some(ix) = self.ix(id) {
            self.nodes[ix]
                .attrs
                .insert(name.to_owned(), value.to_owned());
        }
    }

    fn set_text(&mut self, id: &ElementId, text: &str) {
        if let Some(ix) = self.ix(id) {
            self.nodes[ix].text = text.to_owned();
        }
    }

    fn set_hidden(&mut self, id: &ElementId, hidden: bool) {
        if let Some(ix) = self.ix(id) {
            self.nodes[ix].hidden = hidden;
            if hidden
                && self
                    .active
                    .is_some_and(|a| self.ancestors_inclusive(a).any(|n| n == ix))
            {
                self.active = None;
            }
        }
    }

    fn is_rendered(&self, id: &ElementId) -> bool {
        self.ix(id).is_some_and(|ix| self.rendered_ix(ix))
    }

    fn active_element(&self) -> Option<ElementId> {
        self.active.map(|ix| self.nodes[ix].id.clone())
    }

    fn focus(&mut self, id: &ElementId) -> bool {
        let Some(ix) = self.ix(id) else {
            return false;
        };
        if !self.rendered_ix(ix) || self.inert_ix(ix) || !self.focusable_ix(ix) {
            return false;
        }
        self.active = Some(ix);
        true
    }
}

impl OverlayHost for HeadlessDocument {
    fn show_modal(&mut self, overlay: &ElementId) {
        let Some(ix) = self.ix(overlay) else {
            return;
        };
        if self.modal.contains(&ix) {
            return;
        }
        self.modal.push(ix);
        self.nodes[ix].attrs.insert("open".to_owned(), String::new());
    }

    fn hide(&mut self, overlay: &ElementId) {
        if let Some(ix) = self.ix(overlay) {
            self.close_overlay(ix);
        }
    }

    fn is_open(&self, overlay: &ElementId) -> bool {
        self.ix(overlay).is_some_and(|ix| self.modal.contains(&ix))
    }
}

impl Scroller for HeadlessDocument {
    fn bring_into_view(&mut self, id: &ElementId, behavior: ScrollBehavior) {
        if self.contains(id) {
            self.scrolls.push(ScrollRecord {
                target: id.clone(),
                behavior,
            });
        }
    }
}

impl Location for HeadlessDocument {
    fn fragment(&self) -> String {
        self.fragment.clone()
    }

    fn replace_fragment(&mut self, fragment: &str) {
        self.fragment_writes += 1;
        self.fragment = fragment.to_owned();
        if let Some(entry) = self.history.last_mut() {
            *entry = fragment.to_owned();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ElementId {
        ElementId::new(s)
    }

    fn sample() -> HeadlessDocument {
        let mut doc = HeadlessDocument::new();
        doc.append("body", ElementSpec::new("button").id("outside"));
        doc.append("body", ElementSpec::new("dialog").id("dlg"));
        doc.append("dlg", ElementSpec::new("button").id("inside"));
        doc.append("body", ElementSpec::new("div").id("box").hidden());
        doc.append("box", ElementSpec::new("a").id("link").attr("href", "#x"));
        doc
    }

    #[test]
    fn query_all_is_document_order() {
        let mut doc = HeadlessDocument::new();
        doc.append("body", ElementSpec::new("p").id("one").class("x"));
        doc.append("one", ElementSpec::new("p").id("two").class("x"));
        doc.append("body", ElementSpec::new("p").id("three").class("x"));
        assert_eq!(doc.query_all(".x"), vec![id("one"), id("two"), id("three")]);
    }

    #[test]
    fn closed_dialog_content_is_not_rendered() {
        let mut doc = sample();
        assert!(!doc.is_rendered(&id("inside")));
        assert!(!doc.focus(&id("inside")));
        doc.show_modal(&id("dlg"));
        assert!(doc.focus(&id("inside")));
    }

    #[test]
    fn hidden_ancestor_blocks_focus() {
        let mut doc = sample();
        assert!(!doc.focus(&id("link")));
        doc.set_hidden(&id("box"), false);
        assert!(doc.focus(&id("link")));
    }

    #[test]
    fn modal_makes_outside_inert() {
        let mut doc = sample();
        doc.show_modal(&id("dlg"));
        assert!(doc.is_inert("outside"));
        assert!(!doc.is_inert("inside"));
        assert!(!doc.focus(&id("outside")));
        doc.hide(&id("dlg"));
        assert!(doc.focus(&id("outside")));
    }

    #[test]
    fn replace_does_not_grow_history_but_navigate_does() {
        let mut doc = HeadlessDocument::new();
        doc.replace_fragment("#a");
        assert_eq!(doc.history_len(), 1);
        doc.navigate("#b");
        assert_eq!(doc.history_len(), 2);
        assert!(doc.back());
        assert_eq!(doc.fragment(), "#a");
        assert!(!doc.back());
    }

    #[test]
    fn removing_focused_subtree_drops_focus() {
        let mut doc = sample();
        assert!(doc.focus(&id("outside")));
        doc.remove("outside");
        assert_eq!(doc.active_element(), None);
        assert!(!doc.contains(&id("outside")));
    }
}
