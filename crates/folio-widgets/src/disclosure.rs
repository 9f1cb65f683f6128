#![forbid(unsafe_code)]

//! Mutually exclusive disclosure drawers.
//!
//! The [`DisclosureRegistry`] owns the expansion state of every drawer on the
//! page. Drawers are discovered once from markup and never removed.
//!
//! # Invariants
//!
//! - At most one drawer is expanded after any `open`/`close`/`toggle` returns.
//! - A drawer's header indicator (`aria-expanded`) and its panel's visibility
//!   always agree with `expanded`.
//! - Opening is idempotent: re-opening the open drawer re-applies the same
//!   state (and re-requests the scroll).
//! - The registry never writes the address fragment itself. It reports opens
//!   and closes to a [`DisclosureObserver`], which is where fragment sync
//!   lives.
//!
//! # Failure Modes
//!
//! | Request | Cause | Result |
//! |---------|-------|--------|
//! | `open(id)` | id not registered | `Ignored(UnknownDrawer)` |
//! | `open(id)` | header or panel missing | `Ignored(IncompleteDrawer)` |
//! | `close(id)` | id not registered | `Ignored(UnknownDrawer)` |
//!
//! None of these change any state.

use ahash::AHashMap;
use folio_core::platform::{Document, Location, Platform, ScrollBehavior};
use folio_core::{ElementId, Miss};

use crate::focus::FocusManager;

/// Where drawers live in the markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawerMarkup {
    /// Selects drawer containers; each container's id is the drawer id.
    pub drawer_selector: String,
    /// Selects the header inside a container.
    pub header_selector: String,
    /// Header attribute holding the panel's element id.
    pub panel_ref_attr: String,
    /// Header attribute mirroring the expanded state.
    pub expanded_attr: String,
}

impl Default for DrawerMarkup {
    fn default() -> Self {
        Self {
            drawer_selector: ".drawer".to_owned(),
            header_selector: ".drawer-header".to_owned(),
            panel_ref_attr: "aria-controls".to_owned(),
            expanded_attr: "aria-expanded".to_owned(),
        }
    }
}

/// One drawer: a header and the panel it controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drawer {
    id: String,
    header: Option<ElementId>,
    panel: Option<ElementId>,
    expanded: bool,
}

impl Drawer {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn header(&self) -> Option<&ElementId> {
        self.header.as_ref()
    }

    #[must_use]
    pub fn panel(&self) -> Option<&ElementId> {
        self.panel.as_ref()
    }

    #[must_use]
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Both header and panel resolved at discovery.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.header.is_some() && self.panel.is_some()
    }
}

/// Result of a registry request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawerOutcome {
    Opened,
    Closed,
    Ignored(Miss),
}

impl DrawerOutcome {
    /// Whether the request changed (or re-applied) drawer state.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        !matches!(self, Self::Ignored(_))
    }
}

/// Receives drawer transitions after the registry has applied them.
pub trait DisclosureObserver {
    fn drawer_opened<L: Location + ?Sized>(&mut self, id: &str, location: &mut L);
    fn drawer_closed<L: Location + ?Sized>(&mut self, id: &str, location: &mut L);
}

/// No observer: transitions are not mirrored anywhere.
impl DisclosureObserver for () {
    fn drawer_opened<L: Location + ?Sized>(&mut self, _id: &str, _location: &mut L) {}
    fn drawer_closed<L: Location + ?Sized>(&mut self, _id: &str, _location: &mut L) {}
}

/// Registry of drawers enforcing the single-open invariant.
#[derive(Debug, Clone, Default)]
pub struct DisclosureRegistry {
    drawers: Vec<Drawer>,
    index: AHashMap<String, usize>,
    markup: DrawerMarkup,
    scroll: ScrollBehavior,
}

impl DisclosureRegistry {
    /// An empty registry using `markup` for indicator attributes.
    #[must_use]
    pub fn new(markup: DrawerMarkup) -> Self {
        Self {
            markup,
            ..Self::default()
        }
    }

    /// Set how panels are scrolled into view on open.
    #[must_use]
    pub fn with_scroll_behavior(mut self, scroll: ScrollBehavior) -> Self {
        self.scroll = scroll;
        self
    }

    /// Scan the document for drawers and normalise their markup to the
    /// closed state (panel hidden, indicator `false`).
    ///
    /// Containers without an id cannot be addressed and are skipped. A
    /// container whose header or panel does not resolve is registered as
    /// incomplete so its id is still known. Duplicate ids keep the first.
    pub fn discover<D: Document + ?Sized>(markup: DrawerMarkup, doc: &mut D) -> Self {
        let mut registry = Self::new(markup);
        for container in doc.query_all(&registry.markup.drawer_selector) {
            let header = doc.query_within(&container, &registry.markup.header_selector);
            let panel = header
                .as_ref()
                .and_then(|h| doc.attribute(h, &registry.markup.panel_ref_attr))
                .map(ElementId::from)
                .filter(|p| doc.contains(p));
            registry.register(container.as_str(), header, panel);
        }
        for drawer in &registry.drawers {
            registry.apply(drawer, doc);
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(
            drawers = registry.drawers.len(),
            incomplete = registry.drawers.iter().filter(|d| !d.is_complete()).count(),
            "discovered drawers"
        );
        registry
    }

    /// Register a drawer. Returns `false` (and changes nothing) if the id is
    /// already taken.
    pub fn register(
        &mut self,
        id: &str,
        header: Option<ElementId>,
        panel: Option<ElementId>,
    ) -> bool {
        if id.is_empty() || self.index.contains_key(id) {
            return false;
        }
        self.index.insert(id.to_owned(), self.drawers.len());
        self.drawers.push(Drawer {
            id: id.to_owned(),
            header,
            panel,
            expanded: false,
        });
        true
    }

    #[must_use]
    pub fn markup(&self) -> &DrawerMarkup {
        &self.markup
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Drawer> {
        self.index.get(id).map(|&ix| &self.drawers[ix])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.drawers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.drawers.is_empty()
    }

    /// Drawers in discovery (document) order.
    pub fn drawers(&self) -> impl Iterator<Item = &Drawer> {
        self.drawers.iter()
    }

    /// Whether `id` is registered with both its header and panel resolved.
    #[must_use]
    pub fn is_complete(&self, id: &str) -> bool {
        self.get(id).is_some_and(Drawer::is_complete)
    }

    #[must_use]
    pub fn is_expanded(&self, id: &str) -> bool {
        self.get(id).is_some_and(Drawer::is_expanded)
    }

    /// The open drawer, if any.
    #[must_use]
    pub fn expanded_id(&self) -> Option<&str> {
        self.drawers.iter().find(|d| d.expanded).map(Drawer::id)
    }

    /// Which drawer `header` is the header of.
    #[must_use]
    pub fn header_owner(&self, header: &ElementId) -> Option<&str> {
        self.drawers
            .iter()
            .find(|d| d.header.as_ref() == Some(header))
            .map(Drawer::id)
    }

    /// Open `id`, closing every other drawer.
    pub fn open<P, O>(
        &mut self,
        id: &str,
        platform: &mut P,
        focus: &FocusManager,
        observer: &mut O,
    ) -> DrawerOutcome
    where
        P: Platform + ?Sized,
        O: DisclosureObserver,
    {
        let Some(&target) = self.index.get(id) else {
            return self.ignore(Miss::UnknownDrawer(id.to_owned()));
        };
        let panel = match (&self.drawers[target].header, &self.drawers[target].panel) {
            (Some(header), Some(panel)) if platform.contains(header) && platform.contains(panel) => {
                panel.clone()
            }
            _ => return self.ignore(Miss::IncompleteDrawer(id.to_owned())),
        };

        for (ix, drawer) in self.drawers.iter_mut().enumerate() {
            drawer.expanded = ix == target;
        }
        for drawer in &self.drawers {
            self.apply(drawer, platform);
        }
        debug_assert!(self.drawers.iter().filter(|d| d.expanded).count() <= 1);

        focus.land(&panel, platform);
        platform.bring_into_view(&panel, self.scroll);
        observer.drawer_opened(id, platform);

        #[cfg(feature = "tracing")]
        tracing::debug!(drawer = id, "drawer opened");
        DrawerOutcome::Opened
    }

    /// Collapse `id`.
    pub fn close<P, O>(&mut self, id: &str, platform: &mut P, observer: &mut O) -> DrawerOutcome
    where
        P: Platform + ?Sized,
        O: DisclosureObserver,
    {
        let Some(&target) = self.index.get(id) else {
            return self.ignore(Miss::UnknownDrawer(id.to_owned()));
        };
        self.drawers[target].expanded = false;
        self.apply(&self.drawers[target], platform);
        observer.drawer_closed(id, platform);

        #[cfg(feature = "tracing")]
        tracing::debug!(drawer = id, "drawer closed");
        DrawerOutcome::Closed
    }

    /// Close `id` if it is open, otherwise open it.
    pub fn toggle<P, O>(
        &mut self,
        id: &str,
        platform: &mut P,
        focus: &FocusManager,
        observer: &mut O,
    ) -> DrawerOutcome
    where
        P: Platform + ?Sized,
        O: DisclosureObserver,
    {
        if self.is_expanded(id) {
            self.close(id, platform, observer)
        } else {
            self.open(id, platform, focus, observer)
        }
    }

    /// Close whichever drawer is open. Returns its id.
    pub fn close_all<P, O>(&mut self, platform: &mut P, observer: &mut O) -> Option<String>
    where
        P: Platform + ?Sized,
        O: DisclosureObserver,
    {
        let open = self.expanded_id()?.to_owned();
        self.close(&open, platform, observer);
        Some(open)
    }

    /// Write a drawer's state to its markup.
    fn apply<D: Document + ?Sized>(&self, drawer: &Drawer, doc: &mut D) {
        if let Some(header) = &drawer.header {
            let value = if drawer.expanded { "true" } else { "false" };
            doc.set_attribute(header, &self.markup.expanded_attr, value);
        }
        if let Some(panel) = &drawer.panel {
            doc.set_hidden(panel, !drawer.expanded);
        }
    }

    fn ignore(&self, miss: Miss) -> DrawerOutcome {
        #[cfg(feature = "tracing")]
        tracing::debug!(reason = %miss, "drawer request ignored");
        DrawerOutcome::Ignored(miss)
    }
}
