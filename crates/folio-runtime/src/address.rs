#![forbid(unsafe_code)]

//! Two-way sync between the open drawer and the address fragment.
//!
//! State to fragment: as a [`DisclosureObserver`], every open writes `#<id>`
//! and every close clears the fragment if it still names the closed drawer.
//! Writes replace the current history entry so the back button is never
//! filled with drawer toggles.
//!
//! Fragment to state: [`AddressSync::fragment_changed`] opens the named
//! drawer. It only ever opens. An empty, unknown or malformed fragment leaves
//! the page alone, and clearing the fragment externally does not close the
//! open drawer.
//!
//! Some platforms report replacements as change notifications. The last
//! value written is remembered and one notification carrying it is consumed,
//! so a local open does not bounce back as a second open.

use folio_core::fragment::{self, FragmentValue};
use folio_core::platform::{Location, Platform};
use folio_core::Miss;
use folio_widgets::{DisclosureObserver, DisclosureRegistry, DrawerOutcome, FocusManager};

/// What the fragment currently refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentTarget {
    /// A registered drawer.
    Drawer(String),
    Empty,
    /// Well-formed but not a registered drawer.
    Unknown(String),
    Malformed,
}

/// Fragment bookkeeping. The sole writer of the fragment.
#[derive(Debug, Clone, Default)]
pub struct AddressSync {
    last_written: Option<FragmentValue>,
    writes: u64,
}

impl AddressSync {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of fragment writes issued.
    #[must_use]
    pub fn writes(&self) -> u64 {
        self.writes
    }

    /// Classify the current fragment against the registry.
    #[must_use]
    pub fn resolve<L: Location + ?Sized>(
        location: &L,
        registry: &DisclosureRegistry,
    ) -> FragmentTarget {
        match FragmentValue::parse(&location.fragment()) {
            FragmentValue::Empty => FragmentTarget::Empty,
            FragmentValue::Malformed => FragmentTarget::Malformed,
            FragmentValue::Target(id) if registry.contains(&id) => FragmentTarget::Drawer(id),
            FragmentValue::Target(id) => FragmentTarget::Unknown(id),
        }
    }

    /// The drawer to open once the page has loaded, if the fragment names one.
    #[must_use]
    pub fn initial_target<L: Location + ?Sized>(
        location: &L,
        registry: &DisclosureRegistry,
    ) -> Option<String> {
        match Self::resolve(location, registry) {
            FragmentTarget::Drawer(id) => {
                tracing::debug!(drawer = %id, "fragment names a drawer at load");
                Some(id)
            }
            other => {
                tracing::trace!(fragment = ?other, "no drawer to open at load");
                None
            }
        }
    }

    /// React to an external fragment change.
    pub fn fragment_changed<P: Platform + ?Sized>(
        &mut self,
        platform: &mut P,
        registry: &mut DisclosureRegistry,
        focus: &FocusManager,
    ) -> DrawerOutcome {
        let raw = platform.fragment();
        let current = FragmentValue::parse(&raw);
        if let Some(written) = self.last_written.take().filter(|w| *w == current) {
            tracing::trace!(fragment = %raw, "own fragment write echoed back, ignored");
            let miss = match written {
                FragmentValue::Empty => Miss::AlreadyClosed,
                FragmentValue::Target(_) | FragmentValue::Malformed => Miss::AlreadyOpen,
            };
            return DrawerOutcome::Ignored(miss);
        }

        match Self::resolve(&*platform, registry) {
            FragmentTarget::Drawer(id) => registry.open(&id, platform, focus, self),
            FragmentTarget::Empty => {
                tracing::trace!("fragment cleared externally, drawers left as they are");
                DrawerOutcome::Ignored(Miss::AlreadyClosed)
            }
            FragmentTarget::Unknown(id) => {
                tracing::trace!(fragment = %id, "fragment names no drawer");
                DrawerOutcome::Ignored(Miss::UnknownDrawer(id))
            }
            FragmentTarget::Malformed => {
                tracing::trace!(fragment = %raw, "malformed fragment ignored");
                DrawerOutcome::Ignored(Miss::MalformedFragment)
            }
        }
    }

    fn write<L: Location + ?Sized>(&mut self, location: &mut L, raw: &str) {
        location.replace_fragment(raw);
        self.last_written = Some(FragmentValue::parse(raw));
        self.writes += 1;
    }
}

impl DisclosureObserver for AddressSync {
    fn drawer_opened<L: Location + ?Sized>(&mut self, id: &str, location: &mut L) {
        if fragment::names(&location.fragment(), id) {
            return;
        }
        let raw = fragment::format(id);
        tracing::debug!(fragment = %raw, "fragment follows opened drawer");
        self.write(location, &raw);
    }

    fn drawer_closed<L: Location + ?Sized>(&mut self, id: &str, location: &mut L) {
        if !fragment::names(&location.fragment(), id) {
            return;
        }
        tracing::debug!(drawer = id, "fragment cleared with its drawer");
        self.write(location, "");
    }
}
