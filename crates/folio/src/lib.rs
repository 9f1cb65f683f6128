#![forbid(unsafe_code)]

//! Accessible disclosure drawers, modal overlays and address-fragment sync.
//!
//! This is the public facade. Most hosts only need the [`prelude`]:
//!
//! ```ignore
//! use folio::prelude::*;
//!
//! let mut page = Page::mount(&mut platform, PageConfig::default());
//! page.handle(&Event::Load, &mut platform);
//! ```
//!
//! The host implements the [`platform`] traits for its document and
//! forwards events; folio answers with an [`EventOutcome`] per event.

pub use folio_core::{
    ClickEvent, Document, ElementId, Event, FragmentValue, KeyCode, KeyEvent, KeyEventKind,
    Location, Miss, Modifiers, OverlayHost, Platform, ScrollBehavior, Scroller, fragment, platform,
};
#[cfg(feature = "tracing-json")]
pub use folio_core::logging;

pub use folio_widgets as widgets;
pub use folio_widgets::{
    DisclosureObserver, DisclosureRegistry, Drawer, DrawerMarkup, DrawerOutcome, FocusManager,
    Lightbox, MediaParts, ModalController, ModalTransition, OverlayParts, TrapMove,
};

#[cfg(feature = "runtime")]
pub use folio_runtime as runtime;
#[cfg(feature = "runtime")]
pub use folio_runtime::{AddressSync, EventOutcome, LoadDefer, MarkupConfig, Page, PageConfig, TrapPolicy};

pub mod prelude {
    //! The types a host touches when wiring folio into a page.

    pub use folio_core::{
        ClickEvent, Document, ElementId, Event, KeyCode, KeyEvent, Location, Modifiers,
        OverlayHost, Platform, ScrollBehavior, Scroller,
    };
    pub use folio_widgets::{DrawerMarkup, DrawerOutcome, MediaParts, ModalTransition, OverlayParts};

    #[cfg(feature = "runtime")]
    pub use folio_runtime::{EventOutcome, LoadDefer, MarkupConfig, Page, PageConfig, TrapPolicy};
}
