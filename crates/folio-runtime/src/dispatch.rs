#![forbid(unsafe_code)]

//! The interaction dispatcher.
//!
//! A [`Page`] owns every folio component for one document and turns host
//! [`Event`]s into component transitions. Hosts forward events and apply the
//! returned [`EventOutcome`]:
//!
//! ```ignore
//! let mut page = Page::mount(&mut doc, PageConfig::default());
//! page.handle(&Event::Load, &mut doc);
//! // on every requestAnimationFrame:
//! page.handle(&Event::Frame, &mut doc);
//! // on keydown:
//! if page.handle(&Event::Key(key), &mut doc).prevent_default {
//!     // cancel the platform default
//! }
//! ```
//!
//! # Routing
//!
//! | Event | While the lightbox is open | While navigation is open | Otherwise |
//! |-------|----------------------------|--------------------------|-----------|
//! | Escape | close lightbox | close navigation | ignored |
//! | Tab / Shift+Tab | lightbox trap (if enabled) | navigation trap | ignored |
//! | Enter / Space | ignored | ignored | toggle the focused drawer header |
//! | click | close control or backdrop closes | close control, backdrop, trigger or in-page link closes | trigger, lightbox image or drawer header |
//!
//! Clicks outside an open overlay are ignored, matching the inert document
//! behind a modal.
//!
//! Opening an overlay closes the other one first. Overlays never stack.

use folio_core::platform::Platform;
use folio_core::{ClickEvent, ElementId, Event, KeyCode, KeyEvent, Modifiers};
use folio_widgets::{
    DisclosureRegistry, DrawerOutcome, FocusManager, Lightbox, MediaClear, ModalController,
    ModalTransition, TrapMove,
};
use web_time::Instant;

use crate::address::AddressSync;
use crate::config::{LoadDefer, PageConfig};
use crate::schedule::{Due, TaskQueue};

/// What the host should do after a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventOutcome {
    /// Folio acted on the event.
    pub handled: bool,
    /// The platform's default action must be cancelled.
    pub prevent_default: bool,
}

impl EventOutcome {
    pub const IGNORED: Self = Self {
        handled: false,
        prevent_default: false,
    };

    pub const HANDLED: Self = Self {
        handled: true,
        prevent_default: false,
    };

    pub const PREVENTED: Self = Self {
        handled: true,
        prevent_default: true,
    };

    fn from_handled(handled: bool) -> Self {
        if handled { Self::HANDLED } else { Self::IGNORED }
    }
}

/// Work parked until a frame or timer.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Deferred {
    OpenDrawer(String),
    ClearMedia(MediaClear),
}

/// All folio state for one document.
#[derive(Debug)]
pub struct Page {
    config: PageConfig,
    registry: DisclosureRegistry,
    address: AddressSync,
    focus: FocusManager,
    navigation: ModalController,
    lightbox: Lightbox,
    tasks: TaskQueue<Deferred>,
}

impl Page {
    /// Discover drawers and overlays and normalise their markup to closed.
    pub fn mount<P: Platform + ?Sized>(platform: &mut P, config: PageConfig) -> Self {
        let registry = DisclosureRegistry::discover(config.markup.drawers.clone(), platform)
            .with_scroll_behavior(config.scroll);
        let navigation = ModalController::new(config.markup.navigation.clone());
        let lightbox = Lightbox::new(
            config.markup.lightbox.clone(),
            config.markup.lightbox_media.clone(),
        )
        .with_trap(config.trap.traps_lightbox());

        let nav = &config.markup.navigation;
        if let Some(trigger) = &nav.trigger {
            if platform.contains(trigger) {
                platform.set_attribute(trigger, &nav.expanded_attr, "false");
            }
        }

        tracing::info!(
            drawers = registry.len(),
            navigation = platform.contains(&nav.overlay),
            lightbox = platform.contains(&config.markup.lightbox.overlay),
            "page mounted"
        );
        Self {
            config,
            registry,
            address: AddressSync::new(),
            focus: FocusManager::new(),
            navigation,
            lightbox,
            tasks: TaskQueue::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &DisclosureRegistry {
        &self.registry
    }

    #[must_use]
    pub fn address(&self) -> &AddressSync {
        &self.address
    }

    #[must_use]
    pub fn focus(&self) -> &FocusManager {
        &self.focus
    }

    #[must_use]
    pub fn navigation(&self) -> &ModalController {
        &self.navigation
    }

    #[must_use]
    pub fn lightbox(&self) -> &Lightbox {
        &self.lightbox
    }

    /// Number of deferred tasks waiting for a frame or tick.
    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the host should deliver [`Event::Frame`].
    #[must_use]
    pub fn wants_frame(&self) -> bool {
        self.tasks.wants_frame()
    }

    /// When the host should deliver the next [`Event::Tick`].
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.tasks.next_deadline()
    }

    /// Dispatch one host event.
    pub fn handle<P: Platform + ?Sized>(&mut self, event: &Event, platform: &mut P) -> EventOutcome {
        let _span = tracing::debug_span!("folio.dispatch", event = event.name()).entered();

        let outcome = match event {
            Event::Key(key) => self.on_key(key, platform),
            Event::Click(click) => self.on_click(click, platform),
            Event::FragmentChanged => {
                let opened = self
                    .address
                    .fragment_changed(platform, &mut self.registry, &self.focus);
                EventOutcome::from_handled(opened.is_applied())
            }
            Event::Load => self.on_load(platform),
            Event::OverlayDismissed(overlay) => self.on_dismissed(overlay, platform),
            Event::Frame => {
                let tasks = self.tasks.take_frame();
                self.run(tasks, platform)
            }
            Event::Tick(now) => {
                let tasks = self.tasks.take_due(*now);
                self.run(tasks, platform)
            }
        };

        tracing::trace!(
            handled = outcome.handled,
            prevent_default = outcome.prevent_default,
            "dispatched"
        );
        outcome
    }

    pub fn open_drawer<P: Platform + ?Sized>(&mut self, id: &str, platform: &mut P) -> DrawerOutcome {
        self.registry
            .open(id, platform, &self.focus, &mut self.address)
    }

    pub fn close_drawer<P: Platform + ?Sized>(&mut self, id: &str, platform: &mut P) -> DrawerOutcome {
        self.registry.close(id, platform, &mut self.address)
    }

    pub fn toggle_drawer<P: Platform + ?Sized>(
        &mut self,
        id: &str,
        platform: &mut P,
    ) -> DrawerOutcome {
        self.registry
            .toggle(id, platform, &self.focus, &mut self.address)
    }

    /// Open the navigation modal, closing the lightbox first. A request that
    /// cannot open leaves the lightbox alone.
    pub fn open_navigation<P: Platform + ?Sized>(&mut self, platform: &mut P) -> ModalTransition {
        if let Some(miss) = self.navigation.open_blocker(&*platform) {
            tracing::debug!(reason = %miss, "navigation open ignored");
            return ModalTransition::Unchanged(miss);
        }
        self.close_lightbox(platform);
        self.navigation.open(platform, &mut self.focus)
    }

    pub fn close_navigation<P: Platform + ?Sized>(&mut self, platform: &mut P) -> ModalTransition {
        self.navigation.close(platform, &mut self.focus)
    }

    /// Open the lightbox on `source`, closing navigation first.
    pub fn open_lightbox<P: Platform + ?Sized>(
        &mut self,
        platform: &mut P,
        source: &str,
        description: &str,
    ) -> ModalTransition {
        if let Some(miss) = self.lightbox.open_blocker(&*platform) {
            tracing::debug!(reason = %miss, "lightbox open ignored");
            return ModalTransition::Unchanged(miss);
        }
        self.close_navigation(platform);
        self.lightbox
            .open_with(platform, &mut self.focus, source, description)
    }

    /// Open the lightbox on the media of a trigger image. A trigger without
    /// a source leaves navigation alone.
    pub fn open_lightbox_from<P: Platform + ?Sized>(
        &mut self,
        platform: &mut P,
        trigger: &ElementId,
    ) -> ModalTransition {
        match self.lightbox.trigger_media(&*platform, trigger) {
            Ok((source, description)) => self.open_lightbox(platform, &source, &description),
            Err(miss) => {
                tracing::debug!(trigger = %trigger, reason = %miss, "lightbox trigger ignored");
                ModalTransition::Unchanged(miss)
            }
        }
    }

    /// Close the lightbox and schedule its media to be cleared.
    pub fn close_lightbox<P: Platform + ?Sized>(&mut self, platform: &mut P) -> ModalTransition {
        let transition = self.lightbox.close(platform, &mut self.focus);
        if transition.changed() {
            self.schedule_media_clear(platform);
        }
        transition
    }

    fn on_key<P: Platform + ?Sized>(&mut self, key: &KeyEvent, platform: &mut P) -> EventOutcome {
        if !key.is_down() {
            return EventOutcome::IGNORED;
        }
        if key.code == KeyCode::Escape {
            return self.on_escape(platform);
        }
        if let Some(backwards) = key.tab_direction() {
            return self.on_tab(platform, backwards);
        }
        let chorded = key
            .modifiers
            .intersects(Modifiers::CTRL | Modifiers::ALT | Modifiers::META);
        if key.is_activation() && !chorded {
            return self.on_activate(platform);
        }
        EventOutcome::IGNORED
    }

    /// Escape closes the topmost overlay.
    fn on_escape<P: Platform + ?Sized>(&mut self, platform: &mut P) -> EventOutcome {
        if self.lightbox.is_open() {
            self.close_lightbox(platform);
            return EventOutcome::PREVENTED;
        }
        if self.navigation.is_open() {
            self.close_navigation(platform);
            return EventOutcome::PREVENTED;
        }
        EventOutcome::IGNORED
    }

    fn on_tab<P: Platform + ?Sized>(&mut self, platform: &mut P, backwards: bool) -> EventOutcome {
        let movement = if self.lightbox.is_open() {
            self.lightbox.on_tab(platform, backwards)
        } else {
            self.navigation.on_tab(platform, backwards)
        };
        match movement {
            None | Some(TrapMove::Pass) => EventOutcome::IGNORED,
            Some(movement) => {
                tracing::trace!(?movement, "tab trapped");
                EventOutcome {
                    handled: true,
                    prevent_default: movement.prevents_default(),
                }
            }
        }
    }

    /// Enter or Space on a drawer header toggles the drawer. The default is
    /// cancelled so the platform does not also synthesise a click.
    fn on_activate<P: Platform + ?Sized>(&mut self, platform: &mut P) -> EventOutcome {
        if self.overlay_open() {
            return EventOutcome::IGNORED;
        }
        let Some(id) = platform
            .active_element()
            .and_then(|active| self.owning_drawer(&*platform, &active))
        else {
            return EventOutcome::IGNORED;
        };
        self.toggle_drawer(&id, platform);
        EventOutcome::PREVENTED
    }

    fn on_click<P: Platform + ?Sized>(&mut self, click: &ClickEvent, platform: &mut P) -> EventOutcome {
        let target = &click.target;

        if self.lightbox.is_open() {
            if let Some(reason) = self.lightbox.modal().close_target(&*platform, target) {
                tracing::debug!(?reason, "lightbox close clicked");
                self.close_lightbox(platform);
                return EventOutcome::HANDLED;
            }
            return EventOutcome::IGNORED;
        }

        if self.navigation.is_open() {
            if let Some(reason) = self.navigation.close_target(&*platform, target) {
                tracing::debug!(?reason, "navigation close clicked");
                self.close_navigation(platform);
                return EventOutcome::HANDLED;
            }
            if self.navigation.is_trigger(&*platform, target) {
                self.close_navigation(platform);
                return EventOutcome::HANDLED;
            }
            if self.config.close_nav_on_link && self.is_nav_in_page_link(&*platform, target) {
                // The link still navigates; the fragment change opens the drawer.
                self.close_navigation(platform);
                return EventOutcome::HANDLED;
            }
            return EventOutcome::IGNORED;
        }

        if self.navigation.is_trigger(&*platform, target) {
            let opened = self.open_navigation(platform);
            return EventOutcome::from_handled(opened.changed());
        }

        if let Some(image) = platform.closest(target, &self.config.markup.lightbox_trigger_selector)
        {
            let opened = self.open_lightbox_from(platform, &image);
            return if opened.changed() {
                EventOutcome::PREVENTED
            } else {
                tracing::debug!(trigger = %image, ?opened, "lightbox trigger ignored");
                EventOutcome::IGNORED
            };
        }

        if let Some(id) = self.owning_drawer(&*platform, target) {
            let outcome = self.toggle_drawer(&id, platform);
            return EventOutcome::from_handled(outcome.is_applied());
        }
        EventOutcome::IGNORED
    }

    fn on_load<P: Platform + ?Sized>(&mut self, platform: &mut P) -> EventOutcome {
        let Some(id) = AddressSync::initial_target(&*platform, &self.registry) else {
            return EventOutcome::IGNORED;
        };
        let due = match self.config.load_defer {
            LoadDefer::NextFrame => Due::NextFrame,
            LoadDefer::Delay(delay) => Due::after(delay, Instant::now()),
        };
        tracing::debug!(drawer = %id, ?due, "initial open deferred");
        self.tasks.push(due, Deferred::OpenDrawer(id));
        EventOutcome::HANDLED
    }

    /// The platform closed an overlay itself. Converges on the regular close
    /// path, which is a no-op if folio already closed it.
    fn on_dismissed<P: Platform + ?Sized>(
        &mut self,
        overlay: &ElementId,
        platform: &mut P,
    ) -> EventOutcome {
        let transition = if *overlay == self.navigation.parts().overlay {
            self.navigation.on_dismissed(platform, &mut self.focus)
        } else if *overlay == self.lightbox.modal().parts().overlay {
            let transition = self.lightbox.on_dismissed(platform, &mut self.focus);
            if transition.changed() {
                self.schedule_media_clear(platform);
            }
            transition
        } else {
            return EventOutcome::IGNORED;
        };
        EventOutcome::from_handled(transition.changed())
    }

    fn run<P: Platform + ?Sized>(&mut self, tasks: Vec<Deferred>, platform: &mut P) -> EventOutcome {
        let handled = !tasks.is_empty();
        for task in tasks {
            match task {
                Deferred::OpenDrawer(id) => {
                    let outcome = self.open_drawer(&id, platform);
                    tracing::debug!(drawer = %id, ?outcome, "deferred open ran");
                }
                Deferred::ClearMedia(ticket) => {
                    let cleared = self.lightbox.clear_media(platform, ticket);
                    tracing::trace!(cleared, "deferred media clear ran");
                }
            }
        }
        EventOutcome::from_handled(handled)
    }

    fn schedule_media_clear<P: Platform + ?Sized>(&mut self, platform: &mut P) {
        let ticket = self.lightbox.media_clear();
        let delay = self.config.lightbox_clear_delay;
        if delay.is_zero() {
            self.lightbox.clear_media(platform, ticket);
        } else {
            self.tasks
                .push(Due::At(Instant::now() + delay), Deferred::ClearMedia(ticket));
        }
    }

    fn overlay_open(&self) -> bool {
        self.navigation.is_open() || self.lightbox.is_open()
    }

    /// The drawer whose header is `element` or contains it.
    fn owning_drawer<P: Platform + ?Sized>(&self, platform: &P, element: &ElementId) -> Option<String> {
        let header = platform.closest(element, &self.registry.markup().header_selector)?;
        self.registry.header_owner(&header).map(str::to_owned)
    }

    fn is_nav_in_page_link<P: Platform + ?Sized>(&self, platform: &P, target: &ElementId) -> bool {
        let Some(link) = platform.closest(target, "a[href]") else {
            return false;
        };
        platform.is_within(&self.navigation.parts().overlay, &link)
            && platform
                .attribute(&link, "href")
                .is_some_and(|href| href.starts_with('#'))
    }
}
