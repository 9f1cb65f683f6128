#![forbid(unsafe_code)]

//! Image lightbox: a [`ModalController`] plus the media slots it fills.
//!
//! Opening copies the trigger image's source and description verbatim into
//! the lightbox. Closing leaves the media in place; the caller clears it
//! later with the [`MediaClear`] ticket so the closing transition does not
//! flash an empty frame.
//!
//! A ticket is bound to the open it followed. If the lightbox is opened again
//! before a stale ticket is redeemed, redeeming it does nothing, so a late
//! clear never wipes the new image.

use folio_core::platform::Platform;
use folio_core::{ElementId, Miss};

use crate::focus::{FocusManager, TrapMove};
use crate::modal::{ModalController, ModalTransition, OverlayParts};

/// Where the lightbox shows its media and where triggers keep theirs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaParts {
    /// Image element inside the lightbox.
    pub image: ElementId,
    /// Optional caption element receiving the description as text.
    pub caption: Option<ElementId>,
    /// Trigger attribute read as the source.
    pub source_attr: String,
    /// Trigger attribute read as the description.
    pub description_attr: String,
}

impl MediaParts {
    #[must_use]
    pub fn new(image: impl Into<ElementId>) -> Self {
        Self {
            image: image.into(),
            caption: None,
            source_attr: "src".to_owned(),
            description_attr: "alt".to_owned(),
        }
    }

    #[must_use]
    pub fn caption(mut self, caption: impl Into<ElementId>) -> Self {
        self.caption = Some(caption.into());
        self
    }
}

/// Permission to clear the media shown by one particular open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct MediaClear {
    generation: u64,
}

#[derive(Debug)]
pub struct Lightbox {
    modal: ModalController,
    media: MediaParts,
    generation: u64,
}

impl Lightbox {
    /// A lightbox without a Tab trap; its only control is the close button.
    #[must_use]
    pub fn new(parts: OverlayParts, media: MediaParts) -> Self {
        Self {
            modal: ModalController::new(parts).with_trap(false),
            media,
            generation: 0,
        }
    }

    /// Enable or disable the Tab trap.
    #[must_use]
    pub fn with_trap(mut self, enabled: bool) -> Self {
        self.modal = self.modal.with_trap(enabled);
        self
    }

    #[must_use]
    pub fn modal(&self) -> &ModalController {
        &self.modal
    }

    #[must_use]
    pub fn media(&self) -> &MediaParts {
        &self.media
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.modal.is_open()
    }

    /// Open showing `source` with `description`.
    pub fn open_with<P: Platform + ?Sized>(
        &mut self,
        platform: &mut P,
        focus: &mut FocusManager,
        source: &str,
        description: &str,
    ) -> ModalTransition {
        if let Some(miss) = self.open_blocker(&*platform) {
            return ModalTransition::Unchanged(miss);
        }
        self.generation += 1;
        platform.set_attribute(&self.media.image, "src", source);
        platform.set_attribute(&self.media.image, "alt", description);
        if let Some(caption) = &self.media.caption {
            platform.set_text(caption, description);
        }
        self.modal.open(platform, focus)
    }

    /// Why opening would be a no-op right now, if it would.
    #[must_use]
    pub fn open_blocker<P: Platform + ?Sized>(&self, platform: &P) -> Option<Miss> {
        self.modal.open_blocker(platform)
    }

    /// The source and description a trigger image carries. A trigger
    /// without a source is refused; a missing description reads as empty.
    pub fn trigger_media<P: Platform + ?Sized>(
        &self,
        platform: &P,
        trigger: &ElementId,
    ) -> Result<(String, String), Miss> {
        let Some(source) = platform.attribute(trigger, &self.media.source_attr) else {
            return Err(Miss::MissingAttribute {
                element: trigger.to_string(),
                name: self.media.source_attr.clone(),
            });
        };
        let description = platform
            .attribute(trigger, &self.media.description_attr)
            .unwrap_or_default();
        Ok((source, description))
    }

    /// Open showing the media referenced by a trigger image's attributes.
    pub fn open_from<P: Platform + ?Sized>(
        &mut self,
        platform: &mut P,
        focus: &mut FocusManager,
        trigger: &ElementId,
    ) -> ModalTransition {
        match self.trigger_media(&*platform, trigger) {
            Ok((source, description)) => self.open_with(platform, focus, &source, &description),
            Err(miss) => ModalTransition::Unchanged(miss),
        }
    }

    pub fn close<P: Platform + ?Sized>(
        &mut self,
        platform: &mut P,
        focus: &mut FocusManager,
    ) -> ModalTransition {
        self.modal.close(platform, focus)
    }

    pub fn on_dismissed<P: Platform + ?Sized>(
        &mut self,
        platform: &mut P,
        focus: &mut FocusManager,
    ) -> ModalTransition {
        self.modal.on_dismissed(platform, focus)
    }

    pub fn on_tab<P: Platform + ?Sized>(&self, platform: &mut P, backwards: bool) -> Option<TrapMove> {
        self.modal.on_tab(platform, backwards)
    }

    /// Ticket for clearing the media of the most recent open.
    pub fn media_clear(&self) -> MediaClear {
        MediaClear {
            generation: self.generation,
        }
    }

    /// Clear source, description and caption if `ticket` still refers to the
    /// current media and the lightbox is closed.
    pub fn clear_media<P: Platform + ?Sized>(&self, platform: &mut P, ticket: MediaClear) -> bool {
        if self.is_open() || ticket.generation != self.generation {
            return false;
        }
        platform.set_attribute(&self.media.image, "src", "");
        platform.set_attribute(&self.media.image, "alt", "");
        if let Some(caption) = &self.media.caption {
            platform.set_text(caption, "");
        }
        true
    }
}
