#![forbid(unsafe_code)]

//! Input and window events delivered by the host.
//!
//! Events are plain data. The host translates whatever its platform emits
//! (DOM `click`/`keydown`/`hashchange`/`load`, a dialog's `close`
//! notification, `requestAnimationFrame`, timers) into [`Event`] values and
//! hands them to the runtime dispatcher, which answers with whether the
//! platform default should be cancelled.

use bitflags::bitflags;
use web_time::Instant;

use crate::ElementId;

bitflags! {
    /// Keyboard modifier state at the time of a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
        const META  = 0b1000;
    }
}

/// Keys the core reacts to. Everything else arrives as [`KeyCode::Char`] or
/// [`KeyCode::Other`] and is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Enter,
    Escape,
    Tab,
    /// Shift+Tab as reported by platforms that fold the modifier into the key.
    BackTab,
    Char(char),
    Other,
}

/// Press/repeat/release phase of a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    #[default]
    Press,
    Repeat,
    Release,
}

/// A keyboard event. The target is whatever element currently holds focus,
/// which the dispatcher reads from the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// A plain key press with no modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
            kind: KeyEventKind::Press,
        }
    }

    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Whether this is a press (or auto-repeat), i.e. a `keydown`.
    #[inline]
    #[must_use]
    pub fn is_down(&self) -> bool {
        matches!(self.kind, KeyEventKind::Press | KeyEventKind::Repeat)
    }

    /// Tab or Shift+Tab. Returns `Some(backwards)`.
    #[must_use]
    pub fn tab_direction(&self) -> Option<bool> {
        match self.code {
            KeyCode::Tab => Some(self.modifiers.contains(Modifiers::SHIFT)),
            KeyCode::BackTab => Some(true),
            _ => None,
        }
    }

    /// Enter or Space, the keys that activate a drawer header.
    #[must_use]
    pub fn is_activation(&self) -> bool {
        matches!(self.code, KeyCode::Enter | KeyCode::Char(' '))
    }
}

/// A pointer activation on `target`, the innermost element under the pointer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClickEvent {
    pub target: ElementId,
    pub modifiers: Modifiers,
}

impl ClickEvent {
    #[must_use]
    pub fn new(target: impl Into<ElementId>) -> Self {
        Self {
            target: target.into(),
            modifiers: Modifiers::empty(),
        }
    }
}

/// Everything the dispatcher can be asked to handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    Click(ClickEvent),
    /// The address fragment changed (`hashchange`).
    FragmentChanged,
    /// The document finished loading.
    Load,
    /// The platform closed an overlay on its own (native dialog dismissal).
    OverlayDismissed(ElementId),
    /// An animation frame elapsed.
    Frame,
    /// Timer wake-up; the host passes its current clock.
    Tick(Instant),
}

impl Event {
    /// Convenience for a click on an element id.
    #[must_use]
    pub fn click(target: impl Into<ElementId>) -> Self {
        Self::Click(ClickEvent::new(target))
    }

    /// Convenience for a plain key press.
    #[must_use]
    pub fn key(code: KeyCode) -> Self {
        Self::Key(KeyEvent::new(code))
    }

    /// Short stable name, used as a log field.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Key(_) => "key",
            Self::Click(_) => "click",
            Self::FragmentChanged => "fragment_changed",
            Self::Load => "load",
            Self::OverlayDismissed(_) => "overlay_dismissed",
            Self::Frame => "frame",
            Self::Tick(_) => "tick",
        }
    }
}
