#![forbid(unsafe_code)]

//! Why an operation did nothing.
//!
//! No folio operation fails in a way the page could observe: every request
//! that cannot be honoured degrades to a no-op. [`Miss`] names the reason so
//! callers and logs can tell a deliberate no-op from a wiring mistake.

use core::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Miss {
    /// No drawer is registered under this id.
    UnknownDrawer(String),
    /// The drawer is registered but its header or panel did not resolve.
    IncompleteDrawer(String),
    /// The overlay element is not in the document.
    MissingOverlay(String),
    /// A required attribute is absent (e.g. a lightbox trigger without a
    /// source).
    MissingAttribute { element: String, name: String },
    /// Open requested on an overlay that is already open.
    AlreadyOpen,
    /// Close requested on something that is already closed.
    AlreadyClosed,
    /// The address fragment could not be read as an identifier.
    MalformedFragment,
}

impl fmt::Display for Miss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownDrawer(id) => write!(f, "no drawer registered as {id:?}"),
            Self::IncompleteDrawer(id) => {
                write!(f, "drawer {id:?} is missing its header or panel")
            }
            Self::MissingOverlay(id) => write!(f, "overlay {id:?} is not in the document"),
            Self::MissingAttribute { element, name } => {
                write!(f, "element {element:?} has no {name:?} attribute")
            }
            Self::AlreadyOpen => f.write_str("already open"),
            Self::AlreadyClosed => f.write_str("already closed"),
            Self::MalformedFragment => f.write_str("fragment is not an identifier"),
        }
    }
}

impl std::error::Error for Miss {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_id() {
        let miss = Miss::UnknownDrawer("faq".into());
        assert_eq!(miss.to_string(), "no drawer registered as \"faq\"");
    }
}
