#![forbid(unsafe_code)]

//! Reference pages built on [`HeadlessDocument`].
//!
//! The ids and class names here match the default markup configuration of
//! `folio-widgets`/`folio-runtime`, so a fixture page can be mounted with
//! `PageConfig::default()`.
//!
//! ```text
//! body
//! ├── button#nav-toggle.nav-toggle          (aria-controls=nav-modal)
//! ├── main#main
//! │   ├── section#<id>.drawer               one per drawer
//! │   │   ├── button#<id>-header.drawer-header (aria-controls=<id>-panel)
//! │   │   └── div#<id>-panel.drawer-panel
//! │   │       └── a#<id>-more               (href=#<id>)
//! │   ├── img#photo-1.lightbox-trigger      (src=img1.jpg alt=Photo)
//! │   └── img#photo-2.lightbox-trigger      (src=img2.jpg alt=Harbour at dusk)
//! ├── dialog#nav-modal.nav-modal
//! │   ├── button#nav-close.modal-close
//! │   └── a#nav-link-<id>                    (href=#<id>) for the first two drawers
//! └── dialog#lightbox.lightbox
//!     ├── button#lightbox-close.modal-close
//!     ├── img#lightbox-image
//!     └── p#lightbox-caption
//! ```

use crate::document::{ElementSpec, HeadlessDocument};

/// Drawer ids used by [`standard_page`].
pub const STANDARD_DRAWERS: [&str; 3] = ["A", "B", "C"];

/// Builder for fixture pages.
#[derive(Debug, Clone, Default)]
pub struct PageFixture {
    drawers: Vec<String>,
    incomplete: Vec<String>,
    nav_links: Option<usize>,
    fragment: String,
    lightbox: bool,
    navigation: bool,
}

impl PageFixture {
    #[must_use]
    pub fn new() -> Self {
        Self {
            lightbox: true,
            navigation: true,
            ..Self::default()
        }
    }

    /// Add a complete drawer.
    #[must_use]
    pub fn drawer(mut self, id: &str) -> Self {
        self.drawers.push(id.to_owned());
        self
    }

    /// Add a drawer whose header references a panel that does not exist.
    #[must_use]
    pub fn incomplete_drawer(mut self, id: &str) -> Self {
        self.incomplete.push(id.to_owned());
        self
    }

    /// Number of in-page links in the navigation modal (default: up to two,
    /// one per drawer).
    #[must_use]
    pub fn nav_links(mut self, count: usize) -> Self {
        self.nav_links = Some(count);
        self
    }

    /// The fragment present when the page loads.
    #[must_use]
    pub fn fragment(mut self, raw: &str) -> Self {
        self.fragment = raw.to_owned();
        self
    }

    #[must_use]
    pub fn without_lightbox(mut self) -> Self {
        self.lightbox = false;
        self
    }

    #[must_use]
    pub fn without_navigation(mut self) -> Self {
        self.navigation = false;
        self
    }

    #[must_use]
    pub fn build(self) -> HeadlessDocument {
        let mut doc = HeadlessDocument::new().with_fragment(&self.fragment);

        if self.navigation {
            doc.append(
                "body",
                ElementSpec::new("button")
                    .id("nav-toggle")
                    .class("nav-toggle")
                    .attr("aria-controls", "nav-modal")
                    .attr("aria-expanded", "false")
                    .text("Menu"),
            );
        }

        doc.append("body", ElementSpec::new("main").id("main"));
        for id in &self.drawers {
            append_drawer(&mut doc, id, true);
        }
        for id in &self.incomplete {
            append_drawer(&mut doc, id, false);
        }

        if self.lightbox {
            for (n, (src, alt)) in [("img1.jpg", "Photo"), ("img2.jpg", "Harbour at dusk")]
                .into_iter()
                .enumerate()
            {
                doc.append(
                    "main",
                    ElementSpec::new("img")
                        .id(&format!("photo-{}", n + 1))
                        .class("lightbox-trigger")
                        .attr("src", src)
                        .attr("alt", alt),
                );
            }
        }

        if self.navigation {
            doc.append(
                "body",
                ElementSpec::new("dialog")
                    .id("nav-modal")
                    .class("nav-modal")
                    .attr("aria-label", "Site navigation"),
            );
            doc.append(
                "nav-modal",
                ElementSpec::new("button")
                    .id("nav-close")
                    .class("modal-close")
                    .attr("aria-label", "Close menu"),
            );
            let links = self.nav_links.unwrap_or(2);
            for n in 0..links {
                let (link_id, href) = match self.drawers.get(n) {
                    Some(drawer) => (format!("nav-link-{drawer}"), format!("#{drawer}")),
                    None => (format!("nav-link-{n}"), format!("/page-{n}")),
                };
                doc.append(
                    "nav-modal",
                    ElementSpec::new("a").id(&link_id).attr("href", &href),
                );
            }
        }

        if self.lightbox {
            doc.append(
                "body",
                ElementSpec::new("dialog")
                    .id("lightbox")
                    .class("lightbox")
                    .attr("aria-label", "Image viewer"),
            );
            doc.append(
                "lightbox",
                ElementSpec::new("button")
                    .id("lightbox-close")
                    .class("modal-close")
                    .attr("aria-label", "Close image"),
            );
            doc.append("lightbox", ElementSpec::new("img").id("lightbox-image"));
            doc.append("lightbox", ElementSpec::new("p").id("lightbox-caption"));
        }

        doc
    }
}

fn append_drawer(doc: &mut HeadlessDocument, id: &str, complete: bool) {
    doc.append("main", ElementSpec::new("section").id(id).class("drawer"));
    doc.append(
        id,
        ElementSpec::new("button")
            .id(&format!("{id}-header"))
            .class("drawer-header")
            .attr("aria-controls", &format!("{id}-panel"))
            .attr("aria-expanded", "false")
            .text(id),
    );
    if complete {
        doc.append(
            id,
            ElementSpec::new("div")
                .id(&format!("{id}-panel"))
                .class("drawer-panel")
                .hidden(),
        );
        doc.append(
            &format!("{id}-panel"),
            ElementSpec::new("a")
                .id(&format!("{id}-more"))
                .attr("href", &format!("#{id}")),
        );
    }
}

/// Three drawers `A`, `B`, `C`, navigation modal with a close button and
/// two links (three focusables), lightbox with two trigger images.
#[must_use]
pub fn standard_page() -> HeadlessDocument {
    standard_fixture().build()
}

/// [`standard_page`] as a builder, for tweaking before `build()`.
#[must_use]
pub fn standard_fixture() -> PageFixture {
    STANDARD_DRAWERS
        .iter()
        .fold(PageFixture::new(), |fixture, id| fixture.drawer(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::platform::Document;
    use folio_core::ElementId;

    #[test]
    fn standard_page_shape() {
        let doc = standard_page();
        assert_eq!(doc.query_all(".drawer").len(), 3);
        assert_eq!(doc.query_all(".lightbox-trigger").len(), 2);
        assert_eq!(
            doc.descendants(&ElementId::new("nav-modal")).len(),
            3,
            "close button plus two links"
        );
        assert!(doc.is_hidden("B-panel"));
    }

    #[test]
    fn incomplete_drawer_has_no_panel() {
        let doc = PageFixture::new().incomplete_drawer("broken").build();
        assert!(doc.contains(&ElementId::new("broken-header")));
        assert!(!doc.contains(&ElementId::new("broken-panel")));
    }
}
