#![forbid(unsafe_code)]

//! Page configuration.
//!
//! [`MarkupConfig`] says where things are in the document; [`PageConfig`]
//! adds the behavioural knobs. Both default to the stock markup contract:
//!
//! | part | default |
//! |------|---------|
//! | drawer container / header | `.drawer` / `.drawer-header` |
//! | navigation overlay / trigger / close | `#nav-modal` / `#nav-toggle` / `#nav-close` |
//! | lightbox overlay / close | `#lightbox` / `#lightbox-close` |
//! | lightbox image / caption | `#lightbox-image` / `#lightbox-caption` |
//! | lightbox triggers | `.lightbox-trigger` |
//!
//! With the `policy-config` feature a [`PageConfig`] can be read from TOML;
//! see [`PageConfig::from_toml_str`].

use folio_core::platform::ScrollBehavior;
use folio_widgets::{DrawerMarkup, MediaParts, OverlayParts};
use web_time::Duration;

/// How long lightbox media stays in place after close by default.
pub const DEFAULT_LIGHTBOX_CLEAR_DELAY: Duration = Duration::from_millis(300);

/// When the drawer named by the fragment at load is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadDefer {
    /// On the first animation frame after load.
    #[default]
    NextFrame,
    /// After a fixed delay, for hosts without frame callbacks.
    Delay(Duration),
}

/// Which overlays trap Tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrapPolicy {
    #[default]
    NavigationOnly,
    AllOverlays,
}

impl TrapPolicy {
    #[must_use]
    pub fn traps_lightbox(self) -> bool {
        self == Self::AllOverlays
    }
}

/// Where folio finds its parts in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupConfig {
    pub drawers: DrawerMarkup,
    pub navigation: OverlayParts,
    pub lightbox: OverlayParts,
    pub lightbox_media: MediaParts,
    /// Selects images that open the lightbox when clicked.
    pub lightbox_trigger_selector: String,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            drawers: DrawerMarkup::default(),
            navigation: OverlayParts::new("nav-modal")
                .trigger("nav-toggle")
                .close("nav-close"),
            lightbox: OverlayParts::new("lightbox").close("lightbox-close"),
            lightbox_media: MediaParts::new("lightbox-image").caption("lightbox-caption"),
            lightbox_trigger_selector: ".lightbox-trigger".to_owned(),
        }
    }
}

impl MarkupConfig {
    #[must_use]
    pub fn drawers(mut self, drawers: DrawerMarkup) -> Self {
        self.drawers = drawers;
        self
    }

    #[must_use]
    pub fn navigation(mut self, parts: OverlayParts) -> Self {
        self.navigation = parts;
        self
    }

    #[must_use]
    pub fn lightbox(mut self, parts: OverlayParts, media: MediaParts) -> Self {
        self.lightbox = parts;
        self.lightbox_media = media;
        self
    }

    #[must_use]
    pub fn lightbox_trigger_selector(mut self, selector: impl Into<String>) -> Self {
        self.lightbox_trigger_selector = selector.into();
        self
    }
}

/// Everything a [`Page`](crate::Page) needs to know up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageConfig {
    pub markup: MarkupConfig,
    pub load_defer: LoadDefer,
    /// Zero clears media in the same dispatch as the close.
    pub lightbox_clear_delay: Duration,
    pub trap: TrapPolicy,
    pub scroll: ScrollBehavior,
    /// Close the navigation modal when an in-page link inside it is clicked.
    pub close_nav_on_link: bool,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            markup: MarkupConfig::default(),
            load_defer: LoadDefer::default(),
            lightbox_clear_delay: DEFAULT_LIGHTBOX_CLEAR_DELAY,
            trap: TrapPolicy::default(),
            scroll: ScrollBehavior::default(),
            close_nav_on_link: true,
        }
    }
}

impl PageConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults tuned for tests and headless hosts: no presentation delays
    /// and instant scrolling.
    #[must_use]
    pub fn headless() -> Self {
        Self::default()
            .lightbox_clear_delay(Duration::ZERO)
            .scroll(ScrollBehavior::Instant)
    }

    #[must_use]
    pub fn markup(mut self, markup: MarkupConfig) -> Self {
        self.markup = markup;
        self
    }

    #[must_use]
    pub fn load_defer(mut self, defer: LoadDefer) -> Self {
        self.load_defer = defer;
        self
    }

    #[must_use]
    pub fn lightbox_clear_delay(mut self, delay: Duration) -> Self {
        self.lightbox_clear_delay = delay;
        self
    }

    #[must_use]
    pub fn trap(mut self, policy: TrapPolicy) -> Self {
        self.trap = policy;
        self
    }

    #[must_use]
    pub fn scroll(mut self, behavior: ScrollBehavior) -> Self {
        self.scroll = behavior;
        self
    }

    #[must_use]
    pub fn close_nav_on_link(mut self, enabled: bool) -> Self {
        self.close_nav_on_link = enabled;
        self
    }
}

#[cfg(feature = "policy-config")]
pub use policy::ConfigError;

#[cfg(feature = "policy-config")]
mod policy {
    use core::fmt;

    use serde::Deserialize;

    use super::*;

    /// A policy file that could not be used.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum ConfigError {
        /// Not valid TOML, or a field has the wrong type.
        Parse(String),
        /// A field parsed but names no known option.
        Invalid { field: &'static str, value: String },
    }

    impl fmt::Display for ConfigError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Self::Parse(msg) => write!(f, "policy file: {msg}"),
                Self::Invalid { field, value } => {
                    write!(f, "policy file: unknown {field} {value:?}")
                }
            }
        }
    }

    impl std::error::Error for ConfigError {}

    impl From<toml::de::Error> for ConfigError {
        fn from(err: toml::de::Error) -> Self {
            Self::Parse(err.to_string())
        }
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default, deny_unknown_fields)]
    struct PolicyFile {
        /// Absent means "next frame".
        load_delay_ms: Option<u64>,
        lightbox_clear_delay_ms: Option<u64>,
        trap: Option<String>,
        scroll: Option<String>,
        close_nav_on_link: Option<bool>,
        markup: MarkupFile,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default, deny_unknown_fields)]
    struct MarkupFile {
        drawer_selector: Option<String>,
        header_selector: Option<String>,
        panel_ref_attr: Option<String>,
        lightbox_trigger_selector: Option<String>,
        navigation: Option<String>,
        navigation_trigger: Option<String>,
        navigation_close: Option<String>,
        lightbox: Option<String>,
        lightbox_close: Option<String>,
        lightbox_image: Option<String>,
        lightbox_caption: Option<String>,
    }

    impl PageConfig {
        /// Read a policy file. Absent keys keep their defaults.
        ///
        /// ```toml
        /// load_delay_ms = 50
        /// lightbox_clear_delay_ms = 0
        /// trap = "all-overlays"
        /// scroll = "instant"
        ///
        /// [markup]
        /// drawer_selector = ".faq"
        /// navigation = "menu"
        /// ```
        pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
            let file: PolicyFile = toml::from_str(source)?;
            let mut config = Self::default();

            if let Some(ms) = file.load_delay_ms {
                config.load_defer = LoadDefer::Delay(Duration::from_millis(ms));
            }
            if let Some(ms) = file.lightbox_clear_delay_ms {
                config.lightbox_clear_delay = Duration::from_millis(ms);
            }
            if let Some(trap) = file.trap {
                config.trap = match trap.as_str() {
                    "navigation-only" => TrapPolicy::NavigationOnly,
                    "all-overlays" => TrapPolicy::AllOverlays,
                    _ => return Err(ConfigError::Invalid { field: "trap", value: trap }),
                };
            }
            if let Some(scroll) = file.scroll {
                config.scroll = match scroll.as_str() {
                    "smooth" => ScrollBehavior::Smooth,
                    "instant" => ScrollBehavior::Instant,
                    _ => {
                        return Err(ConfigError::Invalid {
                            field: "scroll",
                            value: scroll,
                        });
                    }
                };
            }
            if let Some(enabled) = file.close_nav_on_link {
                config.close_nav_on_link = enabled;
            }

            let m = file.markup;
            let markup = &mut config.markup;
            if let Some(v) = m.drawer_selector {
                markup.drawers.drawer_selector = v;
            }
            if let Some(v) = m.header_selector {
                markup.drawers.header_selector = v;
            }
            if let Some(v) = m.panel_ref_attr {
                markup.drawers.panel_ref_attr = v;
            }
            if let Some(v) = m.lightbox_trigger_selector {
                markup.lightbox_trigger_selector = v;
            }
            if let Some(v) = m.navigation {
                markup.navigation.overlay = v.into();
            }
            if let Some(v) = m.navigation_trigger {
                markup.navigation.trigger = Some(v.into());
            }
            if let Some(v) = m.navigation_close {
                markup.navigation.close = Some(v.into());
            }
            if let Some(v) = m.lightbox {
                markup.lightbox.overlay = v.into();
            }
            if let Some(v) = m.lightbox_close {
                markup.lightbox.close = Some(v.into());
            }
            if let Some(v) = m.lightbox_image {
                markup.lightbox_media.image = v.into();
            }
            if let Some(v) = m.lightbox_caption {
                markup.lightbox_media.caption = Some(v.into());
            }
            Ok(config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::ElementId;

    #[test]
    fn defaults_match_stock_markup() {
        let config = PageConfig::default();
        assert_eq!(config.markup.navigation.overlay, ElementId::new("nav-modal"));
        assert_eq!(
            config.markup.navigation.trigger,
            Some(ElementId::new("nav-toggle"))
        );
        assert_eq!(config.markup.lightbox.trigger, None);
        assert_eq!(config.load_defer, LoadDefer::NextFrame);
        assert_eq!(config.lightbox_clear_delay, DEFAULT_LIGHTBOX_CLEAR_DELAY);
        assert_eq!(config.trap, TrapPolicy::NavigationOnly);
        assert!(config.close_nav_on_link);
    }

    #[test]
    fn headless_drops_presentation_delays() {
        let config = PageConfig::headless();
        assert_eq!(config.lightbox_clear_delay, Duration::ZERO);
        assert_eq!(config.scroll, ScrollBehavior::Instant);
    }

    #[test]
    fn builders_chain() {
        let config = PageConfig::new()
            .load_defer(LoadDefer::Delay(Duration::from_millis(40)))
            .trap(TrapPolicy::AllOverlays)
            .close_nav_on_link(false)
            .markup(MarkupConfig::default().lightbox_trigger_selector("img.zoom"));
        assert!(config.trap.traps_lightbox());
        assert!(!config.close_nav_on_link);
        assert_eq!(config.markup.lightbox_trigger_selector, "img.zoom");
    }

    #[cfg(feature = "policy-config")]
    mod policy_file {
        use super::*;

        #[test]
        fn empty_file_is_default() {
            assert_eq!(PageConfig::from_toml_str(""), Ok(PageConfig::default()));
        }

        #[test]
        fn overrides_apply() {
            let config = PageConfig::from_toml_str(
                r#"
                load_delay_ms = 50
                lightbox_clear_delay_ms = 0
                trap = "all-overlays"
                scroll = "instant"
                close_nav_on_link = false

                [markup]
                drawer_selector = ".faq"
                navigation = "menu"
                lightbox_caption = "cap"
                "#,
            )
            .unwrap();
            assert_eq!(config.load_defer, LoadDefer::Delay(Duration::from_millis(50)));
            assert_eq!(config.lightbox_clear_delay, Duration::ZERO);
            assert_eq!(config.trap, TrapPolicy::AllOverlays);
            assert_eq!(config.scroll, ScrollBehavior::Instant);
            assert!(!config.close_nav_on_link);
            assert_eq!(config.markup.drawers.drawer_selector, ".faq");
            assert_eq!(config.markup.navigation.overlay, ElementId::new("menu"));
            assert_eq!(
                config.markup.lightbox_media.caption,
                Some(ElementId::new("cap"))
            );
        }

        #[test]
        fn bad_values_are_reported() {
            assert_eq!(
                PageConfig::from_toml_str(r#"trap = "sometimes""#),
                Err(ConfigError::Invalid {
                    field: "trap",
                    value: "sometimes".into()
                })
            );
            assert!(matches!(
                PageConfig::from_toml_str("load_delay_ms = \"soon\""),
                Err(ConfigError::Parse(_))
            ));
            assert!(matches!(
                PageConfig::from_toml_str("colour = 3"),
                Err(ConfigError::Parse(_))
            ));
        }
    }
}
