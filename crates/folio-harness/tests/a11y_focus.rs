#![forbid(unsafe_code)]

//! Keyboard and focus review for drawers and overlays.
//!
//! # Keybindings
//!
//! | Key | Context | Action |
//! |-----|---------|--------|
//! | Enter / Space | drawer header focused | toggle drawer |
//! | Escape | lightbox open | close lightbox |
//! | Escape | navigation open | close navigation |
//! | Tab | last focusable in navigation | wrap to first |
//! | Shift+Tab | first focusable in navigation | wrap to last |
//!
//! # Focus Order Invariants
//!
//! 1. **Modal trap**: Tab never leaves the open navigation modal.
//! 2. **Soft focus**: an opened drawer panel receives focus but does not trap it.
//! 3. **Restore**: closing an overlay returns focus to where it was, if that
//!    element still exists.
//! 4. **Indicators**: every header and the navigation trigger expose their
//!    state through `aria-expanded`, never through visibility alone.
//!
//! # Failure Modes
//!
//! | Scenario | Expected | Verified |
//! |----------|----------|----------|
//! | Restore target removed while open | focus not restored, no panic | ✓ |
//! | Overlay with no focusables | overlay itself is focused | ✓ |
//! | Focus lost inside open modal | Tab pulls it back in | ✓ |
//!
//! Run: `cargo test -p folio-harness --test a11y_focus`

use folio::prelude::*;
use folio::widgets::focus::focusable_within;
use folio_harness::{HeadlessDocument, STANDARD_DRAWERS, standard_page};

// =============================================================================
// Test Utilities
// =============================================================================

/// Emit a JSONL log entry (for CI artifact review).
fn log_jsonl(test: &str, check: &str, passed: bool, notes: &str) {
    eprintln!(
        "{{\"test\":\"{test}\",\"check\":\"{check}\",\"passed\":{passed},\"notes\":\"{notes}\"}}"
    );
}

fn id(s: &str) -> ElementId {
    ElementId::new(s)
}

fn key_press(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code))
}

fn shift_tab() -> Event {
    Event::Key(KeyEvent::new(KeyCode::Tab).with_modifiers(Modifiers::SHIFT))
}

fn focused(doc: &HeadlessDocument) -> String {
    doc.active_element()
        .map(|e| e.to_string())
        .unwrap_or_else(|| "<none>".to_owned())
}

fn open_navigation() -> (HeadlessDocument, Page) {
    let mut doc = standard_page();
    let mut page = Page::mount(&mut doc, PageConfig::headless());
    assert!(doc.focus(&id("nav-toggle")));
    page.handle(&Event::click("nav-toggle"), &mut doc);
    (doc, page)
}

// =============================================================================
// Focus trap
// =============================================================================

#[test]
fn navigation_has_three_focusables_in_document_order() {
    let (doc, _page) = open_navigation();
    let list = focusable_within(&doc, &id("nav-modal"));
    let expected = vec![id("nav-close"), id("nav-link-A"), id("nav-link-B")];
    log_jsonl(
        "focus_order",
        "navigation_list",
        list == expected,
        &format!("{} focusables", list.len()),
    );
    assert_eq!(list, expected);
}

#[test]
fn tab_on_third_wraps_to_first() {
    let (mut doc, mut page) = open_navigation();
    assert!(doc.focus(&id("nav-link-B")));

    let outcome = page.handle(&key_press(KeyCode::Tab), &mut doc);
    log_jsonl("focus_trap", "tab_wraps", focused(&doc) == "nav-close", &focused(&doc));
    assert!(outcome.prevent_default);
    assert_eq!(doc.active_element(), Some(id("nav-close")));
}

#[test]
fn shift_tab_on_first_wraps_to_third() {
    let (mut doc, mut page) = open_navigation();
    assert_eq!(doc.active_element(), Some(id("nav-close")), "auto-focus");

    let outcome = page.handle(&shift_tab(), &mut doc);
    log_jsonl(
        "focus_trap",
        "shift_tab_wraps",
        focused(&doc) == "nav-link-B",
        &focused(&doc),
    );
    assert!(outcome.prevent_default);
    assert_eq!(doc.active_element(), Some(id("nav-link-B")));
}

#[test]
fn tab_in_the_middle_is_left_to_the_platform() {
    let (mut doc, mut page) = open_navigation();
    assert!(doc.focus(&id("nav-link-A")));
    let outcome = page.handle(&key_press(KeyCode::Tab), &mut doc);
    log_jsonl("focus_trap", "middle_passes", !outcome.handled, "");
    assert_eq!(outcome, EventOutcome::IGNORED);
    assert_eq!(doc.active_element(), Some(id("nav-link-A")));
}

#[test]
fn lost_focus_is_pulled_back_into_the_modal() {
    let (mut doc, mut page) = open_navigation();
    // Focus on the dialog element itself, outside the focusable list.
    assert!(doc.click_focus("nav-modal"));

    page.handle(&key_press(KeyCode::Tab), &mut doc);
    assert_eq!(doc.active_element(), Some(id("nav-close")));
    assert!(doc.click_focus("nav-modal"));
    page.handle(&shift_tab(), &mut doc);
    log_jsonl("focus_trap", "entered", focused(&doc) == "nav-link-B", &focused(&doc));
    assert_eq!(doc.active_element(), Some(id("nav-link-B")));
}

#[test]
fn focusables_are_recomputed_on_every_tab() {
    let (mut doc, mut page) = open_navigation();
    doc.set_hidden(&id("nav-link-B"), true);
    assert!(doc.focus(&id("nav-link-A")));

    page.handle(&key_press(KeyCode::Tab), &mut doc);
    log_jsonl(
        "focus_trap",
        "hidden_excluded",
        focused(&doc) == "nav-close",
        &focused(&doc),
    );
    assert_eq!(doc.active_element(), Some(id("nav-close")));
}

// =============================================================================
// Restore
// =============================================================================

#[test]
fn close_control_restores_focus_to_trigger() {
    let (mut doc, mut page) = open_navigation();
    page.handle(&Event::click("nav-close"), &mut doc);
    log_jsonl("restore", "close_control", focused(&doc) == "nav-toggle", &focused(&doc));
    assert_eq!(doc.active_element(), Some(id("nav-toggle")));
}

#[test]
fn removed_restore_target_is_skipped() {
    let (mut doc, mut page) = open_navigation();
    doc.remove("nav-toggle");

    let outcome = page.handle(&key_press(KeyCode::Escape), &mut doc);
    log_jsonl("restore", "detached_target", outcome.handled, &focused(&doc));
    assert!(outcome.handled);
    assert!(!page.navigation().is_open());
    assert_eq!(doc.active_element(), None);
    assert_eq!(page.focus().outstanding(), 0);
}

#[test]
fn lightbox_close_restores_focus() {
    let mut doc = standard_page();
    let mut page = Page::mount(&mut doc, PageConfig::headless());
    assert!(doc.focus(&id("C-header")));

    page.handle(&Event::click("photo-1"), &mut doc);
    assert_eq!(doc.active_element(), Some(id("lightbox-close")));
    page.handle(&key_press(KeyCode::Escape), &mut doc);
    log_jsonl("restore", "lightbox", focused(&doc) == "C-header", &focused(&doc));
    assert_eq!(doc.active_element(), Some(id("C-header")));
}

// =============================================================================
// Drawers
// =============================================================================

#[test]
fn panel_gets_soft_focus_without_trap() {
    let mut doc = standard_page();
    let mut page = Page::mount(&mut doc, PageConfig::headless());
    assert!(doc.focus(&id("A-header")));
    page.handle(&key_press(KeyCode::Enter), &mut doc);

    let tabindex = doc.attribute(&id("A-panel"), "tabindex");
    log_jsonl(
        "drawer_focus",
        "soft_focus",
        focused(&doc) == "A-panel",
        tabindex.as_deref().unwrap_or(""),
    );
    assert_eq!(doc.active_element(), Some(id("A-panel")));
    assert_eq!(tabindex.as_deref(), Some("-1"));

    let outcome = page.handle(&key_press(KeyCode::Tab), &mut doc);
    assert_eq!(outcome, EventOutcome::IGNORED, "no trap around a drawer");
}

#[test]
fn space_toggles_a_header_closed_again() {
    let mut doc = standard_page();
    let mut page = Page::mount(&mut doc, PageConfig::headless());
    assert!(doc.focus(&id("B-header")));
    page.handle(&key_press(KeyCode::Char(' ')), &mut doc);
    assert!(doc.focus(&id("B-header")));
    let outcome = page.handle(&key_press(KeyCode::Char(' ')), &mut doc);

    log_jsonl(
        "drawer_keys",
        "space_toggle",
        page.registry().expanded_id().is_none(),
        "",
    );
    assert!(outcome.prevent_default, "space must not scroll the page");
    assert_eq!(page.registry().expanded_id(), None);
}

#[test]
fn indicators_are_text_not_visibility_alone() {
    let mut doc = standard_page();
    let mut page = Page::mount(&mut doc, PageConfig::headless());
    page.open_drawer("C", &mut doc);

    for drawer in STANDARD_DRAWERS {
        let header = format!("{drawer}-header");
        let expected = if drawer == "C" { "true" } else { "false" };
        let actual = doc.attribute(&id(&header), "aria-expanded");
        log_jsonl(
            "indicators",
            &header,
            actual.as_deref() == Some(expected),
            actual.as_deref().unwrap_or("missing"),
        );
        assert_eq!(actual.as_deref(), Some(expected));
    }
    assert_eq!(
        doc.attribute(&id("nav-toggle"), "aria-expanded").as_deref(),
        Some("false")
    );
}

#[test]
fn escape_prefers_the_lightbox() {
    let mut doc = standard_page();
    let mut page = Page::mount(&mut doc, PageConfig::headless());
    page.handle(&Event::click("photo-1"), &mut doc);

    let outcome = page.handle(&key_press(KeyCode::Escape), &mut doc);
    log_jsonl("escape", "lightbox_first", !page.lightbox().is_open(), "");
    assert!(outcome.prevent_default);
    assert!(!page.lightbox().is_open());
    assert!(!page.navigation().is_open());
}
