use std::sync::Arc;

use super::*;
use crate::host::Subscription;

fn page(header: f64, footer: f64) -> SimulatedPage {
    let page = SimulatedPage::with_surroundings(Viewport::new(1280.0, 800.0, 1.0), header, footer);
    page.apply_layout(&SectionLayout {
        height: 2400.0,
        surface_class: None,
    });
    page
}

#[test]
fn section_bounds_follow_scroll() {
    let p = page(500.0, 300.0);
    assert_eq!(
        p.section_bounds(),
        Some(SectionBounds {
            top: 500.0,
            height: 2400.0
        })
    );
    p.scroll_to(700.0);
    assert_eq!(p.section_bounds().unwrap().top, -200.0);
}

#[test]
fn scroll_is_clamped_to_document() {
    let p = page(500.0, 300.0);
    assert_eq!(p.document_height(), 3200.0);
    p.scroll_to(1e9);
    assert_eq!(p.scroll_y(), 2400.0);
    p.scroll_to(-50.0);
    assert_eq!(p.scroll_y(), 0.0);
    p.scroll_to(f64::NAN);
    assert_eq!(p.scroll_y(), 0.0);
}

#[test]
fn scroll_to_progress_targets_section_range() {
    let p = page(500.0, 1000.0);
    assert_eq!(p.scroll_to_progress(0.0), 500.0);
    assert_eq!(p.scroll_to_progress(0.5), 500.0 + 800.0);
    assert_eq!(p.scroll_to_progress(1.0), 500.0 + 1600.0);
    assert_eq!(p.scroll_to_progress(7.0), 500.0 + 1600.0);
}

#[test]
fn events_are_recorded_only_with_live_listeners() {
    let p = page(0.0, 0.0);
    p.scroll_to(10.0);
    assert!(p.take_events().is_empty());

    let scroll = p.add_listener(ListenerKind::Scroll);
    p.scroll_to(20.0);
    p.resize(Viewport::new(800.0, 600.0, 2.0));
    assert_eq!(p.take_events(), vec![HostEvent::Scroll]);

    p.remove_listener(scroll);
    p.scroll_to(30.0);
    assert!(p.take_events().is_empty());
    assert_eq!(p.listener_count(), 0);
}

#[test]
fn detached_section_has_no_bounds() {
    let p = page(100.0, 0.0);
    p.detach_section();
    assert!(p.section_bounds().is_none());
    assert_eq!(p.document_height(), 100.0);
}

#[test]
fn resize_reclamps_scroll() {
    let p = page(0.0, 0.0);
    p.scroll_to(1600.0);
    p.resize(Viewport::new(1280.0, 2000.0, 1.0));
    assert_eq!(p.scroll_y(), 400.0);
}

#[test]
fn subscription_removes_listener_on_drop() {
    let p = Arc::new(page(0.0, 0.0));
    let host: Arc<dyn HostPage> = p.clone();
    {
        let a = Subscription::new(Arc::clone(&host), ListenerKind::Scroll);
        let b = Subscription::new(Arc::clone(&host), ListenerKind::Resize);
        assert_ne!(a.id(), b.id());
        assert_eq!(b.kind(), ListenerKind::Resize);
        assert_eq!(p.listener_count(), 2);
    }
    assert_eq!(p.listener_count(), 0);
}

#[test]
fn layout_is_recorded() {
    let p = page(0.0, 0.0);
    p.apply_layout(&SectionLayout {
        height: 900.0,
        surface_class: Some("hero-canvas".to_owned()),
    });
    assert_eq!(p.layout().surface_class.as_deref(), Some("hero-canvas"));
    assert_eq!(p.section_bounds().unwrap().height, 900.0);
}
