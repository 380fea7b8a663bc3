use super::*;

#[test]
fn backing_store_scales_by_pixel_ratio() {
    let s = compute_surface(1280.0, 720.0, 1.5);
    assert_eq!(s.backing_width, 1920);
    assert_eq!(s.backing_height, 1080);
    assert_eq!(s.logical_width, 1280.0);
    assert_eq!(s.logical_height, 720.0);
    assert_eq!(s.pixel_ratio, 1.5);
}

#[test]
fn backing_store_floors_fractional_sizes() {
    let s = compute_surface(333.0, 101.0, 1.25);
    assert_eq!(s.backing_width, 416);
    assert_eq!(s.backing_height, 126);
}

#[test]
fn pixel_ratio_is_capped_and_sanitized() {
    assert_eq!(compute_surface(100.0, 50.0, 3.0).backing_width, 200);
    assert_eq!(compute_surface(100.0, 50.0, 3.0).pixel_ratio, 2.0);
    assert_eq!(compute_surface(100.0, 50.0, 0.0).pixel_ratio, 1.0);
    assert_eq!(compute_surface(100.0, 50.0, -2.0).pixel_ratio, 1.0);
    assert_eq!(compute_surface(100.0, 50.0, f64::NAN).pixel_ratio, 1.0);
}

#[test]
fn zero_viewport_is_detached() {
    let s = compute_surface(0.0, 600.0, 2.0);
    assert!(s.is_detached());
    let s = compute_surface(f64::INFINITY, 600.0, 1.0);
    assert!(s.is_detached());
}

#[test]
fn paint_on_unsized_or_detached_surface_is_noop() {
    let mut surface = Surface::new();
    let mut called = false;
    assert!(!surface
        .paint(|_| {
            called = true;
            Ok(())
        })
        .unwrap());
    assert!(!called);

    surface.ensure(compute_surface(0.0, 0.0, 1.0)).unwrap();
    assert!(!surface.is_attached());
    assert!(!surface.paint(|_| Ok(())).unwrap());
    assert!(surface.snapshot().is_none());
}

#[test]
fn ensure_reallocates_only_on_change() {
    let mut surface = Surface::new();
    let a = compute_surface(4.0, 3.0, 1.0);
    assert!(surface.ensure(a).unwrap());
    assert!(!surface.ensure(a).unwrap());

    let b = compute_surface(4.0, 3.0, 2.0);
    assert!(surface.ensure(b).unwrap());
    let snap = surface.snapshot().unwrap();
    assert_eq!((snap.width, snap.height), (8, 6));
}

#[test]
fn oversized_surface_is_an_error_and_detaches() {
    let mut surface = Surface::new();
    let err = surface
        .ensure(compute_surface(40_000.0, 10.0, 2.0))
        .unwrap_err();
    assert!(err.to_string().contains("exceeds u16"));
    assert!(!surface.is_attached());
}

#[test]
fn logical_drawing_covers_full_backing_store() {
    let mut surface = Surface::new();
    surface.ensure(compute_surface(4.0, 3.0, 2.0)).unwrap();
    surface
        .paint(|t| {
            assert_eq!((t.width(), t.height()), (4.0, 3.0));
            t.fill_rect(t.bounds(), Rgba8::new(255, 0, 0, 255));
            Ok(())
        })
        .unwrap();

    let snap = surface.snapshot().unwrap();
    for px in snap.data.chunks_exact(4) {
        assert_eq!(px, &[255, 0, 0, 255]);
    }
    assert_eq!(surface.paint_count(), 1);
}

#[test]
fn failed_draw_keeps_previous_contents() {
    let mut surface = Surface::new();
    surface.ensure(compute_surface(2.0, 2.0, 1.0)).unwrap();
    surface
        .paint(|t| {
            t.fill_rect(t.bounds(), Rgba8::new(0, 0, 255, 255));
            Ok(())
        })
        .unwrap();
    let before = surface.snapshot().unwrap();

    let err = surface
        .paint(|t| {
            t.fill_rect(t.bounds(), Rgba8::new(0, 255, 0, 255));
            Err(ScrubError::render("nope"))
        })
        .unwrap_err();
    assert!(err.to_string().contains("nope"));
    assert_eq!(surface.snapshot().unwrap(), before);
}

#[test]
fn clear_discards_earlier_draws() {
    let mut surface = Surface::new();
    surface.ensure(compute_surface(2.0, 2.0, 1.0)).unwrap();
    surface
        .paint(|t| {
            t.fill_rect(t.bounds(), Rgba8::new(255, 255, 255, 255));
            t.clear(Rgba8::TRANSPARENT);
            Ok(())
        })
        .unwrap();
    let snap = surface.snapshot().unwrap();
    assert!(snap.data.iter().all(|&b| b == 0));
}

#[test]
fn image_paint_rejects_bad_lengths() {
    assert!(ImagePaint::from_premul_rgba8(&[0, 0, 0], 1, 1).is_err());
    let p = ImagePaint::from_premul_rgba8(&[1, 2, 3, 255], 1, 1).unwrap();
    assert_eq!((p.width(), p.height()), (1, 1));
}
