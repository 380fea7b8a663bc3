use super::*;
use crate::render::surface::{Surface, compute_surface};

const FONT_PATH: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/tests/data/fonts/DejaVuSerif.ttf"
);

fn font() -> FontBytes {
    FontBytes::from_path(FONT_PATH).unwrap()
}

const WHITE: Rgba8 = Rgba8::new(255, 255, 255, 255);

#[test]
fn same_font_is_registered_once() {
    let font = font();
    let mut engine = TextLayoutEngine::new();

    let a = engine.layout_line(&font, "Frame 1 / 180", 16.0, WHITE).unwrap();
    let b = engine
        .layout_line(&font.clone(), "Frame 2 / 180", 16.0, WHITE)
        .unwrap();
    assert_eq!(engine.registrations(), 1);
    assert!(a.layout.width() > 0.0);
    assert!(b.layout.width() > 0.0);
}

#[test]
fn different_font_source_registers_again() {
    let first = font();
    let second = FontBytes::new(first.as_bytes().to_vec());
    let mut engine = TextLayoutEngine::new();

    engine.layout_line(&first, "a", 12.0, WHITE).unwrap();
    engine.layout_line(&second, "a", 12.0, WHITE).unwrap();
    engine.layout_line(&second, "b", 12.0, WHITE).unwrap();
    assert_eq!(engine.registrations(), 2);
}

#[test]
fn wider_text_lays_out_wider() {
    let font = font();
    let mut engine = TextLayoutEngine::new();
    let short = engine.layout_line(&font, "ab", 20.0, WHITE).unwrap();
    let long = engine.layout_line(&font, "abababab", 20.0, WHITE).unwrap();
    assert!(long.layout.width() > short.layout.width());
}

#[test]
fn invalid_sizes_and_bytes_are_rejected() {
    let mut engine = TextLayoutEngine::new();
    assert!(engine.layout_line(&font(), "x", 0.0, WHITE).is_err());
    assert!(engine.layout_line(&font(), "x", f32::NAN, WHITE).is_err());

    let err = engine
        .layout_line(&FontBytes::new(b"not a font".to_vec()), "x", 12.0, WHITE)
        .err()
        .unwrap();
    assert!(err.to_string().starts_with("validation error:"));
}

#[test]
fn missing_font_file_is_an_error() {
    let err = FontBytes::from_path("tests/data/fonts/missing.ttf").unwrap_err();
    assert!(err.to_string().contains("read font"));
}

#[test]
fn centered_text_draws_glyph_pixels() {
    let font = font();
    let mut surface = Surface::new();
    surface.ensure(compute_surface(120.0, 40.0, 1.0)).unwrap();
    surface
        .paint(|t| t.draw_text_centered(&font, "Scroll", 24.0, WHITE, 60.0, 8.0))
        .unwrap();

    let snap = surface.snapshot().unwrap();
    let inked = snap.data.chunks_exact(4).filter(|px| px[3] > 0).count();
    assert!(inked > 0);
    // Centered: ink on both halves, none in the outer margins.
    let column_has_ink = |x: u32| (0..snap.height).any(|y| snap.pixel(x, y).unwrap()[3] > 0);
    assert!((0..60).any(column_has_ink));
    assert!((60..120).any(column_has_ink));
    assert!(!column_has_ink(0));
    assert!(!column_has_ink(119));
}

#[test]
fn repeated_paints_reuse_the_registered_font() {
    let font = font();
    let mut surface = Surface::new();
    surface.ensure(compute_surface(120.0, 40.0, 1.0)).unwrap();
    for label in ["Frame 1", "Frame 2", "Frame 3"] {
        surface
            .paint(|t| t.draw_text_centered(&font, label, 16.0, WHITE, 60.0, 4.0))
            .unwrap();
    }
    assert_eq!(surface.paint_count(), 3);
    assert_eq!(surface.font_registrations(), 1);
}
