use super::*;

#[test]
fn frame_index_clamps_into_sequence() {
    assert_eq!(FrameIndex(5).clamp_to(3), FrameIndex(2));
    assert_eq!(FrameIndex(1).clamp_to(3), FrameIndex(1));
    assert_eq!(FrameIndex(7).clamp_to(0), FrameIndex(0));
}

#[test]
fn frame_index_progress_endpoints() {
    assert_eq!(FrameIndex(0).progress(180), 0.0);
    assert_eq!(FrameIndex(179).progress(180), 1.0);
    assert_eq!(FrameIndex(0).progress(1), 0.0);
    assert_eq!(FrameIndex(9).progress(1), 0.0);
}

#[test]
fn hsl_primaries() {
    assert_eq!(Rgba8::from_hsl(0.0, 1.0, 0.5), Rgba8::new(255, 0, 0, 255));
    assert_eq!(Rgba8::from_hsl(120.0, 1.0, 0.5), Rgba8::new(0, 255, 0, 255));
    assert_eq!(Rgba8::from_hsl(240.0, 1.0, 0.5), Rgba8::new(0, 0, 255, 255));
    assert_eq!(Rgba8::from_hsl(360.0, 1.0, 0.5), Rgba8::new(255, 0, 0, 255));
    assert_eq!(Rgba8::from_hsl(42.0, 0.0, 1.0), Rgba8::new(255, 255, 255, 255));
}

#[test]
fn lerp_endpoints_and_midpoint() {
    let a = Rgba8::new(0, 0, 0, 0);
    let b = Rgba8::new(200, 100, 50, 255);
    assert_eq!(a.lerp(b, 0.0), a);
    assert_eq!(a.lerp(b, 1.0), b);
    assert_eq!(a.lerp(b, 0.5), Rgba8::new(100, 50, 25, 128));
}

#[test]
fn premul_scales_color_channels() {
    let c = Rgba8::new(100, 50, 200, 128);
    assert_eq!(
        c.to_premul_array(),
        [
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128
        ]
    );
    assert_eq!(Rgba8::TRANSPARENT.to_premul_array(), [0, 0, 0, 0]);
}
