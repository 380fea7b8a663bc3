use super::*;

fn frame_2x1() -> FrameRGBA {
    FrameRGBA {
        width: 2,
        height: 1,
        data: vec![255, 0, 0, 255, 0, 0, 0, 0],
        premultiplied: true,
    }
}

#[test]
fn pixel_lookup_bounds() {
    let f = frame_2x1();
    assert_eq!(f.pixel(0, 0), Some([255, 0, 0, 255]));
    assert_eq!(f.pixel(1, 0), Some([0, 0, 0, 0]));
    assert_eq!(f.pixel(2, 0), None);
    assert_eq!(f.pixel(0, 1), None);
}

#[test]
fn flatten_keeps_opaque_and_fills_transparent_with_bg() {
    let f = frame_2x1();
    let out = f.flatten_over([10, 20, 30, 255]);
    assert_eq!(out, vec![255, 0, 0, 255, 10, 20, 30, 255]);
}
