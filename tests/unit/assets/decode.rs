use std::io::Cursor;

use super::*;

fn png_bytes(img: image::RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let img = image::RgbaImage::from_raw(1, 1, vec![100u8, 50u8, 200u8, 128u8]).unwrap();
    let prepared = decode_image(&png_bytes(img)).unwrap();
    assert_eq!(prepared.width, 1);
    assert_eq!(prepared.height, 1);
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_zero_alpha_clears_color() {
    let img = image::RgbaImage::from_raw(1, 1, vec![9, 9, 9, 0]).unwrap();
    let prepared = decode_image(&png_bytes(img)).unwrap();
    assert_eq!(prepared.rgba8_premul.as_slice(), &[0, 0, 0, 0]);
}

#[test]
fn decode_rejects_garbage() {
    let err = decode_image(b"definitely not an image").unwrap_err();
    assert!(err.to_string().contains("decode image"));
}

#[test]
fn aspect_ratio_of_wide_image() {
    let img = image::RgbaImage::new(8, 4);
    let prepared = decode_image(&png_bytes(img)).unwrap();
    assert_eq!(prepared.aspect_ratio(), 2.0);
}
