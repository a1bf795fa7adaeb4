use super::*;

#[test]
fn new_rejects_zero_dimensions() {
    assert!(matches!(
        Canvas::new(Size::new(0, 10), Rgba8::TRANSPARENT),
        Err(SceneError::InvalidDimension(_))
    ));
    assert!(matches!(
        Canvas::new(Size::new(10, 0), Rgba8::TRANSPARENT),
        Err(SceneError::InvalidDimension(_))
    ));
}

#[test]
fn new_fills_with_background() {
    let bg = Rgba8::new(1, 2, 3, 4);
    let c = Canvas::new(Size::new(3, 2), bg).unwrap();
    assert_eq!(c.size(), Size::new(3, 2));
    assert!(c.pixels().pixels().all(|p| p.0 == [1, 2, 3, 4]));
}

#[test]
fn reset_discards_painting_and_keeps_size() {
    let mut c = Canvas::new(Size::new(2, 2), Rgba8::TRANSPARENT).unwrap();
    let layer = image::RgbaImage::from_pixel(1, 1, image::Rgba([9, 9, 9, 255]));
    c.paint(&layer, Offset::new(0, 0));
    assert_eq!(c.pixels().get_pixel(0, 0).0, [9, 9, 9, 255]);

    c.reset(Rgba8::opaque(5, 5, 5));
    assert_eq!(c.size(), Size::new(2, 2));
    assert_eq!(c.background(), Rgba8::opaque(5, 5, 5));
    assert!(c.pixels().pixels().all(|p| p.0 == [5, 5, 5, 255]));
}

#[test]
fn png_round_trip_preserves_translucent_background() {
    let bg = Rgba8::new(10, 20, 30, 128);
    let c = Canvas::new(Size::new(5, 7), bg).unwrap();
    let bytes = c.encode(OutputFormat::Png).unwrap();

    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (5, 7));
    assert!(decoded.pixels().all(|p| p.0 == [10, 20, 30, 128]));
}

#[test]
fn jpeg_is_flattened_to_rgb() {
    let c = Canvas::new(Size::new(8, 8), Rgba8::opaque(200, 0, 0)).unwrap();
    let bytes = c.encode(OutputFormat::Jpeg).unwrap();
    assert!(!bytes.is_empty());
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (8, 8));
}

#[test]
fn unknown_extension_is_encode_error() {
    let err = format_from_path(Path::new("out.notaformat")).unwrap_err();
    assert!(matches!(err, SceneError::Encode(_)));
    assert_eq!(
        format_from_path(Path::new("x/out.PNG")).unwrap(),
        OutputFormat::Png
    );
}
