use proptest::prelude::*;

use super::*;
use crate::foundation::core::Rgba8;

fn solid_source(w: u32, h: u32, px: [u8; 4]) -> SourceImage {
    SourceImage::from_image(image::RgbaImage::from_pixel(w, h, image::Rgba(px)))
}

#[test]
fn measure_matches_reference_card_on_hd_canvas() {
    let layer = ImageLayer::new(solid_source(600, 800, [1, 2, 3, 255]));
    let size = layer
        .measure(Size::new(1920, 1080), &Placements::default())
        .unwrap();
    assert_eq!(size, Size::new(539, 719));

    let pos = layer
        .position(Size::new(1920, 1080), size, &Placements::default())
        .unwrap();
    assert_eq!(pos, Offset::new(690, 180));
}

#[test]
fn zero_height_source_is_rejected_at_measure() {
    let layer = ImageLayer::new(SourceImage::from_rgba8(10, 0, Vec::new()).unwrap());
    let err = layer
        .measure(Size::new(100, 100), &Placements::default())
        .unwrap_err();
    assert!(matches!(err, SceneError::InvalidSourceImage(_)));
}

#[test]
fn with_scale_rejects_non_positive_and_non_finite() {
    let src = solid_source(2, 2, [0, 0, 0, 255]);
    assert!(ImageLayer::with_scale(src.clone(), 0.0).is_err());
    assert!(ImageLayer::with_scale(src.clone(), -0.5).is_err());
    assert!(ImageLayer::with_scale(src.clone(), f64::NAN).is_err());
    assert_eq!(ImageLayer::with_scale(src, 1.0).unwrap().scale(), 1.0);
}

#[test]
fn oversized_layer_gets_negative_position() {
    let layer = ImageLayer::with_scale(solid_source(400, 100, [0, 0, 0, 255]), 2.0).unwrap();
    let canvas = Size::new(100, 100);
    let size = layer.measure(canvas, &Placements::default()).unwrap();
    assert_eq!(size, Size::new(800, 200));
    let pos = layer
        .position(canvas, size, &Placements::default())
        .unwrap();
    assert_eq!(pos, Offset::new(-350, -50));
}

#[test]
fn filter_is_smooth_only_when_shrinking() {
    assert_eq!(resample_filter(800, 719), FilterType::Lanczos3);
    assert_eq!(resample_filter(800, 800), FilterType::Nearest);
    assert_eq!(resample_filter(10, 100), FilterType::Nearest);
}

#[test]
fn upscaled_pixel_art_stays_crisp() {
    let mut src = image::RgbaImage::new(2, 1);
    src.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
    src.put_pixel(1, 0, image::Rgba([0, 0, 255, 255]));
    let mut layer = ImageLayer::with_scale(SourceImage::from_image(src), 1.0).unwrap();

    let mut canvas = Canvas::new(Size::new(4, 2), Rgba8::TRANSPARENT).unwrap();
    let size = layer
        .measure(canvas.size(), &Placements::default())
        .unwrap();
    assert_eq!(size, Size::new(4, 2));
    let pos = layer
        .position(canvas.size(), size, &Placements::default())
        .unwrap();
    layer.render(&mut canvas, pos, size).unwrap();

    let px = canvas.pixels();
    assert_eq!(px.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(px.get_pixel(1, 1).0, [255, 0, 0, 255]);
    assert_eq!(px.get_pixel(2, 0).0, [0, 0, 255, 255]);
    assert_eq!(px.get_pixel(3, 1).0, [0, 0, 255, 255]);
}

#[test]
fn shrunk_card_is_painted_centered() {
    let mut layer = ImageLayer::new(solid_source(30, 60, [10, 200, 30, 255]));
    let bg = Rgba8::opaque(204, 241, 255);
    let mut canvas = Canvas::new(Size::new(90, 30), bg).unwrap();

    let size = layer
        .measure(canvas.size(), &Placements::default())
        .unwrap();
    assert_eq!(size, Size::new(9, 19));
    let pos = layer
        .position(canvas.size(), size, &Placements::default())
        .unwrap();
    assert_eq!(pos, Offset::new(40, 5));
    layer.render(&mut canvas, pos, size).unwrap();

    let px = canvas.pixels();
    assert_eq!(px.get_pixel(44, 14).0, [10, 200, 30, 255]);
    assert_eq!(px.get_pixel(39, 14).0, bg.to_array());
    assert_eq!(px.get_pixel(49, 14).0, bg.to_array());
    assert_eq!(px.get_pixel(44, 4).0, bg.to_array());
}

#[test]
fn scale_past_u32_pixels_is_an_invalid_dimension() {
    let layer = ImageLayer::with_scale(solid_source(1, 1, [0, 0, 0, 255]), 1.0e7).unwrap();
    let err = layer
        .measure(Size::new(100, 1080), &Placements::default())
        .unwrap_err();
    assert!(matches!(err, SceneError::InvalidDimension(_)), "{err}");
}

#[test]
fn wide_source_overflowing_width_is_an_invalid_dimension() {
    let layer = ImageLayer::with_scale(solid_source(200, 1, [0, 0, 0, 255]), 1.0e5).unwrap();
    let err = layer
        .measure(Size::new(100, 1080), &Placements::default())
        .unwrap_err();
    assert!(matches!(err, SceneError::InvalidDimension(_)), "{err}");
}

#[test]
fn huge_enlargement_paints_only_the_visible_window() {
    let mut layer = ImageLayer::with_scale(solid_source(1, 1, [7, 8, 9, 255]), 1.0e5).unwrap();
    let mut canvas = Canvas::new(Size::new(100, 1080), Rgba8::TRANSPARENT).unwrap();

    let size = layer
        .measure(canvas.size(), &Placements::default())
        .unwrap();
    assert_eq!(size, Size::new(108_000_000, 108_000_000));
    let pos = layer
        .position(canvas.size(), size, &Placements::default())
        .unwrap();
    layer.render(&mut canvas, pos, size).unwrap();

    assert!(canvas.pixels().pixels().all(|p| p.0 == [7, 8, 9, 255]));
}

#[test]
fn overhanging_enlargement_samples_the_right_source_pixels() {
    let mut src = image::RgbaImage::new(2, 1);
    src.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
    src.put_pixel(1, 0, image::Rgba([0, 0, 255, 255]));
    let mut layer = ImageLayer::with_scale(SourceImage::from_image(src), 2.0).unwrap();

    let mut canvas = Canvas::new(Size::new(4, 2), Rgba8::TRANSPARENT).unwrap();
    let size = layer
        .measure(canvas.size(), &Placements::default())
        .unwrap();
    assert_eq!(size, Size::new(8, 4));
    let pos = layer
        .position(canvas.size(), size, &Placements::default())
        .unwrap();
    assert_eq!(pos, Offset::new(-2, -1));
    layer.render(&mut canvas, pos, size).unwrap();

    let px = canvas.pixels();
    for y in 0..2 {
        assert_eq!(px.get_pixel(0, y).0, [255, 0, 0, 255]);
        assert_eq!(px.get_pixel(1, y).0, [255, 0, 0, 255]);
        assert_eq!(px.get_pixel(2, y).0, [0, 0, 255, 255]);
        assert_eq!(px.get_pixel(3, y).0, [0, 0, 255, 255]);
    }
}

proptest! {
    #[test]
    fn measure_preserves_aspect_and_height_fraction(
        cw in 1u32..4000,
        ch in 1u32..4000,
        sw in 1u32..300,
        sh in 1u32..300,
        scale in 0.01f64..=1.0,
    ) {
        let source = SourceImage::from_image(image::RgbaImage::new(sw, sh));
        let layer = ImageLayer::with_scale(source, scale).unwrap();
        let size = layer.measure(Size::new(cw, ch), &Placements::default()).unwrap();

        prop_assert_eq!(size.height, (f64::from(ch) * scale).floor() as u32);
        if size.height > 0 {
            let got = f64::from(size.width) / f64::from(size.height);
            let want = f64::from(sw) / f64::from(sh);
            prop_assert!((got - want).abs() < 1.0 / f64::from(size.height) + 1e-9);
        }
    }

    #[test]
    fn position_centers_within_a_pixel(
        cw in 1u32..4000,
        ch in 1u32..4000,
        lw_frac in 0.0f64..=1.0,
        lh_frac in 0.0f64..=1.0,
    ) {
        let lw = (f64::from(cw) * lw_frac) as u32;
        let lh = (f64::from(ch) * lh_frac) as u32;
        let layer = ImageLayer::new(SourceImage::from_image(image::RgbaImage::new(1, 1)));
        let pos = layer
            .position(Size::new(cw, ch), Size::new(lw, lh), &Placements::default())
            .unwrap();

        prop_assert_eq!(pos.x, i64::from((cw - lw) / 2));
        prop_assert_eq!(pos.y, i64::from((ch - lh) / 2));

        let layer_cx = pos.x as f64 + f64::from(lw) / 2.0;
        let layer_cy = pos.y as f64 + f64::from(lh) / 2.0;
        prop_assert!((layer_cx - f64::from(cw) / 2.0).abs() <= 1.0);
        prop_assert!((layer_cy - f64::from(ch) / 2.0).abs() <= 1.0);
    }
}
