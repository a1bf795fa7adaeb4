use super::*;

fn solid(w: u32, h: u32, px: [u8; 4]) -> image::RgbaImage {
    image::RgbaImage::from_pixel(w, h, image::Rgba(px))
}

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    let src = [255, 255, 255, 0];
    assert_eq!(over(dst, src), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src), src);
}

#[test]
fn over_dst_transparent_returns_src() {
    let dst = [0, 0, 0, 0];
    let src = [100, 110, 120, 200];
    assert_eq!(over(dst, src), src);
}

#[test]
fn over_half_alpha_blends_toward_src() {
    let dst = [0, 0, 255, 255];
    let src = [128, 0, 0, 128];
    let out = over(dst, src);
    assert_eq!(out[3], 255);
    assert_eq!(out[0], 128);
    assert_eq!(out[2], 127);
}

#[test]
fn transparent_layer_pixels_leave_canvas_untouched() {
    let bg = [204, 241, 255, 255];
    let mut canvas = solid(4, 4, bg);
    let layer = solid(4, 4, [255, 0, 0, 0]);
    composite_onto(&mut canvas, &layer, Offset::new(0, 0));
    assert!(canvas.pixels().all(|p| p.0 == bg));
}

#[test]
fn paste_is_clipped_at_negative_offsets() {
    let mut canvas = solid(4, 4, [0, 0, 0, 0]);
    let layer = solid(3, 3, [1, 2, 3, 255]);
    composite_onto(&mut canvas, &layer, Offset::new(-2, -2));

    assert_eq!(canvas.get_pixel(0, 0).0, [1, 2, 3, 255]);
    assert_eq!(canvas.get_pixel(1, 0).0, [0, 0, 0, 0]);
    assert_eq!(canvas.get_pixel(0, 1).0, [0, 0, 0, 0]);
}

#[test]
fn paste_is_clipped_past_the_far_edges() {
    let mut canvas = solid(4, 4, [0, 0, 0, 0]);
    let layer = solid(3, 3, [9, 9, 9, 255]);
    composite_onto(&mut canvas, &layer, Offset::new(3, 3));
    assert_eq!(canvas.get_pixel(3, 3).0, [9, 9, 9, 255]);
    assert_eq!(canvas.get_pixel(2, 3).0, [0, 0, 0, 0]);

    composite_onto(&mut canvas, &layer, Offset::new(10, 0));
    assert_eq!(canvas.get_pixel(3, 0).0, [0, 0, 0, 0]);
}

#[test]
fn translucent_pixel_over_transparent_canvas_round_trips() {
    let mut canvas = solid(1, 1, [0, 0, 0, 0]);
    let layer = solid(1, 1, [200, 100, 50, 128]);
    composite_onto(&mut canvas, &layer, Offset::new(0, 0));
    let px = canvas.get_pixel(0, 0).0;
    assert_eq!(px[3], 128);
    for (got, want) in px.iter().zip([200u8, 100, 50]) {
        assert!(got.abs_diff(want) <= 1, "{px:?}");
    }
}

#[test]
fn translucent_pixel_over_opaque_canvas_keeps_canvas_opaque() {
    let mut canvas = solid(1, 1, [0, 0, 0, 255]);
    let layer = solid(1, 1, [255, 255, 255, 128]);
    composite_onto(&mut canvas, &layer, Offset::new(0, 0));
    let px = canvas.get_pixel(0, 0).0;
    // Source-over: 128 + 255 * 127 / 255, not a mask-weighted 191.
    assert_eq!(px[3], 255);
    assert_eq!(px[0], 128);
}
