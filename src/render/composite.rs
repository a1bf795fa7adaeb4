use crate::{
    assets::decode::{premultiply, unpremultiply},
    foundation::core::Offset,
};

/// Premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Source-over for premultiplied pixels.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    let sa = src[3];
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255(u16::from(dst[3]), inv));
    for i in 0..3 {
        out[i] = add_sat_u8(src[i], mul_div255(u16::from(dst[i]), inv));
    }
    out
}

/// Composite `layer` onto `canvas` at `at` with premultiplied source-over.
///
/// Both buffers hold straight RGBA8. The result alpha is `sa + da * (1 - sa)`, so
/// translucent art over an opaque canvas stays opaque; the alpha channel is not
/// interpolated by the layer alpha the way a masked paste would. The paste is clipped to
/// the canvas; canvas pixels under fully transparent layer pixels are left byte-for-byte
/// unchanged.
pub fn composite_onto(canvas: &mut image::RgbaImage, layer: &image::RgbaImage, at: Offset) {
    let (cw, ch) = canvas.dimensions();
    let (lw, lh) = layer.dimensions();

    let x0 = at.x.max(0);
    let y0 = at.y.max(0);
    let x1 = (at.x + i64::from(lw)).min(i64::from(cw));
    let y1 = (at.y + i64::from(lh)).min(i64::from(ch));
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    for y in y0..y1 {
        for x in x0..x1 {
            let src = layer.get_pixel((x - at.x) as u32, (y - at.y) as u32).0;
            if src[3] == 0 {
                continue;
            }
            let dst = canvas.get_pixel_mut(x as u32, y as u32);
            if src[3] == 255 {
                dst.0 = src;
                continue;
            }
            dst.0 = unpremultiply(over(premultiply(dst.0), premultiply(src)));
        }
    }
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
