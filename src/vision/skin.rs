use image::{GrayImage, RgbImage};
use rayon::prelude::*;

use crate::types::SkinMask;

pub const SKIN: u8 = 255;
pub const BACKGROUND: u8 = 0;

/// Explicit RGB skin cluster rule (Kovac et al., uniform daylight).
pub fn is_skin(r: u8, g: u8, b: u8) -> bool {
    let (r, g, b) = (i32::from(r), i32::from(g), i32::from(b));
    let spread = r.max(g).max(b) - r.min(g).min(b);

    r > 95 && g > 40 && b > 20 && spread > 15 && (r - g).abs() > 15 && r > g && r > b
}

pub fn skin_mask(frame: &RgbImage) -> SkinMask {
    let mut mask = GrayImage::new(frame.width(), frame.height());

    mask.par_iter_mut()
        .zip(frame.par_chunks_exact(3))
        .for_each(|(dst, px)| {
            *dst = if is_skin(px[0], px[1], px[2]) {
                SKIN
            } else {
                BACKGROUND
            };
        });

    mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use proptest::prelude::*;

    fn fails_a_conjunct(r: u8, g: u8, b: u8) -> bool {
        let (ri, gi, bi) = (i32::from(r), i32::from(g), i32::from(b));
        let spread = ri.max(gi).max(bi) - ri.min(gi).min(bi);
        !(r > 95)
            || !(g > 40)
            || !(b > 20)
            || !(spread > 15)
            || !((ri - gi).abs() > 15)
            || !(r > g)
            || !(r > b)
    }

    #[test]
    fn typical_skin_tone_is_foreground() {
        assert!(is_skin(200, 140, 110));
        assert!(is_skin(96, 41, 21));
    }

    #[test]
    fn each_conjunct_rejects_on_its_own() {
        // Each triple breaks exactly one condition of (200, 140, 110).
        assert!(!is_skin(95, 60, 30)); // R > 95
        assert!(!is_skin(200, 40, 30)); // G > 40
        assert!(!is_skin(200, 140, 20)); // B > 20
        assert!(!is_skin(100, 90, 88)); // |R - G| > 15 and spread
        assert!(!is_skin(140, 200, 110)); // R > G
        assert!(!is_skin(200, 140, 220)); // R > B
    }

    #[test]
    fn mask_marks_only_skin_pixels() {
        let mut frame = RgbImage::from_pixel(4, 3, Rgb([10, 10, 10]));
        frame.put_pixel(1, 1, Rgb([220, 150, 120]));
        frame.put_pixel(3, 2, Rgb([230, 170, 140]));

        let mask = skin_mask(&frame);

        assert_eq!(mask.dimensions(), (4, 3));
        for (x, y, px) in mask.enumerate_pixels() {
            let expected = if (x, y) == (1, 1) || (x, y) == (3, 2) {
                SKIN
            } else {
                BACKGROUND
            };
            assert_eq!(px.0[0], expected, "pixel ({x}, {y})");
        }
    }

    #[test]
    fn empty_frame_gives_empty_mask() {
        let mask = skin_mask(&RgbImage::new(0, 0));
        assert_eq!(mask.dimensions(), (0, 0));
    }

    proptest! {
        #[test]
        fn failing_any_conjunct_is_background(r: u8, g: u8, b: u8) {
            prop_assume!(fails_a_conjunct(r, g, b));
            let frame = RgbImage::from_pixel(2, 2, Rgb([r, g, b]));
            let mask = skin_mask(&frame);
            prop_assert!(mask.pixels().all(|px| px.0[0] == BACKGROUND));
        }

        #[test]
        fn mask_is_strictly_binary(r: u8, g: u8, b: u8) {
            let frame = RgbImage::from_pixel(1, 1, Rgb([r, g, b]));
            let value = skin_mask(&frame).get_pixel(0, 0).0[0];
            prop_assert!(value == SKIN || value == BACKGROUND);
            prop_assert_eq!(value == SKIN, !fails_a_conjunct(r, g, b));
        }
    }
}
