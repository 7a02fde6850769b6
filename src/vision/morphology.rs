use imageproc::{
    distance_transform::Norm,
    morphology::{dilate_mut, erode_mut},
};

use crate::types::SkinMask;

/// Half-size of the square structuring element; radius 3 is a 7x7 rectangle.
pub const ELEMENT_RADIUS: u8 = 3;

/// Erode then dilate (morphological opening) with a 7x7 rectangle.
pub fn clean_mask(mask: &mut SkinMask) {
    if mask.width() == 0 || mask.height() == 0 {
        return;
    }
    erode_mut(mask, Norm::LInf, ELEMENT_RADIUS);
    dilate_mut(mask, Norm::LInf, ELEMENT_RADIUS);
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn fill(mask: &mut GrayImage, x0: u32, y0: u32, w: u32, h: u32) {
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
    }

    fn count_on(mask: &GrayImage) -> usize {
        mask.pixels().filter(|px| px.0[0] != 0).count()
    }

    #[test]
    fn removes_specks_smaller_than_element() {
        let mut mask = GrayImage::new(40, 40);
        fill(&mut mask, 5, 5, 3, 3);
        fill(&mut mask, 30, 10, 6, 6);

        clean_mask(&mut mask);

        assert_eq!(count_on(&mask), 0);
    }

    #[test]
    fn element_sized_block_survives_unchanged() {
        let mut mask = GrayImage::new(30, 30);
        fill(&mut mask, 11, 9, 7, 7);
        let before = mask.clone();

        clean_mask(&mut mask);

        assert_eq!(mask, before);
    }

    #[test]
    fn block_one_short_of_the_element_vanishes() {
        let mut wide = GrayImage::new(30, 30);
        fill(&mut wide, 11, 9, 7, 6);
        clean_mask(&mut wide);
        assert_eq!(count_on(&wide), 0);

        let mut tall = GrayImage::new(30, 30);
        fill(&mut tall, 11, 9, 6, 7);
        clean_mask(&mut tall);
        assert_eq!(count_on(&tall), 0);
    }

    #[test]
    fn keeps_blocks_at_least_element_sized() {
        let mut mask = GrayImage::new(60, 60);
        fill(&mut mask, 10, 12, 20, 15);

        clean_mask(&mut mask);

        assert_eq!(count_on(&mask), 20 * 15);
        assert_eq!(mask.get_pixel(10, 12).0[0], 255);
        assert_eq!(mask.get_pixel(29, 26).0[0], 255);
        assert_eq!(mask.get_pixel(9, 12).0[0], 0);
    }

    #[test]
    fn block_touching_the_border_survives() {
        let mut mask = GrayImage::new(30, 30);
        fill(&mut mask, 0, 0, 10, 10);

        clean_mask(&mut mask);

        assert_eq!(mask.get_pixel(0, 0).0[0], 255);
        assert_eq!(count_on(&mask), 100);
    }

    #[test]
    fn fills_nothing_in_an_empty_mask() {
        let mut mask = GrayImage::new(16, 16);
        clean_mask(&mut mask);
        assert_eq!(count_on(&mask), 0);

        let mut degenerate = GrayImage::new(0, 0);
        clean_mask(&mut degenerate);
    }
}
