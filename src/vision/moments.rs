use image::GrayImage;

/// Binary image moments up to second order; every non-zero pixel weighs 1.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Moments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
    pub mu20: f64,
    pub mu11: f64,
    pub mu02: f64,
}

impl Moments {
    pub fn of_mask(mask: &GrayImage) -> Self {
        let (mut m00, mut m10, mut m01) = (0.0f64, 0.0f64, 0.0f64);
        for (x, y, px) in mask.enumerate_pixels() {
            if px.0[0] != 0 {
                m00 += 1.0;
                m10 += f64::from(x);
                m01 += f64::from(y);
            }
        }

        if m00 == 0.0 {
            return Self::default();
        }

        // Second pass about the centroid keeps the central moments exact for
        // symmetric blobs.
        let (cx, cy) = (m10 / m00, m01 / m00);
        let (mut mu20, mut mu11, mut mu02) = (0.0f64, 0.0f64, 0.0f64);
        for (x, y, px) in mask.enumerate_pixels() {
            if px.0[0] != 0 {
                let dx = f64::from(x) - cx;
                let dy = f64::from(y) - cy;
                mu20 += dx * dx;
                mu11 += dx * dy;
                mu02 += dy * dy;
            }
        }

        Self {
            m00,
            m10,
            m01,
            mu20,
            mu11,
            mu02,
        }
    }

    /// Center of mass. NaN on both axes for an empty mask.
    pub fn centroid(&self) -> (f64, f64) {
        (self.m10 / self.m00, self.m01 / self.m00)
    }

    /// Eigenvalues `(Emin, Emax)` of the 2x2 inertia matrix.
    pub fn principal_inertia(&self) -> (f64, f64) {
        let a = self.mu20;
        let b = 2.0 * self.mu11;
        let c = self.mu02;
        let h = ((a - c).powi(2) + b.powi(2)).sqrt();
        let mean = (a + c) / 2.0;
        (mean - h / 2.0, mean + h / 2.0)
    }
}

/// Minor over major inertia axis, in (0, 1]. NaN for an empty mask.
pub fn circularity(mask: &GrayImage) -> f32 {
    let (e_min, e_max) = Moments::of_mask(mask).principal_inertia();
    (e_min / e_max) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn disk(size: u32, cx: i64, cy: i64, r: i64) -> GrayImage {
        GrayImage::from_fn(size, size, |x, y| {
            let dx = x as i64 - cx;
            let dy = y as i64 - cy;
            if dx * dx + dy * dy <= r * r {
                Luma([255])
            } else {
                Luma([0])
            }
        })
    }

    #[test]
    fn centroid_of_rectangle_is_its_center() {
        let mask = GrayImage::from_fn(50, 40, |x, y| {
            if (10..20).contains(&x) && (5..25).contains(&y) {
                Luma([255])
            } else {
                Luma([0])
            }
        });
        let moments = Moments::of_mask(&mask);
        assert_eq!(moments.m00, 200.0);
        let (cx, cy) = moments.centroid();
        assert!((cx - 14.5).abs() < 1e-9);
        assert!((cy - 14.5).abs() < 1e-9);
    }

    #[test]
    fn disk_is_perfectly_circular() {
        let mask = disk(80, 40, 37, 18);
        let score = circularity(&mask);
        assert!((score - 1.0).abs() < 1e-4, "circularity {score}");
    }

    #[test]
    fn square_is_circular_too() {
        let mask = GrayImage::from_fn(30, 30, |x, y| {
            if (5..15).contains(&x) && (5..15).contains(&y) {
                Luma([255])
            } else {
                Luma([0])
            }
        });
        assert!((circularity(&mask) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn thin_line_has_zero_circularity() {
        let mut mask = GrayImage::new(100, 20);
        for x in 10..90 {
            mask.put_pixel(x, 7, Luma([255]));
        }
        assert!(circularity(&mask).abs() < 1e-6);
    }

    #[test]
    fn elongated_ellipse_is_well_below_fist_threshold() {
        let mask = GrayImage::from_fn(120, 60, |x, y| {
            let dx = (x as f64 - 60.0) / 50.0;
            let dy = (y as f64 - 30.0) / 15.0;
            if dx * dx + dy * dy <= 1.0 {
                Luma([255])
            } else {
                Luma([0])
            }
        });
        let score = circularity(&mask);
        assert!(score > 0.0 && score < 0.2, "circularity {score}");
    }

    #[test]
    fn empty_mask_is_nan() {
        let mask = GrayImage::new(10, 10);
        assert!(circularity(&mask).is_nan());
        let (cx, cy) = Moments::of_mask(&mask).centroid();
        assert!(cx.is_nan() && cy.is_nan());
    }
}
