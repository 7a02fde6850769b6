use image::GrayImage;

use crate::types::BoundingBox;

/// Minimum foreground count for a row or column to belong to the blob.
pub const PROJECTION_THRESHOLD: u32 = 25;

/// Non-zero pixel count of every column.
pub fn column_projection(mask: &GrayImage) -> Vec<u32> {
    let mut counts = vec![0u32; mask.width() as usize];
    for (x, _y, px) in mask.enumerate_pixels() {
        if px.0[0] != 0 {
            counts[x as usize] += 1;
        }
    }
    counts
}

/// Non-zero pixel count of every row.
pub fn row_projection(mask: &GrayImage) -> Vec<u32> {
    mask.rows()
        .map(|row| row.filter(|px| px.0[0] != 0).count() as u32)
        .collect()
}

/// Bounds of the rows and columns holding more than `threshold` foreground
/// pixels.
pub fn locate(mask: &GrayImage, threshold: u32) -> BoundingBox {
    let (x1, x2) = bounds(&column_projection(mask), threshold);
    let (y1, y2) = bounds(&row_projection(mask), threshold);
    BoundingBox { x1, y1, x2, y2 }
}

// The forward scan never looks at the last bin and the backward scan never
// looks at bin 0; an unmatched bound stays 0.
fn bounds(projection: &[u32], threshold: u32) -> (u32, u32) {
    let len = projection.len();
    let first = (0..len.saturating_sub(1))
        .find(|&i| projection[i] > threshold)
        .unwrap_or(0);
    let last = (1..len)
        .rev()
        .find(|&i| projection[i] > threshold)
        .unwrap_or(0);
    (first as u32, last as u32)
}
