//! Millimeter and pixel unit conversion.
//!
//! All geometry in the layout model is expressed in millimeters. Pixels only
//! exist once an object is rendered at a given resolution (pixels per inch).

use glam::DVec2;

/// One millimeter, as a fraction of an inch.
pub const MM_TO_INCH: f64 = 0.039370087;

/// Convert a millimeter length to the nearest whole pixel at `ppi`.
pub fn mm_to_px(mm: f64, ppi: u32) -> i64 {
    (mm * MM_TO_INCH * ppi as f64).round() as i64
}

/// Convert a pixel length back to millimeters at `ppi`.
pub fn px_to_mm(px: f64, ppi: u32) -> f64 {
    if ppi == 0 {
        return 0.0;
    }
    (px / ppi as f64) / MM_TO_INCH
}

/// Convert a millimeter size to a pixel size, clamping negative results to zero.
pub fn size_to_px(size_mm: DVec2, ppi: u32) -> (u32, u32) {
    (
        mm_to_px(size_mm.x, ppi).max(0) as u32,
        mm_to_px(size_mm.y, ppi).max(0) as u32,
    )
}

/// Convert a millimeter position to a pixel offset.
pub fn position_to_px(position_mm: DVec2, ppi: u32) -> (i64, i64) {
    (mm_to_px(position_mm.x, ppi), mm_to_px(position_mm.y, ppi))
}

/// Convert a pixel size to a millimeter size.
pub fn size_to_mm(width_px: u32, height_px: u32, ppi: u32) -> DVec2 {
    DVec2::new(
        px_to_mm(width_px as f64, ppi),
        px_to_mm(height_px as f64, ppi),
    )
}
