//! Trigonometry helpers for bitmap rotation.

/// Values this close to zero are treated as exact zero.
const SNAP_EPS: f64 = 1e-12;

/// Computes sine and cosine for an angle in degrees.
///
/// Results within `1e-12` of zero are snapped to zero so quarter turns
/// produce exact axis-aligned mappings.
pub(crate) fn sin_cos_deg(angle_deg: f64) -> (f64, f64) {
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    (snap(sin), snap(cos))
}

fn snap(value: f64) -> f64 {
    if value.abs() < SNAP_EPS {
        0.0
    } else {
        value
    }
}

/// Size of the axis-aligned box that encloses a `width x height` box rotated by `angle_deg`.
pub(crate) fn rotated_extent(width: usize, height: usize, angle_deg: f64) -> (usize, usize) {
    let (sin, cos) = sin_cos_deg(angle_deg);
    let (w, h) = (width as f64, height as f64);
    let ew = w * cos.abs() + h * sin.abs();
    let eh = w * sin.abs() + h * cos.abs();
    // Shave rounding noise so an exact quarter turn does not grow by a pixel.
    let out_w = (ew - 1e-6).ceil().max(1.0) as usize;
    let out_h = (eh - 1e-6).ceil().max(1.0) as usize;
    (out_w, out_h)
}
