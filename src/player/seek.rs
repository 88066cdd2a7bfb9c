//! Mapping between pointer offsets, fractions and playhead positions.

/// Map a pointer offset on a linear progress surface of `width` units to a
/// fraction in `[0, 1]`. Offsets outside the surface are clamped.
pub fn fraction_from_offset(offset: f64, width: f64) -> Option<f64> {
    if !offset.is_finite() || !width.is_finite() || width <= 0.0 {
        return None;
    }
    Some(offset.clamp(0.0, width) / width)
}

/// Seek target for `fraction` of a track lasting `total` seconds.
///
/// Returns `None` when the duration is unknown or zero, or the fraction is NaN.
pub fn seek_target(fraction: f64, total: Option<f64>) -> Option<f64> {
    let total = usable_duration(total)?;
    if fraction.is_nan() {
        return None;
    }
    Some(fraction.clamp(0.0, 1.0) * total)
}

/// Displayed progress, `0.0` while the duration is unknown.
pub fn progress_fraction(position: f64, total: Option<f64>) -> f64 {
    match usable_duration(total) {
        Some(total) if position.is_finite() => (position / total).clamp(0.0, 1.0),
        _ => 0.0,
    }
}

fn usable_duration(total: Option<f64>) -> Option<f64> {
    total.filter(|t| t.is_finite() && *t > 0.0)
}
