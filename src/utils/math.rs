//! # Game Mathematics
//!
//! Difficulty scaling by distance from the entrance.

/// Normalizes `distance` against the deepest distance on the map.
///
/// Yields a value in `[0, 1]`; when `max_distance` is zero every room is
/// equally deep and `fallback` is used instead.
///
/// # Examples
///
/// ```
/// use delve::distance_factor;
///
/// assert_eq!(distance_factor(3, 6, 0.5), 0.5);
/// assert_eq!(distance_factor(0, 0, 1.0), 1.0);
/// ```
pub fn distance_factor(distance: u32, max_distance: u32, fallback: f64) -> f64 {
    if max_distance == 0 {
        fallback
    } else {
        f64::from(distance) / f64::from(max_distance)
    }
}

/// Linear stat scaling, truncated toward zero: `base + span * factor`.
pub fn scale_stat(base: u32, span: u32, factor: f64) -> u32 {
    (f64::from(base) + f64::from(span) * factor) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_factor() {
        assert_eq!(distance_factor(0, 4, 0.5), 0.0);
        assert_eq!(distance_factor(4, 4, 0.5), 1.0);
        assert_eq!(distance_factor(1, 4, 0.5), 0.25);
        assert_eq!(distance_factor(0, 0, 0.5), 0.5);
    }

    #[test]
    fn test_scale_stat_truncates() {
        assert_eq!(scale_stat(50, 50, 1.0), 100);
        assert_eq!(scale_stat(15, 15, 0.5), 22);
        assert_eq!(scale_stat(20, 30, 0.5), 35);
        assert_eq!(scale_stat(5, 10, 0.0), 5);
    }
}
