//! Level selection with hysteresis.

use crate::audio::store::index_for_time;
use crate::pyramid::SummaryPyramid;

/// Estimate how many points `level` shows across a time span of `range`
/// seconds, without scanning the level.
///
/// A summary level emits two points per window, so its count is the raw
/// sample count divided by half the window size.
pub fn estimate_visible_points(pyramid: &SummaryPyramid, level: usize, range: f64) -> usize {
    let window_size = match pyramid.window_size(level) {
        Some(w) => w,
        None => return 0,
    };
    let raw = index_for_time(range, pyramid.sample_period()).min(pyramid.num_samples()) as f64;
    if window_size <= 1 {
        raw as usize
    } else {
        (raw / (window_size as f64 / 2.0)) as usize
    }
}

/// Choose the level to display for a span of `range` seconds.
///
/// Coarsens while the next level would still show more than `budget / 2`
/// points, then refines while the previous level would show fewer than
/// `budget / 2`. The two thresholds point in opposite directions, so a
/// steady range never flips between neighbours.
pub fn select_level(pyramid: &SummaryPyramid, current: usize, range: f64, budget: usize) -> usize {
    let num_levels = pyramid.num_levels();
    if num_levels == 0 {
        return 0;
    }
    let threshold = budget / 2;
    let mut level = current.min(num_levels - 1);

    while level + 1 < num_levels {
        if estimate_visible_points(pyramid, level + 1, range) > threshold {
            level += 1;
        } else {
            break;
        }
    }

    while level > 0 {
        if estimate_visible_points(pyramid, level - 1, range) < threshold {
            level -= 1;
        } else {
            break;
        }
    }

    level
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlotConfig;

    const BUDGET: usize = 1024;

    /// 1 second at 1 MHz with a small budget, giving many levels.
    fn test_pyramid() -> SummaryPyramid {
        let samples: Vec<f64> = (0..1_000_000).map(|i| ((i % 97) as f64 / 97.0) - 0.5).collect();
        let config = PlotConfig {
            min_detail_level_points: BUDGET,
            ..Default::default()
        };
        SummaryPyramid::build(&samples, 1e-6, &config).unwrap()
    }

    #[test]
    fn test_estimate_scales_with_window() {
        let pyramid = test_pyramid();
        assert_eq!(estimate_visible_points(&pyramid, 0, 0.001), 1000);
        assert_eq!(estimate_visible_points(&pyramid, 1, 0.001), 500);
        assert_eq!(estimate_visible_points(&pyramid, 2, 0.001), 250);
        assert_eq!(estimate_visible_points(&pyramid, 3, 0.001), 125);
    }

    #[test]
    fn test_estimate_clamps_to_sample_count() {
        let pyramid = test_pyramid();
        assert_eq!(estimate_visible_points(&pyramid, 0, 50.0), 1_000_000);
        assert_eq!(estimate_visible_points(&pyramid, 0, -1.0), 0);
        assert_eq!(estimate_visible_points(&pyramid, 99, 1.0), 0);
    }

    #[test]
    fn test_full_view_selects_coarse_level() {
        let pyramid = test_pyramid();
        let level = select_level(&pyramid, 0, 1.0, BUDGET);
        assert!(level > 0);
        assert!(estimate_visible_points(&pyramid, level, 1.0) > BUDGET / 2);
        if level + 1 < pyramid.num_levels() {
            assert!(estimate_visible_points(&pyramid, level + 1, 1.0) <= BUDGET / 2);
        }
    }

    #[test]
    fn test_narrow_view_returns_to_full_resolution() {
        let pyramid = test_pyramid();
        let coarse = select_level(&pyramid, 0, 1.0, BUDGET);
        let fine = select_level(&pyramid, coarse, 0.0001, BUDGET);
        assert_eq!(fine, 0);
    }

    #[test]
    fn test_stable_for_repeated_range() {
        let pyramid = test_pyramid();
        let mut level = 0;
        for range in [1.0, 0.3, 0.01, 0.004] {
            level = select_level(&pyramid, level, range, BUDGET);
            for _ in 0..5 {
                assert_eq!(select_level(&pyramid, level, range, BUDGET), level);
            }
        }
    }

    #[test]
    fn test_monotonic_under_zoom_out_and_in() {
        let pyramid = test_pyramid();
        let mut ranges = Vec::new();
        let mut r = 1e-5;
        while r < 2.0 {
            ranges.push(r);
            r *= 1.15;
        }

        let mut level = 0;
        let mut last_window = 1;
        for &range in &ranges {
            level = select_level(&pyramid, level, range, BUDGET);
            let window = pyramid.window_size(level).unwrap();
            assert!(window >= last_window, "widening to {} shrank window", range);
            last_window = window;
        }

        for &range in ranges.iter().rev() {
            level = select_level(&pyramid, level, range, BUDGET);
            let window = pyramid.window_size(level).unwrap();
            assert!(window <= last_window, "narrowing to {} grew window", range);
            last_window = window;
        }
        assert_eq!(level, 0);
    }

    #[test]
    fn test_out_of_range_current_level_is_clamped() {
        let pyramid = test_pyramid();
        let level = select_level(&pyramid, 500, 1.0, BUDGET);
        assert!(level < pyramid.num_levels());
    }
}
