//! Min/max level-of-detail construction from raw samples.

use crate::config::PlotConfig;
use crate::error::{PlotError, PlotResult};

use super::level::{DetailLevel, Point};

/// Window size of the first summary level; each further level doubles it.
pub const FIRST_WINDOW_SIZE: usize = 4;

/// Highest summary level whose window size still fits in a `usize`.
pub const MAX_SUMMARY_LEVEL: usize = (usize::BITS - 2) as usize;

/// Window size of summary level `level` (level 0 is full resolution).
///
/// Saturates at `usize::MAX` past [`MAX_SUMMARY_LEVEL`].
pub fn window_size_for_level(level: usize) -> usize {
    if level == 0 {
        return 1;
    }
    u32::try_from(level - 1)
        .ok()
        .and_then(|shift| 1usize.checked_shl(shift))
        .and_then(|factor| FIRST_WINDOW_SIZE.checked_mul(factor))
        .unwrap_or(usize::MAX)
}

/// Build every detail level for one channel.
///
/// Level 0 copies the samples. Each later level summarizes the raw samples
/// (never the previous level) in windows of `window_size_for_level(k)`.
/// Building stops after the first level with fewer than
/// `min_detail_level_points` points, after a level whose single window
/// covers every sample, or once `max_detail_levels` summary levels exist.
pub fn build_levels(
    samples: &[f64],
    sample_period: f64,
    config: &PlotConfig,
) -> PlotResult<Vec<DetailLevel>> {
    if samples.is_empty() {
        return Err(PlotError::EmptyInput("cannot summarize zero samples".into()));
    }
    if !(sample_period.is_finite() && sample_period > 0.0) {
        return Err(PlotError::InvalidSamplePeriod(sample_period));
    }

    let mut levels = Vec::with_capacity(config.max_detail_levels.min(MAX_SUMMARY_LEVEL) + 1);
    levels.push(full_resolution_level(samples, sample_period));

    while levels.len() <= config.max_detail_levels {
        let (last_len, last_window) = levels
            .last()
            .map(|l| (l.points.len(), l.window_size))
            .unwrap_or((0, 1));
        if last_len < config.min_detail_level_points || last_window >= samples.len() {
            break;
        }
        let window_size = window_size_for_level(levels.len());
        levels.push(summary_level(samples, sample_period, window_size));
    }

    Ok(levels)
}

fn full_resolution_level(samples: &[f64], sample_period: f64) -> DetailLevel {
    let points = samples
        .iter()
        .enumerate()
        .map(|(i, &y)| Point::new(i as f64 * sample_period, y))
        .collect();
    DetailLevel {
        window_size: 1,
        window_time: sample_period,
        points,
    }
}

/// Summarize `samples` into two points per window: the minimum and the
/// maximum, earlier one first.
///
/// Comparisons are strict, so repeated extrema keep their first occurrence.
/// When min and max are the same sample the minimum is emitted first.
pub fn summary_level(samples: &[f64], sample_period: f64, window_size: usize) -> DetailLevel {
    let n_windows = samples.len().div_ceil(window_size);
    let mut points = Vec::with_capacity(n_windows * 2);

    for (w, chunk) in samples.chunks(window_size).enumerate() {
        let base = w * window_size;
        let mut i_min = 0;
        let mut i_max = 0;
        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;
        for (i, &y) in chunk.iter().enumerate() {
            if y < y_min {
                y_min = y;
                i_min = i;
            }
            if y > y_max {
                y_max = y;
                i_max = i;
            }
        }

        let min_point = Point::new((base + i_min) as f64 * sample_period, chunk[i_min]);
        let max_point = Point::new((base + i_max) as f64 * sample_period, chunk[i_max]);
        if i_max < i_min {
            points.push(max_point);
            points.push(min_point);
        } else {
            points.push(min_point);
            points.push(max_point);
        }
    }

    DetailLevel {
        window_size,
        window_time: window_size as f64 * sample_period,
        points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn small_config(min_points: usize, max_levels: usize) -> PlotConfig {
        PlotConfig {
            min_detail_level_points: min_points,
            max_detail_levels: max_levels,
            ..Default::default()
        }
    }

    #[test]
    fn test_window_sizes() {
        assert_eq!(window_size_for_level(0), 1);
        assert_eq!(window_size_for_level(1), 4);
        assert_eq!(window_size_for_level(2), 8);
        assert_eq!(window_size_for_level(5), 64);
    }

    #[test]
    fn test_empty_input_fails_fast() {
        let result = build_levels(&[], 1.0, &PlotConfig::default());
        assert!(matches!(result, Err(PlotError::EmptyInput(_))));
    }

    #[test]
    fn test_invalid_period_rejected() {
        let result = build_levels(&[0.0; 4], 0.0, &PlotConfig::default());
        assert_eq!(result.unwrap_err(), PlotError::InvalidSamplePeriod(0.0));
    }

    #[test]
    fn test_small_input_has_only_level_zero() {
        let samples = vec![0.5; 100];
        let levels = build_levels(&samples, 0.25, &PlotConfig::default()).unwrap();
        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0].window_size, 1);
        assert_eq!(levels[0].points.len(), 100);
        assert_eq!(levels[0].points[3], Point::new(0.75, 0.5));
    }

    #[test]
    fn test_window_emits_min_then_max_in_time_order() {
        // max at index 1, min at index 2 -> max first
        let samples = [0.0, 0.9, -0.7, 0.1];
        let level = summary_level(&samples, 1.0, 4);
        assert_eq!(level.points, vec![Point::new(1.0, 0.9), Point::new(2.0, -0.7)]);

        // min before max -> min first
        let samples = [0.0, -0.9, 0.7, 0.1];
        let level = summary_level(&samples, 1.0, 4);
        assert_eq!(level.points, vec![Point::new(1.0, -0.9), Point::new(2.0, 0.7)]);
    }

    #[test]
    fn test_ties_keep_first_occurrence() {
        let samples = [0.3, 1.0, -1.0, 1.0, -1.0, 0.0, 0.0, 0.0];
        let level = summary_level(&samples, 0.5, 8);
        assert_eq!(level.points, vec![Point::new(0.5, 1.0), Point::new(1.0, -1.0)]);
    }

    #[test]
    fn test_flat_window_emits_two_points_min_first() {
        let samples = [0.25; 4];
        let level = summary_level(&samples, 1.0, 4);
        assert_eq!(level.points.len(), 2);
        assert_eq!(level.points[0], Point::new(0.0, 0.25));
        assert_eq!(level.points[1], Point::new(0.0, 0.25));
    }

    #[test]
    fn test_partial_last_window_is_summarized() {
        let samples = [0.0, 0.1, 0.2, 0.3, -0.4];
        let level = summary_level(&samples, 1.0, 4);
        assert_eq!(level.points.len(), 4);
        assert_eq!(level.points[2], Point::new(4.0, -0.4));
        assert_eq!(level.points[3], Point::new(4.0, -0.4));
    }

    #[test]
    fn test_point_count_formula() {
        let samples: Vec<f64> = (0..10_001).map(|i| (i as f64 * 0.01).sin()).collect();
        let levels = build_levels(&samples, 1.0, &small_config(64, 16)).unwrap();
        assert!(levels.len() > 3);
        assert_eq!(levels[0].points.len(), samples.len());
        for level in &levels[1..] {
            let expected = 2 * samples.len().div_ceil(level.window_size);
            assert_eq!(level.points.len(), expected, "window {}", level.window_size);
        }
    }

    #[test]
    fn test_termination_by_point_threshold() {
        let samples = vec![0.0; 100_000];
        let config = small_config(1000, 16);
        let levels = build_levels(&samples, 1.0, &config).unwrap();
        let last = levels.last().unwrap();
        assert!(last.points.len() < 1000);
        for level in &levels[..levels.len() - 1] {
            assert!(level.points.len() >= 1000);
        }
    }

    #[test]
    fn test_termination_by_level_cap() {
        let samples = vec![0.0; 100_000];
        let levels = build_levels(&samples, 1.0, &small_config(2, 3)).unwrap();
        assert_eq!(levels.len(), 4);
        assert_eq!(levels[3].window_size, 16);
    }

    #[test]
    fn test_termination_when_one_window_covers_all_samples() {
        let samples = vec![0.0; 10];
        let levels = build_levels(&samples, 1.0, &small_config(2, 70)).unwrap();
        let windows: Vec<usize> = levels.iter().map(|l| l.window_size).collect();
        assert_eq!(windows, vec![1, 4, 8, 16]);
        assert_eq!(levels[3].len(), 2);
    }

    #[test]
    fn test_window_size_saturates() {
        assert_eq!(window_size_for_level(1), 4);
        assert_eq!(window_size_for_level(MAX_SUMMARY_LEVEL), 1usize << (usize::BITS - 1));
        assert_eq!(window_size_for_level(MAX_SUMMARY_LEVEL + 1), usize::MAX);
        assert_eq!(window_size_for_level(200), usize::MAX);
    }

    #[test]
    fn test_extrema_preserved_for_random_input() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let n = rng.gen_range(1..5000);
            let samples: Vec<f64> = (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect();
            let levels = build_levels(&samples, 1.0 / 48000.0, &small_config(8, 16)).unwrap();

            for level in &levels[1..] {
                for (w, chunk) in samples.chunks(level.window_size).enumerate() {
                    let min = chunk.iter().cloned().fold(f64::INFINITY, f64::min);
                    let max = chunk.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                    let a = level.points[2 * w].y;
                    let b = level.points[2 * w + 1].y;
                    assert_eq!(a.min(b), min, "window {} of size {}", w, level.window_size);
                    assert_eq!(a.max(b), max, "window {} of size {}", w, level.window_size);
                }
            }
        }
    }

    #[test]
    fn test_points_non_decreasing_in_time() {
        let mut rng = StdRng::seed_from_u64(11);
        let samples: Vec<f64> = (0..20_000).map(|_| rng.gen_range(-1.0..1.0)).collect();
        let levels = build_levels(&samples, 0.001, &small_config(16, 16)).unwrap();
        for (k, level) in levels.iter().enumerate() {
            for pair in level.points.windows(2) {
                assert!(pair[0].x <= pair[1].x, "level {} out of order", k);
            }
        }
    }
}
