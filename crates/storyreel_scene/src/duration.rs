//! Screen-time allocation per beat.

use serde::{Deserialize, Serialize};
use storyreel_core::Beat;
use storyreel_error::{ConfigError, SceneError, SceneErrorKind};
use tracing::{debug, instrument, warn};

/// Iteration cap for the clamp-and-redistribute loop.
const MAX_ITERATIONS: usize = 32;

/// Complexity at which the untargeted default stops growing.
const SATURATION: u32 = 8;

/// Floor on a beat's weight so zero-complexity beats still get time.
const MIN_WEIGHT: f64 = 0.5;

/// Duration limits in whole seconds.
///
/// ```toml
/// [durations]
/// min = 3
/// max = 10
/// default_min = 4
/// default_max = 8
/// tolerance = 0.5
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DurationBounds {
    /// Shortest scene
    #[serde(default = "default_min")]
    pub min: u32,
    /// Longest scene
    #[serde(default = "default_max")]
    pub max: u32,
    /// Untargeted duration for a zero-complexity beat
    #[serde(default = "default_default_min")]
    pub default_min: u32,
    /// Untargeted duration for a saturated beat
    #[serde(default = "default_default_max")]
    pub default_max: u32,
    /// Permitted distance between the allocated total and the target
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

fn default_min() -> u32 {
    3
}

fn default_max() -> u32 {
    10
}

fn default_default_min() -> u32 {
    4
}

fn default_default_max() -> u32 {
    8
}

fn default_tolerance() -> f64 {
    0.5
}

impl Default for DurationBounds {
    fn default() -> Self {
        Self {
            min: default_min(),
            max: default_max(),
            default_min: default_default_min(),
            default_max: default_default_max(),
            tolerance: default_tolerance(),
        }
    }
}

impl DurationBounds {
    /// Checks that the bounds are ordered and positive.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first inconsistent pair.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(ConfigError::new(format!(
                "durations.tolerance ({}) must be a non-negative number of seconds",
                self.tolerance
            )));
        }
        if self.min == 0 {
            return Err(ConfigError::new("durations.min must be at least 1 second"));
        }
        if self.min > self.max {
            return Err(ConfigError::new(format!(
                "durations.min ({}) exceeds durations.max ({})",
                self.min, self.max
            )));
        }
        if self.default_min > self.default_max
            || self.default_min < self.min
            || self.default_max > self.max
        {
            return Err(ConfigError::new(format!(
                "durations.default_min..default_max ({}..{}) must lie within min..max ({}..{})",
                self.default_min, self.default_max, self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Allocates per-beat durations.
///
/// Without a target each beat gets a default from its complexity alone. With
/// a target, durations are proportional to complexity, clamped to the bounds,
/// and rounded once with largest-remainder rounding so the total lands within
/// half a second of the target.
///
/// # Examples
///
/// ```
/// use storyreel_core::Beat;
/// use storyreel_scene::DurationAllocator;
///
/// let beats = vec![
///     Beat::new(0, "Raju sits on the roof watching stars.", 0, 38, 5),
///     Beat::new(1, "A bright light descends.", 38, 63, 2),
///     Beat::new(2, "The light becomes a fairy who reaches out her hand.", 63, 114, 4),
/// ];
/// let durations = DurationAllocator::default().allocate(&beats, Some(15.0)).unwrap();
/// assert_eq!(durations, vec![7, 3, 5]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DurationAllocator {
    bounds: DurationBounds,
}

impl DurationAllocator {
    /// Create an allocator with the given bounds.
    pub fn new(bounds: DurationBounds) -> Self {
        Self { bounds }
    }

    /// Configured bounds.
    pub fn bounds(&self) -> &DurationBounds {
        &self.bounds
    }

    /// Durations for `beats`, same length and order.
    ///
    /// # Errors
    ///
    /// Returns `EmptyInput` for no beats and `InfeasibleDuration` when the
    /// target is not finite and positive, lies outside `n·min..=n·max`, or
    /// cannot be met in whole seconds within `tolerance`.
    #[instrument(skip(self, beats), fields(beats = beats.len()))]
    pub fn allocate(&self, beats: &[Beat], target: Option<f64>) -> Result<Vec<u32>, SceneError> {
        if beats.is_empty() {
            return Err(SceneError::new(SceneErrorKind::EmptyInput));
        }
        match target {
            None => Ok(beats
                .iter()
                .map(|beat| self.default_duration(*beat.complexity_score()))
                .collect()),
            Some(target) => self.allocate_to_target(beats, target),
        }
    }

    /// Untargeted duration: linear in complexity from `default_min` to
    /// `default_max`, saturating at complexity 8.
    pub fn default_duration(&self, complexity: u32) -> u32 {
        let span = self.bounds.default_max.saturating_sub(self.bounds.default_min);
        let value = self.bounds.default_min + complexity.min(SATURATION) * span / SATURATION;
        value.clamp(self.bounds.min, self.bounds.max)
    }

    fn allocate_to_target(&self, beats: &[Beat], target: f64) -> Result<Vec<u32>, SceneError> {
        let n = beats.len();
        let min = f64::from(self.bounds.min);
        let max = f64::from(self.bounds.max);
        let minimum_total = self.bounds.min * n as u32;
        let maximum_total = self.bounds.max * n as u32;

        if !target.is_finite()
            || target <= 0.0
            || target < f64::from(minimum_total)
            || target > f64::from(maximum_total)
        {
            warn!(
                requested = target,
                minimum_total,
                maximum_total,
                "Infeasible target duration"
            );
            return Err(SceneError::new(SceneErrorKind::InfeasibleDuration {
                beat_count: n,
                requested: target,
                minimum_total,
                maximum_total,
            }));
        }

        let weights: Vec<f64> = beats
            .iter()
            .map(|beat| f64::from(*beat.complexity_score()).max(MIN_WEIGHT))
            .collect();
        let mut values = vec![0.0_f64; n];
        let mut fixed = vec![false; n];

        for iteration in 0..MAX_ITERATIONS {
            let fixed_total: f64 = (0..n).filter(|&i| fixed[i]).map(|i| values[i]).sum();
            let free_weight: f64 = (0..n).filter(|&i| !fixed[i]).map(|i| weights[i]).sum();
            if free_weight <= 0.0 {
                break;
            }
            let remaining = target - fixed_total;
            let mut changed = false;
            let free: Vec<usize> = (0..n).filter(|&i| !fixed[i]).collect();
            for i in free {
                let share = remaining * weights[i] / free_weight;
                if share < min {
                    values[i] = min;
                    fixed[i] = true;
                    changed = true;
                } else if share > max {
                    values[i] = max;
                    fixed[i] = true;
                    changed = true;
                } else {
                    values[i] = share;
                }
            }
            debug!(iteration, changed, "Redistributed residual");
            if !changed {
                break;
            }
        }

        // Slack pass: spread any leftover over the remaining headroom.
        let residual = target - values.iter().sum::<f64>();
        if residual.abs() > f64::EPSILON {
            let headroom: Vec<f64> = values
                .iter()
                .map(|&v| if residual > 0.0 { max - v } else { v - min })
                .collect();
            let total_headroom: f64 = headroom.iter().sum();
            if total_headroom > 0.0 {
                for (value, room) in values.iter_mut().zip(&headroom) {
                    *value += residual * room / total_headroom;
                }
            }
        }
        for value in &mut values {
            *value = value.clamp(min, max);
        }

        let total = (target.round() as u32).clamp(minimum_total, maximum_total);
        let durations = largest_remainder(&values, total, self.bounds.min, self.bounds.max);
        let allocated: u32 = durations.iter().sum();
        if (f64::from(allocated) - target).abs() > self.bounds.tolerance {
            warn!(
                requested = target,
                allocated,
                tolerance = self.bounds.tolerance,
                "Whole-second durations cannot meet the target"
            );
            return Err(SceneError::new(SceneErrorKind::InfeasibleDuration {
                beat_count: n,
                requested: target,
                minimum_total,
                maximum_total,
            }));
        }
        Ok(durations)
    }
}

/// Round `values` to integers summing to `total`, giving the extra seconds to
/// the largest fractional parts and never leaving `min..=max`.
fn largest_remainder(values: &[f64], total: u32, min: u32, max: u32) -> Vec<u32> {
    let mut rounded: Vec<u32> = values
        .iter()
        .map(|v| ((v + 1e-9).floor() as u32).clamp(min, max))
        .collect();
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| {
        let fa = values[a] - values[a].floor();
        let fb = values[b] - values[b].floor();
        fb.total_cmp(&fa).then(a.cmp(&b))
    });

    let mut sum: u32 = rounded.iter().sum();
    while sum < total {
        let Some(&i) = order.iter().find(|&&i| rounded[i] < max) else {
            break;
        };
        rounded[i] += 1;
        sum += 1;
        order.retain(|&j| j != i);
    }
    while sum > total {
        let Some(&i) = order.iter().rev().find(|&&i| rounded[i] > min) else {
            break;
        };
        rounded[i] -= 1;
        sum -= 1;
        order.retain(|&j| j != i);
    }
    rounded
}
