//! Difficulty policy: losing/winning mode and the gate probabilities that
//! depend on it, plus the derived adaptation level.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Which side of the losing-mode threshold the engine's win rate is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Losing,
    Winning,
}

/// Gate probabilities for the move cascade.
///
/// Every probability is in `0.0..=1.0`. A gate passes when a uniform draw
/// from `[0, 1)` is below its probability, so `1.0` always passes and `0.0`
/// never does.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyPolicy {
    /// Win-rate percentage below which the engine is in losing mode
    pub losing_threshold: f64,
    pub pattern_block_losing: f64,
    pub pattern_block_winning: f64,
    pub early_block_losing: f64,
    pub early_block_winning: f64,
    /// Chance of a random move while in winning mode; never fires when losing
    pub chaos: f64,
}

impl Default for DifficultyPolicy {
    fn default() -> Self {
        DifficultyPolicy {
            losing_threshold: 50.0,
            pattern_block_losing: 0.98,
            pattern_block_winning: 0.95,
            early_block_losing: 0.95,
            early_block_winning: 0.90,
            chaos: 0.03,
        }
    }
}

impl DifficultyPolicy {
    /// Policy with every block gate open and chaos disabled.
    ///
    /// Move choice then depends on the RNG only for ties within a class.
    pub fn deterministic() -> Self {
        DifficultyPolicy {
            pattern_block_losing: 1.0,
            pattern_block_winning: 1.0,
            early_block_losing: 1.0,
            early_block_winning: 1.0,
            chaos: 0.0,
            ..Self::default()
        }
    }

    pub fn with_chaos(mut self, chaos: f64) -> Self {
        self.chaos = chaos;
        self
    }

    pub fn with_losing_threshold(mut self, threshold: f64) -> Self {
        self.losing_threshold = threshold;
        self
    }

    pub fn mode(&self, win_rate: f64) -> Mode {
        if win_rate < self.losing_threshold {
            Mode::Losing
        } else {
            Mode::Winning
        }
    }

    pub fn pattern_block_chance(&self, mode: Mode) -> f64 {
        match mode {
            Mode::Losing => self.pattern_block_losing,
            Mode::Winning => self.pattern_block_winning,
        }
    }

    pub fn early_block_chance(&self, mode: Mode) -> f64 {
        match mode {
            Mode::Losing => self.early_block_losing,
            Mode::Winning => self.early_block_winning,
        }
    }

    pub fn chaos_chance(&self, mode: Mode) -> f64 {
        match mode {
            Mode::Losing => 0.0,
            Mode::Winning => self.chaos,
        }
    }

    /// Check that every probability is in range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        let probabilities = [
            ("pattern_block_losing", self.pattern_block_losing),
            ("pattern_block_winning", self.pattern_block_winning),
            ("early_block_losing", self.early_block_losing),
            ("early_block_winning", self.early_block_winning),
            ("chaos", self.chaos),
        ];
        for (name, p) in probabilities {
            if !(0.0..=1.0).contains(&p) {
                return Err(Error::InvalidConfiguration {
                    message: format!("{name} must be within 0.0..=1.0, got {p}"),
                });
            }
        }
        if !(0.0..=100.0).contains(&self.losing_threshold) {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "losing_threshold must be a percentage, got {}",
                    self.losing_threshold
                ),
            });
        }
        Ok(())
    }
}

/// Draw once against probability `p`
pub(crate) fn roll<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    p > 0.0 && rng.random::<f64>() < p
}

/// Adaptation level in `0..=100`.
///
/// `min(round(min(learned * 10, 40) + min(blocked * 5, 30) + win_rate * 0.3), 100)`
/// with `win_rate` a percentage. Non-decreasing in each input.
pub fn adaptation_level(patterns_learned: usize, patterns_blocked: usize, win_rate: f64) -> u8 {
    let learned = (patterns_learned as f64 * 10.0).min(40.0);
    let blocked = (patterns_blocked as f64 * 5.0).min(30.0);
    let rate = if win_rate.is_finite() {
        win_rate.clamp(0.0, 100.0) * 0.3
    } else {
        0.0
    };
    (learned + blocked + rate).round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn test_adaptation_level_examples() {
        assert_eq!(adaptation_level(0, 0, 0.0), 0);
        assert_eq!(adaptation_level(1, 0, 0.0), 10);
        assert_eq!(adaptation_level(2, 1, 50.0), 40);
        assert_eq!(adaptation_level(4, 6, 100.0), 100);
    }

    #[test]
    fn test_adaptation_level_is_bounded() {
        for learned in [0, 1, 3, 4, 50, usize::MAX] {
            for blocked in [0, 2, 6, 7, 1000] {
                for rate in [0.0, 12.5, 50.0, 99.9, 100.0, 250.0, -5.0, f64::NAN] {
                    let level = adaptation_level(learned, blocked, rate);
                    assert!(level <= 100, "{learned} {blocked} {rate} -> {level}");
                }
            }
        }
    }

    #[test]
    fn test_adaptation_level_is_monotonic() {
        let mut previous = 0;
        for learned in 0..10 {
            let level = adaptation_level(learned, 3, 40.0);
            assert!(level >= previous);
            previous = level;
        }
        let mut previous = 0;
        for pct in 0..=100 {
            let level = adaptation_level(2, 2, pct as f64);
            assert!(level >= previous);
            previous = level;
        }
    }

    #[test]
    fn test_mode_threshold() {
        let policy = DifficultyPolicy::default();
        assert_eq!(policy.mode(0.0), Mode::Losing);
        assert_eq!(policy.mode(49.9), Mode::Losing);
        assert_eq!(policy.mode(50.0), Mode::Winning);
        assert_eq!(policy.pattern_block_chance(Mode::Losing), 0.98);
        assert_eq!(policy.early_block_chance(Mode::Winning), 0.90);
        assert_eq!(policy.chaos_chance(Mode::Losing), 0.0);
        assert_eq!(policy.chaos_chance(Mode::Winning), 0.03);
    }

    #[test]
    fn test_roll_extremes() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!((0..1000).all(|_| roll(&mut rng, 1.0)));
        assert!((0..1000).all(|_| !roll(&mut rng, 0.0)));
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        assert!(DifficultyPolicy::default().validate().is_ok());
        assert!(DifficultyPolicy::deterministic().validate().is_ok());
        let bad = DifficultyPolicy::default().with_chaos(1.5);
        assert!(matches!(
            bad.validate(),
            Err(Error::InvalidConfiguration { .. })
        ));
        let bad = DifficultyPolicy::default().with_losing_threshold(-1.0);
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let policy: DifficultyPolicy = serde_json::from_str(r#"{"chaos": 0.0}"#).unwrap();
        assert_eq!(policy.chaos, 0.0);
        assert_eq!(policy.pattern_block_losing, 0.98);
    }
}
