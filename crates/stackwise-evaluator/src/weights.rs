//! Weight profiles and the normal/panic mode switch.
//!
//! The mode is a pure function of how full the board is. Each mode has its own
//! [`WeightProfile`]; the panic profile trades scoring opportunities for
//! survival.

use serde::{Deserialize, Serialize};
use stackwise_engine::Board;

use crate::metrics::{Metric, MetricValues};

/// Fill percentage above which the board is considered dangerous.
pub const PANIC_FILL_PERCENT: usize = 60;

/// Risk posture derived from the board.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Deserialize,
    Serialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[display("normal")]
    Normal,
    #[display("panic")]
    Panic,
}

/// Returns [`Mode::Panic`] when more than 60% of the board's cells are occupied.
///
/// # Example
///
/// ```
/// use stackwise_engine::Board;
/// use stackwise_evaluator::weights::{Mode, select_mode};
///
/// assert_eq!(select_mode(&Board::new(10, 20)), Mode::Normal);
/// ```
#[must_use]
pub fn select_mode(board: &Board) -> Mode {
    if board.occupied_cells() * 100 > board.total_cells() * PANIC_FILL_PERCENT {
        Mode::Panic
    } else {
        Mode::Normal
    }
}

/// Built-in weight table for a mode.
#[must_use]
pub fn weights_for(mode: Mode) -> &'static WeightProfile {
    match mode {
        Mode::Normal => &WeightProfile::NORMAL,
        Mode::Panic => &WeightProfile::PANIC,
    }
}

/// Signed coefficient per metric. Higher scores are better, so penalties are
/// negative.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WeightProfile {
    pub aggregate_height: f32,
    pub holes: f32,
    pub bumpiness: f32,
    pub complete_lines: f32,
    pub max_height: f32,
    pub wells: f32,
    pub row_transitions: f32,
    pub column_transitions: f32,
    pub pits: f32,
    pub i_well_quality: f32,
    pub clear_readiness: f32,
}

impl WeightProfile {
    pub const NORMAL: Self = Self {
        aggregate_height: -0.8,
        holes: -5.0,
        bumpiness: -0.3,
        complete_lines: 1.2,
        max_height: -1.5,
        wells: -0.5,
        row_transitions: -0.15,
        column_transitions: -0.1,
        pits: -8.0,
        i_well_quality: 1.0,
        clear_readiness: 6.0,
    };

    pub const PANIC: Self = Self {
        aggregate_height: -2.4,
        holes: -10.0,
        bumpiness: -1.0,
        complete_lines: 3.0,
        max_height: -4.5,
        wells: -2.0,
        row_transitions: -0.5,
        column_transitions: -0.3,
        pits: -24.0,
        i_well_quality: 0.0,
        clear_readiness: 0.0,
    };

    #[must_use]
    pub fn get(&self, metric: Metric) -> f32 {
        match metric {
            Metric::AggregateHeight => self.aggregate_height,
            Metric::Holes => self.holes,
            Metric::Bumpiness => self.bumpiness,
            Metric::CompleteLines => self.complete_lines,
            Metric::MaxHeight => self.max_height,
            Metric::Wells => self.wells,
            Metric::RowTransitions => self.row_transitions,
            Metric::ColumnTransitions => self.column_transitions,
            Metric::Pits => self.pits,
            Metric::IWellQuality => self.i_well_quality,
            Metric::ClearReadiness => self.clear_readiness,
        }
    }

    /// Weighted sum of the metric values.
    #[must_use]
    pub fn score(&self, values: &MetricValues) -> f32 {
        Metric::ALL
            .iter()
            .map(|&m| self.get(m) * values.get(m))
            .sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum WeightConfigError {
    #[display("panic weight for {metric} must penalize more than the normal weight")]
    NotHarsher { metric: Metric },
    #[display("panic weight for {metric} must not reward more than the normal weight")]
    RewardsMore { metric: Metric },
}

/// A pair of weight profiles, one per mode.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WeightConfig {
    pub normal: WeightProfile,
    pub panic: WeightProfile,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            normal: WeightProfile::NORMAL,
            panic: WeightProfile::PANIC,
        }
    }
}

impl WeightConfig {
    #[must_use]
    pub fn weights_for(&self, mode: Mode) -> &WeightProfile {
        match mode {
            Mode::Normal => &self.normal,
            Mode::Panic => &self.panic,
        }
    }

    /// Checks that the panic profile is strictly harsher on holes, heights and
    /// pits, and no keener on the I-well bonuses, than the normal profile.
    pub fn validate(&self) -> Result<(), WeightConfigError> {
        const HARSHER: [Metric; 4] = [
            Metric::Holes,
            Metric::AggregateHeight,
            Metric::MaxHeight,
            Metric::Pits,
        ];
        const NOT_KEENER: [Metric; 2] = [Metric::IWellQuality, Metric::ClearReadiness];

        if let Some(&metric) = HARSHER
            .iter()
            .find(|&&m| self.panic.get(m) >= self.normal.get(m))
        {
            return Err(WeightConfigError::NotHarsher { metric });
        }
        if let Some(&metric) = NOT_KEENER
            .iter()
            .find(|&&m| self.panic.get(m) > self.normal.get(m))
        {
            return Err(WeightConfigError::RewardsMore { metric });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_rows(width: usize, height: usize, rows: usize, cells_per_row: usize) -> Board {
        let mut board = Board::new(width, height);
        let cells = (height - rows..height).flat_map(|y| {
            (0..cells_per_row).map(move |x| (i32::try_from(x).unwrap(), i32::try_from(y).unwrap()))
        });
        board.fill_cells(cells);
        board
    }

    #[test]
    fn test_select_mode_threshold() {
        let cases = [
            ("empty", 0, 0, Mode::Normal),
            ("exactly 60%", 12, 10, Mode::Normal),
            ("14 rows of 9", 14, 9, Mode::Panic),
            ("one past 60%", 13, 10, Mode::Panic),
        ];
        for (name, rows, cells, expected) in cases {
            let board = filled_rows(10, 20, rows, cells);
            assert_eq!(select_mode(&board), expected, "{name}");
        }
    }

    #[test]
    fn test_builtin_profiles_are_ordered() {
        assert_eq!(WeightConfig::default().validate(), Ok(()));
        let normal = weights_for(Mode::Normal);
        let panic = weights_for(Mode::Panic);
        // roughly double the hole penalty, triple the height and pit penalties
        assert!(panic.holes / normal.holes >= 1.9);
        assert!(panic.aggregate_height / normal.aggregate_height >= 2.5);
        assert!(panic.max_height / normal.max_height >= 2.5);
        assert!(panic.pits / normal.pits >= 2.5);
        assert!(panic.i_well_quality <= normal.i_well_quality);
    }

    #[test]
    fn test_validate_rejects_misordered_profiles() {
        let mut config = WeightConfig::default();
        config.panic.pits = config.normal.pits;
        assert_eq!(
            config.validate(),
            Err(WeightConfigError::NotHarsher {
                metric: Metric::Pits
            })
        );

        let mut config = WeightConfig::default();
        config.panic.clear_readiness = 10.0;
        assert_eq!(
            config.validate(),
            Err(WeightConfigError::RewardsMore {
                metric: Metric::ClearReadiness
            })
        );
    }

    #[test]
    fn test_weight_config_json() {
        let json = serde_json::to_string(&WeightConfig::default()).unwrap();
        let parsed: WeightConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, WeightConfig::default());

        let err = serde_json::from_str::<WeightProfile>(r#"{"holes": -1.0}"#);
        assert!(err.is_err());
    }
}
