//! The eleven heuristic metrics scored for every candidate board.

use serde::{Deserialize, Serialize};

use crate::board_analysis::BoardAnalysis;

/// A heuristic metric of a board.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Sum of column heights.
    #[display("aggregate_height")]
    AggregateHeight,
    /// Empty cells covered by an occupied cell.
    #[display("holes")]
    Holes,
    /// Sum of height differences between adjacent columns.
    #[display("bumpiness")]
    Bumpiness,
    /// Lines cleared by the placement.
    #[display("complete_lines")]
    CompleteLines,
    /// Height of the tallest column.
    #[display("max_height")]
    MaxHeight,
    /// Sum of squared well depths, the I-well excluded.
    #[display("wells")]
    Wells,
    #[display("row_transitions")]
    RowTransitions,
    #[display("column_transitions")]
    ColumnTransitions,
    /// Holes covered by two or more occupied cells.
    #[display("pits")]
    Pits,
    /// How ready the designated edge well is for a vertical I-piece.
    #[display("i_well_quality")]
    IWellQuality,
    /// 1.0 when a vertical I-piece could clear four lines.
    #[display("clear_readiness")]
    ClearReadiness,
}

impl Metric {
    pub const LEN: usize = 11;

    pub const ALL: [Metric; Self::LEN] = [
        Metric::AggregateHeight,
        Metric::Holes,
        Metric::Bumpiness,
        Metric::CompleteLines,
        Metric::MaxHeight,
        Metric::Wells,
        Metric::RowTransitions,
        Metric::ColumnTransitions,
        Metric::Pits,
        Metric::IWellQuality,
        Metric::ClearReadiness,
    ];
}

/// Values of all eleven metrics for one board.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct MetricValues {
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

impl MetricValues {
    /// Computes every metric of the analyzed board.
    ///
    /// `complete_lines` comes from the placement, not from the board, since a
    /// simulated drop has already removed the rows it completed.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn measure(analysis: &BoardAnalysis, complete_lines: usize) -> Self {
        Self {
            aggregate_height: analysis.aggregate_height() as f32,
            holes: analysis.num_holes() as f32,
            bumpiness: analysis.bumpiness() as f32,
            complete_lines: complete_lines as f32,
            max_height: analysis.max_height() as f32,
            wells: analysis.well_score() as f32,
            row_transitions: analysis.row_transitions() as f32,
            column_transitions: analysis.column_transitions() as f32,
            pits: analysis.num_pits() as f32,
            i_well_quality: analysis.i_well().quality,
            clear_readiness: if analysis.is_clear_ready() { 1.0 } else { 0.0 },
        }
    }

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
}

#[cfg(test)]
mod tests {
    use stackwise_engine::Board;

    use super::*;

    #[test]
    fn test_measure() {
        let board = Board::from_ascii(
            "
            .....
            .....
            #....
            ##.#.
            ",
        );
        let values = MetricValues::measure(&BoardAnalysis::new(board), 2);
        assert_eq!(values.aggregate_height, 4.0);
        assert_eq!(values.max_height, 2.0);
        assert_eq!(values.bumpiness, 4.0);
        assert_eq!(values.complete_lines, 2.0);
        assert_eq!(values.holes, 0.0);
        assert_eq!(values.get(Metric::Bumpiness), values.bumpiness);
    }

    #[test]
    fn test_metric_names() {
        assert_eq!(Metric::IWellQuality.to_string(), "i_well_quality");
        for metric in Metric::ALL {
            let json = serde_json::to_string(&metric).unwrap();
            assert_eq!(json, format!("\"{metric}\""));
        }
    }
}
