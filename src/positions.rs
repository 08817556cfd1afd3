use anyhow::{anyhow, Result};

use crate::jumps::jumps;
use crate::table::{CategoryKey, Row, Table};

/// One laid-out bar: the scalar center along the position axis plus the data
/// needed to draw and label it. Produced once per row, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct BarPosition {
    pub center: f64,
    pub value: f64,
    pub uncertainty: f64,
    pub key: CategoryKey,
}

/// Lazily walks the table in index order and converts it to linear bar
/// positions, inserting `space_width` once per non-innermost boundary level.
/// Pure function of its inputs; re-invoke on the same table to restart.
pub fn bar_positions(table: &Table, bar_width: f64, space_width: f64) -> BarPositions<'_> {
    BarPositions {
        rows: table.rows().iter(),
        previous: None,
        position: 0.0,
        bar_width,
        space_width,
    }
}

pub struct BarPositions<'a> {
    rows: std::slice::Iter<'a, Row>,
    previous: Option<&'a [String]>,
    position: f64,
    bar_width: f64,
    space_width: f64,
}

impl Iterator for BarPositions<'_> {
    type Item = BarPosition;

    fn next(&mut self) -> Option<BarPosition> {
        let row = self.rows.next()?;
        let boundaries = jumps(&row.key, self.previous);

        // Only boundaries above the leaf level consume extra spacing; a pure
        // leaf-level change is just the next bar in the same group.
        let coarse = boundaries[..boundaries.len() - 1]
            .iter()
            .filter(|&&jump| jump)
            .count();
        self.position += self.space_width * coarse as f64;
        if boundaries[boundaries.len() - 1] {
            self.position += self.bar_width;
        }

        self.previous = Some(&row.key);
        Some(BarPosition {
            center: self.position + self.bar_width / 2.0,
            value: row.measurement.value,
            uncertainty: row.measurement.uncertainty,
            key: row.key.clone(),
        })
    }
}

/// Total layout width: the far edge of the last bar. Used for figure sizing
/// and the label rotation policy.
pub fn max_bar_position(table: &Table, bar_width: f64, space_width: f64) -> Result<f64> {
    bar_positions(table, bar_width, space_width)
        .last()
        .map(|bar| bar.center + bar_width / 2.0)
        .ok_or_else(|| anyhow!("Cannot compute the layout width of an empty table"))
}
