use anyhow::{bail, Result};

use crate::table::Table;

/// Maximum and minimum rendered bar extents including uncertainty whiskers.
/// Always uses the true uncertainty; whisker suppression below a visibility
/// threshold is a drawing decision, not an extent decision.
pub fn extent(table: &Table) -> Result<(f64, f64)> {
    if table.is_empty() {
        bail!("Cannot compute the value extent of an empty table");
    }
    let mut max = f64::NEG_INFINITY;
    let mut min = f64::INFINITY;
    for row in table.rows() {
        let m = row.measurement;
        max = max.max(m.value + m.uncertainty);
        min = min.min(m.value - m.uncertainty);
    }
    Ok((max, min))
}
