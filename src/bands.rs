use std::collections::HashSet;

use crate::jumps::jumps;
use crate::positions::bar_positions;
use crate::table::Table;

/// A contiguous run of bars sharing the same label at one index level,
/// collapsed to a single tick at the run's midpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub midpoint: f64,
    pub label: String,
}

/// Group the bar positions by category value at `level`, one band per
/// contiguous run. The midpoint averages the run's first bar's leading edge
/// and its last bar's trailing edge.
pub fn bands(table: &Table, bar_width: f64, space_width: f64, level: usize) -> Vec<Band> {
    let mut out = Vec::new();
    let mut previous: Option<&[String]> = None;
    let mut band_start = 0.0;
    let mut last_edge = 0.0;
    let mut open_label = String::new();

    for (row, bar) in table
        .rows()
        .iter()
        .zip(bar_positions(table, bar_width, space_width))
    {
        let boundaries = jumps(&row.key, previous);
        if previous.is_some() && boundaries[level] {
            out.push(Band {
                midpoint: (band_start + last_edge) / 2.0,
                label: open_label,
            });
            band_start = bar.center - bar_width / 2.0;
        }
        last_edge = bar.center + bar_width / 2.0;
        open_label = row.key[level].clone();
        previous = Some(&row.key);
    }
    if previous.is_some() {
        out.push(Band {
            midpoint: (band_start + last_edge) / 2.0,
            label: open_label,
        });
    }
    out
}

/// Tick positions are compared after rounding to five decimals. A midpoint
/// that collides with one already placed (a zero-width group, or twin bands
/// across levels) is nudged by a tiny fraction of the layout width so the
/// rendering backend does not silently merge the two ticks.
pub fn nudge_duplicates(bands: &mut [Band], layout_width: f64, seen: &mut HashSet<i64>) {
    for band in bands.iter_mut() {
        let rounded = round5(band.midpoint);
        band.midpoint = rounded;
        if !seen.insert(position_key(rounded)) {
            band.midpoint = rounded + layout_width * 0.0002;
            seen.insert(position_key(band.midpoint));
        }
    }
}

fn round5(position: f64) -> f64 {
    (position * 1e5).round() / 1e5
}

fn position_key(position: f64) -> i64 {
    (position * 1e5).round() as i64
}

/// Inputs to the tick rotation heuristic for one band level.
#[derive(Debug, Clone, Copy)]
pub struct BandContext {
    pub minor: bool,
    pub vertical: bool,
    pub distinct_labels: usize,
    pub layout_width: f64,
    pub max_label_chars: usize,
}

/// Decides the tick label rotation (degrees) for a band level.
pub type RotationPolicy = fn(&BandContext) -> f64;

/// Default tick rotation heuristic, keyed on the distinct label count
/// relative to the layout width per label character. The 5/20 width factors
/// are empirically tuned, not normative.
pub fn auto_rotation(ctx: &BandContext) -> f64 {
    let chars = ctx.max_label_chars.max(1) as f64;
    let n = ctx.distinct_labels as f64;
    let rotate = if ctx.minor {
        (ctx.vertical && n <= ctx.layout_width * 5.0 / chars)
            || (!ctx.vertical && n <= ctx.layout_width * 20.0 / chars)
    } else {
        (!ctx.vertical && n <= ctx.layout_width * 5.0 / chars)
            || (ctx.vertical && n >= ctx.layout_width * 20.0 / chars)
    };
    if rotate {
        90.0
    } else {
        0.0
    }
}
