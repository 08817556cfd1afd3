use anyhow::{bail, Result};
use std::collections::HashSet;
use tracing::debug;

use crate::attributes::AttributeMap;
use crate::bands::{auto_rotation, bands, nudge_duplicates, BandContext, RotationPolicy};
use crate::config::{ChartConfig, Rotation};
use crate::extent::extent;
use crate::labels::{is_absolutely_normalized_metric, is_normalized_metric, normalize_label};
use crate::palette;
use crate::positions::{bar_positions, max_bar_position};
use crate::scene::{BarMark, Legend, LegendEntry, PanelScene, Scene, TickBand};
use crate::table::Table;

const GOLDEN_RATIO: f64 = 1.618_033_988_749_895;
const BOUND_HEADROOM: f64 = 1.01;
const LEGEND_LABEL_PADDING: f64 = 6.0;

/// Lay out the whole figure: one panel per outermost category when subplots
/// are enabled, a single implicit panel otherwise.
pub fn compose(table: &Table, config: &ChartConfig) -> Result<Scene> {
    compose_with_rotation_policy(table, config, auto_rotation)
}

/// Same as [`compose`] with a caller-supplied tick rotation policy.
pub fn compose_with_rotation_policy(
    table: &Table,
    config: &ChartConfig,
    rotation_policy: RotationPolicy,
) -> Result<Scene> {
    config.validate()?;
    let vertical = config.vertical();
    let levels = table.levels();

    if config.subplots && table.depth() < 2 {
        bail!("Unable to split plots with only a single index level");
    }
    if !config.subplots && table.depth() > 3 {
        bail!(
            "Without subplots it is not possible to visualize a table with {} index levels",
            table.depth()
        );
    }

    let colors = config
        .colors
        .clone()
        .unwrap_or_else(|| palette::default_colors(&levels[levels.len() - 1]));
    let alphas = config
        .alphas
        .clone()
        .unwrap_or_else(|| palette::default_alphas(&levels[levels.len() - 1]));
    let facecolors = config
        .facecolors
        .clone()
        .unwrap_or_else(|| palette::default_facecolors(&levels[0]));

    let parts: Vec<(String, Table)> = if config.subplots {
        table.partition()?
    } else {
        vec![(String::new(), table.clone())]
    };

    let ncols = config.resolved_plots_per_row(levels[0].len(), table.len());
    let nrows = (parts.len() + ncols - 1) / ncols;
    let total_slots = nrows * ncols;

    // All panels share the position axis range: the widest panel wins.
    let mut side = 0.0_f64;
    for (_, part) in &parts {
        side = side.max(max_bar_position(part, config.bar_width, config.space_width)?);
    }

    let legend_level = usize::from(config.show_last_level_as_legend);
    let shown_levels = table.depth() - legend_level - usize::from(config.subplots);

    let exponent = if config.subplots || shown_levels > 1 {
        1.0
    } else {
        1.5
    };
    let height = config.height.unwrap_or(side / GOLDEN_RATIO.powf(exponent));
    let (panel_w, panel_h) = if vertical {
        (side, height)
    } else {
        (height, side)
    };
    let px = |units: f64| ((units * config.dpi as f64).round() as u32).max(1);

    let metric_name = config
        .data_label
        .as_deref()
        .or(config.title.as_deref())
        .unwrap_or_default();
    let normalized = config
        .normalized_metric
        .unwrap_or_else(|| config.auto_normalize_metrics && is_normalized_metric(metric_name));
    let absolutely_normalized = config.absolutely_normalized_metric.unwrap_or_else(|| {
        config.auto_normalize_metrics && is_absolutely_normalized_metric(metric_name)
    });

    debug!(
        panels = parts.len(),
        nrows,
        ncols,
        side,
        "composing bar chart"
    );

    let mut panels = Vec::with_capacity(parts.len());
    for (i, (part_label, part)) in parts.iter().enumerate() {
        let panel = compose_panel(PanelInputs {
            index: i,
            part_label,
            part,
            config,
            rotation_policy,
            colors: &colors,
            alphas: &alphas,
            facecolors: &facecolors,
            side,
            shown_levels,
            ncols,
            total_slots,
            vertical,
            normalized,
            absolutely_normalized,
            legend_title: table.innermost_name().map(|name| {
                normalize_label(name, &config.custom_defaults)
            }),
        })?;
        panels.push(panel);
    }

    Ok(Scene {
        width: px(panel_w * ncols as f64),
        height: px(panel_h * nrows as f64),
        title: if config.show_title {
            config.title.clone()
        } else {
            None
        },
        letter: config.letter.clone(),
        nrows,
        ncols,
        panels,
    })
}

struct PanelInputs<'a> {
    index: usize,
    part_label: &'a str,
    part: &'a Table,
    config: &'a ChartConfig,
    rotation_policy: RotationPolicy,
    colors: &'a AttributeMap<String>,
    alphas: &'a AttributeMap<f64>,
    facecolors: &'a AttributeMap<String>,
    side: f64,
    shown_levels: usize,
    ncols: usize,
    total_slots: usize,
    vertical: bool,
    normalized: bool,
    absolutely_normalized: bool,
    legend_title: Option<String>,
}

fn compose_panel(inputs: PanelInputs<'_>) -> Result<PanelScene> {
    let PanelInputs {
        index,
        part_label,
        part,
        config,
        rotation_policy,
        colors,
        alphas,
        facecolors,
        side,
        shown_levels,
        ncols,
        total_slots,
        vertical,
        normalized,
        absolutely_normalized,
        legend_title,
    } = inputs;

    let mut bars = Vec::with_capacity(part.len());
    for bar in bar_positions(part, config.bar_width, config.space_width) {
        let color = colors.resolve(part_label, &bar.key)?.clone();
        let alpha = *alphas.resolve(part_label, &bar.key)?;
        let hatch = match &config.hatches {
            Some(hatches) => Some(hatches.resolve(part_label, &bar.key)?.clone()),
            None => None,
        };
        bars.push(BarMark {
            center: bar.center,
            value: bar.value,
            whisker: (bar.uncertainty > config.min_std).then_some(bar.uncertainty),
            width: config.bar_width,
            color,
            alpha,
            hatch,
            label: bar.key.last().cloned().unwrap_or_default(),
        });
    }

    // On which grid slots the band and value labels may be suppressed when
    // the uniqueness flags are on: position-axis bands live on the bottom
    // row for vertical charts and on the first column for horizontal ones.
    let subplots = config.subplots;
    let not_first_band_axis = subplots
        && ((!vertical && index % ncols != 0) || (vertical && index < total_slots - ncols));
    let not_first_value_axis = subplots
        && ((vertical && index % ncols != 0) || (!vertical && index < total_slots - ncols));

    let panel_width = max_bar_position(part, config.bar_width, config.space_width)?;
    let mut seen_positions = HashSet::new();
    let mut tick_bands = Vec::new();
    for level in (shown_levels.saturating_sub(2)..shown_levels).rev() {
        let minor = level + 1 == shown_levels;
        if minor && config.unique_minor_labels && not_first_band_axis {
            continue;
        }
        if !minor && config.unique_major_labels && not_first_band_axis {
            continue;
        }

        let mut level_bands = bands(part, config.bar_width, config.space_width, level);
        for band in &mut level_bands {
            band.label = normalize_label(&band.label, &config.custom_defaults);
        }
        nudge_duplicates(&mut level_bands, panel_width, &mut seen_positions);

        let distinct: HashSet<&str> = level_bands.iter().map(|b| b.label.as_str()).collect();
        let max_label_chars = level_bands
            .iter()
            .map(|b| b.label.chars().count())
            .max()
            .unwrap_or(1);
        let setting = if minor {
            &config.minor_rotation
        } else {
            &config.major_rotation
        };
        let rotation = match setting {
            Rotation::Degrees(degrees) => *degrees,
            Rotation::Keyword(_) => rotation_policy(&BandContext {
                minor,
                vertical,
                distinct_labels: distinct.len(),
                layout_width: panel_width,
                max_label_chars,
            }),
        };

        tick_bands.push(TickBand {
            depth: shown_levels - 1 - level,
            minor,
            rotation,
            ticks: level_bands
                .into_iter()
                .map(|band| (band.midpoint, band.label))
                .collect(),
        });
    }

    let (max_extent, min_extent) = extent(part)?;
    let log_scale = config.scale == "log";
    let mut max_bound = max_extent * BOUND_HEADROOM;
    // A log axis cannot reach zero, so headroom divides the lower bound
    // instead of clamping it to the origin.
    let mut min_bound = if log_scale {
        min_extent / BOUND_HEADROOM
    } else {
        (min_extent * BOUND_HEADROOM).min(0.0)
    };
    if normalized || absolutely_normalized {
        max_bound = max_bound.max(BOUND_HEADROOM);
    }
    if absolutely_normalized && min_bound < 0.0 {
        min_bound = min_bound.min(-BOUND_HEADROOM);
    }
    if let Some(min_value) = config.min_value {
        min_bound = min_value;
    }
    if let Some(max_value) = config.max_value {
        max_bound = max_value;
    }
    if log_scale && min_bound <= 0.0 {
        bail!(
            "A log scale requires strictly positive values, got a lower bound of {}",
            min_bound
        );
    }

    let legend = (config.show_legend && config.show_last_level_as_legend).then(|| {
        let mut entries = dedup_legend(&bars);
        for entry in &mut entries {
            entry.label = normalize_label(&entry.label, &config.custom_defaults);
        }
        let title = legend_title.clone();
        let ncol = config
            .legend_ncol
            .unwrap_or_else(|| legend_columns(title.as_deref().unwrap_or_default(), &entries));
        Legend {
            title,
            ncol,
            position: config.legend_position.clone(),
            entries,
        }
    });

    let value_label = if config.unique_data_label && not_first_value_axis {
        None
    } else {
        config
            .data_label
            .as_deref()
            .map(|label| normalize_label(label, &config.custom_defaults))
    };

    Ok(PanelScene {
        row: index / ncols,
        col: index % ncols,
        title: (config.show_title && !part_label.is_empty())
            .then(|| normalize_label(part_label, &config.custom_defaults)),
        letter: config.letter_per_subplot.get(index).cloned(),
        vertical,
        layout_width: side,
        bounds: (min_bound, max_bound),
        log_scale,
        value_label,
        unit: config.unit.clone(),
        normalized: normalized || absolutely_normalized,
        facecolor: facecolors
            .resolve(part_label, &[part_label.to_string()])?
            .clone(),
        bars,
        bands: tick_bands,
        legend,
    })
}

/// Collapse per-bar legend handles to one entry per unique label, keeping
/// the first encountered visual style.
pub fn dedup_legend(bars: &[BarMark]) -> Vec<LegendEntry> {
    let mut entries: Vec<LegendEntry> = Vec::new();
    for bar in bars {
        if entries.iter().any(|entry| entry.label == bar.label) {
            continue;
        }
        entries.push(LegendEntry {
            label: bar.label.clone(),
            color: bar.color.clone(),
            alpha: bar.alpha,
            hatch: bar.hatch.clone(),
        });
    }
    entries
}

/// Column count sized so the legend title fits above the entries.
pub fn legend_columns(title: &str, entries: &[LegendEntry]) -> usize {
    if entries.is_empty() {
        return 1;
    }
    let mean_label_length = entries
        .iter()
        .map(|entry| entry.label.chars().count())
        .sum::<usize>() as f64
        / entries.len() as f64
        + LEGEND_LABEL_PADDING;
    (title.chars().count() as f64 / mean_label_length)
        .ceil()
        .max(1.0) as usize
}
