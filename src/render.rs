use anyhow::{bail, Context, Result};
use image::ImageEncoder;
use plotters::coord::combinators::IntoLogRange;
use plotters::coord::ranged1d::{AsRangedCoord, Ranged, ValueFormatter};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::labels::format_value;
use crate::scene::{Legend, PanelScene, Scene};

const BAR_OUTLINE: RGBColor = RGBColor(64, 64, 64);
const LEGEND_SWATCH: i32 = 12;
const LEGEND_PADDING: i32 = 8;
const BAND_ROW_HEIGHT: i32 = 18;
// The bitmap raster rejects dimensions at or above 2^16 pixels per side.
const MAX_RASTER_SIDE: u32 = 1 << 16;

/// Render a composed scene to PNG bytes.
pub fn render(scene: &Scene) -> Result<Vec<u8>> {
    if scene.panels.is_empty() {
        bail!("Cannot render a figure with no panels");
    }

    debug!(
        width = scene.width,
        height = scene.height,
        panels = scene.panels.len(),
        "rendering figure"
    );

    if scene.width >= MAX_RASTER_SIDE || scene.height >= MAX_RASTER_SIDE {
        bail!(
            "Figure size of {}x{} pixels is too large; each side must be below {}",
            scene.width,
            scene.height,
            MAX_RASTER_SIDE
        );
    }

    let mut buffer = vec![0u8; scene.width as usize * scene.height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (scene.width, scene.height))
            .into_drawing_area();
        root.fill(&WHITE).context("Failed to fill background")?;

        let work_area = match &scene.title {
            Some(title) => {
                let caption = match &scene.letter {
                    Some(letter) => format!("{} {}", letter, title),
                    None => title.clone(),
                };
                root.titled(&caption, ("sans-serif", 24))
                    .context("Failed to draw figure title")?
            }
            None => {
                if let Some(letter) = &scene.letter {
                    root.draw(&Text::new(
                        letter.clone(),
                        (10, 10),
                        ("sans-serif", 24).into_font(),
                    ))
                    .context("Failed to draw figure letter")?;
                }
                root.clone()
            }
        };

        let grid = work_area.split_evenly((scene.nrows, scene.ncols));
        for panel in &scene.panels {
            let slot = panel.row * scene.ncols + panel.col;
            let area = grid
                .get(slot)
                .with_context(|| format!("Panel grid has no slot {}", slot))?;
            draw_panel(&root, area, panel)?;
        }

        root.present().context("Failed to present drawing")?;
    }

    let mut png_bytes = Vec::new();
    {
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(&buffer, scene.width, scene.height, image::ColorType::Rgb8)
            .context("Failed to encode PNG")?;
    }
    Ok(png_bytes)
}

/// Render a scene and write it to disk, creating missing parent directories.
pub fn save(scene: &Scene, path: &Path) -> Result<()> {
    let png_bytes = render(scene)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }
    fs::write(path, png_bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn draw_panel(
    root: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    area: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    panel: &PanelScene,
) -> Result<()> {
    let facecolor = parse_color(&panel.facecolor)?;
    area.fill(&facecolor).context("Failed to fill panel")?;

    let band_rows = panel
        .bands
        .iter()
        .map(|band| band.depth + 1)
        .max()
        .unwrap_or(0) as i32;
    let rotated = panel.bands.iter().any(|band| band.rotation.abs() >= 45.0);
    let max_tick_chars = panel
        .bands
        .iter()
        .flat_map(|band| band.ticks.iter())
        .map(|(_, label)| label.chars().count())
        .max()
        .unwrap_or(0) as i32;

    // Leave one text row per band level below (or left of) the position
    // axis, more when the tick labels are rotated out of their row.
    let mut band_area = 24 + BAND_ROW_HEIGHT * band_rows;
    if rotated {
        band_area += 7 * max_tick_chars;
    }
    let (x_label_area, y_label_area) = if panel.vertical {
        (band_area, 60)
    } else {
        (50, band_area.max(60))
    };

    let caption = match (&panel.letter, &panel.title) {
        (Some(letter), Some(title)) => format!("{} {}", letter, title),
        (Some(letter), None) => letter.clone(),
        (None, Some(title)) => title.clone(),
        (None, None) => String::new(),
    };

    let (min_bound, max_bound) = panel.bounds;
    let mut builder = ChartBuilder::on(area);
    builder
        .margin(10)
        .x_label_area_size(x_label_area)
        .y_label_area_size(y_label_area);
    if !caption.is_empty() {
        builder.caption(&caption, ("sans-serif", 18));
    }

    let value_axis_label = match (&panel.value_label, &panel.unit) {
        (Some(label), Some(unit)) => format!("{} ({})", label, unit),
        (Some(label), None) => label.clone(),
        (None, _) => String::new(),
    };
    let formatter =
        |v: &f64| format_value(*v, panel.unit.as_deref(), panel.normalized);

    // The coordinate type differs between linear and log value axes, so the
    // drawing body is generic over the value range and dispatched here.
    match (panel.vertical, panel.log_scale) {
        (true, false) => draw_vertical(
            root,
            builder,
            panel,
            &facecolor,
            &value_axis_label,
            &formatter,
            min_bound..max_bound,
        ),
        (true, true) => draw_vertical(
            root,
            builder,
            panel,
            &facecolor,
            &value_axis_label,
            &formatter,
            (min_bound..max_bound).log_scale(),
        ),
        (false, false) => draw_horizontal(
            root,
            builder,
            panel,
            &facecolor,
            &value_axis_label,
            &formatter,
            min_bound..max_bound,
        ),
        (false, true) => draw_horizontal(
            root,
            builder,
            panel,
            &facecolor,
            &value_axis_label,
            &formatter,
            (min_bound..max_bound).log_scale(),
        ),
    }
}

fn draw_vertical<YR>(
    root: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    mut builder: ChartBuilder<BitMapBackend>,
    panel: &PanelScene,
    facecolor: &RGBColor,
    value_axis_label: &str,
    formatter: &dyn Fn(&f64) -> String,
    value_range: YR,
) -> Result<()>
where
    YR: AsRangedCoord<Value = f64>,
    YR::CoordDescType: Ranged<ValueType = f64> + ValueFormatter<f64>,
{
    let (min_bound, _) = panel.bounds;
    // On a log axis bars cannot start at zero; they grow from the lower
    // bound instead.
    let base = if panel.log_scale { min_bound } else { 0.0 };
    let mut chart = builder
        .build_cartesian_2d(0f64..panel.layout_width, value_range)
        .context("Failed to build chart")?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(0)
        .y_label_formatter(formatter)
        .y_desc(value_axis_label)
        .light_line_style(facecolor)
        .draw()
        .context("Failed to draw mesh")?;

    for bar in &panel.bars {
        let color = parse_color(&bar.color)?.mix(bar.alpha);
        let (x0, x1) = (bar.center - bar.width / 2.0, bar.center + bar.width / 2.0);
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(x0, base), (x1, bar.value)],
                color.filled(),
            )))
            .context("Failed to draw bar")?;
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(x0, base), (x1, bar.value)],
                BAR_OUTLINE.stroke_width(1),
            )))
            .context("Failed to draw bar outline")?;
        if let Some(pattern) = &bar.hatch {
            let stripes =
                hatch_segments(pattern, x0, x1, base.min(bar.value), bar.value.max(base));
            for [a, b] in stripes {
                chart
                    .draw_series(std::iter::once(PathElement::new(
                        vec![a, b],
                        BAR_OUTLINE.stroke_width(1),
                    )))
                    .context("Failed to draw hatch")?;
            }
        }
        if let Some(whisker) = bar.whisker {
            let cap = bar.width / 4.0;
            let lo = (bar.value - whisker).max(if panel.log_scale { min_bound } else { f64::MIN });
            let hi = bar.value + whisker;
            for segment in [
                vec![(bar.center, lo), (bar.center, hi)],
                vec![(bar.center - cap, lo), (bar.center + cap, lo)],
                vec![(bar.center - cap, hi), (bar.center + cap, hi)],
            ] {
                chart
                    .draw_series(std::iter::once(PathElement::new(
                        segment,
                        BLACK.stroke_width(1),
                    )))
                    .context("Failed to draw whisker")?;
            }
        }
    }

    for band in &panel.bands {
        let offset = 6 + BAND_ROW_HEIGHT * band.depth as i32;
        for (position, label) in &band.ticks {
            let (px, py) = chart.backend_coord(&(*position, min_bound));
            let style = band_text_style(band.rotation, true, band.minor);
            root.draw(&Text::new(label.clone(), (px, py + offset), style))
                .context("Failed to draw tick label")?;
        }
    }

    if let Some(legend) = &panel.legend {
        let (x_px, y_px) = chart.plotting_area().get_pixel_range();
        draw_legend(root, legend, x_px, y_px)?;
    }

    Ok(())
}

fn draw_horizontal<XR>(
    root: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    mut builder: ChartBuilder<BitMapBackend>,
    panel: &PanelScene,
    facecolor: &RGBColor,
    value_axis_label: &str,
    formatter: &dyn Fn(&f64) -> String,
    value_range: XR,
) -> Result<()>
where
    XR: AsRangedCoord<Value = f64>,
    XR::CoordDescType: Ranged<ValueType = f64> + ValueFormatter<f64>,
{
    let (min_bound, _) = panel.bounds;
    let base = if panel.log_scale { min_bound } else { 0.0 };
    let mut chart = builder
        .build_cartesian_2d(value_range, 0f64..panel.layout_width)
        .context("Failed to build chart")?;
    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(0)
        .x_label_formatter(formatter)
        .x_desc(value_axis_label)
        .light_line_style(facecolor)
        .draw()
        .context("Failed to draw mesh")?;

    for bar in &panel.bars {
        let color = parse_color(&bar.color)?.mix(bar.alpha);
        let (y0, y1) = (bar.center - bar.width / 2.0, bar.center + bar.width / 2.0);
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(base, y0), (bar.value, y1)],
                color.filled(),
            )))
            .context("Failed to draw bar")?;
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(base, y0), (bar.value, y1)],
                BAR_OUTLINE.stroke_width(1),
            )))
            .context("Failed to draw bar outline")?;
        if let Some(pattern) = &bar.hatch {
            let stripes =
                hatch_segments(pattern, base.min(bar.value), bar.value.max(base), y0, y1);
            for [a, b] in stripes {
                chart
                    .draw_series(std::iter::once(PathElement::new(
                        vec![a, b],
                        BAR_OUTLINE.stroke_width(1),
                    )))
                    .context("Failed to draw hatch")?;
            }
        }
        if let Some(whisker) = bar.whisker {
            let cap = bar.width / 4.0;
            let lo = (bar.value - whisker).max(if panel.log_scale { min_bound } else { f64::MIN });
            let hi = bar.value + whisker;
            for segment in [
                vec![(lo, bar.center), (hi, bar.center)],
                vec![(lo, bar.center - cap), (lo, bar.center + cap)],
                vec![(hi, bar.center - cap), (hi, bar.center + cap)],
            ] {
                chart
                    .draw_series(std::iter::once(PathElement::new(
                        segment,
                        BLACK.stroke_width(1),
                    )))
                    .context("Failed to draw whisker")?;
            }
        }
    }

    for band in &panel.bands {
        let offset = 6 + (BAND_ROW_HEIGHT + 24) * band.depth as i32;
        for (position, label) in &band.ticks {
            let (px, py) = chart.backend_coord(&(min_bound, *position));
            let style = band_text_style(band.rotation, false, band.minor);
            root.draw(&Text::new(label.clone(), (px - offset - 4, py), style))
                .context("Failed to draw tick label")?;
        }
    }

    if let Some(legend) = &panel.legend {
        let (x_px, y_px) = chart.plotting_area().get_pixel_range();
        draw_legend(root, legend, x_px, y_px)?;
    }

    Ok(())
}

fn band_text_style(rotation: f64, vertical: bool, minor: bool) -> TextStyle<'static> {
    let size = if minor { 13 } else { 14 };
    let font = ("sans-serif", size).into_font();
    // The bitmap backend only supports quarter-turn text, so any rotation
    // past 45 degrees snaps to a quarter turn.
    if vertical {
        if rotation.abs() >= 45.0 {
            TextStyle::from(font.transform(FontTransform::Rotate90))
                .pos(Pos::new(HPos::Left, VPos::Center))
        } else {
            TextStyle::from(font).pos(Pos::new(HPos::Center, VPos::Top))
        }
    } else if rotation.abs() >= 45.0 {
        TextStyle::from(font.transform(FontTransform::Rotate270))
            .pos(Pos::new(HPos::Center, VPos::Bottom))
    } else {
        TextStyle::from(font).pos(Pos::new(HPos::Right, VPos::Center))
    }
}

fn draw_legend(
    root: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    legend: &Legend,
    plot_x: std::ops::Range<i32>,
    plot_y: std::ops::Range<i32>,
) -> Result<()> {
    if legend.entries.is_empty() {
        return Ok(());
    }
    let ncol = legend.ncol.max(1).min(legend.entries.len());
    let nrow = (legend.entries.len() + ncol - 1) / ncol;

    let label_chars = legend
        .entries
        .iter()
        .map(|entry| entry.label.chars().count())
        .max()
        .unwrap_or(1) as i32;
    let col_width = LEGEND_SWATCH + 6 + label_chars * 7 + LEGEND_PADDING;
    let row_height = LEGEND_SWATCH + 6;
    let title_height = if legend.title.is_some() { row_height } else { 0 };

    let box_width = col_width * ncol as i32 + LEGEND_PADDING;
    let box_height = row_height * nrow as i32 + title_height + LEGEND_PADDING;
    let x0 = match legend.position.as_str() {
        "upper left" | "lower left" => plot_x.start + 6,
        _ => plot_x.end - box_width - 6,
    };
    let y0 = match legend.position.as_str() {
        "lower left" | "lower right" => plot_y.end - box_height - 6,
        _ => plot_y.start + 6,
    };

    root.draw(&Rectangle::new(
        [(x0, y0), (x0 + box_width, y0 + box_height)],
        WHITE.mix(0.85).filled(),
    ))
    .context("Failed to draw legend background")?;
    root.draw(&Rectangle::new(
        [(x0, y0), (x0 + box_width, y0 + box_height)],
        BLACK.stroke_width(1),
    ))
    .context("Failed to draw legend frame")?;

    let text = TextStyle::from(("sans-serif", 13).into_font());
    if let Some(title) = &legend.title {
        let style = text
            .pos(Pos::new(HPos::Center, VPos::Top));
        root.draw(&Text::new(
            title.clone(),
            (x0 + box_width / 2, y0 + 4),
            style,
        ))
        .context("Failed to draw legend title")?;
    }

    for (i, entry) in legend.entries.iter().enumerate() {
        let col = (i % ncol) as i32;
        let row = (i / ncol) as i32;
        let ex = x0 + LEGEND_PADDING + col * col_width;
        let ey = y0 + title_height + 4 + row * row_height;
        let color = parse_color(&entry.color)?.mix(entry.alpha);
        root.draw(&Rectangle::new(
            [(ex, ey), (ex + LEGEND_SWATCH, ey + LEGEND_SWATCH)],
            color.filled(),
        ))
        .context("Failed to draw legend swatch")?;
        root.draw(&Rectangle::new(
            [(ex, ey), (ex + LEGEND_SWATCH, ey + LEGEND_SWATCH)],
            BAR_OUTLINE.stroke_width(1),
        ))
        .context("Failed to draw legend swatch frame")?;
        root.draw(&Text::new(
            entry.label.clone(),
            (ex + LEGEND_SWATCH + 6, ey + 1),
            text.clone(),
        ))
        .context("Failed to draw legend label")?;
    }

    Ok(())
}

/// Stripe segments approximating a fill pattern, clipped to the bar
/// rectangle. Segments are computed in the unit square and mapped back.
fn hatch_segments(pattern: &str, x0: f64, x1: f64, y0: f64, y1: f64) -> Vec<[(f64, f64); 2]> {
    let map = |(u, v): (f64, f64)| (x0 + u * (x1 - x0), y0 + v * (y1 - y0));
    let mut unit: Vec<[(f64, f64); 2]> = Vec::new();

    let stripes = |forward: bool, out: &mut Vec<[(f64, f64); 2]>| {
        let mut offset: f64 = -1.0;
        while offset < 1.0 {
            // Forward diagonals follow v = u - offset, backward ones mirror u.
            let u_start = offset.max(0.0);
            let u_end = (1.0 + offset).min(1.0);
            if u_end > u_start {
                let (v_start, v_end) = (u_start - offset, u_end - offset);
                if forward {
                    out.push([(u_start, v_start), (u_end, v_end)]);
                } else {
                    out.push([(1.0 - u_start, v_start), (1.0 - u_end, v_end)]);
                }
            }
            offset += 0.5;
        }
    };

    match pattern {
        "|" => {
            for u in [0.25, 0.5, 0.75] {
                unit.push([(u, 0.0), (u, 1.0)]);
            }
        }
        "-" => {
            for v in [0.25, 0.5, 0.75] {
                unit.push([(0.0, v), (1.0, v)]);
            }
        }
        "/" => stripes(true, &mut unit),
        "\\" => stripes(false, &mut unit),
        "x" | "X" => {
            stripes(true, &mut unit);
            stripes(false, &mut unit);
        }
        _ => {}
    }

    unit.into_iter().map(|[a, b]| [map(a), map(b)]).collect()
}

/// Parse a named or `#rrggbb` hex color.
pub fn parse_color(color: &str) -> Result<RGBColor> {
    if let Some(hex) = color.strip_prefix('#') {
        if hex.len() != 6 {
            bail!("Invalid hex color '{}': expected #rrggbb", color);
        }
        let r = u8::from_str_radix(&hex[0..2], 16)
            .with_context(|| format!("Invalid hex color '{}'", color))?;
        let g = u8::from_str_radix(&hex[2..4], 16)
            .with_context(|| format!("Invalid hex color '{}'", color))?;
        let b = u8::from_str_radix(&hex[4..6], 16)
            .with_context(|| format!("Invalid hex color '{}'", color))?;
        return Ok(RGBColor(r, g, b));
    }
    match color.to_ascii_lowercase().as_str() {
        "red" => Ok(RED),
        "green" => Ok(GREEN),
        "blue" => Ok(BLUE),
        "black" => Ok(BLACK),
        "yellow" => Ok(YELLOW),
        "cyan" => Ok(CYAN),
        "magenta" => Ok(MAGENTA),
        "white" => Ok(WHITE),
        "grey" | "gray" => Ok(RGBColor(128, 128, 128)),
        _ => bail!("Unknown color '{}'", color),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::compose;
    use crate::config::ChartConfig;
    use crate::table::{Measurement, Row, Table};

    fn sample_table() -> Table {
        let rows = vec![
            (vec!["a", "p"], 0.4, 0.05),
            (vec!["a", "q"], 0.6, 0.01),
            (vec!["b", "p"], 0.5, 0.02),
            (vec!["b", "q"], 0.7, 0.03),
        ]
        .into_iter()
        .map(|(key, value, uncertainty)| Row {
            key: key.into_iter().map(str::to_string).collect(),
            measurement: Measurement { value, uncertainty },
        })
        .collect();
        Table::new(rows).unwrap()
    }

    #[test]
    fn test_parse_color_hex() {
        assert_eq!(parse_color("#1f77b4").unwrap(), RGBColor(0x1f, 0x77, 0xb4));
        assert_eq!(parse_color("#000000").unwrap(), RGBColor(0, 0, 0));
    }

    #[test]
    fn test_parse_color_named() {
        assert_eq!(parse_color("white").unwrap(), RGBColor(255, 255, 255));
        assert_eq!(parse_color("Red").unwrap(), RED);
    }

    #[test]
    fn test_parse_color_invalid() {
        assert!(parse_color("#12345").is_err());
        assert!(parse_color("#zzzzzz").is_err());
        assert!(parse_color("notacolor").is_err());
    }

    #[test]
    fn test_hatch_segments_clipped_to_rect() {
        for pattern in ["|", "-", "/", "\\", "x"] {
            let segments = hatch_segments(pattern, 1.0, 2.0, 0.0, 3.0);
            assert!(!segments.is_empty(), "pattern {:?}", pattern);
            for [a, b] in segments {
                for (x, y) in [a, b] {
                    assert!((1.0..=2.0).contains(&x), "pattern {:?}", pattern);
                    assert!((0.0..=3.0).contains(&y), "pattern {:?}", pattern);
                }
            }
        }
    }

    #[test]
    fn test_hatch_segments_diagonal_stripes() {
        let segments = hatch_segments("/", 0.0, 1.0, 0.0, 1.0);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0], [(0.0, 0.5), (0.5, 1.0)]);
        assert_eq!(segments[1], [(0.0, 0.0), (1.0, 1.0)]);
        assert_eq!(segments[2], [(0.5, 0.0), (1.0, 0.5)]);
    }

    #[test]
    fn test_hatch_segments_unknown_pattern_is_empty() {
        assert!(hatch_segments("*", 0.0, 1.0, 0.0, 1.0).is_empty());
    }

    #[test]
    fn test_render_produces_png() {
        let scene = compose(&sample_table(), &ChartConfig::default()).unwrap();
        let png_bytes = render(&scene).unwrap();
        assert!(png_bytes.len() > 8);
        assert_eq!(&png_bytes[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    }

    #[test]
    fn test_render_rejects_oversized_raster() {
        let rows = (0..1200)
            .map(|i| Row {
                key: vec![format!("model-{}", i)],
                measurement: Measurement {
                    value: 0.5,
                    uncertainty: 0.0,
                },
            })
            .collect();
        let table = Table::new(rows).unwrap();
        let scene = compose(&table, &ChartConfig::default()).unwrap();
        assert!(scene.width >= MAX_RASTER_SIDE);
        let err = render(&scene).unwrap_err();
        assert!(err.to_string().contains("too large"), "{}", err);
    }

    #[test]
    fn test_render_horizontal_with_title() {
        let config = ChartConfig {
            orientation: "horizontal".to_string(),
            title: Some("benchmark".to_string()),
            data_label: Some("accuracy".to_string()),
            ..Default::default()
        };
        let scene = compose(&sample_table(), &config).unwrap();
        let png_bytes = render(&scene).unwrap();
        assert_eq!(&png_bytes[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    }

    #[test]
    fn test_render_log_scale() {
        let config = ChartConfig {
            scale: "log".to_string(),
            ..Default::default()
        };
        let scene = compose(&sample_table(), &config).unwrap();
        assert!(scene.panels[0].log_scale);
        let png_bytes = render(&scene).unwrap();
        assert_eq!(&png_bytes[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    }

    #[test]
    fn test_render_subplots_grid() {
        let config = ChartConfig {
            subplots: true,
            ..Default::default()
        };
        let scene = compose(&sample_table(), &config).unwrap();
        assert_eq!(scene.panels.len(), 2);
        let png_bytes = render(&scene).unwrap();
        assert_eq!(&png_bytes[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/output/plot.png");
        let scene = compose(&sample_table(), &ChartConfig::default()).unwrap();
        save(&scene, &path).unwrap();
        let written = std::fs::read(&path).unwrap();
        assert_eq!(&written[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    }
}
