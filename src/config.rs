use anyhow::{bail, Result};
use serde::Deserialize;

use crate::attributes::AttributeMap;
use crate::labels::LabelRules;

/// Tick rotation setting: a fixed angle in degrees or the string "auto".
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Rotation {
    Degrees(f64),
    Keyword(String),
}

impl Rotation {
    pub fn auto() -> Self {
        Rotation::Keyword("auto".to_string())
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, Rotation::Keyword(k) if k == "auto")
    }
}

/// Subplot grid columns: a positive integer or "auto".
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PlotsPerRow {
    Fixed(usize),
    Keyword(String),
}

impl PlotsPerRow {
    pub fn auto() -> Self {
        PlotsPerRow::Keyword("auto".to_string())
    }
}

/// Full configuration surface for one chart.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_bar_width")]
    pub bar_width: f64,
    #[serde(default = "default_space_width")]
    pub space_width: f64,
    /// Figure height in layout units; golden-ratio of the width when unset.
    #[serde(default)]
    pub height: Option<f64>,
    /// Pixels per layout unit when rasterizing.
    #[serde(default = "default_dpi")]
    pub dpi: u32,
    /// Whiskers narrower than this are not drawn.
    #[serde(default)]
    pub min_std: f64,
    #[serde(default)]
    pub min_value: Option<f64>,
    #[serde(default)]
    pub max_value: Option<f64>,
    #[serde(default = "default_orientation")]
    pub orientation: String,
    /// Value axis scale: "linear" or "log".
    #[serde(default = "default_scale")]
    pub scale: String,
    #[serde(default)]
    pub subplots: bool,
    #[serde(default = "PlotsPerRow::auto")]
    pub plots_per_row: PlotsPerRow,
    #[serde(default = "Rotation::auto")]
    pub minor_rotation: Rotation,
    #[serde(default = "Rotation::auto")]
    pub major_rotation: Rotation,
    #[serde(default)]
    pub unique_minor_labels: bool,
    #[serde(default = "default_true")]
    pub unique_major_labels: bool,
    #[serde(default = "default_true")]
    pub unique_data_label: bool,
    #[serde(default = "default_true")]
    pub show_legend: bool,
    /// Show the innermost level as the legend instead of a tick band.
    #[serde(default = "default_true")]
    pub show_last_level_as_legend: bool,
    #[serde(default = "default_true")]
    pub show_title: bool,
    #[serde(default)]
    pub legend_ncol: Option<usize>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub data_label: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    /// Clamp bounds for metrics recognized as living in [0, 1] or [-1, 1].
    #[serde(default = "default_true")]
    pub auto_normalize_metrics: bool,
    /// Force the metric to be treated as [0, 1], bypassing name detection.
    #[serde(default)]
    pub normalized_metric: Option<bool>,
    /// Force the metric to be treated as [-1, 1], bypassing name detection.
    #[serde(default)]
    pub absolutely_normalized_metric: Option<bool>,
    /// Legend corner: "best", "upper right", "upper left", "lower right"
    /// or "lower left".
    #[serde(default = "default_legend_position")]
    pub legend_position: String,
    #[serde(default)]
    pub letter: Option<String>,
    #[serde(default)]
    pub letter_per_subplot: Vec<String>,
    #[serde(default)]
    pub colors: Option<AttributeMap<String>>,
    #[serde(default)]
    pub alphas: Option<AttributeMap<f64>>,
    #[serde(default)]
    pub hatches: Option<AttributeMap<String>>,
    #[serde(default)]
    pub facecolors: Option<AttributeMap<String>>,
    #[serde(default)]
    pub custom_defaults: LabelRules,
}

fn default_bar_width() -> f64 {
    0.3
}
fn default_space_width() -> f64 {
    0.2
}
fn default_dpi() -> u32 {
    200
}
fn default_orientation() -> String {
    "vertical".to_string()
}
fn default_scale() -> String {
    "linear".to_string()
}
fn default_true() -> bool {
    true
}
fn default_legend_position() -> String {
    "best".to_string()
}

impl Default for ChartConfig {
    fn default() -> Self {
        ChartConfig {
            bar_width: default_bar_width(),
            space_width: default_space_width(),
            height: None,
            dpi: default_dpi(),
            min_std: 0.0,
            min_value: None,
            max_value: None,
            orientation: default_orientation(),
            scale: default_scale(),
            subplots: false,
            plots_per_row: PlotsPerRow::auto(),
            minor_rotation: Rotation::auto(),
            major_rotation: Rotation::auto(),
            unique_minor_labels: false,
            unique_major_labels: true,
            unique_data_label: true,
            show_legend: true,
            show_last_level_as_legend: true,
            show_title: true,
            legend_ncol: None,
            title: None,
            data_label: None,
            unit: None,
            auto_normalize_metrics: true,
            normalized_metric: None,
            absolutely_normalized_metric: None,
            legend_position: default_legend_position(),
            letter: None,
            letter_per_subplot: Vec::new(),
            colors: None,
            alphas: None,
            hatches: None,
            facecolors: None,
            custom_defaults: Vec::new(),
        }
    }
}

impl ChartConfig {
    pub fn vertical(&self) -> bool {
        self.orientation == "vertical"
    }

    pub fn validate(&self) -> Result<()> {
        if self.orientation != "vertical" && self.orientation != "horizontal" {
            bail!("Orientation '{}' is not supported", self.orientation);
        }
        if self.scale != "linear" && self.scale != "log" {
            bail!("Scale '{}' is not 'linear' or 'log'", self.scale);
        }
        match &self.plots_per_row {
            PlotsPerRow::Fixed(n) if *n == 0 => {
                bail!("plots_per_row must be a positive integer or 'auto'")
            }
            PlotsPerRow::Keyword(k) if k != "auto" => {
                bail!("plots_per_row '{}' is not 'auto' or a positive integer", k)
            }
            _ => {}
        }
        for rotation in [&self.minor_rotation, &self.major_rotation] {
            if let Rotation::Keyword(k) = rotation {
                if k != "auto" {
                    bail!("Rotation '{}' is not 'auto' or a number of degrees", k);
                }
            }
        }
        if self.bar_width <= 0.0 || self.space_width <= 0.0 {
            bail!("bar_width and space_width must be positive");
        }
        const LEGEND_POSITIONS: [&str; 5] = [
            "best",
            "upper right",
            "upper left",
            "lower right",
            "lower left",
        ];
        if !LEGEND_POSITIONS.contains(&self.legend_position.as_str()) {
            bail!(
                "legend_position '{}' is not one of {:?}",
                self.legend_position,
                LEGEND_POSITIONS
            );
        }
        Ok(())
    }

    /// Resolve "auto" plots_per_row against the outermost level size.
    pub fn resolved_plots_per_row(&self, outer_level_size: usize, total_rows: usize) -> usize {
        if !self.subplots {
            return 1;
        }
        match &self.plots_per_row {
            PlotsPerRow::Fixed(n) => (*n).min(outer_level_size).max(1),
            PlotsPerRow::Keyword(_) => {
                let auto = if self.vertical() {
                    if total_rows > 40 {
                        1
                    } else {
                        2
                    }
                } else {
                    4
                };
                auto.min(outer_level_size).max(1)
            }
        }
    }
}
