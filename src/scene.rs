//! Backend-independent description of a composed chart. Composition decides
//! everything; the renderer executes these records without further layout
//! decisions.

/// A fully laid-out figure ready to render.
#[derive(Debug, Clone)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub title: Option<String>,
    /// Figure-level annotation letter (papers often need one).
    pub letter: Option<String>,
    pub nrows: usize,
    pub ncols: usize,
    pub panels: Vec<PanelScene>,
}

/// One subplot: bars, tick bands, bounds and legend for a sub-table.
#[derive(Debug, Clone)]
pub struct PanelScene {
    pub row: usize,
    pub col: usize,
    pub title: Option<String>,
    pub letter: Option<String>,
    pub vertical: bool,
    /// Extent of the position axis, from zero to the last bar edge.
    pub layout_width: f64,
    /// (min, max) of the value axis.
    pub bounds: (f64, f64),
    /// Logarithmic value axis; bars then grow from the lower bound.
    pub log_scale: bool,
    pub value_label: Option<String>,
    pub unit: Option<String>,
    /// Metric normalized into [0, 1] or [-1, 1]; affects tick formatting.
    pub normalized: bool,
    pub facecolor: String,
    pub bars: Vec<BarMark>,
    pub bands: Vec<TickBand>,
    pub legend: Option<Legend>,
}

/// A single bar with its resolved style.
#[derive(Debug, Clone)]
pub struct BarMark {
    pub center: f64,
    pub value: f64,
    /// Uncertainty whisker half-length; suppressed when below min_std.
    pub whisker: Option<f64>,
    pub width: f64,
    pub color: String,
    pub alpha: f64,
    pub hatch: Option<String>,
    pub label: String,
}

/// Tick labels for one index level. `depth` is the distance from the
/// innermost shown level (0 = minor band).
#[derive(Debug, Clone)]
pub struct TickBand {
    pub depth: usize,
    pub minor: bool,
    pub rotation: f64,
    pub ticks: Vec<(f64, String)>,
}

#[derive(Debug, Clone)]
pub struct Legend {
    pub title: Option<String>,
    pub ncol: usize,
    /// Corner anchor; "best" falls back to the upper right.
    pub position: String,
    pub entries: Vec<LegendEntry>,
}

/// One de-duplicated legend entry carrying the first handle's visual style.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
    pub alpha: f64,
    pub hatch: Option<String>,
}
