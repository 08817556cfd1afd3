// Library exports for nestedbars

pub mod attributes;
pub mod bands;
pub mod chart;
pub mod config;
pub mod extent;
pub mod jumps;
pub mod labels;
pub mod palette;
pub mod positions;
pub mod render;
pub mod scene;
pub mod table;

pub use attributes::AttributeMap;
pub use chart::compose;
pub use config::ChartConfig;
pub use scene::Scene;
pub use table::{Measurement, Row, StdMode, Table};

use anyhow::Result;
use std::path::Path;

/// Compose and render a table in one call, returning PNG bytes.
pub fn render_chart(table: &Table, config: &ChartConfig) -> Result<Vec<u8>> {
    let scene = chart::compose(table, config)?;
    render::render(&scene)
}

/// Compose a table and write the rendered PNG to `path`.
pub fn save_chart(table: &Table, config: &ChartConfig, path: &Path) -> Result<()> {
    let scene = chart::compose(table, config)?;
    render::save(&scene, path)
}
