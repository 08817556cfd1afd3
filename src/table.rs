use anyhow::{anyhow, bail, Context, Result};
use serde_json::Value;
use std::collections::BTreeMap;

/// Ordered tuple of category labels, one per index level.
pub type CategoryKey = Vec<String>;

/// A single bar's data: mean value plus optional uncertainty (0 when the
/// table only carries a mean column).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub value: f64,
    pub uncertainty: f64,
}

#[derive(Debug, Clone)]
pub struct Row {
    pub key: CategoryKey,
    pub measurement: Measurement,
}

impl Row {
    /// Build a row from raw value components. Exactly one (mean) or two
    /// (mean, std) components are accepted; anything else is an input-shape
    /// error.
    pub fn from_components(key: CategoryKey, components: &[f64]) -> Result<Self> {
        let measurement = match components {
            [value] => Measurement {
                value: *value,
                uncertainty: 0.0,
            },
            [value, std] => Measurement {
                value: *value,
                uncertainty: *std,
            },
            _ => bail!(
                "Expected 1 (mean) or 2 (mean, std) value components, got {}",
                components.len()
            ),
        };
        Ok(Row { key, measurement })
    }
}

/// Whether to aggregate a standard deviation column when grouping raw
/// records. `Auto` includes it only when every group carries at least two
/// samples, so the deviation is defined everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StdMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// An ordered sequence of rows sorted lexicographically by key. The sort
/// order is the plotting order; sortedness is a precondition of the layout
/// engine, not enforced here.
#[derive(Debug, Clone)]
pub struct Table {
    rows: Vec<Row>,
    depth: usize,
    index_names: Vec<String>,
}

impl Table {
    pub fn new(rows: Vec<Row>) -> Result<Self> {
        Self::with_index_names(rows, Vec::new())
    }

    pub fn with_index_names(rows: Vec<Row>, index_names: Vec<String>) -> Result<Self> {
        let first = rows
            .first()
            .ok_or_else(|| anyhow!("Cannot build a table with no rows"))?;
        let depth = first.key.len();
        if depth == 0 {
            bail!("Row keys must have at least one index level");
        }
        if let Some(row) = rows.iter().find(|r| r.key.len() != depth) {
            bail!(
                "Inconsistent key depth: expected {} levels, found {}",
                depth,
                row.key.len()
            );
        }
        if !index_names.is_empty() && index_names.len() != depth {
            bail!(
                "Expected {} index names, got {}",
                depth,
                index_names.len()
            );
        }
        Ok(Table {
            rows,
            depth,
            index_names,
        })
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of nested index levels.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Name of the innermost index level, if known. Used as the legend title.
    pub fn innermost_name(&self) -> Option<&str> {
        self.index_names.last().map(String::as_str)
    }

    /// Ordered, de-duplicated category values at each nesting depth.
    pub fn levels(&self) -> Vec<Vec<String>> {
        (0..self.depth)
            .map(|level| {
                let mut seen = Vec::new();
                for row in &self.rows {
                    if !seen.contains(&row.key[level]) {
                        seen.push(row.key[level].clone());
                    }
                }
                seen
            })
            .collect()
    }

    /// Split on the outermost level, yielding one sub-table per distinct
    /// outer label with that level stripped from the keys. Requires at least
    /// two levels (there is nothing left to plot otherwise).
    pub fn partition(&self) -> Result<Vec<(String, Table)>> {
        if self.depth < 2 {
            bail!("Unable to split a table with only a single index level");
        }
        let mut parts: Vec<(String, Vec<Row>)> = Vec::new();
        for row in &self.rows {
            let outer = &row.key[0];
            let inner = Row {
                key: row.key[1..].to_vec(),
                measurement: row.measurement,
            };
            match parts.last_mut() {
                Some((label, rows)) if label == outer => rows.push(inner),
                _ => parts.push((outer.clone(), vec![inner])),
            }
        }
        let names = if self.index_names.is_empty() {
            Vec::new()
        } else {
            self.index_names[1..].to_vec()
        };
        parts
            .into_iter()
            .map(|(label, rows)| Ok((label, Table::with_index_names(rows, names.clone())?)))
            .collect()
    }

    /// Group raw records by the given index columns and aggregate the value
    /// column into mean (and optionally sample standard deviation), sorted
    /// lexicographically by key.
    pub fn from_records(
        headers: &[String],
        records: &[Vec<String>],
        index_columns: &[String],
        value_column: &str,
        std_mode: StdMode,
    ) -> Result<Self> {
        if index_columns.is_empty() {
            bail!("At least one index column is required");
        }
        let index_positions: Vec<usize> = index_columns
            .iter()
            .map(|name| column_position(headers, name))
            .collect::<Result<_>>()?;
        let value_position = column_position(headers, value_column)?;

        let mut groups: BTreeMap<CategoryKey, Vec<f64>> = BTreeMap::new();
        for (row_idx, record) in records.iter().enumerate() {
            let key: CategoryKey = index_positions
                .iter()
                .map(|&i| record[i].clone())
                .collect();
            let raw = &record[value_position];
            let value: f64 = raw.parse().with_context(|| {
                format!(
                    "Failed to parse '{}' as number in column '{}' at row {}",
                    raw,
                    value_column,
                    row_idx + 1
                )
            })?;
            groups.entry(key).or_default().push(value);
        }

        let with_std = match std_mode {
            StdMode::Always => true,
            StdMode::Never => false,
            StdMode::Auto => groups.values().all(|samples| samples.len() >= 2),
        };

        let rows = groups
            .into_iter()
            .map(|(key, samples)| {
                let measurement = Measurement {
                    value: mean(&samples),
                    uncertainty: if with_std { sample_std(&samples) } else { 0.0 },
                };
                Row { key, measurement }
            })
            .collect();
        Table::with_index_names(rows, index_columns.to_vec())
    }

    /// Build a table from a JSON array of objects, grouping like
    /// [`Table::from_records`].
    pub fn from_json(
        value: &Value,
        index_columns: &[String],
        value_column: &str,
        std_mode: StdMode,
    ) -> Result<Self> {
        let array = value
            .as_array()
            .ok_or_else(|| anyhow!("Input data must be a JSON array of objects"))?;
        if array.is_empty() {
            bail!("Input data array is empty");
        }
        let first = array[0]
            .as_object()
            .ok_or_else(|| anyhow!("Items in array must be objects"))?;
        let headers: Vec<String> = first.keys().cloned().collect();

        let mut records = Vec::with_capacity(array.len());
        for item in array {
            let obj = item
                .as_object()
                .ok_or_else(|| anyhow!("Items in array must be objects"))?;
            let mut record = Vec::with_capacity(headers.len());
            for header in &headers {
                let cell = match obj.get(header) {
                    Some(Value::String(s)) => s.clone(),
                    Some(Value::Number(n)) => n.to_string(),
                    Some(Value::Bool(b)) => b.to_string(),
                    Some(Value::Null) | None => String::new(),
                    _ => bail!("Unsupported value type for field '{}'", header),
                };
                record.push(cell);
            }
            records.push(record);
        }
        Table::from_records(&headers, &records, index_columns, value_column, std_mode)
    }
}

fn column_position(headers: &[String], name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(name))
        .ok_or_else(|| anyhow!("Column '{}' not found", name))
}

fn mean(samples: &[f64]) -> f64 {
    samples.iter().sum::<f64>() / samples.len() as f64
}

fn sample_std(samples: &[f64]) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    let m = mean(samples);
    let var = samples.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / (samples.len() - 1) as f64;
    var.sqrt()
}
