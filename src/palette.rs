use crate::attributes::AttributeMap;

/// Tableau's categorical palette, the default series colors.
pub const TABLEAU_COLORS: [&str; 10] = [
    "#4e79a7", "#f28e2b", "#e15759", "#76b7b2", "#59a14e", "#edc949", "#b07aa2", "#ff9da7",
    "#9c755f", "#bab0ac",
];

pub const DEFAULT_ALPHA: f64 = 0.95;

/// Assign a palette color to each innermost-level value, cycling when there
/// are more series than colors.
pub fn default_colors(innermost_labels: &[String]) -> AttributeMap<String> {
    innermost_labels
        .iter()
        .zip(TABLEAU_COLORS.iter().cycle())
        .map(|(label, color)| (label.clone(), color.to_string()))
        .collect()
}

pub fn default_alphas(innermost_labels: &[String]) -> AttributeMap<f64> {
    innermost_labels
        .iter()
        .map(|label| (label.clone(), DEFAULT_ALPHA))
        .collect()
}

/// Background colors keyed by the outermost level's values.
pub fn default_facecolors(outer_labels: &[String]) -> AttributeMap<String> {
    outer_labels
        .iter()
        .map(|label| (label.clone(), "white".to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colors_cycle() {
        let labels: Vec<String> = (0..12).map(|i| format!("series-{}", i)).collect();
        let colors = default_colors(&labels);
        assert_eq!(colors.len(), 12);
        assert_eq!(colors.get("series-0").unwrap(), TABLEAU_COLORS[0]);
        assert_eq!(colors.get("series-10").unwrap(), TABLEAU_COLORS[0]);
    }

    #[test]
    fn test_default_alpha() {
        let alphas = default_alphas(&["a".to_string()]);
        assert_eq!(*alphas.get("a").unwrap(), DEFAULT_ALPHA);
    }
}
