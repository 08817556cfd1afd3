//! Label sanitization and value-axis tick formatting.

/// SI prefixes used to rescale out-of-range tick values, smallest first.
const FACTORS: [(&str, f64); 16] = [
    ("y", 1e-24),
    ("z", 1e-21),
    ("a", 1e-18),
    ("f", 1e-15),
    ("p", 1e-12),
    ("n", 1e-9),
    ("µ", 1e-6),
    ("m", 1e-3),
    ("K", 1e3),
    ("M", 1e6),
    ("G", 1e9),
    ("T", 1e12),
    ("P", 1e15),
    ("E", 1e18),
    ("Z", 1e21),
    ("Y", 1e24),
];

/// Caller-supplied normalization rules: canonical label plus the raw
/// spellings it replaces.
pub type LabelRules = Vec<(String, Vec<String>)>;

pub fn sanitize_label(label: &str) -> String {
    label.replace('_', " ")
}

/// Apply the normalization dictionary (case-insensitive whole-label match),
/// then sanitize underscores.
pub fn normalize_label(label: &str, rules: &LabelRules) -> String {
    for (canonical, raw_spellings) in rules {
        if raw_spellings
            .iter()
            .any(|raw| raw.eq_ignore_ascii_case(label))
        {
            return canonical.clone();
        }
    }
    sanitize_label(label)
}

/// Format a value-axis tick, rescaling by an SI prefix when the metric is
/// not normalized and the magnitude leaves the [1e-3, 1e3] window.
pub fn format_value(value: f64, unit: Option<&str>, normalized: bool) -> String {
    let unit = unit.unwrap_or("");
    let magnitude = value.abs();
    if normalized || value == 0.0 || (magnitude > 1e-3 && magnitude < 1e3) {
        return format!("{}{}", trim_digits(value), unit);
    }
    for &(prefix, factor) in FACTORS.iter().rev() {
        if magnitude >= factor {
            return format!("{}{}{}", trim_digits(value / factor), prefix, unit);
        }
    }
    // Below the smallest prefix; scale into it rather than printing zero.
    let (prefix, factor) = FACTORS[0];
    format!("{}{}{}", trim_digits(value / factor), prefix, unit)
}

// Two decimals, trailing zeros stripped.
fn trim_digits(value: f64) -> String {
    let text = format!("{:.2}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text.is_empty() || text == "-" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

/// Metrics known to live in [0, 1].
pub fn is_normalized_metric(name: &str) -> bool {
    const NORMALIZED: [&str; 9] = [
        "accuracy", "auroc", "auprc", "auc", "f1", "f1 score", "precision", "recall",
        "specificity",
    ];
    let name = sanitize_label(name).to_lowercase();
    NORMALIZED.iter().any(|metric| name.contains(metric))
}

/// Metrics known to live in [-1, 1].
pub fn is_absolutely_normalized_metric(name: &str) -> bool {
    const ABSOLUTELY_NORMALIZED: [&str; 4] = [
        "correlation",
        "pearson",
        "spearman",
        "cosine similarity",
    ];
    let name = sanitize_label(name).to_lowercase();
    ABSOLUTELY_NORMALIZED
        .iter()
        .any(|metric| name.contains(metric))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_label() {
        assert_eq!(sanitize_label("cell_line"), "cell line");
    }

    #[test]
    fn test_normalize_label_rules() {
        let rules: LabelRules = vec![("promoters".to_string(), vec!["P".to_string()])];
        assert_eq!(normalize_label("P", &rules), "promoters");
        assert_eq!(normalize_label("p", &rules), "promoters");
        assert_eq!(normalize_label("other_thing", &rules), "other thing");
    }

    #[test]
    fn test_format_value_plain() {
        assert_eq!(format_value(0.5, None, false), "0.5");
        assert_eq!(format_value(12.0, None, false), "12");
        assert_eq!(format_value(0.0, None, false), "0");
    }

    #[test]
    fn test_format_value_si_scaling() {
        assert_eq!(format_value(1_500_000.0, None, false), "1.5M");
        assert_eq!(format_value(2e-6, Some("s"), false), "2µs");
        assert_eq!(format_value(4_000.0, Some("B"), false), "4KB");
    }

    #[test]
    fn test_format_value_below_smallest_prefix() {
        assert_eq!(format_value(2e-25, None, false), "0.2y");
        assert_eq!(format_value(1e-24, Some("s"), false), "1ys");
    }

    #[test]
    fn test_normalized_metric_never_rescaled() {
        assert_eq!(format_value(5000.0, None, true), "5000");
    }

    #[test]
    fn test_metric_detection() {
        assert!(is_normalized_metric("validation_accuracy"));
        assert!(is_normalized_metric("AUROC"));
        assert!(!is_normalized_metric("loss"));
        assert!(is_absolutely_normalized_metric("Pearson correlation"));
        assert!(!is_absolutely_normalized_metric("accuracy"));
    }
}
