/// Compare consecutive row keys and report, per index level, whether a group
/// boundary occurred. A change at a coarse level propagates to every finer
/// level: once an outer category switches, all nested categories start a new
/// group even when their own labels repeat.
///
/// The very first row (no previous key) reports no boundary at any level.
pub fn jumps(key: &[String], previous: Option<&[String]>) -> Vec<bool> {
    let previous = match previous {
        Some(previous) => previous,
        None => return vec![false; key.len()],
    };

    let mut propagated = false;
    key.iter()
        .zip(previous)
        .map(|(new, old)| {
            let changed = new != old;
            let jump = changed || propagated;
            propagated = propagated || changed;
            jump
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_first_row_is_exempt() {
        assert_eq!(jumps(&key(&["a", "b", "c"]), None), vec![false; 3]);
    }

    #[test]
    fn test_single_level() {
        assert_eq!(jumps(&key(&["a"]), Some(&key(&["a"]))), vec![false]);
        assert_eq!(jumps(&key(&["b"]), Some(&key(&["a"]))), vec![true]);
    }

    #[test]
    fn test_leaf_change_only() {
        assert_eq!(
            jumps(&key(&["a", "b", "d"]), Some(&key(&["a", "b", "c"]))),
            vec![false, false, true]
        );
    }

    #[test]
    fn test_outer_change_propagates_to_all_finer_levels() {
        // Levels 1 and 2 repeat their labels, yet the level-0 change forces
        // a boundary everywhere below it.
        assert_eq!(
            jumps(&key(&["x", "b", "c"]), Some(&key(&["a", "b", "c"]))),
            vec![true, true, true]
        );
    }

    #[test]
    fn test_middle_change_propagates_down_not_up() {
        assert_eq!(
            jumps(&key(&["a", "x", "c"]), Some(&key(&["a", "b", "c"]))),
            vec![false, true, true]
        );
    }
}
