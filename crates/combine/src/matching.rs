use rtc_taxonomy::{CombinationStrategy, QualifiedId};

/// Find combination-strategy entries that apply to the selected techniques.
///
/// An entry applies when every one of its patterns is satisfied by at least
/// one selected id. Patterns are exact qualified ids (`persona:character`)
/// or tactic wildcards (`encoding:*`). Result order follows the order the
/// entries were declared in their source.
pub fn match_combinations<'a>(
    selected: &[QualifiedId],
    strategies: &'a [CombinationStrategy],
) -> Vec<&'a CombinationStrategy> {
    strategies
        .iter()
        .filter(|combo| {
            combo
                .patterns
                .iter()
                .all(|pattern| selected.iter().any(|id| pattern_matches(pattern, id)))
        })
        .collect()
}

fn pattern_matches(pattern: &str, id: &QualifiedId) -> bool {
    match pattern.strip_suffix(":*") {
        Some(tactic) => id.tactic() == tactic,
        None => pattern == id.to_string(),
    }
}
