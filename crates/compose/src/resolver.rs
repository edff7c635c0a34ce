use rtc_combine::match_combinations;
use rtc_taxonomy::{ExecutionShape, QualifiedId, Taxonomy, Technique, WorkedExample};

/// Per-technique guidance pulled from the tactic's strategy record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuidanceBlock {
    pub application_strategy: String,
    pub worked_examples: Vec<WorkedExample>,
}

/// Merges strategy-record guidance into composition output.
pub struct StrategyResolver<'a> {
    taxonomy: &'a Taxonomy,
}

impl<'a> StrategyResolver<'a> {
    pub fn new(taxonomy: &'a Taxonomy) -> Self {
        Self { taxonomy }
    }

    /// Application guidance for one technique, if its tactic has a strategy
    /// record with a matching per-technique entry. Absence is not an error;
    /// the enrichment is simply omitted.
    pub fn enrich(&self, technique: &Technique) -> Option<GuidanceBlock> {
        let tactic = self.taxonomy.strategies().tactic(&technique.tactic_id)?;
        let entry = tactic.techniques.get(&technique.id)?;
        if entry.application_strategy.is_empty() && entry.worked_examples.is_empty() {
            return None;
        }
        Some(GuidanceBlock {
            application_strategy: entry.application_strategy.clone(),
            worked_examples: entry.worked_examples.clone(),
        })
    }
}

/// Render the full strategy-guidance companion for a set of techniques:
/// shape principles, per-technique application, combination strategies,
/// anti-patterns, and the quality checklist.
///
/// Returns `None` when no strategy data applies. `verbose` adds worked
/// examples.
pub fn render_guidance(
    taxonomy: &Taxonomy,
    techniques: &[&Technique],
    verbose: bool,
) -> Option<String> {
    if techniques.is_empty() {
        return None;
    }

    let resolver = StrategyResolver::new(taxonomy);
    let shape = techniques
        .iter()
        .map(|t| t.shape)
        .max()
        .unwrap_or(ExecutionShape::SinglePrompt);
    let shape_strategy = taxonomy.strategies().shape(shape.as_str());

    let mut lines: Vec<String> = Vec::new();

    if let Some(strategy) = shape_strategy {
        lines.push(format!("Strategy: {}", strategy.name));
        if !strategy.principles.is_empty() {
            lines.push(String::new());
            lines.push("Principles:".to_string());
            for principle in &strategy.principles {
                lines.push(format!("- {principle}"));
            }
        }
    }

    let mut application: Vec<String> = Vec::new();
    for technique in techniques {
        let Some(block) = resolver.enrich(technique) else {
            continue;
        };
        application.push(format!(
            "{} ({}): {}",
            technique.name, technique.tactic_name, block.application_strategy
        ));
        if verbose {
            for example in &block.worked_examples {
                application.push(format!(
                    "  Worked example ({}): {}",
                    example.scenario, example.effective
                ));
                if !example.ineffective.is_empty() {
                    application.push(format!("  Ineffective: {}", example.ineffective));
                }
                if !example.why_effective_works.is_empty() {
                    application.push(format!("  Why it works: {}", example.why_effective_works));
                }
            }
        }
    }
    if !application.is_empty() {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push("How to apply each technique:".to_string());
        lines.append(&mut application);
    }

    let selected: Vec<QualifiedId> = techniques.iter().map(|t| t.qualified_id()).collect();
    let matched = match_combinations(&selected, taxonomy.strategies().combinations());
    if !matched.is_empty() {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push("Combination strategy:".to_string());
        for combo in matched {
            lines.push(format!("{}: {}", combo.patterns.join(" + "), combo.strategy));
            if verbose {
                if let Some(example) = &combo.worked_example {
                    lines.push(format!(
                        "  Worked example ({}): {}",
                        example.scenario, example.effective
                    ));
                }
            }
        }
    }

    let mut anti_patterns: Vec<String> = Vec::new();
    if let Some(strategy) = shape_strategy {
        for ap in &strategy.anti_patterns {
            anti_patterns.push(render_anti_pattern(ap));
        }
    }
    let mut seen_tactics: Vec<&str> = Vec::new();
    for technique in techniques {
        if seen_tactics.contains(&technique.tactic_id.as_str()) {
            continue;
        }
        seen_tactics.push(&technique.tactic_id);
        if let Some(tactic) = taxonomy.strategies().tactic(&technique.tactic_id) {
            for ap in &tactic.anti_patterns {
                anti_patterns.push(render_anti_pattern(ap));
            }
        }
    }
    if !anti_patterns.is_empty() {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push("Anti-patterns:".to_string());
        lines.append(&mut anti_patterns);
    }

    if let Some(strategy) = shape_strategy {
        if !strategy.quality_criteria.is_empty() {
            if !lines.is_empty() {
                lines.push(String::new());
            }
            lines.push("Quality checklist:".to_string());
            for criterion in &strategy.quality_criteria {
                lines.push(format!("- [ ] {criterion}"));
            }
        }
    }

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

fn render_anti_pattern(ap: &rtc_taxonomy::AntiPattern) -> String {
    let mut line = format!("- AVOID: {}\n  Why: {}", ap.pattern, ap.why);
    if !ap.instead.is_empty() {
        line.push_str(&format!("\n  Instead: {}", ap.instead));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{taxonomy_with_strategies, technique};
    use pretty_assertions::assert_eq;

    #[test]
    fn enrich_returns_guidance_when_present() {
        let taxonomy = taxonomy_with_strategies();
        let resolver = StrategyResolver::new(&taxonomy);

        let base64 = technique(&taxonomy, "encoding:base64");
        let block = resolver.enrich(base64).unwrap();
        assert_eq!(
            block.application_strategy,
            "Encode only the sensitive span, never the whole request."
        );
        assert_eq!(block.worked_examples.len(), 1);
    }

    #[test]
    fn enrich_is_none_without_a_strategy_record() {
        let taxonomy = taxonomy_with_strategies();
        let resolver = StrategyResolver::new(&taxonomy);

        // The framing tactic has no strategy source.
        let hypothetical = technique(&taxonomy, "framing:hypothetical");
        assert!(resolver.enrich(hypothetical).is_none());
    }

    #[test]
    fn guidance_includes_shape_and_combination_sections() {
        let taxonomy = taxonomy_with_strategies();
        let techniques = vec![
            technique(&taxonomy, "encoding:base64"),
            technique(&taxonomy, "framing:hypothetical"),
        ];

        let guidance = render_guidance(&taxonomy, &techniques, false).unwrap();
        assert!(guidance.contains("Strategy: Single Prompt"));
        assert!(guidance.contains("How to apply each technique:"));
        assert!(guidance.contains("Combination strategy:"));
        assert!(guidance.contains("Quality checklist:"));
        // Worked examples only appear in verbose mode.
        assert!(!guidance.contains("Worked example"));

        let verbose = render_guidance(&taxonomy, &techniques, true).unwrap();
        assert!(verbose.contains("Worked example (payload smuggling):"));
    }

    #[test]
    fn guidance_is_none_without_strategy_data() {
        let taxonomy = crate::test_fixtures::taxonomy_bare();
        let techniques = vec![technique(&taxonomy, "encoding:base64")];
        assert!(render_guidance(&taxonomy, &techniques, true).is_none());
    }
}
