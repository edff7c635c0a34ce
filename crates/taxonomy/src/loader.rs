use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DanglingReference, LoadError, Result};
use crate::index::Taxonomy;
use crate::strategy::{
    AntiPattern, CombinationStrategy, ShapeStrategy, StrategyLibrary, TacticStrategy,
    TechniqueStrategy, WorkedExample,
};
use crate::types::{ExecutionShape, QualifiedId, Tactic, TacticCategory, Technique};

/// One definition source: a display name (for error messages) plus its full
/// contents. Sources are read completely up front; no handle outlives load.
#[derive(Debug, Clone)]
pub struct NamedSource {
    pub name: String,
    pub contents: String,
}

impl NamedSource {
    pub fn new(name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, contents })
    }

    fn stem(&self) -> &str {
        self.name.strip_suffix(".yaml").unwrap_or(&self.name)
    }
}

/// Optional strategy sources, grouped the way they live on disk.
#[derive(Debug, Clone, Default)]
pub struct StrategySources {
    pub tactics: Vec<NamedSource>,
    pub shapes: Vec<NamedSource>,
    pub combinations: Option<NamedSource>,
}

/// Outcome of a successful load: the taxonomy plus the soft defects found
/// while cross-linking it.
#[derive(Debug)]
pub struct LoadReport {
    pub taxonomy: Taxonomy,
    pub dangling: Vec<DanglingReference>,
}

/// Loads technique and strategy definition sources into a validated
/// [`Taxonomy`].
///
/// Required fields are fail-fast: a source missing one aborts the whole load.
/// Dangling `combines_well_with` references are the deliberate exception;
/// they are stripped, reported in the [`LoadReport`], and never fatal.
pub struct TaxonomyLoader {
    taxonomy_dir: PathBuf,
    strategies_dir: Option<PathBuf>,
}

impl TaxonomyLoader {
    pub fn new(taxonomy_dir: impl AsRef<Path>) -> Self {
        Self {
            taxonomy_dir: taxonomy_dir.as_ref().to_path_buf(),
            strategies_dir: None,
        }
    }

    pub fn with_strategies(mut self, strategies_dir: impl AsRef<Path>) -> Self {
        self.strategies_dir = Some(strategies_dir.as_ref().to_path_buf());
        self
    }

    /// Load every `*.yaml` technique source under the taxonomy directory
    /// (lexicographic file-name order, which fixes tactic declaration order)
    /// plus whatever strategy sources exist.
    pub fn load(&self) -> Result<LoadReport> {
        let techniques = read_yaml_dir(&self.taxonomy_dir)?;

        let mut strategies = StrategySources::default();
        if let Some(dir) = &self.strategies_dir {
            strategies.tactics = read_yaml_dir_if_present(&dir.join("tactics"))?;
            strategies.shapes = read_yaml_dir_if_present(&dir.join("shapes"))?;
            let combos = dir.join("combinations.yaml");
            if combos.is_file() {
                strategies.combinations = Some(NamedSource::read(&combos)?);
            }
        }

        Self::load_from_sources(&techniques, &strategies)
    }

    /// Build a taxonomy from already-read sources. This is the seam the
    /// directory walk above funnels into, and what tests feed directly.
    pub fn load_from_sources(
        techniques: &[NamedSource],
        strategies: &StrategySources,
    ) -> Result<LoadReport> {
        let mut tactics: Vec<Tactic> = Vec::new();
        let mut tactic_sources: HashMap<String, String> = HashMap::new();
        // Raw cross-references, resolved in a second pass once every
        // technique is known.
        let mut raw_refs: Vec<(usize, usize, Vec<String>)> = Vec::new();

        for source in techniques {
            let raw: RawTechniqueFile =
                serde_yaml::from_str(&source.contents).map_err(|e| LoadError::Parse {
                    source_name: source.name.clone(),
                    message: e.to_string(),
                })?;

            let raw_tactic = raw.tactic.ok_or_else(|| LoadError::MissingField {
                source_name: source.name.clone(),
                field: "tactic".to_string(),
            })?;
            let tactic_id = require(raw_tactic.id, source, "tactic.id")?;
            let tactic_name = require(raw_tactic.name, source, "tactic.name")?;
            let tactic_description = require(raw_tactic.description, source, "tactic.description")?;

            if let Some(first) = tactic_sources.get(&tactic_id) {
                return Err(LoadError::DuplicateTactic {
                    id: tactic_id,
                    first_source: first.clone(),
                    second_source: source.name.clone(),
                });
            }
            tactic_sources.insert(tactic_id.clone(), source.name.clone());

            let tactic_idx = tactics.len();
            let mut seen_ids: HashSet<String> = HashSet::new();
            let mut resolved: Vec<Technique> = Vec::new();

            for (i, raw_tech) in raw.techniques.into_iter().enumerate() {
                let id = require(raw_tech.id, source, &format!("techniques[{i}].id"))?;
                if !seen_ids.insert(id.clone()) {
                    return Err(LoadError::DuplicateTechnique {
                        source_name: source.name.clone(),
                        tactic_id,
                        id,
                    });
                }
                let name = require(raw_tech.name, source, &format!("techniques[{i}].name"))?;
                let description = require(
                    raw_tech.description,
                    source,
                    &format!("techniques[{i}].description"),
                )?;

                raw_refs.push((tactic_idx, resolved.len(), raw_tech.combines_well_with));
                resolved.push(Technique {
                    id,
                    name,
                    description,
                    tactic_id: tactic_id.clone(),
                    tactic_name: tactic_name.clone(),
                    shape: raw_tech.execution_shape.unwrap_or_default(),
                    example: non_empty(raw_tech.example),
                    effectiveness_notes: non_empty(raw_tech.effectiveness_notes),
                    combines_well_with: Vec::new(),
                    frameworks: raw_tech.frameworks,
                });
            }

            tactics.push(Tactic {
                id: tactic_id,
                name: tactic_name,
                description: tactic_description,
                category: raw_tactic.category.unwrap_or_default(),
                techniques: resolved,
            });
        }

        let dangling = link_references(&mut tactics, raw_refs);
        for defect in &dangling {
            log::warn!("dangling cross-reference: {defect}");
        }

        let library = load_strategies(strategies)?;
        Ok(LoadReport {
            taxonomy: Taxonomy::new(tactics, library),
            dangling,
        })
    }
}

/// Resolve declared `combines_well_with` strings against the full technique
/// set. Targets that parse and resolve are kept; everything else becomes a
/// [`DanglingReference`].
fn link_references(
    tactics: &mut [Tactic],
    raw_refs: Vec<(usize, usize, Vec<String>)>,
) -> Vec<DanglingReference> {
    let known: HashSet<QualifiedId> = tactics
        .iter()
        .flat_map(|t| t.techniques.iter().map(Technique::qualified_id))
        .collect();

    let mut dangling = Vec::new();
    for (tactic_idx, tech_idx, targets) in raw_refs {
        let from = tactics[tactic_idx].techniques[tech_idx].qualified_id();
        let mut kept = Vec::new();
        for target in targets {
            match target.parse::<QualifiedId>() {
                Ok(id) if known.contains(&id) => kept.push(id),
                _ => dangling.push(DanglingReference {
                    from: from.clone(),
                    target,
                }),
            }
        }
        tactics[tactic_idx].techniques[tech_idx].combines_well_with = kept;
    }
    dangling
}

fn load_strategies(sources: &StrategySources) -> Result<StrategyLibrary> {
    let mut tactics: HashMap<String, TacticStrategy> = HashMap::new();
    for source in &sources.tactics {
        let raw: RawTacticStrategyFile = parse(source)?;
        let tactic_id = raw.tactic.unwrap_or_else(|| source.stem().to_string());
        let techniques = raw
            .techniques
            .into_iter()
            .map(|(id, raw)| {
                (
                    id,
                    TechniqueStrategy {
                        application_strategy: raw.application_strategy.trim().to_string(),
                        worked_examples: raw.worked_examples,
                    },
                )
            })
            .collect();
        tactics.insert(
            tactic_id.clone(),
            TacticStrategy {
                tactic_id,
                name: raw.name,
                general_strategy: raw.general_strategy.trim().to_string(),
                techniques,
                anti_patterns: raw.anti_patterns,
                citations: raw.citations,
            },
        );
    }

    let mut shapes: HashMap<String, ShapeStrategy> = HashMap::new();
    for source in &sources.shapes {
        let raw: RawShapeStrategyFile = parse(source)?;
        let shape = raw.shape.unwrap_or_else(|| source.stem().to_string());
        shapes.insert(
            shape.clone(),
            ShapeStrategy {
                shape,
                name: raw.name,
                principles: raw.principles,
                anti_patterns: raw.anti_patterns,
                quality_criteria: raw.quality_criteria,
            },
        );
    }

    let mut combinations = Vec::new();
    if let Some(source) = &sources.combinations {
        let raw: RawCombinationsFile = parse(source)?;
        for combo in raw.combinations {
            combinations.push(CombinationStrategy {
                patterns: combo.techniques,
                strategy: combo.strategy.trim().to_string(),
                worked_example: combo.worked_example,
            });
        }
    }

    Ok(StrategyLibrary::new(tactics, shapes, combinations))
}

fn parse<T: serde::de::DeserializeOwned>(source: &NamedSource) -> Result<T> {
    serde_yaml::from_str(&source.contents).map_err(|e| LoadError::Parse {
        source_name: source.name.clone(),
        message: e.to_string(),
    })
}

/// A required field is missing when absent or blank after trimming.
fn require(value: Option<String>, source: &NamedSource, field: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(LoadError::MissingField {
            source_name: source.name.clone(),
            field: field.to_string(),
        }),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn read_yaml_dir(dir: &Path) -> Result<Vec<NamedSource>> {
    let entries = fs::read_dir(dir).map_err(|source| LoadError::Io {
        path: dir.display().to_string(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| LoadError::Io {
            path: dir.display().to_string(),
            source,
        })?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("yaml") {
            paths.push(path);
        }
    }
    // Lexicographic order keeps tactic declaration order deterministic.
    paths.sort();

    paths.iter().map(|p| NamedSource::read(p)).collect()
}

fn read_yaml_dir_if_present(dir: &Path) -> Result<Vec<NamedSource>> {
    if dir.is_dir() {
        read_yaml_dir(dir)
    } else {
        Ok(Vec::new())
    }
}

#[derive(Deserialize)]
struct RawTechniqueFile {
    tactic: Option<RawTactic>,
    #[serde(default)]
    techniques: Vec<RawTechnique>,
}

#[derive(Deserialize)]
struct RawTactic {
    id: Option<String>,
    name: Option<String>,
    description: Option<String>,
    category: Option<TacticCategory>,
}

#[derive(Deserialize)]
struct RawTechnique {
    id: Option<String>,
    name: Option<String>,
    description: Option<String>,
    execution_shape: Option<ExecutionShape>,
    example: Option<String>,
    effectiveness_notes: Option<String>,
    #[serde(default)]
    combines_well_with: Vec<String>,
    #[serde(default)]
    frameworks: Vec<String>,
}

#[derive(Deserialize)]
struct RawTacticStrategyFile {
    tactic: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    general_strategy: String,
    #[serde(default)]
    techniques: HashMap<String, RawTechniqueStrategy>,
    #[serde(default)]
    anti_patterns: Vec<AntiPattern>,
    #[serde(default)]
    citations: Vec<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawTechniqueStrategy {
    application_strategy: String,
    worked_examples: Vec<WorkedExample>,
}

#[derive(Deserialize)]
struct RawShapeStrategyFile {
    shape: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    principles: Vec<String>,
    #[serde(default)]
    anti_patterns: Vec<AntiPattern>,
    #[serde(default)]
    quality_criteria: Vec<String>,
}

#[derive(Deserialize)]
struct RawCombinationsFile {
    #[serde(default)]
    combinations: Vec<RawCombination>,
}

#[derive(Deserialize)]
struct RawCombination {
    #[serde(default)]
    techniques: Vec<String>,
    #[serde(default)]
    strategy: String,
    worked_example: Option<WorkedExample>,
}
