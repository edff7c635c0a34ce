use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use rtc_combine::{Advisor, CombinationGraph};
use rtc_compose::{render_guidance, ComposeMode, Composer};
use rtc_taxonomy::{QualifiedId, Selection, Taxonomy, TaxonomyLoader};

#[derive(Parser)]
#[command(name = "rtc")]
#[command(about = "Browse red-team techniques and compose instruction documents", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory of technique definition sources
    #[arg(long, global = true, default_value = "taxonomy/techniques")]
    taxonomy_dir: PathBuf,

    /// Directory of strategy definition sources
    #[arg(long, global = true, default_value = "taxonomy/strategies")]
    strategies_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log only warnings and errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List tactic categories
    Tactics,

    /// List techniques, optionally within one tactic
    Browse(BrowseArgs),

    /// Show one technique in detail
    Show(ShowArgs),

    /// Search techniques by id, name, or description
    Search(SearchArgs),

    /// Suggest techniques that combine well with the given selection
    Suggest(SelectionArgs),

    /// Flag likely-redundant pairs within the given selection
    Conflicts(SelectionArgs),

    /// Compose an instruction document from the given selection
    Compose(ComposeArgs),
}

#[derive(Args)]
struct BrowseArgs {
    /// Tactic id to browse; omit to list every technique
    tactic: Option<String>,
}

#[derive(Args)]
struct ShowArgs {
    /// Qualified technique id (tactic_id:technique_id)
    id: String,
}

#[derive(Args)]
struct SearchArgs {
    query: String,
}

#[derive(Args)]
struct SelectionArgs {
    /// Qualified technique ids
    #[arg(required = true)]
    techniques: Vec<String>,
}

#[derive(Args)]
struct ComposeArgs {
    /// Qualified technique ids, in the order they should layer
    #[arg(required = true)]
    techniques: Vec<String>,

    /// What the composed instruction targets
    #[arg(short, long)]
    objective: Option<String>,

    /// Composition mode
    #[arg(long, value_enum, default_value = "single-request")]
    mode: ModeFlag,

    /// Append strategy guidance (principles, anti-patterns, checklist)
    #[arg(long)]
    guidance: bool,

    /// Emit the document as JSON on stdout
    #[arg(long)]
    json: bool,
}

#[derive(Copy, Clone, ValueEnum)]
enum ModeFlag {
    SingleRequest,
    PersistentJailbreak,
}

impl ModeFlag {
    const fn as_domain(self) -> ComposeMode {
        match self {
            ModeFlag::SingleRequest => ComposeMode::SingleRequest,
            ModeFlag::PersistentJailbreak => ComposeMode::PersistentJailbreak,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let taxonomy = load_taxonomy(&cli)?;

    match &cli.command {
        Commands::Tactics => tactics(&taxonomy),
        Commands::Browse(args) => browse(&taxonomy, args),
        Commands::Show(args) => show(&taxonomy, args),
        Commands::Search(args) => search(&taxonomy, args),
        Commands::Suggest(args) => suggest(&taxonomy, args),
        Commands::Conflicts(args) => conflicts(&taxonomy, args),
        Commands::Compose(args) => compose(&taxonomy, args),
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let default_level = if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Stderr)
        .init();
}

fn load_taxonomy(cli: &Cli) -> Result<Taxonomy> {
    let mut loader = TaxonomyLoader::new(&cli.taxonomy_dir);
    if cli.strategies_dir.is_dir() {
        loader = loader.with_strategies(&cli.strategies_dir);
    }
    let report = loader
        .load()
        .with_context(|| format!("loading taxonomy from {}", cli.taxonomy_dir.display()))?;
    if !report.dangling.is_empty() {
        log::warn!(
            "{} dangling cross-reference(s) in the taxonomy",
            report.dangling.len()
        );
    }
    Ok(report.taxonomy)
}

fn parse_ids(raw: &[String]) -> Result<Vec<QualifiedId>> {
    raw.iter()
        .map(|s| s.parse::<QualifiedId>().map_err(Into::into))
        .collect()
}

fn resolve_selection(taxonomy: &Taxonomy, raw: &[String]) -> Result<Selection> {
    let ids = parse_ids(raw)?;
    Selection::resolve(taxonomy, &ids).map_err(Into::into)
}

fn tactics(taxonomy: &Taxonomy) -> Result<()> {
    for tactic in taxonomy.tactics() {
        println!(
            "{}  [{}] ({} techniques)",
            tactic.id,
            tactic.category.as_str(),
            tactic.techniques.len()
        );
        println!("    {}", tactic.description);
    }
    Ok(())
}

fn browse(taxonomy: &Taxonomy, args: &BrowseArgs) -> Result<()> {
    let techniques: Vec<_> = match &args.tactic {
        Some(tactic_id) => taxonomy
            .techniques_of(tactic_id)
            .with_context(|| format!("unknown tactic `{tactic_id}`"))?
            .iter()
            .collect(),
        None => taxonomy.techniques().collect(),
    };

    for technique in techniques {
        println!(
            "{}  {}  [{}]",
            technique.qualified_id(),
            technique.name,
            technique.shape
        );
    }
    Ok(())
}

fn show(taxonomy: &Taxonomy, args: &ShowArgs) -> Result<()> {
    let id: QualifiedId = args.id.parse()?;
    let technique = taxonomy
        .technique(&id)
        .with_context(|| format!("unknown technique `{id}`"))?;

    println!("{} ({})", technique.name, technique.qualified_id());
    println!("Tactic: {}", technique.tactic_name);
    println!("Shape: {}", technique.shape);
    println!();
    println!("{}", technique.description);
    if let Some(example) = &technique.example {
        println!();
        println!("Example: {example}");
    }
    if let Some(notes) = &technique.effectiveness_notes {
        println!();
        println!("Effectiveness: {notes}");
    }

    let graph = CombinationGraph::build(taxonomy);
    let partners = graph.partners(&id);
    if !partners.is_empty() {
        println!();
        println!("Combines well with:");
        for partner in partners {
            println!("  {partner}");
        }
    }
    Ok(())
}

fn search(taxonomy: &Taxonomy, args: &SearchArgs) -> Result<()> {
    let hits = taxonomy.search(&args.query);
    if hits.is_empty() {
        println!("no techniques match `{}`", args.query);
        return Ok(());
    }
    for technique in hits {
        println!(
            "{}  {}  ({})",
            technique.qualified_id(),
            technique.name,
            technique.tactic_name
        );
    }
    Ok(())
}

fn suggest(taxonomy: &Taxonomy, args: &SelectionArgs) -> Result<()> {
    let selection = resolve_selection(taxonomy, &args.techniques)?;
    let graph = CombinationGraph::build(taxonomy);
    let advisor = Advisor::new(taxonomy, &graph);

    let suggestions = advisor.suggest(&selection);
    if suggestions.is_empty() {
        println!("no documented combinations for this selection");
        return Ok(());
    }
    for id in suggestions {
        // The advisor only returns indexed ids, so the lookup holds.
        if let Some(technique) = taxonomy.technique(&id) {
            println!("{id}  {}", technique.name);
        }
    }
    Ok(())
}

fn conflicts(taxonomy: &Taxonomy, args: &SelectionArgs) -> Result<()> {
    let selection = resolve_selection(taxonomy, &args.techniques)?;
    let graph = CombinationGraph::build(taxonomy);
    let advisor = Advisor::new(taxonomy, &graph);

    let warnings = advisor.conflicts(&selection);
    if warnings.is_empty() {
        println!("no likely-redundant pairs in this selection");
        return Ok(());
    }
    for warning in warnings {
        println!("{}", warning.message);
    }
    Ok(())
}

fn compose(taxonomy: &Taxonomy, args: &ComposeArgs) -> Result<()> {
    let selection = resolve_selection(taxonomy, &args.techniques)?;
    let graph = CombinationGraph::build(taxonomy);
    let composer = Composer::new(taxonomy, &graph);

    let objective = args.objective.as_deref().unwrap_or_default();
    let document = composer.compose(&selection, objective, args.mode.as_domain())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&document)?);
        return Ok(());
    }

    println!("{document}");

    if args.guidance {
        let techniques: Vec<_> = document
            .techniques
            .iter()
            .filter_map(|id| taxonomy.technique(id))
            .collect();
        if let Some(guidance) = render_guidance(taxonomy, &techniques, true) {
            println!();
            println!("{guidance}");
        }
    }
    Ok(())
}
