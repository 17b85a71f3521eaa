use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use flags::{ScopeFlag, SexFlag};
use kinship_graph::{GraphBuilder, PersonGraph, PersonId, PersonRecord, RelationshipResolver, ResolverConfig};
use kinship_names::NameNormalizer;
use kinship_search::{FamilyQuery, IdentityFragment, NameMatcher, PersonFinder};
use rayon::prelude::*;
use report::{build_connection_report, build_report, render_markdown, RootOutcome};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

mod config;
mod describe;
mod flags;
mod report;

pub use config::KinshipConfig;
pub use describe::EnglishDescriber;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    print_stdout(&text)
}

#[derive(Parser)]
#[command(name = "kinship")]
#[command(about = "Identity matching and relationship resolution over family graphs", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for output)
    #[arg(long, global = true)]
    quiet: bool,

    /// TOML file with name tables, search and resolver settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Find persons matching an identity (and optional parents/grandparents)
    Match(MatchArgs),

    /// Resolve the canonical relationship from each root to every relative
    Resolve(ResolveArgs),

    /// Find two persons and the chain of relatives linking them
    Connect(ConnectArgs),
}

#[derive(Args)]
struct MatchArgs {
    /// Pre-linked JSON dataset (array of person records)
    dataset: PathBuf,

    /// Inline JSON family query (mutually exclusive with --file)
    #[arg(long, conflicts_with = "file")]
    json: Option<String>,

    /// Path to file containing a JSON family query
    #[arg(long)]
    file: Option<PathBuf>,

    /// Given name of the searched person
    #[arg(long)]
    given: Option<String>,

    /// Surname of the searched person
    #[arg(long)]
    surname: Option<String>,

    /// Sex of the searched person
    #[arg(long, value_enum)]
    sex: Option<SexFlag>,

    /// Birth year of the searched person
    #[arg(long)]
    birth_year: Option<i32>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct ResolveArgs {
    /// Pre-linked JSON dataset (array of person records)
    dataset: PathBuf,

    /// Root person ids, resolved in parallel
    #[arg(required = true, num_args = 1..)]
    roots: Vec<String>,

    /// Stop paths after this many steps (overrides config)
    #[arg(long)]
    max_steps: Option<usize>,

    /// Edges to follow (overrides config)
    #[arg(long, value_enum)]
    scope: Option<ScopeFlag>,

    /// Replace names of living persons with a placeholder
    #[arg(long)]
    obfuscate_living: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct ConnectArgs {
    /// Pre-linked JSON dataset (array of person records)
    dataset: PathBuf,

    /// Inline JSON family query for the first person
    #[arg(long, conflicts_with = "first_file", required_unless_present = "first_file")]
    first: Option<String>,

    /// Path to file containing the first person's JSON family query
    #[arg(long)]
    first_file: Option<PathBuf>,

    /// Inline JSON family query for the second person
    #[arg(long, conflicts_with = "second_file", required_unless_present = "second_file")]
    second: Option<String>,

    /// Path to file containing the second person's JSON family query
    #[arg(long)]
    second_file: Option<PathBuf>,

    /// Stop paths after this many steps (overrides config)
    #[arg(long)]
    max_steps: Option<usize>,

    /// Replace names of living persons with a placeholder
    #[arg(long)]
    obfuscate_living: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Markdown,
}

pub fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = KinshipConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Match(args) => run_match(args, &config)?,
        Commands::Resolve(args) => run_resolve(args, &config)?,
        Commands::Connect(args) => run_connect(args, &config)?,
    }

    Ok(())
}

/// Read the dataset and build the graph with the configured name tables
fn load_dataset(path: &Path, config: &KinshipConfig) -> Result<(PersonGraph, NameMatcher)> {
    let normalizer = NameNormalizer::new(&config.names).context("Invalid name tables")?;

    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read dataset {}", path.display()))?;
    let records: Vec<PersonRecord> = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid dataset JSON {}", path.display()))?;

    let mut builder = GraphBuilder::new(&normalizer);
    builder.extend(records);
    let graph = builder
        .build()
        .with_context(|| format!("Invalid dataset {}", path.display()))?;

    Ok((graph, NameMatcher::new(normalizer)))
}

/// Family query from an inline JSON string or a file, inline first
fn read_query(inline: Option<&str>, file: Option<&Path>, flag: &str) -> Result<Option<FamilyQuery>> {
    match (inline, file) {
        (Some(json), _) => {
            let query = serde_json::from_str(json).with_context(|| format!("Invalid --{flag} query"))?;
            Ok(Some(query))
        }
        (None, Some(file)) => {
            let raw = fs::read_to_string(file)
                .with_context(|| format!("Failed to read query {}", file.display()))?;
            let query = serde_json::from_str(&raw)
                .with_context(|| format!("Invalid query JSON {}", file.display()))?;
            Ok(Some(query))
        }
        (None, None) => Ok(None),
    }
}

fn run_match(args: MatchArgs, config: &KinshipConfig) -> Result<()> {
    let query = match read_query(args.json.as_deref(), args.file.as_deref(), "json")? {
        Some(query) => query,
        None => FamilyQuery::individual(IdentityFragment {
            given: args.given.clone(),
            surname: args.surname.clone(),
            sex: args.sex.map(SexFlag::as_domain),
            birth_year: args.birth_year,
            ..Default::default()
        }),
    };

    let (graph, matcher) = load_dataset(&args.dataset, config)?;
    let finder = PersonFinder::new(&graph, &matcher, config.search.clone())?;
    let outcome = finder.find_matches(&query)?;

    log::info!("Match: {} candidates", outcome.candidates().len());
    print_json(&outcome, args.pretty)
}

fn run_connect(args: ConnectArgs, config: &KinshipConfig) -> Result<()> {
    let first = read_query(args.first.as_deref(), args.first_file.as_deref(), "first")?
        .context("A first query is required")?;
    let second = read_query(args.second.as_deref(), args.second_file.as_deref(), "second")?
        .context("A second query is required")?;

    let mut resolver_config = config.resolver.clone();
    if let Some(max_steps) = args.max_steps {
        resolver_config.max_steps = Some(max_steps);
    }

    let (graph, matcher) = load_dataset(&args.dataset, config)?;
    let finder = PersonFinder::new(&graph, &matcher, config.search.clone())?;
    let outcome = finder.find_connection(&first, &second, &resolver_config)?;

    print_json(
        &build_connection_report(&graph, outcome, args.obfuscate_living),
        args.pretty,
    )
}

fn run_resolve(args: ResolveArgs, config: &KinshipConfig) -> Result<()> {
    let mut resolver_config = config.resolver.clone();
    if let Some(max_steps) = args.max_steps {
        resolver_config.max_steps = Some(max_steps);
    }
    if let Some(scope) = args.scope {
        resolver_config.scope = scope.as_domain();
    }
    resolver_config.validate().map_err(anyhow::Error::msg)?;

    let (graph, _) = load_dataset(&args.dataset, config)?;

    let outcomes: Vec<RootOutcome> = args
        .roots
        .par_iter()
        .map(|root| resolve_root(&graph, root, &resolver_config, args.obfuscate_living))
        .collect();

    match args.format {
        OutputFormat::Json => print_json(&outcomes, args.pretty)?,
        OutputFormat::Markdown => print_stdout(&render_markdown(&outcomes))?,
    }

    let failed = outcomes
        .iter()
        .filter(|outcome| matches!(outcome, RootOutcome::Error { .. }))
        .count();
    if failed > 0 {
        anyhow::bail!("{failed} of {} roots failed", outcomes.len());
    }
    Ok(())
}

fn resolve_root(
    graph: &PersonGraph,
    root: &str,
    config: &ResolverConfig,
    obfuscate_living: bool,
) -> RootOutcome {
    let root = PersonId::new(root);
    match RelationshipResolver::new(graph, config.clone()).resolve(&root) {
        Ok(resolution) => RootOutcome::Ok(build_report(graph, &resolution, obfuscate_living)),
        Err(err) => {
            log::warn!("Failed to resolve {root}: {err}");
            RootOutcome::Error {
                root,
                message: err.to_string(),
            }
        }
    }
}
