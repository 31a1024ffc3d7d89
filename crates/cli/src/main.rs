use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;
use tagscope_core_rules::CoreRules;
use tagscope_tag_map::{lint, ExtractorConfig, MinimalSetComputer, TagMap};

mod discover;
mod git;

#[derive(Parser)]
#[command(name = "tagscope")]
#[command(about = "Recommend minimal test tags for changed files", long_about = None)]
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
}

#[derive(Subcommand)]
enum Commands {
    /// Check suite-wide tagging conventions
    Lint(LintArgs),

    /// Recommend a minimal tag set for a set of changed files
    Recommend(RecommendArgs),
}

#[derive(Args)]
struct LintArgs {
    /// Test files to lint (defaults to every Python file under the test root)
    #[arg(long = "paths")]
    paths: Vec<PathBuf>,

    /// Root directory of the tagged test tree
    #[arg(long, default_value = "src/tests/ftest")]
    test_root: PathBuf,

    /// Output JSON format
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct RecommendArgs {
    /// Changed file paths (defaults to the git diff against --diff-ref)
    #[arg(long = "paths")]
    paths: Vec<PathBuf>,

    /// Root directory of the tagged test tree
    #[arg(long, default_value = "src/tests/ftest")]
    test_root: PathBuf,

    /// Rule file mapping non-test paths to tags
    #[arg(long, default_value = "core_rules.toml")]
    rules: PathBuf,

    /// Reference branch to diff against when --paths is not given
    #[arg(long, default_value = "origin/master")]
    diff_ref: String,

    /// Repository root the diff is taken in
    #[arg(long, default_value = ".")]
    repo: PathBuf,

    /// Output JSON format
    #[arg(long)]
    json: bool,
}

/// Combined selection recommendation for one set of changed files
#[derive(Debug, Serialize)]
struct Recommendation {
    /// Tag expressions selecting the affected tagged tests
    test_tags: BTreeSet<String>,
    /// Tags matched by the core path rules
    core_tags: BTreeSet<String>,
    /// Space-joined union, ready for a `Test-tag:` pragma
    combined: String,
}

fn main() -> Result<()> {
    let mut cli = Cli::parse();

    // Keep stdout machine-readable when JSON output was requested
    let json_output = match &cli.command {
        Commands::Lint(args) => args.json,
        Commands::Recommend(args) => args.json,
    };
    if json_output {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Lint(args) => run_lint(args),
        Commands::Recommend(args) => run_recommend(args),
    }
}

/// Lint the tagging conventions of the whole suite (or the given files)
fn run_lint(args: LintArgs) -> Result<()> {
    let paths = if args.paths.is_empty() {
        discover::python_files(&args.test_root)?
    } else {
        args.paths.clone()
    };

    let mut map = TagMap::new(ExtractorConfig::default())?;
    map.update_from_paths(&paths)
        .context("Failed to scan test sources")?;

    let report = lint(&map);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render());
        if report.passed() {
            println!("tag lint passed");
        } else {
            println!("tag lint failed");
        }
    }

    if !report.passed() {
        std::process::exit(1);
    }
    Ok(())
}

/// Print the advisory tag recommendation for a set of changed files
fn run_recommend(args: RecommendArgs) -> Result<()> {
    let changed = if args.paths.is_empty() {
        git::changed_files(&args.repo, &args.diff_ref)
            .context("Failed to list changed files from git")?
    } else {
        args.paths.clone()
    };

    let test_files = discover::python_files(&args.test_root)?;
    let map = TagMap::from_paths(ExtractorConfig::default(), &test_files)
        .context("Failed to scan test sources")?;
    let test_tags = MinimalSetComputer::new(&map).minimal_tags(&changed);

    let rules = CoreRules::load(&args.rules, &args.test_root.to_string_lossy())
        .with_context(|| format!("Failed to load rule file {}", args.rules.display()))?;
    let core_tags = rules.recommended_tags(&changed);

    let combined = test_tags
        .union(&core_tags)
        .cloned()
        .collect::<Vec<_>>()
        .join(" ");
    let recommendation = Recommendation {
        test_tags,
        core_tags,
        combined,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&recommendation)?);
        return Ok(());
    }

    println!("Test tags: {}", join(&recommendation.test_tags));
    println!("Core tags: {}", join(&recommendation.core_tags));
    println!();
    println!("# Recommended test pragmas");
    println!("Test-tag: {}", recommendation.combined);
    Ok(())
}

fn join(tags: &BTreeSet<String>) -> String {
    tags.iter().cloned().collect::<Vec<_>>().join(" ")
}
