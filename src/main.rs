use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;
use std::fs;
use std::io::{self, IsTerminal};
use std::path::Path;
use std::process;
use std::time::Instant;

use fragcheck_lib::config::{self, Config, DEFAULT_CONFIG_FILE};
use fragcheck_lib::exit_codes;
use fragcheck_lib::output::{OutputFormat, OutputFormatter, OutputWriter, TextFormatter};
use fragcheck_lib::rule::ValidationError;
use fragcheck_lib::rules::{all_rules, enabled_rules};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Show debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the fragments embedded in Markdown files
    Check(CheckArgs),
    /// Create a default .fragcheck.toml in the current directory
    Init,
    /// List the available rules
    Rules,
}

#[derive(Args)]
struct CheckArgs {
    /// Files or directories to check (defaults to the current directory)
    paths: Vec<String>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<String>,

    /// Output format: text or json
    #[arg(short, long, default_value = "text")]
    output_format: OutputFormat,

    /// Only run the structural checks, never the external parsers
    #[arg(long)]
    basic: bool,

    /// Disable specific rules (comma-separated codes or names)
    #[arg(short, long)]
    disable: Option<String>,

    /// Only print diagnostics
    #[arg(short, long)]
    quiet: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Check(args) => run_check(args).await,
        Commands::Init => run_init(),
        Commands::Rules => {
            list_rules();
            Ok(exit_codes::SUCCESS)
        }
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("{}: {e:#}", "Error".red().bold());
            process::exit(exit_codes::TOOL_ERROR);
        }
    }
}

fn run_init() -> Result<i32> {
    config::create_default_config(DEFAULT_CONFIG_FILE)?;
    println!("Created default configuration file: {DEFAULT_CONFIG_FILE}");
    Ok(exit_codes::SUCCESS)
}

fn list_rules() {
    println!("Available rules:");
    for rule in all_rules(&Config::default()) {
        let mode = if rule.is_async() { "async" } else { "sync" };
        println!(
            "  {} ({}) - {} [{}] ({mode})",
            rule.name().yellow(),
            rule.names().get(1).copied().unwrap_or_default(),
            rule.description(),
            rule.tags().join(", ")
        );
    }
}

async fn run_check(args: CheckArgs) -> Result<i32> {
    let mut config = Config::load(args.config.as_deref())?;
    if args.basic {
        config.global.basic = true;
    }
    if let Some(disable) = args.disable.as_deref() {
        config.global.disable.extend(
            disable
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        );
    }

    let rules = enabled_rules(&config);
    if rules.is_empty() {
        log::warn!("All rules are disabled");
    }

    let writer = OutputWriter::new(args.quiet);
    let file_paths = find_markdown_files(&args.paths, &config)?;
    if file_paths.is_empty() {
        writer.write_status("No markdown files found to check.")?;
        return Ok(exit_codes::SUCCESS);
    }

    let start_time = Instant::now();
    let mut results: Vec<(String, Vec<ValidationError>)> = Vec::with_capacity(file_paths.len());
    for file_path in file_paths {
        let content = fs::read_to_string(&file_path).with_context(|| format!("Failed to read {file_path}"))?;
        let errors = fragcheck_lib::lint(&content, &rules, &config).await;
        log::debug!("{file_path}: {} diagnostic(s)", errors.len());
        results.push((file_path, errors));
    }
    log::debug!("Checked {} file(s) in {:?}", results.len(), start_time.elapsed());

    let total_errors: usize = results.iter().map(|(_, errors)| errors.len()).sum();
    let formatter: Box<dyn OutputFormatter> = match args.output_format {
        OutputFormat::Text if !io::stdout().is_terminal() => Box::new(TextFormatter::without_colors()),
        format => format.create_formatter(),
    };
    let report = formatter.format_report(&results);
    if !report.is_empty() {
        writer.writeln(&report)?;
    }
    if let Some(summary) = formatter.format_summary(results.len(), total_errors) {
        writer.write_status(&summary)?;
    }

    Ok(exit_codes::for_diagnostics(total_errors))
}

fn find_markdown_files(paths: &[String], config: &Config) -> Result<Vec<String>> {
    let first_path = paths.first().cloned().unwrap_or_else(|| ".".to_string());
    let mut walk_builder = WalkBuilder::new(first_path);
    for path in paths.iter().skip(1) {
        walk_builder.add(path);
    }

    let mut types_builder = ignore::types::TypesBuilder::new();
    types_builder.add("markdown", "*.md")?;
    types_builder.add("markdown", "*.markdown")?;
    types_builder.select("markdown");
    walk_builder.types(types_builder.build()?);

    if !config.global.exclude.is_empty() {
        let mut override_builder = OverrideBuilder::new(".");
        for pattern in &config.global.exclude {
            if let Err(e) = override_builder.add(&format!("!{pattern}")) {
                log::warn!("Invalid exclude pattern '{pattern}': {e}");
            }
        }
        walk_builder.overrides(override_builder.build()?);
    }

    walk_builder.hidden(true);
    walk_builder.require_git(false);

    let mut file_paths = Vec::new();
    for result in walk_builder.build() {
        match result {
            Ok(entry) if entry.path().is_file() => {
                let file_path = entry.path().to_string_lossy().to_string();
                let cleaned_path = match file_path.strip_prefix("./") {
                    Some(stripped) => stripped.to_string(),
                    None => file_path,
                };
                file_paths.push(cleaned_path);
            }
            Ok(_) => {}
            Err(err) => log::warn!("Error walking directory: {err}"),
        }
    }

    file_paths.sort();
    file_paths.dedup();
    // Explicitly named files bypass the type filter
    file_paths.retain(|path_str| {
        Path::new(path_str)
            .extension()
            .is_some_and(|ext| ext == "md" || ext == "markdown")
    });
    Ok(file_paths)
}
