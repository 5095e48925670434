//! Tern - A lightweight console for querying RDF graph stores.

mod cli;
mod config;
mod console;
mod error;
mod logging;
mod query;
mod store;

use cli::Cli;
use config::{Config, DisplayConfig, RepositoryConfig};
use console::StdoutOutput;
use error::{Result, TernError};
use query::{QueryEvaluator, QueryForm};
use store::{Namespace, OxigraphRepository};
use tracing::{debug, error, info};

fn main() {
    logging::init_stderr_logging();

    if let Err(e) = run() {
        error!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let config_path = cli.config_path();
    debug!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;

    let display = resolve_display(&cli, &config);
    let repository = resolve_repository(&cli, &config)?;

    let query = cli.read_query()?;
    let language = cli.parse_language().map_err(TernError::config)?;
    let form = match cli.parse_form().map_err(TernError::config)? {
        Some(form) => form,
        None => QueryForm::detect(&query).ok_or_else(|| {
            TernError::malformed_query(
                "cannot determine the result form; pass --form tuple or --form graph",
            )
        })?,
    };

    let mut output = StdoutOutput::new();
    let mut evaluator = QueryEvaluator::new(
        repository.as_ref().map(|r| r as &dyn store::Repository),
        &display,
        &mut output,
    );

    match form {
        QueryForm::Tuple => evaluator.evaluate_tuple_query(language, &query)?,
        QueryForm::Graph => evaluator.evaluate_graph_query(language, &query)?,
    };

    Ok(())
}

/// Resolves display settings: config file values with CLI overrides on top.
fn resolve_display(cli: &Cli, config: &Config) -> DisplayConfig {
    let mut display = config.display.clone();
    if let Some(width) = cli.width {
        display.width = width;
    }
    if cli.no_prefix {
        display.show_prefix = false;
    }
    display
}

/// Builds the repository to query, if any.
///
/// Precedence: --data files form an ad-hoc repository; otherwise a named
/// (or default) repository from the config file is loaded. With neither,
/// no repository is open and evaluations report that instead of failing.
fn resolve_repository(cli: &Cli, config: &Config) -> Result<Option<OxigraphRepository>> {
    if !cli.data.is_empty() {
        let repository = OxigraphRepository::new()?;
        for path in &cli.data {
            repository.load_path(path, cli.lenient)?;
        }
        info!(
            "Loaded {} statement(s) from {} file(s)",
            repository.size()?,
            cli.data.len()
        );
        return Ok(Some(repository));
    }

    let named = match cli.repository_name() {
        Some(name) => Some(config.get_repository(Some(name)).ok_or_else(|| {
            TernError::config(format!("Repository '{name}' not found in config file"))
        })?),
        None => config.get_repository(None),
    };

    match named {
        Some(repo_config) => Ok(Some(open_configured_repository(repo_config, cli.lenient)?)),
        None => Ok(None),
    }
}

/// Opens a repository described in the config file.
fn open_configured_repository(
    repo_config: &RepositoryConfig,
    lenient: bool,
) -> Result<OxigraphRepository> {
    // HashMap iteration order is arbitrary; sort so prefix resolution for
    // duplicate namespace IRIs stays deterministic across runs.
    let mut declared: Vec<Namespace> = repo_config
        .namespaces
        .iter()
        .map(|(prefix, iri)| Namespace::new(prefix, iri))
        .collect();
    declared.sort_by(|a, b| a.prefix.cmp(&b.prefix));

    let repository = OxigraphRepository::new()?.with_namespaces(declared);
    let lenient = lenient || repo_config.lenient;
    for path in &repo_config.data {
        repository.load_path(path, lenient)?;
    }
    info!("Loaded {} statement(s)", repository.size()?);
    Ok(repository)
}
