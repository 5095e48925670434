//! Command-line argument parsing for Tern.

use crate::query::QueryForm;
use crate::store::QueryLanguage;
use clap::Parser;
use std::io::Read;
use std::path::PathBuf;

/// A lightweight console for querying RDF graph stores.
#[derive(Parser, Debug)]
#[command(name = "tern")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Query text (reads from --file or stdin when omitted)
    #[arg(value_name = "QUERY")]
    pub query: Option<String>,

    /// Read the query from a file
    #[arg(short = 'f', long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Query language
    #[arg(short = 'l', long, value_name = "LANGUAGE", default_value = "sparql")]
    pub language: String,

    /// Result form: "tuple" or "graph" (detected from the query when omitted)
    #[arg(long, value_name = "FORM")]
    pub form: Option<String>,

    /// RDF files to load into an in-memory repository
    #[arg(short = 'd', long, value_name = "PATH")]
    pub data: Vec<PathBuf>,

    /// Use a named repository from the config file
    #[arg(short = 'r', long, value_name = "NAME")]
    pub repository: Option<String>,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Console width for table layout (overrides config)
    #[arg(short = 'w', long, value_name = "WIDTH")]
    pub width: Option<usize>,

    /// Render full IRIs instead of prefix:localName abbreviations
    #[arg(long)]
    pub no_prefix: bool,

    /// Load data with the lenient parser configuration
    #[arg(long)]
    pub lenient: bool,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(crate::config::Config::default_path)
    }

    /// Returns the named repository to use, if specified.
    pub fn repository_name(&self) -> Option<&str> {
        self.repository.as_deref()
    }

    /// Parses the query language from the --language argument.
    pub fn parse_language(&self) -> std::result::Result<QueryLanguage, String> {
        QueryLanguage::parse(&self.language).ok_or_else(|| {
            format!(
                "Unknown query language: '{}'. Expected: sparql or serql",
                self.language
            )
        })
    }

    /// Parses the result form from the --form argument, if given.
    pub fn parse_form(&self) -> std::result::Result<Option<QueryForm>, String> {
        match &self.form {
            None => Ok(None),
            Some(s) => QueryForm::parse(s).map(Some).ok_or_else(|| {
                format!("Unknown result form: '{s}'. Expected: tuple or graph")
            }),
        }
    }

    /// Reads the query text from the positional argument, --file, or stdin.
    pub fn read_query(&self) -> std::io::Result<String> {
        if let Some(query) = &self.query {
            return Ok(query.clone());
        }
        if let Some(path) = &self.file {
            return std::fs::read_to_string(path);
        }
        let mut query = String::new();
        std::io::stdin().read_to_string(&mut query)?;
        Ok(query)
    }
}
