//! CLI command implementations

use std::path::Path;

use serde_json::{json, Value};

use crate::compiler::{Compiler, CompilerConfig};
use crate::executor::{filter as filter_documents, FilterOptions, Selection, SortSpec};
use crate::observability::{Logger, Severity};
use crate::query::Query;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{read_documents, read_lines, write_error, write_response};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    run_cli(Cli::parse_args())
}

/// Run a parsed command line
pub fn run_cli(cli: Cli) -> CliResult<()> {
    if cli.verbose {
        Logger::set_min_severity(Severity::Trace);
    }

    let compiler = build_compiler(cli.config.as_deref())?;
    run_command(&compiler, cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(compiler: &Compiler, cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Filter {
            query,
            sort_by,
            select,
        } => filter(compiler, &query, sort_by.as_deref(), select),
        Command::Check { query } => check(compiler, &query),
        Command::Match { query } => transition_match(compiler, &query),
    }
}

fn build_compiler(config_path: Option<&Path>) -> CliResult<Compiler> {
    let config = match config_path {
        Some(path) => CompilerConfig::load(path)?,
        None => CompilerConfig::default(),
    };
    Ok(Compiler::with_config(config))
}

fn parse_query(query: &str) -> CliResult<Query> {
    let value: Value = serde_json::from_str(query)?;
    Ok(Query::try_from(value)?)
}

/// Build filter options from command-line strings.
///
/// `sort_by` is a field name unless it parses as a JSON object.
pub fn filter_options(
    query: &str,
    sort_by: Option<&str>,
    select: Option<Vec<String>>,
) -> CliResult<FilterOptions> {
    let mut options = FilterOptions::new().query(parse_query(query)?);

    if let Some(sort_by) = sort_by {
        let spec = match serde_json::from_str::<Value>(sort_by) {
            Ok(value @ Value::Object(_)) => SortSpec::from_json(&value)?,
            _ => SortSpec::asc(sort_by),
        };
        options = options.sort_by(spec);
    }
    if let Some(fields) = select {
        options = options.select(Selection::new(fields));
    }
    Ok(options)
}

/// Filter documents from stdin and write the matches
pub fn filter(
    compiler: &Compiler,
    query: &str,
    sort_by: Option<&str>,
    select: Option<Vec<String>>,
) -> CliResult<()> {
    let options = filter_options(query, sort_by, select)?;
    let documents = read_documents()?;
    let results = filter_documents(compiler, &documents, &options)?;
    write_response(Value::Array(results))
}

/// Compile a query without evaluating it
pub fn check(compiler: &Compiler, query: &str) -> CliResult<()> {
    let parsed = parse_query(query)?;
    compiler.compile(&parsed)?;
    write_response(json!({ "fields": parsed.len() }))
}

/// Evaluate `{"current": .., "previous": ..}` lines in transition mode
pub fn transition_match(compiler: &Compiler, query: &str) -> CliResult<()> {
    let predicate = compiler.compile(&parse_query(query)?)?;

    for line in read_lines() {
        let pair = match line {
            Ok(pair) => pair,
            Err(e) => {
                write_error(e.code_str(), e.message())?;
                continue;
            }
        };

        let Some(current) = pair.get("current") else {
            let e = CliError::io_error("Missing \"current\" document");
            write_error(e.code_str(), e.message())?;
            continue;
        };
        let previous = pair.get("previous").filter(|p| !p.is_null());

        write_response(Value::Bool(predicate.matches_transition(current, previous)))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_filter_options_field_sort() {
        let options = filter_options(r#"{"a": 1}"#, Some("name"), None).unwrap();
        assert_eq!(options.sort_by, Some(SortSpec::asc("name")));
        assert!(options.select.is_none());
    }

    #[test]
    fn test_filter_options_json_sort_and_select() {
        let options = filter_options(
            "{}",
            Some(r#"{"age": -1}"#),
            Some(vec!["name".to_string()]),
        )
        .unwrap();
        assert_eq!(options.sort_by, Some(SortSpec::desc("age")));
        assert_eq!(options.select, Some(Selection::new(["name"])));
    }

    #[test]
    fn test_bad_query_string() {
        assert!(filter_options("{nope", None, None).is_err());
        let err = filter_options("[1]", None, None).unwrap_err();
        assert_eq!(err.code_str(), "QUERIFY_CLI_QUERY_ERROR");
    }

    #[test]
    fn test_build_compiler_from_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"strict": true}}"#).unwrap();

        let compiler = build_compiler(Some(file.path())).unwrap();
        assert!(compiler.config().strict);

        let err = build_compiler(Some(Path::new("/nonexistent/querify.json"))).unwrap_err();
        assert_eq!(err.code_str(), "QUERIFY_CLI_CONFIG_ERROR");
    }
}
