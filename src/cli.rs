use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(author, version, about = "Load CSV text into typed, field-keyed tables", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Load a CSV file against a field set and preview the resulting table
    Load(LoadArgs),
    /// Load a CSV file with both pipelines, check they agree, and time them
    Compare(CompareArgs),
}

#[derive(Debug, Args)]
pub struct FieldSetArgs {
    /// Comma-separated field names, each optionally suffixed with `:type` (e.g. `ID:integer,Name`)
    #[arg(
        short = 'f',
        long = "fields",
        value_delimiter = ',',
        required_unless_present = "fields_file",
        conflicts_with = "fields_file"
    )]
    pub fields: Vec<String>,
    /// YAML file with a `fields` list of `{name, type}` entries
    #[arg(long = "fields-file")]
    pub fields_file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct LoadArgs {
    /// Input CSV file (`-` reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    #[command(flatten)]
    pub field_set: FieldSetArgs,
    /// Display name for the table (defaults to the input file name)
    #[arg(short = 'n', long = "name")]
    pub name: Option<String>,
    /// Loader implementation to use
    #[arg(long, value_enum, default_value_t = Pipeline::Span)]
    pub pipeline: Pipeline,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Number of rows to show (0 shows every row)
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
    /// Output format for the preview
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
    /// Warn about cells whose inferred type differs from the field's declared type
    #[arg(long = "check-hints")]
    pub check_hints: bool,
}

#[derive(Debug, Args)]
pub struct CompareArgs {
    /// Input CSV file (`-` reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    #[command(flatten)]
    pub field_set: FieldSetArgs,
    /// Display name for the table (defaults to the input file name)
    #[arg(short = 'n', long = "name")]
    pub name: Option<String>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Number of timed loads per pipeline
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub iterations: u32,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
#[value(rename_all = "kebab-case")]
pub enum Pipeline {
    #[default]
    Span,
    Legacy,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
#[value(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() || matches!(first, '\n' | '\r') {
                return Err("Delimiter must be an ASCII character other than a newline".to_string());
            }
            Ok(first as u8)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_delimiter_accepts_names_and_single_characters() {
        assert_eq!(parse_delimiter("tab").unwrap(), b'\t');
        assert_eq!(parse_delimiter("pipe").unwrap(), b'|');
        assert_eq!(parse_delimiter(":").unwrap(), b':');
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter("ab").is_err());
        assert!(parse_delimiter("é").is_err());
        assert!(parse_delimiter("\n").is_err());
    }

    #[test]
    fn fields_and_fields_file_are_mutually_exclusive() {
        let parsed = Cli::try_parse_from([
            "csv-fieldset",
            "load",
            "-i",
            "x.csv",
            "--fields",
            "ID",
            "--fields-file",
            "f.yml",
        ]);
        assert!(parsed.is_err());

        let missing = Cli::try_parse_from(["csv-fieldset", "load", "-i", "x.csv"]);
        assert!(missing.is_err());
    }

    #[test]
    fn load_defaults_to_span_pipeline_and_table_output() {
        let cli = Cli::try_parse_from(["csv-fieldset", "load", "-i", "x.csv", "-f", "ID,Name"])
            .unwrap();
        match cli.command {
            Commands::Load(args) => {
                assert_eq!(args.pipeline, Pipeline::Span);
                assert_eq!(args.format, OutputFormat::Table);
                assert_eq!(args.field_set.fields, vec!["ID", "Name"]);
                assert_eq!(args.rows, 10);
            }
            other => panic!("expected load command, got {other:?}"),
        }
    }
}
