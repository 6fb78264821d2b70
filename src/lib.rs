//! Allocation-lean CSV loading onto a caller-declared set of typed fields.
//!
//! A [`FieldSet`] names the columns a caller cares about; loading resolves
//! them against the header line once, then types every cell of every data
//! line into a [`CellValue`]. Two interchangeable [`TableLoader`]s exist:
//! [`SpanLoader`], which slices the input in place, and [`LegacyLoader`], a
//! split-and-copy baseline kept to cross-check and benchmark it.
//!
//! ```
//! use csv_fieldset::{FieldSet, Source, load};
//!
//! let fields = FieldSet::from_names(["ID", "Name", "HP", "Attack"]).unwrap();
//! let source = Source::new("enemies", "ID,Name,HP,Attack\n1,Slime,10,3\n");
//! let table = load(&source, &fields, None).unwrap();
//! let row = table.row(0).unwrap();
//! assert_eq!(row.get::<&str>("Name").unwrap(), "Slime");
//! assert_eq!(row.get::<i64>("HP").unwrap(), 10);
//! ```

pub mod cli;
pub mod compare;
pub mod data;
pub mod error;
pub mod header;
pub mod io_utils;
pub mod legacy;
pub mod loader;
pub mod preview;
pub mod schema;
pub mod span;
pub mod stats;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::{Context, anyhow};
use clap::Parser;
use log::{LevelFilter, debug, info, warn};

use crate::cli::{Cli, Commands, FieldSetArgs, OutputFormat, Pipeline};

pub use crate::{
    data::{CellValue, FromCell, ValueKind, classify},
    error::{Error, Result},
    legacy::LegacyLoader,
    loader::{DEFAULT_DELIMITER, LoadOptions, Source, SpanLoader, TableLoader},
    schema::{Field, FieldDescriptor, FieldKey, FieldSet},
    stats::{LoadStats, load_with_stats},
    table::{HintMismatch, Row, Table},
};

/// Loads `source` with the span pipeline and the default delimiter.
pub fn load(source: &Source<'_>, fields: &FieldSet, data_name: Option<&str>) -> Result<Table> {
    SpanLoader.load(source, fields, &LoadOptions::named(data_name))
}

/// Same contract as [`load`], through the split-based baseline.
pub fn load_legacy(
    source: &Source<'_>,
    fields: &FieldSet,
    data_name: Option<&str>,
) -> Result<Table> {
    LegacyLoader.load(source, fields, &LoadOptions::named(data_name))
}

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("csv_fieldset", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Load(args) => handle_load(&args),
        Commands::Compare(args) => compare::execute(&args),
    }
}

fn handle_load(args: &cli::LoadArgs) -> anyhow::Result<()> {
    let fields = resolve_field_set(&args.field_set)?;
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    info!(
        "Loading '{}' with delimiter '{}' using the {} pipeline",
        args.input.display(),
        printable_delimiter(delimiter),
        loader_for(args.pipeline).name()
    );

    let text = io_utils::read_input_text(&args.input, encoding)?;
    let name = io_utils::source_name(&args.input);
    let source = Source::new(&name, &text);
    let options = LoadOptions {
        data_name: args.name.as_deref(),
        delimiter,
    };
    let (table, stats) = load_with_stats(loader_for(args.pipeline), &source, &fields, &options)
        .with_context(|| format!("Loading {:?}", args.input))?;
    info!("{stats}");

    if args.check_hints {
        let mismatches = table.hint_mismatches();
        for mismatch in &mismatches {
            warn!(
                "Row {} field '{}' is {} but was declared {}",
                mismatch.row + 1,
                mismatch.field,
                mismatch.actual,
                mismatch.expected
            );
        }
        info!("{} cell(s) differ from their declared type", mismatches.len());
    }

    match args.format {
        OutputFormat::Table => print!("{}", preview::render_table(&table, args.rows)),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&table).context("Serializing table to JSON")?;
            println!("{json}");
        }
    }
    Ok(())
}

pub(crate) fn loader_for(pipeline: Pipeline) -> &'static dyn TableLoader {
    match pipeline {
        Pipeline::Span => &SpanLoader,
        Pipeline::Legacy => &LegacyLoader,
    }
}

/// Builds the field set from `--fields` (`name[:type]` entries) or `--fields-file`.
pub(crate) fn resolve_field_set(args: &FieldSetArgs) -> anyhow::Result<FieldSet> {
    if let Some(path) = &args.fields_file {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("Reading field set file {path:?}"))?;
        let fields = FieldSet::from_yaml_str(&yaml)
            .with_context(|| format!("Parsing field set file {path:?}"))?;
        debug!("Field set from {:?}: {:?}", path, fields.names().collect::<Vec<_>>());
        return Ok(fields);
    }

    let descriptors = args
        .fields
        .iter()
        .map(|entry| entry.trim())
        .filter(|entry| !entry.is_empty())
        .map(parse_field_entry)
        .collect::<anyhow::Result<Vec<_>>>()?;
    debug!("Field set from --fields: {:?}", descriptors);
    FieldSet::new(descriptors).context("Building field set from --fields")
}

fn parse_field_entry(entry: &str) -> anyhow::Result<FieldDescriptor> {
    match entry.split_once(':') {
        Some((name, kind)) => {
            let hint = kind
                .parse::<ValueKind>()
                .map_err(|err| anyhow!("Field '{}': {err}", name.trim()))?;
            Ok(FieldDescriptor::with_hint(name.trim(), hint))
        }
        None => Ok(FieldDescriptor::new(entry)),
    }
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        other => (other as char).to_string(),
    }
}
