//! The `compare` command: load one input through both pipelines, confirm
//! they agree, and report how long each took.

use anyhow::{Context, Result, bail};
use log::info;

use crate::{
    cli::CompareArgs,
    error::Error,
    io_utils,
    legacy::LegacyLoader,
    loader::{LoadOptions, Source, SpanLoader, TableLoader},
    resolve_field_set,
    schema::FieldSet,
    stats::{LoadStats, load_with_stats},
    table::Table,
};

struct Measured {
    table: Table,
    best: LoadStats,
}

pub fn execute(args: &CompareArgs) -> Result<()> {
    let fields = resolve_field_set(&args.field_set)?;
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let text = io_utils::read_input_text(&args.input, encoding)?;
    let name = io_utils::source_name(&args.input);
    let source = Source::new(&name, &text);
    let options = LoadOptions {
        data_name: args.name.as_deref(),
        delimiter,
    };

    let span = measure(&SpanLoader, &source, &fields, &options, args.iterations);
    let legacy = measure(&LegacyLoader, &source, &fields, &options, args.iterations);

    let (span, legacy) = match (span, legacy) {
        (Ok(span), Ok(legacy)) => (span, legacy),
        (Err(span_err), Err(legacy_err)) if span_err == legacy_err => {
            return Err(span_err).with_context(|| format!("Loading {:?}", args.input));
        }
        (span, legacy) => bail!(
            "Pipelines disagree on {:?}: span returned {}, legacy returned {}",
            args.input,
            describe(&span),
            describe(&legacy)
        ),
    };

    if !span.table.same_content(&legacy.table) {
        bail!("Pipelines produced different tables for {:?}", args.input);
    }
    info!("Both pipelines produced {} identical row(s)", span.table.len());

    println!(
        "{:<8}  {:>8}  {:>12}  {:>14}",
        "pipeline", "rows", "best_ms", "rows_per_sec"
    );
    for stats in [&span.best, &legacy.best] {
        println!(
            "{:<8}  {:>8}  {:>12.3}  {:>14.0}",
            stats.pipeline,
            stats.rows,
            stats.elapsed.as_secs_f64() * 1000.0,
            stats.rows_per_second()
        );
    }
    println!("tables match: yes");
    Ok(())
}

/// Loads `iterations` times and keeps the fastest run's statistics.
fn measure(
    loader: &dyn TableLoader,
    source: &Source<'_>,
    fields: &FieldSet,
    options: &LoadOptions<'_>,
    iterations: u32,
) -> Result<Measured, Error> {
    let (table, mut best) = load_with_stats(loader, source, fields, options)?;
    info!("{best}");
    for _ in 1..iterations {
        let (_, stats) = load_with_stats(loader, source, fields, options)?;
        if stats.elapsed < best.elapsed {
            best = stats;
        }
    }
    Ok(Measured { table, best })
}

fn describe(result: &Result<Measured, Error>) -> String {
    match result {
        Ok(measured) => format!("{} row(s)", measured.table.len()),
        Err(err) => format!("error '{err}'"),
    }
}
