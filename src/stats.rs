//! Load statistics returned next to a table instead of being logged by the
//! loaders themselves.

use std::{
    fmt,
    time::{Duration, Instant},
};

use crate::{
    error::Result,
    loader::{LoadOptions, Source, TableLoader},
    schema::FieldSet,
    table::Table,
};

#[derive(Debug, Clone, PartialEq)]
pub struct LoadStats {
    pub pipeline: &'static str,
    pub data_name: String,
    pub rows: usize,
    pub fields: usize,
    pub input_bytes: usize,
    pub elapsed: Duration,
}

impl LoadStats {
    pub fn rows_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.rows as f64 / secs
        } else {
            0.0
        }
    }
}

impl fmt::Display for LoadStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] '{}': {} row(s) x {} field(s) from {} byte(s) in {:.3} ms",
            self.pipeline,
            self.data_name,
            self.rows,
            self.fields,
            self.input_bytes,
            self.elapsed.as_secs_f64() * 1000.0
        )
    }
}

/// Runs `loader` and measures it. The table is returned untouched.
pub fn load_with_stats(
    loader: &dyn TableLoader,
    source: &Source<'_>,
    fields: &FieldSet,
    options: &LoadOptions<'_>,
) -> Result<(Table, LoadStats)> {
    let started = Instant::now();
    let table = loader.load(source, fields, options)?;
    let elapsed = started.elapsed();
    let stats = LoadStats {
        pipeline: loader.name(),
        data_name: table.data_name().to_string(),
        rows: table.len(),
        fields: fields.len(),
        input_bytes: source.text.len(),
        elapsed,
    };
    Ok((table, stats))
}
