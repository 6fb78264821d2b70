//! The span pipeline: the primary [`TableLoader`].
//!
//! Lines and cells are located as spans over the borrowed input, the header
//! is resolved once, and each data line is typed straight into the table's
//! cell buffer. Per line, the only allocations are `Text` payloads; the span
//! scratch buffer and the cell buffer are sized up front and reused.

use log::debug;

use crate::{
    data,
    error::{Error, Result},
    header::HeaderIndex,
    schema::FieldSet,
    span::{self, Span},
    table::Table,
};

pub const DEFAULT_DELIMITER: u8 = b',';

/// Text handed to a loader, with the identifier used as the default
/// display name of the resulting table.
#[derive(Debug, Clone, Copy)]
pub struct Source<'a> {
    pub name: &'a str,
    pub text: &'a str,
}

impl<'a> Source<'a> {
    pub fn new(name: &'a str, text: &'a str) -> Self {
        Self { name, text }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LoadOptions<'a> {
    /// Display name; falls back to the source name when `None` or empty.
    pub data_name: Option<&'a str>,
    pub delimiter: u8,
}

impl Default for LoadOptions<'_> {
    fn default() -> Self {
        Self {
            data_name: None,
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

impl<'a> LoadOptions<'a> {
    pub fn named(data_name: Option<&'a str>) -> Self {
        Self {
            data_name,
            ..Self::default()
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !self.delimiter.is_ascii() || matches!(self.delimiter, b'\n' | b'\r') {
            return Err(Error::InvalidDelimiter(self.delimiter));
        }
        Ok(())
    }

    pub(crate) fn resolve_data_name<'s>(&self, source: &Source<'s>) -> &'s str
    where
        'a: 's,
    {
        match self.data_name {
            Some(name) if !name.is_empty() => name,
            _ => source.name,
        }
    }
}

/// One way of turning text into a [`Table`]. Implementations must agree on
/// every input, including which error they report.
pub trait TableLoader {
    fn name(&self) -> &'static str;

    fn load(&self, source: &Source<'_>, fields: &FieldSet, options: &LoadOptions<'_>)
    -> Result<Table>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SpanLoader;

impl TableLoader for SpanLoader {
    fn name(&self) -> &'static str {
        "span"
    }

    fn load(
        &self,
        source: &Source<'_>,
        fields: &FieldSet,
        options: &LoadOptions<'_>,
    ) -> Result<Table> {
        options.validate()?;
        let text = source.text;
        let delimiter = options.delimiter;

        let mut lines = span::lines(text);
        let (_, header_line) = lines.next().ok_or(Error::EmptyInput)?;
        let header = HeaderIndex::resolve(text, header_line, fields, delimiter)?;

        let mut builder = Table::builder(options.resolve_data_name(source), fields);
        // Blank lines cost one byte but no row; a kept row spans at least
        // one byte per column.
        let newlines = text.bytes().filter(|&b| b == b'\n').count();
        builder.reserve_rows(newlines.min(text.len() / header.column_count().max(1)));

        let mut cells: Vec<Span> = Vec::with_capacity(header.column_count());
        for (line_number, line) in lines {
            if span::is_blank(text, line) {
                continue;
            }
            cells.clear();
            cells.extend(span::split_cells(text, line, delimiter));
            if cells.len() != header.column_count() {
                return Err(Error::ColumnCountMismatch {
                    line: line_number,
                    expected: header.column_count(),
                    actual: cells.len(),
                });
            }
            builder.push_row(
                header
                    .columns()
                    .iter()
                    .map(|&column| data::classify(span::trim(text, cells[column]).slice(text))),
            );
        }

        let table = builder.finish();
        debug!(
            "Loaded '{}' with the span pipeline: {} row(s) x {} field(s)",
            table.data_name(),
            table.len(),
            fields.len()
        );
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enemy_fields() -> FieldSet {
        FieldSet::from_names(["ID", "Name", "HP", "Attack"]).unwrap()
    }

    #[test]
    fn data_name_defaults_to_source_name() {
        let source = Source::new("enemies.csv", "ID,Name,HP,Attack\n1,Slime,10,3\n");
        let fields = enemy_fields();
        let unnamed = SpanLoader
            .load(&source, &fields, &LoadOptions::default())
            .unwrap();
        assert_eq!(unnamed.data_name(), "enemies.csv");

        let empty_name = SpanLoader
            .load(&source, &fields, &LoadOptions::named(Some("")))
            .unwrap();
        assert_eq!(empty_name.data_name(), "enemies.csv");

        let named = SpanLoader
            .load(&source, &fields, &LoadOptions::named(Some("EnemyStats")))
            .unwrap();
        assert_eq!(named.data_name(), "EnemyStats");
    }

    #[test]
    fn rejects_newline_and_non_ascii_delimiters() {
        let source = Source::new("s", "ID\n1\n");
        let fields = FieldSet::from_names(["ID"]).unwrap();
        for delimiter in [b'\n', b'\r', 0xC3] {
            let options = LoadOptions::default().with_delimiter(delimiter);
            assert_eq!(
                SpanLoader.load(&source, &fields, &options).unwrap_err(),
                Error::InvalidDelimiter(delimiter)
            );
        }
    }

    #[test]
    fn mismatch_reports_physical_line_number() {
        let source = Source::new("s", "ID,Name,HP,Attack\n\n1,Slime,10,3\n2,Bat,4\n");
        let err = SpanLoader
            .load(&source, &enemy_fields(), &LoadOptions::default())
            .unwrap_err();
        assert_eq!(
            err,
            Error::ColumnCountMismatch {
                line: 4,
                expected: 4,
                actual: 3,
            }
        );
    }

    #[test]
    fn header_without_rows_gives_empty_table() {
        let source = Source::new("s", "ID,Name,HP,Attack");
        let table = SpanLoader
            .load(&source, &enemy_fields(), &LoadOptions::default())
            .unwrap();
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
    }
}
