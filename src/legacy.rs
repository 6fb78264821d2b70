//! The split-based baseline loader.
//!
//! Copies every line and every cell into owned strings, builds a header
//! dictionary, and types each row through its own `HashMap` before copying
//! it into the table. It is deliberately naive and exists to cross-check
//! [`SpanLoader`](crate::loader::SpanLoader) and to measure what the span
//! pipeline saves. Both loaders must return the same table or the same error.

use std::collections::HashMap;

use log::debug;

use crate::{
    data::{self, CellValue},
    error::{Error, Result},
    loader::{LoadOptions, Source, TableLoader},
    schema::{FieldSet, fold_name},
    table::Table,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyLoader;

impl TableLoader for LegacyLoader {
    fn name(&self) -> &'static str {
        "legacy"
    }

    fn load(
        &self,
        source: &Source<'_>,
        fields: &FieldSet,
        options: &LoadOptions<'_>,
    ) -> Result<Table> {
        options.validate()?;
        let delimiter = char::from(options.delimiter);

        let lines: Vec<String> = source.text.split('\n').map(str::to_string).collect();
        let header_line = lines
            .first()
            .filter(|line| !line.trim().is_empty())
            .ok_or(Error::EmptyInput)?;

        let headers: Vec<String> = header_line
            .split(delimiter)
            .map(|cell| cell.trim().to_string())
            .collect();
        let mut header_to_index: HashMap<String, usize> = HashMap::new();
        for (idx, name) in headers.iter().enumerate() {
            if header_to_index.insert(fold_name(name), idx).is_some() {
                return Err(Error::DuplicateHeader(name.clone()));
            }
        }

        let mut field_to_index: HashMap<String, usize> = HashMap::new();
        for field in fields {
            let idx = header_to_index
                .get(&fold_name(&field.name))
                .copied()
                .ok_or_else(|| Error::MissingHeader(field.name.clone()))?;
            field_to_index.insert(field.name.clone(), idx);
        }

        let mut builder = Table::builder(options.resolve_data_name(source), fields);
        for (line_idx, raw) in lines.iter().enumerate().skip(1) {
            if raw.trim().is_empty() {
                continue;
            }
            let values: Vec<String> = raw.split(delimiter).map(str::to_string).collect();
            if values.len() != headers.len() {
                return Err(Error::ColumnCountMismatch {
                    line: line_idx + 1,
                    expected: headers.len(),
                    actual: values.len(),
                });
            }

            let mut row: HashMap<String, CellValue> = HashMap::new();
            for (name, &idx) in &field_to_index {
                row.insert(name.clone(), data::classify(values[idx].trim()));
            }
            let ordered = fields
                .iter()
                .map(|field| {
                    row.remove(&field.name)
                        .ok_or_else(|| Error::FieldNotFound(field.name.clone()))
                })
                .collect::<Result<Vec<_>>>()?;
            builder.push_row(ordered);
        }

        let table = builder.finish();
        debug!(
            "Loaded '{}' with the legacy pipeline: {} row(s) x {} field(s)",
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
    use crate::loader::SpanLoader;

    fn both(text: &str, names: &[&str]) -> (Result<Table>, Result<Table>) {
        let source = Source::new("t", text);
        let fields = FieldSet::from_names(names.iter().copied()).unwrap();
        let options = LoadOptions::default();
        (
            SpanLoader.load(&source, &fields, &options),
            LegacyLoader.load(&source, &fields, &options),
        )
    }

    #[test]
    fn agrees_with_span_loader_on_valid_input() {
        let (span, legacy) = both(
            "Speaker,Command,Text\r\nAlice,say, hi \r\n\r\nBob,wait,1.5\r\n",
            &["Command", "Speaker", "Text"],
        );
        assert_eq!(span.unwrap(), legacy.unwrap());
    }

    #[test]
    fn agrees_with_span_loader_on_errors() {
        let cases: &[(&str, &[&str])] = &[
            ("", &["ID"]),
            ("\nID\n1", &["ID"]),
            ("ID,a,b,A", &["ID"]),
            ("ID,Name", &["HP"]),
            ("ID,Name\n1,Slime\n2", &["ID"]),
            ("ID,Name\n1,Slime,extra", &["Name"]),
        ];
        for (text, names) in cases {
            let (span, legacy) = both(text, names);
            let span_err = span.unwrap_err();
            assert_eq!(span_err, legacy.unwrap_err(), "input {text:?}");
        }
    }

    #[test]
    fn tab_delimited_lines_keep_empty_edge_cells() {
        let source = Source::new("t", "a\tb\n\t2\n");
        let fields = FieldSet::from_names(["a", "b"]).unwrap();
        let options = LoadOptions::default().with_delimiter(b'\t');
        let span = SpanLoader.load(&source, &fields, &options).unwrap();
        let legacy = LegacyLoader.load(&source, &fields, &options).unwrap();
        assert_eq!(span, legacy);
        let row = span.row(0).unwrap();
        assert_eq!(row.get::<&str>("a").unwrap(), "");
        assert_eq!(row.get::<i64>("b").unwrap(), 2);
    }
}
