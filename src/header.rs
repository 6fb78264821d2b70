//! Header resolution for the span pipeline.
//!
//! The header line is resolved exactly once per load into a [`HeaderIndex`]:
//! the header's column count plus, for each field in the [`FieldSet`], the
//! column that holds it. Resolution compares borrowed spans in place.

use crate::{
    error::{Error, Result},
    schema::{FieldSet, names_match},
    span::{self, Span},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderIndex {
    column_count: usize,
    columns: Vec<usize>,
}

impl HeaderIndex {
    /// Resolves `line` (a span of `text`) against `fields`.
    ///
    /// Duplicate detection covers every header cell, including columns the
    /// field set does not use, and reports the first cell that repeats an
    /// earlier one.
    pub fn resolve(text: &str, line: Span, fields: &FieldSet, delimiter: u8) -> Result<Self> {
        if span::is_blank(text, line) {
            return Err(Error::EmptyInput);
        }

        let column_count = span::split_cells(text, line, delimiter).count();
        let header_cells = move || {
            span::split_cells(text, line, delimiter)
                .map(move |cell| span::trim(text, cell).slice(text))
        };

        for (idx, name) in header_cells().enumerate() {
            if header_cells().take(idx).any(|earlier| names_match(name, earlier)) {
                return Err(Error::DuplicateHeader(name.to_string()));
            }
        }

        let mut columns = Vec::with_capacity(fields.len());
        for field in fields {
            let column = header_cells()
                .position(|name| names_match(name, &field.name))
                .ok_or_else(|| Error::MissingHeader(field.name.clone()))?;
            columns.push(column);
        }

        Ok(Self {
            column_count,
            columns,
        })
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    pub fn columns(&self) -> &[usize] {
        &self.columns
    }
}
