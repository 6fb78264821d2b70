//! The loaded table and its read-only row views.
//!
//! Cells are stored row-major in a single buffer whose stride is the field
//! count, so building a table costs amortised growth of one `Vec` rather than
//! one allocation per row. [`Row`] is a borrowed view over one stride.

use log::debug;
use serde::{
    Serialize, Serializer,
    ser::{SerializeMap, SerializeSeq, SerializeStruct},
};

use crate::{
    data::{CellValue, FromCell, ValueKind},
    error::{Error, Result},
    schema::{FieldKey, FieldSet},
};

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    data_name: String,
    fields: FieldSet,
    cells: Vec<CellValue>,
}

impl Table {
    pub(crate) fn builder(data_name: impl Into<String>, fields: &FieldSet) -> TableBuilder {
        TableBuilder {
            table: Table {
                data_name: data_name.into(),
                fields: fields.clone(),
                cells: Vec::new(),
            },
        }
    }

    pub fn data_name(&self) -> &str {
        &self.data_name
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.cells.len() / self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        let width = self.fields.len();
        let start = index.checked_mul(width)?;
        let values = self.cells.get(start..start + width)?;
        Some(Row {
            index,
            fields: &self.fields,
            values,
        })
    }

    pub fn rows(&self) -> impl ExactSizeIterator<Item = Row<'_>> + '_ {
        self.cells
            .chunks_exact(self.fields.len())
            .enumerate()
            .map(|(index, values)| Row {
                index,
                fields: &self.fields,
                values,
            })
    }

    /// Same fields and cells, regardless of display name.
    pub fn same_content(&self, other: &Table) -> bool {
        self.fields == other.fields && self.cells == other.cells
    }

    /// Cells whose inferred kind differs from their field's type hint.
    pub fn hint_mismatches(&self) -> Vec<HintMismatch> {
        let mut mismatches = Vec::new();
        for row in self.rows() {
            for (field, value) in self.fields.iter().zip(row.values()) {
                if let Some(expected) = field.hint
                    && expected != value.kind()
                {
                    mismatches.push(HintMismatch {
                        row: row.index(),
                        field: field.name.clone(),
                        expected,
                        actual: value.kind(),
                    });
                }
            }
        }
        mismatches
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintMismatch {
    pub row: usize,
    pub field: String,
    pub expected: ValueKind,
    pub actual: ValueKind,
}

/// Accumulates rows during a load. Only the loaders construct one.
#[derive(Debug)]
pub(crate) struct TableBuilder {
    table: Table,
}

impl TableBuilder {
    /// Best-effort capacity hint; when the allocator refuses, the buffer
    /// grows as rows arrive instead.
    pub(crate) fn reserve_rows(&mut self, rows: usize) {
        let width = self.table.fields.len();
        if self.table.cells.try_reserve(rows.saturating_mul(width)).is_err() {
            debug!("Row reservation of {rows} x {width} refused; growing on demand");
        }
    }

    /// Appends one fully typed row; `values` must follow field-set order.
    pub(crate) fn push_row<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = CellValue>,
    {
        let start = self.table.cells.len();
        self.table.cells.extend(values);
        debug_assert_eq!(self.table.cells.len() - start, self.table.fields.len());
    }

    pub(crate) fn finish(self) -> Table {
        self.table
    }
}

/// One row of a [`Table`], in field-set order.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    index: usize,
    fields: &'a FieldSet,
    values: &'a [CellValue],
}

impl<'a> Row<'a> {
    /// Zero-based position among the table's rows (blank lines excluded).
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn values(&self) -> &'a [CellValue] {
        self.values
    }

    pub fn value(&self, field: impl FieldKey) -> Result<&'a CellValue> {
        field
            .resolve(self.fields)
            .and_then(|position| self.values.get(position))
            .ok_or_else(|| Error::FieldNotFound(field.label()))
    }

    /// Typed access. The stored variant must match `T` exactly.
    pub fn get<T: FromCell<'a>>(&self, field: impl FieldKey) -> Result<T> {
        let value = self.value(&field)?;
        T::from_cell(value).ok_or_else(|| Error::TypeMismatch {
            field: field.label(),
            requested: T::KIND,
            actual: value.kind(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a CellValue)> + 'a {
        self.fields
            .iter()
            .map(|field| field.name.as_str())
            .zip(self.values.iter())
    }
}

impl Serialize for Row<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

struct RowsSer<'a>(&'a Table);

impl Serialize for RowsSer<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for row in self.0.rows() {
            seq.serialize_element(&row)?;
        }
        seq.end()
    }
}

/// Writes `{data_name, fields, rows}` with each row as a field-name map.
/// Infinite floats become `null`, so JSON output is lossy for them.
impl Serialize for Table {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let names: Vec<&str> = self.fields.names().collect();
        let mut state = serializer.serialize_struct("Table", 3)?;
        state.serialize_field("data_name", &self.data_name)?;
        state.serialize_field("fields", &names)?;
        state.serialize_field("rows", &RowsSer(self))?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldDescriptor;

    fn sample() -> Table {
        let fields = FieldSet::new(vec![
            FieldDescriptor::with_hint("ID", ValueKind::Integer),
            FieldDescriptor::new("Name"),
        ])
        .unwrap();
        let mut builder = Table::builder("Enemies", &fields);
        builder.push_row([CellValue::Integer(1), CellValue::Text("Slime".into())]);
        builder.push_row([CellValue::Text("x".into()), CellValue::Text("Bat".into())]);
        builder.finish()
    }

    #[test]
    fn rows_are_strided_views_in_order() {
        let table = sample();
        assert_eq!(table.len(), 2);
        let names: Vec<&str> = table
            .rows()
            .map(|row| row.get::<&str>("Name").unwrap())
            .collect();
        assert_eq!(names, vec!["Slime", "Bat"]);
        assert!(table.row(2).is_none());
    }

    #[test]
    fn get_reports_type_mismatch_and_unknown_fields() {
        let table = sample();
        let row = table.row(0).unwrap();
        assert_eq!(row.get::<i64>("id").unwrap(), 1);
        assert_eq!(
            row.get::<f64>("ID").unwrap_err(),
            Error::TypeMismatch {
                field: "ID".to_string(),
                requested: ValueKind::Float,
                actual: ValueKind::Integer,
            }
        );
        assert_eq!(
            row.get::<i64>("HP").unwrap_err(),
            Error::FieldNotFound("HP".to_string())
        );
        assert_eq!(row.get::<String>(1usize).unwrap(), "Slime");
    }

    #[test]
    fn hint_mismatches_point_at_offending_cells() {
        let mismatches = sample().hint_mismatches();
        assert_eq!(
            mismatches,
            vec![HintMismatch {
                row: 1,
                field: "ID".to_string(),
                expected: ValueKind::Integer,
                actual: ValueKind::Text,
            }]
        );
    }

    #[test]
    fn serializes_rows_as_field_maps() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["data_name"], "Enemies");
        assert_eq!(json["fields"][1], "Name");
        assert_eq!(json["rows"][0]["ID"], 1);
        assert_eq!(json["rows"][1]["Name"], "Bat");
    }

    #[test]
    fn infinite_floats_serialize_as_null() {
        let fields = FieldSet::from_names(["Big"]).unwrap();
        let mut builder = Table::builder("Overflow", &fields);
        builder.push_row([crate::data::classify("1e400")]);
        let table = builder.finish();
        assert_eq!(table.row(0).unwrap().get::<f64>("Big").unwrap(), f64::INFINITY);
        let json = serde_json::to_value(&table).unwrap();
        assert!(json["rows"][0]["Big"].is_null());
    }

    #[test]
    fn oversized_reservation_falls_back_to_growth() {
        let fields = FieldSet::from_names(["a", "b"]).unwrap();
        let mut builder = Table::builder("Huge", &fields);
        builder.reserve_rows(usize::MAX / 2);
        builder.push_row([CellValue::Integer(1), CellValue::Integer(2)]);
        assert_eq!(builder.finish().len(), 1);
    }

    #[test]
    fn same_content_ignores_display_name() {
        let mut other = sample();
        other.data_name = "Copy".to_string();
        assert!(sample().same_content(&other));
        assert_ne!(sample(), other);
    }
}
