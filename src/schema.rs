//! Field sets: the caller-declared schema a table is loaded against.
//!
//! A [`FieldSet`] is an ordered list of [`FieldDescriptor`]s. Field names are
//! matched against header cells case-insensitively, so two names that differ
//! only by case are rejected up front. Field sets can be built from plain
//! names, from an enum declared with [`csv_fields!`](crate::csv_fields), or
//! from a YAML document:
//!
//! ```yaml
//! fields:
//!   - name: ID
//!     type: Integer
//!   - name: Name
//! ```

use serde::{Deserialize, Serialize};

use crate::{
    data::ValueKind,
    error::{Error, Result},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    /// Advisory only; inference never consults it.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub hint: Option<ValueKind>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hint: None,
        }
    }

    pub fn with_hint(name: impl Into<String>, hint: ValueKind) -> Self {
        Self {
            name: name.into(),
            hint: Some(hint),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSet {
    fields: Vec<FieldDescriptor>,
}

#[derive(Deserialize)]
struct FieldSetDocument {
    fields: Vec<FieldDescriptor>,
}

impl FieldSet {
    pub fn new(fields: Vec<FieldDescriptor>) -> Result<Self> {
        if fields.is_empty() {
            return Err(Error::InvalidFieldSet(
                "at least one field is required".to_string(),
            ));
        }
        let mut normalized: Vec<FieldDescriptor> = Vec::with_capacity(fields.len());
        for mut field in fields {
            let trimmed = field.name.trim();
            if trimmed.is_empty() {
                return Err(Error::InvalidFieldSet(
                    "field names cannot be blank".to_string(),
                ));
            }
            if let Some(existing) = normalized.iter().find(|f| names_match(&f.name, trimmed)) {
                return Err(Error::InvalidFieldSet(format!(
                    "'{}' and '{}' name the same column",
                    existing.name, trimmed
                )));
            }
            field.name = trimmed.to_string();
            normalized.push(field);
        }
        Ok(Self { fields: normalized })
    }

    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(names.into_iter().map(FieldDescriptor::new).collect())
    }

    /// Field set for an enum declared with [`csv_fields!`](crate::csv_fields).
    pub fn of<F: Field>() -> Result<Self> {
        Self::new(
            F::ALL
                .iter()
                .map(|field| FieldDescriptor {
                    name: field.name().to_string(),
                    hint: field.hint(),
                })
                .collect(),
        )
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let document: FieldSetDocument =
            serde_yaml::from_str(yaml).map_err(|err| Error::FieldSetFormat(err.to_string()))?;
        Self::new(document.fields)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FieldDescriptor> {
        self.fields.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldDescriptor> {
        self.fields.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Position of the field called `name`, compared case-insensitively.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|f| names_match(&f.name, name.trim()))
    }
}

impl<'a> IntoIterator for &'a FieldSet {
    type Item = &'a FieldDescriptor;
    type IntoIter = std::slice::Iter<'a, FieldDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// Case-insensitive name comparison shared by header resolution and field
/// lookup. Folds char by char, so it never allocates.
pub fn names_match(left: &str, right: &str) -> bool {
    if left.is_ascii() && right.is_ascii() {
        return left.eq_ignore_ascii_case(right);
    }
    left.chars()
        .flat_map(char::to_lowercase)
        .eq(right.chars().flat_map(char::to_lowercase))
}

/// Owned form of a name under the same folding as [`names_match`].
pub(crate) fn fold_name(name: &str) -> String {
    name.chars().flat_map(char::to_lowercase).collect()
}

/// An enum whose variants are the fields of a table.
///
/// Normally implemented through [`csv_fields!`](crate::csv_fields).
pub trait Field: Copy + 'static {
    const ALL: &'static [Self];

    fn name(self) -> &'static str;

    fn hint(self) -> Option<ValueKind> {
        None
    }
}

/// Anything that can pick a field out of a row: a name, a position, or a
/// field enum variant.
pub trait FieldKey {
    fn resolve(&self, fields: &FieldSet) -> Option<usize>;

    fn label(&self) -> String;
}

impl FieldKey for str {
    fn resolve(&self, fields: &FieldSet) -> Option<usize> {
        fields.position(self)
    }

    fn label(&self) -> String {
        self.to_string()
    }
}

impl FieldKey for String {
    fn resolve(&self, fields: &FieldSet) -> Option<usize> {
        fields.position(self)
    }

    fn label(&self) -> String {
        self.clone()
    }
}

impl FieldKey for usize {
    fn resolve(&self, fields: &FieldSet) -> Option<usize> {
        (*self < fields.len()).then_some(*self)
    }

    fn label(&self) -> String {
        format!("#{self}")
    }
}

impl<K: FieldKey + ?Sized> FieldKey for &K {
    fn resolve(&self, fields: &FieldSet) -> Option<usize> {
        (**self).resolve(fields)
    }

    fn label(&self) -> String {
        (**self).label()
    }
}

/// Declares a field enum usable both as a [`FieldSet`] source and as a row key.
///
/// Each variant may carry a type hint and an explicit header name:
///
/// ```
/// csv_fieldset::csv_fields! {
///     pub enum EnemyFields {
///         ID: Integer,
///         Name: Text,
///         HP: Integer = "Hit Points",
///         Attack,
///     }
/// }
///
/// let fields = csv_fieldset::FieldSet::of::<EnemyFields>().unwrap();
/// assert_eq!(fields.names().collect::<Vec<_>>(), ["ID", "Name", "Hit Points", "Attack"]);
/// ```
#[macro_export]
macro_rules! csv_fields {
    (@hint) => { None };
    (@hint $kind:ident) => { Some($crate::data::ValueKind::$kind) };
    (@name $variant:ident) => { stringify!($variant) };
    (@name $variant:ident $header:literal) => { $header };
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident $(: $kind:ident)? $(= $header:literal)?),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant),+
        }

        impl $crate::schema::Field for $name {
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $crate::csv_fields!(@name $variant $($header)?)),+
                }
            }

            fn hint(self) -> Option<$crate::data::ValueKind> {
                match self {
                    $($name::$variant => $crate::csv_fields!(@hint $($kind)?)),+
                }
            }
        }

        impl $crate::schema::FieldKey for $name {
            fn resolve(&self, fields: &$crate::schema::FieldSet) -> Option<usize> {
                fields.position(<Self as $crate::schema::Field>::name(*self))
            }

            fn label(&self) -> String {
                <Self as $crate::schema::Field>::name(*self).to_string()
            }
        }
    };
}
