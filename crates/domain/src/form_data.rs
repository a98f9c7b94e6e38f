use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Scalar value entered for one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    /// Numeric input.
    Number(f64),
    /// Textual input.
    Text(String),
}

impl FormValue {
    /// Returns the value as display text.
    #[must_use]
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(value) => Cow::Borrowed(value.as_str()),
            Self::Number(value) => Cow::Owned(value.to_string()),
        }
    }
}

impl Display for FormValue {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_text().as_ref())
    }
}

impl From<&str> for FormValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FormValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for FormValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// Values entered for the active document config, keyed by field id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormDataMap(BTreeMap<String, FormValue>);

impl FormDataMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the raw value for a field, if one was entered.
    #[must_use]
    pub fn get(&self, field_id: &str) -> Option<&FormValue> {
        self.0.get(field_id)
    }

    /// Returns the value as text. Missing keys read as the empty string.
    #[must_use]
    pub fn text(&self, field_id: &str) -> Cow<'_, str> {
        self.0
            .get(field_id)
            .map(FormValue::as_text)
            .unwrap_or(Cow::Borrowed(""))
    }

    /// Stores a value, replacing any previous one.
    pub fn set(&mut self, field_id: impl Into<String>, value: FormValue) {
        self.0.insert(field_id.into(), value);
    }

    /// Removes every value.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Returns the number of stored values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether no value is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates stored values in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FormValue)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }
}
