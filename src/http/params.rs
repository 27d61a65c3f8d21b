//! Request parameters for SES query actions.
//!
//! A query API call is a flat set of `name=value` pairs. Most names carry a
//! single value, but a name may be added more than once, in which case every
//! value is emitted as its own `name=value` entry.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// A parameter value: a single string or a list of repeated values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterValue {
    /// One value.
    Single(String),
    /// Repeated values under one name.
    Multiple(Vec<String>),
}

impl ParameterValue {
    /// Iterate over the contained values.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            ParameterValue::Single(value) => std::slice::from_ref(value),
            ParameterValue::Multiple(values) => values.as_slice(),
        };
        slice.iter().map(String::as_str)
    }
}

/// Mapping of parameter names to values for a single request.
///
/// # Examples
///
/// ```
/// use integrations_aws_ses_query::http::RequestParameters;
///
/// let mut params = RequestParameters::new();
/// params.set("Action", "SendEmail");
/// params.add("Tag", "a");
/// params.add("Tag", "b");
///
/// assert_eq!(params.len(), 2);
/// assert_eq!(params.get("Tag").unwrap().values().count(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParameters {
    entries: BTreeMap<String, ParameterValue>,
}

impl RequestParameters {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, replacing any existing value for the name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.entries
            .insert(name.into(), ParameterValue::Single(value.into()));
        self
    }

    /// Add a value under a name, keeping any values already present.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        match self.entries.entry(name.into()) {
            Entry::Vacant(slot) => {
                slot.insert(ParameterValue::Single(value));
            }
            Entry::Occupied(mut slot) => {
                let current = slot.get_mut();
                match current {
                    ParameterValue::Single(existing) => {
                        let first = std::mem::take(existing);
                        *current = ParameterValue::Multiple(vec![first, value]);
                    }
                    ParameterValue::Multiple(values) => values.push(value),
                }
            }
        }
        self
    }

    /// Get the value stored under a name.
    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.entries.get(name)
    }

    /// Remove a parameter.
    pub fn remove(&mut self, name: &str) -> Option<ParameterValue> {
        self.entries.remove(name)
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no parameters are set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every parameter.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterate over `(name, value)` pairs, expanding repeated values.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .flat_map(|(name, value)| value.values().map(move |v| (name.as_str(), v)))
    }
}
