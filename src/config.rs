use crate::FieldElement;
use std::collections::BTreeMap;

#[cfg(feature = "serde-support")]
use serde::{Deserialize, Serialize};

/// The configuration a field carries in its markup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct FieldConfig {
    /// The `data-*` attributes of the field, without the `data-`
    /// prefix.
    #[cfg_attr(feature = "serde-support", serde(default))]
    pub attributes: BTreeMap<String, String>,
    /// Whether the field is marked as required.
    #[cfg_attr(feature = "serde-support", serde(default))]
    pub required: bool,
}

impl FieldConfig {
    /// Create a new `FieldConfig` with no attributes.
    pub fn new(required: bool) -> Self {
        Self {
            attributes: BTreeMap::new(),
            required,
        }
    }

    /// A factory method to add a data attribute.
    pub fn attribute<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Read the configuration from the markup of `element`.
    pub fn from_element<E: FieldElement + ?Sized>(element: &E) -> Self {
        Self {
            attributes: element.data_attributes(),
            required: element.is_required(),
        }
    }

    /// The value of the data attribute `name`, without the `data-`
    /// prefix.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}
