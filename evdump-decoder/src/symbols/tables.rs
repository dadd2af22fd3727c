//! Symbol tables
//!
//! Lookup tables built from the dump header: event type names, event code
//! names and the optional integer properties declared for each code.

use std::collections::{BTreeMap, HashMap};

/// Properties of one event code, e.g. `Min`, `Max`, `Resolution`
pub type PropertyMap = BTreeMap<String, i64>;

/// Type, code and property tables for one dump
#[derive(Debug, Clone, Default)]
pub struct SymbolTables {
    /// Type id -> type name
    types: HashMap<u32, String>,

    /// Code names per declaring type: type id -> (code id -> code name)
    scoped_codes: HashMap<u32, HashMap<u32, String>>,

    /// Code id -> code name, across all types (later declarations win)
    codes: HashMap<u32, String>,

    /// Code name -> property name -> value
    /// Only codes with at least one property line have an entry.
    properties: HashMap<String, PropertyMap>,
}

impl SymbolTables {
    /// Create empty tables
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event type
    pub fn add_type(&mut self, type_id: u32, name: &str) {
        if let Some(previous) = self.types.insert(type_id, name.to_string()) {
            log::warn!(
                "Event type {} redeclared: {} -> {}",
                type_id,
                previous,
                name
            );
        }
        log::debug!("Registered event type {} ({})", type_id, name);
    }

    /// Register an event code under the type block that declared it
    pub fn add_code(&mut self, type_id: u32, code_id: u32, name: &str) {
        if let Some(previous) = self
            .scoped_codes
            .entry(type_id)
            .or_default()
            .insert(code_id, name.to_string())
        {
            log::warn!(
                "Event code {} of type {} redeclared: {} -> {}",
                code_id,
                type_id,
                previous,
                name
            );
        }

        if let Some(previous) = self.codes.insert(code_id, name.to_string()) {
            if previous != name {
                log::debug!(
                    "Event code {} now resolves to {} (was {})",
                    code_id,
                    name,
                    previous
                );
            }
        }
        log::debug!("Registered event code {} ({}) under type {}", code_id, name, type_id);
    }

    /// Record a property value for a code
    pub fn add_property(&mut self, code_name: &str, property: &str, value: i64) {
        self.properties
            .entry(code_name.to_string())
            .or_default()
            .insert(property.to_string(), value);
    }

    /// Look up a type name
    pub fn type_name(&self, type_id: u32) -> Option<&str> {
        self.types.get(&type_id).map(String::as_str)
    }

    /// Look up a code name by code id alone
    pub fn code_name_any(&self, code_id: u32) -> Option<&str> {
        self.codes.get(&code_id).map(String::as_str)
    }

    /// Look up a code name declared under a specific type
    pub fn scoped_code_name(&self, type_id: u32, code_id: u32) -> Option<&str> {
        self.scoped_codes
            .get(&type_id)
            .and_then(|codes| codes.get(&code_id))
            .map(String::as_str)
    }

    /// Resolve a code name for an event of the given type
    ///
    /// Codes declared under the type take precedence; otherwise the code id
    /// is looked up across all types. The flag reports whether the name came
    /// from the type's own block.
    pub fn resolve_code(&self, type_id: u32, code_id: u32) -> Option<(&str, bool)> {
        if let Some(name) = self.scoped_code_name(type_id, code_id) {
            return Some((name, true));
        }
        self.code_name_any(code_id).map(|name| (name, false))
    }

    /// Properties declared for a code, if any
    pub fn properties(&self, code_name: &str) -> Option<&PropertyMap> {
        self.properties.get(code_name)
    }

    /// Look up a single property value
    pub fn property(&self, code_name: &str, property: &str) -> Option<i64> {
        self.properties(code_name)
            .and_then(|props| props.get(property))
            .copied()
    }

    /// All event types, sorted by id
    pub fn types(&self) -> Vec<(u32, &str)> {
        let mut types: Vec<(u32, &str)> = self
            .types
            .iter()
            .map(|(id, name)| (*id, name.as_str()))
            .collect();
        types.sort_unstable_by_key(|(id, _)| *id);
        types
    }

    /// Codes declared under a type, sorted by id
    pub fn codes_for_type(&self, type_id: u32) -> Vec<(u32, &str)> {
        let mut codes: Vec<(u32, &str)> = self
            .scoped_codes
            .get(&type_id)
            .map(|codes| {
                codes
                    .iter()
                    .map(|(id, name)| (*id, name.as_str()))
                    .collect()
            })
            .unwrap_or_default();
        codes.sort_unstable_by_key(|(id, _)| *id);
        codes
    }

    /// Get table statistics
    pub fn stats(&self) -> SymbolStats {
        SymbolStats {
            num_types: self.types.len(),
            num_codes: self.scoped_codes.values().map(|codes| codes.len()).sum(),
            num_properties: self.properties.values().map(|props| props.len()).sum(),
        }
    }
}

/// Symbol table statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolStats {
    /// Number of declared event types
    pub num_types: usize,
    /// Number of declared (type, code) pairs
    pub num_codes: usize,
    /// Total number of property values
    pub num_properties: usize,
}
