use alloc::{
    collections::btree_map::BTreeMap,
    string::{String, ToString},
};

/// Opaque configuration provider a driver instance is created from.
///
/// Absence of a key (`None`) is distinguishable from a present-but-malformed
/// value, which surfaces when the consumer parses the raw string.
pub trait Config {
    fn get(&self, key: &str) -> Option<&str>;
}

/// Map-backed [`Config`] for tests, demos and hosts without a real
/// configuration subsystem.
#[derive(Default, Debug, Clone)]
pub struct TableConfig {
    entries: BTreeMap<String, String>,
}

impl TableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.set(key, value);
        self
    }
}

impl Config for TableConfig {
    fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|v| v.as_str())
    }
}
