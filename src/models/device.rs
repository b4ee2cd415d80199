//! Attached device models

use std::collections::BTreeSet;
use std::fmt;

/// Serial identifier of one attached board, valid for a single run
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceHandle {
    pub serial: String,
}

impl DeviceHandle {
    pub fn new(serial: impl Into<String>) -> Self {
        Self {
            serial: serial.into(),
        }
    }
}

impl fmt::Display for DeviceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serial)
    }
}

/// Serial identifiers the caller never wants flashed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExcludeSet {
    serials: BTreeSet<String>,
}

impl ExcludeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma-separated list, ignoring blank entries
    pub fn parse(list: &str) -> Self {
        list.split(',').collect()
    }

    pub fn contains(&self, serial: &str) -> bool {
        self.serials.contains(serial)
    }

    pub fn is_empty(&self) -> bool {
        self.serials.is_empty()
    }

    pub fn len(&self) -> usize {
        self.serials.len()
    }
}

impl<S: AsRef<str>> FromIterator<S> for ExcludeSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let serials = iter
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        Self { serials }
    }
}
