// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Events routed to subscribers
//!
//! An event is a flat bag of string fields. A handful of field names are
//! reserved: the producer sets the kind and subject, the dispatcher stamps
//! the subscription correlation fields on each recipient's copy.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Event kind
pub const FIELD_EVENT: &str = "p_event";
/// Subject the event is published on
pub const FIELD_SUBJECT: &str = "p_subject";
/// Address of the client that produced the event, if any
pub const FIELD_FROM: &str = "p_from";
/// Id of the subscription that matched, stamped by multicast
pub const FIELD_SUBSCRIPTION_ID: &str = "p_sid";
/// Label of the subscription that matched, stamped by multicast
pub const FIELD_SUBSCRIPTION_LABEL: &str = "p_label";

/// Ordinary application payload
pub const KIND_DATA: &str = "data";
/// Shutdown signal broadcast when the dispatcher stops
pub const KIND_ABORT: &str = "abort";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    fields: BTreeMap<String, String>,
}

impl Event {
    pub fn new(kind: impl Into<String>) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(FIELD_EVENT.to_string(), kind.into());
        Self { fields }
    }

    /// A data event on `subject`
    pub fn data(subject: impl Into<String>) -> Self {
        Self::new(KIND_DATA).with_field(FIELD_SUBJECT, subject)
    }

    pub fn abort() -> Self {
        Self::new(KIND_ABORT)
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_field(name, value);
        self
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn remove_field(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Empty when a deserialized event lacks the kind field.
    pub fn kind(&self) -> &str {
        self.field(FIELD_EVENT).unwrap_or_default()
    }

    pub fn subject(&self) -> Option<&str> {
        self.field(FIELD_SUBJECT)
    }

    pub fn is_abort(&self) -> bool {
        self.kind() == KIND_ABORT
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Event{{{}", self.kind())?;
        for (name, value) in self.fields() {
            if name != FIELD_EVENT {
                write!(f, " {}={}", name, value)?;
            }
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
