// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subject patterns and subscriptions

use crate::event::Event;
use std::fmt;

/// Pattern for matching event subjects
///
/// Subjects are '/'-separated paths. A pattern matches by prefix, segment
/// by segment:
///   - Prefix: "/sports" matches "/sports" and "/sports/football"
///   - Single wildcard: "/sports/*/live" matches "/sports/tennis/live"
///   - Rest: "/sports/**" or "/" match everything below
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubjectPattern(String);

impl SubjectPattern {
    pub fn new(pattern: &str) -> Self {
        Self(pattern.trim().to_string())
    }

    /// Check if this pattern matches a subject
    pub fn matches(&self, subject: &str) -> bool {
        // Empty pattern matches nothing
        if self.0.is_empty() {
            return false;
        }

        let pattern_parts: Vec<&str> = segments(&self.0).collect();
        let subject_parts: Vec<&str> = segments(subject).collect();

        Self::match_segments(&pattern_parts, &subject_parts)
    }

    fn match_segments(pattern: &[&str], subject: &[&str]) -> bool {
        match (pattern.first(), subject.first()) {
            (None, _) => true,
            (Some(&"**"), _) => true,
            (Some(&"*"), Some(_)) => Self::match_segments(&pattern[1..], &subject[1..]),
            (Some(p), Some(s)) if p == s => Self::match_segments(&pattern[1..], &subject[1..]),
            _ => false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Subscription id, unique within its subscriber
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub String);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One registered interest of a subscriber
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub subjects: Vec<SubjectPattern>,
    pub label: Option<String>,
}

impl Subscription {
    /// `subjects` may list several comma-separated patterns.
    pub fn new(id: impl Into<String>, subjects: &str) -> Self {
        Self {
            id: SubscriptionId(id.into()),
            subjects: subjects
                .split(',')
                .map(SubjectPattern::new)
                .filter(|p| !p.as_str().is_empty())
                .collect(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Check if any subject pattern matches the subject
    pub fn matches_subject(&self, subject: &str) -> bool {
        self.subjects.iter().any(|p| p.matches(subject))
    }

    /// Events without a subject match no subscription.
    pub fn matches(&self, event: &Event) -> bool {
        event
            .subject()
            .is_some_and(|subject| self.matches_subject(subject))
    }
}

#[cfg(test)]
#[path = "subscription_tests.rs"]
mod tests;
