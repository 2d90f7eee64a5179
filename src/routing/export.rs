//! Diagnostic route export.
//!
//! # Responsibilities
//! - Render the flat table as verb → ordered list of path patterns
//! - Collapse duplicates that differ only in parameter names
//! - Detect routes made unreachable by an earlier, broader route
//!
//! # Design Decisions
//! - Purely diagnostic: nothing here changes dispatch
//! - Deterministic output (ordered map, table order within a verb)
//! - NOT_FOUND fallbacks are scopes, not routes, and are left out

use std::collections::BTreeMap;

use serde::Serialize;

use crate::routing::matcher::PathPattern;
use crate::routing::route::Verb;
use crate::routing::router::FlatEntry;

/// Verb → absolute path patterns, in table order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RouteTable(BTreeMap<Verb, Vec<String>>);

impl RouteTable {
    pub fn from_entries(entries: &[FlatEntry]) -> Self {
        let mut table: BTreeMap<Verb, Vec<(String, String)>> = BTreeMap::new();
        for entry in entries.iter().filter(|e| e.method != Verb::NotFound) {
            let normalized = PathPattern::parse(&entry.path).normalized();
            let paths = table.entry(entry.method).or_default();
            if !paths.iter().any(|(seen, _)| *seen == normalized) {
                paths.push((normalized, entry.path.clone()));
            }
        }
        Self(
            table
                .into_iter()
                .map(|(verb, paths)| (verb, paths.into_iter().map(|(_, path)| path).collect()))
                .collect(),
        )
    }

    pub fn get(&self, verb: Verb) -> Option<&[String]> {
        self.0.get(&verb).map(Vec::as_slice)
    }

    pub fn verbs(&self) -> impl Iterator<Item = Verb> + '_ {
        self.0.keys().copied()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// A route that an earlier route always answers first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shadow {
    pub method: Verb,
    pub path: String,
    pub shadowed_by: String,
}

/// Every entry covered by an earlier entry of the same verb (or `ANY`).
pub fn shadowed_routes(entries: &[FlatEntry]) -> Vec<Shadow> {
    let patterns: Vec<PathPattern> = entries.iter().map(|e| PathPattern::parse(&e.path)).collect();
    let mut shadows = Vec::new();
    for (i, entry) in entries.iter().enumerate() {
        if entry.method == Verb::NotFound {
            continue;
        }
        let earlier = entries[..i].iter().zip(&patterns[..i]).find(|(prev, pattern)| {
            prev.method != Verb::NotFound
                && (prev.method == entry.method || prev.method == Verb::Any)
                && pattern.covers(&patterns[i])
        });
        if let Some((prev, _)) = earlier {
            shadows.push(Shadow {
                method: entry.method,
                path: entry.path.clone(),
                shadowed_by: format!("{} {}", prev.method, prev.path),
            });
        }
    }
    shadows
}
