//! Trace report generation
//!
//! Summarizes a recorded notification trace and renders it as plain text,
//! markdown or JSON.

use chrono::{DateTime, Utc};
use serde::Serialize;
use xml_tree::{ChangeKind, Phase};

use crate::trace::TraceEntry;

/// Counts over a recorded trace
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceSummary {
    /// Number of recorded entries, both phases
    pub total: usize,
    /// Number of completed changes (`Changed` entries)
    pub completed: usize,
    pub adds: usize,
    pub removes: usize,
    pub values: usize,
    pub names: usize,
}

impl TraceSummary {
    pub fn from_entries(entries: &[TraceEntry]) -> Self {
        let changed: Vec<_> = entries
            .iter()
            .filter(|e| e.phase == Phase::Changed)
            .collect();
        let count = |kind: ChangeKind| changed.iter().filter(|e| e.kind == kind).count();

        Self {
            total: entries.len(),
            completed: changed.len(),
            adds: count(ChangeKind::Add),
            removes: count(ChangeKind::Remove),
            values: count(ChangeKind::Value),
            names: count(ChangeKind::Name),
        }
    }
}

/// A trace for one scenario run
#[derive(Debug, Clone, Serialize)]
pub struct TraceReport {
    pub scenario: String,
    pub timestamp: DateTime<Utc>,
    pub summary: TraceSummary,
    /// Observations the scenario made outside the trace (identity checks, counts)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    pub entries: Vec<TraceEntry>,
}

impl TraceReport {
    /// Create a new trace report
    pub fn new(scenario: &str, entries: Vec<TraceEntry>, notes: Vec<String>) -> Self {
        Self {
            scenario: scenario.to_string(),
            timestamp: Utc::now(),
            summary: TraceSummary::from_entries(&entries),
            notes,
            entries,
        }
    }

    /// One line per entry, then the notes
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for entry in &self.entries {
            text.push_str(&entry.to_string());
            text.push('\n');
        }
        for note in &self.notes {
            text.push_str(note);
            text.push('\n');
        }
        text
    }

    /// Generate a markdown report
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!("# {} Trace\n\n", self.scenario));
        md.push_str(&format!("**Date:** {}\n\n", self.timestamp.format("%Y-%m-%d %H:%M:%S UTC")));

        md.push_str("## Summary\n\n");
        md.push_str("| Metric | Count |\n");
        md.push_str("|--------|-------|\n");
        md.push_str(&format!("| Notifications | {} |\n", self.summary.total));
        md.push_str(&format!("| Completed changes | {} |\n", self.summary.completed));
        md.push_str(&format!("| Add | {} |\n", self.summary.adds));
        md.push_str(&format!("| Remove | {} |\n", self.summary.removes));
        md.push_str(&format!("| Value | {} |\n", self.summary.values));
        md.push_str(&format!("| Name | {} |\n\n", self.summary.names));

        if !self.entries.is_empty() {
            md.push_str("## Notifications\n\n");
            md.push_str("| Phase | Kind | Sender | Observer | Snapshot |\n");
            md.push_str("|-------|------|--------|----------|----------|\n");
            for e in &self.entries {
                md.push_str(&format!(
                    "| {} | {} | `{}` | {} | `{}` |\n",
                    e.phase, e.kind, e.sender, e.observer, e.snapshot
                ));
            }
            md.push('\n');
        }

        if !self.notes.is_empty() {
            md.push_str("## Notes\n\n");
            for note in &self.notes {
                md.push_str(&format!("- {}\n", note));
            }
        }

        md
    }

    /// Generate a JSON report
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
