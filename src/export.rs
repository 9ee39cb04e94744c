use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::timeline::TranscriptTimeline;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBlock {
    pub start_time: f64,
    pub end_time: f64,
    pub text: String,
}

/// The payload emitted on "Done". Lives only in the ephemeral store for the
/// duration of the session; nothing is ever written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionExport {
    /// ISO-8601 timestamp of the export.
    pub date: String,
    pub blocks: Vec<ExportBlock>,
    pub full_text: String,
}

impl SessionExport {
    /// Snapshot a timeline. A still-open block is closed at `now_time` for
    /// export purposes (the timeline itself is untouched).
    pub fn from_timeline(timeline: &TranscriptTimeline, now_time: f64, at: DateTime<Utc>) -> Self {
        let blocks: Vec<ExportBlock> = timeline
            .blocks()
            .iter()
            .map(|b| ExportBlock {
                start_time: b.start_time,
                end_time: b.end_time.unwrap_or(now_time),
                text: b.text.trim().to_string(),
            })
            .collect();

        let full_text = blocks
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string();

        Self {
            date: at.to_rfc3339(),
            blocks,
            full_text,
        }
    }
}

/// Session-lifetime storage for exports. Entries vanish with the process;
/// durable persistence is explicitly out of scope.
#[derive(Debug, Default)]
pub struct EphemeralStore {
    entries: HashMap<Uuid, SessionExport>,
    latest: Option<Uuid>,
}

impl EphemeralStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&mut self, export: SessionExport) -> Uuid {
        let id = Uuid::new_v4();
        self.entries.insert(id, export);
        self.latest = Some(id);
        id
    }

    pub fn get(&self, id: Uuid) -> Option<&SessionExport> {
        self.entries.get(&id)
    }

    pub fn latest(&self) -> Option<&SessionExport> {
        self.latest.and_then(|id| self.entries.get(&id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
