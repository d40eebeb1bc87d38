// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for ABook notebooks.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned identifier of a saved notebook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NotebookId(pub i64);

impl std::fmt::Display for NotebookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Shelf a notebook is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Folder {
    #[default]
    Notes,
    Books,
    Tests,
}

impl Folder {
    pub const ALL: [Folder; 3] = [Folder::Notes, Folder::Books, Folder::Tests];

    /// Name as stored in the `folder` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Folder::Notes => "notes",
            Folder::Books => "books",
            Folder::Tests => "tests",
        }
    }

    /// Parse a stored folder name. Unknown names are rejected.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "notes" => Some(Folder::Notes),
            "books" => Some(Folder::Books),
            "tests" => Some(Folder::Tests),
            _ => None,
        }
    }
}

impl std::fmt::Display for Folder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Drawing tool driving the stroke rasterizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Pen,
    Highlighter,
    Eraser,
}

impl Tool {
    pub fn label(self) -> &'static str {
        match self {
            Tool::Pen => "Pen",
            Tool::Highlighter => "Highlighter",
            Tool::Eraser => "Eraser",
        }
    }

    /// Case-insensitive label lookup.
    pub fn parse(name: &str) -> Option<Self> {
        [Tool::Pen, Tool::Highlighter, Tool::Eraser]
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(name.trim()))
    }
}

/// Static background pattern stamped onto a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TemplateKind {
    #[default]
    Blank,
    SingleLine,
    DoubleLine,
    Graph,
    Dotted,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 5] = [
        TemplateKind::Blank,
        TemplateKind::SingleLine,
        TemplateKind::DoubleLine,
        TemplateKind::Graph,
        TemplateKind::Dotted,
    ];

    /// Display name, also the value persisted in `template_name`.
    pub fn name(self) -> &'static str {
        match self {
            TemplateKind::Blank => "Blank",
            TemplateKind::SingleLine => "Single Line",
            TemplateKind::DoubleLine => "Double Line",
            TemplateKind::Graph => "Graph",
            TemplateKind::Dotted => "Dotted",
        }
    }

    /// Look up a template by display name. Unknown names fall back to `Blank`.
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(name.trim()))
            .unwrap_or(TemplateKind::Blank)
    }
}

impl std::fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One row of the notebook listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotebookSummary {
    pub id: NotebookId,
    pub name: String,
    pub folder: Folder,
    pub updated_at: DateTime<Utc>,
}

/// Aggregate counts over the notebook store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub total: usize,
    pub by_folder: BTreeMap<Folder, usize>,
}
