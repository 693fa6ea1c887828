use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::model::ids::ProjectId;

/// A gallery project as published in `projects.json`.
///
/// The `html`/`css`/`js` fields are opaque snippets for the preview frame;
/// this layer never interprets them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub css: String,
    #[serde(default)]
    pub js: String,
}

/// Set of gallery projects a user has completed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletedProjects(BTreeSet<ProjectId>);

impl CompletedProjects {
    /// Returns `true` if the project id was newly added (idempotent).
    pub fn insert(&mut self, id: ProjectId) -> bool {
        self.0.insert(id)
    }

    #[must_use]
    pub fn contains(&self, id: ProjectId) -> bool {
        self.0.contains(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = ProjectId> + '_ {
        self.0.iter().copied()
    }
}
