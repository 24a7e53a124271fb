use serde::{Deserialize, Serialize};

use super::enums::{FileStatus, Grouping};

/// One uploaded file and its documentation outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectFile {
    pub name: String,
    pub content: String,
    pub language: String,
    pub documented_content: Option<String>,
    pub error: Option<String>,
    pub is_included: bool,
}

/// Result of documenting a single file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum FileOutcome {
    Documented(String),
    Failed(String),
}

impl ProjectFile {
    pub fn new(
        name: impl Into<String>,
        content: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            language: language.into(),
            documented_content: None,
            error: None,
            is_included: true,
        }
    }

    pub fn status(&self) -> FileStatus {
        match (&self.documented_content, &self.error) {
            (Some(_), _) => FileStatus::Documented,
            (None, Some(_)) => FileStatus::Failed,
            (None, None) => FileStatus::Pending,
        }
    }

    /// Record a pipeline outcome. The other field is cleared so only one
    /// of `documented_content` / `error` is ever populated.
    pub fn apply_outcome(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Documented(text) => {
                self.documented_content = Some(text.clone());
                self.error = None;
            }
            FileOutcome::Failed(message) => {
                self.documented_content = None;
                self.error = Some(message.clone());
            }
        }
    }

    pub fn clear_outcome(&mut self) {
        self.documented_content = None;
        self.error = None;
    }

    /// Content used at export time.
    pub fn final_content(&self) -> &str {
        match (&self.documented_content, self.is_included) {
            (Some(documented), true) => documented,
            _ => &self.content,
        }
    }
}

/// The two independent, ordered file groupings of a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub main: Vec<ProjectFile>,
    pub frontend: Vec<ProjectFile>,
}

impl Project {
    pub fn files(&self, grouping: Grouping) -> &[ProjectFile] {
        match grouping {
            Grouping::Main => &self.main,
            Grouping::Frontend => &self.frontend,
        }
    }

    pub fn files_mut(&mut self, grouping: Grouping) -> &mut Vec<ProjectFile> {
        match grouping {
            Grouping::Main => &mut self.main,
            Grouping::Frontend => &mut self.frontend,
        }
    }

    /// All files in processing order: "main" then "frontend", each in insertion order.
    pub fn combined(&self) -> impl Iterator<Item = (Grouping, &ProjectFile)> {
        Grouping::all()
            .iter()
            .flat_map(move |g| self.files(*g).iter().map(move |f| (*g, f)))
    }

    pub fn find_mut(&mut self, grouping: Grouping, name: &str) -> Option<&mut ProjectFile> {
        self.files_mut(grouping).iter_mut().find(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.main.len() + self.frontend.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
