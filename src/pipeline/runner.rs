//! DocumentationPipeline: runs the documentation service over a whole project.
//!
//! Strictly sequential (one backend call at a time), in combined order: all
//! "main" files, then all "frontend" files. A failing file records its error
//! and the run moves on. Cancellation is checked only between files, so an
//! in-flight request always finishes first.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::context::build_project_context;
use super::documentation::DocumentationService;
use crate::models::{DocLanguage, FileOutcome, Grouping, Project, ProjectFile};

/// Cooperative cancellation flag shared between a run and its controller.
///
/// Tokens are never cleared; each run gets a fresh one.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Event emitted while a run progresses. Observational only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RunEvent {
    Started {
        total: u32,
    },
    Progress {
        index: u32,
        total: u32,
        file_name: String,
    },
    FileProcessed {
        grouping: Grouping,
        name: String,
        outcome: FileOutcome,
    },
    Completed {
        summary: RunSummary,
    },
}

/// Human-readable progress line, e.g. `Processing file 2 of 5: app.js`.
pub fn progress_message(index: u32, total: u32, file_name: &str) -> String {
    format!("Processing file {index} of {total}: {file_name}")
}

/// Counters for a finished (or cancelled) run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total: u32,
    pub processed: u32,
    pub documented: u32,
    pub passthrough: u32,
    pub failed: u32,
    pub skipped_by_cancel: u32,
    pub cancelled: bool,
    pub duration_ms: u64,
}

/// Fresh project snapshot with the run's results, plus its summary.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub project: Project,
    pub summary: RunSummary,
}

pub struct DocumentationPipeline {
    service: Arc<DocumentationService>,
}

impl DocumentationPipeline {
    pub fn new(service: Arc<DocumentationService>) -> Self {
        Self { service }
    }

    /// Document every file of `project`.
    ///
    /// The input is not modified; results are returned as a new snapshot and
    /// streamed through `progress_fn` as `FileProcessed` events. Files not
    /// reached because of cancellation keep neither content nor error.
    ///
    /// `cancel` belongs to the caller, who hands in a fresh token per run. It
    /// is only read here, so a cancel issued before the first file is honoured.
    pub fn run(
        &self,
        project: &Project,
        doc_language: DocLanguage,
        cancel: &CancelToken,
        progress_fn: Option<&dyn Fn(RunEvent)>,
    ) -> RunOutcome {
        let start = Instant::now();

        let mut result = project.clone();
        for grouping in Grouping::all() {
            result
                .files_mut(*grouping)
                .iter_mut()
                .for_each(ProjectFile::clear_outcome);
        }

        let combined: Vec<&ProjectFile> = project.combined().map(|(_, f)| f).collect();
        let project_context = build_project_context(&combined);

        let order: Vec<(Grouping, usize)> = Grouping::all()
            .iter()
            .flat_map(|g| (0..project.files(*g).len()).map(move |i| (*g, i)))
            .collect();
        let total = order.len() as u32;

        let emit = |event: RunEvent| {
            if let Some(progress) = progress_fn {
                progress(event);
            }
        };

        tracing::info!(total, language = doc_language.as_str(), "Documentation run started");
        emit(RunEvent::Started { total });

        let mut summary = RunSummary {
            total,
            ..RunSummary::default()
        };

        for (position, (grouping, idx)) in order.iter().enumerate() {
            if cancel.is_cancelled() {
                summary.cancelled = true;
                summary.skipped_by_cancel = total - position as u32;
                tracing::info!(
                    processed = summary.processed,
                    skipped = summary.skipped_by_cancel,
                    "Documentation run cancelled"
                );
                break;
            }

            let file = &project.files(*grouping)[*idx];
            emit(RunEvent::Progress {
                index: position as u32 + 1,
                total,
                file_name: file.name.clone(),
            });

            let outcome = match self.service.document(
                &file.content,
                &file.language,
                &project_context,
                doc_language,
            ) {
                Ok(text) => {
                    if DocumentationService::needs_backend(&file.content, &file.language) {
                        summary.documented += 1;
                    } else {
                        summary.passthrough += 1;
                    }
                    FileOutcome::Documented(text)
                }
                Err(e) => {
                    tracing::warn!(
                        file = %file.name,
                        grouping = grouping.as_str(),
                        error = %e,
                        "Documentation failed, continuing with next file"
                    );
                    summary.failed += 1;
                    FileOutcome::Failed(e.message)
                }
            };
            summary.processed += 1;

            result.files_mut(*grouping)[*idx].apply_outcome(&outcome);
            emit(RunEvent::FileProcessed {
                grouping: *grouping,
                name: file.name.clone(),
                outcome,
            });
        }

        summary.duration_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            processed = summary.processed,
            documented = summary.documented,
            passthrough = summary.passthrough,
            failed = summary.failed,
            duration_ms = summary.duration_ms,
            "Documentation run completed"
        );
        emit(RunEvent::Completed {
            summary: summary.clone(),
        });

        RunOutcome {
            project: result,
            summary,
        }
    }
}
