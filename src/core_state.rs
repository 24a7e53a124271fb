//! Transport-agnostic session state.
//!
//! `CoreState` owns the two file groupings and the run state, and exposes the
//! inbound operations (upload, analyze, cancel, toggle, reset). The HTTP layer
//! is a thin wrapper over it.
//!
//! Lock order is always run state → project, never the reverse.

use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread::JoinHandle;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::export::is_safe_entry_name;
use crate::models::{DocLanguage, FileOutcome, Grouping, Project, ProjectFile, RunPhase};
use crate::pipeline::classify::classify;
use crate::pipeline::documentation::DocumentationService;
use crate::pipeline::runner::{
    progress_message, CancelToken, DocumentationPipeline, RunEvent, RunSummary,
};

/// A file as supplied by the uploader, before classification.
#[derive(Debug, Clone)]
pub struct RawFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl RawFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Observable state of the current (or last) run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStatus {
    pub run_id: Option<Uuid>,
    pub phase: RunPhase,
    pub progress: Option<String>,
    pub doc_language: Option<DocLanguage>,
    pub started_at: Option<String>,
    pub finished_at: Option<String>,
    pub summary: Option<RunSummary>,
}

struct RunState {
    status: RunStatus,
    /// Run whose worker is still executing, even if reset has detached it.
    active: Option<Uuid>,
    cancel: CancelToken,
}

impl RunState {
    /// A run is executing and its results still belong to this session.
    fn is_attached(&self) -> bool {
        self.active.is_some() && self.active == self.status.run_id
    }
}

/// A background run: its id plus the worker's join handle.
pub struct RunHandle {
    pub run_id: Uuid,
    handle: JoinHandle<RunSummary>,
}

impl RunHandle {
    /// Block until the worker returns its summary.
    pub fn join(self) -> std::thread::Result<RunSummary> {
        self.handle.join()
    }
}

pub struct CoreState {
    project: RwLock<Project>,
    run: Mutex<RunState>,
    pipeline: DocumentationPipeline,
    model: String,
}

impl CoreState {
    pub fn new(service: Arc<DocumentationService>) -> Self {
        let model = service.model().to_string();
        Self {
            project: RwLock::new(Project::default()),
            run: Mutex::new(RunState {
                status: RunStatus::default(),
                active: None,
                cancel: CancelToken::new(),
            }),
            pipeline: DocumentationPipeline::new(service),
            model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    // ── Lock helpers ────────────────────────────────────────

    fn read_project(&self) -> Result<RwLockReadGuard<'_, Project>, CoreError> {
        self.project.read().map_err(|_| CoreError::LockPoisoned)
    }

    fn write_project(&self) -> Result<RwLockWriteGuard<'_, Project>, CoreError> {
        self.project.write().map_err(|_| CoreError::LockPoisoned)
    }

    fn lock_run(&self) -> Result<MutexGuard<'_, RunState>, CoreError> {
        self.run.lock().map_err(|_| CoreError::LockPoisoned)
    }

    // ── Read path ───────────────────────────────────────────

    /// Owned copy of both groupings.
    pub fn snapshot(&self) -> Result<Project, CoreError> {
        Ok(self.read_project()?.clone())
    }

    pub fn run_status(&self) -> Result<RunStatus, CoreError> {
        Ok(self.lock_run()?.status.clone())
    }

    // ── Inbound operations ──────────────────────────────────

    /// Replace a grouping with freshly uploaded files.
    ///
    /// Each file is classified immediately; content is decoded as UTF-8
    /// (invalid sequences replaced). Rejected while a run is active; a run
    /// detached by `reset` does not block uploads.
    pub fn upload_files(
        &self,
        grouping: Grouping,
        files: Vec<RawFile>,
    ) -> Result<Vec<ProjectFile>, CoreError> {
        let run = self.lock_run()?;
        if run.is_attached() {
            return Err(CoreError::AnalysisInProgress);
        }

        let mut records: Vec<ProjectFile> = Vec::with_capacity(files.len());
        for raw in files {
            let name = raw.name.trim().to_string();
            if name.is_empty() {
                return Err(CoreError::EmptyFileName);
            }
            if !is_safe_entry_name(&name) {
                return Err(CoreError::InvalidFileName(name));
            }
            if records.iter().any(|f| f.name == name) {
                return Err(CoreError::DuplicateFile(name));
            }
            let content = String::from_utf8_lossy(&raw.bytes).into_owned();
            let language = classify(&name);
            records.push(ProjectFile::new(name, content, language));
        }

        let mut project = self.write_project()?;
        *project.files_mut(grouping) = records.clone();
        drop(project);
        drop(run);

        tracing::info!(
            grouping = grouping.as_str(),
            count = records.len(),
            "Files uploaded"
        );
        Ok(records)
    }

    /// Flip `is_included` on one file and return the new value.
    pub fn toggle_inclusion(&self, grouping: Grouping, name: &str) -> Result<bool, CoreError> {
        let mut project = self.write_project()?;
        let file = project
            .find_mut(grouping, name)
            .ok_or_else(|| CoreError::FileNotFound {
                grouping,
                name: name.to_string(),
            })?;
        file.is_included = !file.is_included;
        Ok(file.is_included)
    }

    /// Request cancellation of the active run. Takes effect at the next file boundary.
    pub fn cancel_analysis(&self) -> Result<(), CoreError> {
        let run = self.lock_run()?;
        if run.is_attached() {
            run.cancel.cancel();
            tracing::info!("Documentation run cancellation requested");
        }
        Ok(())
    }

    /// Discard both groupings and return to `Idle`. An active run is
    /// cancelled and its remaining results are dropped.
    pub fn reset(&self) -> Result<(), CoreError> {
        let mut run = self.lock_run()?;
        run.cancel.cancel();
        run.status = RunStatus::default();

        let mut project = self.write_project()?;
        *project = Project::default();

        tracing::info!("Session reset");
        Ok(())
    }

    /// Start a run on a background thread.
    ///
    /// A detached run that is still finishing its last request blocks a new
    /// start, so backend calls never overlap.
    pub fn start_analysis(
        self: &Arc<Self>,
        doc_language: DocLanguage,
    ) -> Result<RunHandle, CoreError> {
        let (run_id, snapshot, cancel) = self.begin_run(doc_language)?;
        let core = Arc::clone(self);

        let handle = std::thread::Builder::new()
            .name("documentation-run".into())
            .spawn(move || core.execute_run(run_id, &snapshot, doc_language, &cancel))
            .map_err(|e| {
                self.abandon_run(run_id);
                CoreError::Spawn(e.to_string())
            })?;

        Ok(RunHandle { run_id, handle })
    }

    /// Run to completion on the calling thread.
    pub fn run_analysis(&self, doc_language: DocLanguage) -> Result<RunSummary, CoreError> {
        let (run_id, snapshot, cancel) = self.begin_run(doc_language)?;
        Ok(self.execute_run(run_id, &snapshot, doc_language, &cancel))
    }

    // ── Run lifecycle ───────────────────────────────────────

    fn begin_run(
        &self,
        doc_language: DocLanguage,
    ) -> Result<(Uuid, Project, CancelToken), CoreError> {
        let mut run = self.lock_run()?;
        if run.active.is_some() {
            return Err(CoreError::AnalysisInProgress);
        }

        let mut project = self.write_project()?;
        if project.is_empty() {
            return Err(CoreError::NoFiles);
        }
        for grouping in Grouping::all() {
            project
                .files_mut(*grouping)
                .iter_mut()
                .for_each(ProjectFile::clear_outcome);
        }
        let snapshot = project.clone();
        drop(project);

        // The fresh token is the only place a run's cancel flag starts cleared.
        let run_id = Uuid::new_v4();
        let cancel = CancelToken::new();
        run.active = Some(run_id);
        run.cancel = cancel.clone();
        run.status = RunStatus {
            run_id: Some(run_id),
            phase: RunPhase::Running,
            progress: None,
            doc_language: Some(doc_language),
            started_at: Some(chrono::Utc::now().to_rfc3339()),
            finished_at: None,
            summary: None,
        };

        Ok((run_id, snapshot, cancel))
    }

    fn execute_run(
        &self,
        run_id: Uuid,
        snapshot: &Project,
        doc_language: DocLanguage,
        cancel: &CancelToken,
    ) -> RunSummary {
        let progress_fn = |event: RunEvent| self.on_run_event(run_id, event);
        let outcome = self
            .pipeline
            .run(snapshot, doc_language, cancel, Some(&progress_fn));

        match self.lock_run() {
            Ok(mut run) => {
                if run.active == Some(run_id) {
                    run.active = None;
                }
                if run.status.run_id == Some(run_id) {
                    run.status.phase = RunPhase::Completed;
                    run.status.progress = None;
                    run.status.finished_at = Some(chrono::Utc::now().to_rfc3339());
                    run.status.summary = Some(outcome.summary.clone());
                }
            }
            Err(e) => tracing::error!(error = %e, "Cannot record run completion"),
        }

        outcome.summary
    }

    /// Publish pipeline events into shared state, unless the run was
    /// detached by a reset in the meantime.
    fn on_run_event(&self, run_id: Uuid, event: RunEvent) {
        let Ok(mut run) = self.lock_run() else {
            return;
        };
        if run.status.run_id != Some(run_id) {
            return;
        }

        match event {
            RunEvent::Progress {
                index,
                total,
                file_name,
            } => {
                run.status.progress = Some(progress_message(index, total, &file_name));
            }
            RunEvent::FileProcessed {
                grouping,
                name,
                outcome,
            } => {
                if let Err(e) = self.apply_outcome(grouping, &name, &outcome) {
                    tracing::error!(error = %e, file = %name, "Cannot record file outcome");
                }
            }
            RunEvent::Started { .. } | RunEvent::Completed { .. } => {}
        }
    }

    fn apply_outcome(
        &self,
        grouping: Grouping,
        name: &str,
        outcome: &FileOutcome,
    ) -> Result<(), CoreError> {
        let mut project = self.write_project()?;
        if let Some(file) = project.find_mut(grouping, name) {
            file.apply_outcome(outcome);
        }
        Ok(())
    }

    fn abandon_run(&self, run_id: Uuid) {
        if let Ok(mut run) = self.lock_run() {
            if run.active == Some(run_id) {
                run.active = None;
                run.status = RunStatus::default();
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("A documentation run is already in progress")]
    AnalysisInProgress,
    #[error("No files have been uploaded")]
    NoFiles,
    #[error("File not found in {grouping}: {name}")]
    FileNotFound { grouping: Grouping, name: String },
    #[error("Duplicate file name in upload: {0}")]
    DuplicateFile(String),
    #[error("Uploaded file has an empty name")]
    EmptyFileName,
    #[error("File name must be a relative path without '..': {0}")]
    InvalidFileName(String),
    #[error("Cannot start run worker: {0}")]
    Spawn(String),
    #[error("Internal lock error")]
    LockPoisoned,
}
