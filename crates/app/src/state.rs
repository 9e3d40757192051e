//! State management for the Vibe Code app
//!
//! AppState methods for workspace edits, uploads and the single-flight
//! background AI job.

use crate::config;
use crate::types::*;
use crate::utils::{entry_bytes, format_error_message, read_upload, CHAT_FAILURE_MESSAGE};
use crate::widgets::{save_file_dialog, DroppedUpload};
use agent_host::VibeAgent;
use chrono::Utc;
use shared::agent_api::{AiMode, ChatMessage};
use shared::entry::parent_path;
use shared::tree::flatten;
use shared::settings::AppSettings;
use shared::{Entry, EntryType, NewEntryKind, UploadOutcome, WorkspaceError};
use std::path::Path;
use std::sync::mpsc::{channel, Sender, TryRecvError};
use viewers::image_viewer::ImageViewer;
use viewers::PreviewKind;

/// Run one AI job on a fresh runtime and report back (blocking; call from a worker thread).
pub fn run_ai_job(agent: VibeAgent, job: AiJob, tx: Sender<AiOutcome>) {
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            let _ = tx.send(job.fail(format!("Failed to start async runtime: {}", e)));
            return;
        }
    };

    let outcome = rt.block_on(execute(&agent, job));
    let _ = tx.send(outcome);
}

async fn execute(agent: &VibeAgent, job: AiJob) -> AiOutcome {
    match job {
        AiJob::Chat {
            mut session,
            message,
        } => {
            let result = session
                .send(agent, &message)
                .await
                .map_err(|e| e.to_string());
            AiOutcome::Chat { session, result }
        }
        AiJob::Action {
            mode,
            source_id,
            code,
        } => {
            let result = agent
                .run_action(mode, &code)
                .await
                .map_err(|e| e.to_string());
            AiOutcome::Action {
                mode,
                source_id,
                result,
            }
        }
        AiJob::Scaffold { prompt } => {
            let result = agent.scaffold(&prompt).await.map_err(|e| e.to_string());
            AiOutcome::Scaffold { result }
        }
    }
}

impl AppState {
    pub fn is_busy(&self) -> bool {
        self.ai_result_rx.is_some()
    }

    pub fn notify(&mut self, kind: NoticeKind, text: impl Into<String>) {
        self.notice = Some(Notice::new(kind, text));
    }

    /// Start `job` unless another one is outstanding.
    pub fn start_job(&mut self, job: AiJob) {
        if self.is_busy() {
            tracing::warn!("AI job ignored: another request is in flight");
            return;
        }

        let agent = match VibeAgent::from_settings(self.settings.model.clone()) {
            Ok(agent) => agent,
            Err(e) => {
                tracing::error!(error = %e, "Cannot create AI agent");
                self.apply_outcome(job.fail(e.to_string()));
                return;
            }
        };

        let (tx, rx) = channel();
        self.ai_status = job.status();
        self.ai_result_rx = Some(rx);
        std::thread::spawn(move || run_ai_job(agent, job, tx));
    }

    /// Non-blocking check for the outstanding job's result.
    pub fn poll_ai_response(&mut self) {
        let Some(rx) = &self.ai_result_rx else {
            return;
        };
        match rx.try_recv() {
            Ok(outcome) => {
                self.ai_result_rx = None;
                self.ai_status = "";
                self.apply_outcome(outcome);
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                tracing::error!("AI worker exited without a result");
                self.ai_result_rx = None;
                self.ai_status = "";
                self.notify(NoticeKind::Error, "The AI request stopped unexpectedly.");
            }
        }
    }

    pub fn apply_outcome(&mut self, outcome: AiOutcome) {
        match outcome {
            AiOutcome::Chat {
                session,
                result: Ok(reply),
            } => {
                self.workspace = self.workspace.push_message(ChatMessage::model(reply));
                self.session = session;
            }
            AiOutcome::Chat {
                result: Err(error), ..
            } => {
                tracing::error!(%error, "Chat error");
                self.workspace = self
                    .workspace
                    .push_message(ChatMessage::model(CHAT_FAILURE_MESSAGE));
            }
            AiOutcome::Action {
                mode,
                source_id,
                result: Ok(text),
            } => {
                self.workspace = self.workspace.insert_ai_result(
                    mode,
                    source_id.as_deref(),
                    &text,
                    Utc::now(),
                );
                tracing::info!(mode = mode.label(), "Stored AI result");
            }
            AiOutcome::Action {
                mode,
                result: Err(error),
                ..
            } => {
                tracing::error!(mode = mode.label(), %error, "AI action error");
                let action = format!("AI {}", mode.label());
                self.notify(NoticeKind::Error, format_error_message(&action, &error));
            }
            AiOutcome::Scaffold { result: Ok(files) } => self.apply_scaffold(&files),
            AiOutcome::Scaffold { result: Err(error) } => {
                tracing::error!(%error, "Scaffold error");
                self.notify(NoticeKind::Error, format_error_message("scaffolding", &error));
            }
        }
        self.sync_preview();
    }

    fn apply_scaffold(&mut self, files: &[shared::scaffold::ScaffoldFile]) {
        match self.workspace.apply_scaffold(files) {
            Ok((next, summary)) => {
                let new_folders: Vec<String> = next
                    .entries()
                    .iter()
                    .filter(|e| e.is_folder() && !self.workspace.contains(&e.id))
                    .map(|e| e.id.clone())
                    .collect();
                self.expanded_folders.extend(new_folders);
                self.workspace = next;
                if let Some(id) = self.workspace.active_id().map(str::to_string) {
                    self.reveal(&id);
                }

                let mut text = format!("Successfully created {} files!", summary.files_created);
                if !summary.skipped.is_empty() {
                    text.push_str(&format!(
                        " Skipped {} that already existed.",
                        summary.skipped.len()
                    ));
                }
                if !summary.rejected.is_empty() {
                    text.push_str(&format!(" Ignored {} invalid paths.", summary.rejected.len()));
                }
                self.notify(NoticeKind::Success, text);
            }
            Err(e) => {
                tracing::error!(error = %e, "Scaffold produced nothing");
                self.notify(
                    NoticeKind::Error,
                    format_error_message("scaffolding", &e.to_string()),
                );
            }
        }
    }

    // ---- AI entry points ----

    pub fn send_chat(&mut self) {
        let message = self.chat_input.trim().to_string();
        if message.is_empty() || self.is_busy() {
            return;
        }
        self.chat_input.clear();
        self.workspace = self.workspace.push_message(ChatMessage::user(message.clone()));
        let session = self.session.clone();
        self.start_job(AiJob::Chat { session, message });
    }

    /// Analyze or refactor the active file.
    pub fn run_action(&mut self, mode: AiMode) {
        if self.is_busy() {
            return;
        }
        let Some(entry) = self.workspace.active_entry() else {
            return;
        };
        let (EntryType::File, Some(code)) = (entry.entry_type(), entry.content()) else {
            self.notify(NoticeKind::Info, "AI actions work on text files only.");
            return;
        };
        if code.trim().is_empty() {
            self.notify(NoticeKind::Info, "This file is empty.");
            return;
        }
        let job = AiJob::Action {
            mode,
            source_id: Some(entry.id.clone()),
            code: code.to_string(),
        };
        self.start_job(job);
    }

    pub fn start_scaffold(&mut self, prompt: String) {
        if prompt.trim().is_empty() || self.is_busy() {
            return;
        }
        self.start_job(AiJob::Scaffold { prompt });
    }

    // ---- Workspace edits ----

    /// Select an entry; clicking a folder also toggles it.
    pub fn select_entry(&mut self, id: &str) {
        if self.workspace.get(id).is_some_and(Entry::is_folder)
            && !self.expanded_folders.remove(id)
        {
            self.expanded_folders.insert(id.to_string());
        }
        match self.workspace.select(id) {
            Ok(next) => self.workspace = next,
            Err(e) => tracing::warn!(error = %e, "Select failed"),
        }
        self.sync_preview();
    }

    /// Expand every ancestor folder of `id`.
    pub fn reveal(&mut self, id: &str) {
        let mut current = parent_path(id);
        while let Some(parent) = current {
            self.expanded_folders.insert(parent.to_string());
            current = parent_path(parent);
        }
    }

    /// Expand every folder, nested ones included.
    pub fn expand_all(&mut self) {
        let tree = self.workspace.tree();
        let folders = flatten(&tree)
            .into_iter()
            .filter(|e| e.is_folder())
            .map(|e| e.id.clone());
        self.expanded_folders.extend(folders);
    }

    pub fn collapse_all(&mut self) {
        self.expanded_folders.clear();
    }

    pub fn create_entry(&mut self, path: &str, kind: NewEntryKind) {
        match self.workspace.create_entry(path, kind) {
            Ok(next) => {
                self.workspace = next;
                self.reveal(path.trim());
                self.sync_preview();
            }
            Err(e) => self.notify(NoticeKind::Error, e.to_string()),
        }
    }

    /// Insert an uploaded entry, asking before replacing an existing one.
    pub fn upload(&mut self, entry: Entry) {
        match self.workspace.upload(entry.clone()) {
            Ok(UploadOutcome::Inserted(next)) => {
                self.workspace = next;
                self.reveal(&entry.id);
                self.sync_preview();
            }
            Ok(UploadOutcome::Conflict { name, .. }) => {
                self.overwrite_confirm.open_with(
                    "File exists",
                    format!("File \"{}\" already exists. Overwrite?", name),
                    "Overwrite",
                );
                self.pending_upload = Some(entry);
            }
            Err(e) => self.notify(NoticeKind::Error, e.to_string()),
        }
    }

    /// Finish a pending upload after the overwrite prompt.
    pub fn resolve_overwrite(&mut self, confirmed: bool) {
        let Some(entry) = self.pending_upload.take() else {
            return;
        };
        if !confirmed {
            tracing::debug!(id = %entry.id, "Overwrite declined");
            return;
        }
        match self.workspace.overwrite(entry) {
            Ok(next) => {
                self.workspace = next;
                // Drop a cached texture of the replaced image
                self.image_viewer = ImageViewer::new();
                self.sync_preview();
            }
            Err(e) => self.notify(NoticeKind::Error, e.to_string()),
        }
    }

    pub fn upload_path(&mut self, path: &Path) {
        match read_upload(path) {
            Ok(entry) => self.upload(entry),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Upload failed");
                self.notify(NoticeKind::Error, format!("{:#}", e));
            }
        }
    }

    pub fn upload_dropped(&mut self, dropped: DroppedUpload) {
        match dropped {
            DroppedUpload::Path(path) => self.upload_path(&path),
            DroppedUpload::Bytes { name, bytes } => {
                match shared::workspace::upload_entry(&name, &bytes) {
                    Ok(entry) => self.upload(entry),
                    Err(e) => self.notify(NoticeKind::Error, e.to_string()),
                }
            }
        }
    }

    pub fn update_active_content(&mut self, content: &str) {
        let Some(id) = self.workspace.active_id().map(str::to_string) else {
            return;
        };
        match self.workspace.update_content(&id, content) {
            Ok(next) => self.workspace = next,
            Err(WorkspaceError::NotEditable { .. }) => {}
            Err(e) => tracing::warn!(error = %e, "Edit failed"),
        }
    }

    /// Nothing is persisted; saving only confirms.
    pub fn save_active(&mut self) {
        if let Some(name) = self.workspace.active_entry().map(|e| e.name.clone()) {
            self.notify(NoticeKind::Success, format!("{} saved! (simulated)", name));
        }
    }

    pub fn download_active(&mut self) {
        let Some(entry) = self.workspace.active_entry().cloned() else {
            return;
        };
        let Some(path) = save_file_dialog(&entry.name) else {
            return;
        };
        match entry_bytes(&entry).and_then(|bytes| Ok(std::fs::write(&path, bytes)?)) {
            Ok(()) => {
                tracing::info!(id = %entry.id, path = %path.display(), "Downloaded entry");
                self.notify(NoticeKind::Success, format!("Saved to {}", path.display()));
            }
            Err(e) => {
                tracing::error!(id = %entry.id, error = %e, "Download failed");
                self.notify(NoticeKind::Error, format!("Download failed: {:#}", e));
            }
        }
    }

    // ---- Preview ----

    pub fn active_preview(&self) -> Option<PreviewKind> {
        self.workspace.active_entry().and_then(PreviewKind::for_entry)
    }

    /// Preview switches itself off when the active entry cannot be previewed.
    pub fn sync_preview(&mut self) {
        if self.preview_enabled && self.active_preview().is_none() {
            self.preview_enabled = false;
        }
    }

    // ---- Settings ----

    pub fn apply_settings(&mut self, settings: AppSettings) {
        if let Err(e) = config::save_settings(&settings) {
            tracing::error!(error = %e, "Failed to save settings");
            self.notify(NoticeKind::Error, format!("Could not save settings: {:#}", e));
        } else {
            self.notify(NoticeKind::Success, "Settings saved.");
        }
        self.settings = settings;
    }
}
