//! Core types for the Vibe Code app
//!
//! This module contains the background job types and the main AppState.

use crate::modals::{ConfirmDialog, SettingsDialog, TextPromptDialog};
use crate::widgets::DragDropHandler;
use agent_host::ChatSession;
use shared::agent_api::AiMode;
use shared::scaffold::ScaffoldFile;
use shared::settings::AppSettings;
use shared::{Entry, NewEntryKind, Workspace};
use std::collections::HashSet;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};
use viewers::html_viewer::HtmlViewer;
use viewers::image_viewer::ImageViewer;

/// Work handed to the background AI thread.
#[derive(Debug, Clone)]
pub enum AiJob {
    /// The session is a snapshot; the outcome carries it back with the turn recorded.
    Chat {
        session: ChatSession,
        message: String,
    },
    Action {
        mode: AiMode,
        source_id: Option<String>,
        code: String,
    },
    Scaffold {
        prompt: String,
    },
}

impl AiJob {
    /// Status line shown while the job runs.
    pub fn status(&self) -> &'static str {
        match self {
            AiJob::Chat { .. } => "Vibe Bot is thinking...",
            AiJob::Action {
                mode: AiMode::Analyze,
                ..
            } => "Analyzing...",
            AiJob::Action {
                mode: AiMode::Refactor,
                ..
            } => "Refactoring...",
            AiJob::Scaffold { .. } => "Scaffolding...",
        }
    }

    /// The outcome reported when the job could not run at all.
    pub fn fail(self, error: impl Into<String>) -> AiOutcome {
        let error = error.into();
        match self {
            AiJob::Chat { session, .. } => AiOutcome::Chat {
                session,
                result: Err(error),
            },
            AiJob::Action {
                mode, source_id, ..
            } => AiOutcome::Action {
                mode,
                source_id,
                result: Err(error),
            },
            AiJob::Scaffold { .. } => AiOutcome::Scaffold { result: Err(error) },
        }
    }
}

/// Result from a background AI job. Errors are carried as display strings.
#[derive(Debug, Clone)]
pub enum AiOutcome {
    Chat {
        session: ChatSession,
        result: Result<String, String>,
    },
    Action {
        mode: AiMode,
        source_id: Option<String>,
        result: Result<String, String>,
    },
    Scaffold {
        result: Result<Vec<ScaffoldFile>, String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

/// Transient message shown at the bottom of the window.
#[derive(Debug, Clone)]
pub struct Notice {
    pub text: String,
    pub kind: NoticeKind,
    pub shown_at: Instant,
}

impl Notice {
    pub fn new(kind: NoticeKind, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind,
            shown_at: Instant::now(),
        }
    }

    /// Errors stay up longer than confirmations.
    pub fn ttl(&self) -> Duration {
        match self.kind {
            NoticeKind::Error => Duration::from_secs(12),
            NoticeKind::Info | NoticeKind::Success => Duration::from_secs(4),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.shown_at.elapsed() >= self.ttl()
    }
}

/// Main application state
pub struct AppState {
    pub workspace: Workspace,
    /// Successful chat turns sent as context with the next message
    pub session: ChatSession,
    pub settings: AppSettings,

    // AI job tracking
    pub ai_result_rx: Option<Receiver<AiOutcome>>,
    pub ai_status: &'static str,

    // UI state
    pub chat_input: String,
    pub expanded_folders: HashSet<String>,
    pub preview_enabled: bool,
    pub notice: Option<Notice>,

    // Modals
    pub name_prompt: TextPromptDialog,
    pub pending_new_kind: NewEntryKind,
    pub scaffold_prompt: TextPromptDialog,
    pub overwrite_confirm: ConfirmDialog,
    /// Upload waiting for the overwrite confirmation
    pub pending_upload: Option<Entry>,
    pub settings_dialog: SettingsDialog,

    // Widgets and viewers
    pub drag_drop: DragDropHandler,
    pub image_viewer: ImageViewer,
    pub html_viewer: HtmlViewer,
}

impl AppState {
    pub fn new(settings: AppSettings) -> Self {
        Self {
            workspace: Workspace::with_welcome_files(),
            session: ChatSession::new(),
            settings,
            ai_result_rx: None,
            ai_status: "",
            chat_input: String::new(),
            expanded_folders: HashSet::from(["assets".to_string()]),
            preview_enabled: false,
            notice: None,
            name_prompt: TextPromptDialog::new("name_prompt"),
            pending_new_kind: NewEntryKind::File,
            scaffold_prompt: TextPromptDialog::new("scaffold_prompt").multiline(true),
            overwrite_confirm: ConfirmDialog::new("overwrite_confirm"),
            pending_upload: None,
            settings_dialog: SettingsDialog::new("settings_dialog"),
            drag_drop: DragDropHandler::new("drag_drop"),
            image_viewer: ImageViewer::new(),
            html_viewer: HtmlViewer::new(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppSettings::default())
    }
}
