// ABOUTME: Toast data model covering variants, animation phases, stored records and caller inputs
// Records are owned by the store; callers only ever see clones or serializable snapshots

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Opaque identifier of a toast. Either allocated by the store or supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToastId(String);

impl ToastId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ToastId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ToastId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[default]
    Info,
    Success,
    Warning,
    Error,
    Loading,
}

impl Variant {
    pub fn is_loading(&self) -> bool {
        matches!(self, Variant::Loading)
    }
}

/// Visual lifecycle phase. Only `Exiting` gates physical removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationState {
    Entering,
    Entered,
    Exiting,
}

impl AnimationState {
    pub fn is_exiting(&self) -> bool {
        matches!(self, AnimationState::Exiting)
    }
}

/// Button shown on a toast. The manager never calls it; renderers do.
#[derive(Clone)]
pub struct ToastAction {
    pub label: String,
    callback: Arc<dyn Fn() + Send + Sync>,
}

impl ToastAction {
    pub fn new(label: impl Into<String>, callback: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            label: label.into(),
            callback: Arc::new(callback),
        }
    }

    pub fn invoke(&self) {
        (self.callback)();
    }
}

impl fmt::Debug for ToastAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToastAction")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Display payload of a toast.
#[derive(Debug, Clone, Default)]
pub struct ToastContent {
    pub message: String,
    pub title: Option<String>,
    pub action: Option<ToastAction>,
}

impl ToastContent {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_action(mut self, action: ToastAction) -> Self {
        self.action = Some(action);
        self
    }
}

impl From<&str> for ToastContent {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for ToastContent {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

/// Everything needed to create a toast.
#[derive(Debug, Clone, Default)]
pub struct ToastInput {
    pub id: Option<ToastId>,
    pub variant: Variant,
    pub content: ToastContent,
    /// `None` falls back to the configured default (or zero for `Loading`).
    pub duration: Option<Duration>,
}

impl ToastInput {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            content: ToastContent::new(message),
            ..Self::default()
        }
    }

    pub fn id(mut self, id: impl Into<ToastId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.content.title = Some(title.into());
        self
    }

    pub fn action(mut self, label: impl Into<String>, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.content.action = Some(ToastAction::new(label, callback));
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }
}

impl From<&str> for ToastInput {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for ToastInput {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<ToastContent> for ToastInput {
    fn from(content: ToastContent) -> Self {
        Self {
            content,
            ..Self::default()
        }
    }
}

/// Partial update merged into an existing record. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ToastUpdate {
    pub variant: Option<Variant>,
    pub message: Option<String>,
    pub title: Option<String>,
    pub action: Option<ToastAction>,
    pub duration: Option<Duration>,
}

impl ToastUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn variant(mut self, variant: Variant) -> Self {
        self.variant = Some(variant);
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn action(mut self, action: ToastAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }
}

impl From<ToastContent> for ToastUpdate {
    fn from(content: ToastContent) -> Self {
        Self {
            message: Some(content.message),
            title: content.title,
            action: content.action,
            ..Self::default()
        }
    }
}

/// Optional extras accepted by the variant shorthands (`success`, `error`, ...).
#[derive(Debug, Clone, Default)]
pub struct ToastOptions {
    pub id: Option<ToastId>,
    pub title: Option<String>,
    pub action: Option<ToastAction>,
    pub duration: Option<Duration>,
}

impl ToastOptions {
    pub fn id(mut self, id: impl Into<ToastId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn action(mut self, label: impl Into<String>, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.action = Some(ToastAction::new(label, callback));
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn into_input(self, variant: Variant, message: impl Into<String>) -> ToastInput {
        ToastInput {
            id: self.id,
            variant,
            content: ToastContent {
                message: message.into(),
                title: self.title,
                action: self.action,
            },
            duration: self.duration,
        }
    }
}

/// A toast as held by the store.
#[derive(Debug, Clone)]
pub struct ToastRecord {
    pub id: ToastId,
    pub variant: Variant,
    pub content: ToastContent,
    pub duration: Duration,
    pub created_at: Instant,
    pub created_wall: DateTime<Utc>,
    /// Baseline of the live countdown: creation, timer reset, or last resume.
    pub running_since: Instant,
    pub paused_at: Option<Instant>,
    pub remaining: Option<Duration>,
    pub animation_state: AnimationState,
    pub(crate) seq: u64,
    pub(crate) deletion_scheduled: bool,
}

impl ToastRecord {
    pub(crate) fn new(id: ToastId, seq: u64, variant: Variant, content: ToastContent, duration: Duration) -> Self {
        let now = Instant::now();
        Self {
            id,
            variant,
            content,
            duration,
            created_at: now,
            created_wall: Utc::now(),
            running_since: now,
            paused_at: None,
            remaining: None,
            animation_state: AnimationState::Entering,
            seq,
            deletion_scheduled: false,
        }
    }

    pub fn message(&self) -> &str {
        &self.content.message
    }

    pub fn is_persistent(&self) -> bool {
        self.duration.is_zero()
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    pub fn is_exiting(&self) -> bool {
        self.animation_state.is_exiting()
    }

    /// Time left before auto-dismiss as of `now`. `None` for persistent or exiting toasts.
    pub fn remaining_at(&self, now: Instant) -> Option<Duration> {
        if self.is_persistent() || self.is_exiting() {
            return None;
        }
        let budget = self.remaining.unwrap_or(self.duration);
        if self.is_paused() {
            return Some(budget);
        }
        Some(budget.saturating_sub(now.saturating_duration_since(self.running_since)))
    }
}

/// Serializable view of a record for renderers and logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToastSnapshot {
    pub id: ToastId,
    pub variant: Variant,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_label: Option<String>,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_ms: Option<u64>,
    pub paused: bool,
    pub animation_state: AnimationState,
    pub created_at: DateTime<Utc>,
}

impl ToastSnapshot {
    pub fn capture(record: &ToastRecord, now: Instant) -> Self {
        Self {
            id: record.id.clone(),
            variant: record.variant,
            message: record.content.message.clone(),
            title: record.content.title.clone(),
            action_label: record.content.action.as_ref().map(|a| a.label.clone()),
            duration_ms: duration_ms(record.duration),
            remaining_ms: record.remaining_at(now).map(duration_ms),
            paused: record.is_paused(),
            animation_state: record.animation_state,
            created_at: record.created_wall,
        }
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
