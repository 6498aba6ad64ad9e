// ABOUTME: Ordered toast collection and the single point of mutation
// Owns eviction, animation transitions, pause/resume bookkeeping and deferred deletion

use crate::config::ToasterConfig;
use crate::models::{AnimationState, ToastId, ToastInput, ToastRecord, ToastUpdate};
use crate::toast::{IdAllocator, TimerController, TimerTicket, ToastError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info};

/// Shared handle to the toast collection. Clones refer to the same store.
///
/// Every operation runs to completion under one lock and never blocks on I/O.
/// Deferred work (countdowns, settle, deletion) runs on the tokio runtime that
/// was current when the store was built and holds only a weak reference, so
/// dropping the last handle stops it.
#[derive(Debug, Clone)]
pub struct ToastStore {
    inner: Arc<Mutex<StoreState>>,
}

#[derive(Debug)]
struct StoreState {
    this: Weak<Mutex<StoreState>>,
    config: ToasterConfig,
    /// Newest first.
    toasts: Vec<ToastRecord>,
    ids: IdAllocator,
    timers: TimerController,
    next_seq: u64,
    revision: watch::Sender<u64>,
}

fn lock(inner: &Mutex<StoreState>) -> MutexGuard<'_, StoreState> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ToastStore {
    pub fn new(config: ToasterConfig) -> Result<Self, ToastError> {
        let runtime = Handle::try_current().map_err(|_| ToastError::NoRuntime)?;
        Self::with_runtime(config, runtime)
    }

    pub fn with_runtime(config: ToasterConfig, runtime: Handle) -> Result<Self, ToastError> {
        config.validate()?;
        let (revision, _) = watch::channel(0);
        let inner = Arc::new_cyclic(|this| {
            Mutex::new(StoreState {
                this: this.clone(),
                config,
                toasts: Vec::new(),
                ids: IdAllocator::new(),
                timers: TimerController::new(runtime),
                next_seq: 0,
                revision,
            })
        });
        Ok(Self { inner })
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        lock(&self.inner)
    }

    pub fn config(&self) -> ToasterConfig {
        self.state().config.clone()
    }

    pub fn add(&self, input: ToastInput) -> ToastId {
        self.state().add(input)
    }

    pub fn update(&self, id: &ToastId, update: ToastUpdate) {
        self.state().update(id, update);
    }

    pub fn remove(&self, id: &ToastId) {
        self.state().remove(id);
    }

    pub fn remove_all(&self) {
        self.state().remove_all();
    }

    pub fn pause(&self, id: &ToastId) {
        self.state().pause(id);
    }

    pub fn resume(&self, id: &ToastId) {
        self.state().resume(id);
    }

    /// Newest-first list of live toasts plus exiting ones still animating out.
    pub fn visible(&self) -> Vec<ToastRecord> {
        self.state().toasts.clone()
    }

    pub fn get(&self, id: &ToastId) -> Option<ToastRecord> {
        let state = self.state();
        state.position(id).map(|pos| state.toasts[pos].clone())
    }

    /// Number of toasts not yet exiting.
    pub fn live_count(&self) -> usize {
        self.state().live_count()
    }

    pub fn len(&self) -> usize {
        self.state().toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().toasts.is_empty()
    }

    pub fn has_countdown(&self, id: &ToastId) -> bool {
        self.state().timers.is_scheduled(id)
    }

    /// Revision counter bumped after every observable change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.state().revision.subscribe()
    }
}

impl StoreState {
    /// Index of the record for `id`, preferring a live one over copies still animating out.
    fn position(&self, id: &ToastId) -> Option<usize> {
        self.toasts
            .iter()
            .position(|t| &t.id == id && !t.is_exiting())
            .or_else(|| self.toasts.iter().position(|t| &t.id == id))
    }

    fn live_count(&self) -> usize {
        self.toasts.iter().filter(|t| !t.is_exiting()).count()
    }

    fn changed(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }

    fn add(&mut self, input: ToastInput) -> ToastId {
        let ToastInput {
            id,
            variant,
            content,
            duration,
        } = input;
        let id = id.unwrap_or_else(|| self.ids.next_id());
        let duration = duration.unwrap_or_else(|| self.config.default_duration());

        // An exiting copy with the same id finishes its animation alongside the new record.
        if self.position(&id).is_some_and(|pos| !self.toasts[pos].is_exiting()) {
            debug!("Toast {} already live, applying add as update", id);
            let mut update = ToastUpdate::from(content).variant(variant);
            update.duration = Some(duration);
            self.update(&id, update);
            return id;
        }

        self.next_seq += 1;
        let seq = self.next_seq;
        self.toasts
            .insert(0, ToastRecord::new(id.clone(), seq, variant, content, duration));
        self.start_countdown(&id, duration);
        info!("Toast {} added ({:?}, {:?})", id, variant, duration);

        self.evict_overflow();
        self.schedule_settle(&id, seq);
        self.changed();
        id
    }

    /// Push the oldest live toasts past `max_visible` into `Exiting`, oldest first.
    fn evict_overflow(&mut self) {
        let excess = self.live_count().saturating_sub(self.config.max_visible);
        if excess == 0 {
            return;
        }
        let victims: Vec<ToastId> = self
            .toasts
            .iter()
            .rev()
            .filter(|t| !t.is_exiting())
            .take(excess)
            .map(|t| t.id.clone())
            .collect();

        for id in victims {
            if self.begin_exit(&id) {
                info!("Toast {} evicted to respect max_visible={}", id, self.config.max_visible);
            }
        }
    }

    fn update(&mut self, id: &ToastId, update: ToastUpdate) {
        let Some(pos) = self.position(id) else {
            debug!("Ignoring update for unknown toast {}", id);
            return;
        };
        if self.toasts[pos].is_exiting() {
            debug!("Ignoring update for exiting toast {}", id);
            return;
        }

        let record = &mut self.toasts[pos];
        let previous = record.variant;
        if let Some(variant) = update.variant {
            record.variant = variant;
        }
        if let Some(message) = update.message {
            record.content.message = message;
        }
        if update.title.is_some() {
            record.content.title = update.title;
        }
        if update.action.is_some() {
            record.content.action = update.action;
        }

        let leaving_loading = previous.is_loading() && !record.variant.is_loading();
        let entering_loading = !previous.is_loading() && record.variant.is_loading();
        match update.duration {
            Some(duration) => record.duration = duration,
            None if entering_loading => record.duration = Duration::ZERO,
            None => {}
        }

        if leaving_loading || entering_loading || update.duration.is_some() {
            self.reset_countdown(pos);
        }
        debug!("Toast {} updated ({:?})", id, self.toasts[pos].variant);
        self.changed();
    }

    /// Restart the countdown from now with the record's current duration.
    /// A paused record stays paused holding the full new budget.
    fn reset_countdown(&mut self, pos: usize) {
        let now = Instant::now();
        let id = self.toasts[pos].id.clone();
        self.timers.cancel(&id);

        let record = &mut self.toasts[pos];
        record.created_at = now;
        record.created_wall = chrono::Utc::now();
        record.remaining = None;
        let duration = record.duration;

        if duration.is_zero() {
            record.paused_at = None;
            return;
        }
        if record.is_paused() {
            record.paused_at = Some(now);
            record.remaining = Some(duration);
            return;
        }
        record.running_since = now;
        self.start_countdown(&id, duration);
    }

    fn start_countdown(&mut self, id: &ToastId, duration: Duration) {
        let this = self.this.clone();
        let target = id.clone();
        self.timers.start(id, duration, move |ticket| {
            if let Some(inner) = this.upgrade() {
                lock(&inner).expire(&target, ticket);
            }
        });
    }

    fn expire(&mut self, id: &ToastId, ticket: TimerTicket) {
        if !self.timers.complete(id, ticket) {
            return;
        }
        info!("Toast {} timed out", id);
        self.remove(id);
    }

    fn remove(&mut self, id: &ToastId) {
        if self.begin_exit(id) {
            info!("Toast {} dismissed", id);
            self.changed();
        } else {
            debug!("Remove of toast {} ignored (absent or already exiting)", id);
        }
    }

    /// Cancel the countdown, flip to `Exiting` and schedule physical deletion.
    fn begin_exit(&mut self, id: &ToastId) -> bool {
        let Some(pos) = self.position(id) else {
            return false;
        };
        if self.toasts[pos].is_exiting() {
            return false;
        }
        self.timers.cancel(id);

        let record = &mut self.toasts[pos];
        record.animation_state = AnimationState::Exiting;
        record.paused_at = None;
        let seq = record.seq;
        self.schedule_deletion(vec![(id.clone(), seq)]);
        true
    }

    fn remove_all(&mut self) {
        let cancelled = self.timers.cancel_all();
        let mut batch = Vec::new();
        for record in self.toasts.iter_mut().filter(|t| !t.is_exiting()) {
            record.animation_state = AnimationState::Exiting;
            record.paused_at = None;
            batch.push((record.id.clone(), record.seq));
        }
        if batch.is_empty() {
            debug!("Remove-all ignored, nothing live");
            return;
        }
        info!("Dismissing all {} toasts ({} countdowns cancelled)", batch.len(), cancelled);
        self.schedule_deletion(batch);
        self.changed();
    }

    /// One deferred deletion for the whole batch. Records already scheduled are skipped.
    fn schedule_deletion(&mut self, entries: Vec<(ToastId, u64)>) {
        let mut batch = Vec::with_capacity(entries.len());
        for (id, seq) in entries {
            let Some(record) = self.toasts.iter_mut().find(|t| t.id == id && t.seq == seq) else {
                continue;
            };
            if record.deletion_scheduled {
                debug!("Deletion of toast {} already scheduled", id);
                continue;
            }
            record.deletion_scheduled = true;
            batch.push((id, seq));
        }
        if batch.is_empty() {
            return;
        }

        let this = self.this.clone();
        self.timers.defer(self.config.animation_duration(), move || {
            if let Some(inner) = this.upgrade() {
                lock(&inner).purge(&batch);
            }
        });
    }

    fn purge(&mut self, batch: &[(ToastId, u64)]) {
        let before = self.toasts.len();
        self.toasts.retain(|t| {
            !(t.is_exiting() && batch.iter().any(|(id, seq)| &t.id == id && t.seq == *seq))
        });
        let removed = before - self.toasts.len();
        if removed > 0 {
            debug!("Deleted {} exited toast(s)", removed);
            self.changed();
        }
    }

    fn schedule_settle(&self, id: &ToastId, seq: u64) {
        let this = self.this.clone();
        let id = id.clone();
        self.timers.defer(self.config.animation_duration(), move || {
            if let Some(inner) = this.upgrade() {
                lock(&inner).settle(&id, seq);
            }
        });
    }

    fn settle(&mut self, id: &ToastId, seq: u64) {
        let Some(record) = self.toasts.iter_mut().find(|t| &t.id == id && t.seq == seq) else {
            return;
        };
        if record.animation_state == AnimationState::Entering {
            record.animation_state = AnimationState::Entered;
            self.changed();
        }
    }

    fn pause(&mut self, id: &ToastId) {
        let Some(pos) = self.position(id) else {
            return;
        };
        let record = &self.toasts[pos];
        if record.is_exiting() || record.is_paused() {
            return;
        }
        if !self.timers.cancel(id) {
            debug!("Pause of toast {} ignored, no countdown running", id);
            return;
        }

        let now = Instant::now();
        let record = &mut self.toasts[pos];
        let budget = record.remaining.unwrap_or(record.duration);
        let elapsed = now.saturating_duration_since(record.running_since);
        record.remaining = Some(budget.saturating_sub(elapsed));
        record.paused_at = Some(now);
        debug!("Toast {} paused with {:?} left", id, record.remaining);
        self.changed();
    }

    fn resume(&mut self, id: &ToastId) {
        let Some(pos) = self.position(id) else {
            return;
        };
        let record = &mut self.toasts[pos];
        if record.is_exiting() || record.paused_at.take().is_none() {
            return;
        }

        let now = Instant::now();
        let left = record.remaining.unwrap_or(record.duration);
        record.remaining = Some(left);
        record.running_since = now;
        debug!("Toast {} resumed with {:?} left", id, left);

        if left.is_zero() {
            self.remove(id);
        } else {
            self.start_countdown(id, left);
            self.changed();
        }
    }
}
