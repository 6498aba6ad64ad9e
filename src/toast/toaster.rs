// ABOUTME: Public lifecycle API over the toast store
// Stateless facade: every call delegates to the shared store and its timers

use crate::config::ToasterConfig;
use crate::models::{ToastId, ToastInput, ToastOptions, ToastRecord, ToastSnapshot, ToastUpdate, Variant};
use crate::toast::{ToastError, ToastStore};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

#[derive(Debug, Clone)]
pub struct Toaster {
    store: ToastStore,
}

impl Toaster {
    /// Build a manager on the current tokio runtime.
    pub fn new(config: ToasterConfig) -> Result<Self, ToastError> {
        Ok(Self::from_store(ToastStore::new(config)?))
    }

    pub fn from_store(store: ToastStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ToastStore {
        &self.store
    }

    pub fn config(&self) -> ToasterConfig {
        self.store.config()
    }

    pub fn add_toast(&self, input: impl Into<ToastInput>) -> ToastId {
        self.store.add(input.into())
    }

    pub fn update_toast(&self, id: &ToastId, update: ToastUpdate) {
        self.store.update(id, update);
    }

    pub fn remove_toast(&self, id: &ToastId) {
        self.store.remove(id);
    }

    pub fn remove_all_toasts(&self) {
        self.store.remove_all();
    }

    pub fn pause_toast(&self, id: &ToastId) {
        self.store.pause(id);
    }

    pub fn resume_toast(&self, id: &ToastId) {
        self.store.resume(id);
    }

    pub fn success(&self, message: impl Into<String>) -> ToastId {
        self.success_with(message, ToastOptions::default())
    }

    pub fn success_with(&self, message: impl Into<String>, options: ToastOptions) -> ToastId {
        self.add_toast(options.into_input(Variant::Success, message))
    }

    pub fn error(&self, message: impl Into<String>) -> ToastId {
        self.error_with(message, ToastOptions::default())
    }

    pub fn error_with(&self, message: impl Into<String>, options: ToastOptions) -> ToastId {
        self.add_toast(options.into_input(Variant::Error, message))
    }

    pub fn warning(&self, message: impl Into<String>) -> ToastId {
        self.warning_with(message, ToastOptions::default())
    }

    pub fn warning_with(&self, message: impl Into<String>, options: ToastOptions) -> ToastId {
        self.add_toast(options.into_input(Variant::Warning, message))
    }

    pub fn info(&self, message: impl Into<String>) -> ToastId {
        self.info_with(message, ToastOptions::default())
    }

    pub fn info_with(&self, message: impl Into<String>, options: ToastOptions) -> ToastId {
        self.add_toast(options.into_input(Variant::Info, message))
    }

    pub fn loading(&self, message: impl Into<String>) -> ToastId {
        self.loading_with(message, ToastOptions::default())
    }

    /// Loading toasts are always persistent; any duration in `options` is ignored.
    pub fn loading_with(&self, message: impl Into<String>, options: ToastOptions) -> ToastId {
        self.add_toast(options.duration(Duration::ZERO).into_input(Variant::Loading, message))
    }

    pub fn visible(&self) -> Vec<ToastRecord> {
        self.store.visible()
    }

    pub fn snapshots(&self) -> Vec<ToastSnapshot> {
        let now = Instant::now();
        self.store
            .visible()
            .iter()
            .map(|record| ToastSnapshot::capture(record, now))
            .collect()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.store.subscribe()
    }
}
