// ABOUTME: Promise-linked toasts that follow an async operation from loading to success or error
// One toast id covers the whole operation; the operation's result passes through untouched

use crate::models::{ToastContent, ToastId, ToastInput, ToastUpdate, Variant};
use crate::toast::Toaster;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Content shown once the operation settles, fixed or derived from the outcome.
pub enum Feedback<T> {
    Static(ToastContent),
    Dynamic(Box<dyn FnOnce(&T) -> ToastContent + Send>),
}

impl<T> Feedback<T> {
    pub fn from_fn<F, C>(f: F) -> Self
    where
        F: FnOnce(&T) -> C + Send + 'static,
        C: Into<ToastContent>,
    {
        Self::Dynamic(Box::new(move |value| f(value).into()))
    }

    fn resolve(self, outcome: &T) -> ToastContent {
        match self {
            Feedback::Static(content) => content,
            Feedback::Dynamic(f) => f(outcome),
        }
    }
}

impl<T> fmt::Debug for Feedback<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feedback::Static(content) => f.debug_tuple("Static").field(content).finish(),
            Feedback::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

impl<T> From<&str> for Feedback<T> {
    fn from(message: &str) -> Self {
        Self::Static(ToastContent::new(message))
    }
}

impl<T> From<String> for Feedback<T> {
    fn from(message: String) -> Self {
        Self::Static(ToastContent::new(message))
    }
}

impl<T> From<ToastContent> for Feedback<T> {
    fn from(content: ToastContent) -> Self {
        Self::Static(content)
    }
}

#[derive(Debug)]
pub struct PromiseConfig<T, E> {
    pub id: Option<ToastId>,
    pub loading: ToastContent,
    pub success: Feedback<T>,
    pub error: Feedback<E>,
    pub success_duration: Option<Duration>,
    pub error_duration: Option<Duration>,
}

impl<T, E> PromiseConfig<T, E> {
    pub fn new(
        loading: impl Into<ToastContent>,
        success: impl Into<Feedback<T>>,
        error: impl Into<Feedback<E>>,
    ) -> Self {
        Self {
            id: None,
            loading: loading.into(),
            success: success.into(),
            error: error.into(),
            success_duration: None,
            error_duration: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<ToastId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_success_duration(mut self, duration: Duration) -> Self {
        self.success_duration = Some(duration);
        self
    }

    pub fn with_error_duration(mut self, duration: Duration) -> Self {
        self.error_duration = Some(duration);
        self
    }
}

impl Toaster {
    /// Show a loading toast while `operation` runs, then turn the same toast into a
    /// success or error toast. The operation's `Ok`/`Err` is returned as-is.
    pub async fn promise<T, E, F>(&self, operation: F, config: PromiseConfig<T, E>) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
    {
        let PromiseConfig {
            id,
            loading,
            success,
            error,
            success_duration,
            error_duration,
        } = config;

        let mut input = ToastInput::from(loading)
            .variant(Variant::Loading)
            .duration(Duration::ZERO);
        input.id = id;
        let id = self.add_toast(input);

        let outcome = operation.await;
        let default_duration = self.config().default_duration();
        match &outcome {
            Ok(value) => {
                debug!("Operation behind toast {} succeeded", id);
                let update = ToastUpdate::from(success.resolve(value))
                    .variant(Variant::Success)
                    .duration(success_duration.unwrap_or(default_duration));
                self.update_toast(&id, update);
            }
            Err(err) => {
                debug!("Operation behind toast {} failed", id);
                let update = ToastUpdate::from(error.resolve(err))
                    .variant(Variant::Error)
                    .duration(error_duration.unwrap_or(default_duration));
                self.update_toast(&id, update);
            }
        }
        outcome
    }
}
