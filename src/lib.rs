// ABOUTME: Library crate for toast-queue exposing the notification manager for embedding and tests

pub mod config;
pub mod models;
pub mod toast;

pub use config::{Position, ToasterConfig};
pub use models::{
    AnimationState, ToastAction, ToastContent, ToastId, ToastInput, ToastOptions, ToastRecord,
    ToastSnapshot, ToastUpdate, Variant,
};
pub use toast::{Feedback, PromiseConfig, ToastError, ToastStore, Toaster};
