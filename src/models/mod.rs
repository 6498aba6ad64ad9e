// ABOUTME: Core data models for toasts: identifiers, variants, animation phases and records

pub mod toast;

pub use toast::{
    AnimationState, ToastAction, ToastContent, ToastId, ToastInput, ToastOptions, ToastRecord,
    ToastSnapshot, ToastUpdate, Variant,
};
