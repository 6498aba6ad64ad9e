// ABOUTME: Toast queue manager: id allocation, countdown timers, the store and its public API
// Callers go through `Toaster`; renderers read `visible()` and re-read on `subscribe()` changes

pub mod error;
pub mod id;
pub mod promise;
pub mod store;
pub mod timer;
pub mod toaster;

pub use error::ToastError;
pub use id::IdAllocator;
pub use promise::{Feedback, PromiseConfig};
pub use store::ToastStore;
pub use timer::{TimerController, TimerTicket};
pub use toaster::Toaster;
