// ABOUTME: Countdown timers for toasts, one pending tokio task per toast id
// Also runs the untracked one-shot tasks used for animation settle and deletion

use crate::models::ToastId;
use std::collections::HashMap;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

/// Identifies one scheduled countdown. A stale ticket never matches a newer countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerTicket(u64);

#[derive(Debug)]
struct PendingTimer {
    ticket: TimerTicket,
    handle: JoinHandle<()>,
}

#[derive(Debug)]
pub struct TimerController {
    runtime: Handle,
    pending: HashMap<ToastId, PendingTimer>,
    next_ticket: u64,
}

impl TimerController {
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            pending: HashMap::new(),
            next_ticket: 0,
        }
    }

    /// Schedule `on_expire` after `duration`, replacing any countdown already pending for `id`.
    /// A zero duration schedules nothing and returns `None`.
    pub fn start<F>(&mut self, id: &ToastId, duration: Duration, on_expire: F) -> Option<TimerTicket>
    where
        F: FnOnce(TimerTicket) + Send + 'static,
    {
        if duration.is_zero() {
            return None;
        }
        self.cancel(id);

        self.next_ticket += 1;
        let ticket = TimerTicket(self.next_ticket);
        let deadline = Instant::now() + duration;
        let handle = self.runtime.spawn(async move {
            sleep_until(deadline).await;
            on_expire(ticket);
        });

        debug!("Countdown for toast {} scheduled in {:?}", id, duration);
        self.pending.insert(id.clone(), PendingTimer { ticket, handle });
        Some(ticket)
    }

    /// Abort the pending countdown for `id`. Returns whether one was pending.
    pub fn cancel(&mut self, id: &ToastId) -> bool {
        match self.pending.remove(id) {
            Some(timer) => {
                timer.handle.abort();
                debug!("Countdown for toast {} cancelled", id);
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&mut self) -> usize {
        let count = self.pending.len();
        for (_, timer) in self.pending.drain() {
            timer.handle.abort();
        }
        count
    }

    /// Called from a fired countdown. Clears the entry and returns true only when `ticket`
    /// is still the live countdown for `id`.
    pub fn complete(&mut self, id: &ToastId, ticket: TimerTicket) -> bool {
        match self.pending.get(id) {
            Some(timer) if timer.ticket == ticket => {
                self.pending.remove(id);
                true
            }
            _ => false,
        }
    }

    pub fn is_scheduled(&self, id: &ToastId) -> bool {
        self.pending.contains_key(id)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Fire-and-forget task after `delay`; used for animation transitions.
    pub fn defer<F>(&self, delay: Duration, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let deadline = Instant::now() + delay;
        self.runtime.spawn(async move {
            sleep_until(deadline).await;
            task();
        });
    }
}

impl Drop for TimerController {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    async fn advance(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    fn counter() -> (Arc<AtomicUsize>, impl FnOnce(TimerTicket) + Send + 'static) {
        let fired = Arc::new(AtomicUsize::new(0));
        let hook = Arc::clone(&fired);
        (fired, move |_| {
            hook.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[tokio::test(start_paused = true)]
    async fn fires_once_after_duration() {
        let mut timers = TimerController::new(Handle::current());
        let id = ToastId::from("a");
        let (fired, hook) = counter();

        assert!(timers.start(&id, Duration::from_millis(1000), hook).is_some());
        advance(900).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        advance(200).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_duration_schedules_nothing() {
        let mut timers = TimerController::new(Handle::current());
        let (fired, hook) = counter();

        assert!(timers.start(&ToastId::from("a"), Duration::ZERO, hook).is_none());
        assert!(timers.is_empty());
        advance(10_000).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_firing() {
        let mut timers = TimerController::new(Handle::current());
        let id = ToastId::from("a");
        let (fired, hook) = counter();

        timers.start(&id, Duration::from_millis(500), hook);
        assert!(timers.cancel(&id));
        assert!(!timers.cancel(&id));
        advance(1000).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_replaces_previous_countdown() {
        let mut timers = TimerController::new(Handle::current());
        let id = ToastId::from("a");
        let (first, first_hook) = counter();
        let (second, second_hook) = counter();

        timers.start(&id, Duration::from_millis(500), first_hook);
        timers.start(&id, Duration::from_millis(2000), second_hook);
        assert_eq!(timers.len(), 1);

        advance(1000).await;
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 0);
        advance(1100).await;
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_ticket_does_not_complete_newer_countdown() {
        let mut timers = TimerController::new(Handle::current());
        let id = ToastId::from("a");

        let old = timers.start(&id, Duration::from_millis(500), |_| {}).unwrap();
        let new = timers.start(&id, Duration::from_millis(500), |_| {}).unwrap();

        assert!(!timers.complete(&id, old));
        assert!(timers.is_scheduled(&id));
        assert!(timers.complete(&id, new));
        assert!(!timers.is_scheduled(&id));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_all_clears_everything() {
        let mut timers = TimerController::new(Handle::current());
        let fired = Arc::new(Mutex::new(Vec::new()));
        for name in ["a", "b", "c"] {
            let log = Arc::clone(&fired);
            timers.start(&ToastId::from(name), Duration::from_millis(100), move |_| {
                log.lock().unwrap().push(name);
            });
        }

        assert_eq!(timers.cancel_all(), 3);
        advance(500).await;
        assert!(fired.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn deferred_task_runs_after_delay() {
        let timers = TimerController::new(Handle::current());
        let (fired, hook) = counter();

        timers.defer(Duration::from_millis(300), move || hook(TimerTicket(0)));
        advance(250).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        advance(100).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
