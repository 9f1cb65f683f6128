#![forbid(unsafe_code)]

//! Deferred work driven by host frame and timer callbacks.
//!
//! Folio never sleeps or spawns. Work that must wait (the initial drawer
//! open after layout settles, clearing lightbox media after the close
//! transition) is parked here and released when the host delivers
//! [`Event::Frame`](folio_core::Event::Frame) or
//! [`Event::Tick`](folio_core::Event::Tick).
//!
//! Tasks due at the same point run in the order they were queued.

use web_time::{Duration, Instant};

/// When a task becomes runnable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Due {
    /// On the next animation frame.
    NextFrame,
    /// On the first tick at or after this instant.
    At(Instant),
}

impl Due {
    /// `NextFrame` for a zero delay, otherwise `At(now + delay)`.
    #[must_use]
    pub fn after(delay: Duration, now: Instant) -> Self {
        if delay.is_zero() {
            Self::NextFrame
        } else {
            Self::At(now + delay)
        }
    }
}

/// FIFO of pending tasks.
#[derive(Debug, Clone)]
pub struct TaskQueue<T> {
    pending: Vec<(Due, T)>,
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
        }
    }
}

impl<T> TaskQueue<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, due: Due, task: T) {
        self.pending.push((due, task));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Earliest timer deadline, for hosts that arm a single timer.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending
            .iter()
            .filter_map(|(due, _)| match due {
                Due::At(at) => Some(*at),
                Due::NextFrame => None,
            })
            .min()
    }

    /// Whether anything waits for a frame.
    #[must_use]
    pub fn wants_frame(&self) -> bool {
        self.pending.iter().any(|(due, _)| *due == Due::NextFrame)
    }

    /// Remove and return every frame task.
    pub fn take_frame(&mut self) -> Vec<T> {
        self.take_where(|due| *due == Due::NextFrame)
    }

    /// Remove and return every timer task due at `now`.
    ///
    /// Frame tasks are left alone; a tick is not a frame.
    pub fn take_due(&mut self, now: Instant) -> Vec<T> {
        self.take_where(|due| matches!(due, Due::At(at) if *at <= now))
    }

    /// Drop all pending work.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    fn take_where(&mut self, mut ready: impl FnMut(&Due) -> bool) -> Vec<T> {
        let (run, keep): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.pending).into_iter().partition(|(due, _)| ready(due));
        self.pending = keep;
        run.into_iter().map(|(_, task)| task).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_and_timer_tasks_drain_separately() {
        let start = Instant::now();
        let mut queue = TaskQueue::new();
        queue.push(Due::NextFrame, "frame-1");
        queue.push(Due::At(start + Duration::from_millis(50)), "timer");
        queue.push(Due::NextFrame, "frame-2");

        assert!(queue.wants_frame());
        assert_eq!(queue.take_frame(), vec!["frame-1", "frame-2"]);
        assert!(!queue.wants_frame());
        assert_eq!(queue.len(), 1);

        assert!(queue.take_due(start).is_empty());
        assert_eq!(queue.take_due(start + Duration::from_millis(50)), vec!["timer"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn tick_does_not_run_frame_work() {
        let mut queue = TaskQueue::new();
        queue.push(Due::NextFrame, 1);
        assert!(queue.take_due(Instant::now() + Duration::from_secs(60)).is_empty());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn next_deadline_is_earliest_timer() {
        let start = Instant::now();
        let mut queue = TaskQueue::new();
        assert_eq!(queue.next_deadline(), None);
        queue.push(Due::At(start + Duration::from_millis(300)), 'a');
        queue.push(Due::NextFrame, 'b');
        queue.push(Due::At(start + Duration::from_millis(100)), 'c');
        assert_eq!(queue.next_deadline(), Some(start + Duration::from_millis(100)));
    }

    #[test]
    fn zero_delay_means_next_frame() {
        let now = Instant::now();
        assert_eq!(Due::after(Duration::ZERO, now), Due::NextFrame);
        assert_eq!(
            Due::after(Duration::from_millis(10), now),
            Due::At(now + Duration::from_millis(10))
        );
    }

    #[test]
    fn clear_drops_everything() {
        let mut queue = TaskQueue::new();
        queue.push(Due::NextFrame, ());
        queue.clear();
        assert!(queue.is_empty());
    }
}
