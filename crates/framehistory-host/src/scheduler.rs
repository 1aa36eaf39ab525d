//! Deferred execution on a later turn of the event loop.
//!
//! State delivery must never run inside the caller's own stack: a subscriber
//! that pushes state from its state-change handler would otherwise re-enter
//! the queue. Implementations only promise "not now"; no particular delay.

use std::cell::RefCell;
use std::collections::VecDeque;

use tracing::trace;

/// A deferred unit of work.
pub type Task = Box<dyn FnOnce()>;

/// Runs tasks on a later turn of the event loop.
pub trait Scheduler {
    /// Queues `task`. Must not run it before returning.
    fn defer(&self, task: Task);
}

/// Scheduler backed by tokio's current-thread task set.
///
/// Tasks are spawned with [`tokio::task::spawn_local`], so `defer` must be
/// called from within a [`tokio::task::LocalSet`].
#[cfg(feature = "tokio")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalScheduler;

#[cfg(feature = "tokio")]
impl Scheduler for LocalScheduler {
    fn defer(&self, task: Task) {
        tokio::task::spawn_local(async move { task() });
    }
}

/// Explicit FIFO of deferred tasks, drained by the owner.
///
/// Each [`TurnQueue::run_next`] call is one turn of the event loop. Tasks
/// deferred while a turn runs land behind the ones already queued.
#[derive(Default)]
pub struct TurnQueue {
    tasks: RefCell<VecDeque<Task>>,
}

impl TurnQueue {
    /// Number of tasks waiting for a turn.
    pub fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Runs the oldest task. Returns `false` if there was none.
    pub fn run_next(&self) -> bool {
        let task = self.tasks.borrow_mut().pop_front();
        match task {
            Some(task) => {
                task();
                true
            }
            None => false,
        }
    }

    /// Runs turns until the queue is empty, returning how many ran.
    pub fn run_until_idle(&self) -> usize {
        let mut turns = 0;
        while self.run_next() {
            turns += 1;
        }
        trace!(turns, "turn queue idle");
        turns
    }
}

impl Scheduler for TurnQueue {
    fn defer(&self, task: Task) {
        self.tasks.borrow_mut().push_back(task);
    }
}

impl std::fmt::Debug for TurnQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnQueue")
            .field("pending", &self.pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn turn_queue_defers_until_run() {
        let queue = TurnQueue::default();
        let ran = Rc::new(Cell::new(false));

        let flag = Rc::clone(&ran);
        queue.defer(Box::new(move || flag.set(true)));

        assert!(!ran.get());
        assert_eq!(queue.pending(), 1);
        assert!(queue.run_next());
        assert!(ran.get());
        assert!(!queue.run_next());
    }

    #[test]
    fn turn_queue_runs_in_fifo_order() {
        let queue = TurnQueue::default();
        let order = Rc::new(RefCell::new(Vec::new()));

        for i in 0..3 {
            let order = Rc::clone(&order);
            queue.defer(Box::new(move || order.borrow_mut().push(i)));
        }

        assert_eq!(queue.run_until_idle(), 3);
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn tasks_deferred_during_a_turn_run_later() {
        let queue = Rc::new(TurnQueue::default());
        let order = Rc::new(RefCell::new(Vec::new()));

        let inner_queue = Rc::clone(&queue);
        let inner_order = Rc::clone(&order);
        queue.defer(Box::new(move || {
            inner_order.borrow_mut().push("outer");
            let nested = Rc::clone(&inner_order);
            inner_queue.defer(Box::new(move || nested.borrow_mut().push("nested")));
        }));

        assert!(queue.run_next());
        assert_eq!(*order.borrow(), vec!["outer"]);
        assert_eq!(queue.pending(), 1);
        assert_eq!(queue.run_until_idle(), 1);
        assert_eq!(*order.borrow(), vec!["outer", "nested"]);
    }

    #[tokio::test]
    async fn local_scheduler_runs_on_a_later_turn() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let ran = Rc::new(Cell::new(false));
                let (tx, rx) = tokio::sync::oneshot::channel();
                let flag = Rc::clone(&ran);
                LocalScheduler.defer(Box::new(move || {
                    flag.set(true);
                    let _ = tx.send(());
                }));

                assert!(!ran.get());
                rx.await.unwrap();
                assert!(ran.get());
            })
            .await;
    }
}
