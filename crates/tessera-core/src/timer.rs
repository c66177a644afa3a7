//! Timer interface used by the update scheduler.
//!
//! A timer runs a task once after a delay and can cancel a task that has not
//! fired yet. Timers are single-threaded: tasks are `!Send` and run on the
//! thread that scheduled them.

use std::fmt;
use std::time::Duration;

use crate::error::TesseraError;

/// Handle of a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);

impl TaskId {
	/// Wraps a raw identifier.
	pub fn new(id: u64) -> Self {
		Self(id)
	}

	/// Returns the raw identifier.
	pub fn get(self) -> u64 {
		self.0
	}
}

impl fmt::Display for TaskId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "task-{}", self.0)
	}
}

/// Work handed to a [`Timer`].
///
/// An error returned by the task is handed back to whoever drives the timer.
pub type ScheduledTask = Box<dyn FnOnce() -> Result<(), TesseraError>>;

/// Schedules delayed tasks.
pub trait Timer {
	/// Runs `task` once after `delay`.
	fn schedule(&self, delay: Duration, task: ScheduledTask) -> TaskId;

	/// Cancels a task that has not fired yet. Unknown or fired ids are ignored.
	fn cancel(&self, id: TaskId);
}
