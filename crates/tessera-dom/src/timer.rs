//! Deterministic virtual-time timer.
//!
//! [`VirtualTimer`] never sleeps: time only moves when the owner calls
//! [`VirtualTimer::advance`], which fires every task that became due in deadline
//! order. Tasks scheduled while advancing fire in the same call if their
//! deadline falls inside the advanced span.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use tessera_core::{ScheduledTask, TaskId, TesseraError, Timer};

/// A [`Timer`] driven by explicit calls to [`advance`](Self::advance).
#[derive(Default)]
pub struct VirtualTimer {
	now: Cell<Duration>,
	next_id: Cell<u64>,
	// Keyed by (deadline, id): equal deadlines fire in scheduling order.
	tasks: RefCell<BTreeMap<(Duration, u64), ScheduledTask>>,
}

impl VirtualTimer {
	/// Creates a timer at virtual time zero.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the current virtual time.
	pub fn now(&self) -> Duration {
		self.now.get()
	}

	/// Returns the number of tasks waiting to fire.
	pub fn pending(&self) -> usize {
		self.tasks.borrow().len()
	}

	/// Moves time forward by `delta`, firing every task that becomes due.
	///
	/// Returns the number of tasks fired.
	///
	/// # Errors
	///
	/// Stops at the first task that fails and returns its error. The clock is
	/// left at that task's deadline and later tasks stay pending.
	pub fn advance(&self, delta: Duration) -> Result<usize, TesseraError> {
		let target = self.now.get() + delta;
		let mut fired = 0;

		while let Some((deadline, task)) = self.pop_due(target) {
			self.now.set(deadline);
			fired += 1;
			task()?;
		}

		self.now.set(target);
		Ok(fired)
	}

	/// Advances until no task is pending.
	pub fn run_until_idle(&self) -> Result<usize, TesseraError> {
		let mut fired = 0;
		loop {
			let next = self.tasks.borrow().keys().next().map(|(deadline, _)| *deadline);
			let Some(deadline) = next else {
				return Ok(fired);
			};
			fired += self.advance(deadline.saturating_sub(self.now.get()))?;
		}
	}

	fn pop_due(&self, target: Duration) -> Option<(Duration, ScheduledTask)> {
		// The borrow ends before the task runs, so tasks may schedule more tasks.
		let mut tasks = self.tasks.borrow_mut();
		let key = *tasks.keys().next().filter(|(deadline, _)| *deadline <= target)?;
		tasks.remove(&key).map(|task| (key.0, task))
	}
}

impl Timer for VirtualTimer {
	fn schedule(&self, delay: Duration, task: ScheduledTask) -> TaskId {
		let id = self.next_id.get();
		self.next_id.set(id + 1);
		self.tasks
			.borrow_mut()
			.insert((self.now.get() + delay, id), task);
		TaskId::new(id)
	}

	fn cancel(&self, id: TaskId) {
		self.tasks
			.borrow_mut()
			.retain(|(_, task), _| *task != id.get());
	}
}

impl fmt::Debug for VirtualTimer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("VirtualTimer")
			.field("now", &self.now.get())
			.field("pending", &self.pending())
			.finish()
	}
}
