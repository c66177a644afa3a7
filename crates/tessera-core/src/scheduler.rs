//! Update Scheduler - debounced, single-slot render scheduling.
//!
//! Each instance owns one scheduler. Requesting an update cancels the pending
//! task (if any) and schedules a fresh one after the debounce window, so a burst
//! of requests collapses into a single render that observes the final state.
//!
//! ```text
//! set(count, 1) ──► schedule ──► task#1 (pending)
//! set(count, 2) ──► schedule ──► cancel task#1, task#2 (pending)
//!        ... debounce window elapses ...
//! task#2 fires ──► render job runs once with count = 2
//! ```
//!
//! The scheduler refers to its render job and is referred to by its tasks only
//! through weak references: once the owning instance is dropped, pending tasks
//! fire as no-ops.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::error::TesseraError;
use crate::timer::{TaskId, Timer};

/// Work executed when a scheduled update fires.
pub trait RenderJob {
	/// Runs one full render pass.
	fn run(&self) -> Result<(), TesseraError>;
}

/// Debounces update requests into single render passes.
pub struct UpdateScheduler {
	timer: Rc<dyn Timer>,
	delay: Duration,
	pending: Cell<Option<TaskId>>,
	job: RefCell<Option<Weak<dyn RenderJob>>>,
	renders: Cell<u64>,
}

impl UpdateScheduler {
	/// Creates a scheduler that waits `delay` after the last request.
	pub fn new(timer: Rc<dyn Timer>, delay: Duration) -> Rc<Self> {
		Rc::new(Self {
			timer,
			delay,
			pending: Cell::new(None),
			job: RefCell::new(None),
			renders: Cell::new(0),
		})
	}

	/// Sets the job run when an update fires.
	pub fn attach(&self, job: Weak<dyn RenderJob>) {
		*self.job.borrow_mut() = Some(job);
	}

	/// Requests an update, replacing any pending one.
	pub fn schedule(self: &Rc<Self>) {
		self.cancel();
		let scheduler = Rc::downgrade(self);
		let id = self.timer.schedule(
			self.delay,
			Box::new(move || match scheduler.upgrade() {
				Some(scheduler) => {
					scheduler.pending.set(None);
					scheduler.run_job()
				}
				None => Ok(()),
			}),
		);
		self.pending.set(Some(id));
	}

	/// Cancels the pending update, if any.
	pub fn cancel(&self) {
		if let Some(id) = self.pending.take() {
			self.timer.cancel(id);
		}
	}

	/// Cancels the pending update and runs the job immediately.
	pub fn flush(&self) -> Result<(), TesseraError> {
		self.cancel();
		self.run_job()
	}

	/// Returns `true` while an update is waiting to fire.
	pub fn has_pending(&self) -> bool {
		self.pending.get().is_some()
	}

	/// Returns the debounce window.
	pub fn delay(&self) -> Duration {
		self.delay
	}

	/// Returns the number of render passes that completed successfully.
	pub fn render_count(&self) -> u64 {
		self.renders.get()
	}

	fn run_job(&self) -> Result<(), TesseraError> {
		let job = self.job.borrow().as_ref().and_then(Weak::upgrade);
		let Some(job) = job else {
			return Ok(());
		};
		job.run()?;
		self.renders.set(self.renders.get() + 1);
		Ok(())
	}
}

impl fmt::Debug for UpdateScheduler {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("UpdateScheduler")
			.field("delay", &self.delay)
			.field("pending", &self.pending.get())
			.field("renders", &self.renders.get())
			.finish()
	}
}
