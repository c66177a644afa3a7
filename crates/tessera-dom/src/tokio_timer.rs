//! Real-time timer for single-threaded tokio hosts.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use tessera_core::{ScheduledTask, TaskId, Timer};
use tokio::task::JoinHandle;

/// A [`Timer`] that runs tasks on the current tokio `LocalSet`.
///
/// Tasks are not `Send`, so scheduling must happen inside
/// [`LocalSet::run_until`](tokio::task::LocalSet::run_until) or a task spawned
/// on a `LocalSet`. A task that fails is logged and dropped: nobody awaits it.
#[derive(Default)]
pub struct LocalTimer {
	next_id: Cell<u64>,
	handles: Rc<RefCell<HashMap<u64, JoinHandle<()>>>>,
}

impl LocalTimer {
	/// Creates a timer with no scheduled tasks.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the number of tasks waiting to fire.
	pub fn pending(&self) -> usize {
		self.handles.borrow().len()
	}
}

impl Timer for LocalTimer {
	fn schedule(&self, delay: Duration, task: ScheduledTask) -> TaskId {
		let id = self.next_id.get();
		self.next_id.set(id + 1);
		let task_id = TaskId::new(id);

		let handles = Rc::clone(&self.handles);
		let handle = tokio::task::spawn_local(async move {
			tokio::time::sleep(delay).await;
			handles.borrow_mut().remove(&id);
			if let Err(error) = task() {
				tracing::warn!(task = %task_id, %error, "scheduled render failed");
			}
		});
		self.handles.borrow_mut().insert(id, handle);
		task_id
	}

	fn cancel(&self, id: TaskId) {
		if let Some(handle) = self.handles.borrow_mut().remove(&id.get()) {
			handle.abort();
		}
	}
}

impl fmt::Debug for LocalTimer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LocalTimer")
			.field("pending", &self.pending())
			.finish()
	}
}
