use std::cell::RefCell;
use std::rc::Rc;

use super::state::ForceGraphState;

/// Shared handle to the render surface.
///
/// The canvas component draws from it and feeds it pointer input; the page
/// issues commands through it (load, filter, annotate, snapshot, export).
#[derive(Clone)]
pub struct SurfaceHandle(Rc<RefCell<ForceGraphState>>);

impl SurfaceHandle {
	pub fn new() -> Self {
		Self(Rc::new(RefCell::new(ForceGraphState::new(0.0, 0.0))))
	}

	pub fn with<R>(&self, f: impl FnOnce(&ForceGraphState) -> R) -> R {
		f(&self.0.borrow())
	}

	pub fn with_mut<R>(&self, f: impl FnOnce(&mut ForceGraphState) -> R) -> R {
		f(&mut self.0.borrow_mut())
	}
}

impl Default for SurfaceHandle {
	fn default() -> Self {
		Self::new()
	}
}
