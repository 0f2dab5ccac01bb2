//! Buffered event queue shared between the orchestrators and whoever reports on them.
//!
//! Single-threaded: interior mutability via `RefCell`, cheap clones via `Rc`.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use agora_types::event::AgoraEvent;

#[derive(Clone, Default)]
pub struct EventBus {
    inner: Rc<RefCell<VecDeque<AgoraEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&self, event: AgoraEvent) {
        log::trace!("event: {:?}", event);
        self.inner.borrow_mut().push_back(event);
    }

    /// Take every pending event, oldest first.
    pub fn drain(&self) -> Vec<AgoraEvent> {
        self.inner.borrow_mut().drain(..).collect()
    }

    pub fn has_pending(&self) -> bool {
        !self.inner.borrow().is_empty()
    }

    pub fn pending(&self) -> usize {
        self.inner.borrow().len()
    }
}
