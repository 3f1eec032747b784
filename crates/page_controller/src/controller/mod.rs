//! Controller layer: one controller per page flow, plus the page-level
//! orchestrator that wires them to mount points.

pub mod auth_badge;
pub mod events;
pub mod gallery;
pub mod generation;
pub mod orchestration;
pub mod share;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Controller state is only touched between awaits, so a poisoned lock still
/// holds a consistent value.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
