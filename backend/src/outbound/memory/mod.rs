//! In-memory repository adapters.
//!
//! Compiled for unit tests and behind the `test-support` feature so the
//! integration suite can drive the full HTTP stack without PostgreSQL. Each
//! adapter mirrors the ordering and conditional-update rules of its Diesel
//! counterpart.

mod parcels;
mod payments;
mod riders;
mod users;

pub use parcels::MemoryParcelRepository;
pub use payments::MemoryPaymentRepository;
pub use riders::MemoryRiderRepository;
pub use users::MemoryUserRepository;

use std::sync::{Mutex, MutexGuard};

/// Lock `mutex`, reporting poisoning through `on_poison`.
fn lock<'a, T, E>(
    mutex: &'a Mutex<T>,
    on_poison: impl FnOnce(String) -> E,
) -> Result<MutexGuard<'a, T>, E> {
    mutex
        .lock()
        .map_err(|err| on_poison(format!("in-memory store poisoned: {err}")))
}
