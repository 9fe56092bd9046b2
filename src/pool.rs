//! Bounded value pool: tracks how many heap-resident values are live at
//! once and refuses new allocations once the configured capacity is
//! saturated.
//!
//! Values themselves are owned through ordinary `Rc` (see [`crate::value`]);
//! this module only keeps the count honest. A [`Slot`] is acquired on
//! construction of any pooled payload and released when the last `Rc`
//! handle referencing it is dropped, so the accounting rides on Rust's own
//! drop glue instead of a hand-rolled ref/deref pair.

use std::cell::Cell;

use crate::error::EvalError;

thread_local! {
    static POOL: PoolState = PoolState::new(crate::config::DEFAULT_POOL_CAPACITY);
}

struct PoolState {
    capacity: Cell<usize>,
    in_use: Cell<usize>,
    high_water: Cell<usize>,
}

impl PoolState {
    fn new(capacity: usize) -> Self {
        PoolState {
            capacity: Cell::new(capacity),
            in_use: Cell::new(0),
            high_water: Cell::new(0),
        }
    }
}

/// Sets the pool's capacity for the current thread. Intended for tests and
/// for a driver that wants a non-default budget; does not affect slots
/// already allocated.
pub fn set_capacity(capacity: usize) {
    POOL.with(|p| p.capacity.set(capacity));
}

/// Number of heap-resident values currently live.
pub fn in_use() -> usize {
    POOL.with(|p| p.in_use.get())
}

/// Highest `in_use` value observed since the last reset, for pool-conservation tests.
pub fn high_water() -> usize {
    POOL.with(|p| p.high_water.get())
}

/// Resets the pool's counters. Used between independent test cases so one
/// test's allocations don't pollute another's high-water mark.
pub fn reset() {
    POOL.with(|p| {
        p.in_use.set(0);
        p.high_water.set(0);
    });
}

/// A handle representing one occupied pool slot. Dropping it releases the
/// slot. Cloning a `Slot` is intentionally not provided — sharing a payload
/// happens by cloning the `Rc` that wraps the slot alongside its payload,
/// which leaves the slot count untouched (structural sharing, per the
/// clone-on-Cons rule).
pub struct Slot {
    _private: (),
}

impl Slot {
    /// Acquires a new slot, failing if the pool is saturated.
    pub fn acquire() -> Result<Slot, EvalError> {
        POOL.with(|p| {
            let used = p.in_use.get();
            if used >= p.capacity.get() {
                return Err(EvalError::PoolExhausted);
            }
            p.in_use.set(used + 1);
            if used + 1 > p.high_water.get() {
                p.high_water.set(used + 1);
            }
            Ok(Slot { _private: () })
        })
    }
}

impl Drop for Slot {
    fn drop(&mut self) {
        POOL.with(|p| {
            let used = p.in_use.get();
            p.in_use.set(used.saturating_sub(1));
        });
    }
}
