//! Ready-queue engine of the Kestrel RT kernel.
//!
//! The selection and ordering substrate a scheduler is built on top of:
//! per-priority circular run lists under a hierarchical occupancy bitmap
//! for bounded-time next-thread selection, round-robin rotation among
//! equal priorities, and a sorted intrusive list for the kernel's deadline
//! and timeout queues. Everything is index-based and allocation-free.
//!
//! The crate performs no locking of its own: operations take `&mut` and
//! are meant to run under the kernel's scheduling mutual exclusion
//! (interrupts masked, or the scheduler lock held). One [`ReadyQueue`]
//! per scheduler instance, created at kernel bring-up.

#![no_std]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod bias;
pub mod bitmap;
pub mod bitops;
pub mod fault;
pub mod list;
pub mod queue;

pub use bias::BiasLinks;
pub use bitmap::{PrioBitmap, MAX_PRIORITY_BUCKETS};
pub use bitops::WORD_BITS;
pub use fault::ContractViolation;
pub use list::{Link, Links, RingIter};
pub use queue::{ReadyQueue, ThreadId, ThreadTable};
