//! Ready queue: per-priority circular run lists under a hierarchical
//! occupancy bitmap.
//!
//! One ring of runnable threads per priority bucket. The queue records
//! which ring member is the current head of each bucket and the bitmap
//! tracks which buckets are non-empty, so selecting the next thread is two
//! word scans plus an array read, independent of how many threads are
//! runnable. Rotation of a bucket head for round-robin time-slicing is a
//! single slot update.
//!
//! Nothing here locks or suspends. The queue is owned by the scheduler
//! context and every operation runs under the kernel's own scheduling
//! mutual exclusion (interrupts masked, or the scheduler lock held).

use crate::bitmap::PrioBitmap;
use crate::fault::{self, contract, ContractViolation};
use crate::list::Links;

/// Stable index of a schedulable thread inside the kernel's thread table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThreadId(u16);

impl ThreadId {
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u16 {
        self.0
    }
}

/// Contract a thread table satisfies to feed the ready queue.
///
/// The table embeds one queue [`crate::list::Link`] per thread (the
/// [`Links`] impl) and exposes each thread's scheduling priority. While a
/// thread is linked into a [`ReadyQueue`] its priority must not change:
/// `remove` re-reads the priority to locate the bucket, and a stale value
/// corrupts bitmap and ring alike. Change priority on a detached thread
/// only, or remove, set, re-insert.
pub trait ThreadTable: Links<Id = ThreadId> {
    /// Scheduling priority of `id`; `0` is served first. Must stay below
    /// the bucket count of the queue the thread is inserted into.
    fn priority(&self, id: ThreadId) -> usize;
}

/// Ready queue over `P` priority buckets (bucket `0` is served first).
///
/// One instance per scheduler; initialized once at kernel bring-up and
/// never torn down. `const fn new` allows static placement.
pub struct ReadyQueue<const P: usize> {
    bitmap: PrioBitmap<P>,
    /// Current head of each bucket's ring; `None` iff the bucket is empty.
    head: [Option<ThreadId>; P],
    /// Runnable threads across all buckets.
    count: usize,
}

impl<const P: usize> ReadyQueue<P> {
    /// An empty queue: zeroed bitmap, every bucket ring empty.
    pub const fn new() -> Self {
        Self {
            bitmap: PrioBitmap::new(),
            head: [None; P],
            count: 0,
        }
    }

    /// Prepare a thread's queue node for a later insert.
    pub fn init_entry<T: ThreadTable>(table: &mut T, id: ThreadId) {
        table.init_node(id);
    }

    /// Make `id` runnable: append it to its priority bucket behind the
    /// threads already there and mark the bucket occupied.
    pub fn insert<T: ThreadTable>(&mut self, table: &mut T, id: ThreadId) {
        let prio = table.priority(id);
        contract!(
            prio < P,
            ContractViolation::PriorityOutOfRange { priority: prio, buckets: P }
        );
        // A sole bucket member is self-linked just like a detached node,
        // so the head slot has to be consulted as well.
        contract!(
            table.next(id) == id && self.head[prio] != Some(id),
            ContractViolation::NodeBusy { priority: prio }
        );

        match self.head[prio] {
            // Tail of the ring is just before the head.
            Some(head) => table.insert_before(head, id),
            None => self.head[prio] = Some(id),
        }
        self.bitmap.set(prio);
        self.count += 1;
        log::trace!("runq: insert thread {} at priority {}", id.raw(), prio);
    }

    /// Make `id` non-runnable: unlink it from its bucket and release the
    /// occupancy bit once the bucket drains.
    ///
    /// The node is left detached, ready for a later insert.
    pub fn remove<T: ThreadTable>(&mut self, table: &mut T, id: ThreadId) {
        let prio = table.priority(id);
        contract!(
            prio < P,
            ContractViolation::PriorityOutOfRange { priority: prio, buckets: P }
        );

        if table.next(id) == id {
            // Sole member: the bucket empties.
            contract!(self.head[prio] == Some(id), ContractViolation::ForeignNode);
            self.head[prio] = None;
            self.bitmap.clear(prio);
        } else {
            if self.head[prio] == Some(id) {
                self.head[prio] = Some(table.next(id));
            }
            table.unlink(id);
        }
        table.init_node(id);
        self.count -= 1;
        log::trace!("runq: remove thread {} from priority {}", id.raw(), prio);
    }

    /// Highest-priority runnable thread, without dequeuing it.
    ///
    /// Calling this on an empty queue is a caller error; schedulers track
    /// "any thread runnable" through [`ReadyQueue::is_empty`] first.
    pub fn peek(&self) -> ThreadId {
        contract!(self.count != 0, ContractViolation::EmptyQueue);
        let prio = self.bitmap.first_set();
        match self.head[prio] {
            Some(id) => id,
            // A set bit with no ring behind it means the occupancy
            // invariant is gone; fatal regardless of validation.
            None => fault::fail(ContractViolation::EmptyQueue),
        }
    }

    /// Round-robin requeue: move `id` to the tail of its bucket and
    /// return the bucket's new head.
    ///
    /// When `id` is the bucket head (the common case: the running thread
    /// exhausted its slice) this is a single head-slot advance; the ring
    /// order already makes `id` the new tail. Occupancy is unchanged, so
    /// the bitmap is untouched. The returned head equals `id` when it is
    /// alone in its bucket.
    pub fn rotate<T: ThreadTable>(&mut self, table: &mut T, id: ThreadId) -> ThreadId {
        let prio = table.priority(id);
        contract!(
            prio < P,
            ContractViolation::PriorityOutOfRange { priority: prio, buckets: P }
        );
        let head = match self.head[prio] {
            Some(head) => head,
            // Rotating in an empty bucket cannot be glossed over even
            // with validation off: there is no head to return.
            None => fault::fail(ContractViolation::ForeignNode),
        };

        let new_head = if head == id {
            let next = table.next(id);
            self.head[prio] = Some(next);
            next
        } else {
            contract!(table.next(id) != id, ContractViolation::ForeignNode);
            table.unlink(id);
            table.insert_before(head, id);
            head
        };
        log::trace!("runq: rotate priority {}, new head {}", prio, new_head.raw());
        new_head
    }

    /// True when no thread is runnable at any priority.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of runnable threads across all buckets.
    pub fn len(&self) -> usize {
        self.count
    }

    /// True when bucket `prio` holds at least one runnable thread.
    pub fn has_runnable_at(&self, prio: usize) -> bool {
        self.bitmap.is_set(prio)
    }
}

impl<const P: usize> Default for ReadyQueue<P> {
    fn default() -> Self {
        Self::new()
    }
}
