//! Sorted intrusive list keyed by a per-node bias.
//!
//! Built on the ring primitive: each node carries an unsigned key (a wake
//! tick, a deadline) and sorted insertion keeps forward traversal from the
//! anchor in ascending key order. The kernel's delay and timeout queues
//! hang off this structure. Ordered insertion costs O(n) in list length,
//! which those queues keep short; the ready queue never pays it.

use crate::list::Links;

/// Ring arena whose nodes carry a sort key.
pub trait BiasLinks: Links {
    /// Current sort key of `id`. Lower keys sort earlier.
    fn bias(&self, id: Self::Id) -> u32;

    /// Overwrite the sort key of `id`.
    ///
    /// A linked node is not re-sorted; remove and re-insert it to restore
    /// the ordering invariant.
    fn set_bias(&mut self, id: Self::Id, bias: u32);

    /// Detach `id` and give it a fresh key.
    fn init_bias_node(&mut self, id: Self::Id, bias: u32) {
        self.init_node(id);
        self.set_bias(id, bias);
    }

    /// Ordered insertion.
    ///
    /// `node` lands after every node whose key is less than or equal to
    /// its own, so traversal from [`BiasLinks::head`] via `next` stays
    /// ascending and equal keys keep arrival order.
    fn sorted_insert(&mut self, anchor: Self::Id, node: Self::Id) {
        let key = self.bias(node);
        let mut at = self.next(anchor);
        while at != anchor && self.bias(at) <= key {
            at = self.next(at);
        }
        self.insert_before(at, node);
    }

    /// Unordered O(1) append at the tail of the ring.
    fn fifo_insert(&mut self, anchor: Self::Id, node: Self::Id) {
        self.insert_before(anchor, node);
    }

    /// Remove `node` from its ring. Its own links are left stale, as with
    /// [`Links::unlink`].
    fn remove(&mut self, node: Self::Id) {
        self.unlink(node);
    }

    /// Lowest-keyed node of the ring at `anchor`.
    ///
    /// On an empty ring this returns the anchor itself; check
    /// [`Links::is_empty`] first.
    fn head(&self, anchor: Self::Id) -> Self::Id {
        self.next(anchor)
    }

    /// Highest-keyed node of the ring at `anchor`.
    fn tail(&self, anchor: Self::Id) -> Self::Id {
        self.prev(anchor)
    }
}
