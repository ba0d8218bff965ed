//! Intrusive circular doubly-linked ring over arena indices.
//!
//! The classic two-pointer embedded node, with stable arena indices in
//! place of raw pointers: a record that wants list membership embeds one
//! [`Link`] and its arena exposes the accessor pair of [`Links`]. The ring
//! is headless, any node can serve as the anchor for insertion and
//! emptiness tests, and a node whose links point back at itself is both
//! "empty ring" and "detached node".
//!
//! No operation allocates, blocks or fails.

/// Embeddable ring node: the `next`/`prev` relation over arena ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link<I> {
    next: I,
    prev: I,
}

impl<I: Copy> Link<I> {
    /// A detached node: both relations point back at the node itself.
    pub const fn new(id: I) -> Self {
        Self { next: id, prev: id }
    }
}

/// Storage seam for ring membership.
///
/// Implemented by any arena that embeds one [`Link`] per record; the two
/// accessors buy the whole operation set. Splice operations require the
/// inserted node to be detached. Linking a node that is already on a ring
/// corrupts both rings, a precondition the primitive does not check.
pub trait Links {
    /// Arena index type.
    type Id: Copy + PartialEq;

    fn link(&self, id: Self::Id) -> &Link<Self::Id>;

    fn link_mut(&mut self, id: Self::Id) -> &mut Link<Self::Id>;

    /// Reset `id` to the detached, self-linked state.
    fn init_node(&mut self, id: Self::Id) {
        *self.link_mut(id) = Link::new(id);
    }

    /// Splice `node` immediately before `at`.
    fn insert_before(&mut self, at: Self::Id, node: Self::Id) {
        let prev = self.link(at).prev;
        let n = self.link_mut(node);
        n.next = at;
        n.prev = prev;
        self.link_mut(prev).next = node;
        self.link_mut(at).prev = node;
    }

    /// Splice `node` immediately after `at`.
    fn insert_after(&mut self, at: Self::Id, node: Self::Id) {
        let next = self.link(at).next;
        let n = self.link_mut(node);
        n.prev = at;
        n.next = next;
        self.link_mut(next).prev = node;
        self.link_mut(at).next = node;
    }

    /// Unlink `node` from its ring by fixing up both neighbors.
    ///
    /// The node's own links are left stale; call [`Links::init_node`]
    /// before reusing it as an anchor or re-inserting it.
    fn unlink(&mut self, node: Self::Id) {
        let Link { next, prev } = *self.link(node);
        self.link_mut(next).prev = prev;
        self.link_mut(prev).next = next;
    }

    /// True when the ring at `anchor` holds no other node.
    fn is_empty(&self, anchor: Self::Id) -> bool {
        self.link(anchor).next == anchor
    }

    fn next(&self, id: Self::Id) -> Self::Id {
        self.link(id).next
    }

    fn prev(&self, id: Self::Id) -> Self::Id {
        self.link(id).prev
    }

    /// Forward walk over the ring, starting after `anchor` and stopping
    /// when the ring closes. The anchor itself is not yielded.
    fn ring_iter(&self, anchor: Self::Id) -> RingIter<'_, Self>
    where
        Self: Sized,
    {
        RingIter {
            arena: self,
            anchor,
            cursor: self.link(anchor).next,
        }
    }
}

/// Iterator returned by [`Links::ring_iter`].
pub struct RingIter<'a, A: Links> {
    arena: &'a A,
    anchor: A::Id,
    cursor: A::Id,
}

impl<'a, A: Links> Iterator for RingIter<'a, A> {
    type Item = A::Id;

    fn next(&mut self) -> Option<A::Id> {
        if self.cursor == self.anchor {
            return None;
        }
        let id = self.cursor;
        self.cursor = self.arena.link(id).next;
        Some(id)
    }
}
