//! Hierarchical occupancy bitmap over priority buckets.
//!
//! One bit per bucket, bit `i` set iff bucket `i` of the companion ready
//! queue is non-empty. When the bucket count exceeds the native word a
//! second-level group word records which data words are non-zero, so the
//! lowest occupied bucket is found with two hardware scans no matter how
//! many buckets are configured.

use static_assertions::const_assert;

use crate::bitops::{find_first_set, WORD_BITS};
use crate::fault::{contract, ContractViolation};

/// Upper bound on the priority buckets an instantiation may configure.
pub const MAX_PRIORITY_BUCKETS: usize = 256;

const BITMAP_WORDS: usize = (MAX_PRIORITY_BUCKETS + WORD_BITS - 1) / WORD_BITS;

// The group word must be able to summarize every data word.
const_assert!(BITMAP_WORDS <= WORD_BITS);

/// Occupancy bitmap for `P` priority buckets.
///
/// Storage is sized for [`MAX_PRIORITY_BUCKETS`]; only the first `P` bits
/// are ever set. Maintained exclusively by the ready queue, which keeps
/// bit state and ring state consistent inside each mutating operation.
pub struct PrioBitmap<const P: usize> {
    /// Bit `w` set iff `words[w] != 0`. Unused when `P` fits one word.
    group: usize,
    words: [usize; BITMAP_WORDS],
}

impl<const P: usize> PrioBitmap<P> {
    const VALID: () = assert!(
        P >= 1 && P <= MAX_PRIORITY_BUCKETS,
        "priority bucket count out of range"
    );

    /// True when a second bitmap level is needed to cover `P` buckets.
    const HAS_GROUP: bool = P > WORD_BITS;

    /// All-empty bitmap, fit for static placement.
    pub const fn new() -> Self {
        let () = Self::VALID;
        Self {
            group: 0,
            words: [0; BITMAP_WORDS],
        }
    }

    /// Mark bucket `index` occupied. Idempotent.
    pub fn set(&mut self, index: usize) {
        debug_assert!(index < P);
        let (word, bit) = Self::split(index);
        self.words[word] |= bit;
        if Self::HAS_GROUP {
            self.group |= 1 << word;
        }
    }

    /// Mark bucket `index` empty.
    pub fn clear(&mut self, index: usize) {
        debug_assert!(index < P);
        let (word, bit) = Self::split(index);
        self.words[word] &= !bit;
        // The group bit may only drop once its whole word has drained.
        if Self::HAS_GROUP && self.words[word] == 0 {
            self.group &= !(1 << word);
        }
    }

    /// True when bucket `index` is occupied.
    pub fn is_set(&self, index: usize) -> bool {
        debug_assert!(index < P);
        let (word, bit) = Self::split(index);
        self.words[word] & bit != 0
    }

    /// Lowest-numbered occupied bucket.
    ///
    /// Scanning an all-empty bitmap is a caller error; with validation
    /// compiled in it fails fast through the contract boundary.
    pub fn first_set(&self) -> usize {
        if Self::HAS_GROUP {
            contract!(self.group != 0, ContractViolation::EmptyBitmap);
            let word = find_first_set(self.group);
            word * WORD_BITS + find_first_set(self.words[word])
        } else {
            contract!(self.words[0] != 0, ContractViolation::EmptyBitmap);
            find_first_set(self.words[0])
        }
    }

    /// True when no bucket is occupied.
    pub fn is_empty(&self) -> bool {
        if Self::HAS_GROUP {
            self.group == 0
        } else {
            self.words[0] == 0
        }
    }

    #[inline]
    fn split(index: usize) -> (usize, usize) {
        (index / WORD_BITS, 1 << (index % WORD_BITS))
    }
}

impl<const P: usize> Default for PrioBitmap<P> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty() {
        let bitmap: PrioBitmap<32> = PrioBitmap::new();
        assert!(bitmap.is_empty());
        for i in 0..32 {
            assert!(!bitmap.is_set(i));
        }
    }

    #[test]
    fn test_single_word_set_clear() {
        let mut bitmap: PrioBitmap<32> = PrioBitmap::new();
        bitmap.set(5);
        bitmap.set(12);
        assert!(bitmap.is_set(5));
        assert!(bitmap.is_set(12));
        assert_eq!(bitmap.first_set(), 5);

        bitmap.clear(5);
        assert!(!bitmap.is_set(5));
        assert_eq!(bitmap.first_set(), 12);

        bitmap.clear(12);
        assert!(bitmap.is_empty());
    }

    #[test]
    fn test_set_is_idempotent() {
        let mut bitmap: PrioBitmap<16> = PrioBitmap::new();
        bitmap.set(3);
        bitmap.set(3);
        assert_eq!(bitmap.first_set(), 3);
        bitmap.clear(3);
        assert!(bitmap.is_empty());
    }

    #[test]
    fn test_two_level_scan() {
        // 192 buckets needs three 64-bit words and the group level.
        let mut bitmap: PrioBitmap<192> = PrioBitmap::new();
        bitmap.set(130);
        assert_eq!(bitmap.first_set(), 130);

        bitmap.set(70);
        assert_eq!(bitmap.first_set(), 70);

        bitmap.set(1);
        assert_eq!(bitmap.first_set(), 1);

        bitmap.clear(1);
        assert_eq!(bitmap.first_set(), 70);
        bitmap.clear(70);
        assert_eq!(bitmap.first_set(), 130);
        bitmap.clear(130);
        assert!(bitmap.is_empty());
    }

    #[test]
    fn test_group_bit_survives_partial_drain() {
        let mut bitmap: PrioBitmap<192> = PrioBitmap::new();
        bitmap.set(64);
        bitmap.set(65);
        bitmap.clear(64);
        // Word 1 still has bit 65, so the scan must still find it.
        assert_eq!(bitmap.first_set(), 65);
    }

    #[test]
    fn test_refill_after_empty() {
        let mut bitmap: PrioBitmap<128> = PrioBitmap::new();
        bitmap.set(100);
        bitmap.clear(100);
        assert!(bitmap.is_empty());
        bitmap.set(99);
        assert_eq!(bitmap.first_set(), 99);
    }

    #[test]
    #[cfg(feature = "contract-checks")]
    #[should_panic(expected = "scheduling contract violated")]
    fn test_first_set_on_empty_fails_fast() {
        let bitmap: PrioBitmap<64> = PrioBitmap::new();
        bitmap.first_set();
    }

    #[test]
    #[cfg(feature = "contract-checks")]
    #[should_panic(expected = "scheduling contract violated")]
    fn test_first_set_on_empty_two_level_fails_fast() {
        let bitmap: PrioBitmap<128> = PrioBitmap::new();
        bitmap.first_set();
    }
}
