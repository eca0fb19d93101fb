use std::fmt;

/// Names one ring of one of the two overlaid geometries.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RingId {
    /// 0 for the first geometry, 1 for the second.
    pub source_index: usize,
    /// Member index within a multi geometry (0 for single geometries).
    pub multi_index: usize,
    /// `None` for the exterior ring (or a line string), `Some(i)` for hole `i`.
    pub ring_index: Option<usize>,
}

impl RingId {
    pub fn new(source_index: usize, multi_index: usize, ring_index: Option<usize>) -> Self {
        Self {
            source_index,
            multi_index,
            ring_index,
        }
    }
}

/// Names one directed segment (from vertex `segment_index` to the next vertex) of a ring.
///
/// Ordering matches `(source_index, multi_index, ring_index, segment_index)` with exterior rings
/// ordered before holes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentId {
    pub source_index: usize,
    pub multi_index: usize,
    pub ring_index: Option<usize>,
    pub segment_index: usize,
}

impl SegmentId {
    pub fn new(ring: RingId, segment_index: usize) -> Self {
        Self {
            source_index: ring.source_index,
            multi_index: ring.multi_index,
            ring_index: ring.ring_index,
            segment_index,
        }
    }

    pub fn ring_id(&self) -> RingId {
        RingId::new(self.source_index, self.multi_index, self.ring_index)
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ring_index {
            Some(r) => write!(
                f,
                "s{}:m{}:r{}:{}",
                self.source_index, self.multi_index, r, self.segment_index
            ),
            None => write!(
                f,
                "s{}:m{}:r-1:{}",
                self.source_index, self.multi_index, self.segment_index
            ),
        }
    }
}
