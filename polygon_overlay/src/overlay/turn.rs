//! Turn records: intersection events between two segments and the per-segment operations that
//! drive traversal.
use super::segment_id::SegmentId;
use crate::core::{math::Vector2, traits::Real};
use std::fmt;

/// What traversal may do when leaving a turn along one operation's segment.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum OperationType {
    /// Not classified yet.
    None,
    /// Leaving segment runs outside the other geometry, part of a union result.
    Union,
    /// Leaving segment runs inside the other geometry, part of an intersection result.
    Intersection,
    /// Must never be taken (zero length continuation).
    Blocked,
    /// Leaving segment runs along the other geometry's boundary in the same direction, part of
    /// both union and intersection results.
    Continue,
    /// Leaving segment runs along the other geometry's boundary in the opposite direction, part of
    /// neither result.
    Opposite,
}

impl OperationType {
    /// Number of input geometries covering the left side of the leaving segment (own geometry
    /// interior is always on the right).
    pub fn count_left(self) -> usize {
        match self {
            OperationType::Intersection | OperationType::Opposite => 1,
            _ => 0,
        }
    }
}

/// How a turn was formed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    /// Proper crossing of both segment interiors.
    Crosses,
    /// Both segments start at the turn point.
    Touch,
    /// One segment starts at the turn point which lies in the interior of the other.
    TouchInterior,
    /// Both segments start at the turn point and run collinear from there.
    Equal,
    /// End point of a collinear overlap.
    Collinear,
}

/// Traversal state of an operation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Visited {
    None,
    /// Operation a traversal thread started from.
    Started,
    Visited,
    /// Start operation of a thread that closed its ring.
    Finished,
}

/// Data written onto operations by enrichment and clustering.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EnrichmentInfo<T> {
    /// Turn reached next when walking forward along the ring (possibly after copying vertices).
    pub travels_to_ip_index: Option<usize>,
    /// Last ring vertex to copy before reaching `travels_to_ip_index`.
    pub travels_to_vertex_index: Option<usize>,
    /// Next turn on the same segment, reached without copying any vertex.
    pub next_ip_index: Option<usize>,
    /// Squared distance from the segment start, orders turns along a segment.
    pub distance: T,
    /// Angular order of the leaving direction among all operations of the cluster.
    pub rank: usize,
    /// Number of input geometries on the left of the leaving segment.
    pub count_left: usize,
    /// Operations on the same ring at the same location share a half edge id.
    pub half_edge: Option<usize>,
}

impl<T> Default for EnrichmentInfo<T>
where
    T: Real,
{
    fn default() -> Self {
        Self {
            travels_to_ip_index: None,
            travels_to_vertex_index: None,
            next_ip_index: None,
            distance: T::zero(),
            rank: 0,
            count_left: 0,
            half_edge: None,
        }
    }
}

/// Per segment slot of a turn.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TurnOperation<T> {
    pub seg_id: SegmentId,
    /// Parametric position of the turn point on the segment.
    pub fraction: T,
    pub operation: OperationType,
    pub visited: Visited,
    pub enriched: EnrichmentInfo<T>,
}

impl<T> TurnOperation<T>
where
    T: Real,
{
    pub fn new(seg_id: SegmentId, fraction: T, operation: OperationType) -> Self {
        Self {
            seg_id,
            fraction,
            operation,
            visited: Visited::None,
            enriched: EnrichmentInfo::default(),
        }
    }

    /// `true` if traversal for `target` may follow this operation.
    pub fn is_traversable_for(&self, target: OperationType) -> bool {
        (self.operation == target || self.operation == OperationType::Continue)
            && self.enriched.travels_to_ip_index.is_some()
    }
}

/// Intersection event between a segment of geometry 1 and a segment of geometry 2.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn<T = f64> {
    pub point: Vector2<T>,
    pub method: Method,
    /// Slot 0 belongs to the first geometry, slot 1 to the second.
    pub operations: [TurnOperation<T>; 2],
    pub cluster_id: Option<usize>,
}

impl<T> Turn<T>
where
    T: Real,
{
    pub fn new(point: Vector2<T>, method: Method, operations: [TurnOperation<T>; 2]) -> Self {
        Self {
            point,
            method,
            operations,
            cluster_id: None,
        }
    }

    /// Both operations have type `op`.
    pub fn both(&self, op: OperationType) -> bool {
        self.operations[0].operation == op && self.operations[1].operation == op
    }

    /// At least one operation has type `op`.
    pub fn has(&self, op: OperationType) -> bool {
        self.operations[0].operation == op || self.operations[1].operation == op
    }

    pub fn is_clustered(&self) -> bool {
        self.cluster_id.is_some()
    }
}

impl<T> fmt::Display for Turn<T>
where
    T: Real,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}) {:?}", self.point.x, self.point.y, self.method)?;
        if let Some(c) = self.cluster_id {
            write!(f, " cluster {}", c)?;
        }
        for op in self.operations.iter() {
            write!(
                f,
                " | {} @{} {:?} {:?} next {:?} to {:?}/v{:?}",
                op.seg_id,
                op.fraction,
                op.operation,
                op.visited,
                op.enriched.next_ip_index,
                op.enriched.travels_to_ip_index,
                op.enriched.travels_to_vertex_index
            )?;
        }
        Ok(())
    }
}

/// Handle to one operation slot of one turn, the unit of traversal position.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Toi {
    pub turn_index: usize,
    pub operation_index: usize,
}

impl Toi {
    pub fn new(turn_index: usize, operation_index: usize) -> Self {
        Self {
            turn_index,
            operation_index,
        }
    }

    /// The other operation slot of the same turn.
    pub fn partner(&self) -> Self {
        Self::new(self.turn_index, 1 - self.operation_index)
    }
}

impl fmt::Display for Toi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.turn_index, self.operation_index)
    }
}

/// Operation of `turns` referenced by `toi`.
#[inline]
pub fn op_at<T>(turns: &[Turn<T>], toi: Toi) -> &TurnOperation<T> {
    &turns[toi.turn_index].operations[toi.operation_index]
}

#[inline]
pub fn op_at_mut<T>(turns: &mut [Turn<T>], toi: Toi) -> &mut TurnOperation<T> {
    &mut turns[toi.turn_index].operations[toi.operation_index]
}
