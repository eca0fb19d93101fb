use static_aabb2d_index as aabb_index;

/// Control flow for visitor callbacks (turn visiting, spatial index queries).
///
/// Returning a value for which [ControlFlow::should_break] is `true` stops the visiting function
/// early, this is how the "interrupt policy" of turn finding is expressed.
///
/// # Examples
///
/// ```
/// # use polygon_overlay::core::*;
/// # use polygon_overlay::geometry::*;
/// # use polygon_overlay::overlay::*;
/// # use polygon_overlay::strategy::CartesianStrategy;
/// let a = Geometry::from(Rect::new(0.0, 0.0, 2.0, 2.0));
/// let b = Geometry::from(Rect::new(1.0, 1.0, 3.0, 3.0));
/// let mut visited = 0;
/// let completed = get_turns_interruptible(
///     &a,
///     &b,
///     &CartesianStrategy::default(),
///     &OverlayOptions::new(),
///     &mut |_turn: &Turn<f64>| {
///         visited += 1;
///         Control::Break(())
///     },
/// )
/// .unwrap();
///
/// assert!(!completed);
/// assert_eq!(visited, 1);
/// ```
pub trait ControlFlow {
    /// Constructs state indicating to continue visiting.
    fn continuing() -> Self;

    /// Returns `true` if visiting should stop.
    fn should_break(&self) -> bool;
}

impl<C> ControlFlow for C
where
    C: aabb_index::ControlFlow,
{
    #[inline]
    fn continuing() -> Self {
        aabb_index::ControlFlow::continuing()
    }

    #[inline]
    fn should_break(&self) -> bool {
        aabb_index::ControlFlow::should_break(self)
    }
}
