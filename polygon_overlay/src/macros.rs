/// Macro used for test assertions.
#[doc(hidden)]
#[macro_export]
macro_rules! assert_fuzzy_eq {
    ($left:expr, $right:expr) => {{
        match (&$left, &$right) {
            (left_val, right_val) => {
                if !(left_val.fuzzy_eq(*right_val)) {
                    panic!(
                        r#"assertion failed: `left.fuzzy_eq(right)`
  left: `{:?}`,
 right: `{:?}`"#,
                        &*left_val, &*right_val
                    )
                }
            }
        }
    }};
    ($left:expr, $right:expr, $eps:expr) => {{
        match (&$left, &$right, &$eps) {
            (left_val, right_val, eps_val) => {
                if !(left_val.fuzzy_eq_eps(*right_val, *eps_val)) {
                    panic!(
                        r#"assertion failed: `left.fuzzy_eq_eps(right, eps)`
  left: `{:?}`,
 right: `{:?}`
 eps: `{:?}`"#,
                        &*left_val, &*right_val, &*eps_val
                    )
                }
            }
        }
    }};
}

/// Macro used for implementing geometry macros. Used for extracting macro repetition count for
/// reserving capacity up front.
#[doc(hidden)]
#[macro_export]
macro_rules! replace_expr {
    ($_t:tt $sub:expr) => {
        $sub
    };
}

/// Construct a ring with the points given as a list of (x, y) tuples.
///
/// # Examples
///
/// ```
/// # use polygon_overlay::ring;
/// # use polygon_overlay::core::math::Vector2;
/// let r = ring![(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0)];
/// assert_eq!(r.len(), 4);
/// assert_eq!(r.points[1], Vector2::new(0.0, 2.0));
/// assert_eq!(r.area(), 4.0);
/// ```
#[macro_export]
macro_rules! ring {
    ($( $x:expr ),* $(,)?) => {
        {
            let size = <[()]>::len(&[$($crate::replace_expr!(($x) ())),*]);
            let mut r = $crate::geometry::Ring::with_capacity(size);
            $(
                r.add($x.0, $x.1);
            )*
            r
        }
    };
}

/// Construct a polygon from an exterior ring point list followed by optional hole point lists,
/// each given as a bracketed list of (x, y) tuples.
///
/// # Examples
///
/// ```
/// # use polygon_overlay::polygon;
/// let p = polygon![
///     [(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)],
///     [(2.0, 2.0), (4.0, 2.0), (4.0, 4.0), (2.0, 4.0)],
/// ];
/// assert_eq!(p.interiors.len(), 1);
/// assert_eq!(p.area(), 96.0);
/// ```
#[macro_export]
macro_rules! polygon {
    ([$( $e:expr ),* $(,)?] $(, [$( $h:expr ),* $(,)?])* $(,)?) => {
        $crate::geometry::Polygon::new(
            $crate::ring![$($e),*],
            vec![$($crate::ring![$($h),*]),*],
        )
    };
}
