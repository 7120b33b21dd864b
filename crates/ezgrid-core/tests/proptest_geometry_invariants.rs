//! Property-based invariant tests for grid geometry (GridSpan, GridArea).
//!
//! 1. Spans are never zero.
//! 2. An area contains its origin and its bottom-right corner.
//! 3. Inclusive edges never fall before the origin.

use ezgrid_core::geometry::{GridArea, GridPos, GridSpan};
use proptest::prelude::*;

fn area_strategy() -> impl Strategy<Value = GridArea> {
    (any::<u16>(), any::<u16>(), any::<u16>(), any::<u16>())
        .prop_map(|(r, c, rs, cs)| GridArea::new(GridPos::new(r, c), GridSpan::new(rs, cs)))
}

proptest! {
    #[test]
    fn spans_are_never_zero(rows in any::<u16>(), cols in any::<u16>()) {
        let span = GridSpan::new(rows, cols);
        prop_assert!(span.row_span() >= 1);
        prop_assert!(span.col_span() >= 1);
    }
}

proptest! {
    #[test]
    fn area_contains_both_corners(area in area_strategy()) {
        prop_assert!(area.contains(area.pos));
        prop_assert!(area.contains(GridPos::new(area.bottom_row(), area.right_col())));
    }
}

proptest! {
    #[test]
    fn edges_never_precede_origin(area in area_strategy()) {
        prop_assert!(area.bottom_row() >= area.row());
        prop_assert!(area.right_col() >= area.col());
    }
}
