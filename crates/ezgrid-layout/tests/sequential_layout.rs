//! Row-major placement scenarios: the way forms are actually built.

use ezgrid_core::geometry::{GridArea, GridPos, GridSpan};
use ezgrid_layout::{ColSpan, ColSpec, GridCursor, Place, RowSpec};

fn place(cursor: &mut GridCursor, at: Place, span: GridSpan) -> GridPos {
    let pos = cursor.resolve(at.row, at.col);
    cursor.remember(GridArea::new(pos, span));
    pos
}

#[test]
fn single_column_stack() {
    let mut c = GridCursor::new();
    for expected in 0..3 {
        let pos = place(&mut c, Place::next_row(), GridSpan::ONE);
        assert_eq!(pos, GridPos::new(expected, 0));
    }
}

#[test]
fn two_by_two_grid() {
    let mut c = GridCursor::new();
    let mut seen = Vec::new();
    for _ in 0..2 {
        seen.push(place(&mut c, Place::next_row(), GridSpan::ONE));
        seen.push(place(&mut c, Place::same_row(), GridSpan::ONE));
    }
    assert_eq!(
        seen,
        vec![
            GridPos::new(0, 0),
            GridPos::new(0, 1),
            GridPos::new(1, 0),
            GridPos::new(1, 1)
        ]
    );
}

#[test]
fn tall_widget_pushes_next_row_down() {
    let mut c = GridCursor::new();
    let first = place(&mut c, Place::next_row(), GridSpan::rows(3));
    assert_eq!(first.row, 0);
    let second = c.resolve(RowSpec::Next, ColSpec::Same);
    assert_eq!(second.row, 3);
}

#[test]
fn tallest_member_sets_row_height() {
    let mut c = GridCursor::new();
    place(&mut c, Place::next_row(), GridSpan::rows(2));
    place(&mut c, Place::same_row(), GridSpan::rows(5));
    place(&mut c, Place::same_row(), GridSpan::ONE);
    assert_eq!(c.resolve(RowSpec::Next, ColSpec::Same).row, 5);
}

#[test]
fn extent_growth() {
    let mut c = GridCursor::new();
    place(&mut c, Place::next_row(), GridSpan::cols(2));
    assert_eq!(c.extent(), (1, 0));
    place(&mut c, Place::next_row(), GridSpan::new(2, 3));
    assert_eq!(c.extent(), (2, 2));
}

#[test]
fn captioned_field_then_next_col() {
    // A caption + entry pair occupies two columns.
    let mut c = GridCursor::new();
    place(&mut c, Place::next_row(), GridSpan::cols(2));
    let beside = c.resolve(RowSpec::Same, ColSpec::Next);
    assert_eq!(beside.col, 2);
}

#[test]
fn extend_appends_outside_everything() {
    let mut c = GridCursor::new();
    place(&mut c, Place::at(2, 4), GridSpan::ONE);
    assert_eq!(c.resolve(RowSpec::Extend, ColSpec::Left), GridPos::new(3, 0));
    assert_eq!(c.resolve(RowSpec::First, ColSpec::Extend), GridPos::new(0, 5));
}

#[test]
fn overlay_stacks_on_last_widget() {
    let mut c = GridCursor::new();
    place(&mut c, Place::next_row(), GridSpan::ONE);
    let b = place(&mut c, Place::same_row(), GridSpan::ONE);
    let overlay = place(&mut c, Place::overlay(), GridSpan::ONE);
    assert_eq!(overlay, b);
}

#[test]
fn full_width_banner_spans_used_columns() {
    let mut c = GridCursor::new();
    place(&mut c, Place::next_row(), GridSpan::ONE);
    place(&mut c, Place::same_row(), GridSpan::ONE);
    place(&mut c, Place::same_row(), GridSpan::ONE);
    let pos = c.resolve(RowSpec::Extend, ColSpec::Left);
    assert_eq!(c.col_span(pos.col, ColSpan::All), 3);
}
