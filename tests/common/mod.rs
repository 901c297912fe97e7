//! Common test utilities for scan_points integration tests
//!
//! This module provides reusable test helpers for:
//! - Floating-point comparisons with a fixed tolerance
//! - Building the grids used across the test suite
//! - Checking that a generator's declared size, shape and random access agree with
//!   what iteration actually produces

#![allow(dead_code)] // Utilities may not all be used by every test binary

use scan_points::{BoundingBox, GridModel, PointGenerator, Position};

/// Tolerance for comparing computed axis values.
pub const TOLERANCE: f64 = 1e-9;

/// Assert that two values agree within [`TOLERANCE`].
///
/// # Panics
/// Panics with `context` in the message if the values differ.
pub fn assert_close(actual: f64, expected: f64, context: &str) {
    assert!(
        (actual - expected).abs() < TOLERANCE,
        "{context}: expected {expected}, got {actual}"
    );
}

/// Assert that `position` has `axis` at `expected`.
pub fn assert_axis(position: &Position, axis: &str, expected: f64) {
    let actual = position
        .get(axis)
        .unwrap_or_else(|| panic!("position {position} has no axis '{axis}'"));
    let context = format!("axis '{axis}' at step {}", position.step_index());
    assert_close(actual, expected, &context);
}

/// `points` x `points` grid over the 3 x 3 box at the origin.
pub fn square_grid(fast: &str, slow: &str, points: usize) -> GridModel {
    GridModel::new(fast, slow)
        .with_points(points, points)
        .with_bounding_box(BoundingBox::new(0.0, 0.0, 3.0, 3.0))
}

/// Check the invariants every generator must hold and return its positions.
///
/// - iteration yields exactly `size` positions with step indices `0..size`
/// - `rank == shape.len()` and `product(shape) >= size`
/// - every position carries one index per dimension and the declared axis names
/// - `position_at(i)` equals the `i`-th iterated position
pub fn assert_generator_consistent(generator: &PointGenerator) -> Vec<Position> {
    let positions: Vec<Position> = generator.iter().collect();
    assert_eq!(positions.len(), generator.size(), "iterated count != size");

    let shape = generator.shape();
    assert_eq!(generator.rank(), shape.len(), "rank != shape length");
    assert!(shape.iter().product::<usize>() >= generator.size());

    let names = generator.axis_names();
    for (i, position) in positions.iter().enumerate() {
        assert_eq!(position.step_index(), i);
        assert_eq!(position.indices().len(), generator.rank());
        assert!(position.names().eq(names.iter().map(String::as_str)));
        assert_eq!(&generator.position_at(i).unwrap(), position, "position_at({i})");
    }
    positions
}
