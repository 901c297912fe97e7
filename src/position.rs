//! Scan positions.
//!
//! A [`Position`] is one point of a scan: the value of every axis at that point, its
//! coordinate in the scan shape, and its global linear index. Positions are plain values
//! and keep no reference to the generator that produced them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One point of a scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Axis name -> value, outermost axis first
    values: Vec<(String, f64)>,
    /// Coordinate of this point in the scan shape
    indices: Vec<usize>,
    /// Global linear index of this point
    step_index: usize,
}

impl Position {
    /// Create a position from its parts.
    pub fn new(values: Vec<(String, f64)>, indices: Vec<usize>, step_index: usize) -> Self {
        Self {
            values,
            indices,
            step_index,
        }
    }

    /// Position on a single axis of rank one.
    pub(crate) fn single(name: &str, value: f64, index: usize) -> Self {
        Self::new(vec![(name.to_string(), value)], vec![index], index)
    }

    /// Merge member positions (outer to inner) into one position at `step_index`.
    pub(crate) fn compose<'a, I>(parts: I, step_index: usize) -> Self
    where
        I: IntoIterator<Item = &'a Position>,
    {
        let mut values = Vec::new();
        let mut indices = Vec::new();
        for part in parts {
            values.extend(part.values.iter().cloned());
            indices.extend_from_slice(&part.indices);
        }
        Self::new(values, indices, step_index)
    }

    /// Value of the named axis.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|(axis, _)| axis == name)
            .map(|(_, value)| *value)
    }

    pub(crate) fn value_mut(&mut self, name: &str) -> Option<&mut f64> {
        self.values
            .iter_mut()
            .find(|(axis, _)| axis == name)
            .map(|(_, value)| value)
    }

    /// Axis names, outermost first.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(axis, _)| axis.as_str())
    }

    /// Axis values in name order.
    pub fn values(&self) -> &[(String, f64)] {
        &self.values
    }

    /// Coordinate of this point in the scan shape.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Global linear index of this point.
    pub fn step_index(&self) -> usize {
        self.step_index
    }

    /// Number of axes in this position.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the position carries no axes.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, (axis, value)) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{axis}: {value}")?;
        }
        write!(f, ", step={}]", self.step_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_position() {
        let pos = Position::single("Temperature", 290.0, 3);
        assert_eq!(pos.get("Temperature"), Some(290.0));
        assert_eq!(pos.get("Position"), None);
        assert_eq!(pos.indices(), &[3]);
        assert_eq!(pos.step_index(), 3);
        assert_eq!(pos.len(), 1);
    }

    #[test]
    fn test_compose_keeps_order() {
        let outer = Position::single("Temperature", 291.0, 1);
        let inner = Position::new(
            vec![("y".to_string(), 0.225), ("x".to_string(), 0.075)],
            vec![1, 0],
            20,
        );
        let pos = Position::compose([&outer, &inner], 420);

        let names: Vec<&str> = pos.names().collect();
        assert_eq!(names, vec!["Temperature", "y", "x"]);
        assert_eq!(pos.indices(), &[1, 1, 0]);
        assert_eq!(pos.step_index(), 420);
        assert_eq!(pos.get("y"), Some(0.225));
    }

    #[test]
    fn test_display() {
        let pos = Position::single("x", 1.5, 0);
        assert_eq!(pos.to_string(), "[x: 1.5, step=0]");
    }
}
