//! Point generators.
//!
//! A [`PointGenerator`] is an immutable description of a finite, ordered sequence of
//! [`Position`]s. Its size, rank and shape are fixed at construction; iteration is lazy
//! and each call to [`PointGenerator::iter`] starts an independent pass.
//!
//! # Variants
//!
//! - [`StepGenerator`]: one axis, evenly spaced.
//! - [`MultiStepGenerator`]: one axis, several step segments back to back.
//! - [`GridGenerator`]: two axes over a bounding box, optional snake ordering and region
//!   filtering.
//! - [`CompoundGenerator`]: nested loops over other generators, outermost first.
//!
//! # Example
//!
//! ```
//! use scan_points::{PointGeneratorService, StepModel, GridModel, BoundingBox};
//!
//! let service = PointGeneratorService::new();
//! let temperature = service.create_generator(StepModel::new("Temperature", 290.0, 300.0, 1.0))?;
//! let grid = service.create_generator(
//!     GridModel::new("x", "y")
//!         .with_points(20, 20)
//!         .with_bounding_box(BoundingBox::new(0.0, 0.0, 3.0, 3.0)),
//! )?;
//! let scan = service.create_compound_generator(vec![temperature, grid])?;
//!
//! assert_eq!(scan.size(), 4400);
//! assert_eq!(scan.shape(), vec![11, 20, 20]);
//! assert_eq!(scan.iter().count(), 4400);
//! # Ok::<(), scan_points::GeneratorError>(())
//! ```

mod compound;
mod grid;
mod iterator;
mod multi_step;
mod mutator;
mod step;

pub use compound::CompoundGenerator;
pub use grid::GridGenerator;
pub use iterator::{PositionCursor, Positions};
pub use multi_step::MultiStepGenerator;
pub use mutator::{Mutator, RandomOffset};
pub use step::StepGenerator;

use crate::error::{GeneratorError, PointsResult};
use crate::position::Position;

/// Any generator the service can build.
#[derive(Debug, Clone)]
pub enum PointGenerator {
    /// Single stepped axis
    Step(StepGenerator),
    /// Concatenated step segments on one axis
    MultiStep(MultiStepGenerator),
    /// Two-axis raster
    Grid(GridGenerator),
    /// Nested-loop composition
    Compound(CompoundGenerator),
}

impl PointGenerator {
    /// Total number of positions.
    pub fn size(&self) -> usize {
        match self {
            PointGenerator::Step(g) => g.size(),
            PointGenerator::MultiStep(g) => g.size(),
            PointGenerator::Grid(g) => g.size(),
            PointGenerator::Compound(g) => g.size(),
        }
    }

    /// Number of scan dimensions.
    pub fn rank(&self) -> usize {
        match self {
            PointGenerator::Step(_) | PointGenerator::MultiStep(_) => 1,
            PointGenerator::Grid(g) => g.rank(),
            PointGenerator::Compound(g) => g.rank(),
        }
    }

    /// Extent of each scan dimension, outermost first. The product equals [`size`](Self::size).
    pub fn shape(&self) -> Vec<usize> {
        match self {
            PointGenerator::Step(_) | PointGenerator::MultiStep(_) => vec![self.size()],
            PointGenerator::Grid(g) => g.shape(),
            PointGenerator::Compound(g) => g.shape(),
        }
    }

    /// Names of the axes in every position, outermost first.
    pub fn axis_names(&self) -> Vec<String> {
        match self {
            PointGenerator::Step(g) => vec![g.name().to_string()],
            PointGenerator::MultiStep(g) => vec![g.name().to_string()],
            PointGenerator::Grid(g) => vec![
                g.slow_axis_name().to_string(),
                g.fast_axis_name().to_string(),
            ],
            PointGenerator::Compound(g) => g.axis_names(),
        }
    }

    /// Short name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            PointGenerator::Step(_) => "step",
            PointGenerator::MultiStep(_) => "multi_step",
            PointGenerator::Grid(_) => "grid",
            PointGenerator::Compound(_) => "compound",
        }
    }

    /// True for nested-loop compositions.
    pub fn is_compound(&self) -> bool {
        matches!(self, PointGenerator::Compound(_))
    }

    /// Start a fresh pass over the positions.
    pub fn iter(&self) -> Positions<'_> {
        Positions::new(self.cursor(), self.size())
    }

    /// Position with step index `index`, without iterating from the start.
    ///
    /// Filtered grids have no closed form and walk their raster up to `index`.
    pub fn position_at(&self, index: usize) -> PointsResult<Position> {
        self.local_position(index)
            .ok_or(GeneratorError::PositionOutOfRange {
                index,
                size: self.size(),
            })
    }

    /// Materialize every position.
    ///
    /// Fails with [`GeneratorError::Bounds`] or [`GeneratorError::Incomplete`] if
    /// iteration does not produce exactly [`size`](Self::size) positions.
    pub fn create_points(&self) -> PointsResult<Vec<Position>> {
        self.iter().collect_checked()
    }

    pub(crate) fn local_position(&self, index: usize) -> Option<Position> {
        match self {
            PointGenerator::Step(g) => g.position_at(index),
            PointGenerator::MultiStep(g) => g.position_at(index),
            PointGenerator::Grid(g) => g.position_at(index),
            PointGenerator::Compound(g) => g.position_at(index),
        }
    }

    pub(crate) fn cursor(&self) -> Box<dyn PositionCursor + '_> {
        match self {
            PointGenerator::Step(g) => Box::new(g.cursor()),
            PointGenerator::MultiStep(g) => Box::new(g.cursor()),
            PointGenerator::Grid(g) => Box::new(g.cursor()),
            PointGenerator::Compound(g) => Box::new(g.cursor()),
        }
    }
}

impl<'a> IntoIterator for &'a PointGenerator {
    type Item = Position;
    type IntoIter = Positions<'a>;

    fn into_iter(self) -> Positions<'a> {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::MAX_SCAN_POINTS;
    use crate::models::{BoundingBox, GridModel, StepModel};

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_generators_are_shareable() {
        assert_send_sync::<PointGenerator>();
        assert_send_sync::<Position>();
    }

    #[test]
    fn test_position_at_out_of_range() {
        let model = StepModel::new("x", 0.0, 2.0, 1.0);
        let generator = PointGenerator::Step(StepGenerator::new(model, "mm").unwrap());
        assert_eq!(generator.position_at(2).unwrap().get("x"), Some(2.0));
        let err = generator.position_at(3).unwrap_err();
        assert!(matches!(
            err,
            GeneratorError::PositionOutOfRange { index: 3, size: 3 }
        ));
    }

    #[test]
    fn test_iterators_are_independent() {
        let model = GridModel::new("x", "y")
            .with_points(3, 2)
            .with_bounding_box(BoundingBox::new(0.0, 0.0, 3.0, 2.0));
        let grid = GridGenerator::new(model, Vec::new(), "mm", MAX_SCAN_POINTS).unwrap();
        let generator = PointGenerator::Grid(grid);

        let mut first = generator.iter();
        first.next();
        first.next();
        let second: Vec<Position> = generator.iter().collect();
        assert_eq!(second.len(), 6);
        assert_eq!(first.count(), 4);
    }

    #[test]
    fn test_create_points_matches_size() {
        let model = StepModel::new("x", 1.0, 4.0, 0.6);
        let generator = PointGenerator::Step(StepGenerator::new(model, "mm").unwrap());
        let points = generator.create_points().unwrap();
        assert_eq!(points.len(), generator.size());
        assert_eq!(generator.shape(), vec![6]);
        assert_eq!(generator.kind(), "step");
    }
}
