//! Nested-loop composition of generators.
//!
//! Members are ordered outermost first. The innermost member advances fastest and every
//! time an outer member advances, each inner member starts over from its first position.
//! A composed position carries the axis values and indices of every member in that
//! order, and a step index running from 0 to `size - 1`.

use std::collections::HashSet;

use tracing::info;

use super::iterator::PositionCursor;
use super::mutator::Mutator;
use super::PointGenerator;
use crate::error::{GeneratorError, PointsResult};
use crate::limits::{checked_scan_size, validate_scan_size};
use crate::position::Position;

/// Cartesian product of member generators.
#[derive(Debug, Clone)]
pub struct CompoundGenerator {
    generators: Vec<PointGenerator>,
    mutators: Vec<Mutator>,
    strides: Vec<usize>,
    size: usize,
}

impl CompoundGenerator {
    /// Compose `generators`, outermost first.
    ///
    /// Fails with a structural error if a member is itself compound or if two members
    /// produce the same axis, and with a configuration error if the list is empty, a
    /// mutator names an unknown axis, or the product exceeds `max_points`.
    pub fn new(
        generators: Vec<PointGenerator>,
        mutators: Vec<Mutator>,
        max_points: usize,
    ) -> PointsResult<Self> {
        if generators.is_empty() {
            return Err(GeneratorError::Configuration(
                "compound generator needs at least one member".to_string(),
            ));
        }

        let mut axes = HashSet::new();
        for (i, generator) in generators.iter().enumerate() {
            if generator.is_compound() {
                return Err(GeneratorError::Structural(format!(
                    "member {i} is itself a compound generator; flatten the model first"
                )));
            }
            for name in generator.axis_names() {
                if axes.contains(&name) {
                    return Err(GeneratorError::Structural(format!(
                        "axis '{name}' is produced by more than one member"
                    )));
                }
                axes.insert(name);
            }
        }
        for mutator in &mutators {
            mutator.check_axes(&axes)?;
        }

        let sizes: Vec<usize> = generators.iter().map(PointGenerator::size).collect();
        let size = validate_scan_size(checked_scan_size(sizes.iter().copied())?, max_points)?;

        // strides[k] = product of the sizes of every member inside k
        let mut strides = vec![1usize; sizes.len()];
        for k in (0..sizes.len().saturating_sub(1)).rev() {
            strides[k] = strides[k + 1] * sizes[k + 1];
        }

        let generator = Self {
            generators,
            mutators,
            strides,
            size,
        };
        info!(
            size,
            rank = generator.rank(),
            shape = ?generator.shape(),
            mutators = generator.mutators.len(),
            "Compound generator built"
        );
        Ok(generator)
    }

    /// Members, outermost first.
    pub fn generators(&self) -> &[PointGenerator] {
        &self.generators
    }

    /// Mutators applied to every composed position.
    pub fn mutators(&self) -> &[Mutator] {
        &self.mutators
    }

    /// Product of the member sizes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Sum of the member ranks.
    pub fn rank(&self) -> usize {
        self.generators.iter().map(PointGenerator::rank).sum()
    }

    /// Concatenation of the member shapes.
    pub fn shape(&self) -> Vec<usize> {
        self.generators
            .iter()
            .flat_map(PointGenerator::shape)
            .collect()
    }

    /// Axis names of every member, outermost first.
    pub fn axis_names(&self) -> Vec<String> {
        self.generators
            .iter()
            .flat_map(PointGenerator::axis_names)
            .collect()
    }

    fn finish(&self, position: Position) -> Position {
        self.mutators
            .iter()
            .fold(position, |position, mutator| mutator.apply(position))
    }

    pub(crate) fn position_at(&self, index: usize) -> Option<Position> {
        if index >= self.size {
            return None;
        }
        let mut remainder = index;
        let mut parts = Vec::with_capacity(self.generators.len());
        for (generator, stride) in self.generators.iter().zip(&self.strides) {
            parts.push(generator.local_position(remainder / stride)?);
            remainder %= stride;
        }
        Some(self.finish(Position::compose(&parts, index)))
    }

    pub(crate) fn cursor(&self) -> CompoundCursor<'_> {
        CompoundCursor {
            generator: self,
            cursors: self.generators.iter().map(PointGenerator::cursor).collect(),
            current: Vec::with_capacity(self.generators.len()),
            step_index: 0,
            started: false,
            done: false,
        }
    }
}

/// Odometer over member cursors.
pub(crate) struct CompoundCursor<'a> {
    generator: &'a CompoundGenerator,
    cursors: Vec<Box<dyn PositionCursor + 'a>>,
    current: Vec<Position>,
    step_index: usize,
    started: bool,
    done: bool,
}

impl CompoundCursor<'_> {
    fn prime(&mut self) -> bool {
        for cursor in &mut self.cursors {
            match cursor.next_position() {
                Some(position) => self.current.push(position),
                None => return false,
            }
        }
        true
    }

    /// Advance the innermost member, carrying into outer members as they run out.
    fn advance(&mut self) -> bool {
        for level in (0..self.cursors.len()).rev() {
            if let Some(position) = self.cursors[level].next_position() {
                self.current[level] = position;
                return true;
            }
            if level == 0 {
                return false;
            }
            self.cursors[level] = self.generator.generators[level].cursor();
            match self.cursors[level].next_position() {
                Some(position) => self.current[level] = position,
                None => return false,
            }
        }
        false
    }
}

impl PositionCursor for CompoundCursor<'_> {
    fn next_position(&mut self) -> Option<Position> {
        if self.done {
            return None;
        }
        let ready = if self.started {
            self.advance()
        } else {
            self.started = true;
            self.prime()
        };
        if !ready {
            self.done = true;
            return None;
        }
        let position = Position::compose(&self.current, self.step_index);
        self.step_index += 1;
        Some(self.generator.finish(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::StepGenerator;
    use crate::limits::MAX_SCAN_POINTS;
    use crate::models::StepModel;

    fn step(name: &str, start: f64, stop: f64, step: f64) -> PointGenerator {
        let model = StepModel::new(name, start, stop, step);
        PointGenerator::Step(StepGenerator::new(model, "mm").unwrap())
    }

    fn drain(generator: &CompoundGenerator) -> Vec<Position> {
        let mut cursor = generator.cursor();
        std::iter::from_fn(move || cursor.next_position()).collect()
    }

    #[test]
    fn test_inner_axis_advances_fastest() {
        let compound = CompoundGenerator::new(
            vec![step("a", 0.0, 1.0, 1.0), step("b", 0.0, 2.0, 1.0)],
            Vec::new(),
            MAX_SCAN_POINTS,
        )
        .unwrap();
        assert_eq!(compound.size(), 6);
        assert_eq!(compound.shape(), vec![2, 3]);

        let pairs: Vec<(f64, f64)> = drain(&compound)
            .iter()
            .map(|p| (p.get("a").unwrap(), p.get("b").unwrap()))
            .collect();
        assert_eq!(
            pairs,
            vec![(0.0, 0.0), (0.0, 1.0), (0.0, 2.0), (1.0, 0.0), (1.0, 1.0), (1.0, 2.0)]
        );
    }

    #[test]
    fn test_position_at_matches_cursor() {
        let compound = CompoundGenerator::new(
            vec![
                step("a", 0.0, 2.0, 1.0),
                step("b", 0.0, 3.0, 1.0),
                step("c", 5.0, 6.0, 0.5),
            ],
            Vec::new(),
            MAX_SCAN_POINTS,
        )
        .unwrap();
        let positions = drain(&compound);
        assert_eq!(positions.len(), 36);
        for (index, position) in positions.iter().enumerate() {
            assert_eq!(compound.position_at(index).as_ref(), Some(position));
        }
        assert!(compound.position_at(36).is_none());
    }

    #[test]
    fn test_duplicate_axis_is_structural() {
        let err = CompoundGenerator::new(
            vec![step("x", 0.0, 1.0, 1.0), step("x", 0.0, 2.0, 1.0)],
            Vec::new(),
            MAX_SCAN_POINTS,
        )
        .unwrap_err();
        assert!(err.is_structural());
    }

    #[test]
    fn test_nested_compound_is_structural() {
        let inner =
            CompoundGenerator::new(vec![step("x", 0.0, 1.0, 1.0)], Vec::new(), MAX_SCAN_POINTS)
                .unwrap();
        let err = CompoundGenerator::new(
            vec![step("T", 0.0, 1.0, 1.0), PointGenerator::Compound(inner)],
            Vec::new(),
            MAX_SCAN_POINTS,
        )
        .unwrap_err();
        assert!(err.is_structural());
    }

    #[test]
    fn test_empty_member_list() {
        let err = CompoundGenerator::new(Vec::new(), Vec::new(), MAX_SCAN_POINTS).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_point_limit() {
        let err = CompoundGenerator::new(
            vec![step("a", 0.0, 9.0, 1.0), step("b", 0.0, 9.0, 1.0)],
            Vec::new(),
            50,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            GeneratorError::TooManyPoints {
                points: 100,
                max_points: 50
            }
        ));
    }
}
