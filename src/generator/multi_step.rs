//! Multi-segment step generator.

use super::iterator::PositionCursor;
use super::step::StepGenerator;
use crate::error::{GeneratorError, PointsResult};
use crate::models::MultiStepModel;
use crate::position::Position;

/// Step segments on one axis visited one after another. Segment boundaries are not
/// visible in the positions: the index runs continuously across segments.
#[derive(Debug, Clone)]
pub struct MultiStepGenerator {
    name: String,
    units: String,
    segments: Vec<StepGenerator>,
    offsets: Vec<usize>,
    size: usize,
}

impl MultiStepGenerator {
    /// Validate `model` and build the generator.
    pub fn new(model: MultiStepModel, default_units: &str) -> PointsResult<Self> {
        model.validate()?;
        let units = model
            .units
            .clone()
            .unwrap_or_else(|| default_units.to_string());

        let segments = model
            .steps
            .into_iter()
            .map(|step| StepGenerator::new(step.with_units(&units), &units))
            .collect::<PointsResult<Vec<_>>>()?;

        let mut offsets = Vec::with_capacity(segments.len());
        let mut size = 0usize;
        for segment in &segments {
            offsets.push(size);
            size = size
                .checked_add(segment.size())
                .ok_or(GeneratorError::SizeOverflow {
                    context: "multi-step point count",
                })?;
        }

        Ok(Self {
            name: model.name,
            units,
            segments,
            offsets,
            size,
        })
    }

    /// Axis name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Axis units.
    pub fn units(&self) -> &str {
        &self.units
    }

    /// Segments in visiting order.
    pub fn segments(&self) -> &[StepGenerator] {
        &self.segments
    }

    /// Total number of values across all segments.
    pub fn size(&self) -> usize {
        self.size
    }

    pub(crate) fn position_at(&self, index: usize) -> Option<Position> {
        if index >= self.size {
            return None;
        }
        let segment = self.offsets.partition_point(|&offset| offset <= index) - 1;
        let value = self.segments[segment].value_at(index - self.offsets[segment]);
        Some(Position::single(&self.name, value, index))
    }

    pub(crate) fn cursor(&self) -> MultiStepCursor<'_> {
        MultiStepCursor {
            generator: self,
            segment: 0,
            local: 0,
            index: 0,
        }
    }
}

pub(crate) struct MultiStepCursor<'a> {
    generator: &'a MultiStepGenerator,
    segment: usize,
    local: usize,
    index: usize,
}

impl PositionCursor for MultiStepCursor<'_> {
    fn next_position(&mut self) -> Option<Position> {
        loop {
            let segment = self.generator.segments.get(self.segment)?;
            if self.local < segment.size() {
                let value = segment.value_at(self.local);
                let position = Position::single(&self.generator.name, value, self.index);
                self.local += 1;
                self.index += 1;
                return Some(position);
            }
            self.segment += 1;
            self.local = 0;
        }
    }
}
