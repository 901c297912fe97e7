//! Single-axis step generator.

use super::iterator::PositionCursor;
use crate::error::PointsResult;
use crate::models::StepModel;
use crate::position::Position;

/// Evenly spaced values along one axis.
#[derive(Debug, Clone)]
pub struct StepGenerator {
    model: StepModel,
    units: String,
    count: usize,
}

impl StepGenerator {
    /// Validate `model` and build the generator. `default_units` applies when the model
    /// names none.
    pub fn new(model: StepModel, default_units: &str) -> PointsResult<Self> {
        let count = model.point_count()?;
        let units = model
            .units
            .clone()
            .unwrap_or_else(|| default_units.to_string());
        Ok(Self {
            model,
            units,
            count,
        })
    }

    /// The model this generator was built from.
    pub fn model(&self) -> &StepModel {
        &self.model
    }

    /// Axis name.
    pub fn name(&self) -> &str {
        &self.model.name
    }

    /// Axis units.
    pub fn units(&self) -> &str {
        &self.units
    }

    /// Number of values.
    pub fn size(&self) -> usize {
        self.count
    }

    /// Value at `index`; not range checked.
    pub fn value_at(&self, index: usize) -> f64 {
        self.model.start + self.model.step * index as f64
    }

    /// First value.
    pub fn first(&self) -> f64 {
        self.value_at(0)
    }

    /// Last value actually visited, which may fall short of `stop`.
    pub fn last(&self) -> f64 {
        self.value_at(self.count - 1)
    }

    pub(crate) fn position_at(&self, index: usize) -> Option<Position> {
        (index < self.count).then(|| Position::single(self.name(), self.value_at(index), index))
    }

    pub(crate) fn cursor(&self) -> StepCursor<'_> {
        StepCursor {
            generator: self,
            index: 0,
        }
    }
}

pub(crate) struct StepCursor<'a> {
    generator: &'a StepGenerator,
    index: usize,
}

impl PositionCursor for StepCursor<'_> {
    fn next_position(&mut self) -> Option<Position> {
        let position = self.generator.position_at(self.index)?;
        self.index += 1;
        Some(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_steps() {
        let model = StepModel::new("Temperature", 290.0, 295.0, 1.0);
        let generator = StepGenerator::new(model, "mm").unwrap();
        assert_eq!(generator.size(), 6);

        let mut cursor = generator.cursor();
        let mut values = Vec::new();
        while let Some(position) = cursor.next_position() {
            values.push(position.get("Temperature").unwrap());
        }
        assert_eq!(values, vec![290.0, 291.0, 292.0, 293.0, 294.0, 295.0]);
    }

    #[test]
    fn test_last_value_short_of_stop() {
        let generator = StepGenerator::new(StepModel::new("x", 0.0, 1.0, 0.3), "mm").unwrap();
        assert_eq!(generator.size(), 4);
        assert!((generator.last() - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_units() {
        let plain = StepGenerator::new(StepModel::new("x", 0.0, 1.0, 1.0), "mm").unwrap();
        assert_eq!(plain.units(), "mm");
        let kelvin =
            StepGenerator::new(StepModel::new("T", 0.0, 1.0, 1.0).with_units("K"), "mm").unwrap();
        assert_eq!(kelvin.units(), "K");
    }

    #[test]
    fn test_position_at_out_of_range() {
        let generator = StepGenerator::new(StepModel::new("x", 0.0, 1.0, 1.0), "mm").unwrap();
        assert!(generator.position_at(1).is_some());
        assert!(generator.position_at(2).is_none());
    }
}
