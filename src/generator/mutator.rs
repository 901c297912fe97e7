//! Position mutators applied by compound generators.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{GeneratorError, PointsResult};
use crate::models::MutatorModel;
use crate::position::Position;

/// Transformation applied to every composed position.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutator {
    /// Reproducible jitter on selected axes.
    RandomOffset(RandomOffset),
}

impl Mutator {
    /// Build a mutator from its model.
    pub fn from_model(model: &MutatorModel) -> PointsResult<Self> {
        match model {
            MutatorModel::RandomOffset {
                seed,
                max_offset,
                axes,
            } => Ok(Mutator::RandomOffset(RandomOffset::new(
                *seed,
                *max_offset,
                axes.clone(),
            )?)),
        }
    }

    /// Short name of the mutator.
    pub fn kind(&self) -> &'static str {
        match self {
            Mutator::RandomOffset(_) => "random_offset",
        }
    }

    /// Axes this mutator changes.
    pub fn axes(&self) -> &[String] {
        match self {
            Mutator::RandomOffset(m) => &m.axes,
        }
    }

    /// The model equivalent of this mutator.
    pub fn to_model(&self) -> MutatorModel {
        match self {
            Mutator::RandomOffset(m) => MutatorModel::RandomOffset {
                seed: m.seed,
                max_offset: m.max_offset,
                axes: m.axes.clone(),
            },
        }
    }

    /// Fail unless every mutated axis is produced by the generator tree.
    pub(crate) fn check_axes(&self, available: &HashSet<String>) -> PointsResult<()> {
        match self.axes().iter().find(|axis| !available.contains(*axis)) {
            Some(axis) => Err(GeneratorError::Configuration(format!(
                "{} mutator targets axis '{axis}', which no generator produces",
                self.kind()
            ))),
            None => Ok(()),
        }
    }

    pub(crate) fn apply(&self, position: Position) -> Position {
        match self {
            Mutator::RandomOffset(m) => m.apply(position),
        }
    }
}

/// Adds an offset drawn uniformly from `[-max_offset, max_offset]` to each listed axis.
///
/// Offsets depend only on the seed and the position's step index, so iterating twice or
/// asking for a position by index gives identical values.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomOffset {
    seed: u64,
    max_offset: f64,
    axes: Vec<String>,
}

impl RandomOffset {
    /// Validate parameters and build the mutator.
    pub fn new(seed: u64, max_offset: f64, axes: Vec<String>) -> PointsResult<Self> {
        if !max_offset.is_finite() || max_offset < 0.0 {
            return Err(GeneratorError::Configuration(format!(
                "random offset must be finite and non-negative (got {max_offset})"
            )));
        }
        if axes.is_empty() {
            return Err(GeneratorError::Configuration(
                "random offset mutator needs at least one axis".to_string(),
            ));
        }
        Ok(Self {
            seed,
            max_offset,
            axes,
        })
    }

    /// Seed of the offset sequence.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Largest absolute offset.
    pub fn max_offset(&self) -> f64 {
        self.max_offset
    }

    fn apply(&self, mut position: Position) -> Position {
        if self.max_offset == 0.0 {
            return position;
        }
        let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(position.step_index() as u64));
        for axis in &self.axes {
            let delta = rng.gen_range(-self.max_offset..=self.max_offset);
            if let Some(value) = position.value_mut(axis) {
                *value += delta;
            }
        }
        position
    }
}
