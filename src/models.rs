//! Scan models.
//!
//! Models are the read-only descriptions a client assembles before asking the
//! [`PointGeneratorService`](crate::service::PointGeneratorService) for generators. They
//! carry parameters only and know nothing about iteration.
//!
//! # Scan definition files
//!
//! Every model is serde-(de)serializable. [`AxisModel`] is tagged by `type`, so a
//! compound scan can be written in TOML:
//!
//! ```toml
//! [[models]]
//! type = "step"
//! name = "Temperature"
//! start = 290.0
//! stop = 300.0
//! step = 1.0
//!
//! [[models]]
//! type = "grid"
//! fast_axis_name = "x"
//! slow_axis_name = "y"
//! fast_axis_points = 20
//! slow_axis_points = 20
//! bounding_box = { fast_axis_start = 0.0, slow_axis_start = 0.0, fast_axis_length = 3.0, slow_axis_length = 3.0 }
//!
//! [[regions]]
//! x_axis = "x"
//! y_axis = "y"
//! shape = { shape = "circle", centre = [1.5, 1.5], radius = 1.5 }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{GeneratorError, PointsResult};
use crate::limits::STEP_TOLERANCE;
use crate::region::ScanRegion;

/// Evenly spaced values along one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepModel {
    /// Axis name
    pub name: String,
    /// First value
    pub start: f64,
    /// Last value (inclusive when reached exactly)
    pub stop: f64,
    /// Signed distance between values
    pub step: f64,
    /// Axis units
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
}

impl StepModel {
    /// Create a step model.
    pub fn new(name: &str, start: f64, stop: f64, step: f64) -> Self {
        Self {
            name: name.to_string(),
            start,
            stop,
            step,
            units: None,
        }
    }

    /// Set the axis units.
    pub fn with_units(mut self, units: &str) -> Self {
        self.units = Some(units.to_string());
        self
    }

    /// Validate the model and return the number of values it produces.
    ///
    /// `count = floor((stop - start) / step) + 1`, with a small tolerance so that spans
    /// which are whole multiples of `step` in decimal keep their last value.
    pub fn point_count(&self) -> PointsResult<usize> {
        if self.name.trim().is_empty() {
            return Err(GeneratorError::Configuration(
                "step model needs an axis name".to_string(),
            ));
        }
        if !(self.start.is_finite() && self.stop.is_finite() && self.step.is_finite()) {
            return Err(GeneratorError::Configuration(format!(
                "axis '{}': start, stop and step must be finite",
                self.name
            )));
        }
        if self.step == 0.0 {
            return Err(GeneratorError::Configuration(format!(
                "axis '{}': step size must be non-zero",
                self.name
            )));
        }

        let span = (self.stop - self.start) / self.step;
        if span < -STEP_TOLERANCE {
            return Err(GeneratorError::Configuration(format!(
                "axis '{}': step {} moves away from stop {} (start {})",
                self.name, self.step, self.stop, self.start
            )));
        }

        let intervals = (span.max(0.0) + STEP_TOLERANCE).floor();
        if intervals >= usize::MAX as f64 {
            return Err(GeneratorError::SizeOverflow {
                context: "step point count",
            });
        }
        Ok(intervals as usize + 1)
    }

    /// Check the model without keeping the count.
    pub fn validate(&self) -> PointsResult<()> {
        self.point_count().map(|_| ())
    }
}

/// Several step segments on one logical axis, visited one after another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiStepModel {
    /// Axis name shared by every segment
    pub name: String,
    /// Segments in visiting order
    #[serde(default)]
    pub steps: Vec<StepModel>,
    /// Axis units
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
}

impl MultiStepModel {
    /// Create an empty multi-step model for `name`.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            steps: Vec::new(),
            units: None,
        }
    }

    /// Append a segment.
    pub fn add_step_model(&mut self, step: StepModel) {
        self.steps.push(step);
    }

    /// Append a segment, builder style.
    pub fn with_step(mut self, step: StepModel) -> Self {
        self.steps.push(step);
        self
    }

    /// Set the axis units.
    pub fn with_units(mut self, units: &str) -> Self {
        self.units = Some(units.to_string());
        self
    }

    /// Check that there is at least one segment and every segment is on this axis.
    pub fn validate(&self) -> PointsResult<()> {
        if self.name.trim().is_empty() {
            return Err(GeneratorError::Configuration(
                "multi-step model needs an axis name".to_string(),
            ));
        }
        if self.steps.is_empty() {
            return Err(GeneratorError::Configuration(format!(
                "multi-step axis '{}' has no step segments",
                self.name
            )));
        }
        for step in &self.steps {
            if step.name != self.name {
                return Err(GeneratorError::Configuration(format!(
                    "multi-step axis '{}' contains a segment on axis '{}'",
                    self.name, step.name
                )));
            }
            step.validate()?;
        }
        Ok(())
    }
}

/// Physical span covered by a grid raster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Fast axis origin
    pub fast_axis_start: f64,
    /// Slow axis origin
    pub slow_axis_start: f64,
    /// Fast axis extent
    pub fast_axis_length: f64,
    /// Slow axis extent
    pub slow_axis_length: f64,
}

impl BoundingBox {
    /// Create a bounding box from its origin and extents.
    pub fn new(
        fast_axis_start: f64,
        slow_axis_start: f64,
        fast_axis_length: f64,
        slow_axis_length: f64,
    ) -> Self {
        Self {
            fast_axis_start,
            slow_axis_start,
            fast_axis_length,
            slow_axis_length,
        }
    }

    /// Check that every field is finite and both extents are non-zero.
    pub fn validate(&self) -> PointsResult<()> {
        let fields = [
            self.fast_axis_start,
            self.slow_axis_start,
            self.fast_axis_length,
            self.slow_axis_length,
        ];
        if !fields.iter().all(|v| v.is_finite()) {
            return Err(GeneratorError::Configuration(
                "bounding box fields must be finite".to_string(),
            ));
        }
        if self.fast_axis_length == 0.0 || self.slow_axis_length == 0.0 {
            return Err(GeneratorError::Configuration(format!(
                "bounding box has zero extent ({} x {})",
                self.fast_axis_length, self.slow_axis_length
            )));
        }
        Ok(())
    }
}

/// Two-axis raster over a bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridModel {
    /// Inner (fastest varying) axis
    #[serde(default = "default_fast_axis_name")]
    pub fast_axis_name: String,
    /// Outer axis
    #[serde(default = "default_slow_axis_name")]
    pub slow_axis_name: String,
    /// Points per row
    #[serde(default = "default_grid_points")]
    pub fast_axis_points: usize,
    /// Number of rows
    #[serde(default = "default_grid_points")]
    pub slow_axis_points: usize,
    /// Physical span of the raster
    #[serde(default)]
    pub bounding_box: Option<BoundingBox>,
    /// Reverse the fast axis on every other row
    #[serde(default)]
    pub snake: bool,
    /// Units of both axes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
}

fn default_fast_axis_name() -> String {
    "x".to_string()
}

fn default_slow_axis_name() -> String {
    "y".to_string()
}

fn default_grid_points() -> usize {
    5
}

impl Default for GridModel {
    fn default() -> Self {
        Self {
            fast_axis_name: default_fast_axis_name(),
            slow_axis_name: default_slow_axis_name(),
            fast_axis_points: default_grid_points(),
            slow_axis_points: default_grid_points(),
            bounding_box: None,
            snake: false,
            units: None,
        }
    }
}

impl GridModel {
    /// Grid over the named axes with default point counts.
    pub fn new(fast_axis_name: &str, slow_axis_name: &str) -> Self {
        Self {
            fast_axis_name: fast_axis_name.to_string(),
            slow_axis_name: slow_axis_name.to_string(),
            ..Self::default()
        }
    }

    /// Set the number of points along each axis.
    pub fn with_points(mut self, fast_axis_points: usize, slow_axis_points: usize) -> Self {
        self.fast_axis_points = fast_axis_points;
        self.slow_axis_points = slow_axis_points;
        self
    }

    /// Set the bounding box.
    pub fn with_bounding_box(mut self, bounding_box: BoundingBox) -> Self {
        self.bounding_box = Some(bounding_box);
        self
    }

    /// Enable or disable snake ordering.
    pub fn with_snake(mut self, snake: bool) -> Self {
        self.snake = snake;
        self
    }

    /// Set the units of both axes.
    pub fn with_units(mut self, units: &str) -> Self {
        self.units = Some(units.to_string());
        self
    }

    /// Check names, point counts and the bounding box, returning the box.
    pub fn validate(&self) -> PointsResult<BoundingBox> {
        if self.fast_axis_name.trim().is_empty() || self.slow_axis_name.trim().is_empty() {
            return Err(GeneratorError::Configuration(
                "grid axes must be named".to_string(),
            ));
        }
        if self.fast_axis_name == self.slow_axis_name {
            return Err(GeneratorError::Structural(format!(
                "grid uses axis '{}' as both fast and slow axis",
                self.fast_axis_name
            )));
        }
        if self.fast_axis_points == 0 || self.slow_axis_points == 0 {
            return Err(GeneratorError::Configuration(format!(
                "grid '{}'/'{}' needs at least one point per axis",
                self.fast_axis_name, self.slow_axis_name
            )));
        }
        let bounding_box = self.bounding_box.ok_or_else(|| {
            GeneratorError::Configuration(format!(
                "grid '{}'/'{}' has no bounding box",
                self.fast_axis_name, self.slow_axis_name
            ))
        })?;
        bounding_box.validate()?;
        Ok(bounding_box)
    }
}

/// Per-position transformations applied by a compound generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MutatorModel {
    /// Add a reproducible pseudo-random offset in `[-max_offset, max_offset]` to each axis.
    RandomOffset {
        /// Seed for the offset sequence
        seed: u64,
        /// Largest absolute offset
        max_offset: f64,
        /// Axes to perturb
        axes: Vec<String>,
    },
}

impl MutatorModel {
    /// Random offset mutator over `axes`.
    pub fn random_offset(seed: u64, max_offset: f64, axes: &[&str]) -> Self {
        MutatorModel::RandomOffset {
            seed,
            max_offset,
            axes: axes.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Ordered list of models forming a nested-loop scan, outermost first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompoundModel {
    /// Sub-models, outermost first
    #[serde(default)]
    pub models: Vec<AxisModel>,
    /// Regions, each bound to the axes of one grid sub-model
    #[serde(default)]
    pub regions: Vec<ScanRegion>,
    /// Mutators applied to every composed position
    #[serde(default)]
    pub mutators: Vec<MutatorModel>,
}

impl CompoundModel {
    /// Compound of the given models.
    pub fn new(models: Vec<AxisModel>) -> Self {
        Self {
            models,
            ..Self::default()
        }
    }

    /// Append an inner model.
    pub fn add_model(&mut self, model: impl Into<AxisModel>) {
        self.models.push(model.into());
    }

    /// Bind a region.
    pub fn with_region(mut self, region: ScanRegion) -> Self {
        self.regions.push(region);
        self
    }

    /// Add a mutator.
    pub fn with_mutator(mut self, mutator: MutatorModel) -> Self {
        self.mutators.push(mutator);
        self
    }

    /// Inline nested compound models so that no sub-model is itself a compound.
    ///
    /// Nested sub-models keep their position in the loop order; their regions and
    /// mutators are appended after the outer ones.
    pub fn flatten(&self) -> CompoundModel {
        let mut flat = CompoundModel {
            models: Vec::with_capacity(self.models.len()),
            regions: self.regions.clone(),
            mutators: self.mutators.clone(),
        };
        for model in &self.models {
            match model {
                AxisModel::Compound(nested) => {
                    let nested = nested.flatten();
                    flat.models.extend(nested.models);
                    flat.regions.extend(nested.regions);
                    flat.mutators.extend(nested.mutators);
                }
                other => flat.models.push(other.clone()),
            }
        }
        flat
    }

    /// Axis names of every sub-model, outermost first.
    pub fn axis_names(&self) -> Vec<String> {
        self.models.iter().flat_map(|m| m.axis_names()).collect()
    }

    /// Parse a scan definition.
    pub fn from_toml_str(text: &str) -> PointsResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a scan definition file.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> PointsResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

/// Any model the generator service can build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AxisModel {
    /// Single stepped axis
    Step(StepModel),
    /// Concatenated step segments on one axis
    MultiStep(MultiStepModel),
    /// Two-axis raster
    Grid(GridModel),
    /// Nested-loop composition
    Compound(CompoundModel),
}

impl AxisModel {
    /// Axis names this model produces, outermost first.
    pub fn axis_names(&self) -> Vec<String> {
        match self {
            AxisModel::Step(m) => vec![m.name.clone()],
            AxisModel::MultiStep(m) => vec![m.name.clone()],
            AxisModel::Grid(m) => vec![m.slow_axis_name.clone(), m.fast_axis_name.clone()],
            AxisModel::Compound(m) => m.axis_names(),
        }
    }

    /// Short name of the model variant.
    pub fn kind(&self) -> &'static str {
        match self {
            AxisModel::Step(_) => "step",
            AxisModel::MultiStep(_) => "multi_step",
            AxisModel::Grid(_) => "grid",
            AxisModel::Compound(_) => "compound",
        }
    }
}

impl From<StepModel> for AxisModel {
    fn from(model: StepModel) -> Self {
        AxisModel::Step(model)
    }
}

impl From<MultiStepModel> for AxisModel {
    fn from(model: MultiStepModel) -> Self {
        AxisModel::MultiStep(model)
    }
}

impl From<GridModel> for AxisModel {
    fn from(model: GridModel) -> Self {
        AxisModel::Grid(model)
    }
}

impl From<CompoundModel> for AxisModel {
    fn from(model: CompoundModel) -> Self {
        AxisModel::Compound(model)
    }
}
