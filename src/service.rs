//! Generator factory.
//!
//! [`PointGeneratorService`] is the single entry point for turning models into
//! generators. It applies the [`GenerationSettings`] (default units, point limit) to
//! everything it builds, attaches regions to the grids whose axes they are bound to,
//! and checks compositions before handing back an immutable generator tree.

use tracing::{debug, info};

use crate::config::GenerationSettings;
use crate::error::{GeneratorError, PointsResult};
use crate::generator::{
    CompoundGenerator, GridGenerator, MultiStepGenerator, Mutator, PointGenerator, StepGenerator,
};
use crate::limits::validate_scan_size;
use crate::models::{AxisModel, CompoundModel, GridModel};
use crate::region::BoundRegion;

/// Builds generators from models.
#[derive(Debug, Clone, Default)]
pub struct PointGeneratorService {
    settings: GenerationSettings,
}

impl PointGeneratorService {
    /// Service with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Service with the given settings.
    pub fn with_settings(settings: GenerationSettings) -> Self {
        Self { settings }
    }

    /// Settings applied to every generator built.
    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Build the generator for `model`.
    ///
    /// # Errors
    ///
    /// A configuration error if the model is missing required fields or is degenerate,
    /// a structural error if a compound model repeats an axis.
    pub fn create_generator(&self, model: impl Into<AxisModel>) -> PointsResult<PointGenerator> {
        self.create_generator_with_regions(model, Vec::<BoundRegion>::new())
    }

    /// Build the generator for `model`, filtering its grids with `regions`.
    ///
    /// Each region must be bound to the fast and slow axes of one grid in the model.
    /// Regions on any other axes are rejected with a configuration error.
    pub fn create_generator_with_regions<M, R, I>(
        &self,
        model: M,
        regions: I,
    ) -> PointsResult<PointGenerator>
    where
        M: Into<AxisModel>,
        I: IntoIterator<Item = R>,
        R: Into<BoundRegion>,
    {
        let regions: Vec<BoundRegion> = regions.into_iter().map(Into::into).collect();
        self.build(model.into(), regions)
    }

    /// Compose already built generators, outermost first.
    ///
    /// # Errors
    ///
    /// A structural error if a member is itself compound or two members share an axis
    /// name, a configuration error for an empty list or a scan above the point limit.
    pub fn create_compound_generator(
        &self,
        generators: Vec<PointGenerator>,
    ) -> PointsResult<PointGenerator> {
        self.compose(generators, Vec::new())
    }

    /// Build a compound generator from its model.
    ///
    /// Nested compound models are flattened into the loop order first. Each region in
    /// the model is attached to the grid it is bound to.
    pub fn create_compound_generator_from_model(
        &self,
        model: &CompoundModel,
    ) -> PointsResult<PointGenerator> {
        self.build_compound(model, Vec::new())
    }

    fn build(&self, model: AxisModel, regions: Vec<BoundRegion>) -> PointsResult<PointGenerator> {
        let units = self.settings.default_units.as_str();
        let kind = model.kind();
        let generator = match model {
            AxisModel::Compound(compound) => return self.build_compound(&compound, regions),
            AxisModel::Grid(grid) => PointGenerator::Grid(GridGenerator::new(
                grid,
                regions,
                units,
                self.settings.max_points,
            )?),
            _ if !regions.is_empty() => {
                return Err(GeneratorError::Configuration(format!(
                    "region on '{}'/'{}' cannot filter a {kind} model; regions apply to grids",
                    regions[0].x_axis(),
                    regions[0].y_axis(),
                )))
            }
            AxisModel::Step(step) => PointGenerator::Step(StepGenerator::new(step, units)?),
            AxisModel::MultiStep(multi) => {
                PointGenerator::MultiStep(MultiStepGenerator::new(multi, units)?)
            }
        };

        validate_scan_size(generator.size(), self.settings.max_points)?;
        debug!(
            kind = generator.kind(),
            axes = ?generator.axis_names(),
            size = generator.size(),
            shape = ?generator.shape(),
            "Generator created"
        );
        Ok(generator)
    }

    fn build_compound(
        &self,
        model: &CompoundModel,
        extra_regions: Vec<BoundRegion>,
    ) -> PointsResult<PointGenerator> {
        let flat = model.flatten();

        let mut assigned: Vec<Vec<BoundRegion>> = vec![Vec::new(); flat.models.len()];
        let regions = flat
            .regions
            .iter()
            .map(BoundRegion::from)
            .chain(extra_regions);
        for region in regions {
            let slot = flat.models.iter().position(|m| match m {
                AxisModel::Grid(grid) => binds_grid(&region, grid),
                _ => false,
            });
            match slot {
                Some(i) => assigned[i].push(region),
                None => {
                    return Err(GeneratorError::Configuration(format!(
                        "region on '{}'/'{}' does not match the axes of any grid in the model",
                        region.x_axis(),
                        region.y_axis()
                    )))
                }
            }
        }

        let generators = flat
            .models
            .into_iter()
            .zip(assigned)
            .map(|(model, regions)| self.build(model, regions))
            .collect::<PointsResult<Vec<_>>>()?;
        let mutators = flat
            .mutators
            .iter()
            .map(Mutator::from_model)
            .collect::<PointsResult<Vec<_>>>()?;

        self.compose(generators, mutators)
    }

    fn compose(
        &self,
        generators: Vec<PointGenerator>,
        mutators: Vec<Mutator>,
    ) -> PointsResult<PointGenerator> {
        let members = generators.len();
        let compound = CompoundGenerator::new(generators, mutators, self.settings.max_points)?;
        info!(
            members,
            axes = ?compound.axis_names(),
            size = compound.size(),
            "Compound scan ready"
        );
        Ok(PointGenerator::Compound(compound))
    }
}

fn binds_grid(region: &BoundRegion, grid: &GridModel) -> bool {
    region.binds_pair(&grid.fast_axis_name, &grid.slow_axis_name)
}
