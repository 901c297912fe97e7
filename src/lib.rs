//! Point generation for multi-axis experiment scans.
//!
//! This library turns declarative scan models (stepped axes, multi-segment axes, 2D
//! rasters and nested loops over them) into generators that produce the ordered
//! sequence of positions a scan engine should visit. Generators know their size, rank
//! and shape up front and produce positions lazily, one pass per call to `iter()`.
//!
//! Geometric regions restrict a raster to the points inside them, and mutators perturb
//! composed positions. Everything is built through [`PointGeneratorService`].

pub mod config;
pub mod descriptor;
pub mod error;
pub mod generator;
pub mod limits;
pub mod logging;
pub mod models;
pub mod position;
pub mod region;
pub mod service;

pub use config::{GenerationSettings, LoggingConfig, PointsConfig};
pub use descriptor::{
    AxisGroupDescriptor, ExcluderDescriptor, GeneratorDescriptor, MutatorDescriptor,
};
pub use error::{GeneratorError, PointsResult};
pub use generator::{
    CompoundGenerator, GridGenerator, MultiStepGenerator, Mutator, PointGenerator, Positions,
    StepGenerator,
};
pub use models::{
    AxisModel, BoundingBox, CompoundModel, GridModel, MultiStepModel, MutatorModel, StepModel,
};
pub use position::Position;
pub use region::{BoundRegion, RegionShape, RegionTest, ScanRegion};
pub use service::PointGeneratorService;
