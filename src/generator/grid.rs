//! Two-axis raster generator with optional snake ordering and region filtering.
//!
//! The raster covers `slow_axis_points` rows of `fast_axis_points` points. Points sit at
//! cell centres, `start + (i + 0.5) * length / points`, so a 20x20 raster over a 3x3 box
//! starts at 0.075 on both axes. With `snake` set, odd rows run the fast axis backwards.
//!
//! When regions are bound, only raster points inside every region are kept. The kept
//! points form a flat sequence: rank 1, shape `[count]`. The count is found once at
//! construction by walking the raster in iteration order.

use tracing::debug;

use super::iterator::PositionCursor;
use crate::error::{GeneratorError, PointsResult};
use crate::limits::validate_scan_size;
use crate::models::{BoundingBox, GridModel};
use crate::position::Position;
use crate::region::BoundRegion;

/// Raster over two axes.
#[derive(Debug, Clone)]
pub struct GridGenerator {
    model: GridModel,
    bounding_box: BoundingBox,
    units: String,
    fast_step: f64,
    slow_step: f64,
    raster_size: usize,
    regions: Vec<BoundRegion>,
    filtered_size: Option<usize>,
}

/// One raster point: row, physical column and the two axis values.
#[derive(Debug, Clone, Copy)]
struct RasterPoint {
    row: usize,
    column: usize,
    slow: f64,
    fast: f64,
}

impl GridGenerator {
    /// Validate `model` and `regions` and build the generator.
    ///
    /// Every region must be bound to exactly this grid's fast and slow axes. The full
    /// raster is held to `max_points` even when regions will drop most of it, since the
    /// pre-scan visits every raster point.
    pub fn new(
        model: GridModel,
        regions: Vec<BoundRegion>,
        default_units: &str,
        max_points: usize,
    ) -> PointsResult<Self> {
        let bounding_box = model.validate()?;
        let raster_size = model
            .fast_axis_points
            .checked_mul(model.slow_axis_points)
            .ok_or(GeneratorError::SizeOverflow {
                context: "grid raster size",
            })?;
        validate_scan_size(raster_size, max_points)?;

        for region in &regions {
            region.validate()?;
            if !region.binds_pair(&model.fast_axis_name, &model.slow_axis_name) {
                return Err(GeneratorError::Configuration(format!(
                    "region on '{}'/'{}' does not match grid axes '{}'/'{}'",
                    region.x_axis(),
                    region.y_axis(),
                    model.fast_axis_name,
                    model.slow_axis_name
                )));
            }
        }

        let units = model
            .units
            .clone()
            .unwrap_or_else(|| default_units.to_string());
        let fast_step = bounding_box.fast_axis_length / model.fast_axis_points as f64;
        let slow_step = bounding_box.slow_axis_length / model.slow_axis_points as f64;

        let mut generator = Self {
            model,
            bounding_box,
            units,
            fast_step,
            slow_step,
            raster_size,
            regions,
            filtered_size: None,
        };

        if !generator.regions.is_empty() {
            let kept = (0..raster_size)
                .filter(|&k| generator.raster_point(k).is_some())
                .count();
            debug!(
                fast_axis = %generator.model.fast_axis_name,
                slow_axis = %generator.model.slow_axis_name,
                raster = raster_size,
                kept,
                regions = generator.regions.len(),
                "Filtered grid pre-scan complete"
            );
            generator.filtered_size = Some(kept);
        }

        Ok(generator)
    }

    /// The model this generator was built from.
    pub fn model(&self) -> &GridModel {
        &self.model
    }

    /// Bounding box the raster covers.
    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bounding_box
    }

    /// Inner axis name.
    pub fn fast_axis_name(&self) -> &str {
        &self.model.fast_axis_name
    }

    /// Outer axis name.
    pub fn slow_axis_name(&self) -> &str {
        &self.model.slow_axis_name
    }

    /// Units of both axes.
    pub fn units(&self) -> &str {
        &self.units
    }

    /// True if fast-axis direction alternates between rows.
    pub fn is_snake(&self) -> bool {
        self.model.snake
    }

    /// Regions filtering this raster.
    pub fn regions(&self) -> &[BoundRegion] {
        &self.regions
    }

    /// True if at least one region is bound.
    pub fn is_filtered(&self) -> bool {
        self.filtered_size.is_some()
    }

    /// Number of points produced.
    pub fn size(&self) -> usize {
        self.filtered_size.unwrap_or(self.raster_size)
    }

    /// 2 for a plain raster, 1 once filtered.
    pub fn rank(&self) -> usize {
        if self.is_filtered() {
            1
        } else {
            2
        }
    }

    /// `[rows, columns]`, or `[kept points]` once filtered.
    pub fn shape(&self) -> Vec<usize> {
        match self.filtered_size {
            Some(kept) => vec![kept],
            None => vec![self.model.slow_axis_points, self.model.fast_axis_points],
        }
    }

    /// Fast axis value of physical column `column`.
    pub fn fast_value(&self, column: usize) -> f64 {
        self.bounding_box.fast_axis_start + (column as f64 + 0.5) * self.fast_step
    }

    /// Slow axis value of row `row`.
    pub fn slow_value(&self, row: usize) -> f64 {
        self.bounding_box.slow_axis_start + (row as f64 + 0.5) * self.slow_step
    }

    /// Raster point visited at raster step `k`, if it passes every region.
    fn raster_point(&self, k: usize) -> Option<RasterPoint> {
        let columns = self.model.fast_axis_points;
        let row = k / columns;
        let along = k % columns;
        let column = if self.model.snake && row % 2 == 1 {
            columns - 1 - along
        } else {
            along
        };
        let point = RasterPoint {
            row,
            column,
            slow: self.slow_value(row),
            fast: self.fast_value(column),
        };
        let fast_axis = self.fast_axis_name();
        self.regions
            .iter()
            .all(|region| region.contains_axes(fast_axis, point.fast, point.slow))
            .then_some(point)
    }

    fn make_position(&self, point: RasterPoint, ordinal: usize) -> Position {
        let indices = if self.is_filtered() {
            vec![ordinal]
        } else {
            vec![point.row, point.column]
        };
        Position::new(
            vec![
                (self.model.slow_axis_name.clone(), point.slow),
                (self.model.fast_axis_name.clone(), point.fast),
            ],
            indices,
            ordinal,
        )
    }

    pub(crate) fn position_at(&self, index: usize) -> Option<Position> {
        if index >= self.size() {
            return None;
        }
        if self.is_filtered() {
            // Kept points are not evenly spread over the raster; walk to the index.
            let mut cursor = self.cursor();
            for _ in 0..index {
                cursor.next_position()?;
            }
            return cursor.next_position();
        }
        let point = self.raster_point(index)?;
        Some(self.make_position(point, index))
    }

    pub(crate) fn cursor(&self) -> GridCursor<'_> {
        GridCursor {
            generator: self,
            raster_index: 0,
            ordinal: 0,
        }
    }
}

pub(crate) struct GridCursor<'a> {
    generator: &'a GridGenerator,
    raster_index: usize,
    ordinal: usize,
}

impl PositionCursor for GridCursor<'_> {
    fn next_position(&mut self) -> Option<Position> {
        while self.raster_index < self.generator.raster_size {
            let k = self.raster_index;
            self.raster_index += 1;
            if let Some(point) = self.generator.raster_point(k) {
                let position = self.generator.make_position(point, self.ordinal);
                self.ordinal += 1;
                return Some(position);
            }
        }
        None
    }
}
