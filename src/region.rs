//! Geometric exclusion regions.
//!
//! A region is a shape bound to two axis names. Grid generators keep a raster point only
//! when every bound region contains it. The only capability the generators need is the
//! point-in-region test of [`RegionTest`]. [`RegionShape`] implements it natively for
//! circles, rectangles and polygons. Other shapes can be bound through [`BoundRegion::new`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::error::{GeneratorError, PointsResult};

/// Point-in-region test over a pair of axis values.
pub trait RegionTest: Send + Sync {
    /// True if `(x, y)` lies inside the region.
    fn contains(&self, x: f64, y: f64) -> bool;

    /// Short name of the shape, reported in generator descriptors.
    fn kind(&self) -> &str {
        "custom"
    }

    /// Shape parameters, reported in generator descriptors.
    fn describe(&self) -> serde_json::Value {
        serde_json::Value::Null
    }

    /// Check the shape parameters.
    fn validate(&self) -> PointsResult<()> {
        Ok(())
    }
}

/// Built-in region shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum RegionShape {
    /// Disc of `radius` around `centre`, boundary included.
    Circle {
        /// Centre as (x, y)
        centre: [f64; 2],
        /// Radius
        radius: f64,
    },
    /// Axis-aligned rectangle from `origin` spanning `lengths`, boundary included.
    Rectangle {
        /// Corner as (x, y)
        origin: [f64; 2],
        /// Extent along (x, y); negative lengths extend towards lower values
        lengths: [f64; 2],
    },
    /// Simple polygon, even-odd rule.
    Polygon {
        /// Vertices as (x, y), in order
        vertices: Vec<[f64; 2]>,
    },
}

impl RegionShape {
    /// Circle centred at `(x, y)`.
    pub fn circle(x: f64, y: f64, radius: f64) -> Self {
        RegionShape::Circle {
            centre: [x, y],
            radius,
        }
    }

    /// Rectangle with a corner at `(x, y)`.
    pub fn rectangle(x: f64, y: f64, x_length: f64, y_length: f64) -> Self {
        RegionShape::Rectangle {
            origin: [x, y],
            lengths: [x_length, y_length],
        }
    }

    /// Polygon through the given vertices.
    pub fn polygon(vertices: Vec<[f64; 2]>) -> Self {
        RegionShape::Polygon { vertices }
    }
}

fn polygon_contains(vertices: &[[f64; 2]], x: f64, y: f64) -> bool {
    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let [xi, yi] = vertices[i];
        let [xj, yj] = vertices[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

impl RegionTest for RegionShape {
    fn contains(&self, x: f64, y: f64) -> bool {
        match self {
            RegionShape::Circle { centre, radius } => {
                let dx = x - centre[0];
                let dy = y - centre[1];
                dx * dx + dy * dy <= radius * radius
            }
            RegionShape::Rectangle { origin, lengths } => {
                let (x0, x1) = ordered(origin[0], origin[0] + lengths[0]);
                let (y0, y1) = ordered(origin[1], origin[1] + lengths[1]);
                x >= x0 && x <= x1 && y >= y0 && y <= y1
            }
            RegionShape::Polygon { vertices } => {
                vertices.len() >= 3 && polygon_contains(vertices, x, y)
            }
        }
    }

    fn kind(&self) -> &str {
        match self {
            RegionShape::Circle { .. } => "circle",
            RegionShape::Rectangle { .. } => "rectangle",
            RegionShape::Polygon { .. } => "polygon",
        }
    }

    fn describe(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    fn validate(&self) -> PointsResult<()> {
        match self {
            RegionShape::Circle { centre, radius } => {
                if !centre.iter().all(|v| v.is_finite()) || !radius.is_finite() || *radius <= 0.0
                {
                    return Err(GeneratorError::Configuration(format!(
                        "circle region needs a finite centre and a positive radius (got {radius})"
                    )));
                }
            }
            RegionShape::Rectangle { origin, lengths } => {
                let finite = origin.iter().chain(lengths.iter()).all(|v| v.is_finite());
                if !finite || lengths[0] == 0.0 || lengths[1] == 0.0 {
                    return Err(GeneratorError::Configuration(
                        "rectangle region needs finite, non-zero lengths".to_string(),
                    ));
                }
            }
            RegionShape::Polygon { vertices } => {
                if vertices.len() < 3 {
                    return Err(GeneratorError::Configuration(format!(
                        "polygon region needs at least 3 vertices (got {})",
                        vertices.len()
                    )));
                }
                if !vertices.iter().flatten().all(|v| v.is_finite()) {
                    return Err(GeneratorError::Configuration(
                        "polygon region vertices must be finite".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// A built-in shape bound to two axes, as written in scan definitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRegion {
    /// Axis supplying the shape's x coordinate
    pub x_axis: String,
    /// Axis supplying the shape's y coordinate
    pub y_axis: String,
    /// The shape
    pub shape: RegionShape,
}

impl ScanRegion {
    /// Bind `shape` to the given axes.
    pub fn new(x_axis: &str, y_axis: &str, shape: RegionShape) -> Self {
        Self {
            x_axis: x_axis.to_string(),
            y_axis: y_axis.to_string(),
            shape,
        }
    }

    /// True if the region is bound to exactly the axes `a` and `b`, in either order.
    pub fn binds_pair(&self, a: &str, b: &str) -> bool {
        (self.x_axis == a && self.y_axis == b) || (self.x_axis == b && self.y_axis == a)
    }
}

/// A region test bound to two axes, as held by generators.
#[derive(Clone)]
pub struct BoundRegion {
    x_axis: String,
    y_axis: String,
    test: Arc<dyn RegionTest>,
}

impl BoundRegion {
    /// Bind any region test to the given axes.
    pub fn new<R: RegionTest + 'static>(x_axis: &str, y_axis: &str, test: R) -> Self {
        Self {
            x_axis: x_axis.to_string(),
            y_axis: y_axis.to_string(),
            test: Arc::new(test),
        }
    }

    /// Axis supplying the x coordinate.
    pub fn x_axis(&self) -> &str {
        &self.x_axis
    }

    /// Axis supplying the y coordinate.
    pub fn y_axis(&self) -> &str {
        &self.y_axis
    }

    /// The underlying test.
    pub fn test(&self) -> &dyn RegionTest {
        self.test.as_ref()
    }

    /// True if the region is bound to exactly the axes `a` and `b`, in either order.
    pub fn binds_pair(&self, a: &str, b: &str) -> bool {
        (self.x_axis == a && self.y_axis == b) || (self.x_axis == b && self.y_axis == a)
    }

    /// Evaluate the region at a point given as two named axis values.
    pub fn contains_axes(&self, first_axis: &str, first: f64, second: f64) -> bool {
        if self.x_axis == first_axis {
            self.test.contains(first, second)
        } else {
            self.test.contains(second, first)
        }
    }

    /// Check axis names and shape parameters.
    pub fn validate(&self) -> PointsResult<()> {
        if self.x_axis.is_empty() || self.y_axis.is_empty() {
            return Err(GeneratorError::Configuration(
                "region axes must be named".to_string(),
            ));
        }
        if self.x_axis == self.y_axis {
            return Err(GeneratorError::Configuration(format!(
                "region must be bound to two different axes (got '{}' twice)",
                self.x_axis
            )));
        }
        self.test.validate()
    }
}

impl fmt::Debug for BoundRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundRegion")
            .field("x_axis", &self.x_axis)
            .field("y_axis", &self.y_axis)
            .field("kind", &self.test.kind())
            .finish()
    }
}

impl From<ScanRegion> for BoundRegion {
    fn from(region: ScanRegion) -> Self {
        BoundRegion::new(&region.x_axis, &region.y_axis, region.shape)
    }
}

impl From<&ScanRegion> for BoundRegion {
    fn from(region: &ScanRegion) -> Self {
        BoundRegion::from(region.clone())
    }
}
