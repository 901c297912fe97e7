//! Structural description of a generator tree.
//!
//! [`PointGenerator::describe`] flattens a tree into the lines, excluders and mutators
//! that make it up, in loop order. The result is plain serde data and carries no
//! behavior. Encoding it for a particular consumer is left to the caller.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::generator::{GridGenerator, Mutator, PointGenerator, StepGenerator};
use crate::region::BoundRegion;

/// Flattened view of a generator tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratorDescriptor {
    /// Axis lines, outermost first
    pub generators: Vec<AxisGroupDescriptor>,
    /// Regions filtering grid members
    pub excluders: Vec<ExcluderDescriptor>,
    /// Mutators applied to composed positions
    pub mutators: Vec<MutatorDescriptor>,
}

/// One line of values along one or more axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisGroupDescriptor {
    /// Line kind; always `"line"` for the built-in generators
    pub kind: String,
    /// Axis names
    pub axes: Vec<String>,
    /// Units, one per axis
    pub units: Vec<String>,
    /// First value, one per axis
    pub start: Vec<f64>,
    /// Last value actually visited, one per axis
    pub stop: Vec<f64>,
    /// Number of values
    pub size: usize,
    /// True if direction alternates on each pass of the enclosing loop
    pub alternate: bool,
}

/// A region bound to two axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcluderDescriptor {
    /// Axes the region is evaluated on, x then y
    pub axes: Vec<String>,
    /// Shape name
    pub kind: String,
    /// Shape parameters
    pub parameters: serde_json::Value,
}

/// A mutator and its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutatorDescriptor {
    /// Mutator name
    pub kind: String,
    /// Axes it changes
    pub axes: Vec<String>,
    /// Remaining parameters
    pub parameters: serde_json::Value,
}

impl GeneratorDescriptor {
    /// Axis names across every line, outermost first.
    pub fn axis_names(&self) -> Vec<&str> {
        self.generators
            .iter()
            .flat_map(|line| line.axes.iter().map(String::as_str))
            .collect()
    }

    /// Serialize to a JSON value.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

fn line(
    axis: &str,
    units: &str,
    start: f64,
    stop: f64,
    size: usize,
    alternate: bool,
) -> AxisGroupDescriptor {
    AxisGroupDescriptor {
        kind: "line".to_string(),
        axes: vec![axis.to_string()],
        units: vec![units.to_string()],
        start: vec![start],
        stop: vec![stop],
        size,
        alternate,
    }
}

fn step_line(generator: &StepGenerator) -> AxisGroupDescriptor {
    line(
        generator.name(),
        generator.units(),
        generator.first(),
        generator.last(),
        generator.size(),
        false,
    )
}

fn grid_lines(generator: &GridGenerator) -> [AxisGroupDescriptor; 2] {
    let model = generator.model();
    let slow = line(
        generator.slow_axis_name(),
        generator.units(),
        generator.slow_value(0),
        generator.slow_value(model.slow_axis_points - 1),
        model.slow_axis_points,
        false,
    );
    let fast = line(
        generator.fast_axis_name(),
        generator.units(),
        generator.fast_value(0),
        generator.fast_value(model.fast_axis_points - 1),
        model.fast_axis_points,
        generator.is_snake(),
    );
    [slow, fast]
}

fn excluder(region: &BoundRegion) -> ExcluderDescriptor {
    ExcluderDescriptor {
        axes: vec![region.x_axis().to_string(), region.y_axis().to_string()],
        kind: region.test().kind().to_string(),
        parameters: region.test().describe(),
    }
}

fn mutator_entry(mutator: &Mutator) -> MutatorDescriptor {
    let parameters = match mutator {
        Mutator::RandomOffset(m) => json!({
            "seed": m.seed(),
            "max_offset": m.max_offset(),
        }),
    };
    MutatorDescriptor {
        kind: mutator.kind().to_string(),
        axes: mutator.axes().to_vec(),
        parameters,
    }
}

impl PointGenerator {
    /// Describe this generator as a flat list of lines, excluders and mutators.
    ///
    /// A leaf generator is described as a compound of one member.
    pub fn describe(&self) -> GeneratorDescriptor {
        let mut descriptor = GeneratorDescriptor::default();
        self.describe_into(&mut descriptor);
        descriptor
    }

    fn describe_into(&self, descriptor: &mut GeneratorDescriptor) {
        match self {
            PointGenerator::Step(g) => descriptor.generators.push(step_line(g)),
            PointGenerator::MultiStep(g) => descriptor
                .generators
                .extend(g.segments().iter().map(step_line)),
            PointGenerator::Grid(g) => {
                descriptor.generators.extend(grid_lines(g));
                descriptor.excluders.extend(g.regions().iter().map(excluder));
            }
            PointGenerator::Compound(g) => {
                for member in g.generators() {
                    member.describe_into(descriptor);
                }
                descriptor.mutators.extend(g.mutators().iter().map(mutator_entry));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::MultiStepGenerator;
    use crate::limits::MAX_SCAN_POINTS;
    use crate::models::{BoundingBox, GridModel, MultiStepModel, StepModel};
    use crate::region::{RegionShape, ScanRegion};

    #[test]
    fn test_step_descriptor() {
        let model = StepModel::new("Temperature", 290.0, 295.0, 1.0);
        let generator = PointGenerator::Step(StepGenerator::new(model, "mm").unwrap());
        let descriptor = generator.describe();

        assert_eq!(descriptor.generators.len(), 1);
        let line = &descriptor.generators[0];
        assert_eq!(line.axes, vec!["Temperature"]);
        assert_eq!(line.units, vec!["mm"]);
        assert_eq!(line.start, vec![290.0]);
        assert_eq!(line.stop, vec![295.0]);
        assert_eq!(line.size, 6);
        assert!(!line.alternate);
        assert!(descriptor.excluders.is_empty());
        assert!(descriptor.mutators.is_empty());
    }

    #[test]
    fn test_stop_is_last_visited_value() {
        let model = StepModel::new("x", 1.0, 4.2, 0.6);
        let generator = PointGenerator::Step(StepGenerator::new(model, "mm").unwrap());
        let stop = generator.describe().generators[0].stop[0];
        assert!((stop - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_multi_step_one_line_per_segment() {
        let model = MultiStepModel::new("energy")
            .with_units("eV")
            .with_step(StepModel::new("energy", 1.0, 2.0, 1.0))
            .with_step(StepModel::new("energy", 5.0, 7.0, 1.0));
        let generator = PointGenerator::MultiStep(MultiStepGenerator::new(model, "mm").unwrap());
        let descriptor = generator.describe();
        let sizes: Vec<usize> = descriptor.generators.iter().map(|l| l.size).collect();
        assert_eq!(sizes, vec![2, 3]);
        assert!(descriptor.generators.iter().all(|l| l.units == vec!["eV"]));
    }

    #[test]
    fn test_grid_lines_and_excluder() {
        let model = GridModel::new("x", "y")
            .with_points(4, 2)
            .with_bounding_box(BoundingBox::new(0.0, 10.0, 4.0, 2.0))
            .with_snake(true);
        let region = BoundRegion::from(ScanRegion::new(
            "x",
            "y",
            RegionShape::circle(2.0, 11.0, 5.0),
        ));
        let grid = GridGenerator::new(model, vec![region], "mm", MAX_SCAN_POINTS).unwrap();
        let descriptor = PointGenerator::Grid(grid).describe();

        assert_eq!(descriptor.axis_names(), vec!["y", "x"]);
        let slow = &descriptor.generators[0];
        assert_eq!((slow.start[0], slow.stop[0], slow.size), (10.5, 11.5, 2));
        assert!(!slow.alternate);
        let fast = &descriptor.generators[1];
        assert_eq!((fast.start[0], fast.stop[0], fast.size), (0.5, 3.5, 4));
        assert!(fast.alternate);

        assert_eq!(descriptor.excluders.len(), 1);
        assert_eq!(descriptor.excluders[0].kind, "circle");
        assert_eq!(descriptor.excluders[0].parameters["radius"], 5.0);
    }

    #[test]
    fn test_descriptor_json_round_trip() {
        let model = StepModel::new("x", 0.0, 1.0, 0.5);
        let generator = PointGenerator::Step(StepGenerator::new(model, "mm").unwrap());
        let descriptor = generator.describe();
        let back: GeneratorDescriptor = serde_json::from_value(descriptor.to_json()).unwrap();
        assert_eq!(back, descriptor);
    }
}
