//! Property-based checks of the generator size and ordering invariants.

mod common;

use common::square_grid;
use proptest::prelude::*;
use scan_points::{
    PointGenerator, PointGeneratorService, Position, RegionShape, ScanRegion, StepModel,
};

// -- Strategy helpers --

/// Step model with `count` values on axis `name`.
fn arb_step(name: &'static str) -> impl Strategy<Value = (StepModel, usize)> {
    (-100.0f64..100.0, 0.05f64..5.0, 1usize..8, any::<bool>()).prop_map(
        move |(start, step, count, descending)| {
            let step = if descending { -step } else { step };
            let stop = start + step * (count - 1) as f64;
            (StepModel::new(name, start, stop, step), count)
        },
    )
}

fn arb_circle() -> impl Strategy<Value = RegionShape> {
    (-1.0f64..4.0, -1.0f64..4.0, 0.1f64..3.0).prop_map(|(x, y, r)| RegionShape::circle(x, y, r))
}

fn build(model: StepModel) -> PointGenerator {
    PointGeneratorService::new().create_generator(model).unwrap()
}

proptest! {
    #[test]
    fn step_count_matches_span((model, count) in arb_step("x")) {
        let generator = build(model);
        prop_assert_eq!(generator.size(), count);
        prop_assert_eq!(generator.iter().count(), count);
    }

    /// Size is the product of member sizes and iteration yields exactly that many.
    #[test]
    fn compound_size_is_product(
        (a, na) in arb_step("a"),
        (b, nb) in arb_step("b"),
        (c, nc) in arb_step("c"),
    ) {
        let generator = PointGeneratorService::new()
            .create_compound_generator(vec![build(a), build(b), build(c)])
            .unwrap();
        prop_assert_eq!(generator.size(), na * nb * nc);
        prop_assert_eq!(generator.shape(), vec![na, nb, nc]);

        let positions: Vec<Position> = generator.iter().collect();
        prop_assert_eq!(positions.len(), generator.size());
        for (i, position) in positions.iter().enumerate() {
            prop_assert_eq!(position.step_index(), i);
            prop_assert_eq!(&generator.position_at(i).unwrap(), position);
        }
    }

    /// The construction-time pre-scan and the iteration pass keep the same points.
    #[test]
    fn filtered_size_matches_iteration(
        shape in arb_circle(),
        points in 1usize..25,
        snake in any::<bool>(),
    ) {
        let region = ScanRegion::new("x", "y", shape.clone());
        let model = square_grid("x", "y", points).with_snake(snake);
        let generator = PointGeneratorService::new()
            .create_generator_with_regions(model, [region])
            .unwrap();

        let positions: Vec<Position> = generator.iter().collect();
        prop_assert_eq!(positions.len(), generator.size());
        prop_assert_eq!(generator.shape(), vec![generator.size()]);
        for position in &positions {
            let x = position.get("x").unwrap();
            let y = position.get("y").unwrap();
            prop_assert!(scan_points::RegionTest::contains(&shape, x, y));
        }
    }

    /// Snake ordering permutes the raster without adding or dropping points.
    #[test]
    fn snake_is_a_permutation(points in 1usize..12) {
        let service = PointGeneratorService::new();
        let plain = service.create_generator(square_grid("x", "y", points)).unwrap();
        let snake = service
            .create_generator(square_grid("x", "y", points).with_snake(true))
            .unwrap();

        let key = |p: &Position| p.indices().to_vec();
        let mut a: Vec<Vec<usize>> = plain.iter().map(|p| key(&p)).collect();
        let mut b: Vec<Vec<usize>> = snake.iter().map(|p| key(&p)).collect();
        a.sort();
        b.sort();
        prop_assert_eq!(a, b);
    }
}
