//! Shared hard limits to prevent unbounded scans.

use crate::error::{GeneratorError, PointsResult};

/// Default maximum number of points in one scan.
pub const MAX_SCAN_POINTS: usize = 100_000_000;

/// Slack added to `(stop - start) / step` before flooring, so that spans such as
/// `0.3 / 0.1` count their final point.
pub const STEP_TOLERANCE: f64 = 1e-9;

/// Multiply member sizes together, failing on overflow.
pub fn checked_scan_size<I>(sizes: I) -> PointsResult<usize>
where
    I: IntoIterator<Item = usize>,
{
    sizes.into_iter().try_fold(1usize, |acc, size| {
        acc.checked_mul(size).ok_or(GeneratorError::SizeOverflow {
            context: "compound scan size",
        })
    })
}

/// Reject scans larger than `max_points`.
pub fn validate_scan_size(points: usize, max_points: usize) -> PointsResult<usize> {
    if points > max_points {
        return Err(GeneratorError::TooManyPoints { points, max_points });
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_scan_size() {
        assert_eq!(checked_scan_size([6, 6, 6]).unwrap(), 216);
        assert_eq!(checked_scan_size(std::iter::empty()).unwrap(), 1);
    }

    #[test]
    fn test_checked_scan_size_overflow() {
        let err = checked_scan_size([usize::MAX, 2]).unwrap_err();
        assert!(matches!(err, GeneratorError::SizeOverflow { .. }));
    }

    #[test]
    fn test_validate_scan_size() {
        assert!(validate_scan_size(400, 400).is_ok());
        let err = validate_scan_size(401, 400).unwrap_err();
        assert!(matches!(
            err,
            GeneratorError::TooManyPoints {
                points: 401,
                max_points: 400
            }
        ));
    }
}
