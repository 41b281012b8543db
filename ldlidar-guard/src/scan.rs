use crate::numeric::{angle_in_range, normalize_degree};
use ldlidar_data::{AnglePoint, Frame, MEASUREMENTS_PER_FRAME};

/// Angular distance between two consecutive measurements of a frame.
///
/// An end angle that is not greater than the start angle means the sweep
/// crossed 0 degrees.
pub fn angle_step(start_angle: f64, end_angle: f64) -> f64 {
    let n_gaps = (MEASUREMENTS_PER_FRAME - 1) as f64;
    if end_angle > start_angle {
        (end_angle - start_angle) / n_gaps
    } else {
        (end_angle + 360. - start_angle) / n_gaps
    }
}

/// Lazily interpolated angles of one frame. Clone it to restart.
#[derive(Clone, Debug)]
pub struct AnglePoints<'a> {
    frame: &'a Frame,
    start_angle: f64,
    step: f64,
    index: usize,
}

impl Iterator for AnglePoints<'_> {
    type Item = AnglePoint;

    fn next(&mut self) -> Option<AnglePoint> {
        let measurement = *self.frame.measurements.get(self.index)?;
        let angle = normalize_degree(self.start_angle + self.step * (self.index as f64));
        self.index += 1;
        Some(AnglePoint { measurement, angle })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = MEASUREMENTS_PER_FRAME - self.index;
        (n, Some(n))
    }
}

impl ExactSizeIterator for AnglePoints<'_> {}

pub fn angles_for(frame: &Frame) -> AnglePoints<'_> {
    let start_angle = frame.start_angle();
    AnglePoints {
        frame,
        start_angle,
        step: angle_step(start_angle, frame.end_angle()),
        index: 0,
    }
}

/// Points of `frame` whose angle lies within `[start, end]`.
pub fn points_within(frame: &Frame, start: f64, end: f64) -> impl Iterator<Item = AnglePoint> + '_ {
    angles_for(frame).filter(move |p| angle_in_range(p.angle, start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_frame;

    fn angles(frame: &Frame) -> Vec<f64> {
        angles_for(frame).map(|p| p.angle).collect()
    }

    #[test]
    fn test_angle_step() {
        assert!(f64::abs(angle_step(210., 251.) - 41. / 11.) < 1e-12);
        assert!(f64::abs(angle_step(350., 10.) - 20. / 11.) < 1e-12);
        // Identical angles are treated as a full turn
        assert!(f64::abs(angle_step(90., 90.) - 360. / 11.) < 1e-12);
    }

    #[test]
    fn test_interpolation() {
        let frame = sample_frame(21000, 25400, [500; 12]);
        let expected = [
            210., 214., 218., 222., 226., 230., 234., 238., 242., 246., 250., 254.,
        ];
        let actual = angles(&frame);
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert!(f64::abs(a - e) < 1e-9, "{a} != {e}");
        }
    }

    #[test]
    fn test_interpolation_across_zero() {
        let frame = sample_frame(35000, 1000, [500; 12]);
        let actual = angles(&frame);
        assert_eq!(actual.len(), 12);
        assert!(actual.iter().all(|a| (0. ..360.).contains(a)));

        let crossings = actual.windows(2).filter(|w| w[1] < w[0]).count();
        assert_eq!(crossings, 1);

        // Non-decreasing once unwrapped
        let step = 20. / 11.;
        for (i, a) in actual.iter().enumerate() {
            let unwrapped = 350. + step * (i as f64);
            assert!(f64::abs(normalize_degree(unwrapped) - a) < 1e-9);
        }
        assert!(f64::abs(actual[0] - 350.) < 1e-9);
        assert!(f64::abs(actual[11] - 10.) < 1e-9);
    }

    #[test]
    fn test_measurements_keep_order() {
        let distances = [10, 20, 30, 40, 50, 60, 70, 80, 90, 100, 110, 120];
        let frame = sample_frame(0, 1100, distances);
        let points: Vec<AnglePoint> = angles_for(&frame).collect();
        for (i, p) in points.iter().enumerate() {
            assert_eq!(p.measurement.distance, distances[i]);
            assert!(f64::abs(p.angle - i as f64) < 1e-9);
        }
    }

    #[test]
    fn test_restartable() {
        let frame = sample_frame(35000, 1000, [500; 12]);
        let points = angles_for(&frame);
        assert_eq!(points.len(), 12);
        let first: Vec<AnglePoint> = points.clone().collect();
        let second: Vec<AnglePoint> = points.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_points_within() {
        let frame = sample_frame(20500, 26000, [500; 12]);
        // 205, 210, 215, ... 255, 260
        let angles: Vec<f64> = points_within(&frame, 210., 250.).map(|p| p.angle).collect();
        assert_eq!(angles.len(), 9);
        assert!(f64::abs(angles[0] - 210.) < 1e-9);
        assert!(f64::abs(angles[8] - 250.) < 1e-9);
    }
}
