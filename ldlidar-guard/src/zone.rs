use crate::error::LidarError;
use crate::numeric::angle_in_range;
use ldlidar_data::{AnglePoint, Measurement, ZoneSnapshot, ZoneState};
use serde::{Deserialize, Serialize};

/// How a zone treats measurements from earlier frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationMode {
    /// Buckets keep their last measurement until the same degree is seen again.
    #[default]
    Persistent,
    /// Buckets are emptied before every frame.
    FrameScoped,
}

/// An angular sector watched for obstacles.
#[derive(Clone, Debug)]
pub struct Zone {
    name: String,
    angle_start: u16,
    angle_end: u16,
    threshold: u16,
    mode: AggregationMode,
    /// One slot per integer degree, starting at `angle_start`.
    buckets: Vec<Option<Measurement>>,
    state: ZoneState,
}

fn span(angle_start: u16, angle_end: u16) -> usize {
    if angle_start <= angle_end {
        (angle_end - angle_start) as usize + 1
    } else {
        (360 - angle_start + angle_end) as usize + 1
    }
}

impl Zone {
    /// # Arguments
    ///
    /// * `angle_start` / `angle_end` - Inclusive bounds in degrees. `angle_start > angle_end`
    ///   describes a sector that wraps through 0 degrees.
    /// * `threshold` - Distance in millimeters at or below which the zone activates.
    pub fn new(
        name: &str,
        angle_start: u16,
        angle_end: u16,
        threshold: u16,
        mode: AggregationMode,
    ) -> Result<Zone, LidarError> {
        if angle_start >= 360 || angle_end >= 360 {
            return Err(LidarError::InvalidConfig(format!(
                "zone \"{}\" must lie within [0, 360), got {}..{}",
                name, angle_start, angle_end
            )));
        }
        Ok(Zone {
            name: name.to_string(),
            angle_start,
            angle_end,
            threshold,
            mode,
            buckets: vec![None; span(angle_start, angle_end)],
            state: ZoneState::Inactive,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn angle_range(&self) -> (u16, u16) {
        (self.angle_start, self.angle_end)
    }

    pub fn threshold(&self) -> u16 {
        self.threshold
    }

    pub fn mode(&self) -> AggregationMode {
        self.mode
    }

    pub fn state(&self) -> ZoneState {
        self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut ZoneState {
        &mut self.state
    }

    pub fn wraps(&self) -> bool {
        self.angle_start > self.angle_end
    }

    /// Number of integer degrees covered by the zone.
    pub fn span(&self) -> usize {
        self.buckets.len()
    }

    pub fn contains(&self, angle: f64) -> bool {
        angle_in_range(angle, self.angle_start as f64, self.angle_end as f64)
    }

    fn bucket_index(&self, degree: u16) -> usize {
        (degree as i32 - self.angle_start as i32).rem_euclid(360) as usize
    }

    /// Stores the point if it falls within the zone. Returns whether it did.
    pub fn record(&mut self, point: &AnglePoint) -> bool {
        if !self.contains(point.angle) {
            return false;
        }
        let idx = self.bucket_index(point.angle.floor() as u16);
        match self.buckets.get_mut(idx) {
            Some(slot) => {
                *slot = Some(point.measurement);
                true
            }
            None => false,
        }
    }

    /// Last measurement stored for an integer degree of the zone.
    pub fn measurement_at(&self, degree: u16) -> Option<Measurement> {
        if degree >= 360 || !self.contains(degree as f64) {
            return None;
        }
        self.buckets
            .get(self.bucket_index(degree))
            .copied()
            .flatten()
    }

    /// Stored measurements with their degree, in angular order from `angle_start`.
    pub fn observations(&self) -> impl Iterator<Item = (u16, Measurement)> + '_ {
        self.buckets.iter().enumerate().filter_map(|(i, slot)| {
            slot.map(|m| (((self.angle_start as usize + i) % 360) as u16, m))
        })
    }

    pub fn clear(&mut self) {
        self.buckets.iter_mut().for_each(|slot| *slot = None);
    }

    /// True when any stored measurement is at or below the threshold.
    pub fn object_detected(&self) -> bool {
        self.buckets
            .iter()
            .flatten()
            .any(|m| m.distance <= self.threshold)
    }

    pub fn nearest(&self) -> Option<Measurement> {
        self.buckets.iter().flatten().min_by_key(|m| m.distance).copied()
    }

    pub fn snapshot(&self) -> ZoneSnapshot {
        ZoneSnapshot {
            name: self.name.clone(),
            state: self.state,
            observed_degrees: self.buckets.iter().flatten().count(),
            nearest_distance: self.nearest().map(|m| m.distance),
        }
    }
}

/// Sorts interpolated points into every zone that contains them.
///
/// Frame-scoped zones are emptied first, so after the call they only hold
/// points from `points`.
pub fn update_zones<I>(zones: &mut [Zone], points: I)
where
    I: IntoIterator<Item = AnglePoint>,
{
    zones
        .iter_mut()
        .filter(|z| z.mode == AggregationMode::FrameScoped)
        .for_each(Zone::clear);

    for point in points {
        for zone in zones.iter_mut() {
            zone.record(&point);
        }
    }
}
