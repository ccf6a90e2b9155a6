// Tunables for the particle background. Defaults reproduce the look of the
// original page: a hundred orange dots drifting slowly and shrinking away.

use crate::color::Color;
use std::ops::Range;

#[derive(Clone, Debug, PartialEq)]
pub struct FieldConfig {
    /// Size the pool is filled to and kept at.
    pub particle_count: usize,
    /// A particle whose radius reaches this value is spent and gets replaced.
    pub min_radius: f64,
    /// Spawn radius, sampled uniformly.
    pub radius_range: Range<f64>,
    /// Radius lost per frame.
    pub decay: f64,
    /// Per-axis speed bound, velocity components fall in `[-max_speed, max_speed)`.
    pub max_speed: f64,
    pub color: Color,
}

impl FieldConfig {
    pub const DEFAULT_PARTICLE_COUNT: usize = 100;

    /// Upper bound on the number of frames any particle can live.
    pub fn max_lifetime_frames(&self) -> u32 {
        ((self.radius_range.end - self.min_radius) / self.decay).ceil() as u32
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        FieldConfig {
            particle_count: FieldConfig::DEFAULT_PARTICLE_COUNT,
            min_radius: 0.2,
            radius_range: 2.0..7.0,
            decay: 0.1,
            max_speed: 0.25,
            color: Color::from_u32(0xff450080),
        }
    }
}
