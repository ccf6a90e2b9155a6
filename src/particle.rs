// Simple particle struct to keep track of individual position, velocity, and size.
// Velocity is fixed at spawn, the radius only ever shrinks.

use crate::config::FieldConfig;
use rand::Rng;
use vecmath::Vector2;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Particle {
    pub pos: Vector2<f64>,
    pub vel: Vector2<f64>,
    pub radius: f64,
    /// Frames survived since spawn.
    pub age: u32,
}

impl Particle {
    pub fn new(pos: Vector2<f64>, vel: Vector2<f64>, radius: f64) -> Particle {
        Particle {
            pos,
            vel,
            radius,
            age: 0,
        }
    }

    /// Fresh particle somewhere inside a `width` x `height` surface.
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, config: &FieldConfig, width: f64, height: f64) -> Particle {
        let pos = [rng.gen::<f64>() * width, rng.gen::<f64>() * height];
        let speed = config.max_speed;
        let vel = [
            rng.gen_range(-speed, speed),
            rng.gen_range(-speed, speed),
        ];
        let radius = rng.gen_range(config.radius_range.start, config.radius_range.end);
        Particle::new(pos, vel, radius)
    }

    pub fn advance(&mut self) {
        self.pos = vecmath::vec2_add(self.pos, self.vel);
        self.age += 1;
    }

    pub fn decay(&mut self, amount: f64, min_radius: f64) {
        self.radius = (self.radius - amount).max(min_radius);
    }

    pub fn is_spent(&self, min_radius: f64) -> bool {
        self.radius <= min_radius
    }
}
