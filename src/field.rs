// The particle background: a fixed-size pool of shrinking dots, redrawn once per
// display frame. Spent dots are swapped for fresh ones inside the same step so the
// pool never changes size once started.

use crate::config::FieldConfig;
use crate::particle::Particle;
use crate::renderer::Surface;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Asks the host for another call to [`ParticleField::step`] on the next frame.
pub trait FrameScheduler {
    fn request_frame(&mut self);
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FieldState {
    Uninitialized,
    Running,
}

pub struct ParticleField<R = StdRng> {
    config: FieldConfig,
    particles: Vec<Particle>,
    rng: R,
    width: f64,
    height: f64,
    state: FieldState,
}

impl ParticleField<StdRng> {
    pub fn from_entropy(config: FieldConfig, width: f64, height: f64) -> Self {
        ParticleField::with_rng(config, width, height, StdRng::from_entropy())
    }
}

impl<R: Rng> ParticleField<R> {
    pub fn with_rng(config: FieldConfig, width: f64, height: f64, rng: R) -> Self {
        ParticleField {
            particles: Vec::with_capacity(config.particle_count),
            config,
            rng,
            width,
            height,
            state: FieldState::Uninitialized,
        }
    }

    pub fn state(&self) -> FieldState {
        self.state
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn extent(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Fills the pool and runs the first frame. Only the first call does anything.
    pub fn start<S: Surface, F: FrameScheduler>(&mut self, surface: &mut S, frames: &mut F) {
        if self.state == FieldState::Running {
            log::warn!("particle field already running");
            return;
        }
        self.populate();
        self.state = FieldState::Running;
        log::debug!("particle field running with {} particles", self.particles.len());
        self.step(surface, frames);
    }

    /// One frame: clear, move, shrink, recycle, paint, then ask for the next frame.
    pub fn step<S: Surface, F: FrameScheduler>(&mut self, surface: &mut S, frames: &mut F) {
        if self.state != FieldState::Running {
            return;
        }
        surface.clear();

        let min_radius = self.config.min_radius;
        for i in 0..self.particles.len() {
            let particle = &mut self.particles[i];
            particle.advance();
            particle.decay(self.config.decay, min_radius);
            if particle.is_spent(min_radius) {
                self.particles[i] = Particle::spawn(&mut self.rng, &self.config, self.width, self.height);
            }
            let p = &self.particles[i];
            surface.fill_circle(p.pos, p.radius, self.config.color);
        }

        frames.request_frame();
    }

    /// New spawn extent. Live particles keep their positions.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    fn populate(&mut self) {
        let count = self.config.particle_count;
        self.particles.clear();
        self.particles.reserve(count);
        for _ in 0..count {
            let p = Particle::spawn(&mut self.rng, &self.config, self.width, self.height);
            self.particles.push(p);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use vecmath::Vector2;

    #[derive(Default)]
    struct RecordingSurface {
        clears: usize,
        circles: Vec<(Vector2<f64>, f64)>,
    }

    impl Surface for RecordingSurface {
        fn size(&self) -> (f64, f64) {
            (800.0, 600.0)
        }

        fn clear(&mut self) {
            self.clears += 1;
            self.circles.clear();
        }

        fn fill_circle(&mut self, center: Vector2<f64>, radius: f64, _color: Color) {
            self.circles.push((center, radius));
        }
    }

    #[derive(Default)]
    struct ManualStepper {
        requested: usize,
    }

    impl FrameScheduler for ManualStepper {
        fn request_frame(&mut self) {
            self.requested += 1;
        }
    }

    fn running_field(seed: u64) -> (ParticleField, RecordingSurface, ManualStepper) {
        let mut field = ParticleField::with_rng(
            FieldConfig::default(),
            800.0,
            600.0,
            StdRng::seed_from_u64(seed),
        );
        let mut surface = RecordingSurface::default();
        let mut frames = ManualStepper::default();
        field.start(&mut surface, &mut frames);
        (field, surface, frames)
    }

    #[test]
    fn starts_uninitialized_and_empty() {
        let field = ParticleField::with_rng(FieldConfig::default(), 800.0, 600.0, StdRng::seed_from_u64(1));
        assert_eq!(field.state(), FieldState::Uninitialized);
        assert!(field.particles().is_empty());
    }

    #[test]
    fn step_before_start_does_nothing() {
        let mut field = ParticleField::with_rng(FieldConfig::default(), 800.0, 600.0, StdRng::seed_from_u64(1));
        let mut surface = RecordingSurface::default();
        let mut frames = ManualStepper::default();
        field.step(&mut surface, &mut frames);
        assert_eq!(surface.clears, 0);
        assert_eq!(frames.requested, 0);
    }

    #[test]
    fn start_fills_pool_and_schedules_next_frame() {
        let (field, surface, frames) = running_field(2);
        assert_eq!(field.state(), FieldState::Running);
        assert_eq!(field.particles().len(), 100);
        assert_eq!(surface.clears, 1);
        assert_eq!(surface.circles.len(), 100);
        assert_eq!(frames.requested, 1);
    }

    #[test]
    fn second_start_is_ignored() {
        let (mut field, mut surface, mut frames) = running_field(3);
        let before = field.particles().to_vec();
        field.start(&mut surface, &mut frames);
        assert_eq!(field.particles(), &before[..]);
        assert_eq!(frames.requested, 1);
    }

    #[test]
    fn pool_size_is_constant_across_frames() {
        let (mut field, mut surface, mut frames) = running_field(4);
        for _ in 0..500 {
            field.step(&mut surface, &mut frames);
            assert_eq!(field.particles().len(), 100);
            assert_eq!(surface.circles.len(), 100);
        }
        assert_eq!(frames.requested, 501);
    }

    #[test]
    fn never_paints_at_or_below_threshold() {
        let (mut field, mut surface, mut frames) = running_field(5);
        for _ in 0..300 {
            field.step(&mut surface, &mut frames);
            assert!(surface.circles.iter().all(|&(_, r)| r > 0.2));
        }
    }

    #[test]
    fn radius_strictly_decreases_until_replaced() {
        let (mut field, mut surface, mut frames) = running_field(6);
        for _ in 0..200 {
            let before = field.particles().to_vec();
            field.step(&mut surface, &mut frames);
            for (old, new) in before.iter().zip(field.particles()) {
                if new.age == old.age + 1 {
                    assert!(new.radius < old.radius);
                } else {
                    assert_eq!(new.age, 0);
                }
            }
        }
    }

    #[test]
    fn position_is_previous_plus_velocity() {
        let (mut field, mut surface, mut frames) = running_field(7);
        let before = field.particles().to_vec();
        field.step(&mut surface, &mut frames);
        for (old, new) in before.iter().zip(field.particles()) {
            if new.age == 0 {
                continue;
            }
            assert_eq!(new.vel, old.vel);
            assert_eq!(new.pos, vecmath::vec2_add(old.pos, old.vel));
        }
    }

    #[test]
    fn spent_particles_are_replaced_by_fresh_ones() {
        let (mut field, mut surface, mut frames) = running_field(8);
        let originals = field.particles().to_vec();
        let frames_needed = field.config().max_lifetime_frames();
        for _ in 0..frames_needed {
            field.step(&mut surface, &mut frames);
        }
        assert_eq!(field.particles().len(), 100);
        // nothing from the first fill can still be alive
        assert!(field.particles().iter().all(|p| p.age < frames_needed + 1));
        assert!(field.particles().iter().any(|p| !originals.contains(p)));
    }

    #[test]
    fn resize_keeps_particles_in_place() {
        let (mut field, mut surface, mut frames) = running_field(9);
        let before = field.particles().to_vec();
        field.resize(320.0, 200.0);
        assert_eq!(field.extent(), (320.0, 200.0));
        assert_eq!(field.particles(), &before[..]);

        for _ in 0..field.config().max_lifetime_frames() {
            field.step(&mut surface, &mut frames);
        }
        assert_eq!(field.particles().len(), 100);
        for p in field.particles().iter().filter(|p| p.age == 0) {
            assert!(p.pos[0] < 320.0 && p.pos[1] < 200.0);
        }
    }
}
