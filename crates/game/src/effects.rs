//! Crash effects: the fireball burst and the smoke plume that rises from the wreck.

use engine_core::rgb_hex;
use glam::Vec3;
use rand::Rng;
use renderer::PointLight;
use std::collections::VecDeque;
use std::f32::consts::{PI, TAU};

pub const EXPLOSION_PARTICLES: usize = 1000;
pub const EXPLOSION_RADIUS: f32 = 30.0;
pub const EXPLOSION_LIGHT_COLOR: u32 = 0xff5500;
pub const EXPLOSION_LIGHT_INTENSITY: f32 = 5.0;
pub const EXPLOSION_LIGHT_RANGE: f32 = 100.0;
pub const FLARE_RADIUS: f32 = 10.0;
pub const FLARE_COLOR: u32 = 0xff7700;
pub const FLARE_OPACITY: f32 = 0.7;

pub struct ExplosionParticle {
    /// Offset from the explosion centre before the burst scale is applied.
    pub offset: Vec3,
    pub color: Vec3,
    pub size: f32,
}

/// Fireball: a ball of coloured sparks that swells and fades, a flare sphere
/// and an orange point light. Everything is a function of its age.
pub struct Explosion {
    pub position: Vec3,
    pub particles: Vec<ExplosionParticle>,
    pub age: f32,
}

impl Explosion {
    pub fn new<R: Rng>(position: Vec3, rng: &mut R) -> Self {
        let particles = (0..EXPLOSION_PARTICLES)
            .map(|_| {
                let radius = rng.gen::<f32>() * EXPLOSION_RADIUS;
                let theta = rng.gen::<f32>() * TAU;
                let phi = rng.gen::<f32>() * PI;
                let offset = Vec3::new(
                    radius * phi.sin() * theta.cos(),
                    radius * phi.sin() * theta.sin(),
                    radius * phi.cos(),
                );

                let kind = rng.gen::<f32>();
                let r = rng.gen::<f32>();
                let color = if kind < 0.6 {
                    // Fire
                    Vec3::new(0.7 + r * 0.3, r * 0.5, 0.0)
                } else if kind < 0.9 {
                    // Sparks
                    Vec3::new(0.8 + r * 0.2, 0.8 + r * 0.2, 0.0)
                } else {
                    // Smoke
                    Vec3::splat(0.2 + r * 0.5)
                };

                ExplosionParticle {
                    offset,
                    color,
                    size: 2.0 + rng.gen::<f32>() * 8.0,
                }
            })
            .collect();

        Self {
            position,
            particles,
            age: 0.0,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.age += dt;
    }

    pub fn scale(&self) -> f32 {
        1.0 + self.age * 2.0
    }

    pub fn opacity(&self) -> f32 {
        (1.5 - self.age).max(0.0)
    }

    pub fn light_intensity(&self) -> f32 {
        (EXPLOSION_LIGHT_INTENSITY - self.age * 5.0).max(0.0)
    }

    pub fn flare_opacity(&self) -> f32 {
        (FLARE_OPACITY - self.age).max(0.0)
    }

    pub fn flare_scale(&self) -> f32 {
        (4.0 - self.age * 3.0).max(1.0)
    }

    pub fn is_active(&self) -> bool {
        self.opacity() > 0.0
    }

    /// World position of a particle at the current burst scale.
    pub fn particle_position(&self, particle: &ExplosionParticle) -> Vec3 {
        self.position + particle.offset * self.scale()
    }

    /// The explosion light while it is still lit.
    pub fn point_light(&self) -> Option<PointLight> {
        let intensity = self.light_intensity();
        (intensity > 0.0).then(|| PointLight {
            position: self.position,
            color: rgb_hex(EXPLOSION_LIGHT_COLOR),
            intensity,
            range: EXPLOSION_LIGHT_RANGE,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmokeParticle {
    pub position: Vec3,
    pub velocity: Vec3,
    pub age: f32,
}

/// Continuous particle emitter. New particles leave the origin at `rate` per
/// second with `velocity` plus some jitter, drift with the wind and fade out
/// over `lifetime`. Past `max_particles` the oldest are dropped first.
pub struct SmokeEmitter {
    pub origin: Vec3,
    pub rate: f32,
    pub lifetime: f32,
    pub velocity: Vec3,
    pub size: f32,
    pub color: Vec3,
    pub max_particles: usize,
    pub emitting: bool,
    particles: VecDeque<SmokeParticle>,
    spawn_accumulator: f32,
}

impl SmokeEmitter {
    pub fn new(origin: Vec3) -> Self {
        Self {
            origin,
            rate: 60.0,
            lifetime: 4.0,
            velocity: Vec3::new(0.0, 8.0, 0.0),
            size: 4.0,
            color: rgb_hex(0x444444),
            max_particles: 1000,
            emitting: true,
            particles: VecDeque::new(),
            spawn_accumulator: 0.0,
        }
    }

    pub fn update<R: Rng>(&mut self, dt: f32, wind: Vec3, rng: &mut R) {
        if self.emitting {
            self.spawn_accumulator += self.rate * dt;
            while self.spawn_accumulator >= 1.0 {
                self.spawn_accumulator -= 1.0;
                let jitter = Vec3::new(
                    rng.gen::<f32>() - 0.5,
                    rng.gen::<f32>() - 0.5,
                    rng.gen::<f32>() - 0.5,
                ) * 4.0;
                self.particles.push_back(SmokeParticle {
                    position: self.origin,
                    velocity: self.velocity + jitter,
                    age: 0.0,
                });
                if self.particles.len() > self.max_particles {
                    self.particles.pop_front();
                }
            }
        }

        for p in &mut self.particles {
            p.age += dt;
            p.position += (p.velocity + wind) * dt;
        }
        let lifetime = self.lifetime;
        self.particles.retain(|p| p.age < lifetime);
    }

    pub fn particles(&self) -> impl Iterator<Item = &SmokeParticle> {
        self.particles.iter()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn opacity(&self, particle: &SmokeParticle) -> f32 {
        (1.0 - particle.age / self.lifetime).clamp(0.0, 1.0)
    }

    /// Puffs swell to twice their size as they age.
    pub fn particle_size(&self, particle: &SmokeParticle) -> f32 {
        self.size * (1.0 + particle.age / self.lifetime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn explosion() -> Explosion {
        Explosion::new(Vec3::new(5.0, 0.0, 5.0), &mut StdRng::seed_from_u64(3))
    }

    #[test]
    fn particles_fill_the_burst_sphere() {
        let e = explosion();
        assert_eq!(e.particles.len(), EXPLOSION_PARTICLES);
        for p in &e.particles {
            assert!(p.offset.length() < EXPLOSION_RADIUS + 1e-3);
            assert!((2.0..10.0).contains(&p.size));
            assert!(p.color.min_element() >= 0.0 && p.color.max_element() <= 1.0);
        }
    }

    #[test]
    fn colour_mix_is_mostly_fire() {
        let e = explosion();
        let fire = e
            .particles
            .iter()
            .filter(|p| p.color.x >= 0.7 && p.color.y <= 0.5 && p.color.z == 0.0)
            .count();
        let smoke = e
            .particles
            .iter()
            .filter(|p| p.color.x == p.color.y && p.color.y == p.color.z)
            .count();
        assert!((500..700).contains(&fire), "fire = {fire}");
        assert!((50..150).contains(&smoke), "smoke = {smoke}");
    }

    #[test]
    fn age_curves() {
        let mut e = explosion();
        assert_eq!(e.scale(), 1.0);
        assert_eq!(e.flare_scale(), 4.0);
        assert_eq!(e.light_intensity(), 5.0);

        e.update(0.5);
        assert!((e.scale() - 2.0).abs() < 1e-6);
        assert!((e.opacity() - 1.0).abs() < 1e-6);
        assert!((e.light_intensity() - 2.5).abs() < 1e-6);
        assert!((e.flare_opacity() - 0.2).abs() < 1e-6);
        assert!((e.flare_scale() - 2.5).abs() < 1e-6);

        e.update(0.5);
        assert_eq!(e.light_intensity(), 0.0);
        assert!(e.point_light().is_none());
        assert_eq!(e.flare_opacity(), 0.0);
        assert_eq!(e.flare_scale(), 1.0);
        assert!(e.is_active());
    }

    #[test]
    fn explosion_burns_out_after_one_and_a_half_seconds() {
        let mut e = explosion();
        for _ in 0..89 {
            e.update(1.0 / 60.0);
        }
        assert!(e.is_active());
        e.update(2.0 / 60.0);
        assert!(!e.is_active());
    }

    #[test]
    fn particles_scale_with_burst() {
        let mut e = explosion();
        e.update(1.0);
        let p = &e.particles[0];
        assert!(e.particle_position(p).distance(e.position + p.offset * 3.0) < 1e-4);
    }

    #[test]
    fn smoke_fades_and_expires() {
        let mut smoke = SmokeEmitter::new(Vec3::ZERO);
        let mut rng = StdRng::seed_from_u64(1);
        smoke.update(0.5, Vec3::ZERO, &mut rng);
        assert_eq!(smoke.len(), 30);

        smoke.emitting = false;
        let first = *smoke.particles().next().unwrap();
        assert!((smoke.opacity(&first) - 0.875).abs() < 1e-4);

        smoke.update(4.0, Vec3::ZERO, &mut rng);
        assert!(smoke.is_empty());
    }

    #[test]
    fn smoke_evicts_oldest_when_full() {
        let mut smoke = SmokeEmitter::new(Vec3::ZERO);
        smoke.max_particles = 10;
        smoke.lifetime = 100.0;
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..20 {
            smoke.update(0.1, Vec3::ZERO, &mut rng);
        }
        assert_eq!(smoke.len(), 10);
        // Everything left was spawned recently.
        assert!(smoke.particles().all(|p| p.age < 1.0));
    }

    #[test]
    fn wind_carries_smoke() {
        let mut smoke = SmokeEmitter::new(Vec3::ZERO);
        smoke.velocity = Vec3::ZERO;
        let mut rng = StdRng::seed_from_u64(4);
        smoke.update(1.0 / 60.0, Vec3::ZERO, &mut rng);
        smoke.emitting = false;
        let before: Vec<Vec3> = smoke.particles().map(|p| p.position).collect();
        smoke.update(1.0, Vec3::new(10.0, 0.0, 0.0), &mut rng);
        for (b, p) in before.iter().zip(smoke.particles()) {
            assert!(p.position.x - b.x > 7.9);
        }
    }
}
