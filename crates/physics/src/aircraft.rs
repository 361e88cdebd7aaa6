//! Aircraft state and the per-frame kinematic update.

use crate::GRAVITY;
use engine_core::{Attitude, ControlInputs};
use glam::{Quat, Vec3};
use rand::Rng;
use std::f32::consts::{FRAC_PI_3, FRAC_PI_4};

/// Spawn point of every flight.
pub const SPAWN_POSITION: Vec3 = Vec3::new(0.0, 150.0, 0.0);
/// Velocity at spawn, straight ahead along +Z.
pub const SPAWN_VELOCITY: Vec3 = Vec3::new(0.0, 0.0, 50.0);

/// Tuning for one aircraft type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AircraftParams {
    pub min_speed: f32,
    pub max_speed: f32,
    /// Speed reported before the first update.
    pub initial_speed: f32,
    pub initial_throttle: f32,
    /// Radians per second at full deflection.
    pub pitch_rate: f32,
    pub roll_rate: f32,
    pub yaw_rate: f32,
    /// Throttle fraction per second.
    pub throttle_rate: f32,
    pub max_pitch: f32,
    pub max_roll: f32,
    /// Per-frame roll multiplier pulling the wings back to level.
    pub roll_damping: f32,
    pub min_throttle: f32,
    pub max_throttle: f32,
}

impl AircraftParams {
    /// The default arcade handling.
    pub fn arcade() -> Self {
        Self {
            min_speed: 50.0,
            max_speed: 200.0,
            initial_speed: 100.0,
            initial_throttle: 0.5,
            pitch_rate: 0.8,
            roll_rate: 1.2,
            yaw_rate: 0.5,
            throttle_rate: 0.2,
            max_pitch: FRAC_PI_4,
            max_roll: FRAC_PI_3,
            roll_damping: 0.98,
            min_throttle: 0.1,
            max_throttle: 1.0,
        }
    }

    /// Light single-engine trainer: slower envelope, same handling.
    pub fn cessna172() -> Self {
        Self {
            min_speed: 40.0,
            max_speed: 140.0,
            initial_speed: 90.0,
            ..Self::arcade()
        }
    }

    /// Speed the engine settles at for a throttle setting.
    pub fn speed_for_throttle(&self, throttle: f32) -> f32 {
        self.min_speed + (self.max_speed - self.min_speed) * throttle
    }
}

impl Default for AircraftParams {
    fn default() -> Self {
        Self::arcade()
    }
}

/// Snapshot of the flight state for the HUD.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightInfo {
    pub speed: f32,
    /// Vertical velocity scaled by 60 (per-minute readout).
    pub vertical_speed: f32,
    pub altitude: f32,
    /// Throttle fraction in [0, 1].
    pub throttle: f32,
    pub pitch_deg: f32,
    pub roll_deg: f32,
    pub yaw_deg: f32,
    pub crashed: bool,
}

/// The player aircraft.
#[derive(Debug, Clone)]
pub struct Aircraft {
    pub params: AircraftParams,
    pub position: Vec3,
    pub attitude: Attitude,
    pub velocity: Vec3,
    pub throttle: f32,
    pub speed: f32,
    pub crashed: bool,
    /// Extra rotation of the visual model after a crash. Purely cosmetic.
    pub tumble: Vec3,
}

impl Aircraft {
    pub fn new(params: AircraftParams) -> Self {
        Self {
            params,
            position: SPAWN_POSITION,
            attitude: Attitude::default(),
            velocity: SPAWN_VELOCITY,
            throttle: params.initial_throttle,
            speed: params.initial_speed,
            crashed: false,
            tumble: Vec3::ZERO,
        }
    }

    /// Advance the aircraft by `dt` seconds.
    ///
    /// A crashed aircraft ignores the controls and falls ballistically while
    /// its model tumbles. `rng` only feeds the tumble.
    pub fn update<R: Rng>(&mut self, dt: f32, controls: &ControlInputs, rng: &mut R) {
        if self.crashed {
            self.velocity.y -= GRAVITY * dt;
            self.position += self.velocity * dt;
            self.tumble.x += rng.gen::<f32>() * 0.1;
            self.tumble.z += rng.gen::<f32>() * 0.1;
            return;
        }

        let p = &self.params;
        let att = &mut self.attitude;
        att.pitch += controls.pitch * p.pitch_rate * dt;
        att.roll += controls.roll * p.roll_rate * dt;
        att.yaw += controls.yaw * p.yaw_rate * dt;

        att.pitch = att.pitch.clamp(-p.max_pitch, p.max_pitch);
        att.roll = att.roll.clamp(-p.max_roll, p.max_roll);
        att.roll *= p.roll_damping;

        self.throttle = (self.throttle + controls.throttle * p.throttle_rate * dt)
            .clamp(p.min_throttle, p.max_throttle);
        self.speed = p.speed_for_throttle(self.throttle);

        self.velocity = self.attitude.forward() * self.speed;
        self.velocity.y -= GRAVITY * dt * 2.0;
        self.position += self.velocity * dt;
    }

    /// Rotation of the visual model, tumble included.
    pub fn model_rotation(&self) -> Quat {
        let tumble = Attitude::new(self.tumble.x, 0.0, self.tumble.z);
        self.attitude.to_quat() * tumble.to_quat()
    }

    pub fn info(&self) -> FlightInfo {
        let (pitch_deg, roll_deg, yaw_deg) = self.attitude.degrees();
        FlightInfo {
            speed: self.speed,
            vertical_speed: self.velocity.y * 60.0,
            altitude: self.position.y,
            throttle: self.throttle,
            pitch_deg,
            roll_deg,
            yaw_deg,
            crashed: self.crashed,
        }
    }
}

impl Default for Aircraft {
    fn default() -> Self {
        Self::new(AircraftParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const DT: f32 = 1.0 / 60.0;

    fn random_controls(rng: &mut StdRng) -> ControlInputs {
        let axis = |rng: &mut StdRng| [-1.0, -0.5, 0.0, 0.5, 1.0, 1.5, -1.5][rng.gen_range(0..7)];
        ControlInputs {
            pitch: axis(rng),
            roll: axis(rng),
            yaw: axis(rng),
            throttle: axis(rng),
        }
    }

    #[test]
    fn spawn_state() {
        let a = Aircraft::default();
        assert_eq!(a.position, Vec3::new(0.0, 150.0, 0.0));
        assert_eq!(a.velocity, Vec3::new(0.0, 0.0, 50.0));
        assert_eq!(a.throttle, 0.5);
        assert_eq!(a.speed, 100.0);
        assert!(!a.crashed);
    }

    #[test]
    fn speed_stays_in_envelope() {
        let mut rng = StdRng::seed_from_u64(7);
        for params in [AircraftParams::arcade(), AircraftParams::cessna172()] {
            let mut a = Aircraft::new(params);
            for _ in 0..2000 {
                let controls = random_controls(&mut rng);
                let dt = rng.gen_range(0.0..0.1);
                a.update(dt, &controls, &mut rng);
                assert!(a.speed >= params.min_speed - 1e-3, "speed {}", a.speed);
                assert!(a.speed <= params.max_speed + 1e-3, "speed {}", a.speed);
            }
        }
    }

    #[test]
    fn attitude_stays_clamped() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut a = Aircraft::default();
        for _ in 0..5000 {
            let controls = random_controls(&mut rng);
            a.update(0.1, &controls, &mut rng);
            assert!(a.attitude.pitch.abs() <= FRAC_PI_4 + 1e-6);
            assert!(a.attitude.roll.abs() <= FRAC_PI_3 + 1e-6);
            assert!(a.throttle >= 0.1 && a.throttle <= 1.0);
        }
    }

    #[test]
    fn full_throttle_reaches_max_speed() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut a = Aircraft::default();
        let up = ControlInputs { throttle: 1.0, ..Default::default() };
        for _ in 0..60 {
            a.update(0.1, &up, &mut rng);
        }
        assert_eq!(a.throttle, 1.0);
        assert_eq!(a.speed, 200.0);
    }

    #[test]
    fn throttle_floor_is_ten_percent() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut a = Aircraft::default();
        let down = ControlInputs { throttle: -1.0, ..Default::default() };
        for _ in 0..60 {
            a.update(0.1, &down, &mut rng);
        }
        assert!((a.throttle - 0.1).abs() < 1e-6);
        assert!((a.speed - 65.0).abs() < 1e-3);
    }

    #[test]
    fn roll_decays_without_input() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut a = Aircraft::default();
        a.attitude.roll = 0.5;
        a.update(DT, &ControlInputs::default(), &mut rng);
        assert!((a.attitude.roll - 0.49).abs() < 1e-6);
    }

    #[test]
    fn level_flight_integrates_velocity() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut a = Aircraft::default();
        a.update(0.1, &ControlInputs::default(), &mut rng);
        // throttle 0.5 -> 125 m/s along +Z, minus the doubled gravity bias
        assert!((a.velocity.z - 125.0).abs() < 1e-3);
        assert!((a.velocity.y + 1.96).abs() < 1e-4);
        assert!((a.position.z - 12.5).abs() < 1e-3);
        assert!((a.position.y - (150.0 - 0.196)).abs() < 1e-3);
    }

    #[test]
    fn nose_up_climbs() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut a = Aircraft::default();
        let up = ControlInputs { pitch: -1.0, ..Default::default() };
        for _ in 0..30 {
            a.update(DT, &up, &mut rng);
        }
        assert!(a.attitude.pitch < 0.0);
        assert!(a.velocity.y > 0.0);
    }

    #[test]
    fn crashed_aircraft_ignores_controls_and_falls() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut a = Aircraft::default();
        a.crashed = true;
        a.velocity = Vec3::new(0.0, -20.0, 40.0);
        let attitude = a.attitude;
        let throttle = a.throttle;
        let full = ControlInputs { pitch: 1.0, roll: 1.0, yaw: 1.0, throttle: 1.0 };
        a.update(0.1, &full, &mut rng);
        assert_eq!(a.attitude, attitude);
        assert_eq!(a.throttle, throttle);
        assert!((a.velocity.y + 20.98).abs() < 1e-4);
        assert!((a.velocity.z - 40.0).abs() < 1e-6);
        assert!(a.tumble.x >= 0.0 && a.tumble.x < 0.1);
    }

    #[test]
    fn info_reports_degrees_and_scaled_climb() {
        let mut a = Aircraft::default();
        a.velocity.y = 2.0;
        a.attitude.pitch = FRAC_PI_4;
        let info = a.info();
        assert!((info.vertical_speed - 120.0).abs() < 1e-4);
        assert!((info.pitch_deg - 45.0).abs() < 1e-4);
        assert_eq!(info.altitude, 150.0);
        assert!(!info.crashed);
    }
}
