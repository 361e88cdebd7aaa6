//! Ground impact policy.

use crate::aircraft::Aircraft;

/// Height the aircraft is held above the ground surface.
pub const GROUND_CLEARANCE: f32 = 10.0;
/// Vertical speed above which touching the ground is a crash.
pub const CRASH_SPEED: f32 = 10.0;
/// Fraction of the vertical speed kept on a soft bounce.
pub const BOUNCE_FACTOR: f32 = 0.3;

/// Result of a ground check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GroundContact {
    /// Above the clearance height, or already crashed.
    Clear,
    /// Soft touch: the aircraft was lifted back and bounced.
    Bounced,
    /// Hard impact. The aircraft is now crashed for good.
    Crashed { impact_speed: f32 },
}

impl Aircraft {
    /// Check the aircraft against a ground surface at `ground_height`.
    ///
    /// Below the clearance height a vertical speed over [`CRASH_SPEED`]
    /// crashes the aircraft; anything softer snaps it back to the clearance
    /// height with a damped upward bounce. A crashed aircraft always reports
    /// [`GroundContact::Clear`].
    pub fn check_ground_collision(&mut self, ground_height: f32) -> GroundContact {
        if self.crashed {
            return GroundContact::Clear;
        }
        if self.position.y >= ground_height + GROUND_CLEARANCE {
            return GroundContact::Clear;
        }

        let impact_speed = self.velocity.y.abs();
        if impact_speed > CRASH_SPEED {
            log::info!("CRASH! Impact velocity: {impact_speed:.2}");
            self.crashed = true;
            GroundContact::Crashed { impact_speed }
        } else {
            self.position.y = ground_height + GROUND_CLEARANCE;
            self.velocity.y = self.velocity.y.abs() * BOUNCE_FACTOR;
            GroundContact::Bounced
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn at(y: f32, vy: f32) -> Aircraft {
        let mut a = Aircraft::default();
        a.position = Vec3::new(0.0, y, 0.0);
        a.velocity = Vec3::new(0.0, vy, 80.0);
        a
    }

    #[test]
    fn high_aircraft_is_clear() {
        let mut a = at(50.0, -30.0);
        assert_eq!(a.check_ground_collision(0.0), GroundContact::Clear);
        assert!(!a.crashed);
    }

    #[test]
    fn exactly_at_clearance_is_clear() {
        let mut a = at(10.0, -30.0);
        assert_eq!(a.check_ground_collision(0.0), GroundContact::Clear);
    }

    #[test]
    fn hard_impact_crashes_and_stays_crashed() {
        let mut a = at(5.0, -25.0);
        assert_eq!(
            a.check_ground_collision(0.0),
            GroundContact::Crashed { impact_speed: 25.0 }
        );
        assert!(a.crashed);

        let mut rng = <rand::rngs::StdRng as rand::SeedableRng>::seed_from_u64(1);
        for _ in 0..10 {
            a.update(0.1, &Default::default(), &mut rng);
            assert_eq!(a.check_ground_collision(0.0), GroundContact::Clear);
            assert!(a.crashed);
        }
    }

    #[test]
    fn soft_touch_bounces() {
        let mut a = at(42.0, -8.0);
        assert_eq!(a.check_ground_collision(35.0), GroundContact::Bounced);
        assert!(!a.crashed);
        assert_eq!(a.position.y, 45.0);
        assert!((a.velocity.y - 2.4).abs() < 1e-5);
    }

    #[test]
    fn impact_of_exactly_ten_bounces() {
        let mut a = at(0.0, -10.0);
        assert_eq!(a.check_ground_collision(0.0), GroundContact::Bounced);
        assert!((a.velocity.y - 3.0).abs() < 1e-5);
    }

    #[test]
    fn fast_climb_below_ground_also_crashes() {
        // impact uses |vy|, so a steep climb out of a dip still counts
        let mut a = at(-5.0, 12.0);
        assert!(matches!(a.check_ground_collision(0.0), GroundContact::Crashed { .. }));
    }
}
