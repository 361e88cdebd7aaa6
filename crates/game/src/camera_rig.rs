//! Chase camera: lagged follow behind the aircraft, then a scripted pull-back
//! onto the wreck after a crash.

use glam::Vec3;
use renderer::Camera;

/// Seconds for the crash pull-back.
pub const CRASH_TRANSITION_SECS: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq)]
enum RigMode {
    Follow,
    CrashTransition {
        from: Vec3,
        to: Vec3,
        focus: Vec3,
        elapsed: f32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChaseCamera {
    pub distance: f32,
    pub height: f32,
    /// Fraction of the remaining gap kept after 1/60 s.
    pub lag: f32,
    position: Vec3,
    target: Vec3,
    mode: RigMode,
}

fn ease_out_quad(t: f32) -> f32 {
    t * (2.0 - t)
}

impl ChaseCamera {
    pub fn new(distance: f32, height: f32, lag: f32) -> Self {
        Self {
            distance,
            height,
            lag,
            position: Vec3::ZERO,
            target: Vec3::ZERO,
            mode: RigMode::Follow,
        }
    }

    /// Where the camera wants to be for an aircraft at `position` heading `forward`.
    pub fn ideal_position(&self, position: Vec3, forward: Vec3) -> Vec3 {
        // Trails the nose: the crash view below also assumes the camera sits behind.
        position - forward * self.distance + Vec3::new(0.0, self.height, 0.0)
    }

    /// Jump straight to the ideal pose, no smoothing.
    pub fn snap_to(&mut self, position: Vec3, forward: Vec3) {
        self.position = self.ideal_position(position, forward);
        self.target = position;
        self.mode = RigMode::Follow;
    }

    /// Smoothed follow. Frame-rate independent: after `dt` the remaining gap
    /// is scaled by `lag^(dt * 60)`.
    pub fn follow(&mut self, dt: f32, position: Vec3, forward: Vec3) {
        if !matches!(self.mode, RigMode::Follow) {
            return;
        }
        let t = 1.0 - self.lag.powf(dt * 60.0);
        let ideal = self.ideal_position(position, forward);
        self.position = self.position.lerp(ideal, t);
        self.target = self.target.lerp(position, t);
    }

    /// Begin the pull-back onto `crash_position` from wherever the camera is now.
    pub fn start_crash_transition(&mut self, crash_position: Vec3) {
        let to = crash_position
            + Vec3::new(
                -self.distance * 0.5,
                self.height * 3.0,
                -self.distance * 2.5,
            );
        self.mode = RigMode::CrashTransition {
            from: self.position,
            to,
            focus: crash_position,
            elapsed: 0.0,
        };
    }

    /// Advance the crash pull-back. No-op while following.
    pub fn update_crash(&mut self, dt: f32) {
        if let RigMode::CrashTransition {
            from,
            to,
            focus,
            ref mut elapsed,
        } = self.mode
        {
            *elapsed = (*elapsed + dt).min(CRASH_TRANSITION_SECS);
            let t = ease_out_quad(*elapsed / CRASH_TRANSITION_SECS);
            self.position = from.lerp(to, t);
            self.target = focus;
        }
    }

    pub fn is_in_crash_view(&self) -> bool {
        matches!(self.mode, RigMode::CrashTransition { .. })
    }

    /// Progress of the crash pull-back in [0, 1], None while following.
    pub fn crash_progress(&self) -> Option<f32> {
        match self.mode {
            RigMode::CrashTransition { elapsed, .. } => Some(elapsed / CRASH_TRANSITION_SECS),
            RigMode::Follow => None,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Copy the rig pose into a render camera.
    pub fn apply(&self, camera: &mut Camera) {
        camera.position = self.position;
        camera.look_at(self.target);
    }
}

impl Default for ChaseCamera {
    fn default() -> Self {
        Self::new(50.0, 15.0, 0.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        a.distance(b) < 1e-3
    }

    #[test]
    fn ideal_position_sits_behind_and_above() {
        let rig = ChaseCamera::default();
        let ideal = rig.ideal_position(Vec3::new(0.0, 150.0, 0.0), Vec3::Z);
        assert!(close(ideal, Vec3::new(0.0, 165.0, -50.0)));
    }

    #[test]
    fn follow_converges_without_overshoot() {
        let mut rig = ChaseCamera::default();
        rig.snap_to(Vec3::ZERO, Vec3::Z);
        let plane = Vec3::new(100.0, 50.0, 300.0);
        let ideal = rig.ideal_position(plane, Vec3::Z);

        let mut last = rig.position().distance(ideal);
        for _ in 0..120 {
            rig.follow(1.0 / 60.0, plane, Vec3::Z);
            let d = rig.position().distance(ideal);
            assert!(d <= last + 1e-4);
            last = d;
        }
        assert!(last < 1e-2);
        assert!(close(rig.target(), plane));
    }

    #[test]
    fn follow_step_matches_lag_formula() {
        let mut rig = ChaseCamera::default();
        rig.snap_to(Vec3::ZERO, Vec3::Z);
        let start = rig.position();
        let plane = Vec3::new(0.0, 0.0, 100.0);
        let ideal = rig.ideal_position(plane, Vec3::Z);
        rig.follow(1.0 / 60.0, plane, Vec3::Z);
        // One 60 Hz frame closes 90% of the gap with lag 0.1.
        assert!(close(rig.position(), start.lerp(ideal, 0.9)));
    }

    #[test]
    fn crash_transition_reaches_explosion_view() {
        let mut rig = ChaseCamera::default();
        rig.snap_to(Vec3::new(0.0, 20.0, 0.0), Vec3::Z);
        let crash = Vec3::new(10.0, 5.0, 40.0);
        rig.start_crash_transition(crash);
        assert_eq!(rig.crash_progress(), Some(0.0));

        let mut elapsed = 0.0;
        while elapsed < CRASH_TRANSITION_SECS + 0.5 {
            rig.update_crash(0.1);
            elapsed += 0.1;
        }
        assert_eq!(rig.crash_progress(), Some(1.0));
        assert!(close(rig.position(), crash + Vec3::new(-25.0, 45.0, -125.0)));
        assert!(close(rig.target(), crash));
    }

    #[test]
    fn crash_transition_eases_out() {
        let mut rig = ChaseCamera::default();
        rig.snap_to(Vec3::ZERO, Vec3::Z);
        let from = rig.position();
        rig.start_crash_transition(Vec3::new(0.0, 0.0, 100.0));
        rig.update_crash(CRASH_TRANSITION_SECS * 0.5);
        let RigMode::CrashTransition { to, .. } = rig.mode else {
            panic!("expected crash mode");
        };
        // Halfway in time is three quarters of the way in space.
        assert!(close(rig.position(), from.lerp(to, 0.75)));
    }

    #[test]
    fn follow_is_ignored_during_crash_view() {
        let mut rig = ChaseCamera::default();
        rig.snap_to(Vec3::ZERO, Vec3::Z);
        rig.start_crash_transition(Vec3::ZERO);
        let before = rig.position();
        rig.follow(1.0, Vec3::splat(1000.0), Vec3::X);
        assert_eq!(rig.position(), before);
        assert!(rig.is_in_crash_view());
    }
}
