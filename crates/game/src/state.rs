//! Game phases and the per-frame simulation step.
//!
//! `Simulation` owns everything that evolves with time but nothing that
//! touches the GPU or the audio device, so the whole flight/crash/restart
//! cycle can be driven from tests with a scripted `InputState`.

use engine_core::ControlInputs;
use glam::Vec3;
use input::InputState;
use physics::{Aircraft, AircraftParams, GroundContact};
use procgen::GroundConfig;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::camera_rig::ChaseCamera;
use crate::effects::{Explosion, SmokeEmitter};
use crate::environment::Environment;

/// Seconds between the impact and the game over screen.
pub const GAME_OVER_DELAY: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GamePhase {
    Flying,
    Paused,
    /// Wreck burning; `since` is the simulation clock at impact.
    Crashed { since: f32 },
    GameOver,
}

impl GamePhase {
    pub fn has_crashed(self) -> bool {
        matches!(self, GamePhase::Crashed { .. } | GamePhase::GameOver)
    }
}

/// Something the presentation layer reacts to (audio, logging).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    Paused,
    Resumed,
    Bounced,
    Crashed { position: Vec3, impact_speed: f32 },
    GameOver,
    Restarted,
}

pub struct Simulation {
    pub aircraft: Aircraft,
    pub phase: GamePhase,
    pub camera: ChaseCamera,
    pub explosion: Option<Explosion>,
    pub smoke: Option<SmokeEmitter>,
    pub environment: Environment,
    pub ground: GroundConfig,
    /// Simulated seconds since the current flight started. Frozen while paused.
    pub clock: f32,
    /// The aircraft model is hidden once it has blown up.
    pub model_visible: bool,
    params: AircraftParams,
    rng: StdRng,
}

impl Simulation {
    pub fn new(params: AircraftParams, camera: ChaseCamera, ground: GroundConfig, seed: u64) -> Self {
        let aircraft = Aircraft::new(params);
        let mut camera = camera;
        camera.snap_to(aircraft.position, aircraft.attitude.forward());
        Self {
            aircraft,
            phase: GamePhase::Flying,
            camera,
            explosion: None,
            smoke: None,
            environment: Environment::default(),
            ground,
            clock: 0.0,
            model_visible: true,
            params,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Fresh aircraft at the spawn point; scenery and time of day carry over.
    pub fn restart(&mut self) {
        self.aircraft = Aircraft::new(self.params);
        self.phase = GamePhase::Flying;
        self.explosion = None;
        self.smoke = None;
        self.clock = 0.0;
        self.model_visible = true;
        self.camera
            .snap_to(self.aircraft.position, self.aircraft.attitude.forward());
        log::info!("Restarting flight");
    }

    /// Advance one frame. `dt` is already clamped by the frame clock.
    pub fn step(&mut self, dt: f32, input: &InputState) -> Vec<SimEvent> {
        let mut events = Vec::new();

        if input.is_pause_pressed() {
            match self.phase {
                GamePhase::Flying => {
                    self.phase = GamePhase::Paused;
                    log::info!("Paused");
                    events.push(SimEvent::Paused);
                }
                GamePhase::Paused => {
                    self.phase = GamePhase::Flying;
                    log::info!("Resumed");
                    events.push(SimEvent::Resumed);
                }
                _ => {}
            }
        }
        if self.phase == GamePhase::Paused {
            return events;
        }

        if self.phase == GamePhase::GameOver && input.is_restart_pressed() {
            self.restart();
            events.push(SimEvent::Restarted);
            return events;
        }

        self.clock += dt;

        // Ground first, so a crash this frame already falls ballistically.
        if self.phase == GamePhase::Flying {
            let position = self.aircraft.position;
            let ground_height = self.ground.height_at(position.x, position.z);
            match self.aircraft.check_ground_collision(ground_height) {
                GroundContact::Crashed { impact_speed } => {
                    self.on_crash(position, impact_speed);
                    events.push(SimEvent::Crashed {
                        position,
                        impact_speed,
                    });
                }
                GroundContact::Bounced => events.push(SimEvent::Bounced),
                GroundContact::Clear => {}
            }
        }

        let controls = if self.phase == GamePhase::Flying {
            input.flight_controls()
        } else {
            ControlInputs::default()
        };
        self.aircraft.update(dt, &controls, &mut self.rng);

        if self.camera.is_in_crash_view() {
            self.camera.update_crash(dt);
        } else {
            self.camera
                .follow(dt, self.aircraft.position, self.aircraft.attitude.forward());
        }

        if let Some(explosion) = &mut self.explosion {
            explosion.update(dt);
            if !explosion.is_active() {
                self.explosion = None;
            }
        }
        if let Some(smoke) = &mut self.smoke {
            smoke.update(dt, self.environment.weather.wind(), &mut self.rng);
        }

        self.environment.update(dt);

        if let GamePhase::Crashed { since } = self.phase {
            if self.clock - since >= GAME_OVER_DELAY {
                self.phase = GamePhase::GameOver;
                log::info!("Game over");
                events.push(SimEvent::GameOver);
            }
        }

        events
    }

    fn on_crash(&mut self, position: Vec3, impact_speed: f32) {
        log::info!("Aircraft destroyed at {position:?} ({impact_speed:.1} m/s vertical)");
        self.phase = GamePhase::Crashed { since: self.clock };
        self.explosion = Some(Explosion::new(position, &mut self.rng));
        self.smoke = Some(SmokeEmitter::new(position));
        self.model_visible = false;
        self.camera.start_crash_transition(position);
    }
}
