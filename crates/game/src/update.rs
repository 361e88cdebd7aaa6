//! Per-frame update: clock, simulation step, and the audio that follows it.

use audio::{engine_playback_rate, engine_rpm, wind_volume, AudioSystem, MAX_ENGINE_RPM};

use crate::state::{GamePhase, SimEvent};
use crate::GameState;

const ENGINE_VOLUME: f64 = 0.5;

/// Sound names the simulator plays.
pub(crate) const SOUND_NAMES: [&str; 3] = ["engine", "wind", "crash"];

/// Names from [`SOUND_NAMES`] that `is_loaded` rejects.
pub(crate) fn missing_sounds(is_loaded: impl Fn(&str) -> bool) -> Vec<&'static str> {
    SOUND_NAMES.into_iter().filter(|name| !is_loaded(name)).collect()
}

/// Start the looping engine and wind sounds.
pub(crate) fn start_loops(audio: &mut AudioSystem) {
    for (name, volume) in [("engine", ENGINE_VOLUME), ("wind", 0.0)] {
        if let Err(e) = audio.play_loop(name, volume) {
            log::warn!("Could not start {} loop: {}", name, e);
        }
    }
}

impl GameState {
    pub(crate) fn update(&mut self) {
        self.time.update();
        let dt = self.time.delta_seconds();

        if self.input.is_quit_pressed() {
            log::info!("Quit requested");
            self.running = false;
        }

        let events = self.sim.step(dt, &self.input);
        for event in &events {
            self.on_sim_event(*event);
        }
        self.update_audio();

        self.input.begin_frame();
    }

    fn on_sim_event(&mut self, event: SimEvent) {
        let Some(audio) = &mut self.audio else { return };
        match event {
            SimEvent::Crashed { position, .. } => {
                audio.stop("engine");
                audio.stop("wind");
                if let Err(e) = audio.play_at_position("crash", position) {
                    log::warn!("Could not play crash sound: {}", e);
                }
            }
            SimEvent::Paused => {
                audio.set_loop_volume("engine", 0.0);
                audio.set_loop_volume("wind", 0.0);
            }
            SimEvent::Resumed => audio.set_loop_volume("engine", ENGINE_VOLUME),
            SimEvent::Restarted => start_loops(audio),
            SimEvent::Bounced => log::debug!("Bounced off the ground"),
            SimEvent::GameOver => {}
        }
    }

    fn update_audio(&mut self) {
        let Some(audio) = &mut self.audio else { return };
        if self.sim.phase == GamePhase::Flying {
            let aircraft = &self.sim.aircraft;
            audio.set_loop_rate(
                "engine",
                engine_playback_rate(engine_rpm(aircraft.throttle), MAX_ENGINE_RPM),
            );
            audio.set_loop_volume("wind", wind_volume(aircraft.speed, aircraft.params.max_speed));
        }
        audio.update_listener(self.camera.position, self.camera.forward(), glam::Vec3::Y);
        audio.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn missing_sounds_lists_unloaded_names() {
        let loaded: HashSet<&str> = ["engine", "crash"].into_iter().collect();
        assert_eq!(missing_sounds(|name| loaded.contains(name)), vec!["wind"]);
        assert!(missing_sounds(|_| true).is_empty());
        assert_eq!(missing_sounds(|_| false), SOUND_NAMES.to_vec());
    }
}
