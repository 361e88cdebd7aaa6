//! Audio system using Kira: the engine drone, wind and spatial one-shots.
//!
//! Everything here is optional at runtime. A missing output device or sound
//! file is reported and the simulator carries on silently.

use anyhow::Result;
use engine_core::Vec3;
use kira::{
    manager::{backend::DefaultBackend, AudioManager, AudioManagerSettings},
    sound::{
        static_sound::{StaticSoundData, StaticSoundHandle, StaticSoundSettings},
        PlaybackRate, PlaybackState,
    },
    spatial::{
        emitter::{EmitterHandle, EmitterSettings},
        listener::{ListenerHandle, ListenerSettings},
        scene::{SpatialSceneHandle, SpatialSceneSettings},
    },
    tween::Tween,
};
use std::collections::HashMap;
use std::path::Path;

/// Sounds the simulator looks for in its sound directory.
pub const SOUND_NAMES: &[&str] = &["engine", "wind", "crash"];

/// File extensions tried, in order, for each sound name.
const SOUND_EXTENSIONS: &[&str] = &["ogg", "wav", "mp3", "flac"];

/// Nominal engine speed used to map throttle onto playback rate.
pub const MAX_ENGINE_RPM: f32 = 2700.0;

/// Engine RPM for a throttle fraction.
pub fn engine_rpm(throttle: f32) -> f32 {
    throttle.clamp(0.0, 1.0) * MAX_ENGINE_RPM
}

/// Playback rate of the engine loop: 0.5 at idle up to 1.5 at full RPM.
pub fn engine_playback_rate(rpm: f32, max_rpm: f32) -> f64 {
    if max_rpm <= 0.0 {
        return 0.5;
    }
    0.5 + (rpm / max_rpm) as f64
}

/// Wind loudness grows with airspeed.
pub fn wind_volume(speed: f32, max_speed: f32) -> f64 {
    if max_speed <= 0.0 {
        return 0.0;
    }
    (speed / max_speed).clamp(0.0, 1.0) as f64 * 0.6
}

/// Clamp a volume into [0, 1]. NaN is treated as silence.
pub fn clamp_volume(volume: f64) -> f64 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}

fn to_mint(v: Vec3) -> mint::Vector3<f32> {
    mint::Vector3 {
        x: v.x,
        y: v.y,
        z: v.z,
    }
}

/// One-shot sound, with its emitter kept alive while it plays.
struct ActiveSound {
    handle: StaticSoundHandle,
    _emitter: Option<EmitterHandle>,
}

/// Main audio system managing sounds and spatial audio.
pub struct AudioSystem {
    manager: AudioManager,
    spatial_scene: SpatialSceneHandle,
    listener: ListenerHandle,
    sounds: HashMap<String, StaticSoundData>,
    loops: HashMap<String, StaticSoundHandle>,
    active_sounds: Vec<ActiveSound>,
    master_volume: f64,
}

impl AudioSystem {
    /// Create a new audio system on the default output device.
    pub fn new() -> Result<Self> {
        let mut manager = AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())?;

        let mut spatial_scene = manager.add_spatial_scene(SpatialSceneSettings::default())?;

        let listener = spatial_scene.add_listener(
            to_mint(Vec3::ZERO),
            mint::Quaternion {
                v: mint::Vector3 {
                    x: 0.0,
                    y: 0.0,
                    z: 0.0,
                },
                s: 1.0,
            },
            ListenerSettings::default(),
        )?;

        Ok(Self {
            manager,
            spatial_scene,
            listener,
            sounds: HashMap::new(),
            loops: HashMap::new(),
            active_sounds: Vec::new(),
            master_volume: 1.0,
        })
    }

    /// Load a sound from a file.
    pub fn load_sound(&mut self, name: &str, path: &Path) -> Result<()> {
        let sound_data = StaticSoundData::from_file(path)?;
        self.sounds.insert(name.to_string(), sound_data);
        Ok(())
    }

    /// Load every name in [`SOUND_NAMES`] from `dir`, trying each known
    /// extension. Missing or undecodable files are logged and skipped.
    /// Returns how many sounds loaded.
    pub fn load_directory(&mut self, dir: &Path) -> usize {
        let mut loaded = 0;
        for name in SOUND_NAMES {
            let found = SOUND_EXTENSIONS
                .iter()
                .map(|ext| dir.join(format!("{name}.{ext}")))
                .find(|p| p.is_file());
            match found {
                Some(path) => match self.load_sound(name, &path) {
                    Ok(()) => {
                        log::debug!("Loaded sound '{}' from {}", name, path.display());
                        loaded += 1;
                    }
                    Err(e) => log::warn!("Failed to load sound {}: {}", path.display(), e),
                },
                None => log::warn!("Sound '{}' not found in {}", name, dir.display()),
            }
        }
        loaded
    }

    /// Whether a sound with this name is loaded.
    pub fn has_sound(&self, name: &str) -> bool {
        self.sounds.contains_key(name)
    }

    /// Start a looping sound under its own name. Restarts it if already
    /// playing. Unknown names are ignored.
    pub fn play_loop(&mut self, name: &str, volume: f64) -> Result<()> {
        let Some(sound_data) = self.sounds.get(name).cloned() else {
            return Ok(());
        };
        self.stop(name);
        let settings = StaticSoundSettings::new()
            .volume(clamp_volume(volume))
            .loop_region(..);
        let handle = self.manager.play(sound_data.with_settings(settings))?;
        self.loops.insert(name.to_string(), handle);
        Ok(())
    }

    /// Adjust the playback rate of a running loop.
    pub fn set_loop_rate(&mut self, name: &str, rate: f64) {
        if let Some(handle) = self.loops.get_mut(name) {
            let _ = handle.set_playback_rate(PlaybackRate::Factor(rate), Tween::default());
        }
    }

    /// Adjust the volume of a running loop.
    pub fn set_loop_volume(&mut self, name: &str, volume: f64) {
        if let Some(handle) = self.loops.get_mut(name) {
            let _ = handle.set_volume(clamp_volume(volume), Tween::default());
        }
    }

    /// Stop a looping sound.
    pub fn stop(&mut self, name: &str) {
        if let Some(mut handle) = self.loops.remove(name) {
            let _ = handle.stop(Tween::default());
        }
    }

    /// Play a one-shot sound at a 3D position.
    pub fn play_at_position(&mut self, name: &str, position: Vec3) -> Result<()> {
        // Clone the sound data first to avoid borrow conflict
        let sound_data = self.sounds.get(name).cloned();
        if let Some(sound_data) = sound_data {
            let emitter = self
                .spatial_scene
                .add_emitter(to_mint(position), EmitterSettings::default())?;
            let settings = StaticSoundSettings::new().output_destination(&emitter);
            let handle = self.manager.play(sound_data.with_settings(settings))?;
            self.active_sounds.push(ActiveSound {
                handle,
                _emitter: Some(emitter),
            });
        }
        Ok(())
    }

    /// Update listener position and orientation (call each frame).
    pub fn update_listener(&mut self, position: Vec3, forward: Vec3, up: Vec3) {
        let right = forward.cross(up).normalize_or_zero();
        if right == Vec3::ZERO {
            return;
        }
        let corrected_up = right.cross(forward).normalize();

        let rotation = glam::Mat3::from_cols(right, corrected_up, -forward);
        let quat = glam::Quat::from_mat3(&rotation);

        let _ = self.listener.set_position(to_mint(position), Tween::default());
        let _ = self.listener.set_orientation(
            mint::Quaternion {
                v: mint::Vector3 {
                    x: quat.x,
                    y: quat.y,
                    z: quat.z,
                },
                s: quat.w,
            },
            Tween::default(),
        );
    }

    /// Clean up finished one-shots.
    pub fn cleanup(&mut self) {
        self.active_sounds
            .retain(|s| s.handle.state() != PlaybackState::Stopped);
    }

    /// Stop all sounds, loops included.
    pub fn stop_all(&mut self) {
        for sound in &mut self.active_sounds {
            let _ = sound.handle.stop(Tween::default());
        }
        self.active_sounds.clear();
        for (_, mut handle) in self.loops.drain() {
            let _ = handle.stop(Tween::default());
        }
    }

    /// Set master volume, clamped to [0, 1].
    pub fn set_master_volume(&mut self, volume: f64) {
        self.master_volume = clamp_volume(volume);
        let _ = self
            .manager
            .main_track()
            .set_volume(self.master_volume, Tween::default());
    }

    pub fn master_volume(&self) -> f64 {
        self.master_volume
    }
}

// Re-export for convenience
pub use kira;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playback_rate_spans_half_to_one_and_a_half() {
        assert_eq!(engine_playback_rate(0.0, MAX_ENGINE_RPM), 0.5);
        assert!((engine_playback_rate(MAX_ENGINE_RPM, MAX_ENGINE_RPM) - 1.5).abs() < 1e-9);
        let mid = engine_playback_rate(engine_rpm(0.5), MAX_ENGINE_RPM);
        assert!((mid - 1.0).abs() < 1e-6);
    }

    #[test]
    fn rpm_follows_throttle() {
        assert_eq!(engine_rpm(0.0), 0.0);
        assert_eq!(engine_rpm(1.0), MAX_ENGINE_RPM);
        assert_eq!(engine_rpm(2.0), MAX_ENGINE_RPM);
    }

    #[test]
    fn volume_is_clamped() {
        assert_eq!(clamp_volume(1.7), 1.0);
        assert_eq!(clamp_volume(-0.3), 0.0);
        assert_eq!(clamp_volume(0.4), 0.4);
        assert_eq!(clamp_volume(f64::NAN), 0.0);
    }

    #[test]
    fn wind_grows_with_speed() {
        assert_eq!(wind_volume(0.0, 200.0), 0.0);
        assert!(wind_volume(200.0, 200.0) > wind_volume(100.0, 200.0));
        assert!(wind_volume(400.0, 200.0) <= 0.6 + 1e-9);
    }
}
