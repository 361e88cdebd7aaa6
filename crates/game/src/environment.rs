//! Time of day, weather and the scene lighting they produce.

use engine_core::rgb_hex;
use glam::Vec3;
use renderer::{PointLight, SceneLighting};
use std::f32::consts::PI;

/// Length of one simulated day in seconds.
pub const DAY_LENGTH: f32 = 1200.0;

const SKY_DAY: u32 = 0x87CEEB;
const SKY_NIGHT: u32 = 0x0B1026;
const HEMISPHERE_GROUND: u32 = 0x006400;
const AMBIENT: u32 = 0x666666;
const FOG_NEAR: f32 = 500.0;
const FOG_FAR: f32 = 5000.0;

/// Specific gas constant for dry air, J/(kg·K).
const DRY_AIR_GAS_CONSTANT: f32 = 287.05;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayCycle {
    /// Seconds into the current day, in [0, DAY_LENGTH].
    pub time: f32,
    pub day_length: f32,
}

impl DayCycle {
    /// Starts at midday.
    pub fn new() -> Self {
        Self {
            time: DAY_LENGTH * 0.5,
            day_length: DAY_LENGTH,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.time += dt;
        if self.time > self.day_length {
            self.time -= self.day_length;
        }
    }

    /// 0 at midnight, 1 at midday.
    pub fn day_night_ratio(&self) -> f32 {
        (self.time / self.day_length * PI).sin()
    }
}

impl Default for DayCycle {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weather {
    /// Celsius.
    pub temperature: f32,
    /// Hectopascals.
    pub pressure: f32,
    /// Relative humidity in [0, 1].
    pub humidity: f32,
    pub wind_speed: f32,
    /// Radians, measured from +Z towards +X.
    pub wind_direction: f32,
}

impl Weather {
    pub fn new() -> Self {
        Self {
            temperature: 15.0,
            pressure: 1013.25,
            humidity: 0.5,
            wind_speed: 0.0,
            wind_direction: 0.0,
        }
    }

    /// `pressure / (R · T)` with the pressure taken as configured (hPa).
    pub fn air_density(&self) -> f32 {
        self.pressure / (DRY_AIR_GAS_CONSTANT * (self.temperature + 273.15))
    }

    pub fn wind(&self) -> Vec3 {
        Vec3::new(self.wind_direction.sin(), 0.0, self.wind_direction.cos()) * self.wind_speed
    }
}

impl Default for Weather {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    pub day: DayCycle,
    pub weather: Weather,
}

impl Environment {
    pub fn update(&mut self, dt: f32) {
        self.day.update(dt);
    }

    /// Clear colour and fog colour.
    pub fn sky_color(&self) -> Vec3 {
        let t = self.day.day_night_ratio().clamp(0.0, 1.0);
        rgb_hex(SKY_NIGHT).lerp(rgb_hex(SKY_DAY), t)
    }

    pub fn lighting(&self, point_light: Option<PointLight>) -> SceneLighting {
        let ratio = self.day.day_night_ratio().clamp(0.0, 1.0);
        let sky = self.sky_color();
        SceneLighting {
            sun_direction: Vec3::new(500.0, 1000.0, -500.0),
            sun_color: Vec3::ONE,
            sun_intensity: ratio,
            ambient: rgb_hex(AMBIENT) * (0.3 + 0.7 * ratio),
            hemisphere_sky: sky,
            hemisphere_ground: rgb_hex(HEMISPHERE_GROUND),
            hemisphere_intensity: 0.5 * ratio,
            fog_color: sky,
            fog_near: FOG_NEAR,
            fog_far: FOG_FAR,
            point_light,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_wraps_after_its_length() {
        let mut day = DayCycle::new();
        day.update(DAY_LENGTH * 0.5 + 10.0);
        assert!((day.time - 10.0).abs() < 1e-3);
    }

    #[test]
    fn ratio_peaks_at_midday() {
        let mut day = DayCycle::new();
        assert!((day.day_night_ratio() - 1.0).abs() < 1e-6);
        day.time = 0.0;
        assert!(day.day_night_ratio().abs() < 1e-6);
        day.time = DAY_LENGTH * 0.25;
        assert!((day.day_night_ratio() - (PI / 4.0).sin()).abs() < 1e-5);
    }

    #[test]
    fn standard_air_density() {
        let density = Weather::new().air_density();
        assert!((density - 1013.25 / (287.05 * 288.15)).abs() < 1e-7);
        // Colder air is denser.
        let cold = Weather {
            temperature: -20.0,
            ..Weather::new()
        };
        assert!(cold.air_density() > density);
    }

    #[test]
    fn calm_by_default_and_wind_follows_direction() {
        assert_eq!(Weather::new().wind(), Vec3::ZERO);
        let w = Weather {
            wind_speed: 5.0,
            wind_direction: PI / 2.0,
            ..Weather::new()
        };
        assert!(w.wind().distance(Vec3::new(5.0, 0.0, 0.0)) < 1e-4);
    }

    #[test]
    fn midday_sky_is_the_day_blue() {
        let env = Environment::default();
        assert!(env.sky_color().distance(rgb_hex(SKY_DAY)) < 1e-5);
        let lighting = env.lighting(None);
        assert_eq!(lighting.fog_near, 500.0);
        assert_eq!(lighting.fog_far, 5000.0);
        assert!((lighting.hemisphere_intensity - 0.5).abs() < 1e-6);
    }
}
