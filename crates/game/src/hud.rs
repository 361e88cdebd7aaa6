//! Flight HUD: instrument readouts, state markers, the game over screen and
//! the controls legend.

use input::CONTROLS_LEGEND;
use physics::FlightInfo;
use renderer::{Align, OverlayTextBuilder};

use crate::state::GamePhase;

const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const GRAY: [f32; 4] = [0.75, 0.75, 0.75, 1.0];
const YELLOW: [f32; 4] = [1.0, 0.9, 0.3, 1.0];
const RED: [f32; 4] = [1.0, 0.2, 0.15, 1.0];
const PANEL_BG: [f32; 4] = [0.0, 0.0, 0.0, 0.5];

/// Vertical speed readout: "0" inside the ±10 dead band, explicit "+" when climbing.
pub fn format_vertical_speed(vertical_speed: f32) -> String {
    if vertical_speed.abs() < 10.0 {
        "0".to_string()
    } else if vertical_speed > 0.0 {
        format!("+{}", vertical_speed.round() as i32)
    } else {
        format!("{}", vertical_speed.round() as i32)
    }
}

/// Compass heading in whole degrees, [0, 360).
pub fn heading_degrees(yaw_deg: f32) -> u32 {
    let heading = (yaw_deg + 180.0).rem_euclid(360.0).round() as u32;
    heading % 360
}

/// Snapshot of everything the HUD shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HudData {
    pub info: FlightInfo,
    pub phase: GamePhase,
    pub fps: f32,
}

impl HudData {
    /// Instrument lines, top to bottom.
    pub fn readouts(&self) -> Vec<String> {
        let info = &self.info;
        vec![
            format!("SPD {:>4} kts", info.speed.round() as i32),
            format!("ALT {:>4} ft", info.altitude.round() as i32),
            format!("V/S {:>4}", format_vertical_speed(info.vertical_speed)),
            format!("THR {:>4}%", (info.throttle * 100.0).round() as i32),
            format!("PIT {:>4}", info.pitch_deg.round() as i32),
            format!("ROL {:>4}", info.roll_deg.round() as i32),
            format!("HDG {:>4}", heading_degrees(info.yaw_deg)),
        ]
    }

    /// Status marker next to the instruments, if any.
    pub fn status(&self) -> Option<(&'static str, [f32; 4])> {
        match self.phase {
            GamePhase::Paused => Some(("PAUSED", YELLOW)),
            GamePhase::Crashed { .. } | GamePhase::GameOver => Some(("CRASHED", RED)),
            GamePhase::Flying => None,
        }
    }

    /// Build the screen-space overlay.
    pub fn build(&self, sw: f32, sh: f32) -> OverlayTextBuilder {
        let mut tb = OverlayTextBuilder::new(sw, sh);
        let scale = 2.0;
        let margin = 12.0;

        // ---- Top-left: instruments ----
        let mut y = margin;
        for line in self.readouts() {
            y += tb.add_text_with_bg(margin, y, &line, scale, WHITE, PANEL_BG) + 2.0;
        }
        if let Some((text, color)) = self.status() {
            tb.add_text_with_bg(margin, y + 8.0, text, scale, color, PANEL_BG);
        }

        // ---- Top-right: frame rate ----
        tb.add_text_aligned(sw - margin, margin, &format!("{:.0} FPS", self.fps), 1.0, GRAY, Align::Right);

        // ---- Bottom-left: controls legend ----
        let legend_h = 8.0 + 4.0;
        let mut ly = sh - margin - legend_h * CONTROLS_LEGEND.len() as f32;
        for line in CONTROLS_LEGEND {
            tb.add_text(margin, ly, line, 1.0, GRAY);
            ly += legend_h;
        }

        // ---- Game over screen ----
        if self.phase == GamePhase::GameOver {
            tb.add_rect(0.0, 0.0, sw, sh, [0.0, 0.0, 0.0, 0.6]);
            let cx = sw * 0.5;
            tb.add_text_aligned(cx, sh * 0.35, "CRASH!", 5.0, RED, Align::Center);
            tb.add_text_aligned(cx, sh * 0.35 + 70.0, "Your aircraft has crashed.", 2.0, WHITE, Align::Center);
            tb.add_text_aligned(
                cx,
                sh * 0.35 + 110.0,
                "Press Enter or R to fly again",
                1.5,
                YELLOW,
                Align::Center,
            );
        }

        tb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(phase: GamePhase) -> HudData {
        HudData {
            info: FlightInfo {
                speed: 100.0,
                vertical_speed: -49.6,
                altitude: 150.2,
                throttle: 0.5,
                pitch_deg: -3.4,
                roll_deg: 12.6,
                yaw_deg: 0.0,
                crashed: false,
            },
            phase,
            fps: 60.0,
        }
    }

    #[test]
    fn vertical_speed_dead_band_and_sign() {
        assert_eq!(format_vertical_speed(0.0), "0");
        assert_eq!(format_vertical_speed(9.9), "0");
        assert_eq!(format_vertical_speed(-9.9), "0");
        assert_eq!(format_vertical_speed(10.0), "+10");
        assert_eq!(format_vertical_speed(123.4), "+123");
        assert_eq!(format_vertical_speed(-58.8), "-59");
    }

    #[test]
    fn heading_wraps_into_compass_range() {
        assert_eq!(heading_degrees(0.0), 180);
        assert_eq!(heading_degrees(180.0), 0);
        assert_eq!(heading_degrees(-180.0), 0);
        assert_eq!(heading_degrees(-90.0), 90);
        assert_eq!(heading_degrees(270.0), 90);
        assert_eq!(heading_degrees(179.8), 0);
    }

    #[test]
    fn readouts_format_instruments() {
        let lines = data(GamePhase::Flying).readouts();
        assert_eq!(lines[0], "SPD  100 kts");
        assert_eq!(lines[1], "ALT  150 ft");
        assert_eq!(lines[2], "V/S  -50");
        assert_eq!(lines[3], "THR   50%");
        assert_eq!(lines[6], "HDG  180");
    }

    #[test]
    fn status_marker_per_phase() {
        assert_eq!(data(GamePhase::Flying).status(), None);
        assert_eq!(data(GamePhase::Paused).status().map(|s| s.0), Some("PAUSED"));
        assert_eq!(
            data(GamePhase::Crashed { since: 1.0 }).status().map(|s| s.0),
            Some("CRASHED")
        );
        assert_eq!(data(GamePhase::GameOver).status().map(|s| s.0), Some("CRASHED"));
    }

    #[test]
    fn game_over_screen_adds_geometry() {
        let flying = data(GamePhase::Flying).build(1280.0, 720.0);
        let over = data(GamePhase::GameOver).build(1280.0, 720.0);
        assert!(over.vertices.len() > flying.vertices.len());
        assert_eq!(over.indices.len() % 6, 0);
    }
}
