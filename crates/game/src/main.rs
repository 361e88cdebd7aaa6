//! Arcade flight simulator: fly over procedurally decorated terrain, try not to hit it.

mod aircraft_model;
mod camera_rig;
mod config;
mod effects;
mod environment;
mod events;
mod hud;
mod render;
mod state;
mod update;

use anyhow::Result;
use audio::AudioSystem;
use engine_core::Time;
use hecs::World;
use input::{InputState, CONTROLS_LEGEND};
use procgen::{GroundConfig, GroundMesh, SceneryConfig, SceneryLayout};
use renderer::{Camera, Mesh, MeshLibrary, Renderer};
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Fullscreen, Window, WindowId},
};

use aircraft_model::{aircraft_parts, ModelPart};
use camera_rig::ChaseCamera;
use config::GameConfig;
use state::Simulation;

/// Everything alive while the window is open.
pub struct GameState {
    renderer: Renderer,
    camera: Camera,
    input: InputState,
    time: Time,
    sim: Simulation,
    /// Static scenery entities (trees, rocks).
    world: World,
    meshes: MeshLibrary,
    ground_mesh: Mesh,
    mountain_mesh: Mesh,
    aircraft_parts: Vec<ModelPart>,
    audio: Option<AudioSystem>,
    running: bool,
}

impl GameState {
    async fn new(window: Arc<Window>, config: &GameConfig) -> Result<Self> {
        let renderer = Renderer::new(window, config.vsync).await?;
        let (width, height) = renderer.dimensions();
        let mut camera = Camera::default();
        camera.set_aspect(width, height);

        let ground_config = GroundConfig {
            seed: config.scenery_seed,
            ..Default::default()
        };
        let ground = GroundMesh::generate(ground_config.clone());
        log::info!(
            "Generated ground: {} vertices, {} triangles",
            ground.vertices.len(),
            ground.indices.len() / 3
        );

        let scenery_config = SceneryConfig {
            seed: config.scenery_seed,
            tree_count: config.tree_count,
            rock_count: config.rock_count,
            ..Default::default()
        };
        let layout = SceneryLayout::generate(&scenery_config, &ground_config);
        let mut world = World::new();
        layout.spawn_into(&mut world);
        let (mountain_vertices, mountain_indices) = layout.mountain_mesh();

        let device = renderer.device();
        let meshes = MeshLibrary::new(device);
        let ground_mesh = render::upload_terrain(device, &ground.vertices, &ground.indices, "Ground");
        let mountain_mesh =
            render::upload_terrain(device, &mountain_vertices, &mountain_indices, "Mountains");

        let rig = ChaseCamera::new(config.camera_distance, config.camera_height, config.camera_lag);
        let sim = Simulation::new(config.aircraft.params(), rig, ground_config, config.scenery_seed);
        let weather = &sim.environment.weather;
        log::info!(
            "Weather: {:.1} C, {:.2} hPa, air density {:.5}",
            weather.temperature,
            weather.pressure,
            weather.air_density()
        );

        let audio = match AudioSystem::new() {
            Ok(mut audio) => {
                audio.set_master_volume(config.master_volume);
                let loaded = audio.load_directory(&config.sound_dir);
                log::info!("Audio ready, {} sounds loaded", loaded);
                let missing = update::missing_sounds(|name| audio.has_sound(name));
                if !missing.is_empty() {
                    log::warn!("Missing sounds in {}: {:?}", config.sound_dir.display(), missing);
                }
                update::start_loops(&mut audio);
                Some(audio)
            }
            Err(e) => {
                log::warn!("Audio unavailable, running silent: {}", e);
                None
            }
        };

        let mut time = Time::new();
        time.reset_clock();

        Ok(Self {
            renderer,
            camera,
            input: InputState::new(),
            time,
            sim,
            world,
            meshes,
            ground_mesh,
            mountain_mesh,
            aircraft_parts: aircraft_parts(),
            audio,
            running: true,
        })
    }

    fn render(&mut self) {
        match render::run(self) {
            Ok(()) => {}
            Err(e) if e.needs_reconfigure() => {
                log::warn!("{}, reconfiguring surface", e);
                self.renderer.reconfigure();
            }
            Err(e) if e.is_fatal() => {
                log::error!("Render error: {}", e);
                self.running = false;
            }
            Err(e) => log::warn!("Skipping frame: {}", e),
        }
    }
}

struct App {
    config: GameConfig,
    state: Option<GameState>,
}

impl App {
    fn new(config: GameConfig) -> Self {
        Self { config, state: None }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_none() {
            let mut window_attrs = Window::default_attributes()
                .with_title("Flight Simulator")
                .with_inner_size(winit::dpi::LogicalSize::new(
                    self.config.window_width,
                    self.config.window_height,
                ));
            if self.config.fullscreen {
                window_attrs = window_attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
            }

            let window = match event_loop.create_window(window_attrs) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    log::error!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            match pollster::block_on(GameState::new(window.clone(), &self.config)) {
                Ok(s) => {
                    self.state = Some(s);
                    window.request_redraw();
                }
                Err(e) => {
                    log::error!("Failed to initialize game: {}", e);
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(state) = &mut self.state {
            if state.handle_window_event(event) || !state.running {
                if let Some(audio) = &mut state.audio {
                    audio.stop_all();
                }
                event_loop.exit();
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("╔══════════════════════════════════════════╗");
    println!("║             FLIGHT SIMULATOR             ║");
    println!("╠══════════════════════════════════════════╣");
    for line in CONTROLS_LEGEND {
        println!("║  {:<40}║", line);
    }
    println!("╚══════════════════════════════════════════╝");

    let config = GameConfig::load();
    log::info!("Starting flight simulator ({:?})", config.aircraft);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}
