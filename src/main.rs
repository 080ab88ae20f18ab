use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use log::info;
use winit::{
    dpi::LogicalSize,
    event::{ElementState, Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowBuilder},
};

mod core;
mod engine;
mod game;

use engine::game_loop::GameLoop;
use engine::input::KeyBindings;
use game::characters::{AnimationFrameData, CharacterState, Facing, SpriteAnimator, StateEvent};
use game::obstacles::ObstacleField;
use game::{DinoSkin, RenderSink, SimConfig, Simulation, StatusChange, WorldBounds};

/// Presentation side of the window: drives the sprite animator and shows
/// state and health in the title bar.
struct WindowSink {
    window: Arc<Window>,
    animator: SpriteAnimator,
    state: CharacterState,
    health: i32,
    last_frame: Option<AnimationFrameData>,
}

impl WindowSink {
    fn new(window: Arc<Window>, frame_duration: Duration, health: i32) -> Self {
        Self {
            window,
            animator: SpriteAnimator::with_dino_clips(frame_duration),
            state: CharacterState::Idle,
            health,
            last_frame: None,
        }
    }

    fn refresh_title(&self) {
        self.window.set_title(&format!(
            "Dino Romp - {} [{}] HP {}",
            self.animator.skin(),
            self.state,
            self.health
        ));
    }
}

impl RenderSink for WindowSink {
    fn on_state_changed(&mut self, state: CharacterState) {
        self.state = state;
        self.animator.on_state_changed(state);
        self.refresh_title();
    }

    fn on_kick_cycle_complete(&mut self, repeating: bool) {
        self.animator.on_kick_cycle_complete(repeating);
    }

    fn on_skin_changed(&mut self, skin: DinoSkin, state: CharacterState) {
        info!("Switched to {}", skin.sheet_path());
        self.animator.on_skin_changed(skin, state);
        self.refresh_title();
    }

    fn on_facing_changed(&mut self, facing: Facing) {
        self.animator.on_facing_changed(facing);
    }

    fn advance(&mut self, dt: Duration) {
        self.animator.update(dt);
        let frame = self.animator.frame_data();
        if self.last_frame != Some(frame) {
            log::trace!("Sprite frame {:?}", frame);
            self.last_frame = Some(frame);
        }
    }

    fn world_bounds(&self) -> Option<WorldBounds> {
        let size: LogicalSize<f32> = self.window.inner_size().to_logical(self.window.scale_factor());
        (size.width > 0.0 && size.height > 0.0).then(|| WorldBounds::new(size.width, size.height))
    }

    fn notify_health_changed(&mut self, health: i32) {
        self.health = health;
        self.refresh_title();
    }

    fn notify_damage(&mut self, amount: i32) {
        info!("Ouch! -{} HP", amount);
    }
}

/// Digit keys stand in for the on-screen state buttons
fn direct_request(code: KeyCode) -> Option<StateEvent> {
    let event = match code {
        KeyCode::Digit1 => StateEvent::Idle,
        KeyCode::Digit2 => StateEvent::Move,
        KeyCode::Digit3 => StateEvent::Kick,
        KeyCode::Digit4 => StateEvent::Hurt,
        KeyCode::Digit5 => StateEvent::Crouch,
        KeyCode::Digit6 => StateEvent::Sneak,
        _ => return None,
    };
    Some(event)
}

/// Config from the first CLI argument, or the built-in defaults
fn load_config() -> Result<SimConfig> {
    match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => {
            let config = SimConfig::load(&path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            info!("Loaded config from {}", path.display());
            Ok(config)
        }
        None => Ok(SimConfig::default()),
    }
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting Dino Romp...");

    let config = load_config()?;
    let bounds = config.world.default_bounds;
    let frame_duration = config.timing.animation_frame();

    // Create event loop and window
    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Dino Romp")
            .with_inner_size(LogicalSize::new(bounds.x, bounds.y))
            .with_resizable(true)
            .build(&event_loop)?,
    );

    info!("Window created successfully");

    let mut sim = Simulation::new(config);
    sim.attach_sink(Box::new(WindowSink::new(
        Arc::clone(&window),
        frame_duration,
        sim.status().max_health(),
    )));

    let status_listener = sim.status_mut().subscribe(|change| match change {
        StatusChange::Hurt(hurt) => info!("Hurt: {}", hurt),
        StatusChange::Kicking(kicking) => log::debug!("Kicking: {}", kicking),
        StatusChange::Health { old, new } => log::debug!("Health {} -> {}", old, new),
        StatusChange::Skin(skin) => log::debug!("Skin: {}", skin),
    });

    let bindings = KeyBindings::default();
    let mut field = ObstacleField::new();
    let mut game_loop = GameLoop::new();

    event_loop.set_control_flow(ControlFlow::Poll);

    // Main event loop
    event_loop
        .run(move |event, elwt| match event {
            Event::Resumed => {
                // Sprites are in-process, so the window being up means assets are ready
                if !sim.is_initialized() {
                    sim.regenerate_obstacles(&mut field);
                }
                sim.signal_assets_ready();
            }
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    info!(
                        "Close requested after {} frames ({} ticks), shutting down...",
                        game_loop.frame_count(),
                        game_loop.tick_count()
                    );
                    sim.status_mut().unsubscribe(status_listener);
                    elwt.exit();
                }
                WindowEvent::Focused(false) => sim.release_all_keys(),
                WindowEvent::KeyboardInput { event, .. } => {
                    if event.state == ElementState::Pressed && !event.repeat {
                        match event.physical_key {
                            PhysicalKey::Code(KeyCode::KeyP) => {
                                game_loop.toggle_pause();
                                // Releases during the pause would be missed
                                if game_loop.is_paused() {
                                    sim.release_all_keys();
                                }
                            }
                            PhysicalKey::Code(KeyCode::KeyC) => {
                                let next = sim.status().skin().next();
                                sim.change_character(next);
                            }
                            PhysicalKey::Code(KeyCode::KeyR) => {
                                sim.reset_health();
                                sim.regenerate_obstacles(&mut field);
                            }
                            PhysicalKey::Code(code) => {
                                if let Some(request) = direct_request(code) {
                                    sim.request(request);
                                }
                            }
                            _ => {}
                        }
                    }
                    if let Some(edge) = bindings.translate(&event) {
                        sim.handle_key_edge(edge);
                    }
                }
                WindowEvent::RedrawRequested => {
                    for _ in 0..game_loop.begin_frame() {
                        sim.tick(game_loop.tick_duration());
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                // Request redraw on next frame
                window.request_redraw();
            }
            _ => {}
        })
        .map_err(|e| anyhow::anyhow!("Event loop error: {}", e))?;

    Ok(())
}
