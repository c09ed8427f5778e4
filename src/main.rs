//! moodplayer - plays a generated track and draws its spectrum as it plays.
//!
//! Keys: Space play/pause, Left/Right seek, Home/End jump, Up/Down volume,
//! D download, S snapshot, Esc quit.

use anyhow::Context;
use clap::Parser;
use std::fs;
use std::sync::Arc;
use tracing::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use moodplayer::audio::{AnalyserTapFactory, OutputElement};
use moodplayer::cli::Args;
use moodplayer::logging;
use moodplayer::params::{SnapshotConfig, VisualizerConfig, WindowConfig};
use moodplayer::player::{PlaybackController, TapStatus};
use moodplayer::rendering::RenderSystem;
use moodplayer::visualizer::{Canvas, StopHandle, Visualizer};

type Player = PlaybackController<OutputElement, AnalyserTapFactory>;

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    player: Player,
    visualizer: Option<Visualizer>,
    stop: Option<StopHandle>,

    /// Shown until the first play starts the visualizer
    idle_canvas: Canvas,

    // Configuration
    window_config: WindowConfig,
    visualizer_config: VisualizerConfig,
    snapshot_config: SnapshotConfig,

    snapshots_taken: usize,
    title: String,
}

impl App {
    fn new(args: &Args) -> anyhow::Result<Self> {
        let factory = AnalyserTapFactory::new(args.analyser_config()?);
        let player_config = args.player_config()?;

        let player = match args.resolve_source()? {
            Some(source) => match OutputElement::open(source) {
                Ok(element) => PlaybackController::new(element, factory, player_config),
                Err(e) => {
                    error!("Failed to open track: {}", e);
                    PlaybackController::inert(factory, player_config)
                }
            },
            None => PlaybackController::inert(factory, player_config),
        };

        let window_config = args.window_config()?;
        let visualizer_config = args.visualizer_config();
        let (width, height) = visualizer_config.canvas_size(window_config.viewport_width);
        let mut idle_canvas = Canvas::new(width, height);
        idle_canvas.clear(visualizer_config.background);

        Ok(Self {
            window: None,
            render_system: None,
            player,
            visualizer: None,
            stop: None,
            idle_canvas,
            window_config,
            visualizer_config,
            snapshot_config: args.snapshot_config(),
            snapshots_taken: 0,
            title: String::new(),
        })
    }

    fn canvas(&self) -> &Canvas {
        self.visualizer
            .as_ref()
            .map(Visualizer::canvas)
            .unwrap_or(&self.idle_canvas)
    }

    fn toggle(&mut self) {
        if let Some(analyser) = self.player.toggle_play_pause() {
            let (visualizer, stop) = Visualizer::start(
                analyser,
                self.window_config.viewport_width,
                self.visualizer_config.clone(),
            );
            self.visualizer = Some(visualizer);
            self.stop = Some(stop);
        }
    }

    fn handle_key(&mut self, key: KeyCode, event_loop: &ActiveEventLoop) {
        let config = self.player.config().clone();
        let state = self.player.state().clone();

        match key {
            KeyCode::Escape => self.shutdown(event_loop),
            KeyCode::Space => self.toggle(),
            KeyCode::ArrowRight => self.player.seek(config.step_seek(state.progress, true)),
            KeyCode::ArrowLeft => self.player.seek(config.step_seek(state.progress, false)),
            KeyCode::Home => self.player.seek(0.0),
            KeyCode::End => self.player.seek(100.0),
            KeyCode::ArrowUp => self.player.set_volume(config.step_volume(state.volume, true)),
            KeyCode::ArrowDown => self.player.set_volume(config.step_volume(state.volume, false)),
            KeyCode::KeyD => {
                if let Err(e) = self.player.download(&config.download_dir) {
                    warn!("Download failed: {}", e);
                }
            }
            KeyCode::KeyS => self.save_snapshot(),
            _ => {}
        }
    }

    fn save_snapshot(&mut self) {
        if let Err(e) = fs::create_dir_all(&self.snapshot_config.output_dir) {
            warn!("Failed to create snapshot directory: {}", e);
            return;
        }
        let path = self.snapshot_config.frame_path(self.snapshots_taken);
        match self.canvas().save_png(&path) {
            Ok(()) => {
                info!("Saved snapshot {}", path.display());
                self.snapshots_taken += 1;
            }
            Err(e) => warn!("Failed to save snapshot {}: {}", path.display(), e),
        }
    }

    /// Stop the render loop before the window goes away
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(stop) = self.stop.take() {
            stop.stop();
        }
        self.visualizer = None;
        event_loop.exit();
    }

    fn update_title(&mut self) {
        let Some(window) = &self.window else {
            return;
        };

        let state = self.player.state();
        let mut title = if self.player.is_inert() {
            format!("{} - no track", self.window_config.title)
        } else {
            format!(
                "{} - {} {:.0}% - vol {:.1}",
                self.window_config.title,
                if state.is_playing { "playing" } else { "paused" },
                state.progress,
                state.volume
            )
        };
        if self.player.tap_status() == TapStatus::Unavailable {
            title.push_str(" - visualization unavailable");
        }

        if title != self.title {
            window.set_title(&title);
            self.title = title;
        }
    }

    /// Render a single frame
    fn render_frame(&mut self) {
        self.player.poll();

        if let Some(visualizer) = &mut self.visualizer {
            if !visualizer.tick() {
                self.visualizer = None;
            }
        }
        self.update_title();

        let Some(render_system) = &self.render_system else {
            return;
        };
        render_system.upload(self.canvas());

        match render_system.render() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                if let (Some(window), Some(render_system)) =
                    (&self.window, &mut self.render_system)
                {
                    let size = window.inner_size();
                    render_system.resize(size.width, size.height);
                }
            }
            Err(e) => error!("Render error: {:?}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        let (width, height) = (self.idle_canvas.width(), self.idle_canvas.height());
        let window_attributes = Window::default_attributes()
            .with_title(self.window_config.title.clone())
            .with_inner_size(winit::dpi::PhysicalSize::new(width, height));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        match pollster::block_on(RenderSystem::new(Arc::clone(&window), (width, height))) {
            Ok(render_system) => self.render_system = Some(render_system),
            Err(e) => {
                error!("Failed to initialize rendering: {}", e);
                event_loop.exit();
                return;
            }
        }

        info!("moodplayer is running (Space to play, Esc to quit)");
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::Resized(size) => {
                if let Some(render_system) = &mut self.render_system {
                    render_system.resize(size.width, size.height);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(key),
                        ..
                    },
                ..
            } => self.handle_key(key, event_loop),
            WindowEvent::RedrawRequested => self.render_frame(),
            _ => {}
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(&args.log_filter);

    let mut app = App::new(&args)?;
    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.run_app(&mut app).context("event loop failed")?;

    Ok(())
}
