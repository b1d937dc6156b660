#![deny(clippy::all)]
#![forbid(unsafe_code)]

mod input;

pub use input::InputState;

use life_grid::{GridSize, LifeWorld, Loc, TickClock};
use log::{debug, error, info, warn};
use pixels::wgpu::Color;
use pixels::{Pixels, PixelsBuilder, SurfaceTexture};
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition};
use winit::error::EventLoopError;
use winit::event::{ElementState, KeyEvent, MouseButton, StartCause, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Cursor, CursorIcon, Window, WindowId};

const WINDOW_TITLE: &str = "Game of Life";
const WINDOW_WIDTH: f64 = 1024.0;
const WINDOW_HEIGHT: f64 = 768.0;
const BACKGROUND_COLOR: Color = Color::BLACK;
const ALIVE_COLOR: [u8; 4] = [0x80, 0x80, 0x80, 0xff];
const DEAD_COLOR: [u8; 4] = [0x00, 0x00, 0x40, 0xff];
const EDIT_DEAD_COLOR: [u8; 4] = [0x20, 0x10, 0x40, 0xff];

/// The world to run, how fast to step it, and where `S`/`L` save and load.
pub struct Session {
    pub world: LifeWorld,
    pub clock: TickClock,
    pub world_file: PathBuf,
}

pub fn animate(session: Session) -> Result<(), EventLoopError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);
    event_loop.run_app(&mut AppEventHandler::new(session))
}

struct App {
    world: LifeWorld,
    clock: TickClock,
    world_file: PathBuf,
    input: InputState,
    window: Arc<Window>,
    pixels: Pixels<'static>,
    buffer_size: GridSize,
}

impl App {
    fn new(event_loop: &ActiveEventLoop, session: Session) -> Result<Self, Box<dyn Error>> {
        let window = Arc::new(Self::build_window(event_loop)?);
        let size = session.world.size();
        let pixels = Self::build_pixels(&window, size.width, size.height)?;
        Ok(Self {
            world: session.world,
            clock: session.clock,
            world_file: session.world_file,
            input: InputState::default(),
            window,
            pixels,
            buffer_size: size,
        })
    }

    fn build_window(event_loop: &ActiveEventLoop) -> Result<Window, winit::error::OsError> {
        let window_attributes = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT))
            .with_cursor(Cursor::Icon(CursorIcon::Crosshair))
            .with_visible(false);
        event_loop.create_window(window_attributes)
    }

    fn build_pixels(
        window: &Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, pixels::Error> {
        let window_size = window.inner_size();
        let surface_texture =
            SurfaceTexture::new(window_size.width, window_size.height, window.clone());
        PixelsBuilder::new(width, height, surface_texture)
            .clear_color(BACKGROUND_COLOR)
            .build()
    }

    fn on_create(&mut self) {
        self.window.request_redraw();
        self.window.set_visible(true);
    }

    fn on_time_step(&mut self) {
        if self.world.is_running() && self.clock.is_tick_due() {
            self.step_world();
            self.clock.consume_tick();
        }
    }

    fn step_world(&mut self) {
        if let Err(err) = self.world.step() {
            error!("step failed: {}", err);
        }
        // A step can grow the grid and still fail afterwards.
        self.sync_buffer_size();
        self.window.request_redraw();
    }

    fn apply_input(&mut self, event_loop: &ActiveEventLoop) {
        if !self.input.has_requests() {
            return;
        }
        let input = self.input.take_frame();
        if input.quit {
            event_loop.exit();
            return;
        }
        if input.toggle_pause {
            let paused = self.world.toggle_paused();
            info!("{}", if paused { "paused" } else { "resumed" });
        }
        if input.toggle_edit {
            let editing = self.world.toggle_edit_mode();
            info!("edit mode {}", if editing { "on" } else { "off" });
        }
        if input.speed_up {
            self.clock.speed_up();
        }
        if input.slow_down {
            self.clock.slow_down();
        }
        if input.clear {
            self.world.clear();
        }
        if input.reload {
            match self.world.load_from_file(&self.world_file) {
                Ok(_) => self.sync_buffer_size(),
                Err(err) => warn!("reload failed: {}", err),
            }
        }
        if input.save
            && let Err(err) = self.world.save_to_file(&self.world_file)
        {
            error!("save failed: {}", err);
        }
        if self.world.is_edit_mode() {
            for click in input.clicks {
                self.toggle_at(click);
            }
        }
        self.window.request_redraw();
    }

    fn toggle_at(&mut self, position: PhysicalPosition<f64>) {
        let Ok((x, y)) = self
            .pixels
            .window_pos_to_pixel((position.x as f32, position.y as f32))
        else {
            return;
        };
        let pos = self.world.grid().to_world(Loc::new(y as u32, x as u32));
        if let Ok(alive) = self.world.toggle_cell(pos) {
            debug!("toggled ({}, {}) to {}", pos.x, pos.y, alive);
        }
    }

    fn sync_buffer_size(&mut self) {
        let Some(size) = resize_target(self.buffer_size, &self.world) else {
            return;
        };
        match self.pixels.resize_buffer(size.width, size.height) {
            Ok(()) => self.buffer_size = size,
            Err(err) => error!(
                "failed to resize pixel buffer to {}x{}: {}",
                size.width, size.height, err
            ),
        }
    }

    fn on_resize(&mut self, width: u32, height: u32) {
        if let Err(err) = self.pixels.resize_surface(width, height) {
            error!("failed to resize surface to {}x{}: {}", width, height, err);
        }
        self.window.request_redraw();
    }

    fn on_redraw(&mut self) {
        let dead_color = if self.world.is_edit_mode() {
            EDIT_DEAD_COLOR
        } else {
            DEAD_COLOR
        };
        if resize_target(self.buffer_size, &self.world).is_some() {
            return;
        }
        let screen = self.pixels.frame_mut();
        debug_assert_eq!(screen.len(), 4 * self.world.grid().num_cells());

        for (cell, pixel) in self.world.cells_iter().zip(screen.chunks_exact_mut(4)) {
            pixel.copy_from_slice(if cell.alive {
                &ALIVE_COLOR
            } else {
                &dead_color
            });
        }
        if let Err(err) = self.pixels.render() {
            error!("render failed: {}", err);
        }
    }
}

/// The size the pixel buffer must take to show `world`, if it differs.
fn resize_target(buffer_size: GridSize, world: &LifeWorld) -> Option<GridSize> {
    let size = world.size();
    (size != buffer_size).then_some(size)
}

struct AppEventHandler {
    session: Option<Session>,
    app: Option<App>,
}

impl AppEventHandler {
    fn new(session: Session) -> Self {
        Self {
            session: Some(session),
            app: None,
        }
    }
}

impl ApplicationHandler for AppEventHandler {
    fn new_events(&mut self, _event_loop: &ActiveEventLoop, cause: StartCause) {
        if let (StartCause::ResumeTimeReached { .. }, Some(app)) = (cause, self.app.as_mut()) {
            app.on_time_step();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(session) = self.session.take() else {
            return;
        };
        match App::new(event_loop, session) {
            Ok(mut app) => {
                app.on_create();
                self.app = Some(app);
            }
            Err(err) => {
                error!("failed to open window: {}", err);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(app) = self.app.as_mut() else {
            return;
        };
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => app.input.on_key_pressed(code),
            WindowEvent::CursorMoved { position, .. } => app.input.on_cursor_moved(position),
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => app.input.on_left_click(),
            WindowEvent::Resized(size) => app.on_resize(size.width, size.height),
            WindowEvent::RedrawRequested => app.on_redraw(),
            _ => (),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(app) = self.app.as_mut() else {
            return;
        };
        app.apply_input(event_loop);
        let control_flow = if app.world.is_running() {
            ControlFlow::WaitUntil(app.clock.next_tick_at())
        } else {
            ControlFlow::Wait
        };
        event_loop.set_control_flow(control_flow);
    }
}
