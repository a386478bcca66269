/// Terminal wireframe viewer driving the core frame pipeline
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use wirecg_core::{ProjectionMode, Scene};

pub mod renderer;

pub use renderer::LineRenderer;

/// Degrees per key press for manual rotation
const ROTATE_STEP: f32 = 5.0;

/// What a key press asks the app to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Quit,
    Orthographic,
    Perspective,
    ToggleSpin,
    ToggleGrid,
    ToggleCurve,
    ToggleLSystem,
    Rotate(f32, f32, f32),
}

impl Action {
    pub fn from_key(code: KeyCode) -> Option<Self> {
        let action = match code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Char('1') => Action::Orthographic,
            KeyCode::Char('2') => Action::Perspective,
            KeyCode::Char('a') => Action::ToggleSpin,
            KeyCode::Char('g') => Action::ToggleGrid,
            KeyCode::Char('c') => Action::ToggleCurve,
            KeyCode::Char('l') => Action::ToggleLSystem,
            KeyCode::Char('w') | KeyCode::Up => Action::Rotate(ROTATE_STEP, 0.0, 0.0),
            KeyCode::Char('s') | KeyCode::Down => Action::Rotate(-ROTATE_STEP, 0.0, 0.0),
            KeyCode::Left => Action::Rotate(0.0, -ROTATE_STEP, 0.0),
            KeyCode::Char('d') | KeyCode::Right => Action::Rotate(0.0, ROTATE_STEP, 0.0),
            KeyCode::Char('e') => Action::Rotate(0.0, 0.0, ROTATE_STEP),
            KeyCode::Char('r') => Action::Rotate(0.0, 0.0, -ROTATE_STEP),
            _ => return None,
        };
        Some(action)
    }
}

/// Main application struct for terminal wireframe rendering
pub struct TerminalApp {
    scene: Scene,
    renderer: LineRenderer,
    running: bool,
    target_fps: u32,
    last_update: Instant,
    last_fps_sample: Instant,
    frame_count: u32,
    fps: f32,
    line_count: usize,
}

impl TerminalApp {
    pub fn new(scene: Scene, target_fps: u32) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let now = Instant::now();

        Ok(Self {
            scene,
            renderer: LineRenderer::new(width as usize, height as usize),
            running: true,
            target_fps: target_fps.max(1),
            last_update: now,
            last_fps_sample: now,
            frame_count: 0,
            fps: 0.0,
            line_count: 0,
        })
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
        tracing::info!(fps = self.target_fps, "terminal viewer started");

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_secs_f32(1.0 / self.target_fps as f32);

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_input()?;
            }

            self.update();
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_fps_sample).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_fps_sample).as_secs_f32();
                self.frame_count = 0;
                self.last_fps_sample = now;
            }
        }

        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        match event::read()? {
            Event::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => {
                if let Some(action) = Action::from_key(code) {
                    self.apply(action);
                }
            }
            Event::Resize(width, height) => {
                self.renderer.resize(width as usize, height as usize);
            }
            _ => {}
        }
        Ok(())
    }

    /// Apply one input action to the scene
    pub fn apply(&mut self, action: Action) {
        tracing::debug!(?action, "input");
        match action {
            Action::Quit => self.running = false,
            Action::Orthographic => self.scene.set_perspective(false),
            Action::Perspective => self.scene.set_perspective(true),
            Action::ToggleSpin => self.scene.toggle_auto_spin(),
            Action::ToggleGrid => self.scene.toggle_grid(),
            Action::ToggleCurve => self.scene.toggle_curve(),
            Action::ToggleLSystem => self.scene.toggle_lsystem(),
            Action::Rotate(dx, dy, dz) => self.scene.rotate(dx, dy, dz),
        }
    }

    fn update(&mut self) {
        let now = Instant::now();
        let dt = (now - self.last_update).as_secs_f32();
        self.last_update = now;
        self.scene.update(dt);
    }

    fn render(&mut self) -> io::Result<()> {
        let (width, height) = self.renderer.pixel_size();
        let frame = self.scene.build_frame(width, height);
        let lines = frame.project();
        self.line_count = lines.len();

        self.renderer.clear();
        self.renderer.render_lines(&lines);

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        let mode = match self.scene.config().projection.mode {
            ProjectionMode::Perspective => "persp",
            ProjectionMode::Orthographic => "ortho",
        };
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "wirecg | FPS: {:.1} | {} | lines: {} | 1/2=Ortho/Persp A=Spin W/S/D/Arrows=Rotate E/R=Roll G/C/L=Grid/Curve/LSys Q=Quit",
                self.fps, mode, self.line_count
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
