/// Terminal-based ASCII mesh viewer
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use viscomp_core::{Camera, Mesh, RotationState, Transform};

pub mod renderer;

pub use renderer::AsciiRenderer;

const ROTATE_STEP: f32 = 0.1;
const ZOOM_STEP: f32 = 1.1;

/// Camera for a character grid; terminal cells are about twice as tall as wide.
pub fn terminal_camera(columns: u16, rows: u16) -> Camera {
    let mut camera = Camera::new(columns as u32, rows as u32);
    camera.aspect = columns.max(1) as f32 / (2.0 * rows.max(1) as f32);
    camera
}

/// Interactive viewer state: the mesh, its orientation and the render target
pub struct TerminalApp {
    mesh: Mesh,
    title: String,
    rotation: RotationState,
    camera: Camera,
    renderer: AsciiRenderer,
    spin: bool,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(mesh: Mesh, title: impl Into<String>) -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        Ok(Self {
            mesh,
            title: title.into(),
            rotation: RotationState::new(0.3, 0.3, 0.0),
            camera: terminal_camera(width, height),
            renderer: AsciiRenderer::new(width as usize, height as usize),
            spin: true,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            if self.spin {
                self.rotation.rotate(0.01, 0.015, 0.0);
            }

            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => self.handle_key(code),
            Event::Resize(width, height) => self.resize(width, height),
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('w') | KeyCode::Up => self.rotation.rotate(ROTATE_STEP, 0.0, 0.0),
            KeyCode::Char('s') | KeyCode::Down => self.rotation.rotate(-ROTATE_STEP, 0.0, 0.0),
            KeyCode::Char('a') | KeyCode::Left => self.rotation.rotate(0.0, -ROTATE_STEP, 0.0),
            KeyCode::Char('d') | KeyCode::Right => self.rotation.rotate(0.0, ROTATE_STEP, 0.0),
            KeyCode::Char('e') => self.rotation.rotate(0.0, 0.0, ROTATE_STEP),
            KeyCode::Char('r') => self.rotation.rotate(0.0, 0.0, -ROTATE_STEP),
            KeyCode::Char('+') | KeyCode::Char('=') => self.camera.zoom(ZOOM_STEP),
            KeyCode::Char('-') => self.camera.zoom(1.0 / ZOOM_STEP),
            KeyCode::Char(' ') => self.spin = !self.spin,
            _ => {}
        }
    }

    fn resize(&mut self, width: u16, height: u16) {
        let position = self.camera.position;
        self.camera = terminal_camera(width, height);
        self.camera.position = position;
        self.renderer = AsciiRenderer::new(width as usize, height as usize);
    }

    fn render(&mut self) -> io::Result<()> {
        let model = Transform::rotation_matrix(&self.rotation);

        self.renderer.clear();
        self.renderer.render_mesh(&self.mesh, &model, &self.camera);

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0), terminal::Clear(ClearType::All))?;
        self.renderer.draw(&mut stdout)?;

        // Status line over the first row
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "{} | {} faces | FPS: {:.1} | WASD/Arrows=Rotate E/R=Roll +/-=Zoom Space=Spin Q=Quit",
                self.title,
                self.mesh.faces.len(),
                self.fps
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

/// Render one still view of `mesh` as plain text rows.
pub fn snapshot(mesh: &Mesh, columns: u16, rows: u16) -> Vec<String> {
    let (columns, rows) = (columns.max(1), rows.max(1));
    let camera = terminal_camera(columns, rows);
    let model = Transform::rotation_matrix(&RotationState::new(0.3, 0.3, 0.0));
    let mut renderer = AsciiRenderer::new(columns as usize, rows as usize);
    renderer.render_mesh(mesh, &model, &camera);
    renderer.lines().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_camera_corrects_cell_aspect() {
        let camera = terminal_camera(80, 40);
        assert!((camera.aspect - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_snapshot_shows_mesh() {
        let rows = snapshot(&Mesh::cube(2.0), 60, 30);
        assert_eq!(rows.len(), 30);
        assert!(rows[15].trim().len() > 0);
        assert!(rows[0].trim().is_empty());
    }

    #[test]
    fn test_snapshot_of_zero_width_grid() {
        let rows = snapshot(&Mesh::cube(2.0), 0, 40);
        assert_eq!(rows.len(), 40);
        assert!(rows.iter().all(|r| r.chars().count() == 1));
    }

    #[test]
    fn test_zero_width_terminal_camera_projects() {
        let camera = terminal_camera(0, 24);
        assert!(camera.aspect > 0.0);
        assert!(camera.projection_matrix().iter().all(|v| v.is_finite()));
    }
}
