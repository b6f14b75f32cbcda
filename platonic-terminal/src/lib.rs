/// Terminal front end: main scene, icon strip, hover tooltip
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use platonic_core::{FrameDriver, SceneConfig, SceneSession};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tracing::info;

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Icon cells: twice as wide as tall so the square viewport looks square
const ICON_WIDTH: u16 = 20;
const ICON_HEIGHT: u16 = 10;
const ICON_GAP: u16 = 2;
/// Header row, icon labels row, status row
const CHROME_ROWS: u16 = 3;

/// Screen regions, in terminal cells
#[derive(Debug, Clone, Copy, PartialEq)]
struct Layout {
    main_top: u16,
    main_width: u16,
    main_height: u16,
    icons_top: u16,
    status_row: u16,
}

impl Layout {
    fn new(columns: u16, rows: u16) -> Self {
        let main_height = rows.saturating_sub(ICON_HEIGHT + CHROME_ROWS).max(4);
        let icons_top = 1 + main_height;
        Self {
            main_top: 1,
            main_width: columns.max(8),
            main_height,
            icons_top,
            status_row: icons_top + ICON_HEIGHT + 1,
        }
    }

    /// Pixel space of the session: one unit per column, two per row
    fn viewport(&self) -> (f32, f32) {
        (self.main_width as f32, self.main_height as f32 * 2.0)
    }

    fn to_pixels(&self, column: u16, row: u16) -> Option<(f32, f32)> {
        if row < self.main_top || row >= self.main_top + self.main_height {
            return None;
        }
        let y = (row - self.main_top) as f32 * 2.0 + 1.0;
        Some((column as f32 + 0.5, y))
    }

    fn icon_column(index: usize) -> u16 {
        index as u16 * (ICON_WIDTH + ICON_GAP)
    }

    fn icon_at(&self, column: u16, row: u16, count: usize) -> Option<usize> {
        if row < self.icons_top || row >= self.icons_top + ICON_HEIGHT {
            return None;
        }
        let slot = column / (ICON_WIDTH + ICON_GAP);
        let within = column % (ICON_WIDTH + ICON_GAP);
        (within < ICON_WIDTH && (slot as usize) < count).then_some(slot as usize)
    }
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    session: SceneSession,
    driver: FrameDriver,
    main: AsciiRenderer,
    icons: Vec<AsciiRenderer>,
    layout: Layout,
    status: String,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(config: SceneConfig) -> io::Result<Self> {
        let (columns, rows) = terminal::size()?;
        let layout = Layout::new(columns, rows);
        let (width, height) = layout.viewport();
        let session = SceneSession::new(config, width, height);
        let icons = session
            .icons()
            .iter()
            .map(|_| AsciiRenderer::new(ICON_WIDTH as usize, ICON_HEIGHT as usize))
            .collect();

        Ok(Self {
            main: AsciiRenderer::new(layout.main_width as usize, layout.main_height as usize),
            session,
            driver: FrameDriver::new(),
            icons,
            layout,
            status: String::new(),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;
        terminal::disable_raw_mode()?;

        info!(frames = self.driver.frames(), "terminal session closed");
        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?)?;
            }

            // Update and render every view
            self.driver
                .tick(&mut self.session, &mut self.main, &mut self.icons);
            self.draw()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> io::Result<()> {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(columns, rows) => self.resize(columns, rows)?,
            _ => {}
        }
        Ok(())
    }

    fn handle_key(&mut self, KeyEvent { code, .. }: KeyEvent) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char('w') => {
                self.session.toggle_icon_wireframes();
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.session.zoom(1.0),
            KeyCode::Char('-') => self.session.zoom(-1.0),
            KeyCode::Up => self.session.rotate(0.0, -0.02),
            KeyCode::Down => self.session.rotate(0.0, 0.02),
            KeyCode::Left => self.session.rotate(-0.02, 0.0),
            KeyCode::Right => self.session.rotate(0.02, 0.0),
            KeyCode::Char('h') => self.session.pan(-2.0, 0.0),
            KeyCode::Char('l') => self.session.pan(2.0, 0.0),
            KeyCode::Char('k') => self.session.pan(0.0, -2.0),
            KeyCode::Char('j') => self.session.pan(0.0, 2.0),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let (column, row) = (mouse.column, mouse.row);
        let pixels = self.layout.to_pixels(column, row);

        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(MouseButton::Left) => {
                if let Some((x, y)) = pixels {
                    self.session.pointer_move(x, y);
                }
            }
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some((x, y)) = pixels {
                    self.session.pointer_down(x, y);
                } else if let Some(index) =
                    self.layout
                        .icon_at(column, row, self.session.icons().len())
                {
                    if let Some(url) = self.session.icon_link(index) {
                        self.status = format!("open {url}");
                    }
                }
            }
            MouseEventKind::Up(MouseButton::Left) => self.session.pointer_up(),
            MouseEventKind::ScrollUp => self.session.zoom(1.0),
            MouseEventKind::ScrollDown => self.session.zoom(-1.0),
            _ => {}
        }
    }

    fn resize(&mut self, columns: u16, rows: u16) -> io::Result<()> {
        self.layout = Layout::new(columns, rows);
        let (width, height) = self.layout.viewport();
        self.session.resize(width, height);
        self.main
            .resize(self.layout.main_width as usize, self.layout.main_height as usize);
        execute!(stdout(), terminal::Clear(ClearType::All))
    }

    fn draw(&self) -> io::Result<()> {
        let mut stdout = stdout();

        self.main.draw(&mut stdout, 0, self.layout.main_top)?;

        for (index, (renderer, icon)) in self.icons.iter().zip(self.session.icons()).enumerate() {
            let column = Layout::icon_column(index);
            renderer.draw(&mut stdout, column, self.layout.icons_top)?;
            let label: String = icon.name.chars().take(ICON_WIDTH as usize).collect();
            queue!(
                stdout,
                cursor::MoveTo(column, self.layout.icons_top + ICON_HEIGHT),
                Print(format!("{label:^width$}", width = ICON_WIDTH as usize))
            )?;
        }

        let tooltip = self.session.tooltip();
        if tooltip.visible {
            let column = (tooltip.x as u16).min(self.layout.main_width.saturating_sub(1));
            let row = self.layout.main_top + (tooltip.y / 2.0) as u16;
            queue!(
                stdout,
                cursor::MoveTo(column, row),
                SetBackgroundColor(Color::White),
                SetForegroundColor(Color::Black),
                Print(&tooltip.text),
                ResetColor
            )?;
        }

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Platonic Solids | FPS: {:.1} | Orbit: {:?} | Mouse=Drag/Orbit Arrows=Rotate HJKL=Pan +/-=Zoom W=Icon wireframe Q=Quit",
                self.fps,
                self.session.orbit_state()
            )),
            ResetColor,
            cursor::MoveTo(0, self.layout.status_row),
            terminal::Clear(ClearType::CurrentLine),
            Print(&self.status)
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_regions() {
        let layout = Layout::new(120, 40);
        assert_eq!(layout.main_height, 27);
        assert_eq!(layout.viewport(), (120.0, 54.0));
        assert_eq!(layout.to_pixels(10, 0), None);
        assert_eq!(layout.to_pixels(10, 1), Some((10.5, 1.0)));
        assert_eq!(layout.to_pixels(10, 28), None);
    }

    #[test]
    fn test_icon_hit_regions() {
        let layout = Layout::new(120, 40);
        let top = layout.icons_top;
        assert_eq!(layout.icon_at(0, top, 5), Some(0));
        assert_eq!(layout.icon_at(21, top, 5), None); // gap
        assert_eq!(layout.icon_at(22, top + 9, 5), Some(1));
        assert_eq!(layout.icon_at(110, top, 5), None); // past the last icon
        assert_eq!(layout.icon_at(0, top + ICON_HEIGHT, 5), None);
    }
}
