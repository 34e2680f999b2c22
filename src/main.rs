use anyhow::{bail, Context, Result};
use crossterm::{
    cursor, execute,
    terminal::{self, Clear, ClearType},
};
use log::{info, trace};
use perlin_field::texture::Rgba8;
use perlin_field::{Field2, NoiseField, Octaves};
use std::io::{stdout, Write};

mod config;
mod viewport;

use config::ViewerConfig;
use viewport::Viewport;

const PNG_SIZE: u32 = 512;

fn get_terminal_size() -> (u32, u32) {
    match terminal::size() {
        Ok((cols, rows)) => (cols as u32, rows as u32),
        Err(_) => (80, 24), // fallback
    }
}

struct Viewer {
    noise: NoiseField,
    octaves: Octaves,
    viewport: Viewport,
    zspeed: f64,
    terminal_width: u32,
    terminal_height: u32,
}

impl Viewer {
    fn new(config: &ViewerConfig) -> Result<Self> {
        let (terminal_width, terminal_height) = get_terminal_size();

        Ok(Self {
            noise: config.noise_field(),
            octaves: config.octaves()?,
            viewport: Viewport::new(config.scale),
            zspeed: config.zspeed,
            terminal_width,
            terminal_height,
        })
    }

    /// Each terminal row holds two pixel rows.
    fn pixel_size(&self) -> (u32, u32) {
        (self.terminal_width, self.terminal_height * 2)
    }

    fn frame(&self, width: u32, height: u32) -> Result<Field2> {
        let (xs, ys) = self.viewport.axes(width, height);
        self.octaves
            .field2d(&self.noise, &xs, &ys, self.viewport.depth)
            .context("failed to sample noise frame")
    }

    fn handle_input(&mut self) -> Result<bool> {
        use crossterm::event::{self, Event, KeyCode, KeyEvent};

        // Non-blocking poll, the frame loop paces itself
        if event::poll(std::time::Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(KeyEvent { code, .. }) => {
                    if matches!(code, KeyCode::Char('x') | KeyCode::Esc) {
                        return Ok(false);
                    }
                }
                Event::Resize(cols, rows) => {
                    self.terminal_width = cols as u32;
                    self.terminal_height = rows as u32;
                    execute!(stdout(), Clear(ClearType::All))?;
                }
                _ => {}
            }
        }
        Ok(true)
    }

    fn render(&mut self) -> Result<()> {
        let (width, height) = self.pixel_size();
        let field = self.frame(width, height)?;
        trace!("frame at z={:.3}, {}x{} pixels", self.viewport.depth, width, height);

        self.present_to_terminal(&field.to_rgba(), width, height)?;
        self.viewport.advance(self.zspeed);
        Ok(())
    }

    fn present_to_terminal(&self, pixels: &[Rgba8], width: u32, height: u32) -> Result<()> {
        let mut stdout = std::io::BufWriter::new(std::io::stdout());

        write!(stdout, "\x1b[?2026h")?; // Begin synchronized update
        write!(stdout, "\x1b[H")?;

        // Track previous colors to avoid unnecessary ANSI code output
        let mut prev: Option<([u8; 3], [u8; 3])> = None;

        let pixel = |x: u32, y: u32| {
            pixels
                .get((y * width + x) as usize)
                .map_or([0, 0, 0], Rgba8::rgb)
        };

        let mut y = 0;
        let mut terminal_row = 1;
        while y < height {
            // Explicit positioning avoids line wrapping
            write!(stdout, "\x1b[{};1H", terminal_row)?;

            for x in 0..width {
                let upper = pixel(x, y);
                let lower = if y + 1 < height { pixel(x, y + 1) } else { [0, 0, 0] };

                if prev != Some((upper, lower)) {
                    write!(stdout, "\x1b[38;2;{};{};{}m", upper[0], upper[1], upper[2])?;
                    write!(stdout, "\x1b[48;2;{};{};{}m", lower[0], lower[1], lower[2])?;
                    prev = Some((upper, lower));
                }

                write!(stdout, "▀")?;
            }

            y += 2;
            terminal_row += 1;
        }

        write!(stdout, "\x1b[0m\x1b[?2026l")?; // Reset colors, end synchronized update
        stdout.flush()?;
        Ok(())
    }

    fn run(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = loop {
            if !self.handle_input()? {
                break Ok(());
            }

            if let Err(e) = self.render() {
                break Err(e);
            }

            std::thread::sleep(std::time::Duration::from_millis(33));
        };

        execute!(stdout(), cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()?;

        result
    }
}

fn write_png(config: &ViewerConfig, path: &str) -> Result<()> {
    let viewer = Viewer::new(config)?;
    let field = viewer.frame(PNG_SIZE, PNG_SIZE)?;
    field
        .save_png(path)
        .with_context(|| format!("failed to write {path}"))?;

    if let Some((lo, hi)) = field.min_max() {
        info!("wrote {path}: {PNG_SIZE}x{PNG_SIZE}, values in [{lo:.4}, {hi:.4}]");
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let config = ViewerConfig::from_env()?;
    info!("viewer config: {config:?}");

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [] => Viewer::new(&config)?.run(),
        [command, path] if command == "png" => write_png(&config, path),
        _ => bail!("usage: perlin-field [png <path>]"),
    }
}
