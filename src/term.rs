use std::{io::{Stdout, Write, stdout}, time::Duration};

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::event::{self, KeyCode, KeyEvent, KeyModifiers, poll, read};
use crossterm::style::Color;
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use log::warn;

use crate::geometry::{Geometry, Position};
use crate::platform::{Event, InputSource, Key, Renderer};

pub type TermInt = u16;
pub type Coords = (TermInt, TermInt);

/// Terminal columns used for one board cell, so cells come out roughly square.
const CELL_WIDTH: i32 = 2;
const CELL_TEXT: &str = "  ";

/// Per-cell colors for the frame being drawn and for the frame on screen.
struct Canvas {
    columns: i32,
    rows: i32,
    cell_size: i32,
    back: Vec<Color>,
    front: Vec<Option<Color>>,
}

impl Canvas {
    fn new(geometry: &Geometry, background: Color) -> Self {
        let cells = (geometry.columns() * geometry.rows()) as usize;
        Canvas {
            columns: geometry.columns(),
            rows: geometry.rows(),
            cell_size: geometry.cell_size(),
            back: vec![background; cells],
            front: vec![None; cells],
        }
    }

    fn fill(&mut self, color: Color) {
        for cell in self.back.iter_mut() {
            *cell = color;
        }
    }

    /// Paints every cell the square overlaps, clipped to the board.
    fn fill_square(&mut self, position: Position, size: i32, color: Color) {
        if size <= 0 {
            return;
        }

        let first_col = position.x.div_euclid(self.cell_size).max(0);
        let last_col = (position.x + size - 1).div_euclid(self.cell_size).min(self.columns - 1);
        let first_row = position.y.div_euclid(self.cell_size).max(0);
        let last_row = (position.y + size - 1).div_euclid(self.cell_size).min(self.rows - 1);

        for row in first_row..=last_row {
            for col in first_col..=last_col {
                self.back[(row * self.columns + col) as usize] = color;
            }
        }
    }

    /// Cells whose color differs from what is on screen, marking them as shown.
    fn take_changes(&mut self) -> Vec<(i32, i32, Color)> {
        let mut changes = vec![];

        for (i, (&color, shown)) in self.back.iter().zip(self.front.iter_mut()).enumerate() {
            if *shown != Some(color) {
                *shown = Some(color);
                let i = i as i32;
                changes.push((i % self.columns, i / self.columns, color));
            }
        }

        changes
    }

    /// Terminal columns and rows needed to show the board and its border.
    fn required_size(&self) -> (i32, i32) {
        (self.columns * CELL_WIDTH + 2, self.rows + 2)
    }

    fn invalidate(&mut self) {
        for shown in self.front.iter_mut() {
            *shown = None;
        }
    }
}

pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    canvas: Canvas,
}

impl TermManager {
    pub fn new(geometry: &Geometry, background: Color) -> crossterm::Result<Self> {
        let (width, height) = terminal::size()?;
        let stdout = stdout();
        let canvas = Canvas::new(geometry, background);
        Ok(TermManager { width, height, stdout, canvas })
    }

    pub fn setup(&mut self) -> crossterm::Result<()> {
        execute!(self.stdout, EnterAlternateScreen, terminal::SetTitle("Snake"))?;
        terminal::enable_raw_mode()?;
        execute!(
            self.stdout,
            cursor::Hide,
            cursor::DisableBlinking,
            terminal::Clear(ClearType::All)
        )?;

        let (needed_width, needed_height) = self.canvas.required_size();
        if !self.fits(needed_width, needed_height) {
            warn!(
                "Terminal is {}x{} but the board needs {}x{}, part of it will not be shown",
                self.width, self.height, needed_width, needed_height
            );
        }

        self.canvas.invalidate();
        self.draw_borders()?;
        self.flush()
    }

    pub fn restore(&mut self) -> crossterm::Result<()> {
        terminal::disable_raw_mode()?;
        execute!(
            self.stdout,
            style::ResetColor,
            cursor::Show,
            cursor::EnableBlinking,
            LeaveAlternateScreen
        )
    }

    pub fn get_terminal_size(&self) -> Coords {
        (self.width, self.height)
    }

    ///////////////////////////////////////////////////////////////////////////

    /// Frames the board, which starts one row and column in from the corner.
    fn draw_borders(&mut self) -> crossterm::Result<()> {
        let end_x = self.canvas.columns * CELL_WIDTH + 1;
        let end_y = self.canvas.rows + 1;

        for x in 0..=end_x {
            let ch = if x == 0 || x == end_x {'+'} else {'-'};
            self.print_at((x, 0), ch)?;
            self.print_at((x, end_y), ch)?;
        }

        for y in 1..end_y {
            self.print_at((0, y), '|')?;
            self.print_at((end_x, y), '|')?;
        }

        Ok(())
    }

    fn fits(&self, width: i32, height: i32) -> bool {
        width <= self.width as i32 && height <= self.height as i32
    }

    fn print_at(&mut self, (x, y): (i32, i32), ch: char) -> crossterm::Result<()> {
        if let Some((x, y)) = self.visible(x, y, 1) {
            queue!(self.stdout, cursor::MoveTo(x, y), style::Print(ch))?;
        }
        Ok(())
    }

    fn paint_cell(&mut self, col: i32, row: i32, color: Color) -> crossterm::Result<()> {
        if let Some((x, y)) = self.visible(1 + col * CELL_WIDTH, 1 + row, CELL_WIDTH) {
            queue!(
                self.stdout,
                cursor::MoveTo(x, y),
                style::SetBackgroundColor(color),
                style::Print(CELL_TEXT)
            )?;
        }
        Ok(())
    }

    /// Terminal coordinates for `span` columns at (x, y), if they fit on screen.
    fn visible(&self, x: i32, y: i32, span: i32) -> Option<Coords> {
        if x < 0 || y < 0 || x + span > self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some((x as TermInt, y as TermInt))
    }

    fn flush(&mut self) -> crossterm::Result<()> {
        self.stdout.flush()?;
        Ok(())
    }
}

impl Renderer for TermManager {
    fn draw_square(&mut self, position: Position, size: i32, color: Color) {
        self.canvas.fill_square(position, size, color);
    }

    fn clear(&mut self, color: Color) {
        self.canvas.fill(color);
    }

    fn present(&mut self) -> crossterm::Result<()> {
        for (col, row, color) in self.canvas.take_changes() {
            self.paint_cell(col, row, color)?;
        }

        queue!(self.stdout, style::ResetColor)?;
        self.flush()
    }
}

impl InputSource for TermManager {
    fn poll_events(&mut self) -> crossterm::Result<Vec<Event>> {
        let mut events = vec![];

        while poll(Duration::from_millis(0))? {
            if let event::Event::Key(ev) = read()? {
                events.extend(translate_key(&ev));
            }
        }

        Ok(events)
    }
}

/// Terminals only report presses, so a press stands in for the key going up.
fn translate_key(ev: &KeyEvent) -> Option<Event> {
    if is_ctrl_c(ev) {
        return Some(Event::Quit);
    }

    let key = match ev.code {
        KeyCode::Char('w') | KeyCode::Up => Key::Up,
        KeyCode::Char('a') | KeyCode::Left => Key::Left,
        KeyCode::Char('s') | KeyCode::Down => Key::Down,
        KeyCode::Char('d') | KeyCode::Right => Key::Right,
        KeyCode::Esc => Key::Escape,
        _ => return None,
    };

    Some(Event::KeyUp(key))
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL)
}
