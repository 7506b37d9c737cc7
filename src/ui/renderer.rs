/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// The play area is scaled onto a bordered field that keeps roughly the
/// area's aspect ratio (terminal cells are about twice as tall as wide).

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::area::{PlayArea, Point};
use crate::domain::entity::FLOWER_HEAD_OFFSET;
use crate::sim::session::{Phase, SessionSnapshot};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit background for every cell so gaps between rows match.
    const BASE_BG: Color = Color::Rgb { r: 12, g: 14, b: 20 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel that differs from any real cell; forces a full repaint.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        let bg = match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        };
        Cell { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }

    fn put_centered(&mut self, y: usize, s: &str, fg: Color, bg: Color) {
        let len = s.chars().count();
        let x = self.width.saturating_sub(len) / 2;
        self.put_str(x, y, s, fg, bg);
    }

    fn fill_row(&mut self, y: usize, x0: usize, x1: usize, bg: Color) {
        for x in x0..x1.min(self.width) {
            self.set(x, y, Cell::new(' ', Color::White, bg));
        }
    }
}

// ── Field: where the play area lands on the terminal ──

const HUD_ROW: usize = 0;
const FIELD_ROW: usize = 1;
/// Rows outside the field: HUD + help bar.
const RESERVED_ROWS: usize = 2;
/// Terminal cells are roughly this many times taller than wide.
const CELL_ASPECT: f64 = 2.0;

/// Bordered rectangle on the terminal. `(col, row)` is the top-left border
/// corner; `inner_w × inner_h` cells are available inside the border.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Field {
    col: usize,
    row: usize,
    inner_w: usize,
    inner_h: usize,
}

impl Field {
    fn fit(term_w: usize, term_h: usize, area: &PlayArea) -> Option<Field> {
        let max_w = term_w.checked_sub(2)?;
        let max_h = term_h.checked_sub(RESERVED_ROWS + 2)?;
        if max_w < 10 || max_h < 5 || area.width == 0 || area.height == 0 {
            return None;
        }
        let ratio = area.width as f64 / area.height as f64 * CELL_ASPECT;
        let mut inner_h = max_h;
        let mut inner_w = ((inner_h as f64) * ratio).round() as usize;
        if inner_w > max_w {
            inner_w = max_w;
            inner_h = (((inner_w as f64) / ratio).round() as usize).clamp(1, max_h);
        }
        let inner_w = inner_w.max(1);
        Some(Field {
            col: (term_w - (inner_w + 2)) / 2,
            row: FIELD_ROW,
            inner_w,
            inner_h,
        })
    }

    /// Terminal cell for a play-area point, clamped inside the border.
    fn to_cell(&self, p: Point, area: &PlayArea) -> (usize, usize) {
        let fx = (p.x / area.width as f64).clamp(0.0, 1.0);
        let fy = (p.y / area.height as f64).clamp(0.0, 1.0);
        let cx = (fx * (self.inner_w - 1) as f64).round() as usize;
        let cy = (fy * (self.inner_h - 1) as f64).round() as usize;
        (self.col + 1 + cx, self.row + 1 + cy)
    }

    fn bottom(&self) -> usize {
        self.row + self.inner_h + 1
    }

    fn middle(&self) -> usize {
        self.row + 1 + self.inner_h / 2
    }
}

// ── Palette ──

const HUD_BG: Color = Color::Rgb { r: 25, g: 35, b: 30 };
const BORDER: Color = Color::Rgb { r: 60, g: 90, b: 60 };
const STEM: Color = Color::Rgb { r: 0, g: 100, b: 0 };
const WING: Color = Color::Rgb { r: 200, g: 100, b: 255 };
const BODY: Color = Color::Rgb { r: 150, g: 50, b: 200 };
const BANNER_BG: Color = Color::Rgb { r: 0, g: 0, b: 0 };
const DIM: Color = Color::DarkGrey;

fn to_term(c: crate::domain::entity::Color) -> Color {
    Color::Rgb { r: c.r, g: c.g, b: c.b }
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<Phase>,
    /// Terminal reports key releases (keyboard enhancement active).
    pub keyboard_enhanced: bool,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_phase: None,
            keyboard_enhanced: false,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        if terminal::supports_keyboard_enhancement().unwrap_or(false) {
            execute!(
                self.writer,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            self.keyboard_enhanced = true;
        }
        log::info!("terminal ready (key release events: {})", self.keyboard_enhanced);

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        if self.keyboard_enhanced {
            execute!(self.writer, PopKeyboardEnhancementFlags)?;
        }
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, snap: &SessionSnapshot, status: Option<&str>) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        if self.last_phase != Some(snap.phase) {
            self.back.cells.fill(Cell::INVALID);
            self.last_phase = Some(snap.phase);
        }

        compose(&mut self.front, snap, status);

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut cursor_at: Option<(usize, usize)> = None;

        queue!(self.writer, SetForegroundColor(last_fg), SetBackgroundColor(last_bg))?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) { continue; }

                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }
}

// ── Compose: build front buffer content ──

fn compose(buf: &mut FrameBuffer, snap: &SessionSnapshot, status: Option<&str>) {
    buf.clear();

    let field = match Field::fit(buf.width, buf.height, &snap.area) {
        Some(f) => f,
        None => {
            buf.put_str(0, 0, "Terminal too small", Color::White, Color::Reset);
            return;
        }
    };

    compose_hud(buf, snap);
    compose_border(buf, &field);
    compose_flowers(buf, &field, snap);
    compose_butterfly(buf, &field, snap);

    match snap.phase {
        Phase::Playing => {}
        Phase::LevelComplete => compose_level_complete(buf, &field, snap),
        Phase::GameOver(cause) => compose_game_over(buf, &field, snap, cause.headline()),
    }

    compose_help(buf, &field, snap, status);
}

fn compose_hud(buf: &mut FrameBuffer, snap: &SessionSnapshot) {
    let w = buf.width;
    buf.fill_row(HUD_ROW, 0, w, HUD_BG);

    let score = format!(" Score: {}", snap.score);
    buf.put_str(0, HUD_ROW, &score, Color::White, HUD_BG);

    let level = format!("Level: {}", snap.level);
    buf.put_centered(HUD_ROW, &level, Color::White, HUD_BG);

    // Last sixth of the limit (10s on level one) turns red.
    let time_fg = if snap.time_left * 6 <= snap.time_limit && snap.phase == Phase::Playing {
        Color::Rgb { r: 255, g: 90, b: 90 }
    } else {
        Color::White
    };
    let time = format!("Time: {:<3} ", snap.time_left);
    let x = w.saturating_sub(time.chars().count());
    buf.put_str(x, HUD_ROW, &time, time_fg, HUD_BG);
}

fn compose_border(buf: &mut FrameBuffer, f: &Field) {
    let right = f.col + f.inner_w + 1;
    let bottom = f.bottom();
    for x in f.col + 1..right {
        buf.set(x, f.row, Cell::new('─', BORDER, Color::Reset));
        buf.set(x, bottom, Cell::new('─', BORDER, Color::Reset));
    }
    for y in f.row + 1..bottom {
        buf.set(f.col, y, Cell::new('│', BORDER, Color::Reset));
        buf.set(right, y, Cell::new('│', BORDER, Color::Reset));
    }
    buf.set(f.col, f.row, Cell::new('┌', BORDER, Color::Reset));
    buf.set(right, f.row, Cell::new('┐', BORDER, Color::Reset));
    buf.set(f.col, bottom, Cell::new('└', BORDER, Color::Reset));
    buf.set(right, bottom, Cell::new('┘', BORDER, Color::Reset));
}

fn compose_flowers(buf: &mut FrameBuffer, f: &Field, snap: &SessionSnapshot) {
    for flower in snap.flowers.iter().filter(|fl| !fl.captured) {
        let head = Point::new(flower.pos.x, flower.pos.y - FLOWER_HEAD_OFFSET);
        let (hx, hy) = f.to_cell(head, &snap.area);
        let (sx, sy) = f.to_cell(flower.pos, &snap.area);
        if (sx, sy) != (hx, hy) {
            buf.set(sx, sy, Cell::new('│', STEM, Color::Reset));
        }
        buf.set(hx, hy, Cell::new('✿', to_term(flower.color), Color::Reset));
    }
}

fn compose_butterfly(buf: &mut FrameBuffer, f: &Field, snap: &SessionSnapshot) {
    let (x, y) = f.to_cell(snap.player, &snap.area);
    let left = f.col + 1;
    let right = f.col + f.inner_w;
    if x > left { buf.set(x - 1, y, Cell::new('Ƹ', WING, Color::Reset)); }
    buf.set(x, y, Cell::new('Ӝ', BODY, Color::Reset));
    if x < right { buf.set(x + 1, y, Cell::new('Ʒ', WING, Color::Reset)); }
}

/// Dark band across the field for end-of-level messages.
fn compose_banner(buf: &mut FrameBuffer, f: &Field, lines: &[(&str, Color)]) {
    let top = f.middle().saturating_sub(lines.len() / 2 + 1);
    let height = lines.len() + 2;
    for y in top..top + height {
        if y > f.row && y < f.bottom() {
            buf.fill_row(y, f.col + 1, f.col + f.inner_w + 1, BANNER_BG);
        }
    }
    for (i, (text, fg)) in lines.iter().enumerate() {
        let len = text.chars().count();
        let x = f.col + 1 + f.inner_w.saturating_sub(len) / 2;
        buf.put_str(x, top + 1 + i, text, *fg, BANNER_BG);
    }
}

fn compose_level_complete(buf: &mut FrameBuffer, f: &Field, snap: &SessionSnapshot) {
    let title = format!("Level {} Complete!", snap.level);
    compose_banner(buf, f, &[
        (title.as_str(), Color::Rgb { r: 255, g: 230, b: 90 }),
        ("", Color::White),
        ("Press SPACE for next level", Color::White),
    ]);
}

fn compose_game_over(buf: &mut FrameBuffer, f: &Field, snap: &SessionSnapshot, headline: &str) {
    let summary = format!("Final Score: {} | Level: {}", snap.score, snap.level);
    compose_banner(buf, f, &[
        (headline, Color::Rgb { r: 255, g: 120, b: 120 }),
        ("", Color::White),
        (summary.as_str(), Color::White),
        ("Press R to Restart or ESC to Exit", Color::Rgb { r: 120, g: 255, b: 120 }),
    ]);
}

fn compose_help(buf: &mut FrameBuffer, f: &Field, snap: &SessionSnapshot, status: Option<&str>) {
    let row = f.bottom() + 1;
    if row >= buf.height { return; }
    let help = match snap.phase {
        Phase::Playing => format!(
            " Flowers {}/{}   ←↑↓→/WASD: Fly   Q: Quit",
            snap.captured_count(), snap.flowers.len(),
        ),
        Phase::LevelComplete => " SPACE/ENTER: Next level   Q: Quit".to_string(),
        Phase::GameOver(_) => " R: Restart   ESC/Q: Quit".to_string(),
    };
    buf.put_str(f.col, row, &help, DIM, Color::Reset);

    if let Some(msg) = status {
        let right = f.col + f.inner_w + 2;
        let x = right.saturating_sub(msg.chars().count() + 1);
        buf.put_str(x, row, msg, Color::Rgb { r: 255, g: 230, b: 90 }, Color::Reset);
    }
}
