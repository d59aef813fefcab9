/// Cell rasterizer for terminal rendering
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::Write;
use cubeview_core::{Canvas, Rgba, ScreenPoint};

const POINT_GLYPH: char = '@';
const LINE_GLYPH: char = '*';
const FILL_GLYPH: char = '#';

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: u32 = 2;

/// Region of the terminal that shows the logical surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub left: u16,
    pub top: u16,
    pub cols: u16,
    pub rows: u16,
}

impl Viewport {
    /// Largest region with the surface's aspect ratio, centered in the terminal.
    pub fn fit(width: u32, height: u32, term_cols: u16, term_rows: u16) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        let (term_cols32, term_rows32) = (u32::from(term_cols), u32::from(term_rows));

        let mut cols = term_cols32;
        let mut rows = cols * height / (CELL_ASPECT * width);
        if rows > term_rows32 {
            rows = term_rows32;
            cols = (rows * CELL_ASPECT * width / height).min(term_cols32);
        }
        let cols = cols.max(1).min(u32::from(u16::MAX)) as u16;
        let rows = rows.max(1).min(u32::from(u16::MAX)) as u16;

        Self {
            left: term_cols.saturating_sub(cols) / 2,
            top: term_rows.saturating_sub(rows) / 2,
            cols,
            rows,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    glyph: char,
    color: Rgba,
}

/// Canvas that rasterizes a logical pixel surface onto terminal cells.
pub struct CellCanvas {
    width: u32,
    height: u32,
    viewport: Viewport,
    background: Rgba,
    draw_color: Rgba,
    cells: Vec<Option<Cell>>,
}

impl CellCanvas {
    pub fn new(width: u32, height: u32, term_cols: u16, term_rows: u16) -> Self {
        let viewport = Viewport::fit(width, height, term_cols, term_rows);
        Self {
            width,
            height,
            viewport,
            background: Rgba::BLACK,
            draw_color: Rgba::WHITE,
            cells: vec![None; usize::from(viewport.cols) * usize::from(viewport.rows)],
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Refit the surface after the terminal changed size. Drops the frame.
    pub fn resize(&mut self, term_cols: u16, term_rows: u16) {
        self.viewport = Viewport::fit(self.width, self.height, term_cols, term_rows);
        self.cells = vec![None; usize::from(self.viewport.cols) * usize::from(self.viewport.rows)];
    }

    /// Map a surface pixel to fractional cell coordinates.
    fn to_cell(&self, point: ScreenPoint) -> (f64, f64) {
        (
            f64::from(point.x) * f64::from(self.viewport.cols) / f64::from(self.width.max(1)),
            f64::from(point.y) * f64::from(self.viewport.rows) / f64::from(self.height.max(1)),
        )
    }

    fn plot(&mut self, col: i64, row: i64, glyph: char, color: Rgba) {
        let (cols, rows) = (i64::from(self.viewport.cols), i64::from(self.viewport.rows));
        if col < 0 || row < 0 || col >= cols || row >= rows {
            return;
        }
        self.cells[(row * cols + col) as usize] = Some(Cell { glyph, color });
    }

    fn draw_segment(&mut self, from: ScreenPoint, to: ScreenPoint) {
        // Half a cell short of the edge so rounding never lands outside
        let max_col = f64::from(self.viewport.cols) - 0.5;
        let max_row = f64::from(self.viewport.rows) - 0.5;
        let Some(((x0, y0), (x1, y1))) = clip_segment(
            self.to_cell(from),
            self.to_cell(to),
            (0.0, 0.0),
            (max_col, max_row),
        ) else {
            return;
        };

        // Bresenham over the clipped, in-bounds segment
        let (mut x, mut y) = (x0.floor() as i64, y0.floor() as i64);
        let (x_end, y_end) = (x1.floor() as i64, y1.floor() as i64);
        let dx = (x_end - x).abs();
        let dy = -(y_end - y).abs();
        let sx = if x < x_end { 1 } else { -1 };
        let sy = if y < y_end { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.plot(x, y, LINE_GLYPH, self.draw_color);
            if x == x_end && y == y_end {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.queue(SetBackgroundColor(to_color(self.background)))?;

        let mut current = None;
        for row in 0..usize::from(self.viewport.rows) {
            writer.queue(cursor::MoveTo(self.viewport.left, self.viewport.top + row as u16))?;
            for col in 0..usize::from(self.viewport.cols) {
                match self.cells[row * usize::from(self.viewport.cols) + col] {
                    Some(cell) => {
                        if current != Some(cell.color) {
                            writer.queue(SetForegroundColor(to_color(cell.color)))?;
                            current = Some(cell.color);
                        }
                        writer.queue(Print(cell.glyph))?;
                    }
                    None => {
                        writer.queue(Print(' '))?;
                    }
                }
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl Canvas for CellCanvas {
    fn clear(&mut self, color: Rgba) {
        self.background = color;
        self.cells.fill(None);
    }

    fn set_draw_color(&mut self, color: Rgba) {
        self.draw_color = color;
    }

    fn draw_points(&mut self, points: &[ScreenPoint]) {
        for &point in points {
            let (col, row) = self.to_cell(point);
            self.plot(col.floor() as i64, row.floor() as i64, POINT_GLYPH, self.draw_color);
        }
    }

    fn draw_lines(&mut self, points: &[ScreenPoint]) {
        for pair in points.windows(2) {
            self.draw_segment(pair[0], pair[1]);
        }
    }

    fn fill_triangle(&mut self, a: ScreenPoint, b: ScreenPoint, c: ScreenPoint, color: Rgba) {
        let (v0, v1, v2) = (self.to_cell(a), self.to_cell(b), self.to_cell(c));

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor().max(0.0) as i64;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil().min(f64::from(self.viewport.cols) - 1.0) as i64;
        let min_y = v0.1.min(v1.1).min(v2.1).floor().max(0.0) as i64;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil().min(f64::from(self.viewport.rows) - 1.0) as i64;

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                // Sample at the cell center
                if covers(v0, v1, v2, (x as f64 + 0.5, y as f64 + 0.5)) {
                    self.plot(x, y, FILL_GLYPH, color);
                }
            }
        }
    }

    fn present(&mut self) -> std::io::Result<()> {
        // Output is driven by the backend, which owns the writer
        Ok(())
    }
}

fn to_color(color: Rgba) -> Color {
    Color::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

/// Liang-Barsky clip of a segment against an axis-aligned box.
fn clip_segment(
    from: (f64, f64),
    to: (f64, f64),
    min: (f64, f64),
    max: (f64, f64),
) -> Option<((f64, f64), (f64, f64))> {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let mut t0: f64 = 0.0;
    let mut t1: f64 = 1.0;

    for (p, q) in [
        (-dx, from.0 - min.0),
        (dx, max.0 - from.0),
        (-dy, from.1 - min.1),
        (dy, max.1 - from.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }

    Some((
        (from.0 + t0 * dx, from.1 + t0 * dy),
        (from.0 + t1 * dx, from.1 + t1 * dy),
    ))
}

/// Twice the signed area of `a`, `b`, `p`. Positive when `p` lies left of `a` -> `b`.
fn edge(a: (f64, f64), b: (f64, f64), p: (f64, f64)) -> f64 {
    (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0)
}

/// Whether `p` is inside or on the triangle, for either winding.
/// Degenerate triangles cover nothing.
fn covers(v0: (f64, f64), v1: (f64, f64), v2: (f64, f64), p: (f64, f64)) -> bool {
    let area = edge(v0, v1, v2);
    if area.abs() < 1e-9 {
        return false;
    }

    let sides = [edge(v1, v2, p), edge(v2, v0, p), edge(v0, v1, p)];
    if area > 0.0 {
        sides.iter().all(|&side| side >= 0.0)
    } else {
        sides.iter().all(|&side| side <= 0.0)
    }
}
