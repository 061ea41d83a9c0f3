//! Grid buffer: a fixed-size 2D array of cells.
//!
//! Every window owns one, and the final frame is one. Coordinates are signed so
//! callers can pass unclipped positions straight from game logic; anything out
//! of range is silently ignored.

use crate::types::{Cell, Rgb};

/// Display viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// 2D buffer of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

/// The merged grid produced once per frame for display.
pub type FrameBuffer = GridBuffer;

impl GridBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            cells: vec![Cell::default(); len],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Resize and clear.
    ///
    /// This preserves the underlying allocation when possible.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let len = (width as usize) * (height as usize);
        self.cells.clear();
        self.cells.resize(len, Cell::default());
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// One row of cells, or an empty slice when `y` is out of range.
    pub fn row(&self, y: u16) -> &[Cell] {
        if y >= self.height {
            return &[];
        }
        let w = self.width as usize;
        let start = y as usize * w;
        &self.cells[start..start + w]
    }

    /// Overwrite this buffer with `other`, reusing the allocation.
    pub fn copy_from(&mut self, other: &GridBuffer) {
        self.width = other.width;
        self.height = other.height;
        self.cells.clone_from(&other.cells);
    }

    #[inline(always)]
    pub(crate) fn idx(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.idx(x, y).is_some()
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.idx(x, y).map(|i| self.cells[i])
    }

    pub fn set(&mut self, x: i32, y: i32, cell: Cell) {
        if let Some(i) = self.idx(x, y) {
            self.cells[i] = cell;
        }
    }

    /// Reset every cell to empty.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    pub fn put(&mut self, x: i32, y: i32, ch: char, fg: Rgb) {
        self.set(x, y, Cell::glyph(ch, fg));
    }

    pub fn put_str(&mut self, x: i32, y: i32, s: &str, fg: Rgb) {
        let mut cx = x;
        for ch in s.chars() {
            if cx >= self.width as i32 {
                break;
            }
            self.put(cx, y, ch, fg);
            cx += 1;
        }
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: u16, h: u16, cell: Cell) {
        for dy in 0..h as i32 {
            for dx in 0..w as i32 {
                self.set(x.saturating_add(dx), y.saturating_add(dy), cell);
            }
        }
    }

    /// Non-empty cells with their positions, in row-major order.
    pub fn iter_filled(&self) -> impl Iterator<Item = (i32, i32, Cell)> + '_ {
        let w = self.width.max(1) as usize;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| !cell.is_empty())
            .map(move |(i, cell)| ((i % w) as i32, (i / w) as i32, *cell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_writes_are_ignored() {
        let mut grid = GridBuffer::new(3, 2);
        grid.put(-1, 0, 'x', Rgb::WHITE);
        grid.put(3, 0, 'x', Rgb::WHITE);
        grid.put(0, 2, 'x', Rgb::WHITE);
        assert!(grid.cells().iter().all(Cell::is_empty));
        assert_eq!(grid.get(5, 5), None);
    }

    #[test]
    fn put_str_stops_at_right_edge() {
        let mut grid = GridBuffer::new(4, 1);
        grid.put_str(2, 0, "abc", Rgb::WHITE);
        assert_eq!(grid.get(2, 0).unwrap().glyph, Some('a'));
        assert_eq!(grid.get(3, 0).unwrap().glyph, Some('b'));
    }

    #[test]
    fn iter_filled_reports_positions() {
        let mut grid = GridBuffer::new(4, 3);
        grid.put(1, 2, '@', Rgb::WHITE);
        grid.set(3, 0, Cell::fill(Rgb::new(1, 2, 3)));
        let filled: Vec<_> = grid.iter_filled().map(|(x, y, _)| (x, y)).collect();
        assert_eq!(filled, vec![(3, 0), (1, 2)]);
    }

    #[test]
    fn resize_clears_contents() {
        let mut grid = GridBuffer::new(2, 2);
        grid.put(0, 0, '#', Rgb::WHITE);
        grid.resize(3, 1);
        assert_eq!(grid.cells().len(), 3);
        assert!(grid.cells().iter().all(Cell::is_empty));
    }

    #[test]
    fn copy_from_matches_source() {
        let mut src = GridBuffer::new(3, 2);
        src.put(2, 1, '*', Rgb::WHITE);
        let mut dst = GridBuffer::new(1, 1);
        dst.copy_from(&src);
        assert_eq!(dst, src);
        assert_eq!(dst.row(1)[2].glyph, Some('*'));
        assert!(dst.row(2).is_empty());
    }
}
