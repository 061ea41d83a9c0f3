//! Box-drawing borders and titled panels for HUD layers.
//!
//! Drawing goes through [`GridBuffer::set`], so boxes that hang off the edge of
//! a grid are clipped cell by cell.

use crate::grid::GridBuffer;
use crate::types::{Cell, Rgb};

/// Characters used to draw a box border.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderStyle {
    pub top_left: char,
    pub top_right: char,
    pub bottom_left: char,
    pub bottom_right: char,
    pub horizontal: char,
    pub vertical: char,
    pub cross: char,
    pub t_down: char,
    pub t_up: char,
    pub t_right: char,
    pub t_left: char,
}

impl BorderStyle {
    /// `+`, `-` and `|` only.
    pub const ASCII: BorderStyle = BorderStyle {
        top_left: '+',
        top_right: '+',
        bottom_left: '+',
        bottom_right: '+',
        horizontal: '-',
        vertical: '|',
        cross: '+',
        t_down: '+',
        t_up: '+',
        t_right: '+',
        t_left: '+',
    };

    pub const SINGLE: BorderStyle = BorderStyle {
        top_left: '┌',
        top_right: '┐',
        bottom_left: '└',
        bottom_right: '┘',
        horizontal: '─',
        vertical: '│',
        cross: '┼',
        t_down: '┬',
        t_up: '┴',
        t_right: '├',
        t_left: '┤',
    };

    pub const DOUBLE: BorderStyle = BorderStyle {
        top_left: '╔',
        top_right: '╗',
        bottom_left: '╚',
        bottom_right: '╝',
        horizontal: '═',
        vertical: '║',
        cross: '╬',
        t_down: '╦',
        t_up: '╩',
        t_right: '╠',
        t_left: '╣',
    };

    pub const HEAVY: BorderStyle = BorderStyle {
        top_left: '┏',
        top_right: '┓',
        bottom_left: '┗',
        bottom_right: '┛',
        horizontal: '━',
        vertical: '┃',
        cross: '╋',
        t_down: '┳',
        t_up: '┻',
        t_right: '┣',
        t_left: '┫',
    };

    pub const ROUNDED: BorderStyle = BorderStyle {
        top_left: '╭',
        top_right: '╮',
        bottom_left: '╰',
        bottom_right: '╯',
        ..BorderStyle::SINGLE
    };

    pub const DASHED: BorderStyle = BorderStyle {
        horizontal: '┄',
        vertical: '┆',
        ..BorderStyle::SINGLE
    };

    /// Full blocks with an upper half block for horizontal edges.
    pub const BLOCK: BorderStyle = BorderStyle {
        top_left: '█',
        top_right: '█',
        bottom_left: '█',
        bottom_right: '█',
        horizontal: '▀',
        vertical: '█',
        cross: '█',
        t_down: '█',
        t_up: '█',
        t_right: '█',
        t_left: '█',
    };

    /// Look up a preset by name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "ascii" => Some(Self::ASCII),
            "single" => Some(Self::SINGLE),
            "double" => Some(Self::DOUBLE),
            "heavy" => Some(Self::HEAVY),
            "rounded" => Some(Self::ROUNDED),
            "dashed" => Some(Self::DASHED),
            "block" => Some(Self::BLOCK),
            _ => None,
        }
    }
}

impl Default for BorderStyle {
    fn default() -> Self {
        Self::SINGLE
    }
}

/// Colors and border for [`GridBuffer::draw_box`] and [`GridBuffer::draw_panel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxStyle {
    pub border: BorderStyle,
    pub border_fg: Rgb,
    pub title_fg: Rgb,
    /// Background for the border, title and interior.
    pub bg: Option<Rgb>,
    /// Paint the interior with blanks so the box hides what is beneath it.
    pub fill: bool,
}

impl Default for BoxStyle {
    fn default() -> Self {
        Self {
            border: BorderStyle::SINGLE,
            border_fg: Rgb::new(128, 128, 128),
            title_fg: Rgb::new(255, 255, 100),
            bg: None,
            fill: true,
        }
    }
}

fn styled(ch: char, fg: Rgb, bg: Option<Rgb>) -> Cell {
    Cell {
        bg,
        ..Cell::glyph(ch, fg)
    }
}

impl GridBuffer {
    /// Draw a bordered box whose outer size is `width` x `height`.
    pub fn draw_box(&mut self, x: i32, y: i32, width: u16, height: u16, style: &BoxStyle) {
        if width == 0 || height == 0 {
            return;
        }
        let b = &style.border;
        let cell = |ch| styled(ch, style.border_fg, style.bg);
        let right = x.saturating_add(width as i32 - 1);
        let bottom = y.saturating_add(height as i32 - 1);

        for dx in 1..(width as i32 - 1) {
            self.set(x.saturating_add(dx), y, cell(b.horizontal));
            self.set(x.saturating_add(dx), bottom, cell(b.horizontal));
        }
        for dy in 1..(height as i32 - 1) {
            self.set(x, y.saturating_add(dy), cell(b.vertical));
            self.set(right, y.saturating_add(dy), cell(b.vertical));
        }

        self.set(x, y, cell(b.top_left));
        self.set(right, y, cell(b.top_right));
        self.set(x, bottom, cell(b.bottom_left));
        self.set(right, bottom, cell(b.bottom_right));

        if style.fill && width > 2 && height > 2 {
            self.fill_rect(
                x.saturating_add(1),
                y.saturating_add(1),
                width - 2,
                height - 2,
                styled(' ', style.border_fg, style.bg),
            );
        }
    }

    /// Draw a box with a title centered on its top edge.
    ///
    /// Titles longer than `width - 4` are cut and end in `…`. Boxes narrower
    /// than 5 cells get no title.
    pub fn draw_panel(
        &mut self,
        x: i32,
        y: i32,
        width: u16,
        height: u16,
        title: &str,
        style: &BoxStyle,
    ) {
        self.draw_box(x, y, width, height, style);
        if title.is_empty() || width <= 4 {
            return;
        }

        let max = width as usize - 4;
        let count = title.chars().count();
        let (shown, ellipsis) = if count > max {
            (max - 1, true)
        } else {
            (count, false)
        };
        let len = shown + usize::from(ellipsis);

        let mut cx = x.saturating_add(((width as usize - len) / 2) as i32);
        for ch in title.chars().take(shown) {
            self.set(cx, y, styled(ch, style.title_fg, style.bg));
            cx = cx.saturating_add(1);
        }
        if ellipsis {
            self.set(cx, y, styled('…', style.title_fg, style.bg));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_text(grid: &GridBuffer, y: u16) -> String {
        grid.row(y)
            .iter()
            .map(|c| c.glyph.unwrap_or(' '))
            .collect()
    }

    #[test]
    fn draws_a_filled_single_box() {
        let mut grid = GridBuffer::new(5, 3);
        grid.draw_box(0, 0, 5, 3, &BoxStyle::default());
        assert_eq!(row_text(&grid, 0), "┌───┐");
        assert_eq!(row_text(&grid, 1), "│   │");
        assert_eq!(row_text(&grid, 2), "└───┘");
        // Interior blanks are real cells, not transparent.
        assert!(!grid.get(2, 1).unwrap().is_empty());
    }

    #[test]
    fn unfilled_boxes_leave_the_interior_transparent() {
        let mut grid = GridBuffer::new(4, 4);
        let style = BoxStyle {
            border: BorderStyle::ASCII,
            fill: false,
            ..BoxStyle::default()
        };
        grid.draw_box(0, 0, 4, 4, &style);
        assert_eq!(row_text(&grid, 0), "+--+");
        assert!(grid.get(1, 1).unwrap().is_empty());
    }

    #[test]
    fn boxes_are_clipped_at_grid_edges() {
        let mut grid = GridBuffer::new(4, 3);
        grid.draw_box(-2, 1, 5, 4, &BoxStyle::default());
        assert_eq!(row_text(&grid, 0), "    ");
        assert_eq!(row_text(&grid, 1), "──┐ ");
        assert_eq!(row_text(&grid, 2), "  │ ");

        // Far off-grid and at the coordinate limit: no panic, nothing drawn.
        let mut grid = GridBuffer::new(4, 3);
        grid.draw_box(i32::MAX - 1, i32::MAX - 1, 6, 6, &BoxStyle::default());
        assert!(grid.cells().iter().all(Cell::is_empty));
    }

    #[test]
    fn panel_title_is_centered() {
        let mut grid = GridBuffer::new(12, 3);
        grid.draw_panel(0, 0, 12, 3, "HUD", &BoxStyle::default());
        assert_eq!(row_text(&grid, 0), "┌───HUD────┐");
        assert_eq!(grid.get(4, 0).unwrap().fg, Rgb::new(255, 255, 100));
    }

    #[test]
    fn long_titles_are_truncated_with_an_ellipsis() {
        let mut grid = GridBuffer::new(10, 3);
        grid.draw_panel(0, 0, 10, 3, "inventory", &BoxStyle::default());
        // Room for width - 4 = 6 characters, the last being the ellipsis.
        assert_eq!(row_text(&grid, 0), "┌─inven…─┐");

        let mut grid = GridBuffer::new(4, 3);
        grid.draw_panel(0, 0, 4, 3, "x", &BoxStyle::default());
        assert_eq!(row_text(&grid, 0), "┌──┐");
    }

    #[test]
    fn presets_by_name() {
        assert_eq!(BorderStyle::from_name("Double"), Some(BorderStyle::DOUBLE));
        assert_eq!(BorderStyle::from_name("rounded").unwrap().horizontal, '─');
        assert_eq!(BorderStyle::from_name("dashed").unwrap().top_left, '┌');
        assert_eq!(BorderStyle::from_name("zigzag"), None);
    }
}
