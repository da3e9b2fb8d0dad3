use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::theme::Palette;

/// Character grid that maps a game's field coordinates onto terminal cells.
pub struct Canvas {
    width: usize,
    height: usize,
    sx: f32,
    sy: f32,
    grid: Vec<Vec<(char, Style)>>,
    base: Style,
}

impl Canvas {
    pub fn new(area: Rect, field_width: f32, field_height: f32, palette: &Palette) -> Self {
        let width = area.width as usize;
        let height = area.height as usize;
        let base = Style::default().bg(palette.background.color());
        Self {
            width,
            height,
            sx: width as f32 / field_width.max(1.0),
            sy: height as f32 / field_height.max(1.0),
            grid: vec![vec![(' ', base); width]; height],
            base,
        }
    }

    pub fn base(&self) -> Style {
        self.base
    }

    fn col(&self, x: f32) -> Option<usize> {
        let c = (x * self.sx).floor();
        (c >= 0.0 && (c as usize) < self.width).then_some(c as usize)
    }

    fn row(&self, y: f32) -> Option<usize> {
        let r = (y * self.sy).floor();
        (r >= 0.0 && (r as usize) < self.height).then_some(r as usize)
    }

    /// Plot a single character at a field position.
    pub fn put(&mut self, x: f32, y: f32, ch: char, fg: Color) {
        if let (Some(c), Some(r)) = (self.col(x), self.row(y)) {
            self.grid[r][c] = (ch, self.base.fg(fg));
        }
    }

    /// Fill a field-space rectangle; always covers at least one cell when on screen.
    pub fn fill(&mut self, x: f32, y: f32, w: f32, h: f32, ch: char, fg: Color) {
        if x + w <= 0.0 || y + h <= 0.0 {
            return;
        }
        let c0 = (x * self.sx).floor().max(0.0) as usize;
        let r0 = (y * self.sy).floor().max(0.0) as usize;
        let c1 = (((x + w) * self.sx).floor() as usize).max(c0 + 1).min(self.width);
        let r1 = (((y + h) * self.sy).floor() as usize).max(r0 + 1).min(self.height);
        for row in self.grid.iter_mut().take(r1).skip(r0) {
            for cell in row.iter_mut().take(c1).skip(c0) {
                *cell = (ch, self.base.fg(fg));
            }
        }
    }

    #[cfg(test)]
    fn char_at(&self, col: usize, row: usize) -> Option<char> {
        self.grid.get(row).and_then(|r| r.get(col)).map(|(ch, _)| *ch)
    }

    pub fn into_paragraph(self) -> Paragraph<'static> {
        let lines: Vec<Line<'static>> = self
            .grid
            .into_iter()
            .map(|row| {
                let spans: Vec<Span<'static>> = row
                    .into_iter()
                    .map(|(ch, style)| Span::styled(String::from(ch), style))
                    .collect();
                Line::from(spans)
            })
            .collect();
        Paragraph::new(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_field_to_area() {
        let palette = Palette::classic();
        let mut canvas = Canvas::new(Rect::new(0, 0, 20, 10), 10.0, 10.0, &palette);
        canvas.fill(2.0, 3.0, 1.0, 1.0, '#', Color::White);
        assert_eq!(canvas.char_at(4, 3), Some('#'));
        assert_eq!(canvas.char_at(5, 3), Some('#'));
        assert_eq!(canvas.char_at(6, 3), Some(' '));
    }

    #[test]
    fn off_screen_writes_are_dropped() {
        let palette = Palette::classic();
        let mut canvas = Canvas::new(Rect::new(0, 0, 4, 4), 4.0, 4.0, &palette);
        canvas.put(-1.0, 0.0, 'x', Color::White);
        canvas.put(9.0, 9.0, 'x', Color::White);
        canvas.fill(-5.0, -5.0, 2.0, 2.0, 'x', Color::White);
        for r in 0..4 {
            for c in 0..4 {
                assert_eq!(canvas.char_at(c, r), Some(' '));
            }
        }
    }
}
