/// Terminal backend for the Renderer boundary: paints a recorded frame onto a ratatui canvas
use ratatui::layout::Rect as Area;
use ratatui::style::{Color as TuiColor, Style};
use ratatui::symbols::Marker;
use ratatui::text::Line as TextLine;
use ratatui::widgets::canvas::{Canvas, Circle, Context, Line};
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

use crate::core::renderer::{Color, DrawCommand, DrawList, Point, Rect};

/// Maps terminal cells to the game's virtual canvas and back
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub area: Area,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(area: Area, (width, height): (f32, f32)) -> Self {
        Self { area, width, height }
    }

    /// Virtual point at the centre of a terminal cell, `None` outside the canvas
    pub fn to_virtual(&self, column: u16, row: u16) -> Option<Point> {
        let a = self.area;
        if a.width == 0 || a.height == 0 {
            return None;
        }
        if column < a.x || column >= a.x + a.width || row < a.y || row >= a.y + a.height {
            return None;
        }
        Some(Point::new(
            ((column - a.x) as f32 + 0.5) * self.width / a.width as f32,
            ((row - a.y) as f32 + 0.5) * self.height / a.height as f32,
        ))
    }

    /// Virtual pixels covered by one terminal column
    pub fn column_width(&self) -> f32 {
        self.width / self.area.width.max(1) as f32
    }

    /// Vertical distance between two braille dots, in virtual pixels
    fn dot_height(&self) -> f32 {
        self.height / (self.area.height.max(1) as f32 * 4.0)
    }
}

fn tui(c: Color) -> TuiColor {
    TuiColor::Rgb(c.r, c.g, c.b)
}

/// Paint `list` into the whole frame and return the viewport used, for pointer mapping
pub fn paint(frame: &mut Frame, list: &DrawList, title: &str, size: (f32, f32)) -> Viewport {
    let block = Block::default().borders(Borders::ALL).title(title.to_string());
    let viewport = Viewport::new(block.inner(frame.area()), size);
    let background = list.background().unwrap_or(Color::rgb(0, 0, 0));

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .background_color(tui(background))
        .x_bounds([0.0, size.0 as f64])
        .y_bounds([0.0, size.1 as f64])
        .paint(|ctx| {
            let mut painter = Painter { ctx, viewport, background };
            for command in list.commands() {
                painter.draw(command);
            }
        });
    frame.render_widget(canvas, frame.area());
    viewport
}

struct Painter<'a, 'b> {
    ctx: &'a mut Context<'b>,
    viewport: Viewport,
    background: Color,
}

impl Painter<'_, '_> {
    fn draw(&mut self, command: &DrawCommand) {
        match command {
            DrawCommand::Clear(color) => self.background = *color,
            DrawCommand::Line { from, to, color, .. } => {
                let color = self.flatten(*color);
                self.line(*from, *to, color);
            }
            DrawCommand::Circle { center, radius, width, color } => {
                let color = self.flatten(*color);
                if *width <= 0.0 {
                    self.fill_circle(*center, *radius, color);
                } else {
                    let (x, y) = self.flip(*center);
                    self.ctx.draw(&Circle { x, y, radius: *radius as f64, color });
                }
            }
            DrawCommand::Rect { rect, color, .. } => {
                let color = self.flatten(*color);
                self.fill_rect(*rect, color);
            }
            DrawCommand::Text { text, anchor, color, .. } => {
                let color = self.flatten(*color);
                let half = text.chars().count() as f32 * self.viewport.column_width() / 2.0;
                let (x, y) = self.flip(anchor.offset(-half, 0.0));
                self.ctx
                    .print(x, y, TextLine::styled(text.clone(), Style::default().fg(color)));
            }
            DrawCommand::Present => {}
        }
    }

    /// Terminals have no alpha, so translucent colours are mixed with the background
    fn flatten(&self, color: Color) -> TuiColor {
        tui(color.blend_over(self.background))
    }

    /// Canvas y grows upwards
    fn flip(&self, p: Point) -> (f64, f64) {
        (p.x as f64, (self.viewport.height - p.y) as f64)
    }

    fn line(&mut self, from: Point, to: Point, color: TuiColor) {
        let (x1, y1) = self.flip(from);
        let (x2, y2) = self.flip(to);
        self.ctx.draw(&Line { x1, y1, x2, y2, color });
    }

    fn fill_rect(&mut self, rect: Rect, color: TuiColor) {
        let step = self.viewport.dot_height().max(0.5);
        let mut y = rect.y;
        while y < rect.y + rect.h {
            self.line(Point::new(rect.x, y), Point::new(rect.x + rect.w, y), color);
            y += step;
        }
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: TuiColor) {
        let step = self.viewport.dot_height().max(0.5);
        let mut dy = -radius;
        while dy <= radius {
            let half = (radius * radius - dy * dy).max(0.0).sqrt();
            self.line(center.offset(-half, dy), center.offset(half, dy), color);
            dy += step;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_cells_into_virtual_space() {
        let vp = Viewport::new(Area::new(1, 1, 60, 35), (600.0, 700.0));
        assert_eq!(vp.to_virtual(1, 1), Some(Point::new(5.0, 10.0)));
        assert_eq!(vp.to_virtual(60, 35), Some(Point::new(595.0, 690.0)));
        assert_eq!(vp.to_virtual(31, 18), Some(Point::new(305.0, 350.0)));
        assert_eq!(vp.column_width(), 10.0);
    }

    #[test]
    fn cells_outside_canvas_map_to_nothing() {
        let vp = Viewport::new(Area::new(1, 1, 60, 35), (600.0, 700.0));
        assert_eq!(vp.to_virtual(0, 5), None);
        assert_eq!(vp.to_virtual(61, 5), None);
        assert_eq!(vp.to_virtual(5, 36), None);
    }

    #[test]
    fn empty_viewport_maps_nothing() {
        let vp = Viewport::new(Area::new(0, 0, 0, 0), (600.0, 700.0));
        assert_eq!(vp.to_virtual(0, 0), None);
    }
}
