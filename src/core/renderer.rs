/// Renderer boundary - games issue draw requests, backends decide how to paint them
use serde::{Deserialize, Serialize};

/// RGBA colour, alpha 255 is opaque
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: u8,
}

fn opaque() -> u8 {
    255
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Flatten this colour onto an opaque background
    pub fn blend_over(self, bg: Color) -> Color {
        let a = self.a as u16;
        let mix = |fg: u8, bg: u8| ((fg as u16 * a + bg as u16 * (255 - a)) / 255) as u8;
        Color::rgb(mix(self.r, bg.r), mix(self.g, bg.g), mix(self.b, bg.b))
    }
}

/// A position in the game's virtual canvas (pixels, y grows downwards)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Linear interpolation towards `other`, `t` in [0, 1]
    pub fn lerp(self, other: Point, t: f32) -> Self {
        Self::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Half-open containment: the right and bottom edges are outside
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.w && p.y >= self.y && p.y < self.y + self.h
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.w, self.h)
    }
}

/// Draw primitives consumed by games. Implementations never report failure back to the game.
pub trait Renderer {
    /// Fill the whole canvas
    fn clear(&mut self, color: Color);

    fn line(&mut self, from: Point, to: Point, width: f32, color: Color);

    /// Circle outline of the given stroke width, or a filled disc when `width` is 0
    fn circle(&mut self, center: Point, radius: f32, width: f32, color: Color);

    /// Filled rectangle with optional rounded corners
    fn rect(&mut self, rect: Rect, corner_radius: f32, color: Color);

    /// Text centred on `anchor`
    fn text(&mut self, text: &str, anchor: Point, size: f32, color: Color);

    /// End of frame
    fn present(&mut self);
}

/// One recorded draw request
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Line { from: Point, to: Point, width: f32, color: Color },
    Circle { center: Point, radius: f32, width: f32, color: Color },
    Rect { rect: Rect, corner_radius: f32, color: Color },
    Text { text: String, anchor: Point, size: f32, color: Color },
    Present,
}

/// Recording renderer - the terminal backend paints from it, tests inspect it
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// All text strings drawn this frame, in order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Background colour of the frame, if one was set
    pub fn background(&self) -> Option<Color> {
        self.commands.iter().find_map(|c| match c {
            DrawCommand::Clear(color) => Some(*color),
            _ => None,
        })
    }
}

impl Renderer for DrawList {
    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn line(&mut self, from: Point, to: Point, width: f32, color: Color) {
        self.commands.push(DrawCommand::Line { from, to, width, color });
    }

    fn circle(&mut self, center: Point, radius: f32, width: f32, color: Color) {
        self.commands.push(DrawCommand::Circle { center, radius, width, color });
    }

    fn rect(&mut self, rect: Rect, corner_radius: f32, color: Color) {
        self.commands.push(DrawCommand::Rect { rect, corner_radius, color });
    }

    fn text(&mut self, text: &str, anchor: Point, size: f32, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            anchor,
            size,
            color,
        });
    }

    fn present(&mut self) {
        self.commands.push(DrawCommand::Present);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_contains_is_half_open() {
        let r = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(r.contains(Point::new(10.0, 10.0)));
        assert!(r.contains(Point::new(29.9, 29.9)));
        assert!(!r.contains(Point::new(30.0, 15.0)));
        assert!(!r.contains(Point::new(15.0, 30.0)));
        assert!(!r.contains(Point::new(9.9, 15.0)));
    }

    #[test]
    fn blend_over_respects_alpha() {
        let bg = Color::rgb(0, 0, 0);
        assert_eq!(Color::rgb(200, 100, 50).blend_over(bg), Color::rgb(200, 100, 50));
        assert_eq!(Color::rgb(200, 100, 50).with_alpha(0).blend_over(bg), bg);
        let half = Color::rgb(254, 254, 254).with_alpha(128).blend_over(bg);
        assert!(half.r > 120 && half.r < 135);
    }

    #[test]
    fn draw_list_records_in_order() {
        let mut list = DrawList::new();
        list.clear(Color::rgb(1, 2, 3));
        list.text("hello", Point::new(1.0, 1.0), 12.0, Color::rgb(255, 255, 255));
        list.present();

        assert_eq!(list.commands().len(), 3);
        assert_eq!(list.background(), Some(Color::rgb(1, 2, 3)));
        assert_eq!(list.texts().collect::<Vec<_>>(), vec!["hello"]);
        assert_eq!(list.commands()[2], DrawCommand::Present);
    }
}
