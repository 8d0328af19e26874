use eframe::egui::{pos2, vec2, Pos2, Vec2};

/// Every Nth tick remeasures and repins the window.
pub const LAYOUT_EVERY: u64 = 100;
pub const WINDOW_HEIGHT: f32 = 50.0;
pub const TEXT_PADDING: f32 = 100.0;
pub const EDGE_MARGIN: f32 = 50.0;

/// Counts ticks and reports which of them are layout ticks (0, 100, 200, ...).
#[derive(Debug, Default)]
pub struct TickCounter {
    count: u64,
}

impl TickCounter {
    /// Advances the counter, returning whether the tick just consumed is a layout tick.
    pub fn advance(&mut self) -> bool {
        let is_layout = self.count % LAYOUT_EVERY == 0;
        self.count = self.count.wrapping_add(1);
        is_layout
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Geometry {
    pub position: Pos2,
    pub size: Vec2,
}

pub fn window_size(text_width: f32) -> Vec2 {
    vec2(text_width + TEXT_PADDING, WINDOW_HEIGHT)
}

pub fn top_right(screen_width: f32, window_width: f32) -> Pos2 {
    pos2(screen_width - window_width - EDGE_MARGIN, EDGE_MARGIN)
}

/// Window geometry for a label whose text measures `text_width`.
pub fn pinned_geometry(screen_width: f32, text_width: f32) -> Geometry {
    let size = window_size(text_width);
    Geometry {
        position: top_right(screen_width, size.x),
        size,
    }
}
