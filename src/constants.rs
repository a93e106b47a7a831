use raylib::prelude::*;

pub const RENDER_WIDTH: i32 = 1920;           // Width of the design framebuffer
pub const RENDER_HEIGHT: i32 = 1080;          // Height of the design framebuffer
pub const FPS: u32 = 60;                      // Frames per second

pub const TRANSITION_DURATION: f32 = 0.45;    // Slide crossing animation (seconds)

pub const SLIDE_MARGIN: f32 = 96.0;           // Content inset from the framebuffer edge
pub const PROGRESS_BAR_HEIGHT: i32 = 4;       // Bottom progress indicator

// Palette (midnight theme of the deck)
pub const BG_COLOR: Color = Color::new(2, 6, 23, 255);
pub const TEXT_COLOR: Color = Color::new(248, 250, 252, 255);
pub const MUTED_COLOR: Color = Color::new(148, 163, 184, 255);
pub const ACCENT_CYAN: Color = Color::new(34, 211, 238, 255);
pub const ACCENT_EMERALD: Color = Color::new(52, 211, 153, 255);
pub const PANEL_COLOR: Color = Color::new(15, 23, 42, 235);
pub const PANEL_BORDER: Color = Color::new(51, 65, 85, 255);
