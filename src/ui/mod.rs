pub mod app;
pub mod draw;

pub use app::{AiHint, App, Screen};
pub use draw::draw_ui;
