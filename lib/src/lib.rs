pub mod engine;
pub mod format;
mod session;
pub mod ticker;
pub mod time;
pub mod types;

pub use engine::{ClockEngine, DisplayState, Phase, Tick};
pub use format::format_time;
pub use session::{Event, Session};
