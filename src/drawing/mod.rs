pub mod history;
pub mod stroke;

pub use history::{DrawingHistory, HistoryEffect};
pub use stroke::{Point, Stroke};
