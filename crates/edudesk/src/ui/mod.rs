mod table;
mod tracker;

pub use table::{FormatConfig, SessionRow, render};
pub use tracker::UploadTracker;
