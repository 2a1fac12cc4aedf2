pub mod display;
pub mod highlight;
pub mod overlay;

pub use display::{reduce, DisplayController, DisplayMode, ViewOption, VIEW_OPTIONS};
pub use highlight::{layout_job, tokenize, HighlightTheme, Highlighter};
pub use overlay::ShaderOverlay;
