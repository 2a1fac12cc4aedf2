pub mod core;
pub mod overlay;
pub mod rendering;

pub use self::core::{load_from, load_or_create_config, save_to, AppConfig, CameraConfig, WindowConfig};
pub use overlay::{LayerOrder, OverlayConfig};
pub use rendering::RenderConfig;
