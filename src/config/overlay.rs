use serde::{Deserialize, Serialize};

/// Stacking slot of an overlay layer, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerOrder {
    Background,
    Middle,
    Foreground,
}

impl From<LayerOrder> for egui::Order {
    fn from(order: LayerOrder) -> Self {
        match order {
            LayerOrder::Background => egui::Order::Background,
            LayerOrder::Middle => egui::Order::Middle,
            LayerOrder::Foreground => egui::Order::Foreground,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub font_size: f32,
    /// Highlighting language for the code layer.
    pub language: String,
    pub code_layer: LayerOrder,
    pub selector_layer: LayerOrder,
    /// Distance of the selector from the top edge, in points.
    pub selector_offset: f32,
    /// Selection code shown at startup.
    pub initial_view: String,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            font_size: 12.0,
            language: "glsl".to_string(),
            code_layer: LayerOrder::Middle,
            selector_layer: LayerOrder::Foreground,
            selector_offset: 12.0,
            initial_view: "11".to_string(),
        }
    }
}
