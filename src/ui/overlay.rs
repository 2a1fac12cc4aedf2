// overlay.rs - egui layers over the 3D canvas

use crate::config::overlay::OverlayConfig;
use crate::ui::display::{DisplayMode, VIEW_OPTIONS};
use crate::ui::highlight::{layout_job, HighlightTheme, Highlighter};
use egui::{Align2, Area, ComboBox, Context, FontId, Frame, Id, Label, Order, ScrollArea};

pub struct ShaderOverlay {
    highlighter: Highlighter,
    theme: HighlightTheme,
    font: FontId,
    code_order: Order,
    selector_order: Order,
    selector_offset: f32,
}

impl ShaderOverlay {
    pub fn new(config: &OverlayConfig) -> Self {
        Self {
            highlighter: Highlighter::new(config.language.clone()),
            theme: HighlightTheme::default(),
            font: FontId::monospace(config.font_size),
            code_order: config.code_layer.into(),
            selector_order: config.selector_layer.into(),
            selector_offset: config.selector_offset,
        }
    }

    /// Draws both layers. Returns the selection code when the user picks a
    /// different view.
    pub fn show(&mut self, ctx: &Context, text: &str, mode: DisplayMode) -> Option<&'static str> {
        self.show_code(ctx, text);
        self.show_selector(ctx, mode)
    }

    /// Full-viewport, scrollable code layer. Nothing is drawn for empty text.
    fn show_code(&mut self, ctx: &Context, text: &str) {
        if text.is_empty() {
            return;
        }

        let screen = ctx.screen_rect();
        let job = layout_job(self.highlighter.highlight(text), &self.theme, &self.font);
        let background = self.theme.background;

        Area::new(Id::new("shader_code"))
            .order(self.code_order)
            .fixed_pos(screen.min)
            .show(ctx, |ui| {
                ui.set_min_size(screen.size());
                ui.set_max_size(screen.size());
                ScrollArea::both()
                    .auto_shrink([false; 2])
                    .show(ui, |ui| {
                        Frame::none().fill(background).inner_margin(8.0).show(ui, |ui| {
                            ui.add(Label::new(job).wrap(false));
                        });
                    });
            });
    }

    /// Centered selector layer with the four views.
    fn show_selector(&mut self, ctx: &Context, mode: DisplayMode) -> Option<&'static str> {
        let current = mode.code();
        let mut selected = current;

        Area::new(Id::new("view_selector"))
            .order(self.selector_order)
            .anchor(Align2::CENTER_TOP, [0.0, self.selector_offset])
            .show(ctx, |ui| {
                ComboBox::from_id_source("view_selector_combo")
                    .selected_text(mode.label())
                    .width(260.0)
                    .show_ui(ui, |ui| {
                        for option in VIEW_OPTIONS {
                            ui.selectable_value(&mut selected, option.code, option.label);
                        }
                    });
            });

        (selected != current).then_some(selected)
    }
}
