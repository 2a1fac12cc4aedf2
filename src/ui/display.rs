use crate::capture::ShaderPair;
use log::{info, warn};

/// Selected view: pre-compile or post-compile, fragment or vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayMode {
    pub before: bool,
    pub is_fragment: bool,
}

impl Default for DisplayMode {
    fn default() -> Self {
        Self {
            before: true,
            is_fragment: true,
        }
    }
}

impl DisplayMode {
    /// Parses a two character selection code such as `"10"`. The first
    /// character picks before/after, the second fragment/vertex.
    pub fn from_code(code: &str) -> Option<Self> {
        let mut chars = code.chars();
        let (Some(before), Some(stage), None) = (chars.next(), chars.next(), chars.next()) else {
            return None;
        };

        let flag = |c: char| match c {
            '1' => Some(true),
            '0' => Some(false),
            _ => None,
        };

        Some(Self {
            before: flag(before)?,
            is_fragment: flag(stage)?,
        })
    }

    pub fn code(&self) -> &'static str {
        match (self.before, self.is_fragment) {
            (true, true) => "11",
            (true, false) => "10",
            (false, true) => "01",
            (false, false) => "00",
        }
    }

    pub fn label(&self) -> &'static str {
        VIEW_OPTIONS
            .iter()
            .find(|option| option.mode == *self)
            .map(|option| option.label)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOption {
    pub code: &'static str,
    pub label: &'static str,
    pub mode: DisplayMode,
}

pub const VIEW_OPTIONS: [ViewOption; 4] = [
    ViewOption {
        code: "11",
        label: "Before Compile Fragment Shader",
        mode: DisplayMode { before: true, is_fragment: true },
    },
    ViewOption {
        code: "10",
        label: "Before Compile Vertex Shader",
        mode: DisplayMode { before: true, is_fragment: false },
    },
    ViewOption {
        code: "01",
        label: "After Compiled Fragment Shader",
        mode: DisplayMode { before: false, is_fragment: true },
    },
    ViewOption {
        code: "00",
        label: "After Compiled Vertex Shader",
        mode: DisplayMode { before: false, is_fragment: false },
    },
];

/// Next state for a selection code. Invalid codes keep the current state.
pub fn reduce(state: DisplayMode, code: &str) -> DisplayMode {
    match DisplayMode::from_code(code) {
        Some(next) => next,
        None => {
            warn!("Ignoring invalid view code {:?}", code);
            state
        }
    }
}

/// Holds the selected mode and picks the text to show for it.
#[derive(Debug, Default)]
pub struct DisplayController {
    mode: DisplayMode,
}

impl DisplayController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Applies a selection code. Returns whether the mode changed.
    pub fn select(&mut self, code: &str) -> bool {
        let next = reduce(self.mode, code);
        let changed = next != self.mode;
        if changed {
            info!("Showing {}", next.label());
        }
        self.mode = next;
        changed
    }

    /// Text for the current mode. `before` is the committed pre-compile
    /// pair; `after` is only called in post-compile mode and is expected to
    /// capture fresh every time.
    pub fn text<F>(&self, before: &ShaderPair, after: F) -> String
    where
        F: FnOnce() -> ShaderPair,
    {
        if self.mode.before {
            before.stage(self.mode.is_fragment).unwrap_or_default().to_string()
        } else {
            after().stage(self.mode.is_fragment).unwrap_or_default().to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_initial_mode_is_before_fragment() {
        let controller = DisplayController::new();
        assert_eq!(controller.mode(), DisplayMode { before: true, is_fragment: true });
    }

    #[test]
    fn test_codes_map_to_modes() {
        for option in VIEW_OPTIONS {
            assert_eq!(DisplayMode::from_code(option.code), Some(option.mode));
            assert_eq!(option.mode.code(), option.code);
            assert_eq!(option.mode.label(), option.label);
        }
    }

    #[test]
    fn test_invalid_codes_keep_state() {
        let state = DisplayMode { before: false, is_fragment: true };
        for code in ["", "1", "111", "2x", "1a", "ab"] {
            assert_eq!(reduce(state, code), state);
        }
    }

    #[test]
    fn test_sequence_routes_without_cross_contamination() {
        let before = ShaderPair::new("before vertex", "before fragment");
        let after_calls = Cell::new(0);
        let after = || {
            after_calls.set(after_calls.get() + 1);
            ShaderPair::new(
                format!("after vertex {}", after_calls.get()),
                format!("after fragment {}", after_calls.get()),
            )
        };

        let mut controller = DisplayController::new();

        controller.select("11");
        assert_eq!(controller.text(&before, after), "before fragment");
        controller.select("10");
        assert_eq!(controller.text(&before, after), "before vertex");
        assert_eq!(after_calls.get(), 0);

        controller.select("01");
        assert_eq!(controller.text(&before, after), "after fragment 1");
        controller.select("00");
        assert_eq!(controller.text(&before, after), "after vertex 2");

        controller.select("11");
        assert_eq!(controller.text(&before, after), "before fragment");
        assert_eq!(after_calls.get(), 2);
    }

    #[test]
    fn test_missing_text_is_empty() {
        let mut controller = DisplayController::new();
        assert_eq!(controller.text(&ShaderPair::default(), ShaderPair::default), "");
        controller.select("00");
        assert_eq!(controller.text(&ShaderPair::default(), ShaderPair::default), "");
    }

    #[test]
    fn test_select_reports_change() {
        let mut controller = DisplayController::new();
        assert!(!controller.select("11"));
        assert!(controller.select("01"));
        assert!(!controller.select("zz"));
    }
}
