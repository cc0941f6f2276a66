//! Colors for CLI output.

/// ANSI reset sequence
const ANSI_RESET: &str = "\x1b[0m";

/// CLI color theme.
///
/// With color disabled every helper returns the text unchanged.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Section headings and other highlights
    pub accent: &'static str,
    /// Dimmed detail text
    pub secondary: &'static str,
    pub error: &'static str,
    pub success: &'static str,
    pub enabled: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: "\x1b[32m",
            secondary: "\x1b[90m",
            error: "\x1b[31m",
            success: "\x1b[32m",
            enabled: true,
        }
    }
}

impl Theme {
    /// Theme with color only when stdout is a terminal and `NO_COLOR` is unset.
    pub fn detect() -> Self {
        let enabled = std::env::var_os("NO_COLOR").is_none() && atty::is(atty::Stream::Stdout);
        Self {
            enabled,
            ..Self::default()
        }
    }

    pub fn plain() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.enabled {
            format!("{}{}{}", code, text, ANSI_RESET)
        } else {
            text.to_string()
        }
    }

    pub fn accent_text(&self, text: &str) -> String {
        self.paint(self.accent, text)
    }

    pub fn secondary_text(&self, text: &str) -> String {
        self.paint(self.secondary, text)
    }

    pub fn error_text(&self, text: &str) -> String {
        self.paint(self.error, text)
    }

    pub fn success_text(&self, text: &str) -> String {
        self.paint(self.success, text)
    }
}
