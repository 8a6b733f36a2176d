//! Color theme system for coderefine.
//!
//! Two built-in themes:
//!
//! - `dark` uses the 16 ANSI colors only, so it works over SSH and on
//!   256-color terminals.
//! - `catppuccin_mocha` is the Catppuccin Mocha palette in RGB and needs a
//!   truecolor terminal.

use ratatui::style::Color;

use coderefine_core::score::ScoreTier;
use coderefine_core::types::Severity;

/// Every color the UI draws with. Widgets read fields directly, e.g.
/// `Style::default().fg(theme.border_active)`.
#[derive(Debug, Clone)]
pub struct Theme {
    // Panel borders
    pub border_active: Color,
    pub border_inactive: Color,

    // Text
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    /// Selected row in lists and the sidebar.
    pub selection_bg: Color,

    // Refactored-code diff
    pub diff_added: Color,
    pub diff_removed: Color,
    pub diff_context: Color,

    // Severity badges
    pub badge_critical: Color,
    pub badge_high: Color,
    pub badge_medium: Color,
    pub badge_low: Color,

    // Score tiers
    pub score_pass: Color,
    pub score_warn: Color,
    pub score_fail: Color,

    // Status bar
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    pub status_mode_normal: Color,
    pub status_mode_insert: Color,
    pub notice_info: Color,
    pub notice_error: Color,

    pub background: Color,
}

impl Theme {
    /// Built-in dark theme using ANSI 16 colors. Safe on any terminal.
    pub fn dark() -> Self {
        Self {
            border_active: Color::Cyan,
            border_inactive: Color::DarkGray,

            text: Color::Reset,
            muted: Color::DarkGray,
            accent: Color::Cyan,
            selection_bg: Color::DarkGray,

            diff_added: Color::Green,
            diff_removed: Color::Red,
            diff_context: Color::Reset,

            badge_critical: Color::Red,
            badge_high: Color::LightRed,
            badge_medium: Color::Yellow,
            badge_low: Color::Blue,

            score_pass: Color::Green,
            score_warn: Color::Yellow,
            score_fail: Color::Red,

            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
            status_mode_normal: Color::Cyan,
            status_mode_insert: Color::Green,
            notice_info: Color::Green,
            notice_error: Color::Red,

            background: Color::Reset,
        }
    }

    /// Catppuccin Mocha in RGB truecolor.
    ///
    /// Palette source: <https://github.com/catppuccin/catppuccin> Mocha variant.
    pub fn catppuccin_mocha() -> Self {
        let green = Color::Rgb(166, 227, 161); // #a6e3a1
        let red = Color::Rgb(243, 139, 168); // #f38ba8
        let maroon = Color::Rgb(235, 160, 172); // #eba0ac
        let yellow = Color::Rgb(249, 226, 175); // #f9e2af
        let blue = Color::Rgb(137, 180, 250); // #89b4fa
        let mauve = Color::Rgb(203, 166, 247); // #cba6f7
        let lavender = Color::Rgb(180, 190, 254); // #b4befe
        let overlay1 = Color::Rgb(127, 132, 156); // #7f849c
        let surface0 = Color::Rgb(49, 50, 68); // #313244
        let surface1 = Color::Rgb(69, 71, 90); // #45475a
        let base = Color::Rgb(30, 30, 46); // #1e1e2e
        let text = Color::Rgb(205, 214, 244); // #cdd6f4
        let peach = Color::Rgb(250, 179, 135); // #fab387

        Self {
            border_active: lavender,
            border_inactive: overlay1,

            text,
            muted: overlay1,
            accent: mauve,
            selection_bg: surface0,

            diff_added: green,
            diff_removed: red,
            diff_context: text,

            badge_critical: red,
            badge_high: maroon,
            badge_medium: peach,
            badge_low: blue,

            score_pass: green,
            score_warn: yellow,
            score_fail: red,

            status_bar_bg: surface1,
            status_bar_fg: text,
            status_mode_normal: lavender,
            status_mode_insert: green,
            notice_info: green,
            notice_error: red,

            background: base,
        }
    }

    /// Resolves a config name. Unknown names fall back to `dark()` with a
    /// logged warning so a typo never prevents startup.
    pub fn from_name(name: &str) -> Self {
        match name {
            "catppuccin-mocha" | "catppuccin_mocha" => Self::catppuccin_mocha(),
            "dark" => Self::dark(),
            other => {
                tracing::warn!("unknown theme '{other}', falling back to 'dark'");
                Self::dark()
            }
        }
    }

    pub fn severity(&self, severity: Severity) -> Color {
        match severity {
            Severity::Critical => self.badge_critical,
            Severity::High => self.badge_high,
            Severity::Medium => self.badge_medium,
            Severity::Low => self.badge_low,
        }
    }

    pub fn score(&self, score: u8) -> Color {
        match ScoreTier::for_score(score) {
            ScoreTier::Pass => self.score_pass,
            ScoreTier::Warn => self.score_warn,
            ScoreTier::Fail => self.score_fail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_colors_follow_tiers() {
        let t = Theme::dark();
        assert_eq!(t.score(80), Color::Green);
        assert_eq!(t.score(79), Color::Yellow);
        assert_eq!(t.score(60), Color::Yellow);
        assert_eq!(t.score(59), Color::Red);
    }

    #[test]
    fn unknown_theme_falls_back_to_dark() {
        assert_eq!(Theme::from_name("solarized").border_active, Color::Cyan);
        assert_eq!(Theme::from_name("catppuccin-mocha").accent, Color::Rgb(203, 166, 247));
    }
}
