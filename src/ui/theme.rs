//! macOS styling and theme colors for the popover.

use eframe::egui;

/// Popover theme colors.
pub struct Theme {
    /// Background color
    pub background: egui::Color32,

    /// Row hover color
    pub hover: egui::Color32,

    /// Accent color (checkboxes, current device mark)
    pub accent: egui::Color32,

    /// Text primary color
    pub text_primary: egui::Color32,

    /// Text secondary color (captions, hints)
    pub text_secondary: egui::Color32,

    /// Separator color
    pub border: egui::Color32,
}

impl Theme {
    /// Dark menu bar appearance.
    pub fn dark() -> Self {
        Self {
            background: egui::Color32::from_rgb(40, 40, 42),
            hover: egui::Color32::from_rgb(58, 58, 60),
            accent: egui::Color32::from_rgb(10, 132, 255),
            text_primary: egui::Color32::from_rgb(245, 245, 247),
            text_secondary: egui::Color32::from_rgb(152, 152, 157),
            border: egui::Color32::from_rgb(72, 72, 74),
        }
    }

    /// Light menu bar appearance.
    pub fn light() -> Self {
        Self {
            background: egui::Color32::from_rgb(246, 246, 246),
            hover: egui::Color32::from_rgb(229, 229, 234),
            accent: egui::Color32::from_rgb(0, 122, 255),
            text_primary: egui::Color32::from_rgb(29, 29, 31),
            text_secondary: egui::Color32::from_rgb(110, 110, 115),
            border: egui::Color32::from_rgb(209, 209, 214),
        }
    }

    /// Pick the palette matching the system appearance.
    pub fn for_system(ctx: &egui::Context) -> Self {
        match ctx.input(|i| i.raw.system_theme) {
            Some(egui::Theme::Light) => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Apply the theme to an egui context.
    pub fn apply(&self, ctx: &egui::Context) {
        let mut style = (*ctx.style()).clone();

        style.visuals.panel_fill = self.background;
        style.visuals.window_fill = self.background;

        style.visuals.widgets.noninteractive.bg_fill = self.background;
        style.visuals.widgets.noninteractive.bg_stroke.color = self.border;
        style.visuals.widgets.inactive.bg_fill = self.background;
        style.visuals.widgets.inactive.weak_bg_fill = self.background;
        style.visuals.widgets.hovered.bg_fill = self.hover;
        style.visuals.widgets.hovered.weak_bg_fill = self.hover;
        style.visuals.widgets.active.bg_fill = self.accent;

        style.visuals.widgets.noninteractive.fg_stroke.color = self.text_primary;
        style.visuals.widgets.inactive.fg_stroke.color = self.text_primary;
        style.visuals.widgets.hovered.fg_stroke.color = self.text_primary;
        style.visuals.widgets.active.fg_stroke.color = self.text_primary;

        style.visuals.selection.bg_fill = self.accent;
        style.visuals.selection.stroke.color = self.text_primary;
        style.visuals.hyperlink_color = self.accent;

        style.visuals.window_rounding = egui::Rounding::same(10.0);

        ctx.set_style(style);
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
