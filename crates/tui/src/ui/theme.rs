use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub panel: Color,
    pub surface_bright: Color,
    pub text: Color,
    pub text_muted: Color,
    pub dim: Color,
    pub border: Color,
    pub border_focused: Color,
    pub accent: Color,
    pub positive: Color,
    pub warning: Color,
    pub negative: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::Rgb(8, 12, 16),
            panel: Color::Rgb(20, 26, 32),
            surface_bright: Color::Rgb(26, 33, 40),
            text: Color::Rgb(220, 220, 220),
            text_muted: Color::Rgb(170, 175, 180),
            dim: Color::Rgb(140, 140, 140),
            border: Color::Rgb(50, 60, 70),
            border_focused: Color::Rgb(80, 160, 160),
            accent: Color::Rgb(80, 160, 160),
            positive: Color::Rgb(120, 190, 120),
            warning: Color::Rgb(220, 180, 90),
            negative: Color::Rgb(220, 110, 100),
            error: Color::Rgb(200, 80, 80),
        }
    }
}
