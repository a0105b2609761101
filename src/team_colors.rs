use once_cell::sync::Lazy;
use ratatui::style::Color;

/// Club identity colors, hex for exports and an RGB `Color` for the TUI.
pub struct TeamColor {
    pub squad: &'static str,
    pub hex: &'static str,
    pub terminal: Color,
}

static TEAM_COLORS: Lazy<Vec<TeamColor>> = Lazy::new(|| {
    vec![
        TeamColor {
            squad: "Galatasaray",
            hex: "#E30A17",
            terminal: Color::Rgb(0xE3, 0x0A, 0x17),
        },
        TeamColor {
            squad: "Fenerbahçe",
            hex: "#0A7EC1",
            terminal: Color::Rgb(0x0A, 0x7E, 0xC1),
        },
        TeamColor {
            squad: "Beşiktaş",
            hex: "#000000",
            // Black kit; lifted to gray so bars stay visible on dark terminals.
            terminal: Color::Gray,
        },
        TeamColor {
            squad: "Trabzonspor",
            hex: "#B30019",
            terminal: Color::Rgb(0xB3, 0x00, 0x19),
        },
    ]
});

pub fn terminal_color(squad: &str) -> Color {
    TEAM_COLORS
        .iter()
        .find(|c| c.squad == squad)
        .map(|c| c.terminal)
        .unwrap_or(Color::White)
}

pub fn hex_color(squad: &str) -> &'static str {
    TEAM_COLORS
        .iter()
        .find(|c| c.squad == squad)
        .map(|c| c.hex)
        .unwrap_or("#FFFFFF")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_squads_resolve() {
        assert_eq!(hex_color("Galatasaray"), "#E30A17");
        assert_eq!(hex_color("Fenerbahçe"), "#0A7EC1");
        assert_ne!(terminal_color("Beşiktaş"), Color::White);
    }

    #[test]
    fn unknown_squad_falls_back() {
        assert_eq!(hex_color("Ankaragücü"), "#FFFFFF");
        assert_eq!(terminal_color("Ankaragücü"), Color::White);
    }
}
