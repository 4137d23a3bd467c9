//! 2026 grid lookup used to colour driver annotations on report pages.

use crate::core::DriverId;

/// Fallback used for unknown drivers and teams.
pub const FALLBACK_TEAM_COLOR: &str = "#FFFFFF";

const TEAM_COLORS: &[(&str, &str)] = &[
    ("Red Bull Racing", "#1E41FF"),
    ("Mercedes", "#00D2BE"),
    ("Ferrari", "#FF2800"),
    ("McLaren", "#FF8000"),
    ("Aston Martin", "#006F62"),
    ("Alpine", "#0090FF"),
    ("Williams", "#005AFF"),
    ("VCARB", "#6692FF"),
    ("Haas", "#B6BABD"),
    ("Audi", "#FF3B00"),
    ("Cadillac", "#D4AF37"),
];

const DRIVER_TEAMS: &[(&str, &str)] = &[
    ("VER", "Red Bull Racing"),
    ("HAD", "Red Bull Racing"),
    ("RUS", "Mercedes"),
    ("ANT", "Mercedes"),
    ("LEC", "Ferrari"),
    ("HAM", "Ferrari"),
    ("NOR", "McLaren"),
    ("PIA", "McLaren"),
    ("ALO", "Aston Martin"),
    ("STR", "Aston Martin"),
    ("GAS", "Alpine"),
    ("COL", "Alpine"),
    ("SAI", "Williams"),
    ("ALB", "Williams"),
    ("LAW", "VCARB"),
    ("LIN", "VCARB"),
    ("OCO", "Haas"),
    ("BEA", "Haas"),
    ("HUL", "Audi"),
    ("BOR", "Audi"),
    ("BOT", "Cadillac"),
    ("PER", "Cadillac"),
];

#[must_use]
pub fn driver_team(driver: &DriverId) -> Option<&'static str> {
    DRIVER_TEAMS
        .iter()
        .find(|(code, _)| *code == driver.as_str())
        .map(|(_, team)| *team)
}

#[must_use]
pub fn team_color_hex(team: &str) -> &'static str {
    TEAM_COLORS
        .iter()
        .find(|(name, _)| *name == team)
        .map_or(FALLBACK_TEAM_COLOR, |(_, hex)| *hex)
}

/// Hex colour of the driver's 2026 team, white when unknown.
#[must_use]
pub fn driver_color_hex(driver: &DriverId) -> &'static str {
    driver_team(driver).map_or(FALLBACK_TEAM_COLOR, team_color_hex)
}
