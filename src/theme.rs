use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use ratatui::style::Color;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

pub const THEMES_FILE: &str = "themes.json";
pub const PREFERENCE_FILE: &str = "theme_preference.json";
const DEFAULT_THEME: &str = "Classic";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn color(self) -> Color {
        Color::Rgb(self.0, self.1, self.2)
    }

    pub fn darken(self, amount: u8) -> Rgb {
        Rgb(
            self.0.saturating_sub(amount),
            self.1.saturating_sub(amount),
            self.2.saturating_sub(amount),
        )
    }

    pub fn lighten(self, amount: u8) -> Rgb {
        Rgb(
            self.0.saturating_add(amount),
            self.1.saturating_add(amount),
            self.2.saturating_add(amount),
        )
    }

    /// Linear blend toward `other`, `t` in 0..=1.
    pub fn mix(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let ch = |a: u8, b: u8| (a as f32 * (1.0 - t) + b as f32 * t).round() as u8;
        Rgb(ch(self.0, other.0), ch(self.1, other.1), ch(self.2, other.2))
    }
}

/// A named color set handed read-only to every render call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub name: String,
    pub background: Rgb,
    pub text: Rgb,
    pub accent1: Rgb,
    pub accent2: Rgb,
    pub player: Rgb,
    pub opponent: Rgb,
    pub obstacle: Rgb,
    pub projectile: Rgb,
}

impl Palette {
    pub fn classic() -> Self {
        Palette {
            name: "Classic".into(),
            background: Rgb(0, 0, 0),
            text: Rgb(255, 255, 255),
            accent1: Rgb(0, 100, 255),
            accent2: Rgb(0, 180, 0),
            player: Rgb(255, 255, 255),
            opponent: Rgb(200, 200, 200),
            obstacle: Rgb(255, 50, 50),
            projectile: Rgb(255, 255, 0),
        }
    }

    pub fn neon() -> Self {
        Palette {
            name: "Neon".into(),
            background: Rgb(10, 10, 30),
            text: Rgb(0, 255, 255),
            accent1: Rgb(255, 0, 255),
            accent2: Rgb(0, 255, 0),
            player: Rgb(0, 255, 255),
            opponent: Rgb(255, 0, 255),
            obstacle: Rgb(255, 255, 0),
            projectile: Rgb(0, 255, 0),
        }
    }

    pub fn pastel() -> Self {
        Palette {
            name: "Pastel".into(),
            background: Rgb(240, 240, 255),
            text: Rgb(100, 100, 120),
            accent1: Rgb(200, 180, 255),
            accent2: Rgb(180, 230, 210),
            player: Rgb(180, 210, 230),
            opponent: Rgb(230, 180, 210),
            obstacle: Rgb(255, 200, 200),
            projectile: Rgb(230, 230, 180),
        }
    }

    pub fn retro() -> Self {
        Palette {
            name: "Retro".into(),
            background: Rgb(20, 20, 20),
            text: Rgb(200, 200, 200),
            accent1: Rgb(0, 180, 0),
            accent2: Rgb(180, 50, 0),
            player: Rgb(0, 220, 0),
            opponent: Rgb(220, 180, 0),
            obstacle: Rgb(220, 0, 0),
            projectile: Rgb(220, 220, 0),
        }
    }

    pub fn ocean() -> Self {
        Palette {
            name: "Ocean".into(),
            background: Rgb(0, 30, 60),
            text: Rgb(200, 230, 255),
            accent1: Rgb(0, 150, 200),
            accent2: Rgb(0, 200, 150),
            player: Rgb(100, 200, 255),
            opponent: Rgb(50, 150, 200),
            obstacle: Rgb(200, 50, 50),
            projectile: Rgb(200, 200, 50),
        }
    }

    pub fn builtin() -> Vec<Palette> {
        vec![
            Self::classic(),
            Self::neon(),
            Self::pastel(),
            Self::retro(),
            Self::ocean(),
        ]
    }

    /// Text faded toward the background, for borders and hints.
    pub fn muted(&self) -> Color {
        self.text.mix(self.background, 0.6).color()
    }
}

#[derive(Serialize, Deserialize)]
struct Preference {
    current_theme: String,
}

pub struct ThemeProvider {
    themes: Vec<Palette>,
    current: usize,
    dir: Option<PathBuf>,
}

impl ThemeProvider {
    pub fn builtin() -> Self {
        Self {
            themes: Palette::builtin(),
            current: 0,
            dir: None,
        }
    }

    /// Built-ins plus any custom palettes from `themes.json`, with the saved
    /// preference selected, else `fallback`, else Classic.
    pub fn load(dir: &Path, fallback: &str) -> Self {
        let mut provider = Self {
            dir: Some(dir.to_path_buf()),
            ..Self::builtin()
        };
        provider.merge_custom(&dir.join(THEMES_FILE));

        let preferred = fs::read_to_string(dir.join(PREFERENCE_FILE))
            .ok()
            .and_then(|s| serde_json::from_str::<Preference>(&s).ok())
            .map(|p| p.current_theme);
        let chosen = preferred
            .filter(|name| provider.position(name).is_some())
            .unwrap_or_else(|| fallback.to_string());
        if !provider.select(&chosen) {
            warn!("unknown theme {chosen:?}, falling back to {DEFAULT_THEME}");
        }
        info!("theme {:?} selected", provider.current().name);
        provider
    }

    fn merge_custom(&mut self, path: &Path) {
        let Ok(data) = fs::read_to_string(path) else { return };
        match serde_json::from_str::<BTreeMap<String, Palette>>(&data) {
            Ok(custom) => {
                for (key, mut palette) in custom {
                    palette.name = key;
                    match self.position(&palette.name) {
                        Some(i) => self.themes[i] = palette,
                        None => self.themes.push(palette),
                    }
                }
            }
            Err(e) => warn!("ignoring {}: {e}; using built-in themes", path.display()),
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.themes.iter().position(|t| t.name.eq_ignore_ascii_case(name))
    }

    pub fn current(&self) -> &Palette {
        &self.themes[self.current]
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.themes.iter().map(|t| t.name.as_str())
    }

    /// Lookup by name; unknown names resolve to Classic.
    pub fn get(&self, name: &str) -> &Palette {
        let idx = self.position(name).or_else(|| self.position(DEFAULT_THEME)).unwrap_or(0);
        &self.themes[idx]
    }

    /// Returns false and keeps the current theme when `name` is unknown.
    pub fn select(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(i) => {
                self.current = i;
                true
            }
            None => false,
        }
    }

    pub fn cycle(&mut self) -> &Palette {
        self.current = (self.current + 1) % self.themes.len();
        &self.themes[self.current]
    }

    pub fn save_preference(&self) -> Result<(), StoreError> {
        let Some(dir) = &self.dir else { return Ok(()) };
        let path = dir.join(PREFERENCE_FILE);
        let body = serde_json::to_string_pretty(&Preference {
            current_theme: self.current().name.clone(),
        })?;
        fs::write(&path, body).map_err(|source| StoreError::Io { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_roster() {
        let provider = ThemeProvider::builtin();
        let names: Vec<&str> = provider.names().collect();
        assert_eq!(names, ["Classic", "Neon", "Pastel", "Retro", "Ocean"]);
        assert_eq!(provider.current().name, "Classic");
    }

    #[test]
    fn unknown_name_falls_back_to_classic() {
        let mut provider = ThemeProvider::builtin();
        assert_eq!(provider.get("Vaporwave").name, "Classic");
        provider.select("Retro");
        assert!(!provider.select("Vaporwave"));
        assert_eq!(provider.current().name, "Retro");
    }

    #[test]
    fn cycle_wraps_around() {
        let mut provider = ThemeProvider::builtin();
        provider.select("ocean");
        assert_eq!(provider.cycle().name, "Classic");
        assert_eq!(provider.cycle().name, "Neon");
    }

    #[test]
    fn preference_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut provider = ThemeProvider::load(dir.path(), "Classic");
        provider.select("Pastel");
        provider.save_preference().unwrap();

        let reloaded = ThemeProvider::load(dir.path(), "Neon");
        assert_eq!(reloaded.current().name, "Pastel");
    }

    #[test]
    fn missing_files_use_fallback() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(ThemeProvider::load(dir.path(), "Ocean").current().name, "Ocean");
        assert_eq!(ThemeProvider::load(dir.path(), "Bogus").current().name, "Classic");
    }

    #[test]
    fn custom_themes_extend_and_override() {
        let dir = tempfile::tempdir().unwrap();
        let mut sunset = Palette::classic();
        sunset.name = "ignored".into();
        sunset.background = Rgb(40, 10, 0);
        let mut neon = Palette::neon();
        neon.text = Rgb(1, 2, 3);
        let mut custom = BTreeMap::new();
        custom.insert("Sunset".to_string(), sunset);
        custom.insert("Neon".to_string(), neon);
        fs::write(dir.path().join(THEMES_FILE), serde_json::to_string(&custom).unwrap()).unwrap();

        let provider = ThemeProvider::load(dir.path(), "Sunset");
        assert_eq!(provider.current().name, "Sunset");
        assert_eq!(provider.current().background, Rgb(40, 10, 0));
        assert_eq!(provider.get("Neon").text, Rgb(1, 2, 3));
        assert_eq!(provider.names().count(), 6);
    }

    #[test]
    fn incomplete_custom_theme_invalidates_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(THEMES_FILE),
            r#"{ "Broken": { "name": "Broken", "background": [0, 0, 0] } }"#,
        )
        .unwrap();
        let provider = ThemeProvider::load(dir.path(), "Broken");
        assert_eq!(provider.names().count(), 5);
        assert_eq!(provider.current().name, "Classic");
    }

    #[test]
    fn mix_blends_channels() {
        assert_eq!(Rgb(0, 0, 0).mix(Rgb(200, 100, 50), 0.5), Rgb(100, 50, 25));
        assert_eq!(Rgb(250, 10, 0).lighten(10), Rgb(255, 20, 10));
        assert_eq!(Rgb(5, 50, 0).darken(10), Rgb(0, 40, 0));
    }
}
