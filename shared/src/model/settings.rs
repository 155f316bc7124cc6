use crate::error::{EditorError, EditorErrorKind};
use crate::create_editor_error_result;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Copy, Clone, Default, Eq, Hash, PartialEq, Serialize)]
pub enum ThemeMode {
    Light,
    #[default]
    Dark,
}

impl ThemeMode {
    const LIGHT: &'static str = "Light";
    const DARK: &'static str = "Dark";

    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl Display for ThemeMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Light => Self::LIGHT,
            Self::Dark => Self::DARK,
        })
    }
}

impl FromStr for ThemeMode {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value.eq_ignore_ascii_case(Self::LIGHT) || value == "0" {
            Ok(Self::Light)
        } else if value.eq_ignore_ascii_case(Self::DARK) || value == "1" {
            Ok(Self::Dark)
        } else {
            create_editor_error_result!(EditorErrorKind::Validation, "Unknown theme mode {value}")
        }
    }
}

// older settings files store the mode as its ordinal
impl<'de> Deserialize<'de> for ThemeMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ThemeModeVisitor;

        impl Visitor<'_> for ThemeModeVisitor {
            type Value = ThemeMode;

            fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
                formatter.write_str("\"Light\", \"Dark\", 0 or 1")
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
                match value {
                    0 => Ok(ThemeMode::Light),
                    1 => Ok(ThemeMode::Dark),
                    _ => Err(E::custom(format!("unknown theme mode {value}"))),
                }
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
                u64::try_from(value).map_err(E::custom).and_then(|v| self.visit_u64(v))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                ThemeMode::from_str(value).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(ThemeModeVisitor)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AppSettings {
    #[serde(default)]
    pub theme_mode: ThemeMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_path: Option<String>,
}

impl AppSettings {
    pub fn toggle_theme(&mut self) -> ThemeMode {
        self.theme_mode = self.theme_mode.toggled();
        self.theme_mode
    }

    pub fn player_path(&self) -> Option<&str> {
        self.player_path.as_deref().map(str::trim).filter(|p| !p.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{AppSettings, ThemeMode};

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.theme_mode, ThemeMode::Dark);
        assert!(settings.player_path().is_none());
        assert_eq!(serde_json::to_string(&settings).unwrap(), r#"{"ThemeMode":"Dark"}"#);
    }

    #[test]
    fn test_deserialize_settings() {
        let settings: AppSettings = serde_json::from_str(r#"{"ThemeMode":"Light","PlayerPath":"C:\\mpv\\mpv.exe"}"#).unwrap();
        assert_eq!(settings.theme_mode, ThemeMode::Light);
        assert_eq!(settings.player_path(), Some("C:\\mpv\\mpv.exe"));

        let settings: AppSettings = serde_json::from_str(r#"{"ThemeMode":0}"#).unwrap();
        assert_eq!(settings.theme_mode, ThemeMode::Light);

        let settings: AppSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, AppSettings::default());

        assert!(serde_json::from_str::<AppSettings>(r#"{"ThemeMode":"Blue"}"#).is_err());
    }

    #[test]
    fn test_toggle_theme() {
        let mut settings = AppSettings::default();
        assert_eq!(settings.toggle_theme(), ThemeMode::Light);
        assert_eq!(settings.toggle_theme(), ThemeMode::Dark);
        assert_eq!("light".parse::<ThemeMode>().unwrap(), ThemeMode::Light);
    }
}
