use cosmic::cosmic_config::{self, Config, ConfigGet, ConfigSet, CosmicConfigEntry};
use serde::{Deserialize, Serialize};
use shared::{AspectRatio, UploadPolicy};
use std::fmt;

pub const CONFIG_VERSION: u64 = 1;
const APP_ID: &str = "org.codeberg.bhh32.Cropbox";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AppTheme {
    #[default]
    System,
    Dark,
    Light,
}

impl AppTheme {
    pub const ALL: &'static [Self] = &[Self::System, Self::Dark, Self::Light];

    pub fn to_cosmic_theme(self) -> cosmic::Theme {
        match self {
            AppTheme::System => cosmic::theme::system_preference(),
            AppTheme::Dark => cosmic::Theme::dark(),
            AppTheme::Light => cosmic::Theme::light(),
        }
    }
}

impl fmt::Display for AppTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppTheme::System => write!(f, "System"),
            AppTheme::Dark => write!(f, "Dark"),
            AppTheme::Light => write!(f, "Light"),
        }
    }
}

/// Crop box shapes offered in the settings drawer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AspectPreset {
    #[default]
    Widescreen,
    Standard,
    Photo,
    Square,
    Portrait,
}

impl AspectPreset {
    pub const ALL: &'static [Self] = &[
        Self::Widescreen,
        Self::Standard,
        Self::Photo,
        Self::Square,
        Self::Portrait,
    ];

    pub fn ratio(self) -> AspectRatio {
        let (w, h) = match self {
            AspectPreset::Widescreen => (16, 9),
            AspectPreset::Standard => (4, 3),
            AspectPreset::Photo => (3, 2),
            AspectPreset::Square => (1, 1),
            AspectPreset::Portrait => (9, 16),
        };
        AspectRatio::from_dimensions(w, h).unwrap_or_default()
    }
}

impl fmt::Display for AspectPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AspectPreset::Widescreen => write!(f, "16:9"),
            AspectPreset::Standard => write!(f, "4:3"),
            AspectPreset::Photo => write!(f, "3:2"),
            AspectPreset::Square => write!(f, "1:1"),
            AspectPreset::Portrait => write!(f, "9:16"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropboxConfig {
    pub app_theme: AppTheme,
    pub aspect_preset: AspectPreset,
    pub show_guides: bool,
    pub max_upload_mb: u64,
    pub remember_last_dir: bool,
    pub last_dir: Option<String>,
}

impl Default for CropboxConfig {
    fn default() -> Self {
        Self {
            app_theme: AppTheme::default(),
            aspect_preset: AspectPreset::default(),
            show_guides: true,
            max_upload_mb: UploadPolicy::default().max_megabytes(),
            remember_last_dir: true,
            last_dir: None,
        }
    }
}

impl CropboxConfig {
    /// Upload policy matching the configured size limit. A zero or
    /// overflowing limit falls back to the default.
    pub fn upload_policy(&self) -> UploadPolicy {
        let policy = UploadPolicy::default();
        match self.max_upload_mb.checked_mul(1024 * 1024) {
            Some(max_bytes) if max_bytes > 0 => policy.with_max_bytes(max_bytes),
            _ => {
                tracing::warn!("ignoring upload limit of {} MB", self.max_upload_mb);
                policy
            }
        }
    }
}

impl CosmicConfigEntry for CropboxConfig {
    const VERSION: u64 = CONFIG_VERSION;

    fn write_entry(&self, config: &cosmic_config::Config) -> Result<(), cosmic_config::Error> {
        config.set("app_theme", self.app_theme)?;
        config.set("aspect_preset", self.aspect_preset)?;
        config.set("show_guides", self.show_guides)?;
        config.set("max_upload_mb", self.max_upload_mb)?;
        config.set("remember_last_dir", self.remember_last_dir)?;
        config.set("last_dir", self.last_dir.clone())?;
        Ok(())
    }

    fn get_entry(
        config: &cosmic_config::Config,
    ) -> Result<Self, (Vec<cosmic_config::Error>, Self)> {
        let mut errors = Vec::new();
        let mut cfg = CropboxConfig::default();

        macro_rules! get_field {
            ($name:literal, $field:ident, $type:ty) => {
                match config.get::<$type>($name) {
                    Ok(val) => cfg.$field = val,
                    Err(e) => errors.push(e),
                }
            };
        }

        get_field!("app_theme", app_theme, AppTheme);
        get_field!("aspect_preset", aspect_preset, AspectPreset);
        get_field!("show_guides", show_guides, bool);
        get_field!("max_upload_mb", max_upload_mb, u64);
        get_field!("remember_last_dir", remember_last_dir, bool);
        get_field!("last_dir", last_dir, Option<String>);

        if errors.is_empty() {
            Ok(cfg)
        } else {
            Err((errors, cfg))
        }
    }

    fn update_keys<T: AsRef<str>>(
        &mut self,
        config: &cosmic_config::Config,
        changed_keys: &[T],
    ) -> (Vec<cosmic_config::Error>, Vec<&'static str>) {
        let mut errors = Vec::new();
        let mut updated = Vec::new();

        for key in changed_keys {
            match key.as_ref() {
                "app_theme" => match config.get::<AppTheme>("app_theme") {
                    Ok(val) => {
                        self.app_theme = val;
                        updated.push("app_theme");
                    }
                    Err(e) => errors.push(e),
                },
                "aspect_preset" => match config.get::<AspectPreset>("aspect_preset") {
                    Ok(val) => {
                        self.aspect_preset = val;
                        updated.push("aspect_preset");
                    }
                    Err(e) => errors.push(e),
                },
                "show_guides" => match config.get::<bool>("show_guides") {
                    Ok(val) => {
                        self.show_guides = val;
                        updated.push("show_guides");
                    }
                    Err(e) => errors.push(e),
                },
                "max_upload_mb" => match config.get::<u64>("max_upload_mb") {
                    Ok(val) => {
                        self.max_upload_mb = val;
                        updated.push("max_upload_mb");
                    }
                    Err(e) => errors.push(e),
                },
                "remember_last_dir" => match config.get::<bool>("remember_last_dir") {
                    Ok(val) => {
                        self.remember_last_dir = val;
                        updated.push("remember_last_dir");
                    }
                    Err(e) => errors.push(e),
                },
                "last_dir" => match config.get::<Option<String>>("last_dir") {
                    Ok(val) => {
                        self.last_dir = val;
                        updated.push("last_dir");
                    }
                    Err(e) => errors.push(e),
                },
                _ => {}
            }
        }

        (errors, updated)
    }
}

pub fn config() -> Result<Config, cosmic_config::Error> {
    Config::new(APP_ID, CONFIG_VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limit_is_two_megabytes() {
        let cfg = CropboxConfig::default();
        assert_eq!(cfg.max_upload_mb, 2);
        assert_eq!(cfg.upload_policy(), UploadPolicy::default());
    }

    #[test]
    fn test_zero_limit_falls_back() {
        let cfg = CropboxConfig {
            max_upload_mb: 0,
            ..CropboxConfig::default()
        };
        assert_eq!(cfg.upload_policy().max_bytes, UploadPolicy::default().max_bytes);
    }

    #[test]
    fn test_huge_limit_falls_back() {
        let cfg = CropboxConfig {
            max_upload_mb: u64::MAX,
            ..CropboxConfig::default()
        };
        assert_eq!(cfg.upload_policy(), UploadPolicy::default());

        let cfg = CropboxConfig {
            max_upload_mb: 1 << 44,
            ..CropboxConfig::default()
        };
        assert_eq!(cfg.upload_policy(), UploadPolicy::default());
    }

    #[test]
    fn test_custom_limit() {
        let cfg = CropboxConfig {
            max_upload_mb: 8,
            ..CropboxConfig::default()
        };
        assert_eq!(cfg.upload_policy().max_bytes, 8 * 1024 * 1024);
    }

    #[test]
    fn test_update_keys_reads_directory_settings() {
        let dir = tempfile::tempdir().unwrap();
        // SAFETY: no other test in this crate touches the environment.
        unsafe { std::env::set_var("XDG_CONFIG_HOME", dir.path()) };

        let handler = Config::new("org.codeberg.bhh32.CropboxTest", CONFIG_VERSION).unwrap();
        handler.set("remember_last_dir", false).unwrap();
        handler
            .set("last_dir", Some("/srv/pictures".to_string()))
            .unwrap();

        let mut cfg = CropboxConfig::default();
        let (errors, updated) = cfg.update_keys(&handler, &["remember_last_dir", "last_dir"]);

        assert!(errors.is_empty());
        assert_eq!(updated, vec!["remember_last_dir", "last_dir"]);
        assert!(!cfg.remember_last_dir);
        assert_eq!(cfg.last_dir.as_deref(), Some("/srv/pictures"));
    }

    #[test]
    fn test_presets() {
        assert_eq!(AspectPreset::default().ratio(), AspectRatio::WIDESCREEN);
        assert!(AspectPreset::Square.ratio().is_square());
        assert!(AspectPreset::Portrait.ratio().is_portrait());
        assert_eq!(AspectPreset::Photo.to_string(), "3:2");
    }
}
