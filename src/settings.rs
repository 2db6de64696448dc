//! Game settings and preferences
//!
//! Read once at startup: an optional JSON block embedded in the page, then
//! URL query overrides. Nothing is written back.

use serde::{Deserialize, Serialize};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Triangles per full circle (stars, explosions)
    pub fn circle_segments(&self) -> u32 {
        match self {
            QualityPreset::Low => 6,
            QualityPreset::Medium => 10,
            QualityPreset::High => 16,
        }
    }

    /// Draw every n-th star
    pub fn star_stride(&self) -> usize {
        match self {
            QualityPreset::Low => 2,
            QualityPreset::Medium | QualityPreset::High => 1,
        }
    }

    /// Whether power-up tiles get rounded corners
    pub fn rounded_tiles(&self) -> bool {
        !matches!(self, QualityPreset::Low)
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Start muted
    pub muted: bool,

    /// Pause when the tab is hidden or the window loses focus
    pub auto_pause: bool,

    /// Fixed session seed (random per session when absent)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            master_volume: 0.35,
            muted: false,
            auto_pause: true,
            seed: None,
        }
    }
}

/// Interpret a query flag value
fn parse_flag(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" | "" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Settings {
    /// Parse the embedded JSON config. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.master_volume = settings.master_volume.clamp(0.0, 1.0);
        Ok(settings)
    }

    /// Apply `key=value` overrides from a URL query string (leading `?`
    /// optional). Unknown keys and unparsable values are ignored.
    pub fn apply_query(&mut self, query: &str) {
        let query = query.strip_prefix('?').unwrap_or(query);
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "quality" => {
                    if let Some(q) = QualityPreset::parse(value) {
                        self.quality = q;
                    }
                }
                "volume" => {
                    if let Ok(v) = value.parse::<f32>() {
                        self.master_volume = v.clamp(0.0, 1.0);
                    }
                }
                "muted" => {
                    if let Some(b) = parse_flag(value) {
                        self.muted = b;
                    }
                }
                "autopause" => {
                    if let Some(b) = parse_flag(value) {
                        self.auto_pause = b;
                    }
                }
                "seed" => {
                    if let Ok(s) = value.parse::<u64>() {
                        self.seed = Some(s);
                    }
                }
                _ => log::debug!("Ignoring unknown setting '{key}'"),
            }
        }
    }

    /// Element holding the optional JSON config
    const CONFIG_ELEMENT_ID: &'static str = "game-config";

    /// Load settings from the page (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let window = web_sys::window();
        let embedded = window
            .as_ref()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::CONFIG_ELEMENT_ID))
            .and_then(|el| el.text_content());

        let mut settings = match embedded {
            Some(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from #{}", Self::CONFIG_ELEMENT_ID);
                    settings
                }
                Err(e) => {
                    log::warn!("Invalid #{} block: {e}", Self::CONFIG_ELEMENT_ID);
                    Self::default()
                }
            },
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        };

        if let Some(search) = window.and_then(|w| w.location().search().ok()) {
            settings.apply_query(&search);
        }
        settings
    }

    /// Native: defaults plus `key=value` arguments
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let mut settings = Self::default();
        let args: Vec<String> = std::env::args().skip(1).collect();
        settings.apply_query(&args.join("&"));
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.quality, QualityPreset::Medium);
        assert_eq!(s.master_volume, 0.35);
        assert!(!s.muted);
        assert!(s.auto_pause);
        assert_eq!(s.seed, None);
    }

    #[test]
    fn test_json_partial_keeps_defaults() {
        let s = Settings::from_json(r#"{"quality":"low","seed":42}"#).unwrap();
        assert_eq!(s.quality, QualityPreset::Low);
        assert_eq!(s.seed, Some(42));
        assert_eq!(s.master_volume, 0.35);
        assert!(s.auto_pause);
    }

    #[test]
    fn test_json_clamps_volume() {
        let s = Settings::from_json(r#"{"master_volume":3.0}"#).unwrap();
        assert_eq!(s.master_volume, 1.0);
    }

    #[test]
    fn test_json_rejects_garbage() {
        assert!(Settings::from_json("not json").is_err());
    }

    #[test]
    fn test_query_overrides() {
        let mut s = Settings::default();
        s.apply_query("?quality=high&muted=1&volume=0.5&seed=7&autopause=0");
        assert_eq!(s.quality, QualityPreset::High);
        assert!(s.muted);
        assert_eq!(s.master_volume, 0.5);
        assert_eq!(s.seed, Some(7));
        assert!(!s.auto_pause);
    }

    #[test]
    fn test_query_ignores_bad_values() {
        let mut s = Settings::default();
        s.apply_query("quality=ultra&volume=loud&seed=-1&bogus=1&&muted");
        assert_eq!(s.quality, QualityPreset::Medium);
        assert_eq!(s.master_volume, 0.35);
        assert_eq!(s.seed, None);
        // Bare flag means on
        assert!(s.muted);
    }

    #[test]
    fn test_preset_detail() {
        assert!(QualityPreset::Low.circle_segments() < QualityPreset::High.circle_segments());
        assert!(!QualityPreset::Low.rounded_tiles());
        assert_eq!(QualityPreset::Low.star_stride(), 2);
    }
}
