use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    pub cosmetics: CosmeticSettings,
    pub water: WaterSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CosmeticSettings {
    /// Seed for every random pass of a compilation
    pub seed: u64,
    pub rotate_diagonals: bool,
    pub jitter: bool,
    pub jitter_horizontal: f32,
    pub jitter_vertical: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterSettings {
    /// Added to every requested water height before it is placed
    pub lift: f32,
    pub open_water_nudge: f32,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            cosmetics: CosmeticSettings::default(),
            water: WaterSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for CosmeticSettings {
    fn default() -> Self {
        Self {
            seed: 0,
            rotate_diagonals: true,
            jitter: true,
            jitter_horizontal: 0.75,
            jitter_vertical: 0.5,
        }
    }
}

impl CosmeticSettings {
    /// No diagonal rotation and no jitter
    pub fn disabled() -> Self {
        Self {
            rotate_diagonals: false,
            jitter: false,
            ..Self::default()
        }
    }
}

impl Default for WaterSettings {
    fn default() -> Self {
        Self {
            lift: 0.375,
            open_water_nudge: 0.125,
            color: "#182190".to_string(),
        }
    }
}

impl CompilerConfig {
    /// Fully deterministic output: cosmetic passes off and open water left flat
    pub fn deterministic() -> Self {
        Self {
            cosmetics: CosmeticSettings::disabled(),
            water: WaterSettings {
                open_water_nudge: 0.0,
                ..WaterSettings::default()
            },
            ..Self::default()
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let config: CompilerConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            eprintln!("Failed to load config: {}, using defaults", e);
            Self::default()
        })
    }
}
