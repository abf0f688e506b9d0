pub mod error;
pub mod normalize;
pub mod radar;
pub mod render;
pub mod session;
pub mod table;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::providers::{Env, Format, Json, Serialized};
use figment::Figment;
use schemars::generate::SchemaSettings;
use serde::{Deserialize, Serialize};

pub use error::{CollaboratorError, ConfigError, InputValidationError, SchemaError};
pub use normalize::normalize;

/// Fewest subjects a comparison can have.
pub const MIN_ITEMS: usize = 2;
/// Most subjects a comparison can have.
pub const MAX_ITEMS: usize = 4;
/// Lower bound scores are clamped to.
pub const MIN_SCORE: f64 = 0.0;
/// Nominal ceiling of the scoring scale; also the radar's outer ring.
pub const MAX_SCORE: f64 = 10.0;

// --- Types (wire shape of the structured-output response) ---

/// One attribute along which the items are compared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonCriterion {
    /// The name of the comparison attribute (e.g., Price, Performance, Flavor).
    pub name: String,
    /// A short text description for each item regarding this attribute. Order must match the items array.
    pub descriptions: Vec<String>,
    /// A numerical score from 1 to 10 for each item on this attribute. 10 is best.
    pub scores: Vec<f64>,
    /// The index of the item that wins this category. Use -1 if it's a tie or subjective.
    #[serde(with = "winner_index")]
    #[schemars(with = "i64")]
    pub winner_index: Option<usize>,
}

impl ComparisonCriterion {
    /// Score of `item`, or 0 when the criterion has no entry for it.
    pub fn score(&self, item: usize) -> f64 {
        self.scores.get(item).copied().unwrap_or(MIN_SCORE)
    }

    pub fn description(&self, item: usize) -> &str {
        self.descriptions.get(item).map(String::as_str).unwrap_or("")
    }

    pub fn is_tie(&self) -> bool {
        self.winner_index.is_none()
    }
}

/// A complete comparison as returned by the generator and accepted by the views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    /// The names of the items being compared, normalized if necessary.
    pub items: Vec<String>,
    /// A concise executive summary of the comparison.
    pub summary: String,
    /// A final conclusion or recommendation based on the comparison.
    pub verdict: String,
    pub criteria: Vec<ComparisonCriterion>,
}

impl ComparisonResult {
    /// Display name of the winner of criterion `index`, if there is one.
    pub fn winner_name(&self, index: usize) -> Option<&str> {
        let winner = self.criteria.get(index)?.winner_index?;
        self.items.get(winner).map(String::as_str)
    }
}

/// Serializes `Option<usize>` as the index or the tie sentinel `-1`.
mod winner_index {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<usize>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(index) => s.serialize_u64(*index as u64),
            None => s.serialize_i64(-1),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<usize>, D::Error> {
        let raw = i64::deserialize(d)?;
        Ok(usize::try_from(raw).ok())
    }
}

/// JSON schema of [`ComparisonResult`], handed to the model as its structured-output format.
///
/// Fully inlined and without `$schema`/`title`: provider schema dialects (Gemini's
/// `responseSchema` in particular) reject references and meta keywords.
pub fn response_schema() -> serde_json::Value {
    let mut schema = SchemaSettings::draft07()
        .with(|s| {
            s.meta_schema = None;
            s.inline_subschemas = true;
        })
        .into_generator()
        .into_root_schema_for::<ComparisonResult>();
    schema.remove("title");
    schema.to_value()
}

// --- AI Settings ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AiSettings {
    pub provider: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    /// Upper bound on a single generator attempt.
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            provider: "google".to_string(),
            api_key: String::new(),
            model: "gemini-2.5-flash".to_string(),
            temperature: 0.4,
            timeout_secs: 60,
            max_retries: 2,
            initial_backoff_ms: 500,
            max_backoff_ms: 8_000,
        }
    }
}

impl AiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Resolve the settings directory (~/.versus/).
pub fn versus_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".versus")
}

pub fn settings_path() -> PathBuf {
    versus_dir().join("settings.json")
}

/// Load settings: defaults, then ~/.versus/settings.json, then `VERSUS_*` environment variables.
pub fn read_settings() -> Result<AiSettings, ConfigError> {
    read_settings_from(&settings_path())
}

pub fn read_settings_from(path: &Path) -> Result<AiSettings, ConfigError> {
    // VERSUS_PROVIDER, VERSUS_API_KEY, VERSUS_TIMEOUT_SECS, ...
    extract(file_layer(path).merge(Env::prefixed("VERSUS_")), path)
}

/// Defaults plus the file only, so environment overrides never get persisted.
pub fn read_settings_file(path: &Path) -> Result<AiSettings, ConfigError> {
    extract(file_layer(path), path)
}

fn file_layer(path: &Path) -> Figment {
    let figment = Figment::from(Serialized::defaults(AiSettings::default()));
    if path.exists() {
        figment.merge(Json::file(path))
    } else {
        figment
    }
}

fn extract(figment: Figment, path: &Path) -> Result<AiSettings, ConfigError> {
    figment.extract().map_err(|e| ConfigError::Load {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

pub fn write_settings(settings: &AiSettings) -> Result<(), ConfigError> {
    write_settings_to(&settings_path(), settings)
}

pub fn write_settings_to(path: &Path, settings: &AiSettings) -> Result<(), ConfigError> {
    let write_err = |message: String| ConfigError::Write {
        path: path.to_path_buf(),
        message,
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|e| write_err(e.to_string()))?;
    }
    let json = serde_json::to_string_pretty(settings).map_err(|e| write_err(e.to_string()))?;
    fs::write(path, json).map_err(|e| write_err(e.to_string()))
}

pub fn ai_configured(settings: &AiSettings) -> bool {
    !settings.provider.is_empty()
        && !settings.model.is_empty()
        && (settings.provider == "ollama" || !settings.api_key.is_empty())
}
