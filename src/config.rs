use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_output")]
    pub output_folder: String,

    pub llm: LlmConfig,

    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub image: ImageConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LlmConfig {
    pub provider: String, // "gemini", "ollama" or "openai"
    pub gemini: Option<GeminiConfig>,
    pub ollama: Option<OllamaConfig>,
    pub openai: Option<OpenAIConfig>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OllamaConfig {
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OpenAIConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GenerationConfig {
    #[serde(default = "default_option_count")]
    pub option_count: usize,

    #[serde(default = "default_min_clips")]
    pub min_clips: usize,
    #[serde(default = "default_max_clips")]
    pub max_clips: usize,

    #[serde(default = "default_min_duration")]
    pub min_duration_seconds: u32,
    #[serde(default = "default_max_duration")]
    pub max_duration_seconds: u32,

    /// When set, the wizard asks for a voice-over language after the tone
    /// step instead of always using the first entry of `languages`.
    #[serde(default = "default_language_step")]
    pub language_step: bool,

    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            option_count: default_option_count(),
            min_clips: default_min_clips(),
            max_clips: default_max_clips(),
            min_duration_seconds: default_min_duration(),
            max_duration_seconds: default_max_duration(),
            language_step: default_language_step(),
            languages: default_languages(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ImageConfig {
    #[serde(default = "default_max_image_bytes")]
    pub max_bytes: u64,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_bytes: default_max_image_bytes(),
        }
    }
}

fn default_output() -> String {
    "output".to_string()
}
fn default_option_count() -> usize {
    5
}
fn default_min_clips() -> usize {
    3
}
fn default_max_clips() -> usize {
    6
}
fn default_min_duration() -> u32 {
    8
}
fn default_max_duration() -> u32 {
    10
}
fn default_language_step() -> bool {
    true
}
fn default_languages() -> Vec<String> {
    vec![
        "Urdu".to_string(),
        "English".to_string(),
        "Arabic".to_string(),
        "Hindi".to_string(),
    ]
}
fn default_max_image_bytes() -> u64 {
    4 * 1024 * 1024
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("config.yml"))
    }

    fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            Config::template().save_to(path)?;
            anyhow::bail!(
                "{} not found. A template was written there; fill in your LLM provider settings.",
                path.display()
            );
        }

        let content = fs::read_to_string(path).context("Failed to read config.yml")?;
        let config: Config =
            serde_yaml_ng::from_str(&content).context("Failed to parse config.yml")?;
        Ok(config)
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        let content = serde_yaml_ng::to_string(self)?;
        fs::write(path, content).context("Failed to write config.yml")?;
        Ok(())
    }

    /// Starting point written on first run; the API key still has to be
    /// filled in by hand.
    fn template() -> Self {
        Self {
            output_folder: default_output(),
            llm: LlmConfig {
                provider: "gemini".to_string(),
                gemini: Some(GeminiConfig {
                    api_key: String::new(),
                    model: "gemini-3-flash-preview".to_string(),
                }),
                ollama: None,
                openai: None,
            },
            generation: GenerationConfig::default(),
            image: ImageConfig::default(),
        }
    }

    pub fn ensure_directories(&self) -> Result<()> {
        fs::create_dir_all(&self.output_folder)?;
        Ok(())
    }
}
