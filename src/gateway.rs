use rand::Rng;
use serde_json::json;

use crate::config::GenerationConfig;
use crate::error::WizardError;
use crate::image::ImageData;
use crate::llm::LlmClient;
use crate::script::{parse_clips, parse_options, ChoiceOption, Clip, StepKind};

const SYSTEM_INSTRUCTION: &str = "\
You are a CGI commercial director driving an automation wizard. \
Always answer with valid JSON matching the requested schema and nothing else.

Rules:
1. Number every option list 1, 2, 3... and keep labels short.
2. Option lists are tailored to the given product, never generic boilerplate.
3. One script uses exactly one global seed, repeated verbatim in every clip, \
and one consistent male voice throughout.
4. On-screen text is English only. The voice-over script is written in the \
requested voice-over language and its native script.
5. Never depict real female human figures; use full-body mannequins for \
female-oriented products.";

/// Wraps the two model contracts: per-step option generation and final
/// script generation. Single-shot calls, no retries; any transport or
/// schema problem surfaces as a `Generation` error.
pub struct ScriptingGateway {
    llm: Box<dyn LlmClient>,
    generation: GenerationConfig,
}

impl ScriptingGateway {
    pub fn new(llm: Box<dyn LlmClient>, generation: GenerationConfig) -> Self {
        Self { llm, generation }
    }

    pub async fn fetch_options(
        &self,
        context: &str,
        kind: StepKind,
        image: Option<&ImageData>,
    ) -> Result<Vec<ChoiceOption>, WizardError> {
        let count = self.generation.option_count;
        let prompt = format!(
            "Product/Service: \"{}\"{}.\n\
             Generate {} context-specific {} options for a CGI commercial of \
             this product. Number them 1 to {}. You may mark at most one \
             option as recommended.",
            context,
            if image.is_some() {
                " (a reference image is attached, analyze it for visual context)"
            } else {
                ""
            },
            count,
            kind.noun(),
            count,
        );

        log::debug!("Fetching {} options", kind.noun());

        let raw = self
            .llm
            .generate(SYSTEM_INSTRUCTION, &prompt, image, &option_schema())
            .await
            .map_err(|e| WizardError::Generation(e.to_string()))?;

        parse_options(&raw)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn fetch_script(
        &self,
        context: &str,
        style: &str,
        audience: &str,
        tone: &str,
        language: Option<&str>,
        image: Option<&ImageData>,
    ) -> Result<Vec<Clip>, WizardError> {
        let language = language
            .or_else(|| self.generation.languages.first().map(String::as_str))
            .unwrap_or("English");
        let seed = new_seed();

        let prompt = format!(
            "Generate {} to {} director clip blocks for:\n\
             Product: {}\n\
             Selected Style: {}\n\
             Target Audience: {}\n\
             Male VO Tone: {}\n\
             Voice-over Language: {}\n\
             {}\n\
             Number clips sequentially from 1 with no gaps. Use the global \
             seed {} in every clip. Each clip lasts between {} and {} seconds. \
             Visual descriptions are optimized English CGI prompts; the \
             voice-over script is {}.",
            self.generation.min_clips,
            self.generation.max_clips,
            context,
            style,
            audience,
            tone,
            language,
            if image.is_some() {
                "Incorporate mood, lighting and visual elements from the attached reference image."
            } else {
                ""
            },
            seed,
            self.generation.min_duration_seconds,
            self.generation.max_duration_seconds,
            language,
        );

        log::debug!("Fetching script with seed {}", seed);

        let raw = self
            .llm
            .generate(SYSTEM_INSTRUCTION, &prompt, image, &clip_schema())
            .await
            .map_err(|e| WizardError::Generation(e.to_string()))?;

        parse_clips(&raw, &self.generation)
    }
}

/// 8-digit seed pinned in the script prompt. Validation only requires that
/// all clips agree on one seed, so a model substituting its own still passes.
fn new_seed() -> String {
    format!("{:08}", rand::rng().random_range(0..100_000_000u32))
}

// Schema descriptors in the Gemini structured-output dialect. Other
// providers run in plain JSON mode and rely on response parsing instead.
fn option_schema() -> serde_json::Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "id": { "type": "INTEGER" },
                "label": { "type": "STRING" },
                "description": { "type": "STRING" },
                "recommended": { "type": "BOOLEAN" }
            },
            "required": ["id", "label", "description"]
        }
    })
}

fn clip_schema() -> serde_json::Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "clipNumber": { "type": "INTEGER" },
                "seed": { "type": "STRING" },
                "visualDescription": { "type": "STRING" },
                "onScreenText": { "type": "STRING" },
                "voiceoverScript": { "type": "STRING" },
                "durationSeconds": { "type": "INTEGER" },
                "transitionStyle": { "type": "STRING" }
            },
            "required": [
                "clipNumber", "seed", "visualDescription", "onScreenText",
                "voiceoverScript", "durationSeconds", "transitionStyle"
            ]
        }
    })
}
