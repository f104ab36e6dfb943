use serde::{Deserialize, Serialize};

use crate::config::GenerationConfig;
use crate::error::WizardError;

/// The three choice steps whose options come from the model. The voice-over
/// language step is offered from the configured list instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    Style,
    Audience,
    Tone,
}

impl StepKind {
    pub fn noun(&self) -> &'static str {
        match self {
            StepKind::Style => "visual style",
            StepKind::Audience => "target audience",
            StepKind::Tone => "voice-over tone",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChoiceOption {
    pub id: i64,
    pub label: String,
    pub description: String,
    #[serde(default)]
    pub recommended: bool,
}

/// One segment of the generated commercial. All clips of one script share
/// the same seed so downstream CGI tooling keeps visual continuity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    pub clip_number: u32,
    pub visual_description: String,
    pub on_screen_text: String,
    pub voiceover_script: String,
    pub duration_seconds: u32,
    pub seed: String,
    pub transition_style: String,
}

pub fn strip_code_blocks(s: &str) -> String {
    let s = s.trim();
    if s.starts_with("```json") {
        s.trim_start_matches("```json")
            .trim_end_matches("```")
            .trim()
            .to_string()
    } else if s.starts_with("```") {
        s.trim_start_matches("```")
            .trim_end_matches("```")
            .trim()
            .to_string()
    } else {
        s.to_string()
    }
}

/// Parses an option list from a model response. An empty array is a valid
/// (if unhelpful) answer and is returned as-is; only malformed JSON is an
/// error. If the model flags several options as recommended, the first one
/// keeps the flag.
pub fn parse_options(raw: &str) -> Result<Vec<ChoiceOption>, WizardError> {
    let clean = strip_code_blocks(raw);
    let mut options: Vec<ChoiceOption> = serde_json::from_str(&clean)
        .map_err(|e| WizardError::Generation(format!("Failed to parse options JSON: {}", e)))?;

    let mut seen_recommended = false;
    for option in &mut options {
        if option.recommended {
            if seen_recommended {
                option.recommended = false;
            }
            seen_recommended = true;
        }
    }

    Ok(options)
}

/// Parses and validates a clip script from a model response. Unlike options,
/// an empty script is a hard failure, as are gaps in the numbering, a
/// duration outside the configured bound, or clips that disagree on the seed.
pub fn parse_clips(raw: &str, generation: &GenerationConfig) -> Result<Vec<Clip>, WizardError> {
    let clean = strip_code_blocks(raw);
    let clips: Vec<Clip> = serde_json::from_str(&clean)
        .map_err(|e| WizardError::Generation(format!("Failed to parse script JSON: {}", e)))?;

    if clips.is_empty() {
        return Err(WizardError::Generation(
            "Model returned an empty script".to_string(),
        ));
    }
    if clips.len() < generation.min_clips || clips.len() > generation.max_clips {
        return Err(WizardError::Generation(format!(
            "Script has {} clips, expected between {} and {}",
            clips.len(),
            generation.min_clips,
            generation.max_clips
        )));
    }

    let seed = clips[0].seed.clone();
    if seed.is_empty() {
        return Err(WizardError::Generation(
            "Script clips carry an empty seed".to_string(),
        ));
    }

    for (i, clip) in clips.iter().enumerate() {
        let expected = (i + 1) as u32;
        if clip.clip_number != expected {
            return Err(WizardError::Generation(format!(
                "Clip numbering has a gap: expected {}, got {}",
                expected, clip.clip_number
            )));
        }
        if clip.duration_seconds < generation.min_duration_seconds
            || clip.duration_seconds > generation.max_duration_seconds
        {
            return Err(WizardError::Generation(format!(
                "Clip {} duration {}s is outside {}..{}s",
                clip.clip_number,
                clip.duration_seconds,
                generation.min_duration_seconds,
                generation.max_duration_seconds
            )));
        }
        if clip.seed != seed {
            return Err(WizardError::Generation(format!(
                "Clip {} seed differs from the script seed",
                clip.clip_number
            )));
        }
    }

    Ok(clips)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip_json(number: u32, seed: &str, duration: u32) -> serde_json::Value {
        serde_json::json!({
            "clipNumber": number,
            "visualDescription": format!("Macro shot {}", number),
            "onScreenText": "Premium Quality",
            "voiceoverScript": "بہترین معیار",
            "durationSeconds": duration,
            "seed": seed,
            "transitionStyle": "Whip Pan"
        })
    }

    fn script_json(seeds_durations: &[(u32, &str, u32)]) -> String {
        let clips: Vec<_> = seeds_durations
            .iter()
            .map(|(n, s, d)| clip_json(*n, s, *d))
            .collect();
        serde_json::to_string(&clips).unwrap()
    }

    #[test]
    fn test_strip_code_blocks() {
        assert_eq!(strip_code_blocks("```json\n[1]\n```"), "[1]");
        assert_eq!(strip_code_blocks("```\n[1]\n```"), "[1]");
        assert_eq!(strip_code_blocks(" [1] "), "[1]");
    }

    #[test]
    fn test_parse_options_success() {
        let raw = r#"[
            {"id": 1, "label": "Cinematic Noir", "description": "Moody lighting"},
            {"id": 2, "label": "Bright Studio", "description": "Clean white set", "recommended": true}
        ]"#;
        let options = parse_options(raw).unwrap();
        assert_eq!(options.len(), 2);
        assert!(!options[0].recommended);
        assert!(options[1].recommended);
    }

    #[test]
    fn test_parse_options_empty_is_ok() {
        assert!(parse_options("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_options_malformed_is_error() {
        let err = parse_options("not json").unwrap_err();
        assert!(matches!(err, WizardError::Generation(_)));
    }

    #[test]
    fn test_parse_options_demotes_duplicate_recommendations() {
        let raw = r#"[
            {"id": 1, "label": "A", "description": "", "recommended": true},
            {"id": 2, "label": "B", "description": "", "recommended": true}
        ]"#;
        let options = parse_options(raw).unwrap();
        assert!(options[0].recommended);
        assert!(!options[1].recommended);
    }

    #[test]
    fn test_parse_clips_success() {
        let raw = script_json(&[
            (1, "48291023", 8),
            (2, "48291023", 10),
            (3, "48291023", 9),
        ]);
        let clips = parse_clips(&raw, &GenerationConfig::default()).unwrap();
        assert_eq!(clips.len(), 3);
        assert!(clips.iter().all(|c| c.seed == "48291023"));
    }

    #[test]
    fn test_parse_clips_empty_is_error() {
        let err = parse_clips("[]", &GenerationConfig::default()).unwrap_err();
        assert!(matches!(err, WizardError::Generation(_)));
    }

    #[test]
    fn test_parse_clips_rejects_numbering_gap() {
        let raw = script_json(&[
            (1, "48291023", 8),
            (3, "48291023", 8),
            (4, "48291023", 8),
        ]);
        let err = parse_clips(&raw, &GenerationConfig::default()).unwrap_err();
        assert!(err.to_string().contains("numbering"));
    }

    #[test]
    fn test_parse_clips_rejects_out_of_bound_duration() {
        let raw = script_json(&[
            (1, "48291023", 8),
            (2, "48291023", 30),
            (3, "48291023", 8),
        ]);
        let err = parse_clips(&raw, &GenerationConfig::default()).unwrap_err();
        assert!(err.to_string().contains("duration"));
    }

    #[test]
    fn test_parse_clips_rejects_seed_mismatch() {
        let raw = script_json(&[
            (1, "48291023", 8),
            (2, "11111111", 8),
            (3, "48291023", 8),
        ]);
        let err = parse_clips(&raw, &GenerationConfig::default()).unwrap_err();
        assert!(err.to_string().contains("seed"));
    }

    #[test]
    fn test_parse_clips_rejects_too_many_clips() {
        let entries: Vec<(u32, &str, u32)> =
            (1..=7).map(|n| (n, "48291023", 8)).collect();
        let raw = script_json(&entries);
        let err = parse_clips(&raw, &GenerationConfig::default()).unwrap_err();
        assert!(err.to_string().contains("clips"));
    }
}
