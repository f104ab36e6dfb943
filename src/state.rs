use crate::image::ImageData;
use crate::script::Clip;

/// Wizard steps in their fixed forward order. The step only moves forward
/// during a session; going back means a full reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Step {
    Input,
    Style,
    Audience,
    Tone,
    Language,
    Generating,
    Result,
}

impl Step {
    pub fn title(&self) -> &'static str {
        match self {
            Step::Input => "Product Input",
            Step::Style => "Visual Style",
            Step::Audience => "Target Audience",
            Step::Tone => "Voice-over Tone",
            Step::Language => "Voice-over Language",
            Step::Generating => "Generating Script",
            Step::Result => "Director Script",
        }
    }

    pub fn is_choice_step(&self) -> bool {
        matches!(
            self,
            Step::Style | Step::Audience | Step::Tone | Step::Language
        )
    }
}

/// Everything accumulated during one wizard session. Owned and mutated only
/// by the controller; dropped wholesale on reset.
#[derive(Debug, Clone, Default)]
pub struct WizardState {
    pub context_text: String,
    pub context_image: Option<ImageData>,
    pub selected_style: String,
    pub selected_audience: String,
    pub selected_tone: String,
    pub selected_language: String,
    pub clips: Vec<Clip>,
}

impl WizardState {
    /// Selections made so far, in step order, for recap rendering.
    pub fn selections(&self) -> Vec<(&'static str, &str)> {
        let mut out = Vec::new();
        for (name, value) in [
            ("Style", self.selected_style.as_str()),
            ("Audience", self.selected_audience.as_str()),
            ("Tone", self.selected_tone.as_str()),
            ("Language", self.selected_language.as_str()),
        ] {
            if !value.is_empty() {
                out.push((name, value));
            }
        }
        out
    }
}
