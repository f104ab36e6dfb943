use crate::config::GenerationConfig;
use crate::error::WizardError;
use crate::gateway::ScriptingGateway;
use crate::image::ImageData;
use crate::script::{ChoiceOption, StepKind};
use crate::state::{Step, WizardState};

/// Drives the wizard session: owns the current step, the accumulated
/// selections and the option list for the active step. At most one request
/// is in flight; the busy flag gates duplicate submissions.
///
/// Failure policy: any generation failure sends the wizard back to the
/// Input step and discards accumulated selections. The error message is
/// kept for display so the user knows why they are starting over.
pub struct WizardController {
    gateway: ScriptingGateway,
    generation: GenerationConfig,
    step: Step,
    state: WizardState,
    options: Vec<ChoiceOption>,
    busy: bool,
    last_error: Option<String>,
}

impl WizardController {
    pub fn new(gateway: ScriptingGateway, generation: GenerationConfig) -> Self {
        Self {
            gateway,
            generation,
            step: Step::Input,
            state: WizardState::default(),
            options: Vec::new(),
            busy: false,
            last_error: None,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn options(&self) -> &[ChoiceOption] {
        &self.options
    }

    pub fn busy(&self) -> bool {
        self.busy
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Accepts the product brief and fetches the style options. Advances to
    /// the Style step only once the fetch resolves.
    pub async fn submit_context(
        &mut self,
        text: &str,
        image: Option<ImageData>,
    ) -> Result<(), WizardError> {
        self.ensure_idle()?;
        if self.step != Step::Input {
            return Err(WizardError::State(format!(
                "Cannot submit a product brief at the {} step",
                self.step.title()
            )));
        }

        let trimmed = text.trim();
        if trimmed.is_empty() && image.is_none() {
            return Err(WizardError::Validation(
                "Describe the product or attach a reference image".to_string(),
            ));
        }

        self.state.context_text = trimmed.to_string();
        self.state.context_image = image;
        self.busy = true;
        self.last_error = None;

        let context = self.effective_context();
        let result = self
            .gateway
            .fetch_options(&context, StepKind::Style, self.state.context_image.as_ref())
            .await;
        self.busy = false;

        match result {
            Ok(options) => {
                self.options = options;
                self.step = Step::Style;
                Ok(())
            }
            Err(err) => self.fail(err),
        }
    }

    /// Records a selection for the current choice step and advances. `step`
    /// must match the controller's current step, which guards against stale
    /// UI callbacks firing after a transition, and `label` must come from
    /// the most recently fetched option set.
    pub async fn select_option(&mut self, step: Step, label: &str) -> Result<(), WizardError> {
        self.ensure_idle()?;
        if step != self.step {
            return Err(WizardError::State(format!(
                "Selection for {} but the wizard is at {}",
                step.title(),
                self.step.title()
            )));
        }
        if !self.step.is_choice_step() {
            return Err(WizardError::State(format!(
                "{} is not a choice step",
                self.step.title()
            )));
        }
        if !self.options.iter().any(|o| o.label == label) {
            return Err(WizardError::State(format!(
                "\"{}\" is not among the current {} options",
                label,
                self.step.title()
            )));
        }

        self.busy = true;
        self.last_error = None;

        let outcome = match self.step {
            Step::Style => {
                self.state.selected_style = label.to_string();
                self.advance_with_options(StepKind::Audience, Step::Audience)
                    .await
            }
            Step::Audience => {
                self.state.selected_audience = label.to_string();
                self.advance_with_options(StepKind::Tone, Step::Tone).await
            }
            Step::Tone => {
                self.state.selected_tone = label.to_string();
                if self.generation.language_step {
                    // Language choices are static, no model round-trip
                    self.options = self.language_options();
                    self.step = Step::Language;
                    Ok(())
                } else {
                    self.generate_script().await
                }
            }
            Step::Language => {
                self.state.selected_language = label.to_string();
                self.generate_script().await
            }
            _ => unreachable!("guarded by is_choice_step"),
        };

        self.busy = false;
        match outcome {
            Ok(()) => Ok(()),
            Err(err) => self.fail(err),
        }
    }

    /// Back to the start with empty state. Safe from any step.
    pub fn reset(&mut self) {
        self.step = Step::Input;
        self.state = WizardState::default();
        self.options.clear();
        self.busy = false;
        self.last_error = None;
    }

    #[cfg(test)]
    fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    fn ensure_idle(&self) -> Result<(), WizardError> {
        if self.busy {
            return Err(WizardError::State(
                "A request is already in flight".to_string(),
            ));
        }
        Ok(())
    }

    fn effective_context(&self) -> String {
        if self.state.context_text.is_empty() {
            "Visual Context".to_string()
        } else {
            self.state.context_text.clone()
        }
    }

    async fn advance_with_options(
        &mut self,
        kind: StepKind,
        next: Step,
    ) -> Result<(), WizardError> {
        let context = self.effective_context();
        let options = self
            .gateway
            .fetch_options(&context, kind, self.state.context_image.as_ref())
            .await?;
        self.options = options;
        self.step = next;
        Ok(())
    }

    async fn generate_script(&mut self) -> Result<(), WizardError> {
        self.step = Step::Generating;
        self.options.clear();

        let context = self.effective_context();
        let language = if self.state.selected_language.is_empty() {
            None
        } else {
            Some(self.state.selected_language.as_str())
        };
        let clips = self
            .gateway
            .fetch_script(
                &context,
                &self.state.selected_style,
                &self.state.selected_audience,
                &self.state.selected_tone,
                language,
                self.state.context_image.as_ref(),
            )
            .await?;

        self.state.clips = clips;
        self.step = Step::Result;
        Ok(())
    }

    fn language_options(&self) -> Vec<ChoiceOption> {
        self.generation
            .languages
            .iter()
            .enumerate()
            .map(|(i, language)| ChoiceOption {
                id: (i + 1) as i64,
                label: language.clone(),
                description: format!("Voice-over delivered in {}", language),
                recommended: i == 0,
            })
            .collect()
    }

    fn fail(&mut self, err: WizardError) -> Result<(), WizardError> {
        log::warn!("Generation failed: {}", err);
        let message = err.to_string();
        self.reset();
        self.last_error = Some(message);
        Err(err)
    }
}
