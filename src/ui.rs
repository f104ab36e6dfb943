use anyhow::{anyhow, Result};
use indicatif::ProgressBar;
use inquire::{Select, Text};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::config::Config;
use crate::error::WizardError;
use crate::image::ImageData;
use crate::script::{ChoiceOption, Clip};
use crate::state::{Step, WizardState};
use crate::wizard::WizardController;

/// Terminal front end for the wizard. All flow decisions live in the
/// controller; this loop only renders the current step and feeds input back.
pub async fn run(mut wizard: WizardController, config: &Config) -> Result<()> {
    println!("spotdirector - CGI commercial script wizard\n");

    loop {
        match wizard.step() {
            Step::Input => {
                if let Some(message) = wizard.last_error() {
                    println!("\n{}\n", message);
                }

                let text = Text::new("Describe the product or service:").prompt()?;
                let image_path =
                    Text::new("Reference image path (leave empty to skip):").prompt()?;

                let image = match load_image(image_path.trim(), config.image.max_bytes) {
                    Ok(image) => image,
                    Err(err) => {
                        println!("{}", err);
                        continue;
                    }
                };

                let spinner = spinner("Generating style options...");
                let result = wizard.submit_context(&text, image).await;
                spinner.finish_and_clear();

                // Generation failures leave their message on the controller;
                // validation failures are reported here directly.
                if let Err(WizardError::Validation(message)) = result {
                    println!("{}", message);
                }
            }

            Step::Style | Step::Audience | Step::Tone | Step::Language => {
                let step = wizard.step();
                let lines: Vec<String> =
                    wizard.options().iter().map(render_option).collect();
                if lines.is_empty() {
                    println!(
                        "The model returned no {} options. Starting over.",
                        step.title()
                    );
                    wizard.reset();
                    continue;
                }

                let prompt = format!("Select a {}:", step.title());
                let selection = Select::new(&prompt, lines).prompt()?;
                let label = label_for_selection(wizard.options(), &selection)?;

                let spinner = spinner(if step == Step::Tone || step == Step::Language {
                    "Directing your commercial..."
                } else {
                    "Generating options..."
                });
                let result = wizard.select_option(step, &label).await;
                spinner.finish_and_clear();
                if let Err(err) = result {
                    // The controller already applied its failure policy;
                    // the Input step will show the stored message.
                    log::debug!("Selection failed: {}", err);
                }
            }

            // Transient, resolved inside select_option
            Step::Generating => continue,

            Step::Result => {
                render_result(wizard.state());
                if let Some(path) = save_script(wizard.state(), &config.output_folder)? {
                    println!("Script saved to {}\n", path);
                }

                let next = Select::new(
                    "What next?",
                    vec!["Start over".to_string(), "Quit".to_string()],
                )
                .prompt()?;
                if next == "Start over" {
                    wizard.reset();
                } else {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn load_image(path: &str, max_bytes: u64) -> Result<Option<ImageData>, WizardError> {
    if path.is_empty() {
        return Ok(None);
    }
    ImageData::load(Path::new(path), max_bytes).map(Some)
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

fn render_option(option: &ChoiceOption) -> String {
    format!(
        "{}. {}{} - {}",
        option.id,
        option.label,
        if option.recommended {
            " (recommended)"
        } else {
            ""
        },
        option.description
    )
}

fn label_for_selection(options: &[ChoiceOption], selection: &str) -> Result<String> {
    let id: i64 = selection
        .split('.')
        .next()
        .unwrap_or("")
        .trim()
        .parse()
        .map_err(|_| anyhow!("Could not read the selected option number"))?;
    options
        .iter()
        .find(|o| o.id == id)
        .map(|o| o.label.clone())
        .ok_or_else(|| anyhow!("Selection did not match any option"))
}

fn render_result(state: &WizardState) {
    println!("\n==== Director Script ====");
    for (name, value) in state.selections() {
        println!("{}: {}", name, value);
    }
    println!();

    for clip in &state.clips {
        println!("{}", format_clip_block(clip));
    }
}

/// One copyable block per clip, combining all of its textual fields.
pub fn format_clip_block(clip: &Clip) -> String {
    format!(
        "=== CLIP {} | {}s | {} ===\n\
         Seed: {}\n\
         Visual: {}\n\
         On-screen: {}\n\
         Voice-over: {}\n",
        clip.clip_number,
        clip.duration_seconds,
        clip.transition_style,
        clip.seed,
        clip.visual_description,
        clip.on_screen_text,
        clip.voiceover_script,
    )
}

fn save_script(state: &WizardState, output_folder: &str) -> Result<Option<String>> {
    if state.clips.is_empty() {
        return Ok(None);
    }
    let filename = format!("script_{}.json", state.clips[0].seed);
    let path = Path::new(output_folder).join(filename);
    fs::write(&path, serde_json::to_string_pretty(&state.clips)?)?;
    Ok(Some(path.display().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::Clip;

    fn option(id: i64, label: &str, recommended: bool) -> ChoiceOption {
        ChoiceOption {
            id,
            label: label.to_string(),
            description: format!("{} treatment", label),
            recommended,
        }
    }

    #[test]
    fn test_render_option_marks_recommendation() {
        let line = render_option(&option(2, "Bright Studio", true));
        assert_eq!(line, "2. Bright Studio (recommended) - Bright Studio treatment");

        let line = render_option(&option(1, "Cinematic Noir", false));
        assert_eq!(line, "1. Cinematic Noir - Cinematic Noir treatment");
    }

    #[test]
    fn test_label_for_selection_maps_back_by_id() {
        let options = vec![
            option(1, "Cinematic Noir", false),
            option(2, "Bright Studio", true),
        ];
        let line = render_option(&options[1]);
        assert_eq!(label_for_selection(&options, &line).unwrap(), "Bright Studio");
    }

    #[test]
    fn test_label_for_selection_rejects_garbage() {
        let options = vec![option(1, "Cinematic Noir", false)];
        assert!(label_for_selection(&options, "not a line").is_err());
        assert!(label_for_selection(&options, "7. Ghost - gone").is_err());
    }

    #[test]
    fn test_format_clip_block() {
        let clip = Clip {
            clip_number: 1,
            visual_description: "Macro pan over stitching".to_string(),
            on_screen_text: "Handcrafted".to_string(),
            voiceover_script: "ہاتھ سے بنایا گیا".to_string(),
            duration_seconds: 9,
            seed: "48291023".to_string(),
            transition_style: "Match Cut".to_string(),
        };
        let block = format_clip_block(&clip);
        assert!(block.starts_with("=== CLIP 1 | 9s | Match Cut ==="));
        assert!(block.contains("Seed: 48291023"));
        assert!(block.contains("Voice-over: ہاتھ سے بنایا گیا"));
    }
}
