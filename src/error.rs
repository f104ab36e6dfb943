use thiserror::Error;

#[derive(Error, Debug)]
pub enum WizardError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("state error: {0}")]
    State(String),
    #[error("generation error: {0}")]
    Generation(String),
}
