mod config;
mod error;
mod gateway;
mod image;
mod llm;
mod script;
mod state;
mod ui;
mod wizard;

use anyhow::Result;
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let config = match Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return Err(e);
        }
    };

    config.ensure_directories()?;

    let llm = llm::create_llm(&config)?;
    let gateway = gateway::ScriptingGateway::new(llm, config.generation.clone());
    let wizard = wizard::WizardController::new(gateway, config.generation.clone());

    ui::run(wizard, &config).await
}
