use anyhow::{anyhow, Result};
use bubbletea_pomodoro::{logging, App};
use bubbletea_rs::Program;

#[tokio::main]
async fn main() -> Result<()> {
    if logging::init()? {
        tracing::info!("starting pomodoro");
    }

    Program::<App>::builder()
        .alt_screen(true)
        .signal_handler(true)
        .build()
        .map_err(|err| anyhow!("failed to build program: {}", err))?
        .run()
        .await
        .map_err(|err| anyhow!("program exited with an error: {}", err))?;

    tracing::info!("pomodoro exited");
    Ok(())
}
