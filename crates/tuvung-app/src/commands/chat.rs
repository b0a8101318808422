use tuvung_core::Tutor;

use crate::state::AppState;

pub async fn handle_chat(state: &AppState, message: &str) -> anyhow::Result<()> {
    let tutor = Tutor::from_config(&state.config, state.store.clone())?;

    let reply = tutor.reply(message).await?;
    println!("{reply}");

    Ok(())
}
