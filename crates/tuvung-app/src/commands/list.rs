use crate::state::AppState;

pub async fn handle_list(state: &AppState) -> anyhow::Result<()> {
    let records = state.store.load().await?;

    if records.is_empty() {
        tracing::warn!("No vocabulary saved in {}", state.store.path().display());
        return Ok(());
    }

    for record in &records {
        println!("{record}");
    }
    tracing::info!("{} entries", records.len());

    Ok(())
}
