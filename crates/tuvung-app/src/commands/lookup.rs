use crate::cli::LookupArgs;
use crate::state::AppState;

pub async fn handle_lookup(state: &AppState, args: &LookupArgs) -> anyhow::Result<()> {
    let query = args.query();

    let result = if args.save && state.config.store.enabled {
        state
            .pipeline
            .resolve_and_save(&query, state.store.as_ref())
            .await
    } else {
        if args.save {
            tracing::warn!("Vocabulary store disabled, not saving");
        }
        state.pipeline.resolve(&query).await
    };

    match result.method_used() {
        Some(method) if result.success() => tracing::info!("Answered by {}", method.as_str()),
        _ => {
            if let Some(kind) = result.error_kind() {
                tracing::error!("Lookup failed: {kind}");
            }
        }
    }

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
