//! Command execution helpers
//!
//! Every command goes through [`execute_command`] so timing and outcome
//! logging look the same across the monitoring and library surfaces.

use std::future::Future;
use std::time::Instant;

use trackvault_domain::Result;

use crate::utils::logging::{error_label, log_command_execution};

/// Execute a command with timing and structured outcome logging
///
/// # Example
///
/// ```rust,ignore
/// pub async fn fetch_library(ctx: &AppContext) -> Result<Vec<Track>> {
///     execute_command("library::fetch_library", || ctx.library.fetch_library()).await
/// }
/// ```
pub async fn execute_command<F, Fut, T>(command_name: &str, command_fn: F) -> Result<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let start = Instant::now();

    let result = command_fn().await;

    let error_type = result.as_ref().err().map(error_label);
    log_command_execution(command_name, start.elapsed(), result.is_ok(), error_type);

    result
}

#[cfg(test)]
mod tests {
    use trackvault_domain::TrackVaultError;

    use super::*;

    #[tokio::test]
    async fn passes_results_through_untouched() {
        let ok = execute_command("test::ok", || async { Ok(7) }).await;
        assert_eq!(ok, Ok(7));

        let err: Result<()> =
            execute_command("test::err", || async { Err(TrackVaultError::Timeout("slow".into())) })
                .await;
        assert_eq!(err, Err(TrackVaultError::Timeout("slow".into())));
    }
}
