//! Timeout helper.

use std::future::Future;
use std::time::Duration;

use crate::error::PodcastError;

/// Wrap a future with a timeout.
pub async fn with_timeout<T>(
    duration: Duration,
    future: impl Future<Output = Result<T, PodcastError>>,
) -> Result<T, PodcastError> {
    match tokio::time::timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(PodcastError::Timeout(duration.as_millis() as u64)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn elapsed_future_maps_to_timeout_error() {
        let result: Result<(), PodcastError> = with_timeout(Duration::from_millis(50), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;

        assert!(matches!(result, Err(PodcastError::Timeout(50))));
    }

    #[tokio::test]
    async fn completed_future_passes_result_through() {
        let result = with_timeout(Duration::from_secs(1), async { Ok::<_, PodcastError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }
}
