use std::time::Duration;

use tracing::{debug, info};

use crate::sessions::SessionStore;

const SWEEP_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Background loop that drops expired sessions so the store does not grow
/// with abandoned logins. Runs until the process exits.
pub async fn run_session_sweeper(sessions: SessionStore) {
    info!(
        interval_secs = SWEEP_INTERVAL.as_secs(),
        "Starting session sweeper"
    );

    let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
    // The first tick completes immediately.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let removed = sessions.purge_expired().await;
        if removed > 0 {
            info!(removed, "Purged expired sessions");
        } else {
            debug!("No expired sessions to purge");
        }
    }
}
