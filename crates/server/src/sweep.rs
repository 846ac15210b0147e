//! Periodic retention sweep.

use std::sync::Arc;
use std::time::Duration;

use postboard_core::Board;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

/// Spawn a task that purges expired posts every `period`.
///
/// The first sweep runs one period after startup; reads already purge
/// lazily, so nothing is lost by waiting.
pub fn spawn(board: Arc<Board>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match board.sweep().await {
                Ok(0) => tracing::debug!("retention sweep found nothing to delete"),
                Ok(deleted) => tracing::info!(deleted, "retention sweep removed old posts"),
                Err(e) => tracing::warn!(error = %e, "retention sweep failed"),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, Utc};
    use postboard_core::{BoardDb, PostType, retention};

    #[tokio::test]
    async fn test_sweep_task_purges_old_posts() {
        let db = BoardDb::open_in_memory().await.unwrap();
        let board = Arc::new(Board::new(Arc::new(db.clone())));

        let stale = retention::start_of_last_week(Utc::now()) - ChronoDuration::days(1);
        db.create_post_at("stale", PostType::Meme, stale).await.unwrap();
        db.create_post("fresh", PostType::Meme).await.unwrap();

        let handle = spawn(Arc::clone(&board), Duration::from_millis(20));
        for _ in 0..100 {
            if db.list_posts().await.unwrap().len() == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        handle.abort();

        let posts = db.list_posts().await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].text, "fresh");
    }
}
