use dioxus_logger::tracing;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::server::{error::AppError, service::now_playing::NowPlayingController};

/// Starts the inactive display sweep
///
/// On every run the sweep removes the display of each guild whose playback engine no
/// longer reports an active player, covering a `stop()` the engine never issued.
///
/// # Arguments
/// - `controller`: Display controller to sweep
/// - `schedule`: Cron expression with seconds, e.g. `0 * * * * *` for every minute
pub async fn start_scheduler(
    controller: NowPlayingController,
    schedule: &str,
) -> Result<(), AppError> {
    let scheduler = JobScheduler::new().await?;

    let job = Job::new_async(schedule, move |_uuid, _lock| {
        let controller = controller.clone();

        Box::pin(async move {
            let stopped = controller.sweep_inactive().await;
            if stopped > 0 {
                tracing::info!("Swept {} inactive now-playing displays", stopped);
            }
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!("Now-playing display sweep scheduled ({})", schedule);

    Ok(())
}
