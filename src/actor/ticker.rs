use tokio::sync::broadcast;
use tokio::time::{Duration, MissedTickBehavior};

use crate::actor::dispatcher::EngineHandle;
use crate::actor::model::Signal;

/// Issues one engine tick per `period` until a stop signal arrives or the
/// engine actor goes away.
pub async fn spawn_ticker(mut signals: broadcast::Receiver<Signal>, engine: EngineHandle, period: Duration) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tracing::info!("Ticker started, one tick every {:?}", period);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                match engine.tick().await {
                    Ok(Some(report)) => {
                        for building in &report.completed {
                            tracing::info!("{} finished on {}", building.name, report.time);
                        }
                        if report.time.minute == 0 {
                            tracing::debug!("Calendar reached {}", report.time);
                        }
                    }
                    Ok(None) => tracing::trace!("Engine paused, tick skipped"),
                    Err(e) => {
                        tracing::warn!("Ticker cannot reach engine: {}", e);
                        break;
                    }
                }
            }
            signal = signals.recv() => {
                match signal {
                    Ok(Signal::Stop) => tracing::info!("Ticker received stop signal, exiting..."),
                    Err(e) => tracing::warn!("Ticker signal receive error: {:?}", e),
                }
                break;
            }
        }
    }

    tracing::info!("Ticker finished.");
}
