use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinSet;

use crate::actor::error::Error;
use crate::actor::model::{Command, Signal};
use crate::actor::ticker::spawn_ticker;
use crate::blueprint::model::BuildingTemplate;
use crate::sim::snapshot::Snapshot;
use crate::sim::{CharacterId, Engine, EngineState, SiteId, TickReport};

const MAILBOX_SIZE: usize = 100;
const SHUTDOWN_TIMEOUT: tokio::time::Duration = tokio::time::Duration::from_secs(5);

/// Cloneable front door to the engine actor. Every call is queued on the
/// actor's mailbox, so commands and ticks never interleave.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    sender: mpsc::Sender<Command>,
}

impl EngineHandle {
    async fn request<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T, Error> {
        let (tx, rx) = oneshot::channel();
        self.sender.send(make(tx)).await?;
        Ok(rx.await?)
    }

    pub async fn tick(&self) -> Result<Option<TickReport>, Error> {
        self.request(Command::Tick).await
    }

    pub async fn pause(&self) -> Result<EngineState, Error> {
        self.request(Command::Pause).await
    }

    pub async fn resume(&self) -> Result<EngineState, Error> {
        self.request(Command::Resume).await
    }

    pub async fn start_build(&self, template: &str) -> Result<SiteId, Error> {
        let template = template.to_string();
        Ok(self
            .request(|respond_to| Command::StartBuild {
                template,
                respond_to,
            })
            .await??)
    }

    pub async fn assign(&self, site: SiteId, character: CharacterId) -> Result<(), Error> {
        Ok(self
            .request(|respond_to| Command::Assign {
                site,
                character,
                respond_to,
            })
            .await??)
    }

    pub async fn unassign(&self, site: SiteId, character: CharacterId) -> Result<(), Error> {
        Ok(self
            .request(|respond_to| Command::Unassign {
                site,
                character,
                respond_to,
            })
            .await??)
    }

    pub async fn snapshot(&self) -> Result<Snapshot, Error> {
        self.request(Command::Snapshot).await
    }

    pub async fn catalog(&self) -> Result<Vec<BuildingTemplate>, Error> {
        self.request(Command::Catalog).await
    }
}

pub struct Dispatcher {
    handle: EngineHandle,
    signal: broadcast::Sender<Signal>,
    handles: JoinSet<()>,
}

impl Dispatcher {
    /// Moves `engine` into its actor task. With a `tick_interval` a ticker
    /// task drives the clock; without one, ticks only happen on request.
    pub fn start(engine: Engine, tick_interval: Option<tokio::time::Duration>) -> Self {
        let (sender, receiver) = mpsc::channel(MAILBOX_SIZE);
        let (signal, _) = broadcast::channel(16);
        let handle = EngineHandle { sender };
        let mut handles = JoinSet::new();

        handles.spawn(run_engine(engine, receiver));

        if let Some(period) = tick_interval {
            handles.spawn(spawn_ticker(signal.subscribe(), handle.clone(), period));
        }

        Self {
            handle,
            signal,
            handles,
        }
    }

    pub fn handle(&self) -> EngineHandle {
        self.handle.clone()
    }

    pub async fn stop(&mut self) {
        tracing::info!("Stopping engine actor...");

        let _ = self.signal.send(Signal::Stop);
        let _ = self.handle.sender.send(Command::Stop).await;

        let deadline = tokio::time::Instant::now() + SHUTDOWN_TIMEOUT;
        loop {
            match tokio::time::timeout_at(deadline, self.handles.join_next()).await {
                Ok(Some(Ok(()))) => tracing::debug!("Task stopped successfully"),
                Ok(Some(Err(e))) => tracing::warn!("Task stopped with error: {:?}", e),
                Ok(None) => break,
                Err(_) => {
                    tracing::warn!("Timeout waiting for tasks to stop. Aborting remaining tasks.");
                    self.handles.abort_all();
                    break;
                }
            }
        }

        tracing::info!("Engine actor stopped.");
    }
}

async fn run_engine(mut engine: Engine, mut receiver: mpsc::Receiver<Command>) {
    tracing::info!("Engine actor started at {}", engine.now());

    while let Some(command) = receiver.recv().await {
        tracing::trace!("Engine received command: {:?}", command);
        match command {
            Command::Tick(respond_to) => {
                let _ = respond_to.send(engine.tick());
            }
            Command::Pause(respond_to) => {
                engine.pause();
                let _ = respond_to.send(engine.state());
            }
            Command::Resume(respond_to) => {
                engine.resume();
                let _ = respond_to.send(engine.state());
            }
            Command::StartBuild {
                template,
                respond_to,
            } => {
                let _ = respond_to.send(engine.start_build(&template));
            }
            Command::Assign {
                site,
                character,
                respond_to,
            } => {
                let _ = respond_to.send(engine.assign_character(site, character));
            }
            Command::Unassign {
                site,
                character,
                respond_to,
            } => {
                let _ = respond_to.send(engine.unassign_character(site, character));
            }
            Command::Snapshot(respond_to) => {
                let _ = respond_to.send(engine.snapshot());
            }
            Command::Catalog(respond_to) => {
                let _ = respond_to.send(engine.catalog().to_vec());
            }
            Command::Stop => {
                tracing::debug!("Engine actor received stop signal");
                break;
            }
        }
    }

    tracing::info!("Engine actor finished at {}", engine.now());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::sim::SimError;
    use crate::sim::roster::Status;

    fn dispatcher() -> Dispatcher {
        let engine = SimConfig::default().build_engine().unwrap();
        Dispatcher::start(engine, None)
    }

    #[tokio::test]
    async fn test_commands_round_trip_through_actor() {
        let mut dispatcher = dispatcher();
        let handle = dispatcher.handle();

        let site = handle.start_build("House").await.unwrap();
        let report = handle.tick().await.unwrap().unwrap();
        assert_eq!(report.assigned.len(), 2);

        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.resource("Wood"), 90);
        assert_eq!(snapshot.sites[0].id, site);
        assert!(snapshot.characters.iter().all(|c| c.status == Status::Assigned));

        dispatcher.stop().await;
    }

    #[tokio::test]
    async fn test_rejections_surface_as_sim_errors() {
        let mut dispatcher = dispatcher();
        let handle = dispatcher.handle();

        let res = handle.start_build("Castle").await;
        assert!(matches!(res, Err(Error::Sim(SimError::UnknownTemplate(_)))));

        let res = handle.unassign(SiteId(7), CharacterId(0)).await;
        assert!(matches!(res, Err(Error::Sim(SimError::UnknownSite(_)))));

        dispatcher.stop().await;
    }

    #[tokio::test]
    async fn test_pause_blocks_ticks() {
        let mut dispatcher = dispatcher();
        let handle = dispatcher.handle();

        assert_eq!(handle.pause().await.unwrap(), EngineState::Paused);
        assert!(handle.tick().await.unwrap().is_none());
        assert_eq!(handle.resume().await.unwrap(), EngineState::Running);
        assert!(handle.tick().await.unwrap().is_some());

        dispatcher.stop().await;
    }

    #[tokio::test]
    async fn test_handle_fails_after_stop() {
        let mut dispatcher = dispatcher();
        let handle = dispatcher.handle();
        dispatcher.stop().await;

        assert!(matches!(handle.snapshot().await, Err(Error::Closed)));
    }
}
