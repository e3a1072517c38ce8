use tokio::sync::oneshot;

use crate::blueprint::model::BuildingTemplate;
use crate::sim::snapshot::Snapshot;
use crate::sim::{CharacterId, EngineState, SimError, SiteId, TickReport};

pub type Reply<T> = oneshot::Sender<T>;

/// Messages accepted by the engine actor. Each carries the channel its
/// answer is sent back on.
#[derive(Debug)]
pub enum Command {
    Tick(Reply<Option<TickReport>>),
    Pause(Reply<EngineState>),
    Resume(Reply<EngineState>),
    StartBuild {
        template: String,
        respond_to: Reply<Result<SiteId, SimError>>,
    },
    Assign {
        site: SiteId,
        character: CharacterId,
        respond_to: Reply<Result<(), SimError>>,
    },
    Unassign {
        site: SiteId,
        character: CharacterId,
        respond_to: Reply<Result<(), SimError>>,
    },
    Snapshot(Reply<Snapshot>),
    Catalog(Reply<Vec<BuildingTemplate>>),
    Stop,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    Stop,
}
