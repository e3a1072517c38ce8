use crate::sim::{CharacterId, SiteId};

/// Rejected command. Every variant leaves the simulation untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimError {
    #[error("insufficient {resource}: need {required}, have {available}")]
    InsufficientResources {
        resource: String,
        required: u64,
        available: u64,
    },
    #[error("site {0} already has its maximum number of workers")]
    SiteFull(SiteId),
    #[error("character {0} is not idle")]
    CharacterUnavailable(CharacterId),
    #[error("character {character} is not assigned to site {site}")]
    NotAssigned { site: SiteId, character: CharacterId },
    #[error("unknown building template: {0}")]
    UnknownTemplate(String),
    #[error("unknown construction site: {0}")]
    UnknownSite(SiteId),
    #[error("unknown character: {0}")]
    UnknownCharacter(CharacterId),
}
