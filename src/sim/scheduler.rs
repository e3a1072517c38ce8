use crate::sim::construction::ConstructionSite;
use crate::sim::roster::Roster;
use crate::sim::{CharacterId, SiteId};

/// Greedy pass: sites in creation order, characters in roster order, every
/// idle character bound to the first site that still has room. Nothing is
/// ever reassigned.
pub fn assign_idle(sites: &mut [ConstructionSite], roster: &mut Roster) -> Vec<(SiteId, CharacterId)> {
    let mut bound = Vec::new();

    for site in sites.iter_mut() {
        if site.is_full() {
            continue;
        }

        let idle: Vec<CharacterId> = roster
            .iter()
            .filter(|c| c.is_idle())
            .map(|c| c.id())
            .take(site.max_workers() - site.workers().len())
            .collect();

        for id in idle {
            if let Some(character) = roster.get_mut(id) {
                character.assign(site.id());
                site.bind(id);
                bound.push((site.id(), id));
                tracing::debug!("Assigned {} to site {}", id, site.id());
            }
        }
    }

    bound
}
