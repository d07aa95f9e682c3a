//! Status listener that reports changes through `tracing`.

use digivice_sim::live::StatusListener;
use digivice_types::{CharacterSnapshot, StatusChange, StatusDelta};
use tracing::{debug, info};

/// Logs every status change and counts them.
#[derive(Debug, Default)]
pub struct TracingListener {
    changes_seen: u64,
}

impl TracingListener {
    /// Number of changes reported so far.
    pub const fn changes_seen(&self) -> u64 {
        self.changes_seen
    }
}

impl StatusListener for TracingListener {
    fn on_status_changed(&mut self, change: &StatusChange, snapshot: &CharacterSnapshot) {
        self.changes_seen = self.changes_seen.saturating_add(1);
        match &change.delta {
            // Gauge ticks are frequent; keep them out of the default output.
            StatusDelta::EvolutionGaugeChanged { gauge } => {
                debug!(character_id = %snapshot.id, at = change.at, gauge, "Evolution gauge moved");
            }
            delta => {
                info!(
                    character_id = %snapshot.id,
                    at = change.at,
                    species = %snapshot.species,
                    stage = ?snapshot.life_stage,
                    stamina = snapshot.stamina,
                    sick = snapshot.sickness,
                    ?delta,
                    "Status changed"
                );
            }
        }
    }
}
