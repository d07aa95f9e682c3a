//! Save persistence.
//!
//! A [`SaveState`] bundles the character record, the room, and the time of
//! the last checkpoint. Stores read and write it through the
//! [`CharacterStore`] trait. [`JsonFileStore`] keeps one JSON file on disk,
//! replaced atomically on every write; [`MemoryStore`] keeps it in memory
//! for tests and embedding.
//!
//! Loaded data is never trusted: [`sanitize`] repairs out-of-range values
//! before the simulation sees them.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use digivice_types::{CharacterRecord, EVOLUTION_GAUGE_FULL, LifeStage, MAX_STAMINA};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::environment::WorldObjects;
use crate::error::StoreError;

/// Current save format version.
pub const SAVE_FORMAT_VERSION: u32 = 1;

/// Highest gauge a loaded save may carry; a full gauge would mean an
/// evolution that never ran.
const MAX_LOADED_GAUGE: f64 = EVOLUTION_GAUGE_FULL - 0.001;

/// Everything persisted between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveState {
    /// Format version of this save.
    #[serde(default = "default_version")]
    pub version: u32,
    /// Time the record was last brought up to date (epoch ms).
    pub checkpoint_ms: u64,
    /// The character.
    pub record: CharacterRecord,
    /// Objects in the room.
    #[serde(default)]
    pub world: WorldObjects,
}

impl SaveState {
    /// A save holding a freshly laid egg.
    pub fn fresh(species: impl Into<String>, now: u64) -> Self {
        Self {
            version: SAVE_FORMAT_VERSION,
            checkpoint_ms: now,
            record: CharacterRecord::new_egg(species, now),
            world: WorldObjects::new(),
        }
    }
}

const fn default_version() -> u32 {
    SAVE_FORMAT_VERSION
}

/// Repair a loaded save in place. Returns the number of fields repaired.
///
/// - stamina above the maximum is clamped
/// - a non-finite or negative gauge resets to zero, a full one is clamped
/// - dead characters hold zero stamina and no countdown
/// - a countdown with positive stamina is cleared
/// - zero stamina with no countdown starts one at `now`
/// - a creation time or countdown start after `now` is pulled back to `now`
/// - non-finite jitter resets to zero
pub fn sanitize(save: &mut SaveState, now: u64) -> u32 {
    let mut repairs: u32 = 0;
    let mut repair = || repairs = repairs.saturating_add(1);
    let snap = &mut save.record.snapshot;

    if snap.stamina > MAX_STAMINA {
        snap.stamina = MAX_STAMINA;
        repair();
    }

    if !snap.evolution_gauge.is_finite() || snap.evolution_gauge < 0.0 {
        snap.evolution_gauge = 0.0;
        repair();
    } else if snap.evolution_gauge >= EVOLUTION_GAUGE_FULL {
        snap.evolution_gauge = MAX_LOADED_GAUGE;
        repair();
    }

    if snap.is_dead() {
        if snap.stamina != 0 || snap.time_of_zero_stamina.is_some() {
            snap.stamina = 0;
            snap.time_of_zero_stamina = None;
            repair();
        }
    } else if snap.stamina > 0 && snap.time_of_zero_stamina.is_some() {
        snap.time_of_zero_stamina = None;
        repair();
    } else if snap.stamina == 0
        && snap.time_of_zero_stamina.is_none()
        && snap.life_stage != LifeStage::Egg
    {
        snap.time_of_zero_stamina = Some(now);
        repair();
    }

    if snap.created_at > now {
        snap.created_at = now;
        repair();
    }
    if snap.time_of_zero_stamina.is_some_and(|zero_since| zero_since > now) {
        snap.time_of_zero_stamina = Some(now);
        repair();
    }

    let scheduler = &mut save.record.scheduler;
    for jitter in [
        &mut scheduler.stamina_jitter,
        &mut scheduler.sickness_jitter,
        &mut scheduler.evolution_jitter,
    ] {
        if !jitter.is_finite() || jitter.abs() >= 1.0 {
            *jitter = 0.0;
            repair();
        }
    }

    repairs
}

/// Persistence for a single character save.
pub trait CharacterStore {
    /// Read the save. `Ok(None)` means no save exists yet.
    fn load(&mut self) -> Result<Option<SaveState>, StoreError>;

    /// Write the save, replacing any previous one.
    fn persist(&mut self, save: &SaveState) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// JSON file store
// ---------------------------------------------------------------------------

/// On-disk envelope. `saved_at` is informational and ignored on load.
#[derive(Serialize)]
struct SaveFile<'a> {
    saved_at: DateTime<Utc>,
    #[serde(flatten)]
    state: &'a SaveState,
}

/// A store backed by one JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// A store reading and writing `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The save file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl CharacterStore for JsonFileStore {
    fn load(&mut self) -> Result<Option<SaveState>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let save: SaveState = serde_json::from_str(&contents)?;
        Ok(Some(save))
    }

    fn persist(&mut self, save: &SaveState) -> Result<(), StoreError> {
        let file = SaveFile {
            saved_at: Utc::now(),
            state: save,
        };
        let json = serde_json::to_vec_pretty(&file)?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        // Write to a sibling temp file, then rename over the save so a crash
        // mid-write never leaves a truncated file behind.
        let temp = self.temp_path();
        {
            let mut out = fs::File::create(&temp)?;
            out.write_all(&json)?;
            out.sync_all()?;
        }
        fs::rename(&temp, &self.path)?;

        debug!(
            path = %self.path.display(),
            checkpoint_ms = save.checkpoint_ms,
            bytes = json.len(),
            "Save persisted"
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// A store that keeps the save in memory and counts writes.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    saved: Option<SaveState>,
    persist_count: usize,
}

impl MemoryStore {
    /// An empty store.
    pub const fn new() -> Self {
        Self {
            saved: None,
            persist_count: 0,
        }
    }

    /// A store already holding `save`.
    pub const fn with_save(save: SaveState) -> Self {
        Self {
            saved: Some(save),
            persist_count: 0,
        }
    }

    /// The last persisted save.
    pub const fn saved(&self) -> Option<&SaveState> {
        self.saved.as_ref()
    }

    /// Number of successful persists.
    pub const fn persist_count(&self) -> usize {
        self.persist_count
    }
}

impl CharacterStore for MemoryStore {
    fn load(&mut self) -> Result<Option<SaveState>, StoreError> {
        Ok(self.saved.clone())
    }

    fn persist(&mut self, save: &SaveState) -> Result<(), StoreError> {
        self.saved = Some(save.clone());
        self.persist_count = self.persist_count.saturating_add(1);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use digivice_types::{CharacterState, CheckScheduler};

    fn hatched_save(now: u64) -> SaveState {
        let mut save = SaveState::fresh("mochi", now);
        save.record.snapshot.life_stage = LifeStage::StageA;
        save.record.scheduler = CheckScheduler::starting_at(now);
        save
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("save.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn persisted_save_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("save.json");
        let mut store = JsonFileStore::new(&path);
        let mut save = hatched_save(1_000);
        save.world.drop_waste(1_200);

        store.persist(&save).unwrap();
        assert!(path.exists());
        assert!(!store.temp_path().exists());

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, save);
    }

    #[test]
    fn save_file_carries_saved_at() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.json");
        let mut store = JsonFileStore::new(&path);
        store.persist(&hatched_save(0)).unwrap();
        let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(raw.get("saved_at").is_some());
        assert_eq!(raw.get("version").and_then(serde_json::Value::as_u64), Some(1));
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.json");
        fs::write(&path, "{ not json").unwrap();
        let mut store = JsonFileStore::new(&path);
        assert!(matches!(store.load(), Err(StoreError::Corrupt { .. })));
    }

    #[test]
    fn memory_store_counts_persists() {
        let mut store = MemoryStore::new();
        assert!(store.load().unwrap().is_none());
        store.persist(&hatched_save(0)).unwrap();
        store.persist(&hatched_save(5)).unwrap();
        assert_eq!(store.persist_count(), 2);
        assert_eq!(store.saved().unwrap().checkpoint_ms, 5);
    }

    #[test]
    fn sanitize_leaves_valid_save_alone() {
        let mut save = hatched_save(0);
        let before = save.clone();
        assert_eq!(sanitize(&mut save, 10), 0);
        assert_eq!(save, before);
    }

    #[test]
    fn sanitize_clamps_out_of_range_values() {
        let mut save = hatched_save(0);
        save.record.snapshot.stamina = 250;
        save.record.snapshot.evolution_gauge = 140.0;
        save.record.scheduler.stamina_jitter = f64::NAN;
        assert_eq!(sanitize(&mut save, 10), 3);
        assert_eq!(save.record.snapshot.stamina, MAX_STAMINA);
        assert!(save.record.snapshot.evolution_gauge < EVOLUTION_GAUGE_FULL);
        assert!(save.record.scheduler.stamina_jitter.abs() < f64::EPSILON);
    }

    #[test]
    fn sanitize_resets_negative_gauge() {
        let mut save = hatched_save(0);
        save.record.snapshot.evolution_gauge = -3.0;
        sanitize(&mut save, 0);
        assert!(save.record.snapshot.evolution_gauge.abs() < f64::EPSILON);
    }

    #[test]
    fn sanitize_repairs_countdown_consistency() {
        let mut fed = hatched_save(0);
        fed.record.snapshot.time_of_zero_stamina = Some(5);
        sanitize(&mut fed, 10);
        assert_eq!(fed.record.snapshot.time_of_zero_stamina, None);

        let mut starving = hatched_save(0);
        starving.record.snapshot.stamina = 0;
        sanitize(&mut starving, 10);
        assert_eq!(starving.record.snapshot.time_of_zero_stamina, Some(10));

        let mut dead = hatched_save(0);
        dead.record.snapshot.state = CharacterState::Dead;
        dead.record.snapshot.stamina = 4;
        sanitize(&mut dead, 10);
        assert_eq!(dead.record.snapshot.stamina, 0);
        assert_eq!(dead.record.snapshot.time_of_zero_stamina, None);
    }

    #[test]
    fn sanitize_pulls_future_timestamps_back_to_now() {
        let mut egg = SaveState::fresh("speckled_egg", 5_000);
        assert_eq!(sanitize(&mut egg, 1_000), 1);
        assert_eq!(egg.record.snapshot.created_at, 1_000);

        let mut starving = hatched_save(0);
        starving.record.snapshot.stamina = 0;
        starving.record.snapshot.time_of_zero_stamina = Some(9_000);
        assert_eq!(sanitize(&mut starving, 1_000), 1);
        assert_eq!(starving.record.snapshot.time_of_zero_stamina, Some(1_000));
    }
}
