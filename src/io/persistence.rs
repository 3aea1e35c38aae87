use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::engine::store::EncounterState;
use crate::io::dialogs::{CloseChoice, FileDialogs, FileKind};
use crate::io::error::PersistenceError;
use crate::model::encounter_file::{
    EncounterFile, PlayerEntry, PlayerListFile, ENCOUNTER_FILE_VERSION,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResult {
    pub success: bool,
    pub file_path: Option<PathBuf>,
    pub file_name: Option<String>,
    pub error: Option<String>,
    pub canceled: bool,
}

impl SaveResult {
    fn canceled() -> Self {
        Self { canceled: true, ..Default::default() }
    }

    fn failed(err: PersistenceError) -> Self {
        tracing::error!(error = %err, "Save failed");
        Self { error: Some(err.to_string()), ..Default::default() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadResult {
    pub success: bool,
    /// Snapshot of what is now in the store.
    pub data: Option<EncounterFile>,
    pub file_path: Option<PathBuf>,
    pub file_name: Option<String>,
    pub error: Option<String>,
    pub canceled: bool,
}

impl LoadResult {
    fn canceled() -> Self {
        Self { canceled: true, ..Default::default() }
    }

    fn failed(err: PersistenceError) -> Self {
        tracing::error!(error = %err, "Load failed");
        Self { error: Some(err.to_string()), ..Default::default() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseDecision {
    Close,
    Stay,
}

/* =========================
   File primitives
   ========================= */

/// Append the kind's extension unless the path already carries it.
pub fn with_extension(path: PathBuf, kind: FileKind) -> PathBuf {
    let has_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(kind.extension()));
    if has_extension {
        path
    } else {
        let mut raw = path.into_os_string();
        raw.push(".");
        raw.push(kind.extension());
        PathBuf::from(raw)
    }
}

pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), PersistenceError> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).map_err(|source| PersistenceError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn read_to_string(path: &Path) -> Result<String, PersistenceError> {
    fs::read_to_string(path).map_err(|source| PersistenceError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn check_version(path: &Path, found: u32) -> Result<(), PersistenceError> {
    if found > ENCOUNTER_FILE_VERSION {
        return Err(PersistenceError::UnsupportedVersion {
            path: path.to_path_buf(),
            found,
            supported: ENCOUNTER_FILE_VERSION,
        });
    }
    Ok(())
}

pub fn write_encounter(path: &Path, file: &EncounterFile) -> Result<(), PersistenceError> {
    write_json(path, file)
}

pub fn read_encounter(path: &Path) -> Result<EncounterFile, PersistenceError> {
    let json = read_to_string(path)?;
    let file: EncounterFile = serde_json::from_str(&json).map_err(|source| PersistenceError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    check_version(path, file.version)?;
    Ok(file)
}

pub fn write_players(path: &Path, file: &PlayerListFile) -> Result<(), PersistenceError> {
    write_json(path, file)
}

pub fn read_players(path: &Path) -> Result<PlayerListFile, PersistenceError> {
    let json = read_to_string(path)?;
    let file: PlayerListFile = serde_json::from_str(&json).map_err(|source| PersistenceError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    check_version(path, file.version)?;
    Ok(file)
}

/* =========================
   Dialog-driven flows
   ========================= */

/// Ask for a destination and write the whole encounter there. On success the
/// encounter takes the file's name and the dirty flag clears. A canceled
/// dialog or a failed write leaves the state exactly as it was.
pub fn save_encounter_to_file(state: &mut EncounterState, dialogs: &dyn FileDialogs) -> SaveResult {
    let suggested = match state.settings.name.trim() {
        "" => "encounter",
        name => name,
    };
    let Some(path) = dialogs.pick_save_path(FileKind::Encounter, suggested) else {
        tracing::info!("Save canceled");
        return SaveResult::canceled();
    };
    let path = with_extension(path, FileKind::Encounter);
    let file_name = file_stem(&path);

    let mut file = state.to_file();
    file.settings.name = file_name.clone();
    if let Err(err) = write_encounter(&path, &file) {
        return SaveResult::failed(err);
    }

    state.settings.name = file_name.clone();
    state.mark_saved();
    tracing::info!(path = %path.display(), "Encounter saved");

    SaveResult {
        success: true,
        file_path: Some(path),
        file_name: Some(file_name),
        ..Default::default()
    }
}

/// Ask for a file and replace the whole store with it. The store is only
/// touched once the file has been read and parsed.
pub fn load_encounter_from_file(state: &mut EncounterState, dialogs: &dyn FileDialogs) -> LoadResult {
    let Some(path) = dialogs.pick_open_path(FileKind::Encounter) else {
        tracing::info!("Load canceled");
        return LoadResult::canceled();
    };

    let file = match read_encounter(&path) {
        Ok(file) => file,
        Err(err) => return LoadResult::failed(err),
    };
    let file_name = file_stem(&path);

    let mut loaded = EncounterState::from_file(file);
    if loaded.settings.name.trim().is_empty() {
        loaded.settings.name = file_name.clone();
    }
    *state = loaded;
    tracing::info!(
        path = %path.display(),
        players = state.player_characters.len(),
        individuals = state.individuals.len(),
        mobs = state.mobs.len(),
        "Encounter loaded"
    );

    LoadResult {
        success: true,
        data: Some(state.to_file()),
        file_path: Some(path),
        file_name: Some(file_name),
        ..Default::default()
    }
}

/// Export the party roster. Does not affect the encounter's dirty flag.
pub fn save_players_to_file(state: &EncounterState, dialogs: &dyn FileDialogs) -> SaveResult {
    let Some(path) = dialogs.pick_save_path(FileKind::Players, "players") else {
        return SaveResult::canceled();
    };
    let path = with_extension(path, FileKind::Players);

    let file = PlayerListFile {
        version: ENCOUNTER_FILE_VERSION,
        players: state
            .player_characters
            .iter()
            .map(|pc| PlayerEntry {
                name: pc.name.clone(),
                notes: pc.notes.clone(),
            })
            .collect(),
    };
    if let Err(err) = write_players(&path, &file) {
        return SaveResult::failed(err);
    }
    tracing::info!(path = %path.display(), players = file.players.len(), "Player list saved");

    SaveResult {
        success: true,
        file_name: Some(file_stem(&path)),
        file_path: Some(path),
        ..Default::default()
    }
}

/// Replace the party roster from a `.players` file.
pub fn load_players_from_file(state: &mut EncounterState, dialogs: &dyn FileDialogs) -> LoadResult {
    let Some(path) = dialogs.pick_open_path(FileKind::Players) else {
        return LoadResult::canceled();
    };
    let file = match read_players(&path) {
        Ok(file) => file,
        Err(err) => return LoadResult::failed(err),
    };

    let ids = state.replace_player_characters(file.players);
    tracing::info!(path = %path.display(), players = ids.len(), "Player list loaded");

    LoadResult {
        success: true,
        data: Some(state.to_file()),
        file_name: Some(file_stem(&path)),
        file_path: Some(path),
        ..Default::default()
    }
}

/// Unsaved-changes gate before discarding the encounter.
pub fn request_close(state: &mut EncounterState, dialogs: &dyn FileDialogs) -> CloseDecision {
    if !state.has_unsaved_changes() {
        return CloseDecision::Close;
    }

    let decision = match dialogs.confirm_unsaved_close() {
        CloseChoice::Save => {
            if save_encounter_to_file(state, dialogs).success {
                CloseDecision::Close
            } else {
                CloseDecision::Stay
            }
        }
        CloseChoice::DontSave => CloseDecision::Close,
        CloseChoice::Cancel => CloseDecision::Stay,
    };
    tracing::info!(?decision, "Close requested with unsaved changes");
    decision
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_added_once() {
        let p = with_extension(PathBuf::from("/tmp/ambush"), FileKind::Encounter);
        assert_eq!(p, PathBuf::from("/tmp/ambush.encounter"));
        let p = with_extension(p, FileKind::Encounter);
        assert_eq!(p, PathBuf::from("/tmp/ambush.encounter"));
        let p = with_extension(PathBuf::from("/tmp/v1.2"), FileKind::Players);
        assert_eq!(p, PathBuf::from("/tmp/v1.2.players"));
        let p = with_extension(PathBuf::from("/tmp/Ambush.ENCOUNTER"), FileKind::Encounter);
        assert_eq!(p, PathBuf::from("/tmp/Ambush.ENCOUNTER"));
    }

    #[test]
    fn stem_drops_directory_and_extension() {
        assert_eq!(file_stem(Path::new("/x/y/Hive Ambush.encounter")), "Hive Ambush");
    }

    #[test]
    fn newer_files_are_refused() {
        let dir = std::env::temp_dir().join("encounter_tracker_test_version");
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("future.encounter");
        fs::write(&path, r#"{"version": 99, "settings": {"tier": 1, "playerCount": 0, "name": ""}}"#)
            .unwrap();

        let err = read_encounter(&path).unwrap_err();
        assert!(matches!(err, PersistenceError::UnsupportedVersion { found: 99, .. }));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let dir = std::env::temp_dir().join("encounter_tracker_test_sparse");
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("sparse.encounter");
        fs::write(&path, r#"{"settings": {"tier": 2, "playerCount": 4, "name": "Sparse"}}"#).unwrap();

        let file = read_encounter(&path).unwrap();
        assert_eq!(file.settings.tier, 2);
        assert!(file.individuals.is_empty());
        assert!(file.mobs.is_empty());

        let _ = fs::remove_dir_all(&dir);
    }
}
