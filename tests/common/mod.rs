#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use encounter_tracker::io::dialogs::{CloseChoice, FileDialogs, FileKind};
use encounter_tracker::model::threat::{BonusBracket, BonusTable, ThreatCatalog, ThreatDefinition};

/// Dialogs that answer from a fixed script instead of asking anyone.
#[derive(Debug, Clone)]
pub struct ScriptedDialogs {
    pub save_path: Option<PathBuf>,
    pub open_path: Option<PathBuf>,
    pub close_choice: CloseChoice,
    /// Every start directory the dialogs were pointed at, shared with clones.
    pub start_dirs: Arc<Mutex<Vec<PathBuf>>>,
}

impl ScriptedDialogs {
    pub fn canceling() -> Self {
        Self {
            save_path: None,
            open_path: None,
            close_choice: CloseChoice::Cancel,
            start_dirs: Arc::default(),
        }
    }

    pub fn with_paths(save: PathBuf, open: PathBuf) -> Self {
        Self {
            save_path: Some(save),
            open_path: Some(open),
            close_choice: CloseChoice::Save,
            start_dirs: Arc::default(),
        }
    }
}

impl FileDialogs for ScriptedDialogs {
    fn pick_save_path(&self, _kind: FileKind, _suggested_name: &str) -> Option<PathBuf> {
        self.save_path.clone()
    }

    fn pick_open_path(&self, _kind: FileKind) -> Option<PathBuf> {
        self.open_path.clone()
    }

    fn confirm_unsaved_close(&self) -> CloseChoice {
        self.close_choice
    }

    fn set_start_dir(&mut self, dir: &Path) {
        self.start_dirs.lock().unwrap().push(dir.to_path_buf());
    }
}

/// Fresh, empty scratch directory under the system temp dir.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("encounter_tracker_it_{name}"));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

pub fn mob_table() -> BonusTable {
    BonusTable::new(
        vec![
            BonusBracket { min_living: 2, bonus: 1 },
            BonusBracket { min_living: 3, bonus: 2 },
            BonusBracket { min_living: 5, bonus: 3 },
        ],
        3,
    )
}

pub fn catalog() -> ThreatCatalog {
    ThreatCatalog::new([
        ThreatDefinition {
            id: "veteran".into(),
            name: "Veteran Guardsman".into(),
            max_wounds: 10,
            max_shock: 5,
            resilience: Some(9),
            mob_bonus: Some(mob_table()),
        },
        ThreatDefinition {
            id: "gaunt".into(),
            name: "Termagant".into(),
            max_wounds: 1,
            max_shock: 1,
            resilience: Some(6),
            mob_bonus: None,
        },
    ])
}
