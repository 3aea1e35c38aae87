use std::path::{Path, PathBuf};

use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

use crate::model::encounter_file::{ENCOUNTER_EXTENSION, PLAYERS_EXTENSION};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Encounter,
    Players,
}

impl FileKind {
    pub fn extension(self) -> &'static str {
        match self {
            FileKind::Encounter => ENCOUNTER_EXTENSION,
            FileKind::Players => PLAYERS_EXTENSION,
        }
    }

    fn filter_name(self) -> &'static str {
        match self {
            FileKind::Encounter => "Encounter Files",
            FileKind::Players => "Player List Files",
        }
    }

    fn noun(self) -> &'static str {
        match self {
            FileKind::Encounter => "Encounter",
            FileKind::Players => "Player List",
        }
    }
}

/// Answer to the "unsaved changes" prompt shown before closing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseChoice {
    Save,
    DontSave,
    Cancel,
}

/// The user-facing dialog service. `None` from a picker means the user
/// dismissed it.
pub trait FileDialogs {
    fn pick_save_path(&self, kind: FileKind, suggested_name: &str) -> Option<PathBuf>;
    fn pick_open_path(&self, kind: FileKind) -> Option<PathBuf>;
    fn confirm_unsaved_close(&self) -> CloseChoice;

    /// Directory the next picker should open in.
    fn set_start_dir(&mut self, dir: &Path);
}

/// Native dialogs through `rfd`.
#[derive(Debug, Clone, Default)]
pub struct RfdDialogs {
    pub start_dir: Option<PathBuf>,
}

impl RfdDialogs {
    pub fn new(start_dir: Option<PathBuf>) -> Self {
        Self { start_dir }
    }

    fn base(&self, kind: FileKind) -> FileDialog {
        let dialog = FileDialog::new().add_filter(kind.filter_name(), &[kind.extension()]);
        match &self.start_dir {
            Some(dir) => dialog.set_directory(dir),
            None => dialog,
        }
    }
}

impl FileDialogs for RfdDialogs {
    fn pick_save_path(&self, kind: FileKind, suggested_name: &str) -> Option<PathBuf> {
        self.base(kind)
            .set_title(format!("Save {}", kind.noun()))
            .set_file_name(format!("{}.{}", suggested_name, kind.extension()))
            .save_file()
    }

    fn pick_open_path(&self, kind: FileKind) -> Option<PathBuf> {
        self.base(kind)
            .set_title(format!("Load {}", kind.noun()))
            .pick_file()
    }

    fn confirm_unsaved_close(&self) -> CloseChoice {
        let result = MessageDialog::new()
            .set_level(MessageLevel::Warning)
            .set_title("Unsaved Changes")
            .set_description(
                "You have unsaved changes to your encounter.\nDo you want to save before closing?",
            )
            .set_buttons(MessageButtons::YesNoCancelCustom(
                "Save".into(),
                "Don't Save".into(),
                "Cancel".into(),
            ))
            .show();

        match result {
            MessageDialogResult::Yes => CloseChoice::Save,
            MessageDialogResult::No => CloseChoice::DontSave,
            MessageDialogResult::Custom(label) if label == "Save" => CloseChoice::Save,
            MessageDialogResult::Custom(label) if label == "Don't Save" => CloseChoice::DontSave,
            _ => CloseChoice::Cancel,
        }
    }

    fn set_start_dir(&mut self, dir: &Path) {
        self.start_dir = Some(dir.to_path_buf());
    }
}
