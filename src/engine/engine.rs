use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;

use crate::engine::apply_command::apply_command;
use crate::engine::protocol::{EncounterView, EngineCommand, EngineResponse};
use crate::engine::store::EncounterState;
use crate::io::config::{save_config_to, AppConfig};
use crate::io::dialogs::FileDialogs;
use crate::io::persistence::{
    load_encounter_from_file, load_players_from_file, request_close, save_encounter_to_file,
    save_players_to_file, CloseDecision,
};
use crate::model::command_outcome::CommandOutcome;
use crate::model::threat::Catalog;

/// Owns the encounter and its collaborators. Commands are handled one at a
/// time, each to completion, whether called directly or through `run`.
pub struct Engine {
    state: EncounterState,
    catalog: Box<dyn Catalog + Send>,
    dialogs: Box<dyn FileDialogs + Send>,
    config: AppConfig,
    /// Where `config` is written back when it changes. `None` keeps it in memory.
    config_path: Option<PathBuf>,
}

impl Engine {
    pub fn new(
        catalog: Box<dyn Catalog + Send>,
        mut dialogs: Box<dyn FileDialogs + Send>,
        config: AppConfig,
    ) -> Self {
        if let Some(dir) = &config.last_directory {
            dialogs.set_start_dir(dir);
        }
        Self {
            state: EncounterState::new(),
            catalog,
            dialogs,
            config,
            config_path: None,
        }
    }

    /// Persist config changes (the last used directory) to `path`.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn state(&self) -> &EncounterState {
        &self.state
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.state.has_unsaved_changes()
    }

    pub fn view(&self) -> EncounterView {
        EncounterView {
            settings: self.state.settings().clone(),
            items: self
                .state
                .encounter_list_items(&*self.catalog, &self.config.default_mob_bonus),
            unsaved_changes: self.state.has_unsaved_changes(),
        }
    }

    pub fn handle(&mut self, command: EngineCommand) -> EngineResponse {
        match command {
            EngineCommand::Edit(edit) => {
                tracing::trace!(?edit, "Applying command");
                let outcome = apply_command(&mut self.state, &*self.catalog, edit);
                EngineResponse::Updated {
                    outcome,
                    view: self.view(),
                }
            }

            EngineCommand::SaveEncounter => {
                let result = save_encounter_to_file(&mut self.state, &*self.dialogs);
                self.remember_location(result.file_path.as_deref());
                EngineResponse::Saved {
                    result,
                    view: self.view(),
                }
            }

            EngineCommand::LoadEncounter => {
                let result = load_encounter_from_file(&mut self.state, &*self.dialogs);
                self.remember_location(result.file_path.as_deref());
                EngineResponse::Loaded {
                    result,
                    view: self.view(),
                }
            }

            EngineCommand::SavePlayers => {
                let result = save_players_to_file(&self.state, &*self.dialogs);
                self.remember_location(result.file_path.as_deref());
                EngineResponse::Saved {
                    result,
                    view: self.view(),
                }
            }

            EngineCommand::LoadPlayers => {
                let result = load_players_from_file(&mut self.state, &*self.dialogs);
                self.remember_location(result.file_path.as_deref());
                EngineResponse::Loaded {
                    result,
                    view: self.view(),
                }
            }

            EngineCommand::RequestClose => EngineResponse::Close(self.request_close()),

            EngineCommand::Refresh => EngineResponse::Updated {
                outcome: CommandOutcome::Applied,
                view: self.view(),
            },
        }
    }

    pub fn request_close(&mut self) -> CloseDecision {
        request_close(&mut self.state, &*self.dialogs)
    }

    /// Point the next dialog at the directory of a file just used, and save
    /// the config when that directory is new.
    fn remember_location(&mut self, file: Option<&Path>) {
        let Some(file) = file else {
            return;
        };
        if !self.config.remember_directory(file) {
            return;
        }
        if let Some(dir) = &self.config.last_directory {
            self.dialogs.set_start_dir(dir);
        }
        if let Some(path) = &self.config_path {
            if let Err(err) = save_config_to(path, &self.config) {
                tracing::warn!(error = %err, "Failed to save config");
            }
        }
    }

    /// Serve commands until the sender hangs up, the receiving side is gone,
    /// or a close request is granted.
    pub fn run(&mut self, rx: Receiver<EngineCommand>, tx: Sender<EngineResponse>) {
        while let Ok(command) = rx.recv() {
            let response = self.handle(command);
            let closing = matches!(response, EngineResponse::Close(CloseDecision::Close));
            if tx.send(response).is_err() || closing {
                break;
            }
        }
        tracing::debug!("Engine loop stopped");
    }

    /// Move the engine onto its own thread. The join handle gives the engine
    /// back once the loop ends.
    pub fn spawn(mut self) -> (Sender<EngineCommand>, Receiver<EngineResponse>, JoinHandle<Engine>) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();

        let handle = std::thread::spawn(move || {
            self.run(cmd_rx, resp_tx);
            self
        });

        (cmd_tx, resp_rx, handle)
    }
}
