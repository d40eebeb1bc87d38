// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Front-end state machine.
//
// The whole UI is one `UiState` value plus the open editing session. Input is
// turned into `Command`s (see `layout`) and every command goes through
// `App::dispatch`, so there is exactly one place where screens and panels
// change.

use abook_canvas::{Editor, Point};
use abook_core::error::{AbookError, Result};
use abook_core::human_errors::humanize_error;
use abook_core::{Folder, NotebookId, TemplateKind, Tool};
use abook_document::assist::SpellingIssue;
use abook_document::{Conversion, WordLookup};
use tracing::{debug, info, warn};

use crate::services::app_services::AppServices;

/// Side panel shown over the notepad canvas. At most one is open.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum NotepadPanel {
    #[default]
    None,
    Templates,
    Layers,
    Search { definition: Option<WordLookup> },
    Suggestions { issues: Vec<SpellingIssue> },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum UiState {
    #[default]
    Home,
    Notepad { panel: NotepadPanel },
    TextView,
}

/// Everything the user can ask for.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // Home screen
    CreateNotebook { name: String, folder: Folder },
    OpenNotebook(NotebookId),
    DeleteNotebook(NotebookId),

    // Notepad
    GoHome,
    Save,
    SelectTool(Tool),
    IncreaseSize,
    DecreaseSize,
    SetToolSize(u32),
    Undo,
    Scroll(f32),
    /// Pointer pressed on the canvas, in landscape window coordinates.
    BeginStroke(Point),
    ContinueStroke(Point),
    EndStroke,

    ToggleTemplates,
    ApplyTemplate(TemplateKind),

    ToggleLayers,
    AddLayer,
    RemoveLayer(usize),
    SelectLayer(usize),
    ToggleLayerVisibility(usize),
    RenameLayer(usize, String),
    MoveLayerUp(usize),
    MoveLayerDown(usize),
    MergeVisibleLayers,

    ToggleSearch,
    LookUp(String),
    CheckSpelling,
    DismissSuggestion(usize),
    ClosePanel,

    ConvertToText,
    ExportPdf,

    // Text view
    CloseTextView,
}

/// Front-end model: current screen, open notebook, last message.
#[derive(Default)]
pub struct App {
    state: UiState,
    editor: Option<Editor>,
    notebook_id: Option<NotebookId>,
    conversion: Option<Conversion>,
    status: Option<String>,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn editor(&self) -> Option<&Editor> {
        self.editor.as_ref()
    }

    pub fn notebook_id(&self) -> Option<NotebookId> {
        self.notebook_id
    }

    /// Text from the last conversion, shown by the text view.
    pub fn conversion(&self) -> Option<&Conversion> {
        self.conversion.as_ref()
    }

    /// Message for the status bar.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn editor_mut(&mut self) -> Result<&mut Editor> {
        self.editor
            .as_mut()
            .ok_or_else(|| AbookError::InvalidArgument("no notebook is open".into()))
    }

    fn set_panel(&mut self, panel: NotepadPanel) {
        if let UiState::Notepad { panel: current } = &mut self.state {
            *current = panel;
        }
    }

    /// Open `panel`, or close it if it is already showing.
    fn toggle_panel(&mut self, panel: NotepadPanel) {
        if let UiState::Notepad { panel: current } = &mut self.state {
            let same = std::mem::discriminant(current) == std::mem::discriminant(&panel);
            *current = if same { NotepadPanel::None } else { panel };
        }
    }

    /// Run `command`. A failure is reported on the status bar and leaves the
    /// session usable.
    pub fn handle(&mut self, services: &mut AppServices, command: Command) {
        if let Err(e) = self.dispatch(services, command) {
            let human = humanize_error(&e);
            warn!(error = %e, "command failed");
            self.status = Some(format!("{} {}", human.message, human.suggestion));
        }
    }

    pub fn dispatch(&mut self, services: &mut AppServices, command: Command) -> Result<()> {
        debug!(?command, "dispatch");
        match command {
            Command::CreateNotebook { name, folder } => {
                let mut notebook = services.new_notebook(&name, folder);
                let id = services.save_notebook(&mut notebook)?;
                self.open(services, id, notebook);
            }
            Command::OpenNotebook(id) => {
                let notebook = services.load_notebook(id)?.ok_or_else(|| {
                    AbookError::InvalidArgument(format!("notebook {id} does not exist"))
                })?;
                self.open(services, id, notebook);
            }
            Command::DeleteNotebook(id) => {
                if self.notebook_id == Some(id) {
                    self.editor = None;
                    self.notebook_id = None;
                    self.state = UiState::Home;
                }
                let deleted = services.delete_notebook(id)?;
                self.status = Some(if deleted {
                    "Notebook deleted.".into()
                } else {
                    "That notebook was already gone.".into()
                });
            }

            Command::GoHome => {
                self.save(services)?;
                self.editor = None;
                self.notebook_id = None;
                self.state = UiState::Home;
            }
            Command::Save => {
                self.save(services)?;
                self.status = Some("Saved.".into());
            }
            Command::SelectTool(tool) => self.editor_mut()?.select_tool(tool),
            Command::IncreaseSize => {
                self.editor_mut()?.increase_size();
            }
            Command::DecreaseSize => {
                self.editor_mut()?.decrease_size();
            }
            Command::SetToolSize(size) => {
                self.editor_mut()?.set_tool_size(size);
            }
            Command::Undo => {
                if !self.editor_mut()?.undo() {
                    self.status = Some("Nothing to undo.".into());
                }
            }
            Command::Scroll(delta) => self.editor_mut()?.scroll(delta),
            Command::BeginStroke(p) => {
                self.editor_mut()?.pointer_down(p);
            }
            Command::ContinueStroke(p) => {
                self.editor_mut()?.pointer_move(p);
            }
            Command::EndStroke => self.editor_mut()?.pointer_up(),

            Command::ToggleTemplates => self.toggle_panel(NotepadPanel::Templates),
            Command::ApplyTemplate(kind) => {
                self.editor_mut()?.apply_template(kind);
                self.set_panel(NotepadPanel::None);
            }

            Command::ToggleLayers => self.toggle_panel(NotepadPanel::Layers),
            Command::AddLayer => {
                self.editor_mut()?.add_layer();
            }
            Command::RemoveLayer(i) => self.editor_mut()?.remove_layer(i)?,
            Command::SelectLayer(i) => self.editor_mut()?.select_layer(i)?,
            Command::ToggleLayerVisibility(i) => {
                self.editor_mut()?.toggle_visibility(i)?;
            }
            Command::RenameLayer(i, name) => self.editor_mut()?.rename_layer(i, name)?,
            Command::MoveLayerUp(i) => {
                self.editor_mut()?.move_layer_up(i)?;
            }
            Command::MoveLayerDown(i) => {
                self.editor_mut()?.move_layer_down(i)?;
            }
            Command::MergeVisibleLayers => {
                let merged = self.editor_mut()?.merge_visible_layers()?;
                self.status = Some(format!("Merged {merged} layers."));
            }

            Command::ToggleSearch => self.toggle_panel(NotepadPanel::Search { definition: None }),
            Command::LookUp(word) => {
                let definition = services.define(&word);
                self.set_panel(NotepadPanel::Search {
                    definition: Some(definition),
                });
            }
            Command::CheckSpelling => self.check_spelling(services)?,
            Command::DismissSuggestion(index) => {
                let mut emptied = false;
                if let UiState::Notepad {
                    panel: NotepadPanel::Suggestions { issues },
                } = &mut self.state
                {
                    if index < issues.len() {
                        issues.remove(index);
                    }
                    emptied = issues.is_empty();
                }
                if emptied {
                    self.set_panel(NotepadPanel::None);
                }
            }
            Command::ClosePanel => self.set_panel(NotepadPanel::None),

            Command::ConvertToText => {
                let editor = self.editor_mut()?;
                let conversion = services.convert_layer(editor.active_layer())?;
                info!(found = conversion.found_text, "layer converted");
                self.conversion = Some(conversion);
                self.state = UiState::TextView;
            }
            Command::ExportPdf => {
                let editor = self.editor_mut()?;
                let path = services.export_pdf(editor.notebook(), None)?;
                self.status = Some(format!("Exported to {}", path.display()));
            }

            Command::CloseTextView => {
                if self.state == UiState::TextView {
                    self.state = UiState::Notepad {
                        panel: NotepadPanel::None,
                    };
                }
            }
        }
        Ok(())
    }

    fn open(&mut self, services: &AppServices, id: NotebookId, notebook: abook_canvas::Notebook) {
        info!(%id, name = %notebook.name, "notebook opened");
        self.editor = Some(services.open_editor(notebook));
        self.notebook_id = Some(id);
        self.conversion = None;
        self.state = UiState::Notepad {
            panel: NotepadPanel::None,
        };
    }

    /// Persist the open notebook if it has unsaved changes.
    fn save(&mut self, services: &mut AppServices) -> Result<()> {
        let Some(editor) = self.editor.as_mut() else {
            return Ok(());
        };
        if !editor.notebook().is_modified() {
            return Ok(());
        }
        let id = services.save_editor(editor)?;
        self.notebook_id = Some(id);
        Ok(())
    }

    fn check_spelling(&mut self, services: &mut AppServices) -> Result<()> {
        let editor = self.editor_mut()?;
        let conversion = services.convert_layer(editor.active_layer())?;
        if !conversion.found_text {
            self.status = Some("No text found on this layer.".into());
            self.set_panel(NotepadPanel::None);
            return Ok(());
        }
        let issues = services.check_spelling(&conversion.text)?;
        if issues.is_empty() {
            self.status = Some("No spelling errors found.".into());
            self.set_panel(NotepadPanel::None);
        } else {
            self.set_panel(NotepadPanel::Suggestions { issues });
        }
        Ok(())
    }
}
