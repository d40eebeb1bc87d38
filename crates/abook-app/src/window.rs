// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Interactive notebook window.
//
// Each frame: read pointer, wheel and keys, turn them into `Command`s through
// `NotepadLayout::command_at`, run them with `App::handle`, then upload
// `Editor::render_frame` as a texture and paint the hit regions over it.
// The notepad is shown exactly as the landscape panel receives it.

use abook_canvas::{DisplayGeometry, Point};
use abook_core::error::{AbookError, Result};
use abook_core::{Folder, NotebookId, NotebookSummary};
use eframe::egui::{
    self, Align2, Color32, ColorImage, FontId, Pos2, Rect, Sense, Stroke, TextureHandle,
    TextureOptions, Vec2,
};
use tracing::{info, warn};

use crate::layout::{NotepadLayout, Region};
use crate::services::app_services::AppServices;
use crate::state::{App, Command, NotepadPanel, UiState};

/// Scroll distance egui reports for one wheel notch.
const POINTS_PER_NOTCH: f32 = 50.0;

const REGION_OUTLINE: Color32 = Color32::from_gray(120);
const PANEL_FILL: Color32 = Color32::from_rgb(250, 250, 245);
const SELECTED_FILL: Color32 = Color32::from_rgba_premultiplied(60, 110, 200, 70);

/// Open the window and run until it is closed. With `notebook`, start in the
/// notepad instead of the home screen.
pub fn run(services: AppServices, notebook: Option<NotebookId>) -> Result<()> {
    let geometry = DisplayGeometry::default();
    let (width, height) = geometry.landscape_size();

    let mut window = NotebookWindow::new(services, geometry);
    if let Some(id) = notebook {
        window.dispatch(Command::OpenNotebook(id));
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([width as f32, height as f32 + 60.0])
            .with_min_inner_size([width as f32, height as f32 + 60.0]),
        ..Default::default()
    };

    info!("opening notebook window");
    eframe::run_native(
        "ABook",
        native_options,
        Box::new(move |_cc| Box::new(window)),
    )
    .map_err(|e| AbookError::Unavailable(format!("notebook window: {e}")))
}

#[derive(Clone, Copy)]
enum Screen {
    Home,
    Notepad,
    TextView,
}

struct NotebookWindow {
    services: AppServices,
    app: App,
    geometry: DisplayGeometry,
    texture: Option<TextureHandle>,
    frame_dirty: bool,
    drawing: bool,
    last_pointer: Option<Point>,
    notebooks: Option<Vec<NotebookSummary>>,
    new_name: String,
    new_folder: Folder,
    search_word: String,
}

impl NotebookWindow {
    fn new(services: AppServices, geometry: DisplayGeometry) -> Self {
        Self {
            services,
            app: App::new(),
            geometry,
            texture: None,
            frame_dirty: true,
            drawing: false,
            last_pointer: None,
            notebooks: None,
            new_name: String::new(),
            new_folder: Folder::Notes,
            search_word: String::new(),
        }
    }

    /// Run a command and mark everything that may have changed for redraw.
    fn dispatch(&mut self, command: Command) {
        self.app.handle(&mut self.services, command);
        self.frame_dirty = true;
        self.notebooks = None;
    }

    fn layout(&self) -> NotepadLayout {
        let layer_count = self.app.editor().map_or(0, |e| e.notebook().layer_count());
        NotepadLayout::for_state(self.app.state(), self.geometry, layer_count)
    }

    // -- Home ----------------------------------------------------------------

    fn home(&mut self, ui: &mut egui::Ui) {
        ui.heading("Notebooks");
        ui.horizontal(|ui| {
            ui.label("New:");
            ui.text_edit_singleline(&mut self.new_name);
            egui::ComboBox::from_id_source("folder")
                .selected_text(self.new_folder.as_str())
                .show_ui(ui, |ui| {
                    for folder in Folder::ALL {
                        ui.selectable_value(&mut self.new_folder, folder, folder.as_str());
                    }
                });
            let name = self.new_name.trim().to_owned();
            if ui.add_enabled(!name.is_empty(), egui::Button::new("Create")).clicked() {
                self.new_name.clear();
                self.dispatch(Command::CreateNotebook {
                    name,
                    folder: self.new_folder,
                });
            }
        });
        ui.separator();

        if self.notebooks.is_none() {
            self.notebooks = match self.services.list_notebooks() {
                Ok(list) => Some(list),
                Err(e) => {
                    warn!(error = %e, "listing notebooks failed");
                    Some(Vec::new())
                }
            };
        }

        let mut chosen = None;
        egui::ScrollArea::vertical().show(ui, |ui| {
            for nb in self.notebooks.iter().flatten() {
                ui.horizontal(|ui| {
                    ui.label(format!(
                        "{:<6} {}  {}",
                        nb.folder.as_str(),
                        nb.updated_at.format("%Y-%m-%d %H:%M"),
                        nb.name
                    ));
                    if ui.button("Open").clicked() {
                        chosen = Some(Command::OpenNotebook(nb.id));
                    }
                    if ui.button("Delete").clicked() {
                        chosen = Some(Command::DeleteNotebook(nb.id));
                    }
                });
            }
        });
        if let Some(command) = chosen {
            self.dispatch(command);
        }
    }

    // -- Notepad -------------------------------------------------------------

    fn notepad(&mut self, ui: &mut egui::Ui) {
        let (width, height) = self.geometry.landscape_size();
        let (response, painter) =
            ui.allocate_painter(Vec2::new(width as f32, height as f32), Sense::click_and_drag());
        let rect = response.rect;

        self.pointer_input(ui.ctx(), rect);

        if self.frame_dirty || self.texture.is_none() {
            if let Some(editor) = self.app.editor() {
                let frame = editor.render_frame();
                let image = ColorImage::from_rgba_unmultiplied(
                    [frame.width() as usize, frame.height() as usize],
                    frame.as_raw(),
                );
                match &mut self.texture {
                    Some(texture) => texture.set(image, TextureOptions::NEAREST),
                    None => {
                        self.texture =
                            Some(ui.ctx().load_texture("notebook-frame", image, TextureOptions::NEAREST));
                    }
                }
            }
            self.frame_dirty = false;
        }

        if let Some(texture) = &self.texture {
            painter.image(
                texture.id(),
                rect,
                Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                Color32::WHITE,
            );
        }
        self.paint_controls(&painter, rect);
    }

    /// Window position to landscape frame pixels.
    fn to_frame(&self, rect: Rect, pos: Pos2) -> Point {
        let (width, height) = self.geometry.landscape_size();
        let x = (pos.x - rect.min.x) / rect.width() * width as f32;
        let y = (pos.y - rect.min.y) / rect.height() * height as f32;
        Point::new(x.floor() as i32, y.floor() as i32)
    }

    fn to_screen(&self, rect: Rect, region: Region) -> Rect {
        let (width, height) = self.geometry.landscape_size();
        let r = region.to_landscape(&self.geometry);
        let sx = rect.width() / width as f32;
        let sy = rect.height() / height as f32;
        Rect::from_min_size(
            Pos2::new(rect.min.x + r.x as f32 * sx, rect.min.y + r.y as f32 * sy),
            Vec2::new(r.width as f32 * sx, r.height as f32 * sy),
        )
    }

    fn pointer_input(&mut self, ctx: &egui::Context, rect: Rect) {
        let (pressed, down, released, pos, wheel) = ctx.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_down(),
                i.pointer.primary_released(),
                i.pointer.interact_pos(),
                i.raw_scroll_delta.y,
            )
        });

        if let Some(pos) = pos.filter(|p| pressed && rect.contains(*p)) {
            let point = self.to_frame(rect, pos);
            match self.layout().command_at(point) {
                Some(begin @ Command::BeginStroke(_)) => {
                    self.dispatch(begin);
                    self.drawing = true;
                    self.last_pointer = Some(point);
                }
                Some(command) => self.dispatch(command),
                None => {}
            }
        } else if self.drawing && down {
            if let Some(pos) = pos {
                let point = self.to_frame(rect, pos);
                if self.last_pointer != Some(point) {
                    self.dispatch(Command::ContinueStroke(point));
                    self.last_pointer = Some(point);
                }
            }
        }
        if self.drawing && (released || !down) {
            self.drawing = false;
            self.last_pointer = None;
            self.dispatch(Command::EndStroke);
        }

        if wheel != 0.0 && pos.is_some_and(|p| rect.contains(p)) {
            self.dispatch(Command::Scroll(wheel / POINTS_PER_NOTCH));
        }
    }

    fn paint_controls(&self, painter: &egui::Painter, rect: Rect) {
        let layout = self.layout();
        let font = FontId::proportional(11.0);

        if let Some(panel) = layout.panel_region() {
            let area = self.to_screen(rect, panel);
            painter.rect_filled(area, 4.0, PANEL_FILL);
            painter.rect_stroke(area, 4.0, Stroke::new(1.0, REGION_OUTLINE));
            painter.text(
                area.left_top() + Vec2::new(8.0, 8.0),
                Align2::LEFT_TOP,
                panel_title(self.app.state()),
                FontId::proportional(14.0),
                Color32::BLACK,
            );
            if let UiState::Notepad {
                panel: NotepadPanel::Search { definition },
            } = self.app.state()
            {
                let text = definition
                    .as_ref()
                    .map_or_else(|| "Type a word below.".to_owned(), describe_lookup);
                painter.text(
                    area.left_top() + Vec2::new(8.0, 40.0),
                    Align2::LEFT_TOP,
                    text,
                    font.clone(),
                    Color32::BLACK,
                );
            }
        }

        for hit in layout.regions() {
            let area = self.to_screen(rect, hit.region);
            if self.is_selected(&hit.command) {
                painter.rect_filled(area, 3.0, SELECTED_FILL);
            }
            painter.rect_stroke(area, 3.0, Stroke::new(1.0, REGION_OUTLINE));
            painter.text(
                area.center(),
                Align2::CENTER_CENTER,
                label(&hit.command, &self.app),
                font.clone(),
                Color32::BLACK,
            );
        }
    }

    fn is_selected(&self, command: &Command) -> bool {
        let Some(editor) = self.app.editor() else {
            return false;
        };
        match command {
            Command::SelectTool(tool) => editor.tool() == *tool,
            Command::SelectLayer(i) => editor.active_index() == *i,
            _ => false,
        }
    }

    fn status_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if let Some(editor) = self.app.editor() {
                ui.label(format!(
                    "{}  |  {} {} px  |  layer {}/{}",
                    editor.notebook().name,
                    editor.tool().label(),
                    editor.tool_size(),
                    editor.active_index() + 1,
                    editor.notebook().layer_count()
                ));
                ui.separator();
            }
            if let Some(status) = self.app.status() {
                ui.label(status);
            }
        });

        if matches!(
            self.app.state(),
            UiState::Notepad {
                panel: NotepadPanel::Search { .. }
            }
        ) {
            ui.horizontal(|ui| {
                ui.label("Word:");
                let edit = ui.text_edit_singleline(&mut self.search_word);
                let submitted = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                let word = self.search_word.trim().to_owned();
                if (ui.button("Look up").clicked() || submitted) && !word.is_empty() {
                    self.dispatch(Command::LookUp(word));
                }
            });
        }
    }

    // -- Text view -----------------------------------------------------------

    fn text_view(&mut self, ui: &mut egui::Ui) {
        if ui.button("Back").clicked() {
            self.dispatch(Command::CloseTextView);
            return;
        }
        let Some(conversion) = self.app.conversion() else {
            return;
        };
        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.heading("Recognised text");
            ui.label(&conversion.text);
            if !conversion.corrections.is_empty() {
                ui.separator();
                for fix in &conversion.corrections {
                    ui.label(format!("corrected: {} -> {}", fix.original, fix.replacement));
                }
            }
            if let Some(summary) = &conversion.summary {
                ui.separator();
                ui.label(format!("Summary: {summary}"));
            }
            if !conversion.words.is_empty() {
                ui.separator();
                ui.label(format!("Words: {}", conversion.words.join(" ")));
            }
        });
    }

    fn shortcuts(&mut self, ctx: &egui::Context) {
        if !matches!(self.app.state(), UiState::Notepad { .. }) {
            return;
        }
        let (undo, escape) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Z) && i.modifiers.command,
                i.key_pressed(egui::Key::Escape),
            )
        });
        if undo {
            self.dispatch(Command::Undo);
        }
        if escape {
            self.dispatch(Command::ClosePanel);
        }
    }
}

impl eframe::App for NotebookWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.viewport().close_requested()) && self.app.editor().is_some() {
            self.dispatch(Command::Save);
        }

        self.shortcuts(ctx);

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| self.status_bar(ui));
        let screen = match self.app.state() {
            UiState::Home => Screen::Home,
            UiState::Notepad { .. } => Screen::Notepad,
            UiState::TextView => Screen::TextView,
        };
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| match screen {
                Screen::Home => self.home(ui),
                Screen::Notepad => self.notepad(ui),
                Screen::TextView => self.text_view(ui),
            });
    }
}

fn panel_title(state: &UiState) -> &'static str {
    match state {
        UiState::Notepad { panel } => match panel {
            NotepadPanel::None => "",
            NotepadPanel::Templates => "Templates",
            NotepadPanel::Layers => "Layers",
            NotepadPanel::Search { .. } => "Dictionary",
            NotepadPanel::Suggestions { .. } => "Spelling",
        },
        _ => "",
    }
}

/// Caption drawn on a control.
fn label(command: &Command, app: &App) -> String {
    let layer = |i: usize| app.editor().and_then(|e| e.notebook().layer(i));
    match command {
        Command::GoHome => "Home".into(),
        Command::Save => "Save".into(),
        Command::SelectTool(tool) => tool.label().into(),
        Command::IncreaseSize => "Size +".into(),
        Command::DecreaseSize => "Size -".into(),
        Command::Undo => "Undo".into(),
        Command::ToggleTemplates => "Templates".into(),
        Command::ApplyTemplate(kind) => kind.name().into(),
        Command::ToggleLayers => "Layers".into(),
        Command::AddLayer => "Add layer".into(),
        Command::MergeVisibleLayers => "Merge visible".into(),
        Command::SelectLayer(i) => layer(*i).map(|l| l.name.clone()).unwrap_or_default(),
        Command::ToggleLayerVisibility(i) => match layer(*i) {
            Some(l) if l.visible => "Hide".into(),
            Some(_) => "Show".into(),
            None => String::new(),
        },
        Command::MoveLayerUp(_) => "Up".into(),
        Command::MoveLayerDown(_) => "Down".into(),
        Command::RemoveLayer(_) => "Del".into(),
        Command::ToggleSearch => "Search".into(),
        Command::CheckSpelling => "Spelling".into(),
        Command::DismissSuggestion(i) => match app.state() {
            UiState::Notepad {
                panel: NotepadPanel::Suggestions { issues },
            } => issues
                .get(*i)
                .map(|issue| format!("{}: {}", issue.word, issue.suggestions.join(", ")))
                .unwrap_or_default(),
            _ => String::new(),
        },
        Command::ClosePanel => "X".into(),
        Command::ConvertToText => "To text".into(),
        Command::ExportPdf => "PDF".into(),
        Command::CloseTextView => "Back".into(),
        Command::CreateNotebook { .. }
        | Command::OpenNotebook(_)
        | Command::DeleteNotebook(_)
        | Command::SetToolSize(_)
        | Command::Scroll(_)
        | Command::BeginStroke(_)
        | Command::ContinueStroke(_)
        | Command::EndStroke
        | Command::RenameLayer(..)
        | Command::LookUp(_) => String::new(),
    }
}

fn describe_lookup(lookup: &abook_document::WordLookup) -> String {
    if !lookup.found {
        return format!(
            "{}: {}",
            lookup.word,
            lookup.error.as_deref().unwrap_or("not found")
        );
    }
    let mut lines = vec![match &lookup.phonetic {
        Some(p) => format!("{} {p}", lookup.word),
        None => lookup.word.clone(),
    }];
    for (i, def) in lookup.definitions.iter().enumerate() {
        lines.push(format!("{}. ({}) {}", i + 1, def.part_of_speech, def.definition));
    }
    if !lookup.synonyms.is_empty() {
        lines.push(format!("synonyms: {}", lookup.synonyms.join(", ")));
    }
    lines.join("\n")
}
