// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Hit regions for the notepad screen.
//
// A `NotepadLayout` is rebuilt from the UI state every frame. It owns every
// clickable rectangle in portrait coordinates, so hit testing never depends
// on what happened to be drawn last.

use abook_canvas::{DisplayGeometry, Point};
use abook_core::{TemplateKind, Tool};

use crate::state::{Command, NotepadPanel, UiState};

/// Axis aligned rectangle in portrait pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }

    /// The same rectangle in landscape window pixels, where it appears after
    /// the display rotation.
    pub fn to_landscape(&self, geometry: &DisplayGeometry) -> Region {
        let w = geometry.portrait_width as i32;
        Region::new(self.y, w - self.x - self.width + 1, self.height, self.width)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HitRegion {
    pub region: Region,
    pub command: Command,
}

// Toolbar buttons, top to bottom.
const TOOLBAR_TOP: i32 = 35;
const BUTTON_PITCH: i32 = 66;
const BUTTON_HEIGHT: i32 = 60;

// Panels float over the canvas.
const PANEL_X: i32 = 90;
const PANEL_Y: i32 = 35;
const PANEL_WIDTH: i32 = 500;
const PANEL_HEADER: i32 = 50;
const CLOSE_SIZE: i32 = 40;
const TEMPLATE_ROW: i32 = 60;
const LAYER_ROW: i32 = 56;
const LAYER_FOOTER: i32 = 60;
const SUGGESTION_ROW: i32 = 50;
const MAX_SUGGESTION_ROWS: usize = 10;
const SEARCH_PANEL_HEIGHT: i32 = 400;

fn toolbar_commands() -> [Command; 14] {
    [
        Command::GoHome,
        Command::SelectTool(Tool::Pen),
        Command::SelectTool(Tool::Highlighter),
        Command::SelectTool(Tool::Eraser),
        Command::IncreaseSize,
        Command::DecreaseSize,
        Command::Undo,
        Command::ToggleTemplates,
        Command::ToggleLayers,
        Command::ToggleSearch,
        Command::CheckSpelling,
        Command::ConvertToText,
        Command::ExportPdf,
        Command::Save,
    ]
}

/// Clickable regions for one frame.
#[derive(Debug, Clone)]
pub struct NotepadLayout {
    geometry: DisplayGeometry,
    regions: Vec<HitRegion>,
    panel: Option<Region>,
    canvas_input: bool,
}

impl NotepadLayout {
    /// Lay out the screen for `state`. `layer_count` sizes the layers panel.
    pub fn for_state(state: &UiState, geometry: DisplayGeometry, layer_count: usize) -> Self {
        let mut layout = Self {
            geometry,
            regions: Vec::new(),
            panel: None,
            canvas_input: false,
        };
        match state {
            UiState::Home => {}
            UiState::TextView => {
                layout.push(Region::new(0, 0, 120, 60), Command::CloseTextView);
            }
            UiState::Notepad { panel } => {
                layout.canvas_input = true;
                layout.toolbar();
                layout.panel(panel, layer_count);
            }
        }
        layout
    }

    pub fn regions(&self) -> &[HitRegion] {
        &self.regions
    }

    /// Area covered by the open panel, if any.
    pub fn panel_region(&self) -> Option<Region> {
        self.panel
    }

    /// Command for a press at `landscape` window coordinates.
    ///
    /// Controls win over the canvas; presses on an open panel's background do
    /// nothing; presses on the visible canvas start a stroke.
    pub fn command_at(&self, landscape: Point) -> Option<Command> {
        let portrait = self.geometry.to_portrait(landscape);
        if let Some(hit) = self.regions.iter().rev().find(|h| h.region.contains(portrait)) {
            return Some(hit.command.clone());
        }
        if self.panel.is_some_and(|panel| panel.contains(portrait)) {
            return None;
        }
        let g = &self.geometry;
        let canvas = Region::new(
            g.toolbar_width as i32,
            g.status_bar_height as i32,
            g.canvas_width() as i32,
            g.visible_height() as i32,
        );
        (self.canvas_input && canvas.contains(portrait)).then_some(Command::BeginStroke(landscape))
    }

    fn push(&mut self, region: Region, command: Command) {
        self.regions.push(HitRegion { region, command });
    }

    fn toolbar(&mut self) {
        let width = self.geometry.toolbar_width as i32;
        for (i, command) in toolbar_commands().into_iter().enumerate() {
            let y = TOOLBAR_TOP + i as i32 * BUTTON_PITCH;
            self.push(Region::new(0, y, width, BUTTON_HEIGHT), command);
        }
    }

    fn panel(&mut self, panel: &NotepadPanel, layer_count: usize) {
        let body = PANEL_Y + PANEL_HEADER;
        let height = match panel {
            NotepadPanel::None => return,
            NotepadPanel::Templates => {
                for (i, kind) in TemplateKind::ALL.into_iter().enumerate() {
                    let y = body + i as i32 * TEMPLATE_ROW;
                    self.push(
                        Region::new(PANEL_X, y, PANEL_WIDTH, TEMPLATE_ROW - 10),
                        Command::ApplyTemplate(kind),
                    );
                }
                PANEL_HEADER + TemplateKind::ALL.len() as i32 * TEMPLATE_ROW + 10
            }
            NotepadPanel::Layers => {
                let rows = layer_count.min(self.max_layer_rows());
                for i in 0..rows {
                    self.layer_row(i, body + i as i32 * LAYER_ROW);
                }
                let footer = body + rows as i32 * LAYER_ROW;
                let half = PANEL_WIDTH / 2;
                self.push(Region::new(PANEL_X, footer, half, LAYER_FOOTER - 10), Command::AddLayer);
                self.push(
                    Region::new(PANEL_X + half, footer, half, LAYER_FOOTER - 10),
                    Command::MergeVisibleLayers,
                );
                PANEL_HEADER + rows as i32 * LAYER_ROW + LAYER_FOOTER
            }
            NotepadPanel::Search { .. } => SEARCH_PANEL_HEIGHT,
            NotepadPanel::Suggestions { issues } => {
                let rows = issues.len().min(MAX_SUGGESTION_ROWS);
                for i in 0..rows {
                    let y = body + i as i32 * SUGGESTION_ROW;
                    self.push(
                        Region::new(PANEL_X, y, PANEL_WIDTH, SUGGESTION_ROW - 6),
                        Command::DismissSuggestion(i),
                    );
                }
                PANEL_HEADER + rows as i32 * SUGGESTION_ROW + 10
            }
        };

        self.panel = Some(Region::new(PANEL_X, PANEL_Y, PANEL_WIDTH, height));
        self.push(
            Region::new(PANEL_X + PANEL_WIDTH - CLOSE_SIZE, PANEL_Y, CLOSE_SIZE, CLOSE_SIZE),
            Command::ClosePanel,
        );
    }

    fn max_layer_rows(&self) -> usize {
        let room = self.geometry.portrait_height as i32 - PANEL_Y - PANEL_HEADER - LAYER_FOOTER;
        (room / LAYER_ROW).max(1) as usize
    }

    /// Name, visibility, up, down, remove.
    fn layer_row(&mut self, index: usize, y: i32) {
        let h = LAYER_ROW - 6;
        let button = 50;
        let name_width = PANEL_WIDTH - 4 * button;
        let mut x = PANEL_X;
        self.push(Region::new(x, y, name_width, h), Command::SelectLayer(index));
        x += name_width;
        for command in [
            Command::ToggleLayerVisibility(index),
            Command::MoveLayerUp(index),
            Command::MoveLayerDown(index),
            Command::RemoveLayer(index),
        ] {
            self.push(Region::new(x, y, button, h), command);
            x += button;
        }
    }
}
