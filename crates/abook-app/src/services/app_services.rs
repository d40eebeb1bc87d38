// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer. Opens the notebook store, loads the config and
// sets up every document collaborator, degrading the optional ones
// (spelling, OCR, online dictionary) instead of failing startup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use abook_canvas::{DisplayGeometry, Editor, Layer, Notebook, ToolSizes, ViewportController};
use abook_core::error::Result;
use abook_core::{AppConfig, Folder, NotebookId, NotebookSummary, StoreStats};
use abook_document::assist::dictionary::offline_lookup;
use abook_document::assist::{SpellingIssue, TextAnalysis};
use abook_document::{
    Conversion, DictionaryClient, HandwritingConverter, NotebookPdfExporter, TextRecognizer,
    UnavailableRecognizer, WordLookup, WritingAssistant,
};
use abook_store::NotebookStore;
use tracing::{info, instrument, warn};

use super::data_dir;

const CONFIG_FILE: &str = "config.json";

/// Everything the front end talks to.
pub struct AppServices {
    store: NotebookStore,
    exporter: NotebookPdfExporter,
    assistant: WritingAssistant,
    dictionary: Option<DictionaryClient>,
    recognizer: Box<dyn TextRecognizer>,
    data_dir: PathBuf,
    config: AppConfig,
}

impl AppServices {
    /// Initialise all services in `data_dir`. Call once at startup.
    pub fn init(data_dir: PathBuf) -> Result<Self> {
        info!(path = %data_dir.display(), "initialising app services");
        let config = load_config(&data_dir).unwrap_or_default();
        let store = NotebookStore::open(data_dir.join(&config.database_file))?;
        let services = Self::with_store(store, data_dir, config);
        info!("app services initialised");
        Ok(services)
    }

    /// In-memory store, nothing persisted. Used when the data directory is
    /// unusable and by tests.
    pub fn fallback(config: AppConfig) -> Result<Self> {
        let store = NotebookStore::open_in_memory()?;
        Ok(Self::with_store(store, std::env::temp_dir().join("abook"), config))
    }

    fn with_store(store: NotebookStore, data_dir: PathBuf, config: AppConfig) -> Self {
        let export_dir = config
            .pdf_output_dir
            .clone()
            .unwrap_or_else(|| data_dir::data_subdir(&data_dir, "exports"));
        let assistant = WritingAssistant::from_word_list(config.spell_word_list.as_deref());

        let dictionary = match DictionaryClient::new(
            &config.dictionary_url,
            Duration::from_secs(config.lookup_timeout_secs),
        ) {
            Ok(client) => Some(client),
            Err(e) => {
                warn!("online dictionary unavailable: {e}");
                None
            }
        };

        Self {
            store,
            exporter: NotebookPdfExporter::new(export_dir),
            assistant,
            dictionary,
            recognizer: load_recognizer(&config),
            data_dir,
            config,
        }
    }

    /// Swap the handwriting recogniser.
    pub fn with_recognizer(mut self, recognizer: Box<dyn TextRecognizer>) -> Self {
        self.recognizer = recognizer;
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    // -- Config --------------------------------------------------------------

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Update and persist the config.
    pub fn save_config(&mut self, config: AppConfig) -> Result<()> {
        persist_config(&self.data_dir, &config)?;
        self.config = config;
        Ok(())
    }

    // -- Notebooks -----------------------------------------------------------

    /// A fresh, unsaved notebook using the configured default template.
    pub fn new_notebook(&self, name: &str, folder: Folder) -> Notebook {
        let mut notebook = Notebook::new(name, folder);
        let template = self.config.default_template;
        if let Some(layer) = notebook.layer_mut(0) {
            layer.apply_template(template);
        }
        notebook.active_template = template.name().to_owned();
        notebook
    }

    /// Save and clear the modified flags. On failure the notebook is left
    /// exactly as it was.
    #[instrument(skip_all, fields(name = %notebook.name))]
    pub fn save_notebook(&mut self, notebook: &mut Notebook) -> Result<NotebookId> {
        let id = self.store.save(notebook)?;
        notebook.mark_saved();
        Ok(id)
    }

    /// Save the notebook of an editing session.
    pub fn save_editor(&mut self, editor: &mut Editor) -> Result<NotebookId> {
        let id = self.store.save(editor.notebook())?;
        editor.mark_saved();
        info!(%id, "notebook saved");
        Ok(id)
    }

    pub fn load_notebook(&self, id: NotebookId) -> Result<Option<Notebook>> {
        self.store.load(id)
    }

    pub fn find_notebook(&self, name: &str) -> Result<Option<NotebookId>> {
        self.store.find_by_name(name)
    }

    pub fn list_notebooks(&self) -> Result<Vec<NotebookSummary>> {
        self.store.list()
    }

    pub fn search_notebooks(&self, query: &str) -> Result<Vec<NotebookSummary>> {
        self.store.search(query)
    }

    pub fn delete_notebook(&self, id: NotebookId) -> Result<bool> {
        self.store.delete(id)
    }

    pub fn stats(&self) -> Result<StoreStats> {
        self.store.stats()
    }

    /// Editing session configured from the settings.
    pub fn open_editor(&self, notebook: Notebook) -> Editor {
        let viewport = ViewportController::new(DisplayGeometry::default(), self.config.scroll_sensitivity);
        let sizes = ToolSizes::new(
            self.config.pen_size,
            self.config.highlighter_size,
            self.config.eraser_size,
        );
        Editor::open(notebook, viewport, sizes)
    }

    // -- Documents -----------------------------------------------------------

    pub fn export_pdf(&self, notebook: &Notebook, path: Option<&Path>) -> Result<PathBuf> {
        self.exporter.export(notebook, path)
    }

    pub fn convert_layer(&self, layer: &Layer) -> Result<Conversion> {
        HandwritingConverter::new(self.recognizer.as_ref(), &self.assistant)
            .with_auto_correct(self.config.auto_correct)
            .convert(layer)
    }

    pub fn check_spelling(&self, text: &str) -> Result<Vec<SpellingIssue>> {
        self.assistant.check_spelling(text)
    }

    pub fn analyze(&self, text: &str) -> TextAnalysis {
        self.assistant.analyze(text)
    }

    /// Dictionary lookup; never fails.
    pub fn define(&mut self, word: &str) -> WordLookup {
        match self.dictionary.as_mut() {
            Some(client) => client.lookup(word),
            None => offline_lookup(word).unwrap_or_else(|| {
                WordLookup::not_found(word.trim(), "Dictionary service is not configured")
            }),
        }
    }
}

#[cfg(feature = "ocr")]
fn load_recognizer(config: &AppConfig) -> Box<dyn TextRecognizer> {
    match abook_document::OcrEngine::from_model_dir(config.ocr_model_dir.as_deref()) {
        Ok(engine) => Box::new(engine),
        Err(e) => {
            warn!("handwriting recognition unavailable: {e}");
            Box::new(UnavailableRecognizer)
        }
    }
}

#[cfg(not(feature = "ocr"))]
fn load_recognizer(_config: &AppConfig) -> Box<dyn TextRecognizer> {
    warn!("built without the `ocr` feature; handwriting recognition unavailable");
    Box::new(UnavailableRecognizer)
}

fn load_config(data_dir: &Path) -> Option<AppConfig> {
    let path = data_dir.join(CONFIG_FILE);
    let data = std::fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&data) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!(path = %path.display(), "ignoring unreadable config: {e}");
            None
        }
    }
}

fn persist_config(data_dir: &Path, config: &AppConfig) -> Result<()> {
    let path = data_dir.join(CONFIG_FILE);
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(&path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use abook_core::TemplateKind;

    use super::*;

    fn services(dir: &Path) -> AppServices {
        let config = AppConfig {
            spell_word_list: None,
            ..AppConfig::default()
        };
        persist_config(dir, &config).expect("write config");
        AppServices::init(dir.to_path_buf()).expect("init")
    }

    #[test]
    fn config_round_trips_through_data_dir() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let mut svc = services(tmp.path());
        assert_eq!(svc.config().spell_word_list, None);

        let updated = AppConfig {
            default_template: TemplateKind::Graph,
            ..svc.config().clone()
        };
        svc.save_config(updated.clone()).expect("save config");
        assert_eq!(load_config(tmp.path()), Some(updated));
    }

    #[test]
    fn garbage_config_falls_back_to_defaults() {
        let tmp = tempfile::tempdir().expect("tempdir");
        std::fs::write(tmp.path().join(CONFIG_FILE), "{ nope").expect("write");
        assert_eq!(load_config(tmp.path()), None);
        let svc = AppServices::init(tmp.path().to_path_buf()).expect("init");
        assert_eq!(svc.config(), &AppConfig::default());
    }

    #[test]
    fn notebooks_survive_a_restart() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let id = {
            let mut svc = services(tmp.path());
            let mut nb = svc.new_notebook("Physics", Folder::Books);
            assert!(nb.is_modified());
            let id = svc.save_notebook(&mut nb).expect("save");
            assert!(!nb.is_modified());
            id
        };

        let svc = services(tmp.path());
        assert_eq!(svc.find_notebook("Physics").expect("find"), Some(id));
        let loaded = svc.load_notebook(id).expect("load").expect("present");
        assert_eq!(loaded.folder, Folder::Books);
        assert_eq!(svc.stats().expect("stats").total, 1);
    }

    #[test]
    fn new_notebooks_use_default_template() {
        let config = AppConfig {
            default_template: TemplateKind::Dotted,
            spell_word_list: None,
            ..AppConfig::default()
        };
        let svc = AppServices::fallback(config).expect("fallback");
        let nb = svc.new_notebook("Dots", Folder::Notes);
        assert_eq!(nb.active_template, "Dotted");
        assert_eq!(nb.layers()[0].template_name, "Dotted");
        assert!(!nb.layers()[0].is_blank());
    }

    #[test]
    fn missing_collaborators_degrade() {
        let config = AppConfig {
            spell_word_list: None,
            dictionary_url: "http://127.0.0.1:9/".into(),
            lookup_timeout_secs: 1,
            ..AppConfig::default()
        };
        let mut svc = AppServices::fallback(config).expect("fallback");
        assert!(svc.check_spelling("teh").is_err());
        assert_eq!(svc.analyze("teh cat").grammar_issues.len(), 1);
        let blank = svc.convert_layer(&Layer::with_size(40, 40, "Blank")).expect("convert");
        assert!(!blank.found_text);
        assert!(svc.define("note").found);
        assert!(!svc.define("zyzzyva").found);
    }
}
