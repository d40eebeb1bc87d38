// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Notebook store backed by SQLite.
//
// `save` upserts by notebook name. On update the notebook's layer rows are
// deleted and reinserted wholesale inside one transaction, so a failed save
// leaves the previous version intact. Layer rows cascade-delete with their
// notebook.

use std::collections::BTreeMap;
use std::path::Path;

use abook_canvas::{Layer, Notebook};
use abook_core::error::{AbookError, Result};
use abook_core::{Folder, NotebookId, NotebookSummary, StoreStats};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info, instrument};

use crate::codec;
use crate::integrity::{hash_bytes, verify_hash};

/// SQLite schema for notebooks and their layers.
const CREATE_TABLES_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS notebooks (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        folder TEXT NOT NULL DEFAULT 'notes',
        template_name TEXT NOT NULL DEFAULT 'Blank',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS layers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        notebook_id INTEGER NOT NULL REFERENCES notebooks(id) ON DELETE CASCADE,
        layer_num INTEGER NOT NULL,
        name TEXT NOT NULL DEFAULT '',
        template_name TEXT NOT NULL DEFAULT 'Blank',
        visible INTEGER NOT NULL DEFAULT 1,
        surface_data BLOB NOT NULL,
        surface_hash TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_layers_notebook ON layers (notebook_id, layer_num);
"#;

const SUMMARY_COLUMNS: &str = "id, name, folder, updated_at";

fn db_err(e: rusqlite::Error) -> AbookError {
    AbookError::Database(e.to_string())
}

fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Persistent notebook store.
///
/// All methods are synchronous; the editor calls them on its own thread.
pub struct NotebookStore {
    conn: Connection,
}

impl NotebookStore {
    /// Open (or create) the store at `path`.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())
            .map_err(|e| AbookError::Database(format!("open: {e}")))?;

        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| AbookError::Database(format!("WAL pragma: {e}")))?;

        Self::init(conn)
    }

    /// Open an in-memory store (useful for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| AbookError::Database(format!("open in-memory: {e}")))?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        // Cascade deletes depend on this; SQLite leaves it off per connection.
        conn.pragma_update(None, "foreign_keys", "ON")
            .map_err(|e| AbookError::Database(format!("foreign_keys pragma: {e}")))?;
        conn.execute_batch(CREATE_TABLES_SQL)
            .map_err(|e| AbookError::Database(format!("create tables: {e}")))?;
        info!("notebook store opened");
        Ok(Self { conn })
    }

    /// Insert or replace the notebook with this name. Returns its id.
    ///
    /// The notebook itself is not touched; callers clear its `modified`
    /// flags once this succeeds.
    #[instrument(skip(self, notebook), fields(name = %notebook.name, layers = notebook.layer_count()))]
    pub fn save(&mut self, notebook: &Notebook) -> Result<NotebookId> {
        let now = timestamp(Utc::now());
        let tx = self.conn.transaction().map_err(db_err)?;

        let existing: Option<i64> = tx
            .query_row(
                "SELECT id FROM notebooks WHERE name = ?1",
                params![notebook.name],
                |row| row.get(0),
            )
            .optional()
            .map_err(db_err)?;

        let id = match existing {
            Some(id) => {
                tx.execute(
                    "UPDATE notebooks SET folder = ?1, template_name = ?2, updated_at = ?3
                     WHERE id = ?4",
                    params![notebook.folder.as_str(), notebook.active_template, now, id],
                )
                .map_err(|e| AbookError::Database(format!("update notebook: {e}")))?;
                tx.execute("DELETE FROM layers WHERE notebook_id = ?1", params![id])
                    .map_err(|e| AbookError::Database(format!("clear layers: {e}")))?;
                id
            }
            None => {
                tx.execute(
                    "INSERT INTO notebooks (name, folder, template_name, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?4)",
                    params![notebook.name, notebook.folder.as_str(), notebook.active_template, now],
                )
                .map_err(|e| AbookError::Database(format!("insert notebook: {e}")))?;
                tx.last_insert_rowid()
            }
        };

        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO layers (notebook_id, layer_num, name, template_name, visible,
                     surface_data, surface_hash)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                )
                .map_err(|e| AbookError::Database(format!("prepare insert layer: {e}")))?;

            for (num, layer) in notebook.layers().iter().enumerate() {
                let blob = codec::encode(&layer.pixels);
                let digest = hash_bytes(&blob);
                stmt.execute(params![
                    id,
                    num as i64,
                    layer.name,
                    layer.template_name,
                    layer.visible,
                    blob,
                    digest,
                ])
                .map_err(|e| AbookError::Database(format!("insert layer {num}: {e}")))?;
            }
        }

        tx.commit()
            .map_err(|e| AbookError::Database(format!("commit: {e}")))?;

        info!(notebook_id = id, updated = existing.is_some(), "notebook saved");
        Ok(NotebookId(id))
    }

    /// Load a notebook with its layers in `layer_num` order.
    ///
    /// Returns `None` if no notebook has this id.
    #[instrument(skip(self), fields(notebook_id = %id))]
    pub fn load(&self, id: NotebookId) -> Result<Option<Notebook>> {
        let header = self
            .conn
            .query_row(
                "SELECT name, folder, template_name FROM notebooks WHERE id = ?1",
                params![id.0],
                |row| {
                    let name: String = row.get(0)?;
                    let folder: String = row.get(1)?;
                    let template: String = row.get(2)?;
                    Ok((name, parse_folder(1, &folder)?, template))
                },
            )
            .optional()
            .map_err(db_err)?;

        let Some((name, folder, template)) = header else {
            debug!("notebook not found");
            return Ok(None);
        };

        let mut stmt = self
            .conn
            .prepare(
                "SELECT name, template_name, visible, surface_data, surface_hash
                 FROM layers WHERE notebook_id = ?1 ORDER BY layer_num ASC",
            )
            .map_err(|e| AbookError::Database(format!("prepare load layers: {e}")))?;

        let rows = stmt
            .query_map(params![id.0], |row| {
                Ok(StoredLayer {
                    name: row.get(0)?,
                    template_name: row.get(1)?,
                    visible: row.get(2)?,
                    blob: row.get(3)?,
                    digest: row.get(4)?,
                })
            })
            .map_err(|e| AbookError::Database(format!("query layers: {e}")))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| AbookError::Database(format!("collect layers: {e}")))?;

        let layers = rows
            .into_iter()
            .map(StoredLayer::into_layer)
            .collect::<Result<Vec<_>>>()?;

        debug!(layers = layers.len(), "notebook loaded");
        Ok(Some(Notebook::from_parts(name, folder, template, layers)))
    }

    /// Id of the notebook with this exact name.
    pub fn find_by_name(&self, name: &str) -> Result<Option<NotebookId>> {
        self.conn
            .query_row(
                "SELECT id FROM notebooks WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()
            .map(|id| id.map(NotebookId))
            .map_err(db_err)
    }

    /// All notebooks, most recently updated first.
    #[instrument(skip(self))]
    pub fn list(&self) -> Result<Vec<NotebookSummary>> {
        let sql = format!(
            "SELECT {SUMMARY_COLUMNS} FROM notebooks ORDER BY updated_at DESC, id DESC"
        );
        self.query_summaries(&sql, [])
    }

    /// Notebooks whose name contains `query`, case-insensitively.
    #[instrument(skip(self))]
    pub fn search(&self, query: &str) -> Result<Vec<NotebookSummary>> {
        let escaped = query
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        let pattern = format!("%{escaped}%");
        let sql = format!(
            "SELECT {SUMMARY_COLUMNS} FROM notebooks WHERE name LIKE ?1 ESCAPE '\\'
             ORDER BY updated_at DESC, id DESC"
        );
        self.query_summaries(&sql, params![pattern])
    }

    /// Delete a notebook and, by cascade, its layers.
    ///
    /// Returns `false` if the id did not exist.
    #[instrument(skip(self), fields(notebook_id = %id))]
    pub fn delete(&self, id: NotebookId) -> Result<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM notebooks WHERE id = ?1", params![id.0])
            .map_err(|e| AbookError::Database(format!("delete notebook: {e}")))?;
        info!(deleted = rows > 0, "notebook delete");
        Ok(rows > 0)
    }

    /// Total notebooks and a per-folder breakdown.
    pub fn stats(&self) -> Result<StoreStats> {
        let mut stmt = self
            .conn
            .prepare("SELECT folder, COUNT(*) FROM notebooks GROUP BY folder")
            .map_err(|e| AbookError::Database(format!("prepare stats: {e}")))?;

        let counts = stmt
            .query_map([], |row| {
                let folder: String = row.get(0)?;
                let count: i64 = row.get(1)?;
                Ok((parse_folder(0, &folder)?, count as usize))
            })
            .map_err(|e| AbookError::Database(format!("query stats: {e}")))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| AbookError::Database(format!("collect stats: {e}")))?;

        let mut by_folder = BTreeMap::new();
        for (folder, count) in counts {
            *by_folder.entry(folder).or_insert(0) += count;
        }
        Ok(StoreStats {
            total: by_folder.values().sum(),
            by_folder,
        })
    }

    /// Number of layer rows across all notebooks.
    pub fn layer_row_count(&self) -> Result<usize> {
        self.conn
            .query_row("SELECT COUNT(*) FROM layers", [], |row| row.get::<_, i64>(0))
            .map(|n| n as usize)
            .map_err(db_err)
    }

    fn query_summaries(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<NotebookSummary>> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| AbookError::Database(format!("prepare listing: {e}")))?;
        let summaries = stmt
            .query_map(params, row_to_summary)
            .map_err(|e| AbookError::Database(format!("query listing: {e}")))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| AbookError::Database(format!("collect rows: {e}")))?;
        debug!(count = summaries.len(), "notebooks listed");
        Ok(summaries)
    }
}

// -- Row mapping --------------------------------------------------------------

struct StoredLayer {
    name: String,
    template_name: String,
    visible: bool,
    blob: Vec<u8>,
    digest: String,
}

impl StoredLayer {
    fn into_layer(self) -> Result<Layer> {
        verify_hash(&self.blob, &self.digest)?;
        let pixels = codec::decode(&self.blob)?;
        Ok(Layer::from_parts(self.name, self.template_name, self.visible, pixels))
    }
}

fn parse_folder(column: usize, value: &str) -> rusqlite::Result<Folder> {
    Folder::parse(value).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            column,
            rusqlite::types::Type::Text,
            Box::new(AbookError::InvalidArgument(format!("unknown folder {value:?}"))),
        )
    })
}

fn row_to_summary(row: &rusqlite::Row<'_>) -> rusqlite::Result<NotebookSummary> {
    let id: i64 = row.get(0)?;
    let name: String = row.get(1)?;
    let folder: String = row.get(2)?;
    let updated_at: String = row.get(3)?;

    let updated_at = DateTime::parse_from_rfc3339(&updated_at)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(NotebookSummary {
        id: NotebookId(id),
        name,
        folder: parse_folder(2, &folder)?,
        updated_at,
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use abook_canvas::stroke::PEN_INK;
    use abook_canvas::{Point, StrokeRasterizer, ToolSizes};
    use abook_core::Tool;
    use image::Rgba;

    use super::*;

    fn store() -> NotebookStore {
        NotebookStore::open_in_memory().expect("in-memory store")
    }

    fn small(name: &str, folder: Folder) -> Notebook {
        Notebook::with_canvas_size(name, folder, (200, 120))
    }

    fn stroke(layer: &mut Layer, tool: Tool, sizes: ToolSizes, from: Point, to: Point) {
        let mut r = StrokeRasterizer::new(tool, sizes);
        r.begin_stroke(from);
        r.extend_stroke(layer, from);
        r.extend_stroke(layer, to);
        r.end_stroke();
    }

    #[test]
    fn round_trip_preserves_everything() {
        let mut s = store();
        let mut nb = small("Chemistry", Folder::Books);
        nb.active_template = "Graph".into();
        nb.add_layer();
        nb.add_layer();
        nb.layer_mut(0).expect("l0").pixels.put_pixel(1, 2, Rgba([9, 8, 7, 6]));
        nb.layer_mut(2).expect("l2").pixels.put_pixel(199, 119, Rgba([1, 1, 1, 255]));
        nb.rename_layer(1, "sketch").expect("rename");
        nb.toggle_visibility(1).expect("hide");

        let id = s.save(&nb).expect("save");
        let loaded = s.load(id).expect("load").expect("present");

        assert_eq!(loaded.name, "Chemistry");
        assert_eq!(loaded.folder, Folder::Books);
        assert_eq!(loaded.active_template, "Graph");
        assert_eq!(loaded.layer_count(), 3);
        for (a, b) in nb.layers().iter().zip(loaded.layers()) {
            assert_eq!(a.name, b.name);
            assert_eq!(a.visible, b.visible);
            assert_eq!(a.template_name, b.template_name);
            assert_eq!(a.pixels, b.pixels);
            assert!(!b.modified);
        }
    }

    #[test]
    fn missing_id_is_not_found() {
        let s = store();
        assert!(s.load(NotebookId(42)).expect("query").is_none());
        assert!(!s.delete(NotebookId(42)).expect("delete"));
    }

    #[test]
    fn save_upserts_by_name_and_replaces_layers() {
        let mut s = store();
        let mut nb = small("Diary", Folder::Notes);
        nb.add_layer();
        nb.add_layer();
        let first = s.save(&nb).expect("first save");
        assert_eq!(s.layer_row_count().expect("count"), 3);

        nb.remove_layer(2).expect("remove");
        nb.folder = Folder::Tests;
        let second = s.save(&nb).expect("second save");

        assert_eq!(first, second);
        assert_eq!(s.layer_row_count().expect("count"), 2);
        assert_eq!(s.list().expect("list").len(), 1);
        let loaded = s.load(first).expect("load").expect("present");
        assert_eq!(loaded.layer_count(), 2);
        assert_eq!(loaded.folder, Folder::Tests);
    }

    #[test]
    fn list_is_most_recent_first() {
        let mut s = store();
        let a = s.save(&small("A", Folder::Notes)).expect("save a");
        std::thread::sleep(Duration::from_millis(5));
        let b = s.save(&small("B", Folder::Notes)).expect("save b");
        std::thread::sleep(Duration::from_millis(5));
        s.save(&small("A", Folder::Notes)).expect("resave a");

        let ids: Vec<_> = s.list().expect("list").into_iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[test]
    fn delete_cascades_to_layers() {
        let mut s = store();
        let mut nb = small("Scratch", Folder::Notes);
        nb.add_layer();
        let id = s.save(&nb).expect("save");
        s.save(&small("Keep", Folder::Notes)).expect("save other");
        assert_eq!(s.layer_row_count().expect("count"), 3);

        assert!(s.delete(id).expect("delete"));
        assert_eq!(s.layer_row_count().expect("count"), 1);
        assert!(s.load(id).expect("load").is_none());
    }

    #[test]
    fn search_and_stats() {
        let mut s = store();
        s.save(&small("Math homework", Folder::Tests)).expect("save");
        s.save(&small("Math notes", Folder::Notes)).expect("save");
        s.save(&small("Poems", Folder::Books)).expect("save");
        s.save(&small("100%_done", Folder::Notes)).expect("save");

        let hits = s.search("math").expect("search");
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|h| h.name.starts_with("Math")));
        assert_eq!(s.search("%").expect("search").len(), 1);
        assert!(s.search("zzz").expect("search").is_empty());

        let stats = s.stats().expect("stats");
        assert_eq!(stats.total, 4);
        assert_eq!(stats.by_folder.get(&Folder::Notes), Some(&2));
        assert_eq!(stats.by_folder.get(&Folder::Tests), Some(&1));
        assert_eq!(stats.by_folder.get(&Folder::Books), Some(&1));
    }

    #[test]
    fn tampered_blob_is_a_storage_error() {
        let mut s = store();
        let id = s.save(&small("Tamper", Folder::Notes)).expect("save");
        s.conn
            .execute(
                "UPDATE layers SET surface_data = ?1",
                params![codec::encode(&image::RgbaImage::new(2, 2))],
            )
            .expect("tamper");

        let err = s.load(id).expect_err("digest mismatch");
        assert!(matches!(err, AbookError::IntegrityMismatch { .. }));
        assert!(err.is_storage_error());
    }

    #[test]
    fn pen_stroke_survives_save_and_load() {
        let mut s = store();
        let mut nb = small("Ink", Folder::Notes);
        stroke(
            nb.layer_mut(0).expect("layer"),
            Tool::Pen,
            ToolSizes::new(4, 20, 30),
            Point::new(50, 50),
            Point::new(150, 50),
        );
        let id = s.save(&nb).expect("save");
        let loaded = s.load(id).expect("load").expect("present");
        let pixels = &loaded.layers()[0].pixels;

        for x in 50..=150 {
            for y in 48..=52 {
                assert_eq!(*pixels.get_pixel(x, y), PEN_INK, "band missing at ({x},{y})");
            }
        }
        for (x, y, p) in pixels.enumerate_pixels() {
            let in_band = (48..=152).contains(&x) && (48..=52).contains(&y);
            if !in_band {
                assert_eq!(p.0[3], 0, "stray ink at ({x},{y})");
            }
        }
    }

    #[test]
    fn eraser_restores_transparency_only_where_swept() {
        let mut nb = small("Erase", Folder::Notes);
        let layer = nb.layer_mut(0).expect("layer");
        stroke(layer, Tool::Pen, ToolSizes::new(40, 20, 30), Point::new(20, 60), Point::new(180, 60));
        let before = layer.pixels.clone();
        stroke(layer, Tool::Eraser, ToolSizes::new(4, 20, 10), Point::new(100, 40), Point::new(100, 80));

        let mut s = store();
        let id = s.save(&nb).expect("save");
        let loaded = s.load(id).expect("load").expect("present");
        let after = &loaded.layers()[0].pixels;

        for (x, y, p) in after.enumerate_pixels() {
            let dx = x as i32 - 100;
            let swept = dx * dx <= 25 && (35..=85).contains(&y) && {
                let cy = (y as i32).clamp(40, 80);
                let dy = y as i32 - cy;
                dx * dx + dy * dy <= 25
            };
            if swept {
                assert_eq!(p.0[3], 0, "({x},{y}) should be erased");
            } else {
                assert_eq!(p, before.get_pixel(x, y), "({x},{y}) changed");
            }
        }
    }

    #[test]
    fn on_disk_store_persists_across_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("abook.db");
        let id = {
            let mut s = NotebookStore::open(&path).expect("open");
            s.save(&small("Durable", Folder::Books)).expect("save")
        };
        let s = NotebookStore::open(&path).expect("reopen");
        let nb = s.load(id).expect("load").expect("present");
        assert_eq!(nb.name, "Durable");
        assert_eq!(s.find_by_name("Durable").expect("find"), Some(id));
    }
}
