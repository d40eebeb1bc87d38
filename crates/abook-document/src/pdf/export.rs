// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Notebook to PDF using `printpdf` 0.8.
//
// Layout: an A4 title page with the notebook name and export date, then one
// page per visible layer in stack order. Each layer is flattened onto white,
// scaled to fit inside the page less a 50pt side margin and 75pt top/bottom
// margin, centred, and numbered in the bottom-right corner.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use abook_canvas::raster::flatten_on_white;
use abook_canvas::{Layer, Notebook};
use abook_core::error::Result;
use chrono::{DateTime, Local, NaiveDate};
use image::imageops::{self, FilterType};
use printpdf::{
    BuiltinFont, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Pt, RawImage,
    RawImageData, RawImageFormat, TextItem, XObjectTransform,
};
use tracing::{debug, info, instrument};

const A4_WIDTH_MM: f32 = 210.0;
const A4_HEIGHT_MM: f32 = 297.0;
/// Total horizontal and vertical space left around a layer image, in points.
const SIDE_MARGINS_PT: f32 = 100.0;
const VERTICAL_MARGINS_PT: f32 = 150.0;
/// Resolution layer images are resampled to before embedding.
const EMBED_DPI: f32 = 150.0;

/// Writes notebooks as PDF files.
#[derive(Debug, Clone)]
pub struct NotebookPdfExporter {
    output_dir: PathBuf,
}

impl NotebookPdfExporter {
    /// Exporter that places generated files in `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Export `notebook` and return the written path.
    ///
    /// Without `path`, a file named `<name>_<timestamp>.pdf` is created in the
    /// output directory. A path lacking the `.pdf` extension gets it appended.
    #[instrument(skip(self, notebook), fields(name = %notebook.name))]
    pub fn export(&self, notebook: &Notebook, path: Option<&Path>) -> Result<PathBuf> {
        let now = Local::now();
        let path = match path {
            Some(p) => with_pdf_extension(p),
            None => self.output_dir.join(default_file_name(&notebook.name, now)),
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let bytes = self.render(notebook, now.date_naive())?;
        std::fs::write(&path, &bytes)?;
        info!(path = %path.display(), bytes = bytes.len(), "notebook exported");
        Ok(path)
    }

    /// Build the PDF in memory, stamping `date` on the title page.
    pub fn render(&self, notebook: &Notebook, date: NaiveDate) -> Result<Vec<u8>> {
        let page_w = Mm(A4_WIDTH_MM);
        let page_h = Mm(A4_HEIGHT_MM);
        let width_pt = page_w.into_pt().0;
        let height_pt = page_h.into_pt().0;

        let mut doc = PdfDocument::new(&notebook.name);
        let mut pages = vec![PdfPage::new(
            page_w,
            page_h,
            title_page_ops(&notebook.name, date, width_pt, height_pt),
        )];

        for (index, layer) in notebook.layers().iter().enumerate() {
            if !layer.visible {
                continue;
            }
            debug!(layer = index + 1, total = notebook.layer_count(), "adding layer page");
            let ops = layer_page_ops(&mut doc, layer, index + 1, width_pt, height_pt);
            pages.push(PdfPage::new(page_w, page_h, ops));
        }

        doc.with_pages(pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
        debug!(warnings = warnings.len(), bytes = output.len(), "PDF serialised");
        Ok(output)
    }
}

/// `<safe name>_<YYYYmmdd_HHMMSS>.pdf`, keeping letters, digits, spaces and
/// underscores of the notebook name.
pub fn default_file_name(name: &str, now: DateTime<Local>) -> String {
    let safe: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '_')
        .collect();
    let safe = match safe.trim() {
        "" => "notebook",
        s => s,
    };
    format!("{safe}_{}.pdf", now.format("%Y%m%d_%H%M%S"))
}

fn with_pdf_extension(path: &Path) -> PathBuf {
    let is_pdf = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    if is_pdf {
        return path.to_path_buf();
    }
    let mut raw = OsString::from(path.as_os_str());
    raw.push(".pdf");
    PathBuf::from(raw)
}

/// Rough Helvetica advance: half the font size per character.
fn approx_text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.5
}

fn text_ops(text: &str, x: f32, y: f32, size: f32, font: BuiltinFont) -> Vec<Op> {
    vec![
        Op::StartTextSection,
        Op::SetTextCursor {
            pos: Point { x: Pt(x), y: Pt(y) },
        },
        Op::SetFontSizeBuiltinFont { size: Pt(size), font },
        Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(text.to_owned())],
            font,
        },
        Op::EndTextSection,
    ]
}

fn title_page_ops(name: &str, date: NaiveDate, width: f32, height: f32) -> Vec<Op> {
    let date = date.format("%B %d, %Y").to_string();
    let mut ops = text_ops(
        name,
        (width - approx_text_width(name, 24.0)) / 2.0,
        height - 100.0,
        24.0,
        BuiltinFont::HelveticaBold,
    );
    ops.extend(text_ops(
        &date,
        (width - approx_text_width(&date, 12.0)) / 2.0,
        height - 150.0,
        12.0,
        BuiltinFont::Helvetica,
    ));
    ops
}

fn layer_page_ops(
    doc: &mut PdfDocument,
    layer: &Layer,
    page_number: usize,
    width: f32,
    height: f32,
) -> Vec<Op> {
    let flat = flatten_on_white(&layer.pixels);
    let (w, h) = flat.dimensions();

    // Fit in points, then resample to the embedding resolution.
    let scale = ((width - SIDE_MARGINS_PT) / w as f32).min((height - VERTICAL_MARGINS_PT) / h as f32);
    let target_w = w as f32 * scale;
    let target_h = h as f32 * scale;
    let px_w = ((target_w / 72.0 * EMBED_DPI).round() as u32).clamp(1, w);
    let px_h = ((target_h / 72.0 * EMBED_DPI).round() as u32).clamp(1, h);
    let resized = imageops::resize(&flat, px_w, px_h, FilterType::Lanczos3);

    let raw = RawImage {
        pixels: RawImageData::U8(resized.into_raw()),
        width: px_w as usize,
        height: px_h as usize,
        data_format: RawImageFormat::RGB8,
        tag: Vec::new(),
    };
    let xobject_id = doc.add_image(&raw);

    let native_w = px_w as f32 / EMBED_DPI * 72.0;
    let native_h = px_h as f32 / EMBED_DPI * 72.0;

    let mut ops = vec![Op::UseXobject {
        id: xobject_id,
        transform: XObjectTransform {
            translate_x: Some(Pt((width - target_w) / 2.0)),
            translate_y: Some(Pt((height - target_h) / 2.0)),
            scale_x: Some(target_w / native_w),
            scale_y: Some(target_h / native_h),
            dpi: Some(EMBED_DPI),
            rotate: None,
        },
    }];

    let label = format!("Page {page_number}");
    ops.extend(text_ops(
        &label,
        width - 50.0 - approx_text_width(&label, 12.0),
        30.0,
        12.0,
        BuiltinFont::Helvetica,
    ));
    ops
}
