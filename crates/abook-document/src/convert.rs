// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Handwriting to text: prepare the layer, recognise it, tidy the spelling
// and summarise long results.

use abook_canvas::Layer;
use abook_core::error::Result;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::assist::summary::{SUMMARY_SENTENCES, summarize};
use crate::assist::{Correction, WritingAssistant, extract_words};
use crate::ocr::{Recognition, TextRecognizer, recognize_layer};

/// Text longer than this gets a summary.
pub const SUMMARY_THRESHOLD: usize = 100;

/// Result of converting one layer.
#[derive(Debug, Clone, Serialize)]
pub struct Conversion {
    /// Final text, or the "no text" sentinel.
    pub text: String,
    pub found_text: bool,
    pub corrections: Vec<Correction>,
    pub summary: Option<String>,
    /// Words offered for dictionary lookup.
    pub words: Vec<String>,
}

impl Conversion {
    fn no_text(recognition: &Recognition) -> Self {
        Self {
            text: recognition.as_str().to_owned(),
            found_text: false,
            corrections: Vec::new(),
            summary: None,
            words: Vec::new(),
        }
    }
}

pub struct HandwritingConverter<'a> {
    recognizer: &'a dyn TextRecognizer,
    assistant: &'a WritingAssistant,
    auto_correct: bool,
}

impl<'a> HandwritingConverter<'a> {
    pub fn new(recognizer: &'a dyn TextRecognizer, assistant: &'a WritingAssistant) -> Self {
        Self {
            recognizer,
            assistant,
            auto_correct: true,
        }
    }

    /// Turn conservative auto-correction on or off.
    pub fn with_auto_correct(mut self, enabled: bool) -> Self {
        self.auto_correct = enabled;
        self
    }

    /// Convert `layer`. Recogniser failures, including an unavailable
    /// recogniser, are returned as errors; a missing spell checker only skips
    /// auto-correction.
    #[instrument(skip_all, fields(layer = %layer.name, recognizer = self.recognizer.name()))]
    pub fn convert(&self, layer: &Layer) -> Result<Conversion> {
        let recognition = recognize_layer(self.recognizer, layer)?;
        let Some(raw) = recognition.text() else {
            info!("no text detected");
            return Ok(Conversion::no_text(&recognition));
        };

        let (text, corrections) = if self.auto_correct && self.assistant.spelling_available() {
            self.assistant.auto_correct(raw, false)?
        } else {
            (raw.to_owned(), Vec::new())
        };
        debug!(corrections = corrections.len(), "auto-correct applied");

        let summary = (text.len() > SUMMARY_THRESHOLD).then(|| summarize(&text, SUMMARY_SENTENCES));
        let words = extract_words(&text);

        info!(chars = text.len(), words = words.len(), "handwriting converted");
        Ok(Conversion {
            text,
            found_text: true,
            corrections,
            summary,
            words,
        })
    }
}

#[cfg(test)]
mod tests {
    use abook_canvas::{Point, StrokeRasterizer, ToolSizes};
    use abook_core::error::AbookError;
    use abook_core::Tool;
    use image::GrayImage;

    use super::*;
    use crate::assist::SpellChecker;
    use crate::ocr::{NO_TEXT_SENTINEL, UnavailableRecognizer};

    struct Scripted(String);

    impl TextRecognizer for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        fn recognize(&self, _image: &GrayImage) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    fn written_layer() -> Layer {
        let mut layer = Layer::with_size(260, 160, "Blank");
        let mut pen = StrokeRasterizer::new(Tool::Pen, ToolSizes::default());
        pen.begin_stroke(Point::new(30, 80));
        pen.extend_stroke(&mut layer, Point::new(30, 80));
        pen.extend_stroke(&mut layer, Point::new(200, 90));
        pen.end_stroke();
        layer
    }

    fn assistant() -> WritingAssistant {
        let speller = SpellChecker::from_words(["the", "cat", "sat", "on", "mat"]).expect("words");
        WritingAssistant::new(Some(speller))
    }

    #[test]
    fn blank_layer_yields_sentinel() {
        let assistant = assistant();
        let converter = HandwritingConverter::new(&UnavailableRecognizer, &assistant);
        let conversion = converter.convert(&Layer::with_size(80, 80, "Blank")).expect("convert");
        assert!(!conversion.found_text);
        assert_eq!(conversion.text, NO_TEXT_SENTINEL);
        assert!(conversion.words.is_empty());
    }

    #[test]
    fn unavailable_recognizer_is_an_error_for_written_layers() {
        let assistant = assistant();
        let converter = HandwritingConverter::new(&UnavailableRecognizer, &assistant);
        let err = converter.convert(&written_layer()).unwrap_err();
        assert!(matches!(err, AbookError::Unavailable(_)));
    }

    #[test]
    fn common_typos_are_corrected_and_recorded() {
        let assistant = assistant();
        let recognizer = Scripted("teh cat sat on teh mat".into());
        let conversion = HandwritingConverter::new(&recognizer, &assistant)
            .convert(&written_layer())
            .expect("convert");
        assert_eq!(conversion.text, "the cat sat on the mat");
        assert_eq!(conversion.corrections.len(), 2);
        assert_eq!(conversion.summary, None);
        assert_eq!(conversion.words, ["cat", "mat", "on", "sat", "the"]);
    }

    #[test]
    fn auto_correct_can_be_disabled() {
        let assistant = assistant();
        let recognizer = Scripted("teh cat".into());
        let conversion = HandwritingConverter::new(&recognizer, &assistant)
            .with_auto_correct(false)
            .convert(&written_layer())
            .expect("convert");
        assert_eq!(conversion.text, "teh cat");
        assert!(conversion.corrections.is_empty());
    }

    #[test]
    fn long_text_is_summarised() {
        let assistant = WritingAssistant::default();
        let text = "One two three four five six. Seven eight nine ten. \
                    Eleven twelve thirteen fourteen fifteen sixteen seventeen. \
                    Short. Nineteen twenty twenty-one twenty-two twenty-three.";
        let recognizer = Scripted(text.into());
        let conversion = HandwritingConverter::new(&recognizer, &assistant)
            .convert(&written_layer())
            .expect("convert");
        assert!(conversion.corrections.is_empty());
        let summary = conversion.summary.expect("summary");
        assert!(summary.starts_with("One two three four five six."));
        assert!(!summary.contains("Short"));
    }
}
