//! Incremental caption/image pairing over an accumulating text buffer.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Caption text (may span lines) followed by the earliest inline image marker.
static PANEL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)(.*?)\[(data:image/([A-Za-z0-9_]+);base64,([A-Za-z0-9+/=]+))\]")
        .expect("panel pattern is a valid regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub id: u64,
    pub text: String,
    pub image_url: String,
    pub mime_type: String,
}

/// Owns the buffer and slide list for one generation.
///
/// Ids start at 0 and are never reused within an extractor; [`reset`] clears
/// the buffer and slides and restarts numbering for the next generation.
///
/// [`reset`]: SlideExtractor::reset
#[derive(Debug, Default)]
pub struct SlideExtractor {
    buffer: String,
    slides: Vec<Slide>,
    next_id: u64,
}

impl SlideExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `chunk` and returns the slides completed by it, in order.
    pub fn push_str(&mut self, chunk: &str) -> Vec<Slide> {
        self.buffer.push_str(chunk);

        let mut consumed = 0;
        let mut created = Vec::new();

        for captures in PANEL_PATTERN.captures_iter(&self.buffer) {
            let (Some(whole), Some(caption), Some(url), Some(subtype)) = (
                captures.get(0),
                captures.get(1),
                captures.get(2),
                captures.get(3),
            ) else {
                continue;
            };
            consumed = whole.end();

            let text = caption.as_str().trim();
            if text.is_empty() {
                tracing::debug!(
                    phase = "extract",
                    event = "caption_empty",
                    "Dropped image marker with no caption"
                );
                continue;
            }

            let slide = Slide {
                id: self.next_id,
                text: text.to_string(),
                image_url: url.as_str().to_string(),
                mime_type: format!("image/{}", subtype.as_str()),
            };
            self.next_id += 1;
            tracing::debug!(
                phase = "extract",
                event = "slide_emitted",
                id = slide.id,
                mime_type = %slide.mime_type,
                "Slide completed"
            );
            created.push(slide);
        }

        if consumed > 0 {
            self.buffer.drain(..consumed);
        }

        self.slides.extend(created.iter().cloned());
        created
    }

    /// Unconsumed text waiting for its image marker.
    pub fn buffered(&self) -> &str {
        &self.buffer
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn into_slides(self) -> Vec<Slide> {
        self.slides
    }

    /// Ends the stream. Returns any non-whitespace leftover, which is logged
    /// and never promoted to a slide.
    pub fn finish(&mut self) -> Option<String> {
        let leftover = std::mem::take(&mut self.buffer);
        let trimmed = leftover.trim();
        if trimmed.is_empty() {
            return None;
        }

        tracing::warn!(
            phase = "extract",
            event = "unprocessed_remainder",
            bytes = trimmed.len(),
            "Stream ended with unpaired text"
        );
        Some(trimmed.to_string())
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
        self.slides.clear();
        self.next_id = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_pair_becomes_one_slide() {
        let mut extractor = SlideExtractor::new();
        let slides = extractor.push_str("Hello world[data:image/png;base64,QQ==]");

        assert_eq!(
            slides,
            vec![Slide {
                id: 0,
                text: "Hello world".to_string(),
                image_url: "data:image/png;base64,QQ==".to_string(),
                mime_type: "image/png".to_string(),
            }]
        );
        assert_eq!(extractor.buffered(), "");
    }

    #[test]
    fn whitespace_caption_is_consumed_without_a_slide() {
        let mut extractor = SlideExtractor::new();
        let slides = extractor.push_str("   [data:image/png;base64,QQ==]");

        assert!(slides.is_empty());
        assert_eq!(extractor.buffered(), "");

        let slides = extractor.push_str("Next[data:image/png;base64,QQ==]");
        assert_eq!(slides[0].id, 0);
        assert_eq!(slides[0].text, "Next");
    }

    #[test]
    fn back_to_back_pairs_do_not_swallow_each_other() {
        let mut extractor = SlideExtractor::new();
        let slides =
            extractor.push_str("A[data:image/png;base64,QQ==]B[data:image/png;base64,Qg==]");

        let summary = slides
            .iter()
            .map(|slide| (slide.id, slide.text.as_str(), slide.image_url.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(
            summary,
            vec![
                (0, "A", "data:image/png;base64,QQ=="),
                (1, "B", "data:image/png;base64,Qg=="),
            ]
        );
    }

    #[test]
    fn caption_without_marker_waits_for_later_chunk() {
        let mut extractor = SlideExtractor::new();
        assert!(extractor.push_str("The first computer ").is_empty());
        assert!(extractor.push_str("woke up.").is_empty());
        assert_eq!(extractor.buffered(), "The first computer woke up.");

        let slides = extractor.push_str("[data:image/jpeg;base64,QUJD]");
        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].text, "The first computer woke up.");
        assert_eq!(slides[0].mime_type, "image/jpeg");
    }

    #[test]
    fn pair_split_mid_payload_yields_one_slide() {
        let mut extractor = SlideExtractor::new();
        assert!(extractor.push_str("Split[data:image/png;base64,QU").is_empty());

        let slides = extractor.push_str("JD]");
        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].image_url, "data:image/png;base64,QUJD");
        assert_eq!(extractor.slides().len(), 1);
    }

    #[test]
    fn multiline_captions_are_trimmed_and_kept_whole() {
        let mut extractor = SlideExtractor::new();
        let slides = extractor.push_str("\n  One line.\nTwo lines.  \n[data:image/png;base64,QQ==]");

        assert_eq!(slides[0].text, "One line.\nTwo lines.");
    }

    #[test]
    fn ids_are_gap_free_across_chunks() {
        let mut extractor = SlideExtractor::new();
        for index in 0..5 {
            extractor.push_str(&format!("Panel {index}"));
            extractor.push_str("[data:image/png;base64,QQ==]");
        }

        let ids = extractor.slides().iter().map(|slide| slide.id).collect::<Vec<_>>();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn remainder_after_last_match_is_retained() {
        let mut extractor = SlideExtractor::new();
        extractor.push_str("A[data:image/png;base64,QQ==] and then");

        assert_eq!(extractor.buffered(), " and then");
        assert_eq!(extractor.finish(), Some("and then".to_string()));
        assert_eq!(extractor.buffered(), "");
        assert_eq!(extractor.slides().len(), 1);
    }

    #[test]
    fn finish_ignores_whitespace_leftover() {
        let mut extractor = SlideExtractor::new();
        extractor.push_str("A[data:image/png;base64,QQ==]\n  ");
        assert_eq!(extractor.finish(), None);
    }

    #[test]
    fn non_image_markers_are_not_paired() {
        let mut extractor = SlideExtractor::new();
        let slides = extractor.push_str("Caption[data:text/plain;base64,QQ==]");
        assert!(slides.is_empty());
        assert_eq!(extractor.buffered(), "Caption[data:text/plain;base64,QQ==]");
    }

    #[test]
    fn reset_clears_state_and_restarts_ids() {
        let mut extractor = SlideExtractor::new();
        extractor.push_str("A[data:image/png;base64,QQ==]pending");
        extractor.reset();

        assert!(extractor.slides().is_empty());
        assert_eq!(extractor.buffered(), "");
        let slides = extractor.push_str("B[data:image/png;base64,QQ==]");
        assert_eq!(slides[0].id, 0);
    }
}
