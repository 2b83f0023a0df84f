// Active format readout for the toolbar

use super::color::Color;
use super::selection::{Selection, ordered_positions, point_to_position};
use super::structured_document::*;
use super::theme::ThemeMode;
use crate::config::EditorConfig;
use serde::{Deserialize, Serialize};

/// What the toolbar shows as active for the current selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatState {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike_through: bool,
    pub superscript: bool,
    pub subscript: bool,
    pub text_color: Color,
    pub highlight_color: Color,
    pub font_size_px: u16,
    pub block_type: BlockType,
    pub alignment: Alignment,
    pub link: Option<String>,
}

impl FormatState {
    /// Derive the readout. Over a range a style is active only if every
    /// covered run has it; colors and size come from the first covered run.
    pub fn compute(
        doc: &StructuredDocument,
        selection: &Selection,
        theme: ThemeMode,
        config: &EditorConfig,
    ) -> Self {
        let (start, end) = ordered_positions(doc, selection);
        let start_run = start_run(doc, selection);

        let covered: Vec<&TextRun> = if selection.is_collapsed() {
            Vec::new()
        } else {
            doc.runs_in_range(start, end).collect()
        };
        let reference = covered.first().copied().or(start_run);
        let reference_style = reference.map(|r| r.style).unwrap_or_default();

        let active = |kind: StyleKind| {
            if covered.is_empty() {
                reference_style.get(kind)
            } else {
                covered.iter().all(|run| run.style.get(kind))
            }
        };

        let block = doc.blocks().get(start.block_index);
        FormatState {
            bold: active(StyleKind::Bold),
            italic: active(StyleKind::Italic),
            underline: active(StyleKind::Underline),
            strike_through: active(StyleKind::StrikeThrough),
            superscript: active(StyleKind::Superscript),
            subscript: active(StyleKind::Subscript),
            text_color: reference_style
                .text_color
                .unwrap_or_else(|| config.text_color_for(theme)),
            highlight_color: reference_style.highlight.unwrap_or(Color::Transparent),
            font_size_px: reference_style
                .font_size
                .unwrap_or(config.default_font_size),
            block_type: block.map(|b| b.block_type).unwrap_or(BlockType::Paragraph),
            alignment: block.map(|b| b.alignment).unwrap_or_default(),
            link: reference.and_then(|r| r.link_url()).map(str::to_string),
        }
    }
}

/// Run under the selection's start point, or the block's first text run if
/// the point does not name one
fn start_run<'a>(doc: &'a StructuredDocument, selection: &Selection) -> Option<&'a TextRun> {
    let point = if point_to_position(doc, selection.focus) < point_to_position(doc, selection.anchor)
    {
        selection.focus
    } else {
        selection.anchor
    };
    let block = doc.blocks().get(point.block)?;
    block
        .runs
        .get(point.run)
        .filter(|r| !r.is_opaque())
        .or_else(|| block.runs.iter().find(|r| !r.is_opaque()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::richtext::selection::SelectionPoint;

    fn state(doc: &StructuredDocument, selection: Selection) -> FormatState {
        FormatState::compute(doc, &selection, ThemeMode::Light, &EditorConfig::default())
    }

    fn range(a: (usize, usize, usize), b: (usize, usize, usize)) -> Selection {
        Selection::new(
            SelectionPoint::new(a.0, a.1, a.2),
            SelectionPoint::new(b.0, b.1, b.2),
        )
    }

    #[test]
    fn test_defaults_for_plain_text() {
        let doc = StructuredDocument::with_paragraph("abc");
        let s = state(&doc, Selection::caret(SelectionPoint::new(0, 0, 1)));
        assert!(!s.bold);
        assert_eq!(s.text_color, Color::BLACK);
        assert_eq!(s.highlight_color, Color::Transparent);
        assert_eq!(s.font_size_px, 16);
        assert_eq!(s.block_type, BlockType::Paragraph);
        assert_eq!(s.link, None);

        let dark = FormatState::compute(
            &doc,
            &Selection::default(),
            ThemeMode::Dark,
            &EditorConfig::default(),
        );
        assert_eq!(dark.text_color, Color::Rgb(0xe5, 0xe5, 0xe5));
    }

    #[test]
    fn test_mixed_range_is_not_active() {
        let doc = StructuredDocument::from_blocks(vec![
            Block::paragraph()
                .with_text("ab", TextStyle::bold())
                .with_plain_text("cd"),
        ]);
        assert!(!state(&doc, range((0, 0, 0), (0, 1, 2))).bold);
        assert!(state(&doc, range((0, 0, 0), (0, 0, 2))).bold);
        // backwards selection over the bold part only
        assert!(state(&doc, range((0, 0, 2), (0, 0, 1))).bold);
    }

    #[test]
    fn test_color_and_size_from_first_covered_run() {
        let mut big = TextStyle::plain();
        big.font_size = Some(32);
        big.text_color = Some(Color::Rgb(255, 0, 0));
        let doc = StructuredDocument::from_blocks(vec![
            Block::paragraph().with_plain_text("ab"),
            Block::paragraph().with_text("cd", big).with_plain_text("ef"),
        ]);
        // starts at the end of the first block, so the second block's first run counts
        let s = state(&doc, range((0, 0, 2), (1, 1, 2)));
        assert_eq!(s.font_size_px, 32);
        assert_eq!(s.text_color, Color::Rgb(255, 0, 0));
    }

    #[test]
    fn test_caret_on_placeholder() {
        let doc = StructuredDocument::from_blocks(vec![
            Block::new(BlockType::BlockQuote)
                .with_alignment(Alignment::Center)
                .with_plain_text("ab")
                .with_run(TextRun::placeholder(TextStyle::italic())),
        ]);
        let s = state(&doc, Selection::caret(SelectionPoint::new(0, 1, 0)));
        assert!(s.italic);
        assert_eq!(s.block_type, BlockType::BlockQuote);
        assert_eq!(s.alignment, Alignment::Center);
    }

    #[test]
    fn test_link_readout() {
        let doc = StructuredDocument::from_blocks(vec![
            Block::paragraph().with_run(TextRun::plain("x").with_link(Link::new("https://a.b"))),
        ]);
        let s = state(&doc, Selection::caret(SelectionPoint::new(0, 0, 1)));
        assert_eq!(s.link.as_deref(), Some("https://a.b"));
    }

    #[test]
    fn test_serializes_camel_case() {
        let doc = StructuredDocument::with_paragraph("abc");
        let json = serde_json::to_value(state(&doc, Selection::default())).unwrap();
        assert_eq!(json["strikeThrough"], false);
        assert_eq!(json["fontSizePx"], 16);
        assert_eq!(json["textColor"], "#000000");
        assert_eq!(json["blockType"], "paragraph");
    }
}
