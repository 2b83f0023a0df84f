// Structured Editor
// Provides editing operations on a StructuredDocument
// Completely independent of the markup the document is stored in

use super::color::Color;
use super::format_state::FormatState;
use super::selection::{
    Selection, SelectionPoint, clamp_to_document, collapse_to_end, ordered_positions,
    point_to_position, position_to_point,
};
use super::structured_document::*;
use super::theme::{self, ThemeMode};
use crate::config::EditorConfig;
use serde::{Deserialize, Serialize};

/// Result of an editing operation
pub type EditResult = Result<(), EditError>;

/// Errors that can occur during editing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("position is outside the document")]
    InvalidPosition,
    #[error("block index out of range")]
    InvalidBlockIndex,
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("document has no blocks")]
    EmptyDocument,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Bullet,
    Numbered,
}

impl ListKind {
    pub fn block_type(self) -> BlockType {
        match self {
            ListKind::Bullet => BlockType::UnorderedList,
            ListKind::Numbered => BlockType::OrderedList,
        }
    }
}

/// Every mutation the editor understands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum EditCommand {
    ToggleStyle {
        style: StyleKind,
    },
    SetFontSize {
        px: u16,
    },
    SetTextColor {
        color: String,
    },
    SetHighlightColor {
        color: String,
    },
    InsertEmoji {
        emoji: String,
    },
    InsertLink {
        url: String,
        #[serde(default)]
        text: String,
    },
    ClearFormatting,
    SetAlignment {
        alignment: Alignment,
    },
    ToggleList {
        kind: ListKind,
    },
    ToggleBlockquote,
    InsertText {
        text: String,
    },
    InsertParagraph,
    DeleteBackward,
    DeleteForward,
    SelectAll,
}

impl EditCommand {
    pub fn name(&self) -> &'static str {
        match self {
            EditCommand::ToggleStyle { .. } => "toggleStyle",
            EditCommand::SetFontSize { .. } => "setFontSize",
            EditCommand::SetTextColor { .. } => "setTextColor",
            EditCommand::SetHighlightColor { .. } => "setHighlightColor",
            EditCommand::InsertEmoji { .. } => "insertEmoji",
            EditCommand::InsertLink { .. } => "insertLink",
            EditCommand::ClearFormatting => "clearFormatting",
            EditCommand::SetAlignment { .. } => "setAlignment",
            EditCommand::ToggleList { .. } => "toggleList",
            EditCommand::ToggleBlockquote => "toggleBlockquote",
            EditCommand::InsertText { .. } => "insertText",
            EditCommand::InsertParagraph => "insertParagraph",
            EditCommand::DeleteBackward => "deleteBackward",
            EditCommand::DeleteForward => "deleteForward",
            EditCommand::SelectAll => "selectAll",
        }
    }
}

/// The structured editor with selection state
#[derive(Debug, Clone)]
pub struct StructuredEditor {
    document: StructuredDocument,
    selection: Selection,
    theme: ThemeMode,
    config: EditorConfig,
}

impl StructuredEditor {
    /// Create a new editor with an empty document
    pub fn new() -> Self {
        Self::with_document(StructuredDocument::new())
    }

    /// Create an editor with an existing document
    pub fn with_document(document: StructuredDocument) -> Self {
        Self::with_config(document, ThemeMode::Light, EditorConfig::default())
    }

    pub fn with_config(document: StructuredDocument, theme: ThemeMode, config: EditorConfig) -> Self {
        let mut editor = StructuredEditor {
            document,
            selection: Selection::default(),
            theme,
            config,
        };
        editor.normalize();
        editor
    }

    /// Get the document
    pub fn document(&self) -> &StructuredDocument {
        &self.document
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn theme(&self) -> ThemeMode {
        self.theme
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Toolbar readout for the current selection
    pub fn format_state(&self) -> FormatState {
        FormatState::compute(&self.document, &self.selection, self.theme, &self.config)
    }

    /// Set selection (will be clamped to valid range)
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = clamp_to_document(&selection, &self.document);
        self.normalize();
    }

    /// Switch theme and run the sanitizer for it. Returns true if the document changed.
    pub fn set_theme(&mut self, theme: ThemeMode) -> bool {
        self.theme = theme;
        self.sanitize()
    }

    /// Run the theme sanitizer, keeping the selection on the same text
    pub fn sanitize(&mut self) -> bool {
        let original = self.document.clone();
        theme::strip_illegible_colors(&mut self.document, self.theme);
        self.normalize();
        self.document != original
    }

    /// Apply a command. On error the document and selection are left as they were.
    pub fn apply(&mut self, command: &EditCommand) -> EditResult {
        if self.document.is_empty() {
            return Err(EditError::EmptyDocument);
        }
        let snapshot = (self.document.clone(), self.selection);
        self.selection = clamp_to_document(&self.selection, &self.document);

        let result = match command {
            EditCommand::ToggleStyle { style } => self.toggle_style(*style),
            EditCommand::SetFontSize { px } => self.set_font_size(*px),
            EditCommand::SetTextColor { color } => self.set_text_color(color),
            EditCommand::SetHighlightColor { color } => self.set_highlight_color(color),
            EditCommand::InsertEmoji { emoji } => self.insert_emoji(emoji),
            EditCommand::InsertLink { url, text } => self.insert_link(url, text),
            EditCommand::ClearFormatting => self.clear_formatting(),
            EditCommand::SetAlignment { alignment } => self.set_alignment(*alignment),
            EditCommand::ToggleList { kind } => self.toggle_list(*kind),
            EditCommand::ToggleBlockquote => self.toggle_blockquote(),
            EditCommand::InsertText { text } => self.insert_text(text),
            EditCommand::InsertParagraph => self.insert_paragraph(),
            EditCommand::DeleteBackward => self.delete_backward(),
            EditCommand::DeleteForward => self.delete_forward(),
            EditCommand::SelectAll => {
                self.select_all();
                Ok(())
            }
        };

        match result {
            Ok(()) => {
                self.normalize();
                Ok(())
            }
            Err(err) => {
                (self.document, self.selection) = snapshot;
                Err(err)
            }
        }
    }

    /// Merge runs, drop stale placeholders and re-derive the selection.
    /// A placeholder under a collapsed caret survives.
    fn normalize(&mut self) {
        if self.document.is_empty() {
            self.document.add_block(Block::paragraph());
        }
        let original = self.document.clone();
        let anchor = point_to_position(&self.document, self.selection.anchor);
        let focus = point_to_position(&self.document, self.selection.focus);
        let pin = self.placeholder_at_caret();

        let mut caret = None;
        for (index, block) in self.document.blocks_mut().iter_mut().enumerate() {
            match pin {
                Some((pinned_block, run)) if pinned_block == index => {
                    caret = block
                        .merge_adjacent_runs_keeping(Some(run))
                        .map(|(run, offset)| SelectionPoint::new(index, run, offset));
                }
                _ => block.merge_adjacent_runs(),
            }
            block.refresh_link_flags();
        }

        if let Some(point) = caret {
            self.selection = Selection::caret(point);
        } else if self.document != original {
            self.selection = Selection::new(
                position_to_point(&self.document, anchor),
                position_to_point(&self.document, focus),
            );
        } else {
            self.selection = clamp_to_document(&self.selection, &self.document);
        }
    }

    fn placeholder_at_caret(&self) -> Option<(usize, usize)> {
        if !self.selection.is_collapsed() {
            return None;
        }
        let point = self.selection.focus;
        let run = self.document.blocks().get(point.block)?.runs.get(point.run)?;
        run.is_placeholder().then_some((point.block, point.run))
    }

    fn placeholder_mut(&mut self) -> Option<&mut TextRun> {
        let (block, run) = self.placeholder_at_caret()?;
        self.document.blocks_mut().get_mut(block)?.runs.get_mut(run)
    }

    fn caret_position(&self) -> DocumentPosition {
        point_to_position(&self.document, self.selection.focus)
    }

    fn selection_range(&self) -> (DocumentPosition, DocumentPosition) {
        ordered_positions(&self.document, &self.selection)
    }

    /// Style that text typed at the caret would get
    fn caret_style(&self) -> TextStyle {
        let point = self.selection.focus;
        self.document
            .blocks()
            .get(point.block)
            .and_then(|b| b.runs.get(point.run))
            .filter(|r| !r.is_opaque())
            .map(|r| r.style)
            .unwrap_or_default()
    }

    fn set_caret(&mut self, pos: DocumentPosition) {
        self.selection = Selection::caret(position_to_point(&self.document, pos));
    }

    /// Put a run at the caret and move the caret behind its text
    fn insert_run_at_caret(&mut self, run: TextRun) -> EditResult {
        let pos = self.caret_position();
        let len = run.len();
        let block = self
            .document
            .blocks_mut()
            .get_mut(pos.block_index)
            .ok_or(EditError::InvalidBlockIndex)?;
        let index = block.insert_run(pos.offset, run);
        self.selection = Selection::caret(SelectionPoint::new(pos.block_index, index, len));
        Ok(())
    }

    /// Change the style of text typed next at the caret
    fn restyle_caret<F>(&mut self, apply_style: F) -> EditResult
    where
        F: FnOnce(&mut TextStyle),
    {
        if let Some(run) = self.placeholder_mut() {
            apply_style(&mut run.style);
            return Ok(());
        }
        let mut style = self.caret_style();
        apply_style(&mut style);
        self.insert_run_at_caret(TextRun::placeholder(style))
    }

    /// Apply `apply` to every text run inside the selection, across blocks.
    /// The selection keeps covering the same text afterwards.
    fn map_runs<F>(&mut self, mut apply: F)
    where
        F: FnMut(&mut TextRun),
    {
        let anchor = point_to_position(&self.document, self.selection.anchor);
        let focus = point_to_position(&self.document, self.selection.focus);
        let (start, end) = if focus < anchor {
            (focus, anchor)
        } else {
            (anchor, focus)
        };

        for index in start.block_index..=end.block_index {
            let Some(block) = self.document.blocks_mut().get_mut(index) else {
                break;
            };
            let from = if index == start.block_index {
                start.offset
            } else {
                0
            };
            let to = if index == end.block_index {
                end.offset
            } else {
                block.text_len()
            };
            block.map_range(from, to, &mut apply);
        }

        self.selection = Selection::new(
            position_to_point(&self.document, anchor),
            position_to_point(&self.document, focus),
        );
    }

    /// Style the selection, or the caret's next-typed text if collapsed
    fn style_selection<F>(&mut self, apply_style: F) -> EditResult
    where
        F: Fn(&mut TextStyle),
    {
        if self.selection.is_collapsed() {
            return self.restyle_caret(apply_style);
        }
        self.map_runs(|run| apply_style(&mut run.style));
        Ok(())
    }

    /// Toggle a boolean style. A range that is only partly styled gets the style everywhere.
    pub fn toggle_style(&mut self, kind: StyleKind) -> EditResult {
        if self.selection.is_collapsed() {
            return self.restyle_caret(|style| style.set(kind, !style.get(kind)));
        }
        let (start, end) = self.selection_range();
        let all_on = {
            let mut covered = self.document.runs_in_range(start, end).peekable();
            if covered.peek().is_none() {
                return Err(EditError::InvalidPosition);
            }
            covered.all(|run| run.style.get(kind))
        };
        self.map_runs(|run| run.style.set(kind, !all_on));
        Ok(())
    }

    pub fn set_font_size(&mut self, px: u16) -> EditResult {
        if !self.config.is_allowed_font_size(px) {
            return Err(EditError::InvalidArgument(format!(
                "font size {px}px is not offered"
            )));
        }
        let was_range = !self.selection.is_collapsed();
        self.style_selection(|style| style.font_size = Some(px))?;
        if was_range {
            self.selection = collapse_to_end(&self.selection, &self.document);
        }
        Ok(())
    }

    pub fn set_text_color(&mut self, color: &str) -> EditResult {
        let mut color = parse_color(color)?;
        if self.theme.is_dark() && color.is_black() {
            color = self.config.dark_text_color;
        }
        self.style_selection(|style| style.text_color = Some(color))
    }

    pub fn set_highlight_color(&mut self, color: &str) -> EditResult {
        let mut color = parse_color(color)?;
        if self.theme.is_dark() && color.is_white() {
            color = Color::Transparent;
        }
        self.style_selection(|style| style.highlight = Some(color))
    }

    /// Insert an emoji like typed text
    pub fn insert_emoji(&mut self, emoji: &str) -> EditResult {
        self.insert_text(emoji)
    }

    /// Link the selection, or insert a new link at the caret.
    /// With a range and explicit text, the text replaces the selection.
    pub fn insert_link(&mut self, url: &str, text: &str) -> EditResult {
        let url = url.trim();
        let text = unify_line_breaks(text.trim());
        let text = text.as_str();
        if url.is_empty() {
            return Err(EditError::InvalidArgument("link url is empty".to_string()));
        }

        if !self.selection.is_collapsed() {
            if text.is_empty() {
                self.map_runs(|run| run.link = Some(Link::new(url)));
                self.selection = collapse_to_end(&self.selection, &self.document);
                return Ok(());
            }
            self.delete_selection();
        }

        let display = if text.is_empty() { url } else { text };
        if let Some(run) = self.placeholder_mut() {
            run.text = display.to_string();
            run.link = Some(Link::new(url));
            self.selection.focus.offset = display.len();
            self.selection.anchor = self.selection.focus;
            return Ok(());
        }
        let style = self.caret_style();
        self.insert_run_at_caret(TextRun::new(display, style).with_link(Link::new(url)))
    }

    /// Clear inline styles and links in the selection, and turn quotes back into paragraphs
    pub fn clear_formatting(&mut self) -> EditResult {
        let (start, end) = self.selection_range();
        if self.selection.is_collapsed() {
            let caret_run_plain = {
                let point = self.selection.focus;
                self.document
                    .blocks()
                    .get(point.block)
                    .and_then(|b| b.runs.get(point.run))
                    .is_none_or(|r| r.style.is_plain() && r.link.is_none())
            };
            if let Some(run) = self.placeholder_mut() {
                run.style = TextStyle::plain();
            } else if !caret_run_plain {
                self.insert_run_at_caret(TextRun::placeholder(TextStyle::plain()))?;
            }
        } else {
            self.map_runs(|run| {
                run.style = TextStyle::plain();
                run.link = None;
            });
        }

        for block in self.blocks_in_range_mut(start, end) {
            if block.block_type == BlockType::BlockQuote {
                block.block_type = BlockType::Paragraph;
            }
        }
        Ok(())
    }

    fn blocks_in_range_mut(
        &mut self,
        start: DocumentPosition,
        end: DocumentPosition,
    ) -> impl Iterator<Item = &mut Block> {
        self.document
            .blocks_mut()
            .iter_mut()
            .skip(start.block_index)
            .take(end.block_index + 1 - start.block_index)
    }

    pub fn set_alignment(&mut self, alignment: Alignment) -> EditResult {
        let (start, end) = self.selection_range();
        for block in self.blocks_in_range_mut(start, end) {
            block.alignment = alignment;
        }
        Ok(())
    }

    /// Convert the selected blocks to `block_type`, or back to paragraphs if
    /// they all have it already
    fn toggle_block_type(&mut self, block_type: BlockType) -> EditResult {
        let (start, end) = self.selection_range();
        let all_set = self
            .blocks_in_range_mut(start, end)
            .all(|block| block.block_type == block_type);
        let target = if all_set {
            BlockType::Paragraph
        } else {
            block_type
        };
        for block in self.blocks_in_range_mut(start, end) {
            block.block_type = target;
        }
        Ok(())
    }

    pub fn toggle_list(&mut self, kind: ListKind) -> EditResult {
        self.toggle_block_type(kind.block_type())
    }

    pub fn toggle_blockquote(&mut self) -> EditResult {
        self.toggle_block_type(BlockType::BlockQuote)
    }

    /// Delete the current selection and leave the caret where it started
    fn delete_selection(&mut self) -> DocumentPosition {
        let (start, end) = self.selection_range();
        self.document.delete_range(start, end);
        self.set_caret(start);
        start
    }

    /// Insert text at the caret, replacing the selection.
    /// The text takes the caret's style; typing at the edge of a link stays outside it.
    pub fn insert_text(&mut self, text: &str) -> EditResult {
        let text = unify_line_breaks(text);
        let text = text.as_str();
        if text.is_empty() {
            return Err(EditError::InvalidArgument("nothing to insert".to_string()));
        }
        if !self.selection.is_collapsed() {
            self.delete_selection();
        }

        let point = self.selection.focus;
        let (edge_style, in_run) = {
            let block = self
                .document
                .blocks()
                .get(point.block)
                .ok_or(EditError::InvalidBlockIndex)?;
            let in_run = block.runs.get(point.run).is_some_and(|r| !r.is_opaque());
            (link_edge_style(block, point), in_run)
        };

        if let Some(style) = edge_style {
            return self.insert_run_at_caret(TextRun::new(text, style));
        }
        if !in_run {
            return self.insert_run_at_caret(TextRun::plain(text));
        }

        let run = &mut self.document.blocks_mut()[point.block].runs[point.run];
        let offset = floor_grapheme_boundary(&run.text, point.offset);
        run.text.insert_str(offset, text);
        self.selection = Selection::caret(SelectionPoint::new(
            point.block,
            point.run,
            offset + text.len(),
        ));
        Ok(())
    }

    /// Split the block at the caret. Enter in an empty list item leaves the list.
    pub fn insert_paragraph(&mut self) -> EditResult {
        if !self.selection.is_collapsed() {
            self.delete_selection();
        }
        let pos = self.caret_position();
        let block = self
            .document
            .blocks_mut()
            .get_mut(pos.block_index)
            .ok_or(EditError::InvalidBlockIndex)?;

        if block.block_type.is_list() && block.is_empty() {
            block.block_type = BlockType::Paragraph;
            return Ok(());
        }

        let mut next = Block::new(block.block_type).with_alignment(block.alignment);
        next.runs = block.split_content_at(pos.offset);
        self.document.insert_block(pos.block_index + 1, next);
        self.selection = Selection::caret(SelectionPoint::new(pos.block_index + 1, 0, 0));
        Ok(())
    }

    /// Delete the grapheme before the caret (backspace)
    pub fn delete_backward(&mut self) -> EditResult {
        if !self.selection.is_collapsed() {
            self.delete_selection();
            return Ok(());
        }
        let pos = self.caret_position();
        let block_index = pos.block_index;
        let block = self
            .document
            .blocks_mut()
            .get_mut(block_index)
            .ok_or(EditError::InvalidBlockIndex)?;

        if pos.offset == 0 {
            // At start of block: lists and quotes become paragraphs first
            if block.block_type != BlockType::Paragraph {
                block.block_type = BlockType::Paragraph;
                return Ok(());
            }
            if block_index == 0 {
                return Ok(());
            }
            let prev_len = self.document.blocks()[block_index - 1].text_len();
            self.document.join_with_next(block_index - 1);
            self.set_caret(DocumentPosition::new(block_index - 1, prev_len));
            return Ok(());
        }

        let text = block.to_plain_text();
        let prev = prev_grapheme_boundary(&text, pos.offset).unwrap_or(0);
        block.delete_text_range(prev, pos.offset);
        self.set_caret(DocumentPosition::new(block_index, prev));
        Ok(())
    }

    /// Delete the grapheme after the caret (delete key)
    pub fn delete_forward(&mut self) -> EditResult {
        if !self.selection.is_collapsed() {
            self.delete_selection();
            return Ok(());
        }
        let pos = self.caret_position();
        let block = self
            .document
            .blocks_mut()
            .get_mut(pos.block_index)
            .ok_or(EditError::InvalidBlockIndex)?;

        if pos.offset >= block.text_len() {
            // At end of block - merge with next block
            self.document.join_with_next(pos.block_index);
        } else {
            let text = block.to_plain_text();
            let next = next_grapheme_boundary(&text, pos.offset).unwrap_or(text.len());
            block.delete_text_range(pos.offset, next);
        }
        self.set_caret(pos);
        Ok(())
    }

    pub fn select_all(&mut self) {
        self.selection = super::selection::select_all(&self.document);
    }
}

impl Default for StructuredEditor {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_color(value: &str) -> Result<Color, EditError> {
    Color::parse(value).ok_or_else(|| EditError::InvalidArgument(format!("unrecognized color {value:?}")))
}

/// If the caret sits on the outer edge of a link, the style new text gets
/// without joining the link
fn link_edge_style(block: &Block, point: SelectionPoint) -> Option<TextStyle> {
    let run = block.runs.get(point.run)?;
    let url = run.link_url()?;
    let shares_url = |index: Option<usize>| {
        index
            .and_then(|i| block.runs.get(i))
            .is_some_and(|r| r.link_url() == Some(url))
    };
    let at_end = point.offset >= run.len() && !shares_url(Some(point.run + 1));
    let at_start =
        point.offset == 0 && !run.is_empty() && !shares_url(point.run.checked_sub(1));
    (at_end || at_start).then_some(run.style)
}

/// `\r\n` and lone `\r` become `\n`, the only break the markup keeps
fn unify_line_breaks(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}
