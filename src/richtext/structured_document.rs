// Structured Document Model
// Blocks of styled text runs, independent of the markup used to store them.
// HTML is only used as a storage/serialization format (see html_converter).

use super::color::Color;
use serde::{Deserialize, Serialize};
use std::cmp::min;
use unicode_segmentation::UnicodeSegmentation;

/// Boolean inline styles that can be toggled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StyleKind {
    Bold,
    Italic,
    Underline,
    StrikeThrough,
    Superscript,
    Subscript,
}

impl StyleKind {
    pub const ALL: [StyleKind; 6] = [
        StyleKind::Bold,
        StyleKind::Italic,
        StyleKind::Underline,
        StyleKind::StrikeThrough,
        StyleKind::Superscript,
        StyleKind::Subscript,
    ];
}

/// Text styling (semantic, not syntactic)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub superscript: bool,
    pub subscript: bool,
    pub font_size: Option<u16>,
    pub text_color: Option<Color>,
    pub highlight: Option<Color>,
}

impl TextStyle {
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn bold() -> Self {
        TextStyle {
            bold: true,
            ..Default::default()
        }
    }

    pub fn italic() -> Self {
        TextStyle {
            italic: true,
            ..Default::default()
        }
    }

    pub fn get(&self, kind: StyleKind) -> bool {
        match kind {
            StyleKind::Bold => self.bold,
            StyleKind::Italic => self.italic,
            StyleKind::Underline => self.underline,
            StyleKind::StrikeThrough => self.strikethrough,
            StyleKind::Superscript => self.superscript,
            StyleKind::Subscript => self.subscript,
        }
    }

    /// Set a boolean style. Superscript and subscript exclude each other.
    pub fn set(&mut self, kind: StyleKind, on: bool) {
        match kind {
            StyleKind::Bold => self.bold = on,
            StyleKind::Italic => self.italic = on,
            StyleKind::Underline => self.underline = on,
            StyleKind::StrikeThrough => self.strikethrough = on,
            StyleKind::Superscript => {
                self.superscript = on;
                if on {
                    self.subscript = false;
                }
            }
            StyleKind::Subscript => {
                self.subscript = on;
                if on {
                    self.superscript = false;
                }
            }
        }
    }

    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }
}

/// Link destination attached to a run
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Link {
    pub url: String,
    /// The display text is the url itself
    pub auto_text: bool,
}

impl Link {
    pub fn new(url: impl Into<String>) -> Self {
        Link {
            url: url.into(),
            auto_text: false,
        }
    }
}

/// A run of styled text (a contiguous piece of text with uniform styling)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub style: TextStyle,
    pub link: Option<Link>,
    /// Verbatim markup of an element the editor does not understand.
    /// Such runs have no text, are never styled and are written back untouched.
    pub raw: Option<String>,
}

impl TextRun {
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        TextRun {
            text: text.into(),
            style,
            link: None,
            raw: None,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, TextStyle::plain())
    }

    /// Zero-length run carrying a style for text that has not been typed yet
    pub fn placeholder(style: TextStyle) -> Self {
        Self::new(String::new(), style)
    }

    pub fn opaque(raw: impl Into<String>) -> Self {
        TextRun {
            text: String::new(),
            style: TextStyle::plain(),
            link: None,
            raw: Some(raw.into()),
        }
    }

    pub fn with_link(mut self, link: Link) -> Self {
        self.link = Some(link);
        self
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn is_opaque(&self) -> bool {
        self.raw.is_some()
    }

    pub fn is_placeholder(&self) -> bool {
        self.text.is_empty() && self.raw.is_none()
    }

    pub fn link_url(&self) -> Option<&str> {
        self.link.as_ref().map(|l| l.url.as_str())
    }

    /// Two runs with the same format can be merged into one
    pub fn same_format(&self, other: &TextRun) -> bool {
        self.raw.is_none()
            && other.raw.is_none()
            && self.style == other.style
            && self.link_url() == other.link_url()
    }

    /// Split this text run at the given byte offset
    /// Returns (left_run, right_run)
    pub fn split_at(&self, offset: usize) -> (TextRun, TextRun) {
        let (left, right) = self.text.split_at(offset);
        let mut left_run = self.clone();
        left_run.text = left.to_string();
        let mut right_run = self.clone();
        right_run.text = right.to_string();
        (left_run, right_run)
    }
}

/// Largest grapheme boundary of `text` that is not past `offset`
pub fn floor_grapheme_boundary(text: &str, offset: usize) -> usize {
    if offset >= text.len() {
        return text.len();
    }
    let mut boundary = 0;
    for (idx, _) in text.grapheme_indices(true) {
        if idx > offset {
            break;
        }
        boundary = idx;
    }
    boundary
}

/// Grapheme boundary directly before `offset`
pub fn prev_grapheme_boundary(text: &str, offset: usize) -> Option<usize> {
    text.grapheme_indices(true)
        .map(|(idx, _)| idx)
        .take_while(|idx| *idx < offset)
        .last()
}

/// Grapheme boundary directly after `offset`
pub fn next_grapheme_boundary(text: &str, offset: usize) -> Option<usize> {
    text.grapheme_indices(true)
        .find(|(idx, _)| *idx >= offset)
        .map(|(idx, g)| idx + g.len())
}

/// Block-level content types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockType {
    Paragraph,
    BlockQuote,
    UnorderedList,
    OrderedList,
}

impl BlockType {
    pub fn is_list(&self) -> bool {
        matches!(self, BlockType::UnorderedList | BlockType::OrderedList)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// A block of content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub block_type: BlockType,
    pub alignment: Alignment,
    pub runs: Vec<TextRun>,
}

impl Block {
    pub fn new(block_type: BlockType) -> Self {
        Block {
            block_type,
            alignment: Alignment::Left,
            runs: Vec::new(),
        }
    }

    pub fn paragraph() -> Self {
        Self::new(BlockType::Paragraph)
    }

    pub fn with_text(mut self, text: impl Into<String>, style: TextStyle) -> Self {
        self.runs.push(TextRun::new(text, style));
        self
    }

    pub fn with_plain_text(mut self, text: impl Into<String>) -> Self {
        self.runs.push(TextRun::plain(text));
        self
    }

    pub fn with_run(mut self, run: TextRun) -> Self {
        self.runs.push(run);
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Get the total text length of this block
    pub fn text_len(&self) -> usize {
        self.runs.iter().map(|r| r.len()).sum()
    }

    /// Get plain text content
    pub fn to_plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Check if this block has no text
    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|r| r.is_empty())
    }

    /// Offset of the first character of run `index`
    pub fn run_start(&self, index: usize) -> usize {
        self.runs.iter().take(index).map(|r| r.len()).sum()
    }

    /// Find the run and in-run offset for a block offset.
    /// At a boundary between runs the earlier run wins, unless a placeholder
    /// sits exactly at the offset.
    pub fn locate(&self, offset: usize) -> (usize, usize) {
        let mut pos = 0;
        let mut found = None;
        for (i, run) in self.runs.iter().enumerate() {
            let len = run.len();
            if run.is_placeholder() && pos == offset {
                return (i, 0);
            }
            if found.is_none() && !run.is_opaque() && offset >= pos && offset <= pos + len {
                found = Some((i, offset - pos));
            }
            pos += len;
        }
        found.unwrap_or((0, 0))
    }

    /// Make sure a run boundary exists at `offset` and return the index of the
    /// first run starting at or after it
    pub fn split_runs_at(&mut self, offset: usize) -> usize {
        let mut pos = 0;
        for i in 0..self.runs.len() {
            if offset <= pos {
                return i;
            }
            let len = self.runs[i].len();
            if offset < pos + len {
                let local = floor_grapheme_boundary(&self.runs[i].text, offset - pos);
                if local == 0 {
                    return i;
                }
                let (left, right) = self.runs[i].split_at(local);
                self.runs[i] = left;
                self.runs.insert(i + 1, right);
                return i + 1;
            }
            pos += len;
        }
        self.runs.len()
    }

    /// Insert a run at a block offset, returning its index
    pub fn insert_run(&mut self, offset: usize, run: TextRun) -> usize {
        let index = self.split_runs_at(offset);
        self.runs.insert(index, run);
        index
    }

    /// Apply `apply` to every text run fully inside [start..end), splitting
    /// runs at the range edges first
    pub fn map_range<F>(&mut self, start: usize, end: usize, mut apply: F)
    where
        F: FnMut(&mut TextRun),
    {
        if start >= end {
            return;
        }
        let first = self.split_runs_at(start);
        let last = self.split_runs_at(end);
        for run in &mut self.runs[first..last] {
            if !run.is_opaque() && !run.is_empty() {
                apply(run);
            }
        }
    }

    /// Runs overlapping [start..end) with at least one character
    pub fn runs_in_range(&self, start: usize, end: usize) -> impl Iterator<Item = &TextRun> {
        let mut pos = 0;
        self.runs.iter().filter(move |run| {
            let run_start = pos;
            pos += run.len();
            !run.is_opaque() && !run.is_empty() && run_start < end && pos > start
        })
    }

    /// Delete text in [start..end) within this block
    pub fn delete_text_range(&mut self, start: usize, end: usize) {
        let len = self.text_len();
        let start = min(start, len);
        let end = min(end, len);
        if start >= end {
            return;
        }
        let mut first = self.split_runs_at(start);
        let last = self.split_runs_at(end);
        // zero-length runs sitting at the start edge are outside the range
        while first < last && self.runs[first].is_empty() {
            first += 1;
        }
        self.runs.drain(first..last);
    }

    /// Split this block's runs at an offset, returning the right part.
    /// The left part remains in self.
    pub fn split_content_at(&mut self, offset: usize) -> Vec<TextRun> {
        let offset = min(offset, self.text_len());
        let index = self.split_runs_at(offset);
        self.runs.split_off(index)
    }

    /// Enforce the run-compaction invariant: drop empty runs and merge
    /// neighbours that share one format
    pub fn merge_adjacent_runs(&mut self) {
        self.merge_adjacent_runs_keeping(None);
    }

    /// Like [`Block::merge_adjacent_runs`], but keeps the placeholder run at
    /// index `placeholder` if it still carries a format of its own.
    /// Returns the caret location (run, offset) that replaces the placeholder.
    pub fn merge_adjacent_runs_keeping(
        &mut self,
        placeholder: Option<usize>,
    ) -> Option<(usize, usize)> {
        let runs = std::mem::take(&mut self.runs);
        let mut merged: Vec<TextRun> = Vec::with_capacity(runs.len());
        let mut kept: Option<usize> = None;
        let mut caret = None;

        for (i, run) in runs.into_iter().enumerate() {
            if run.is_placeholder() {
                if placeholder != Some(i) {
                    continue;
                }
                if let Some(prev) = merged.last()
                    && prev.same_format(&run)
                {
                    caret = Some((merged.len() - 1, prev.len()));
                    continue;
                }
                merged.push(run);
                kept = Some(merged.len() - 1);
                caret = kept.map(|k| (k, 0));
                continue;
            }

            if let Some(k) = kept {
                if k + 1 == merged.len() && merged[k].same_format(&run) {
                    // the following text already has the pending format
                    merged[k] = run;
                    kept = None;
                    continue;
                }
                if k + 1 == merged.len() {
                    merged.push(run);
                    kept = None;
                    continue;
                }
            }

            match merged.last_mut() {
                Some(last) if last.same_format(&run) => last.text.push_str(&run.text),
                _ => merged.push(run),
            }
        }

        self.runs = merged;
        caret
    }

    /// Recompute the auto-text flag of every link: a group of adjacent runs
    /// sharing one url has auto text when its text equals the url
    pub fn refresh_link_flags(&mut self) {
        let mut i = 0;
        while i < self.runs.len() {
            let Some(url) = self.runs[i].link_url().map(str::to_string) else {
                i += 1;
                continue;
            };
            let mut j = i;
            let mut text = String::new();
            while j < self.runs.len() && self.runs[j].link_url() == Some(url.as_str()) {
                text.push_str(&self.runs[j].text);
                j += 1;
            }
            let auto_text = text == url;
            for run in &mut self.runs[i..j] {
                if let Some(link) = run.link.as_mut() {
                    link.auto_text = auto_text;
                }
            }
            i = j;
        }
    }

    /// No two neighbouring runs share a format
    pub fn is_compact(&self) -> bool {
        self.runs.windows(2).all(|w| !w[0].same_format(&w[1]))
    }
}

/// Position within a document: block plus byte offset into the block's
/// concatenated run text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentPosition {
    pub block_index: usize,
    pub offset: usize,
}

impl DocumentPosition {
    pub fn new(block_index: usize, offset: usize) -> Self {
        DocumentPosition {
            block_index,
            offset,
        }
    }

    pub fn start() -> Self {
        DocumentPosition::new(0, 0)
    }
}

/// The structured document
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StructuredDocument {
    blocks: Vec<Block>,
}

impl StructuredDocument {
    pub fn new() -> Self {
        StructuredDocument { blocks: Vec::new() }
    }

    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        StructuredDocument { blocks }
    }

    /// Create a simple document with one paragraph
    pub fn with_paragraph(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut block = Block::paragraph();
        if !text.is_empty() {
            block.runs.push(TextRun::plain(text));
        }
        StructuredDocument::from_blocks(vec![block])
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn blocks_mut(&mut self) -> &mut Vec<Block> {
        &mut self.blocks
    }

    pub fn add_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn insert_block(&mut self, index: usize, block: Block) {
        self.blocks.insert(index, block);
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// A single empty left-aligned paragraph, which stores as nothing
    pub fn is_blank(&self) -> bool {
        match self.blocks.as_slice() {
            [] => true,
            [block] => {
                block.block_type == BlockType::Paragraph
                    && block.alignment == Alignment::Left
                    && block.runs.iter().all(|r| r.is_placeholder())
            }
            _ => false,
        }
    }

    /// Validate and clamp a position to document bounds
    pub fn clamp_position(&self, pos: DocumentPosition) -> DocumentPosition {
        if self.blocks.is_empty() {
            return DocumentPosition::start();
        }
        if pos.block_index >= self.blocks.len() {
            let last = self.blocks.len() - 1;
            return DocumentPosition::new(last, self.blocks[last].text_len());
        }
        let block = &self.blocks[pos.block_index];
        let text = block.to_plain_text();
        let offset = floor_grapheme_boundary(&text, pos.offset);
        DocumentPosition::new(pos.block_index, offset)
    }

    /// Convert to plain text
    pub fn to_plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|b| b.to_plain_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn word_count(&self) -> usize {
        self.blocks
            .iter()
            .map(|b| b.to_plain_text().split_whitespace().count())
            .sum()
    }

    /// Text runs with at least one character inside [start..end)
    pub fn runs_in_range(
        &self,
        start: DocumentPosition,
        end: DocumentPosition,
    ) -> impl Iterator<Item = &TextRun> {
        self.blocks
            .iter()
            .enumerate()
            .skip(start.block_index)
            .take_while(move |(i, _)| *i <= end.block_index)
            .flat_map(move |(i, block)| {
                let from = if i == start.block_index { start.offset } else { 0 };
                let to = if i == end.block_index {
                    end.offset
                } else {
                    usize::MAX
                };
                block.runs_in_range(from, to)
            })
    }

    /// Re-establish the structural invariants: at least one block, compact
    /// runs, consistent link flags
    pub fn normalize(&mut self) {
        if self.blocks.is_empty() {
            self.blocks.push(Block::paragraph());
        }
        for block in &mut self.blocks {
            block.merge_adjacent_runs();
            block.refresh_link_flags();
        }
    }

    pub fn normalized(&self) -> Self {
        let mut doc = self.clone();
        doc.normalize();
        doc
    }

    /// Delete content in [start..end) across blocks.
    /// If the range spans multiple blocks, merges the tail of the end block into the start block
    /// and removes all fully-covered blocks in between.
    pub fn delete_range(&mut self, start: DocumentPosition, end: DocumentPosition) {
        if self.blocks.is_empty() {
            return;
        }
        let mut a = self.clamp_position(start);
        let mut b = self.clamp_position(end);
        if b < a {
            std::mem::swap(&mut a, &mut b);
        }

        if a.block_index == b.block_index {
            self.blocks[a.block_index].delete_text_range(a.offset, b.offset);
            return;
        }

        // Delete tail of start block
        {
            let block = &mut self.blocks[a.block_index];
            let len = block.text_len();
            block.delete_text_range(a.offset, len);
        }

        // Keep the part of the end block after the range
        let tail = self.blocks[b.block_index].split_content_at(b.offset);

        // Remove every block after the start block up to and including the end block
        self.blocks.drain(a.block_index + 1..=b.block_index);

        self.blocks[a.block_index].runs.extend(tail);
    }

    /// Merge block `index + 1` into block `index`
    pub fn join_with_next(&mut self, index: usize) -> bool {
        if index + 1 >= self.blocks.len() {
            return false;
        }
        let next = self.blocks.remove(index + 1);
        self.blocks[index].runs.extend(next.runs);
        true
    }
}
