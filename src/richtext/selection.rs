// Selection model
// Points are (block, run, offset-in-run); the editor converts them to flat
// block offsets before touching the document.

use super::structured_document::{DocumentPosition, StructuredDocument, floor_grapheme_boundary};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A location inside the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SelectionPoint {
    pub block: usize,
    pub run: usize,
    pub offset: usize,
}

impl SelectionPoint {
    pub fn new(block: usize, run: usize, offset: usize) -> Self {
        SelectionPoint { block, run, offset }
    }
}

/// Anchor is where the selection started, focus is where it ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Selection {
    pub anchor: SelectionPoint,
    pub focus: SelectionPoint,
}

impl Selection {
    pub fn new(anchor: SelectionPoint, focus: SelectionPoint) -> Self {
        Selection { anchor, focus }
    }

    pub fn caret(point: SelectionPoint) -> Self {
        Selection {
            anchor: point,
            focus: point,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }
}

/// Flat block offset of a point. Run indices past the end count as the end of the block.
pub fn point_to_position(doc: &StructuredDocument, point: SelectionPoint) -> DocumentPosition {
    let Some(block) = doc.blocks().get(point.block) else {
        return doc.clamp_position(DocumentPosition::new(point.block, 0));
    };
    if point.run >= block.runs.len() {
        return DocumentPosition::new(point.block, block.text_len());
    }
    let offset = point.offset.min(block.runs[point.run].len());
    DocumentPosition::new(point.block, block.run_start(point.run) + offset)
}

pub fn position_to_point(doc: &StructuredDocument, pos: DocumentPosition) -> SelectionPoint {
    let pos = doc.clamp_position(pos);
    match doc.blocks().get(pos.block_index) {
        Some(block) => {
            let (run, offset) = block.locate(pos.offset);
            SelectionPoint::new(pos.block_index, run, offset)
        }
        None => SelectionPoint::default(),
    }
}

/// Start and end of the selection in document order, as flat positions
pub fn ordered_positions(
    doc: &StructuredDocument,
    selection: &Selection,
) -> (DocumentPosition, DocumentPosition) {
    let a = point_to_position(doc, selection.anchor);
    let b = point_to_position(doc, selection.focus);
    if b < a { (b, a) } else { (a, b) }
}

fn clamp_point(doc: &StructuredDocument, point: SelectionPoint) -> SelectionPoint {
    let Some(block) = doc.blocks().get(point.block) else {
        // past the last block: end of the document
        let last = doc.block_count().saturating_sub(1);
        let len = doc.blocks().get(last).map(|b| b.text_len()).unwrap_or(0);
        return position_to_point(doc, DocumentPosition::new(last, len));
    };
    if block.runs.is_empty() {
        return SelectionPoint::new(point.block, 0, 0);
    }
    if point.run >= block.runs.len() {
        return position_to_point(doc, DocumentPosition::new(point.block, block.text_len()));
    }
    let run = &block.runs[point.run];
    let offset = floor_grapheme_boundary(&run.text, point.offset);
    SelectionPoint::new(point.block, point.run, offset)
}

/// Snap both endpoints onto existing locations of `doc`
pub fn clamp_to_document(selection: &Selection, doc: &StructuredDocument) -> Selection {
    Selection::new(
        clamp_point(doc, selection.anchor),
        clamp_point(doc, selection.focus),
    )
}

/// Collapse onto whichever endpoint comes later in the document
pub fn collapse_to_end(selection: &Selection, doc: &StructuredDocument) -> Selection {
    let (_, end) = ordered_positions(doc, selection);
    Selection::caret(position_to_point(doc, end))
}

/// Collapse onto whichever endpoint comes first in the document
pub fn collapse_to_start(selection: &Selection, doc: &StructuredDocument) -> Selection {
    let (start, _) = ordered_positions(doc, selection);
    Selection::caret(position_to_point(doc, start))
}

pub fn select_all(doc: &StructuredDocument) -> Selection {
    let last = doc.block_count().saturating_sub(1);
    let len = doc.blocks().get(last).map(|b| b.text_len()).unwrap_or(0);
    Selection::new(
        position_to_point(doc, DocumentPosition::start()),
        position_to_point(doc, DocumentPosition::new(last, len)),
    )
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid selection {0:?}, expected block:run:offset[..block:run:offset]")]
pub struct ParseSelectionError(String);

impl FromStr for SelectionPoint {
    type Err = ParseSelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        let [block, run, offset] = parts.as_slice() else {
            return Err(ParseSelectionError(s.to_string()));
        };
        let number = |v: &str| {
            v.parse::<usize>()
                .map_err(|_| ParseSelectionError(s.to_string()))
        };
        Ok(SelectionPoint::new(
            number(*block)?,
            number(*run)?,
            number(*offset)?,
        ))
    }
}

impl FromStr for Selection {
    type Err = ParseSelectionError;

    /// `"0:0:2"` is a caret, `"0:0:0..1:0:3"` a range from anchor to focus
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once("..") {
            Some((anchor, focus)) => Ok(Selection::new(anchor.parse()?, focus.parse()?)),
            None => Ok(Selection::caret(s.parse()?)),
        }
    }
}

impl fmt::Display for SelectionPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.block, self.run, self.offset)
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_collapsed() {
            write!(f, "{}", self.anchor)
        } else {
            write!(f, "{}..{}", self.anchor, self.focus)
        }
    }
}
