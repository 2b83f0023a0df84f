// Host-facing editing session
//
// One Engine per open editing surface; every call answers with the
// serialized markup and the toolbar readout.

use crate::config::EditorConfig;
use crate::richtext::format_state::FormatState;
use crate::richtext::html_converter::{document_to_html, html_to_document_with};
use crate::richtext::selection::Selection;
use crate::richtext::structured_document::StructuredDocument;
use crate::richtext::structured_editor::{EditCommand, StructuredEditor};
use crate::richtext::theme::ThemeMode;
use serde::Serialize;

/// What the host receives after every state change
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedResult {
    pub markup: String,
    pub active_format_state: FormatState,
    /// False when `markup` equals the previously emitted markup
    pub changed: bool,
    pub word_count: usize,
}

#[derive(Debug, Clone)]
pub struct Engine {
    editor: StructuredEditor,
    last_emitted: String,
    saved: String,
}

impl Engine {
    /// Open a session on `markup`. Never fails; unusable markup is reduced
    /// to its plain text.
    pub fn initialize(markup: &str, theme: ThemeMode) -> Self {
        Self::with_config(markup, theme, EditorConfig::default())
    }

    pub fn with_config(markup: &str, theme: ThemeMode, config: EditorConfig) -> Self {
        let document = html_to_document_with(markup, &config);
        let mut editor = StructuredEditor::with_config(document, theme, config);
        let saved = document_to_html(editor.document());
        if editor.sanitize() {
            tracing::debug!(%theme, "sanitized colors on open");
        }
        let last_emitted = document_to_html(editor.document());
        Engine {
            editor,
            last_emitted,
            saved,
        }
    }

    /// Run one command. A command that cannot apply leaves the state as it
    /// was and is only logged.
    pub fn dispatch(&mut self, command: &EditCommand) -> SerializedResult {
        tracing::trace!(command = command.name(), "dispatch");
        match self.editor.apply(command) {
            Ok(()) => {
                if self.editor.theme().is_dark() {
                    self.editor.sanitize();
                }
            }
            Err(err) => {
                tracing::debug!(command = command.name(), error = %err, "command ignored");
            }
        }
        self.emit()
    }

    /// Switch theme and run the sanitizer over the whole document
    pub fn set_theme(&mut self, theme: ThemeMode) -> SerializedResult {
        if self.editor.set_theme(theme) {
            tracing::debug!(%theme, "theme change rewrote colors");
        }
        self.emit()
    }

    /// Report the host's current selection. It is clamped onto the document.
    pub fn set_selection(&mut self, selection: Selection) -> FormatState {
        self.editor.set_selection(selection);
        self.editor.format_state()
    }

    pub fn selection(&self) -> Selection {
        self.editor.selection()
    }

    pub fn document(&self) -> &StructuredDocument {
        self.editor.document()
    }

    pub fn theme(&self) -> ThemeMode {
        self.editor.theme()
    }

    pub fn format_state(&self) -> FormatState {
        self.editor.format_state()
    }

    pub fn markup(&self) -> String {
        document_to_html(self.editor.document())
    }

    pub fn word_count(&self) -> usize {
        self.editor.document().word_count()
    }

    /// True if the markup differs from what was opened or last saved
    pub fn has_unsaved_changes(&self) -> bool {
        self.markup() != self.saved
    }

    /// Record that the host persisted the current markup
    pub fn mark_saved(&mut self) {
        self.saved = self.markup();
    }

    /// Current state, without counting as an emission
    pub fn snapshot(&self) -> SerializedResult {
        SerializedResult {
            markup: self.markup(),
            active_format_state: self.editor.format_state(),
            changed: false,
            word_count: self.word_count(),
        }
    }

    fn emit(&mut self) -> SerializedResult {
        let mut result = self.snapshot();
        result.changed = result.markup != self.last_emitted;
        if result.changed {
            self.last_emitted.clone_from(&result.markup);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::richtext::color::Color;
    use crate::richtext::selection::SelectionPoint;
    use crate::richtext::structured_document::StyleKind;

    fn bold() -> EditCommand {
        EditCommand::ToggleStyle {
            style: StyleKind::Bold,
        }
    }

    #[test]
    fn test_dispatch_reports_changes() {
        let mut engine = Engine::initialize("<p>hello</p>", ThemeMode::Light);
        engine.dispatch(&EditCommand::SelectAll);

        let result = engine.dispatch(&bold());
        assert_eq!(result.markup, "<p><b>hello</b></p>");
        assert!(result.changed);
        assert!(result.active_format_state.bold);
        assert_eq!(result.word_count, 1);

        let result = engine.dispatch(&EditCommand::SetFontSize { px: 17 });
        assert!(!result.changed);
        assert_eq!(result.markup, "<p><b>hello</b></p>");
    }

    #[test]
    fn test_unsaved_changes() {
        let mut engine = Engine::initialize("<p>a</p>", ThemeMode::Light);
        assert!(!engine.has_unsaved_changes());
        engine.set_selection(Selection::caret(SelectionPoint::new(0, 0, 1)));
        engine.dispatch(&EditCommand::InsertText { text: "b".into() });
        assert!(engine.has_unsaved_changes());
        engine.mark_saved();
        assert!(!engine.has_unsaved_changes());
    }

    #[test]
    fn test_dark_open_sanitizes() {
        let engine = Engine::initialize(
            r#"<p><span style="color: #000000">x</span></p>"#,
            ThemeMode::Dark,
        );
        assert_eq!(engine.markup(), "<p>x</p>");
        assert!(engine.has_unsaved_changes());
    }

    #[test]
    fn test_set_theme() {
        let mut engine = Engine::initialize(
            r#"<p><span style="background-color: #ffffff">x</span></p>"#,
            ThemeMode::Light,
        );
        let result = engine.set_theme(ThemeMode::Dark);
        assert_eq!(result.markup, "<p>x</p>");
        assert!(result.changed);
        assert_eq!(result.active_format_state.highlight_color, Color::Transparent);
        assert!(!engine.set_theme(ThemeMode::Dark).changed);
    }

    #[test]
    fn test_empty_markup() {
        let mut engine = Engine::initialize("", ThemeMode::Light);
        assert_eq!(engine.markup(), "");
        let result = engine.dispatch(&EditCommand::InsertEmoji {
            emoji: "🙂".into(),
        });
        assert_eq!(result.markup, "<p>🙂</p>");
        assert_eq!(engine.selection(), Selection::caret(SelectionPoint::new(0, 0, 4)));
    }

    #[test]
    fn test_caret_toggle_inside_run_is_not_a_change() {
        let mut engine = Engine::initialize("<p><b>bold</b></p>", ThemeMode::Light);
        engine.set_selection(Selection::caret(SelectionPoint::new(0, 0, 1)));

        let result = engine.dispatch(&bold());
        assert_eq!(result.markup, "<p><b>bold</b></p>");
        assert!(!result.changed);
        assert!(!result.active_format_state.bold);
        assert!(!engine.has_unsaved_changes());
    }
}
