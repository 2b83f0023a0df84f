// Invariants that must hold for any document the editor can produce

use journal_richtext::engine::Engine;
use journal_richtext::palette::{COLOR_PALETTE, FONT_SIZES};
use journal_richtext::richtext::html_converter::{document_to_html, html_to_document};
use journal_richtext::richtext::selection::{Selection, SelectionPoint, ordered_positions};
use journal_richtext::richtext::structured_document::{Alignment, StructuredDocument, StyleKind};
use journal_richtext::richtext::structured_editor::{EditCommand, ListKind};
use journal_richtext::richtext::theme::{ThemeMode, sanitized};
use proptest::prelude::*;

const SEEDS: &[&str] = &[
    "",
    "<p>hello world</p>",
    "<p>one</p><p>two <b>bold</b> three</p>",
    r#"<blockquote>quoted <span style="color: #000000">dark</span></blockquote><ul><li>a</li><li>b</li></ul>"#,
    r#"<p style="text-align: right"><span style="background-color: #ffffff">white</span> and <a href="https://example.com">link</a></p>"#,
    "<ol><li><i>first</i></li></ol><p>x<sup>2</sup></p>",
];

fn style_kind() -> impl Strategy<Value = StyleKind> {
    prop::sample::select(StyleKind::ALL.to_vec())
}

fn color() -> impl Strategy<Value = String> {
    prop::sample::select(COLOR_PALETTE.to_vec()).prop_map(str::to_string)
}

fn inline_command() -> impl Strategy<Value = EditCommand> {
    prop_oneof![
        style_kind().prop_map(|style| EditCommand::ToggleStyle { style }),
        prop::sample::select(FONT_SIZES.to_vec()).prop_map(|px| EditCommand::SetFontSize { px }),
        color().prop_map(|color| EditCommand::SetTextColor { color }),
        color().prop_map(|color| EditCommand::SetHighlightColor { color }),
        "[a-z \r\n]{1,6}".prop_map(|text| EditCommand::InsertText { text }),
        prop::sample::select(vec!["🙂", "❤️", "👍🏽"])
            .prop_map(|emoji| EditCommand::InsertEmoji { emoji: emoji.into() }),
        (
            prop::sample::select(vec!["example.com", "https://a.b/c?d=1&e=2"]),
            "[a-z]{0,4}"
        )
            .prop_map(|(url, text)| EditCommand::InsertLink {
                url: url.into(),
                text
            }),
        Just(EditCommand::ClearFormatting),
    ]
}

fn block_command() -> impl Strategy<Value = EditCommand> {
    prop_oneof![
        prop::sample::select(vec![Alignment::Left, Alignment::Center, Alignment::Right])
            .prop_map(|alignment| EditCommand::SetAlignment { alignment }),
        prop::sample::select(vec![ListKind::Bullet, ListKind::Numbered])
            .prop_map(|kind| EditCommand::ToggleList { kind }),
        Just(EditCommand::ToggleBlockquote),
        Just(EditCommand::InsertParagraph),
        Just(EditCommand::DeleteBackward),
        Just(EditCommand::DeleteForward),
        Just(EditCommand::SelectAll),
    ]
}

fn command() -> impl Strategy<Value = EditCommand> {
    prop_oneof![3 => inline_command(), 2 => block_command()]
}

fn point() -> impl Strategy<Value = SelectionPoint> {
    (0usize..4, 0usize..5, 0usize..12)
        .prop_map(|(block, run, offset)| SelectionPoint::new(block, run, offset))
}

fn selection() -> impl Strategy<Value = Selection> {
    prop_oneof![
        point().prop_map(Selection::caret),
        (point(), point()).prop_map(|(anchor, focus)| Selection::new(anchor, focus)),
    ]
}

/// An engine after a random editing session
fn session() -> impl Strategy<Value = Engine> {
    (
        prop::sample::select(SEEDS.to_vec()),
        prop::collection::vec((selection(), command()), 0..12),
    )
        .prop_map(|(seed, steps)| {
            let mut engine = Engine::initialize(seed, ThemeMode::Light);
            for (selection, command) in steps {
                engine.set_selection(selection);
                engine.dispatch(&command);
            }
            engine
        })
}

fn assert_compact(doc: &StructuredDocument) -> Result<(), TestCaseError> {
    for (index, block) in doc.blocks().iter().enumerate() {
        prop_assert!(block.is_compact(), "block {index} has mergeable runs: {block:?}");
    }
    Ok(())
}

proptest! {
    #[test]
    fn serialized_markup_reads_back(engine in session()) {
        let doc = engine.document();
        let markup = document_to_html(doc);
        prop_assert_eq!(html_to_document(&markup), doc.normalized(), "markup: {}", markup);
        prop_assert_eq!(document_to_html(&html_to_document(&markup)), markup);
    }

    #[test]
    fn sanitizing_twice_changes_nothing(engine in session()) {
        let once = sanitized(engine.document(), ThemeMode::Dark);
        prop_assert_eq!(sanitized(&once, ThemeMode::Dark), once);
    }

    #[test]
    fn runs_stay_merged_after_every_command(
        seed in prop::sample::select(SEEDS.to_vec()),
        steps in prop::collection::vec((selection(), command()), 1..12),
    ) {
        let mut engine = Engine::initialize(seed, ThemeMode::Light);
        assert_compact(engine.document())?;
        for (selection, command) in steps {
            engine.set_selection(selection);
            engine.dispatch(&command);
            assert_compact(engine.document())?;
        }
    }

    #[test]
    fn toggling_twice_restores_styles(
        mut engine in session(),
        range in (point(), point()).prop_map(|(a, f)| Selection::new(a, f)),
        kind in prop::sample::select(vec![
            StyleKind::Bold,
            StyleKind::Italic,
            StyleKind::Underline,
            StyleKind::StrikeThrough,
        ]),
    ) {
        engine.set_selection(range);
        // a partly styled range is not an involution: the first toggle applies everywhere
        let covered: Vec<bool> = {
            let doc = engine.document();
            let (start, end) = ordered_positions(doc, &engine.selection());
            doc.runs_in_range(start, end).map(|r| r.style.get(kind)).collect()
        };
        prop_assume!(covered.iter().all(|on| *on) || covered.iter().all(|on| !*on));

        let before = engine.document().normalized();
        engine.dispatch(&EditCommand::ToggleStyle { style: kind });
        engine.dispatch(&EditCommand::ToggleStyle { style: kind });
        prop_assert_eq!(engine.document().normalized(), before);
    }
}
