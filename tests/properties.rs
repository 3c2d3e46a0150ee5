use proptest::prelude::*;
use proptest::sample::Index;
use unibeautify_edits::{
    CancellationToken, Document, EditKind, EditProvider, FormattingOptions, LineEndings, Position,
    PrecomputedFormatter, Range, Settings, TextEdit, apply_edits, offset_at, position_at, synthesize_with,
    translate, validate_edits,
};

/// Short texts over a tiny alphabet so diffs share plenty of lines
///
/// A lone `\r` is ordinary line content.
fn text() -> impl Strategy<Value = String> {
    (prop::collection::vec("[abc\r]{0,3}", 0..12), any::<bool>()).prop_map(|(lines, trailing)| {
        let mut text = lines.join("\n");
        if trailing {
            text.push('\n');
        }
        text
    })
}

fn offset() -> impl Strategy<Value = Range> {
    (0u32..50, 0u32..50).prop_map(|(line, character)| {
        let pos = Position::new(line, character);
        Range::new(pos, pos)
    })
}

/// Free-form text where a range may start or end anywhere, mid-line included
fn loose_text() -> impl Strategy<Value = String> {
    "[ab\r\né ]{0,24}"
}

/// Byte offset of a character boundary of `text`, picked by `index`
fn boundary(text: &str, index: Index) -> usize {
    let boundaries: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    boundaries[index.index(boundaries.len())]
}

fn format_range(document: &Document, range: Range, formatted: &str) -> Vec<TextEdit> {
    let settings = Settings {
        line_endings: LineEndings::Preserve,
        ..Settings::default()
    };
    let provider = EditProvider::new(PrecomputedFormatter::new(formatted), settings);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    runtime
        .block_on(provider.provide_range_formatting_edits(
            document,
            range,
            &FormattingOptions::default(),
            &CancellationToken::new(),
        ))
        .unwrap()
}

proptest! {
    #[test]
    fn test_round_trip(original in text(), revised in text()) {
        let edits = synthesize_with(&original, &revised, LineEndings::Preserve);
        let edits = translate(&edits, Range::default());
        prop_assert_eq!(apply_edits(&original, &edits).unwrap(), revised);
    }

    #[test]
    fn test_equal_inputs_give_no_edits(original in text()) {
        prop_assert!(synthesize_with(&original, &original, LineEndings::Preserve).is_empty());
    }

    #[test]
    fn test_edits_are_ascending(original in text(), revised in text()) {
        let edits = synthesize_with(&original, &revised, LineEndings::Preserve);
        prop_assert!(validate_edits(&edits).is_ok());
        for pair in edits.windows(2) {
            prop_assert!(pair[0].range.start <= pair[1].range.start);
        }
    }

    #[test]
    fn test_translation_is_linear(
        original in text(),
        revised in text(),
        a in offset(),
        b in offset(),
    ) {
        let edits = synthesize_with(&original, &revised, LineEndings::Preserve);
        let sum = Position::new(a.start.line + b.start.line, a.start.character + b.start.character);

        prop_assert_eq!(
            translate(&translate(&edits, a), b),
            translate(&edits, Range::new(sum, sum))
        );
    }

    #[test]
    fn test_removed_run_then_added_run_is_one_replace(removed in 1usize..6, added in 1usize..6) {
        let old_block: String = (0..removed).map(|i| format!("old {}\n", i)).collect();
        let new_block: String = (0..added).map(|i| format!("new {}\n", i)).collect();
        let original = format!("head\n{}tail\n", old_block);
        let revised = format!("head\n{}tail\n", new_block);

        let edits = synthesize_with(&original, &revised, LineEndings::Preserve);
        prop_assert_eq!(edits.len(), 1);
        prop_assert_eq!(edits[0].kind(), EditKind::Replace);
        prop_assert_eq!(edits[0].range.start, Position::new(1, 0));
        prop_assert_eq!(edits[0].range.end, Position::new(1 + removed as u32, 0));
        prop_assert_eq!(&edits[0].new_text, &new_block);
    }

    #[test]
    fn test_range_formatting_splices_formatted_text(
        doc in loose_text(),
        formatted in loose_text(),
        a in any::<Index>(),
        b in any::<Index>(),
    ) {
        let (a, b) = (boundary(&doc, a), boundary(&doc, b));
        let range = Range::new(position_at(&doc, a.min(b)), position_at(&doc, a.max(b)));
        let start = offset_at(&doc, range.start);
        let end = offset_at(&doc, range.end);

        let document = Document::new(None, "plaintext", doc.as_str());
        let edits = format_range(&document, range, &formatted);

        let expected = format!("{}{}{}", &doc[..start], formatted, &doc[end..]);
        prop_assert_eq!(apply_edits(&doc, &edits).unwrap(), expected);
    }
}
