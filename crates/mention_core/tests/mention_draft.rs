use mention_core::{
    DraftError, MentionCandidate, MentionDraft, MentionMeta, MentionValidationError,
};
use uuid::Uuid;

const ALICE: &str = "11111111-1111-1111-1111-111111111111";
const BOB: &str = "22222222-2222-2222-2222-222222222222";

fn alice() -> MentionCandidate {
    MentionCandidate::new(Uuid::parse_str(ALICE).unwrap(), "Alice").unwrap()
}

#[test]
fn insert_mention_replaces_typed_query_and_saves_tokens() {
    let mut draft = MentionDraft::load(&format!("cc @[Bob]({BOB}) @ali"));
    assert_eq!(draft.display(), "cc @Bob @ali");

    let inserted = draft.insert_mention(8, 12, &alice()).unwrap();
    assert_eq!(inserted, MentionMeta::new(ALICE, "Alice", 8));
    assert_eq!(draft.display(), "cc @Bob @Alice");
    assert_eq!(draft.mentions().len(), 2);

    let saved = draft.save();
    assert_eq!(saved.stored, format!("cc @[Bob]({BOB}) @[Alice]({ALICE})"));
    assert_eq!(saved.kept, 2);
    assert_eq!(saved.dropped, 0);
}

#[test]
fn insert_mention_shifts_later_mentions() {
    let mut draft = MentionDraft::load(&format!("@ali meet @[Bob]({BOB})"));
    draft.insert_mention(0, 4, &alice()).unwrap();

    assert_eq!(draft.display(), "@Alice meet @Bob");
    assert_eq!(
        draft.mentions(),
        &[
            MentionMeta::new(ALICE, "Alice", 0),
            MentionMeta::new(BOB, "Bob", 12)
        ]
    );
    assert_eq!(
        draft.save().stored,
        format!("@[Alice]({ALICE}) meet @[Bob]({BOB})")
    );
}

#[test]
fn insert_mention_over_existing_mention_replaces_it() {
    let mut draft = MentionDraft::load(&format!("hi @[Bob]({BOB})"));
    draft.insert_mention(3, 7, &alice()).unwrap();

    assert_eq!(draft.display(), "hi @Alice");
    assert_eq!(draft.mentions(), &[MentionMeta::new(ALICE, "Alice", 3)]);
}

#[test]
fn insert_mention_rejects_invalid_candidates() {
    let mut draft = MentionDraft::load("hey @bo");

    let bracketed = MentionCandidate {
        id: Uuid::parse_str(BOB).unwrap(),
        name: "Bo]b".to_string(),
    };
    let err = draft.insert_mention(4, 7, &bracketed).unwrap_err();
    assert_eq!(
        err,
        DraftError::InvalidCandidate(MentionValidationError::InvalidName("Bo]b".to_string()))
    );

    let nil = MentionCandidate {
        id: Uuid::nil(),
        name: "Bob".to_string(),
    };
    let err = draft.insert_mention(4, 7, &nil).unwrap_err();
    assert_eq!(err, DraftError::InvalidCandidate(MentionValidationError::NilId));

    assert_eq!(draft.display(), "hey @bo");
    assert!(draft.mentions().is_empty());
}

#[test]
fn insert_mention_rejects_out_of_bounds_range() {
    let mut draft = MentionDraft::load("hey");
    let err = draft.insert_mention(5, 9, &alice()).unwrap_err();
    assert_eq!(
        err,
        DraftError::RangeOutOfBounds {
            start: 5,
            end: 9,
            len: 3
        }
    );
    assert!(err.to_string().contains("5..9"));
}

#[test]
fn editing_inside_a_mention_drops_it_on_save() {
    let mut draft = MentionDraft::load(&format!("hi @[Bob]({BOB})!"));
    draft.replace_range(4, 5, "R").unwrap();

    assert_eq!(draft.display(), "hi @Rob!");
    let saved = draft.save();
    assert_eq!(saved.stored, "hi @Rob!");
    assert_eq!(saved.kept, 0);
    assert_eq!(saved.dropped, 1);
    assert_eq!(
        saved.skipped,
        vec![MentionValidationError::LabelMismatch { start: 3, end: 7 }]
    );
}

#[test]
fn emoji_edits_shift_mentions_by_utf16_units() {
    let mut draft = MentionDraft::load(&format!("@ali says @[Bob]({BOB})"));
    draft.replace_range(0, 0, "🔥 ").unwrap();
    assert_eq!(draft.display(), "🔥 @ali says @Bob");
    assert_eq!(draft.mentions(), &[MentionMeta::new(BOB, "Bob", 13)]);

    draft.insert_mention(3, 7, &alice()).unwrap();
    assert_eq!(draft.display(), "🔥 @Alice says @Bob");
    assert_eq!(
        draft.mentions(),
        &[
            MentionMeta::new(ALICE, "Alice", 3),
            MentionMeta::new(BOB, "Bob", 15)
        ]
    );
    assert_eq!(
        draft.save().stored,
        format!("🔥 @[Alice]({ALICE}) says @[Bob]({BOB})")
    );
}

#[test]
fn edit_offsets_inside_a_surrogate_pair_are_rejected() {
    let mut draft = MentionDraft::load("😀 hi");
    let err = draft.replace_range(1, 2, "x").unwrap_err();
    assert_eq!(
        err,
        DraftError::RangeOutOfBounds {
            start: 1,
            end: 2,
            len: 5
        }
    );
    assert_eq!(draft.display(), "😀 hi");
}

#[test]
fn plain_edits_shift_mentions_for_accented_text() {
    let mut draft = MentionDraft::load(&format!("Zoë: @[Bob]({BOB})"));
    assert_eq!(draft.mentions(), &[MentionMeta::new(BOB, "Bob", 5)]);

    draft.replace_range(0, 3, "Zoe").unwrap();
    assert_eq!(draft.mentions()[0].start, 5);

    draft.replace_range(0, 0, "→ ").unwrap();
    assert_eq!(draft.display(), "→ Zoe: @Bob");
    assert_eq!(draft.mentions(), &[MentionMeta::new(BOB, "Bob", 7)]);
    assert_eq!(draft.save().stored, format!("→ Zoe: @[Bob]({BOB})"));
}

#[test]
fn edits_after_a_mention_leave_it_untouched() {
    let mut draft = MentionDraft::load(&format!("@[Bob]({BOB}) ok"));
    draft.replace_range(4, 7, " thanks").unwrap();

    assert_eq!(draft.display(), "@Bob thanks");
    assert_eq!(draft.mentions(), &[MentionMeta::new(BOB, "Bob", 0)]);
}

#[test]
fn from_parts_with_stale_state_reports_drop_count() {
    let draft = MentionDraft::from_parts(
        "Hi Alice and @Bob",
        vec![
            MentionMeta::new(ALICE, "Alice", 3),
            MentionMeta::new(BOB, "Bob", 13),
        ],
    );
    let saved = draft.save();
    assert_eq!(saved.stored, format!("Hi Alice and @[Bob]({BOB})"));
    assert_eq!(saved.kept, 1);
    assert_eq!(saved.dropped, 1);
    assert_eq!(
        saved.skipped,
        vec![MentionValidationError::LabelMismatch { start: 3, end: 9 }]
    );

    let decoded = draft.into_decoded();
    assert_eq!(decoded.mentions.len(), 2);
}
