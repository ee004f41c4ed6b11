// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use serde_json::json;

use crate::error::ErrorKind;
use crate::games::backgammon::{expected_score, WinType, Winner};
use crate::games::yahtzee::Category;
use crate::games::ReplayContext;
use crate::rng::shuffle;
use crate::seed::{derive_anchored, PURPOSE_DECK_SHUFFLE};
use crate::submission::Submission;
use crate::tests::fixtures::{anchor, backgammon, reveal, solitaire, validate, yahtzee, yahtzee_card, SECRET};
use crate::types::enums::Difficulty;

#[test]
fn backgammon_formula() {
    assert_eq!(expected_score(Winner::Player, WinType::Normal, 2, Difficulty::Medium), 4);
    assert_eq!(expected_score(Winner::Player, WinType::Backgammon, 64, Difficulty::Hard), 576);
    assert_eq!(expected_score(Winner::Opponent, WinType::Gammon, 8, Difficulty::Hard), 0);

    let report = validate(&backgammon("normal", 2, "medium", 4), &ReplayContext::default()).unwrap();
    assert_eq!(report.calculated_score, 4);
}

#[test]
fn backgammon_inflated_claim_names_expected() {
    let err = validate(&backgammon("normal", 2, "medium", 5), &ReplayContext::default()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::ReplayMismatch);
    assert_eq!(err.detail["expected"], 4);
    assert_eq!(err.detail["actual"], 5);
}

#[test]
fn backgammon_cube_must_be_a_power_of_two() {
    let err = validate(&backgammon("normal", 3, "easy", 3), &ReplayContext::default()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::OutOfRange);
    assert_eq!(err.detail["cubeValue"], 3);
}

#[test]
fn backgammon_too_few_turns() {
    let mut value = backgammon("normal", 1, "easy", 1);
    value["moves"] = json!(3);
    let err = validate(&value, &ReplayContext::default()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::OutOfRange);
    assert_eq!(err.detail["min"], 7);
}

#[test]
fn solitaire_full_clear_in_ten_moves_is_impossible() {
    let err = validate(&solitaire(52, 10), &ReplayContext::default()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::OutOfRange);
    assert_eq!(err.detail["moves"], 10);
}

#[test]
fn solitaire_score_equals_foundation() {
    let report = validate(&solitaire(52, 180), &ReplayContext::default()).unwrap();
    assert_eq!(report.calculated_score, 52);

    let mut claimed = solitaire(30, 180);
    claimed["score"] = json!(31);
    let err = validate(&claimed, &ReplayContext::default()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::ReplayMismatch);
}

fn seeded_deck() -> Vec<u8> {
    let seed = derive_anchored(SECRET, &anchor(), PURPOSE_DECK_SHUFFLE);
    shuffle(&seed, 52).into_iter().map(|c| c as u8).collect()
}

#[test]
fn solitaire_deal_matches_seed() {
    let ctx = ReplayContext::new(Some(reveal()), Some(anchor()));
    let mut value = solitaire(40, 300);
    value["deckOrder"] = json!(seeded_deck());
    let report = validate(&value, &ctx).unwrap();
    assert_eq!(report.details["deckVerified"], true);
}

#[test]
fn solitaire_swapped_deal_is_rejected() {
    let ctx = ReplayContext::new(Some(reveal()), Some(anchor()));
    let mut deck = seeded_deck();
    deck.swap(10, 11);
    let mut value = solitaire(40, 300);
    value["deckOrder"] = json!(deck);
    let err = validate(&value, &ctx).unwrap_err();
    assert_eq!(err.kind, ErrorKind::ReplayMismatch);
    assert_eq!(err.detail["index"], 10);
}

#[test]
fn solitaire_deal_without_reveal_is_a_warning() {
    let mut value = solitaire(40, 300);
    value["deckOrder"] = json!(seeded_deck());
    let report = validate(&value, &ReplayContext::default()).unwrap();
    assert_eq!(report.details["deckVerified"], false);
    assert_eq!(report.warnings.len(), 1);
}

#[test]
fn solitaire_deck_with_duplicates_is_invalid() {
    let mut deck = seeded_deck();
    deck[5] = deck[6];
    let mut value = solitaire(40, 300);
    value["deckOrder"] = json!(deck);
    let err = validate(&value, &ReplayContext::default()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArgument);
}

#[test]
fn yahtzee_category_scoring() {
    assert_eq!(Category::FullHouse.score(&[2, 2, 3, 3, 3]).unwrap(), 25);
    assert_eq!(Category::FullHouse.score(&[3, 3, 3, 3, 3]).unwrap(), 0);
    assert_eq!(Category::SmallStraight.score(&[3, 4, 5, 6, 6]).unwrap(), 30);
    assert_eq!(Category::LargeStraight.score(&[2, 3, 4, 5, 6]).unwrap(), 40);
    assert_eq!(Category::FourOfAKind.score(&[2, 2, 2, 6, 6]).unwrap(), 0);
    assert_eq!(Category::Sixes.score(&[6, 6, 1, 6, 2]).unwrap(), 18);
}

#[test]
fn impossible_die_is_out_of_range_not_a_panic() {
    let err = Category::Chance.score(&[1, 2, 3, 4, 7]).unwrap_err();
    assert_eq!(err.kind, ErrorKind::OutOfRange);

    // Replay without the format stage still refuses the face.
    let mut card = yahtzee_card();
    card["chance"] = json!({ "dice": [1, 2, 3, 4, 9], "score": 19 });
    let submission = Submission::parse(&yahtzee(card, 294)).unwrap();
    let err = submission.replay(&ReplayContext::default()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::OutOfRange);
}

#[test]
fn yahtzee_card_with_bonus() {
    let report = validate(&yahtzee(yahtzee_card(), 290), &ReplayContext::default()).unwrap();
    assert_eq!(report.calculated_score, 290);
    assert_eq!(report.details["upperBonus"], true);
}

#[test]
fn yahtzee_misscored_box_is_rejected() {
    let mut card = yahtzee_card();
    card["full_house"]["score"] = json!(30);
    let err = validate(&yahtzee(card, 295), &ReplayContext::default()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::ReplayMismatch);
    assert_eq!(err.detail["category"], "FullHouse");
    assert_eq!(err.detail["expected"], 25);
}

#[test]
fn yahtzee_partial_card_is_out_of_range() {
    let mut card = yahtzee_card();
    card.as_object_mut().unwrap().remove("chance");
    let err = validate(&yahtzee(card, 275), &ReplayContext::default()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::OutOfRange);
}

#[test]
fn yahtzee_unknown_category_is_invalid() {
    let mut card = yahtzee_card();
    card["bingo"] = json!({ "dice": [1, 1, 1, 1, 1], "score": 5 });
    let err = validate(&yahtzee(card, 290), &ReplayContext::default()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArgument);
}
