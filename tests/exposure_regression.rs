//! End-to-end exposure checks over the public API.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use matka::ank::{ank, double_patti_table, single_patti_table, triple_patti_table};
use matka::classify::{classify_patti, is_canonical_double, PattiKind};
use matka::exposure::{ExclusionReason, ExposureAggregator, ExposurePreviewService};
use matka::types::{GameType, Round, Session, Wager};

fn make_round() -> Round {
    let mut round = Round::new("R-7", "Kalyan", NaiveDate::from_ymd_opt(2026, 3, 14).unwrap());
    round.opening_number = Some("123".to_string());
    round
}

fn make_book() -> Vec<Wager> {
    let w = |label: &str, n: &str, a: Decimal, s: Session, b: &str| {
        Wager::with_label("R-7", label, n, a, s, b)
    };
    vec![
        w("single", "6", dec!(100), Session::Open, "u1"),
        w("sd", "5", dec!(50), Session::Close, "u2"),
        w("jodi", "65", dec!(30), Session::Close, "u3"),
        w("Single Pana", "123", dec!(20), Session::Open, "u1"),
        w("panna", "456", dec!(15), Session::Close, "u4"),
        w("panna", "550", dec!(12), Session::Close, "u4"),
        w("tp", "777", dec!(8), Session::Open, "u5"),
        w("hs", "123-5", dec!(7), Session::Close, "u6"),
        w("full sangam", "123-456", dec!(3), Session::Close, "u7"),
        // excluded
        w("lottery", "6", dec!(40), Session::Open, "u8"),
        w("sp", "112", dec!(9), Session::Open, "u8"),
        w("dp", "121", dec!(6), Session::Close, "u8"),
        w("jodi", "6", dec!(4), Session::Close, "u8"),
        w("sd", "1", dec!(0), Session::Open, "u9"),
        w("sd", "2", dec!(-5), Session::Open, "u9"),
        // another round
        Wager::new("R-8", GameType::SingleDigit, "6", dec!(999), Session::Close, "u1"),
    ]
}

#[test]
fn test_patti_partition_of_all_three_digit_strings() {
    let (mut single, mut double, mut triple) = (0, 0, 0);
    for n in 0..1000 {
        match classify_patti(&format!("{n:03}")) {
            Some(PattiKind::Single) => single += 1,
            Some(PattiKind::Double) => double += 1,
            Some(PattiKind::Triple) => triple += 1,
            None => {}
        }
    }
    assert_eq!((single, double, triple), (720, 90, 10));
}

#[test]
fn test_tables_match_classifier() {
    assert_eq!(single_patti_table().len(), 120);
    assert_eq!(double_patti_table().len(), 90);
    assert_eq!(triple_patti_table().len(), 10);

    for n in 0..1000 {
        let s = format!("{n:03}");
        let is_double = classify_patti(&s) == Some(PattiKind::Double);
        assert_eq!(double_patti_table().contains(&s), is_double, "{s}");
        if is_double {
            let [a, b, c]: [u8; 3] = std::array::from_fn(|i| s.as_bytes()[i] - b'0');
            assert!(is_canonical_double(a, b, c));
            assert!(double_patti_table().group(ank(&s).unwrap()).contains(&s));
        }
    }
    for member in single_patti_table().members() {
        assert_eq!(classify_patti(member), Some(PattiKind::Single));
    }
}

#[test]
fn test_conservation_of_money() {
    let wagers: Vec<Wager> = make_book().into_iter().filter(|w| w.round_id == "R-7").collect();
    let report = ExposureAggregator::aggregate(&wagers, None);

    let all: Decimal = wagers.iter().map(|w| w.amount).sum();
    assert_eq!(report.grand_total() + report.excluded.amount, all);
    assert_eq!(report.grand_total(), dec!(245));
    assert_eq!(report.excluded.count, 6);
    assert_eq!(report.excluded.count_for(ExclusionReason::UnknownLabel), 1);
    assert_eq!(report.excluded.count_for(ExclusionReason::InvalidNumber), 3);
    assert_eq!(report.excluded.count_for(ExclusionReason::NonPositiveAmount), 2);

    let split = ExposureAggregator::aggregate_by_session(&wagers);
    assert_eq!(
        split.open.grand_total() + split.close.grand_total(),
        report.grand_total()
    );
}

#[test]
fn test_panna_label_resolves_by_number() {
    let wagers = make_book();
    let report = ExposureAggregator::aggregate(&wagers[..9], None);
    assert_eq!(report.category(GameType::SinglePatti).unwrap().amount_on("456"), dec!(15));
    assert_eq!(report.category(GameType::DoublePatti).unwrap().amount_on("550"), dec!(12));
    assert_eq!(report.category(GameType::TriplePatti).unwrap().amount_on("777"), dec!(8));
}

#[test]
fn test_close_preview_and_idempotence() {
    let round = make_round();
    let wagers = make_book();
    let before = wagers.clone();

    let first = ExposurePreviewService::preview(&round, Session::Close, "456", &wagers);
    let second = ExposurePreviewService::preview(&round, Session::Close, "456", &wagers);
    assert_eq!(first, second);
    assert_eq!(wagers, before);
    assert!(round.closing_number.is_none());

    // 50 (sd 5) + 15 (456) + 30 (jodi 65) + 7 (123-5) + 3 (123-456); R-8 is out of scope
    assert_eq!(first.amount_on_candidate, dec!(105));
    assert_eq!(first.hits.len(), 5);
    assert_eq!(first.bettor_count_on_candidate, 5);
}
