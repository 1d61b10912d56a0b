// ABOUTME: Integration tests for the attention rule evaluator
// ABOUTME: Verifies rule matching, blocking partition, and deterministic evaluation

mod common;

use orderflow::{evaluate, failure_flags, OrderDocument, Reason, RulePolicy};

use common::OrderFixture;

fn document(fixture: &OrderFixture) -> OrderDocument {
    serde_json::from_value(fixture.to_json()).unwrap()
}

#[test]
fn test_clean_order_produces_no_reasons() {
    let doc = document(&OrderFixture::clean("PO-1"));
    assert!(evaluate(&doc, &RulePolicy::default()).is_empty());
}

#[test]
fn test_due_soon_is_advisory() {
    let doc = document(
        &OrderFixture::clean("PO-1")
            .with_order_date("2025-06-18")
            .with_due_date("2025-06-20"),
    );

    let reasons = evaluate(&doc, &RulePolicy::default());
    assert_eq!(reasons, vec![Reason::DueSoon]);
    assert!(failure_flags(&reasons).is_empty());
}

#[test]
fn test_due_soon_window_boundary() {
    let policy = RulePolicy::default();

    // Exactly seven days out still matches.
    let doc = document(
        &OrderFixture::clean("PO-1")
            .with_order_date("2025-06-18")
            .with_due_date("2025-06-25"),
    );
    assert_eq!(evaluate(&doc, &policy), vec![Reason::DueSoon]);

    // Eight days out does not.
    let doc = document(
        &OrderFixture::clean("PO-1")
            .with_order_date("2025-06-18")
            .with_due_date("2025-06-26"),
    );
    assert!(evaluate(&doc, &policy).is_empty());
}

#[test]
fn test_evaluation_is_reproducible_for_historical_orders() {
    // Dates far in the past: the anchor is the order date, so the outcome
    // never depends on when the evaluation runs.
    let doc = document(
        &OrderFixture::clean("PO-1")
            .with_order_date("2019-01-10")
            .with_due_date("2019-01-12"),
    );

    let first = evaluate(&doc, &RulePolicy::default());
    let second = evaluate(&doc, &RulePolicy::default());
    assert_eq!(first, vec![Reason::DueSoon]);
    assert_eq!(first, second);
}

#[test]
fn test_missing_fields_is_blocking_for_every_required_field() {
    let fixtures = vec![
        {
            let mut f = OrderFixture::clean("PO-1");
            f.po_number = None;
            f
        },
        OrderFixture::clean("PO-1").without_vendor(),
        {
            let mut f = OrderFixture::clean("PO-1");
            f.order_date = None;
            f
        },
        {
            let mut f = OrderFixture::clean("PO-1");
            f.due_date = None;
            f
        },
        {
            let mut f = OrderFixture::clean("PO-1");
            f.total = None;
            f
        },
    ];

    for fixture in fixtures {
        let reasons = evaluate(&document(&fixture), &RulePolicy::default());
        assert!(reasons.contains(&Reason::MissingFields));
        assert_eq!(failure_flags(&reasons), vec![Reason::MissingFields]);
    }
}

#[test]
fn test_amount_threshold_accepts_formatted_totals() {
    let policy = RulePolicy::default();

    let doc = document(&OrderFixture::clean("PO-1").with_total_text("$18,500.00"));
    assert_eq!(
        evaluate(&doc, &policy),
        vec![Reason::AmountExceedsThreshold]
    );

    let doc = document(&OrderFixture::clean("PO-1").with_total(14_999.99));
    assert!(evaluate(&doc, &policy).is_empty());
}

#[test]
fn test_threshold_is_configurable() {
    let policy = RulePolicy {
        amount_threshold: 50.0,
        due_within_days: 7,
    };
    let doc = document(&OrderFixture::clean("PO-1").with_total(100.0));
    assert_eq!(
        evaluate(&doc, &policy),
        vec![Reason::AmountExceedsThreshold]
    );
}

#[test]
fn test_urgent_subject_match() {
    let doc = document(&OrderFixture::clean("PO-1").with_subject("Re: uRgEnT follow-up"));
    let reasons = evaluate(&doc, &RulePolicy::default());
    assert_eq!(reasons, vec![Reason::Urgent]);
    assert!(failure_flags(&reasons).is_empty());
}

#[test]
fn test_all_rules_fire_in_declared_order() {
    let doc = document(
        &OrderFixture::clean("PO-1")
            .with_subject("URGENT purchase order")
            .with_order_date("2025-06-18")
            .with_due_date("2025-06-19")
            .without_vendor()
            .with_total_text("$99,000.00"),
    );

    let reasons = evaluate(&doc, &RulePolicy::default());
    assert_eq!(
        reasons,
        vec![
            Reason::DueSoon,
            Reason::Urgent,
            Reason::MissingFields,
            Reason::AmountExceedsThreshold,
        ]
    );
    assert_eq!(failure_flags(&reasons), vec![Reason::MissingFields]);
}
