//! Edge case tests for the EMI service over both store backends.

use emi_calculator::{
    CalculationError, EmiCalculationInput, EmiError, EmiRecordStore, EmiService, MemoryStore,
    NotFoundKey, SqliteStore,
};
use std::sync::Arc;
use std::thread;

fn services() -> Vec<(&'static str, EmiService)> {
    vec![
        ("memory", EmiService::new(MemoryStore::new())),
        ("sqlite", EmiService::new(SqliteStore::open_in_memory().unwrap())),
    ]
}

fn loan(p: f64, rate: f64, years: i32) -> EmiCalculationInput {
    EmiCalculationInput::new(p, rate, years)
}

// ==================== CALCULATION ====================

#[test]
fn test_reference_loan() {
    for (name, svc) in services() {
        let record = svc.calculate_and_save(&loan(100_000.0, 5.0, 20)).unwrap();
        assert!(
            (record.emi.to_f64() - 659.96).abs() < 0.01,
            "{}: got {}",
            name,
            record.emi
        );
    }
}

#[test]
fn test_reference_loan_with_metadata() {
    for (name, svc) in services() {
        let input = loan(100_000.0, 5.0, 20)
            .with_email("x@y.com")
            .with_option("car");
        let record = svc.calculate_and_save(&input).unwrap();

        assert_eq!(record.email.as_deref(), Some("x@y.com"), "{}", name);
        assert_eq!(record.option.as_deref(), Some("car"), "{}", name);
        assert_eq!(record.emi.to_string(), "659.96", "{}", name);
    }
}

#[test]
fn test_upper_bounds_accepted() {
    for (_, svc) in services() {
        let input = loan(1.0, 100.0, 30);
        assert!(input.validate().is_empty());
        let record = svc.calculate_and_save(&input).unwrap();
        // At 100% a year the interest alone is 1/12 of the principal a month.
        assert_eq!(record.emi.to_string(), "0.08");
    }
}

#[test]
fn test_zero_rate_uses_straight_line() {
    for (_, svc) in services() {
        let record = svc.calculate_and_save(&loan(36_000.0, 0.0, 3)).unwrap();
        assert_eq!(record.emi.to_string(), "1000.00");
    }
}

#[test]
fn test_zero_term_passes_validation_but_is_not_stored() {
    for (_, svc) in services() {
        let input = loan(1_000.0, 5.0, 0);
        assert!(input.validate().is_empty());

        let err = svc.calculate_and_save(&input).unwrap_err();
        assert!(matches!(
            err,
            EmiError::Calculation(CalculationError::NonPositiveTerm)
        ));
        assert!(matches!(svc.find_by_id(1), Err(EmiError::NotFound(_))));
    }
}

#[test]
fn test_unvalidated_negative_principal_never_stored() {
    for (_, svc) in services() {
        let err = svc.calculate_and_save(&loan(-5.0, 5.0, 10)).unwrap_err();
        assert!(matches!(
            err,
            EmiError::Calculation(CalculationError::NonPositivePrincipal)
        ));
    }
}

#[test]
fn test_repeated_calculation_gives_identical_amount_and_new_id() {
    for (_, svc) in services() {
        let a = svc.calculate_and_save(&loan(54_321.0, 7.25, 12)).unwrap();
        let b = svc.calculate_and_save(&loan(54_321.0, 7.25, 12)).unwrap();
        assert_eq!(a.emi, b.emi);
        assert_ne!(a.id, b.id);
    }
}

// ==================== LOOKUP ====================

#[test]
fn test_lookup_by_id_returns_inserted_values() {
    for (_, svc) in services() {
        let input = loan(80_000.0, 4.0, 15)
            .with_email("owner@example.com")
            .with_option("home");
        let stored = svc.calculate_and_save(&input).unwrap();

        let fetched = svc.find_by_id(stored.id).unwrap();
        assert_eq!(fetched.emi, stored.emi);
        assert_eq!(fetched.email, stored.email);
        assert_eq!(fetched.option, stored.option);
    }
}

#[test]
fn test_lookup_by_unknown_id() {
    for (_, svc) in services() {
        let err = svc.find_by_id(12345).unwrap_err();
        assert!(matches!(err, EmiError::NotFound(NotFoundKey::Id(12345))));
    }
}

#[test]
fn test_lookup_by_unknown_email() {
    for (_, svc) in services() {
        svc.calculate_and_save(&loan(1_000.0, 5.0, 1).with_email("someone@x.com"))
            .unwrap();

        let err = svc.find_by_email("nobody@x.com").unwrap_err();
        assert!(matches!(
            err,
            EmiError::NotFound(NotFoundKey::Email(ref e)) if e == "nobody@x.com"
        ));
    }
}

#[test]
fn test_lookup_by_email_is_exact_and_in_insertion_order() {
    for (name, svc) in services() {
        let first = svc
            .calculate_and_save(&loan(1_000.0, 5.0, 1).with_email("a@b.c"))
            .unwrap();
        svc.calculate_and_save(&loan(2_000.0, 5.0, 1).with_email("A@B.C"))
            .unwrap();
        svc.calculate_and_save(&loan(3_000.0, 5.0, 1)).unwrap();
        let last = svc
            .calculate_and_save(&loan(4_000.0, 5.0, 1).with_email("a@b.c"))
            .unwrap();

        let ids: Vec<_> = svc
            .find_by_email("a@b.c")
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, [first.id, last.id], "{}", name);
    }
}

#[test]
fn test_empty_email_is_not_indexed() {
    for (_, svc) in services() {
        svc.calculate_and_save(&loan(1_000.0, 5.0, 1).with_email(""))
            .unwrap();
        assert!(matches!(
            svc.find_by_email(""),
            Err(EmiError::NotFound(_))
        ));
    }
}

// ==================== PERSISTENCE ====================

#[test]
fn test_sqlite_records_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("emi.db");

    let stored = {
        let svc = EmiService::new(SqliteStore::open(&path).unwrap());
        svc.calculate_and_save(&loan(100_000.0, 5.0, 20).with_email("x@y.com"))
            .unwrap()
    };

    let svc = EmiService::new(SqliteStore::open(&path).unwrap());
    let fetched = svc.find_by_id(stored.id).unwrap();
    assert_eq!(fetched, stored);

    let next = svc.calculate_and_save(&loan(1.0, 1.0, 1)).unwrap();
    assert!(next.id > stored.id);
}

#[test]
fn test_sqlite_concurrent_inserts_get_unique_ids() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(SqliteStore::open(dir.path().join("emi.db")).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                (0..25)
                    .map(|i| {
                        let emi = emi_calculator::calculator::monthly_installment(
                            1_000.0 + f64::from(t * 100 + i),
                            5.0,
                            1,
                        )
                        .unwrap();
                        store
                            .insert(emi_calculator::NewEmiRecord::new(emi))
                            .unwrap()
                            .id
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids: Vec<_> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 100);
}
