use proptest::prelude::*;
use suii_protocol::{
    Container, Location, ObjectKind, Symbol, SymbolDomain, SymbolError, SymbolRegistry, TaskType,
};

fn assert_round_trip<S: Symbol>() {
    let registry = SymbolRegistry::global();
    for &symbol in S::ALL {
        let label = registry.label_of(S::DOMAIN, symbol.code()).unwrap();
        let resolved = registry.resolve(S::DOMAIN, label).unwrap();
        assert_eq!(resolved.code, symbol.code());
        assert_eq!(registry.lookup::<S>(label).unwrap(), symbol);
        assert_eq!(registry.from_code::<S>(symbol.code()).unwrap(), symbol);
    }
}

#[test]
fn every_domain_round_trips() {
    assert_round_trip::<Location>();
    assert_round_trip::<ObjectKind>();
    assert_round_trip::<Container>();
    assert_round_trip::<TaskType>();
}

#[test]
fn labels_and_codes_are_injective() {
    let registry = SymbolRegistry::global();
    for domain in SymbolDomain::ALL {
        let entries = registry.entries(domain);
        let mut labels: Vec<&str> = entries.iter().map(|e| e.label).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), entries.len(), "duplicate label in {domain}");
    }
}

proptest! {
    #[test]
    fn prop_unknown_labels_are_not_found(label in "[a-zA-Z .]{0,24}") {
        let registry = SymbolRegistry::global();
        for domain in SymbolDomain::ALL {
            let known = registry.entries(domain).iter().any(|e| e.label == label);
            match registry.resolve(domain, &label) {
                Ok(code) => prop_assert!(known && code.label == label),
                Err(err) => {
                    prop_assert!(!known);
                    let is_unknown_label = matches!(err, SymbolError::UnknownLabel { .. });
                    prop_assert!(is_unknown_label);
                }
            }
        }
    }

    #[test]
    fn prop_unknown_codes_are_not_found(code in any::<u16>()) {
        let registry = SymbolRegistry::global();
        let known = Location::ALL.iter().any(|l| l.code() == code);
        prop_assert_eq!(registry.label_of(SymbolDomain::Location, code).is_ok(), known);
        prop_assert_eq!(Location::try_from(code).is_ok(), known);
    }
}
