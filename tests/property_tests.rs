/// Property-based tests using proptest
/// Tests invariants of CPF/CNPJ validation that should hold for all inputs
use proptest::prelude::*;
use rust_clientes_api::domain::document::{
    check_digit, is_valid_document, normalize, Document, CNPJ_FIRST_WEIGHTS, CNPJ_SECOND_WEIGHTS,
};

/// Appends both CPF check digits to nine base digits.
fn complete_cpf(base: &[u32]) -> String {
    let mut digits = base.to_vec();
    digits.push(check_digit(&digits, (2..=10).rev()));
    digits.push(check_digit(&digits, (2..=11).rev()));
    digits.iter().map(|d| d.to_string()).collect()
}

/// Appends both CNPJ check digits to twelve base digits.
fn complete_cnpj(base: &[u32]) -> String {
    let mut digits = base.to_vec();
    digits.push(check_digit(&digits, CNPJ_FIRST_WEIGHTS));
    digits.push(check_digit(&digits, CNPJ_SECOND_WEIGHTS));
    digits.iter().map(|d| d.to_string()).collect()
}

fn all_same(s: &str) -> bool {
    s.chars().all(|c| Some(c) == s.chars().next())
}

// Property: validation should never panic
proptest! {
    #[test]
    fn validation_never_panics(input in "\\PC*") {
        let _ = is_valid_document(&input);
        let _ = Document::parse(&input);
    }

    #[test]
    fn repeated_digits_always_invalid(d in 0u32..=9, cnpj in proptest::bool::ANY) {
        let len = if cnpj { 14 } else { 11 };
        let doc: String = std::iter::repeat(char::from_digit(d, 10).unwrap()).take(len).collect();
        prop_assert!(!is_valid_document(&doc));
    }

    #[test]
    fn lengths_12_and_13_always_invalid(doc in "[0-9]{12,13}") {
        prop_assert!(!is_valid_document(&doc));
    }

    #[test]
    fn wrong_lengths_always_invalid(doc in "[0-9]{0,10}|[0-9]{15,30}") {
        prop_assert!(!is_valid_document(&doc));
    }
}

// Property: documents with computed check digits validate, altered ones do not
proptest! {
    #[test]
    fn computed_cpf_is_valid(base in proptest::collection::vec(0u32..=9, 9)) {
        let cpf = complete_cpf(&base);
        prop_assume!(!all_same(&cpf));
        prop_assert!(is_valid_document(&cpf), "{}", cpf);
    }

    #[test]
    fn computed_cnpj_is_valid(base in proptest::collection::vec(0u32..=9, 12)) {
        let cnpj = complete_cnpj(&base);
        prop_assume!(!all_same(&cnpj));
        prop_assert!(is_valid_document(&cnpj), "{}", cnpj);
    }

    #[test]
    fn altered_last_digit_is_invalid(base in proptest::collection::vec(0u32..=9, 9), delta in 1u32..=9) {
        let cpf = complete_cpf(&base);
        let last = cpf[10..].parse::<u32>().unwrap();
        let altered = format!("{}{}", &cpf[..10], (last + delta) % 10);
        prop_assert!(!is_valid_document(&altered), "{}", altered);
    }
}

// Property: punctuation does not change the verdict
proptest! {
    #[test]
    fn cpf_formatting_is_ignored(cpf in "[0-9]{11}") {
        let formatted = format!("{}.{}.{}-{}",
            &cpf[0..3], &cpf[3..6], &cpf[6..9], &cpf[9..11]);

        prop_assert_eq!(normalize(&formatted), cpf.clone());
        prop_assert_eq!(is_valid_document(&formatted), is_valid_document(&cpf));
    }

    #[test]
    fn cnpj_formatting_is_ignored(cnpj in "[0-9]{14}") {
        let formatted = format!("{}.{}.{}/{}-{}",
            &cnpj[0..2], &cnpj[2..5], &cnpj[5..8], &cnpj[8..12], &cnpj[12..14]);

        prop_assert_eq!(normalize(&formatted), cnpj.clone());
        prop_assert_eq!(is_valid_document(&formatted), is_valid_document(&cnpj));
    }

    #[test]
    fn parsed_document_is_normalized(base in proptest::collection::vec(0u32..=9, 9)) {
        let cpf = complete_cpf(&base);
        prop_assume!(!all_same(&cpf));
        let formatted = format!(" {}.{}.{}-{} ", &cpf[0..3], &cpf[3..6], &cpf[6..9], &cpf[9..11]);

        let parsed = Document::parse(&formatted).unwrap();
        prop_assert_eq!(parsed.as_str(), cpf.as_str());
    }
}
