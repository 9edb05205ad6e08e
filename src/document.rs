//! Brazilian taxpayer document validation (CPF and CNPJ).
//!
//! Both document kinds carry two trailing check digits computed with a
//! weighted modulo-11 sum over the preceding digits:
//!
//! - **CPF** (11 digits): weights descend from 10 (first digit) and from 11
//!   (second digit) down to 2.
//! - **CNPJ** (14 digits): fixed weight tables, see [`CNPJ_FIRST_WEIGHTS`]
//!   and [`CNPJ_SECOND_WEIGHTS`].
//!
//! Reference: https://www.devmedia.com.br/validando-o-cpf-em-uma-aplicacao-java/22374

use std::fmt;

pub const CPF_LEN: usize = 11;
pub const CNPJ_LEN: usize = 14;

/// Weights applied to the first 12 digits of a CNPJ.
pub const CNPJ_FIRST_WEIGHTS: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
/// Weights applied to the first 13 digits of a CNPJ.
pub const CNPJ_SECOND_WEIGHTS: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

/// Removes the punctuation used when formatting documents (`.`, `-`, `/`).
///
/// Nothing else is stripped: `"529 982"` keeps its space.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '.' | '-' | '/'))
        .collect()
}

/// The kind of a document, decided by its normalized length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// Individual taxpayer (11 digits).
    Cpf,
    /// Business taxpayer (14 digits).
    Cnpj,
}

impl DocumentKind {
    pub fn from_len(len: usize) -> Option<Self> {
        match len {
            CPF_LEN => Some(DocumentKind::Cpf),
            CNPJ_LEN => Some(DocumentKind::Cnpj),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Cpf => write!(f, "CPF"),
            DocumentKind::Cnpj => write!(f, "CNPJ"),
        }
    }
}

/// Validates a CPF or CNPJ, formatted or not.
///
/// Never panics: anything that is not a well-formed document is simply
/// reported as invalid.
pub fn is_valid_document(raw: &str) -> bool {
    let normalized = normalize(raw);
    match DocumentKind::from_len(normalized.len()) {
        Some(DocumentKind::Cpf) => is_valid_cpf(&normalized),
        Some(DocumentKind::Cnpj) => is_valid_cnpj(&normalized),
        None => false,
    }
}

/// Validates an already normalized 11-character CPF.
pub fn is_valid_cpf(cpf: &str) -> bool {
    if cpf.len() != CPF_LEN || all_same(cpf) {
        return false;
    }

    let Some(digits) = parse_digits(cpf) else {
        return false;
    };

    let first = check_digit(&digits[..9], (2..=10).rev());
    let second = check_digit(&digits[..10], (2..=11).rev());

    digits[9] == first && digits[10] == second
}

/// Validates a CNPJ. Punctuation is stripped before checking.
pub fn is_valid_cnpj(cnpj: &str) -> bool {
    let cnpj = normalize(cnpj);
    if cnpj.len() != CNPJ_LEN || all_same(&cnpj) {
        return false;
    }

    let Some(digits) = parse_digits(&cnpj) else {
        return false;
    };

    let first = check_digit(&digits[..12], CNPJ_FIRST_WEIGHTS);
    let second = check_digit(&digits[..13], CNPJ_SECOND_WEIGHTS);

    digits[12] == first && digits[13] == second
}

/// Weighted modulo-11 check digit: `0` when the remainder is below 2,
/// `11 - remainder` otherwise.
pub fn check_digit<W>(digits: &[u32], weights: W) -> u32
where
    W: IntoIterator<Item = u32>,
{
    let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
    let remainder = sum % 11;
    if remainder < 2 {
        0
    } else {
        11 - remainder
    }
}

/// True when every character equals the first one ("11111111111").
fn all_same(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => chars.all(|c| c == first),
        None => true,
    }
}

fn parse_digits(s: &str) -> Option<Vec<u32>> {
    s.chars().map(|c| c.to_digit(10)).collect()
}

/// A normalized document that passed check-digit validation.
///
/// The storage layer only accepts this type, so every persisted document is
/// digits-only and valid.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Document {
    value: String,
    kind: DocumentKind,
}

impl Document {
    /// Trims surrounding whitespace, strips punctuation and validates.
    pub fn parse(raw: &str) -> Option<Self> {
        let value = normalize(raw.trim());
        let kind = DocumentKind::from_len(value.len())?;
        let valid = match kind {
            DocumentKind::Cpf => is_valid_cpf(&value),
            DocumentKind::Cnpj => is_valid_cnpj(&value),
        };
        valid.then_some(Self { value, kind })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}
