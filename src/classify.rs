//! Text-token predicates consumed by schema inference.

/// Classification of a single untyped text token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    Integer,
    Real,
    Text,
}

impl TokenClass {
    /// Returns `true` for both integral and real tokens.
    pub fn is_numeric(self) -> bool {
        matches!(self, TokenClass::Integer | TokenClass::Real)
    }
}

/// Classifies `token` as an integer, a real number or free text.
///
/// Leading and trailing whitespace is ignored. A number is an optional sign
/// followed by digits with at most one `.` and at least one digit.
/// Exponents, `inf` and `NaN` are text.
pub fn classify(token: &str) -> TokenClass {
    let trimmed = token.trim();
    let body = trimmed
        .strip_prefix('-')
        .or_else(|| trimmed.strip_prefix('+'))
        .unwrap_or(trimmed);

    let mut digits = 0usize;
    let mut radix = 0usize;
    for c in body.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => radix += 1,
            _ => return TokenClass::Text,
        }
    }

    match (digits, radix) {
        (0, _) => TokenClass::Text,
        (_, 0) => TokenClass::Integer,
        (_, 1) => TokenClass::Real,
        _ => TokenClass::Text,
    }
}

pub fn is_number(token: &str) -> bool {
    classify(token).is_numeric()
}

pub fn is_integer(token: &str) -> bool {
    classify(token) == TokenClass::Integer
}
