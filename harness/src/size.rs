use std::fmt;

/// Error returned by [`parse_size`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseSizeError {
    InvalidNumber(String),
    InvalidSuffix(char),
    Overflow,
}

impl fmt::Display for ParseSizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseSizeError::InvalidNumber(s) => write!(f, "invalid size `{s}`"),
            ParseSizeError::InvalidSuffix(c) => {
                write!(f, "unknown size suffix `{c}`, expected K, M or G")
            }
            ParseSizeError::Overflow => f.write_str("size does not fit in usize"),
        }
    }
}

impl std::error::Error for ParseSizeError {}

/// Parses a byte count with an optional binary `K`, `M` or `G` suffix,
/// so `"4G"` is `4 * 1024 * 1024 * 1024`.
pub fn parse_size(s: &str) -> Result<usize, ParseSizeError> {
    let s = s.trim();

    let (digits, shift) = match s.chars().last() {
        Some(c) if c.is_ascii_alphabetic() => {
            let shift = match c.to_ascii_uppercase() {
                'K' => 10,
                'M' => 20,
                'G' => 30,
                _ => return Err(ParseSizeError::InvalidSuffix(c)),
            };

            (&s[..s.len() - 1], shift)
        }
        _ => (s, 0),
    };

    let value: usize = digits
        .parse()
        .map_err(|_| ParseSizeError::InvalidNumber(s.to_owned()))?;

    value
        .checked_mul(1 << shift)
        .ok_or(ParseSizeError::Overflow)
}
