//! Validated value types shared by the data-call crates.

/// Errors raised while validating ledger values.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The input was empty or whitespace
    #[error("Text cannot be empty")]
    Empty,
    /// The input was not a positive decimal record version
    #[error("Version must be a positive whole number, got '{0}'")]
    InvalidVersion(String),
}

/// Text with at least one non-whitespace character, stored trimmed.
///
/// Identifiers such as data call ids, carrier ids and batch ids are validated into this type
/// before a record is keyed on them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// # Errors
    ///
    /// Returns [`TextError::Empty`] if `input` is blank after trimming.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        match input.as_ref().trim() {
            "" => Err(TextError::Empty),
            trimmed => Ok(Self(trimmed.to_owned())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A record version number.
///
/// Versions are stored on the ledger as decimal strings (`"1"`, `"2"`, ...) and compared
/// numerically, so `"10"` sorts after `"9"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordVersion(u32);

impl RecordVersion {
    /// The version assigned to a freshly created record.
    pub const FIRST: RecordVersion = RecordVersion(1);

    /// Parses a decimal version string.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::InvalidVersion`] if `input` is not a positive integer.
    pub fn parse(input: &str) -> Result<Self, TextError> {
        match input.trim().parse::<u32>() {
            Ok(n) if n > 0 => Ok(Self(n)),
            _ => Err(TextError::InvalidVersion(input.to_owned())),
        }
    }

    /// Returns the version that follows this one.
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for RecordVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RecordVersion {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordVersion::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_text_trims_input() {
        let text = NonEmptyText::new("  DC1 ").unwrap();
        assert_eq!(text.as_str(), "DC1");
    }

    #[test]
    fn test_non_empty_text_rejects_whitespace() {
        assert!(matches!(NonEmptyText::new("   "), Err(TextError::Empty)));
    }

    #[test]
    fn test_record_version_orders_numerically() {
        let nine = RecordVersion::parse("9").unwrap();
        let ten = RecordVersion::parse("10").unwrap();
        assert!(ten > nine);
        assert_eq!(nine.next(), ten);
    }

    #[test]
    fn test_record_version_rejects_zero_and_text() {
        assert!(RecordVersion::parse("0").is_err());
        assert!(RecordVersion::parse("latest").is_err());
        assert!(RecordVersion::parse("").is_err());
    }
}
