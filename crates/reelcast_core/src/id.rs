//! Draft identifiers.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier of a draft directory: `YYYY-MM-DD-{account}-{sequence}`.
///
/// The sequence is an unpadded positive integer, unique per account and day.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use reelcast_core::DraftId;
///
/// let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let id = DraftId::new(date, "genz", 1);
/// assert_eq!(id.to_string(), "2024-01-01-genz-1");
///
/// let parsed: DraftId = "2024-01-01-genz-1".parse().unwrap();
/// assert_eq!(parsed, id);
/// assert_eq!(parsed.next().to_string(), "2024-01-01-genz-2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DraftId {
    date: NaiveDate,
    account: String,
    sequence: u32,
}

impl DraftId {
    /// Create an identifier.
    pub fn new(date: NaiveDate, account: impl Into<String>, sequence: u32) -> Self {
        Self {
            date,
            account: account.into(),
            sequence,
        }
    }

    /// Day the draft was generated.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Account (persona) name.
    pub fn account(&self) -> &str {
        &self.account
    }

    /// Sequence number within the day.
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    /// The identifier with the following sequence number.
    pub fn next(&self) -> Self {
        Self {
            date: self.date,
            account: self.account.clone(),
            sequence: self.sequence + 1,
        }
    }

    /// Whether `name` is safe to use as an account component.
    ///
    /// Account names become part of directory names, so only ASCII
    /// alphanumerics, `_` and `-` are accepted.
    pub fn is_valid_account(name: &str) -> bool {
        !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    }
}

impl std::fmt::Display for DraftId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{}-{}",
            self.date.format("%Y-%m-%d"),
            self.account,
            self.sequence
        )
    }
}

impl std::str::FromStr for DraftId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("Invalid draft id: {}", s);

        if s.len() < 14 || !s.is_char_boundary(10) || s.as_bytes()[10] != b'-' {
            return Err(invalid());
        }
        let date = NaiveDate::parse_from_str(&s[..10], "%Y-%m-%d").map_err(|_| invalid())?;
        let (account, sequence) = s[11..].rsplit_once('-').ok_or_else(invalid)?;
        if !Self::is_valid_account(account) {
            return Err(invalid());
        }
        let sequence: u32 = sequence.parse().map_err(|_| invalid())?;
        if sequence == 0 {
            return Err(invalid());
        }

        Ok(Self::new(date, account, sequence))
    }
}

impl Serialize for DraftId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DraftId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
