use std::fmt;
use std::str::FromStr;

/// A calendar month as observed in the display timezone, keyed `YYYY-MM`.
///
/// Parsing is strict: exactly four digits, a dash, two digits, with the
/// month component in `[1, 12]`. Anything else is rejected rather than
/// coerced, since month identifiers double as query keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthId {
    pub year: i32,
    pub month: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MonthIdError {
    #[error("month identifier must match YYYY-MM")]
    InvalidFormat,
    #[error("month component out of range")]
    InvalidMonth,
}

impl MonthId {
    /// The identifier of the month following this one. December rolls
    /// over into January of the next year.
    #[must_use]
    pub const fn next(self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }
}

impl fmt::Display for MonthId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthId {
    type Err = MonthIdError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let bytes = value.as_bytes();
        if bytes.len() != 7 || bytes[4] != b'-' {
            return Err(MonthIdError::InvalidFormat);
        }
        if !bytes[..4].iter().all(u8::is_ascii_digit) || !bytes[5..].iter().all(u8::is_ascii_digit) {
            return Err(MonthIdError::InvalidFormat);
        }

        let year: i32 = value[..4].parse().map_err(|_| MonthIdError::InvalidFormat)?;
        let month: u32 = value[5..].parse().map_err(|_| MonthIdError::InvalidFormat)?;
        if !(1..=12).contains(&month) {
            return Err(MonthIdError::InvalidMonth);
        }

        Ok(Self { year, month })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_round_trips_valid_identifiers() {
        for raw in ["2024-02", "1999-12", "2025-01", "0001-06"] {
            let id: MonthId = raw.parse().expect(raw);
            assert_eq!(id.to_string(), raw);
        }
    }

    #[test]
    fn rejects_malformed_identifiers() {
        for raw in ["2024-2", "2024/02", "202402", "2024-002", "24-02", "abcd-ef", "2024-02 ", " 2024-02", ""] {
            assert_eq!(raw.parse::<MonthId>(), Err(MonthIdError::InvalidFormat), "{raw:?}");
        }
    }

    #[test]
    fn rejects_out_of_range_months() {
        assert_eq!("2024-00".parse::<MonthId>(), Err(MonthIdError::InvalidMonth));
        assert_eq!("2024-13".parse::<MonthId>(), Err(MonthIdError::InvalidMonth));
        assert_eq!("2024-99".parse::<MonthId>(), Err(MonthIdError::InvalidMonth));
    }

    #[test]
    fn december_rolls_over_to_january() {
        let december = MonthId { year: 2024, month: 12 };
        assert_eq!(december.next(), MonthId { year: 2025, month: 1 });

        let june = MonthId { year: 2024, month: 6 };
        assert_eq!(june.next(), MonthId { year: 2024, month: 7 });
    }
}
