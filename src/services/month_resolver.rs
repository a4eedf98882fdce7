use crate::domain::month::{MonthId, MonthIdError};
use crate::error::{AppError, Result};
use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, Offset, TimeZone, Utc};
use chrono_tz::Tz;

/// All month and timezone arithmetic lives here so that "which calendar
/// month does this instant belong to" and "what UTC range covers this
/// month" are computed the same way everywhere: query filters, bucket
/// labels, and UI headers.
#[derive(Debug, Clone, Copy)]
pub struct MonthResolver {
    tz: Tz,
}

impl MonthResolver {
    #[must_use]
    pub const fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// The calendar month containing `instant`, as observed on a wall
    /// clock in the display timezone.
    #[must_use]
    pub fn month_of(&self, instant: DateTime<Utc>) -> MonthId {
        let local = instant.with_timezone(&self.tz);
        MonthId { year: local.year(), month: local.month() }
    }

    /// The half-open UTC range `[start, end)` covering `month` in the
    /// display timezone. `end` is exactly the `start` of the following
    /// month, so consecutive ranges tile the timeline with no gaps.
    ///
    /// Each boundary's offset is resolved independently against the zone's
    /// IANA rules; a single fixed shift would be wrong for months whose
    /// boundaries straddle a daylight-saving transition.
    pub fn month_range(&self, month: MonthId) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
        let start = self.month_start(month).ok_or(AppError::BadRequest("Invalid month parameter".to_string()))?;
        let end = self.month_start(month.next()).ok_or(AppError::BadRequest("Invalid month parameter".to_string()))?;
        Ok((start, end))
    }

    /// UTC instant of local midnight on the first of the month.
    fn month_start(&self, month: MonthId) -> Option<DateTime<Utc>> {
        let first = NaiveDate::from_ymd_opt(month.year, month.month, 1)?.and_hms_opt(0, 0, 0)?;
        let start = match self.tz.from_local_datetime(&first) {
            LocalResult::Single(dt) => dt.with_timezone(&Utc),
            // Fall-back transition: the same wall-clock midnight occurs
            // twice; the earlier instant is the true start of the month.
            LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
            // Spring-forward gap: some zones skip midnight entirely.
            // Resolve with the offset in force just before the gap, which
            // lands on the first real instant of the month.
            LocalResult::None => {
                let offset = self.tz.offset_from_utc_datetime(&first).fix();
                Utc.from_utc_datetime(&(first - Duration::seconds(i64::from(offset.local_minus_utc()))))
            }
        };
        Some(start)
    }

    /// Long human label for a month, e.g. "February 2024". Returns the raw
    /// input unchanged when it does not parse; callers render whatever the
    /// URL carried rather than failing a whole page over a bad label.
    #[must_use]
    pub fn month_title(&self, raw: &str) -> String {
        let Ok(month) = raw.parse::<MonthId>() else {
            return raw.to_string();
        };
        NaiveDate::from_ymd_opt(month.year, month.month, 1)
            .map_or_else(|| raw.to_string(), |date| date.format("%B %Y").to_string())
    }

    /// Short local label for an expense row, e.g. "Feb 3, 1:05 PM".
    #[must_use]
    pub fn expense_timestamp(&self, instant: DateTime<Utc>) -> String {
        instant.with_timezone(&self.tz).format("%b %-d, %-I:%M %p").to_string()
    }

    /// Strict `YYYY-MM` parse surfaced as an [`AppError`] for handlers.
    pub fn parse_month(&self, raw: &str) -> Result<MonthId> {
        raw.parse::<MonthId>().map_err(|e| match e {
            MonthIdError::InvalidFormat => AppError::BadRequest("Month must look like YYYY-MM".to_string()),
            MonthIdError::InvalidMonth => AppError::BadRequest("Month must be between 01 and 12".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::Winnipeg;

    fn resolver() -> MonthResolver {
        MonthResolver::new(Winnipeg)
    }

    fn month(raw: &str) -> MonthId {
        raw.parse().expect(raw)
    }

    fn utc(raw: &str) -> DateTime<Utc> {
        raw.parse().expect(raw)
    }

    #[test]
    fn leap_february_range_in_winnipeg() {
        // Winnipeg is CST (UTC-6) for all of February.
        let (start, end) = resolver().month_range(month("2024-02")).expect("range");
        assert_eq!(start, utc("2024-02-01T06:00:00Z"));
        assert_eq!(end, utc("2024-03-01T06:00:00Z"));
    }

    #[test]
    fn range_spanning_spring_forward() {
        // DST began 2024-03-10, so March starts at -6 and ends at -5.
        let (start, end) = resolver().month_range(month("2024-03")).expect("range");
        assert_eq!(start, utc("2024-03-01T06:00:00Z"));
        assert_eq!(end, utc("2024-04-01T05:00:00Z"));
    }

    #[test]
    fn range_spanning_fall_back() {
        // DST ended 2024-11-03, so November starts at -5 and ends at -6.
        let (start, end) = resolver().month_range(month("2024-11")).expect("range");
        assert_eq!(start, utc("2024-11-01T05:00:00Z"));
        assert_eq!(end, utc("2024-12-01T06:00:00Z"));
    }

    #[test]
    fn adjacent_ranges_tile_the_timeline() {
        let resolver = resolver();
        for raw in ["2023-12", "2024-01", "2024-02", "2024-03", "2024-10", "2024-11", "2024-12"] {
            let m = month(raw);
            let (_, end) = resolver.month_range(m).expect("range");
            let (next_start, _) = resolver.month_range(m.next()).expect("next range");
            assert_eq!(end, next_start, "boundary mismatch after {raw}");
        }
    }

    #[test]
    fn range_start_round_trips_through_month_of() {
        let resolver = resolver();
        for raw in ["2023-12", "2024-02", "2024-03", "2024-06", "2024-11"] {
            let m = month(raw);
            let (start, end) = resolver.month_range(m).expect("range");
            assert_eq!(resolver.month_of(start), m, "start of {raw}");
            // One second before the end is still inside; the end itself
            // belongs to the next month.
            assert_eq!(resolver.month_of(end - Duration::seconds(1)), m, "end-1s of {raw}");
            assert_eq!(resolver.month_of(end), m.next(), "end of {raw}");
        }
    }

    #[test]
    fn instants_near_utc_midnight_bucket_by_local_day() {
        let resolver = resolver();
        // 2024-03-01 02:00 UTC is still 2024-02-29 20:00 in Winnipeg.
        assert_eq!(resolver.month_of(utc("2024-03-01T02:00:00Z")), month("2024-02"));
        assert_eq!(resolver.month_of(utc("2024-03-01T06:00:00Z")), month("2024-03"));
    }

    #[test]
    fn month_title_formats_long_labels() {
        let resolver = resolver();
        assert_eq!(resolver.month_title("2024-02"), "February 2024");
        assert_eq!(resolver.month_title("2025-01"), "January 2025");
        assert_eq!(resolver.month_title("1999-12"), "December 1999");
    }

    #[test]
    fn month_title_passes_through_unparseable_input() {
        let resolver = resolver();
        assert_eq!(resolver.month_title("not-a-month"), "not-a-month");
        assert_eq!(resolver.month_title("2024-13"), "2024-13");
        assert_eq!(resolver.month_title(""), "");
    }

    #[test]
    fn expense_timestamp_uses_local_wall_clock() {
        let resolver = resolver();
        // 2024-02-03 19:05 UTC is 13:05 CST.
        assert_eq!(resolver.expense_timestamp(utc("2024-02-03T19:05:00Z")), "Feb 3, 1:05 PM");
        // Local midnight at the start of the month.
        assert_eq!(resolver.expense_timestamp(utc("2024-02-01T06:00:00Z")), "Feb 1, 12:00 AM");
    }

    #[test]
    fn parse_month_maps_errors_to_bad_request() {
        let resolver = resolver();
        assert!(matches!(resolver.parse_month("2024-2"), Err(AppError::BadRequest(_))));
        assert!(matches!(resolver.parse_month("2024-13"), Err(AppError::BadRequest(_))));
        assert_eq!(resolver.parse_month("2024-07").expect("valid"), month("2024-07"));
    }
}
