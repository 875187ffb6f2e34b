use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Utc};

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

fn format_with_commas(value: u64) -> String {
    let digits = value.to_string().chars().rev().collect::<Vec<char>>();
    let mut out = Vec::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(*ch);
    }
    out.into_iter().rev().collect()
}

pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return "-".to_string();
    }
    let cents = (amount.abs() * 100.0).round() as u64;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, format_with_commas(cents / 100), cents % 100)
}

pub fn month_name(month: u32) -> Option<&'static str> {
    MONTH_NAMES.get((month as usize).checked_sub(1)?).copied()
}

/// "June 2025", or the bare number when the month is out of range.
pub fn month_year_label(month: u32, year: i32) -> String {
    match month_name(month) {
        Some(name) => format!("{} {}", name, year),
        None => format!("{} {}", month, year),
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.date_naive());
    }
    raw.get(..10)
        .or(Some(raw))
        .and_then(|head| NaiveDate::parse_from_str(head, "%Y-%m-%d").ok())
}

/// `dd/mm/yyyy` for display; unparseable input is shown as-is.
pub fn display_date(raw: &str) -> String {
    parse_date(raw)
        .map(|date| date.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Value for an `<input type="date">` (`yyyy-mm-dd`).
pub fn date_input_value(raw: &str) -> String {
    parse_date(raw)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Turns a date-input value into the ISO-8601 timestamp the API stores.
pub fn to_iso_start_of_day(date_input: &str) -> Option<String> {
    parse_date(date_input).map(|date| format!("{}T00:00:00Z", date.format("%Y-%m-%d")))
}

pub fn to_iso_end_of_day(date_input: &str) -> Option<String> {
    parse_date(date_input).map(|date| format!("{}T23:59:59Z", date.format("%Y-%m-%d")))
}

/// First instant of the day in `zone`, rendered in UTC with milliseconds.
pub fn zoned_start_of_day<Tz: TimeZone>(date_input: &str, zone: &Tz) -> Option<String> {
    zoned_instant(date_input, NaiveTime::from_hms_opt(0, 0, 0)?, zone)
}

/// Last millisecond of the day in `zone`, rendered in UTC.
pub fn zoned_end_of_day<Tz: TimeZone>(date_input: &str, zone: &Tz) -> Option<String> {
    zoned_instant(date_input, NaiveTime::from_hms_milli_opt(23, 59, 59, 999)?, zone)
}

fn zoned_instant<Tz: TimeZone>(date_input: &str, time: NaiveTime, zone: &Tz) -> Option<String> {
    let wall = parse_date(date_input)?.and_time(time);
    let instant = zone.from_local_datetime(&wall).earliest()?;
    Some(
        instant
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Millis, true),
    )
}

/// First and last day of the month containing `day`.
pub fn month_bounds(day: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = day.with_day(1).unwrap_or(day);
    let (next_year, next_month) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    let last = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .map(|next| next - Duration::days(1))
        .unwrap_or(first);
    (first, last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn currency_has_grouping_and_cents() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(100000.0), "$100,000.00");
        assert_eq!(format_currency(1234567.891), "$1,234,567.89");
        assert_eq!(format_currency(-42.5), "-$42.50");
        assert_eq!(format_currency(-0.001), "$0.00");
    }

    #[test]
    fn month_labels() {
        assert_eq!(month_name(1), Some("January"));
        assert_eq!(month_name(12), Some("December"));
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
        assert_eq!(month_year_label(6, 2025), "June 2025");
        assert_eq!(month_year_label(14, 2025), "14 2025");
    }

    #[test]
    fn dates_render_day_first() {
        assert_eq!(display_date("2025-06-02T00:00:00Z"), "02/06/2025");
        assert_eq!(display_date("2025-06-02"), "02/06/2025");
        assert_eq!(display_date("2025-06-02T10:30:00"), "02/06/2025");
        assert_eq!(display_date("soon"), "soon");
    }

    #[test]
    fn date_input_round_trip() {
        assert_eq!(date_input_value("2025-06-02T00:00:00Z"), "2025-06-02");
        assert_eq!(date_input_value(""), "");
        assert_eq!(to_iso_start_of_day("2025-06-02").as_deref(), Some("2025-06-02T00:00:00Z"));
        assert_eq!(to_iso_end_of_day("2025-06-30").as_deref(), Some("2025-06-30T23:59:59Z"));
        assert_eq!(to_iso_start_of_day(""), None);
    }

    #[test]
    fn zoned_bounds_shift_to_utc() {
        let santiago = FixedOffset::west_opt(4 * 3600).unwrap();
        assert_eq!(
            zoned_start_of_day("2025-06-01", &santiago).as_deref(),
            Some("2025-06-01T04:00:00.000Z")
        );
        assert_eq!(
            zoned_end_of_day("2025-06-30", &santiago).as_deref(),
            Some("2025-07-01T03:59:59.999Z")
        );

        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        assert_eq!(
            zoned_start_of_day("2025-06-01", &tokyo).as_deref(),
            Some("2025-05-31T15:00:00.000Z")
        );
        assert_eq!(zoned_start_of_day("", &Utc), None);
    }

    #[test]
    fn month_bounds_cover_whole_month() {
        let day = NaiveDate::from_ymd_opt(2024, 2, 14).unwrap();
        let (first, last) = month_bounds(day);
        assert_eq!(first, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let (first, last) = month_bounds(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
        assert_eq!(first, NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
    }
}
