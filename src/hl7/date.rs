use chrono::{Datelike, Local, NaiveDate};

/// Output layout for [`format_hl7_date_as`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFormat {
    #[default]
    DayMonthYear,
    MonthDayYear,
    YearMonthDay,
}

/// Format a positional `YYYYMMDD[HHMMSS]` value as `DD/MM/YYYY`, with
/// ` HH:MM:SS` appended when `include_time` is set and the value carries
/// a time part.
pub fn format_hl7_date(raw: &str, include_time: bool) -> String {
    format_hl7_date_as(raw, include_time, DateFormat::default())
}

pub fn format_hl7_date_as(raw: &str, include_time: bool, format: DateFormat) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let year = part(raw, 0, 4);
    let month = part(raw, 4, 6);
    let day = part(raw, 6, 8);

    let date = match format {
        DateFormat::DayMonthYear => format!("{day}/{month}/{year}"),
        DateFormat::MonthDayYear => format!("{month}/{day}/{year}"),
        DateFormat::YearMonthDay => format!("{year}-{month}-{day}"),
    };

    if include_time && raw.len() >= 14 {
        let time = format!(
            "{}:{}:{}",
            part(raw, 8, 10),
            part(raw, 10, 12),
            part(raw, 12, 14)
        );
        return format!("{date} {time}");
    }

    date
}

/// Whole years between an 8-digit `YYYYMMDD` birth date and `today`.
///
/// `None` for anything that is not exactly eight digits forming a real
/// calendar date, and for birth dates after `today`.
pub fn calculate_age(date_of_birth: &str, today: NaiveDate) -> Option<u32> {
    if date_of_birth.len() != 8 || !date_of_birth.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let year: i32 = date_of_birth[0..4].parse().ok()?;
    let month: u32 = date_of_birth[4..6].parse().ok()?;
    let day: u32 = date_of_birth[6..8].parse().ok()?;
    let dob = NaiveDate::from_ymd_opt(year, month, day)?;

    if dob > today {
        return None;
    }

    let mut age = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        age -= 1;
    }

    u32::try_from(age).ok()
}

/// [`calculate_age`] against the local calendar date.
pub fn calculate_age_now(date_of_birth: &str) -> Option<u32> {
    calculate_age(date_of_birth, Local::now().date_naive())
}

fn part(raw: &str, start: usize, end: usize) -> &str {
    let end = end.min(raw.len());
    if start >= end {
        return "";
    }
    raw.get(start..end).unwrap_or("")
}
