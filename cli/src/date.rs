use anyhow::{anyhow, bail, Result};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use todo_core::DATE_FORMAT;

/// Parses a due date typed by the user, relative to `today`.
///
/// Accepts `YYYY-MM-DD`, `today`/`tod`, `tomorrow`/`tom`, `+Nd`, `+Nw` and a
/// weekday name (the next such day, never today).
pub fn parse_due_date(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let input = input.trim();

    if let Ok(date) = NaiveDate::parse_from_str(input, DATE_FORMAT) {
        return Ok(date);
    }

    match input.to_lowercase().as_str() {
        "today" | "tod" => return Ok(today),
        "tomorrow" | "tom" => return today.succ_opt().ok_or_else(|| out_of_range(input)),
        _ => {}
    }

    if let Some(rest) = input.strip_prefix('+') {
        return parse_relative(rest, today);
    }

    if let Some(weekday) = parse_weekday(input) {
        let mut days_needed = weekday.num_days_from_monday() as i64
            - today.weekday().num_days_from_monday() as i64;
        if days_needed <= 0 {
            days_needed += 7;
        }
        return today
            .checked_add_signed(Duration::days(days_needed))
            .ok_or_else(|| out_of_range(input));
    }

    Err(anyhow!(
        "Invalid date '{}'. Use YYYY-MM-DD (or today, tomorrow, +3d, fri)",
        input
    ))
}

fn parse_relative(rest: &str, today: NaiveDate) -> Result<NaiveDate> {
    let Some((unit_at, _)) = rest.char_indices().last() else {
        bail!("Invalid relative date: +{}", rest);
    };
    let (num_str, unit) = rest.split_at(unit_at);
    let count: i64 = num_str
        .parse()
        .map_err(|_| anyhow!("Invalid relative date: +{}", rest))?;

    let offset = match unit {
        "d" => Duration::try_days(count),
        "w" => Duration::try_weeks(count),
        _ => bail!("Unknown unit in relative date: {}", unit),
    };
    offset
        .and_then(|offset| today.checked_add_signed(offset))
        .ok_or_else(|| anyhow!("Invalid relative date: +{}", rest))
}

fn out_of_range(input: &str) -> anyhow::Error {
    anyhow!("Invalid date '{}': out of range", input)
}

fn parse_weekday(s: &str) -> Option<Weekday> {
    match s.to_lowercase().as_str() {
        "mon" | "monday" => Some(Weekday::Mon),
        "tue" | "tuesday" => Some(Weekday::Tue),
        "wed" | "wednesday" => Some(Weekday::Wed),
        "thu" | "thursday" => Some(Weekday::Thu),
        "fri" | "friday" => Some(Weekday::Fri),
        "sat" | "saturday" => Some(Weekday::Sat),
        "sun" | "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}
