use jiff::{
  Timestamp,
  civil::{Date, DateTime},
  tz::TimeZone,
};

const MILLISECONDS_PER_DAY: f64 = 86_400_000.0;

/// Parse a sold date into an instant.
///
/// Dates and date-times without an offset are read as UTC. Swedish listing
/// dates such as `"12 okt. 2024"` are accepted as well.
pub fn parse_sold_date(value: &str) -> Option<Timestamp> {
  let value = value.trim();

  if value.is_empty() {
    return None;
  }

  if let Ok(timestamp) = value.parse::<Timestamp>() {
    return Some(timestamp);
  }

  if let Ok(datetime) = value.parse::<DateTime>() {
    return datetime.to_zoned(TimeZone::UTC).ok().map(|zoned| zoned.timestamp());
  }

  let date = match value.parse::<Date>() {
    Ok(date) => date,
    Err(_) => parse_swedish_date(value)?,
  };

  date.to_zoned(TimeZone::UTC).ok().map(|zoned| zoned.timestamp())
}

/// Absolute distance between two instants, in fractional days.
pub(crate) fn days_between(lhs: Timestamp, rhs: Timestamp) -> f64 {
  (lhs.as_millisecond() - rhs.as_millisecond()).abs() as f64 / MILLISECONDS_PER_DAY
}

fn parse_swedish_date(value: &str) -> Option<Date> {
  let mut parts = value.split_whitespace();

  let day = parts.next()?.parse::<i8>().ok()?;
  let month = swedish_month(parts.next()?)?;
  let year = parts.next()?.parse::<i16>().ok()?;

  if parts.next().is_some() {
    return None;
  }

  Date::new(year, month, day).ok()
}

fn swedish_month(name: &str) -> Option<i8> {
  let name = name.trim_end_matches('.').to_lowercase();

  let month = match name.as_str() {
    "jan" | "januari" => 1,
    "feb" | "februari" => 2,
    "mar" | "mars" => 3,
    "apr" | "april" => 4,
    "maj" => 5,
    "jun" | "juni" => 6,
    "jul" | "juli" => 7,
    "aug" | "augusti" => 8,
    "sep" | "sept" | "september" => 9,
    "okt" | "oktober" => 10,
    "nov" | "november" => 11,
    "dec" | "december" => 12,
    _ => return None,
  };

  Some(month)
}
