//! Contact input and the birthday value extracted from it.

use chrono::{Datelike, NaiveDate};

/// Property name a card must contain to be considered at all.
pub const BIRTHDAY_MARKER: &str = "BDAY";

/// Placeholder origin year for birthdays recorded without a year.
pub const EPOCH_YEAR: i32 = 1970;

/// Origin year for a yearless February 29; 1970 has no such day.
pub const LEAP_PLACEHOLDER_YEAR: i32 = 1972;

/// Earliest birth year accepted.
pub const MIN_YEAR: i32 = 1;

/// A raw contact as read from the contact store. Read-only to this system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRecord {
  /// Unique source identifier of the card.
  pub uri:       String,
  /// Raw vCard text.
  pub card_data: String,
}

/// A birthday parsed out of a contact.
///
/// `year` is `None` when the card records only month and day. That state is
/// distinct from any concrete year; the placeholder origin year used for
/// whole-day arithmetic is only visible through [`ParsedBirthday::origin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedBirthday {
  month:  u32,
  day:    u32,
  year:   Option<i32>,
  origin: NaiveDate,
}

impl ParsedBirthday {
  /// Validate and build a birthday. Returns `None` unless `month`/`day`
  /// (in `year`, or in a leap year when `year` is absent) is a real date
  /// and `year` is not before [`MIN_YEAR`].
  pub fn new(month: u32, day: u32, year: Option<i32>) -> Option<Self> {
    let origin_year = match year {
      Some(y) if y < MIN_YEAR => return None,
      Some(y) => y,
      None if month == 2 && day == 29 => LEAP_PLACEHOLDER_YEAR,
      None => EPOCH_YEAR,
    };
    let origin = NaiveDate::from_ymd_opt(origin_year, month, day)?;
    Some(Self { month, day, year, origin })
  }

  /// Build from a full calendar date (year known). `None` before [`MIN_YEAR`].
  pub fn from_date(date: NaiveDate) -> Option<Self> {
    if date.year() < MIN_YEAR {
      return None;
    }
    Some(Self {
      month:  date.month(),
      day:    date.day(),
      year:   Some(date.year()),
      origin: date,
    })
  }

  pub fn month(&self) -> u32 { self.month }

  pub fn day(&self) -> u32 { self.day }

  /// The real birth year, if the card carried one.
  pub fn year(&self) -> Option<i32> { self.year }

  /// The first occurrence used as the event's start date.
  pub fn origin(&self) -> NaiveDate { self.origin }
}
