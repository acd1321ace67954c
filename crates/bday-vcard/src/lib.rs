//! Birthday extraction from raw vCard 3.0 / 4.0 text.
//!
//! Pure synchronous; no database dependencies. A card without a usable
//! birthday is not an error: the contact is simply left out of the sync set.
//!
//! # Quick start
//!
//! ```
//! use bday_vcard::{extract_birthday, extract_name};
//!
//! let card = "BEGIN:VCARD\r\nFN:Jane Doe\r\nBDAY:1990-07-04\r\nEND:VCARD\r\n";
//! let bday = extract_birthday(card).unwrap();
//! assert_eq!((bday.month(), bday.day(), bday.year()), (7, 4, Some(1990)));
//! assert_eq!(extract_name(card), "Jane Doe");
//! ```

pub mod error;
mod parse;

use bday_core::birthday::ParsedBirthday;
pub use error::{Error, Result};

/// Display name used when a card has neither `FN` nor a usable `N`.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Parse the first `BDAY` property of `card`.
///
/// Returns `Ok(None)` when the card has no `BDAY` property and `Err(…)` when
/// the value is present but not one of the accepted shapes.
pub fn parse_birthday(card: &str) -> Result<Option<ParsedBirthday>> {
  match parse::find_property(card, "BDAY") {
    Some(line) => parse::parse_birthday_value(&line.value).map(Some),
    None => Ok(None),
  }
}

/// Extract the birthday of `card`, treating every failure as "not found".
pub fn extract_birthday(card: &str) -> Option<ParsedBirthday> {
  match parse_birthday(card) {
    Ok(bday) => bday,
    Err(e) => {
      tracing::debug!("skipping birthday: {e}");
      None
    }
  }
}

/// Display name for `card`: `FN`, else `"given family"` from `N`, else
/// [`UNKNOWN_NAME`]. Never fails.
pub fn extract_name(card: &str) -> String {
  parse::formatted_name(card)
    .or_else(|| parse::structured_name(card))
    .unwrap_or_else(|| UNKNOWN_NAME.to_string())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn card(props: &str) -> String {
    format!("BEGIN:VCARD\r\nVERSION:3.0\r\n{props}END:VCARD\r\n")
  }

  #[test]
  fn all_accepted_shapes_yield_april_fifteenth() {
    for (value, year) in [
      ("--04-15", None),
      ("1985-04-15", Some(1985)),
      ("19850415", Some(1985)),
    ] {
      let bday = extract_birthday(&card(&format!("BDAY:{value}\r\n")))
        .unwrap_or_else(|| panic!("{value} should parse"));
      assert_eq!(bday.month(), 4, "{value}");
      assert_eq!(bday.day(), 15, "{value}");
      assert_eq!(bday.year(), year, "{value}");
    }
  }

  #[test]
  fn rejected_shapes_are_not_found() {
    for value in [
      "04/15/1985",
      "1985041",
      "April 15",
      "--13-01",
      "1985-02-30",
      "+1985-04-15",
      "-1985-04-15",
      "985-04-15",
      "0000-01-01",
      "00000101",
    ] {
      assert!(
        extract_birthday(&card(&format!("BDAY:{value}\r\n"))).is_none(),
        "{value} should be rejected"
      );
    }
  }

  #[test]
  fn missing_or_empty_card_has_no_birthday() {
    assert!(extract_birthday("").is_none());
    assert!(matches!(parse_birthday(&card("FN:Nobody\r\n")), Ok(None)));
  }

  #[test]
  fn malformed_value_reports_reason() {
    let r = parse_birthday(&card("BDAY:04/15/1985\r\n"));
    assert!(matches!(r, Err(Error::UnsupportedShape { .. })));
    let r = parse_birthday(&card("BDAY:1985-13-01\r\n"));
    assert!(matches!(r, Err(Error::InvalidDate { .. })));
  }

  #[test]
  fn name_prefers_fn() {
    let c = card("N:Doe;Jane;;;\r\nFN:Janie Doe\r\n");
    assert_eq!(extract_name(&c), "Janie Doe");
  }

  #[test]
  fn name_falls_back_to_structured_name() {
    let c = card("N:Doe;Jane;;;\r\n");
    assert_eq!(extract_name(&c), "Jane Doe");
    let c = card("N:Doe;;;;\r\n");
    assert_eq!(extract_name(&c), "Doe");
  }

  #[test]
  fn name_placeholder_when_absent() {
    assert_eq!(extract_name(&card("BDAY:--01-01\r\n")), UNKNOWN_NAME);
    assert_eq!(extract_name(""), UNKNOWN_NAME);
  }
}
