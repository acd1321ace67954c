//! vCard content-line parser, reduced to the properties the sync reads.
//!
//! Pipeline:
//!   raw &str
//!     └─ unfold_lines()          → Vec<String>
//!          └─ parse_content_line() → ContentLine
//!               └─ find_property() → first BDAY / FN / N
//!                    └─ parse_birthday_value() / name helpers

use bday_core::birthday::ParsedBirthday;
use chrono::NaiveDate;

use crate::error::{Error, Result};

// ─── Content-line representation ─────────────────────────────────────────────

pub(crate) struct ContentLine {
  pub(crate) name:   String,
  pub(crate) params: Vec<Param>,
  pub(crate) value:  String,
}

pub(crate) struct Param {
  pub(crate) name:  String,
  pub(crate) value: String,
}

impl ContentLine {
  fn is_quoted_printable(&self) -> bool {
    self.params.iter().any(|p| {
      p.name.eq_ignore_ascii_case("ENCODING")
        && p.value.eq_ignore_ascii_case("QUOTED-PRINTABLE")
    })
  }

  /// Value with any vCard 3.0 transfer encoding removed.
  fn decoded_value(&self) -> String {
    if self.is_quoted_printable() {
      decode_quoted_printable(&self.value)
    } else {
      self.value.clone()
    }
  }
}

// ─── Low-level helpers ───────────────────────────────────────────────────────

/// Join CRLF+SP (or LF+SP / LF+HT) continuation lines (RFC 6350 §3.2).
/// Tolerates bare LF line endings.
pub(crate) fn unfold_lines(s: &str) -> Vec<String> {
  let mut lines: Vec<String> = Vec::new();
  for raw in s.split('\n') {
    let line = raw.strip_suffix('\r').unwrap_or(raw);
    if line.starts_with(' ') || line.starts_with('\t') {
      if let Some(last) = lines.last_mut() {
        last.push_str(&line[1..]);
      }
    } else {
      lines.push(line.to_string());
    }
  }
  lines.retain(|l| !l.is_empty());
  lines
}

/// Find the first `:` that is not inside a double-quoted string.
fn find_unquoted_colon(s: &str) -> Option<usize> {
  let mut in_quotes = false;
  for (i, c) in s.char_indices() {
    match c {
      '"' => in_quotes = !in_quotes,
      ':' if !in_quotes => return Some(i),
      _ => {}
    }
  }
  None
}

/// Split on `;` while respecting double-quoted strings.
fn split_semicolons_respecting_quotes(s: &str) -> Vec<&str> {
  let mut result = Vec::new();
  let mut start = 0usize;
  let mut in_quotes = false;
  for (i, c) in s.char_indices() {
    match c {
      '"' => in_quotes = !in_quotes,
      ';' if !in_quotes => {
        result.push(&s[start..i]);
        start = i + 1;
      }
      _ => {}
    }
  }
  result.push(&s[start..]);
  result
}

/// Minimal quoted-printable decoder for vCard 3.0 `ENCODING=QUOTED-PRINTABLE`.
fn decode_quoted_printable(s: &str) -> String {
  let bytes = s.as_bytes();
  let mut result: Vec<u8> = Vec::with_capacity(bytes.len());
  let mut i = 0;
  while i < bytes.len() {
    if bytes[i] == b'=' && i + 2 < bytes.len() {
      let hi = (bytes[i + 1] as char).to_digit(16);
      let lo = (bytes[i + 2] as char).to_digit(16);
      if let (Some(hi), Some(lo)) = (hi, lo) {
        result.push(((hi << 4) | lo) as u8);
        i += 3;
        continue;
      }
    }
    result.push(bytes[i]);
    i += 1;
  }
  String::from_utf8_lossy(&result).into_owned()
}

fn unescape_value(s: &str) -> String {
  let mut result = String::with_capacity(s.len());
  let mut chars = s.chars();
  while let Some(c) = chars.next() {
    if c == '\\' {
      match chars.next() {
        Some('n') | Some('N') => result.push('\n'),
        Some('\\') => result.push('\\'),
        Some(',') => result.push(','),
        Some(';') => result.push(';'),
        Some(other) => {
          result.push('\\');
          result.push(other);
        }
        None => result.push('\\'),
      }
    } else {
      result.push(c);
    }
  }
  result
}

/// Split a structured value on unescaped `;`.
fn split_components(s: &str) -> Vec<String> {
  let mut parts = Vec::new();
  let mut current = String::new();
  let mut chars = s.chars();
  while let Some(c) = chars.next() {
    match c {
      '\\' => {
        current.push(c);
        if let Some(next) = chars.next() {
          current.push(next);
        }
      }
      ';' => parts.push(std::mem::take(&mut current)),
      _ => current.push(c),
    }
  }
  parts.push(current);
  parts
}

// ─── Content-line parser ─────────────────────────────────────────────────────

fn parse_content_line(line: &str) -> Result<ContentLine> {
  let colon_pos = find_unquoted_colon(line)
    .ok_or_else(|| Error::MalformedContentLine(line.to_string()))?;

  let name_part = &line[..colon_pos];
  let value = line[colon_pos + 1..].to_string();

  let tokens = split_semicolons_respecting_quotes(name_part);
  let name_raw = tokens[0].trim();
  if name_raw.is_empty() {
    return Err(Error::MalformedContentLine(line.to_string()));
  }

  // Strip group prefix (e.g. "item1.BDAY" → "BDAY")
  let name = match name_raw.rfind('.') {
    Some(dot_pos) => name_raw[dot_pos + 1..].to_uppercase(),
    None => name_raw.to_uppercase(),
  };

  let params = tokens[1..]
    .iter()
    .filter_map(|token| {
      let (param_name, param_val) = token.split_once('=')?;
      Some(Param {
        name:  param_name.trim().to_uppercase(),
        value: param_val.trim().trim_matches('"').to_string(),
      })
    })
    .collect();

  Ok(ContentLine { name, params, value })
}

/// First well-formed content line named `name` (case-insensitive).
pub(crate) fn find_property(card: &str, name: &str) -> Option<ContentLine> {
  unfold_lines(card)
    .iter()
    .filter_map(|line| parse_content_line(line).ok())
    .find(|cl| cl.name.eq_ignore_ascii_case(name))
}

// ─── Birthday values ─────────────────────────────────────────────────────────

/// Interpret a `BDAY` value. Accepted shapes, tried in order:
///
/// 1. `--MM-DD` (or `--MMDD`): month and day, no year.
/// 2. anything with `-` in its first 10 characters: `YYYY-MM-DD`, with any
///    trailing time part ignored. The year must be four plain digits.
/// 3. exactly 8 digits: `YYYYMMDD`.
///
/// Years before 1 are invalid in every shape.
pub(crate) fn parse_birthday_value(value: &str) -> Result<ParsedBirthday> {
  let value = value.trim();
  let invalid = || Error::InvalidDate { value: value.to_string() };

  if let Some(rest) = value.strip_prefix("--") {
    let (month, day) = match rest.split_once('-') {
      Some(parts) => parts,
      None if rest.len() == 4 && rest.is_ascii() => rest.split_at(2),
      None => return Err(invalid()),
    };
    let month = month.parse::<u32>().map_err(|_| invalid())?;
    let day = day.parse::<u32>().map_err(|_| invalid())?;
    return ParsedBirthday::new(month, day, None).ok_or_else(invalid);
  }

  let head: String = value.chars().take(10).collect();
  if head.contains('-') {
    // `%Y` alone would also take a sign or a short year.
    let bytes = head.as_bytes();
    let four_digit_year = bytes.len() > 4
      && bytes[..4].iter().all(u8::is_ascii_digit)
      && bytes[4] == b'-';
    if !four_digit_year {
      return Err(invalid());
    }
    let date =
      NaiveDate::parse_from_str(&head, "%Y-%m-%d").map_err(|_| invalid())?;
    return ParsedBirthday::from_date(date).ok_or_else(invalid);
  }

  if value.len() == 8 {
    if !value.bytes().all(|b| b.is_ascii_digit()) {
      return Err(invalid());
    }
    let year = value[..4].parse::<i32>().map_err(|_| invalid())?;
    let month = value[4..6].parse::<u32>().map_err(|_| invalid())?;
    let day = value[6..].parse::<u32>().map_err(|_| invalid())?;
    return ParsedBirthday::new(month, day, Some(year)).ok_or_else(invalid);
  }

  Err(Error::UnsupportedShape { value: value.to_string() })
}

// ─── Names ───────────────────────────────────────────────────────────────────

/// Trimmed, unescaped `FN` value; `None` when absent or blank.
pub(crate) fn formatted_name(card: &str) -> Option<String> {
  let line = find_property(card, "FN")?;
  let name = unescape_value(&line.decoded_value());
  let name = name.trim();
  (!name.is_empty()).then(|| name.to_string())
}

/// `"given family"` from `N` (family;given;additional;prefix;suffix).
pub(crate) fn structured_name(card: &str) -> Option<String> {
  let line = find_property(card, "N")?;
  let parts = split_components(&line.decoded_value());
  let family = parts.first().map(|s| unescape_value(s)).unwrap_or_default();
  let given = parts.get(1).map(|s| unescape_value(s)).unwrap_or_default();
  let name = format!("{} {}", given.trim(), family.trim());
  let name = name.trim();
  (!name.is_empty()).then(|| name.to_string())
}

// ─── Tests ───────────────────────────────────────────────────────────────────
