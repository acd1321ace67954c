//! Change-stable comparison of calendar documents.
//!
//! Two documents are equivalent when they match line for line after line
//! endings are normalised and the per-generation timestamp properties are
//! dropped.

/// Properties rewritten on every generation and ignored when comparing.
pub const DYNAMIC_PROPERTIES: [&str; 3] = ["DTSTAMP", "CREATED", "LAST-MODIFIED"];

/// Property name of a content line (before the first `;` or `:`).
fn property_name(line: &str) -> &str {
  let end = line.find([';', ':']).unwrap_or(line.len());
  &line[..end]
}

fn is_dynamic(line: &str) -> bool {
  let name = property_name(line);
  DYNAMIC_PROPERTIES
    .iter()
    .any(|p| p.eq_ignore_ascii_case(name))
}

/// Logical lines of `doc` with the dynamic timestamp properties removed.
pub fn stable_lines(doc: &str) -> Vec<String> {
  let normalized = doc.replace("\r\n", "\n").replace('\r', "\n");
  let mut lines: Vec<String> = Vec::new();
  for line in normalized.split('\n') {
    if line.starts_with(' ') || line.starts_with('\t') {
      if let Some(last) = lines.last_mut() {
        last.push_str(&line[1..]);
        continue;
      }
    }
    lines.push(line.to_string());
  }
  lines.retain(|l| !l.is_empty() && !is_dynamic(l));
  lines
}

/// `true` when rewriting `stored` with `fresh` would change nothing but
/// timestamps.
pub fn is_equivalent(stored: &str, fresh: &str) -> bool {
  stable_lines(stored) == stable_lines(fresh)
}
