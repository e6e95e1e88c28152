//! Tag list serialisation.
//!
//! Tag lists are stored as compact JSON arrays of strings. The store treats
//! the encoded text as opaque; encoding and decoding happen at the edges.

use crate::Result;

/// Encoded form of an empty tag list; also the column default.
pub const EMPTY_TAGS: &str = "[]";

pub fn encode_tags(tags: &[String]) -> Result<String> {
  Ok(serde_json::to_string(tags)?)
}

/// Decode a tag list. Blank input decodes to an empty list.
pub fn decode_tags(s: &str) -> Result<Vec<String>> {
  if s.trim().is_empty() {
    return Ok(Vec::new());
  }
  Ok(serde_json::from_str(s)?)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_list_encodes_to_column_default() {
    assert_eq!(encode_tags(&[]).unwrap(), EMPTY_TAGS);
  }

  #[test]
  fn decodes_stored_array() {
    let tags = decode_tags(r#"["Spontané","Cadre parfait"]"#).unwrap();
    assert_eq!(tags, ["Spontané", "Cadre parfait"]);
  }

  #[test]
  fn blank_decodes_to_empty() {
    assert!(decode_tags("").unwrap().is_empty());
  }

  #[test]
  fn malformed_text_is_a_serialization_error() {
    assert!(matches!(
      decode_tags("not json"),
      Err(crate::Error::Serialization(_))
    ));
  }
}
