//! Key paths into a document
//!
//! Supports:
//! - a.b.c (dotted keys)
//! - a[0].b and a[0][1] (sequence indices)
//! - a.0.b (numeric segment as index)
//! - optional `$.` prefix, `$` alone is the root
//!
//! A numeric segment applied to a mapping falls back to the key of the same
//! spelling, so TOML tables keyed `"0"` stay reachable.

use std::fmt;

use serde_json::Value;

use crate::error::{ConfigError, Result};

/// A parsed path segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Mapping key: .field
    Key(String),
    /// Sequence index: [0]
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(k) => f.write_str(k),
            Segment::Index(i) => write!(f, "[{i}]"),
        }
    }
}

/// Parse a path string into segments
///
/// Examples:
/// - "app.controller" → [Key("app"), Key("controller")]
/// - "servers[0].host" → [Key("servers"), Index(0), Key("host")]
pub fn parse(path: &str) -> Result<Vec<Segment>> {
    let invalid = || ConfigError::InvalidConfigKey {
        path: path.to_string(),
    };

    let body = if let Some(rest) = path.strip_prefix("$.") {
        rest
    } else if path == "$" {
        return Ok(vec![]);
    } else {
        path
    };

    if body.is_empty() {
        return Err(invalid());
    }

    let mut segments = Vec::new();

    for part in body.split('.') {
        if part.is_empty() {
            return Err(invalid());
        }

        let Some(bracket_pos) = part.find('[') else {
            match part.parse::<usize>() {
                Ok(index) => segments.push(Segment::Index(index)),
                Err(_) => segments.push(Segment::Key(part.to_string())),
            }
            continue;
        };

        let key = &part[..bracket_pos];
        if !key.is_empty() {
            segments.push(Segment::Key(key.to_string()));
        }

        // One or more [n] groups, nothing trailing
        let mut rest = &part[bracket_pos..];
        while !rest.is_empty() {
            let inner = rest.strip_prefix('[').ok_or_else(invalid)?;
            let close = inner.find(']').ok_or_else(invalid)?;
            let index: usize = inner[..close].parse().map_err(|_| invalid())?;
            segments.push(Segment::Index(index));
            rest = &inner[close + 1..];
        }
    }

    Ok(segments)
}

/// Render segments back to the dotted form used in error messages
pub fn display(segments: &[Segment]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Key(k) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(k);
            }
            Segment::Index(i) => out.push_str(&format!("[{i}]")),
        }
    }
    if out.is_empty() {
        out.push('$');
    }
    out
}

fn step<'v>(value: &'v Value, segment: &Segment) -> Option<&'v Value> {
    match (segment, value) {
        (Segment::Key(k), Value::Object(map)) => map.get(k),
        (Segment::Index(i), Value::Array(items)) => items.get(*i),
        (Segment::Index(i), Value::Object(map)) => map.get(&i.to_string()),
        _ => None,
    }
}

fn step_mut<'v>(value: &'v mut Value, segment: &Segment) -> Option<&'v mut Value> {
    match (segment, value) {
        (Segment::Key(k), Value::Object(map)) => map.get_mut(k),
        (Segment::Index(i), Value::Array(items)) => items.get_mut(*i),
        (Segment::Index(i), Value::Object(map)) => map.get_mut(&i.to_string()),
        _ => None,
    }
}

/// Borrow the node at `segments`
pub fn lookup<'v>(value: &'v Value, segments: &[Segment]) -> Option<&'v Value> {
    segments.iter().try_fold(value, step)
}

/// Mutably borrow the node at `segments`
pub fn lookup_mut<'v>(value: &'v mut Value, segments: &[Segment]) -> Option<&'v mut Value> {
    segments.iter().try_fold(value, step_mut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_simple_path() {
        let segments = parse("$.a.b.c").unwrap();
        assert_eq!(
            segments,
            vec![
                Segment::Key("a".to_string()),
                Segment::Key("b".to_string()),
                Segment::Key("c".to_string()),
            ]
        );
    }

    #[test]
    fn parse_with_indices() {
        let segments = parse("servers[0][2].host").unwrap();
        assert_eq!(
            segments,
            vec![
                Segment::Key("servers".to_string()),
                Segment::Index(0),
                Segment::Index(2),
                Segment::Key("host".to_string()),
            ]
        );
    }

    #[test]
    fn parse_just_root() {
        assert!(parse("$").unwrap().is_empty());
    }

    #[test]
    fn parse_rejects_malformed() {
        for bad in ["", "a..b", "a[", "a[x]", "a[0]b", ".a", "a."] {
            assert!(
                matches!(parse(bad), Err(ConfigError::InvalidConfigKey { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn lookup_nested() {
        let value = json!({"users": [{"name": "Alice"}, {"name": "Bob"}]});
        let segments = parse("users[1].name").unwrap();
        assert_eq!(lookup(&value, &segments), Some(&json!("Bob")));
    }

    #[test]
    fn numeric_segment_matches_mapping_key() {
        let value = json!({"shards": {"0": "primary"}});
        let segments = parse("shards.0").unwrap();
        assert_eq!(lookup(&value, &segments), Some(&json!("primary")));
    }

    #[test]
    fn lookup_through_scalar_is_none() {
        let value = json!({"a": 1});
        assert_eq!(lookup(&value, &parse("a.b").unwrap()), None);
    }

    #[test]
    fn lookup_mut_writes_in_place() {
        let mut value = json!({"a": {"b": 1}});
        *lookup_mut(&mut value, &parse("a.b").unwrap()).unwrap() = json!(2);
        assert_eq!(value, json!({"a": {"b": 2}}));
    }

    #[test]
    fn display_round_trips() {
        let segments = parse("a.list[3].b").unwrap();
        assert_eq!(display(&segments), "a.list[3].b");
        assert_eq!(display(&[]), "$");
    }
}
