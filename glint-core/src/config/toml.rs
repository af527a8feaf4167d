//! Simple TOML reader for the face configuration
//!
//! This is a minimal parser that handles only the subset used by
//! `face.toml`. It does NOT support the full TOML syntax.
//!
//! Supported features:
//! - Key = value pairs (string, integer, boolean)
//! - [section] headers
//! - Comments (# ...), including trailing comments
//!
//! NOT supported:
//! - Arrays, inline tables, multi-line strings
//! - Dotted keys and nested section headers
//!
//! Unknown sections and keys are skipped. A value that does not parse as
//! its field's type leaves that field unset, so it falls back to its
//! default when the config is resolved.

use core::str::FromStr;

use super::types::{FaceConfig, Value};
use crate::eyes::Expression;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Malformed section header
    InvalidSection {
        line: usize,
    },
    /// Line is neither a header, a comment nor `key = value`
    InvalidLine {
        line: usize,
    },
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Eyes,
    Blink,
    Expression,
    Ticker,
    Unknown,
}

/// Parse TOML configuration into FaceConfig
pub fn parse_config(input: &str) -> Result<FaceConfig, ParseError> {
    let mut config = FaceConfig::default();
    let mut section = Section::Root;

    for (index, line) in input.lines().enumerate() {
        let number = index + 1;
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            section = parse_section_header(strip_comment(line))
                .ok_or(ParseError::InvalidSection { line: number })?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidLine { line: number })?;
        apply_value(&mut config, section, key, value);
    }

    Ok(config)
}

/// Parse a `[name]` header
fn parse_section_header(header: &str) -> Option<Section> {
    let name = header.strip_prefix('[')?.strip_suffix(']')?.trim();
    if name.is_empty() || name.starts_with('[') {
        return None;
    }

    Some(match name {
        "eyes" => Section::Eyes,
        "blink" => Section::Blink,
        "expression" => Section::Expression,
        "ticker" | "ticker_colors" => Section::Ticker,
        _ => Section::Unknown,
    })
}

/// Remove a trailing comment that is not inside a string
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return line[..i].trim_end(),
            _ => {}
        }
    }
    line
}

/// Split `key = value`
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = strip_comment(line[eq_pos + 1..].trim());

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> Option<Value> {
    let inner = if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        &value[1..value.len() - 1]
    } else {
        // Allow unquoted strings for simple values
        value
    };
    let mut out = Value::new();
    out.push_str(inner).ok()?;
    Some(out)
}

/// Parse an integer value
fn parse_int<T: FromStr>(value: &str) -> Option<T> {
    value.parse().ok()
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Apply a parsed value to the config
fn apply_value(config: &mut FaceConfig, section: Section, key: &str, value: &str) {
    match section {
        Section::Eyes => {
            let eyes = &mut config.eyes;
            match key {
                "width" => eyes.width = parse_int(value),
                "height" => eyes.height = parse_int(value),
                "corner_radius" => eyes.corner_radius = parse_int(value),
                "iris_size" => eyes.iris_size = parse_int(value),
                "pupil_size" => eyes.pupil_size = parse_int(value),
                "spacing" => eyes.spacing = parse_int(value),
                "offset_y" => eyes.offset_y = parse_int(value),
                "iris_color" => eyes.iris_color = parse_string(value),
                "eyebrows" => eyes.eyebrows = parse_bool(value),
                "crows_feet" => eyes.crows_feet = parse_bool(value),
                _ => {}
            }
        }
        Section::Blink => match key {
            "min_ms" => config.blink.min_ms = parse_int(value),
            "max_ms" => config.blink.max_ms = parse_int(value),
            _ => {}
        },
        Section::Expression => {
            let expression = &mut config.expression;
            match key {
                "default" => expression.default = parse_string(value),
                "happy_squint" => expression.happy_squint = parse_int(value),
                "squint_by_default" => expression.squint_by_default = parse_bool(value),
                _ => {}
            }
        }
        Section::Ticker => {
            if let Some(expression) = Expression::from_name(key) {
                *config.ticker.slot_mut(expression) = parse_string(value);
            }
        }
        Section::Root | Section::Unknown => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb888;

    const SAMPLE: &str = r##"
# Glint face
[eyes]
width = 72          # slightly wider
height = 84
iris_color = "#44FF44"
eyebrows = true

[blink]
min_ms = 2500
max_ms = 5000

[expression]
default = "sleepy"
happy_squint = 35
squint_by_default = true

[ticker]
happy = "#FFFF00"

[future_section]
sparkle = 3
"##;

    #[test]
    fn test_parse_sample() {
        let config = parse_config(SAMPLE).unwrap();
        assert_eq!(config.eyes.width, Some(72));
        assert_eq!(config.eyes.height, Some(84));
        assert_eq!(config.eyes.iris_color.as_deref(), Some("#44FF44"));
        assert_eq!(config.eyes.eyebrows, Some(true));
        assert_eq!(config.eyes.crows_feet, None);
        assert_eq!(config.blink.min_ms, Some(2500));
        assert_eq!(config.expression.default.as_deref(), Some("sleepy"));
        assert_eq!(config.expression.squint_by_default, Some(true));
        assert_eq!(config.ticker.happy.as_deref(), Some("#FFFF00"));
    }

    #[test]
    fn test_sample_resolves() {
        let (settings, issues) = parse_config(SAMPLE).unwrap().resolve();
        assert!(issues.is_empty());
        assert_eq!(settings.iris_color, Rgb888(0x44FF44));
        assert_eq!(settings.default_expression, Expression::Sleepy);
        assert_eq!(settings.happy_squint, 35);
        assert_eq!(settings.blink_max_ms, 5000);
    }

    #[test]
    fn test_bad_value_leaves_field_unset() {
        let config = parse_config("[eyes]\nwidth = wide\nheight = 90\n").unwrap();
        assert_eq!(config.eyes.width, None);
        assert_eq!(config.eyes.height, Some(90));
    }

    #[test]
    fn test_negative_and_overflowing_ints() {
        let config = parse_config("[eyes]\noffset_y = -10\nwidth = 70000\n").unwrap();
        assert_eq!(config.eyes.offset_y, Some(-10));
        assert_eq!(config.eyes.width, None);
    }

    #[test]
    fn test_hash_inside_string_is_kept() {
        let config = parse_config("[eyes]\niris_color = \"#2288FF\" # blue\n").unwrap();
        assert_eq!(config.eyes.iris_color.as_deref(), Some("#2288FF"));
    }

    #[test]
    fn test_overlong_string_is_dropped() {
        let config = parse_config("[expression]\ndefault = \"a-very-long-expression-name\"\n").unwrap();
        assert_eq!(config.expression.default, None);
    }

    #[test]
    fn test_structural_errors() {
        assert_eq!(
            parse_config("[eyes\nwidth = 3\n"),
            Err(ParseError::InvalidSection { line: 1 })
        );
        assert_eq!(
            parse_config("[eyes]\nwidth\n"),
            Err(ParseError::InvalidLine { line: 2 })
        );
        assert_eq!(
            parse_config("[[eyes]]\n"),
            Err(ParseError::InvalidSection { line: 1 })
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_config(""), Ok(FaceConfig::default()));
        assert_eq!(parse_config("# nothing\n\n"), Ok(FaceConfig::default()));
    }
}
