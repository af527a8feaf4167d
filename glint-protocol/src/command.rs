//! Command parsing
//!
//! Commands borrow their text from the line they were parsed from.
//! Prefixes are case-sensitive; `SCREEN` arguments are not.

/// Highest backlight level
pub const MAX_BRIGHTNESS: u8 = 100;

/// Errors that can occur while parsing a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Line is blank
    Empty,
    /// No known command prefix
    UnknownCommand,
    /// `SCREEN:DIM` value is not a non-negative integer
    InvalidBrightness,
}

/// Backlight control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScreenCommand {
    On,
    Off,
    /// Level in percent, clamped to 100
    Dim(u8),
}

impl ScreenCommand {
    /// Parse the argument after `SCREEN:`
    pub fn parse(arg: &str) -> Result<Self, ParseError> {
        let arg = arg.trim();
        if arg.eq_ignore_ascii_case("ON") {
            return Ok(ScreenCommand::On);
        }
        if arg.eq_ignore_ascii_case("OFF") {
            return Ok(ScreenCommand::Off);
        }

        match arg.split_once(':') {
            Some((name, value)) if name.trim().eq_ignore_ascii_case("DIM") => {
                let level: u32 = value
                    .trim()
                    .parse()
                    .map_err(|_| ParseError::InvalidBrightness)?;
                Ok(ScreenCommand::Dim(level.min(MAX_BRIGHTNESS as u32) as u8))
            }
            _ => Err(ParseError::UnknownCommand),
        }
    }
}

/// A command from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command<'a> {
    /// Ticker text, leading spaces removed
    Status(&'a str),
    /// Clear the ticker
    Clear,
    /// Backlight control
    Screen(ScreenCommand),
    /// Expression name, not validated here
    Expression(&'a str),
}

impl<'a> Command<'a> {
    /// Parse one line
    pub fn parse(line: &'a str) -> Result<Self, ParseError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(ParseError::Empty);
        }

        if let Some(text) = line.strip_prefix("S:") {
            return Ok(Command::Status(text.trim_start()));
        }
        if line.starts_with("CLEAR") {
            return Ok(Command::Clear);
        }
        if let Some(arg) = line.strip_prefix("SCREEN:") {
            return ScreenCommand::parse(arg).map(Command::Screen);
        }
        if let Some(name) = line.strip_prefix("E:") {
            return Ok(Command::Expression(name.trim()));
        }

        Err(ParseError::UnknownCommand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status() {
        assert_eq!(
            Command::parse("S:Building crate"),
            Ok(Command::Status("Building crate"))
        );
        assert_eq!(Command::parse("S:   padded"), Ok(Command::Status("padded")));
        assert_eq!(Command::parse("S:"), Ok(Command::Status("")));
    }

    #[test]
    fn test_status_keeps_colons() {
        assert_eq!(
            Command::parse("S:E:not an expression"),
            Ok(Command::Status("E:not an expression"))
        );
    }

    #[test]
    fn test_clear() {
        assert_eq!(Command::parse("CLEAR"), Ok(Command::Clear));
        assert_eq!(Command::parse("  CLEAR  "), Ok(Command::Clear));
    }

    #[test]
    fn test_screen_on_off_any_case() {
        assert_eq!(
            Command::parse("SCREEN:ON"),
            Ok(Command::Screen(ScreenCommand::On))
        );
        assert_eq!(
            Command::parse("SCREEN:off"),
            Ok(Command::Screen(ScreenCommand::Off))
        );
        assert_eq!(
            Command::parse("SCREEN: On "),
            Ok(Command::Screen(ScreenCommand::On))
        );
    }

    #[test]
    fn test_screen_dim() {
        assert_eq!(
            Command::parse("SCREEN:DIM:40"),
            Ok(Command::Screen(ScreenCommand::Dim(40)))
        );
        assert_eq!(
            Command::parse("SCREEN:dim:0"),
            Ok(Command::Screen(ScreenCommand::Dim(0)))
        );
        assert_eq!(
            Command::parse("SCREEN:DIM:250"),
            Ok(Command::Screen(ScreenCommand::Dim(100)))
        );
    }

    #[test]
    fn test_screen_dim_rejects_garbage() {
        assert_eq!(
            Command::parse("SCREEN:DIM:bright"),
            Err(ParseError::InvalidBrightness)
        );
        assert_eq!(
            Command::parse("SCREEN:DIM:-5"),
            Err(ParseError::InvalidBrightness)
        );
        assert_eq!(
            Command::parse("SCREEN:DIM:"),
            Err(ParseError::InvalidBrightness)
        );
        assert_eq!(
            Command::parse("SCREEN:BLINK"),
            Err(ParseError::UnknownCommand)
        );
    }

    #[test]
    fn test_expression() {
        assert_eq!(
            Command::parse("E:reading"),
            Ok(Command::Expression("reading"))
        );
        assert_eq!(
            Command::parse("E:  Happy "),
            Ok(Command::Expression("Happy"))
        );
    }

    #[test]
    fn test_unknown_and_empty() {
        assert_eq!(Command::parse(""), Err(ParseError::Empty));
        assert_eq!(Command::parse("   "), Err(ParseError::Empty));
        assert_eq!(Command::parse("HELLO"), Err(ParseError::UnknownCommand));
        assert_eq!(Command::parse("s:lowercase"), Err(ParseError::UnknownCommand));
    }
}
