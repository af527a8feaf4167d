//! Configuration type definitions
//!
//! `FaceConfig` mirrors the on-disk document: every field is optional and
//! unknown keys are ignored. `FaceConfig::resolve` turns it into concrete
//! `FaceSettings`, falling back to the default for each missing or invalid
//! field independently and reporting what it replaced.

use heapless::{String, Vec};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::color::{parse_color, Rgb888};
use crate::eyes::blink::{DEFAULT_BLINK_MAX_MS, DEFAULT_BLINK_MIN_MS};
use crate::eyes::geometry::{MAX_CORNER_RADIUS, MAX_EYE_HEIGHT, MAX_EYE_WIDTH, MIN_EYE_SIZE};
use crate::eyes::Expression;

/// Maximum length of string values (colors, expression names)
pub const MAX_VALUE_LEN: usize = 16;

/// Maximum number of issues reported by one resolve
pub const MAX_CONFIG_ISSUES: usize = 16;

/// Default iris color
pub const DEFAULT_IRIS_COLOR: Rgb888 = Rgb888(0x2288FF);

/// Default happy squint level
pub const DEFAULT_HAPPY_SQUINT: u8 = 30;

/// Highest allowed squint; anything above reads as closed eyes
pub const MAX_HAPPY_SQUINT: u8 = 80;

/// Bounds on the blink interval, ms
pub const MIN_BLINK_INTERVAL_MS: u32 = 500;
pub const MAX_BLINK_INTERVAL_MS: u32 = 60_000;

/// Config value string
pub type Value = String<MAX_VALUE_LEN>;

/// Eye geometry overrides (`[eyes]`)
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EyeConfig {
    pub width: Option<u16>,
    pub height: Option<u16>,
    pub corner_radius: Option<u16>,
    pub iris_size: Option<u16>,
    pub pupil_size: Option<u16>,
    pub spacing: Option<u16>,
    pub offset_y: Option<i16>,
    pub iris_color: Option<Value>,
    pub eyebrows: Option<bool>,
    pub crows_feet: Option<bool>,
}

/// Blink interval bounds (`[blink]`)
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BlinkConfig {
    pub min_ms: Option<u32>,
    pub max_ms: Option<u32>,
}

/// Expression defaults (`[expression]`)
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExpressionConfig {
    pub default: Option<Value>,
    pub happy_squint: Option<u8>,
    pub squint_by_default: Option<bool>,
}

/// Ticker text color per expression (`[ticker]`)
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TickerColorConfig {
    pub normal: Option<Value>,
    pub sleepy: Option<Value>,
    pub asleep: Option<Value>,
    pub focused: Option<Value>,
    pub reading: Option<Value>,
    pub searching: Option<Value>,
    pub thinking: Option<Value>,
    pub terminal: Option<Value>,
    pub stressed: Option<Value>,
    pub happy: Option<Value>,
    pub done: Option<Value>,
}

impl TickerColorConfig {
    /// Configured color string for an expression
    pub fn get(&self, expression: Expression) -> Option<&Value> {
        match expression {
            Expression::Normal => self.normal.as_ref(),
            Expression::Sleepy => self.sleepy.as_ref(),
            Expression::Asleep => self.asleep.as_ref(),
            Expression::Focused => self.focused.as_ref(),
            Expression::Reading => self.reading.as_ref(),
            Expression::Searching => self.searching.as_ref(),
            Expression::Thinking => self.thinking.as_ref(),
            Expression::Terminal => self.terminal.as_ref(),
            Expression::Stressed => self.stressed.as_ref(),
            Expression::Happy => self.happy.as_ref(),
            Expression::Done => self.done.as_ref(),
        }
    }

    /// Mutable slot for an expression
    pub fn slot_mut(&mut self, expression: Expression) -> &mut Option<Value> {
        match expression {
            Expression::Normal => &mut self.normal,
            Expression::Sleepy => &mut self.sleepy,
            Expression::Asleep => &mut self.asleep,
            Expression::Focused => &mut self.focused,
            Expression::Reading => &mut self.reading,
            Expression::Searching => &mut self.searching,
            Expression::Thinking => &mut self.thinking,
            Expression::Terminal => &mut self.terminal,
            Expression::Stressed => &mut self.stressed,
            Expression::Happy => &mut self.happy,
            Expression::Done => &mut self.done,
        }
    }
}

/// Complete face configuration document
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FaceConfig {
    pub eyes: EyeConfig,
    pub blink: BlinkConfig,
    pub expression: ExpressionConfig,
    pub ticker: TickerColorConfig,
}

/// Field that fell back to its default
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigField {
    EyeWidth,
    EyeHeight,
    CornerRadius,
    IrisSize,
    PupilSize,
    EyeSpacing,
    EyeOffsetY,
    IrisColor,
    BlinkRange,
    DefaultExpression,
    HappySquint,
    TickerColor(Expression),
}

/// Problem found while resolving a config; never fatal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigIssue {
    /// Number outside its allowed range
    OutOfRange(ConfigField),
    /// Color string that is not `#RRGGBB`
    InvalidColor(ConfigField),
    /// Expression name not in the vocabulary
    UnknownExpression,
}

/// Issues collected by `FaceConfig::resolve`
pub type ConfigIssues = Vec<ConfigIssue, MAX_CONFIG_ISSUES>;

/// Concrete eye proportions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EyeDimensions {
    pub width: u16,
    pub height: u16,
    pub corner_radius: u16,
    pub iris_size: u16,
    pub pupil_size: u16,
    pub spacing: u16,
    /// How far the eye line sits above the screen's vertical center
    pub offset_y: i16,
}

impl Default for EyeDimensions {
    fn default() -> Self {
        Self {
            width: 70,
            height: 80,
            corner_radius: 12,
            iris_size: 40,
            pupil_size: 20,
            spacing: 20,
            offset_y: 20,
        }
    }
}

/// Resolved ticker colors, indexed by expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickerPalette {
    colors: [Rgb888; Expression::COUNT],
}

impl TickerPalette {
    /// Built-in ticker color for an expression
    pub const fn default_for(expression: Expression) -> Rgb888 {
        match expression {
            Expression::Sleepy => Rgb888(0x2288FF),
            Expression::Asleep => Rgb888(0x114488),
            Expression::Stressed => Rgb888(0xFF4444),
            Expression::Focused | Expression::Terminal => Rgb888(0x44FF44),
            Expression::Thinking => Rgb888(0xFFAA00),
            Expression::Searching => Rgb888(0xFF88FF),
            Expression::Reading => Rgb888(0x88DDFF),
            _ => Rgb888::WHITE,
        }
    }

    pub fn color_for(&self, expression: Expression) -> Rgb888 {
        self.colors[expression.index()]
    }

    pub fn set(&mut self, expression: Expression, color: Rgb888) {
        self.colors[expression.index()] = color;
    }
}

impl Default for TickerPalette {
    fn default() -> Self {
        let mut colors = [Rgb888::WHITE; Expression::COUNT];
        for expression in Expression::ALL {
            colors[expression.index()] = Self::default_for(expression);
        }
        Self { colors }
    }
}

/// Fully resolved face settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FaceSettings {
    pub eye: EyeDimensions,
    pub iris_color: Rgb888,
    pub eyebrows: bool,
    pub crows_feet: bool,
    pub default_expression: Expression,
    pub happy_squint: u8,
    pub squint_by_default: bool,
    pub blink_min_ms: u32,
    pub blink_max_ms: u32,
    pub ticker: TickerPalette,
}

impl Default for FaceSettings {
    fn default() -> Self {
        Self {
            eye: EyeDimensions::default(),
            iris_color: DEFAULT_IRIS_COLOR,
            eyebrows: false,
            crows_feet: false,
            default_expression: Expression::Normal,
            happy_squint: DEFAULT_HAPPY_SQUINT,
            squint_by_default: false,
            blink_min_ms: DEFAULT_BLINK_MIN_MS,
            blink_max_ms: DEFAULT_BLINK_MAX_MS,
            ticker: TickerPalette::default(),
        }
    }
}

/// Accept `value` if it is within `lo..=hi`, else report and use `default`
fn ranged<T: PartialOrd + Copy>(
    value: Option<T>,
    lo: T,
    hi: T,
    default: T,
    field: ConfigField,
    issues: &mut ConfigIssues,
) -> T {
    match value {
        Some(v) if v >= lo && v <= hi => v,
        Some(_) => {
            let _ = issues.push(ConfigIssue::OutOfRange(field));
            default
        }
        None => default,
    }
}

fn color(
    value: Option<&Value>,
    default: Rgb888,
    field: ConfigField,
    issues: &mut ConfigIssues,
) -> Rgb888 {
    match value {
        Some(s) => parse_color(s).unwrap_or_else(|| {
            let _ = issues.push(ConfigIssue::InvalidColor(field));
            default
        }),
        None => default,
    }
}

impl FaceConfig {
    /// Resolve into concrete settings
    ///
    /// Geometry fields are checked against each other (the iris must fit the
    /// eye, the pupil must fit the iris) using the already-resolved values.
    pub fn resolve(&self) -> (FaceSettings, ConfigIssues) {
        let mut issues = ConfigIssues::new();
        let defaults = FaceSettings::default();
        let d = defaults.eye;
        let e = &self.eyes;

        let width = ranged(e.width, MIN_EYE_SIZE, MAX_EYE_WIDTH, d.width, ConfigField::EyeWidth, &mut issues);
        let height = ranged(e.height, MIN_EYE_SIZE, MAX_EYE_HEIGHT, d.height, ConfigField::EyeHeight, &mut issues);
        let shortest = width.min(height);

        let corner_radius = ranged(
            e.corner_radius,
            0,
            MAX_CORNER_RADIUS.min(shortest / 2),
            d.corner_radius.min(shortest / 2),
            ConfigField::CornerRadius,
            &mut issues,
        );
        let iris_size = ranged(
            e.iris_size,
            2,
            shortest,
            d.iris_size.min(shortest),
            ConfigField::IrisSize,
            &mut issues,
        );
        let pupil_size = ranged(
            e.pupil_size,
            1,
            iris_size,
            d.pupil_size.min(iris_size),
            ConfigField::PupilSize,
            &mut issues,
        );
        let spacing = ranged(e.spacing, 0, 80, d.spacing, ConfigField::EyeSpacing, &mut issues);
        let offset_y = ranged(e.offset_y, -100, 100, d.offset_y, ConfigField::EyeOffsetY, &mut issues);

        let iris_color = color(
            e.iris_color.as_ref(),
            defaults.iris_color,
            ConfigField::IrisColor,
            &mut issues,
        );

        let (blink_min_ms, blink_max_ms) = match (self.blink.min_ms, self.blink.max_ms) {
            (None, None) => (defaults.blink_min_ms, defaults.blink_max_ms),
            (min, max) => {
                let min = min.unwrap_or(defaults.blink_min_ms);
                let max = max.unwrap_or(defaults.blink_max_ms.max(min));
                let valid = (MIN_BLINK_INTERVAL_MS..=MAX_BLINK_INTERVAL_MS).contains(&min)
                    && (MIN_BLINK_INTERVAL_MS..=MAX_BLINK_INTERVAL_MS).contains(&max)
                    && min <= max;
                if valid {
                    (min, max)
                } else {
                    let _ = issues.push(ConfigIssue::OutOfRange(ConfigField::BlinkRange));
                    (defaults.blink_min_ms, defaults.blink_max_ms)
                }
            }
        };

        let default_expression = match self.expression.default.as_ref() {
            Some(name) => Expression::from_name(name).unwrap_or_else(|| {
                let _ = issues.push(ConfigIssue::UnknownExpression);
                Expression::Normal
            }),
            None => defaults.default_expression,
        };

        let happy_squint = ranged(
            self.expression.happy_squint,
            0,
            MAX_HAPPY_SQUINT,
            defaults.happy_squint,
            ConfigField::HappySquint,
            &mut issues,
        );

        let mut ticker = TickerPalette::default();
        for expression in Expression::ALL {
            let resolved = color(
                self.ticker.get(expression),
                TickerPalette::default_for(expression),
                ConfigField::TickerColor(expression),
                &mut issues,
            );
            ticker.set(expression, resolved);
        }

        let settings = FaceSettings {
            eye: EyeDimensions {
                width,
                height,
                corner_radius,
                iris_size,
                pupil_size,
                spacing,
                offset_y,
            },
            iris_color,
            eyebrows: e.eyebrows.unwrap_or(defaults.eyebrows),
            crows_feet: e.crows_feet.unwrap_or(defaults.crows_feet),
            default_expression,
            happy_squint,
            squint_by_default: self
                .expression
                .squint_by_default
                .unwrap_or(defaults.squint_by_default),
            blink_min_ms,
            blink_max_ms,
            ticker,
        };

        (settings, issues)
    }
}
