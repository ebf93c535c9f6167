// A color predicate is a per-pixel membership test built from inclusive
// per-channel ranges. Predicates are plain data so they can be listed in a
// theme table, loaded from JSON and tested without any image asset.

use crate::core_modules::pixel::pixel::{Channel, Pixel};
use crate::error::{LocatorError, Result};
use serde::{Deserialize, Serialize};

/// An inclusive `min..=max` channel range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "[Channel; 2]", into = "[Channel; 2]")]
pub struct ChannelRange {
    min: Channel,
    max: Channel,
}

impl ChannelRange {
    pub fn new(min: Channel, max: Channel) -> Result<Self> {
        if min > max {
            return Err(LocatorError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// Built-in ranges are literals known to be ordered.
    const fn fixed(min: Channel, max: Channel) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn contains(&self, value: Channel) -> bool {
        self.min <= value && value <= self.max
    }
}

impl TryFrom<[Channel; 2]> for ChannelRange {
    type Error = LocatorError;

    fn try_from([min, max]: [Channel; 2]) -> Result<Self> {
        ChannelRange::new(min, max)
    }
}

impl From<ChannelRange> for [Channel; 2] {
    fn from(range: ChannelRange) -> Self {
        [range.min, range.max]
    }
}

/// `red ∧ green ∧ blue` range membership. Alpha is never consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPredicate {
    pub red: ChannelRange,
    pub green: ChannelRange,
    pub blue: ChannelRange,
}

impl ColorPredicate {
    pub fn new(red: ChannelRange, green: ChannelRange, blue: ChannelRange) -> Self {
        Self { red, green, blue }
    }

    /// Convenience constructor over `(min, max)` pairs.
    pub fn from_bounds(red: (Channel, Channel), green: (Channel, Channel), blue: (Channel, Channel)) -> Result<Self> {
        Ok(Self::new(
            ChannelRange::new(red.0, red.1)?,
            ChannelRange::new(green.0, green.1)?,
            ChannelRange::new(blue.0, blue.1)?,
        ))
    }

    #[inline]
    pub fn matches(&self, pixel: &Pixel) -> bool {
        self.red.contains(pixel.red) && self.green.contains(pixel.green) && self.blue.contains(pixel.blue)
    }

    /// The phone_dark screen green, sampled at RGB(87, 159, 42).
    pub const fn dark_green() -> Self {
        Self {
            red: ChannelRange::fixed(80, 95),
            green: ChannelRange::fixed(150, 165),
            blue: ChannelRange::fixed(35, 50),
        }
    }

    /// Nokia LCD green, #9bbc0f.
    pub const fn nokia_lcd() -> Self {
        Self {
            red: ChannelRange::fixed(150, 160),
            green: ChannelRange::fixed(185, 195),
            blue: ChannelRange::fixed(10, 20),
        }
    }

    /// phone_light screen, RGB(0, 179, 94).
    pub const fn light_cyan() -> Self {
        Self {
            red: ChannelRange::fixed(0, 5),
            green: ChannelRange::fixed(175, 185),
            blue: ChannelRange::fixed(90, 100),
        }
    }

    /// phone_black screen, RGB(180, 180, 180).
    pub const fn black_gray() -> Self {
        Self {
            red: ChannelRange::fixed(175, 185),
            green: ChannelRange::fixed(175, 185),
            blue: ChannelRange::fixed(175, 185),
        }
    }

    /// phone_pink screen, RGB(0, 138, 255). The blue bound saturates at 255.
    pub const fn pink_blue() -> Self {
        Self {
            red: ChannelRange::fixed(0, 5),
            green: ChannelRange::fixed(135, 145),
            blue: ChannelRange::fixed(250, 255),
        }
    }

    /// Any very dark pixel (every channel below 60), the broad fallback.
    pub const fn very_dark() -> Self {
        Self {
            red: ChannelRange::fixed(0, 59),
            green: ChannelRange::fixed(0, 59),
            blue: ChannelRange::fixed(0, 59),
        }
    }
}
