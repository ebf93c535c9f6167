// THEORY:
// The `Pixel` module is the most fundamental unit of the locator. It is a "dumb"
// data container for a single decoded sample. It knows how to build itself from
// raw bytes or loosely typed channel tuples and nothing else. Membership
// testing lives in `color_predicate`, and scanning lives in the detectors.
//
// Key principles:
// 1) Always RGBA in memory: an RGB source gets an opaque alpha, and the owning
//    `PixelGrid` remembers the source layout so encoding can drop it again.
// 2) Fail fast on malformed data: channel values outside 0..=255 or a tuple
//    that is neither 3 nor 4 wide are rejected, never wrapped or truncated.

pub mod pixel {
    use crate::error::{LocatorError, Result};
    use serde::{Deserialize, Serialize};
    use std::fmt;
    use std::str::FromStr;

    pub type Channel = u8;

    pub const RGB_CHANNELS: usize = 3;
    pub const RGBA_CHANNELS: usize = 4;

    /// A single RGBA sample.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Pixel {
        /// The red channel value (0-255).
        pub red: Channel,
        /// The green channel value (0-255).
        pub green: Channel,
        /// The blue channel value (0-255).
        pub blue: Channel,
        /// The alpha (transparency) channel value (0-255).
        pub alpha: Channel,
    }

    impl Default for Pixel {
        fn default() -> Self {
            Pixel::opaque(0, 0, 0)
        }
    }

    impl Pixel {
        pub fn new(red: Channel, green: Channel, blue: Channel, alpha: Channel) -> Self {
            Pixel {
                red,
                green,
                blue,
                alpha,
            }
        }

        pub fn opaque(red: Channel, green: Channel, blue: Channel) -> Self {
            Pixel::new(red, green, blue, Channel::MAX)
        }

        pub fn rgb(&self) -> Rgb {
            Rgb::new(self.red, self.green, self.blue)
        }

        /// Returns this pixel with its color replaced and its alpha kept.
        pub fn with_rgb(&self, color: Rgb) -> Self {
            Pixel::new(color.red, color.green, color.blue, self.alpha)
        }

        /// Builds a pixel from an untyped channel tuple such as `[87, 159, 42]`.
        ///
        /// Arity 3 means RGB (alpha becomes 255) and arity 4 means RGBA.
        pub fn try_from_channels(channels: &[i64]) -> Result<Self> {
            if channels.len() != RGB_CHANNELS && channels.len() != RGBA_CHANNELS {
                return Err(LocatorError::UnsupportedArity(channels.len()));
            }

            let mut bytes = [Channel::MAX; RGBA_CHANNELS];
            for (index, &value) in channels.iter().enumerate() {
                bytes[index] = Channel::try_from(value)
                    .map_err(|_| LocatorError::ChannelOutOfRange { index, value })?;
            }
            Ok(Pixel::new(bytes[0], bytes[1], bytes[2], bytes[3]))
        }
    }

    impl TryFrom<&[Channel]> for Pixel {
        type Error = LocatorError;

        /// Converts a 3 or 4 byte slice from a decoded buffer.
        fn try_from(bytes: &[Channel]) -> Result<Self> {
            match bytes {
                [r, g, b] => Ok(Pixel::opaque(*r, *g, *b)),
                [r, g, b, a] => Ok(Pixel::new(*r, *g, *b, *a)),
                _ => Err(LocatorError::UnsupportedArity(bytes.len())),
            }
        }
    }

    /// A color with no alpha, used for replacement targets and reports.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(try_from = "String", into = "String")]
    pub struct Rgb {
        pub red: Channel,
        pub green: Channel,
        pub blue: Channel,
    }

    impl Rgb {
        pub const fn new(red: Channel, green: Channel, blue: Channel) -> Self {
            Rgb { red, green, blue }
        }
    }

    impl fmt::Display for Rgb {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
        }
    }

    impl FromStr for Rgb {
        type Err = LocatorError;

        fn from_str(s: &str) -> Result<Self> {
            let hex = s.strip_prefix('#').unwrap_or(s);
            if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(LocatorError::UnsupportedColor(s.to_string()));
            }
            let channel = |range: std::ops::Range<usize>| {
                u8::from_str_radix(&hex[range], 16)
                    .map_err(|_| LocatorError::UnsupportedColor(s.to_string()))
            };
            Ok(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
        }
    }

    impl TryFrom<String> for Rgb {
        type Error = LocatorError;

        fn try_from(value: String) -> Result<Self> {
            value.parse()
        }
    }

    impl From<Rgb> for String {
        fn from(color: Rgb) -> Self {
            color.to_string()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn rgb_tuple_gets_opaque_alpha() {
            let pixel = Pixel::try_from_channels(&[87, 159, 42]).unwrap();
            assert_eq!(pixel, Pixel::new(87, 159, 42, 255));
        }

        #[test]
        fn rgba_tuple_keeps_alpha() {
            let pixel = Pixel::try_from_channels(&[1, 2, 3, 4]).unwrap();
            assert_eq!(pixel.alpha, 4);
        }

        #[test]
        fn out_of_range_channel_is_rejected() {
            let err = Pixel::try_from_channels(&[0, 256, 0]).unwrap_err();
            assert!(matches!(
                err,
                LocatorError::ChannelOutOfRange { index: 1, value: 256 }
            ));

            let err = Pixel::try_from_channels(&[-1, 0, 0]).unwrap_err();
            assert!(matches!(err, LocatorError::ChannelOutOfRange { index: 0, .. }));
        }

        #[test]
        fn wrong_arity_is_rejected() {
            assert!(matches!(
                Pixel::try_from_channels(&[1, 2]),
                Err(LocatorError::UnsupportedArity(2))
            ));
            assert!(matches!(
                Pixel::try_from(&[1u8, 2, 3, 4, 5][..]),
                Err(LocatorError::UnsupportedArity(5))
            ));
        }

        #[test]
        fn with_rgb_preserves_alpha() {
            let pixel = Pixel::new(10, 20, 30, 77).with_rgb(Rgb::new(155, 188, 15));
            assert_eq!(pixel, Pixel::new(155, 188, 15, 77));
        }

        #[test]
        fn hex_colors_parse_and_print() {
            let color: Rgb = "#9bbc0f".parse().unwrap();
            assert_eq!(color, Rgb::new(155, 188, 15));
            assert_eq!(color.to_string(), "#9bbc0f");
            assert_eq!("579e2a".parse::<Rgb>().unwrap(), Rgb::new(0x57, 0x9e, 0x2a));
            assert!("#9bbc0".parse::<Rgb>().is_err());
            assert!("#zzzzzz".parse::<Rgb>().is_err());
        }

        #[test]
        fn signs_are_not_hex_digits() {
            assert!(matches!(
                "#+f+f+f".parse::<Rgb>(),
                Err(LocatorError::UnsupportedColor(_))
            ));
            assert!("-0a0b0".parse::<Rgb>().is_err());
        }
    }
}
