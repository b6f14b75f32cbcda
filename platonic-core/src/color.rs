/// RGB colors and their textual form (`#rrggbb` / `0xrrggbb`)
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while_m_n},
    combinator::{all_consuming, map_res},
    sequence::preceded,
    IResult,
};
use serde::{Deserialize, Deserializer};

/// A 24-bit color stored as `0xRRGGBB`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u32);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0x000000);
    pub const WHITE: Rgb = Rgb(0xffffff);

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    pub fn r(self) -> u8 {
        ((self.0 >> 16) & 0xff) as u8
    }

    pub fn g(self) -> u8 {
        ((self.0 >> 8) & 0xff) as u8
    }

    pub fn b(self) -> u8 {
        (self.0 & 0xff) as u8
    }

    /// Channels as floats in `[0, 1]`
    pub fn to_linear(self) -> [f32; 3] {
        [
            self.r() as f32 / 255.0,
            self.g() as f32 / 255.0,
            self.b() as f32 / 255.0,
        ]
    }

    /// Multiply every channel by `factor`, saturating at white
    pub fn scale(self, factor: f32) -> Self {
        let channel = |c: u8| (c as f32 * factor).round().clamp(0.0, 255.0) as u8;
        Self::new(channel(self.r()), channel(self.g()), channel(self.b()))
    }

    /// CSS notation, e.g. `#ff0000`
    pub fn to_css(self) -> String {
        format!("#{:06x}", self.0 & 0xff_ffff)
    }

    /// Parse `#rrggbb` or `0xrrggbb`
    pub fn parse(input: &str) -> Result<Self, String> {
        match all_consuming(hex_color)(input.trim()) {
            Ok((_, color)) => Ok(color),
            Err(_) => Err(format!("expected #rrggbb or 0xrrggbb, got {input:?}")),
        }
    }
}

impl From<u32> for Rgb {
    fn from(value: u32) -> Self {
        Self(value & 0xff_ffff)
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_css())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Rgb::parse(&text).map_err(serde::de::Error::custom)
    }
}

fn hex_color(input: &str) -> IResult<&str, Rgb> {
    map_res(
        preceded(
            alt((tag("#"), tag("0x"), tag("0X"))),
            take_while_m_n(6, 6, |c: char| c.is_ascii_hexdigit()),
        ),
        |digits: &str| u32::from_str_radix(digits, 16).map(Rgb),
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_both_prefixes() {
        assert_eq!(Rgb::parse("#8b4513"), Ok(Rgb(0x8b4513)));
        assert_eq!(Rgb::parse("0x9400D3"), Ok(Rgb(0x9400d3)));
    }

    #[test]
    fn test_parse_rejects_short_and_trailing() {
        assert!(Rgb::parse("#fff").is_err());
        assert!(Rgb::parse("#ffffff00").is_err());
        assert!(Rgb::parse("ffffff").is_err());
    }

    #[test]
    fn test_channels_and_scale() {
        let gold = Rgb(0xffd700);
        assert_eq!((gold.r(), gold.g(), gold.b()), (0xff, 0xd7, 0x00));
        assert_eq!(Rgb(0x404040).scale(2.0), Rgb(0x808080));
        assert_eq!(Rgb::WHITE.scale(3.0), Rgb::WHITE);
        assert_eq!(gold.to_css(), "#ffd700");
    }
}
