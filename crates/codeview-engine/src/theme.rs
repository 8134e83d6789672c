use std::fmt;

/// 24-bit colour used by every output surface (terminal, HTML).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Grey palette slots shared by the header strip and the raw code box.
pub mod grey {
    use super::Rgb;

    pub const GREY_200: Rgb = Rgb::new(0xee, 0xee, 0xee);
    pub const GREY_900: Rgb = Rgb::new(0x21, 0x21, 0x21);
}

/// Light/dark signal from the host, passed into every render.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

impl ColorScheme {
    pub fn from_dark_mode(is_dark_mode: bool) -> Self {
        if is_dark_mode {
            ColorScheme::Dark
        } else {
            ColorScheme::Light
        }
    }

    pub fn is_dark(self) -> bool {
        matches!(self, ColorScheme::Dark)
    }

    pub fn toggled(self) -> Self {
        Self::from_dark_mode(!self.is_dark())
    }

    /// Background of the header strip and of non-highlighted code.
    pub fn surface(self) -> Rgb {
        match self {
            ColorScheme::Light => grey::GREY_200,
            ColorScheme::Dark => grey::GREY_900,
        }
    }

    /// Muted text colour for captions such as the language label.
    pub fn secondary_text(self) -> Rgb {
        match self {
            ColorScheme::Light => Rgb::new(0x66, 0x66, 0x66),
            ColorScheme::Dark => Rgb::new(0xb3, 0xb3, 0xb3),
        }
    }
}
