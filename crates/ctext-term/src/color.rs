// SPDX-License-Identifier: MIT
//
// Colors as the editor configures them: straight 8-bit RGBA.
//
// Terminals have no notion of alpha, so translucent colors are composited
// over whatever sits beneath them before they reach `ansi::fg`/`ansi::bg`.

use std::fmt;

/// An 8-bit-per-channel color with straight (non-premultiplied) alpha.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Opaque black. Also the fallback for any color that fails to parse.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// An opaque color.
    #[inline]
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    #[inline]
    #[must_use]
    pub const fn is_opaque(self) -> bool {
        self.a == 255
    }

    /// Composite `self` over `below` and return an opaque color.
    ///
    /// `below` is treated as opaque regardless of its own alpha.
    #[must_use]
    pub fn over(self, below: Self) -> Self {
        if self.is_opaque() {
            return self;
        }
        let a = u16::from(self.a);
        let mix = |top: u8, bottom: u8| -> u8 {
            let v = (u16::from(top) * a + u16::from(bottom) * (255 - a) + 127) / 255;
            // v <= 255 by construction.
            #[allow(clippy::cast_possible_truncation)]
            let v = v as u8;
            v
        };
        Self::rgb(mix(self.r, below.r), mix(self.g, below.g), mix(self.b, below.b))
    }
}

impl fmt::Debug for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}
