//! Trace color palettes.

use serde::{Deserialize, Serialize};

/// RGBA color with components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub fn from_rgb_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as f32 / 255.0,
            g: ((hex >> 8) & 0xFF) as f32 / 255.0,
            b: (hex & 0xFF) as f32 / 255.0,
            a: 1.0,
        }
    }

    pub fn to_rgb_hex(self) -> u32 {
        let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        (c(self.r) << 16) | (c(self.g) << 8) | c(self.b)
    }
}

const DEEP: [u32; 10] = [
    0x4C72B0, 0xDD8452, 0x55A868, 0xC44E52, 0x8172B3,
    0x937860, 0xDA8BC3, 0x8C8C8C, 0xCCB974, 0x64B5CD,
];

const DARK: [u32; 10] = [
    0x001C7F, 0xB1400D, 0x12711C, 0x8C0800, 0x591E71,
    0x592F0D, 0xA23582, 0x3C3C3C, 0xB8850A, 0x006374,
];

const PASTEL: [u32; 10] = [
    0xA1C9F4, 0xFFB482, 0x8DE5A1, 0xFF9F9B, 0xD0BBFF,
    0xDEBB9B, 0xFAB0E4, 0xCFCFCF, 0xFFFEA3, 0xB9F2F0,
];

/// Named palette; trace `i` takes color `i` modulo the palette length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Colormap {
    Deep,
    #[default]
    Dark,
    Pastel,
}

impl Colormap {
    pub const ALL: [Colormap; 3] = [Colormap::Dark, Colormap::Deep, Colormap::Pastel];

    fn palette(self) -> &'static [u32] {
        match self {
            Colormap::Deep => &DEEP,
            Colormap::Dark => &DARK,
            Colormap::Pastel => &PASTEL,
        }
    }

    pub fn color(self, trace: usize) -> Color {
        let palette = self.palette();
        Color::from_rgb_hex(palette[trace % palette.len()])
    }

    /// The palette after this one, wrapping around.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&c| c == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn name(self) -> &'static str {
        match self {
            Colormap::Deep => "deep",
            Colormap::Dark => "dark",
            Colormap::Pastel => "pastel",
        }
    }
}
