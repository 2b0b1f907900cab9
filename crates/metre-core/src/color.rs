//! Light/dark colour policies.
//!
//! A sheet is always laid out once and painted twice. The only thing that
//! changes between the two passes is the [`ColorPolicy`]: every colour is
//! authored for the light sheet and mapped through [`ColorPolicy::recolor`],
//! which is the identity for light and a luminance inversion for dark.

use image::{Luma, Rgb};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which rendition of a sheet is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// White paper, black ink.
    Light,
    /// Black background, white ink (projection on a white wall).
    Dark,
}

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::Light, Variant::Dark];

    #[inline]
    pub fn policy(self) -> ColorPolicy {
        match self {
            Variant::Light => ColorPolicy::LIGHT,
            Variant::Dark => ColorPolicy::DARK,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Variant::Light => "light",
            Variant::Dark => "dark",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Background/ink pairing applied uniformly to one rendered sheet.
///
/// Only two values exist: [`ColorPolicy::LIGHT`] and [`ColorPolicy::DARK`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorPolicy {
    background: Rgb<u8>,
    ink: Rgb<u8>,
    inverted: bool,
}

impl ColorPolicy {
    pub const LIGHT: ColorPolicy = ColorPolicy {
        background: Rgb([255, 255, 255]),
        ink: Rgb([0, 0, 0]),
        inverted: false,
    };

    pub const DARK: ColorPolicy = ColorPolicy {
        background: Rgb([0, 0, 0]),
        ink: Rgb([255, 255, 255]),
        inverted: true,
    };

    #[inline]
    pub fn background(&self) -> Rgb<u8> {
        self.background
    }

    #[inline]
    pub fn ink(&self) -> Rgb<u8> {
        self.ink
    }

    /// True for the dark policy.
    #[inline]
    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Map a colour authored for the light sheet into this policy.
    #[inline]
    pub fn recolor(&self, light: Rgb<u8>) -> Rgb<u8> {
        if self.inverted {
            let Rgb([r, g, b]) = light;
            Rgb([255 - r, 255 - g, 255 - b])
        } else {
            light
        }
    }

    /// Map a grey level authored for the light sheet into this policy.
    #[inline]
    pub fn recolor_luma(&self, light: Luma<u8>) -> Luma<u8> {
        if self.inverted {
            Luma([255 - light.0[0]])
        } else {
            light
        }
    }

    /// A grey tone given by its light-sheet luminance (0 = ink, 255 = paper).
    #[inline]
    pub fn tone(&self, light_luma: u8) -> Rgb<u8> {
        self.recolor(Rgb([light_luma, light_luma, light_luma]))
    }
}
