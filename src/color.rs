// src/color.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Key under which a single direct color is reported, and the default active
/// key for palettes that contain it.
pub const DEFAULT_COLOR_KEY: &str = "primary";

/// An 8-bit RGB triple. Serializes as `[r, g, b]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const WHITE: Rgb = Rgb(255, 255, 255);

impl Rgb {
    /// RGBA components in the 0..1 range for the vertex buffer.
    pub fn to_f32_rgba(self) -> [f32; 4] {
        [
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
            1.0,
        ]
    }
}

/// The externally observed "color" of a shape: single-color shapes expose the
/// RGB triple itself, multi-color shapes expose the active palette key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorValue {
    Name(String),
    Value(Rgb),
}

/// Appearance state of a shape: either one direct RGB color, or a named
/// palette with an active key (for state-based color switching).
///
/// Invariants: a palette is never empty and `active` always resolves to an
/// entry.
#[derive(Clone, Debug)]
pub enum Coloring {
    Direct(Rgb),
    Palette {
        colors: BTreeMap<String, Rgb>,
        active: String,
    },
}

impl Coloring {
    pub fn direct(rgb: Rgb) -> Self {
        Coloring::Direct(rgb)
    }

    /// Builds a palette coloring. The active key is `"primary"` when present,
    /// otherwise the first key in order. An empty map degrades to direct
    /// white.
    pub fn palette(colors: BTreeMap<String, Rgb>) -> Self {
        let active = if colors.contains_key(DEFAULT_COLOR_KEY) {
            DEFAULT_COLOR_KEY.to_string()
        } else if let Some(first) = colors.keys().next() {
            first.clone()
        } else {
            log::warn!("empty color palette supplied; falling back to white");
            return Coloring::Direct(WHITE);
        };
        Coloring::Palette { colors, active }
    }

    /// The RGB triple currently in effect.
    pub fn active_rgb(&self) -> Rgb {
        match self {
            Coloring::Direct(rgb) => *rgb,
            Coloring::Palette { colors, active } => colors[active],
        }
    }

    /// The observed color: the triple itself when there is a single entry,
    /// the active key name otherwise.
    pub fn observed(&self) -> ColorValue {
        match self {
            Coloring::Direct(rgb) => ColorValue::Value(*rgb),
            Coloring::Palette { colors, active } => {
                if colors.len() == 1 {
                    ColorValue::Value(colors[active])
                } else {
                    ColorValue::Name(active.clone())
                }
            }
        }
    }

    /// The full named-color view. A direct coloring reads as a single-entry
    /// `"primary"` palette.
    pub fn map_view(&self) -> BTreeMap<String, Rgb> {
        match self {
            Coloring::Direct(rgb) => {
                let mut map = BTreeMap::new();
                map.insert(DEFAULT_COLOR_KEY.to_string(), *rgb);
                map
            }
            Coloring::Palette { colors, .. } => colors.clone(),
        }
    }

    /// Applies a color assignment. An RGB value repaints the active slot; a
    /// known key switches the active key; an unknown key is ignored with a
    /// warning (never an error).
    pub fn set(&mut self, value: ColorValue) {
        match (value, &mut *self) {
            (ColorValue::Value(rgb), Coloring::Direct(current)) => *current = rgb,
            (ColorValue::Value(rgb), Coloring::Palette { colors, active }) => {
                colors.insert(active.clone(), rgb);
            }
            (ColorValue::Name(key), Coloring::Palette { colors, active }) => {
                if colors.contains_key(&key) {
                    *active = key;
                } else {
                    log::warn!("unknown color key {key:?}; keeping {active:?}");
                }
            }
            (ColorValue::Name(key), Coloring::Direct(_)) => {
                log::warn!("color key {key:?} set on a shape without a palette; ignored");
            }
        }
    }
}

// Two colorings are equal when their named-color views match and the observed
// color resolves identically; a direct color therefore equals a single-entry
// "primary" palette of the same triple.
impl PartialEq for Coloring {
    fn eq(&self, other: &Self) -> bool {
        self.map_view() == other.map_view() && self.observed() == other.observed()
    }
}
