//! Day-seeded color assignment for entities.
//!
//! A translator sees the same entity in the same color for a whole calendar day, so the mapping
//! between source and translation highlights stays stable across reloads.

use std::fmt;

use anyhow::{Context, Result};
use serde::Serialize;
use time::OffsetDateTime;
use time::macros::format_description;

use crate::domain::model::Tag;

/// A named palette entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color {
    pub name: &'static str,
    pub hex: &'static str,
}

impl Color {
    /// The `(r, g, b)` channels of [`Color::hex`].
    pub fn channels(&self) -> (u8, u8, u8) {
        let channel = |range: std::ops::Range<usize>| {
            self.hex
                .get(range)
                .and_then(|digits| u8::from_str_radix(digits, 16).ok())
                .unwrap_or(0)
        };
        (channel(1..3), channel(3..5), channel(5..7))
    }

    /// CSS `rgb(...)` notation.
    pub fn rgb(&self) -> String {
        let (r, g, b) = self.channels();
        format!("rgb({r}, {g}, {b})")
    }

    /// CSS `rgba(...)` notation with the given opacity.
    pub fn rgba(&self, alpha: f32) -> String {
        let (r, g, b) = self.channels();
        format!("rgba({r}, {g}, {b}, {alpha})")
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

pub const COLORS: [Color; 13] = [
    Color {
        name: "blue",
        hex: "#0074d9",
    },
    Color {
        name: "navy",
        hex: "#001f3f",
    },
    Color {
        name: "lime",
        hex: "#01ff70",
    },
    Color {
        name: "teal",
        hex: "#39cccc",
    },
    Color {
        name: "olive",
        hex: "#3d9970",
    },
    Color {
        name: "fuchsia",
        hex: "#f012be",
    },
    Color {
        name: "red",
        hex: "#ff4136",
    },
    Color {
        name: "green",
        hex: "#2ecc40",
    },
    Color {
        name: "orange",
        hex: "#ff851b",
    },
    Color {
        name: "maroon",
        hex: "#85144b",
    },
    Color {
        name: "purple",
        hex: "#b10dc9",
    },
    Color {
        name: "yellow",
        hex: "#ffdc00",
    },
    Color {
        name: "aqua",
        hex: "#7fdbff",
    },
];

/// Reserved for spans awaiting an entity.
pub const UNRESOLVED_COLOR: Color = Color {
    name: "grey",
    hex: "#aaaaaa",
};

pub const DEFAULT_ALPHA: f32 = 0.3;

/// Seed derived from a calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DaySeed(u64);

impl DaySeed {
    /// Seed from a day label such as `"Mon Oct 19 2026"`.
    pub fn from_label(label: &str) -> Self {
        Self(fnv1a(label.as_bytes()))
    }

    /// Seed for the current local day, or the UTC day when the local offset is unknown.
    pub fn today() -> Result<Self> {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        Self::on(now)
    }

    /// Seed for the calendar day of `at` in its own offset.
    pub fn on(at: OffsetDateTime) -> Result<Self> {
        Ok(Self::from_label(&day_label(at)?))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Format a timestamp's date as `"Mon Oct 19 2026"`.
pub fn day_label(at: OffsetDateTime) -> Result<String> {
    at.format(format_description!(
        "[weekday repr:short] [month repr:short] [day] [year]"
    ))
    .context("failed to format palette day label")
}

/// Maps entity ids onto [`COLORS`] starting at a day-dependent offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    offset: usize,
    alpha: f32,
}

impl Palette {
    pub fn new(seed: DaySeed) -> Self {
        Self {
            offset: (seed.value() % COLORS.len() as u64) as usize,
            alpha: DEFAULT_ALPHA,
        }
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Color of a source entity.
    pub fn entity_color(&self, id: u32) -> Color {
        COLORS[(self.offset + id as usize) % COLORS.len()]
    }

    /// Color of a translation span; plain text has none.
    pub fn tag_color(&self, tag: Tag) -> Option<Color> {
        match tag {
            Tag::Untagged => None,
            Tag::Unresolved => Some(UNRESOLVED_COLOR),
            Tag::Resolved(id) => Some(self.entity_color(id)),
        }
    }

    /// CSS background for a span, using the configured opacity.
    pub fn background(&self, tag: Tag) -> Option<String> {
        self.tag_color(tag).map(|color| color.rgba(self.alpha))
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0100_0000_01b3;
    bytes.iter().fold(OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(PRIME)
    })
}
