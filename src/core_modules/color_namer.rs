// THEORY:
// The `ColorNamer` maps an RGB sample to the closest human-readable name from
// a fixed reference palette. It is the classification half of the engine: the
// sampler decides *which* colors matter in a frame, the namer decides what to
// call them.
//
// Key architectural principles:
// 1.  **Determinism**: The reference table is an ordered compile-time
//     constant and the scan keeps the first minimum it encounters (strict
//     less-than). Identical input always produces identical output, including
//     for entries that share an RGB value ("Cyan" and "Aqua" are the same
//     triple; (0,255,255) always names as "Cyan" because it is listed first).
// 2.  **Linear scan, no caching**: The table is ~33 entries and at most 5
//     lookups happen per frame, so an O(table) scan per call is well inside
//     the real-time budget. Results are recomputed every call.
// 3.  **Total for valid input**: Channels are `u8`, so every representable
//     input is in range and naming can never fail once a namer exists. An
//     empty table would leave "nearest" undefined, which is why construction
//     asserts against it.

use crate::core_modules::color_sample::ColorSample;

/// One entry in the fixed reference palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamedColor {
    pub name: &'static str,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

const fn named(name: &'static str, r: u8, g: u8, b: u8) -> NamedColor {
    NamedColor { name, r, g, b }
}

/// The canonical reference palette, a small subset of the CSS named colors.
/// Order matters: equidistant matches resolve to the earliest entry.
pub const NAMED_COLORS: [NamedColor; 33] = [
    named("Black", 0, 0, 0),
    named("White", 255, 255, 255),
    named("Red", 255, 0, 0),
    named("Green", 0, 128, 0),
    named("Blue", 0, 0, 255),
    named("Yellow", 255, 255, 0),
    named("Cyan", 0, 255, 255),
    named("Magenta", 255, 0, 255),
    named("Orange", 255, 165, 0),
    named("Purple", 128, 0, 128),
    named("Pink", 255, 192, 203),
    named("Brown", 165, 42, 42),
    named("Gray", 128, 128, 128),
    named("Navy", 0, 0, 128),
    named("Teal", 0, 128, 128),
    named("Olive", 128, 128, 0),
    named("Maroon", 128, 0, 0),
    named("Lime", 0, 255, 0),
    named("Aqua", 0, 255, 255),
    named("Silver", 192, 192, 192),
    named("Gold", 255, 215, 0),
    named("Coral", 255, 127, 80),
    named("Salmon", 250, 128, 114),
    named("Khaki", 240, 230, 140),
    named("Lavender", 230, 230, 250),
    named("Beige", 245, 245, 220),
    named("Ivory", 255, 255, 240),
    named("Mint", 189, 252, 201),
    named("Peach", 255, 229, 180),
    named("SkyBlue", 135, 206, 235),
    named("ForestGreen", 34, 139, 34),
    named("Crimson", 220, 20, 60),
    named("Indigo", 75, 0, 130),
];

/// Maps RGB samples to the closest entry of a fixed reference palette.
pub struct ColorNamer {
    table: &'static [NamedColor],
}

impl ColorNamer {
    pub fn new() -> Self {
        Self::with_table(&NAMED_COLORS)
    }

    /// The table ships as a compile-time constant, so an empty one is a
    /// configuration error, not a runtime condition to recover from.
    fn with_table(table: &'static [NamedColor]) -> Self {
        assert!(
            !table.is_empty(),
            "color naming requires a non-empty reference table"
        );
        Self { table }
    }

    /// Returns the name of the table entry nearest to `color` in Euclidean
    /// RGB distance. Pure and deterministic; the strict less-than keeps the
    /// first minimum, so ties resolve by table order.
    pub fn name(&self, color: ColorSample) -> &'static str {
        let mut closest_name = self.table[0].name;
        let mut min_distance = f64::INFINITY;

        for entry in self.table {
            let distance = color.distance(entry.r, entry.g, entry.b);
            if distance < min_distance {
                min_distance = distance;
                closest_name = entry.name;
            }
        }

        closest_name
    }
}

impl Default for ColorNamer {
    fn default() -> Self {
        Self::new()
    }
}
