//! Sequential colour maps for the bar charts.

use plotters::style::RGBColor;

/// Anchor colours of a perceptually uniform colour map, evenly spaced on `[0, 1]`.
pub type ColorStops = &'static [(u8, u8, u8)];

pub const VIRIDIS: ColorStops = &[
    (0x44, 0x01, 0x54),
    (0x3b, 0x52, 0x8b),
    (0x21, 0x91, 0x8c),
    (0x5e, 0xc9, 0x62),
    (0xfd, 0xe7, 0x25),
];

pub const PLASMA: ColorStops = &[
    (0x0d, 0x08, 0x87),
    (0x7e, 0x03, 0xa8),
    (0xcc, 0x47, 0x78),
    (0xf8, 0x95, 0x40),
    (0xf0, 0xf9, 0x21),
];

/// Colour at position `t` (clamped to `[0, 1]`), linearly interpolated.
pub fn sample(stops: ColorStops, t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    let last = stops.len() - 1;
    let scaled = t * last as f64;
    let lower = (scaled.floor() as usize).min(last);
    let upper = (lower + 1).min(last);
    let frac = scaled - lower as f64;

    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
    let (a, b) = (stops[lower], stops[upper]);

    RGBColor(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
}

/// `n` colours evenly spaced between positions 0.3 and 0.9 of the map.
///
/// The ends of the maps are skipped so that bars stay readable on white.
pub fn spread(stops: ColorStops, n: usize) -> Vec<RGBColor> {
    const LOW: f64 = 0.3;
    const HIGH: f64 = 0.9;

    match n {
        0 => Vec::new(),
        1 => vec![sample(stops, LOW)],
        _ => (0..n)
            .map(|i| sample(stops, LOW + (HIGH - LOW) * i as f64 / (n - 1) as f64))
            .collect(),
    }
}
