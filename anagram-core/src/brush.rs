use serde::{Deserialize, Serialize};

use crate::buffer::Rgba;

/// Color written by the eraser: fully transparent black.
pub const ERASER_COLOR: Rgba = [0, 0, 0, 0];

/// The active painting tool.  Exactly one is selected at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    #[default]
    Brush,
    Eraser,
    Eyedropper,
}

impl Tool {
    pub fn label(self) -> &'static str {
        match self {
            Tool::Brush => "Brush",
            Tool::Eraser => "Eraser",
            Tool::Eyedropper => "Eyedropper",
        }
    }
}

/// Tool selection and brush parameters.
///
/// The stored color is always opaque; how strongly it covers the canvas is
/// governed by `opacity_percent` alone.  Use the setters (or
/// [`sanitized`](Self::sanitized) after deserializing) to keep every field in
/// range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrushSettings {
    #[serde(default)]
    pub tool: Tool,
    #[serde(default = "default_color")]
    pub color: Rgba,
    /// Disk radius in pixels, at least 1.
    #[serde(default = "default_radius")]
    pub radius: u32,
    /// Blend strength, 0..=100.
    #[serde(default = "default_opacity")]
    pub opacity_percent: u8,
}

impl BrushSettings {
    pub const DEFAULT_RADIUS: u32 = 4;
    pub const DEFAULT_OPACITY: u8 = 100;

    /// Set the brush color, forcing its alpha opaque.
    pub fn set_color(&mut self, color: Rgba) {
        self.color = [color[0], color[1], color[2], 255];
    }

    pub fn set_radius(&mut self, radius: u32) {
        self.radius = radius.max(1);
    }

    /// Accepts any integer and clamps it into `0..=100`.
    pub fn set_opacity_percent(&mut self, opacity: i32) {
        self.opacity_percent = opacity.clamp(0, 100) as u8;
    }

    /// Return a copy with every field clamped into its valid range.
    pub fn sanitized(self) -> Self {
        let mut out = self;
        out.set_color(self.color);
        out.set_radius(self.radius);
        out.set_opacity_percent(self.opacity_percent as i32);
        out
    }

    /// The color this tool writes over `base`.
    pub fn paint_over(&self, base: Rgba) -> Rgba {
        match self.tool {
            Tool::Eraser => ERASER_COLOR,
            Tool::Brush | Tool::Eyedropper => {
                blend_with_brush(base, self.color, self.opacity_percent)
            }
        }
    }
}

fn default_color() -> Rgba {
    [0, 0, 0, 255]
}
fn default_radius() -> u32 {
    BrushSettings::DEFAULT_RADIUS
}
fn default_opacity() -> u8 {
    BrushSettings::DEFAULT_OPACITY
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            tool: Tool::default(),
            color: default_color(),
            radius: default_radius(),
            opacity_percent: default_opacity(),
        }
    }
}

/// Mix `brush` into `base` at `opacity` percent, keeping `base`'s alpha.
///
/// Each RGB channel becomes `round(((100 - o)·old + o·brush) / 100)` with
/// ties rounded to even.  The brush's own alpha is ignored.
pub fn blend_with_brush(base: Rgba, brush: Rgba, opacity: u8) -> Rgba {
    let opacity = opacity.min(100) as u32;
    if opacity == 0 {
        return base;
    }
    let mut out = base;
    for c in 0..3 {
        let sum = (100 - opacity) * base[c] as u32 + opacity * brush[c] as u32;
        out[c] = div100_round_half_even(sum) as u8;
    }
    out
}

#[inline]
fn div100_round_half_even(n: u32) -> u32 {
    let (q, r) = (n / 100, n % 100);
    if r > 50 || (r == 50 && q % 2 == 1) {
        q + 1
    } else {
        q
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_opacity_is_a_copy() {
        let base = [12, 34, 56, 78];
        assert_eq!(blend_with_brush(base, [255, 0, 0, 255], 0), base);
    }

    #[test]
    fn full_opacity_keeps_destination_alpha() {
        let base = [12, 34, 56, 78];
        assert_eq!(blend_with_brush(base, [255, 0, 0, 255], 100), [255, 0, 0, 78]);
    }

    #[test]
    fn half_opacity_rounds_ties_to_even() {
        // (50·0 + 50·255) / 100 = 127.5 → 128; (50·0 + 50·1) / 100 = 0.5 → 0
        let out = blend_with_brush([0, 0, 0, 255], [255, 1, 3, 255], 50);
        assert_eq!(out, [128, 0, 2, 255]);
    }

    #[test]
    fn partial_opacity_mixes_channels() {
        // (70·100 + 30·200) / 100 = 130
        let out = blend_with_brush([100, 100, 100, 10], [200, 0, 100, 255], 30);
        assert_eq!(out, [130, 70, 100, 10]);
    }

    #[test]
    fn setters_clamp() {
        let mut b = BrushSettings::default();
        b.set_radius(0);
        assert_eq!(b.radius, 1);
        b.set_opacity_percent(250);
        assert_eq!(b.opacity_percent, 100);
        b.set_opacity_percent(-5);
        assert_eq!(b.opacity_percent, 0);
        b.set_color([1, 2, 3, 4]);
        assert_eq!(b.color, [1, 2, 3, 255]);
    }

    #[test]
    fn eraser_ignores_base() {
        let b = BrushSettings {
            tool: Tool::Eraser,
            ..Default::default()
        };
        assert_eq!(b.paint_over([9, 9, 9, 9]), ERASER_COLOR);
    }

    #[test]
    fn deserializes_with_defaults() {
        let b: BrushSettings = serde_json::from_str(r#"{"tool":"eraser"}"#).unwrap();
        assert_eq!(b.tool, Tool::Eraser);
        assert_eq!(b.radius, 4);
        assert_eq!(b.opacity_percent, 100);
        assert_eq!(b.color, [0, 0, 0, 255]);
    }
}
