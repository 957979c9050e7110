//! Look shared by every chart: white background, light grid, fixed font sizes.
//!
//! Sizes are given in inches and points and converted with the configured
//! pixel density, so one setting scales every figure consistently.

use fear_greed_core::ChartConfig;
use plotters::style::RGBColor;

pub const FONT_FAMILY: &str = "sans-serif";

pub const BACKGROUND: RGBColor = RGBColor(255, 255, 255);
pub const GRID: RGBColor = RGBColor(224, 224, 224);
pub const AXIS: RGBColor = RGBColor(64, 64, 64);
pub const TEXT: RGBColor = RGBColor(32, 32, 32);
/// Fill for cells with no defined value.
pub const MISSING: RGBColor = RGBColor(200, 200, 200);

/// One colour per sentiment category, Extreme Fear first.
pub const CATEGORY_PALETTE: [RGBColor; 5] = [
    RGBColor(76, 114, 176),
    RGBColor(221, 132, 82),
    RGBColor(85, 168, 104),
    RGBColor(196, 78, 82),
    RGBColor(129, 114, 179),
];
pub const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);
pub const LINE_BLUE: RGBColor = RGBColor(0, 0, 255);
pub const BAR_GREEN: RGBColor = RGBColor(0, 128, 0);

const POINTS_PER_INCH: f64 = 72.0;

// Endpoints and midpoint of the diverging blue-white-red colour map.
const COOL: (f64, f64, f64) = (59.0, 76.0, 192.0);
const NEUTRAL: (f64, f64, f64) = (221.0, 221.0, 221.0);
const WARM: (f64, f64, f64) = (180.0, 4.0, 38.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartStyle {
    pub pixels_per_inch: u32,
}

impl ChartStyle {
    pub const LABEL_POINTS: f64 = 12.0;
    pub const AXIS_TITLE_POINTS: f64 = 14.0;
    pub const TITLE_POINTS: f64 = 16.0;

    #[must_use]
    pub fn new(pixels_per_inch: u32) -> Self {
        Self {
            pixels_per_inch: pixels_per_inch.max(1),
        }
    }

    /// Pixel dimensions of a figure measured in inches.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn figure_size(&self, width_in: f64, height_in: f64) -> (u32, u32) {
        let ppi = f64::from(self.pixels_per_inch);
        ((width_in * ppi).round() as u32, (height_in * ppi).round() as u32)
    }

    /// Pixel length of a distance given in points.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn points_px(&self, points: f64) -> u32 {
        (points * f64::from(self.pixels_per_inch) / POINTS_PER_INCH)
            .round()
            .max(1.0) as u32
    }

    #[must_use]
    pub fn label_px(&self) -> u32 {
        self.points_px(Self::LABEL_POINTS)
    }

    #[must_use]
    pub fn axis_title_px(&self) -> u32 {
        self.points_px(Self::AXIS_TITLE_POINTS)
    }

    #[must_use]
    pub fn title_px(&self) -> u32 {
        self.points_px(Self::TITLE_POINTS)
    }

    /// Margin around plot areas, a tenth of an inch.
    #[must_use]
    pub fn margin_px(&self) -> u32 {
        (self.pixels_per_inch / 10).max(1)
    }
}

impl From<&ChartConfig> for ChartStyle {
    fn from(config: &ChartConfig) -> Self {
        Self::new(config.pixels_per_inch)
    }
}

/// Diverging colour for `t` in `[-1, 1]`: blue below zero, red above.
///
/// Values outside the range are clamped; NaN maps to [`MISSING`].
#[must_use]
pub fn coolwarm(t: f64) -> RGBColor {
    if t.is_nan() {
        return MISSING;
    }
    let t = t.clamp(-1.0, 1.0);
    let (from, to, w) = if t < 0.0 {
        (NEUTRAL, COOL, -t)
    } else {
        (NEUTRAL, WARM, t)
    };
    RGBColor(
        channel(from.0, to.0, w),
        channel(from.1, to.1, w),
        channel(from.2, to.2, w),
    )
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn channel(from: f64, to: f64, w: f64) -> u8 {
    (from + (to - from) * w).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn figure_size_scales_with_density() {
        assert_eq!(ChartStyle::new(100).figure_size(12.0, 8.0), (1200, 800));
        assert_eq!(ChartStyle::new(50).figure_size(10.0, 6.0), (500, 300));
    }

    #[test]
    fn font_sizes_follow_points() {
        let style = ChartStyle::new(72);

        assert_eq!(style.label_px(), 12);
        assert_eq!(style.title_px(), 16);
        assert_eq!(style.axis_title_px(), 14);
    }

    #[test]
    fn zero_density_is_clamped() {
        let style = ChartStyle::new(0);

        assert_eq!(style.pixels_per_inch, 1);
        assert_eq!(style.points_px(1.0), 1);
    }

    #[test]
    fn coolwarm_endpoints() {
        assert_eq!(coolwarm(-1.0), RGBColor(59, 76, 192));
        assert_eq!(coolwarm(0.0), RGBColor(221, 221, 221));
        assert_eq!(coolwarm(1.0), RGBColor(180, 4, 38));
        assert_eq!(coolwarm(7.5), coolwarm(1.0));
        assert_eq!(coolwarm(f64::NAN), MISSING);
    }
}
