//! Color samples and hue/saturation/value conversion
//!
//! Hue is reported in whole degrees and saturation/value as percentages rounded to
//! two decimals. Classification thresholds are expressed in the same units.

use serde::{Deserialize, Serialize};

/// One 8-bit RGB color sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Convert to hue/saturation/value
    pub fn to_hsv(self) -> Hsv {
        Hsv::from(self)
    }
}

/// Hue in degrees `[0, 360]`, saturation and value in percent `[0, 100]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

fn round_percent(fraction: f64) -> f64 {
    (fraction * 100.0 * 100.0).round() / 100.0
}

impl From<Rgb> for Hsv {
    fn from(rgb: Rgb) -> Self {
        let r = f64::from(rgb.r) / 255.0;
        let g = f64::from(rgb.g) / 255.0;
        let b = f64::from(rgb.b) / 255.0;

        let v = r.max(g).max(b);
        let diff = v - r.min(g).min(b);

        if diff == 0.0 {
            return Hsv {
                h: 0.0,
                s: 0.0,
                v: round_percent(v),
            };
        }

        let s = diff / v;
        let channel = |c: f64| (v - c) / 6.0 / diff + 0.5;
        let (rr, gg, bb) = (channel(r), channel(g), channel(b));

        let mut h = if r == v {
            bb - gg
        } else if g == v {
            1.0 / 3.0 + rr - bb
        } else {
            2.0 / 3.0 + gg - rr
        };
        if h < 0.0 {
            h += 1.0;
        } else if h > 1.0 {
            h -= 1.0;
        }

        // Whole degrees; 360 is kept rather than wrapped to 0
        Hsv {
            h: (h * 360.0).round(),
            s: round_percent(s),
            v: round_percent(v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_hues() {
        assert_eq!(Rgb::new(255, 0, 0).to_hsv().h, 0.0);
        assert_eq!(Rgb::new(0, 255, 0).to_hsv().h, 120.0);
        assert_eq!(Rgb::new(0, 0, 255).to_hsv().h, 240.0);
        assert_eq!(Rgb::new(255, 255, 0).to_hsv().h, 60.0);
    }

    #[test]
    fn test_achromatic() {
        let grey = Rgb::new(128, 128, 128).to_hsv();
        assert_eq!(grey.h, 0.0);
        assert_eq!(grey.s, 0.0);
        assert_eq!(grey.v, 50.2);
        assert_eq!(Rgb::new(0, 0, 0).to_hsv().v, 0.0);
    }

    #[test]
    fn test_hue_near_full_turn_stays_at_360() {
        // 359.5 degrees before rounding
        assert_eq!(Rgb::new(120, 0, 1).to_hsv().h, 360.0);
        assert_eq!(Rgb::new(255, 0, 64).to_hsv().h, 345.0);
    }

    #[test]
    fn test_forest_green() {
        // Dark olive green used as a typical canopy sample
        let hsv = Rgb::new(60, 90, 30).to_hsv();
        assert_eq!(hsv.h, 90.0);
        assert_eq!(hsv.s, 66.67);
        assert_eq!(hsv.v, 35.29);
    }
}
