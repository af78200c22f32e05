//! Easing functions for actions
//!
//! An easing maps linear progress in `[0, 1]` to eased progress. The
//! scheduler treats it as a black box: overshooting curves such as
//! [`Easing::EaseOutBack`] may return values outside `[0, 1]`.

use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Easing function type
#[derive(Clone, Copy, Debug, Default)]
pub enum Easing {
    #[default]
    Linear,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInQuart,
    EaseOutQuart,
    EaseInOutQuart,
    EaseInBack,
    EaseOutBack,
    EaseInOutBack,
    EaseOutElastic,
    EaseOutBounce,
    CubicBezier(f32, f32, f32, f32),
    /// Caller-supplied curve
    Custom(fn(f32) -> f32),
}

const BACK_C1: f32 = 1.70158;
const BACK_C2: f32 = BACK_C1 * 1.525;
const BACK_C3: f32 = BACK_C1 + 1.0;

impl Easing {
    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(&self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::EaseInCubic => t * t * t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::EaseInQuart => t * t * t * t,
            Easing::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
            Easing::EaseInOutQuart => {
                if t < 0.5 {
                    8.0 * t * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
                }
            }
            Easing::EaseInBack => BACK_C3 * t * t * t - BACK_C1 * t * t,
            Easing::EaseOutBack => {
                1.0 + BACK_C3 * (t - 1.0).powi(3) + BACK_C1 * (t - 1.0).powi(2)
            }
            Easing::EaseInOutBack => {
                if t < 0.5 {
                    ((2.0 * t).powi(2) * ((BACK_C2 + 1.0) * 2.0 * t - BACK_C2)) / 2.0
                } else {
                    ((2.0 * t - 2.0).powi(2) * ((BACK_C2 + 1.0) * (t * 2.0 - 2.0) + BACK_C2)
                        + 2.0)
                        / 2.0
                }
            }
            Easing::EaseOutElastic => {
                if t <= 0.0 {
                    0.0
                } else if t >= 1.0 {
                    1.0
                } else {
                    2f32.powf(-10.0 * t) * ((t * 10.0 - 0.75) * (2.0 * PI / 3.0)).sin() + 1.0
                }
            }
            Easing::EaseOutBounce => bounce_out(t),
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier_ease(t, *x1, *y1, *x2, *y2),
            Easing::Custom(f) => f(t),
        }
    }
}

fn bounce_out(t: f32) -> f32 {
    const N1: f32 = 7.5625;
    const D1: f32 = 2.75;

    if t < 1.0 / D1 {
        N1 * t * t
    } else if t < 2.0 / D1 {
        let t = t - 1.5 / D1;
        N1 * t * t + 0.75
    } else if t < 2.5 / D1 {
        let t = t - 2.25 / D1;
        N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / D1;
        N1 * t * t + 0.984375
    }
}

/// Cubic bezier easing calculation (matches CSS spec / browser implementations).
///
/// Uses Newton-Raphson with binary-search fallback for robustness.
/// Computes in f64 internally to avoid f32 precision jitter.
fn cubic_bezier_ease(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    // Endpoints are always exact
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    let x = t as f64;
    let (x1, y1, x2, y2) = (x1 as f64, y1 as f64, x2 as f64, y2 as f64);

    let mut p = x;
    for _ in 0..8 {
        let err = bezier_sample(p, x1, x2) - x;
        if err.abs() < 1e-7 {
            return bezier_sample(p, y1, y2) as f32;
        }
        let slope = bezier_slope(p, x1, x2);
        if slope.abs() < 1e-7 {
            break; // slope too flat, switch to binary search
        }
        p -= err / slope;
    }

    let mut lo = 0.0_f64;
    let mut hi = 1.0_f64;
    p = x;
    for _ in 0..20 {
        let val = bezier_sample(p, x1, x2);
        if (val - x).abs() < 1e-7 {
            break;
        }
        if val < x {
            lo = p;
        } else {
            hi = p;
        }
        p = (lo + hi) * 0.5;
    }

    bezier_sample(p, y1, y2) as f32
}

/// Evaluate cubic bezier at parameter t: B(t) = 3(1-t)²t·p1 + 3(1-t)t²·p2 + t³
#[inline]
fn bezier_sample(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    ((a * t + b) * t + c) * t
}

#[inline]
fn bezier_slope(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    (3.0 * a * t + 2.0 * b) * t + c
}

/// Returned when an easing name is not recognised
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEasing(pub String);

impl fmt::Display for UnknownEasing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown easing `{}`", self.0)
    }
}

impl std::error::Error for UnknownEasing {}

impl FromStr for Easing {
    type Err = UnknownEasing;

    /// Parse a kebab-case easing name such as `ease-out-cubic`.
    ///
    /// `Custom` and `CubicBezier` curves have no name and must be built in code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let easing = match s {
            "linear" => Easing::Linear,
            "ease-in-quad" => Easing::EaseInQuad,
            "ease-out-quad" => Easing::EaseOutQuad,
            "ease-in-out-quad" => Easing::EaseInOutQuad,
            "ease-in-cubic" | "ease-in" => Easing::EaseInCubic,
            "ease-out-cubic" | "ease-out" => Easing::EaseOutCubic,
            "ease-in-out-cubic" | "ease-in-out" => Easing::EaseInOutCubic,
            "ease-in-quart" => Easing::EaseInQuart,
            "ease-out-quart" => Easing::EaseOutQuart,
            "ease-in-out-quart" => Easing::EaseInOutQuart,
            "ease-in-back" => Easing::EaseInBack,
            "ease-out-back" => Easing::EaseOutBack,
            "ease-in-out-back" => Easing::EaseInOutBack,
            "ease-out-elastic" => Easing::EaseOutElastic,
            "ease-out-bounce" => Easing::EaseOutBounce,
            other => return Err(UnknownEasing(other.to_string())),
        };
        Ok(easing)
    }
}
