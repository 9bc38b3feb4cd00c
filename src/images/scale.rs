//! Integer scale factor search for cover images.

use std::fmt;

use crate::error::ConvertError;

/// Target range for the longer side of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaleRange {
    min: u32,
    max: u32,
}

impl ScaleRange {
    pub fn new(min: u32, max: u32) -> Result<Self, ConvertError> {
        if min >= max {
            return Err(ConvertError::InvalidScaleRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// Inclusive bounds check, used to decide whether to resize at all.
    pub fn contains(&self, side: u32) -> bool {
        (self.min..=self.max).contains(&side)
    }

    fn strictly_contains(&self, side: u64) -> bool {
        side > self.min as u64 && side < self.max as u64
    }

    fn midpoint(&self) -> u64 {
        (self.min as u64 + self.max as u64) / 2
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleOp {
    Divide,
    Multiply,
}

impl ScaleOp {
    fn apply(self, value: u32, factor: u32) -> u64 {
        match self {
            ScaleOp::Divide => value as u64 / factor as u64,
            ScaleOp::Multiply => value as u64 * factor as u64,
        }
    }

    /// The scaled side has passed the far edge of the range.
    fn overshot(self, scaled: u64, range: &ScaleRange) -> bool {
        match self {
            ScaleOp::Divide => scaled == 0 || scaled < range.min as u64,
            ScaleOp::Multiply => scaled > range.max as u64,
        }
    }
}

impl fmt::Display for ScaleOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScaleOp::Divide => write!(f, "/"),
            ScaleOp::Multiply => write!(f, "*"),
        }
    }
}

/// A chosen resize: both sides scaled by the same integer factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalePlan {
    pub op: ScaleOp,
    pub factor: u32,
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for ScalePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} -> {}x{}",
            self.op, self.factor, self.width, self.height
        )
    }
}

/// Choose an integer factor that brings the longer side of `width`x`height`
/// closest to the middle of `range`.
///
/// Returns `None` when the image is already within the range (inclusive),
/// is empty, or no factor above 1 lands anywhere useful.
pub fn plan_scale(width: u32, height: u32, range: &ScaleRange) -> Option<ScalePlan> {
    let side = width.max(height);
    if side == 0 || range.contains(side) {
        return None;
    }

    let op = if side > range.max {
        ScaleOp::Divide
    } else {
        ScaleOp::Multiply
    };

    let mid = range.midpoint();
    let mut best: Option<(u32, u64)> = None;
    let mut factor = 2u32;

    let chosen = loop {
        let scaled = op.apply(side, factor);

        if range.strictly_contains(scaled) {
            let score = mid.abs_diff(scaled);
            match best {
                Some((prev, prev_score)) if score >= prev_score => break prev,
                _ => best = Some((factor, score)),
            }
        } else if let Some((prev, _)) = best {
            break prev;
        } else if op.overshot(scaled, range) {
            break factor - 1;
        }

        factor += 1;
    };

    if chosen < 2 {
        return None;
    }

    let clamp = |v: u64| u32::try_from(v).unwrap_or(u32::MAX);
    Some(ScalePlan {
        op,
        factor: chosen,
        width: clamp(op.apply(width, chosen)),
        height: clamp(op.apply(height, chosen)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range() -> ScaleRange {
        ScaleRange::new(400, 800).unwrap()
    }

    #[test]
    fn test_range_validation() {
        assert!(ScaleRange::new(400, 800).is_ok());
        assert!(matches!(
            ScaleRange::new(800, 800),
            Err(ConvertError::InvalidScaleRange { min: 800, max: 800 })
        ));
        assert!(ScaleRange::new(900, 800).is_err());
    }

    #[test]
    fn test_large_cover_divides_by_three() {
        let plan = plan_scale(1600, 1200, &range()).unwrap();
        assert_eq!(plan.op, ScaleOp::Divide);
        assert_eq!(plan.factor, 3);
        assert_eq!((plan.width, plan.height), (533, 400));
    }

    #[test]
    fn test_neighbouring_divisors_are_worse() {
        // 1600 / 2 = 800 sits on the edge, 1600 / 4 = 400 too.
        let r = range();
        assert!(!r.strictly_contains(1600 / 2));
        assert!(!r.strictly_contains(1600 / 4));
        assert!(r.strictly_contains(1600 / 3));
    }

    #[test]
    fn test_portrait_uses_longer_side() {
        let plan = plan_scale(1200, 1600, &range()).unwrap();
        assert_eq!(plan.factor, 3);
        assert_eq!((plan.width, plan.height), (400, 533));
    }

    #[test]
    fn test_in_range_needs_no_resize() {
        let r = range();
        assert_eq!(plan_scale(600, 600, &r), None);
        assert_eq!(plan_scale(400, 300, &r), None);
        assert_eq!(plan_scale(800, 800, &r), None);
        assert_eq!(plan_scale(0, 0, &r), None);
    }

    #[test]
    fn test_search_stops_when_score_stops_improving() {
        // 3000: /4 = 750 (150), /5 = 600 (0), /6 = 500 (100)
        let plan = plan_scale(3000, 3000, &range()).unwrap();
        assert_eq!(plan.factor, 5);
        assert_eq!(plan.width, 600);
    }

    #[test]
    fn test_small_cover_multiplies() {
        // 200: *2 = 400 on the edge, *3 = 600 (0), *4 = 800 outside
        let plan = plan_scale(200, 150, &range()).unwrap();
        assert_eq!(plan.op, ScaleOp::Multiply);
        assert_eq!(plan.factor, 3);
        assert_eq!((plan.width, plan.height), (600, 450));
    }

    #[test]
    fn test_divide_overshoot_uses_previous_factor() {
        // 801: /2 = 400 on the edge, /3 = 267 below the range
        let plan = plan_scale(801, 10, &range()).unwrap();
        assert_eq!(plan.factor, 2);
        assert_eq!(plan.width, 400);
    }

    #[test]
    fn test_multiply_overshoot_uses_previous_factor() {
        // 100: *4 = 400 and *5 = 500 on the edges, *6 = 600 above
        let r = ScaleRange::new(400, 500).unwrap();
        let plan = plan_scale(100, 100, &r).unwrap();
        assert_eq!(plan.factor, 5);
        assert_eq!(plan.width, 500);
    }

    #[test]
    fn test_no_useful_factor() {
        // 1000 / 2 = 500 is already below 600
        let r = ScaleRange::new(600, 800).unwrap();
        assert_eq!(plan_scale(1000, 1000, &r), None);
    }

    #[test]
    fn test_degenerate_range_terminates() {
        // Nothing is strictly inside (0, 1); the search ends when the side hits 0.
        let r = ScaleRange::new(0, 1).unwrap();
        let plan = plan_scale(5, 5, &r).unwrap();
        assert_eq!(plan.factor, 5);
        assert_eq!(plan.width, 1);
    }

    #[test]
    fn test_plan_display() {
        let plan = plan_scale(1600, 1200, &range()).unwrap();
        assert_eq!(plan.to_string(), "/ 3 -> 533x400");
    }
}
