//! Mass unit conversion
//!
//! All weights are stored in kilograms. Conversions in both directions use the
//! same factor; values are rounded to two decimals at every boundary.

/// Pounds per kilogram; the single conversion factor for both directions
pub const LB_PER_KG: f64 = 2.20462;

/// Round to two decimal places (half away from zero at the 3rd decimal)
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Convert pounds to kilograms, rounded to two decimals
pub fn lb_to_kg(lb: f64) -> f64 {
    round2(lb / LB_PER_KG)
}

/// Convert kilograms to pounds, rounded to two decimals
pub fn kg_to_lb(kg: f64) -> f64 {
    round2(kg * LB_PER_KG)
}

/// Unit tag accepted on submitted weights
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightUnit {
    Kg,
    Lb,
}

impl WeightUnit {
    /// Parse a unit tag: surrounding whitespace ignored, exactly "kg" or
    /// "lb". Anything else, including case variants, is rejected.
    pub fn parse(s: &str) -> Option<WeightUnit> {
        match s.trim() {
            "kg" => Some(WeightUnit::Kg),
            "lb" => Some(WeightUnit::Lb),
            _ => None,
        }
    }

    /// Normalize a submitted value in this unit to stored kilograms
    pub fn to_kg(self, value: f64) -> f64 {
        match self {
            WeightUnit::Kg => round2(value),
            WeightUnit::Lb => lb_to_kg(value),
        }
    }
}
