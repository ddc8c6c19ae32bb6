//! Per-transaction carbon footprint estimation.
//!
//! Spend is converted to kg CO₂e with the category's emission factor. The
//! round-off to the next whole currency unit buys carbon credits at a fixed
//! price; the resulting offset is what the user sees next to the footprint.

use crate::Amount;
use crate::catalog::emission_factor;
use crate::model::{CarbonResult, Category};

/// Currency units per kg of CO₂ offset.
pub const CARBON_CREDIT_PRICE_PER_KG: f64 = 0.10;

/// Smallest offset displayed, so a non-zero offset never shows as `0.00`.
pub const MIN_DISPLAYED_OFFSET_KG: f64 = 0.01;

/// Round half-up to `decimals` places.
pub fn round_half_up(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor + 0.5).floor() / factor
}

/// Compute the carbon impact of spending `amount` in `category`.
///
/// Unknown categories use the default emission factor.
pub fn compute_footprint(amount: Amount, category: &str) -> CarbonResult {
    let factor = emission_factor(category);

    let carbon_generated_kg =
        (amount.to_f64() / 100.0) * factor.per_unit_rate + factor.fixed_overhead;

    let round_off_amount = amount.ceil() - amount;
    let carbon_offset_possible = round_off_amount.to_f64() / CARBON_CREDIT_PRICE_PER_KG;

    let carbon_offset_kg = if carbon_offset_possible < MIN_DISPLAYED_OFFSET_KG {
        MIN_DISPLAYED_OFFSET_KG
    } else {
        round_half_up(carbon_offset_possible, 2)
    };

    let offset_percentage = if carbon_generated_kg > 0.0 {
        round_half_up((carbon_offset_kg / carbon_generated_kg * 100.0).min(100.0), 1)
    } else {
        0.0
    };

    let net_carbon_kg = round_half_up(carbon_generated_kg - carbon_offset_kg, 2).max(0.0);

    CarbonResult {
        category_label: factor.label,
        icon: factor.icon,
        amount,
        carbon_generated_kg,
        round_off_amount,
        carbon_offset_kg,
        offset_percentage,
        net_carbon_kg,
    }
}

/// A lower-emission way to make the same purchase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Suggestion {
    pub category: Category,
    pub saved_kg: f64,
}

/// Suggest a substitute category when it emits strictly less for `amount`.
pub fn suggest_alternative(amount: Amount, category: &str) -> Option<Suggestion> {
    let current = Category::resolve(category);
    let substitute = current.lower_emission_substitute()?;

    let generated = compute_footprint(amount, current.key()).carbon_generated_kg;
    let alternative = compute_footprint(amount, substitute.key()).carbon_generated_kg;
    let saved_kg = round_half_up(generated - alternative, 2);

    (saved_kg > 0.0).then_some(Suggestion {
        category: substitute,
        saved_kg,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn round_half_up_rounds_ties_up() {
        assert_eq!(round_half_up(1.25, 1), 1.3);
        assert_eq!(round_half_up(0.125, 2), 0.13);
        assert_eq!(round_half_up(3.7199999999999998, 2), 3.72);
        assert_eq!(round_half_up(0.0, 2), 0.0);
    }

    #[test]
    fn restaurant_150() {
        let result = compute_footprint(Amount::from_whole(150), "restaurant");
        assert!(close(result.carbon_generated_kg, 0.8));
        assert_eq!(result.round_off_amount, Amount::default());
        assert_eq!(result.carbon_offset_kg, 0.01);
        assert_eq!(result.offset_percentage, 1.3);
        assert_eq!(result.net_carbon_kg, 0.79);
        assert_eq!(result.amount, Amount::from_whole(150));
        assert_eq!(result.category_label, "Restaurant & Café");
    }

    #[test]
    fn food_delivery_320() {
        let result = compute_footprint(Amount::from_whole(320), "food_delivery");
        assert!(close(result.carbon_generated_kg, 3.72));
        assert_eq!(result.round_off_amount, Amount::default());
        assert_eq!(result.carbon_offset_kg, 0.01);
        assert_eq!(result.offset_percentage, 0.3);
        assert_eq!(result.net_carbon_kg, 3.71);
        assert_eq!(result.icon, "🛵");
    }

    #[test]
    fn fractional_amount_funds_offset() {
        let result = compute_footprint(Amount::from_float(89.99), "grocery");
        assert!(close(result.carbon_generated_kg, 0.76997));
        assert_eq!(result.round_off_amount, Amount::from_minor(1));
        assert_eq!(result.carbon_offset_kg, 0.1);
        assert_eq!(result.offset_percentage, 13.0);
        assert_eq!(result.net_carbon_kg, 0.67);
    }

    #[test]
    fn offset_larger_than_footprint_caps_percentage_and_net() {
        let result = compute_footprint(Amount::from_float(149.5), "restaurant");
        assert_eq!(result.round_off_amount, Amount::from_minor(50));
        assert_eq!(result.carbon_offset_kg, 5.0);
        assert_eq!(result.offset_percentage, 100.0);
        assert_eq!(result.net_carbon_kg, 0.0);
    }

    #[test]
    fn unknown_category_uses_default_factor() {
        let unknown = compute_footprint(Amount::from_whole(150), "bookstore");
        let restaurant = compute_footprint(Amount::from_whole(150), "restaurant");
        assert_eq!(unknown, restaurant);
    }

    #[test]
    fn deterministic() {
        let a = compute_footprint(Amount::from_float(249.25), "food_delivery");
        let b = compute_footprint(Amount::from_float(249.25), "food_delivery");
        assert_eq!(a, b);
        assert_eq!(a.carbon_generated_kg.to_bits(), b.carbon_generated_kg.to_bits());
    }

    #[test]
    fn bounds_hold_across_amounts_and_categories() {
        for category in Category::ALL {
            for minor in [1, 99, 100, 1_001, 8_999, 14_950, 15_000, 99_999, 1_000_000] {
                let result = compute_footprint(Amount::from_minor(minor), category.key());
                assert!((0.0..=100.0).contains(&result.offset_percentage));
                assert!(result.net_carbon_kg >= 0.0);
                assert!(result.carbon_offset_kg >= MIN_DISPLAYED_OFFSET_KG);
                assert!(result.carbon_generated_kg > 0.0);
            }
        }
    }

    #[test]
    fn largest_amount_does_not_overflow() {
        let result = compute_footprint(Amount::from_minor(i64::MAX), "grocery");
        assert_eq!(result.round_off_amount, Amount::default());
        assert!(result.carbon_generated_kg.is_finite());
        assert_eq!(result.offset_percentage, 0.0);
    }

    #[test]
    fn tiny_offset_is_displayed_as_minimum() {
        // whole amounts have no round-off at all
        for category in Category::ALL {
            let result = compute_footprint(Amount::from_whole(500), category.key());
            assert_eq!(result.carbon_offset_kg, MIN_DISPLAYED_OFFSET_KG);
        }
    }

    #[test]
    fn food_delivery_suggests_restaurant() {
        let suggestion = suggest_alternative(Amount::from_whole(320), "food_delivery").unwrap();
        assert_eq!(suggestion.category, Category::Restaurant);
        // 3.72 - 1.48
        assert_eq!(suggestion.saved_kg, 2.24);
    }

    #[test]
    fn no_suggestion_without_substitute() {
        assert_eq!(suggest_alternative(Amount::from_whole(180), "ride_sharing"), None);
        assert_eq!(suggest_alternative(Amount::from_whole(150), "bookstore"), None);
    }
}
