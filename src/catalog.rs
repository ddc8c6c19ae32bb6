//! Static configuration: emission factors and the default scenario day.

use crate::Amount;
use crate::model::{Category, EmissionFactor, Scenario};

const FOOD_DELIVERY: EmissionFactor = EmissionFactor {
    per_unit_rate: 0.6,
    fixed_overhead: 1.8,
    icon: "🛵",
    label: "Food Delivery",
};

const RESTAURANT: EmissionFactor = EmissionFactor {
    per_unit_rate: 0.4,
    fixed_overhead: 0.2,
    icon: "☕",
    label: "Restaurant & Café",
};

const GROCERY: EmissionFactor = EmissionFactor {
    per_unit_rate: 0.3,
    fixed_overhead: 0.5,
    icon: "🛒",
    label: "Groceries",
};

const ECOMMERCE: EmissionFactor = EmissionFactor {
    per_unit_rate: 0.5,
    fixed_overhead: 2.5,
    icon: "📦",
    label: "E-commerce",
};

const RIDE_SHARING: EmissionFactor = EmissionFactor {
    per_unit_rate: 1.2,
    fixed_overhead: 0.8,
    icon: "🚗",
    label: "Ride Sharing",
};

impl Category {
    pub fn emission_factor(&self) -> &'static EmissionFactor {
        match self {
            Category::FoodDelivery => &FOOD_DELIVERY,
            Category::Restaurant => &RESTAURANT,
            Category::Grocery => &GROCERY,
            Category::Ecommerce => &ECOMMERCE,
            Category::RideSharing => &RIDE_SHARING,
        }
    }

    /// A substitute with a lower footprint for the same spend, if any.
    pub fn lower_emission_substitute(&self) -> Option<Category> {
        match self {
            // pick up instead of having it delivered
            Category::FoodDelivery => Some(Category::Restaurant),
            _ => None,
        }
    }
}

/// Look up the emission factor for a category key.
pub fn emission_factor(key: &str) -> &'static EmissionFactor {
    Category::resolve(key).emission_factor()
}

/// The five-step day shown by the landing page simulator.
pub fn default_scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new(1, "Morning Coffee", Amount::from_whole(150), "restaurant", "10:00 AM"),
        Scenario::new(2, "Lunch Delivery", Amount::from_whole(320), "food_delivery", "2:00 PM"),
        Scenario::new(3, "Weekly Groceries", Amount::from_whole(450), "grocery", "5:00 PM"),
        Scenario::new(4, "Online Shopping", Amount::from_whole(680), "ecommerce", "7:00 PM"),
        Scenario::new(5, "Ride Home", Amount::from_whole(180), "ride_sharing", "9:00 PM"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_category_has_a_factor() {
        for category in Category::ALL {
            let factor = category.emission_factor();
            assert!(factor.per_unit_rate > 0.0);
            assert!(factor.fixed_overhead >= 0.0);
            assert!(!factor.label.is_empty());
        }
    }

    #[test]
    fn unknown_key_uses_restaurant_factor() {
        assert_eq!(emission_factor("bookstore"), &RESTAURANT);
        assert_eq!(emission_factor("food_delivery"), &FOOD_DELIVERY);
    }

    #[test]
    fn default_scenarios_are_ordered() {
        let scenarios = default_scenarios();
        assert_eq!(scenarios.len(), 5);
        let ids: Vec<_> = scenarios.iter().map(|s| s.sequence_id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn default_scenarios_use_known_categories() {
        for scenario in default_scenarios() {
            assert!(Category::from_key(&scenario.category).is_some());
        }
    }

    #[test]
    fn default_scenario_amounts() {
        let amounts: Vec<_> = default_scenarios()
            .into_iter()
            .map(|s| s.amount.to_string())
            .collect();
        assert_eq!(amounts, vec!["150.00", "320.00", "450.00", "680.00", "180.00"]);
    }
}
