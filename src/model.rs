//! Core domain types for the spending simulator.

use std::fmt;

use crate::Amount;

/// Scenario identifier; also defines traversal order.
pub type SequenceId = u32;

/// Spending category with its own emission factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    FoodDelivery,
    Restaurant,
    Grocery,
    Ecommerce,
    RideSharing,
}

impl Category {
    /// Category used when a key is not in the emission table.
    pub const DEFAULT: Category = Category::Restaurant;

    pub const ALL: [Category; 5] = [
        Category::FoodDelivery,
        Category::Restaurant,
        Category::Grocery,
        Category::Ecommerce,
        Category::RideSharing,
    ];

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "food_delivery" => Some(Category::FoodDelivery),
            "restaurant" => Some(Category::Restaurant),
            "grocery" => Some(Category::Grocery),
            "ecommerce" => Some(Category::Ecommerce),
            "ride_sharing" => Some(Category::RideSharing),
            _ => None,
        }
    }

    /// Resolve a key, substituting [`Category::DEFAULT`] for unknown keys.
    pub fn resolve(key: &str) -> Self {
        Self::from_key(key).unwrap_or(Self::DEFAULT)
    }

    pub fn key(&self) -> &'static str {
        match self {
            Category::FoodDelivery => "food_delivery",
            Category::Restaurant => "restaurant",
            Category::Grocery => "grocery",
            Category::Ecommerce => "ecommerce",
            Category::RideSharing => "ride_sharing",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Per-category constants converting spend into kg CO₂e.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmissionFactor {
    /// kg CO₂e per 100 currency units spent.
    pub per_unit_rate: f64,
    /// kg CO₂e added to every transaction (packaging, delivery leg, ...).
    pub fixed_overhead: f64,
    pub icon: &'static str,
    pub label: &'static str,
}

/// A spending scenario the user is walked through.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub sequence_id: SequenceId,
    pub display_name: String,
    pub amount: Amount,
    /// Category key; unknown keys fall back to the default emission factor.
    pub category: String,
    pub display_time: String,
}

impl Scenario {
    pub fn new(
        sequence_id: SequenceId,
        display_name: impl Into<String>,
        amount: Amount,
        category: impl Into<String>,
        display_time: impl Into<String>,
    ) -> Self {
        Self {
            sequence_id,
            display_name: display_name.into(),
            amount,
            category: category.into(),
            display_time: display_time.into(),
        }
    }
}

/// Carbon impact of a single transaction, rounded for display.
#[derive(Debug, Clone, PartialEq)]
pub struct CarbonResult {
    pub category_label: &'static str,
    pub icon: &'static str,
    pub amount: Amount,
    pub carbon_generated_kg: f64,
    pub round_off_amount: Amount,
    /// Displayed offset, never below 0.01 kg.
    pub carbon_offset_kg: f64,
    /// Share of generated carbon covered by the offset, in `[0, 100]`.
    pub offset_percentage: f64,
    pub net_carbon_kg: f64,
}

/// A scenario evaluated against the budget.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub scenario: Scenario,
    pub result: CarbonResult,
    /// The scenario's amount was above the remaining budget.
    pub exceeded: bool,
}
