// ABOUTME: Static per-100g ingredient nutrition lookup
// ABOUTME: Alias and partial matching; misses contribute zero and log a data-quality signal
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitplan Labs

use std::collections::HashMap;
use std::sync::LazyLock;

/// Ingredient class for class-specific fat correction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngredientClass {
    /// Oils and pure fats
    Oil,
    /// Nuts, seeds and nut butters
    NutsSeeds,
    /// Cheese, avocado and similar fat-dense whole foods
    DairyFat,
    /// Everything else
    General,
}

/// Nutrition per 100 g of an ingredient
#[derive(Debug, Clone)]
pub struct IngredientNutrition {
    /// Calories (kcal) per 100 g
    pub calories: f64,
    /// Protein (g) per 100 g
    pub protein_g: f64,
    /// Carbohydrates (g) per 100 g
    pub carbs_g: f64,
    /// Fat (g) per 100 g
    pub fat_g: f64,
    /// Class used by fat correction
    pub class: IngredientClass,
    /// Common names/aliases for matching
    pub aliases: &'static [&'static str],
}

impl IngredientNutrition {
    const fn new(calories: f64, protein_g: f64, carbs_g: f64, fat_g: f64) -> Self {
        Self {
            calories,
            protein_g,
            carbs_g,
            fat_g,
            class: IngredientClass::General,
            aliases: &[],
        }
    }

    const fn class(mut self, class: IngredientClass) -> Self {
        self.class = class;
        self
    }

    const fn with_aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }
}

/// Common ingredient nutrition database (per 100 g, approximate averages)
static INGREDIENT_NUTRITION: LazyLock<HashMap<&'static str, IngredientNutrition>> =
    LazyLock::new(|| {
        let mut m = HashMap::new();

        // === Proteins ===
        m.insert(
            "chicken breast",
            IngredientNutrition::new(165.0, 31.0, 0.0, 3.6)
                .with_aliases(&["chicken", "boneless chicken", "grilled chicken"]),
        );
        m.insert(
            "ground beef",
            IngredientNutrition::new(250.0, 26.0, 0.0, 15.0)
                .with_aliases(&["beef mince", "minced beef", "lean beef"]),
        );
        m.insert(
            "salmon",
            IngredientNutrition::new(208.0, 20.0, 0.0, 13.0).with_aliases(&["salmon fillet"]),
        );
        m.insert(
            "tuna",
            IngredientNutrition::new(132.0, 28.0, 0.0, 1.3).with_aliases(&["canned tuna"]),
        );
        m.insert(
            "egg",
            IngredientNutrition::new(155.0, 13.0, 1.1, 11.0).with_aliases(&["eggs", "large egg"]),
        );
        m.insert(
            "egg white",
            IngredientNutrition::new(52.0, 11.0, 0.7, 0.2).with_aliases(&["egg whites"]),
        );
        m.insert(
            "tofu",
            IngredientNutrition::new(76.0, 8.0, 1.9, 4.8).with_aliases(&["firm tofu"]),
        );
        m.insert(
            "greek yogurt",
            IngredientNutrition::new(59.0, 10.0, 3.6, 0.4)
                .with_aliases(&["yogurt", "plain yogurt"]),
        );
        m.insert(
            "cottage cheese",
            IngredientNutrition::new(98.0, 11.0, 3.4, 4.3)
                .with_aliases(&["low fat cottage cheese"]),
        );

        // === Grains & Carbs ===
        m.insert(
            "rice",
            IngredientNutrition::new(360.0, 7.0, 79.0, 0.6)
                .with_aliases(&["white rice", "uncooked rice", "basmati rice", "jasmine rice"]),
        );
        m.insert(
            "cooked rice",
            IngredientNutrition::new(130.0, 2.7, 28.0, 0.3).with_aliases(&["steamed rice"]),
        );
        m.insert(
            "oats",
            IngredientNutrition::new(389.0, 16.9, 66.0, 6.9)
                .with_aliases(&["rolled oats", "oatmeal", "old fashioned oats"]),
        );
        m.insert(
            "quinoa",
            IngredientNutrition::new(368.0, 14.0, 64.0, 6.1).with_aliases(&["uncooked quinoa"]),
        );
        m.insert(
            "pasta",
            IngredientNutrition::new(371.0, 13.0, 75.0, 1.5)
                .with_aliases(&["dry pasta", "uncooked pasta", "spaghetti", "penne"]),
        );
        m.insert(
            "bread",
            IngredientNutrition::new(265.0, 9.0, 49.0, 3.2)
                .with_aliases(&["whole wheat bread", "slice of bread", "toast"]),
        );
        m.insert(
            "potato",
            IngredientNutrition::new(77.0, 2.0, 17.0, 0.1).with_aliases(&["potatoes"]),
        );
        m.insert(
            "sweet potato",
            IngredientNutrition::new(86.0, 1.6, 20.0, 0.1).with_aliases(&["sweet potatoes"]),
        );

        // === Legumes ===
        m.insert(
            "lentils",
            IngredientNutrition::new(116.0, 9.0, 20.0, 0.4)
                .with_aliases(&["cooked lentils", "red lentils"]),
        );
        m.insert(
            "chickpeas",
            IngredientNutrition::new(164.0, 8.9, 27.0, 2.6)
                .with_aliases(&["garbanzo beans", "canned chickpeas"]),
        );
        m.insert(
            "black beans",
            IngredientNutrition::new(132.0, 8.9, 24.0, 0.5).with_aliases(&["canned black beans"]),
        );

        // === Fruits & Vegetables ===
        m.insert(
            "banana",
            IngredientNutrition::new(89.0, 1.1, 23.0, 0.3).with_aliases(&["bananas"]),
        );
        m.insert(
            "apple",
            IngredientNutrition::new(52.0, 0.3, 14.0, 0.2).with_aliases(&["apples"]),
        );
        m.insert(
            "blueberries",
            IngredientNutrition::new(57.0, 0.7, 14.0, 0.3).with_aliases(&["blueberry", "berries"]),
        );
        m.insert(
            "broccoli",
            IngredientNutrition::new(34.0, 2.8, 7.0, 0.4).with_aliases(&["broccoli florets"]),
        );
        m.insert(
            "spinach",
            IngredientNutrition::new(23.0, 2.9, 3.6, 0.4)
                .with_aliases(&["fresh spinach", "baby spinach"]),
        );
        m.insert(
            "tomato",
            IngredientNutrition::new(18.0, 0.9, 3.9, 0.2).with_aliases(&["tomatoes", "cherry tomatoes"]),
        );
        m.insert(
            "onion",
            IngredientNutrition::new(40.0, 1.1, 9.3, 0.1).with_aliases(&["onions", "red onion"]),
        );
        m.insert(
            "bell pepper",
            IngredientNutrition::new(31.0, 1.0, 6.0, 0.3).with_aliases(&["pepper", "capsicum"]),
        );
        m.insert(
            "carrot",
            IngredientNutrition::new(41.0, 0.9, 10.0, 0.2).with_aliases(&["carrots"]),
        );

        // === Dairy ===
        m.insert(
            "milk",
            IngredientNutrition::new(61.0, 3.2, 4.8, 3.3)
                .with_aliases(&["whole milk", "semi-skimmed milk"]),
        );
        m.insert(
            "cheese",
            IngredientNutrition::new(402.0, 25.0, 1.3, 33.0)
                .class(IngredientClass::DairyFat)
                .with_aliases(&["cheddar", "shredded cheese", "cheddar cheese"]),
        );
        m.insert(
            "parmesan",
            IngredientNutrition::new(431.0, 38.0, 4.1, 29.0)
                .class(IngredientClass::DairyFat)
                .with_aliases(&["parmesan cheese", "grated parmesan"]),
        );
        m.insert(
            "mozzarella",
            IngredientNutrition::new(280.0, 28.0, 3.1, 17.0)
                .class(IngredientClass::DairyFat)
                .with_aliases(&["mozzarella cheese"]),
        );
        m.insert(
            "butter",
            IngredientNutrition::new(717.0, 0.9, 0.1, 81.0)
                .class(IngredientClass::Oil)
                .with_aliases(&["unsalted butter"]),
        );

        // === Fats & Oils ===
        m.insert(
            "olive oil",
            IngredientNutrition::new(884.0, 0.0, 0.0, 100.0)
                .class(IngredientClass::Oil)
                .with_aliases(&["extra virgin olive oil", "evoo"]),
        );
        m.insert(
            "coconut oil",
            IngredientNutrition::new(862.0, 0.0, 0.0, 100.0)
                .class(IngredientClass::Oil)
                .with_aliases(&["virgin coconut oil"]),
        );
        m.insert(
            "vegetable oil",
            IngredientNutrition::new(884.0, 0.0, 0.0, 100.0)
                .class(IngredientClass::Oil)
                .with_aliases(&["canola oil", "cooking oil", "sunflower oil"]),
        );
        m.insert(
            "avocado",
            IngredientNutrition::new(160.0, 2.0, 8.5, 14.7)
                .class(IngredientClass::DairyFat)
                .with_aliases(&["avocados"]),
        );

        // === Nuts & Seeds ===
        m.insert(
            "almonds",
            IngredientNutrition::new(579.0, 21.0, 22.0, 50.0)
                .class(IngredientClass::NutsSeeds)
                .with_aliases(&["almond", "whole almonds"]),
        );
        m.insert(
            "walnuts",
            IngredientNutrition::new(654.0, 15.0, 14.0, 65.0)
                .class(IngredientClass::NutsSeeds)
                .with_aliases(&["walnut"]),
        );
        m.insert(
            "peanut butter",
            IngredientNutrition::new(588.0, 25.0, 20.0, 50.0)
                .class(IngredientClass::NutsSeeds)
                .with_aliases(&["natural peanut butter"]),
        );
        m.insert(
            "chia seeds",
            IngredientNutrition::new(486.0, 17.0, 42.0, 31.0)
                .class(IngredientClass::NutsSeeds)
                .with_aliases(&["chia"]),
        );
        m.insert(
            "flax seeds",
            IngredientNutrition::new(534.0, 18.0, 29.0, 42.0)
                .class(IngredientClass::NutsSeeds)
                .with_aliases(&["flaxseed", "ground flax"]),
        );

        // === Sweeteners & Misc ===
        m.insert(
            "honey",
            IngredientNutrition::new(304.0, 0.3, 82.0, 0.0).with_aliases(&["raw honey"]),
        );
        m.insert(
            "maple syrup",
            IngredientNutrition::new(260.0, 0.0, 67.0, 0.1).with_aliases(&["pure maple syrup"]),
        );
        m.insert(
            "whey protein",
            IngredientNutrition::new(380.0, 78.0, 8.0, 5.0)
                .with_aliases(&["protein powder", "whey", "whey protein powder"]),
        );

        m
    });

/// Look up nutrition for an ingredient by name.
///
/// Case-insensitive: direct key, then aliases, then partial match (either
/// direction). Returns `None` when nothing matches; callers treat that as a
/// zero contribution, not an error.
#[must_use]
pub fn lookup_nutrition(ingredient_name: &str) -> Option<&'static IngredientNutrition> {
    let normalized = ingredient_name.trim().to_lowercase();
    if normalized.is_empty() {
        return None;
    }

    if let Some(nutrition) = INGREDIENT_NUTRITION.get(normalized.as_str()) {
        return Some(nutrition);
    }

    for nutrition in INGREDIENT_NUTRITION.values() {
        for alias in nutrition.aliases {
            if alias.eq_ignore_ascii_case(&normalized) {
                return Some(nutrition);
            }
        }
    }

    for (key, nutrition) in INGREDIENT_NUTRITION.iter() {
        if normalized.contains(key) || key.contains(normalized.as_str()) {
            return Some(nutrition);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_and_alias_lookup() {
        assert!(lookup_nutrition("chicken breast").is_some());
        assert!(lookup_nutrition("Boneless Chicken").is_some());
    }

    #[test]
    fn partial_match_finds_qualified_names() {
        let nutrition = lookup_nutrition("organic rolled oats").unwrap();
        assert!((nutrition.protein_g - 16.9).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_ingredient_is_a_miss() {
        assert!(lookup_nutrition("dragonfruit compote").is_none());
    }

    #[test]
    fn oil_class_is_tagged_for_fat_correction() {
        assert_eq!(
            lookup_nutrition("olive oil").unwrap().class,
            IngredientClass::Oil
        );
        assert_eq!(
            lookup_nutrition("almonds").unwrap().class,
            IngredientClass::NutsSeeds
        );
    }
}
