// ABOUTME: Portion balancing engine reconciling a day's meals with nutrition targets
// ABOUTME: Fixed pipeline: totals, carb scale, class-specific fat cut, supplements, retraction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitplan Labs

//! # Portion Balancing
//!
//! One day's meals go through a fixed, ordered pipeline of pure
//! transformations over an immutable snapshot:
//!
//! 1. compute per-meal and day totals from the ingredient nutrition table
//! 2. single-pass carb correction (uniform scale, floored)
//! 3. single-pass fat correction (class-specific multipliers)
//! 4. supplement injection to close remaining gaps (at most two entries)
//! 5. overshoot retraction — removal only, always last, never interleaved
//!
//! Steps 2-4 are independent corrections that can jointly overshoot; the
//! retraction stage is the final reconciling pass.
//!
//! Natural-values mode (all four targets exactly zero) bypasses the engine
//! entirely; the generator's self-reported nutrition is accepted as-is.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::nutrition_table::{lookup_nutrition, IngredientClass};
use crate::config::BalancingConfig;
use crate::models::{
    Ingredient, IngredientUnit, Meal, MealNutrition, MealSlot, NutritionTargets, RecipeDetail,
    SupplementKind,
};

/// Summed nutrition for one day
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DayTotals {
    /// Calories (kcal)
    pub calories: f64,
    /// Protein (g)
    pub protein_g: f64,
    /// Carbohydrates (g)
    pub carbs_g: f64,
    /// Fat (g)
    pub fat_g: f64,
}

/// Result of balancing one day
#[derive(Debug, Clone)]
pub struct BalancedDay {
    /// Adjusted meals, including any supplement entries
    pub meals: Vec<Meal>,
    /// Final day totals
    pub totals: DayTotals,
    /// Ingredient names with no nutrition match; they contributed zero
    pub unmatched_ingredients: Vec<String>,
}

/// Fixed per-100 g nutrition for supplement substances.
///
/// Deliberately distinct from the regular ingredient table: supplement dosing
/// was calibrated against these constants in production, so they are not
/// unified with the lookup used for ordinary ingredients.
struct SupplementProfile {
    calories: f64,
    protein_g: f64,
    carbs_g: f64,
    fat_g: f64,
}

const WHEY_PER_100G: SupplementProfile = SupplementProfile {
    calories: 380.0,
    protein_g: 78.0,
    carbs_g: 8.0,
    fat_g: 5.0,
};

const GAINER_PER_100G: SupplementProfile = SupplementProfile {
    calories: 390.0,
    protein_g: 15.0,
    carbs_g: 70.0,
    fat_g: 5.0,
};

/// Balance one day of meals against the daily targets.
///
/// Pure with respect to its inputs; the only side effects are data-quality
/// log lines for unmatched ingredients and retracted supplements.
#[must_use]
pub fn balance_day(
    meals: Vec<Meal>,
    targets: &NutritionTargets,
    config: &BalancingConfig,
) -> BalancedDay {
    if targets.is_natural_values() {
        // Explicit mode switch: accept self-reported nutrition untouched
        let totals = meals.iter().fold(DayTotals::default(), |acc, meal| {
            add_nutrition(acc, meal.nutrition)
        });
        return BalancedDay {
            meals,
            totals,
            unmatched_ingredients: Vec::new(),
        };
    }

    let mut unmatched = BTreeSet::new();

    let (meals, totals) = recompute(meals, &mut unmatched);

    let meals = apply_carb_correction(meals, totals, targets, config);
    let (meals, totals) = recompute(meals, &mut unmatched);

    let meals = apply_fat_correction(meals, totals, targets, config);
    let (meals, totals) = recompute(meals, &mut unmatched);

    let meals = inject_supplements(meals, totals, targets, config);
    let (meals, totals) = recompute(meals, &mut unmatched);

    let meals = retract_overshoot(meals, totals, targets, config);
    let (meals, totals) = recompute(meals, &mut unmatched);

    for name in &unmatched {
        warn!(ingredient = %name, "no nutrition match; ingredient contributed zero to day totals");
    }

    BalancedDay {
        meals,
        totals,
        unmatched_ingredients: unmatched.into_iter().collect(),
    }
}

// ============================================================================
// Stage 1: Totals
// ============================================================================

/// Recompute per-meal nutrition from ingredients and sum the day
fn recompute(mut meals: Vec<Meal>, unmatched: &mut BTreeSet<String>) -> (Vec<Meal>, DayTotals) {
    let mut totals = DayTotals::default();
    for meal in &mut meals {
        meal.nutrition = meal.supplement.map_or_else(
            || computed_meal_nutrition(&meal.recipe, unmatched),
            |kind| supplement_nutrition(kind, &meal.recipe),
        );
        totals = add_nutrition(totals, meal.nutrition);
    }
    (meals, totals)
}

fn computed_meal_nutrition(
    recipe: &RecipeDetail,
    unmatched: &mut BTreeSet<String>,
) -> MealNutrition {
    let mut nutrition = MealNutrition::default();
    for ingredient in &recipe.ingredients {
        let Some(per_100) = lookup_nutrition(&ingredient.name) else {
            unmatched.insert(ingredient.name.clone());
            continue;
        };
        let factor = ingredient.amount / 100.0;
        nutrition.calories += per_100.calories * factor;
        nutrition.protein_g += per_100.protein_g * factor;
        nutrition.carbs_g += per_100.carbs_g * factor;
        nutrition.fat_g += per_100.fat_g * factor;
    }
    nutrition
}

fn supplement_nutrition(kind: SupplementKind, recipe: &RecipeDetail) -> MealNutrition {
    let profile = match kind {
        SupplementKind::Protein => &WHEY_PER_100G,
        SupplementKind::Gainer => &GAINER_PER_100G,
    };
    let dose_g: f64 = recipe.ingredients.iter().map(|i| i.amount).sum();
    let factor = dose_g / 100.0;
    MealNutrition {
        calories: profile.calories * factor,
        protein_g: profile.protein_g * factor,
        carbs_g: profile.carbs_g * factor,
        fat_g: profile.fat_g * factor,
    }
}

fn add_nutrition(totals: DayTotals, nutrition: MealNutrition) -> DayTotals {
    DayTotals {
        calories: totals.calories + nutrition.calories,
        protein_g: totals.protein_g + nutrition.protein_g,
        carbs_g: totals.carbs_g + nutrition.carbs_g,
        fat_g: totals.fat_g + nutrition.fat_g,
    }
}

// ============================================================================
// Stage 2: Carb Correction
// ============================================================================

/// Uniform single-pass scale-down when day carbs exceed the threshold
fn apply_carb_correction(
    mut meals: Vec<Meal>,
    totals: DayTotals,
    targets: &NutritionTargets,
    config: &BalancingConfig,
) -> Vec<Meal> {
    let target_carbs = targets.carbs_per_day_g;
    if target_carbs <= 0.0 || totals.carbs_g <= target_carbs * config.carb_excess_ratio {
        return meals;
    }

    let factor = (target_carbs / totals.carbs_g) * config.carb_scale_safety;
    debug!(
        day_carbs = totals.carbs_g,
        target_carbs, factor, "carb correction applied"
    );

    for meal in &mut meals {
        for ingredient in &mut meal.recipe.ingredients {
            ingredient.amount = (ingredient.amount * factor).max(config.min_ingredient_amount);
        }
    }
    meals
}

// ============================================================================
// Stage 3: Fat Correction
// ============================================================================

/// Class-specific single-pass cut when day fat exceeds the threshold.
///
/// A uniform cut would under-correct the few high-fat-density ingredients
/// responsible for the excess, so oils are cut hardest.
fn apply_fat_correction(
    mut meals: Vec<Meal>,
    totals: DayTotals,
    targets: &NutritionTargets,
    config: &BalancingConfig,
) -> Vec<Meal> {
    let target_fat = targets.fat_per_day_g;
    if target_fat <= 0.0 || totals.fat_g <= target_fat * config.fat_excess_ratio {
        return meals;
    }

    debug!(
        day_fat = totals.fat_g,
        target_fat, "fat correction applied"
    );

    for meal in &mut meals {
        for ingredient in &mut meal.recipe.ingredients {
            let class = lookup_nutrition(&ingredient.name)
                .map_or(IngredientClass::General, |n| n.class);
            let (multiplier, floor) = match class {
                IngredientClass::Oil => (config.fat_cuts.oil_multiplier, config.fat_cuts.oil_floor),
                IngredientClass::NutsSeeds => {
                    (config.fat_cuts.nuts_multiplier, config.fat_cuts.nuts_floor)
                }
                IngredientClass::DairyFat => (
                    config.fat_cuts.dairy_fat_multiplier,
                    config.fat_cuts.dairy_fat_floor,
                ),
                IngredientClass::General => continue,
            };
            ingredient.amount = (ingredient.amount * multiplier).max(floor);
        }
    }
    meals
}

// ============================================================================
// Stage 4: Supplement Injection
// ============================================================================

/// Append at most two supplement entries to close remaining gaps
fn inject_supplements(
    mut meals: Vec<Meal>,
    totals: DayTotals,
    targets: &NutritionTargets,
    config: &BalancingConfig,
) -> Vec<Meal> {
    let protein_gap = (targets.protein_per_day_g - totals.protein_g).max(0.0);
    if protein_gap > config.protein_gap_threshold_g && totals.protein_g < targets.protein_per_day_g
    {
        let dose_protein = protein_gap.min(config.protein_dose_cap_g);
        let powder_g = (dose_protein / (WHEY_PER_100G.protein_g / 100.0)).round();
        debug!(protein_gap, powder_g, "protein supplement injected");
        meals.push(supplement_meal(
            SupplementKind::Protein,
            "Protein shake",
            "Whey protein supplement closing the day's protein gap.",
            "whey protein",
            powder_g,
        ));
    }

    let carb_gap = (targets.carbs_per_day_g - totals.carbs_g).max(0.0);
    let calorie_gap = (f64::from(targets.calories_per_day) - totals.calories).max(0.0);
    if carb_gap > config.carb_gap_threshold_g || calorie_gap > config.calorie_gap_threshold_kcal {
        // Size from whichever gap demands the larger dose
        let dose_from_carbs = carb_gap / (GAINER_PER_100G.carbs_g / 100.0);
        let dose_from_calories = calorie_gap / (GAINER_PER_100G.calories / 100.0);
        let powder_g = dose_from_carbs
            .max(dose_from_calories)
            .min(config.gainer_dose_cap_g)
            .round();
        debug!(carb_gap, calorie_gap, powder_g, "gainer supplement injected");
        meals.push(supplement_meal(
            SupplementKind::Gainer,
            "Mass gainer shake",
            "Carbohydrate supplement closing the day's energy gap.",
            "gainer",
            powder_g,
        ));
    }

    meals
}

fn supplement_meal(
    kind: SupplementKind,
    name: &str,
    description: &str,
    substance: &str,
    dose_g: f64,
) -> Meal {
    Meal {
        name: name.to_owned(),
        description: description.to_owned(),
        slot: MealSlot::Snack,
        recipe_id: None,
        recipe: RecipeDetail {
            ingredients: vec![Ingredient {
                name: substance.to_owned(),
                amount: dose_g,
                unit: IngredientUnit::Grams,
            }],
            instructions: "Mix with water or milk and shake well.".to_owned(),
            tags: vec!["supplement".to_owned()],
        },
        nutrition: MealNutrition::default(),
        supplement: Some(kind),
    }
}

// ============================================================================
// Stage 5: Overshoot Retraction
// ============================================================================

/// Remove supplements that jointly overshoot with the earlier corrections.
///
/// Removal only, never rescaling; this stage always runs after all additions.
fn retract_overshoot(
    mut meals: Vec<Meal>,
    totals: DayTotals,
    targets: &NutritionTargets,
    config: &BalancingConfig,
) -> Vec<Meal> {
    if targets.protein_per_day_g > 0.0
        && totals.protein_g > targets.protein_per_day_g * config.overshoot_ratio
    {
        warn!(
            day_protein = totals.protein_g,
            target = targets.protein_per_day_g,
            "protein overshoot after corrections; removing protein supplement"
        );
        meals.retain(|meal| meal.supplement != Some(SupplementKind::Protein));
    }

    if targets.carbs_per_day_g > 0.0
        && totals.carbs_g > targets.carbs_per_day_g * config.overshoot_ratio
    {
        warn!(
            day_carbs = totals.carbs_g,
            target = targets.carbs_per_day_g,
            "carb overshoot after corrections; removing gainer supplement"
        );
        meals.retain(|meal| meal.supplement != Some(SupplementKind::Gainer));
    }

    meals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meal(name: &str, ingredients: Vec<(&str, f64)>) -> Meal {
        Meal {
            name: name.to_owned(),
            description: String::new(),
            slot: MealSlot::Lunch,
            recipe_id: None,
            recipe: RecipeDetail {
                ingredients: ingredients
                    .into_iter()
                    .map(|(name, amount)| Ingredient {
                        name: name.to_owned(),
                        amount,
                        unit: IngredientUnit::Grams,
                    })
                    .collect(),
                instructions: "Cook.".to_owned(),
                tags: vec![],
            },
            nutrition: MealNutrition::default(),
            supplement: None,
        }
    }

    fn targets(calories: u32, protein: f64, carbs: f64, fat: f64) -> NutritionTargets {
        NutritionTargets {
            calories_per_day: calories,
            protein_per_day_g: protein,
            carbs_per_day_g: carbs,
            fat_per_day_g: fat,
        }
    }

    #[test]
    fn natural_values_mode_bypasses_the_engine() {
        let mut input = meal("Pasta", vec![("pasta", 120.0)]);
        input.nutrition = MealNutrition {
            calories: 999.0,
            protein_g: 1.0,
            carbs_g: 2.0,
            fat_g: 3.0,
        };
        let balanced = balance_day(
            vec![input.clone()],
            &NutritionTargets::natural_values(),
            &BalancingConfig::default(),
        );
        // Self-reported nutrition survives untouched
        assert_eq!(balanced.meals[0].nutrition, input.nutrition);
        assert!((balanced.totals.calories - 999.0).abs() < f64::EPSILON);
    }

    #[test]
    fn carb_correction_scales_every_ingredient_once() {
        let config = BalancingConfig::default();
        let meals = vec![
            meal("Rice bowl", vec![("rice", 200.0)]),
            meal("Oatmeal", vec![("oats", 150.0)]),
            meal("Toast", vec![("bread", 100.0)]),
        ];

        // Day carbs = 200*0.79 + 150*0.66 + 100*0.49 = 158 + 99 + 49 = 306
        let day_carbs = 306.0;
        // Target chosen so the excess ratio is exactly 1.6, giving the
        // canonical scale factor (1/1.6)*0.9 = 0.5625
        let t = targets(2000, 150.0, day_carbs / 1.6, 70.0);

        let balanced = balance_day(meals, &t, &config);
        let rice = &balanced.meals[0].recipe.ingredients[0];
        assert!((rice.amount - 200.0 * 0.5625).abs() < 1e-9);

        // Single-pass convergence bound
        assert!(balanced.totals.carbs_g <= t.carbs_per_day_g * 1.2 * 1.05);
    }

    #[test]
    fn small_amounts_are_floored_not_zeroed() {
        let config = BalancingConfig::default();
        let meals = vec![meal("Honey bomb", vec![("honey", 12.0), ("honey", 600.0)])];
        let t = targets(2000, 150.0, 100.0, 70.0);

        let balanced = balance_day(meals, &t, &config);
        for ingredient in &balanced.meals[0].recipe.ingredients {
            assert!(ingredient.amount >= config.min_ingredient_amount);
        }
    }

    #[test]
    fn fat_correction_cuts_by_ingredient_class() {
        let config = BalancingConfig::default();
        let meals = vec![meal(
            "Fat heavy",
            vec![
                ("olive oil", 50.0),
                ("almonds", 100.0),
                ("cheese", 100.0),
                ("chicken breast", 200.0),
            ],
        )];
        // Day fat = 50 + 50 + 33 + 7.2 = 140.2 against a 65 g target; carb
        // and calorie gaps stay under their thresholds so only fat triggers
        let t = targets(1500, 150.0, 45.0, 65.0);

        let balanced = balance_day(meals, &t, &config);
        let ingredients = &balanced.meals[0].recipe.ingredients;
        assert!((ingredients[0].amount - 15.0).abs() < 1e-9); // oil: 50 * 0.3
        assert!((ingredients[1].amount - 70.0).abs() < 1e-9); // nuts: 100 * 0.7
        assert!((ingredients[2].amount - 80.0).abs() < 1e-9); // cheese: 100 * 0.8
        assert!((ingredients[3].amount - 200.0).abs() < 1e-9); // general: untouched

        assert!(balanced.totals.fat_g <= t.fat_per_day_g * 1.3 * 1.05);
    }

    #[test]
    fn protein_supplement_sized_to_gap_and_capped() {
        let config = BalancingConfig::default();
        // Day protein = 300 * 0.027 = 8.1 g against a 100 g target
        let meals = vec![meal("Rice only", vec![("cooked rice", 300.0)])];
        let t = targets(600, 100.0, 120.0, 40.0);

        let balanced = balance_day(meals, &t, &config);
        let shake = balanced
            .meals
            .iter()
            .find(|m| m.supplement == Some(SupplementKind::Protein))
            .unwrap();
        // Gap (91.9) exceeds the 30 g cap, so the dose closes exactly 30 g of
        // protein: 30 / 0.78 = 38 g of powder
        let powder = shake.recipe.ingredients[0].amount;
        assert!((powder - 38.0).abs() < f64::EPSILON);
        assert!(shake.nutrition.protein_g <= config.protein_dose_cap_g + 1.0);
    }

    #[test]
    fn at_most_two_supplements_per_day() {
        let config = BalancingConfig::default();
        // Tiny meal leaves protein, carb and calorie gaps all wide open
        let meals = vec![meal("Lettuce", vec![("spinach", 50.0)])];
        let t = targets(2800, 160.0, 350.0, 80.0);

        let balanced = balance_day(meals, &t, &config);
        let supplements = balanced
            .meals
            .iter()
            .filter(|m| m.supplement.is_some())
            .count();
        assert!(supplements <= 2);
        assert_eq!(supplements, 2);
    }

    #[test]
    fn retraction_removes_gainer_on_carb_overshoot() {
        let config = BalancingConfig::default();
        // Calorie gap triggers the gainer, but carbs are already near target,
        // so the injected dose overshoots 1.1x and must be retracted entirely
        let meals = vec![meal("Rice bowl", vec![("cooked rice", 300.0)])];
        let t = targets(2500, 8.0, 90.0, 60.0);

        let balanced = balance_day(meals, &t, &config);
        assert!(balanced
            .meals
            .iter()
            .all(|m| m.supplement != Some(SupplementKind::Gainer)));
    }

    #[test]
    fn retraction_invariant_for_protein() {
        let config = BalancingConfig::default();
        let cases = [
            (vec![meal("Rice", vec![("cooked rice", 300.0)])], targets(600, 100.0, 120.0, 40.0)),
            (vec![meal("Chicken", vec![("chicken breast", 250.0)])], targets(2000, 90.0, 250.0, 60.0)),
            (vec![meal("Spinach", vec![("spinach", 50.0)])], targets(2800, 160.0, 350.0, 80.0)),
        ];
        for (meals, t) in cases {
            let balanced = balance_day(meals, &t, &config);
            let has_protein_supplement = balanced
                .meals
                .iter()
                .any(|m| m.supplement == Some(SupplementKind::Protein));
            if has_protein_supplement {
                assert!(
                    balanced.totals.protein_g
                        <= t.protein_per_day_g * config.overshoot_ratio + 1e-9
                );
            }
        }
    }

    #[test]
    fn unknown_ingredients_contribute_zero_and_are_reported() {
        let config = BalancingConfig::default();
        let meals = vec![meal(
            "Mystery",
            vec![("dragonfruit compote", 200.0), ("cooked rice", 100.0)],
        )];
        let t = targets(2000, 100.0, 250.0, 60.0);

        let balanced = balance_day(meals, &t, &config);
        assert!(balanced
            .unmatched_ingredients
            .contains(&"dragonfruit compote".to_owned()));
        // Only the rice counted toward totals before supplements
        assert!(balanced.meals[0].nutrition.calories - 130.0 < 1.0);
    }
}
