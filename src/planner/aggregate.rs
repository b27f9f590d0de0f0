use crate::models::{Macros, RecipeIngredient};

/// Element-wise sum of the ingredients' stored nutrients.
pub fn aggregate_total(ingredients: &[RecipeIngredient]) -> Macros {
    ingredients.iter().map(RecipeIngredient::macros).sum()
}

/// Divide `total` across `servings`. Non-positive servings yield zero macros.
pub fn per_serving(total: Macros, servings: i64) -> Macros {
    if servings <= 0 {
        return Macros::ZERO;
    }
    total / servings as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ingredient(name: &str, calories: f64, protein: f64, carbs: f64, fat: f64) -> RecipeIngredient {
        RecipeIngredient {
            food_item_id: name.to_lowercase(),
            food_item_name: name.to_string(),
            quantity_gram: 100.0,
            original_serving_size: "100 g".to_string(),
            calories,
            protein,
            carbs,
            fat,
        }
    }

    #[test]
    fn test_aggregate_empty_is_zero() {
        assert_eq!(aggregate_total(&[]), Macros::ZERO);
    }

    #[test]
    fn test_aggregate_sums_fields() {
        let total = aggregate_total(&[
            ingredient("Rice", 130.0, 2.7, 28.0, 0.3),
            ingredient("Beans", 120.0, 8.0, 21.0, 0.5),
        ]);
        assert!(total.approx_eq(&Macros::new(250.0, 10.7, 49.0, 0.8), 1e-9));
    }

    #[test]
    fn test_per_serving_divides() {
        let total = Macros::new(900.0, 60.0, 90.0, 30.0);
        assert_eq!(per_serving(total, 3), Macros::new(300.0, 20.0, 30.0, 10.0));
        assert_eq!(per_serving(total, 1), total);
    }

    #[test]
    fn test_per_serving_degenerate_servings() {
        let total = Macros::new(900.0, 60.0, 90.0, 30.0);
        assert_eq!(per_serving(total, 0), Macros::ZERO);
        assert_eq!(per_serving(total, -2), Macros::ZERO);
    }
}
