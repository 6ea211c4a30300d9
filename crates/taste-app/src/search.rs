//! Home-screen search filter.

use taste_store::Dish;

/// Filter a dish list the way the home grid does: case-insensitive substring
/// match against the name, cuisine, and meal-type fields.  A blank query
/// matches everything.
pub fn filter_dishes(dishes: &[Dish], query: &str) -> Vec<Dish> {
    let term = query.trim().to_lowercase();
    if term.is_empty() {
        return dishes.to_vec();
    }

    dishes
        .iter()
        .filter(|d| {
            d.dish_name.to_lowercase().contains(&term)
                || d.cuisine
                    .as_deref()
                    .is_some_and(|c| c.to_lowercase().contains(&term))
                || d.meal_type
                    .as_deref()
                    .is_some_and(|m| m.to_lowercase().contains(&term))
        })
        .cloned()
        .collect()
}
