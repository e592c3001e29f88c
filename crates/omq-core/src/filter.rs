//! Diner-facing menu filtering
//!
//! A diner picks allergens to avoid and a menu section; the view keeps the
//! dishes whose allergen tokens don't match any excluded term and whose type
//! is the selected section. Matching is exact token equality after trimming
//! and lower-casing: "Tree nuts" does not exclude a dish listing "Hazelnuts".

use crate::dish::{Dish, DishType};

/// Allergen chips offered before any custom entry
pub const DEFAULT_ALLERGENS: &[&str] = &[
    "Wheat",
    "Rye",
    "Barley",
    "Oats",
    "Spelt",
    "Fish",
    "Seafood",
    "Peanuts",
    "Soy",
    "Cow's milk",
    "Almonds",
    "Hazelnuts",
    "Tree nuts",
];

/// Terms the diner wants to avoid, in the order they were chosen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllergenExclusions {
    terms: Vec<String>,
}

impl AllergenExclusions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the term if absent, remove it if present
    pub fn toggle(&mut self, term: &str) {
        if let Some(pos) = self.terms.iter().position(|t| t == term) {
            self.terms.remove(pos);
        } else {
            self.terms.push(term.to_string());
        }
    }

    /// Add a typed-in term verbatim. Returns false for blanks and repeats.
    pub fn add_custom(&mut self, term: &str) -> bool {
        if term.is_empty() || self.contains(term) {
            return false;
        }
        self.terms.push(term.to_string());
        true
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.iter().any(|t| t == term)
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }

    /// Whether any of the dish's allergen tokens is excluded
    pub fn excludes(&self, dish: &Dish) -> bool {
        if self.terms.is_empty() {
            return false;
        }
        let tokens = allergen_tokens(&dish.allergens);
        self.terms
            .iter()
            .any(|term| tokens.contains(&term.to_lowercase()))
    }
}

impl<S: AsRef<str>> FromIterator<S> for AllergenExclusions {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut exclusions = Self::new();
        for term in iter {
            exclusions.add_custom(term.as_ref());
        }
        exclusions
    }
}

/// Lower-cased, trimmed comma-separated tokens; blanks never match
pub fn allergen_tokens(allergens: &str) -> Vec<String> {
    allergens
        .split(',')
        .map(|a| a.trim().to_lowercase())
        .filter(|a| !a.is_empty())
        .collect()
}

/// Dishes not excluded by any allergen term, original order kept
pub fn without_allergens<'a>(dishes: &'a [Dish], exclusions: &AllergenExclusions) -> Vec<&'a Dish> {
    dishes.iter().filter(|d| !exclusions.excludes(d)).collect()
}

/// Dishes of one menu section, original order kept
pub fn of_type<'a>(dishes: &[&'a Dish], dish_type: DishType) -> Vec<&'a Dish> {
    dishes
        .iter()
        .copied()
        .filter(|d| d.dish_type == dish_type)
        .collect()
}

/// State of one diner's visit to a restaurant menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuView {
    pub exclusions: AllergenExclusions,
    pub selected_type: DishType,
    favorites: Vec<String>,
}

impl Default for MenuView {
    fn default() -> Self {
        Self {
            exclusions: AllergenExclusions::new(),
            selected_type: DishType::MainCourse,
            favorites: Vec::new(),
        }
    }
}

impl MenuView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch the visible menu section
    pub fn select_type(&mut self, dish_type: DishType) {
        self.selected_type = dish_type;
    }

    /// Dishes the diner can see in the selected section
    pub fn visible<'a>(&self, dishes: &'a [Dish]) -> Vec<&'a Dish> {
        let safe = without_allergens(dishes, &self.exclusions);
        of_type(&safe, self.selected_type)
    }

    /// Safe dishes counted per section, in tab order
    pub fn counts_by_type(&self, dishes: &[Dish]) -> Vec<(DishType, usize)> {
        let safe = without_allergens(dishes, &self.exclusions);
        DishType::all()
            .iter()
            .map(|t| (*t, safe.iter().filter(|d| d.dish_type == *t).count()))
            .collect()
    }

    /// Mark or unmark a dish as a favorite for this visit
    pub fn toggle_favorite(&mut self, dish_id: &str) {
        if let Some(pos) = self.favorites.iter().position(|id| id == dish_id) {
            self.favorites.remove(pos);
        } else {
            self.favorites.push(dish_id.to_string());
        }
    }

    pub fn is_favorite(&self, dish_id: &str) -> bool {
        self.favorites.iter().any(|id| id == dish_id)
    }

    pub fn favorites(&self) -> &[String] {
        &self.favorites
    }
}
