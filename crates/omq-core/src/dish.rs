//! Dish entity model and the add-dish form

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::images;
use crate::validation::{require, FieldErrors, ImageUpload, ValidationError};

/// Menu section a dish belongs to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DishType {
    Starter,
    #[default]
    #[serde(rename = "Main Course")]
    MainCourse,
    Dessert,
    Drinks,
    #[serde(rename = "To Share")]
    ToShare,
    Side,
}

impl DishType {
    /// All types in menu tab order
    pub fn all() -> &'static [DishType] {
        &[
            DishType::Starter,
            DishType::MainCourse,
            DishType::Dessert,
            DishType::Drinks,
            DishType::ToShare,
            DishType::Side,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            DishType::Starter => "Starter",
            DishType::MainCourse => "Main Course",
            DishType::Dessert => "Dessert",
            DishType::Drinks => "Drinks",
            DishType::ToShare => "To Share",
            DishType::Side => "Side",
        }
    }
}

impl fmt::Display for DishType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for DishType {
    type Err = String;

    /// Accepts the label in any case, with spaces, dashes or underscores
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_label(s);
        DishType::all()
            .iter()
            .copied()
            .find(|t| normalize_label(t.label()) == wanted)
            .ok_or_else(|| format!("unknown dish type: {}", s))
    }
}

/// Portion size
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Quantity {
    Light,
    #[default]
    Normal,
    #[serde(rename = "Well-served")]
    WellServed,
}

impl Quantity {
    pub fn all() -> &'static [Quantity] {
        &[Quantity::Light, Quantity::Normal, Quantity::WellServed]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Quantity::Light => "Light",
            Quantity::Normal => "Normal",
            Quantity::WellServed => "Well-served",
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for Quantity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_label(s);
        Quantity::all()
            .iter()
            .copied()
            .find(|q| normalize_label(q.label()) == wanted)
            .ok_or_else(|| format!("unknown quantity: {}", s))
    }
}

fn normalize_label(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Everything about a dish the owner chooses; id and timestamp are assigned by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DishFields {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub dish_type: DishType,
    pub ingredients: String,
    /// Comma-separated free text
    pub allergens: String,
    /// Free text, shown as entered
    pub price: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub quantity: Quantity,
}

/// A single menu item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dish {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub dish_type: DishType,
    pub ingredients: String,
    pub allergens: String,
    pub price: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub quantity: Quantity,
    pub created_at: DateTime<Utc>,
}

impl Dish {
    /// Stamp fresh fields with a new id and the current time
    pub fn create(fields: DishFields) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: fields.name,
            description: fields.description,
            dish_type: fields.dish_type,
            ingredients: fields.ingredients,
            allergens: fields.allergens,
            price: fields.price,
            image: fields.image,
            quantity: fields.quantity,
            created_at: Utc::now(),
        }
    }

    /// Owner-chosen fields of this dish
    pub fn fields(&self) -> DishFields {
        DishFields {
            name: self.name.clone(),
            description: self.description.clone(),
            dish_type: self.dish_type,
            ingredients: self.ingredients.clone(),
            allergens: self.allergens.clone(),
            price: self.price.clone(),
            image: self.image.clone(),
            quantity: self.quantity,
        }
    }

    /// New dish with the same fields and " (Copy)" appended to the name
    pub fn duplicate(&self) -> Self {
        let mut fields = self.fields();
        fields.name = format!("{} (Copy)", self.name);
        Self::create(fields)
    }

    /// Allergens as displayed: split on commas, trimmed, blanks dropped
    pub fn allergen_list(&self) -> Vec<&str> {
        self.allergens
            .split(',')
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .collect()
    }
}

/// The add-dish form as typed by the owner
#[derive(Debug, Clone, Default)]
pub struct DishDraft {
    pub name: String,
    pub description: String,
    pub dish_type: DishType,
    pub ingredients: String,
    pub allergens: String,
    pub price: String,
    pub image: Option<ImageUpload>,
    pub quantity: Quantity,
}

impl DishDraft {
    /// Check required fields and the optional photo
    pub fn validate(&self) -> Result<DishFields, ValidationError> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "name", &self.name, "Dish name is required");
        require(&mut errors, "description", &self.description, "Description is required");
        require(&mut errors, "ingredients", &self.ingredients, "Ingredients are required");
        require(
            &mut errors,
            "allergens",
            &self.allergens,
            "Allergens information is required",
        );
        require(&mut errors, "price", &self.price, "Price is required");
        if let Some(image) = &self.image {
            image.check(
                &mut errors,
                "image",
                images::DISH_IMAGE_TYPES,
                "Only .png and .jpeg formats are supported.",
            );
        }
        errors.into_result()?;

        Ok(DishFields {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            dish_type: self.dish_type,
            ingredients: self.ingredients.trim().to_string(),
            allergens: self.allergens.trim().to_string(),
            price: self.price.trim().to_string(),
            image: self.image.as_ref().map(|i| i.path.clone()),
            quantity: self.quantity,
        })
    }
}
