//! Owner-side dish table: sorting and row selection

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::dish::Dish;

/// Sortable table column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Name,
    Type,
    Price,
    Quantity,
    CreatedAt,
}

impl SortColumn {
    pub fn all() -> &'static [SortColumn] {
        &[
            SortColumn::Name,
            SortColumn::Type,
            SortColumn::Price,
            SortColumn::Quantity,
            SortColumn::CreatedAt,
        ]
    }

    pub fn header(&self) -> &'static str {
        match self {
            SortColumn::Name => "Name",
            SortColumn::Type => "Type",
            SortColumn::Price => "Price",
            SortColumn::Quantity => "Quantity",
            SortColumn::CreatedAt => "Created At",
        }
    }

    fn compare(&self, a: &Dish, b: &Dish) -> Ordering {
        match self {
            SortColumn::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortColumn::Type => a.dish_type.cmp(&b.dish_type),
            SortColumn::Price => compare_prices(&a.price, &b.price),
            SortColumn::Quantity => a.quantity.cmp(&b.quantity),
            SortColumn::CreatedAt => a.created_at.cmp(&b.created_at),
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.header())
    }
}

impl FromStr for SortColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "name" => Ok(SortColumn::Name),
            "type" => Ok(SortColumn::Type),
            "price" => Ok(SortColumn::Price),
            "quantity" => Ok(SortColumn::Quantity),
            "createdat" | "created" => Ok(SortColumn::CreatedAt),
            _ => Err(format!("unknown column: {}", s)),
        }
    }
}

/// Prices are free text. Numeric prices come first in value order,
/// then the rest as text; ties on value fall back to text.
fn compare_prices(a: &str, b: &str) -> Ordering {
    match (leading_number(a), leading_number(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

fn leading_number(price: &str) -> Option<f64> {
    let digits: String = price
        .trim()
        .trim_start_matches(|c: char| !c.is_ascii_digit())
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    digits.parse().ok()
}

/// Column plus direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sorting {
    pub column: SortColumn,
    pub descending: bool,
}

impl Sorting {
    pub fn ascending(column: SortColumn) -> Self {
        Self {
            column,
            descending: false,
        }
    }

    pub fn descending(column: SortColumn) -> Self {
        Self {
            column,
            descending: true,
        }
    }

    /// Stable sort of borrowed rows
    pub fn apply<'a>(&self, dishes: &'a [Dish]) -> Vec<&'a Dish> {
        let mut rows: Vec<&Dish> = dishes.iter().collect();
        rows.sort_by(|a, b| {
            let ord = self.column.compare(a, b);
            if self.descending {
                ord.reverse()
            } else {
                ord
            }
        });
        rows
    }
}

/// Checked rows, fed to bulk delete
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, id: &str) {
        if let Some(pos) = self.ids.iter().position(|s| s == id) {
            self.ids.remove(pos);
        } else {
            self.ids.push(id.to_string());
        }
    }

    /// Header checkbox: select every row, or clear if all are already selected
    pub fn toggle_all(&mut self, dishes: &[Dish]) {
        if self.all_selected(dishes) {
            self.clear();
        } else {
            self.ids = dishes.iter().map(|d| d.id.clone()).collect();
        }
    }

    pub fn all_selected(&self, dishes: &[Dish]) -> bool {
        !dishes.is_empty() && dishes.iter().all(|d| self.is_selected(&d.id))
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.ids.iter().any(|s| s == id)
    }

    /// Drop ids no longer present in the table
    pub fn retain_existing(&mut self, dishes: &[Dish]) {
        self.ids.retain(|id| dishes.iter().any(|d| &d.id == id));
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Tooltip for the duplicate button
pub fn duplicate_hint(at_limit: bool) -> &'static str {
    if at_limit {
        "Upgrade your plan to add more dishes"
    } else {
        "Duplicate dish"
    }
}
