//! Value objects owned by a recipe: enumerations, ingredient and
//! instruction entries, tags.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Maximum length for a recipe title.
pub const MAX_TITLE_LENGTH: usize = 100;

/// Maximum length for a recipe description.
pub const MAX_DESCRIPTION_LENGTH: usize = 500;

/// How demanding a recipe is to prepare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(Difficulty::as_str).collect()
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s.trim())
            .ok_or_else(|| ValidationError::invalid_choice("difficulty", s, &Self::names()))
    }
}

/// Closed set of recipe categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Breakfast,
    Lunch,
    Dinner,
    Dessert,
    Snack,
    Appetizer,
    Beverage,
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Breakfast,
        Category::Lunch,
        Category::Dinner,
        Category::Dessert,
        Category::Snack,
        Category::Appetizer,
        Category::Beverage,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Breakfast => "Breakfast",
            Category::Lunch => "Lunch",
            Category::Dinner => "Dinner",
            Category::Dessert => "Dessert",
            Category::Snack => "Snack",
            Category::Appetizer => "Appetizer",
            Category::Beverage => "Beverage",
            Category::Other => "Other",
        }
    }

    fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(Category::as_str).collect()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s.trim())
            .ok_or_else(|| ValidationError::invalid_choice("category", s, &Self::names()))
    }
}

/// One line of the ingredient list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub amount: String,
    pub unit: String,
}

impl Ingredient {
    /// Trims every component and rejects blank ones.
    pub fn new(
        name: impl AsRef<str>,
        amount: impl AsRef<str>,
        unit: impl AsRef<str>,
    ) -> Result<Self, Vec<ValidationError>> {
        let mut errors = Vec::new();
        let name = required_text("name", name.as_ref(), &mut errors);
        let amount = required_text("amount", amount.as_ref(), &mut errors);
        let unit = required_text("unit", unit.as_ref(), &mut errors);

        if errors.is_empty() {
            Ok(Self { name, amount, unit })
        } else {
            Err(errors)
        }
    }
}

/// One numbered preparation step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub step: u32,
    pub description: String,
}

impl Instruction {
    pub fn new(step: i64, description: impl AsRef<str>) -> Result<Self, Vec<ValidationError>> {
        let mut errors = Vec::new();
        if step < 1 || step > i64::from(u32::MAX) {
            errors.push(ValidationError::out_of_range("step", 1, i64::from(u32::MAX), step));
        }
        let description = required_text("description", description.as_ref(), &mut errors);

        if errors.is_empty() {
            Ok(Self {
                step: step as u32,
                description,
            })
        } else {
            Err(errors)
        }
    }
}

/// Normalizes free-form tags: trimmed, lowercased, blanks dropped,
/// duplicates removed keeping the first occurrence.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim().to_lowercase();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

fn required_text(field: &str, value: &str, errors: &mut Vec<ValidationError>) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(ValidationError::empty_field(field));
    }
    trimmed.to_string()
}
