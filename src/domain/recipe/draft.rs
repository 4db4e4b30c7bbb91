//! Unvalidated recipe input (create drafts and update patches) and the
//! validated content they produce.
//!
//! Validation never stops at the first problem: every violated field
//! constraint is collected and returned together.

use serde::{Deserialize, Serialize};

use super::values::{
    normalize_tags, Category, Difficulty, Ingredient, Instruction, MAX_DESCRIPTION_LENGTH,
    MAX_TITLE_LENGTH,
};
use crate::domain::foundation::ValidationError;

/// Upper bound for minute/servings counters (fits a Postgres INTEGER).
pub const MAX_COUNT: i64 = i32::MAX as i64;

/// Raw ingredient line as submitted by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IngredientInput {
    pub name: String,
    pub amount: String,
    pub unit: String,
}

/// Raw instruction step as submitted by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InstructionInput {
    pub step: i64,
    pub description: String,
}

/// Validated, client-owned recipe content.
///
/// Derived fields (rating aggregate, total time) and counters are not part
/// of this type, so nothing built from client input can set them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeContent {
    pub title: String,
    pub description: String,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<Instruction>,
    pub cooking_time: u32,
    pub prep_time: u32,
    pub servings: u32,
    pub difficulty: Difficulty,
    pub category: Category,
    pub cuisine: String,
    pub tags: Vec<String>,
    pub image: Option<String>,
    pub is_public: bool,
}

/// Full field set for creating a recipe. Missing required fields are
/// reported as violations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub ingredients: Option<Vec<IngredientInput>>,
    pub instructions: Option<Vec<InstructionInput>>,
    pub cooking_time: Option<i64>,
    pub prep_time: Option<i64>,
    pub servings: Option<i64>,
    pub difficulty: Option<String>,
    pub category: Option<String>,
    pub cuisine: Option<String>,
    pub tags: Option<Vec<String>>,
    pub image: Option<String>,
    pub is_public: Option<bool>,
}

impl RecipeDraft {
    /// Validates every field and returns the content or all violations.
    pub fn validate(self) -> Result<RecipeContent, Vec<ValidationError>> {
        let mut errors = Vec::new();

        let title = bounded_text("title", self.title, MAX_TITLE_LENGTH, &mut errors);
        let description = bounded_text(
            "description",
            self.description,
            MAX_DESCRIPTION_LENGTH,
            &mut errors,
        );
        let ingredients = validate_ingredients(self.ingredients, &mut errors);
        let instructions = validate_instructions(self.instructions, &mut errors);
        let cooking_time = positive_count("cookingTime", self.cooking_time, &mut errors);
        let prep_time = positive_count("prepTime", self.prep_time, &mut errors);
        let servings = positive_count("servings", self.servings, &mut errors);

        let difficulty = match self.difficulty {
            None => Some(Difficulty::default()),
            Some(raw) => raw.parse::<Difficulty>().map_err(|e| errors.push(e)).ok(),
        };
        let category = match self.category {
            None => {
                errors.push(ValidationError::empty_field("category"));
                None
            }
            Some(raw) => raw.parse::<Category>().map_err(|e| errors.push(e)).ok(),
        };
        let cuisine = bounded_text("cuisine", self.cuisine, usize::MAX, &mut errors);

        let tags = normalize_tags(self.tags.unwrap_or_default());
        let image = self
            .image
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        if !errors.is_empty() {
            return Err(errors);
        }

        // All fields are Some once no errors were recorded.
        match (difficulty, category) {
            (Some(difficulty), Some(category)) => Ok(RecipeContent {
                title,
                description,
                ingredients,
                instructions,
                cooking_time,
                prep_time,
                servings,
                difficulty,
                category,
                cuisine,
                tags,
                image,
                is_public: self.is_public.unwrap_or(true),
            }),
            _ => Err(errors),
        }
    }
}

/// Partial field set for updating a recipe. Absent fields keep their
/// current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub ingredients: Option<Vec<IngredientInput>>,
    pub instructions: Option<Vec<InstructionInput>>,
    pub cooking_time: Option<i64>,
    pub prep_time: Option<i64>,
    pub servings: Option<i64>,
    pub difficulty: Option<String>,
    pub category: Option<String>,
    pub cuisine: Option<String>,
    pub tags: Option<Vec<String>>,
    pub image: Option<String>,
    pub is_public: Option<bool>,
}

impl RecipePatch {
    /// True when the patch touches no field.
    pub fn is_empty(&self) -> bool {
        *self == RecipePatch::default()
    }

    /// Merges this patch over existing content field by field, yielding a
    /// full draft ready for validation.
    pub fn overlay(self, current: &RecipeContent) -> RecipeDraft {
        let base = RecipeDraft::from(current);
        RecipeDraft {
            title: self.title.or(base.title),
            description: self.description.or(base.description),
            ingredients: self.ingredients.or(base.ingredients),
            instructions: self.instructions.or(base.instructions),
            cooking_time: self.cooking_time.or(base.cooking_time),
            prep_time: self.prep_time.or(base.prep_time),
            servings: self.servings.or(base.servings),
            difficulty: self.difficulty.or(base.difficulty),
            category: self.category.or(base.category),
            cuisine: self.cuisine.or(base.cuisine),
            tags: self.tags.or(base.tags),
            image: self.image.or(base.image),
            is_public: self.is_public.or(base.is_public),
        }
    }
}

impl From<&RecipeContent> for RecipeDraft {
    fn from(content: &RecipeContent) -> Self {
        Self {
            title: Some(content.title.clone()),
            description: Some(content.description.clone()),
            ingredients: Some(
                content
                    .ingredients
                    .iter()
                    .map(|i| IngredientInput {
                        name: i.name.clone(),
                        amount: i.amount.clone(),
                        unit: i.unit.clone(),
                    })
                    .collect(),
            ),
            instructions: Some(
                content
                    .instructions
                    .iter()
                    .map(|i| InstructionInput {
                        step: i64::from(i.step),
                        description: i.description.clone(),
                    })
                    .collect(),
            ),
            cooking_time: Some(i64::from(content.cooking_time)),
            prep_time: Some(i64::from(content.prep_time)),
            servings: Some(i64::from(content.servings)),
            difficulty: Some(content.difficulty.as_str().to_string()),
            category: Some(content.category.as_str().to_string()),
            cuisine: Some(content.cuisine.clone()),
            tags: Some(content.tags.clone()),
            image: content.image.clone(),
            is_public: Some(content.is_public),
        }
    }
}

fn bounded_text(
    field: &str,
    value: Option<String>,
    max: usize,
    errors: &mut Vec<ValidationError>,
) -> String {
    let value = value.map(|v| v.trim().to_string()).unwrap_or_default();
    let length = value.chars().count();
    if length == 0 {
        errors.push(ValidationError::empty_field(field));
    } else if length > max {
        errors.push(ValidationError::too_long(field, max, length));
    }
    value
}

fn positive_count(field: &str, value: Option<i64>, errors: &mut Vec<ValidationError>) -> u32 {
    match value {
        None => {
            errors.push(ValidationError::empty_field(field));
            0
        }
        Some(v) if !(1..=MAX_COUNT).contains(&v) => {
            errors.push(ValidationError::out_of_range(field, 1, MAX_COUNT, v));
            0
        }
        Some(v) => v as u32,
    }
}

fn validate_ingredients(
    input: Option<Vec<IngredientInput>>,
    errors: &mut Vec<ValidationError>,
) -> Vec<Ingredient> {
    let input = input.unwrap_or_default();
    if input.is_empty() {
        errors.push(ValidationError::invalid_format(
            "ingredients",
            "at least one ingredient is required",
        ));
        return Vec::new();
    }

    let mut out = Vec::with_capacity(input.len());
    for (index, raw) in input.into_iter().enumerate() {
        match Ingredient::new(&raw.name, &raw.amount, &raw.unit) {
            Ok(ingredient) => out.push(ingredient),
            Err(errs) => {
                let prefix = format!("ingredients[{}]", index);
                errors.extend(errs.into_iter().map(|e| e.nested(&prefix)));
            }
        }
    }
    out
}

fn validate_instructions(
    input: Option<Vec<InstructionInput>>,
    errors: &mut Vec<ValidationError>,
) -> Vec<Instruction> {
    let input = input.unwrap_or_default();
    if input.is_empty() {
        errors.push(ValidationError::invalid_format(
            "instructions",
            "at least one instruction is required",
        ));
        return Vec::new();
    }

    let mut out = Vec::with_capacity(input.len());
    for (index, raw) in input.into_iter().enumerate() {
        match Instruction::new(raw.step, &raw.description) {
            Ok(instruction) => out.push(instruction),
            Err(errs) => {
                let prefix = format!("instructions[{}]", index);
                errors.extend(errs.into_iter().map(|e| e.nested(&prefix)));
            }
        }
    }
    out
}
