//! Listing query compiler.
//!
//! A [`RecipeQuery`] holds raw listing parameters exactly as received.
//! [`RecipeQuery::compile`] validates them and produces a [`QueryPlan`]: the
//! filter, the ordering, the page window and the access path (index) that
//! serves it. Adapters evaluate plans; they never see raw parameters.
//!
//! # Ordering
//!
//! - An explicit `sortBy` always wins.
//! - Without `sortBy`, a text search orders by relevance, anything else by
//!   creation time descending.
//! - Ties are broken by creation time descending, then id ascending, so
//!   every plan yields a total order.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::aggregate::Recipe;
use super::draft::RecipeContent;
use super::values::{Category, Difficulty};
use crate::domain::foundation::{UserId, ValidationError};

/// Inclusive bounds for the `minRating` threshold.
pub const MIN_RATING_BOUNDS: (f64, f64) = (0.0, 5.0);

/// Page size configuration applied while compiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingLimits {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for ListingLimits {
    fn default() -> Self {
        Self {
            default_page_size: 12,
            max_page_size: 100,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Sort keys
// ════════════════════════════════════════════════════════════════════════════

/// Fields a listing can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortField {
    CreatedAt,
    UpdatedAt,
    AverageRating,
    TotalRatings,
    Views,
    Favorites,
    Title,
    CookingTime,
    PrepTime,
}

impl SortField {
    pub const ALL: [SortField; 9] = [
        SortField::CreatedAt,
        SortField::UpdatedAt,
        SortField::AverageRating,
        SortField::TotalRatings,
        SortField::Views,
        SortField::Favorites,
        SortField::Title,
        SortField::CookingTime,
        SortField::PrepTime,
    ];

    /// Name as used in the `sortBy` parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "createdAt",
            SortField::UpdatedAt => "updatedAt",
            SortField::AverageRating => "averageRating",
            SortField::TotalRatings => "totalRatings",
            SortField::Views => "views",
            SortField::Favorites => "favorites",
            SortField::Title => "title",
            SortField::CookingTime => "cookingTime",
            SortField::PrepTime => "prepTime",
        }
    }

    fn compare(&self, a: &Recipe, b: &Recipe) -> Ordering {
        match self {
            SortField::CreatedAt => a.created_at().cmp(b.created_at()),
            SortField::UpdatedAt => a.updated_at().cmp(b.updated_at()),
            SortField::AverageRating => a.average_rating().total_cmp(&b.average_rating()),
            SortField::TotalRatings => a.total_ratings().cmp(&b.total_ratings()),
            SortField::Views => a.views().cmp(&b.views()),
            SortField::Favorites => a.favorites().cmp(&b.favorites()),
            SortField::Title => a.content().title.cmp(&b.content().title),
            SortField::CookingTime => a.content().cooking_time.cmp(&b.content().cooking_time),
            SortField::PrepTime => a.content().prep_time.cmp(&b.content().prep_time),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s.trim())
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(SortField::as_str).collect();
                ValidationError::invalid_choice("sortBy", s, &names)
            })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for SortDirection {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(ValidationError::invalid_choice("sortOrder", s, &["asc", "desc"])),
        }
    }
}

/// Primary ordering of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Text relevance, best match first.
    Relevance,
    Field(SortField, SortDirection),
}

// ════════════════════════════════════════════════════════════════════════════
// Index catalog
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    /// Inverted full-text index over the searchable fields.
    FullText,
    BTree,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexColumn {
    pub name: &'static str,
    pub descending: bool,
}

/// Declaration of an index the store must provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSpec {
    pub name: &'static str,
    pub kind: IndexKind,
    pub columns: &'static [IndexColumn],
}

const fn asc(name: &'static str) -> IndexColumn {
    IndexColumn {
        name,
        descending: false,
    }
}

const fn desc(name: &'static str) -> IndexColumn {
    IndexColumn {
        name,
        descending: true,
    }
}

pub const TEXT_INDEX: IndexSpec = IndexSpec {
    name: "recipes_search_document_idx",
    kind: IndexKind::FullText,
    columns: &[asc("search_document")],
};

pub const CATEGORY_DIFFICULTY_RATING_INDEX: IndexSpec = IndexSpec {
    name: "recipes_category_difficulty_rating_idx",
    kind: IndexKind::BTree,
    columns: &[asc("category"), asc("difficulty"), desc("average_rating")],
};

pub const AUTHOR_CREATED_AT_INDEX: IndexSpec = IndexSpec {
    name: "recipes_author_created_at_idx",
    kind: IndexKind::BTree,
    columns: &[asc("author_id"), desc("created_at")],
};

/// Every index listings rely on. Stores ensure these exist at start-up.
pub const RECIPE_INDEXES: [IndexSpec; 3] = [
    TEXT_INDEX,
    CATEGORY_DIFFICULTY_RATING_INDEX,
    AUTHOR_CREATED_AT_INDEX,
];

/// Which access path serves a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPath {
    TextIndex,
    CategoryDifficultyRating,
    AuthorCreatedAt,
    /// Visibility-filtered scan ordered by the requested key.
    Scan,
}

impl AccessPath {
    pub fn index(&self) -> Option<&'static IndexSpec> {
        match self {
            AccessPath::TextIndex => Some(&TEXT_INDEX),
            AccessPath::CategoryDifficultyRating => Some(&CATEGORY_DIFFICULTY_RATING_INDEX),
            AccessPath::AuthorCreatedAt => Some(&AUTHOR_CREATED_AT_INDEX),
            AccessPath::Scan => None,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Filter
// ════════════════════════════════════════════════════════════════════════════

/// Whose recipes a listing covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingScope {
    /// Public listing: visible recipes of any author.
    Public,
    /// One author's recipes; private ones only when the viewer is the author.
    Author { author: UserId, include_private: bool },
}

/// Normalized free-text search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSearch {
    terms: Vec<String>,
}

impl TextSearch {
    /// Returns `None` when the input holds no searchable token.
    pub fn parse(input: &str) -> Option<Self> {
        let terms = tokenize(input);
        if terms.is_empty() {
            None
        } else {
            Some(Self { terms })
        }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Number of token occurrences in the recipe's searchable fields that
    /// equal any search term. Zero means no match.
    pub fn score(&self, recipe: &Recipe) -> u32 {
        search_text(recipe.content())
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
            .filter(|token| self.terms.contains(token))
            .count() as u32
    }
}

/// Splits text into lowercase alphanumeric tokens, deduplicated in order.
pub fn tokenize(input: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for token in input
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
    {
        if !out.contains(&token) {
            out.push(token);
        }
    }
    out
}

/// Text covered by the full-text index: title, description, ingredient
/// names, tags and cuisine, in that order.
pub fn search_text(content: &RecipeContent) -> String {
    std::iter::once(content.title.as_str())
        .chain(std::iter::once(content.description.as_str()))
        .chain(content.ingredients.iter().map(|i| i.name.as_str()))
        .chain(content.tags.iter().map(String::as_str))
        .chain(std::iter::once(content.cuisine.as_str()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Conjunction of listing predicates.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeFilter {
    pub public_only: bool,
    pub author: Option<UserId>,
    pub category: Option<Category>,
    pub difficulty: Option<Difficulty>,
    /// Lowercased literal needle for a case-insensitive substring match.
    pub cuisine: Option<String>,
    pub min_rating: Option<f64>,
    pub text: Option<TextSearch>,
}

impl RecipeFilter {
    pub fn matches(&self, recipe: &Recipe) -> bool {
        if self.public_only && !recipe.is_public() {
            return false;
        }
        if let Some(author) = &self.author {
            if recipe.author() != author {
                return false;
            }
        }
        if let Some(category) = self.category {
            if recipe.content().category != category {
                return false;
            }
        }
        if let Some(difficulty) = self.difficulty {
            if recipe.content().difficulty != difficulty {
                return false;
            }
        }
        if let Some(needle) = &self.cuisine {
            if !recipe.content().cuisine.to_lowercase().contains(needle.as_str()) {
                return false;
            }
        }
        if let Some(min) = self.min_rating {
            if recipe.average_rating() < min {
                return false;
            }
        }
        if let Some(text) = &self.text {
            if text.score(recipe) == 0 {
                return false;
            }
        }
        true
    }
}

/// Offset page window, 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.limit))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Plan
// ════════════════════════════════════════════════════════════════════════════

/// A validated, store-agnostic listing plan.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub filter: RecipeFilter,
    pub sort: SortKey,
    pub page: PageRequest,
    pub access_path: AccessPath,
}

impl QueryPlan {
    /// Plan for every recipe of one author, newest first.
    pub fn for_author(author: UserId, include_private: bool, page: PageRequest) -> Self {
        Self {
            filter: RecipeFilter {
                public_only: !include_private,
                author: Some(author),
                category: None,
                difficulty: None,
                cuisine: None,
                min_rating: None,
                text: None,
            },
            sort: SortKey::Field(SortField::CreatedAt, SortDirection::Desc),
            page,
            access_path: AccessPath::AuthorCreatedAt,
        }
    }

    /// Total order over matching recipes: primary key, then creation time
    /// descending, then id ascending.
    pub fn compare(&self, a: &Recipe, b: &Recipe) -> Ordering {
        let primary = match self.sort {
            SortKey::Relevance => match &self.filter.text {
                Some(text) => text.score(b).cmp(&text.score(a)),
                None => Ordering::Equal,
            },
            SortKey::Field(field, direction) => direction.apply(field.compare(a, b)),
        };
        primary
            .then_with(|| b.created_at().cmp(a.created_at()))
            .then_with(|| a.id().cmp(b.id()))
    }
}

/// One page of listing results.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipePage {
    pub records: Vec<Recipe>,
    pub current_page: u32,
    pub total_pages: u64,
    pub total: u64,
}

impl RecipePage {
    pub fn new(records: Vec<Recipe>, page: PageRequest, total: u64) -> Self {
        Self {
            records,
            current_page: page.page,
            total_pages: page.total_pages(total),
            total,
        }
    }
}

/// Raw listing parameters.
///
/// Blank strings are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub cuisine: Option<String>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub min_rating: Option<String>,
}

impl RecipeQuery {
    /// Validates every parameter and builds the plan.
    ///
    /// # Errors
    ///
    /// Every invalid parameter, collected. An oversized `limit` is clamped
    /// to the configured maximum rather than rejected.
    pub fn compile(
        &self,
        limits: ListingLimits,
        scope: ListingScope,
    ) -> Result<QueryPlan, Vec<ValidationError>> {
        let mut errors = Vec::new();

        let page = parse_positive("page", present(&self.page), 1, &mut errors);
        let limit = parse_positive(
            "limit",
            present(&self.limit),
            limits.default_page_size,
            &mut errors,
        )
        .min(limits.max_page_size.max(1));

        let category = present(&self.category)
            .map(|raw| raw.parse::<Category>().map_err(|e| errors.push(e)).ok())
            .unwrap_or(None);
        let difficulty = present(&self.difficulty)
            .map(|raw| raw.parse::<Difficulty>().map_err(|e| errors.push(e)).ok())
            .unwrap_or(None);
        let sort_field = present(&self.sort_by)
            .map(|raw| raw.parse::<SortField>().map_err(|e| errors.push(e)).ok())
            .unwrap_or(None);
        let direction = present(&self.sort_order)
            .map(|raw| raw.parse::<SortDirection>().map_err(|e| errors.push(e)).ok())
            .unwrap_or(None)
            .unwrap_or_default();
        let min_rating = present(&self.min_rating).and_then(|raw| parse_min_rating(raw, &mut errors));

        let cuisine = present(&self.cuisine).map(|c| c.to_lowercase());
        let text = present(&self.search).and_then(TextSearch::parse);

        if !errors.is_empty() {
            return Err(errors);
        }

        let sort = match (sort_field, &text) {
            (Some(field), _) => SortKey::Field(field, direction),
            (None, Some(_)) => SortKey::Relevance,
            (None, None) => SortKey::Field(SortField::CreatedAt, direction),
        };

        let (public_only, author) = match scope {
            ListingScope::Public => (true, None),
            ListingScope::Author {
                author,
                include_private,
            } => (!include_private, Some(author)),
        };

        let access_path = if text.is_some() {
            AccessPath::TextIndex
        } else if author.is_some() {
            AccessPath::AuthorCreatedAt
        } else if category.is_some() {
            AccessPath::CategoryDifficultyRating
        } else {
            AccessPath::Scan
        };

        Ok(QueryPlan {
            filter: RecipeFilter {
                public_only,
                author,
                category,
                difficulty,
                cuisine,
                min_rating,
                text,
            },
            sort,
            page: PageRequest { page, limit },
            access_path,
        })
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_positive(
    field: &str,
    raw: Option<&str>,
    default: u32,
    errors: &mut Vec<ValidationError>,
) -> u32 {
    let Some(raw) = raw else {
        return default;
    };
    match raw.parse::<i64>() {
        Ok(v) if v >= 1 => u32::try_from(v).unwrap_or(u32::MAX),
        Ok(v) => {
            errors.push(ValidationError::out_of_range(field, 1, i64::from(u32::MAX), v));
            default
        }
        Err(_) => {
            errors.push(ValidationError::invalid_format(field, "must be an integer"));
            default
        }
    }
}

fn parse_min_rating(raw: &str, errors: &mut Vec<ValidationError>) -> Option<f64> {
    let (min, max) = MIN_RATING_BOUNDS;
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && (min..=max).contains(&v) => Some(v),
        Ok(_) => {
            errors.push(ValidationError::invalid_format(
                "minRating",
                format!("must be between {} and {}", min, max),
            ));
            None
        }
        Err(_) => {
            errors.push(ValidationError::invalid_format("minRating", "must be a number"));
            None
        }
    }
}
