use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::auth::dto::AuthorResponse;
use crate::error::ApiError;
use crate::recipes::repo::{Difficulty, Recipe, RecipeWithAuthor};

/// Request body for creating a recipe.
#[derive(Debug, Deserialize)]
pub struct RecipeCreate {
    pub title: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub time_minutes: i32,
    pub difficulty: Difficulty,
    pub image_url: Option<String>,
}

fn validate_title(title: &str) -> Result<(), ApiError> {
    let len = title.chars().count();
    if !(3..=120).contains(&len) {
        return Err(ApiError::validation("Title must be 3-120 characters"));
    }
    Ok(())
}

fn validate_tags(tags: &[String]) -> Result<(), ApiError> {
    if tags.len() > 10 {
        return Err(ApiError::validation("At most 10 tags allowed"));
    }
    Ok(())
}

fn validate_image_url(url: &str) -> Result<(), ApiError> {
    if url.chars().count() > 500 {
        return Err(ApiError::validation("Image URL must be at most 500 characters"));
    }
    Ok(())
}

impl RecipeCreate {
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_title(&self.title)?;
        if self.description.is_empty() {
            return Err(ApiError::validation("Description must not be empty"));
        }
        if self.ingredients.is_empty() {
            return Err(ApiError::validation("At least one ingredient is required"));
        }
        if self.steps.is_empty() {
            return Err(ApiError::validation("At least one step is required"));
        }
        validate_tags(&self.tags)?;
        if self.time_minutes < 1 {
            return Err(ApiError::validation("time_minutes must be at least 1"));
        }
        if let Some(url) = &self.image_url {
            validate_image_url(url)?;
        }
        Ok(())
    }
}

/// Request body for partially updating a recipe; absent fields stay
/// untouched.
#[derive(Debug, Default, Deserialize)]
pub struct RecipeUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub ingredients: Option<Vec<String>>,
    pub steps: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub time_minutes: Option<i32>,
    pub difficulty: Option<Difficulty>,
    pub image_url: Option<String>,
}

impl RecipeUpdate {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(description) = &self.description {
            if description.is_empty() {
                return Err(ApiError::validation("Description must not be empty"));
            }
        }
        if let Some(ingredients) = &self.ingredients {
            if ingredients.is_empty() {
                return Err(ApiError::validation("At least one ingredient is required"));
            }
        }
        if let Some(steps) = &self.steps {
            if steps.is_empty() {
                return Err(ApiError::validation("At least one step is required"));
            }
        }
        if let Some(tags) = &self.tags {
            validate_tags(tags)?;
        }
        if let Some(minutes) = self.time_minutes {
            if minutes < 1 {
                return Err(ApiError::validation("time_minutes must be at least 1"));
            }
        }
        if let Some(url) = &self.image_url {
            validate_image_url(url)?;
        }
        Ok(())
    }
}

/// Query parameters for the recipe listing.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub tag: Option<String>,
    pub difficulty: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}

impl ListParams {
    /// Bounds-check pagination and resolve the difficulty string; rejects
    /// before any service call.
    pub fn parsed_difficulty(&self) -> Result<Option<Difficulty>, ApiError> {
        match &self.difficulty {
            None => Ok(None),
            Some(raw) => Difficulty::parse(raw)
                .map(Some)
                .ok_or_else(|| ApiError::validation("Difficulty must be easy, medium, or hard")),
        }
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if !(1..=100).contains(&self.limit) {
            return Err(ApiError::validation("limit must be between 1 and 100"));
        }
        if self.offset < 0 {
            return Err(ApiError::validation("offset must not be negative"));
        }
        Ok(())
    }
}

/// Recipe as returned to clients.
#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub tags: Vec<String>,
    pub time_minutes: i32,
    pub difficulty: Difficulty,
    pub image_url: Option<String>,
    pub author_id: i32,
    pub author: Option<AuthorResponse>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_saved: Option<bool>,
}

impl RecipeResponse {
    pub fn from_recipe(recipe: Recipe, author: Option<AuthorResponse>) -> Self {
        Self {
            id: recipe.id,
            title: recipe.title,
            description: recipe.description,
            ingredients: recipe.ingredients.0,
            steps: recipe.steps.0,
            tags: recipe.tags.0,
            time_minutes: recipe.time_minutes,
            difficulty: recipe.difficulty,
            image_url: recipe.image_url,
            author_id: recipe.author_id,
            author,
            created_at: recipe.created_at,
            updated_at: recipe.updated_at,
            is_saved: None,
        }
    }

    pub fn with_saved(mut self, is_saved: bool) -> Self {
        self.is_saved = Some(is_saved);
        self
    }
}

impl From<RecipeWithAuthor> for RecipeResponse {
    fn from(row: RecipeWithAuthor) -> Self {
        let author = AuthorResponse {
            id: row.recipe.author_id,
            username: row.author_username,
        };
        Self::from_recipe(row.recipe, Some(author))
    }
}

/// Paginated recipe listing.
#[derive(Debug, Serialize)]
pub struct RecipesResponse {
    pub recipes: Vec<RecipeResponse>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_create() -> RecipeCreate {
        RecipeCreate {
            title: "Easy Pasta".into(),
            description: "Quick pasta recipe".into(),
            ingredients: vec!["pasta".into(), "sauce".into()],
            steps: vec!["cook pasta".into(), "add sauce".into()],
            tags: vec!["pasta".into(), "easy".into()],
            time_minutes: 20,
            difficulty: Difficulty::Easy,
            image_url: None,
        }
    }

    #[test]
    fn create_accepts_reasonable_recipe() {
        assert!(minimal_create().validate().is_ok());
    }

    #[test]
    fn create_rejects_bad_bounds() {
        let mut r = minimal_create();
        r.title = "ab".into();
        assert!(r.validate().is_err());

        let mut r = minimal_create();
        r.ingredients.clear();
        assert!(r.validate().is_err());

        let mut r = minimal_create();
        r.steps.clear();
        assert!(r.validate().is_err());

        let mut r = minimal_create();
        r.tags = (0..11).map(|i| format!("tag{i}")).collect();
        assert!(r.validate().is_err());

        let mut r = minimal_create();
        r.time_minutes = 0;
        assert!(r.validate().is_err());

        let mut r = minimal_create();
        r.image_url = Some("x".repeat(501));
        assert!(r.validate().is_err());
    }

    #[test]
    fn update_with_no_fields_is_valid() {
        assert!(RecipeUpdate::default().validate().is_ok());
    }

    #[test]
    fn update_checks_present_fields_only() {
        let patch = RecipeUpdate {
            time_minutes: Some(0),
            ..Default::default()
        };
        assert!(patch.validate().is_err());

        let patch = RecipeUpdate {
            title: Some("New Title".into()),
            ..Default::default()
        };
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn absent_update_fields_deserialize_to_none() {
        let patch: RecipeUpdate = serde_json::from_str(r#"{"title": "Renamed"}"#).unwrap();
        assert_eq!(patch.title.as_deref(), Some("Renamed"));
        assert!(patch.description.is_none());
        assert!(patch.difficulty.is_none());
    }

    #[test]
    fn list_params_bounds() {
        let params: ListParams = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(params.limit, 20);
        assert_eq!(params.offset, 0);
        assert!(params.validate().is_ok());

        let params: ListParams = serde_json::from_str(r#"{"limit": 0}"#).unwrap();
        assert!(params.validate().is_err());

        let params: ListParams = serde_json::from_str(r#"{"limit": 101}"#).unwrap();
        assert!(params.validate().is_err());

        let params: ListParams = serde_json::from_str(r#"{"offset": -1}"#).unwrap();
        assert!(params.validate().is_err());
    }

    #[test]
    fn list_params_difficulty_parse() {
        let params: ListParams = serde_json::from_str(r#"{"difficulty": "hard"}"#).unwrap();
        assert_eq!(params.parsed_difficulty().unwrap(), Some(Difficulty::Hard));

        let params: ListParams = serde_json::from_str(r#"{"difficulty": "extreme"}"#).unwrap();
        assert!(params.parsed_difficulty().is_err());
    }
}
