use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

/// Recipe difficulty levels, stored as a Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "difficulty", rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// Recipe record in the database. Ingredient, step and tag lists live in
/// JSONB columns.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Recipe {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub ingredients: Json<Vec<String>>,
    pub steps: Json<Vec<String>>,
    pub tags: Json<Vec<String>>,
    pub time_minutes: i32,
    pub difficulty: Difficulty,
    pub image_url: Option<String>,
    pub author_id: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
}

/// Recipe joined with its author's username for response shaping.
#[derive(Debug, FromRow)]
pub struct RecipeWithAuthor {
    #[sqlx(flatten)]
    pub recipe: Recipe,
    pub author_username: String,
}

/// Column list shared by every recipe query.
const RECIPE_COLS: &str = "r.id, r.title, r.description, r.ingredients, r.steps, r.tags, \
     r.time_minutes, r.difficulty, r.image_url, r.author_id, r.created_at, r.updated_at";

/// Filters applied to the recipe listing. `None` fields match everything.
#[derive(Debug, Default)]
pub struct RecipeFilter {
    pub search: Option<String>,
    pub tag: Option<String>,
    pub difficulty: Option<Difficulty>,
}

const FILTER_WHERE: &str = "($1::text IS NULL \
         OR r.title ILIKE '%' || $1 || '%' \
         OR r.description ILIKE '%' || $1 || '%') \
     AND ($2::text IS NULL OR r.tags ? $2) \
     AND ($3::text IS NULL OR r.difficulty::text = $3)";

impl Recipe {
    pub async fn insert(
        db: &PgPool,
        title: &str,
        description: &str,
        ingredients: &[String],
        steps: &[String],
        tags: &[String],
        time_minutes: i32,
        difficulty: Difficulty,
        image_url: Option<&str>,
        author_id: i32,
    ) -> anyhow::Result<Recipe> {
        let recipe = sqlx::query_as::<_, Recipe>(
            r#"
            INSERT INTO recipes
                (title, description, ingredients, steps, tags, time_minutes,
                 difficulty, image_url, author_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, title, description, ingredients, steps, tags,
                      time_minutes, difficulty, image_url, author_id,
                      created_at, updated_at
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(Json(ingredients.to_vec()))
        .bind(Json(steps.to_vec()))
        .bind(Json(tags.to_vec()))
        .bind(time_minutes)
        .bind(difficulty)
        .bind(image_url)
        .bind(author_id)
        .fetch_one(db)
        .await?;
        Ok(recipe)
    }

    pub async fn find_by_id(db: &PgPool, id: i32) -> anyhow::Result<Option<RecipeWithAuthor>> {
        let row = sqlx::query_as::<_, RecipeWithAuthor>(&format!(
            r#"
            SELECT {RECIPE_COLS}, u.username AS author_username
            FROM recipes r
            JOIN users u ON u.id = r.author_id
            WHERE r.id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    /// Filtered, newest-first page of recipes.
    pub async fn list(
        db: &PgPool,
        filter: &RecipeFilter,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<RecipeWithAuthor>> {
        let rows = sqlx::query_as::<_, RecipeWithAuthor>(&format!(
            r#"
            SELECT {RECIPE_COLS}, u.username AS author_username
            FROM recipes r
            JOIN users u ON u.id = r.author_id
            WHERE {FILTER_WHERE}
            ORDER BY r.created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        ))
        .bind(&filter.search)
        .bind(&filter.tag)
        .bind(filter.difficulty.map(|d| d.as_str()))
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Size of the filtered set before pagination.
    pub async fn count(db: &PgPool, filter: &RecipeFilter) -> anyhow::Result<i64> {
        let total = sqlx::query_scalar::<_, i64>(&format!(
            r#"
            SELECT COUNT(*) FROM recipes r WHERE {FILTER_WHERE}
            "#,
        ))
        .bind(&filter.search)
        .bind(&filter.tag)
        .bind(filter.difficulty.map(|d| d.as_str()))
        .fetch_one(db)
        .await?;
        Ok(total)
    }

    /// Partial update: NULL bindings leave the column untouched, and
    /// `updated_at` is refreshed on every call.
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        db: &PgPool,
        id: i32,
        title: Option<&str>,
        description: Option<&str>,
        ingredients: Option<&[String]>,
        steps: Option<&[String]>,
        tags: Option<&[String]>,
        time_minutes: Option<i32>,
        difficulty: Option<Difficulty>,
        image_url: Option<&str>,
    ) -> anyhow::Result<Recipe> {
        let recipe = sqlx::query_as::<_, Recipe>(
            r#"
            UPDATE recipes SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                ingredients = COALESCE($4, ingredients),
                steps = COALESCE($5, steps),
                tags = COALESCE($6, tags),
                time_minutes = COALESCE($7, time_minutes),
                difficulty = COALESCE($8, difficulty),
                image_url = COALESCE($9, image_url),
                updated_at = now()
            WHERE id = $1
            RETURNING id, title, description, ingredients, steps, tags,
                      time_minutes, difficulty, image_url, author_id,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(description)
        .bind(ingredients.map(|v| Json(v.to_vec())))
        .bind(steps.map(|v| Json(v.to_vec())))
        .bind(tags.map(|v| Json(v.to_vec())))
        .bind(time_minutes)
        .bind(difficulty)
        .bind(image_url)
        .fetch_one(db)
        .await?;
        Ok(recipe)
    }

    /// Delete a recipe and its cookbook saves in one transaction; the saves
    /// go first so the FK never dangles.
    pub async fn delete(db: &PgPool, id: i32) -> anyhow::Result<()> {
        let mut tx = db.begin().await?;
        sqlx::query("DELETE FROM cookbook_saves WHERE recipe_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_parses_lowercase_only() {
        assert_eq!(Difficulty::parse("easy"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::parse("medium"), Some(Difficulty::Medium));
        assert_eq!(Difficulty::parse("hard"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::parse("Easy"), None);
        assert_eq!(Difficulty::parse("impossible"), None);
    }

    #[test]
    fn difficulty_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Difficulty::Medium).unwrap(),
            "\"medium\""
        );
    }
}
