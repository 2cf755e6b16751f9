//! Destination Repository
//!
//! Destinations own their highlights (`highlights` table, ordered by
//! `position`); both are written in one transaction.

use std::collections::HashMap;

use super::{RepoError, RepoResult};
use shared::models::destination::DEFAULT_COUNTRY;
use shared::models::{Destination, DestinationInput, Highlight};
use sqlx::types::Json;
use sqlx::{FromRow, Sqlite, SqlitePool, Transaction};

macro_rules! select_destination {
    ($tail:literal) => {
        concat!(
            "SELECT id, name, short_description, detailed_description, province, country, rating, featured, best_time, weather, best_for, categories, activities, hotels, images, created_at, updated_at FROM destinations ",
            $tail
        )
    };
}

#[derive(Debug, FromRow)]
struct DestinationRow {
    id: i64,
    name: String,
    short_description: String,
    detailed_description: String,
    province: String,
    country: String,
    rating: f64,
    featured: bool,
    best_time: Option<String>,
    weather: Option<String>,
    best_for: Json<Vec<String>>,
    categories: Json<Vec<String>>,
    activities: Json<Vec<String>>,
    hotels: Json<Vec<String>>,
    images: Json<Vec<String>>,
    created_at: i64,
    updated_at: i64,
}

impl DestinationRow {
    fn into_model(self, highlights: Vec<Highlight>) -> Destination {
        Destination {
            id: self.id,
            name: self.name,
            short_description: self.short_description,
            detailed_description: self.detailed_description,
            province: self.province,
            country: self.country,
            rating: self.rating,
            featured: self.featured,
            best_time: self.best_time,
            weather: self.weather,
            best_for: self.best_for.0,
            categories: self.categories.0,
            activities: self.activities.0,
            hotels: self.hotels.0,
            images: self.images.0,
            highlights,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct HighlightRow {
    destination_id: i64,
    name: String,
    description: String,
    best_time: Option<String>,
    tips: Option<String>,
    image: Option<String>,
}

impl From<HighlightRow> for Highlight {
    fn from(row: HighlightRow) -> Self {
        Highlight {
            name: row.name,
            description: row.description,
            best_time: row.best_time,
            tips: row.tips,
            image: row.image,
        }
    }
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Destination>> {
    let rows: Vec<DestinationRow> = sqlx::query_as(select_destination!("ORDER BY id"))
        .fetch_all(pool)
        .await?;

    let highlight_rows: Vec<HighlightRow> = sqlx::query_as(
        "SELECT destination_id, name, description, best_time, tips, image FROM highlights ORDER BY destination_id, position, id",
    )
    .fetch_all(pool)
    .await?;

    let mut by_destination: HashMap<i64, Vec<Highlight>> = HashMap::new();
    for row in highlight_rows {
        by_destination
            .entry(row.destination_id)
            .or_default()
            .push(row.into());
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let highlights = by_destination.remove(&row.id).unwrap_or_default();
            row.into_model(highlights)
        })
        .collect())
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Destination>> {
    let row: Option<DestinationRow> =
        sqlx::query_as(select_destination!("WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    let Some(row) = row else {
        return Ok(None);
    };

    let highlights: Vec<HighlightRow> = sqlx::query_as(
        "SELECT destination_id, name, description, best_time, tips, image FROM highlights WHERE destination_id = ? ORDER BY position, id",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(Some(
        row.into_model(highlights.into_iter().map(Highlight::from).collect()),
    ))
}

pub async fn create(pool: &SqlitePool, data: &DestinationInput) -> RepoResult<Destination> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO destinations (name, short_description, detailed_description, province, country, rating, featured, best_time, weather, best_for, categories, activities, hotels, images, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(&data.name)
    .bind(&data.short_description)
    .bind(&data.detailed_description)
    .bind(&data.province)
    .bind(country_or_default(data))
    .bind(data.rating.unwrap_or(0.0))
    .bind(data.featured)
    .bind(&data.best_time)
    .bind(&data.weather)
    .bind(Json(&data.best_for))
    .bind(Json(&data.categories))
    .bind(Json(&data.activities))
    .bind(Json(&data.hotels))
    .bind(Json(&data.images))
    .bind(now)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    insert_highlights(&mut tx, id, &data.highlights).await?;
    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create destination".into()))
}

/// Replace a destination and its highlights
pub async fn update(pool: &SqlitePool, id: i64, data: &DestinationInput) -> RepoResult<Destination> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let rows = sqlx::query(
        r#"
        UPDATE destinations SET name = ?, short_description = ?, detailed_description = ?, province = ?, country = ?,
            rating = ?, featured = ?, best_time = ?, weather = ?, best_for = ?, categories = ?, activities = ?,
            hotels = ?, images = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&data.name)
    .bind(&data.short_description)
    .bind(&data.detailed_description)
    .bind(&data.province)
    .bind(country_or_default(data))
    .bind(data.rating.unwrap_or(0.0))
    .bind(data.featured)
    .bind(&data.best_time)
    .bind(&data.weather)
    .bind(Json(&data.best_for))
    .bind(Json(&data.categories))
    .bind(Json(&data.activities))
    .bind(Json(&data.hotels))
    .bind(Json(&data.images))
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Destination {id} not found")));
    }

    sqlx::query("DELETE FROM highlights WHERE destination_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    insert_highlights(&mut tx, id, &data.highlights).await?;
    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Destination {id} not found")))
}

/// Hard delete; highlights cascade. Returns false when nothing was deleted.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM destinations WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

async fn insert_highlights(
    tx: &mut Transaction<'_, Sqlite>,
    destination_id: i64,
    highlights: &[Highlight],
) -> RepoResult<()> {
    for (position, h) in highlights.iter().enumerate() {
        sqlx::query(
            "INSERT INTO highlights (destination_id, position, name, description, best_time, tips, image) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(destination_id)
        .bind(position as i64)
        .bind(&h.name)
        .bind(&h.description)
        .bind(&h.best_time)
        .bind(&h.tips)
        .bind(&h.image)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

fn country_or_default(data: &DestinationInput) -> &str {
    data.country
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_COUNTRY)
}
