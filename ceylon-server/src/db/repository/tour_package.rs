//! Tour Package Repository

use super::{RepoError, RepoResult, to_u32};
use shared::models::{ItineraryDay, Review, TourPackage, TourPackageInput};
use sqlx::types::Json;
use sqlx::{FromRow, SqliteExecutor, SqlitePool};

macro_rules! select_tour {
    ($tail:literal) => {
        concat!(
            "SELECT id, title, category, location, price, rating, duration, destination_id, highlights, includes, excludes, itinerary, reviews, image, created_at, updated_at FROM tour_packages ",
            $tail
        )
    };
}

#[derive(Debug, FromRow)]
struct TourPackageRow {
    id: i64,
    title: String,
    category: String,
    location: String,
    price: f64,
    rating: f64,
    duration: i64,
    destination_id: Option<i64>,
    highlights: Json<Vec<String>>,
    includes: Json<Vec<String>>,
    excludes: Json<Vec<String>>,
    itinerary: Json<Vec<ItineraryDay>>,
    reviews: Json<Vec<Review>>,
    image: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl From<TourPackageRow> for TourPackage {
    fn from(row: TourPackageRow) -> Self {
        TourPackage {
            id: row.id,
            title: row.title,
            category: row.category,
            location: row.location,
            price: row.price,
            rating: row.rating,
            duration: to_u32(row.duration),
            destination_id: row.destination_id,
            highlights: row.highlights.0,
            includes: row.includes.0,
            excludes: row.excludes.0,
            itinerary: row.itinerary.0,
            reviews: row.reviews.0,
            image: row.image,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<TourPackage>> {
    let rows: Vec<TourPackageRow> = sqlx::query_as(select_tour!("ORDER BY id"))
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(TourPackage::from).collect())
}

/// Find by id on any executor (pool or open transaction)
pub async fn find_by_id<'e, E>(executor: E, id: i64) -> RepoResult<Option<TourPackage>>
where
    E: SqliteExecutor<'e>,
{
    let row: Option<TourPackageRow> = sqlx::query_as(select_tour!("WHERE id = ?"))
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(row.map(TourPackage::from))
}

pub async fn create(pool: &SqlitePool, data: &TourPackageInput) -> RepoResult<TourPackage> {
    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO tour_packages (title, category, location, price, rating, duration, destination_id, highlights, includes, excludes, itinerary, reviews, image, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(&data.title)
    .bind(&data.category)
    .bind(&data.location)
    .bind(data.price)
    .bind(data.rating.unwrap_or(0.0))
    .bind(i64::from(data.duration))
    .bind(data.destination_id)
    .bind(Json(&data.highlights))
    .bind(Json(&data.includes))
    .bind(Json(&data.excludes))
    .bind(Json(&data.itinerary))
    .bind(Json(&data.reviews))
    .bind(&data.image)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create tour package".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: &TourPackageInput) -> RepoResult<TourPackage> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        r#"
        UPDATE tour_packages SET title = ?, category = ?, location = ?, price = ?, rating = ?, duration = ?,
            destination_id = ?, highlights = ?, includes = ?, excludes = ?, itinerary = ?, reviews = ?,
            image = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&data.title)
    .bind(&data.category)
    .bind(&data.location)
    .bind(data.price)
    .bind(data.rating.unwrap_or(0.0))
    .bind(i64::from(data.duration))
    .bind(data.destination_id)
    .bind(Json(&data.highlights))
    .bind(Json(&data.includes))
    .bind(Json(&data.excludes))
    .bind(Json(&data.itinerary))
    .bind(Json(&data.reviews))
    .bind(&data.image)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Tour package {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Tour package {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM tour_packages WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    #[tokio::test]
    async fn test_crud_round() {
        let db = DbService::in_memory().await.unwrap();
        let input = TourPackageInput {
            title: "Hill Country Explorer".into(),
            category: "Adventure".into(),
            location: "Ella".into(),
            price: 250.0,
            duration: 3,
            itinerary: vec![ItineraryDay {
                day: 1,
                title: "Kandy to Ella by train".into(),
                description: String::new(),
            }],
            ..Default::default()
        };

        let created = create(&db.pool, &input).await.unwrap();
        assert_eq!(created.duration, 3);
        assert_eq!(created.rating, 0.0);
        assert_eq!(created.itinerary.len(), 1);

        let updated = update(
            &db.pool,
            created.id,
            &TourPackageInput {
                price: 300.0,
                ..input
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.price, 300.0);

        assert!(delete(&db.pool, created.id).await.unwrap());
        assert!(find_by_id(&db.pool, created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_destination_is_rejected() {
        let db = DbService::in_memory().await.unwrap();
        let input = TourPackageInput {
            title: "Ghost tour".into(),
            price: 10.0,
            destination_id: Some(404),
            ..Default::default()
        };
        let err = create(&db.pool, &input).await.unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }
}
