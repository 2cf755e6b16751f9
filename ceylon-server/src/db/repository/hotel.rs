//! Hotel Repository

use super::{RepoError, RepoResult};
use shared::models::{Hotel, HotelInput};
use sqlx::types::Json;
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, FromRow)]
struct HotelRow {
    id: i64,
    name: String,
    location: String,
    price: f64,
    rating: f64,
    amenities: Json<Vec<String>>,
    images: Json<Vec<String>>,
    created_at: i64,
    updated_at: i64,
}

impl From<HotelRow> for Hotel {
    fn from(row: HotelRow) -> Self {
        Hotel {
            id: row.id,
            name: row.name,
            location: row.location,
            price: row.price,
            rating: row.rating,
            amenities: row.amenities.0,
            images: row.images.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Hotel>> {
    let rows: Vec<HotelRow> = sqlx::query_as(
        "SELECT id, name, location, price, rating, amenities, images, created_at, updated_at FROM hotels ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Hotel::from).collect())
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Hotel>> {
    let row: Option<HotelRow> = sqlx::query_as(
        "SELECT id, name, location, price, rating, amenities, images, created_at, updated_at FROM hotels WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(Hotel::from))
}

pub async fn create(pool: &SqlitePool, data: &HotelInput) -> RepoResult<Hotel> {
    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO hotels (name, location, price, rating, amenities, images, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(&data.name)
    .bind(&data.location)
    .bind(data.price)
    .bind(data.rating.unwrap_or(0.0))
    .bind(Json(&data.amenities))
    .bind(Json(&data.images))
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create hotel".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: &HotelInput) -> RepoResult<Hotel> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE hotels SET name = ?, location = ?, price = ?, rating = ?, amenities = ?, images = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&data.name)
    .bind(&data.location)
    .bind(data.price)
    .bind(data.rating.unwrap_or(0.0))
    .bind(Json(&data.amenities))
    .bind(Json(&data.images))
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Hotel {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Hotel {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM hotels WHERE id = ?")
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
    async fn test_amenities_round_trip_through_json_column() {
        let db = DbService::in_memory().await.unwrap();
        let hotel = create(
            &db.pool,
            &HotelInput {
                name: "Jetwing Lighthouse".into(),
                location: "Galle".into(),
                price: 180.0,
                rating: Some(4.7),
                amenities: vec!["Pool".into(), "Spa".into()],
                images: vec!["/uploads/abc.jpg".into()],
            },
        )
        .await
        .unwrap();

        let found = find_by_id(&db.pool, hotel.id).await.unwrap().unwrap();
        assert_eq!(found.amenities, vec!["Pool".to_string(), "Spa".to_string()]);
        assert_eq!(found.images, vec!["/uploads/abc.jpg".to_string()]);
        assert_eq!(find_all(&db.pool).await.unwrap().len(), 1);
    }
}
