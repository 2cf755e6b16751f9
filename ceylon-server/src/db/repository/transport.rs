//! Transport Repository
//!
//! The provider is embedded in the `transports` row (`provider_*` columns).

use super::{RepoError, RepoResult, to_u32};
use shared::models::{Provider, Transport, TransportInput};
use sqlx::types::Json;
use sqlx::{FromRow, SqliteExecutor, SqlitePool};

macro_rules! select_transport {
    ($tail:literal) => {
        concat!(
            "SELECT id, vehicle, vehicle_type, seats, price_per_1km, available, features, images, provider_name, provider_contact, provider_rating, provider_verified, provider_completed_trips, provider_since, created_at, updated_at FROM transports ",
            $tail
        )
    };
}

#[derive(Debug, FromRow)]
struct TransportRow {
    id: i64,
    vehicle: String,
    vehicle_type: String,
    seats: i64,
    price_per_1km: f64,
    available: bool,
    features: Json<Vec<String>>,
    images: Json<Vec<String>>,
    provider_name: String,
    provider_contact: String,
    provider_rating: f64,
    provider_verified: bool,
    provider_completed_trips: i64,
    provider_since: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl From<TransportRow> for Transport {
    fn from(row: TransportRow) -> Self {
        Transport {
            id: row.id,
            vehicle: row.vehicle,
            vehicle_type: row.vehicle_type,
            seats: to_u32(row.seats),
            price_per_1km: row.price_per_1km,
            available: row.available,
            features: row.features.0,
            images: row.images.0,
            provider: Provider {
                name: row.provider_name,
                contact: row.provider_contact,
                rating: row.provider_rating,
                verified: row.provider_verified,
                completed_trips: to_u32(row.provider_completed_trips),
                since: row.provider_since,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Transport>> {
    let rows: Vec<TransportRow> = sqlx::query_as(select_transport!("ORDER BY id"))
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(Transport::from).collect())
}

/// Find by id on any executor (pool or open transaction)
pub async fn find_by_id<'e, E>(executor: E, id: i64) -> RepoResult<Option<Transport>>
where
    E: SqliteExecutor<'e>,
{
    let row: Option<TransportRow> = sqlx::query_as(select_transport!("WHERE id = ?"))
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(row.map(Transport::from))
}

pub async fn create(pool: &SqlitePool, data: &TransportInput) -> RepoResult<Transport> {
    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO transports (vehicle, vehicle_type, seats, price_per_1km, available, features, images,
            provider_name, provider_contact, provider_rating, provider_verified, provider_completed_trips, provider_since,
            created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(&data.vehicle)
    .bind(&data.vehicle_type)
    .bind(i64::from(data.seats))
    .bind(data.price_per_1km)
    .bind(data.available)
    .bind(Json(&data.features))
    .bind(Json(&data.images))
    .bind(&data.provider.name)
    .bind(&data.provider.contact)
    .bind(data.provider.rating)
    .bind(data.provider.verified)
    .bind(i64::from(data.provider.completed_trips))
    .bind(&data.provider.since)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create transport".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: &TransportInput) -> RepoResult<Transport> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        r#"
        UPDATE transports SET vehicle = ?, vehicle_type = ?, seats = ?, price_per_1km = ?, available = ?,
            features = ?, images = ?, provider_name = ?, provider_contact = ?, provider_rating = ?,
            provider_verified = ?, provider_completed_trips = ?, provider_since = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&data.vehicle)
    .bind(&data.vehicle_type)
    .bind(i64::from(data.seats))
    .bind(data.price_per_1km)
    .bind(data.available)
    .bind(Json(&data.features))
    .bind(Json(&data.images))
    .bind(&data.provider.name)
    .bind(&data.provider.contact)
    .bind(data.provider.rating)
    .bind(data.provider.verified)
    .bind(i64::from(data.provider.completed_trips))
    .bind(&data.provider.since)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Transport {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Transport {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM transports WHERE id = ?")
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
    async fn test_provider_is_embedded() {
        let db = DbService::in_memory().await.unwrap();
        let created = create(
            &db.pool,
            &TransportInput {
                vehicle: "Toyota KDH".into(),
                vehicle_type: "Van".into(),
                seats: 9,
                price_per_1km: 120.0,
                available: true,
                features: vec!["A/C".into()],
                images: vec![],
                provider: Provider {
                    name: "Lanka Tours".into(),
                    contact: "+94 11 222 3333".into(),
                    rating: 4.9,
                    verified: true,
                    completed_trips: 320,
                    since: Some("2015".into()),
                },
            },
        )
        .await
        .unwrap();

        assert_eq!(created.seats, 9);
        assert_eq!(created.provider.name, "Lanka Tours");
        assert_eq!(created.provider.completed_trips, 320);
        assert!(created.provider.verified);
    }
}
