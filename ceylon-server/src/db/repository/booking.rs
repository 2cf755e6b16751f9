//! Booking Repository
//!
//! Each booking is created in one transaction that reads the listing, checks
//! it can be booked and inserts the row with a server-computed total.

use chrono::NaiveDate;
use super::{RepoError, RepoResult, to_u32};
use super::{tour_package, transport};
use shared::models::{
    BookingStatus, TourBooking, TourBookingRequest, TransportBooking, TransportBookingRequest,
};
use sqlx::{FromRow, SqlitePool};

macro_rules! select_tour_booking {
    ($tail:literal) => {
        concat!(
            "SELECT b.id, b.user_id, b.tour_package_id, t.title AS tour_title, b.travel_date, b.guests, b.total_price, b.status, b.created_at, b.updated_at ",
            "FROM tour_bookings b JOIN tour_packages t ON t.id = b.tour_package_id ",
            $tail
        )
    };
}

macro_rules! select_transport_booking {
    ($tail:literal) => {
        concat!(
            "SELECT b.id, b.user_id, b.transport_id, t.vehicle, b.pickup_location, b.dropoff_location, b.pickup_date, b.passengers, b.distance_km, b.total_price, b.status, b.created_at, b.updated_at ",
            "FROM transport_bookings b JOIN transports t ON t.id = b.transport_id ",
            $tail
        )
    };
}

#[derive(Debug, FromRow)]
struct TourBookingRow {
    id: i64,
    user_id: i64,
    tour_package_id: i64,
    tour_title: String,
    travel_date: NaiveDate,
    guests: i64,
    total_price: f64,
    status: String,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<TourBookingRow> for TourBooking {
    type Error = RepoError;

    fn try_from(row: TourBookingRow) -> Result<Self, Self::Error> {
        Ok(TourBooking {
            id: row.id,
            user_id: row.user_id,
            tour_package_id: row.tour_package_id,
            tour_title: row.tour_title,
            travel_date: row.travel_date,
            guests: to_u32(row.guests),
            total_price: row.total_price,
            status: row.status.parse().map_err(RepoError::Database)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct TransportBookingRow {
    id: i64,
    user_id: i64,
    transport_id: i64,
    vehicle: String,
    pickup_location: String,
    dropoff_location: String,
    pickup_date: NaiveDate,
    passengers: i64,
    distance_km: f64,
    total_price: f64,
    status: String,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<TransportBookingRow> for TransportBooking {
    type Error = RepoError;

    fn try_from(row: TransportBookingRow) -> Result<Self, Self::Error> {
        Ok(TransportBooking {
            id: row.id,
            user_id: row.user_id,
            transport_id: row.transport_id,
            vehicle: row.vehicle,
            pickup_location: row.pickup_location,
            dropoff_location: row.dropoff_location,
            pickup_date: row.pickup_date,
            passengers: to_u32(row.passengers),
            distance_km: row.distance_km,
            total_price: row.total_price,
            status: row.status.parse().map_err(RepoError::Database)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Reject totals that cannot be stored or serialized as a number
fn checked_total(total: f64) -> RepoResult<f64> {
    if total.is_finite() {
        Ok(total)
    } else {
        Err(RepoError::Validation("Total price is out of range".into()))
    }
}

// =============================================================================
// Tour bookings
// =============================================================================

pub async fn create_tour_booking(
    pool: &SqlitePool,
    user_id: i64,
    req: &TourBookingRequest,
) -> RepoResult<TourBooking> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let tour = tour_package::find_by_id(&mut *tx, req.tour_package_id)
        .await?
        .ok_or_else(|| {
            RepoError::NotFound(format!("Tour package {} not found", req.tour_package_id))
        })?;
    let total = checked_total(req.total_for(&tour))?;

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO tour_bookings (user_id, tour_package_id, travel_date, guests, total_price, status, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(user_id)
    .bind(tour.id)
    .bind(req.travel_date)
    .bind(i64::from(req.guests))
    .bind(total)
    .bind(BookingStatus::Confirmed.as_str())
    .bind(now)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;

    tracing::info!(booking_id = id, user_id, tour_id = tour.id, total, "Tour booked");

    let row: TourBookingRow = sqlx::query_as(select_tour_booking!("WHERE b.id = ?"))
        .bind(id)
        .fetch_one(pool)
        .await?;
    row.try_into()
}

/// List tour bookings, newest first; `None` lists every user's bookings
pub async fn list_tour_bookings(
    pool: &SqlitePool,
    user_id: Option<i64>,
) -> RepoResult<Vec<TourBooking>> {
    let rows: Vec<TourBookingRow> = match user_id {
        Some(uid) => {
            sqlx::query_as(select_tour_booking!("WHERE b.user_id = ? ORDER BY b.id DESC"))
                .bind(uid)
                .fetch_all(pool)
                .await?
        }
        None => {
            sqlx::query_as(select_tour_booking!("ORDER BY b.id DESC"))
                .fetch_all(pool)
                .await?
        }
    };
    rows.into_iter().map(TourBooking::try_from).collect()
}

// =============================================================================
// Transport bookings
// =============================================================================

pub async fn create_transport_booking(
    pool: &SqlitePool,
    user_id: i64,
    req: &TransportBookingRequest,
) -> RepoResult<TransportBooking> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let vehicle = transport::find_by_id(&mut *tx, req.transport_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Transport {} not found", req.transport_id)))?;
    if !vehicle.available {
        return Err(RepoError::Unavailable(format!(
            "{} is not available for booking",
            vehicle.vehicle
        )));
    }
    if req.passengers > vehicle.seats {
        return Err(RepoError::Capacity(format!(
            "{} seats {} passengers at most",
            vehicle.vehicle, vehicle.seats
        )));
    }
    let total = checked_total(req.total_for(&vehicle))?;

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO transport_bookings (user_id, transport_id, pickup_location, dropoff_location, pickup_date,
            passengers, distance_km, total_price, status, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(vehicle.id)
    .bind(req.pickup_location.trim())
    .bind(req.dropoff_location.trim())
    .bind(req.pickup_date)
    .bind(i64::from(req.passengers))
    .bind(req.distance_km)
    .bind(total)
    .bind(BookingStatus::Confirmed.as_str())
    .bind(now)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;

    tracing::info!(booking_id = id, user_id, transport_id = vehicle.id, total, "Transport booked");

    let row: TransportBookingRow = sqlx::query_as(select_transport_booking!("WHERE b.id = ?"))
        .bind(id)
        .fetch_one(pool)
        .await?;
    row.try_into()
}

pub async fn list_transport_bookings(
    pool: &SqlitePool,
    user_id: Option<i64>,
) -> RepoResult<Vec<TransportBooking>> {
    let rows: Vec<TransportBookingRow> = match user_id {
        Some(uid) => {
            sqlx::query_as(select_transport_booking!("WHERE b.user_id = ? ORDER BY b.id DESC"))
                .bind(uid)
                .fetch_all(pool)
                .await?
        }
        None => {
            sqlx::query_as(select_transport_booking!("ORDER BY b.id DESC"))
                .fetch_all(pool)
                .await?
        }
    };
    rows.into_iter().map(TransportBooking::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::repository::user::{self, NewUser};
    use shared::models::{Provider, Role, TourPackageInput, TransportInput};

    async fn seed_user(pool: &SqlitePool, email: &str) -> i64 {
        user::create(
            pool,
            &NewUser {
                name: "Guest",
                email,
                password_hash: "hash",
                phone: "0",
                country: "LK",
                role: Role::Customer,
            },
        )
        .await
        .unwrap()
        .id
    }

    async fn seed_transport(pool: &SqlitePool, available: bool) -> i64 {
        transport::create(
            pool,
            &TransportInput {
                vehicle: "Tuk-tuk".into(),
                vehicle_type: "Tuk".into(),
                seats: 3,
                price_per_1km: 80.0,
                available,
                provider: Provider {
                    name: "Ella Rides".into(),
                    ..Default::default()
                },
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .id
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 1, 15).unwrap()
    }

    #[tokio::test]
    async fn test_tour_booking_total_is_computed() {
        let db = DbService::in_memory().await.unwrap();
        let uid = seed_user(&db.pool, "g@example.lk").await;
        let tour = tour_package::create(
            &db.pool,
            &TourPackageInput {
                title: "Cultural Triangle".into(),
                price: 149.99,
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let booking = create_tour_booking(
            &db.pool,
            uid,
            &TourBookingRequest {
                tour_package_id: tour.id,
                travel_date: date(),
                guests: 3,
            },
        )
        .await
        .unwrap();

        assert_eq!(booking.total_price, 449.97);
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.tour_title, "Cultural Triangle");
        assert_eq!(booking.travel_date, date());

        let other = seed_user(&db.pool, "h@example.lk").await;
        assert_eq!(list_tour_bookings(&db.pool, Some(uid)).await.unwrap().len(), 1);
        assert!(list_tour_bookings(&db.pool, Some(other)).await.unwrap().is_empty());
        assert_eq!(list_tour_bookings(&db.pool, None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_tour_booking_unknown_tour() {
        let db = DbService::in_memory().await.unwrap();
        let uid = seed_user(&db.pool, "g@example.lk").await;
        let err = create_tour_booking(
            &db.pool,
            uid,
            &TourBookingRequest {
                tour_package_id: 42,
                travel_date: date(),
                guests: 1,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    fn transport_request(transport_id: i64, passengers: u32) -> TransportBookingRequest {
        TransportBookingRequest {
            transport_id,
            pickup_location: " Ella ".into(),
            dropoff_location: "Nine Arch Bridge".into(),
            pickup_date: date(),
            passengers,
            distance_km: 4.5,
        }
    }

    #[tokio::test]
    async fn test_transport_booking_rules() {
        let db = DbService::in_memory().await.unwrap();
        let uid = seed_user(&db.pool, "g@example.lk").await;
        let tuk = seed_transport(&db.pool, true).await;
        let parked = seed_transport(&db.pool, false).await;

        let booking = create_transport_booking(&db.pool, uid, &transport_request(tuk, 2))
            .await
            .unwrap();
        assert_eq!(booking.total_price, 360.0);
        assert_eq!(booking.pickup_location, "Ella");
        assert_eq!(booking.vehicle, "Tuk-tuk");

        let err = create_transport_booking(&db.pool, uid, &transport_request(tuk, 4))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Capacity(_)));

        let err = create_transport_booking(&db.pool, uid, &transport_request(parked, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Unavailable(_)));

        let mine = list_transport_bookings(&db.pool, Some(uid)).await.unwrap();
        assert_eq!(mine, vec![booking]);
    }

    #[tokio::test]
    async fn test_overflowing_total_is_not_stored() {
        let db = DbService::in_memory().await.unwrap();
        let uid = seed_user(&db.pool, "g@example.lk").await;
        let tuk = seed_transport(&db.pool, true).await;

        let request = TransportBookingRequest {
            distance_km: 1e308,
            ..transport_request(tuk, 1)
        };
        let err = create_transport_booking(&db.pool, uid, &request)
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
        assert!(list_transport_bookings(&db.pool, None).await.unwrap().is_empty());
    }

    #[test]
    fn test_checked_total() {
        assert_eq!(checked_total(12.5).unwrap(), 12.5);
        assert!(checked_total(f64::INFINITY).is_err());
        assert!(checked_total(f64::NAN).is_err());
    }
}
