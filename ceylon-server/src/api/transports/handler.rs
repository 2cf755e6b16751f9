//! Transport API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::ListingQuery;
use shared::models::{
    Provider, Transport, TransportBooking, TransportBookingRequest, TransportInput,
};

use crate::api::form::{FormPayload, JsonBody, QueryParams};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{booking, transport};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, required, validate_amount, validate_optional_text,
    validate_rating, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

fn not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::TransportNotFound, format!("Transport {id} not found"))
}

/// Provider comes either as a JSON `provider` object or as flat
/// `providerName`/`providerContact`/... fields
fn provider(form: &FormPayload) -> AppResult<Provider> {
    if let Some(provider) = form.json::<Provider>("provider")? {
        return Ok(provider);
    }
    Ok(Provider {
        name: form.text("providerName").unwrap_or_default(),
        contact: form.text("providerContact").unwrap_or_default(),
        rating: form.number("providerRating")?.unwrap_or_default(),
        verified: form.flag("providerVerified"),
        completed_trips: form.number("providerCompletedTrips")?.unwrap_or_default(),
        since: form.text("providerSince"),
    })
}

async fn transport_input(state: &ServerState, form: &FormPayload) -> AppResult<TransportInput> {
    let vehicle = form.text("vehicle").unwrap_or_default();
    validate_required_text(&vehicle, "Vehicle", MAX_NAME_LEN)?;
    let vehicle_type = form.text("vehicleType");
    validate_optional_text(&vehicle_type, "Vehicle type", MAX_SHORT_TEXT_LEN)?;

    let seats = form.number::<u32>("seats")?.ok_or_else(|| required("Seats"))?;
    if seats == 0 {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "Seats must be at least 1",
        ));
    }
    let price_per_1km = form
        .number::<f64>("pricePer1km")?
        .ok_or_else(|| required("Price per km"))?;
    validate_amount(price_per_1km, "Price per km")?;

    let provider = provider(form)?;
    validate_optional_text(&Some(provider.name.clone()), "Provider name", MAX_NAME_LEN)?;
    validate_rating(Some(provider.rating), "Provider rating")?;

    // Unset means available
    let available = form.text("available").is_none() || form.flag("available");
    let features = form.list("features")?;

    let mut images = form.list("images")?;
    images.extend(form.store_images("images", state.images()).await?);

    Ok(TransportInput {
        vehicle,
        vehicle_type: vehicle_type.unwrap_or_default(),
        seats,
        price_per_1km,
        available,
        features,
        images,
        provider,
    })
}

/// GET /api/transports
pub async fn list(
    State(state): State<ServerState>,
    QueryParams(query): QueryParams<ListingQuery>,
) -> AppResult<Json<Vec<Transport>>> {
    let transports = transport::find_all(state.pool()).await?;
    Ok(Json(query.apply(transports)))
}

/// GET /api/transports/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Transport>> {
    let transport = transport::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(transport))
}

/// POST /api/transports
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    form: FormPayload,
) -> AppResult<Json<Transport>> {
    let input = transport_input(&state, &form).await?;
    let transport = transport::create(state.pool(), &input).await?;
    tracing::info!(transport_id = transport.id, admin_id = current_user.id, "Transport created");
    Ok(Json(transport))
}

/// PUT /api/transports/{id}
pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    form: FormPayload,
) -> AppResult<Json<Transport>> {
    if transport::find_by_id(state.pool(), id).await?.is_none() {
        return Err(not_found(id));
    }
    let input = transport_input(&state, &form).await?;
    let transport = transport::update(state.pool(), id, &input).await?;
    tracing::info!(transport_id = id, admin_id = current_user.id, "Transport updated");
    Ok(Json(transport))
}

/// DELETE /api/transports/{id}
pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    if !transport::delete(state.pool(), id).await? {
        return Err(not_found(id));
    }
    tracing::info!(transport_id = id, admin_id = current_user.id, "Transport deleted");
    Ok(Json(true))
}

/// POST /api/transports/book
pub async fn book(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    JsonBody(req): JsonBody<TransportBookingRequest>,
) -> AppResult<Json<TransportBooking>> {
    let req = req.normalized();
    shared::validation::check(&req)?;
    if req.pickup_date < shared::util::today() {
        return Err(AppError::with_message(
            ErrorCode::InvalidBookingDate,
            "Pickup date cannot be in the past",
        ));
    }
    let booking = booking::create_transport_booking(state.pool(), current_user.id, &req).await?;
    Ok(Json(booking))
}

/// GET /api/transports/bookings - own bookings, or all for admins
pub async fn list_bookings(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<TransportBooking>>> {
    let owner = (!current_user.is_admin()).then_some(current_user.id);
    let bookings = booking::list_transport_bookings(state.pool(), owner).await?;
    Ok(Json(bookings))
}
