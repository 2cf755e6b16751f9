//! Hotel API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::ListingQuery;
use shared::models::{Hotel, HotelInput};

use crate::api::form::{FormPayload, QueryParams};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::hotel;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, required, validate_amount, validate_optional_text,
    validate_rating, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

fn not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::HotelNotFound, format!("Hotel {id} not found"))
}

/// Build and validate the payload; uploaded `images` are stored last and
/// appended
async fn hotel_input(state: &ServerState, form: &FormPayload) -> AppResult<HotelInput> {
    let name = form.text("name").unwrap_or_default();
    validate_required_text(&name, "Name", MAX_NAME_LEN)?;
    let location = form.text("location");
    validate_optional_text(&location, "Location", MAX_SHORT_TEXT_LEN)?;
    let price = form.number::<f64>("price")?.ok_or_else(|| required("Price"))?;
    validate_amount(price, "Price")?;
    let rating = form.number::<f64>("rating")?;
    validate_rating(rating, "Rating")?;
    let amenities = form.list("amenities")?;

    let mut images = form.list("images")?;
    images.extend(form.store_images("images", state.images()).await?);

    Ok(HotelInput {
        name,
        location: location.unwrap_or_default(),
        price,
        rating,
        amenities,
        images,
    })
}

/// GET /api/hotels
pub async fn list(
    State(state): State<ServerState>,
    QueryParams(query): QueryParams<ListingQuery>,
) -> AppResult<Json<Vec<Hotel>>> {
    let hotels = hotel::find_all(state.pool()).await?;
    Ok(Json(query.apply(hotels)))
}

/// GET /api/hotels/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Hotel>> {
    let hotel = hotel::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(hotel))
}

/// POST /api/hotels
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    form: FormPayload,
) -> AppResult<Json<Hotel>> {
    let input = hotel_input(&state, &form).await?;
    let hotel = hotel::create(state.pool(), &input).await?;
    tracing::info!(hotel_id = hotel.id, admin_id = current_user.id, "Hotel created");
    Ok(Json(hotel))
}

/// PUT /api/hotels/{id}
pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    form: FormPayload,
) -> AppResult<Json<Hotel>> {
    if hotel::find_by_id(state.pool(), id).await?.is_none() {
        return Err(not_found(id));
    }
    let input = hotel_input(&state, &form).await?;
    let hotel = hotel::update(state.pool(), id, &input).await?;
    tracing::info!(hotel_id = id, admin_id = current_user.id, "Hotel updated");
    Ok(Json(hotel))
}

/// DELETE /api/hotels/{id}
pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    if !hotel::delete(state.pool(), id).await? {
        return Err(not_found(id));
    }
    tracing::info!(hotel_id = id, admin_id = current_user.id, "Hotel deleted");
    Ok(Json(true))
}
