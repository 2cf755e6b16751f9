//! Tour Package API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::ListingQuery;
use shared::models::{ItineraryDay, Review, TourBooking, TourBookingRequest, TourPackage, TourPackageInput};

use crate::api::form::{FormPayload, JsonBody, QueryParams};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{booking, tour_package};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, required, validate_amount, validate_optional_text,
    validate_rating, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

fn not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::TourPackageNotFound, format!("Tour package {id} not found"))
}

/// Text and structured fields are parsed before any upload touches disk
async fn tour_input(state: &ServerState, form: &FormPayload) -> AppResult<TourPackageInput> {
    let title = form.text("title").unwrap_or_default();
    validate_required_text(&title, "Title", MAX_NAME_LEN)?;
    let category = form.text("category");
    validate_optional_text(&category, "Category", MAX_SHORT_TEXT_LEN)?;
    let location = form.text("location");
    validate_optional_text(&location, "Location", MAX_SHORT_TEXT_LEN)?;
    let price = form.number::<f64>("price")?.ok_or_else(|| required("Price"))?;
    validate_amount(price, "Price")?;
    let rating = form.number::<f64>("rating")?;
    validate_rating(rating, "Rating")?;

    let itinerary: Vec<ItineraryDay> = form.json("itinerary")?.unwrap_or_default();
    let reviews: Vec<Review> = form.json("reviews")?.unwrap_or_default();
    for review in &reviews {
        validate_rating(Some(review.rating), "Review rating")?;
    }

    let mut input = TourPackageInput {
        title,
        category: category.unwrap_or_default(),
        location: location.unwrap_or_default(),
        price,
        rating,
        duration: form.number::<u32>("duration")?.unwrap_or_default(),
        destination_id: form.number::<i64>("destinationId")?,
        highlights: form.list("highlights")?,
        includes: form.list("includes")?,
        excludes: form.list("excludes")?,
        itinerary,
        reviews,
        image: form.text("image"),
    };

    // An uploaded file wins over a kept path
    let uploaded = form.store_images("image", state.images()).await?;
    if let Some(path) = uploaded.into_iter().next() {
        input.image = Some(path);
    }
    Ok(input)
}

/// GET /api/tour-packages
pub async fn list(
    State(state): State<ServerState>,
    QueryParams(query): QueryParams<ListingQuery>,
) -> AppResult<Json<Vec<TourPackage>>> {
    let tours = tour_package::find_all(state.pool()).await?;
    Ok(Json(query.apply(tours)))
}

/// GET /api/tour-packages/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<TourPackage>> {
    let tour = tour_package::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(tour))
}

/// POST /api/tour-packages
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    form: FormPayload,
) -> AppResult<Json<TourPackage>> {
    let input = tour_input(&state, &form).await?;
    let tour = tour_package::create(state.pool(), &input).await?;
    tracing::info!(tour_id = tour.id, admin_id = current_user.id, "Tour package created");
    Ok(Json(tour))
}

/// PUT /api/tour-packages/{id}
pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    form: FormPayload,
) -> AppResult<Json<TourPackage>> {
    if tour_package::find_by_id(state.pool(), id).await?.is_none() {
        return Err(not_found(id));
    }
    let input = tour_input(&state, &form).await?;
    let tour = tour_package::update(state.pool(), id, &input).await?;
    tracing::info!(tour_id = id, admin_id = current_user.id, "Tour package updated");
    Ok(Json(tour))
}

/// DELETE /api/tour-packages/{id}
pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    if !tour_package::delete(state.pool(), id).await? {
        return Err(not_found(id));
    }
    tracing::info!(tour_id = id, admin_id = current_user.id, "Tour package deleted");
    Ok(Json(true))
}

/// GET /api/tour-packages/bookings - own bookings, or all for admins
pub async fn list_bookings(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<TourBooking>>> {
    let owner = (!current_user.is_admin()).then_some(current_user.id);
    let bookings = booking::list_tour_bookings(state.pool(), owner).await?;
    Ok(Json(bookings))
}

/// POST /api/tour-packages/bookings
pub async fn create_booking(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    JsonBody(req): JsonBody<TourBookingRequest>,
) -> AppResult<Json<TourBooking>> {
    shared::validation::check(&req)?;
    if req.travel_date < shared::util::today() {
        return Err(AppError::with_message(
            ErrorCode::InvalidBookingDate,
            "Travel date cannot be in the past",
        ));
    }
    let booking = booking::create_tour_booking(state.pool(), current_user.id, &req).await?;
    Ok(Json(booking))
}
