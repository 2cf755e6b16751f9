//! Destination API Handlers
//!
//! Form fields mirror the JSON shape. Multipart requests may add `images[]`
//! files (appended to `images`) and `highlightImages[]` files, where the i-th
//! file becomes the image of the i-th entry of the JSON-encoded `highlights`.

use axum::{
    Json,
    extract::{Path, State},
};
use shared::ListingQuery;
use shared::models::{Destination, DestinationInput, Highlight};

use crate::api::form::{FormPayload, QueryParams};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::destination;
use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_rating, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

fn not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::DestinationNotFound, format!("Destination {id} not found"))
}

fn validate_highlights(highlights: &[Highlight]) -> AppResult<()> {
    for (i, h) in highlights.iter().enumerate() {
        let label = format!("Highlight {} name", i + 1);
        validate_required_text(&h.name, &label, MAX_NAME_LEN)?;
        validate_optional_text(&h.tips, "Highlight tips", MAX_DESCRIPTION_LEN)?;
    }
    Ok(())
}

async fn destination_input(state: &ServerState, form: &FormPayload) -> AppResult<DestinationInput> {
    let name = form.text("name").unwrap_or_default();
    validate_required_text(&name, "Name", MAX_NAME_LEN)?;

    let short_description = form.text("shortDescription");
    validate_optional_text(&short_description, "Short description", MAX_DESCRIPTION_LEN)?;
    let detailed_description = form.text("detailedDescription");
    validate_optional_text(&detailed_description, "Detailed description", MAX_DESCRIPTION_LEN)?;
    let province = form.text("province");
    validate_optional_text(&province, "Province", MAX_SHORT_TEXT_LEN)?;
    let country = form.text("country");
    validate_optional_text(&country, "Country", MAX_SHORT_TEXT_LEN)?;
    let rating = form.number::<f64>("rating")?;
    validate_rating(rating, "Rating")?;

    let mut highlights: Vec<Highlight> = form.json("highlights")?.unwrap_or_default();
    validate_highlights(&highlights)?;

    let mut input = DestinationInput {
        name,
        short_description: short_description.unwrap_or_default(),
        detailed_description: detailed_description.unwrap_or_default(),
        province: province.unwrap_or_default(),
        country,
        rating,
        featured: form.flag("featured"),
        best_time: form.text("bestTime"),
        weather: form.text("weather"),
        best_for: form.list("bestFor")?,
        categories: form.list("categories")?,
        activities: form.list("activities")?,
        hotels: form.list("hotels")?,
        images: form.list("images")?,
        highlights: Vec::new(),
    };

    // Files hit the disk only once every other field and file has been accepted
    form.check_images("highlightImages", state.images())?;
    input
        .images
        .extend(form.store_images("images", state.images()).await?);

    let extra = form
        .files("highlightImages")
        .count()
        .saturating_sub(highlights.len());
    if extra > 0 {
        tracing::warn!(
            extra,
            highlights = highlights.len(),
            "More highlight images than highlights, extra files ignored"
        );
    }
    let highlight_images = form
        .store_first_images("highlightImages", highlights.len(), state.images())
        .await?;
    for (highlight, path) in highlights.iter_mut().zip(highlight_images) {
        highlight.image = Some(path);
    }
    input.highlights = highlights;

    Ok(input)
}

/// GET /api/destinations
pub async fn list(
    State(state): State<ServerState>,
    QueryParams(query): QueryParams<ListingQuery>,
) -> AppResult<Json<Vec<Destination>>> {
    let destinations = destination::find_all(state.pool()).await?;
    Ok(Json(query.apply(destinations)))
}

/// GET /api/destinations/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Destination>> {
    let destination = destination::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(destination))
}

/// POST /api/destinations
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    form: FormPayload,
) -> AppResult<Json<Destination>> {
    let input = destination_input(&state, &form).await?;
    let destination = destination::create(state.pool(), &input).await?;
    tracing::info!(
        destination_id = destination.id,
        admin_id = current_user.id,
        "Destination created"
    );
    Ok(Json(destination))
}

/// POST /api/destinations/full-create
///
/// Destination, gallery and highlights with their images in one request.
pub async fn full_create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    form: FormPayload,
) -> AppResult<Json<Destination>> {
    let input = destination_input(&state, &form).await?;
    let destination = destination::create(state.pool(), &input).await?;
    tracing::info!(
        destination_id = destination.id,
        admin_id = current_user.id,
        images = destination.images.len(),
        highlights = destination.highlights.len(),
        "Destination created with media"
    );
    Ok(Json(destination))
}

/// PUT /api/destinations/{id}
pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    form: FormPayload,
) -> AppResult<Json<Destination>> {
    if destination::find_by_id(state.pool(), id).await?.is_none() {
        return Err(not_found(id));
    }
    let input = destination_input(&state, &form).await?;
    let destination = destination::update(state.pool(), id, &input).await?;
    tracing::info!(destination_id = id, admin_id = current_user.id, "Destination updated");
    Ok(Json(destination))
}

/// DELETE /api/destinations/{id}
pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    if !destination::delete(state.pool(), id).await? {
        return Err(not_found(id));
    }
    tracing::info!(destination_id = id, admin_id = current_user.id, "Destination deleted");
    Ok(Json(true))
}
