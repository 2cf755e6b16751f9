//! Unified search across listing kinds
//!
//! `GET /api/search?q=&kind=&category=&sort=&page=&perPage=` returns a
//! [`Page`] of kind-tagged hits. Without `kind` every listing kind is searched.

use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use serde::Deserialize;
use shared::models::{ListingKind, SearchHit};
use shared::query::paginate;
use shared::{ListingQuery, Page};

use crate::api::form::QueryParams;
use crate::core::ServerState;
use crate::db::repository::{destination, hotel, tour_package, transport};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub q: Option<String>,
    pub kind: Option<String>,
    pub category: Option<String>,
    pub sort: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl SearchParams {
    fn kinds(&self) -> AppResult<Vec<ListingKind>> {
        match self.kind.as_deref().map(str::trim) {
            None | Some("") | Some("all") => Ok(ListingKind::ALL.to_vec()),
            Some(kind) => kind
                .parse::<ListingKind>()
                .map(|k| vec![k])
                .map_err(AppError::invalid_request),
        }
    }

    fn query(&self) -> ListingQuery {
        ListingQuery {
            q: self.q.clone(),
            category: self.category.clone(),
            sort: self.sort.clone(),
            page: self.page,
            per_page: self.per_page,
        }
    }
}

async fn load(state: &ServerState, kind: ListingKind) -> AppResult<Vec<SearchHit>> {
    let pool = state.pool();
    let hits = match kind {
        ListingKind::Destination => destination::find_all(pool)
            .await?
            .into_iter()
            .map(SearchHit::Destination)
            .collect(),
        ListingKind::Tour => tour_package::find_all(pool)
            .await?
            .into_iter()
            .map(SearchHit::Tour)
            .collect(),
        ListingKind::Hotel => hotel::find_all(pool)
            .await?
            .into_iter()
            .map(SearchHit::Hotel)
            .collect(),
        ListingKind::Transport => transport::find_all(pool)
            .await?
            .into_iter()
            .map(SearchHit::Transport)
            .collect(),
    };
    Ok(hits)
}

/// GET /api/search
async fn search(
    State(state): State<ServerState>,
    QueryParams(params): QueryParams<SearchParams>,
) -> AppResult<Json<Page<SearchHit>>> {
    let kinds = params.kinds()?;
    let query = params.query();

    let mut hits = Vec::new();
    for kind in kinds {
        hits.extend(load(&state, kind).await?);
    }
    let hits = query.apply(hits);

    Ok(Json(paginate(hits, query.page_number(), query.page_size())))
}

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/search", get(search))
}
