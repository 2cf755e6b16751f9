//! Listing catalogs
//!
//! A catalog fetches a whole collection with one GET, keeps it locally and
//! applies search/category/sort on the client. Admin writes go through the
//! catalog so the local copy stays in step with the server.

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::ListingQuery;
use shared::Listing;
use shared::models::{
    Destination, DestinationInput, Hotel, HotelInput, TourPackage, TourPackageInput, Transport,
    TransportInput,
};

use validator::Validate;

use crate::forms::{GALLERY_FIELD, ImageFile, multipart_form};
use crate::{ClientError, ClientResult, HttpClient};

/// A listing collection exposed by the API
pub trait Resource: DeserializeOwned + Listing + Clone {
    /// Path under the API base, e.g. `hotels`
    const PATH: &'static str;

    /// Form field the server reads uploaded images from
    const IMAGE_FIELD: &'static str = GALLERY_FIELD;

    /// Create/replace payload, checked locally before it is sent
    type Input: Serialize + Validate;
}

impl Resource for Destination {
    const PATH: &'static str = "destinations";
    type Input = DestinationInput;
}

impl Resource for TourPackage {
    const PATH: &'static str = "tour-packages";
    /// A tour has a single cover image
    const IMAGE_FIELD: &'static str = "image";
    type Input = TourPackageInput;
}

impl Resource for Hotel {
    const PATH: &'static str = "hotels";
    type Input = HotelInput;
}

impl Resource for Transport {
    const PATH: &'static str = "transports";
    type Input = TransportInput;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

/// Locally held listing collection
#[derive(Debug)]
pub struct Catalog<T: Resource> {
    http: HttpClient,
    items: Vec<T>,
    state: LoadState,
    query: ListingQuery,
}

impl<T: Resource> Catalog<T> {
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            items: Vec::new(),
            state: LoadState::Idle,
            query: ListingQuery::default(),
        }
    }

    /// Fetch the full collection; on failure the previous items are kept
    pub async fn refresh(&mut self) -> ClientResult<()> {
        self.state = LoadState::Loading;
        match self.http.get::<Vec<T>>(T::PATH).await {
            Ok(items) => {
                tracing::debug!(resource = T::PATH, count = items.len(), "Catalog loaded");
                self.items = items;
                self.state = LoadState::Loaded;
                Ok(())
            }
            Err(e) => {
                self.state = LoadState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Everything fetched, unfiltered
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn find(&self, id: i64) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn query(&self) -> &ListingQuery {
        &self.query
    }

    pub fn set_query(&mut self, query: ListingQuery) {
        self.query = query;
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.query.q = Some(text.into());
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.query.category = Some(category.into());
    }

    pub fn set_sort(&mut self, sort: impl Into<String>) {
        self.query.sort = Some(sort.into());
    }

    /// Items after the current search, category and sort
    pub fn visible(&self) -> Vec<&T> {
        self.query.select(&self.items)
    }

    /// Fetch one listing by id without touching the local collection
    pub async fn fetch(&self, id: i64) -> ClientResult<T> {
        self.http.get(&format!("{}/{id}", T::PATH)).await
    }

    /// Admin create; the new listing is appended locally
    ///
    /// An invalid input is returned as [`ClientError::Validation`] without
    /// any request being sent.
    pub async fn create(&mut self, input: &T::Input, images: Vec<ImageFile>) -> ClientResult<&T> {
        let form = Self::form(input, images)?;
        let created: T = self.http.send_multipart(Method::POST, T::PATH, form).await?;
        self.items.push(created);
        let last = self.items.len() - 1;
        Ok(&self.items[last])
    }

    /// Admin replace; the local copy is swapped in place
    pub async fn update(
        &mut self,
        id: i64,
        input: &T::Input,
        images: Vec<ImageFile>,
    ) -> ClientResult<&T> {
        let form = Self::form(input, images)?;
        let updated: T = self
            .http
            .send_multipart(Method::PUT, &format!("{}/{id}", T::PATH), form)
            .await?;
        let index = match self.items.iter().position(|item| item.id() == id) {
            Some(index) => {
                self.items[index] = updated;
                index
            }
            None => {
                self.items.push(updated);
                self.items.len() - 1
            }
        };
        Ok(&self.items[index])
    }

    /// Validate, then encode; gallery images go to the resource's image field
    fn form(input: &T::Input, images: Vec<ImageFile>) -> ClientResult<reqwest::multipart::Form> {
        shared::validation::check(input).map_err(ClientError::invalid_form)?;
        let files = images
            .into_iter()
            .map(|file| {
                if file.field == GALLERY_FIELD {
                    file.for_field(T::IMAGE_FIELD)
                } else {
                    file
                }
            })
            .collect();
        multipart_form(input, files)
    }

    /// One DELETE to `/{resource}/{id}`; on success exactly that id leaves the collection
    pub async fn delete(&mut self, id: i64) -> ClientResult<()> {
        let _: bool = self.http.delete(&format!("{}/{id}", T::PATH)).await?;
        self.items.retain(|item| item.id() != id);
        tracing::debug!(resource = T::PATH, id, "Listing deleted");
        Ok(())
    }
}

impl Catalog<Destination> {
    /// Destination with gallery images and per-highlight images in one request
    ///
    /// The i-th highlight image belongs to the i-th highlight of `input`.
    pub async fn full_create(
        &mut self,
        input: &DestinationInput,
        images: Vec<ImageFile>,
        highlight_images: Vec<ImageFile>,
    ) -> ClientResult<&Destination> {
        shared::validation::check(input).map_err(ClientError::invalid_form)?;
        let files = images
            .into_iter()
            .map(|f| f.for_field(GALLERY_FIELD))
            .chain(highlight_images.into_iter().map(|f| f.for_field("highlightImages[]")))
            .collect();
        let form = multipart_form(input, files)?;
        let created: Destination = self
            .http
            .send_multipart(Method::POST, "destinations/full-create", form)
            .await?;
        self.items.push(created);
        let last = self.items.len() - 1;
        Ok(&self.items[last])
    }
}
