//! Ceylon Client - typed client for the Ceylon Travels API
//!
//! Listing catalogs with local search/filter/sort, a session context for
//! login state, and the registration and booking forms.

pub mod catalog;
pub mod config;
pub mod error;
pub mod forms;
pub mod http;
pub mod session;

pub use catalog::{Catalog, LoadState, Resource};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use forms::{
    ImageFile, RegistrationForm, TourBookingForm, TransportBookingForm, multipart_form,
};
pub use http::HttpClient;
pub use session::{AuthSession, FileStore, MemoryStore, Route, Session, SessionStore};

// Re-export shared types for convenience
pub use shared::client::{ChatReply, ChatRequest, LoginResponse, UserInfo};
pub use shared::{FieldErrors, ListingQuery, Page};

use reqwest::Method;
use serde::Serialize;
use shared::models::{
    Destination, Hotel, ListingKind, SearchHit, TourBooking, TourPackage, Transport,
    TransportBooking,
};

/// Stored image as returned by the upload endpoint
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    pub path: String,
    pub filename: String,
    pub original_name: String,
    pub size: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchParams<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<&'static str>,
    #[serde(flatten)]
    query: &'a ListingQuery,
}

/// Entry point: one HTTP client and the session that owns its token
#[derive(Debug)]
pub struct CeylonClient {
    config: ClientConfig,
    http: HttpClient,
    session: Session,
}

impl CeylonClient {
    /// Client whose remembered logins persist in `local`
    pub fn new(config: ClientConfig, local: Box<dyn SessionStore>) -> ClientResult<Self> {
        let http = config.build_http_client()?;
        let session = Session::new(http.clone(), local);
        Ok(Self {
            config,
            http,
            session,
        })
    }

    /// Client with no persistence; every login ends with the process
    pub fn in_memory(config: ClientConfig) -> ClientResult<Self> {
        Self::new(config, Box::new(MemoryStore::new()))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    // ========== Catalogs ==========

    pub fn catalog<T: Resource>(&self) -> Catalog<T> {
        Catalog::new(self.http.clone())
    }

    pub fn destinations(&self) -> Catalog<Destination> {
        self.catalog()
    }

    pub fn tour_packages(&self) -> Catalog<TourPackage> {
        self.catalog()
    }

    pub fn hotels(&self) -> Catalog<Hotel> {
        self.catalog()
    }

    pub fn transports(&self) -> Catalog<Transport> {
        self.catalog()
    }

    /// Server-side search across listing kinds; `None` searches all of them
    pub async fn search(
        &self,
        kind: Option<ListingKind>,
        query: &ListingQuery,
    ) -> ClientResult<Page<SearchHit>> {
        let params = SearchParams {
            kind: kind.map(|k| k.as_str()),
            query,
        };
        self.http.get_with_query("search", &params).await
    }

    // ========== Accounts and bookings ==========

    pub async fn register(&self, form: &RegistrationForm) -> ClientResult<Route> {
        form.submit(&self.http).await
    }

    pub async fn book_tour(&self, form: &TourBookingForm) -> ClientResult<TourBooking> {
        form.submit(&self.http).await
    }

    pub async fn book_transport(&self, form: &TransportBookingForm) -> ClientResult<TransportBooking> {
        form.submit(&self.http).await
    }

    /// Own tour bookings; every booking for admins
    pub async fn tour_bookings(&self) -> ClientResult<Vec<TourBooking>> {
        self.http.get("tour-packages/bookings").await
    }

    pub async fn transport_bookings(&self) -> ClientResult<Vec<TransportBooking>> {
        self.http.get("transports/bookings").await
    }

    // ========== Media and chat ==========

    /// Upload one image (admin) and get back its `/uploads/...` path
    pub async fn upload_image(&self, image: ImageFile) -> ClientResult<UploadedImage> {
        let form = reqwest::multipart::Form::new().part(
            "file",
            reqwest::multipart::Part::bytes(image.bytes).file_name(image.file_name),
        );
        self.http.send_multipart(Method::POST, "uploads", form).await
    }

    /// Absolute URL for a stored image path
    pub fn image_url(&self, path: &str) -> String {
        self.config.asset_url(path)
    }

    /// Ask the travel assistant; error replies surface as the error message
    pub async fn chat(&self, message: &str) -> ClientResult<String> {
        let reply: ChatReply = self.http.post("chatbot", &ChatRequest::new(message)).await?;
        Ok(reply.reply)
    }
}
