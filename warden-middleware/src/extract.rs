use warden_types::{error::ApiError, request::Request};

/// Extraction of a middleware-attached attribute from a request, for use by
/// downstream handlers.
pub trait FromRequest: Sized {
    /// Perform the extraction.
    ///
    /// # Errors
    ///
    /// Returns error if the extraction from the [`Request`] was unsuccessful.
    fn from_request(req: &mut Request) -> Result<Self, ApiError>;
}
