use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::{Map, Value};
use tower::{Layer, Service};
use warden_auth::{
    error::{Error, ErrorType},
    token::TokenAuthority,
};
use warden_types::{error::ApiError, request::Request};

use crate::extract::FromRequest;

/// The authenticated principal, attached to the request by
/// [`AuthenticateService`] once its token passed all checks.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub user_id: String,
    pub user_info: Option<Map<String, Value>>,
}

impl FromRequest for Identity {
    fn from_request(req: &mut Request) -> Result<Self, ApiError> {
        req.extensions
            .get::<Identity>()
            .map(Clone::clone)
            .ok_or_else(ApiError::unauthorized)
    }
}

/// Authenticates every request, regardless of method: reads the configured
/// header, strips the bearer prefix when enabled, checks the token against
/// the authority (and its revocation store, if any) and attaches the
/// resulting [`Identity`]. Any failure aborts the request with 401.
#[derive(Clone)]
pub struct AuthenticateService<S> {
    inner: S,
    authority: Arc<TokenAuthority>,
}

impl<S> AuthenticateService<S> {
    pub fn new(inner: S, authority: Arc<TokenAuthority>) -> Self {
        Self { inner, authority }
    }
}

impl<S> Service<Request> for AuthenticateService<S>
where
    S: Service<Request, Error = ApiError> + Send + Clone + 'static,
    S::Future: Send,
    S::Response: Send + 'static,
{
    type Response = S::Response;

    type Error = ApiError;

    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request) -> Self::Future {
        let mut this = self.clone();
        Box::pin(async move {
            let token = extract_token(&this.authority, &req)?;
            let user = this
                .authority
                .check_token(&token)
                .await
                .map_err(ApiError::from)?;

            tracing::debug!(request = %req.id, user = %user.id, "request authenticated");
            req.extensions.insert(Identity {
                user_id: user.id,
                user_info: user.data,
            });

            this.inner.call(req).await
        })
    }
}

fn extract_token(authority: &TokenAuthority, req: &Request) -> Result<String, ApiError> {
    let not_found =
        || ApiError::from(Error::from(ErrorType::TokenNotFound(authority.header().to_string())));

    let value = req.header(authority.header()).ok_or_else(not_found)?;
    if authority.is_bearer() {
        // The bearer prefix is exactly 7 characters, trailing space included.
        value.get(7..).map(str::to_string).ok_or_else(not_found)
    } else {
        Ok(value.to_string())
    }
}

pub struct AuthenticateLayer {
    authority: Arc<TokenAuthority>,
}

impl AuthenticateLayer {
    #[must_use]
    pub fn new(authority: Arc<TokenAuthority>) -> Self {
        Self { authority }
    }
}

impl<S: Service<Request>> Layer<S> for AuthenticateLayer {
    type Service = AuthenticateService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthenticateService::new(inner, Arc::clone(&self.authority))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use http::Method;
    use tower::{service_fn, ServiceExt};
    use warden_auth::{options::TokenOptions, sign::SigningMethod};
    use warden_types::error::StatusCode;

    use super::*;

    fn authority(bearer: bool) -> Arc<TokenAuthority> {
        let options = TokenOptions {
            signing_method: SigningMethod::Hs256,
            hmac_key: Some("middleware-test-key".into()),
            private_key_path: None,
            public_key_path: None,
            token_duration: Duration::from_secs(60),
            header: "Authorization".into(),
            bearer,
        };
        Arc::new(TokenAuthority::new(options, None).expect("valid options"))
    }

    async fn identity_of(req: Request, authority: Arc<TokenAuthority>) -> Result<Identity, ApiError> {
        let service = AuthenticateService::new(
            service_fn(|mut req: Request| async move { Identity::from_request(&mut req) }),
            authority,
        );
        service.oneshot(req).await
    }

    #[tokio::test]
    async fn attaches_identity_from_bearer_header() {
        let authority = authority(true);
        let token = authority
            .generate_token("alice", None)
            .expect("token is issued");

        let mut req = Request::new(Method::POST, "/data/image");
        req.headers
            .insert("authorization".into(), format!("Bearer {token}"));

        let identity = identity_of(req, authority).await.expect("authenticated");
        assert_eq!(identity.user_id, "alice");
        assert_eq!(identity.user_info, None);
    }

    #[tokio::test]
    async fn accepts_raw_header_value_without_bearer_mode() {
        let authority = authority(false);
        let token = authority
            .generate_token("alice", None)
            .expect("token is issued");

        let mut req = Request::new(Method::GET, "/data/image");
        req.headers.insert("authorization".into(), token);

        let identity = identity_of(req, authority).await.expect("authenticated");
        assert_eq!(identity.user_id, "alice");
    }

    #[tokio::test]
    async fn missing_header_aborts_with_unauthorized() {
        // GET requests are authenticated like every other method.
        let req = Request::new(Method::GET, "/data/image");
        let err = identity_of(req, authority(true))
            .await
            .expect_err("must be rejected");
        assert_eq!(err.status_code, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn garbage_token_aborts_with_unauthorized() {
        let mut req = Request::new(Method::POST, "/data/image");
        req.headers
            .insert("authorization".into(), "Bearer not.a.token".into());

        let err = identity_of(req, authority(true))
            .await
            .expect_err("must be rejected");
        assert_eq!(err.status_code, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn header_shorter_than_bearer_prefix_aborts() {
        let mut req = Request::new(Method::POST, "/data/image");
        req.headers.insert("authorization".into(), "abc".into());

        let err = identity_of(req, authority(true))
            .await
            .expect_err("must be rejected");
        assert_eq!(err.status_code, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn identity_extraction_without_authentication_fails() {
        let mut req = Request::new(Method::GET, "/data/image");
        let err = Identity::from_request(&mut req).expect_err("no identity attached");
        assert_eq!(err.status_code, StatusCode::UNAUTHORIZED);
    }
}
