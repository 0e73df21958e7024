use std::sync::Arc;

use futures::future::BoxFuture;
use tower::{Layer, Service};
use warden_rbac::access::AccessControl;
use warden_types::{error::ApiError, operation::Operation, request::Request};

use crate::extract::FromRequest;

/// The authorization requirement computed for a route by
/// [`AuthorizeService`]: whether authorization is needed at all and, if so,
/// which roles hold it. Requests whose method maps to no operation carry no
/// requirement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteAuthz {
    pub role_ids: Vec<i64>,
    pub need_auth: bool,
}

impl FromRequest for RouteAuthz {
    fn from_request(req: &mut Request) -> Result<Self, ApiError> {
        // An absent requirement means the route is unrestricted.
        Ok(req.extensions.get::<RouteAuthz>().cloned().unwrap_or_default())
    }
}

/// Derives the [`Operation`] from the request method and attaches the
/// policy engine's requirement for it. Methods outside the CRUD mapping
/// skip authorization entirely. The decision itself is left to downstream
/// handlers, which combine the requirement with the authenticated identity.
#[derive(Clone)]
pub struct AuthorizeService<S> {
    inner: S,
    access: Arc<AccessControl>,
}

impl<S> AuthorizeService<S> {
    pub fn new(inner: S, access: Arc<AccessControl>) -> Self {
        Self { inner, access }
    }
}

impl<S> Service<Request> for AuthorizeService<S>
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
            if let Some(op) = Operation::from_method(&req.method) {
                let (role_ids, need_auth) = this.access.require(&req.path, op);
                tracing::debug!(
                    request = %req.id,
                    path = %req.path,
                    ?op,
                    need_auth,
                    "route authorization requirement computed"
                );
                req.extensions.insert(RouteAuthz {
                    role_ids,
                    need_auth,
                });
            }

            this.inner.call(req).await
        })
    }
}

pub struct AuthorizeLayer {
    access: Arc<AccessControl>,
}

impl AuthorizeLayer {
    #[must_use]
    pub fn new(access: Arc<AccessControl>) -> Self {
        Self { access }
    }
}

impl<S: Service<Request>> Layer<S> for AuthorizeLayer {
    type Service = AuthorizeService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthorizeService::new(inner, Arc::clone(&self.access))
    }
}
