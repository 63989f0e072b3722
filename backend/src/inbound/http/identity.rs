//! Caller identity extraction.
//!
//! Authentication happens upstream: the gateway in front of this service
//! validates the caller and forwards the numeric user id in the `X-User-Id`
//! header. Handlers that act on behalf of a user take an
//! [`AuthenticatedUser`] argument and never read the header themselves.

use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};
use tracing::warn;

use crate::domain::{Error, UserId};

/// Header carrying the authenticated user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// User on whose behalf the request runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(UserId);

impl AuthenticatedUser {
    /// Identifier of the caller.
    pub const fn user_id(self) -> UserId {
        self.0
    }

    fn from_headers(req: &HttpRequest) -> Result<Self, Error> {
        let raw = req
            .headers()
            .get(USER_ID_HEADER)
            .ok_or_else(|| Error::unauthorized("login required"))?;
        let id = raw
            .to_str()
            .ok()
            .and_then(|value| value.parse::<UserId>().ok())
            .ok_or_else(|| {
                warn!(header = USER_ID_HEADER, "rejected malformed user id header");
                Error::unauthorized("invalid user identity")
            })?;
        Ok(Self(id))
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::from_headers(req))
    }
}
