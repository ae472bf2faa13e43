use actix_web::{dev::Payload, web, FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{ready, Ready};
use serde::Deserialize;
use uuid::Uuid;

use crate::entities::token::Claims;
use crate::errors::{AppError, AuthError};
use crate::use_cases::editor::Confirmation;

/// Claims of an authenticated caller, placed in the request by the auth middleware.
/// Returns 401 when absent.
#[derive(Debug)]
pub struct AuthClaims(pub Claims);

impl FromRequest for AuthClaims {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<Claims>() {
            Some(claims) => ready(Ok(AuthClaims(claims.clone()))),
            None => ready(Err(AuthError::MissingCredentials.into())),
        }
    }
}

/// Claims of the administrator. 401 without a token, 403 for other users.
#[derive(Debug)]
pub struct AdminClaims(pub Claims);

impl FromRequest for AdminClaims {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<Claims>() {
            Some(claims) if claims.admin => ready(Ok(AdminClaims(claims.clone()))),
            Some(_) => ready(Err(AuthError::Forbidden("Admin access required".into()).into())),
            None => ready(Err(AuthError::MissingCredentials.into())),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfirmQuery {
    #[serde(default)]
    confirm: bool,
}

/// `?confirm=true` on destructive requests. Anything else counts as declined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confirm(pub Confirmation);

impl FromRequest for Confirm {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let query = web::Query::<ConfirmQuery>::from_query(req.query_string())
            .map(web::Query::into_inner)
            .unwrap_or_default();
        ready(Ok(Confirm(Confirmation::from(query.confirm))))
    }
}

#[derive(Debug, Default, Deserialize)]
struct ScopeQuery {
    category_id: Option<String>,
}

/// Parent scope of nested collections, read from `?category_id=`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scope(pub Option<Uuid>);

impl FromRequest for Scope {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let query = web::Query::<ScopeQuery>::from_query(req.query_string())
            .map(web::Query::into_inner)
            .unwrap_or_default();

        let scope: Result<Scope, actix_web::Error> = match query.category_id.as_deref().map(str::trim) {
            None | Some("") => Ok(Scope(None)),
            Some(raw) => Uuid::parse_str(raw)
                .map(|id| Scope(Some(id)))
                .map_err(|_| AppError::InvalidInput("Invalid category_id".into()).into()),
        };
        ready(scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_rt::test]
    async fn confirmation_requires_an_explicit_true() {
        let req = TestRequest::default().uri("/x?confirm=true").to_http_request();
        assert_eq!(Confirm::extract(&req).await.unwrap(), Confirm(Confirmation::Confirmed));

        for uri in ["/x", "/x?confirm=false", "/x?confirm=yes"] {
            let req = TestRequest::default().uri(uri).to_http_request();
            assert_eq!(Confirm::extract(&req).await.unwrap(), Confirm(Confirmation::Declined));
        }
    }

    #[actix_rt::test]
    async fn scope_parses_category_id() {
        let id = Uuid::new_v4();
        let req = TestRequest::default().uri(&format!("/skills?category_id={id}")).to_http_request();
        assert_eq!(Scope::extract(&req).await.unwrap(), Scope(Some(id)));

        let req = TestRequest::default().uri("/skills?category_id=nope").to_http_request();
        assert!(Scope::extract(&req).await.is_err());
    }

    #[actix_rt::test]
    async fn admin_claims_need_the_admin_flag() {
        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(Claims {
            sub: Uuid::new_v4().to_string(),
            email: "guest@example.com".into(),
            admin: false,
            jti: "j".into(),
            token_type: crate::entities::token::TokenType::Access,
            exp: 0,
            iat: 0,
        });
        assert!(AdminClaims::extract(&req).await.is_err());
        assert!(AuthClaims::extract(&req).await.is_ok());
    }
}
