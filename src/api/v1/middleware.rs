use super::error::ApiErrorCode;
use crate::application_port::{AuthError, TokenMaker};
use crate::domain_model::Payload;
use std::sync::Arc;
use warp::{http, reject, Filter};

const BEARER_SCHEME: &str = "bearer";

/// Authenticate one request from its `Authorization` header value.
/// Pure over the token maker; one clock read inside `verify_token`.
pub fn authenticate(
    token_maker: &dyn TokenMaker,
    header: Option<&str>,
) -> Result<Payload, AuthError> {
    let header = header.ok_or(AuthError::MissingAuthorization)?;

    let mut fields = header.split_whitespace();
    let (scheme, token) = match (fields.next(), fields.next(), fields.next()) {
        (Some(scheme), Some(token), None) => (scheme, token),
        _ => return Err(AuthError::MalformedAuthorization),
    };
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return Err(AuthError::UnsupportedAuthorizationType);
    }

    token_maker.verify_token(token).map_err(AuthError::Token)
}

/// Warp filter that gates a route behind bearer auth and hands the verified
/// payload to the handler as an explicit argument.
pub fn with_auth(
    token_maker: Arc<dyn TokenMaker>,
) -> impl Filter<Extract = (Payload,), Error = warp::Rejection> + Clone {
    warp::header::optional::<String>(http::header::AUTHORIZATION.as_str()).and_then(
        move |header: Option<String>| {
            let token_maker = token_maker.clone();
            async move {
                authenticate(token_maker.as_ref(), header.as_deref())
                    .map_err(|e| reject::custom(ApiErrorCode::from(e)))
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::v1::recover_error;
    use crate::application_impl::JwtTokenMaker;
    use chrono::Duration;
    use warp::http::StatusCode;

    const KEY: &[u8] = b"0123456789abcdef0123456789abcdef";

    fn maker() -> Arc<dyn TokenMaker> {
        Arc::new(JwtTokenMaker::new(KEY).unwrap())
    }

    fn route(
        token_maker: Arc<dyn TokenMaker>,
    ) -> impl Filter<Extract = (impl warp::Reply,), Error = std::convert::Infallible> + Clone {
        warp::get()
            .and(warp::path("ping"))
            .and(with_auth(token_maker))
            .map(|payload: Payload| warp::reply::json(&payload.username))
            .recover(recover_error)
    }

    #[tokio::test]
    async fn accepts_valid_bearer_token() {
        let maker = maker();
        let (token, _) = maker.create_token("alice", Duration::minutes(1)).unwrap();

        let resp = warp::test::request()
            .path("/ping")
            .header("authorization", format!("Bearer {token}"))
            .reply(&route(maker))
            .await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(std::str::from_utf8(resp.body()).unwrap().contains("alice"));
    }

    #[tokio::test]
    async fn scheme_is_case_insensitive() {
        let maker = maker();
        let (token, _) = maker.create_token("alice", Duration::minutes(1)).unwrap();

        let resp = warp::test::request()
            .path("/ping")
            .header("authorization", format!("bearer {token}"))
            .reply(&route(maker))
            .await;

        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn rejects_missing_header() {
        let resp = warp::test::request()
            .path("/ping")
            .reply(&route(maker()))
            .await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn rejects_unsupported_scheme() {
        let maker = maker();
        let (token, _) = maker.create_token("alice", Duration::minutes(1)).unwrap();

        let resp = warp::test::request()
            .path("/ping")
            .header("authorization", format!("unsupported {token}"))
            .reply(&route(maker))
            .await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn rejects_malformed_header() {
        let maker = maker();
        let (token, _) = maker.create_token("alice", Duration::minutes(1)).unwrap();

        // Token only, no scheme field.
        let resp = warp::test::request()
            .path("/ping")
            .header("authorization", token)
            .reply(&route(maker))
            .await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn rejects_expired_token() {
        let maker = maker();
        let (token, _) = maker.create_token("alice", -Duration::minutes(1)).unwrap();

        let resp = warp::test::request()
            .path("/ping")
            .header("authorization", format!("Bearer {token}"))
            .reply(&route(maker))
            .await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn authenticate_reports_the_failing_check() {
        let maker = JwtTokenMaker::new(KEY).unwrap();

        assert!(matches!(
            authenticate(&maker, None),
            Err(AuthError::MissingAuthorization)
        ));
        assert!(matches!(
            authenticate(&maker, Some("Bearer a b")),
            Err(AuthError::MalformedAuthorization)
        ));
        assert!(matches!(
            authenticate(&maker, Some("Basic dXNlcjpwdw")),
            Err(AuthError::UnsupportedAuthorizationType)
        ));
        assert!(matches!(
            authenticate(&maker, Some("Bearer not-a-token")),
            Err(AuthError::Token(_))
        ));
    }
}
