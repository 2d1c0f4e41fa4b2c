use crate::{config::Config, state::AppState};
use anyhow::anyhow;
use axum::{
    error_handling::HandleErrorLayer, http::StatusCode, routing::get, BoxError, Router,
};
use std::time::Duration;
use tower::{buffer::BufferLayer, limit::RateLimitLayer, ServiceBuilder};
use tower_governor::{
    errors::display_error, governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor,
    GovernorLayer,
};
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use super::{handlers::*, index::index};

pub fn initialize_router(state: AppState) -> anyhow::Result<Router> {
    let config: &Config = &state.config;

    let error_handler = || {
        ServiceBuilder::new().layer(HandleErrorLayer::new(|err: BoxError| async move {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Unhandled error: {}", err),
            )
        }))
    };

    let global_rate_limit = |req_per_sec: u64| {
        ServiceBuilder::new()
            .layer(error_handler())
            .layer(BufferLayer::new(1024))
            .layer(RateLimitLayer::new(req_per_sec.max(1), Duration::from_secs(1)))
    };

    let governor_config = GovernorConfigBuilder::default()
        .per_second(1)
        .burst_size(config.per_ip_burst)
        .use_headers()
        .key_extractor(SmartIpKeyExtractor)
        .finish()
        .ok_or_else(|| anyhow!("Invalid per-IP rate limit: burst {}", config.per_ip_burst))?;

    // Rejections from the per-IP limiter become 429 responses
    let rate_limit_per_ip = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(|err: BoxError| async move {
            display_error(err)
        }))
        .layer(GovernorLayer {
            config: Box::leak(Box::new(governor_config)),
        });

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().include_headers(false))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let global_limit = config.global_rate_limit;

    let router = Router::new()
        .route("/health", get(health_check))
        .route("/endpoints", get(|| async { index() }))
        // Every other path and method is the authentication page
        .fallback(authenticate_request)
        .layer(global_rate_limit(global_limit).layer(rate_limit_per_ip))
        .layer(trace_layer)
        .with_state(state);

    Ok(router)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidationMode;
    use aws_subject_token::{sts_url, SubjectToken};
    use axum::{
        body::Body,
        http::{header, Method, Request},
        response::Response,
    };
    use serde_json::Value;
    use tower::ServiceExt;
    use url::Url;
    use wiremock::matchers::{any, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ARN: &str = "arn:aws:sts::123456789012:assumed-role/Deployer/session";

    fn caller_identity_xml(arn: Option<&str>) -> String {
        let arn = arn
            .map(|arn| format!("<Arn>{arn}</Arn>"))
            .unwrap_or_default();
        format!(
            "<GetCallerIdentityResponse xmlns=\"https://sts.amazonaws.com/doc/2011-06-15/\">\
             <GetCallerIdentityResult>{arn}<UserId>AROAEXAMPLE:session</UserId>\
             <Account>123456789012</Account></GetCallerIdentityResult>\
             </GetCallerIdentityResponse>"
        )
    }

    fn subject_token(url: String) -> String {
        SubjectToken::new(
            url,
            "POST",
            vec![("x-amz-date".to_string(), "20240101T000000Z".to_string())],
        )
        .encode()
        .unwrap()
    }

    fn router(config: Config) -> Router {
        initialize_router(AppState::new(config).unwrap()).unwrap()
    }

    fn gcp_router(upstream: &MockServer) -> Router {
        router(Config {
            gcp_sts_url: Url::parse(&format!("{}/v1/token", upstream.uri())).unwrap(),
            ..Config::default()
        })
    }

    fn aws_router(upstream: &MockServer) -> Router {
        router(Config {
            validation_mode: ValidationMode::Aws,
            aws_sts_endpoint: Some(Url::parse(&upstream.uri()).unwrap()),
            ..Config::default()
        })
    }

    fn request(uri: &str, authorization: Option<&str>, json: bool) -> Request<Body> {
        let mut builder = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header("x-forwarded-for", "203.0.113.7");
        if let Some(authorization) = authorization {
            builder = builder.header(header::AUTHORIZATION, authorization);
        }
        if json {
            builder = builder.header(header::ACCEPT, "application/json");
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_no_token_page() {
        let upstream = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&upstream)
            .await;

        let response = gcp_router(&upstream)
            .oneshot(request("/any/path", None, false))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
        let body = body_text(response).await;
        assert!(body.contains("<title>AWS Token to GCP Auth Server</title>"));
        assert!(body.contains("<p>There was no authentication token</p>"));
    }

    #[tokio::test]
    async fn test_any_method_is_authenticated() {
        let upstream = MockServer::start().await;
        let request = Request::builder()
            .method(Method::DELETE)
            .uri("/resource")
            .header("x-forwarded-for", "203.0.113.7")
            .body(Body::empty())
            .unwrap();

        let response = gcp_router(&upstream).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response)
            .await
            .contains("There was no authentication token"));
    }

    #[tokio::test]
    async fn test_gcp_mode_accepted() {
        let upstream = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "ya29.secret",
                "token_type": "Bearer",
                "expires_in": 3599
            })))
            .expect(1)
            .mount(&upstream)
            .await;

        let response = gcp_router(&upstream)
            .oneshot(request("/", Some("aws-fed-id %7B%7D"), false))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains(
            "The request contained a valid AWS authentication token according to google"
        ));
        assert!(!body.contains("ya29.secret"));
    }

    #[tokio::test]
    async fn test_gcp_mode_rejected() {
        let upstream = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "invalid_grant",
                "error_description": "The AWS signature is invalid."
            })))
            .mount(&upstream)
            .await;

        let response = gcp_router(&upstream)
            .oneshot(request("/", Some("aws-fed-id %7B%7D"), true))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["status"], "error");
        assert_eq!(body["error"], "The AWS authentication token was rejected");
    }

    #[tokio::test]
    async fn test_aws_mode_reports_principal() {
        let upstream = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string(caller_identity_xml(Some(ARN))))
            .expect(1)
            .mount(&upstream)
            .await;

        let token = subject_token(sts_url("us-east-1"));
        let authorization = format!("aws-fed-id {token}");

        let response = aws_router(&upstream)
            .oneshot(request("/", Some(&authorization), false))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains(&format!(
            "The request contained a valid AWS authentication token for role ARN: {ARN}"
        )));
    }

    #[tokio::test]
    async fn test_aws_mode_json() {
        let upstream = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string(caller_identity_xml(Some(ARN))))
            .mount(&upstream)
            .await;

        let authorization = format!("aws-fed-id {}", subject_token(sts_url("eu-west-1")));
        let response = aws_router(&upstream)
            .oneshot(request("/", Some(&authorization), true))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["authenticated"], true);
        assert_eq!(body["validated_by"], "aws");
        assert_eq!(body["principal"]["arn"], ARN);
        assert_eq!(body["principal"]["account"], "123456789012");
    }

    #[tokio::test]
    async fn test_aws_mode_missing_arn() {
        let upstream = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string(caller_identity_xml(None)))
            .mount(&upstream)
            .await;

        let authorization = format!("aws-fed-id {}", subject_token(sts_url("us-east-1")));
        let response = aws_router(&upstream)
            .oneshot(request("/", Some(&authorization), false))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert!(body_text(response)
            .await
            .contains("The identity provider returned an unexpected response"));
    }

    #[tokio::test]
    async fn test_aws_mode_disallowed_target() {
        let upstream = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&upstream)
            .await;

        let token = subject_token(format!("{}/?Action=GetCallerIdentity", upstream.uri()));
        let authorization = format!("aws-fed-id {token}");
        let response = aws_router(&upstream)
            .oneshot(request("/", Some(&authorization), false))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response)
            .await
            .contains("The AWS authentication token is malformed"));
    }

    #[tokio::test]
    async fn test_unreachable_upstream() {
        let response = router(Config {
            gcp_sts_url: Url::parse("http://127.0.0.1:9/v1/token").unwrap(),
            upstream_timeout_secs: 2,
            ..Config::default()
        })
        .oneshot(request("/", Some("aws-fed-id %7B%7D"), false))
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert!(body_text(response)
            .await
            .contains("The identity provider could not be reached"));
    }

    #[tokio::test]
    async fn test_health_and_endpoints() {
        let upstream = MockServer::start().await;
        let app = aws_router(&upstream);

        let response = app
            .clone()
            .oneshot(request("/health", None, false))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["mode"], "aws");
        assert!(body["timestamp"].is_string());

        let response = app
            .oneshot(request("/endpoints", None, false))
            .await
            .unwrap();
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["endpoints"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_per_ip_burst() {
        let upstream = MockServer::start().await;
        let app = router(Config {
            gcp_sts_url: Url::parse(&upstream.uri()).unwrap(),
            per_ip_burst: 2,
            ..Config::default()
        });

        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(request("/", None, false))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app.oneshot(request("/", None, false)).await.unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_zero_burst_is_rejected() {
        let state = AppState::new(Config {
            per_ip_burst: 0,
            ..Config::default()
        })
        .unwrap();
        assert!(initialize_router(state).is_err());
    }
}
