mod support;

use std::time::Duration;

use elx_net::{Config, ElxError, VersionResolver};
use support::{refused_url, Route, StubServer};

fn config(primary: String, fallback: String) -> Config {
    let mut config = Config::with_install_dir("/nonexistent/elx");
    config.registry_url = primary;
    config.releases_api_url = fallback;
    config.require_https = false;
    config
}

#[tokio::test]
async fn primary_version_is_returned_without_touching_fallback() {
    let server = StubServer::start(vec![
        ("/electron/latest", Route::Json(200, r#"{"version":"28.0.0"}"#.into())),
        ("/releases/latest", Route::Json(200, r#"{"tag_name":"v27.0.0"}"#.into())),
    ])
    .await;

    let resolver = VersionResolver::new(&config(
        server.url("/electron/latest"),
        server.url("/releases/latest"),
    ))
    .unwrap();

    assert_eq!(resolver.latest().await.unwrap(), "28.0.0");
    assert_eq!(server.hits("/releases/latest"), 0);
}

#[tokio::test]
async fn transport_failure_falls_back_to_tag_name_verbatim() {
    let server = StubServer::start(vec![(
        "/releases/latest",
        Route::Json(200, r#"{"tag_name":"v28.0.1"}"#.into()),
    )])
    .await;

    let resolver = VersionResolver::new(&config(
        refused_url("/electron/latest").await,
        server.url("/releases/latest"),
    ))
    .unwrap();

    assert_eq!(resolver.latest().await.unwrap(), "v28.0.1");
    assert_eq!(server.hits("/releases/latest"), 1);
}

#[tokio::test]
async fn primary_timeout_falls_back() {
    let server = StubServer::start(vec![
        ("/electron/latest", Route::Hang),
        ("/releases/latest", Route::Json(200, r#"{"tag_name":"v28.0.1"}"#.into())),
    ])
    .await;

    let mut config = config(server.url("/electron/latest"), server.url("/releases/latest"));
    config.primary_timeout = Duration::from_millis(200);
    let resolver = VersionResolver::new(&config).unwrap();

    assert_eq!(resolver.latest().await.unwrap(), "v28.0.1");
}

#[tokio::test]
async fn missing_version_field_does_not_fall_back() {
    let server = StubServer::start(vec![
        ("/electron/latest", Route::Json(200, r#"{"name":"electron"}"#.into())),
        ("/releases/latest", Route::Json(200, r#"{"tag_name":"v28.0.1"}"#.into())),
    ])
    .await;

    let resolver = VersionResolver::new(&config(
        server.url("/electron/latest"),
        server.url("/releases/latest"),
    ))
    .unwrap();

    let result = resolver.latest().await;
    assert!(matches!(result, Err(ElxError::ResolutionError(_))));
    assert_eq!(server.hits("/electron/latest"), 1);
    assert_eq!(server.hits("/releases/latest"), 0);
}

#[tokio::test]
async fn fallback_without_tag_name_is_a_resolution_error() {
    let server = StubServer::start(vec![(
        "/releases/latest",
        Route::Json(200, r#"{"message":"rate limited"}"#.into()),
    )])
    .await;

    let resolver = VersionResolver::new(&config(
        refused_url("/electron/latest").await,
        server.url("/releases/latest"),
    ))
    .unwrap();

    assert!(matches!(
        resolver.latest().await,
        Err(ElxError::ResolutionError(_))
    ));
}

#[tokio::test]
async fn both_endpoints_unreachable_is_a_network_error() {
    let resolver = VersionResolver::new(&config(
        refused_url("/electron/latest").await,
        refused_url("/releases/latest").await,
    ))
    .unwrap();

    let err = resolver.latest().await.unwrap_err();
    assert!(err.is_network(), "unexpected error: {err}");
}
