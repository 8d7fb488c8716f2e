//! `HttpApi` and `Console` against an in-process HTTP server

use envmon_core::prelude::*;
use envmon_core::MarkerConfig;
use envmon_reference::{CollectionSource, FetchError};
use envmon_session::{AuthService, AuthenticationError, User, LOGIN_ROUTE};
use envmon_test_utils::{
    monitor_type_groups_json, monitors_json, operator_user, tables_json, PASSWORD,
};
use std::net::SocketAddr;
use std::time::Duration;
use warp::http::StatusCode;
use warp::Filter;

fn service() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let monitors = warp::path("Monitors")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| warp::reply::json(&monitors_json()));

    let monitor_types = warp::path("MonitorType")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| warp::reply::with_status("database down", StatusCode::INTERNAL_SERVER_ERROR));

    let groups = warp::path("MonitorTypeGroups")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| warp::reply::json(&monitor_type_groups_json()));

    let tables = warp::path("Tables")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| warp::reply::json(&tables_json()));

    let garbled = warp::path("Garbled")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| "not json at all");

    let login = warp::path("login")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json::<Credentials>())
        .map(|credentials: Credentials| {
            if credentials.username == "operator" && credentials.password == PASSWORD {
                warp::reply::with_status(warp::reply::json(&operator_user()), StatusCode::OK)
            } else {
                warp::reply::with_status(
                    warp::reply::json(&serde_json::json!({"ok": false})),
                    StatusCode::UNAUTHORIZED,
                )
            }
        });

    monitors
        .or(monitor_types)
        .or(groups)
        .or(tables)
        .or(garbled)
        .or(login)
}

fn spawn_service() -> SocketAddr {
    let (addr, server) = warp::serve(service()).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    addr
}

fn api(addr: SocketAddr) -> HttpApi {
    HttpApi::new(&format!("http://{addr}/"), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn fetch_collection() {
    let api = api(spawn_service());
    let body = api.fetch("/Monitors").await.unwrap();
    assert_eq!(body, monitors_json());
}

#[tokio::test]
async fn fetch_maps_failures() {
    let api = api(spawn_service());

    assert_eq!(
        api.fetch("/MonitorType").await,
        Err(FetchError::status("/MonitorType", 500))
    );
    assert_eq!(
        api.fetch("/Nowhere").await,
        Err(FetchError::status("/Nowhere", 404))
    );
    assert!(matches!(
        api.fetch("/Garbled").await,
        Err(FetchError::Decode { .. })
    ));
}

#[tokio::test]
async fn fetch_from_closed_port_is_transport_error() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let result = api(addr).fetch("/Monitors").await;
    assert!(matches!(result, Err(FetchError::Transport { .. })));
}

#[tokio::test]
async fn authenticate() {
    let api = api(spawn_service());

    let user: User = api
        .authenticate(&Credentials::new("operator", PASSWORD))
        .await
        .unwrap();
    assert_eq!(user, operator_user());

    assert_eq!(
        api.authenticate(&Credentials::new("operator", "wrong-password")).await,
        Err(AuthenticationError::Rejected)
    );
}

#[tokio::test]
async fn console_over_http() {
    let addr = spawn_service();
    let config = ConsoleConfig::new()
        .with_base_url(format!("http://{addr}"))
        .with_marker(MarkerConfig::Memory { ttl_secs: None });
    let console = Console::from_config(&config).unwrap();

    let outcome = console.navigate("/report");
    assert_eq!(outcome.route().name, LOGIN_ROUTE);

    let landing = console
        .login(&Credentials::new("operator", PASSWORD))
        .await
        .unwrap();
    assert_eq!(
        landing,
        NavigationOutcome::Proceed(console.routes().get("report").unwrap().clone())
    );

    let sidebar = console.sidebar();
    let routes = sidebar.routes();
    assert!(routes.contains(&"history-data"));
    assert!(!routes.contains(&"realtime-data"));

    let report = console.reference().load_all().await;
    let failed: Vec<&str> = report.failures().map(|(name, _)| name).collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(console.reference().monitors.all().len(), 2);
    assert!(console.reference().monitor_types.all().is_empty());

    console.logout();
    assert!(console.navigate("report").is_redirect());
}
