
use axum::{
    extract::{FromRef, Query, State},
    http::StatusCode,
    routing::get,
    Json,
    Router,
};

use chrono::NaiveDate;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use yonsei_menu_api::{CafeteriaSnapshot, Campus};

use crate::config::Config;

use self::data::MenuManager;
use self::restaurants::RestaurantData;

mod data;
mod restaurants;

#[derive(Clone, FromRef)]
struct AppState {
    menus: MenuManager,
}

impl AppState {
    fn new(config: &Config) -> Self {
        Self { menus: MenuManager::new(config.menu_source.clone()) }
    }
}

pub fn make_router(config: &Config) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/cafeteria", get(cafeteria_menus))
        .route("/api/cafeteria/names", get(cafeteria_names))
        .route("/api/restaurants", get(nearby_restaurants))
        .with_state(AppState::new(config))
        .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive())
}

type RouteError = (StatusCode, Json<ErrorBody>);

#[derive(Debug, serde::Serialize)]
struct ErrorBody {
    error: String,
}

fn reject(status: StatusCode, error: impl Into<String>) -> RouteError {
    (status, Json(ErrorBody { error: error.into() }))
}

/// campus comes in as one of the two full display literals; anything else is
/// a client error before we touch the scraper
fn parse_campus(campus: &str) -> Result<Campus, RouteError> {
    campus.parse::<Campus>()
        .map_err(|err| reject(StatusCode::BAD_REQUEST, err.to_string()))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "message": "cafeteria menu server is running",
    }))
}

#[derive(Debug, serde::Deserialize)]
struct CafeteriaQuery {
    campus: String,
    date: Option<NaiveDate>,
}

async fn cafeteria_menus(
    Query(q): Query<CafeteriaQuery>,
    State(menus): State<MenuManager>,
) -> Result<Json<CafeteriaSnapshot>, RouteError> {
    let campus = parse_campus(&q.campus)?;
    let snapshot = menus.get_menus(campus, q.date).await.ok_or_else(|| {
        reject(StatusCode::NOT_FOUND, "Failed to fetch cafeteria menus")
    })?;
    Ok(Json(snapshot))
}

#[derive(Debug, serde::Deserialize)]
struct CampusQuery {
    campus: String,
}

async fn cafeteria_names(
    Query(q): Query<CampusQuery>,
) -> Result<Json<Vec<&'static str>>, RouteError> {
    let campus = parse_campus(&q.campus)?;
    Ok(Json(campus.cafeteria_names().to_vec()))
}

#[derive(Debug, serde::Deserialize)]
struct RestaurantQuery {
    campus: String,
    limit: Option<usize>,
}

async fn nearby_restaurants(
    Query(q): Query<RestaurantQuery>,
) -> Result<Json<RestaurantData>, RouteError> {
    const DEFAULT_LIMIT: usize = 20;

    let campus = parse_campus(&q.campus)?;
    let restaurants = restaurants::fetch_nearby(
        campus, q.limit.unwrap_or(DEFAULT_LIMIT),
    ).await;
    Ok(Json(RestaurantData { campus, restaurants }))
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use crate::config::MenuSourceConfig;

    // "신촌 캠퍼스" percent-encoded for use in a request uri
    const SINCHON_Q: &str = "%EC%8B%A0%EC%B4%8C%20%EC%BA%A0%ED%8D%BC%EC%8A%A4";

    fn router_for(server: &MockServer) -> Router {
        let config = Config {
            menu_source: MenuSourceConfig {
                url: format!("{}/_custom/yonsei/m/menu.jsp", server.uri()),
                ..MenuSourceConfig::default()
            },
            ..Config::default()
        };
        make_router(&config)
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(
            Request::builder().uri(uri).body(Body::empty()).unwrap(),
        ).await.unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn campus_literals_are_validated() {
        assert_eq!(parse_campus("신촌 캠퍼스").unwrap(), Campus::Sinchon);
        assert_eq!(parse_campus("국제 캠퍼스 (송도)").unwrap(), Campus::Songdo);

        let (status, body) = parse_campus("Sinchon").unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.error.contains("신촌 캠퍼스"));
    }

    #[tokio::test]
    async fn health_endpoint_reports_ok() {
        let server = MockServer::start().await;
        let (status, body) = get(router_for(&server), "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn unknown_campus_is_a_client_error() {
        let server = MockServer::start().await;

        let (status, body) = get(
            router_for(&server), "/api/cafeteria?campus=Sinchon",
        ).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Invalid campus parameter"));
        // the scraper must never have been consulted
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unreachable_menu_source_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
        .mount(&server).await;

        let (status, body) = get(
            router_for(&server),
            &format!("/api/cafeteria?campus={SINCHON_Q}"),
        ).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Failed to fetch cafeteria menus");
    }

    #[tokio::test]
    async fn menus_round_trip_through_the_router() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/_custom/yonsei/m/menu.jsp"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<script>var weekData = [[{"campusName":"신촌","refectory":[{"name":"학생회관","type":[{"name":"중식","item":[{"name":"제육볶음\n","price":"5,500"}]}]}]}],null,null,null,null,null,null];</script>"#,
            ))
        .mount(&server).await;

        let (status, body) = get(
            router_for(&server),
            // 2025-03-03 is a Monday
            &format!("/api/cafeteria?campus={SINCHON_Q}&date=2025-03-03"),
        ).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["campus"], "신촌 캠퍼스");
        assert_eq!(body["date"], "2025-03-03");
        assert_eq!(body["cafeterias"][0]["cafeteriaName"], "학생회관 - 중식");
        assert_eq!(body["cafeterias"][0]["mealType"], "lunch");
        assert_eq!(body["cafeterias"][0]["menus"][0]["name"], "제육볶음 ");
        assert_eq!(body["cafeterias"][0]["menus"][0]["price"], 5500);
    }

    #[tokio::test]
    async fn cafeteria_name_lookup_is_static() {
        let server = MockServer::start().await;

        let (status, body) = get(
            router_for(&server),
            &format!("/api/cafeteria/names?campus={SINCHON_Q}"),
        ).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 5);
        assert_eq!(body[0], "학생회관");
        // display names come from a fixed table, not the scrape
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn restaurant_stub_round_trips() {
        let server = MockServer::start().await;

        let (status, body) = get(
            router_for(&server),
            &format!("/api/restaurants?campus={SINCHON_Q}&limit=5"),
        ).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["campus"], "신촌 캠퍼스");
        assert_eq!(body["restaurants"], serde_json::json!([]));
    }
}
