
use serde::Serialize;
use yonsei_menu_api::Campus;

#[derive(Debug, Clone, Serialize)]
pub struct RestaurantData {
    pub campus: Campus,
    pub restaurants: Vec<RestaurantMenu>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantMenu {
    pub restaurant_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    pub menus: Vec<RestaurantMenuItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// km from campus
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RestaurantMenuItem {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// (latitude, longitude) of the campus center, the anchor for any
/// nearby-restaurant search
pub fn campus_coordinates(campus: Campus) -> (f64, f64) {
    match campus {
        Campus::Sinchon => (37.5640, 126.9370),
        Campus::Songdo => (37.3820, 126.6690),
    }
}

/// Restaurants around the campus. Still a stub: the menu-plan consumer does
/// its own location grounding, so nothing queries a places provider yet.
// TODO: query a places API (Naver/Kakao local search) around campus_coordinates
pub async fn fetch_nearby(campus: Campus, _limit: usize) -> Vec<RestaurantMenu> {
    let _anchor = campus_coordinates(campus);

    Vec::new()
}
