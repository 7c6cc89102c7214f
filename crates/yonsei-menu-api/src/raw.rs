
use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

/// weekly payload embedded in the menu page, Monday first.
/// days with no service are null or missing entirely.
pub type Week = Vec<Option<Vec<CampusMenus>>>;

static WEEK_DATA: Lazy<Regex> = Lazy::new(||
    Regex::new(r"(?s)var weekData = (\[.*?\]);").unwrap()
);

#[derive(Debug, thiserror::Error)]
pub enum WeekDataError {
    #[error("no weekData assignment in page")]
    MissingPattern,
    #[error("InvalidWeekData: {0}")]
    Json(#[from] serde_json::Error),
}

/// Pulls the `var weekData = [ ... ];` literal out of the page and parses it.
/// The page embeds it in a `<script>` block spanning multiple lines, so the
/// pattern matches across newlines. Anything short of a well-formed array is
/// an error, a missing day inside the array is not.
pub fn extract_week_data(html: &str) -> Result<Week, WeekDataError> {
    let literal = WEEK_DATA.captures(html)
        .ok_or(WeekDataError::MissingPattern)?;
    Ok(serde_json::from_str(&literal[1])?)
}

#[derive(Debug, Deserialize, Clone)]
pub struct CampusMenus {
    #[serde(rename = "campusName")]
    pub campus_name: String,
    #[serde(default)]
    pub refectory: Vec<Refectory>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Refectory {
    pub name: String,
    /// meal-type "corners", e.g. "아침\n(조식)", "중식", "Hotbowl"
    #[serde(rename = "type", default)]
    pub corners: Vec<Corner>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Corner {
    pub name: String,
    #[serde(default)]
    pub item: Vec<MenuEntry>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MenuEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<PriceField>,
}

/// the upstream sometimes writes prices as bare numbers, sometimes as
/// display strings like "6,500원"
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum PriceField {
    Text(String),
    Number(serde_json::Number),
}

impl PriceField {
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            PriceField::Text(v) => Cow::Borrowed(v),
            PriceField::Number(v) => Cow::Owned(v.to_string()),
        }
    }
}
