use std::{collections::HashMap, fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::raw;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Campus {
    #[serde(rename = "신촌 캠퍼스")]
    Sinchon,
    #[serde(rename = "국제 캠퍼스 (송도)")]
    Songdo,
}

impl Campus {
    /// label the weekly payload uses for this campus' blocks
    pub fn source_label(self) -> &'static str {
        match self {
            Campus::Sinchon => "신촌",
            Campus::Songdo => "국제",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Campus::Sinchon => "신촌 캠퍼스",
            Campus::Songdo => "국제 캠퍼스 (송도)",
        }
    }

    /// fixed display list of on-campus cafeterias, not derived from the scrape
    pub fn cafeteria_names(self) -> &'static [&'static str] {
        match self {
            Campus::Sinchon => &["학생회관", "고를샘", "맛나샘", "청경관", "공학원"],
            Campus::Songdo => &["1기숙사 식당", "2기숙사 식당", "Y-Plaza"],
        }
    }
}

impl fmt::Display for Campus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid campus parameter. Must be \"신촌 캠퍼스\" or \"국제 캠퍼스 (송도)\"")]
pub struct InvalidCampus;

impl FromStr for Campus {
    type Err = InvalidCampus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "신촌 캠퍼스" => Ok(Campus::Sinchon),
            "국제 캠퍼스 (송도)" => Ok(Campus::Songdo),
            _ => Err(InvalidCampus),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealType {
    /// Total classification of a corner label. Breakfast keywords win over
    /// dinner keywords when a label carries both; everything unrecognized is
    /// lunch.
    pub fn classify(label: &str) -> Self {
        if label.contains("아침") || label.contains("조식") {
            MealType::Breakfast
        } else if label.contains("저녁") || label.contains("석식") {
            MealType::Dinner
        } else {
            MealType::Lunch
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<u32>,
}

static PRICE_DIGITS: Lazy<Regex> = Lazy::new(||
    Regex::new(r"[\d,]+").unwrap()
);

impl MenuItem {
    fn from_entry(entry: &raw::MenuEntry) -> Option<Self> {
        let name = entry.name.as_deref().filter(|v| !v.is_empty())?;
        Some(Self {
            name: collapse_newlines(name),
            price: entry.price.as_ref().and_then(|v| parse_price(&v.as_text())),
        })
    }
}

/// first run of digits and commas, commas stripped: "6,500원" -> 6500
fn parse_price(raw: &str) -> Option<u32> {
    let run = PRICE_DIGITS.find(raw)?.as_str().replace(',', "");
    match run.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!("could not parse price: '{raw}'");
            None
        },
    }
}

fn collapse_newlines(s: &str) -> String {
    s.replace('\n', " ")
}

/// zero-based weekday with Monday first, the order weekData uses
pub fn weekday_index(date: &NaiveDate) -> usize {
    date.weekday().num_days_from_monday() as usize
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CafeteriaMenu {
    pub cafeteria_name: String,
    pub date: NaiveDate,
    pub meal_type: MealType,
    pub menus: Vec<MenuItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CafeteriaSnapshot {
    pub campus: Campus,
    pub date: NaiveDate,
    pub cafeterias: Vec<CafeteriaMenu>,
}

impl CafeteriaSnapshot {
    pub fn empty(campus: Campus, date: NaiveDate) -> Self {
        Self { campus, date, cafeterias: Vec::new() }
    }

    /// Normalizes one day of the weekly payload into menu records, in source
    /// order. Blocks for the other campus are skipped, as are corners whose
    /// item list comes out empty. The record name keeps the corner label so
    /// sub-corners stay distinguishable ("학생회관 - 중식").
    pub fn from_day(campus: Campus, date: NaiveDate, day: &[raw::CampusMenus]) -> Self {
        let mut cafeterias = Vec::new();

        let blocks = day.iter()
            .filter(|v| v.campus_name == campus.source_label());
        for block in blocks {
            for refectory in &block.refectory {
                for corner in &refectory.corners {
                    let menus: Vec<_> = corner.item.iter()
                        .filter_map(MenuItem::from_entry)
                    .collect();
                    if menus.is_empty() { continue }

                    cafeterias.push(CafeteriaMenu {
                        cafeteria_name: format!(
                            "{} - {}",
                            refectory.name, collapse_newlines(&corner.name),
                        ),
                        date,
                        meal_type: MealType::classify(&corner.name),
                        menus,
                    });
                }
            }
        }

        Self { campus, date, cafeterias }
    }
}

#[derive(Debug, Default, Clone)]
pub struct MenuCache {
    snapshots: HashMap<String, CafeteriaSnapshot>,
}

impl MenuCache {
    pub fn get(&self, campus: Campus, date: &NaiveDate) -> Option<&CafeteriaSnapshot> {
        self.snapshots.get(&Self::key(campus, date))
    }

    pub fn insert(&mut self, snapshot: CafeteriaSnapshot) -> Option<CafeteriaSnapshot> {
        let key = Self::key(snapshot.campus, &snapshot.date);
        self.snapshots.insert(key, snapshot)
    }

    pub fn remove(&mut self, key: &str) -> Option<CafeteriaSnapshot> {
        self.snapshots.remove(key)
    }

    pub fn key(campus: Campus, date: &NaiveDate) -> String {
        format!("{campus}-{date}")
    }
}
