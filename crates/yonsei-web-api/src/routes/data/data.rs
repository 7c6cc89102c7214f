
use yonsei_menu_api::raw::WeekDataError;

#[derive(Debug, thiserror::Error)]
pub enum MenuFetchError {
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    #[error(transparent)]
    WeekData(#[from] WeekDataError),
}
