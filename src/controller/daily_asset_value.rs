use actix_web::{get, web, Responder};
use serde::Serialize;

use crate::{
    configuration::{AppState, State},
    error::Error,
    types::Day_Type,
};

#[get("/daily-asset-value")]
pub async fn index(
    state: web::Data<AppState<State>>,
) -> Result<impl Responder, Error> {
    let days = state.store.read().await.daily_asset_value.to_owned();
    Ok(web::Json(Response { days }))
}

#[derive(Debug, Serialize)]
pub struct Response {
    pub days: Vec<Day_Type>,
}
