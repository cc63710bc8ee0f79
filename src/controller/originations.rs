use actix_web::{get, web, Responder};
use bigdecimal::BigDecimal;
use serde::Serialize;

use crate::{
    configuration::{AppState, State},
    error::Error,
    model::WeekBucket,
};

#[get("/originations")]
pub async fn index(
    state: web::Data<AppState<State>>,
) -> Result<impl Responder, Error> {
    let snapshot = state.store.read().await;
    let response = Response {
        weekly_originations: snapshot.weekly_originations.to_owned(),
        total_originated: snapshot.total_originated.to_owned(),
        total_loans: snapshot.total_loans,
    };
    Ok(web::Json(response))
}

#[derive(Debug, Serialize)]
pub struct Response {
    pub weekly_originations: Vec<WeekBucket>,
    pub total_originated: BigDecimal,
    pub total_loans: usize,
}
