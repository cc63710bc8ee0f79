use actix_web::{get, web, Responder};
use bigdecimal::BigDecimal;
use serde::Serialize;

use crate::{
    configuration::{AppState, State},
    error::Error,
};

#[get("/total-value-locked")]
pub async fn index(
    state: web::Data<AppState<State>>,
) -> Result<impl Responder, Error> {
    let total_value_locked =
        state.store.read().await.total_value_locked.to_owned();
    Ok(web::Json(Response { total_value_locked }))
}

#[derive(Debug, Serialize)]
pub struct Response {
    pub total_value_locked: BigDecimal,
}
