use actix_web::{get, web, Responder};
use serde::Serialize;

use crate::{
    configuration::{AppState, State},
    error::Error,
    model::Pool,
};

#[get("/pools")]
pub async fn index(
    state: web::Data<AppState<State>>,
) -> Result<impl Responder, Error> {
    let pools = state.store.read().await.sorted_pools();
    Ok(web::Json(Response { pools }))
}

#[derive(Debug, Serialize)]
pub struct Response {
    pub pools: Vec<Pool>,
}
