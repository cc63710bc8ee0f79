use std::collections::BTreeMap;

use actix_web::{get, web, Responder};

use crate::{
    configuration::{AppState, State},
    error::Error,
    model::DayBalance,
};

#[get("/daily-users")]
pub async fn index(
    state: web::Data<AppState<State>>,
) -> Result<impl Responder, Error> {
    let days: BTreeMap<String, DayBalance> =
        state.store.read().await.daily_users.to_owned();
    Ok(web::Json(days))
}
