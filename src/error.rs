use actix_web::ResponseError;
use bigdecimal::ParseBigDecimalError as BIG_DECIMAL_ERROR;
use reqwest::Error as REQWEST_ERROR;
use std::{
    env::VarError, io::Error as IO_ERROR, num::ParseIntError,
    str::ParseBoolError as PARSE_BOOL_ERROR,
};
use thiserror::Error;
use tokio::task::JoinError;
use tracing::subscriber::SetGlobalDefaultError as TRACING_GLOBAL_DEFAULT_ERROR;
use url::ParseError as URL_ERROR;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Io(#[from] IO_ERROR),

    #[error("{0}")]
    URL(#[from] URL_ERROR),

    #[error("{0}")]
    INT(#[from] ParseIntError),

    #[error("{0}")]
    VAR(#[from] VarError),

    #[error("{0}")]
    ParseBoolError(#[from] PARSE_BOOL_ERROR),

    #[error("{0}")]
    TokioJoinError(#[from] JoinError),

    #[error("{0}")]
    REQWEST(#[from] REQWEST_ERROR),

    #[error("Invalid decimal `{0}`: {1}")]
    ParseDecimal(String, BIG_DECIMAL_ERROR),

    #[error("Invalid timestamp: {0}")]
    DecodeDateTimeError(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Tracing error: {0}")]
    SetGlobalDefaultError(#[from] TRACING_GLOBAL_DEFAULT_ERROR),
}

impl Error {
    /// The remote query (or its transport) failed.
    pub fn is_query(&self) -> bool {
        matches!(self, Error::Query(_) | Error::REQWEST(_))
    }

    /// A numeric field of a fetched record could not be interpreted.
    pub fn is_parse(&self) -> bool {
        matches!(
            self,
            Error::ParseDecimal(..) | Error::INT(_) | Error::DecodeDateTimeError(_)
        )
    }
}

impl ResponseError for Error {}
