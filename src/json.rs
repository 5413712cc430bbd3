use erased_serde::Serialize as EraSerialize;
use log::info;
use rocket::response::Responder;
use rocket::response::content::RawJson;
use serde::Serialize;

use crate::error::SheetError;

/// Written when the envelope itself can't be serialized
const FALLBACK_BODY: &str = r#"{"status":{"Error":"response could not be serialized"},"data":[]}"#;

#[derive(Serialize, Debug, PartialEq, Eq)]
pub enum Status {
    Ok,
    Error(String),
}

/// Envelope of every API response: a status and a payload
#[derive(Serialize)]
pub struct JsonStatus {
    status: Status,
    data: Box<dyn EraSerialize + Send>,
}

impl From<JsonStatus> for RawJson<String> {
    fn from(status: JsonStatus) -> Self {
        RawJson(serde_json::to_string(&status).unwrap_or_else(|_| FALLBACK_BODY.to_string()))
    }
}

impl From<SheetError> for JsonStatus {
    fn from(error: SheetError) -> Self {
        JsonStatus::error(error)
    }
}

pub type JsonResult = Result<JsonStatus, JsonStatus>;

impl JsonStatus {
    pub fn new(status: Status, data: impl EraSerialize + Send + 'static) -> Self {
        JsonStatus {
            status,
            data: Box::new(data),
        }
    }

    pub fn new_empty(status: Status) -> Self {
        JsonStatus::new(status, Vec::<String>::new())
    }

    pub fn error<T: ToString>(message: T) -> Self {
        let message = message.to_string();
        info!("Error while running request: {}", message);
        JsonStatus::new_empty(Status::Error(message))
    }

    pub fn ok<T: ToString>(message: Option<T>) -> Self {
        match message {
            Some(message) => JsonStatus::new(Status::Ok, vec![message.to_string()]),
            None => JsonStatus::new_empty(Status::Ok),
        }
    }

    pub fn data_owned(data: impl EraSerialize + Send + 'static) -> Self {
        JsonStatus::new(Status::Ok, data)
    }

    pub fn from_anyhow(error: anyhow::Error) -> Self {
        JsonStatus::error(format!("{:#}", error))
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for JsonStatus {
    fn respond_to(self, request: &'r rocket::Request<'_>) -> rocket::response::Result<'o> {
        RawJson::<String>::from(self).respond_to(request)
    }
}
