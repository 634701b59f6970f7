use actix_web::{
    Error, HttpRequest, HttpResponse, Responder, error::JsonPayloadError, get, post, web,
};
use serde::Serialize;

use crate::{
    context::ServiceContext,
    error::ValidationError,
    payload::{PredictionPayload, PredictionResponse},
};

pub const INDEX_MESSAGE: &str = "API is working properly!";

#[derive(Serialize)]
struct Message {
    message: &'static str,
}

/// Liveness check.
#[get("/")]
async fn index() -> impl Responder {
    HttpResponse::Ok().json(Message {
        message: INDEX_MESSAGE,
    })
}

/// Predicts the quality of the wine described by the body.
///
/// Bodies that do not deserialize into a [`PredictionPayload`] are rejected by the extractor,
/// so the model only ever sees complete samples.
#[post("/predict")]
async fn predict(
    context: web::Data<ServiceContext>,
    payload: web::Json<PredictionPayload>,
) -> impl Responder {
    let prediction = context.predict(&payload);
    log::debug!("predicted {prediction} for {:?}", payload.into_inner());

    HttpResponse::Ok().json(PredictionResponse {
        predictions: vec![prediction],
    })
}

fn reject(err: JsonPayloadError, req: &HttpRequest) -> Error {
    log::debug!("rejected {} {}: {err}", req.method(), req.path());
    ValidationError(err.to_string()).into()
}

/// Registers the routes and the request body rules on an app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(reject))
        .service(index)
        .service(predict);
}
