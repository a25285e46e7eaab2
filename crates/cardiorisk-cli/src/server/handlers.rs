use axum::extract::{FromRequest, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::{Html, IntoResponse, Response};
use axum::{Form, Json};
use cardiorisk_classifiers::predictor::IncrementalRequest;
use cardiorisk_classifiers::report::{render_index, render_results, ResultsView};

use super::AppState;

/// Body of `POST /predict`: a browser form post or a JSON overlay request.
#[derive(Debug)]
pub enum PredictRequest {
    Form(Vec<(String, String)>),
    Json(IncrementalRequest),
}

/// `application/json` or any `application/*+json` media type.
fn is_json_media_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    match essence.strip_prefix("application/") {
        Some(subtype) => subtype == "json" || subtype.ends_with("+json"),
        None => false,
    }
}

fn is_json(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(is_json_media_type)
        .unwrap_or(false)
}

impl<S> FromRequest<S> for PredictRequest
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_json(&req) {
            let Json(body) = Json::<IncrementalRequest>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(PredictRequest::Json(body))
        } else {
            let Form(fields) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(PredictRequest::Form(fields))
        }
    }
}

pub async fn index(State(predictor): State<AppState>) -> Html<String> {
    Html(render_index(predictor.form_fields(), predictor.reference_link()).into_string())
}

pub async fn predict(State(predictor): State<AppState>, request: PredictRequest) -> Response {
    match request {
        PredictRequest::Form(fields) => {
            // repeated keys: the first value wins
            let record = predictor.record_from_form(|name| {
                fields
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| value.as_str())
            });
            let prediction = predictor.predict(record);
            log::debug!("form prediction: {}", prediction.final_cat);
            let view = ResultsView {
                prediction: &prediction,
                mapping: predictor.mapping(),
                ranking: predictor.ranking(),
                reference_link: predictor.reference_link(),
            };
            Html(render_results(&view).into_string()).into_response()
        }
        PredictRequest::Json(body) => {
            let prediction = predictor.predict_incremental(&body);
            log::debug!(
                "incremental prediction over {} modified fields: {}",
                body.modified.len(),
                prediction.final_cat
            );
            Json(prediction.summary()).into_response()
        }
    }
}

pub async fn health() -> &'static str {
    "ok"
}
