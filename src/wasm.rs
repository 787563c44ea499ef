use wasm_bindgen::prelude::*;

use crate::classify::{self, ErrorCode, NormalizedError};
use crate::cluster::{self, Cluster, Explorer};
use crate::inject;
use crate::types::RawFailure;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = JSON)]
    fn parse(s: &str) -> JsValue;
}

fn to_js(value: &serde_json::Value) -> JsValue {
    match serde_json::to_string(value) {
        Ok(json_str) => parse(&json_str),
        Err(_) => JsValue::NULL,
    }
}

fn error_to_js(err: &NormalizedError) -> JsValue {
    match serde_json::to_value(err) {
        Ok(value) => to_js(&value),
        Err(_) => JsValue::NULL,
    }
}

fn parse_code(s: &str) -> Option<ErrorCode> {
    ErrorCode::from_name(s).ok()
}

fn rng(seed: Option<f64>) -> fastrand::Rng {
    match seed {
        Some(seed) => fastrand::Rng::with_seed(seed as u64),
        None => fastrand::Rng::new(),
    }
}

fn error_result(msg: &str) -> JsValue {
    let obj = serde_json::json!({"error": msg});
    to_js(&obj)
}

/// Classify a serialized JS error (`JSON.stringify` of the caught value, or a
/// bare string). Returns the normalized error object.
#[wasm_bindgen]
pub fn classify_error(error_json: &str, tx_signature: Option<String>) -> JsValue {
    let failure = match serde_json::from_str::<serde_json::Value>(error_json) {
        Ok(value) => RawFailure::from_json(&value),
        Err(_) => RawFailure::message(error_json),
    };
    error_to_js(&classify::classify(&failure, tx_signature.as_deref()))
}

/// User-facing text for a code, or null for an unknown code string.
#[wasm_bindgen]
pub fn user_message(code: &str) -> Option<String> {
    parse_code(code).map(|c| c.user_message().to_string())
}

#[wasm_bindgen]
pub fn is_retryable(code: &str) -> bool {
    parse_code(code).is_some_and(ErrorCode::is_retryable)
}

/// Every code with its user message and retryability.
#[wasm_bindgen]
pub fn get_error_codes() -> JsValue {
    use strum::IntoEnumIterator;

    let codes: Vec<serde_json::Value> = ErrorCode::iter()
        .map(|code| {
            serde_json::json!({
                "code": code.as_ref(),
                "userMessage": code.user_message(),
                "retryable": code.is_retryable(),
            })
        })
        .collect();
    to_js(&serde_json::Value::Array(codes))
}

/// Synthetic error for `code`, or a uniformly chosen one when `code` is null.
#[wasm_bindgen]
pub fn mock_error(code: Option<String>, seed: Option<f64>) -> JsValue {
    let mut rng = rng(seed);
    let code = match code.as_deref() {
        Some(s) => match ErrorCode::from_name(s) {
            Ok(c) => c,
            Err(err) => return error_result(&err.to_string()),
        },
        None => ErrorCode::random(&mut rng),
    };
    error_to_js(&classify::synthetic_error(code, &mut rng))
}

/// Deterministic demo failure for an operation label, or null.
#[wasm_bindgen]
pub fn simulate_operation_error(operation: &str, should_fail: bool, seed: Option<f64>) -> JsValue {
    let mut rng = rng(seed);
    match inject::simulate_operation_error(operation, should_fail, &mut rng) {
        Some(err) => error_to_js(&err),
        None => JsValue::NULL,
    }
}

/// Explorer link for a signature. `cluster` and `explorer` use their
/// kebab/lowercase names; null when either is unrecognized.
#[wasm_bindgen]
pub fn explorer_url(signature: &str, cluster: &str, explorer: Option<String>) -> Option<String> {
    let cluster = cluster.parse::<Cluster>().ok()?;
    let explorer = match explorer.as_deref() {
        Some(s) => s.parse::<Explorer>().ok()?,
        None => Explorer::default(),
    };
    Some(cluster::explorer_url(signature, cluster, explorer))
}
