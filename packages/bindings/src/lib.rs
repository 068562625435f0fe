use napi::Result as NapiResult;
use napi_derive::napi;

use debt_planner_core::planner::{self, AmortizeInput, PlanInput};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Portfolio
// ---------------------------------------------------------------------------

#[napi]
pub fn plan_portfolio(input_json: String) -> NapiResult<String> {
    let input: PlanInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = planner::plan_portfolio(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn portfolio_summary(input_json: String) -> NapiResult<String> {
    let input: PlanInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = planner::portfolio_summary(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Single debt
// ---------------------------------------------------------------------------

#[napi]
pub fn amortize_debt(input_json: String) -> NapiResult<String> {
    let input: AmortizeInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = planner::amortize_debt(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
