use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use payoff_core::chart;
use payoff_core::derivatives::collar::{self, CollarInput};
use payoff_core::derivatives::futures::{self, FuturesInput};
use payoff_core::portfolio::{holdings, purchase};
use payoff_core::tickers::{TickerQuery, TickerUniverse};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Request envelope for the payoff calculators: the strategy parameters plus
/// an optional flag to drop the curve from the response.
#[derive(Deserialize)]
struct PayoffRequest<T> {
    #[serde(flatten)]
    params: T,
    #[serde(default)]
    summary_only: bool,
}

#[derive(Deserialize)]
#[serde(tag = "strategy", rename_all = "lowercase")]
enum ChartRequest {
    Collar(CollarInput),
    Futures(FuturesInput),
}

#[derive(Deserialize)]
struct SearchRequest {
    tickers: Vec<String>,
    #[serde(flatten)]
    query: TickerQuery,
}

// ---------------------------------------------------------------------------
// Payoff engine
// ---------------------------------------------------------------------------

#[napi]
pub fn collar_payoff(input_json: String) -> NapiResult<String> {
    let req: PayoffRequest<CollarInput> =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let mut output = collar::compute_collar(&req.params).map_err(to_napi_error)?;
    if req.summary_only {
        output.result = output.result.summary();
    }
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn futures_payoff(input_json: String) -> NapiResult<String> {
    let req: PayoffRequest<FuturesInput> =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let mut output = futures::compute_futures(&req.params).map_err(to_napi_error)?;
    if req.summary_only {
        output.result = output.result.summary();
    }
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn payoff_chart(input_json: String) -> NapiResult<String> {
    let req: ChartRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let spec = match req {
        ChartRequest::Collar(input) => {
            let output = collar::compute_collar(&input).map_err(to_napi_error)?;
            chart::collar_chart(&output.result, &input)
        }
        ChartRequest::Futures(input) => {
            let output = futures::compute_futures(&input).map_err(to_napi_error)?;
            chart::futures_chart(&output.result, &input)
        }
    };
    serde_json::to_string(&spec).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Tickers
// ---------------------------------------------------------------------------

#[napi]
pub fn search_tickers(input_json: String) -> NapiResult<String> {
    let req: SearchRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let universe = TickerUniverse::new(&req.tickers);
    let output = universe.search(&req.query).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Portfolio
// ---------------------------------------------------------------------------

#[napi]
pub fn value_portfolio(input_json: String) -> NapiResult<String> {
    let input: holdings::PortfolioValuationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = holdings::value_portfolio(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn plan_purchase(input_json: String) -> NapiResult<String> {
    let input: purchase::PurchaseInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = purchase::plan_purchase(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
