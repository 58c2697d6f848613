/// HTTP endpoint for querying air-quality data
///
/// Provides a simple JSON API for dashboards and external tools to query
/// fresh snapshots, per-device history and forecasts.
///
/// Endpoints:
/// - GET /health - Service health check
/// - GET /locations - Registered monitoring sites
/// - GET /readings?search=..&risk=.. - Current snapshot, optionally filtered
/// - GET /summary - Snapshot summary and risk-level distribution
/// - GET /history/{device_id}?hours=N - Hourly history for one device
/// - GET /forecast?hours=N&location=all|{device_id} - Projected series and insight

use rand::Rng;
use serde_json::json;
use std::collections::HashMap;

use crate::analysis::groupings::{self, ReadingFilter};
use crate::error::{AqmonError, Result};
use crate::service::{AirQualityService, ALL_LOCATIONS};

type JsonResponse = tiny_http::Response<std::io::Cursor<Vec<u8>>>;

// ---------------------------------------------------------------------------
// Request parsing
// ---------------------------------------------------------------------------

/// Splits a request URL into its path and decoded query parameters.
pub fn parse_url(url: &str) -> (&str, HashMap<String, String>) {
    let (path, query) = url.split_once('?').unwrap_or((url, ""));

    let params = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode(key), decode(value))
        })
        .collect();

    (path, params)
}

fn decode(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|s| s.into_owned())
        .unwrap_or(spaced)
}

/// Parses an optional `hours` parameter. Fractional or non-numeric values
/// are invalid input; range checks happen in the service.
fn parse_hours(params: &HashMap<String, String>) -> Result<Option<i64>> {
    match params.get("hours") {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<i64>().map(Some).map_err(|_| {
            AqmonError::invalid_input(format!("hours must be an integer, got '{}'", raw))
        }),
    }
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

/// Routes one GET request to its handler, returning status and JSON body.
pub fn route<R: Rng>(
    service: &mut AirQualityService<R>,
    method: &str,
    url: &str,
) -> (u16, serde_json::Value) {
    if !method.eq_ignore_ascii_case("GET") {
        return (405, json!({ "error": "Method not allowed" }));
    }

    let (path, params) = parse_url(url);

    let result = match path {
        "/health" => Ok(handle_health()),
        "/locations" => Ok(json!(service.locations())),
        "/readings" => handle_readings(service, &params),
        "/summary" => Ok(handle_summary(service)),
        "/forecast" => handle_forecast(service, &params),
        _ => match path.strip_prefix("/history/") {
            Some(device_id) if !device_id.is_empty() => {
                handle_history(service, &decode(device_id), &params)
            }
            _ => {
                return (
                    404,
                    json!({
                        "error": "Not found",
                        "available_endpoints": [
                            "/health",
                            "/locations",
                            "/readings",
                            "/summary",
                            "/history/{device_id}",
                            "/forecast"
                        ]
                    }),
                );
            }
        },
    };

    match result {
        Ok(body) => (200, body),
        Err(e) => {
            log::warn!("rejected {}: {}", url, e);
            let status = match e {
                AqmonError::InvalidInput(_) => 400,
                AqmonError::UnknownDevice(_) => 404,
                _ => 500,
            };
            (status, json!({ "error": e.to_string() }))
        }
    }
}

/// Handle /health endpoint
fn handle_health() -> serde_json::Value {
    json!({
        "status": "ok",
        "service": "aqmon_service",
        "version": env!("CARGO_PKG_VERSION")
    })
}

/// Handle /readings endpoint
fn handle_readings<R: Rng>(
    service: &mut AirQualityService<R>,
    params: &HashMap<String, String>,
) -> Result<serde_json::Value> {
    let filter = ReadingFilter::from_query(
        params.get("search").map(String::as_str),
        params.get("risk").map(String::as_str),
    )
    .map_err(AqmonError::InvalidInput)?;

    let readings = service.current_readings();
    Ok(json!(groupings::filter_readings(&readings, &filter)))
}

/// Handle /summary endpoint
fn handle_summary<R: Rng>(service: &mut AirQualityService<R>) -> serde_json::Value {
    let readings = service.current_readings();
    json!({
        "summary": groupings::summarize(&readings),
        "risk_distribution": groupings::risk_distribution(&readings),
    })
}

/// Handle /history/{device_id} endpoint
fn handle_history<R: Rng>(
    service: &mut AirQualityService<R>,
    device_id: &str,
    params: &HashMap<String, String>,
) -> Result<serde_json::Value> {
    let hours = parse_hours(params)?;
    Ok(json!(service.history(device_id, hours)?))
}

/// Handle /forecast endpoint
fn handle_forecast<R: Rng>(
    service: &mut AirQualityService<R>,
    params: &HashMap<String, String>,
) -> Result<serde_json::Value> {
    let hours = parse_hours(params)?;
    let selection = params
        .get("location")
        .map(String::as_str)
        .unwrap_or(ALL_LOCATIONS);
    Ok(json!(service.forecast_for(selection, hours)?))
}

// ---------------------------------------------------------------------------
// HTTP Server
// ---------------------------------------------------------------------------

/// Start HTTP endpoint server on the specified port
pub fn start_endpoint_server<R: Rng>(port: u16, mut service: AirQualityService<R>) -> Result<()> {
    let server = tiny_http::Server::http(format!("0.0.0.0:{}", port))
        .map_err(|e| AqmonError::Server(format!("Failed to start HTTP server: {}", e)))?;

    log::info!("HTTP endpoint listening on http://0.0.0.0:{}", port);

    for request in server.incoming_requests() {
        let (status, body) = route(&mut service, request.method().as_str(), request.url());
        log::debug!("{} {} -> {}", request.method(), request.url(), status);

        if let Err(e) = request.respond(create_response(status, &body)) {
            log::error!("Failed to send response: {}", e);
        }
    }

    Ok(())
}

/// Create HTTP response with JSON body
fn create_response(status_code: u16, json: &serde_json::Value) -> JsonResponse {
    let body = serde_json::to_string_pretty(json).unwrap_or_else(|_| json.to_string());

    let response = tiny_http::Response::from_data(body.into_bytes())
        .with_status_code(tiny_http::StatusCode::from(status_code));

    match tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]) {
        Ok(header) => response.with_header(header),
        Err(()) => response,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;

    fn service() -> AirQualityService {
        AirQualityService::from_config(ServiceConfig {
            rng_seed: Some(17),
            ..ServiceConfig::default()
        })
    }

    #[test]
    fn test_parse_url_decodes_query() {
        let (path, params) = parse_url("/readings?search=Banjara%20Hills&risk=high");
        assert_eq!(path, "/readings");
        assert_eq!(params["search"], "Banjara Hills");
        assert_eq!(params["risk"], "high");

        let (_, params) = parse_url("/readings?search=kbr+park");
        assert_eq!(params["search"], "kbr park");
    }

    #[test]
    fn test_parse_url_without_query() {
        let (path, params) = parse_url("/health");
        assert_eq!(path, "/health");
        assert!(params.is_empty());
    }

    #[test]
    fn test_health() {
        let (status, body) = route(&mut service(), "GET", "/health");
        assert_eq!(status, 200);
        assert_eq!(body["status"], "ok");
    }

    #[test]
    fn test_readings_returns_full_snapshot() {
        let (status, body) = route(&mut service(), "GET", "/readings");
        assert_eq!(status, 200);
        assert_eq!(body.as_array().unwrap().len(), 8);
    }

    #[test]
    fn test_readings_search_filter() {
        let (status, body) = route(&mut service(), "GET", "/readings?search=hills");
        assert_eq!(status, 200);
        let names: Vec<_> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["location"]["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["Banjara Hills", "Jubilee Hills"]);
    }

    #[test]
    fn test_readings_bad_risk_is_400() {
        let (status, _) = route(&mut service(), "GET", "/readings?risk=severe");
        assert_eq!(status, 400);
    }

    #[test]
    fn test_summary_totals() {
        let (status, body) = route(&mut service(), "GET", "/summary");
        assert_eq!(status, 200);
        assert_eq!(body["summary"]["total_sensors"], 8);
        let distributed: u64 = body["risk_distribution"]
            .as_object()
            .unwrap()
            .values()
            .map(|v| v.as_u64().unwrap())
            .sum();
        assert_eq!(distributed, 8);
    }

    #[test]
    fn test_history_default_and_explicit_hours() {
        let mut svc = service();
        let (status, body) = route(&mut svc, "GET", "/history/charsense_001");
        assert_eq!(status, 200);
        assert_eq!(body.as_array().unwrap().len(), 25);

        let (_, body) = route(&mut svc, "GET", "/history/charsense_001?hours=3");
        assert_eq!(body.as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_history_unknown_device_is_empty_200() {
        let (status, body) = route(&mut service(), "GET", "/history/nonexistent");
        assert_eq!(status, 200);
        assert!(body.as_array().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_hours_are_400() {
        let mut svc = service();
        for url in [
            "/history/charsense_001?hours=-1",
            "/history/charsense_001?hours=2.5",
            "/forecast?hours=abc",
            "/forecast?hours=-3",
        ] {
            let (status, body) = route(&mut svc, "GET", url);
            assert_eq!(status, 400, "{} should be rejected", url);
            assert!(body["error"].as_str().unwrap().contains("Invalid input"));
        }
    }

    #[test]
    fn test_forecast_shape() {
        let (status, body) = route(&mut service(), "GET", "/forecast?hours=10");
        assert_eq!(status, 200);
        let frames = body["frames"].as_array().unwrap();
        assert_eq!(frames.len(), 11);
        assert_eq!(frames[0]["confidence"], 0.95);
        assert_eq!(frames[4]["risk_trend"], "stable");
        assert_eq!(body["insight"]["confidence_pct"], 60);
        assert!(frames[0]["PM25_predicted"].is_number());
    }

    #[test]
    fn test_forecast_unknown_location_is_404() {
        let (status, _) = route(&mut service(), "GET", "/forecast?location=nowhere");
        assert_eq!(status, 404);
    }

    #[test]
    fn test_unknown_route_and_method() {
        let (status, _) = route(&mut service(), "GET", "/nope");
        assert_eq!(status, 404);
        let (status, _) = route(&mut service(), "GET", "/history/");
        assert_eq!(status, 404);
        let (status, _) = route(&mut service(), "POST", "/health");
        assert_eq!(status, 405);
    }
}
