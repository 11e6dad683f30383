use crate::{
    api::{attendance, export},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::{HttpResponse, error::InternalError, web};
use serde_json::json;

pub type MarkLimiter = GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per-IP limiter for attendance submissions; `None` when disabled.
pub fn build_limiter(requests_per_min: u32) -> Option<MarkLimiter> {
    if requests_per_min == 0 {
        return None;
    }
    let per_ms = (60_000 / requests_per_min as u64).max(1);
    GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config, limiter: Option<&MarkLimiter>) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        tracing::debug!(error = %err, "Rejected malformed JSON body");
        InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(json!({ "error": "Invalid JSON payload" })),
        )
        .into()
    }));

    let mark = web::resource("/mark-attendance").route(web::post().to(attendance::mark_attendance));

    let scope = web::scope(&config.api_prefix)
        .service(web::resource("/attendance").route(web::get().to(attendance::today_attendance)))
        .service(web::resource("/export-csv").route(web::get().to(export::export_csv)))
        .service(web::resource("/export-pdf").route(web::get().to(export::export_pdf)));

    match limiter {
        Some(limiter) => cfg.service(scope.service(mark.wrap(Governor::new(limiter)))),
        None => cfg.service(scope.service(mark)),
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::service::AttendanceService;
    use crate::store::MemoryStore;
    use actix_web::{App, http::StatusCode, test, web::Data};
    use chrono::NaiveDate;
    use serde_json::Value;
    use std::sync::Arc;

    fn service() -> Data<AttendanceService> {
        let clock = Arc::new(FixedClock::at(
            NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
            9,
            30,
        ));
        Data::new(AttendanceService::new(
            Arc::new(MemoryStore::default()),
            clock,
            0.8,
        ))
    }

    fn test_config() -> Config {
        Config::from_lookup(|_| None).unwrap()
    }

    macro_rules! app {
        () => {{
            let config = test_config();
            test::init_service(
                App::new()
                    .app_data(service())
                    .configure(|cfg| configure(cfg, &config, None)),
            )
            .await
        }};
    }

    fn mark(name: &str, confidence: Value) -> test::TestRequest {
        test::TestRequest::post()
            .uri("/mark-attendance")
            .set_json(json!({
                "name": name,
                "status": "Present",
                "confidence": confidence,
                "time": "9:30:00 AM",
                "date": "1999-01-01"
            }))
    }

    #[actix_web::test]
    async fn mark_then_list_today() {
        let app = app!();

        let resp = test::call_service(&app, mark("Ada", json!(0.93)).to_request()).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["name"], "Ada");
        // The server date wins over whatever the client sent.
        assert_eq!(body["data"]["date"], "2026-10-18");

        let req = test::TestRequest::get().uri("/attendance").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let list: Value = test::read_body_json(resp).await;
        assert_eq!(list.as_array().unwrap().len(), 1);
        assert_eq!(list[0]["name"], "Ada");
        assert_eq!(list[0]["confidence"], 0.93);
    }

    #[actix_web::test]
    async fn duplicate_same_day_is_bad_request() {
        let app = app!();

        let first = test::call_service(&app, mark("Ada", json!(0.9)).to_request()).await;
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = test::call_service(&app, mark("Ada", json!(0.95)).to_request()).await;
        assert_eq!(second.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(second).await;
        assert_eq!(body["error"], "Ada already marked present today");
    }

    #[actix_web::test]
    async fn confidence_boundary_over_http() {
        let app = app!();

        let low = test::call_service(&app, mark("Ada", json!(0.79)).to_request()).await;
        assert_eq!(low.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(low).await;
        assert_eq!(body["error"], "Face recognition confidence too low");

        let edge = test::call_service(&app, mark("Ada", json!("0.80")).to_request()).await;
        assert_eq!(edge.status(), StatusCode::CREATED);
    }

    #[actix_web::test]
    async fn missing_fields_and_bad_json() {
        let app = app!();

        let req = test::TestRequest::post()
            .uri("/mark-attendance")
            .set_json(json!({ "name": "Ada", "confidence": 0.9 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Missing required fields");

        let req = test::TestRequest::post()
            .uri("/mark-attendance")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Invalid JSON payload");
    }

    #[actix_web::test]
    async fn over_long_status_is_bad_request() {
        let app = app!();

        let req = test::TestRequest::post()
            .uri("/mark-attendance")
            .set_json(json!({
                "name": "Ada",
                "status": "Present".repeat(10),
                "confidence": 0.9,
                "time": "9:30:00 AM"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "status must be at most 32 characters");
    }

    #[actix_web::test]
    async fn exports_are_not_found_on_an_empty_day() {
        let app = app!();

        for uri in ["/export-csv", "/export-pdf"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["error"], "No attendance records found for today");
        }
    }

    #[actix_web::test]
    async fn csv_export_is_an_attachment() {
        let app = app!();
        test::call_service(&app, mark("Ada", json!(0.93)).to_request()).await;

        let req = test::TestRequest::get().uri("/export-csv").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let headers = resp.headers().clone();
        assert_eq!(headers.get("content-type").unwrap(), "text/csv");
        let disposition = headers.get("content-disposition").unwrap().to_str().unwrap();
        assert!(disposition.contains("attendance_2026-10-18.csv"));

        let body = test::read_body(resp).await;
        let text = std::str::from_utf8(&body).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("\"name\",\"status\",\"confidence\",\"time\",\"date\"")
        );
        assert_eq!(
            lines.next(),
            Some("\"Ada\",\"Present\",0.93,\"9:30:00 AM\",\"2026-10-18\"")
        );
        assert_eq!(lines.next(), None);
    }

    #[actix_web::test]
    async fn pdf_export_is_a_pdf() {
        let app = app!();
        test::call_service(&app, mark("Ada", json!(0.93)).to_request()).await;

        let req = test::TestRequest::get().uri("/export-pdf").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get("content-type").unwrap(), "application/pdf");

        let body = test::read_body(resp).await;
        assert!(body.starts_with(b"%PDF"));
    }

    #[actix_web::test]
    async fn routes_honour_the_api_prefix() {
        let mut config = test_config();
        config.api_prefix = "/api".to_string();
        let app = test::init_service(
            App::new()
                .app_data(service())
                .configure(|cfg| configure(cfg, &config, None)),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/attendance").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/attendance").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn zero_rate_disables_the_limiter() {
        assert!(build_limiter(0).is_none());
        assert!(build_limiter(60).is_some());
    }

    #[actix_web::test]
    async fn submissions_beyond_the_burst_are_throttled() {
        let config = test_config();
        let limiter = build_limiter(2).unwrap();
        let app = test::init_service(
            App::new()
                .app_data(service())
                .configure(|cfg| configure(cfg, &config, Some(&limiter))),
        )
        .await;

        let peer = "10.0.0.7:40000".parse().unwrap();
        let mut statuses = Vec::new();
        for name in ["Ada", "Grace", "Alan"] {
            let req = mark(name, json!(0.9)).peer_addr(peer).to_request();
            statuses.push(test::call_service(&app, req).await.status());
        }

        assert_eq!(
            statuses,
            vec![
                StatusCode::CREATED,
                StatusCode::CREATED,
                StatusCode::TOO_MANY_REQUESTS
            ]
        );

        // Reads are not limited.
        let req = test::TestRequest::get()
            .uri("/attendance")
            .peer_addr(peer)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }
}
