// Tests for the request rate limiter.
//
// Each test builds its own limiter over the shared in-memory backend with
// a budget small enough to trip quickly. Inputs key on the request path
// because in-process test requests carry no peer address.

use std::time::Duration;

use actix_extensible_rate_limit::backend::SimpleInputFunctionBuilder;
use actix_extensible_rate_limit::RateLimiter;
use actix_http::Request;
use actix_web::body::{BoxBody, EitherBody};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App, Error, HttpResponse};
use backend::middleware::rate_limit::rate_limit_backend;
use backend::middleware::request_trace::RequestTrace;
use backend::middleware::structured_logger::StructuredLogger;
use backend::middleware::trace_span::TraceSpan;

const LIMIT: &str = "x-ratelimit-limit";
const REMAINING: &str = "x-ratelimit-remaining";
const RESET: &str = "x-ratelimit-reset";

async fn ping() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"status": "ok"}))
}

/// One route behind a limiter allowing `max` requests per `window`.
async fn limited_app(
    window: Duration,
    max: u64,
) -> impl Service<Request, Response = ServiceResponse<EitherBody<BoxBody>>, Error = Error> {
    let input = SimpleInputFunctionBuilder::new(window, max)
        .path_key()
        .build();
    let limiter = RateLimiter::builder(rate_limit_backend(), input)
        .add_headers()
        .build();

    test::init_service(
        App::new()
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .wrap(limiter)
            .route("/limited", web::get().to(ping)),
    )
    .await
}

async fn hit(
    app: &impl Service<Request, Response = ServiceResponse<EitherBody<BoxBody>>, Error = Error>,
) -> ServiceResponse<EitherBody<BoxBody>> {
    let req = test::TestRequest::get().uri("/limited").to_request();
    test::call_service(app, req).await
}

fn header<'a>(resp: &'a ServiceResponse<EitherBody<BoxBody>>, name: &str) -> Option<&'a str> {
    resp.headers().get(name).and_then(|v| v.to_str().ok())
}

#[actix_web::test]
async fn requests_past_the_budget_are_rejected() {
    let app = limited_app(Duration::from_secs(1), 2).await;

    for n in 1..=2 {
        let resp = hit(&app).await;
        assert_eq!(resp.status().as_u16(), 200, "request {n} is inside budget");
        assert!(
            resp.headers().contains_key(REMAINING),
            "request {n} carries allowance headers"
        );
    }

    let resp = hit(&app).await;
    assert_eq!(resp.status().as_u16(), 429, "request 3 is over budget");
}

#[actix_web::test]
async fn budget_reopens_after_the_window() {
    // A 10ms window keeps the test fast.
    let app = limited_app(Duration::from_millis(10), 1).await;

    assert_eq!(hit(&app).await.status().as_u16(), 200);
    assert_eq!(hit(&app).await.status().as_u16(), 429);

    // Wait the window out with some slack.
    tokio::time::sleep(Duration::from_millis(25)).await;

    assert_eq!(
        hit(&app).await.status().as_u16(),
        200,
        "a fresh window admits requests again"
    );
}

#[actix_web::test]
async fn allowance_headers_count_the_budget_down() {
    let app = limited_app(Duration::from_secs(60), 5).await;

    let resp = hit(&app).await;
    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(header(&resp, LIMIT), Some("5"));
    assert_eq!(header(&resp, REMAINING), Some("4"));
    assert!(resp.headers().contains_key(RESET));

    let resp = hit(&app).await;
    assert_eq!(header(&resp, REMAINING), Some("3"));
}
