use actix_extensible_rate_limit::RateLimiter;
use actix_web::{web, App, HttpServer};
use backend::config::db::DbProfile;
use backend::infra::state::build_state;
use backend::middleware::bearer_auth::BearerAuth;
use backend::middleware::cors::cors_middleware;
use backend::middleware::rate_limit::{
    api_rate_limit_config, auth_rate_limit_config, rate_limit_backend,
};
use backend::middleware::request_trace::RequestTrace;
use backend::middleware::security_headers::SecurityHeaders;
use backend::middleware::structured_logger::StructuredLogger;
use backend::middleware::trace_span::TraceSpan;
use backend::routes;
use backend::state::security_config::SecurityConfig;

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment:
    // - Docker: Set via docker-compose env_file or docker run --env-file
    // - Local dev: Source env files manually (e.g., set -a; . ./.env; set +a)
    let host = std::env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("BACKEND_PORT")
        .unwrap_or_else(|_| "3001".to_string())
        .parse::<u16>()
        .unwrap_or_else(|_| {
            eprintln!("BACKEND_PORT must be a valid port number");
            std::process::exit(1);
        });

    println!("Starting Larkstore backend on http://{}:{}", host, port);

    let jwt = match std::env::var("BACKEND_JWT_SECRET") {
        Ok(jwt) => jwt,
        Err(_) => {
            eprintln!("BACKEND_JWT_SECRET must be set");
            std::process::exit(1);
        }
    };
    let security_config = SecurityConfig::new(jwt.as_bytes());

    // Create application state using unified builder
    let app_state = match build_state()
        .with_db(DbProfile::Prod)
        .with_security(security_config)
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    println!("Database connected");

    // One backend per limit group, created outside the factory closure so
    // every worker shares the same counters.
    let login_backend = rate_limit_backend();
    let api_backend = rate_limit_backend();

    // Wrap AppState with web::Data before passing to HttpServer
    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        let login_limiter =
            RateLimiter::builder(login_backend.clone(), auth_rate_limit_config().build())
                .add_headers()
                .build();
        let auth_api_limiter =
            RateLimiter::builder(api_backend.clone(), api_rate_limit_config().build())
                .add_headers()
                .build();
        let orders_limiter =
            RateLimiter::builder(api_backend.clone(), api_rate_limit_config().build())
                .add_headers()
                .build();
        let customers_limiter =
            RateLimiter::builder(api_backend.clone(), api_rate_limit_config().build())
                .add_headers()
                .build();

        App::new()
            .wrap(cors_middleware())
            .wrap(SecurityHeaders)
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .route("/", web::get().to(routes::health::root))
            .configure(routes::health::configure_routes)
            // Login stays outside the bearer guard and carries the
            // stricter per-IP limit. Registered before the guarded scope
            // so it wins the longer-prefix match.
            .service(
                web::resource("/api/auth/login")
                    .wrap(login_limiter)
                    .route(web::post().to(routes::auth::login)),
            )
            .service(
                web::scope("/api/auth")
                    .wrap(BearerAuth)
                    .wrap(auth_api_limiter)
                    .configure(routes::auth::configure_protected_routes),
            )
            .service(
                web::scope("/api/orders")
                    .wrap(BearerAuth)
                    .wrap(orders_limiter)
                    .configure(routes::orders::configure_routes),
            )
            .service(
                web::scope("/api/customers")
                    .wrap(BearerAuth)
                    .wrap(customers_limiter)
                    .configure(routes::customers::configure_routes),
            )
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
