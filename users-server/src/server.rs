use crate::application::user_service::UserService;
use crate::data::user_repository::UserRepository;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::database::ConnectionSupervisor;
use crate::presentation::handlers::{system, user};
use crate::presentation::middleware::{CatchPanic, RequestIdMiddleware, TimingMiddleware};
use crate::presentation::utils::{AppInfo, json_config, route_not_found};
use actix_cors::Cors;
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::{DefaultHeaders, Logger};
use actix_web::{App, HttpServer, web};
use tracing::info;

/// Registers shared state and every route under `/api`.
pub fn configure<R: UserRepository + 'static>(
    service: UserService<R>,
    info: AppInfo,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(service))
            .app_data(web::Data::new(info))
            .app_data(json_config())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(system::health))
                    .route("/db-status", web::get().to(system::db_status::<R>))
                    .route("/stats", web::get().to(system::stats::<R>))
                    .service(
                        web::resource("/users")
                            .route(web::get().to(user::list_users::<R>))
                            .route(web::post().to(user::create_user::<R>))
                            .default_service(web::to(route_not_found)),
                    )
                    .service(
                        web::resource("/users/{id}")
                            .route(web::get().to(user::get_user::<R>))
                            .route(web::delete().to(user::delete_user::<R>))
                            .default_service(web::to(route_not_found)),
                    ),
            )
            .default_service(web::to(route_not_found));
    }
}

/// The full application as served: middleware stack around [`configure`].
pub fn build_app<R: UserRepository + 'static>(
    service: UserService<R>,
    info: AppInfo,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(CatchPanic)
        .wrap(Logger::default())
        .wrap(TimingMiddleware)
        .wrap(RequestIdMiddleware)
        .wrap(
            DefaultHeaders::new()
                .add(("X-Content-Type-Options", "nosniff"))
                .add(("Referrer-Policy", "no-referrer")),
        )
        .wrap(build_cors())
        .configure(configure(service, info))
}

pub async fn run<R: UserRepository + 'static>(
    config: AppConfig,
    service: UserService<R>,
    supervisor: ConnectionSupervisor,
) -> anyhow::Result<()> {
    let info = AppInfo::new(config.database.name.clone());
    let bind_address = (config.host.clone(), config.port);

    let app_service = service.clone();
    let server = HttpServer::new(move || build_app(app_service.clone(), info.clone()))
    .disable_signals()
    .bind(bind_address)?
    .run();

    info!(port = config.port, "server started");
    info!(environment = %config.environment, "environment");
    info!(
        database = %format!(
            "{}:{}/{}",
            config.database.host, config.database.port, config.database.name
        ),
        "database target"
    );

    let handle = server.handle();
    tokio::spawn(async move {
        let signal = shutdown_signal().await;
        info!(signal, "received signal, shutting down");
        handle.stop(false).await;
    });

    server.await?;

    supervisor.shutdown();
    service.close().await;
    info!("shutdown complete");
    Ok(())
}

fn build_cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
        .allowed_headers(vec![actix_web::http::header::CONTENT_TYPE])
        .max_age(3600)
}

#[cfg(unix)]
async fn shutdown_signal() -> &'static str {
    use tokio::signal::unix::{SignalKind, signal};

    let Ok(mut terminate) = signal(SignalKind::terminate()) else {
        let _ = tokio::signal::ctrl_c().await;
        return "SIGINT";
    };

    tokio::select! {
        _ = terminate.recv() => "SIGTERM",
        _ = tokio::signal::ctrl_c() => "SIGINT",
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() -> &'static str {
    let _ = tokio::signal::ctrl_c().await;
    "SIGINT"
}
