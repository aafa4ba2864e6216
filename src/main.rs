use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use sqlx::PgPool;
use std::sync::Arc;

use taskvault::auth::{AuthMiddleware, TokenService};
use taskvault::avatar::{AvatarProcessor, PassthroughAvatarProcessor};
use taskvault::config::Config;
use taskvault::routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();

    let pool = PgPool::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    let token_service = web::Data::new(TokenService::new(&config.jwt_secret));
    let avatar_processor: Arc<dyn AvatarProcessor> = Arc::new(PassthroughAvatarProcessor);
    let avatar_processor = web::Data::from(avatar_processor);

    log::info!("Starting TaskVault server at {}", config.server_url());

    let bind_addr = (config.server_host.clone(), config.server_port);
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(token_service.clone())
            .app_data(avatar_processor.clone())
            // Raw-body extractor limit; the avatar handler enforces its own
            // 1MB cap with a 400 below this ceiling.
            .app_data(web::PayloadConfig::new(10 * 1024 * 1024))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(routes::health::health)
            .service(
                web::scope("")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            )
    })
    .bind(bind_addr)?
    .run()
    .await
}
