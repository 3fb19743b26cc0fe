use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer};
use log::info;

use studysync::auth::AuthService;
use studysync::config::AppConfig;
use studysync::AppServices;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = AppConfig::from_env()?;
    let pool = studysync::connect(&config).await?;

    let services = AppServices::new(pool.clone(), AuthService::new(pool, config.jwt_secret.clone()));
    let (host, port) = config.bind_address();
    info!("Starting server at http://{}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        let services = services.clone();
        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .configure(move |cfg| services.configure(cfg))
    })
    .bind((host, port))?
    .run()
    .await?;

    Ok(())
}
