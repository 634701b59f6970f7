pub mod config;
pub mod context;
pub mod error;
pub mod payload;
pub mod routes;

use std::io;

use actix_web::{App, HttpServer, middleware, web};

pub use config::ServerConfig;
pub use context::ServiceContext;
pub use error::{Result, ServerErr, ValidationError};

/// Serves predictions until the process receives a shutdown signal.
///
/// # Arguments
/// * `config` - Where to bind and how many workers to spawn.
/// * `context` - The loaded model, shared read-only by every worker.
pub async fn run(config: ServerConfig, context: ServiceContext) -> io::Result<()> {
    let context = web::Data::new(context);
    log::info!("listening on {}", config.addr());

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(context.clone())
            .configure(routes::configure)
    });

    if let Some(workers) = config.workers {
        server = server.workers(workers.get());
    }

    server.bind((config.host.as_str(), config.port))?.run().await
}
