use crate::config::Config;
use crate::error::Result;
use crate::routes;
use crate::services::{CatalogStore, PlatformClient, RecommendationEngine};
use actix_files::Files;
use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::{cookie::Key, middleware::Logger, web, App, HttpServer};
use log::info;
use std::net::TcpListener;
use std::sync::Arc;

pub struct Application {
    config: Config,
}

impl Application {
    /// Create a new application instance
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Build and run the server
    pub async fn run(&self) -> Result<()> {
        let bind_address = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&bind_address)?;
        info!("Starting server at http://{bind_address}");

        self.run_with_listener(listener).await
    }

    /// Run the server with a specific TCP listener
    /// This is useful for testing where we want to use a random port
    pub async fn run_with_listener(&self, listener: TcpListener) -> Result<()> {
        let config = self.config.clone();

        // Load-once, read-only tables shared across workers.
        let store = Arc::new(CatalogStore::load(&config));
        let platform = PlatformClient::new(&config);
        let engine = web::Data::new(RecommendationEngine::new(platform, Arc::clone(&store)));
        let store = web::Data::from(store);
        let config_data = web::Data::new(config.clone());

        // Sessions are signed with a fresh key per process; demo sessions do
        // not need to survive a restart.
        let session_key = Key::generate();
        let clothes_dir = config.clothes_dir();
        let models_dir = config.models_dir();

        HttpServer::new(move || {
            App::new()
                .wrap(Logger::default())
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), session_key.clone())
                        .cookie_secure(false)
                        .build(),
                )
                .app_data(engine.clone())
                .app_data(store.clone())
                .app_data(config_data.clone())
                .configure(routes::configure)
                .service(Files::new("/static/images/clothes", clothes_dir.clone()))
                .service(Files::new("/static/images/models", models_dir.clone()))
        })
        .listen(listener)?
        .run()
        .await?;

        Ok(())
    }
}
