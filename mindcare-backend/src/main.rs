use actix_web::{App, HttpServer, middleware::Logger, web};
use dotenv::dotenv;
use std::sync::Arc;

use mindcare_backend::ai::OpenAIClient;
use mindcare_backend::config::Config;
use mindcare_backend::group_chat::Roster;
use mindcare_backend::pipeline::ChatPipeline;
use mindcare_backend::{AppState, controllers, logging};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    logging::init();

    let config = Config::from_env();
    if let Some(warning) = config.credentials_warning() {
        log::warn!("{}", warning);
    }

    let client = OpenAIClient::from_config(&config)
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    log::info!(
        "Using model {} at {} ({} rounds per chat)",
        client.model(),
        client.endpoint(),
        config.max_rounds
    );

    let roster = Roster::mental_health();
    log::info!(
        "Group chat: {} → {}",
        roster.initiator().name,
        roster
            .speakers()
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(" → ")
    );
    let pipeline = ChatPipeline::new(Arc::new(client), roster, config.group_chat_config());

    let (host, port) = config.bind_address();
    log::info!("Starting mindcare server on http://{}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(AppState {
                pipeline: pipeline.clone(),
            }))
            .wrap(Logger::default())
            .configure(controllers::chat::config)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
