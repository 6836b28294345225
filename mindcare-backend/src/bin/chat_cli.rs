//! Group chat harness
//!
//! Runs one submission against the configured provider without booting the
//! web server, printing every turn and then the text the form would show.
//!
//! Usage:
//!   CHAT_INPUT="anxious and tired" \
//!   OPENAI_API_KEY="your-api-key" \
//!   MODEL_ID="gpt-4o-mini" \
//!   cargo run --bin chat_cli

use std::env;
use std::sync::Arc;

use mindcare_backend::ai::OpenAIClient;
use mindcare_backend::config::Config;
use mindcare_backend::group_chat::{Roster, extract_response};
use mindcare_backend::logging;
use mindcare_backend::pipeline::{ChatPipeline, ERROR_PREFIX};

const DEFAULT_INPUT: &str = "anxious and tired";

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    logging::init();

    let input = env::var("CHAT_INPUT").unwrap_or_else(|_| {
        eprintln!("⚠️  CHAT_INPUT not set. Using '{}'.", DEFAULT_INPUT);
        DEFAULT_INPUT.to_string()
    });

    let config = Config::from_env();
    let client = match OpenAIClient::from_config(&config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    println!("📝 Configuration:");
    println!("   Input:    {}", input);
    println!("   Endpoint: {}", client.endpoint());
    println!("   Model:    {}", client.model());
    println!("   Rounds:   {}", config.max_rounds);
    if let Some(warning) = config.credentials_warning() {
        println!("   ⚠️  {}", warning);
    }

    let pipeline = ChatPipeline::new(
        Arc::new(client),
        Roster::mental_health(),
        config.group_chat_config(),
    );

    match pipeline.run(&input).await {
        Ok(conversation) => {
            for (i, turn) in conversation.turns().iter().enumerate() {
                println!("\n----------------------------------------------------------");
                println!("💬 Turn {} - {}", i, turn.speaker);
                println!("----------------------------------------------------------");
                println!("{}", turn.text);
            }

            println!("\n==========================================================");
            println!("🎉 AI Response");
            println!("==========================================================");
            println!("{}", extract_response(conversation.turns(), pipeline.roster()));
        }
        Err(e) => {
            println!("\n==========================================================");
            println!("❌ ERROR");
            println!("==========================================================");
            println!("{}{}", ERROR_PREFIX, e);
            std::process::exit(1);
        }
    }
}
