pub mod ai;
pub mod config;
pub mod controllers;
pub mod error;
pub mod group_chat;
pub mod logging;
pub mod pipeline;

use pipeline::ChatPipeline;

pub struct AppState {
    pub pipeline: ChatPipeline,
}
