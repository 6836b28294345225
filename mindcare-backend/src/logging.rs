use env_logger::Env;

/// Filter used when `RUST_LOG` is unset. Keeps HTTP client and server
/// internals quiet.
pub const DEFAULT_FILTER: &str = "info,reqwest=warn,hyper=warn,actix_server=warn";

pub fn init() {
    env_logger::Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER)).init();
}
