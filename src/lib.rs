pub mod classify;
pub mod config;
pub mod entry;
pub mod ev;
pub mod feed;
pub mod hit_rate;
pub mod http_cache;
pub mod http_client;
pub mod injury;
pub mod odds;
pub mod pipeline;
pub mod provider;
pub mod sample;
pub mod selector;
pub mod session;
pub mod sports;
pub mod state;
