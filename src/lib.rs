pub mod api_router;
pub mod classifications;
pub mod classifier;
pub mod combined;
pub mod core;
pub mod dashboards;
pub mod llm;
pub mod main_module;
pub mod reports;
pub mod tickets;
