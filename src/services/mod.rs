pub mod metrics_manager;
pub mod mood;
pub mod relay;
pub mod session_manager;
