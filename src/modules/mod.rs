pub mod checkout;
pub mod config;
pub mod logger;
pub mod poller;

// Re-export the common entry points at the modules namespace top level
pub use checkout::CheckoutClient;
pub use config::load_app_config;
pub use logger::init_logger;
pub use poller::{PollHandle, ShiftPoller, StatusSource};
