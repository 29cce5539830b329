pub mod branches_handler;
pub mod health;
pub mod references_handler;
pub mod schedule_handler;
pub mod settings_handler;
pub mod therapists_handler;

pub use health::health_check;
