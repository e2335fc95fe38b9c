mod health;
mod relay;

pub use health::health_handler;
pub use relay::relay_handler;
