/// Subscriber shape, resolved from `Settings` once at startup.
pub struct TracingConfig {
    pub environment: String,
    /// Base level for the fallback filter when `RUST_LOG` is unset.
    pub level: String,
    pub json_format: bool,
}
