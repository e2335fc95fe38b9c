/// A point from the platform location stream. Best-effort: may be stale or
/// absent entirely, and analysis must proceed without it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}
