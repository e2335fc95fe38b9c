/// Identity of one analysis session.
///
/// Strictly increasing; results produced under a superseded generation are
/// ignored rather than played or displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SessionGeneration(pub u64);
