pub mod leagues;
pub mod pipeline;
pub mod stat_map;

pub use leagues::{active_leagues, SupportedLeague, SUPPORTED_LEAGUES};
pub use pipeline::IngestionPipeline;
