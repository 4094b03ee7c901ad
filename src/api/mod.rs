pub mod football;

pub use football::{ApiError, FootballApiClient};
