pub mod azure;
pub mod github;
