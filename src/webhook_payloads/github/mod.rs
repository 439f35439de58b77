mod event_type;
mod github_repository;
mod payload;

pub use event_type::{GithubEventType, EVENT_HEADER};
pub use github_repository::GithubRepository;
pub use payload::GithubWebhookPayload;
