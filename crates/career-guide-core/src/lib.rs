pub mod chat;
pub mod config;
pub mod pages;
pub mod routes;

// Re-export main types for convenience
pub use chat::{ChatError, ChatRole, ChatSession, CompletionClient, GroqClient, Message, Submission};
pub use config::{Config, CredentialSource, EnvCredentials};
pub use pages::{Carousel, CompanyPage};
pub use routes::{NavDock, Route};
