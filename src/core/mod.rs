pub mod budget;
pub mod chat_stream;
pub mod config;
pub mod credentials;
pub mod emotion;
pub mod error;
pub mod keyring;
pub mod message;
pub mod models;
pub mod notice;
pub mod orchestrator;
pub mod sentiment;
pub mod session;
#[cfg(test)]
pub(crate) mod test_support;
