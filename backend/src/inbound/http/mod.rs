//! HTTP inbound adapter: page handlers, session guards and error mapping.

pub mod error;
pub mod guard;
pub mod health;
pub mod news;
pub mod notes;
pub mod render;
pub mod session;
pub mod session_config;
pub mod state;
pub mod users;

pub use crate::domain::ApiResult;
