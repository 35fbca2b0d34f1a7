//! API routes for the chat server

pub mod chat;
pub mod upload;
