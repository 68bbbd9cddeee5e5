//! Tattoo Studio - conversational tattoo design assistant
//!
//! The [`conversation`] core holds the chat history and the in-flight request
//! flag. It talks to the backend through the [`client`] traits. The backend
//! itself ([`api`], [`db`], [`imagegen`]) ships as the `tattoo-server` binary.

pub mod api;
pub mod client;
pub mod config;
pub mod conversation;
pub mod db;
pub mod imagegen;
