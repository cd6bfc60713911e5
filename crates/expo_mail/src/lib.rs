//! Outgoing email for the Expo service.
//!
//! [`HttpEmailSender`] posts messages to the hosted email endpoint,
//! [`templates`] renders the Spanish HTML bodies, and [`notify`] is the
//! log-and-continue wrapper every flow uses after its writes succeed.

pub mod client;
pub mod notify;
pub mod templates;

pub use client::{HttpEmailSender, MailError};
pub use notify::notify;
