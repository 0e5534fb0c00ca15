//! Zendesk REST API client.
//!
//! This crate provides a thin, typed client for the Zendesk v2 API covering
//! ticket and user operations. Every request is authenticated with Zendesk's
//! token-auth convention (Basic Auth with `<email>/token` as the username)
//! and every response body is decoded from the API's one-level JSON envelope
//! (`{"ticket": ...}`, `{"user": ...}`).
//!
//! # Example
//!
//! ```no_run
//! use zendesk_client::{Ticket, ZendeskClient};
//!
//! # async fn example() -> Result<(), zendesk_client::Error> {
//! let client = ZendeskClient::new(
//!     "agent@example.com",
//!     "api-token",
//!     "https://example.zendesk.com",
//! );
//!
//! let ticket = Ticket {
//!     subject: Some("Printer on fire".to_string()),
//!     description: Some("Smoke is coming out of the tray.".to_string()),
//!     ..Ticket::default()
//! };
//!
//! let created = client.create_ticket(&ticket).await?;
//! println!("created ticket {:?}", created.ticket.id);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;
mod ticket;
mod user;

pub use client::{ApiResponse, ClientOptions, ErrorObserver, ZendeskClient};
pub use error::Error;
pub use ticket::{
    Audit, CreateTicketAsyncResponse, CreateTicketResponse, CustomField, JobStatus,
    JobStatusResult, Source, Ticket, TicketRef, Via,
};
pub use user::{Attachment, User};

pub use reqwest::Method;
pub use reqwest::StatusCode;
