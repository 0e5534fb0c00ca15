//! Ticket operations and data shapes.
//!
//! Every field of every response type is independently optional: Zendesk is
//! authoritative for which fields are present, and absent fields must never
//! fail deserialization. Heterogeneous fields (satisfaction rating, custom
//! field values, via-source endpoints) are kept as raw JSON values.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::ZendeskClient;
use crate::error::Error;

/// A Zendesk ticket.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ticket {
    /// Whether channelback is allowed on this ticket.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_channelback: Option<bool>,
    /// Agent currently assigned to the ticket.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<i64>,
    /// Brand the ticket is associated with.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_id: Option<i64>,
    /// Users cc'd on the ticket.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collaborator_ids: Option<Vec<i64>>,
    /// Creation timestamp, as returned by the API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Custom field entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<Vec<CustomField>>,
    /// First comment / description of the ticket.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Due date for tickets of type "task".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_at: Option<String>,
    /// Arbitrary id from an external system.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    /// Raw field entries (shape varies by account configuration).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<Value>>,
    /// Ids of follow-up tickets (closed tickets only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub followup_ids: Option<Vec<i64>>,
    /// Forum topic the ticket originated from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forum_topic_id: Option<i64>,
    /// Group the ticket is assigned to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<i64>,
    /// Whether the ticket has linked incidents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_incidents: Option<bool>,
    /// Ticket id, assigned by Zendesk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Organization of the requester.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<i64>,
    /// Priority: "urgent", "high", "normal", or "low".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    /// Problem this incident is linked to, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem_id: Option<i64>,
    /// Subject before any CC/macro processing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_subject: Option<String>,
    /// Original recipient email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    /// User who requested the ticket.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester_id: Option<i64>,
    /// Satisfaction rating; string, object, or null depending on plan.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub satisfaction_rating: Option<Value>,
    /// Sharing agreements the ticket is shared under.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sharing_agreement_ids: Option<Vec<i64>>,
    /// Status: "new", "open", "pending", "hold", "solved", or "closed".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Ticket subject.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// User who submitted the ticket.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitter_id: Option<i64>,
    /// Free-form tags.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Ticket form the ticket was created with (Enterprise).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_form_id: Option<i64>,
    /// Type: "problem", "incident", "question", or "task".
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Last update timestamp, as returned by the API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// API url of this ticket.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Channel the ticket was created through.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub via: Option<Via>,
}

/// Channel/source descriptor attached to tickets and audits.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Via {
    /// Channel name (e.g., "web", "email", "api").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    /// Channel-specific source endpoints.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
}

/// Source endpoints of a [`Via`] record; shapes vary per channel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Source {
    /// Originating endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Value>,
    /// Relationship of the source to the ticket.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rel: Option<Value>,
    /// Receiving endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Value>,
}

/// A custom field entry on a ticket.
///
/// The value is string, number, boolean, or null depending on the field's
/// configured type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomField {
    /// Custom field id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Value for this ticket.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// Audit trail record returned alongside a created ticket.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Audit {
    /// User who caused the audit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<i64>,
    /// Creation timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Events that make up the audit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<Value>>,
    /// Audit id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Channel-specific metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    /// Ticket the audit belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<i64>,
    /// Channel the audited change came through.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub via: Option<Via>,
}

/// State of an asynchronous bulk operation.
///
/// Returned by [`ZendeskClient::create_ticket_async`]. This client does not
/// poll for completion; callers can do so themselves using the job id.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobStatus {
    /// Job id, usable for status polling.
    pub id: Option<String>,
    /// Human-readable progress message.
    pub message: Option<String>,
    /// Number of items processed so far.
    pub progress: Option<i64>,
    /// Per-item results.
    pub results: Option<Vec<JobStatusResult>>,
    /// Job state (e.g., "queued", "working", "completed").
    pub status: Option<String>,
    /// Total number of items in the job.
    pub total: Option<i64>,
    /// API url of the job status.
    pub url: Option<String>,
}

/// Outcome of a single item within a bulk job.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobStatusResult {
    /// Action performed on the item.
    pub action: Option<String>,
    /// Error text, when the item failed.
    pub errors: Option<String>,
    /// Id of the affected record.
    pub id: Option<i64>,
    /// Item state.
    pub status: Option<String>,
    /// Whether the item succeeded.
    pub success: Option<bool>,
    /// Title of the affected record.
    pub title: Option<String>,
}

/// Response of [`ZendeskClient::create_ticket`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTicketResponse {
    /// The created ticket.
    #[serde(default)]
    pub ticket: Ticket,
    /// Audit trail of the creation.
    #[serde(default)]
    pub audit: Audit,
}

/// Minimal ticket reference returned by the async creation call.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketRef {
    /// Id of the new ticket.
    pub id: Option<i64>,
}

/// Response of [`ZendeskClient::create_ticket_async`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTicketAsyncResponse {
    /// Reference to the new ticket.
    #[serde(default)]
    pub ticket: TicketRef,
    /// Descriptor of the queued bulk job.
    pub job_status: Option<JobStatus>,
}

#[derive(Serialize)]
struct TicketRequest<'a, T> {
    ticket: &'a T,
}

#[derive(Deserialize)]
struct TicketEnvelope {
    #[serde(default)]
    ticket: Ticket,
}

#[derive(Deserialize)]
struct TicketsEnvelope {
    #[serde(default)]
    tickets: Vec<Ticket>,
}

impl ZendeskClient {
    /// Create a ticket.
    ///
    /// `ticket` is wrapped in the `{"ticket": ...}` envelope as-is, so any
    /// serializable payload the API accepts can be passed, not just
    /// [`Ticket`].
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be serialized, the request
    /// fails, or the response cannot be decoded.
    pub async fn create_ticket<T: Serialize>(
        &self,
        ticket: &T,
    ) -> Result<CreateTicketResponse, Error> {
        let body = self.marshal(&TicketRequest { ticket })?;
        let response = self.send(Method::POST, "tickets.json", Some(body)).await?;
        self.unmarshal(&response)
    }

    /// Create a ticket asynchronously.
    ///
    /// Zendesk queues the creation as a bulk job and returns immediately
    /// with the new ticket's id and a [`JobStatus`] descriptor. No polling
    /// is performed.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be serialized, the request
    /// fails, or the response cannot be decoded.
    pub async fn create_ticket_async<T: Serialize>(
        &self,
        ticket: &T,
    ) -> Result<CreateTicketAsyncResponse, Error> {
        let body = self.marshal(&TicketRequest { ticket })?;
        let response = self
            .send(Method::POST, "tickets.json?async=true", Some(body))
            .await?;
        self.unmarshal(&response)
    }

    /// Fetch a single ticket by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// decoded.
    pub async fn show_ticket(&self, id: i64) -> Result<Ticket, Error> {
        let response = self
            .send(Method::GET, &format!("tickets/{id}.json"), None)
            .await?;
        let envelope: TicketEnvelope = self.unmarshal(&response)?;
        Ok(envelope.ticket)
    }

    /// Fetch many tickets in one call, by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// decoded.
    pub async fn show_tickets(&self, ids: &[i64]) -> Result<Vec<Ticket>, Error> {
        let joined = ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let response = self
            .send(
                Method::GET,
                &format!("tickets/show_many.json?ids={joined}"),
                None,
            )
            .await?;
        let envelope: TicketsEnvelope = self.unmarshal(&response)?;
        Ok(envelope.tickets)
    }

    /// Fetch a ticket listing from an arbitrary API path.
    ///
    /// `url` is a listing path relative to the API root, e.g.
    /// `"tickets.json"` or `"organizations/5/tickets.json"`. `sort_by` and
    /// `sort_order` are appended as query parameters when present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] without issuing a request when
    /// `url` is empty; otherwise errors as for any GET.
    pub async fn list_tickets(
        &self,
        url: &str,
        sort_by: Option<&str>,
        sort_order: Option<&str>,
    ) -> Result<Vec<Ticket>, Error> {
        if url.is_empty() {
            return Err(self.observe(Error::InvalidArgument("url")));
        }

        let mut query = Vec::new();
        if let Some(sort_by) = sort_by {
            query.push(format!("sort_by={sort_by}"));
        }
        if let Some(sort_order) = sort_order {
            query.push(format!("sort_order={sort_order}"));
        }
        let path = if query.is_empty() {
            url.to_string()
        } else {
            format!("{url}?{}", query.join("&"))
        };

        let response = self.send(Method::GET, &path, None).await?;
        let envelope: TicketsEnvelope = self.unmarshal(&response)?;
        Ok(envelope.tickets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_envelope_wraps_under_ticket_key() {
        let ticket = Ticket {
            subject: Some("Help".to_string()),
            tags: Some(vec!["vip".to_string()]),
            ..Ticket::default()
        };
        let value = serde_json::to_value(TicketRequest { ticket: &ticket }).unwrap();
        assert_eq!(value["ticket"]["subject"], "Help");
        assert_eq!(value["ticket"]["tags"], json!(["vip"]));
        // Absent fields are not serialized at all.
        assert!(value["ticket"].get("priority").is_none());
    }

    #[test]
    fn ticket_deserializes_with_missing_and_unknown_fields() {
        let ticket: Ticket = serde_json::from_value(json!({
            "id": 35436,
            "subject": "Printer on fire",
            "future_field": {"nested": true}
        }))
        .unwrap();
        assert_eq!(ticket.id, Some(35436));
        assert_eq!(ticket.subject.as_deref(), Some("Printer on fire"));
        assert!(ticket.status.is_none());
        assert!(ticket.via.is_none());
    }

    #[test]
    fn type_field_round_trips_under_reserved_name() {
        let ticket = Ticket {
            kind: Some("incident".to_string()),
            ..Ticket::default()
        };
        let value = serde_json::to_value(&ticket).unwrap();
        assert_eq!(value["type"], "incident");

        let back: Ticket = serde_json::from_value(value).unwrap();
        assert_eq!(back.kind.as_deref(), Some("incident"));
    }

    #[test]
    fn custom_field_values_stay_heterogeneous() {
        let fields: Vec<CustomField> = serde_json::from_value(json!([
            {"id": 1, "value": "text"},
            {"id": 2, "value": 42},
            {"id": 3, "value": null},
            {"id": 4, "value": {"key": "object"}}
        ]))
        .unwrap();
        assert_eq!(fields[0].value, Some(json!("text")));
        assert_eq!(fields[1].value, Some(json!(42)));
        assert_eq!(fields[2].value, None);
        assert_eq!(fields[3].value, Some(json!({"key": "object"})));
    }

    #[test]
    fn job_status_decodes_results() {
        let status: JobStatus = serde_json::from_value(json!({
            "id": "8b726e606741012ffc2d782bcb7848fe",
            "progress": 2,
            "total": 2,
            "status": "completed",
            "results": [
                {"id": 244, "action": "update", "success": true, "status": "Updated"},
                {"id": 245, "success": false, "errors": "RequesterId: requester invalid"}
            ]
        }))
        .unwrap();
        let results = status.results.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].success, Some(true));
        assert_eq!(
            results[1].errors.as_deref(),
            Some("RequesterId: requester invalid")
        );
    }
}
