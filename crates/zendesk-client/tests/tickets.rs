//! Ticket operation integration tests against a local mock server.

use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zendesk_client::{Error, Ticket, ZendeskClient};

fn client(server: &MockServer) -> ZendeskClient {
    ZendeskClient::new("a@b.com", "tok123", server.uri())
}

#[tokio::test]
async fn create_ticket_posts_envelope_and_decodes_audit() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/tickets.json"))
        .and(body_json(json!({
            "ticket": {"subject": "Printer on fire", "priority": "urgent"}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "ticket": {"id": 35436, "subject": "Printer on fire", "status": "new"},
            "audit": {"id": 2, "ticket_id": 35436, "author_id": 7}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = client(&server)
        .create_ticket(&json!({"subject": "Printer on fire", "priority": "urgent"}))
        .await
        .unwrap();
    assert_eq!(created.ticket.id, Some(35436));
    assert_eq!(created.ticket.status.as_deref(), Some("new"));
    assert_eq!(created.audit.ticket_id, Some(35436));
    assert_eq!(created.audit.author_id, Some(7));
}

#[tokio::test]
async fn create_ticket_async_sets_async_flag_and_returns_job() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/tickets.json"))
        .and(query_param("async", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ticket": {"id": 35437},
            "job_status": {
                "id": "8b726e606741012ffc2d782bcb7848fe",
                "status": "queued",
                "url": "https://example.zendesk.com/api/v2/job_statuses/8b72.json"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server)
        .create_ticket_async(&json!({"subject": "Bulk me"}))
        .await
        .unwrap();
    assert_eq!(response.ticket.id, Some(35437));
    let job = response.job_status.unwrap();
    assert_eq!(job.id.as_deref(), Some("8b726e606741012ffc2d782bcb7848fe"));
    assert_eq!(job.status.as_deref(), Some("queued"));
}

#[tokio::test]
async fn show_ticket_unwraps_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/tickets/35436.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ticket": {
                "id": 35436,
                "subject": "Printer on fire",
                "tags": ["printer", "fire"],
                "via": {"channel": "web"}
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ticket = client(&server).show_ticket(35436).await.unwrap();
    assert_eq!(ticket.id, Some(35436));
    assert_eq!(
        ticket.tags,
        Some(vec!["printer".to_string(), "fire".to_string()])
    );
    assert_eq!(ticket.via.unwrap().channel.as_deref(), Some("web"));
}

#[tokio::test]
async fn show_tickets_joins_ids_with_commas() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/tickets/show_many.json"))
        .and(query_param("ids", "3,7,42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tickets": [{"id": 3}, {"id": 7}, {"id": 42}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tickets = client(&server).show_tickets(&[3, 7, 42]).await.unwrap();
    assert_eq!(tickets.len(), 3);
    assert_eq!(tickets[2].id, Some(42));
}

#[tokio::test]
async fn list_tickets_appends_sort_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/organizations/5/tickets.json"))
        .and(query_param("sort_by", "created_at"))
        .and(query_param("sort_order", "desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tickets": [{"id": 1}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tickets = client(&server)
        .list_tickets(
            "organizations/5/tickets.json",
            Some("created_at"),
            Some("desc"),
        )
        .await
        .unwrap();
    assert_eq!(tickets.len(), 1);
}

#[tokio::test]
async fn list_tickets_without_sort_sends_plain_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/tickets.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"tickets": []})))
        .expect(1)
        .mount(&server)
        .await;

    let tickets = client(&server)
        .list_tickets("tickets.json", None, None)
        .await
        .unwrap();
    assert!(tickets.is_empty());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn list_tickets_rejects_empty_url_without_network_call() {
    let server = MockServer::start().await;

    let err = client(&server)
        .list_tickets("", Some("created_at"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument("url")));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn ticket_round_trips_through_the_envelope() {
    let ticket = Ticket {
        id: Some(35436),
        subject: Some("Printer on fire".to_string()),
        description: Some("Smoke is coming out of the tray.".to_string()),
        priority: Some("urgent".to_string()),
        status: Some("open".to_string()),
        kind: Some("incident".to_string()),
        tags: Some(vec!["printer".to_string()]),
        requester_id: Some(20978392),
        created_at: Some("2024-05-01T10:38:52Z".to_string()),
        ..Ticket::default()
    };

    // The mock echoes the marshaled ticket back unwrapped in the envelope.
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/tickets.json"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "ticket": serde_json::to_value(&ticket).unwrap(),
            "audit": {}
        })))
        .mount(&server)
        .await;

    let created = client(&server).create_ticket(&ticket).await.unwrap();
    let echoed = created.ticket;
    assert_eq!(echoed.id, ticket.id);
    assert_eq!(echoed.subject, ticket.subject);
    assert_eq!(echoed.description, ticket.description);
    assert_eq!(echoed.priority, ticket.priority);
    assert_eq!(echoed.status, ticket.status);
    assert_eq!(echoed.kind, ticket.kind);
    assert_eq!(echoed.tags, ticket.tags);
    assert_eq!(echoed.requester_id, ticket.requester_id);
    assert_eq!(echoed.created_at, ticket.created_at);
}
