//! User operations and data shapes.

use std::path::Path;

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::{ApiResponse, ZendeskClient};
use crate::error::Error;

/// A Zendesk user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    /// False if the user has been deleted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    /// Alias displayed to end users in place of the real name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Whether the agent is a chat-only agent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_only: Option<bool>,
    /// Creation timestamp, as returned by the API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Custom role, for agents on the Enterprise plan.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_role_id: Option<i64>,
    /// Free-form details about the user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Primary email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Arbitrary id from an external system.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    /// User id, assigned by Zendesk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Timestamp of the last successful login.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<String>,
    /// Locale id of the user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale_id: Option<i64>,
    /// BCP-47 locale code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    /// Whether the user has forum moderation abilities.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moderator: Option<bool>,
    /// Full name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Free-form notes about the user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Whether the user may only create private comments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub only_private_comments: Option<bool>,
    /// Organization the user belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<i64>,
    /// Primary phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Profile picture.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<Attachment>,
    /// Whether the agent is restricted to certain tickets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restricted_agent: Option<bool>,
    /// Role: "end-user", "agent", or "admin".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Whether the user is a shared agent from another instance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_agent: Option<bool>,
    /// Whether the phone number is shared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_phone_number: Option<bool>,
    /// Whether the user is shared from another instance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared: Option<bool>,
    /// Signature appended to the agent's public comments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    /// Whether the user is suspended.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suspended: Option<bool>,
    /// Free-form tags.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Which tickets the user has access to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_restriction: Option<String>,
    /// Time zone name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    /// Whether two-factor authentication is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub two_factor_auth_enabled: Option<bool>,
    /// Last update timestamp, as returned by the API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// API url of this user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Values of custom user fields, keyed by field key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_fields: Option<Map<String, Value>>,
    /// Whether any identity of the user has been verified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
}

/// A file attached to a ticket comment or user profile.
///
/// Thumbnails nest one level only; a thumbnail never has thumbnails of its
/// own.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Attachment {
    /// Content type (e.g., `"image/png"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Download url of the file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_url: Option<String>,
    /// Name of the file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// Attachment id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Whether the attachment is displayed inline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline: Option<bool>,
    /// File size in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    /// Thumbnails of this attachment, for images.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnails: Option<Vec<Attachment>>,
}

#[derive(Serialize)]
struct UserRequest<'a, T> {
    user: &'a T,
}

#[derive(Deserialize)]
struct UserEnvelope {
    #[serde(default)]
    user: User,
}

#[derive(Serialize)]
struct PasswordChange<'a> {
    password: &'a str,
}

#[derive(Serialize)]
struct RemotePhoto<'a> {
    remote_photo_url: &'a str,
}

impl ZendeskClient {
    /// Create a user.
    ///
    /// `user` is wrapped in the `{"user": ...}` envelope as-is, so any
    /// serializable payload the API accepts can be passed, not just
    /// [`User`].
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be serialized, the request
    /// fails, or the response cannot be decoded.
    pub async fn create_user<T: Serialize>(&self, user: &T) -> Result<User, Error> {
        let body = self.marshal(&UserRequest { user })?;
        let response = self.send(Method::POST, "users.json", Some(body)).await?;
        let envelope: UserEnvelope = self.unmarshal(&response)?;
        Ok(envelope.user)
    }

    /// Fetch a single user by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// decoded.
    pub async fn show_user(&self, user_id: i64) -> Result<User, Error> {
        let response = self
            .send(Method::GET, &format!("users/{user_id}.json"), None)
            .await?;
        let envelope: UserEnvelope = self.unmarshal(&response)?;
        Ok(envelope.user)
    }

    /// Update a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be serialized, the request
    /// fails, or the response cannot be decoded.
    pub async fn update_user<T: Serialize>(&self, user_id: i64, user: &T) -> Result<User, Error> {
        let body = self.marshal(&UserRequest { user })?;
        let response = self
            .send(Method::PUT, &format!("users/{user_id}.json"), Some(body))
            .await?;
        let envelope: UserEnvelope = self.unmarshal(&response)?;
        Ok(envelope.user)
    }

    /// Set a user's password.
    ///
    /// The response body is returned raw; Zendesk's reply for this endpoint
    /// carries no useful JSON envelope.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn set_user_password(
        &self,
        user_id: i64,
        new_password: &str,
    ) -> Result<ApiResponse, Error> {
        let body = self.marshal(&PasswordChange {
            password: new_password,
        })?;
        self.send(
            Method::POST,
            &format!("users/{user_id}/password.json"),
            Some(body),
        )
        .await
    }

    /// Update a user's profile image from a local file or a remote url.
    ///
    /// Exactly one of `image_path` and `image_link` should be supplied. A
    /// local file is uploaded as multipart form data; a link is sent as a
    /// `{"user": {"remote_photo_url": ...}}` body for Zendesk to fetch.
    /// When both are supplied, the file path wins.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] without issuing a request when
    /// both arguments are `None`; otherwise errors as for any PUT.
    pub async fn update_user_profile_image(
        &self,
        user_id: i64,
        image_path: Option<&Path>,
        image_link: Option<&str>,
    ) -> Result<ApiResponse, Error> {
        let path = format!("users/{user_id}.json");

        if let Some(image_path) = image_path {
            return self
                .send_file(
                    Method::PUT,
                    &path,
                    "user[photo][uploaded_data]",
                    image_path,
                )
                .await;
        }

        if let Some(image_link) = image_link {
            let body = self.marshal(&UserRequest {
                user: &RemotePhoto {
                    remote_photo_url: image_link,
                },
            })?;
            return self.send(Method::PUT, &path, Some(body)).await;
        }

        Err(self.observe(Error::InvalidArgument("image_path or image_link")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_envelope_wraps_under_user_key() {
        let user = User {
            name: Some("Roger Wilco".to_string()),
            email: Some("roge@example.org".to_string()),
            ..User::default()
        };
        let value = serde_json::to_value(UserRequest { user: &user }).unwrap();
        assert_eq!(value["user"]["name"], "Roger Wilco");
        assert!(value["user"].get("suspended").is_none());
    }

    #[test]
    fn user_deserializes_with_missing_fields() {
        let user: User = serde_json::from_value(json!({
            "id": 9873843,
            "name": "Roger Wilco",
            "user_fields": {"department": "support"}
        }))
        .unwrap();
        assert_eq!(user.id, Some(9873843));
        assert_eq!(
            user.user_fields.unwrap().get("department"),
            Some(&json!("support"))
        );
        assert!(user.photo.is_none());
    }

    #[test]
    fn attachment_thumbnails_nest_one_level() {
        let photo: Attachment = serde_json::from_value(json!({
            "id": 928374,
            "file_name": "profile.png",
            "content_type": "image/png",
            "size": 166144,
            "thumbnails": [
                {"id": 928375, "file_name": "profile_thumb.png", "size": 1024}
            ]
        }))
        .unwrap();
        let thumbnails = photo.thumbnails.unwrap();
        assert_eq!(thumbnails.len(), 1);
        assert_eq!(thumbnails[0].file_name.as_deref(), Some("profile_thumb.png"));
        assert!(thumbnails[0].thumbnails.is_none());
    }

    #[test]
    fn remote_photo_body_shape() {
        let value = serde_json::to_value(UserRequest {
            user: &RemotePhoto {
                remote_photo_url: "https://example.com/photo.png",
            },
        })
        .unwrap();
        assert_eq!(
            value,
            json!({"user": {"remote_photo_url": "https://example.com/photo.png"}})
        );
    }
}
