//! Typed client for the document + chat REST API.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::ApiConfig;
use crate::error::{DocdeskError, Result};
use crate::model::*;
use crate::upload::UploadSelection;

/// Thin wrapper around `reqwest::Client`. Cheap to clone.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl ApiClient {
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, builder: RequestBuilder, session: &Session) -> RequestBuilder {
        builder.header(reqwest::header::AUTHORIZATION, session.bearer())
    }

    // -- Auth --

    /// POST /api/auth/login
    pub async fn login(&self, request: &LoginRequest) -> Result<Session> {
        tracing::debug!(email = %request.email, "login");
        let resp = self
            .client
            .post(self.url("/api/auth/login"))
            .json(request)
            .send()
            .await?;
        let body: LoginResponse = decode(resp).await?;
        Ok(body.into())
    }

    /// POST /api/auth/register. Returns the server's confirmation message.
    pub async fn register(&self, request: &RegisterRequest) -> Result<Option<String>> {
        tracing::debug!(company = %request.company_name, "register");
        let resp = self
            .client
            .post(self.url("/api/auth/register"))
            .json(request)
            .send()
            .await?;
        let ack: Ack = decode(resp).await?;
        Ok(ack.message)
    }

    /// POST /api/auth/logout
    pub async fn logout(&self, session: &Session) -> Result<()> {
        let resp = self
            .authed(self.client.post(self.url("/api/auth/logout")), session)
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }

    /// GET /api/auth/me
    pub async fn me(&self, session: &Session) -> Result<Profile> {
        let resp = self
            .authed(self.client.get(self.url("/api/auth/me")), session)
            .send()
            .await?;
        decode(resp).await
    }

    // -- Documents --

    /// GET /api/documents/stats
    pub async fn stats(&self, session: &Session) -> Result<DocumentStats> {
        let resp = self
            .authed(self.client.get(self.url("/api/documents/stats")), session)
            .send()
            .await?;
        decode(resp).await
    }

    /// GET /api/documents
    pub async fn list_documents(&self, session: &Session) -> Result<Vec<Document>> {
        let resp = self
            .authed(self.client.get(self.url("/api/documents")), session)
            .send()
            .await?;
        let list: DocumentList = decode(resp).await?;
        tracing::debug!(count = list.documents.len(), "documents loaded");
        Ok(list.documents)
    }

    /// POST /api/documents/upload as multipart, one `files` part per file.
    pub async fn upload(
        &self,
        session: &Session,
        selection: &UploadSelection,
    ) -> Result<UploadResponse> {
        selection.validate()?;

        let mut form = Form::new();
        for file in selection.files() {
            let bytes = tokio::fs::read(&file.path).await?;
            let part = Part::bytes(bytes).file_name(file.name.clone());
            form = form.part("files", part);
        }

        tracing::debug!(
            files = selection.len(),
            bytes = selection.total_size(),
            "uploading"
        );
        let resp = self
            .authed(self.client.post(self.url("/api/documents/upload")), session)
            .multipart(form)
            .send()
            .await?;
        decode(resp).await
    }

    /// DELETE /api/documents/{id}
    pub async fn delete_document(&self, session: &Session, id: i64) -> Result<Option<String>> {
        let resp = self
            .authed(
                self.client.delete(self.url(&format!("/api/documents/{id}"))),
                session,
            )
            .send()
            .await?;
        let ack: Ack = decode(resp).await?;
        Ok(ack.message)
    }

    /// GET /api/documents/download/{id}. Returns the raw file body.
    pub async fn download_document(&self, session: &Session, id: i64) -> Result<Vec<u8>> {
        let resp = self
            .authed(
                self.client
                    .get(self.url(&format!("/api/documents/download/{id}"))),
                session,
            )
            .send()
            .await?;
        let resp = check(resp).await?;
        Ok(resp.bytes().await?.to_vec())
    }

    // -- Chat --

    /// POST /api/chat/message. Returns the assistant's reply text.
    pub async fn send_chat(&self, session: &Session, message: &str) -> Result<String> {
        let resp = self
            .authed(self.client.post(self.url("/api/chat/message")), session)
            .json(&ChatRequest {
                message: message.to_string(),
            })
            .send()
            .await?;
        let reply: ChatReply = decode(resp).await?;
        Ok(reply.response)
    }
}

/// Map a non-2xx response to `Server` (structured `{"error": ...}` body) or
/// `UnexpectedStatus` (anything else).
async fn check(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let text = resp.text().await.unwrap_or_default();
    tracing::debug!(status = status.as_u16(), body = %text, "request failed");
    match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) if !body.error.trim().is_empty() => Err(DocdeskError::Server {
            status: status.as_u16(),
            message: body.error,
        }),
        _ => Err(DocdeskError::UnexpectedStatus {
            status: status.as_u16(),
        }),
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let resp = check(resp).await?;
    let bytes = resp.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::from_config(&ApiConfig {
            base_url: server.uri(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    fn session() -> Session {
        Session {
            user: User {
                id: 1,
                full_name: "Test User".into(),
                email: "test@example.com".into(),
                role: None,
                company_id: Some(1),
            },
            company: Company {
                id: 1,
                name: "Test Co".into(),
                email: None,
            },
            token: "secret-token".into(),
        }
    }

    #[tokio::test]
    async fn test_login_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_json(serde_json::json!({"email": "a@b.c", "password": "pw"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "token": "t0k",
                "user": {"id": 1, "username": "Ann", "email": "a@b.c"},
                "company": {"id": 9, "name": "Acme"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let session = client_for(&server)
            .login(&LoginRequest::new("a@b.c", "pw"))
            .await
            .unwrap();
        assert_eq!(session.token, "t0k");
        assert_eq!(session.company.id, 9);
    }

    #[tokio::test]
    async fn test_structured_error_surfaces_server_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({"error": "Invalid email or password"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .login(&LoginRequest::new("a@b.c", "wrong"))
            .await
            .unwrap_err();
        assert_eq!(err.user_message("Login failed"), "Invalid email or password");
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn test_unstructured_error_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/documents"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .list_documents(&session())
            .await
            .unwrap_err();
        assert!(matches!(err, DocdeskError::UnexpectedStatus { status: 502 }));
        assert_eq!(err.user_message("Could not load documents"), "Could not load documents");
    }

    #[tokio::test]
    async fn test_list_documents_sends_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/documents"))
            .and(header("Authorization", "Bearer secret-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "documents": [
                    {"id": 1, "filename": "a.pdf", "file_type": "pdf", "file_size": 10, "is_processed": true},
                    {"id": 2, "filename": "b.txt", "file_type": "txt", "file_size": 20, "is_processed": false}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let docs = client_for(&server)
            .list_documents(&session())
            .await
            .unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[1].filename, "b.txt");
    }

    #[tokio::test]
    async fn test_stats() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/documents/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "total_documents": 4, "processed_documents": 3, "pending_documents": 1
            })))
            .mount(&server)
            .await;

        let stats = client_for(&server).stats(&session()).await.unwrap();
        assert_eq!(stats.total_documents, 4);
        assert_eq!(stats.pending(), 1);
    }

    #[tokio::test]
    async fn test_delete_uses_id_path() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/documents/42"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"message": "Document deleted"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let msg = client_for(&server)
            .delete_document(&session(), 42)
            .await
            .unwrap();
        assert_eq!(msg.as_deref(), Some("Document deleted"));
    }

    #[tokio::test]
    async fn test_download_returns_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/documents/download/5"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4".to_vec()))
            .mount(&server)
            .await;

        let bytes = client_for(&server)
            .download_document(&session(), 5)
            .await
            .unwrap();
        assert_eq!(bytes, b"%PDF-1.4");
    }

    #[tokio::test]
    async fn test_send_chat() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat/message"))
            .and(body_json(serde_json::json!({"message": "Hello"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"response": "Hi!"})),
            )
            .mount(&server)
            .await;

        let reply = client_for(&server)
            .send_chat(&session(), "Hello")
            .await
            .unwrap();
        assert_eq!(reply, "Hi!");
    }

    #[tokio::test]
    async fn test_upload_posts_multipart() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/documents/upload"))
            .and(header("Authorization", "Bearer secret-token"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "message": "1 file uploaded",
                "files": [{"id": 3, "filename": "x_notes.txt", "original_filename": "notes.txt"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notes.txt");
        std::fs::write(&file, "hello").unwrap();

        let mut selection = UploadSelection::new();
        selection.add_path(&file).unwrap();

        let resp = client_for(&server)
            .upload(&session(), &selection)
            .await
            .unwrap();
        assert_eq!(resp.message.as_deref(), Some("1 file uploaded"));
        assert_eq!(resp.files[0].display_name(), "notes.txt");

        let requests = server.received_requests().await.unwrap();
        let content_type = requests[0]
            .headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("multipart/form-data"));
        let body = String::from_utf8_lossy(&requests[0].body);
        assert!(body.contains("name=\"files\""));
        assert!(body.contains("filename=\"notes.txt\""));
    }

    #[tokio::test]
    async fn test_upload_rejects_empty_selection_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/documents/upload"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .upload(&session(), &UploadSelection::new())
            .await
            .unwrap_err();
        assert!(matches!(err, DocdeskError::InvalidInput(_)));
    }
}
