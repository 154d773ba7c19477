//! Personal data server methods: session, blob upload, service auth, record creation.

use serde::{Deserialize, Serialize};
use serde_json::json;
use skypost_core::constants::{
    NSID_CREATE_RECORD, NSID_CREATE_SESSION, NSID_GET_SERVICE_AUTH, NSID_UPLOAD_BLOB,
};
use skypost_core::models::{Blob, Session};

use crate::{ApiClient, ApiResult};

#[derive(Debug, Deserialize)]
struct UploadBlobResponse {
    blob: Blob,
}

#[derive(Debug, Deserialize)]
struct ServiceAuthResponse {
    token: String,
}

/// Response of `createRecord`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateRecordResponse {
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub cid: String,
}

impl ApiClient {
    /// Log in with a handle (or email) and password.
    pub async fn create_session(&self, identifier: &str, password: &str) -> ApiResult<Session> {
        let body = json!({
            "identifier": identifier,
            "password": password,
        });
        self.post_json(NSID_CREATE_SESSION, &body).await
    }

    /// Store raw bytes in the repository's blob store.
    pub async fn upload_blob(&self, data: Vec<u8>, mime_type: &str) -> ApiResult<Blob> {
        let size = data.len();
        let response: UploadBlobResponse =
            self.post_bytes(NSID_UPLOAD_BLOB, data, mime_type).await?;

        tracing::debug!(
            link = %response.blob.link(),
            mime_type = %mime_type,
            size = size,
            "Blob uploaded"
        );
        Ok(response.blob)
    }

    /// Mint a short-lived token scoped to `audience` and the `lxm` method.
    pub async fn get_service_auth(
        &self,
        audience: &str,
        lxm: &str,
        expires_at: i64,
    ) -> ApiResult<String> {
        let body = json!({
            "aud": audience,
            "lxm": lxm,
            "exp": expires_at,
        });
        let response: ServiceAuthResponse = self.post_json(NSID_GET_SERVICE_AUTH, &body).await?;
        Ok(response.token)
    }

    /// Write a record into `collection` of repository `repo`.
    pub async fn create_record<R: Serialize>(
        &self,
        repo: &str,
        collection: &str,
        record: &R,
    ) -> ApiResult<CreateRecordResponse> {
        let body = json!({
            "repo": repo,
            "collection": collection,
            "record": record,
        });
        self.post_json(NSID_CREATE_RECORD, &body).await
    }
}
