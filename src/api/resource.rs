use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::ApiClient;
use crate::error::ClientResult;
use crate::listing::{ListRequest, Page};

/// `{ "id": n }` reference used in request bodies for related records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRef {
    pub id: i64,
}

/// One REST collection: `GET/POST <path>`, `GET/PATCH/DELETE <path>/{id}`.
#[derive(Clone)]
pub(crate) struct Resource {
    client: Arc<ApiClient>,
    path: &'static str,
}

impl Resource {
    pub(crate) fn new(client: Arc<ApiClient>, path: &'static str) -> Self { Self { client, path } }

    pub(crate) fn client(&self) -> &Arc<ApiClient> { &self.client }

    fn item(&self, id: i64) -> String { format!("{}/{}", self.path, id) }

    pub(crate) async fn list<T: DeserializeOwned>(&self, request: &ListRequest) -> ClientResult<Page<T>> {
        self.client.get_json(self.path, &request.to_query_pairs()).await
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, id: i64) -> ClientResult<T> {
        self.client.get_json(&self.item(id), &[]).await
    }

    pub(crate) async fn create_json<B: Serialize + ?Sized, T: DeserializeOwned>(&self, body: &B) -> ClientResult<T> {
        self.client.post_json(self.path, body).await
    }

    pub(crate) async fn create_text<B: Serialize + ?Sized>(&self, body: &B) -> ClientResult<String> {
        self.client.post_text(self.path, body).await
    }

    pub(crate) async fn update_text<B: Serialize + ?Sized>(&self, id: i64, body: &B) -> ClientResult<String> {
        self.client.patch_text(&self.item(id), body).await
    }

    pub(crate) async fn delete(&self, id: i64) -> ClientResult<String> { self.client.delete_text(&self.item(id)).await }
}
