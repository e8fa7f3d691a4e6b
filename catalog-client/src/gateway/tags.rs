//! Product tag sub-resource

use reqwest::Method;
use serde_json::Value;
use shared::Envelope;
use shared::models::{PageQuery, Tag, TagCreate, TagUpdate};

use super::HttpGateway;
use crate::cache::CacheTag;
use crate::{ClientResult, Session};

impl HttpGateway {
    pub async fn list_tags(&self, query: &PageQuery) -> ClientResult<Envelope<Vec<Tag>>> {
        let url = self.endpoint(&["products", "tags", "all"], &query.to_pairs());
        self.fetch_cached(url, vec![CacheTag::Tags]).await
    }

    pub async fn create_tag(
        &self,
        session: &Session,
        payload: &TagCreate,
    ) -> ClientResult<Envelope<Tag>> {
        let url = self.endpoint(&["products", "tags"], &[]);
        self.mutate(Method::POST, url, Some(payload), session, &[CacheTag::Tags])
            .await
    }

    pub async fn update_tag(
        &self,
        session: &Session,
        id: &str,
        payload: &TagUpdate,
    ) -> ClientResult<Envelope<Tag>> {
        let url = self.endpoint(&["products", "tags", id], &[]);
        self.mutate(Method::PATCH, url, Some(payload), session, &[CacheTag::Tags])
            .await
    }

    pub async fn delete_tag(&self, session: &Session, id: &str) -> ClientResult<Envelope<Value>> {
        let url = self.endpoint(&["products", "tags", id], &[]);
        self.mutate(Method::DELETE, url, None::<&()>, session, &[CacheTag::Tags])
            .await
    }
}
