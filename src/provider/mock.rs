use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::error::{Error, Result};

use super::{Provider, Reply, Request};

/// A scripted reply for one call.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// The call succeeds at the HTTP level with this reply text.
    Text(String),
    /// The call fails at the HTTP level with this error body.
    Fail(String),
}

impl MockReply {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn fail(s: impl Into<String>) -> Self {
        Self::Fail(s.into())
    }
}

/// A scripted provider for tests. Hands out pre-defined replies in order
/// and records the prompts it was asked.
pub struct MockProvider {
    replies: Mutex<VecDeque<MockReply>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl MockProvider {
    pub fn new(replies: Vec<MockReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// How many times `complete` was called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn complete(&self, request: Request) -> Result<Reply> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(request.prompt);

        match self.replies.lock().unwrap().pop_front() {
            Some(MockReply::Text(text)) => Ok(Reply { text, usage: None }),
            Some(MockReply::Fail(body)) => Err(Error::Api {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body,
            }),
            None => Err(Error::Batch(format!(
                "MockProvider: no more replies (called {} times)",
                self.calls()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replies_in_order_then_exhausts() {
        let mock = MockProvider::new(vec![MockReply::text("one"), MockReply::text("two")]);

        let a = mock.complete(Request::text("p1", 10)).await.unwrap();
        let b = mock.complete(Request::text("p2", 10)).await.unwrap();
        assert_eq!(a.text, "one");
        assert_eq!(b.text, "two");

        assert!(mock.complete(Request::text("p3", 10)).await.is_err());
        assert_eq!(mock.calls(), 3);
    }

    #[tokio::test]
    async fn records_prompts() {
        let mock = MockProvider::new(vec![MockReply::text("ok")]);
        mock.complete(Request::text("hello", 10)).await.unwrap();
        assert_eq!(mock.prompts(), vec!["hello".to_string()]);
    }

    #[tokio::test]
    async fn fail_surfaces_as_api_error() {
        let mock = MockProvider::new(vec![MockReply::fail("boom")]);
        let err = mock.complete(Request::text("p", 10)).await.unwrap_err();
        match err {
            Error::Api { status, body } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body, "boom");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }
}
