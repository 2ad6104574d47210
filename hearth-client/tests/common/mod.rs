//! Shared test doubles and fixtures for the integration tests.

// Each test binary uses a different subset of these helpers.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use hearth_client::infrastructure::api_client::ApiError;
use hearth_client::infrastructure::services::avatar_store::{
    AvatarStore, UploadEvent, UploadHandle,
};
use hearth_client::infrastructure::services::profile::ProfileService;
use hearth_model::{PendingEdits, User};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

pub fn test_user(username: &str) -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4(),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        avatar_url: None,
        created_at: now,
        updated_at: now,
    }
}

/// Scriptable profile service recording every call it receives.
#[derive(Default)]
pub struct MockProfileService {
    pub update_results: Mutex<VecDeque<Result<User, ApiError>>>,
    pub delete_results: Mutex<VecDeque<Result<(), ApiError>>>,
    pub sign_out_results: Mutex<VecDeque<Result<(), ApiError>>>,
    pub update_calls: Mutex<Vec<(Uuid, PendingEdits)>>,
}

impl MockProfileService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_update(&self, result: Result<User, ApiError>) {
        self.update_results.lock().unwrap().push_back(result);
    }

    pub fn script_delete(&self, result: Result<(), ApiError>) {
        self.delete_results.lock().unwrap().push_back(result);
    }

    pub fn script_sign_out(&self, result: Result<(), ApiError>) {
        self.sign_out_results.lock().unwrap().push_back(result);
    }
}

fn unscripted<T>() -> Result<T, ApiError> {
    Err(ApiError::Transport {
        message: "no scripted result".to_string(),
    })
}

#[async_trait]
impl ProfileService for MockProfileService {
    async fn update_profile(
        &self,
        user_id: Uuid,
        edits: &PendingEdits,
    ) -> Result<User, ApiError> {
        self.update_calls
            .lock()
            .unwrap()
            .push((user_id, edits.clone()));
        self.update_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(unscripted)
    }

    async fn delete_account(&self, _user_id: Uuid) -> Result<(), ApiError> {
        self.delete_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(unscripted)
    }

    async fn sign_out(&self) -> Result<(), ApiError> {
        self.sign_out_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(unscripted)
    }
}

/// Avatar store that immediately replays a scripted event sequence.
pub struct ScriptedAvatarStore {
    pub events: Vec<UploadEvent>,
}

impl AvatarStore for ScriptedAvatarStore {
    fn upload(&self, _file_name: &str, _bytes: Vec<u8>) -> UploadHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        for event in &self.events {
            let _ = tx.send(event.clone());
        }
        UploadHandle::from_parts(rx, tokio::spawn(async {}))
    }
}

/// Avatar store whose transfers never finish; `aborted` flips once the
/// transfer task is cancelled.
pub struct HangingAvatarStore {
    pub aborted: Arc<AtomicBool>,
}

struct AbortFlag(Arc<AtomicBool>);

impl Drop for AbortFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

impl AvatarStore for HangingAvatarStore {
    fn upload(&self, _file_name: &str, _bytes: Vec<u8>) -> UploadHandle {
        let (tx, rx) = mpsc::unbounded_channel::<UploadEvent>();
        let flag = AbortFlag(self.aborted.clone());
        let task = tokio::spawn(async move {
            let _flag = flag;
            let _tx = tx; // hold the sender open for the transfer's lifetime
            std::future::pending::<()>().await;
        });
        UploadHandle::from_parts(rx, task)
    }
}
