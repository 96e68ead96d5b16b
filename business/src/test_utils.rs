//! Test doubles for the submitters and the page controller.
//!
//! [`RecordingApi`] and [`ScriptedDialog`] stand in for the network and the
//! user; [`TestContext`] runs the real HTTP client against a wiremock server.

#![cfg(all(test, not(target_arch = "wasm32")))]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, query_param},
};

use crate::api::{ApiError, ApiResult, HttpRequestsApi, RequestsApi};
use crate::dialog::{Dialog, DoneKind};
use crate::mutation::{Mutation, RequestForm};
use crate::session::{MemorySessionStore, login};
use crate::view::ViewConfig;
use crate::{BusinessConfig, Record, Session};

/// Session as written by the login flow; `None` leaves the username unset.
pub fn session_for(username: Option<&str>, role: &str) -> Session {
    let mut store = MemorySessionStore::default();
    login(&mut store, username.unwrap_or_default(), role);
    Session::read(&store)
}

/// In-memory API: serves a fixed record set and records every mutation.
#[derive(Default)]
pub struct RecordingApi {
    records: Vec<Record>,
    fail_status: Option<u16>,
    submitted: Mutex<Vec<Mutation>>,
    fetches: Mutex<usize>,
}

impl RecordingApi {
    pub fn with_records(records: Vec<Record>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    /// Every call fails with `status`.
    pub fn failing(status: u16) -> Self {
        Self {
            fail_status: Some(status),
            ..Self::default()
        }
    }

    pub fn submitted(&self) -> Vec<Mutation> {
        self.submitted.lock().map(|m| m.clone()).unwrap_or_default()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.lock().map(|n| *n).unwrap_or_default()
    }
}

#[async_trait]
impl RequestsApi for RecordingApi {
    async fn fetch_records(&self, _view: &ViewConfig) -> ApiResult<Vec<Record>> {
        if let Ok(mut n) = self.fetches.lock() {
            *n += 1;
        }
        match self.fail_status {
            Some(status) => Err(ApiError::Status(status)),
            None => Ok(self.records.clone()),
        }
    }

    async fn submit(&self, mutation: &Mutation) -> ApiResult<()> {
        if let Some(status) = self.fail_status {
            return Err(ApiError::Status(status));
        }
        if let Ok(mut submitted) = self.submitted.lock() {
            submitted.push(mutation.clone());
        }
        Ok(())
    }
}

/// Dialog answering from a script. Unscripted prompts are cancelled.
#[derive(Default)]
pub struct ScriptedDialog {
    answers: RefCell<VecDeque<Option<String>>>,
    done_kind: Option<DoneKind>,
    accept_forms: bool,
    decline_confirm: bool,
    alerts: RefCell<Vec<String>>,
    toasts: RefCell<Vec<String>>,
}

impl ScriptedDialog {
    /// Queue answers for successive `ask_text` prompts.
    pub fn with_answers<'a>(self, answers: impl IntoIterator<Item = Option<&'a str>>) -> Self {
        self.answers
            .borrow_mut()
            .extend(answers.into_iter().map(|a| a.map(str::to_owned)));
        self
    }

    pub fn with_done_kind(mut self, kind: DoneKind) -> Self {
        self.done_kind = Some(kind);
        self
    }

    /// Submit forms unchanged instead of cancelling them.
    pub fn accepting_forms(mut self) -> Self {
        self.accept_forms = true;
        self
    }

    /// Answer "no" to confirmations.
    pub fn declining(mut self) -> Self {
        self.decline_confirm = true;
        self
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }

    pub fn toasts(&self) -> Vec<String> {
        self.toasts.borrow().clone()
    }
}

#[async_trait(?Send)]
impl Dialog for ScriptedDialog {
    async fn ask_text(&self, _prompt: &str) -> Option<String> {
        self.answers.borrow_mut().pop_front().flatten()
    }

    async fn choose_done_kind(&self) -> Option<DoneKind> {
        self.done_kind
    }

    async fn edit_form(&self, _title: &str, initial: RequestForm) -> Option<RequestForm> {
        self.accept_forms.then_some(initial)
    }

    async fn confirm(&self, _message: &str) -> bool {
        !self.decline_confirm
    }

    async fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_owned());
    }

    async fn toast(&self, message: &str) {
        self.toasts.borrow_mut().push(message.to_owned());
    }
}

/// Mock endpoint plus an HTTP API client pointed at it.
pub struct TestContext {
    pub mock_server: MockServer,
    pub api: HttpRequestsApi,
}

impl TestContext {
    pub async fn new() -> Self {
        let mock_server = MockServer::start().await;
        let api = HttpRequestsApi::new(BusinessConfig::new(mock_server.uri()));
        Self { mock_server, api }
    }

    /// Serve `records` as JSONP for requests carrying `callback`.
    pub async fn mock_records(&self, callback: &str, records: Value) {
        Mock::given(method("GET"))
            .and(query_param("callback", callback))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(format!("{callback}({records});"))
                    .insert_header("content-type", "application/javascript"),
            )
            .mount(&self.mock_server)
            .await;
    }

    /// Accept every POST with `status`.
    pub async fn mock_post(&self, status: u16) {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.mock_server)
            .await;
    }

    /// Form bodies of the POSTs received so far.
    pub async fn posted_forms(&self) -> Vec<String> {
        self.mock_server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.method.as_str() == "POST")
            .map(|r| String::from_utf8_lossy(&r.body).into_owned())
            .collect()
    }
}
