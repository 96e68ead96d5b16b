//! CLI integration tests using mock servers.
//!
//! These tests don't spawn the binary. They drive the same controller flows the
//! `new`, `edit`, `list` and `summary` commands use against a wiremock endpoint.

#![cfg(all(test, not(target_arch = "wasm32")))]

use async_trait::async_trait;
use procure_business::{
    ActionOutcome, BusinessConfig, Dialog, DoneKind, HttpRequestsApi, Mutation, PageController,
    RequestForm, RowAction, RowActionKind, Session, Summary, ViewKind,
};
use serde_json::{Value, json};
use ustr::Ustr;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, query_param},
};

/// Test context for CLI integration tests.
struct CliTestContext {
    mock_server: MockServer,
    api: HttpRequestsApi,
}

impl CliTestContext {
    async fn new() -> Self {
        let mock_server = MockServer::start().await;
        let api = HttpRequestsApi::new(BusinessConfig::new(mock_server.uri()));
        Self { mock_server, api }
    }

    async fn mock_records(&self, callback: &str, rows: Value) {
        Mock::given(method("GET"))
            .and(query_param("callback", callback))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!("{callback}({rows})")))
            .mount(&self.mock_server)
            .await;
    }

    async fn mock_post(&self) {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
            .mount(&self.mock_server)
            .await;
    }

    async fn posted_forms(&self) -> Vec<String> {
        self.mock_server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.method.as_str() == "POST")
            .map(|r| String::from_utf8_lossy(&r.body).into_owned())
            .collect()
    }

    fn controller(&self, kind: ViewKind) -> PageController<'_> {
        PageController::new(&self.api, kind, self.api.config().display_offset())
    }
}

/// Fills the form the way a user typing into the prompts would.
struct FormFiller {
    items: &'static str,
    qty: &'static str,
}

#[async_trait(?Send)]
impl Dialog for FormFiller {
    async fn ask_text(&self, _prompt: &str) -> Option<String> {
        None
    }

    async fn choose_done_kind(&self) -> Option<DoneKind> {
        None
    }

    async fn edit_form(&self, _title: &str, mut initial: RequestForm) -> Option<RequestForm> {
        initial.items = self.items.to_owned();
        initial.qty = self.qty.to_owned();
        Some(initial)
    }

    async fn confirm(&self, _message: &str) -> bool {
        true
    }

    async fn alert(&self, _message: &str) {}

    async fn toast(&self, _message: &str) {}
}

fn staff(name: &str) -> Session {
    Session {
        logged_in: true,
        username: Some(name.to_owned()),
        role: procure_business::Role::StaffC,
    }
}

fn rows() -> Value {
    json!([
        {"ID": "PR-10", "Department": "IT", "Items": "Router", "Qty": 2, "Price": 750000,
         "Priority": "High", "Status": "approved"},
        {"ID": "PR-11", "Department": "HR", "Items": "Chairs", "Qty": 6, "Price": 450000,
         "Nominal": 2700000, "Status": "pending"},
        {"ID": "PR-12", "Department": "HR", "Items": "Desk", "Qty": 1, "Status": "done"}
    ])
}

mod new_tests {
    use super::*;

    #[tokio::test]
    async fn test_new_posts_without_id() {
        let test_ctx = CliTestContext::new().await;
        test_ctx.mock_records("onDataLoaded", rows()).await;
        test_ctx.mock_post().await;

        let mut controller = test_ctx.controller(ViewKind::Requests);
        let dialog = FormFiller {
            items: "Laptop stand",
            qty: "3",
        };
        let outcome = controller.create(&dialog, &staff("sari")).await;

        assert!(
            matches!(outcome, ActionOutcome::Submitted(Mutation::Save { id: None, .. })),
            "unexpected outcome: {outcome:?}"
        );
        let forms = test_ctx.posted_forms().await;
        assert_eq!(forms.len(), 1);
        assert!(!forms[0].contains("ID="), "create must not send an ID: {}", forms[0]);
        assert!(forms[0].contains("Items=Laptop+stand"), "form: {}", forms[0]);
        assert!(forms[0].contains("Priority=Medium"), "form: {}", forms[0]);
        assert_eq!(controller.state().total(), 3, "view reloads after create");
    }
}

mod edit_tests {
    use super::*;

    #[tokio::test]
    async fn test_edit_sends_id_and_keeps_other_fields() {
        let test_ctx = CliTestContext::new().await;
        test_ctx.mock_records("onDataLoaded", rows()).await;
        test_ctx.mock_post().await;

        let mut controller = test_ctx.controller(ViewKind::Requests);
        controller.load().await.expect("load");
        let action = RowAction {
            kind: RowActionKind::Edit,
            id: Ustr::from("PR-10"),
        };
        let dialog = FormFiller {
            items: "Router AX",
            qty: "4",
        };
        let outcome = controller.run_action(action, &dialog, &staff("sari")).await;

        assert!(matches!(outcome, ActionOutcome::Submitted(_)), "{outcome:?}");
        let forms = test_ctx.posted_forms().await;
        assert_eq!(forms.len(), 1);
        assert!(forms[0].starts_with("ID=PR-10&"), "form: {}", forms[0]);
        assert!(forms[0].contains("Department=IT"), "form: {}", forms[0]);
        assert!(forms[0].contains("Priority=High"), "form: {}", forms[0]);
        assert!(forms[0].contains("Qty=4"), "form: {}", forms[0]);
    }

    #[tokio::test]
    async fn test_approve_is_not_offered_on_requests_view() {
        let test_ctx = CliTestContext::new().await;
        test_ctx.mock_records("onDataLoaded", rows()).await;

        let mut controller = test_ctx.controller(ViewKind::Requests);
        controller.load().await.expect("load");
        let action = RowAction {
            kind: RowActionKind::Approve,
            id: Ustr::from("PR-11"),
        };
        let dialog = FormFiller { items: "", qty: "" };
        let outcome = controller.run_action(action, &dialog, &staff("sari")).await;

        assert!(matches!(outcome, ActionOutcome::Aborted(_)), "{outcome:?}");
        assert!(test_ctx.posted_forms().await.is_empty());
    }
}

mod list_tests {
    use super::*;

    #[tokio::test]
    async fn test_search_then_page() {
        let test_ctx = CliTestContext::new().await;
        test_ctx.mock_records("onDataLoaded", rows()).await;

        let mut controller = test_ctx.controller(ViewKind::Requests);
        controller.load().await.expect("load");
        controller.set_page_size(1);
        controller.search("hr");
        controller.set_page(2);

        let info = controller.page_info();
        assert_eq!((info.start, info.end, info.total), (2, 2, 2));
        let rendered = controller.render();
        assert_eq!(rendered.rows().len(), 1);
        assert!(rendered.to_html().contains("PR-12"));
    }
}

mod summary_tests {
    use super::*;

    #[tokio::test]
    async fn test_summary_over_recap() {
        let test_ctx = CliTestContext::new().await;
        test_ctx.mock_records("onRecapLoaded", rows()).await;

        let mut controller = test_ctx.controller(ViewKind::Recap);
        controller.load().await.expect("load");
        let summary = Summary::from_records(controller.state().records());

        assert_eq!(summary.total, 3);
        assert_eq!(summary.count(procure_business::Status::Pending), 1);
        assert!((summary.total_qty - 9.0).abs() < f64::EPSILON);
        // 2 × 750000 + Nominal 2700000; PR-12 has no price
        assert!((summary.total_nominal - 4_200_000.0).abs() < f64::EPSILON);
    }
}
