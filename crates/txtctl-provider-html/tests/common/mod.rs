//! Fake administration panel for provider contract tests
//!
//! Pages carry the same markers the real panel uses. `FakeRecordTable` keeps
//! added records so a create can be followed by a locate and delete.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use txtctl_core::config::PanelConfig;
use txtctl_core::traits::{Credentials, TxtChallenge};
use txtctl_provider_html::PanelProvider;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const PANEL_PATH: &str = "/admin";

pub const LOGIN_OK: &str =
    r#"<html><body><p>Welcome back</p><a href="?action=logout">Log out</a></body></html>"#;

pub const LOGIN_FAILED: &str =
    r#"<html><body><div class="login-failed">Wrong username or password</div></body></html>"#;

pub const LOGIN_TERMS_PENDING: &str = r#"<html><body><p>Our terms have changed.</p>
<a href="?action=approveterms">I accept</a></body></html>"#;

pub const TERMS_APPROVED: &str = r#"<html><body><p>Thank you</p></body></html>"#;

pub const ZONE_LIST: &str = r#"<table>
<tr><td><a href="?action=dnssetup&domain=example.com">example.com</a></td></tr>
<tr><td><a href="?action=dnssetup&domain=example.org">example.org</a></td></tr>
</table>"#;

pub const MUTATION_OK: &str = r#"<table><tr class="success"><td>Done</td></tr></table>"#;

pub const MUTATION_FAILED: &str =
    r#"<table><tr class="error"><td>The request could not be processed</td></tr></table>"#;

pub fn credentials() -> Credentials {
    Credentials::new("alice", "s3cret")
}

pub fn challenge() -> TxtChallenge {
    TxtChallenge::new("www.example.com", "_acme-challenge.www", "tok-abc123")
}

pub fn panel_config(server: &MockServer) -> PanelConfig {
    PanelConfig::new(format!("{}{}", server.uri(), PANEL_PATH))
}

pub fn provider(server: &MockServer) -> PanelProvider {
    PanelProvider::new(&panel_config(server)).unwrap()
}

/// Render a record listing page with delete links
pub fn record_listing(zone: &str, rows: &[(&str, &str, &str)]) -> String {
    let mut html = String::from("<table>\n<tr><th>Name</th><th>Value</th><th>TTL</th><th></th></tr>\n");
    for (name, value, id) in rows {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>300</td>\
             <td><a href=\"?action=deletetxt&domain={}&id={}\">Delete</a></td></tr>\n",
            name, value, zone, id
        ));
    }
    html.push_str("</table>");
    html
}

fn action(name: &'static str) -> wiremock::matchers::QueryParamExactMatcher {
    query_param("action", name)
}

pub async fn mount_login(server: &MockServer, status: u16, body: &str) {
    Mock::given(method("POST"))
        .and(path(PANEL_PATH))
        .and(action("login"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

pub async fn mount_zone_list(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path(PANEL_PATH))
        .and(action("domains"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

pub async fn mount_record_list(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path(PANEL_PATH))
        .and(action("dnssetup"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Mount an action that must be requested exactly `times` times
pub async fn mount_expected(
    server: &MockServer,
    http_method: &'static str,
    action_name: &'static str,
    body: &str,
    times: u64,
) {
    Mock::given(method(http_method))
        .and(path(PANEL_PATH))
        .and(action(action_name))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(times)
        .mount(server)
        .await;
}

/// In-memory record table behind the add, listing and delete actions
#[derive(Clone, Default)]
pub struct FakeRecordTable {
    rows: Arc<Mutex<Vec<(String, String, String)>>>,
    next_id: Arc<Mutex<u32>>,
}

impl FakeRecordTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub async fn mount(&self, server: &MockServer, zone: &'static str) {
        Mock::given(method("POST"))
            .and(path(PANEL_PATH))
            .and(action("addtxt"))
            .respond_with(AddResponder(self.clone()))
            .mount(server)
            .await;

        Mock::given(method("GET"))
            .and(path(PANEL_PATH))
            .and(action("dnssetup"))
            .respond_with(ListResponder(self.clone(), zone))
            .mount(server)
            .await;

        Mock::given(method("GET"))
            .and(path(PANEL_PATH))
            .and(action("deletetxt"))
            .respond_with(DeleteResponder(self.clone()))
            .mount(server)
            .await;
    }
}

struct AddResponder(FakeRecordTable);

impl Respond for AddResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let mut name = None;
        let mut value = None;
        for (key, val) in url::form_urlencoded::parse(&request.body) {
            match &*key {
                "name" => name = Some(val.into_owned()),
                "value" => value = Some(val.into_owned()),
                _ => {}
            }
        }

        let (Some(name), Some(value)) = (name, value) else {
            return ResponseTemplate::new(200).set_body_string(MUTATION_FAILED);
        };

        let mut next_id = self.0.next_id.lock().unwrap();
        *next_id += 1;
        self.0
            .rows
            .lock()
            .unwrap()
            .push((name, value, next_id.to_string()));

        ResponseTemplate::new(200).set_body_string(MUTATION_OK)
    }
}

struct ListResponder(FakeRecordTable, &'static str);

impl Respond for ListResponder {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let rows = self.0.rows.lock().unwrap();
        let borrowed: Vec<(&str, &str, &str)> = rows
            .iter()
            .map(|(n, v, id)| (n.as_str(), v.as_str(), id.as_str()))
            .collect();
        ResponseTemplate::new(200).set_body_string(record_listing(self.1, &borrowed))
    }
}

struct DeleteResponder(FakeRecordTable);

impl Respond for DeleteResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let id = request
            .url
            .query_pairs()
            .find(|(key, _)| *key == "id")
            .map(|(_, value)| value.into_owned());

        let mut rows = self.0.rows.lock().unwrap();
        let before = rows.len();
        if let Some(id) = id {
            rows.retain(|(_, _, row_id)| *row_id != id);
        }

        if rows.len() < before {
            ResponseTemplate::new(200).set_body_string(MUTATION_OK)
        } else {
            ResponseTemplate::new(200).set_body_string(MUTATION_FAILED)
        }
    }
}
