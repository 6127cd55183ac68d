//! Panel actions and page markers
//!
//! Every request is `<base_url>?action=<name>`. Responses are HTML; success
//! and failure are read from literal fragments, never from the HTTP status,
//! because the panel answers 200 for in-page errors too.

/// Query-string parameter that selects the panel action
pub const ACTION_PARAM: &str = "action";

/// Submit username and password (POST form)
pub const ACTION_LOGIN: &str = "login";

/// Approve pending terms of service for the logged-in account
pub const ACTION_APPROVE_TERMS: &str = "approveterms";

/// Zone overview listing every hosted domain
pub const ACTION_ZONE_LIST: &str = "domains";

/// DNS setup page listing the records of one zone
pub const ACTION_RECORD_LIST: &str = "dnssetup";

/// Add a TXT record (POST form)
pub const ACTION_ADD_TXT: &str = "addtxt";

/// Delete a record by id
pub const ACTION_DELETE_TXT: &str = "deletetxt";

/// Present in the login response when username/password are rejected
pub const AUTH_FAILURE_MARKER: &str = r#"class="login-failed""#;

/// Present in the login response while terms are still pending
pub const TERMS_PENDING_MARKER: &str = "action=approveterms";

/// Success-styled table row returned after a completed add or delete
pub const SUCCESS_MARKER: &str = r#"class="success""#;

/// TTL sent with every created TXT record
pub const TXT_RECORD_TTL: u32 = 300;
