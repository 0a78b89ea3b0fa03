// SPDX-License-Identifier: MPL-2.0
//! Auto-login bars: header parsing, per-bar state, and the credential worker.
//!
//! The credential lookup is the only work that leaves the scheduling
//! context. The worker never sees the container; it posts an
//! [`AutoLoginResult`] and the container applies it on its next update.

use std::str::FromStr;
use std::sync::Arc;

use url::form_urlencoded;

use crate::error::ProtocolError;

use super::dispatch::Poster;
use super::host::AccountService;
use super::message::Message;

/// Prefix of the token type requested for web sign-in.
const WEB_LOGIN_TOKEN_PREFIX: &str = "weblogin:";

/// Fields of an `x-auto-login` response header.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AutoLoginParams {
    pub realm: String,
    pub account: String,
    pub args: String,
}

impl AutoLoginParams {
    /// Parses `realm=..&account=..&args=..`, percent-decoding each value.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::MalformedHeader`] if `realm` or `args` is
    /// missing or empty.
    pub fn parse(header: &str) -> Result<Self, ProtocolError> {
        let mut params = Self::default();
        for (key, value) in form_urlencoded::parse(header.trim().as_bytes()) {
            match key.as_ref() {
                "realm" => params.realm = value.into_owned(),
                "account" => params.account = value.into_owned(),
                "args" => params.args = value.into_owned(),
                other => tracing::debug!(key = other, "ignoring unknown x-auto-login key"),
            }
        }

        if params.realm.is_empty() {
            return Err(ProtocolError::MalformedHeader("missing realm".into()));
        }
        if params.args.is_empty() {
            return Err(ProtocolError::MalformedHeader("missing args".into()));
        }
        Ok(params)
    }

    /// Token type to request from the account service.
    #[must_use]
    pub fn auth_token_type(&self) -> String {
        format!("{WEB_LOGIN_TOKEN_PREFIX}{}", self.args)
    }
}

impl FromStr for AutoLoginParams {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Variant state of an auto-login bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoLoginState {
    params: AutoLoginParams,
    account: String,
    message: String,
    buttons_enabled: bool,
}

impl AutoLoginState {
    pub fn new(params: AutoLoginParams, account: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            params,
            account: account.into(),
            message: message.into(),
            buttons_enabled: true,
        }
    }

    /// The account the bar offers to sign in with.
    #[must_use]
    pub fn account(&self) -> &str {
        &self.account
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn buttons_enabled(&self) -> bool {
        self.buttons_enabled
    }

    pub fn set_buttons_enabled(&mut self, enabled: bool) {
        self.buttons_enabled = enabled;
    }

    #[must_use]
    pub fn auth_token_type(&self) -> String {
        self.params.auth_token_type()
    }

    #[must_use]
    pub fn request(&self) -> CredentialRequest {
        CredentialRequest {
            account: self.account.clone(),
            auth_token_type: self.auth_token_type(),
        }
    }

    /// True if `result` answers a request made by this bar.
    #[must_use]
    pub fn matches(&self, result: &AutoLoginResult) -> bool {
        self.account == result.account && self.auth_token_type() == result.auth_token_type
    }
}

/// What the worker asks the account service for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRequest {
    pub account: String,
    pub auth_token_type: String,
}

/// Outcome of a credential lookup, posted back to the scheduling context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoLoginResult {
    pub account: String,
    pub auth_token_type: String,
    pub success: bool,
    /// Token to hand to the counterpart; meaningful only on success.
    pub result: Option<String>,
}

impl AutoLoginResult {
    /// Builds the result for `request` from the account service's answer.
    #[must_use]
    pub fn from_lookup(request: CredentialRequest, token: Option<String>) -> Self {
        Self {
            account: request.account,
            auth_token_type: request.auth_token_type,
            success: token.is_some(),
            result: token,
        }
    }

    /// The token if the lookup succeeded with a usable payload.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.result
            .as_deref()
            .filter(|token| self.success && !token.is_empty())
    }
}

/// Runs the credential lookup off the scheduling context.
///
/// Uses the blocking pool of the current tokio runtime when there is one,
/// otherwise a dedicated thread. The result is always delivered through
/// `poster`.
pub fn spawn_credential_lookup(
    accounts: Arc<dyn AccountService>,
    request: CredentialRequest,
    poster: Poster,
) {
    let job = move || {
        let token = accounts.auth_token(&request.account, &request.auth_token_type);
        let result = AutoLoginResult::from_lookup(request, token);
        if !poster.post(Message::AutoLoginResult(result)) {
            tracing::debug!("scheduling context gone, dropping auto-login result");
        }
    };

    match tokio::runtime::Handle::try_current() {
        Ok(runtime) => {
            runtime.spawn_blocking(job);
        }
        Err(_) => {
            std::thread::spawn(job);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infobar::dispatch::SchedulingContext;
    use crate::infobar::headless::FixedAccounts;

    #[test]
    fn header_is_percent_decoded() {
        let params = AutoLoginParams::parse(
            "realm=com.google&account=fred%40example.com&args=continue%3Dhttps%253A%252F%252Fmail",
        )
        .expect("valid header");

        assert_eq!(params.realm, "com.google");
        assert_eq!(params.account, "fred@example.com");
        assert_eq!(params.args, "continue=https%3A%2F%2Fmail");
        assert_eq!(params.auth_token_type(), "weblogin:continue=https%3A%2F%2Fmail");
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let params: AutoLoginParams = "realm=r&args=a&colour=blue".parse().expect("valid header");
        assert_eq!(params.account, "");
    }

    #[test]
    fn missing_realm_or_args_is_malformed() {
        assert!(matches!(
            AutoLoginParams::parse("account=x&args=a"),
            Err(ProtocolError::MalformedHeader(_))
        ));
        assert!(matches!(
            AutoLoginParams::parse("realm=r&args="),
            Err(ProtocolError::MalformedHeader(_))
        ));
    }

    #[test]
    fn result_matching_uses_account_and_token_type() {
        let params = AutoLoginParams::parse("realm=r&args=a").expect("valid header");
        let state = AutoLoginState::new(params, "fred", "Sign in as fred?");
        let request = state.request();

        let matching = AutoLoginResult::from_lookup(request.clone(), Some("tok".into()));
        assert!(state.matches(&matching));
        assert_eq!(matching.token(), Some("tok"));

        let other = AutoLoginResult::from_lookup(
            CredentialRequest {
                account: "wilma".into(),
                ..request
            },
            None,
        );
        assert!(!state.matches(&other));
        assert!(!other.success);
    }

    #[test]
    fn empty_payload_is_not_a_usable_token() {
        let result = AutoLoginResult {
            account: "fred".into(),
            auth_token_type: "weblogin:a".into(),
            success: true,
            result: Some(String::new()),
        };
        assert_eq!(result.token(), None);
    }

    #[tokio::test]
    async fn worker_posts_result_to_scheduling_context() {
        let mut context = SchedulingContext::new();
        let accounts = Arc::new(FixedAccounts::signed_in("fred").with_token("weblogin:a", "tok"));

        spawn_credential_lookup(
            accounts,
            CredentialRequest {
                account: "fred".into(),
                auth_token_type: "weblogin:a".into(),
            },
            context.poster(),
        );

        match context.next().await {
            Some(Message::AutoLoginResult(result)) => {
                assert!(result.success);
                assert_eq!(result.token(), Some("tok"));
            }
            other => panic!("expected auto-login result, got {:?}", other),
        }
    }

    #[test]
    fn worker_without_runtime_uses_a_thread() {
        let mut context = SchedulingContext::new();
        let accounts = Arc::new(FixedAccounts::signed_in("fred"));

        spawn_credential_lookup(
            accounts,
            CredentialRequest {
                account: "fred".into(),
                auth_token_type: "weblogin:a".into(),
            },
            context.poster(),
        );

        let message = context.recv_blocking();
        assert!(matches!(
            message,
            Some(Message::AutoLoginResult(AutoLoginResult { success: false, .. }))
        ));
    }
}
