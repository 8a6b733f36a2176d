//! Sign-in / registration form and its request lifecycle.

use crate::error::{ApiError, ValidationError};
use crate::types::Session;

/// Registration rejects shorter passwords locally.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum AuthTab {
    #[default]
    Login,
    Register,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum AuthPhase {
    #[default]
    LoggedOut,
    Authenticating,
    LoggedIn,
}

/// Which text field has the cursor.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Username,
    #[default]
    Email,
    Password,
}

/// Request produced by a validated form, ready to hand to the API client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRequest {
    Login { email: String, password: String },
    Register { username: String, email: String, password: String },
}

#[derive(Debug, Default)]
pub struct AuthForm {
    pub tab: AuthTab,
    pub phase: AuthPhase,
    pub field: AuthField,
    pub username: String,
    pub email: String,
    pub password: String,
    /// Shown under the form after a failed attempt.
    pub error: Option<String>,
}

impl AuthForm {
    pub fn is_busy(&self) -> bool {
        self.phase == AuthPhase::Authenticating
    }

    /// Switches between the login and register tabs. Ignored while a request
    /// is outstanding.
    pub fn toggle_tab(&mut self) {
        if self.is_busy() {
            return;
        }
        self.tab = match self.tab {
            AuthTab::Login => AuthTab::Register,
            AuthTab::Register => AuthTab::Login,
        };
        self.field = match self.tab {
            AuthTab::Login => AuthField::Email,
            AuthTab::Register => AuthField::Username,
        };
        self.error = None;
    }

    /// Fields visible on the current tab, in tab order.
    pub fn fields(&self) -> &'static [AuthField] {
        match self.tab {
            AuthTab::Login => &[AuthField::Email, AuthField::Password],
            AuthTab::Register => &[AuthField::Username, AuthField::Email, AuthField::Password],
        }
    }

    pub fn next_field(&mut self) {
        let fields = self.fields();
        let i = fields.iter().position(|f| *f == self.field).unwrap_or(0);
        self.field = fields[(i + 1) % fields.len()];
    }

    pub fn prev_field(&mut self) {
        let fields = self.fields();
        let i = fields.iter().position(|f| *f == self.field).unwrap_or(0);
        self.field = fields[(i + fields.len() - 1) % fields.len()];
    }

    fn field_mut(&mut self) -> &mut String {
        match self.field {
            AuthField::Username => &mut self.username,
            AuthField::Email => &mut self.email,
            AuthField::Password => &mut self.password,
        }
    }

    pub fn insert_char(&mut self, c: char) {
        if !self.is_busy() && !c.is_control() {
            self.field_mut().push(c);
        }
    }

    pub fn backspace(&mut self) {
        if !self.is_busy() {
            self.field_mut().pop();
        }
    }

    /// Validates the form and moves to `Authenticating`.
    ///
    /// Every rejection happens before a request exists, so nothing reaches
    /// the network.
    pub fn begin(&mut self) -> Result<AuthRequest, ValidationError> {
        if self.is_busy() {
            return Err(ValidationError::RequestPending);
        }
        let email = self.email.trim();
        let request = match self.tab {
            AuthTab::Login => {
                if email.is_empty() {
                    return Err(ValidationError::MissingField("Email"));
                }
                if self.password.is_empty() {
                    return Err(ValidationError::MissingField("Password"));
                }
                AuthRequest::Login { email: email.to_owned(), password: self.password.clone() }
            }
            AuthTab::Register => {
                let username = self.username.trim();
                if username.is_empty() {
                    return Err(ValidationError::MissingField("Username"));
                }
                if email.is_empty() {
                    return Err(ValidationError::MissingField("Email"));
                }
                if self.password.chars().count() < MIN_PASSWORD_LEN {
                    return Err(ValidationError::PasswordTooShort { min: MIN_PASSWORD_LEN });
                }
                AuthRequest::Register {
                    username: username.to_owned(),
                    email: email.to_owned(),
                    password: self.password.clone(),
                }
            }
        };
        self.error = None;
        self.phase = AuthPhase::Authenticating;
        tracing::info!(tab = ?self.tab, "authenticating");
        Ok(request)
    }

    /// Applies the outcome of the exchange started by [`begin`](Self::begin).
    pub fn finish(&mut self, result: Result<Session, ApiError>) {
        match result {
            Ok(session) => {
                tracing::info!(user = %session.user.username, "signed in");
                self.phase = AuthPhase::LoggedIn;
                self.password.clear();
                self.error = None;
            }
            Err(e) => {
                tracing::info!("sign-in failed: {e}");
                self.phase = AuthPhase::LoggedOut;
                self.error = Some(e.to_string());
            }
        }
    }

    /// Returns to the signed-out state, e.g. after logout or a forced logout.
    pub fn logged_out(&mut self) {
        self.phase = AuthPhase::LoggedOut;
        self.password.clear();
    }

    /// Marks the form as signed in for a session restored from storage.
    pub fn restored(&mut self) {
        self.phase = AuthPhase::LoggedIn;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::User;

    fn register_form(password: &str) -> AuthForm {
        let mut form = AuthForm::default();
        form.toggle_tab();
        form.username = "ada".into();
        form.email = "ada@example.com".into();
        form.password = password.into();
        form
    }

    #[test]
    fn short_register_password_is_rejected_locally() {
        for pw in ["", "a", "12345"] {
            let mut form = register_form(pw);
            assert_eq!(form.begin(), Err(ValidationError::PasswordTooShort { min: 6 }));
            assert_eq!(form.phase, AuthPhase::LoggedOut);
        }
        let mut form = register_form("123456");
        assert!(form.begin().is_ok());
        assert_eq!(form.phase, AuthPhase::Authenticating);
    }

    #[test]
    fn double_submission_is_blocked() {
        let mut form = AuthForm { email: "a@b.c".into(), password: "pw".into(), ..Default::default() };
        assert!(form.begin().is_ok());
        assert_eq!(form.begin(), Err(ValidationError::RequestPending));
        form.toggle_tab();
        assert_eq!(form.tab, AuthTab::Login);
    }

    #[test]
    fn login_does_not_enforce_password_length() {
        let mut form = AuthForm { email: "a@b.c".into(), password: "x".into(), ..Default::default() };
        assert_eq!(
            form.begin(),
            Ok(AuthRequest::Login { email: "a@b.c".into(), password: "x".into() })
        );
    }

    #[test]
    fn finish_moves_between_phases() {
        let mut form = AuthForm { email: "a@b.c".into(), password: "pw".into(), ..Default::default() };
        form.begin().unwrap();
        form.finish(Err(ApiError::Request { status: Some(401), message: "Invalid email or password".into() }));
        assert_eq!(form.phase, AuthPhase::LoggedOut);
        assert_eq!(form.error.as_deref(), Some("Invalid email or password"));

        form.begin().unwrap();
        form.finish(Ok(Session {
            token: "t".into(),
            user: User { username: "a".into(), email: "a@b.c".into() },
        }));
        assert_eq!(form.phase, AuthPhase::LoggedIn);
        assert!(form.password.is_empty());
    }

    #[test]
    fn field_cycling_follows_tab() {
        let mut form = AuthForm::default();
        assert_eq!(form.field, AuthField::Email);
        form.next_field();
        assert_eq!(form.field, AuthField::Password);
        form.next_field();
        assert_eq!(form.field, AuthField::Email);
        form.toggle_tab();
        assert_eq!(form.field, AuthField::Username);
        form.prev_field();
        assert_eq!(form.field, AuthField::Password);
    }
}
