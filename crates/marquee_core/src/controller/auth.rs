//! Login, registration and password-reset form controllers.
//!
//! # Invariants
//! - Field errors are recomputed synchronously after every edit.
//! - Submitting an invalid form is a no-op (errors are refreshed first).
//! - On sign-in success the session is saved exactly once, before `Success`
//!   is published.

use super::form::{
    email_error, min_chars, required, EMPTY_PASSWORD, MIN_PASSWORD_CHARS, NAME_REQUIRED,
    SHORT_PASSWORD,
};
use super::{RequestState, StateCell, Ticket};
use crate::api::ApiResult;
use crate::model::auth::{AuthSession, ForgotPasswordRequest, LoginRequest, RegisterRequest};
use crate::repo::auth_repo::AuthRepository;
use crate::session::SessionStore;
use log::{error, info};
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub email_error: Option<String>,
    pub password_error: Option<String>,
    pub is_valid: bool,
}

impl LoginForm {
    fn validate(&mut self) {
        self.email_error = email_error(&self.email);
        self.password_error = self
            .password
            .trim()
            .is_empty()
            .then(|| EMPTY_PASSWORD.to_string());
        self.is_valid = self.email_error.is_none() && self.password_error.is_none();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub name_error: Option<String>,
    pub email_error: Option<String>,
    pub password_error: Option<String>,
    pub is_valid: bool,
}

impl RegisterForm {
    fn validate(&mut self) {
        self.name_error = required(&self.name, NAME_REQUIRED);
        self.email_error = email_error(&self.email);
        self.password_error = min_chars(&self.password, MIN_PASSWORD_CHARS, SHORT_PASSWORD);
        self.is_valid = self.name_error.is_none()
            && self.email_error.is_none()
            && self.password_error.is_none();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForgotPasswordForm {
    pub email: String,
    pub email_error: Option<String>,
    pub is_valid: bool,
}

impl ForgotPasswordForm {
    fn validate(&mut self) {
        self.email_error = email_error(&self.email);
        self.is_valid = self.email_error.is_none();
    }
}

/// Saves the session for a successful sign-in and picks the final state.
fn finish_sign_in(
    store: &dyn SessionStore,
    cell: &StateCell<AuthSession>,
    ticket: Ticket,
    operation: &'static str,
    outcome: ApiResult<AuthSession>,
) {
    let next = match outcome {
        Ok(session) => match store.save_session(&session.access_token, &session.user.role) {
            Ok(()) => {
                info!("event=sign_in module=controller status=ok op={operation}");
                RequestState::Success(session)
            }
            Err(err) => {
                error!("event=sign_in module=controller status=error op={operation} error_code=session_save_failed error={err}");
                RequestState::Error("Could not store the session on this device".to_string())
            }
        },
        Err(err) => {
            info!("event=sign_in module=controller status=error op={operation} error={err}");
            RequestState::Error(err.user_message())
        }
    };
    cell.finish(ticket, next);
}

pub struct LoginController {
    auth: Arc<AuthRepository>,
    store: Arc<dyn SessionStore>,
    form: watch::Sender<LoginForm>,
    result: StateCell<AuthSession>,
}

impl LoginController {
    pub fn new(auth: Arc<AuthRepository>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            auth,
            store,
            form: watch::channel(LoginForm::default()).0,
            result: StateCell::new(RequestState::Idle),
        }
    }

    pub fn form(&self) -> LoginForm {
        self.form.borrow().clone()
    }

    pub fn subscribe_form(&self) -> watch::Receiver<LoginForm> {
        self.form.subscribe()
    }

    pub fn login_result(&self) -> RequestState<AuthSession> {
        self.result.get()
    }

    pub fn subscribe_login_result(&self) -> watch::Receiver<RequestState<AuthSession>> {
        self.result.subscribe()
    }

    pub fn on_email_change(&self, email: impl Into<String>) {
        let email = email.into();
        self.form.send_modify(|form| {
            form.email = email;
            form.validate();
        });
    }

    pub fn on_password_change(&self, password: impl Into<String>) {
        let password = password.into();
        self.form.send_modify(|form| {
            form.password = password;
            form.validate();
        });
    }

    pub async fn login(&self) {
        self.form.send_modify(LoginForm::validate);
        let form = self.form();
        if !form.is_valid {
            return;
        }
        let Some(ticket) = self.result.try_begin() else {
            return;
        };

        let request = LoginRequest {
            email: form.email,
            password: form.password,
        };
        let outcome = self.auth.login(&request).await;
        finish_sign_in(self.store.as_ref(), &self.result, ticket, "login", outcome);
    }
}

pub struct RegisterController {
    auth: Arc<AuthRepository>,
    store: Arc<dyn SessionStore>,
    form: watch::Sender<RegisterForm>,
    result: StateCell<AuthSession>,
}

impl RegisterController {
    pub fn new(auth: Arc<AuthRepository>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            auth,
            store,
            form: watch::channel(RegisterForm::default()).0,
            result: StateCell::new(RequestState::Idle),
        }
    }

    pub fn form(&self) -> RegisterForm {
        self.form.borrow().clone()
    }

    pub fn subscribe_form(&self) -> watch::Receiver<RegisterForm> {
        self.form.subscribe()
    }

    pub fn register_result(&self) -> RequestState<AuthSession> {
        self.result.get()
    }

    pub fn subscribe_register_result(&self) -> watch::Receiver<RequestState<AuthSession>> {
        self.result.subscribe()
    }

    pub fn on_name_change(&self, name: impl Into<String>) {
        let name = name.into();
        self.form.send_modify(|form| {
            form.name = name;
            form.validate();
        });
    }

    pub fn on_email_change(&self, email: impl Into<String>) {
        let email = email.into();
        self.form.send_modify(|form| {
            form.email = email;
            form.validate();
        });
    }

    pub fn on_password_change(&self, password: impl Into<String>) {
        let password = password.into();
        self.form.send_modify(|form| {
            form.password = password;
            form.validate();
        });
    }

    pub async fn register(&self) {
        self.form.send_modify(RegisterForm::validate);
        let form = self.form();
        if !form.is_valid {
            return;
        }
        let Some(ticket) = self.result.try_begin() else {
            return;
        };

        let request = RegisterRequest::new(form.name, form.email, form.password);
        let outcome = self.auth.register(&request).await;
        finish_sign_in(
            self.store.as_ref(),
            &self.result,
            ticket,
            "register",
            outcome,
        );
    }
}

pub struct ForgotPasswordController {
    auth: Arc<AuthRepository>,
    form: watch::Sender<ForgotPasswordForm>,
    result: StateCell<()>,
}

impl ForgotPasswordController {
    pub fn new(auth: Arc<AuthRepository>) -> Self {
        Self {
            auth,
            form: watch::channel(ForgotPasswordForm::default()).0,
            result: StateCell::new(RequestState::Idle),
        }
    }

    pub fn form(&self) -> ForgotPasswordForm {
        self.form.borrow().clone()
    }

    pub fn reset_state(&self) -> RequestState<()> {
        self.result.get()
    }

    pub fn subscribe_reset_state(&self) -> watch::Receiver<RequestState<()>> {
        self.result.subscribe()
    }

    pub fn on_email_change(&self, email: impl Into<String>) {
        let email = email.into();
        self.form.send_modify(|form| {
            form.email = email;
            form.validate();
        });
    }

    pub async fn send_reset_link(&self) {
        self.form.send_modify(ForgotPasswordForm::validate);
        let form = self.form();
        if !form.is_valid {
            return;
        }
        let Some(ticket) = self.result.try_begin() else {
            return;
        };

        let request = ForgotPasswordRequest { email: form.email };
        let next = match self.auth.forgot_password(&request).await {
            Ok(()) => RequestState::Success(()),
            Err(err) => RequestState::Error(err.user_message()),
        };
        self.result.finish(ticket, next);
    }
}
