//! Profile screen: load, rename, avatar upload.
//!
//! # Invariants
//! - A blank name is rejected locally; the repository is not called.
//! - Updates send the full loaded profile with only `name` replaced.
//! - Every successful write is followed by a full reload from the server;
//!   the displayed profile is never merged locally.
//! - Rename and avatar upload each report on their own cell and ignore a
//!   second submission while one is in flight.

use super::form::{required, NAME_REQUIRED};
use super::{RequestState, StateCell};
use crate::media::{ImageEncoder, AVATAR_FIELD_NAME};
use crate::model::user::UserProfile;
use crate::repo::profile_repo::ProfileRepository;
use log::{info, warn};
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub name: String,
    /// Read-only; shown next to the editable name.
    pub email: String,
    pub name_error: Option<String>,
}

pub struct ProfileController {
    profiles: Arc<ProfileRepository>,
    encoder: Arc<dyn ImageEncoder>,
    state: StateCell<UserProfile>,
    update_state: StateCell<()>,
    upload_state: StateCell<()>,
    form: watch::Sender<ProfileForm>,
}

impl ProfileController {
    pub fn new(profiles: Arc<ProfileRepository>, encoder: Arc<dyn ImageEncoder>) -> Self {
        Self {
            profiles,
            encoder,
            state: StateCell::new(RequestState::Loading),
            update_state: StateCell::new(RequestState::Idle),
            upload_state: StateCell::new(RequestState::Idle),
            form: watch::channel(ProfileForm::default()).0,
        }
    }

    /// Creates the controller and starts loading on the current tokio runtime.
    pub fn launch(profiles: Arc<ProfileRepository>, encoder: Arc<dyn ImageEncoder>) -> Arc<Self> {
        let controller = Arc::new(Self::new(profiles, encoder));
        let task = Arc::clone(&controller);
        tokio::spawn(async move { task.load_profile().await });
        controller
    }

    pub fn profile_state(&self) -> RequestState<UserProfile> {
        self.state.get()
    }

    pub fn subscribe_profile_state(&self) -> watch::Receiver<RequestState<UserProfile>> {
        self.state.subscribe()
    }

    pub fn update_state(&self) -> RequestState<()> {
        self.update_state.get()
    }

    pub fn subscribe_update_state(&self) -> watch::Receiver<RequestState<()>> {
        self.update_state.subscribe()
    }

    pub fn upload_state(&self) -> RequestState<()> {
        self.upload_state.get()
    }

    pub fn subscribe_upload_state(&self) -> watch::Receiver<RequestState<()>> {
        self.upload_state.subscribe()
    }

    pub fn form(&self) -> ProfileForm {
        self.form.borrow().clone()
    }

    pub fn subscribe_form(&self) -> watch::Receiver<ProfileForm> {
        self.form.subscribe()
    }

    pub fn on_name_change(&self, name: impl Into<String>) {
        let name = name.into();
        self.form.send_modify(|form| form.name = name);
    }

    pub async fn load_profile(&self) {
        let ticket = self.state.begin();
        match self.profiles.my_profile().await {
            Ok(profile) => {
                let name = profile.name.clone();
                let email = profile.owner.email().unwrap_or_default().to_string();
                if self.state.finish(ticket, RequestState::Success(profile)) {
                    self.form.send_modify(|form| {
                        form.name = name;
                        form.email = email;
                    });
                }
            }
            Err(err) => {
                warn!("event=profile_load module=controller status=error error={err}");
                self.state.finish(ticket, RequestState::Error(err.user_message()));
            }
        }
    }

    pub async fn update_profile(&self) {
        let name = self.form.borrow().name.clone();
        let name_error = required(&name, NAME_REQUIRED);
        let blocked = name_error.is_some();
        self.form.send_modify(|form| form.name_error = name_error);
        if blocked {
            return;
        }

        let RequestState::Success(current) = self.state.get() else {
            return;
        };
        let Some(ticket) = self.update_state.try_begin() else {
            return;
        };

        let updated = UserProfile { name, ..current };
        match self.profiles.update_my_profile(&updated).await {
            Ok(_) => {
                info!("event=profile_update module=controller status=ok");
                self.update_state.finish(ticket, RequestState::Success(()));
                self.load_profile().await;
            }
            Err(err) => {
                warn!("event=profile_update module=controller status=error error={err}");
                self.update_state.finish(ticket, RequestState::Error(err.user_message()));
            }
        }
    }

    /// Encodes and uploads a captured image, then reloads the profile.
    pub async fn upload_image(&self, image: &[u8]) {
        let Some(ticket) = self.upload_state.try_begin() else {
            return;
        };
        let upload = match self.encoder.encode(image, AVATAR_FIELD_NAME) {
            Ok(upload) => upload,
            Err(err) => {
                warn!(
                    "event=avatar_upload module=controller status=error error_code=encode_failed error={err}"
                );
                let message = format!("Image upload failed: {err}");
                self.upload_state.finish(ticket, RequestState::Error(message));
                return;
            }
        };

        match self.profiles.upload_avatar(upload).await {
            Ok(_) => {
                info!("event=avatar_upload module=controller status=ok");
                self.upload_state.finish(ticket, RequestState::Success(()));
                self.load_profile().await;
            }
            Err(err) => {
                warn!("event=avatar_upload module=controller status=error error={err}");
                self.upload_state.finish(ticket, RequestState::Error(err.user_message()));
            }
        }
    }
}
