#![allow(dead_code)]

pub mod fakes;
pub mod request;

use axum::Router;
use std::sync::Arc;

use appleverse_backend::{
    app::build_app,
    models::{NewPrincipal, Principal, PrincipalKind},
    otp::{ManualClock, OtpConfig},
    state::AppState,
    stores::PrincipalStore,
    utils::{get_epoch_ts, hash_password},
};

pub use fakes::*;
pub use request::*;

/// The full router wired to in-memory stores and a controllable clock
pub struct TestApp {
    pub app: Router,
    pub principals: Arc<MemoryPrincipals>,
    pub apples: Arc<MemoryApples>,
    pub images: Arc<MemoryImages>,
    pub notifier: Arc<CapturingNotifier>,
    pub clock: Arc<ManualClock>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_images(MemoryImages::default())
    }

    pub fn with_images(images: MemoryImages) -> Self {
        let principals = Arc::new(MemoryPrincipals::default());
        let apples = Arc::new(MemoryApples::default());
        let images = Arc::new(images);
        let notifier = Arc::new(CapturingNotifier::default());
        let clock = Arc::new(ManualClock::new(get_epoch_ts()));
        let state = AppState::new(
            principals.clone(),
            apples.clone(),
            Arc::new(MemoryAdminRequests::default()),
            images.clone(),
            notifier.clone(),
            clock.clone(),
            OtpConfig::default(),
        );
        Self {
            app: build_app(state),
            principals,
            apples,
            images,
            notifier,
            clock,
        }
    }

    pub async fn add_principal(&self, kind: PrincipalKind, email: &str, password: &str) -> Principal {
        let new = NewPrincipal {
            name: "Test Account".to_owned(),
            email: email.to_owned(),
            password_hash: Some(hash_password(password).unwrap()),
            role: None,
            dob: None,
            approved_by: None,
        };
        self.principals.insert(kind, new).await.unwrap()
    }
}
