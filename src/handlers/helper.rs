use crate::{
    models::{ActivityEntry, PrincipalKind},
    state::AppState,
    utils::{normalize_email, AppError},
};

/// Append to an admin's activity log. Failures are logged, never returned.
pub async fn record_activity(
    state: &AppState,
    admin_id: u32,
    action: &str,
    details: impl Into<String>,
) {
    let entry = ActivityEntry::new(action, details);
    let result = state
        .principals
        .append_activity(PrincipalKind::Admin, admin_id, entry)
        .await;
    if let Err(err) = result {
        tracing::warn!("Unable to record activity {action} for admin {admin_id}: {:?}", err);
    }
}

/// Fail when a principal of this kind already uses the email
pub async fn check_uniq_email(
    state: &AppState,
    kind: PrincipalKind,
    email: &str,
) -> Result<(), AppError> {
    let email = normalize_email(email);
    if state.principals.find_by_email(kind, &email).await?.is_some() {
        let err = format!("An account already exists with email: {email}");
        return Err(AppError::BadRequestErr(err));
    }
    Ok(())
}
