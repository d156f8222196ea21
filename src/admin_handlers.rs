use std::collections::HashMap;
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, web};
use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use tracing::{info, warn};

use crate::errors::WorkoutError;
use crate::firestore::{FirestoreClient, FirestoreValue};

// A user counts as active when their profile was touched in the last week
const ACTIVE_WINDOW_DAYS: i64 = 7;

/// App state for the admin endpoints. The admin document id and email are
/// injected from configuration.
pub struct AdminAppState {
    pub firestore: Arc<FirestoreClient>,
    pub admin_doc_id: String,
    pub admin_email: String,
}

// Minimal gate for the admin surface: the caller must present the
// configured admin email. Real authentication lives in front of this
// service.
fn require_admin(req: &HttpRequest, admin_email: &str) -> Result<(), WorkoutError> {
    let presented = req
        .headers()
        .get("x-admin-email")
        .and_then(|value| value.to_str().ok());

    match presented {
        Some(email) if email.eq_ignore_ascii_case(admin_email) => Ok(()),
        _ => Err(WorkoutError::PermissionDenied(
            "Admin access required".to_string(),
        )),
    }
}

fn is_active(updated_at: &str, now: DateTime<Utc>) -> bool {
    match DateTime::parse_from_rfc3339(updated_at) {
        Ok(updated) => now - updated.with_timezone(&Utc) <= Duration::days(ACTIVE_WINDOW_DAYS),
        Err(_) => false,
    }
}

/// GET /api/admin/health
pub async fn admin_health_handler() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "OK",
        "message": "Admin API is running",
    }))
}

/// GET /api/admin/users/count
pub async fn get_user_count_handler(
    req: HttpRequest,
    data: web::Data<AdminAppState>,
) -> Result<HttpResponse, WorkoutError> {
    require_admin(&req, &data.admin_email)?;

    let users = data.firestore.list_documents("users", Some(1000), None).await?;
    let total_users = users.len();
    info!("Counted {} users", total_users);

    // Mirror the count onto the admin document for the dashboard
    let fields = HashMap::from([
        (
            "totalUsers".to_string(),
            FirestoreValue::integer(total_users as i64),
        ),
        ("lastUpdated".to_string(), FirestoreValue::timestamp_now()),
    ]);
    data.firestore
        .patch_document(&format!("admin/{}", data.admin_doc_id), fields)
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "totalUsers": total_users })))
}

/// GET /api/admin/users/active
pub async fn get_active_users_handler(
    req: HttpRequest,
    data: web::Data<AdminAppState>,
) -> Result<HttpResponse, WorkoutError> {
    require_admin(&req, &data.admin_email)?;

    let users = data.firestore.list_documents("users", Some(1000), None).await?;
    let now = Utc::now();
    let mut active_users = 0;

    for user in &users {
        let profile_path = format!("users/{}/profile", user.doc_id());
        let profiles = match data
            .firestore
            .list_documents(&profile_path, Some(1), None)
            .await
        {
            Ok(profiles) => profiles,
            Err(e) => {
                warn!("Skipping user {}: {}", user.doc_id(), e);
                continue;
            }
        };

        if let Some(profile) = profiles.first() {
            if let Some(updated_at) = profile.string_field("updatedAt") {
                if is_active(updated_at, now) {
                    active_users += 1;
                }
            }
        }
    }

    info!("Counted {} active users", active_users);
    Ok(HttpResponse::Ok().json(json!({ "activeUsers": active_users })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_window() {
        let now = DateTime::parse_from_rfc3339("2026-08-29T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);

        assert!(is_active("2026-08-28T12:00:00Z", now));
        assert!(is_active("2026-08-22T12:00:00+00:00", now));
        assert!(!is_active("2026-08-21T11:59:00Z", now));
        assert!(!is_active("not a timestamp", now));
    }
}
