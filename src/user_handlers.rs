use std::collections::HashMap;
use std::sync::Arc;

use actix_web::{HttpResponse, web};
use chrono::Local;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::errors::{WorkoutError, WorkoutResult};
use crate::firestore::{Document, FirestoreClient, FirestoreValue};

/// App state for the user CRUD endpoints
pub struct UserAppState {
    pub firestore: Arc<FirestoreClient>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub email: String,
    pub name: Option<String>,
    pub username: Option<String>,
    pub age: Option<i64>,
    pub weight: Option<i64>,
    pub gender: Option<String>,
    pub experience: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    pub username: Option<String>,
    pub age: Option<i64>,
    pub weight: Option<i64>,
    pub gender: Option<String>,
    pub experience: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StepsRequest {
    pub steps: i64,
}

fn today_key() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

// Finds the single profile document under users/{id}/profile
async fn find_profile_document(
    firestore: &FirestoreClient,
    user_id: &str,
) -> WorkoutResult<Document> {
    let docs = firestore
        .list_documents(&format!("users/{}/profile", user_id), Some(1), None)
        .await?;
    docs.into_iter()
        .next()
        .ok_or_else(|| WorkoutError::NotFound(user_id.to_string()))
}

/// GET /api/users
pub async fn get_users_handler(
    data: web::Data<UserAppState>,
) -> Result<HttpResponse, WorkoutError> {
    let docs = data.firestore.list_documents("users", Some(1000), None).await?;
    let users: Vec<Value> = docs.iter().map(Document::to_json).collect();
    Ok(HttpResponse::Ok().json(users))
}

/// GET /api/users/{user_id}
pub async fn get_user_handler(
    path: web::Path<String>,
    data: web::Data<UserAppState>,
) -> Result<HttpResponse, WorkoutError> {
    let user_id = path.into_inner();
    match data
        .firestore
        .get_document(&format!("users/{}", user_id))
        .await?
    {
        Some(document) => Ok(HttpResponse::Ok().json(document.to_json())),
        None => Err(WorkoutError::NotFound(user_id)),
    }
}

/// POST /api/users
pub async fn create_user_handler(
    request: web::Json<CreateUserRequest>,
    data: web::Data<UserAppState>,
) -> Result<HttpResponse, WorkoutError> {
    let request = request.into_inner();
    if request.email.trim().is_empty() {
        return Err(WorkoutError::Validation("email is required".to_string()));
    }

    let user_fields = HashMap::from([
        ("email".to_string(), FirestoreValue::string(&request.email)),
        ("createdAt".to_string(), FirestoreValue::timestamp_now()),
    ]);
    let user_doc = data.firestore.create_document("users", user_fields).await?;
    let user_id = user_doc.doc_id().to_string();

    // New users start with zeroed step counters and today's reset date
    let mut profile_fields = HashMap::from([
        ("email".to_string(), FirestoreValue::string(&request.email)),
        ("dailySteps".to_string(), FirestoreValue::integer(0)),
        ("weeklySteps".to_string(), FirestoreValue::integer(0)),
        ("lastResetDate".to_string(), FirestoreValue::string(today_key())),
        ("profileCompleted".to_string(), FirestoreValue::boolean(true)),
        ("createdAt".to_string(), FirestoreValue::timestamp_now()),
        ("updatedAt".to_string(), FirestoreValue::timestamp_now()),
    ]);
    if let Some(name) = &request.name {
        profile_fields.insert("name".to_string(), FirestoreValue::string(name));
    }
    if let Some(username) = &request.username {
        profile_fields.insert("username".to_string(), FirestoreValue::string(username));
    }
    if let Some(age) = request.age {
        profile_fields.insert("age".to_string(), FirestoreValue::integer(age));
    }
    if let Some(weight) = request.weight {
        profile_fields.insert("weight".to_string(), FirestoreValue::integer(weight));
    }
    if let Some(gender) = &request.gender {
        profile_fields.insert("gender".to_string(), FirestoreValue::string(gender));
    }
    if let Some(experience) = &request.experience {
        profile_fields.insert("experience".to_string(), FirestoreValue::string(experience));
    }

    let profile_doc = data
        .firestore
        .create_document(&format!("users/{}/profile", user_id), profile_fields)
        .await?;

    info!("Created user {} with profile {}", user_id, profile_doc.doc_id());
    Ok(HttpResponse::Created().json(json!({
        "id": user_id,
        "profileId": profile_doc.doc_id(),
        "message": "User created successfully",
    })))
}

/// PUT /api/users/{user_id}
pub async fn update_user_handler(
    path: web::Path<String>,
    request: web::Json<UpdateUserRequest>,
    data: web::Data<UserAppState>,
) -> Result<HttpResponse, WorkoutError> {
    let user_id = path.into_inner();
    let request = request.into_inner();

    let profile_doc = find_profile_document(&data.firestore, &user_id).await?;

    let mut profile_fields =
        HashMap::from([("updatedAt".to_string(), FirestoreValue::timestamp_now())]);
    if let Some(name) = &request.name {
        profile_fields.insert("name".to_string(), FirestoreValue::string(name));
    }
    if let Some(username) = &request.username {
        profile_fields.insert("username".to_string(), FirestoreValue::string(username));
    }
    if let Some(email) = &request.email {
        profile_fields.insert("email".to_string(), FirestoreValue::string(email));
    }
    if let Some(age) = request.age {
        profile_fields.insert("age".to_string(), FirestoreValue::integer(age));
    }
    if let Some(weight) = request.weight {
        profile_fields.insert("weight".to_string(), FirestoreValue::integer(weight));
    }
    if let Some(gender) = &request.gender {
        profile_fields.insert("gender".to_string(), FirestoreValue::string(gender));
    }
    if let Some(experience) = &request.experience {
        profile_fields.insert("experience".to_string(), FirestoreValue::string(experience));
    }

    let profile_path = format!("users/{}/profile/{}", user_id, profile_doc.doc_id());
    data.firestore
        .patch_document(&profile_path, profile_fields)
        .await?;

    // The email is mirrored on the user document itself
    if let Some(email) = &request.email {
        let user_fields = HashMap::from([
            ("email".to_string(), FirestoreValue::string(email)),
            ("updatedAt".to_string(), FirestoreValue::timestamp_now()),
        ]);
        data.firestore
            .patch_document(&format!("users/{}", user_id), user_fields)
            .await?;
    }

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "User updated successfully",
    })))
}

/// DELETE /api/users/{user_id}
pub async fn delete_user_handler(
    path: web::Path<String>,
    data: web::Data<UserAppState>,
) -> Result<HttpResponse, WorkoutError> {
    let user_id = path.into_inner();
    data.firestore
        .delete_document(&format!("users/{}", user_id))
        .await?;
    info!("Deleted user {}", user_id);

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "User deleted successfully",
    })))
}

// Daily/weekly step bookkeeping. On the first submission of a new day the
// daily counter restarts and the weekly total absorbs the full submission;
// on later submissions the weekly total absorbs only the delta against the
// previous daily value.
fn apply_step_update(
    current_daily: i64,
    current_weekly: i64,
    last_reset: Option<&str>,
    today: &str,
    steps: i64,
) -> (i64, i64) {
    if last_reset != Some(today) {
        (steps, current_weekly + steps)
    } else {
        (steps, current_weekly + (steps - current_daily))
    }
}

/// PUT /api/users/{user_id}/steps
pub async fn update_steps_handler(
    path: web::Path<String>,
    request: web::Json<StepsRequest>,
    data: web::Data<UserAppState>,
) -> Result<HttpResponse, WorkoutError> {
    let user_id = path.into_inner();
    let steps = request.steps;
    if steps < 0 {
        return Err(WorkoutError::Validation(
            "steps must not be negative".to_string(),
        ));
    }

    let profile_doc = find_profile_document(&data.firestore, &user_id).await?;
    let today = today_key();

    let (daily, weekly) = apply_step_update(
        profile_doc.integer_field("dailySteps").unwrap_or(0),
        profile_doc.integer_field("weeklySteps").unwrap_or(0),
        profile_doc.string_field("lastResetDate"),
        &today,
        steps,
    );

    let fields = HashMap::from([
        ("dailySteps".to_string(), FirestoreValue::integer(daily)),
        ("weeklySteps".to_string(), FirestoreValue::integer(weekly)),
        ("lastResetDate".to_string(), FirestoreValue::string(&today)),
        ("updatedAt".to_string(), FirestoreValue::timestamp_now()),
    ]);
    let profile_path = format!("users/{}/profile/{}", user_id, profile_doc.doc_id());
    data.firestore.patch_document(&profile_path, fields).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Step count updated successfully",
        "dailySteps": daily,
        "weeklySteps": weekly,
    })))
}

/// GET /api/users/{user_id}/workouts
pub async fn get_user_workouts_handler(
    path: web::Path<String>,
    data: web::Data<UserAppState>,
) -> Result<HttpResponse, WorkoutError> {
    let user_id = path.into_inner();
    let document = data
        .firestore
        .get_document(&format!("users/{}", user_id))
        .await?
        .ok_or_else(|| WorkoutError::NotFound(user_id.clone()))?;

    let current_workout = document
        .fields
        .get("currentWorkout")
        .map_or(Value::Null, FirestoreValue::to_json);
    let last_created = document
        .fields
        .get("lastWorkoutCreated")
        .map_or(Value::Null, FirestoreValue::to_json);

    Ok(HttpResponse::Ok().json(json!({
        "currentWorkout": current_workout,
        "lastWorkoutCreated": last_created,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_update_same_day_absorbs_delta() {
        let (daily, weekly) =
            apply_step_update(2000, 10000, Some("2026-08-29"), "2026-08-29", 3500);
        assert_eq!(daily, 3500);
        assert_eq!(weekly, 11500);
    }

    #[test]
    fn test_step_update_new_day_resets_daily() {
        let (daily, weekly) =
            apply_step_update(8000, 20000, Some("2026-08-28"), "2026-08-29", 1500);
        assert_eq!(daily, 1500);
        assert_eq!(weekly, 21500);
    }

    #[test]
    fn test_step_update_without_reset_date_counts_as_new_day() {
        let (daily, weekly) = apply_step_update(0, 0, None, "2026-08-29", 400);
        assert_eq!(daily, 400);
        assert_eq!(weekly, 400);
    }

    #[test]
    fn test_step_update_allows_downward_correction() {
        let (daily, weekly) =
            apply_step_update(5000, 12000, Some("2026-08-29"), "2026-08-29", 4000);
        assert_eq!(daily, 4000);
        assert_eq!(weekly, 11000);
    }
}
