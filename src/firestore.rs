use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use crate::app_config::AppConfig;
use crate::errors::{WorkoutError, WorkoutResult};
use crate::models::{ScheduleDay, UserProfile, WeeklySchedule};
use crate::profile_resolver::ProfileStore;

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Typed value in the Firestore REST document format
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum FirestoreValue {
    NullValue(()),
    StringValue(String),
    // Firestore encodes 64-bit integers as JSON strings
    IntegerValue(String),
    DoubleValue(f64),
    BooleanValue(bool),
    TimestampValue(String),
    ReferenceValue(String),
    MapValue(MapFields),
    ArrayValue(ArrayValues),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MapFields {
    #[serde(default)]
    pub fields: HashMap<String, FirestoreValue>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ArrayValues {
    #[serde(default)]
    pub values: Vec<FirestoreValue>,
}

impl FirestoreValue {
    pub fn string(value: impl Into<String>) -> Self {
        FirestoreValue::StringValue(value.into())
    }

    pub fn integer(value: i64) -> Self {
        FirestoreValue::IntegerValue(value.to_string())
    }

    pub fn boolean(value: bool) -> Self {
        FirestoreValue::BooleanValue(value)
    }

    pub fn timestamp_now() -> Self {
        FirestoreValue::TimestampValue(chrono::Utc::now().to_rfc3339())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FirestoreValue::StringValue(s) | FirestoreValue::TimestampValue(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FirestoreValue::IntegerValue(s) => s.parse().ok(),
            FirestoreValue::DoubleValue(d) => Some(*d as i64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FirestoreValue::BooleanValue(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&HashMap<String, FirestoreValue>> {
        match self {
            FirestoreValue::MapValue(map) => Some(&map.fields),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[FirestoreValue]> {
        match self {
            FirestoreValue::ArrayValue(array) => Some(&array.values),
            _ => None,
        }
    }

    /// Converts the typed value back into plain JSON for API responses
    pub fn to_json(&self) -> Value {
        match self {
            FirestoreValue::NullValue(()) => Value::Null,
            FirestoreValue::StringValue(s)
            | FirestoreValue::TimestampValue(s)
            | FirestoreValue::ReferenceValue(s) => json!(s),
            FirestoreValue::IntegerValue(s) => match s.parse::<i64>() {
                Ok(n) => json!(n),
                Err(_) => json!(s),
            },
            FirestoreValue::DoubleValue(d) => json!(d),
            FirestoreValue::BooleanValue(b) => json!(b),
            FirestoreValue::MapValue(map) => {
                let entries: serde_json::Map<String, Value> = map
                    .fields
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect();
                Value::Object(entries)
            }
            FirestoreValue::ArrayValue(array) => {
                Value::Array(array.values.iter().map(FirestoreValue::to_json).collect())
            }
        }
    }
}

/// A document as returned by the Firestore REST API
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fields: HashMap<String, FirestoreValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
}

impl Document {
    /// Last path segment of the full resource name
    pub fn doc_id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    pub fn string_field(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(FirestoreValue::as_str)
    }

    pub fn integer_field(&self, field: &str) -> Option<i64> {
        self.fields.get(field).and_then(FirestoreValue::as_integer)
    }

    pub fn bool_field(&self, field: &str) -> Option<bool> {
        self.fields.get(field).and_then(FirestoreValue::as_bool)
    }

    /// Flattens the document into plain JSON with its id attached
    pub fn to_json(&self) -> Value {
        let mut entries = serde_json::Map::new();
        entries.insert("id".to_string(), json!(self.doc_id()));
        for (key, value) in &self.fields {
            entries.insert(key.clone(), value.to_json());
        }
        Value::Object(entries)
    }
}

#[derive(Debug, Default, Deserialize)]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<Document>,
}

/// Thin client for the Firestore REST API. Stateless apart from the shared
/// `reqwest::Client`, so a single instance serves concurrent requests.
pub struct FirestoreClient {
    client: Client,
    base_url: String,
    project_id: String,
    access_token: Option<String>,
}

impl FirestoreClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.firestore_base_url.clone(),
            project_id: config.firestore_project_id.clone(),
            access_token: config.firestore_access_token.clone(),
        }
    }

    fn document_url(&self, path: &str) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents/{}",
            self.base_url, self.project_id, path
        )
    }

    fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        let mut request = self
            .client
            .request(method, url)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS));
        if let Some(token) = &self.access_token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }
        request
    }

    /// Fetches a single document, `None` when it does not exist
    pub async fn get_document(&self, path: &str) -> WorkoutResult<Option<Document>> {
        let url = self.document_url(path);
        debug!("Firestore GET {}", path);

        let response = self
            .request(Method::GET, &url)
            .send()
            .await
            .map_err(|e| WorkoutError::Firestore(format!("GET {} failed: {}", path, e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = check_status(response, path).await?;

        let document = response
            .json::<Document>()
            .await
            .map_err(|e| WorkoutError::Firestore(format!("invalid document at {}: {}", path, e)))?;
        Ok(Some(document))
    }

    /// Lists documents in a collection, optionally bounded and ordered
    pub async fn list_documents(
        &self,
        collection_path: &str,
        page_size: Option<u32>,
        order_by: Option<&str>,
    ) -> WorkoutResult<Vec<Document>> {
        let url = self.document_url(collection_path);
        debug!("Firestore LIST {}", collection_path);

        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(size) = page_size {
            query.push(("pageSize", size.to_string()));
        }
        if let Some(order) = order_by {
            query.push(("orderBy", order.to_string()));
        }

        let response = self
            .request(Method::GET, &url)
            .query(&query)
            .send()
            .await
            .map_err(|e| {
                WorkoutError::Firestore(format!("LIST {} failed: {}", collection_path, e))
            })?;
        let response = check_status(response, collection_path).await?;

        let list = response.json::<ListDocumentsResponse>().await.map_err(|e| {
            WorkoutError::Firestore(format!("invalid list at {}: {}", collection_path, e))
        })?;
        Ok(list.documents)
    }

    /// Creates a document with an auto-generated id
    pub async fn create_document(
        &self,
        collection_path: &str,
        fields: HashMap<String, FirestoreValue>,
    ) -> WorkoutResult<Document> {
        let url = self.document_url(collection_path);
        debug!("Firestore CREATE {}", collection_path);

        let response = self
            .request(Method::POST, &url)
            .json(&json!({ "fields": fields }))
            .send()
            .await
            .map_err(|e| {
                WorkoutError::Firestore(format!("CREATE {} failed: {}", collection_path, e))
            })?;
        let response = check_status(response, collection_path).await?;

        response.json::<Document>().await.map_err(|e| {
            WorkoutError::Firestore(format!("invalid document at {}: {}", collection_path, e))
        })
    }

    /// Patches only the given fields, leaving the rest of the document
    /// untouched
    pub async fn patch_document(
        &self,
        path: &str,
        fields: HashMap<String, FirestoreValue>,
    ) -> WorkoutResult<Document> {
        let url = self.document_url(path);
        debug!("Firestore PATCH {}", path);

        let mask: Vec<(&str, String)> = fields
            .keys()
            .map(|key| ("updateMask.fieldPaths", key.clone()))
            .collect();

        let response = self
            .request(Method::PATCH, &url)
            .query(&mask)
            .json(&json!({ "fields": fields }))
            .send()
            .await
            .map_err(|e| WorkoutError::Firestore(format!("PATCH {} failed: {}", path, e)))?;
        let response = check_status(response, path).await?;

        response
            .json::<Document>()
            .await
            .map_err(|e| WorkoutError::Firestore(format!("invalid document at {}: {}", path, e)))
    }

    pub async fn delete_document(&self, path: &str) -> WorkoutResult<()> {
        let url = self.document_url(path);
        debug!("Firestore DELETE {}", path);

        let response = self
            .request(Method::DELETE, &url)
            .send()
            .await
            .map_err(|e| WorkoutError::Firestore(format!("DELETE {} failed: {}", path, e)))?;
        check_status(response, path).await?;
        Ok(())
    }
}

async fn check_status(response: reqwest::Response, path: &str) -> WorkoutResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(WorkoutError::Firestore(format!(
        "{} returned {}: {}",
        path, status, body
    )))
}

pub(crate) fn profile_from_document(document: &Document) -> UserProfile {
    UserProfile {
        name: document.string_field("name").map(str::to_string),
        username: document.string_field("username").map(str::to_string),
        email: document.string_field("email").map(str::to_string),
        age: document.integer_field("age"),
        weight: document.integer_field("weight"),
        gender: document.string_field("gender").map(str::to_string),
        experience: document.string_field("experience").map(str::to_string),
        daily_steps: document.integer_field("dailySteps"),
        weekly_steps: document.integer_field("weeklySteps"),
        last_reset_date: document.string_field("lastResetDate").map(str::to_string),
        profile_completed: document.bool_field("profileCompleted"),
    }
}

pub(crate) fn schedule_from_document(document: &Document) -> WeeklySchedule {
    let mut days = HashMap::new();

    if let Some(entries) = document.fields.get("days").and_then(FirestoreValue::as_map) {
        for (date_key, entry) in entries {
            let Some(fields) = entry.as_map() else {
                continue;
            };
            let body_parts = fields
                .get("bodyParts")
                .and_then(FirestoreValue::as_array)
                .map(|values| {
                    values
                        .iter()
                        .filter_map(|value| value.as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default();

            days.insert(
                date_key.clone(),
                ScheduleDay {
                    is_workout_day: fields
                        .get("isWorkoutDay")
                        .and_then(FirestoreValue::as_bool)
                        .unwrap_or(false),
                    body_parts,
                    workout_time: fields
                        .get("workoutTime")
                        .and_then(FirestoreValue::as_str)
                        .map(str::to_string),
                },
            );
        }
    }

    WeeklySchedule { days }
}

#[async_trait]
impl ProfileStore for FirestoreClient {
    async fn fetch_profile(&self, user_id: &str) -> WorkoutResult<UserProfile> {
        let docs = self
            .list_documents(&format!("users/{}/profile", user_id), Some(1), None)
            .await?;
        match docs.first() {
            Some(document) => Ok(profile_from_document(document)),
            None => Err(WorkoutError::NotFound(user_id.to_string())),
        }
    }

    async fn fetch_weekly_schedule(&self, user_id: &str) -> WorkoutResult<Option<WeeklySchedule>> {
        let document = self
            .get_document(&format!("users/{}/schedule/weekly", user_id))
            .await?;
        Ok(document.map(|doc| schedule_from_document(&doc)))
    }

    async fn fetch_latest_step_count(&self, user_id: &str) -> WorkoutResult<Option<u32>> {
        let docs = self
            .list_documents(
                &format!("users/{}/activity", user_id),
                Some(1),
                Some("timestamp desc"),
            )
            .await?;
        Ok(docs
            .first()
            .and_then(|doc| doc.integer_field("stepCount"))
            .and_then(|count| u32::try_from(count).ok()))
    }
}
