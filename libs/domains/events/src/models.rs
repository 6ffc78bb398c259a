use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

/// Longest tag name the `tags.name` column accepts.
pub const MAX_TAG_NAME_LEN: usize = 100;

/// Default and upper bound for `GET /tags/popular`.
pub const DEFAULT_POPULAR_LIMIT: u64 = 10;
pub const MAX_POPULAR_LIMIT: u64 = 100;

fn validate_tag_names(names: &[String]) -> Result<(), ValidationError> {
    for name in names {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            let mut err = ValidationError::new("blank_tag");
            err.message = Some("Tag names must not be blank".into());
            return Err(err);
        }
        if trimmed.chars().count() > MAX_TAG_NAME_LEN {
            let mut err = ValidationError::new("tag_too_long");
            err.message = Some(
                format!("Tag names are limited to {} characters", MAX_TAG_NAME_LEN).into(),
            );
            return Err(err);
        }
    }
    Ok(())
}

/// Trims names and drops repeats, keeping first-seen order.
pub fn normalize_tag_names<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let mut seen = Vec::with_capacity(names.len());
    for name in names {
        let name = name.as_ref().trim();
        if !name.is_empty() && !seen.iter().any(|s: &String| s == name) {
            seen.push(name.to_string());
        }
    }
    seen
}

/// A calendar event as returned by the API.
///
/// Tags are flattened to their names, sorted alphabetically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i32,
    pub title: String,
    /// Organiser of the event
    pub host: String,
    /// Contact e-mail address
    pub contact: Option<String>,
    pub summary: Option<String>,
    pub url: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub location: Option<String>,
    pub featured: bool,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEvent {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1))]
    pub host: String,
    #[validate(email)]
    pub contact: Option<String>,
    pub summary: Option<String>,
    #[validate(url)]
    pub url: Option<String>,
    /// RFC 3339 timestamp
    pub start: DateTime<Utc>,
    /// RFC 3339 timestamp, strictly after `start`
    pub end: DateTime<Utc>,
    pub location: Option<String>,
    #[serde(default)]
    pub featured: bool,
    /// Tag names; unknown names are created
    #[serde(default)]
    #[validate(custom(function = "validate_tag_names"))]
    pub tags: Vec<String>,
}

/// Partial update. Omitted fields are left alone.
///
/// `tags`, when present, replaces the whole tag set (`[]` clears it).
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEvent {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub host: Option<String>,
    #[validate(email)]
    pub contact: Option<String>,
    pub summary: Option<String>,
    #[validate(url)]
    pub url: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub featured: Option<bool>,
    #[validate(custom(function = "validate_tag_names"))]
    pub tags: Option<Vec<String>>,
}

/// Parses an RFC 3339 instant or a bare `YYYY-MM-DD` date (midnight UTC).
fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Some(instant.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

fn deserialize_instant<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    parse_instant(&raw).map(Some).ok_or_else(|| {
        serde::de::Error::custom(format!(
            "invalid date `{raw}`, expected RFC 3339 or YYYY-MM-DD"
        ))
    })
}

/// Filters for `GET /events`; every supplied field must match.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct EventFilter {
    /// Exact tag name
    pub tag: Option<String>,
    /// Substring of the host
    pub host: Option<String>,
    /// Events starting at or after this instant
    #[serde(default, deserialize_with = "deserialize_instant")]
    pub start_date: Option<DateTime<Utc>>,
    /// Events ending at or before this instant
    #[serde(default, deserialize_with = "deserialize_instant")]
    pub end_date: Option<DateTime<Utc>>,
    pub featured: Option<bool>,
}

impl EventFilter {
    pub fn matches(&self, event: &Event) -> bool {
        self.tag
            .as_ref()
            .is_none_or(|tag| event.tags.iter().any(|t| t == tag))
            && self
                .host
                .as_ref()
                .is_none_or(|host| event.host.contains(host.as_str()))
            && self.start_date.is_none_or(|from| event.start >= from)
            && self.end_date.is_none_or(|until| event.end <= until)
            && self.featured.is_none_or(|featured| event.featured == featured)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Tag {
    pub id: i32,
    pub name: String,
}

/// A tag with the number of events carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PopularTag {
    pub id: i32,
    pub name: String,
    pub event_count: i64,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PopularTagsQuery {
    /// How many tags to return (1-100, default 10)
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeleteEventResponse {
    #[schema(example = "Event deleted successfully")]
    pub message: String,
    pub id: i32,
}

impl DeleteEventResponse {
    pub fn new(id: i32) -> Self {
        Self {
            message: "Event deleted successfully".to_string(),
            id,
        }
    }
}

impl Event {
    /// Builds a stored event from a create request. Tags are normalised and sorted.
    pub fn new(id: i32, input: CreateEvent) -> Self {
        let now = Utc::now();
        let mut tags = normalize_tag_names(&input.tags);
        tags.sort();

        Self {
            id,
            title: input.title,
            host: input.host,
            contact: input.contact,
            summary: input.summary,
            url: input.url,
            start: input.start,
            end: input.end,
            location: input.location,
            featured: input.featured,
            tags,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies the supplied fields and bumps `updated_at`.
    pub fn apply_update(&mut self, update: UpdateEvent) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(host) = update.host {
            self.host = host;
        }
        if let Some(contact) = update.contact {
            self.contact = Some(contact);
        }
        if let Some(summary) = update.summary {
            self.summary = Some(summary);
        }
        if let Some(url) = update.url {
            self.url = Some(url);
        }
        if let Some(start) = update.start {
            self.start = start;
        }
        if let Some(end) = update.end {
            self.end = end;
        }
        if let Some(location) = update.location {
            self.location = Some(location);
        }
        if let Some(featured) = update.featured {
            self.featured = featured;
        }
        if let Some(tags) = update.tags {
            self.tags = normalize_tag_names(&tags);
            self.tags.sort();
        }
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 12, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_instant_accepts_rfc3339_and_bare_dates() {
        assert_eq!(parse_instant("2025-12-01T09:00:00Z"), Some(at(1, 9)));
        assert_eq!(parse_instant("2025-12-01T10:00:00+01:00"), Some(at(1, 9)));
        assert_eq!(parse_instant("2025-12-01"), Some(at(1, 0)));
        assert_eq!(parse_instant("2025-13-01"), None);
        assert_eq!(parse_instant("yesterday"), None);
    }

    #[test]
    fn test_filter_deserializes_date_only_values() {
        let filter: EventFilter =
            serde_json::from_value(serde_json::json!({ "startDate": "2025-12-02" })).unwrap();

        assert_eq!(filter.start_date, Some(at(2, 0)));
        assert!(filter.end_date.is_none());
        let bad = serde_json::from_value::<EventFilter>(serde_json::json!({ "endDate": "soon" }));
        assert!(bad.is_err());
    }

    fn create(tags: &[&str]) -> CreateEvent {
        CreateEvent {
            title: "Rust meetup".to_string(),
            host: "Stanford CS".to_string(),
            contact: Some("events@stanford.edu".to_string()),
            summary: None,
            url: Some("https://example.com/rust".to_string()),
            start: at(1, 18),
            end: at(1, 20),
            location: Some("Gates 104".to_string()),
            featured: false,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_normalize_tag_names_dedups_in_order() {
        let names = normalize_tag_names(&["students", " rust ", "students", "rust", ""]);
        assert_eq!(names, vec!["students", "rust"]);
    }

    #[test]
    fn test_create_event_validation() {
        assert!(create(&["students"]).validate().is_ok());

        let mut bad = create(&[]);
        bad.title = String::new();
        assert!(bad.validate().is_err());

        let mut bad = create(&[]);
        bad.contact = Some("not-an-email".to_string());
        let errors = bad.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("contact"));

        let mut bad = create(&[]);
        bad.url = Some("not a url".to_string());
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_blank_tag_names_are_rejected() {
        let errors = create(&["ok", "   "]).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("tags"));

        let update = UpdateEvent {
            tags: Some(vec![String::new()]),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_create_event_deserializes_camel_case_with_defaults() {
        let input: CreateEvent = serde_json::from_value(serde_json::json!({
            "title": "Demo day",
            "host": "Lab",
            "start": "2025-12-01T09:00:00Z",
            "end": "2025-12-01T11:00:00Z"
        }))
        .unwrap();

        assert!(!input.featured);
        assert!(input.tags.is_empty());
        assert_eq!(input.start, at(1, 9));
    }

    #[test]
    fn test_event_serializes_camel_case() {
        let event = Event::new(7, create(&["students", "ai"]));
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["id"], 7);
        assert_eq!(value["tags"], serde_json::json!(["ai", "students"]));
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
    }

    #[test]
    fn test_apply_update_only_touches_supplied_fields() {
        let mut event = Event::new(1, create(&["students"]));
        let created = event.updated_at;

        event.apply_update(UpdateEvent {
            title: Some("Rust meetup #2".to_string()),
            ..Default::default()
        });

        assert_eq!(event.title, "Rust meetup #2");
        assert_eq!(event.host, "Stanford CS");
        assert_eq!(event.tags, vec!["students"]);
        assert!(event.updated_at >= created);

        event.apply_update(UpdateEvent {
            tags: Some(vec![]),
            ..Default::default()
        });
        assert!(event.tags.is_empty());
    }

    #[test]
    fn test_filter_matches_conjunction() {
        let mut event = Event::new(1, create(&["students"]));
        event.featured = true;

        assert!(EventFilter::default().matches(&event));
        assert!(
            EventFilter {
                tag: Some("students".to_string()),
                host: Some("Stanford".to_string()),
                featured: Some(true),
                ..Default::default()
            }
            .matches(&event)
        );
        assert!(
            !EventFilter {
                tag: Some("students".to_string()),
                host: Some("stanford".to_string()),
                ..Default::default()
            }
            .matches(&event)
        );
        assert!(
            !EventFilter {
                start_date: Some(at(2, 0)),
                ..Default::default()
            }
            .matches(&event)
        );
        assert!(
            EventFilter {
                end_date: Some(at(1, 20)),
                ..Default::default()
            }
            .matches(&event)
        );
    }

    #[test]
    fn test_popular_limit_range() {
        assert!(PopularTagsQuery { limit: None }.validate().is_ok());
        assert!(PopularTagsQuery { limit: Some(100) }.validate().is_ok());
        assert!(PopularTagsQuery { limit: Some(0) }.validate().is_err());
        assert!(PopularTagsQuery { limit: Some(101) }.validate().is_err());
    }

    #[test]
    fn test_filter_from_query_string() {
        let filter: EventFilter = serde_json::from_value(serde_json::json!({
            "tag": "students",
            "startDate": "2025-12-01T00:00:00Z",
            "featured": true
        }))
        .unwrap();

        assert_eq!(filter.tag.as_deref(), Some("students"));
        assert_eq!(filter.start_date, Some(at(1, 0)));
        assert_eq!(filter.featured, Some(true));
    }
}
