use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub name: String,
    pub id_list: String,
    pub id_members: Vec<String>,
    pub date_last_activity: DateTime<Utc>,
    /// Derived from the id's embedded creation timestamp, never sent by the API.
    #[serde(skip)]
    pub age: Option<Duration>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub full_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct List {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Action {
    pub data: Value,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(rename = "memberCreator")]
    pub creator: Member,
}
