use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use errors::ReportError;
use trello_models::Card;

/// Trello ids embed their creation instant: the first 8 hex characters are
/// the Unix timestamp in seconds, the same scheme MongoDB ObjectIds use.
pub fn decode_id_timestamp(id: &str) -> Result<DateTime<Utc>, ReportError> {
    let prefix = id
        .get(..8)
        .ok_or_else(|| ReportError::MalformedIdentifier(id.to_string()))?;
    let seconds = u32::from_str_radix(prefix, 16)
        .map_err(|_| ReportError::MalformedIdentifier(id.to_string()))?;
    DateTime::from_timestamp(i64::from(seconds), 0)
        .ok_or_else(|| ReportError::MalformedIdentifier(id.to_string()))
}

/// Stamps every card with its age relative to `now`. A single malformed id
/// fails the whole batch; a mis-dated card would silently skew the sort order.
pub fn attach_age(cards: Vec<Card>, now: DateTime<Utc>) -> Result<Vec<Card>, ReportError> {
    cards
        .into_iter()
        .map(|mut card| {
            let created = decode_id_timestamp(&card.id)?;
            card.age = Some(now - created);
            Ok(card)
        })
        .collect()
}

/// Groups cards by their raw `idList`, keeping the order cards arrive in.
/// Callers sort by age first if the output ordering should reflect it.
pub fn bucket_by_list(cards: Vec<Card>) -> HashMap<String, Vec<Card>> {
    let mut buckets: HashMap<String, Vec<Card>> = HashMap::new();
    for card in cards {
        buckets.entry(card.id_list.clone()).or_default().push(card);
    }
    buckets
}

/// Re-keys the buckets from list ids to list names. A missing id is a hard
/// failure rather than a dropped bucket, which would hide cards entirely.
pub fn resolve_names(
    buckets: HashMap<String, Vec<Card>>,
    names: &HashMap<String, String>,
) -> Result<HashMap<String, Vec<Card>>, ReportError> {
    buckets
        .into_iter()
        .map(|(id, cards)| {
            let name = names
                .get(&id)
                .ok_or_else(|| ReportError::UnknownListId(id.clone()))?;
            Ok((name.clone(), cards))
        })
        .collect()
}

pub fn format_age(age: Duration) -> String {
    format!("{}d {:02}h", age.num_days(), age.num_hours() % 24)
}
