use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde_json::Value;

use errors::ReportError;
use trello_models::Action;

/// Placeholder for membership actions whose member id is missing from the
/// board roster. Rosters can lag the action feed, so this is not an error.
pub const UNKNOWN_MEMBER: &str = "unknown member";

/// A raw action narrowed down to one of the shapes the digest knows about.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub action_type: String,
    pub actor_name: String,
    pub occurred_at: DateTime<Utc>,
    pub card_name: String,
    pub kind: EventKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    Archive {
        /// True when the card went from open to closed, false for the reverse.
        archived: bool,
    },
    Move {
        list_before: String,
        list_after: String,
    },
    Membership {
        member_id: String,
        member_name: String,
        added: bool,
    },
}

impl Event {
    pub fn description(&self) -> String {
        match self.kind {
            EventKind::Archive { archived: true } => "Archived".to_string(),
            EventKind::Archive { archived: false } => "Unarchived".to_string(),
            EventKind::Move {
                ref list_before,
                ref list_after,
            } => format!("Moved from {} to {}", list_before, list_after),
            EventKind::Membership {
                ref member_id,
                added,
                ..
            } => format!(
                "{} member {}",
                if added { "Added" } else { "Removed" },
                member_id
            ),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} - {} - {} - {} - {}",
            self.action_type,
            self.actor_name,
            self.occurred_at,
            self.card_name,
            self.description()
        )
    }
}

fn nested_str<'a>(data: &'a Value, outer: &str, inner: &str) -> Option<&'a str> {
    data.get(outer).and_then(|v| v.get(inner)).and_then(Value::as_str)
}

/// Maps one raw action onto an `Event`. The rules are checked in order
/// because the `updateCard` tag alone is ambiguous: the payload decides
/// whether it is an archive toggle or a move between lists. Anything that
/// matches no rule is a hard error so that unhandled records can never
/// silently vanish from the totals.
pub fn classify(
    action: &Action,
    board_members: &HashMap<String, String>,
) -> Result<Event, ReportError> {
    let unsupported = || ReportError::UnsupportedActionType(action.action_type.clone());

    let card_name = nested_str(&action.data, "card", "name").ok_or_else(unsupported)?;

    let kind = if action.action_type == "updateCard"
        && action.data.get("old").map_or(false, |o| o.get("closed").is_some())
    {
        // "old" holds the previous value, so closed == false means the card
        // is transitioning into the archive.
        let was_closed = action.data["old"]["closed"].as_bool().unwrap_or(true);
        EventKind::Archive {
            archived: !was_closed,
        }
    } else if action.action_type == "updateCard" && action.data.get("listBefore").is_some() {
        let list_before = nested_str(&action.data, "listBefore", "name").ok_or_else(unsupported)?;
        let list_after = nested_str(&action.data, "listAfter", "name").ok_or_else(unsupported)?;
        EventKind::Move {
            list_before: list_before.to_string(),
            list_after: list_after.to_string(),
        }
    } else if action.action_type == "addMemberToCard"
        || action.action_type == "removeMemberFromCard"
    {
        let member_id = action
            .data
            .get("idMember")
            .and_then(Value::as_str)
            .ok_or_else(unsupported)?;
        let member_name = board_members
            .get(member_id)
            .cloned()
            .unwrap_or_else(|| UNKNOWN_MEMBER.to_string());
        EventKind::Membership {
            member_id: member_id.to_string(),
            member_name,
            added: action.action_type == "addMemberToCard",
        }
    } else {
        return Err(unsupported());
    };

    Ok(Event {
        action_type: action.action_type.clone(),
        actor_name: action.creator.full_name.clone(),
        occurred_at: action.date,
        card_name: card_name.to_string(),
        kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use trello_models::Member;

    fn action(action_type: &str, data: Value) -> Action {
        Action {
            data,
            date: "2020-07-24T10:30:00.000Z".parse().unwrap(),
            action_type: action_type.to_string(),
            creator: Member {
                id: "m1".to_string(),
                full_name: "Ada Lovelace".to_string(),
            },
        }
    }

    fn roster() -> HashMap<String, String> {
        vec![("m2".to_string(), "Grace Hopper".to_string())]
            .into_iter()
            .collect()
    }

    #[test]
    fn update_card_with_old_closed_is_an_archive_event() {
        let action = action(
            "updateCard",
            json!({"card": {"name": "Write report"}, "old": {"closed": false}}),
        );
        let event = classify(&action, &roster()).unwrap();
        assert_eq!(event.kind, EventKind::Archive { archived: true });
        assert_eq!(event.description(), "Archived");
        assert_eq!(event.card_name, "Write report");
        assert_eq!(event.actor_name, "Ada Lovelace");
    }

    #[test]
    fn old_closed_true_means_the_card_was_unarchived() {
        let action = action(
            "updateCard",
            json!({"card": {"name": "Write report"}, "old": {"closed": true}}),
        );
        let event = classify(&action, &roster()).unwrap();
        assert_eq!(event.kind, EventKind::Archive { archived: false });
        assert_eq!(event.description(), "Unarchived");
    }

    #[test]
    fn archive_rule_wins_over_move_rule_when_both_shapes_are_present() {
        let action = action(
            "updateCard",
            json!({
                "card": {"name": "Write report"},
                "old": {"closed": false},
                "listBefore": {"name": "Doing"},
                "listAfter": {"name": "Done"}
            }),
        );
        let event = classify(&action, &roster()).unwrap();
        assert_eq!(event.kind, EventKind::Archive { archived: true });
    }

    #[test]
    fn update_card_with_list_before_and_after_is_a_move_event() {
        let action = action(
            "updateCard",
            json!({
                "card": {"name": "Write report"},
                "listBefore": {"name": "Doing"},
                "listAfter": {"name": "Done"}
            }),
        );
        let event = classify(&action, &roster()).unwrap();
        assert_eq!(
            event.kind,
            EventKind::Move {
                list_before: "Doing".to_string(),
                list_after: "Done".to_string(),
            }
        );
        assert_eq!(event.description(), "Moved from Doing to Done");
    }

    #[test]
    fn member_actions_resolve_names_through_the_roster() {
        let added = action(
            "addMemberToCard",
            json!({"card": {"name": "Write report"}, "idMember": "m2"}),
        );
        let event = classify(&added, &roster()).unwrap();
        assert_eq!(
            event.kind,
            EventKind::Membership {
                member_id: "m2".to_string(),
                member_name: "Grace Hopper".to_string(),
                added: true,
            }
        );
        assert_eq!(event.description(), "Added member m2");

        let removed = action(
            "removeMemberFromCard",
            json!({"card": {"name": "Write report"}, "idMember": "m2"}),
        );
        let event = classify(&removed, &roster()).unwrap();
        assert_eq!(event.description(), "Removed member m2");
    }

    #[test]
    fn missing_roster_entries_fall_back_to_a_sentinel_name() {
        let action = action(
            "addMemberToCard",
            json!({"card": {"name": "Write report"}, "idMember": "m99"}),
        );
        let event = classify(&action, &roster()).unwrap();
        match event.kind {
            EventKind::Membership { ref member_name, .. } => {
                assert_eq!(member_name, UNKNOWN_MEMBER)
            }
            ref other => panic!("expected a membership event, got {:?}", other),
        }
    }

    #[test]
    fn unrecognised_tags_fail_with_the_offending_tag() {
        let action = action("createCard", json!({"card": {"name": "Write report"}}));
        assert_eq!(
            classify(&action, &roster()),
            Err(ReportError::UnsupportedActionType("createCard".to_string()))
        );
    }

    #[test]
    fn update_card_without_a_known_payload_shape_is_unsupported() {
        let action = action(
            "updateCard",
            json!({"card": {"name": "Write report"}, "old": {"desc": "x"}}),
        );
        assert_eq!(
            classify(&action, &roster()),
            Err(ReportError::UnsupportedActionType("updateCard".to_string()))
        );
    }

    #[test]
    fn display_renders_the_trace_line() {
        let action = action(
            "updateCard",
            json!({"card": {"name": "Write report"}, "old": {"closed": false}}),
        );
        let event = classify(&action, &roster()).unwrap();
        let line = format!("{}", event);
        assert!(line.starts_with("updateCard - Ada Lovelace - "));
        assert!(line.ends_with(" - Write report - Archived"));
    }
}
