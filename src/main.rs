#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;
extern crate chrono;
extern crate env_logger;
extern crate reqwest;
extern crate serde;
extern crate serde_json;
extern crate thiserror;

mod cards;
mod errors;
mod events;
mod report;
mod trello;
mod trello_models;

use std::collections::HashMap;
use std::env;
use std::error::Error;

use chrono::{DateTime, Duration, Utc};

use trello::BoardHandler;

fn main() {
    env_logger::init();

    // Get all environment variables
    let trello_api_key = env::var("TRELLO_API_KEY").expect("Trello API key not found");
    let trello_oauth_token = env::var("TRELLO_OAUTH_TOKEN").expect("Trello OAuth token not found");
    let trello_board_id = env::var("TRELLO_BOARD_ID").expect("Trello board ID not found");
    let window_days: i64 = env::var("REPORT_WINDOW_DAYS")
        .ok()
        .map(|days| days.parse().expect("REPORT_WINDOW_DAYS must be a number"))
        .unwrap_or(7);

    let handler = BoardHandler::new(&trello_board_id, &trello_api_key, &trello_oauth_token);
    run(&handler, Utc::now(), window_days).expect("Failed to build the weekly digest");
}

fn run(handler: &BoardHandler, now: DateTime<Utc>, window_days: i64) -> Result<(), Box<dyn Error>> {
    let since = now - Duration::days(window_days);
    println!("Since {}", since);

    // Card inventory: age every card, sort oldest-first, group by list name.
    let cards = handler.get_cards()?;
    let mut cards = cards::attach_age(cards, now)?;
    cards.sort_by_key(|card| card.age);

    let lists = handler.get_lists()?;
    let list_names: HashMap<String, String> = lists.into_iter().map(|l| (l.id, l.name)).collect();
    let buckets = cards::resolve_names(cards::bucket_by_list(cards), &list_names)?;

    for (list_name, cards) in &buckets {
        for card in cards {
            debug!("Card {} was last active {}.", card.name, card.date_last_activity);
            let age = card.age.unwrap_or_else(Duration::zero);
            println!(
                "{}, {}, {}, {}",
                list_name,
                card.name,
                cards::format_age(age),
                card.id_members.join(" ")
            );
        }
    }
    println!("---");

    // The roster must be complete before any membership action is classified.
    let members = handler.get_members()?;
    let board_members: HashMap<String, String> =
        members.into_iter().map(|m| (m.id, m.full_name)).collect();

    let actions = handler.get_actions(since)?;
    let events = actions
        .iter()
        .map(|action| events::classify(action, &board_members))
        .collect::<Result<Vec<_>, _>>()?;

    for section in report::summarize(&events) {
        println!("# {}", section.label);
        for line in &section.lines {
            println!("{}", line);
        }
        println!("---");
    }

    for event in &events {
        println!("{}", event);
    }

    Ok(())
}
