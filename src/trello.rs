use std::error::Error;

use chrono::{DateTime, Utc};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;

use trello_models::{Action, Card, List, Member};

const API_URL: &'static str = "https://api.trello.com/1";
const USER_AGENT: &'static str = "Mozilla/5.0 (Windows NT 5.1; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/46.0.2486.0 Safari/537.36 Edge/13.10586";

// The API caps a single response at 1000 records and we do not page.
const FETCH_LIMIT: usize = 1000;

// Only the action kinds the classifier understands are requested.
const ACTION_FILTER: &'static str =
    "updateCard:closed,updateCard:idList,addMemberToCard,removeMemberFromCard";

pub struct BoardHandler {
    http_url: String,
    http_token_parameters: String,
    http_client: Client,
}

impl BoardHandler {
    pub fn new(board_id: &str, trello_api_key: &str, trello_oauth_token: &str) -> BoardHandler {
        BoardHandler {
            http_url: format!("{}/boards/{}", API_URL, board_id),
            http_token_parameters: format!("key={}&token={}", trello_api_key, trello_oauth_token),
            http_client: Client::new(),
        }
    }

    fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, Box<dyn Error>> {
        let resp = self
            .http_client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .send()?;
        Ok(resp.json()?)
    }

    pub fn get_cards(&self) -> Result<Vec<Card>, Box<dyn Error>> {
        info!("Fetching cards ...");

        let url = format!(
            "{}/cards?limit={}&fields=id,name,idList,idMembers,dateLastActivity&{}",
            self.http_url, FETCH_LIMIT, self.http_token_parameters
        );
        let cards: Vec<Card> = self.get(&url)?;

        if cards.len() == FETCH_LIMIT {
            warn!(
                "Retrieved {} cards, the response may be truncated and paging is not supported.",
                FETCH_LIMIT
            );
        }

        Ok(cards)
    }

    pub fn get_lists(&self) -> Result<Vec<List>, Box<dyn Error>> {
        info!("Fetching lists ...");

        let url = format!(
            "{}/lists?fields=name&{}",
            self.http_url, self.http_token_parameters
        );
        self.get(&url)
    }

    pub fn get_members(&self) -> Result<Vec<Member>, Box<dyn Error>> {
        info!("Fetching board members ...");

        let url = format!(
            "{}/members?fields=fullName&{}",
            self.http_url, self.http_token_parameters
        );
        self.get(&url)
    }

    pub fn get_actions(&self, since: DateTime<Utc>) -> Result<Vec<Action>, Box<dyn Error>> {
        info!("Fetching actions since {} ...", since);

        let url = format!(
            "{}/actions?limit={}&filter={}&since={}&{}",
            self.http_url,
            FETCH_LIMIT,
            ACTION_FILTER,
            since.format("%Y-%m-%dT%H:%M:%SZ"),
            self.http_token_parameters
        );
        let actions: Vec<Action> = self.get(&url)?;

        info!("Found {} actions in the window.", actions.len());

        if actions.len() == FETCH_LIMIT {
            warn!(
                "Retrieved {} actions, you may be missing older actions from the window, paging is not supported.",
                FETCH_LIMIT
            );
        }

        Ok(actions)
    }
}
