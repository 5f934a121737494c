//! Cosmetic identity for anonymous commenters.
//!
//! Every comment gets a nickname and an avatar URL. Generation never fails:
//! remote name services are optional and anything that goes wrong there
//! falls back to a local name.

use std::time::Duration;

use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;

const NAMES: &[&str] = &[
    "Alex", "Sam", "Taylor", "Jordan", "Casey", "Morgan", "Jamie", "Riley", "Drew", "Skyler", "Chris", "Pat", "Robin", "Lee",
    "Jessie", "Avery", "Charlie", "Harper", "Quinn", "Reese", "Blake", "Cameron", "Dakota", "Emerson", "Finley", "Hayden",
    "Jules", "Kendall", "Logan", "Mason", "Parker", "Reagan", "Sawyer", "Terry", "Val", "Wynn", "Zane", "Hunter", "Phoenix",
    "River", "Sage", "Sterling",
];

const ANIMALS: &[&str] = &[
    "Fox", "Bear", "Wolf", "Tiger", "Lion", "Panda", "Koala", "Otter", "Squirrel", "Hedgehog", "Rabbit", "Raccoon", "Dolphin",
    "Parrot", "Penguin", "Giraffe", "Zebra", "Kangaroo", "Cat", "Dog",
];

const DICEBEAR_STYLES: &[&str] = &["adventurer", "bottts", "micah", "fun-emoji", "notionists", "avataaars"];

const RANDOM_USER_BASE: &str = "https://randomuser.me";
const FAKER_BASE: &str = "https://fakerapi.it";
const REMOTE_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Profile {
    pub nickname: String,
    pub avatar: String,
}

#[derive(Clone, Debug)]
struct NameServices {
    client: reqwest::Client,
    random_user: String,
    faker: String,
}

/// Produces nickname/avatar pairs, optionally consulting public name services.
#[derive(Clone, Debug)]
pub struct ProfileGenerator {
    remote: Option<NameServices>,
}

impl ProfileGenerator {
    pub fn local() -> Self {
        Self { remote: None }
    }

    pub fn remote() -> Result<Self, reqwest::Error> {
        Self::remote_with(RANDOM_USER_BASE, FAKER_BASE)
    }

    /// Remote lookups against the given randomuser and fakerapi base URLs.
    pub fn remote_with(random_user: &str, faker: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(REMOTE_TIMEOUT).build()?;
        let services = NameServices {
            client,
            random_user: random_user.trim_end_matches('/').to_string(),
            faker: faker.trim_end_matches('/').to_string(),
        };
        Ok(Self { remote: Some(services) })
    }

    pub fn is_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub async fn generate(&self, now_ms: u64) -> Profile {
        match &self.remote {
            None => local_profile(now_ms),
            Some(services) => {
                let nickname = match remote_nickname(services).await {
                    Some(name) => name,
                    None => {
                        warn!("name services unavailable, using fallback nickname");
                        format!("Anonymous{}", rand::thread_rng().gen_range(0..10_000))
                    }
                };
                let avatar = remote_avatar(&avatar_seed(&nickname, now_ms));
                Profile { nickname, avatar }
            }
        }
    }
}

impl Default for ProfileGenerator {
    fn default() -> Self {
        Self::local()
    }
}

/// "<Name> <Animal>" with a DiceBear avatar.
pub fn local_profile(now_ms: u64) -> Profile {
    let mut rng = rand::thread_rng();
    let name = NAMES.choose(&mut rng).copied().unwrap_or("River");
    let animal = ANIMALS.choose(&mut rng).copied().unwrap_or("Otter");
    let nickname = format!("{name} {animal}");
    let style = DICEBEAR_STYLES.choose(&mut rng).copied().unwrap_or("adventurer");
    let avatar = format!("https://api.dicebear.com/7.x/{style}/svg?seed={}", avatar_seed(&nickname, now_ms));
    Profile { nickname, avatar }
}

/// URL-safe seed: slugged nickname, timestamp and a random suffix.
fn avatar_seed(nickname: &str, now_ms: u64) -> String {
    let slug: String =
        nickname.chars().map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' }).collect();
    let suffix: String =
        rand::thread_rng().sample_iter(rand::distributions::Alphanumeric).take(6).map(char::from).collect::<String>().to_lowercase();
    format!("{slug}-{now_ms}-{suffix}")
}

fn remote_avatar(seed: &str) -> String {
    let mut rng = rand::thread_rng();
    match rng.gen_range(0..5) {
        0 => format!("https://api.dicebear.com/7.x/adventurer/svg?seed={seed}"),
        1 => format!("https://api.dicebear.com/7.x/bottts/svg?seed={seed}"),
        2 => format!("https://api.dicebear.com/7.x/pixel-art/svg?seed={seed}"),
        3 => format!("https://api.multiavatar.com/{seed}.svg"),
        _ => format!("https://robohash.org/{seed}?set=set{}", rng.gen_range(1..=3)),
    }
}

#[derive(Deserialize)]
struct RandomUserResponse {
    results: Vec<RandomUser>,
}

#[derive(Deserialize)]
struct RandomUser {
    name: RandomUserName,
}

#[derive(Deserialize)]
struct RandomUserName {
    first: String,
}

#[derive(Deserialize)]
struct FakerResponse {
    data: Vec<FakerPerson>,
}

#[derive(Deserialize)]
struct FakerPerson {
    firstname: String,
}

async fn remote_nickname(services: &NameServices) -> Option<String> {
    let NameServices { client, random_user, faker } = services;
    let seed = rand::thread_rng().gen::<u32>();
    let url = format!("{random_user}/api/?inc=name&noinfo&nat=us&results=1&seed={seed:x}");
    match fetch_json::<RandomUserResponse>(client, &url).await {
        Ok(resp) => {
            if let Some(user) = resp.results.into_iter().next().filter(|u| !u.name.first.is_empty()) {
                return Some(user.name.first);
            }
        }
        Err(e) => debug!("randomuser lookup failed: {e}"),
    }
    let url = format!("{faker}/api/v1/persons?_quantity=1&_seed={seed}");
    match fetch_json::<FakerResponse>(client, &url).await {
        Ok(resp) => resp.data.into_iter().map(|p| p.firstname).find(|name| !name.is_empty()),
        Err(e) => {
            debug!("fakerapi lookup failed: {e}");
            None
        }
    }
}

async fn fetch_json<T: serde::de::DeserializeOwned>(client: &reqwest::Client, url: &str) -> Result<T, reqwest::Error> {
    client.get(url).send().await?.error_for_status()?.json::<T>().await
}
