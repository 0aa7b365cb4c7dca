use log::{error, warn};
use web_sys::{window, Storage};
use yew::prelude::*;

use crate::profile::models::User;

const USER_KEY: &str = "user";

/// Who is signed in, shared through a context from `App`.
#[derive(Clone, PartialEq)]
pub struct Session {
    pub user: Option<User>,
    pub set_user: Callback<Option<User>>,
}

fn local_storage() -> Option<Storage> {
    window().and_then(|w| w.local_storage().ok()).flatten()
}

fn decode_user(raw: &str) -> Option<User> {
    match serde_json::from_str::<User>(raw) {
        Ok(user) => Some(user),
        Err(e) => {
            warn!("Discarding stored user: {}", e);
            None
        }
    }
}

pub fn load_user() -> Option<User> {
    let storage = local_storage()?;
    let raw = storage.get_item(USER_KEY).ok().flatten()?;
    let user = decode_user(&raw);
    if user.is_none() {
        let _ = storage.remove_item(USER_KEY);
    }
    user
}

pub fn store_user(user: Option<&User>) {
    let Some(storage) = local_storage() else {
        return;
    };
    match user {
        Some(user) => match serde_json::to_string(user) {
            Ok(raw) => {
                if storage.set_item(USER_KEY, &raw).is_err() {
                    error!("Failed to persist user {}", user.email);
                }
            }
            Err(e) => error!("Failed to encode user {}: {}", user.email, e),
        },
        None => {
            let _ = storage.remove_item(USER_KEY);
        }
    }
}
