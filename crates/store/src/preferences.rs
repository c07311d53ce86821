use eyre::Result;

use crate::{KeyValueStore, keys};

/// What the login screen remembers between launches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginPreferences {
    pub remember_me: bool,
    pub username: Option<String>,
}

pub async fn load_login_preferences(store: &dyn KeyValueStore) -> Result<LoginPreferences> {
    let remember_me = store
        .get(keys::REMEMBER_ME)
        .await?
        .is_some_and(|v| v.trim() == "true");

    let username = if remember_me {
        store
            .get(keys::REMEMBERED_USERNAME)
            .await?
            .filter(|u| !u.trim().is_empty())
    } else {
        None
    };

    Ok(LoginPreferences {
        remember_me,
        username,
    })
}

/// Persists the preferences. Turning "remember me" off forgets the username.
pub async fn save_login_preferences(
    store: &dyn KeyValueStore,
    prefs: &LoginPreferences,
) -> Result<()> {
    match (&prefs.username, prefs.remember_me) {
        (Some(username), true) => {
            store.set(keys::REMEMBER_ME, "true").await?;
            store.set(keys::REMEMBERED_USERNAME, username.trim()).await?;
        }
        _ => {
            store.remove(keys::REMEMBER_ME).await?;
            store.remove(keys::REMEMBERED_USERNAME).await?;
        }
    }
    Ok(())
}

pub async fn save_session(store: &dyn KeyValueStore, token: &str) -> Result<()> {
    store.set(keys::SESSION, token).await
}

pub async fn load_session(store: &dyn KeyValueStore) -> Result<Option<String>> {
    store.get(keys::SESSION).await
}

pub async fn clear_session(store: &dyn KeyValueStore) -> Result<()> {
    store.remove(keys::SESSION).await
}
