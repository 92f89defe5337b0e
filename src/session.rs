use crate::entity::TradeIntent;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// One user's conversation state. `None` means the session is waiting for
/// an asset paste.
#[derive(Default)]
pub struct Session {
    pub intent: Option<TradeIntent>,
}

impl Session {
    /// Drops the current intent, returning the session to its empty state.
    pub fn clear(&mut self) {
        self.intent = None;
    }
}

/// Per-user session registry. Events for different users proceed
/// concurrently; events for the same user serialize on that user's lock,
/// which a handler holds for the whole event — including the span from
/// confirmation through execution, so a second "confirm" tap can never
/// start a duplicate swap.
#[derive(Default)]
pub struct SessionStore {
    inner: Mutex<HashMap<i64, Arc<AsyncMutex<Session>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires this user's session, creating it on first contact. The
    /// returned guard is owned so it can be held across await points.
    pub async fn lock(&self, user_id: i64) -> OwnedMutexGuard<Session> {
        let slot = {
            let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            map.entry(user_id)
                .or_insert_with(|| Arc::new(AsyncMutex::new(Session::default())))
                .clone()
        };

        slot.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn same_user_events_serialize() {
        let store = Arc::new(SessionStore::new());
        let counter = Arc::new(Mutex::new(0u32));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let store = store.clone();
            let counter = counter.clone();
            handles.push(tokio::spawn(async move {
                let _guard = store.lock(7).await;
                {
                    let mut c = counter.lock().unwrap();
                    *c += 1;
                    // Nobody else may enter while we hold the session.
                    assert_eq!(*c, 1);
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
                *counter.lock().unwrap() -= 1;
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }
    }

    #[tokio::test]
    async fn different_users_do_not_block_each_other() {
        let store = SessionStore::new();
        let _a = store.lock(1).await;
        // Would deadlock if user 2 shared user 1's lock.
        let _b = store.lock(2).await;
    }
}
