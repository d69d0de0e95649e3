use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::player::Player;

/// Maps a host-chosen integer id to a [`Player`].
///
/// Lookup-or-create and removal are atomic with respect to concurrent
/// callers; each player is handed out behind its own mutex, so per-id
/// `play`/`dispose` serialization never contends with unrelated ids.
#[derive(Default)]
pub struct PlayerRegistry {
    players: Mutex<HashMap<i32, Arc<Mutex<Player>>>>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the player for `id`, constructing it on first access.
    ///
    /// Concurrent calls with the same unseen id construct exactly one
    /// player; every caller gets a handle to the same instance.
    pub fn get(&self, id: i32, init_args: &[String]) -> Arc<Mutex<Player>> {
        let mut players = self
            .players
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            players
                .entry(id)
                .or_insert_with(|| Arc::new(Mutex::new(Player::new(init_args)))),
        )
    }

    /// Remove and release the player for `id`; a no-op for unknown ids.
    ///
    /// The pipeline teardown runs after the registry lock is dropped, so a
    /// slow teardown never blocks callers working with other ids.
    pub fn dispose(&self, id: i32) {
        let removed = self
            .players
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
        if let Some(player) = removed {
            player
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .detach_and_release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concurrent_get_constructs_one_instance() {
        let registry = Arc::new(PlayerRegistry::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.get(7, &[]))
            })
            .collect();

        let players: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for player in &players[1..] {
            assert!(Arc::ptr_eq(&players[0], player));
        }
    }

    #[test]
    fn get_returns_same_instance_until_disposed() {
        let registry = PlayerRegistry::new();

        let first = registry.get(1, &[]);
        assert!(Arc::ptr_eq(&first, &registry.get(1, &[])));

        registry.dispose(1);
        assert!(!Arc::ptr_eq(&first, &registry.get(1, &[])));
    }

    #[test]
    fn dispose_of_unknown_id_is_a_no_op() {
        let registry = PlayerRegistry::new();
        registry.dispose(42);
    }

    #[test]
    fn ids_are_independent() {
        let registry = PlayerRegistry::new();
        assert!(!Arc::ptr_eq(&registry.get(1, &[]), &registry.get(2, &[])));
    }
}
