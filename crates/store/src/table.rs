//! Versioned in-memory table shared by the repository implementations.

use std::collections::HashMap;
use std::sync::Arc;

use common::Version;
use domain::Entity;
use tokio::sync::RwLock;

use crate::{Result, StoreError};

struct Row<E> {
    /// Insertion sequence, used to list rows in a stable order.
    seq: u64,
    entity: E,
}

struct TableState<E: Entity> {
    rows: HashMap<E::Id, Row<E>>,
    next_seq: u64,
}

/// A thread-safe map of entities keyed by id with optimistic version checks.
///
/// Cloning a table shares the underlying storage.
pub(crate) struct Table<E: Entity> {
    state: Arc<RwLock<TableState<E>>>,
}

impl<E: Entity> Clone for Table<E> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<E: Entity> Default for Table<E> {
    fn default() -> Self {
        Self {
            state: Arc::new(RwLock::new(TableState {
                rows: HashMap::new(),
                next_seq: 0,
            })),
        }
    }
}

impl<E: Entity> Table<E> {
    /// Stores `entity` if its version matches the stored one and returns it
    /// with the bumped version.
    ///
    /// An entity that was never stored must carry the initial version.
    pub(crate) async fn save(&self, mut entity: E) -> Result<E> {
        let mut state = self.state.write().await;
        let id = entity.id();

        let (current, seq) = match state.rows.get(&id) {
            Some(row) => (row.entity.version(), row.seq),
            None => (Version::initial(), state.next_seq),
        };

        if entity.version() != current {
            metrics::counter!("store_conflicts_total", "entity" => E::kind()).increment(1);
            tracing::warn!(
                entity = E::kind(),
                %id,
                expected = %entity.version(),
                actual = %current,
                "rejected stale save"
            );
            return Err(StoreError::ConcurrencyConflict {
                entity: E::kind(),
                id: id.to_string(),
                expected: entity.version(),
                actual: current,
            });
        }

        if seq == state.next_seq {
            state.next_seq += 1;
        }
        entity.set_version(current.next());
        state.rows.insert(
            id,
            Row {
                seq,
                entity: entity.clone(),
            },
        );
        tracing::debug!(entity = E::kind(), %id, version = %entity.version(), "saved");
        Ok(entity)
    }

    pub(crate) async fn get(&self, id: E::Id) -> Option<E> {
        self.state
            .read()
            .await
            .rows
            .get(&id)
            .map(|row| row.entity.clone())
    }

    /// First entity, in insertion order, matching `predicate`.
    pub(crate) async fn find(&self, predicate: impl Fn(&E) -> bool) -> Option<E> {
        self.filter(predicate).await.into_iter().next()
    }

    /// Every entity matching `predicate`, in insertion order.
    pub(crate) async fn filter(&self, predicate: impl Fn(&E) -> bool) -> Vec<E> {
        let state = self.state.read().await;
        let mut rows: Vec<&Row<E>> = state
            .rows
            .values()
            .filter(|row| predicate(&row.entity))
            .collect();
        rows.sort_by_key(|row| row.seq);
        rows.into_iter().map(|row| row.entity.clone()).collect()
    }

    pub(crate) async fn all(&self) -> Vec<E> {
        self.filter(|_| true).await
    }

    pub(crate) async fn any(&self, predicate: impl Fn(&E) -> bool) -> bool {
        self.state
            .read()
            .await
            .rows
            .values()
            .any(|row| predicate(&row.entity))
    }

    pub(crate) async fn count(&self, predicate: impl Fn(&E) -> bool) -> usize {
        self.state
            .read()
            .await
            .rows
            .values()
            .filter(|row| predicate(&row.entity))
            .count()
    }

    /// Removes the entity; returns false if it was not stored.
    pub(crate) async fn remove(&self, id: E::Id) -> bool {
        self.state.write().await.rows.remove(&id).is_some()
    }
}
