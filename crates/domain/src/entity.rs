//! Core entity and status-machine traits.

use std::fmt::Display;
use std::hash::Hash;

use common::Version;

use crate::error::{DomainError, Result};

/// A persisted domain entity.
///
/// Entities are plain data-plus-behaviour objects. Repositories use the
/// version to detect concurrent writers: a save carrying a version other than
/// the stored one is rejected.
pub trait Entity: Clone + Send + Sync {
    /// Identifier type of this entity.
    type Id: Copy + Eq + Hash + Display + Send + Sync;

    /// Human-readable entity kind, used in error messages.
    fn kind() -> &'static str;

    /// Returns the entity's identifier.
    fn id(&self) -> Self::Id;

    /// Returns the version the entity was loaded at.
    fn version(&self) -> Version;

    /// Sets the version. Called by repositories after a successful save.
    fn set_version(&mut self, version: Version);
}

/// A status enum driven by a fixed transition table.
///
/// Implementors only list their states and the allowed next states of each;
/// validation, terminal detection and error construction are derived from
/// that table so it can be enumerated exhaustively in tests.
pub trait StatusMachine: Copy + Eq + Display + Sized + 'static {
    /// Entity name used in transition errors.
    const ENTITY: &'static str;

    /// Every state.
    fn all() -> &'static [Self];

    /// States reachable from `self` in one step.
    fn allowed_next(self) -> &'static [Self];

    /// Returns true if `next` is reachable from `self` in one step.
    fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next().contains(&next)
    }

    /// Returns true if no transition leaves this state.
    fn is_terminal(self) -> bool {
        self.allowed_next().is_empty()
    }

    /// Checks a transition, returning `InvalidTransition` when it is not in the table.
    fn validate_transition(self, next: Self) -> Result<()> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(DomainError::InvalidTransition {
                entity: Self::ENTITY,
                from: self.to_string(),
                to: next.to_string(),
            })
        }
    }
}
