// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Clone-able handle serialising access to one checker.

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::checker::CollisionChecker;
use crate::config::CheckerConfig;
use crate::error::CollisionError;
use crate::world::WorldView;

/// A [`CollisionChecker`] behind a single lock.
///
/// Mutations and queries both hold the lock for their whole duration, so a
/// traversal never observes a half-finished repair. A poisoned lock is
/// recovered; [`Self::audit`] reports any damage left behind.
#[derive(Debug)]
pub struct SharedCollisionChecker<O> {
    inner: Arc<Mutex<CollisionChecker<O>>>,
}

impl<O> Clone for SharedCollisionChecker<O> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<O> SharedCollisionChecker<O>
where
    O: Copy + Eq + Hash + Debug,
{
    /// Wraps a new checker.
    pub fn new(config: CheckerConfig) -> Result<Self, CollisionError> {
        Ok(Self::from_checker(CollisionChecker::new(config)?))
    }

    /// Wraps an existing checker.
    pub fn from_checker(checker: CollisionChecker<O>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(checker)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CollisionChecker<O>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// See [`CollisionChecker::add_object`].
    pub fn add_object<W>(&self, world: &W, obj: O) -> Result<bool, CollisionError>
    where
        W: WorldView<Object = O> + ?Sized,
    {
        self.lock().add_object(world, obj)
    }

    /// See [`CollisionChecker::remove_object`].
    pub fn remove_object(&self, obj: O) -> Result<(), CollisionError> {
        self.lock().remove_object(obj)
    }

    /// See [`CollisionChecker::update_object_location`].
    pub fn update_object_location<W>(
        &self,
        world: &W,
        obj: O,
        old_x: i32,
        old_y: i32,
    ) -> Result<(), CollisionError>
    where
        W: WorldView<Object = O> + ?Sized,
    {
        self.lock().update_object_location(world, obj, old_x, old_y)
    }

    /// See [`CollisionChecker::update_object_size`].
    pub fn update_object_size<W>(&self, world: &W, obj: O) -> Result<(), CollisionError>
    where
        W: WorldView<Object = O> + ?Sized,
    {
        self.lock().update_object_size(world, obj)
    }

    /// Runs `f` against the checker under the lock; use for any query.
    pub fn read<R>(&self, f: impl FnOnce(&CollisionChecker<O>) -> R) -> R {
        f(&self.lock())
    }

    /// Number of tracked objects.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// `true` when nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// See [`CollisionChecker::audit`].
    pub fn audit(&self) -> Result<(), CollisionError> {
        self.lock().audit()
    }
}
