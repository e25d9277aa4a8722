// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Side tables relating containers, presented views, and presentations.
//!
//! Presentations never store back references into the view tree, and views
//! never point at their presentation. A host that needs either direction
//! keeps a [`PresentationRegistry`]:
//!
//! - container → presentations shown in it, in presentation order;
//! - presented view → owning presentation.
//!
//! Keys are the host's copyable view handles; presentation ids are whatever
//! the host uses to find its controllers (an index, a slot key, …).

use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::HashMap;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug)]
struct Entry<V> {
    container: V,
    view: V,
}

/// Container and ownership lookups for presented views.
#[derive(Clone)]
pub struct PresentationRegistry<V, P> {
    by_container: HashMap<V, SmallVec<[P; 2]>>,
    owners: HashMap<V, P>,
    entries: HashMap<P, Entry<V>>,
}

impl<V, P> Debug for PresentationRegistry<V, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PresentationRegistry")
            .field("containers", &self.by_container.len())
            .field("presentations", &self.entries.len())
            .finish_non_exhaustive()
    }
}

impl<V, P> Default for PresentationRegistry<V, P> {
    fn default() -> Self {
        Self {
            by_container: HashMap::new(),
            owners: HashMap::new(),
            entries: HashMap::new(),
        }
    }
}

impl<V, P> PresentationRegistry<V, P>
where
    V: Copy + Eq + Hash,
    P: Copy + Eq + Hash,
{
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `presentation` shows `view` inside `container`.
    ///
    /// Re-registering a presentation moves it to the new container and
    /// makes it the topmost presentation there.
    pub fn register(&mut self, presentation: P, container: V, view: V) {
        self.unregister(presentation);
        self.by_container.entry(container).or_default().push(presentation);
        self.owners.insert(view, presentation);
        self.entries.insert(presentation, Entry { container, view });
    }

    /// Forget `presentation`. Returns `false` if it was not registered.
    pub fn unregister(&mut self, presentation: P) -> bool {
        let Some(entry) = self.entries.remove(&presentation) else {
            return false;
        };
        if let Some(list) = self.by_container.get_mut(&entry.container) {
            list.retain(|p| *p != presentation);
            if list.is_empty() {
                self.by_container.remove(&entry.container);
            }
        }
        if self.owners.get(&entry.view) == Some(&presentation) {
            self.owners.remove(&entry.view);
        }
        true
    }

    /// Presentations shown in `container`, oldest first.
    pub fn presentations_in(&self, container: V) -> &[P] {
        self.by_container
            .get(&container)
            .map(|list| list.as_slice())
            .unwrap_or(&[])
    }

    /// The most recently registered presentation in `container`.
    pub fn topmost(&self, container: V) -> Option<P> {
        self.presentations_in(container).last().copied()
    }

    /// The presentation that owns `view`.
    pub fn owner_of(&self, view: V) -> Option<P> {
        self.owners.get(&view).copied()
    }

    /// The container `presentation` is shown in.
    pub fn container_of(&self, presentation: P) -> Option<V> {
        self.entries.get(&presentation).map(|e| e.container)
    }

    /// Number of registered presentations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
