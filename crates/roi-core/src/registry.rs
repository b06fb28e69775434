//! Keyed, insertion-ordered collection of finished curves.
//!
//! Iteration order is draw order: the last curve is drawn on top and wins
//! hit tests. Replacing a curve under an existing key promotes it to the
//! end, so a curve that was just dragged stays "most recent".
//!
//! At most one curve is under construction at a time. It lives in its own
//! slot and only enters the ordered map when construction finishes.
//!
//! Every mutating call reports to the injected [`RegistryObserver`]:
//! [`Notification::RedrawRequested`] always, and
//! [`Notification::CountChanged`] when the number of finished curves moves.

use crate::error::RegistryError;
use crate::id::CurveKey;
use crate::model::{Curve, CurveKind, Modifiers};
use indexmap::IndexMap;
use kurbo::Point;
use std::fmt;

// ─── Observer ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    RedrawRequested,
    CountChanged { old: usize, new: usize },
}

/// Receives mutation notifications from a [`CurveRegistry`].
pub trait RegistryObserver {
    fn notify(&mut self, notification: Notification);
}

impl<F: FnMut(Notification)> RegistryObserver for F {
    fn notify(&mut self, notification: Notification) {
        self(notification)
    }
}

/// Observer that discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl RegistryObserver for NullObserver {
    fn notify(&mut self, _notification: Notification) {}
}

// ─── Registry ────────────────────────────────────────────────────────────

pub struct CurveRegistry {
    curves: IndexMap<CurveKey, Curve>,
    construction: Option<Curve>,
    next_key: CurveKey,
    /// Last broadcast visibility; new curves start with it.
    visible: bool,
    observer: Box<dyn RegistryObserver>,
}

impl fmt::Debug for CurveRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurveRegistry")
            .field("curves", &self.curves.keys().collect::<Vec<_>>())
            .field("construction", &self.construction.as_ref().map(|c| c.key))
            .field("next_key", &self.next_key)
            .field("visible", &self.visible)
            .finish_non_exhaustive()
    }
}

impl Default for CurveRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CurveRegistry {
    pub fn new() -> Self {
        Self::with_observer(NullObserver)
    }

    pub fn with_observer(observer: impl RegistryObserver + 'static) -> Self {
        Self {
            curves: IndexMap::new(),
            construction: None,
            next_key: CurveKey::new(1),
            visible: true,
            observer: Box::new(observer),
        }
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    pub fn contains(&self, key: CurveKey) -> bool {
        self.curves.contains_key(&key)
    }

    pub fn get(&self, key: CurveKey) -> Option<&Curve> {
        self.curves.get(&key)
    }

    /// Finished curves in insertion order (draw order, bottom first).
    pub fn curves(&self) -> impl DoubleEndedIterator<Item = &Curve> + '_ {
        self.curves.values()
    }

    /// Finished curves most-recent first (hit-test order).
    pub fn curves_most_recent_first(&self) -> impl Iterator<Item = &Curve> + '_ {
        self.curves.values().rev()
    }

    pub fn keys(&self) -> impl Iterator<Item = CurveKey> + '_ {
        self.curves.keys().copied()
    }

    pub fn construction(&self) -> Option<&Curve> {
        self.construction.as_ref()
    }

    pub fn is_constructing(&self) -> bool {
        self.construction.is_some()
    }

    /// The key the next construction will receive.
    pub fn next_key(&self) -> CurveKey {
        self.next_key
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    // ─── Construction ────────────────────────────────────────────────────

    /// Start a new curve at `anchor`. Fails if one is already in progress.
    pub fn begin_construction(
        &mut self,
        anchor: Point,
        kind: CurveKind,
    ) -> Result<CurveKey, RegistryError> {
        if let Some(current) = &self.construction {
            return Err(RegistryError::ConstructionInProgress { key: current.key });
        }
        let key = self.next_key;
        self.next_key = key.next().ok_or(RegistryError::KeysExhausted { key })?;
        let mut curve = Curve::seeded(key, kind, anchor);
        curve.visible = self.visible;
        log::debug!("begin {kind:?} curve {key} at ({}, {})", anchor.x, anchor.y);
        self.construction = Some(curve);
        self.redraw();
        Ok(key)
    }

    /// Move or append the provisional vertex of the curve in progress.
    pub fn extend_construction(&mut self, point: Point, modifiers: Modifiers) {
        let Some(curve) = self.construction.as_mut() else {
            return;
        };
        curve.extend(point, modifiers);
        self.redraw();
    }

    /// Commit a vertex at `point` on the curve in progress.
    pub fn place_vertex(&mut self, point: Point) -> bool {
        let Some(curve) = self.construction.as_mut() else {
            return false;
        };
        let placed = curve.place(point);
        if placed {
            self.redraw();
        }
        placed
    }

    /// Finish the curve in progress and register it. No-op when idle.
    pub fn finish_construction(&mut self) -> Option<CurveKey> {
        let mut curve = self.construction.take()?;
        curve.finalize();
        let key = curve.key;
        log::debug!("finish curve {key} with {} vertices", curve.len());
        self.insert(curve);
        Some(key)
    }

    /// Discard the curve in progress without registering it.
    pub fn cancel_construction(&mut self) -> bool {
        match self.construction.take() {
            Some(curve) => {
                log::debug!("cancel curve {}", curve.key);
                self.redraw();
                true
            }
            None => false,
        }
    }

    // ─── Finished curves ─────────────────────────────────────────────────

    /// Append `curve`, or replace the curve with the same key and move it to
    /// the end of the iteration order. The curve is finalized on the way in.
    ///
    /// Fails without touching the registry when `curve.key` has no
    /// successor key.
    pub fn add_or_replace(&mut self, curve: Curve) -> Result<(), RegistryError> {
        let key = curve.key;
        if key >= self.next_key {
            self.next_key = key.next().ok_or(RegistryError::KeysExhausted { key })?;
        }
        self.insert(curve);
        Ok(())
    }

    /// Store a curve whose key is already below the key counter.
    fn insert(&mut self, mut curve: Curve) {
        let key = curve.key;
        if !curve.finished {
            curve.finalize();
        }
        if self.construction.as_ref().is_some_and(|c| c.key == key) {
            log::debug!("curve {key} registered while under construction; dropping draft");
            self.construction = None;
        }

        let old = self.curves.len();
        if !self.curves.contains_key(&key) {
            curve.visible = self.visible;
        }
        let (index, previous) = self.curves.insert_full(key, curve);
        if previous.is_some() {
            self.move_to_end(index);
            log::trace!("replace curve {key}");
        } else {
            log::debug!("add curve {key}");
        }
        self.redraw();
        self.count_changed(old);
    }

    /// Move `key` to the end of the iteration order.
    pub fn promote(&mut self, key: CurveKey) -> bool {
        let Some(index) = self.curves.get_index_of(&key) else {
            return false;
        };
        self.move_to_end(index);
        self.redraw();
        true
    }

    /// Mutate a finished curve in place and re-register it.
    pub fn update(&mut self, key: CurveKey, f: impl FnOnce(&mut Curve)) -> bool {
        let Some(mut curve) = self.curves.get(&key).cloned() else {
            return false;
        };
        f(&mut curve);
        curve.key = key;
        self.insert(curve);
        true
    }

    pub fn remove(&mut self, key: CurveKey) -> bool {
        let old = self.curves.len();
        if self.curves.shift_remove(&key).is_none() {
            return false;
        }
        log::debug!("remove curve {key}");
        self.redraw();
        self.count_changed(old);
        true
    }

    /// Remove every highlighted curve, returning how many went.
    pub fn remove_highlighted(&mut self) -> usize {
        let old = self.curves.len();
        self.curves.retain(|_, c| !c.highlighted);
        let removed = old - self.curves.len();
        if removed > 0 {
            self.redraw();
            self.count_changed(old);
        }
        removed
    }

    /// Broadcast visibility to every curve; later curves start with it too.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        for curve in self.curves.values_mut() {
            curve.visible = visible;
        }
        if let Some(curve) = self.construction.as_mut() {
            curve.visible = visible;
        }
        self.redraw();
    }

    pub fn set_highlighted(&mut self, key: CurveKey, highlighted: bool) -> bool {
        let Some(curve) = self.curves.get_mut(&key) else {
            return false;
        };
        curve.highlighted = highlighted;
        self.redraw();
        true
    }

    /// Flip the highlight flag, returning the new value.
    pub fn toggle_highlighted(&mut self, key: CurveKey) -> Option<bool> {
        let curve = self.curves.get_mut(&key)?;
        curve.highlighted = !curve.highlighted;
        let now = curve.highlighted;
        self.redraw();
        Some(now)
    }

    // ─── Internals ───────────────────────────────────────────────────────

    fn move_to_end(&mut self, index: usize) {
        let last = self.curves.len() - 1;
        if index != last {
            self.curves.move_index(index, last);
        }
    }

    fn redraw(&mut self) {
        self.observer.notify(Notification::RedrawRequested);
    }

    fn count_changed(&mut self, old: usize) {
        let new = self.curves.len();
        if old != new {
            self.observer.notify(Notification::CountChanged { old, new });
        }
    }
}
