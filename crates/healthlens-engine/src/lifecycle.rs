//! Chart Lifecycle Manager
//!
//! Chart objects are created and released explicitly by a [`ChartBackend`].
//! Each panel owns exactly one [`SurfaceSlot`]; the slot is the only place
//! that creates charts, and it always releases its previous occupant first.

use std::collections::BTreeMap;
use std::fmt;

use crate::panel::{PanelId, PanelLayout, PanelSpec};

/// Creates and releases the rendering objects behind panels
pub trait ChartBackend {
    type Chart;
    type Error: fmt::Display;

    fn create(&mut self, spec: &PanelSpec) -> Self::Chart;

    fn release(&mut self, panel: PanelId, chart: Self::Chart) -> Result<(), Self::Error>;
}

/// Owned binding slot for a single panel
#[derive(Debug)]
pub struct SurfaceSlot<C> {
    occupant: Option<C>,
}

impl<C> SurfaceSlot<C> {
    pub fn empty() -> Self {
        Self { occupant: None }
    }

    pub fn is_bound(&self) -> bool {
        self.occupant.is_some()
    }

    pub fn chart(&self) -> Option<&C> {
        self.occupant.as_ref()
    }

    /// Release the current chart (if any), then create one for `spec`.
    pub fn rebind<B>(&mut self, backend: &mut B, spec: &PanelSpec)
    where
        B: ChartBackend<Chart = C>,
    {
        self.release(backend, spec.id);
        self.occupant = Some(backend.create(spec));
    }

    /// Returns true when a chart was bound. The slot is emptied even if the
    /// backend reports a failure.
    pub fn release<B>(&mut self, backend: &mut B, panel: PanelId) -> bool
    where
        B: ChartBackend<Chart = C>,
    {
        let Some(chart) = self.occupant.take() else {
            return false;
        };
        if let Err(err) = backend.release(panel, chart) {
            tracing::warn!(?panel, error = %err, "chart release failed");
        }
        true
    }
}

impl<C> Default for SurfaceSlot<C> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Live chart bindings, at most one per panel
pub struct ChartLifecycle<B: ChartBackend> {
    backend: B,
    slots: BTreeMap<PanelId, SurfaceSlot<B::Chart>>,
}

impl<B: ChartBackend> ChartLifecycle<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            slots: BTreeMap::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn bind(&mut self, spec: &PanelSpec) {
        let slot = self.slots.entry(spec.id).or_default();
        slot.rebind(&mut self.backend, spec);
    }

    pub fn release(&mut self, panel: PanelId) -> bool {
        match self.slots.get_mut(&panel) {
            Some(slot) => slot.release(&mut self.backend, panel),
            None => false,
        }
    }

    pub fn release_all(&mut self) -> usize {
        let mut released = 0;
        for (panel, slot) in self.slots.iter_mut() {
            if slot.release(&mut self.backend, *panel) {
                released += 1;
            }
        }
        released
    }

    /// Make the live bindings match `layout`: every composed panel is
    /// (re)bound, every other panel is released.
    pub fn sync(&mut self, layout: &PanelLayout) {
        let panels = layout.panels();
        for id in PanelId::ALL {
            if !panels.iter().any(|p| p.id == id) {
                self.release(id);
            }
        }
        for spec in panels {
            self.bind(spec);
        }
    }

    pub fn chart(&self, panel: PanelId) -> Option<&B::Chart> {
        self.slots.get(&panel).and_then(|slot| slot.chart())
    }

    pub fn is_bound(&self, panel: PanelId) -> bool {
        self.slots.get(&panel).is_some_and(|slot| slot.is_bound())
    }

    pub fn live_count(&self) -> usize {
        self.slots.values().filter(|slot| slot.is_bound()).count()
    }
}

impl<B: ChartBackend> Drop for ChartLifecycle<B> {
    fn drop(&mut self) {
        self.release_all();
    }
}
