use super::cache_state::*;
use super::cancel_token::*;
use super::cache_entry::*;
use crate::error::*;
use crate::scene::*;

use log::*;

use std::collections::{HashMap};
use std::sync::*;
use std::sync::atomic::{AtomicUsize, Ordering};

///
/// The cache slot for a single object
///
struct CacheSlot {
    state:      CacheState,
    entry:      Option<Arc<CacheEntry>>,

    /// Increased every time a computation starts or is abandoned: a computation can only store its result if the generation still matches
    generation: u64,

    /// Cancels the computation in progress
    cancel:     Option<CancelToken>,

    /// The settings key of the computation in progress
    computing:  Option<u64>,
}

impl Default for CacheSlot {
    fn default() -> Self {
        CacheSlot {
            state:      CacheState::Empty,
            entry:      None,
            generation: 0,
            cancel:     None,
            computing:  None,
        }
    }
}

impl CacheSlot {
    ///
    /// Stops tracking the computation in progress, cancelling it if it's still running
    ///
    fn abandon_computation(&mut self) {
        if let Some(cancel) = self.cancel.take() { cancel.cancel(); }

        self.computing  = None;
        self.generation += 1;
        self.state      = if self.entry.is_some() { CacheState::Stale } else { CacheState::Empty };
    }
}

///
/// Issued when a computation starts, and used to store its result
///
#[derive(Clone, Debug)]
pub struct ComputationTicket {
    pub object:     ObjectId,
    pub generation: u64,
    pub cancel:     CancelToken,
}

///
/// Whether a cached result was reused or had to be computed
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheOutcome {
    /// The result was already in the cache, or was computed by another caller that this one waited for
    Reused,

    /// This caller computed the result
    Computed,
}

///
/// What a caller of `get_or_compute()` should do next
///
enum NextStep {
    Use(Arc<CacheEntry>),
    Compute(ComputationTicket),
}

///
/// A computation started by `get_or_compute()`: if it's dropped without finishing (eg, because the computation panicked),
/// the slot is released so callers waiting for it can carry on
///
struct PendingComputation<'a> {
    table:  &'a LineartCacheTable,
    ticket: Option<ComputationTicket>,
}

impl<'a> PendingComputation<'a> {
    fn finish(mut self, result: Result<CacheEntry, LineartError>) -> Result<Arc<CacheEntry>, LineartError> {
        match self.ticket.take() {
            Some(ticket)    => self.table.finish_computation(ticket, result),
            None            => Err(LineartError::Cancelled),
        }
    }
}

impl<'a> Drop for PendingComputation<'a> {
    fn drop(&mut self) {
        if let Some(ticket) = self.ticket.take() {
            self.table.abandon(ticket);
        }
    }
}

///
/// Stores the feature line results for each object, so the modifiers on an object can share a single computation
///
/// Every object has a state (see `CacheState`). Callers asking for a result with the same settings key as the computation
/// already running for an object wait for that computation instead of starting their own. Starting a computation with a
/// different key cancels the one that's running, and the result of a cancelled computation is never stored: the previous
/// result (if there was one) stays available until the new computation finishes.
///
pub struct LineartCacheTable {
    slots:          Mutex<HashMap<ObjectId, CacheSlot>>,
    finished:       Condvar,
    computations:   AtomicUsize,
}

///
/// A reference to the cache slot of a single object
///
#[derive(Clone, Copy)]
pub struct CacheHandle<'a> {
    table:  &'a LineartCacheTable,
    object: ObjectId,
}

impl Default for LineartCacheTable {
    fn default() -> Self {
        LineartCacheTable::new()
    }
}

impl LineartCacheTable {
    ///
    /// Creates an empty cache table
    ///
    pub fn new() -> LineartCacheTable {
        LineartCacheTable {
            slots:          Mutex::new(HashMap::new()),
            finished:       Condvar::new(),
            computations:   AtomicUsize::new(0),
        }
    }

    fn lock_slots(&self) -> MutexGuard<'_, HashMap<ObjectId, CacheSlot>> {
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    ///
    /// The state of the cached result for an object
    ///
    pub fn state(&self, object: ObjectId) -> CacheState {
        self.lock_slots().get(&object).map(|slot| slot.state).unwrap_or(CacheState::Empty)
    }

    ///
    /// The most recent result for an object, whether or not it's still valid
    ///
    pub fn entry(&self, object: ObjectId) -> Option<Arc<CacheEntry>> {
        self.lock_slots().get(&object).and_then(|slot| slot.entry.clone())
    }

    ///
    /// The result for an object, if it's valid and was computed with settings matching the specified key
    ///
    pub fn valid_entry(&self, object: ObjectId, key: u64) -> Option<Arc<CacheEntry>> {
        Self::valid_slot_entry(self.lock_slots().get(&object)?, key)
    }

    fn valid_slot_entry(slot: &CacheSlot, key: u64) -> Option<Arc<CacheEntry>> {
        if slot.state == CacheState::Valid {
            slot.entry.as_ref().filter(|entry| entry.matches_key(key)).cloned()
        } else {
            None
        }
    }

    ///
    /// Marks the result for an object as out of date (eg, because the scene has changed)
    ///
    /// Any computation in progress for the object is cancelled.
    ///
    pub fn invalidate(&self, object: ObjectId) {
        let mut slots = self.lock_slots();

        if let Some(slot) = slots.get_mut(&object) {
            match slot.state {
                CacheState::Valid       => { slot.state = CacheState::Stale; }
                CacheState::Computing   => { slot.abandon_computation(); }
                CacheState::Empty | CacheState::Stale => { }
            }
        }

        self.finished.notify_all();
    }

    ///
    /// Marks every result in the table as out of date
    ///
    pub fn invalidate_all(&self) {
        let objects = self.lock_slots().keys().copied().collect::<Vec<_>>();
        objects.into_iter().for_each(|object| self.invalidate(object));
    }

    ///
    /// Starts a computation in a slot that's already locked
    ///
    fn start_computation(&self, slot: &mut CacheSlot, object: ObjectId, key: u64) -> ComputationTicket {
        if let Some(previous) = slot.cancel.take() {
            trace!("Line art: cancelling the computation in progress for {:?}", object);
            previous.cancel();
        }

        let cancel      = CancelToken::new();
        slot.generation += 1;
        slot.state      = CacheState::Computing;
        slot.cancel     = Some(cancel.clone());
        slot.computing  = Some(key);

        self.computations.fetch_add(1, Ordering::Relaxed);

        ComputationTicket {
            object:     object,
            generation: slot.generation,
            cancel:     cancel,
        }
    }

    ///
    /// Starts a computation for an object, cancelling any computation that is already running for it
    ///
    pub fn begin_computation(&self, object: ObjectId, key: u64) -> ComputationTicket {
        let mut slots   = self.lock_slots();
        let slot        = slots.entry(object).or_default();

        self.start_computation(slot, object, key)
    }

    ///
    /// Stores the result of a computation
    ///
    /// If the computation was superseded, or the object was invalidated or cleared while it was running, the result is
    /// discarded and this returns `LineartError::Cancelled`. A failed computation leaves the previous result in the table
    /// (as stale).
    ///
    pub fn finish_computation(&self, ticket: ComputationTicket, result: Result<CacheEntry, LineartError>) -> Result<Arc<CacheEntry>, LineartError> {
        let mut slots   = self.lock_slots();
        let slot        = match slots.get_mut(&ticket.object) {
            Some(slot)  => slot,
            None        => {
                debug!("Line art: discarding the result of a computation for {:?}, which was removed from the cache", ticket.object);
                return Err(LineartError::Cancelled);
            }
        };

        if slot.generation != ticket.generation || ticket.cancel.is_cancelled() {
            debug!("Line art: discarding the result of a superseded computation for {:?}", ticket.object);
            return Err(LineartError::Cancelled);
        }

        slot.cancel     = None;
        slot.computing  = None;

        let result = match result {
            Ok(entry) => {
                let entry   = Arc::new(entry);
                slot.entry  = Some(Arc::clone(&entry));
                slot.state  = CacheState::Valid;

                Ok(entry)
            }

            Err(err) => {
                slot.state = if slot.entry.is_some() { CacheState::Stale } else { CacheState::Empty };
                Err(err)
            }
        };

        self.finished.notify_all();
        result
    }

    ///
    /// Gives up on a computation that will never finish
    ///
    fn abandon(&self, ticket: ComputationTicket) {
        let mut slots = self.lock_slots();

        if let Some(slot) = slots.get_mut(&ticket.object) {
            if slot.generation == ticket.generation && slot.state == CacheState::Computing {
                warn!("Line art: the computation for {:?} stopped without a result", ticket.object);
                slot.abandon_computation();
            }
        }

        self.finished.notify_all();
    }

    ///
    /// Waits until the object has a valid result for a key, or until this caller should compute it
    ///
    fn next_step(&self, object: ObjectId, key: u64) -> NextStep {
        let mut slots = self.lock_slots();

        loop {
            let slot = slots.entry(object).or_default();

            if let Some(entry) = Self::valid_slot_entry(slot, key) {
                return NextStep::Use(entry);
            }

            if slot.state != CacheState::Computing || slot.computing != Some(key) {
                return NextStep::Compute(self.start_computation(slot, object, key));
            }

            // Another caller is computing the same result
            trace!("Line art: waiting for the computation in progress for {:?}", object);
            slots = self.finished.wait(slots).unwrap_or_else(|poisoned| poisoned.into_inner());
        }
    }

    ///
    /// Returns the valid result for an object, or computes and stores a new one
    ///
    /// If another caller is already computing a result with the same key, this waits for it and shares its result. The
    /// computation runs without holding any locks on the table, and receives the token that will be cancelled if the
    /// object is invalidated or a computation with different settings starts for it.
    ///
    pub fn get_or_compute(&self, object: ObjectId, key: u64, compute: impl FnOnce(&CancelToken) -> Result<CacheEntry, LineartError>) -> Result<(Arc<CacheEntry>, CacheOutcome), LineartError> {
        let ticket = match self.next_step(object, key) {
            NextStep::Use(entry)        => { return Ok((entry, CacheOutcome::Reused)); }
            NextStep::Compute(ticket)   => ticket,
        };

        let cancel  = ticket.cancel.clone();
        let pending = PendingComputation { table: self, ticket: Some(ticket) };
        let result  = compute(&cancel);

        pending.finish(result)
            .map(|entry| (entry, CacheOutcome::Computed))
    }

    ///
    /// Removes the result for an object, cancelling any computation in progress
    ///
    pub fn clear(&self, object: ObjectId) {
        if let Some(slot) = self.lock_slots().remove(&object) {
            if let Some(cancel) = slot.cancel { cancel.cancel(); }
        }

        self.finished.notify_all();
    }

    ///
    /// Removes every result from the table
    ///
    pub fn clear_all(&self) {
        let mut slots = self.lock_slots();

        for (_, slot) in slots.drain() {
            if let Some(cancel) = slot.cancel { cancel.cancel(); }
        }

        self.finished.notify_all();
    }

    ///
    /// The number of computations that have been started using this table
    ///
    pub fn computation_count(&self) -> usize {
        self.computations.load(Ordering::Relaxed)
    }

    ///
    /// Returns a handle for reading the cache of a single object
    ///
    pub fn handle(&self, object: ObjectId) -> CacheHandle<'_> {
        CacheHandle { table: self, object: object }
    }
}

impl<'a> CacheHandle<'a> {
    #[inline]
    pub fn object(&self) -> ObjectId {
        self.object
    }

    #[inline]
    pub fn state(&self) -> CacheState {
        self.table.state(self.object)
    }

    #[inline]
    pub fn entry(&self) -> Option<Arc<CacheEntry>> {
        self.table.entry(self.object)
    }

    #[inline]
    pub fn invalidate(&self) {
        self.table.invalidate(self.object)
    }
}
