// SPDX-License-Identifier: MPL-2.0
//! Request generations.
//!
//! Every logical slot (gallery list, similarity list, filter result, objects
//! overlay) owns a [`RequestSlot`]. Issuing a request advances the slot and
//! hands out a [`Ticket`]; a response is only applied if its ticket is still
//! the slot's current one. Invalidating a slot makes every outstanding
//! ticket stale without issuing a new request.
//!
//! Tickets also carry the identity of the slot that issued them, so a ticket
//! presented to a different slot is stale even at an equal generation.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SLOT_ID: AtomicU64 = AtomicU64::new(1);

/// Monotonically increasing request counter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    /// Returns the raw counter value.
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Proof that a request was issued for a slot at a given generation.
///
/// Not `Clone`: each issued request owns exactly one ticket.
#[derive(Debug, PartialEq, Eq)]
pub struct Ticket {
    slot: u64,
    generation: Generation,
}

impl Ticket {
    /// Generation at which the request was issued.
    #[must_use]
    pub fn generation(&self) -> Generation {
        self.generation
    }
}

/// Generation tracker for one logical slot.
#[derive(Debug)]
pub struct RequestSlot {
    id: u64,
    current: Generation,
    in_flight: bool,
}

impl Default for RequestSlot {
    fn default() -> Self {
        Self {
            id: NEXT_SLOT_ID.fetch_add(1, Ordering::Relaxed),
            current: Generation::default(),
            in_flight: false,
        }
    }
}

impl RequestSlot {
    /// Creates a slot with no outstanding request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a ticket for a new request, superseding any outstanding one.
    pub fn issue(&mut self) -> Ticket {
        self.current = self.current.next();
        self.in_flight = true;
        Ticket {
            slot: self.id,
            generation: self.current,
        }
    }

    /// Makes every outstanding ticket stale.
    pub fn invalidate(&mut self) {
        self.current = self.current.next();
        self.in_flight = false;
    }

    /// Returns `true` if `ticket` was issued by this slot for its latest
    /// request.
    #[must_use]
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.in_flight && ticket.slot == self.id && ticket.generation == self.current
    }

    /// Consumes a ticket if it is current, marking the slot idle.
    ///
    /// Returns `false` for stale tickets, leaving the slot untouched.
    pub fn settle(&mut self, ticket: &Ticket) -> bool {
        if self.is_current(ticket) {
            self.in_flight = false;
            true
        } else {
            false
        }
    }

    /// Returns `true` while the latest issued request has not settled.
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Current generation of the slot.
    #[must_use]
    pub fn generation(&self) -> Generation {
        self.current
    }
}
