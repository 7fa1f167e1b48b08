//! Member pool - recycles member values between groups.
//!
//! The pool is a cache, not a leak detector: releases beyond `max_size` are
//! dropped, and acquiring from an empty pool simply constructs a new member.
//! Because members are moved in and out by value, a released member can
//! never still be owned by a group.

use legion_logic::color::Color;

use crate::components::Member;

/// Running counters, mostly for tests and the harness
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Members handed out in total
    pub acquired: u64,
    /// Of those, how many came from the free list
    pub recycled: u64,
    /// Members accepted back
    pub released: u64,
    /// Releases dropped because the pool was full
    pub dropped: u64,
}

#[derive(Debug, Clone)]
pub struct MemberPool {
    free: Vec<Member>,
    max_size: usize,
    wander_step: f32,
    stats: PoolStats,
}

impl MemberPool {
    pub fn new(max_size: usize, wander_step: f32) -> Self {
        Self {
            free: Vec::new(),
            max_size,
            wander_step,
            stats: PoolStats::default(),
        }
    }

    /// A member at local (x, y) with every other field reset
    pub fn acquire(&mut self, x: f32, y: f32, move_radius: f32, color: Color) -> Member {
        self.stats.acquired += 1;
        match self.free.pop() {
            Some(mut member) => {
                self.stats.recycled += 1;
                member.reset(x, y, move_radius, self.wander_step, color);
                member
            }
            None => Member::new(x, y, move_radius, self.wander_step, color),
        }
    }

    pub fn release(&mut self, member: Member) {
        if self.free.len() < self.max_size {
            self.free.push(member);
            self.stats.released += 1;
        } else {
            self.stats.dropped += 1;
        }
    }

    pub fn release_all(&mut self, members: impl IntoIterator<Item = Member>) {
        for member in members {
            self.release(member);
        }
    }

    /// Members currently waiting on the free list
    pub fn len(&self) -> usize {
        self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }

    pub fn clear(&mut self) {
        self.free.clear();
    }

    pub fn stats(&self) -> PoolStats {
        self.stats
    }
}
