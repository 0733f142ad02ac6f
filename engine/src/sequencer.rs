//! Shuffled candidate cycle and slow-down timing for the single-slot drawer.

use crate::{record::NameRecord, Millis};
use rand::{seq::SliceRandom, Rng};

/// A reshuffling cycle over the candidate set.
///
/// Each [`advance`](Self::advance) yields the next candidate. When the cursor
/// wraps, the whole order is reshuffled, and a replacement set queued with
/// [`replace`](Self::replace) is swapped in at that point, so a pass in
/// progress always completes with the set it started with.
#[derive(Debug, Clone)]
pub struct SelectionSequencer {
    order: Vec<NameRecord>,
    cursor: usize,
    pending: Option<Vec<NameRecord>>,
    current: Option<usize>,
}

impl SelectionSequencer {
    /// Create a sequencer over `candidates`, shuffled once up front.
    pub fn new<R: Rng + ?Sized>(mut candidates: Vec<NameRecord>, rng: &mut R) -> Self {
        candidates.shuffle(rng);
        Self {
            order: candidates,
            cursor: 0,
            pending: None,
            current: None,
        }
    }

    /// Queue a new candidate set for the next wrap.
    pub fn replace(&mut self, candidates: Vec<NameRecord>) {
        self.pending = Some(candidates);
    }

    /// Whether a replacement is waiting for the next wrap.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Apply the queued replacement now, as if the cycle had wrapped.
    ///
    /// Used at the settle tick so the final pick comes from the most recent
    /// set. Returns false when nothing was queued.
    pub fn wrap_now<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.pending.is_none() {
            return false;
        }
        self.wrap(rng);
        true
    }

    fn wrap<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if let Some(next) = self.pending.take() {
            self.order = next;
        }
        self.order.shuffle(rng);
        self.cursor = 0;
        self.current = None;
    }

    /// Step to the next candidate. `None` only when the set is empty.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<&NameRecord> {
        if self.cursor >= self.order.len() {
            self.wrap(rng);
        }
        if self.order.is_empty() {
            return None;
        }
        let index = self.cursor;
        self.cursor += 1;
        self.current = Some(index);
        self.order.get(index)
    }

    /// The candidate yielded by the last `advance`.
    pub fn current(&self) -> Option<&NameRecord> {
        self.current.and_then(|i| self.order.get(i))
    }

    /// Candidates in the active pass, in cycle order.
    pub fn candidates(&self) -> &[NameRecord] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Outcome of one pacing decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pace {
    /// Redisplay now, then wait this long
    Tick(Millis),
    /// The interval hit its bound; wait this long, then show the final pick
    Final(Millis),
}

/// Tick interval schedule: slows toward a random ceiling, or speeds back
/// down to the base interval once a stop is requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pacer {
    base: Millis,
    max: Millis,
    interval: Millis,
    ceiling: Millis,
}

impl Pacer {
    /// Start a schedule at ten base intervals with a ceiling drawn from
    /// `[2 × start, max]`.
    pub fn new<R: Rng + ?Sized>(base: Millis, max: Millis, rng: &mut R) -> Self {
        let interval = base * 10;
        let floor = interval * 2;
        let ceiling = if floor >= max {
            max
        } else {
            rng.random_range(floor..=max)
        };
        Self {
            base,
            max,
            interval,
            ceiling,
        }
    }

    /// The interval used by the last tick.
    pub fn interval(&self) -> Millis {
        self.interval
    }

    /// The randomized slow-down ceiling.
    pub fn ceiling(&self) -> Millis {
        self.ceiling
    }

    /// Decide the next tick.
    ///
    /// Without a stop the interval grows by `[base, 4 × base]` and is clamped
    /// at the ceiling; with a stop it shrinks by `[2, base]` and is clamped at
    /// `base`. Reaching either bound yields [`Pace::Final`] with a wait of
    /// `max`.
    pub fn next<R: Rng + ?Sized>(&mut self, stopping: bool, rng: &mut R) -> Pace {
        if stopping {
            if self.interval > self.base {
                let decrement = rng.random_range(2..=self.base.max(2));
                self.interval = self.interval.saturating_sub(decrement).max(self.base);
            }
            if self.interval <= self.base {
                self.interval = self.base;
                return Pace::Final(self.max);
            }
        } else {
            let increment = rng.random_range(self.base..=self.base * 4);
            self.interval = (self.interval + increment).min(self.ceiling);
            if self.interval >= self.ceiling {
                return Pace::Final(self.max);
            }
        }
        Pace::Tick(self.interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Remark, Sex};
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::HashSet;

    fn records(names: &[&str]) -> Vec<NameRecord> {
        names
            .iter()
            .map(|n| NameRecord::new(*n, Sex::Male, Remark::None))
            .collect()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn each_pass_visits_every_candidate() {
        let mut rng = rng();
        let mut seq = SelectionSequencer::new(records(&["a", "b", "c", "d"]), &mut rng);

        for _ in 0..3 {
            let pass: HashSet<String> = (0..4)
                .map(|_| seq.advance(&mut rng).unwrap().name.clone())
                .collect();
            assert_eq!(pass.len(), 4);
        }
    }

    #[test]
    fn replacement_waits_for_wrap() {
        let mut rng = rng();
        let mut seq = SelectionSequencer::new(records(&["a", "b", "c"]), &mut rng);
        seq.advance(&mut rng);
        seq.replace(records(&["x", "y"]));
        assert!(seq.has_pending());

        // The rest of the current pass still comes from the old set
        for _ in 0..2 {
            let name = seq.advance(&mut rng).unwrap().name.clone();
            assert!(["a", "b", "c"].contains(&name.as_str()));
        }

        let name = seq.advance(&mut rng).unwrap().name.clone();
        assert!(["x", "y"].contains(&name.as_str()));
        assert!(!seq.has_pending());
        assert_eq!(seq.len(), 2);
    }

    #[test]
    fn wrap_now_applies_pending() {
        let mut rng = rng();
        let mut seq = SelectionSequencer::new(records(&["a", "b", "c"]), &mut rng);
        seq.advance(&mut rng);
        assert!(!seq.wrap_now(&mut rng));

        seq.replace(records(&["z"]));
        assert!(seq.wrap_now(&mut rng));
        assert!(seq.current().is_none());
        assert_eq!(seq.advance(&mut rng).unwrap().name, "z");
        assert_eq!(seq.current().unwrap().name, "z");
    }

    #[test]
    fn empty_sequencer_yields_nothing() {
        let mut rng = rng();
        let mut seq = SelectionSequencer::new(Vec::new(), &mut rng);
        assert!(seq.is_empty());
        assert!(seq.advance(&mut rng).is_none());
    }

    #[test]
    fn pacer_starts_at_ten_base_intervals() {
        let mut rng = rng();
        let pacer = Pacer::new(20, 1000, &mut rng);
        assert_eq!(pacer.interval(), 200);
        assert!((400..=1000).contains(&pacer.ceiling()));
    }

    #[test]
    fn pacer_slows_to_ceiling_then_finalizes() {
        let mut rng = rng();
        let mut pacer = Pacer::new(20, 1000, &mut rng);
        let mut last = pacer.interval();
        loop {
            match pacer.next(false, &mut rng) {
                Pace::Tick(t) => {
                    assert!(t >= last);
                    assert!(t < pacer.ceiling());
                    last = t;
                }
                Pace::Final(wait) => {
                    assert_eq!(wait, 1000);
                    assert_eq!(pacer.interval(), pacer.ceiling());
                    break;
                }
            }
        }
    }

    #[test]
    fn pacer_speeds_up_after_stop() {
        let mut rng = rng();
        let mut pacer = Pacer::new(20, 1000, &mut rng);
        pacer.next(false, &mut rng);

        let mut last = pacer.interval();
        let mut ticks = 0;
        loop {
            match pacer.next(true, &mut rng) {
                Pace::Tick(t) => {
                    assert!(t <= last);
                    assert!(t > 20);
                    last = t;
                    ticks += 1;
                }
                Pace::Final(wait) => {
                    assert_eq!(wait, 1000);
                    assert_eq!(pacer.interval(), 20);
                    break;
                }
            }
        }
        assert!(ticks > 0);
    }

    #[test]
    fn ceiling_collapses_when_max_is_tight() {
        let mut rng = rng();
        let pacer = Pacer::new(50, 1000, &mut rng);
        assert_eq!(pacer.ceiling(), 1000);
    }

    // Property-based tests using proptest
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_unstopped_ticks_never_shrink(seed in any::<u64>(), base in 2u64..50) {
                let mut rng = StdRng::seed_from_u64(seed);
                let max = base * 40;
                let mut pacer = Pacer::new(base, max, &mut rng);
                let mut last = pacer.interval();
                loop {
                    match pacer.next(false, &mut rng) {
                        Pace::Tick(t) => {
                            prop_assert!(t >= last);
                            last = t;
                        }
                        Pace::Final(wait) => {
                            prop_assert_eq!(wait, max);
                            break;
                        }
                    }
                }
            }

            #[test]
            fn prop_stopped_ticks_never_grow(
                seed in any::<u64>(),
                base in 2u64..50,
                warmup in 0usize..5,
            ) {
                let mut rng = StdRng::seed_from_u64(seed);
                let mut pacer = Pacer::new(base, base * 40, &mut rng);
                for _ in 0..warmup {
                    pacer.next(false, &mut rng);
                }
                let mut last = pacer.interval();
                loop {
                    match pacer.next(true, &mut rng) {
                        Pace::Tick(t) => {
                            prop_assert!(t <= last);
                            prop_assert!(t >= base);
                            last = t;
                        }
                        Pace::Final(_) => {
                            prop_assert_eq!(pacer.interval(), base);
                            break;
                        }
                    }
                }
            }

            #[test]
            fn prop_advance_stays_in_set(
                seed in any::<u64>(),
                n in 1usize..20,
                steps in 1usize..100,
            ) {
                let mut rng = StdRng::seed_from_u64(seed);
                let names: Vec<String> = (0..n).map(|i| format!("r{i}")).collect();
                let refs: Vec<&str> = names.iter().map(String::as_str).collect();
                let mut seq = SelectionSequencer::new(records(&refs), &mut rng);
                for _ in 0..steps {
                    let picked = seq.advance(&mut rng).unwrap().name.clone();
                    prop_assert!(names.contains(&picked));
                }
            }
        }
    }
}
