use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use parking_lot::Mutex;

use crate::calendar::{WorkingDayCalendar, WorkingDays};
use crate::settings::{Holiday, WorkingDaySettings, holidays_fingerprint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    date: NaiveDate,
    settings: u64,
    holidays: u64,
}

#[derive(Debug, Default)]
struct LruState {
    entries: HashMap<CacheKey, (bool, u64)>,
    recency: BTreeMap<u64, CacheKey>,
    tick: u64,
    hits: u64,
    misses: u64,
}

impl LruState {
    fn get(&mut self, key: &CacheKey) -> Option<bool> {
        self.tick += 1;
        let tick = self.tick;
        let (value, last_used) = self.entries.get_mut(key)?;
        self.recency.remove(last_used);
        *last_used = tick;
        self.recency.insert(tick, *key);
        Some(*value)
    }

    fn insert(&mut self, key: CacheKey, value: bool, capacity: usize) {
        self.tick += 1;
        if let Some((_, old_tick)) = self.entries.insert(key, (value, self.tick)) {
            self.recency.remove(&old_tick);
        }
        self.recency.insert(self.tick, key);
        while self.entries.len() > capacity {
            let Some((_, oldest)) = self.recency.pop_first() else {
                break;
            };
            self.entries.remove(&oldest);
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub len: usize,
}

/// Bounded LRU memo of working-day answers keyed by
/// `(date, settings fingerprint, holidays fingerprint)`.
///
/// The cache is owned by the caller and shared by reference; entries for stale
/// settings or holiday lists simply age out because their fingerprints no
/// longer match.
#[derive(Debug)]
pub struct WorkingDayCache {
    capacity: usize,
    state: Mutex<LruState>,
}

impl WorkingDayCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            state: Mutex::new(LruState::default()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        CacheStats {
            hits: state.hits,
            misses: state.misses,
            len: state.entries.len(),
        }
    }

    pub fn clear(&self) {
        *self.state.lock() = LruState::default();
    }

    fn get_or_compute(&self, key: CacheKey, compute: impl FnOnce() -> bool) -> bool {
        {
            let mut state = self.state.lock();
            if let Some(value) = state.get(&key) {
                state.hits += 1;
                return value;
            }
            state.misses += 1;
        }
        let value = compute();
        self.state.lock().insert(key, value, self.capacity);
        value
    }
}

/// A [`WorkingDayCalendar`] that memoises `is_working_day` through a shared cache.
#[derive(Debug, Clone, Copy)]
pub struct CachedCalendar<'a> {
    inner: WorkingDayCalendar<'a>,
    cache: &'a WorkingDayCache,
    settings_key: u64,
    holidays_key: u64,
}

impl<'a> CachedCalendar<'a> {
    pub fn new(
        settings: &'a WorkingDaySettings,
        holidays: &'a [Holiday],
        cache: &'a WorkingDayCache,
    ) -> Self {
        Self {
            inner: WorkingDayCalendar::new(settings, holidays),
            cache,
            settings_key: settings.fingerprint(),
            holidays_key: holidays_fingerprint(holidays),
        }
    }
}

impl WorkingDays for CachedCalendar<'_> {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        self.inner.is_holiday(date)
    }

    fn day_work_hours(&self, date: NaiveDate) -> f64 {
        self.inner.day_work_hours(date)
    }

    fn is_working_day(&self, date: NaiveDate) -> bool {
        let key = CacheKey {
            date,
            settings: self.settings_key,
            holidays: self.holidays_key,
        };
        self.cache
            .get_or_compute(key, || self.inner.is_working_day(date))
    }
}
