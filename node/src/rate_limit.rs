// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Fixed-window request counter keyed by caller identity.

use std::collections::HashMap;
use std::time::Instant;

use parking_lot::Mutex;

use crate::config::RateLimitConfig;

#[derive(Debug, Clone, Copy)]
struct Window {
    start: Instant,
    count: u32,
}

#[derive(Debug)]
pub struct RateLimiter {
    cfg: RateLimitConfig,
    windows: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(cfg: RateLimitConfig) -> Self {
        Self {
            cfg,
            windows: Mutex::new(HashMap::new()),
        }
    }

    pub fn enabled(&self) -> bool {
        self.cfg.enabled
    }

    pub fn allow(&self, identity: &str) -> bool {
        self.allow_at(identity, Instant::now())
    }

    /// Counts one request for `identity` at `now`.
    pub fn allow_at(&self, identity: &str, now: Instant) -> bool {
        if !self.cfg.enabled {
            return true;
        }
        let mut windows = self.windows.lock();

        if !windows.contains_key(identity) && windows.len() >= self.cfg.max_identities {
            self.evict(&mut windows, now);
        }

        let window = windows.entry(identity.to_string()).or_insert(Window { start: now, count: 0 });
        if now.saturating_duration_since(window.start) >= self.cfg.window {
            *window = Window { start: now, count: 0 };
        }
        if window.count >= self.cfg.max_requests {
            return false;
        }
        window.count += 1;
        true
    }

    /// Drops expired windows; if none expired, drops the oldest one.
    fn evict(&self, windows: &mut HashMap<String, Window>, now: Instant) {
        let span = self.cfg.window;
        windows.retain(|_, w| now.saturating_duration_since(w.start) < span);
        if windows.len() >= self.cfg.max_identities {
            let oldest = windows
                .iter()
                .min_by_key(|(_, w)| w.start)
                .map(|(k, _)| k.clone());
            if let Some(key) = oldest {
                windows.remove(&key);
            }
        }
    }

    pub fn tracked(&self) -> usize {
        self.windows.lock().len()
    }
}
