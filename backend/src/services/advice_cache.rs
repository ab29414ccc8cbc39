//! Time-bounded cache for LLM advice
//!
//! Identical soil/weather inputs within the TTL reuse the previous answer
//! instead of paying for another completion.

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use shared::{Language, SoilSample};

#[derive(Debug, Clone)]
struct CachedAdvice {
    text: String,
    /// `None` when the TTL is too large to represent; such entries never expire
    expires_at: Option<Instant>,
}

impl CachedAdvice {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| at > now)
    }
}

/// Shared TTL cache keyed by a hash of the prompt inputs
#[derive(Clone)]
pub struct AdviceCache {
    ttl: Duration,
    entries: Arc<RwLock<HashMap<String, CachedAdvice>>>,
}

/// Canonical cache key for one advice request
pub fn advice_cache_key(
    model: &str,
    language: Language,
    sample: &SoilSample,
    weather_summary: &str,
) -> String {
    let canonical = format!(
        "model={}|lang={}|ph={}|n={}|p={}|k={}|oc={}|weather={}",
        model,
        language.code(),
        sample.ph_level.normalize(),
        sample.nitrogen,
        sample.phosphorus,
        sample.potassium,
        sample.organic_carbon,
        weather_summary.trim(),
    );
    let digest = Sha256::digest(canonical.as_bytes());
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

impl AdviceCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached advice for `key`, if present and not expired
    pub async fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.is_live(Instant::now()))
            .map(|entry| entry.text.clone())
    }

    pub async fn insert(&self, key: String, text: String) {
        let entry = CachedAdvice {
            text,
            expires_at: Instant::now().checked_add(self.ttl),
        };
        self.entries.write().await.insert(key, entry);
    }

    /// Drop expired entries, returning how many were removed
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        before - entries.len()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
