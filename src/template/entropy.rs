use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::SeedableRng;
use rand::rngs::{OsRng, StdRng};
use tracing::warn;

/// Randomness source shared by every generator of a run.
///
/// Seeded once from the operating system's cryptographically strong source;
/// individual draws come from a seeded userspace generator behind a mutex.
#[derive(Debug)]
pub struct Entropy {
    rng: Mutex<StdRng>,
}

impl Entropy {
    /// Seed a new source from the OS random number generator.
    ///
    /// Falls back to a clock-derived seed when the OS source is unavailable.
    #[must_use]
    pub fn from_os() -> Self {
        let rng = StdRng::from_rng(OsRng).unwrap_or_else(|err| {
            warn!("OS entropy unavailable ({}); seeding from the clock.", err);
            StdRng::seed_from_u64(clock_seed())
        });
        Self {
            rng: Mutex::new(rng),
        }
    }

    /// Deterministic source for reproducible output.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub(crate) fn with_rng<T>(&self, draw: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        draw(&mut rng)
    }
}

impl Default for Entropy {
    fn default() -> Self {
        Self::from_os()
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            u64::try_from(elapsed.as_nanos() % u128::from(u64::MAX)).unwrap_or(0)
        })
}
