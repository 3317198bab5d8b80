//! Entropy adapter for remote command tokens.
//!
//! Implements [`TokenSource`]:
//!
//! - **`target_os = "espidf"`**: the hardware RNG (`esp_random`), which is
//!   a true RNG while the radio is running.
//! - **host**: `std`'s randomly keyed `RandomState` hashing a counter.

use crate::app::ports::TokenSource;

#[derive(Default)]
pub struct RandomTokenSource {
    #[cfg(not(target_os = "espidf"))]
    state: std::collections::hash_map::RandomState,
    #[cfg(not(target_os = "espidf"))]
    counter: u64,
}

impl RandomTokenSource {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(target_os = "espidf")]
impl TokenSource for RandomTokenSource {
    fn next_token(&mut self) -> u32 {
        // SAFETY: esp_random reads the RNG data register; no preconditions.
        unsafe { esp_idf_svc::sys::esp_random() }
    }
}

#[cfg(not(target_os = "espidf"))]
impl TokenSource for RandomTokenSource {
    fn next_token(&mut self) -> u32 {
        use std::hash::BuildHasher;

        self.counter = self.counter.wrapping_add(1);
        self.state.hash_one(self.counter) as u32
    }
}
