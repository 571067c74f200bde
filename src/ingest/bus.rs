use crossbeam_channel::Sender;
use log::warn;

use crate::types::Sample;

/// Publishes every accepted sample to independent subscribers.
///
/// Subscribers are served in registration order. A full channel makes the
/// publisher wait until that subscriber catches up, so every live
/// subscriber sees every sample. A disconnected one is removed.
#[derive(Debug, Default)]
pub struct SampleBus {
    subscribers: Vec<(&'static str, Sender<Sample>)>,
}

impl SampleBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, name: &'static str, sender: Sender<Sample>) {
        self.subscribers.push((name, sender));
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Returns how many subscribers received the sample
    pub fn publish(&mut self, sample: &Sample) -> usize {
        let mut delivered = 0;

        self.subscribers.retain(|(name, sender)| {
            if sender.is_full() {
                warn!(
                    "Subscriber '{}' is falling behind, waiting to deliver measurement {}",
                    name, sample.measurement_id
                );
            }

            match sender.send(sample.clone()) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                Err(_) => {
                    warn!("Subscriber '{}' disconnected, removing it", name);
                    false
                }
            }
        });

        delivered
    }
}
