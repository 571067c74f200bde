use std::time::Instant;

use crate::app::state::AppState;

pub struct IngestHandler;

impl IngestHandler {
    /// Moves every published sample into the history, oldest first.
    /// The table and the charts read from the history on the next frame.
    pub fn handle_incoming_samples(state: &mut AppState) -> usize {
        let mut received = 0;
        while let Ok(sample) = state.sample_receiver.try_recv() {
            state.history.push(&sample);
            received += 1;
        }

        if received > 0 {
            state.transport.last_sample_at = Some(Instant::now());
        }
        received
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::handlers::test_support::state_with_channels;
    use crate::history::Axis;
    use crate::types::{local_time, Axes, Sample};

    #[test]
    fn drains_samples_in_arrival_order() {
        let (mut state, channels) = state_with_channels(None);
        let ts = local_time(2024, 9, 1, 12, 0, 0);
        for id in 1..=4 {
            let v = id as f64;
            channels
                .sample_sender
                .send(Sample::new(id, Axes::new(v, -v, 9.8), Axes::default(), ts))
                .expect("send");
        }

        assert_eq!(IngestHandler::handle_incoming_samples(&mut state), 4);
        assert_eq!(state.history.len(), 4);
        for axis in Axis::ALL {
            assert_eq!(state.history.acceleration(axis).len(), 4);
        }
        let ys: Vec<f64> = state.history.acceleration(Axis::Y).iter().copied().collect();
        assert_eq!(ys, vec![-1.0, -2.0, -3.0, -4.0]);
        assert_eq!(state.get_status_summary(), "Receiving");
    }

    #[test]
    fn pending_count_excludes_settled_persists() {
        use crate::app::handlers::PersistenceHandler;
        use crate::types::PersistResult;

        let (mut state, channels) = state_with_channels(None);
        let ts = local_time(2024, 9, 1, 12, 0, 0);
        for id in 1..=3 {
            channels
                .sample_sender
                .send(Sample::new(id, Axes::default(), Axes::default(), ts))
                .expect("send");
        }
        IngestHandler::handle_incoming_samples(&mut state);
        assert_eq!(state.unpersisted_count(), 3);

        channels.persist_sender.send(PersistResult::stored(1)).expect("send");
        channels.persist_sender.send(PersistResult::failed(2, "locked".to_string())).expect("send");
        PersistenceHandler::handle_persist_results(&mut state);
        assert_eq!(state.unpersisted_count(), 1);
    }

    #[test]
    fn nothing_pending_leaves_state_alone() {
        let (mut state, _channels) = state_with_channels(None);
        assert_eq!(IngestHandler::handle_incoming_samples(&mut state), 0);
        assert!(state.transport.last_sample_at.is_none());
        assert_eq!(state.get_status_summary(), "Waiting for data");
    }
}
