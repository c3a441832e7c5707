use chrono::{DateTime, Utc};

/// Time-based identifiers with counters for same-millisecond bursts.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    message_counter: u64,
    last_session_millis: i64,
    session_seq: u32,
}

impl IdGenerator {
    /// `message_counter` is the last persisted counter value.
    pub fn new(message_counter: u64) -> Self {
        Self {
            message_counter,
            ..Self::default()
        }
    }

    pub fn message_counter(&self) -> u64 {
        self.message_counter
    }

    pub fn next_message_id(&mut self, now: DateTime<Utc>) -> String {
        self.message_counter += 1;
        format!("msg-{}-{}", now.timestamp_millis(), self.message_counter)
    }

    /// `is_taken` guards against ids restored from storage.
    pub fn next_session_id(
        &mut self,
        now: DateTime<Utc>,
        is_taken: impl Fn(&str) -> bool,
    ) -> String {
        let millis = now.timestamp_millis();
        if millis == self.last_session_millis {
            self.session_seq += 1;
        } else {
            self.last_session_millis = millis;
            self.session_seq = 0;
        }

        loop {
            let candidate = if self.session_seq == 0 {
                format!("session_{}", millis)
            } else {
                format!("session_{}_{}", millis, self.session_seq)
            };
            if !is_taken(&candidate) {
                return candidate;
            }
            self.session_seq += 1;
        }
    }
}
