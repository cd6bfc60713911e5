//! Countdown to the opening of the event.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Remaining time split into display units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CountdownView {
    pub dias: i64,
    pub horas: i64,
    pub minutos: i64,
    pub segundos: i64,
    /// True once the countdown has reached zero.
    pub iniciado: bool,
}

/// A one-second countdown.
///
/// Once it reaches zero it reports `iniciado` and further ticks leave it at
/// zero.
#[derive(Debug, Clone)]
pub struct Countdown {
    remaining_secs: i64,
}

impl Countdown {
    pub fn new(target: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self {
            remaining_secs: (target - now).num_seconds().max(0),
        }
    }

    pub fn from_secs(remaining_secs: i64) -> Self {
        Self {
            remaining_secs: remaining_secs.max(0),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.remaining_secs == 0
    }

    /// Advance by one second.
    pub fn tick(&mut self) -> CountdownView {
        if self.remaining_secs > 0 {
            self.remaining_secs -= 1;
        }
        self.view()
    }

    pub fn view(&self) -> CountdownView {
        let s = self.remaining_secs;
        CountdownView {
            dias: s / 86_400,
            horas: (s % 86_400) / 3_600,
            minutos: (s % 3_600) / 60,
            segundos: s % 60,
            iniciado: self.is_finished(),
        }
    }
}
