//! Measurement history view-model
//!
//! Fetches the session user's measurement entries in creation order and
//! appends confirmed submissions without re-fetching the collection. Chart
//! series are derived lazily from the loaded entries, never stored.

use crate::error::{AppError, Result};
use crate::forms::MeasurementForm;
use crate::gateway::records::NewMeasurement;
use crate::gateway::Records;
use crate::models::{MeasurementEntry, Metric};
use crate::session::Session;
use crate::vm::LoadState;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::warn;

pub struct MeasurementHistory {
    session: Arc<Session>,
    records: Records,
    state: LoadState<Vec<MeasurementEntry>>,
}

impl MeasurementHistory {
    pub fn new(session: Arc<Session>, records: Records) -> Self {
        Self {
            session,
            records,
            state: LoadState::Idle,
        }
    }

    pub fn state(&self) -> &LoadState<Vec<MeasurementEntry>> {
        &self.state
    }

    /// Fetch the full history for the session user, oldest first.
    pub async fn load(&mut self) {
        let Some(user) = self.session.current_user() else {
            self.state = LoadState::Failed("sign in to see your measurements".to_string());
            return;
        };

        self.state = LoadState::Loading;
        match self.records.measurements_for(user.id).await {
            Ok(entries) => self.state = LoadState::Ready(entries),
            Err(err) => {
                warn!(owner = %user.id, "measurement fetch failed: {err}");
                self.state = LoadState::Failed("could not load measurements".to_string());
            }
        }
    }

    /// Validate and persist one measurement entry. The entry appears in the
    /// history only after the gateway confirms it, appended in creation
    /// order; a failure leaves the loaded history untouched.
    pub async fn submit(&mut self, form: &MeasurementForm) -> Result<MeasurementEntry> {
        let input = form.validate()?;
        let user = self
            .session
            .current_user()
            .ok_or_else(|| AppError::Forbidden("sign in required".to_string()))?;

        let entry = self
            .records
            .insert_measurement(NewMeasurement {
                owner_id: user.id,
                height: input.height,
                weight: input.weight,
                arm: input.arm,
                legs: input.legs,
                waist: input.waist,
                abdomen: input.abdomen,
                calf: input.calf,
                back: input.back,
                torso: input.torso,
            })
            .await?;

        if let Some(entries) = self.state.ready_mut() {
            entries.push(entry.clone());
        }
        Ok(entry)
    }

    /// Chart series for one metric over the loaded history: a restartable
    /// projection over entries that carry the metric.
    pub fn series(&self, metric: Metric) -> Vec<(DateTime<Utc>, f64)> {
        self.state
            .ready()
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| entry.metric(metric).map(|v| (entry.created_at, v)))
                    .collect()
            })
            .unwrap_or_default()
    }
}
