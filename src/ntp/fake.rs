// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Scripted servers for the pool, runner and service tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::client::NtpQuery;
use super::packet::NtpMeasurement;
use crate::error::NtpError;

/// Fixed per-host answers; unknown hosts fail with a transport error.
#[derive(Debug, Default)]
pub(crate) struct FakeServers {
    answers: HashMap<String, Result<NtpMeasurement, NtpError>>,
    calls: AtomicUsize,
}

impl FakeServers {
    pub(crate) fn with(mut self, host: &str, offset_us: i64, delay_us: i64) -> Self {
        self.answers.insert(
            host.to_string(),
            Ok(NtpMeasurement {
                offset_us,
                delay_us,
                stratum: 2,
            }),
        );
        self
    }

    pub(crate) fn failing(mut self, host: &str, err: NtpError) -> Self {
        self.answers.insert(host.to_string(), Err(err));
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl NtpQuery for FakeServers {
    fn query(&self, host: &str, _port: u16) -> Result<NtpMeasurement, NtpError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.answers
            .get(host)
            .cloned()
            .unwrap_or(Err(NtpError::Transport {
                code: -1,
                message: "unknown host".into(),
            }))
    }
}
