//! In-process stand-in for the balance service.
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::time::Duration;

use clicker_core::{
    AddClicksRequest, AddClicksResponse, BalanceApi, BalanceRequest, BalanceResponse,
    TransportError,
};

/// Keeps a balance ledger per user and can be told to fail upcoming calls.
///
/// Every call yields to the scheduler at least once, so callers can interleave
/// work with a request that is still pending.
#[derive(Debug, Default)]
pub struct SimulatedRemote {
    ledger: RefCell<HashMap<String, u64>>,
    latency: Duration,
    failing_reads: Cell<u32>,
    failing_writes: Cell<u32>,
    balance_calls: Cell<u32>,
    add_calls: Cell<u32>,
    clicks_received: Cell<u64>,
}

impl SimulatedRemote {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            ..Self::default()
        }
    }

    pub fn seed_balance(&self, user_id: &str, balance: u64) {
        self.ledger.borrow_mut().insert(user_id.to_string(), balance);
    }

    pub fn balance_of(&self, user_id: &str) -> u64 {
        self.ledger.borrow().get(user_id).copied().unwrap_or(0)
    }

    /// The next `count` balance reads answer with a server error.
    pub fn fail_reads(&self, count: u32) {
        self.failing_reads.set(count);
    }

    /// The next `count` click submissions answer with a server error.
    pub fn fail_writes(&self, count: u32) {
        self.failing_writes.set(count);
    }

    pub fn balance_calls(&self) -> u32 {
        self.balance_calls.get()
    }

    pub fn add_calls(&self) -> u32 {
        self.add_calls.get()
    }

    pub fn clicks_received(&self) -> u64 {
        self.clicks_received.get()
    }

    async fn respond(&self) {
        if self.latency.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(self.latency).await;
        }
    }
}

fn take_failure(counter: &Cell<u32>) -> Option<TransportError> {
    let left = counter.get();
    if left == 0 {
        return None;
    }
    counter.set(left - 1);
    Some(TransportError::Status {
        status: 500,
        status_text: "Internal Server Error".into(),
    })
}

#[async_trait::async_trait(?Send)]
impl BalanceApi for SimulatedRemote {
    async fn get_balance(
        &self,
        request: &BalanceRequest,
    ) -> Result<BalanceResponse, TransportError> {
        self.balance_calls.set(self.balance_calls.get() + 1);
        self.respond().await;
        if let Some(err) = take_failure(&self.failing_reads) {
            return Err(err);
        }
        Ok(BalanceResponse {
            balance: self.balance_of(&request.user_id),
        })
    }

    async fn add_clicks(
        &self,
        request: &AddClicksRequest,
    ) -> Result<AddClicksResponse, TransportError> {
        self.add_calls.set(self.add_calls.get() + 1);
        self.respond().await;
        if let Some(err) = take_failure(&self.failing_writes) {
            return Err(err);
        }
        self.clicks_received
            .set(self.clicks_received.get() + request.clicks);
        let mut ledger = self.ledger.borrow_mut();
        let balance = ledger.entry(request.user_id.clone()).or_insert(0);
        *balance += request.clicks;
        log::trace!("{} now at {}", request.user_id, *balance);
        Ok(AddClicksResponse {
            new_balance: *balance,
        })
    }
}
