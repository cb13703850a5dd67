//! Scenario catalog run against the session store and a simulated service.
use std::time::Duration;

use anyhow::{Context, Result, bail, ensure};
use clicker_core::{MemoryStorage, SessionStore, StoreError, StoreOptions, ValidationError};
use serde_json::json;

use crate::remote::SimulatedRemote;

type TestStore = SessionStore<SimulatedRemote, MemoryStorage>;

const USER: &str = "u1";

/// Per-iteration inputs.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioCtx {
    pub iteration: usize,
    pub latency: Duration,
}

impl ScenarioCtx {
    /// Click burst size; grows with the iteration so runs do not repeat.
    fn clicks(&self) -> u64 {
        5 + u64::try_from(self.iteration).unwrap_or(0)
    }

    fn store(&self) -> TestStore {
        self.store_with(MemoryStorage::new(), StoreOptions::default())
    }

    fn store_with(&self, storage: MemoryStorage, options: StoreOptions) -> TestStore {
        SessionStore::new(SimulatedRemote::new(self.latency), storage, options)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    Smoke,
    FetchBalance,
    FetchFailure,
    MissingUserGuard,
    ClickCounting,
    FlushSuccess,
    FailureConservation,
    InFlightClicks,
    OverlappingFlush,
    CancelledFlush,
    ReloadPersistence,
    DevModeSetter,
}

impl Scenario {
    pub const ALL: [Self; 12] = [
        Self::Smoke,
        Self::FetchBalance,
        Self::FetchFailure,
        Self::MissingUserGuard,
        Self::ClickCounting,
        Self::FlushSuccess,
        Self::FailureConservation,
        Self::InFlightClicks,
        Self::OverlappingFlush,
        Self::CancelledFlush,
        Self::ReloadPersistence,
        Self::DevModeSetter,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            Self::Smoke => "smoke",
            Self::FetchBalance => "fetch-balance",
            Self::FetchFailure => "fetch-failure",
            Self::MissingUserGuard => "missing-user-guard",
            Self::ClickCounting => "click-counting",
            Self::FlushSuccess => "flush-success",
            Self::FailureConservation => "failure-conservation",
            Self::InFlightClicks => "in-flight-clicks",
            Self::OverlappingFlush => "overlapping-flush",
            Self::CancelledFlush => "cancelled-flush",
            Self::ReloadPersistence => "reload-persistence",
            Self::DevModeSetter => "dev-mode-setter",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Smoke => "5 clicks for u1 are flushed and become the balance",
            Self::FetchBalance => "Balance read stores the server value and clears loading",
            Self::FetchFailure => "Failed read sets the error flag and keeps the old balance",
            Self::MissingUserGuard => "Blank or missing id never reaches the network",
            Self::ClickCounting => "Click count tracks taps and resets to zero",
            Self::FlushSuccess => "Confirmed flush empties the queue and adopts the server balance",
            Self::FailureConservation => "Failed flush restores its batch next to newer clicks",
            Self::InFlightClicks => "Clicks made during a flush wait for the next one",
            Self::OverlappingFlush => "Concurrent flushes never send the same click twice",
            Self::CancelledFlush => "Abandoned flush puts its batch back in the queue",
            Self::ReloadPersistence => "Unsent clicks survive a reload and are delivered after it",
            Self::DevModeSetter => "Direct balance writes only work in development mode",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|scenario| scenario.key() == key)
    }

    pub async fn run(self, ctx: &ScenarioCtx) -> Result<()> {
        match self {
            Self::Smoke => smoke(ctx).await,
            Self::FetchBalance => fetch_balance(ctx).await,
            Self::FetchFailure => fetch_failure(ctx).await,
            Self::MissingUserGuard => missing_user_guard(ctx).await,
            Self::ClickCounting => click_counting(ctx),
            Self::FlushSuccess => flush_success(ctx).await,
            Self::FailureConservation => failure_conservation(ctx).await,
            Self::InFlightClicks => in_flight_clicks(ctx).await,
            Self::OverlappingFlush => overlapping_flush(ctx).await,
            Self::CancelledFlush => cancelled_flush(ctx).await,
            Self::ReloadPersistence => reload_persistence(ctx).await,
            Self::DevModeSetter => dev_mode_setter(ctx),
        }
    }
}

fn sign_in(store: &TestStore) -> Result<()> {
    store
        .set_user(&json!({ "id": USER, "first_name": "Tester" }))
        .context("setting the user")
}

fn tap(store: &TestStore, clicks: u64) {
    for _ in 0..clicks {
        store.record_click();
    }
}

fn expect_counts(store: &TestStore, pending: u64, click_count: u64) -> Result<()> {
    ensure!(
        store.pending_clicks() == pending,
        "pending clicks {} (expected {pending})",
        store.pending_clicks()
    );
    ensure!(
        store.click_count() == click_count,
        "click count {} (expected {click_count})",
        store.click_count()
    );
    Ok(())
}

async fn smoke(ctx: &ScenarioCtx) -> Result<()> {
    let store = ctx.store();
    sign_in(&store)?;
    tap(&store, 5);
    expect_counts(&store, 5, 5)?;

    let reply = store.send_clicks(Some(USER)).await?;
    ensure!(reply == Some(5), "flush answered {reply:?}");
    ensure!(store.balance() == 5, "balance {}", store.balance());
    expect_counts(&store, 0, 0)
}

async fn fetch_balance(ctx: &ScenarioCtx) -> Result<()> {
    let store = ctx.store();
    let expected = 1_000 + ctx.clicks() * 7;
    store.api().seed_balance(USER, expected);

    let balance = store.fetch_balance(Some(USER)).await?;
    ensure!(balance == expected, "fetch returned {balance}");
    ensure!(store.balance() == expected, "stored {}", store.balance());
    ensure!(!store.is_loading(), "loading still set");
    ensure!(store.error().is_none(), "unexpected error {:?}", store.error());
    Ok(())
}

async fn fetch_failure(ctx: &ScenarioCtx) -> Result<()> {
    let store = ctx.store();
    store.api().seed_balance(USER, 40);
    store.fetch_balance(Some(USER)).await?;

    store.api().fail_reads(1);
    match store.fetch_balance(Some(USER)).await {
        Err(StoreError::Transport(_)) => {}
        other => bail!("failed read answered {other:?}"),
    }
    ensure!(store.balance() == 40, "balance changed to {}", store.balance());
    ensure!(!store.is_loading(), "loading left set after failure");
    ensure!(store.error().is_some(), "no error recorded");

    store.fetch_balance(Some(USER)).await?;
    ensure!(store.error().is_none(), "error not cleared by the next read");
    Ok(())
}

async fn missing_user_guard(ctx: &ScenarioCtx) -> Result<()> {
    let store = ctx.store();
    store.api().seed_balance(USER, 99);
    tap(&store, ctx.clicks());

    for id in [None, Some(""), Some("   ")] {
        let outcome = store.fetch_balance(id).await;
        ensure!(
            outcome == Err(StoreError::Validation(ValidationError::MissingUserId)),
            "fetch with {id:?} answered {outcome:?}"
        );
    }
    ensure!(
        store.error().as_deref() == Some("User ID is required"),
        "error flag {:?}",
        store.error()
    );
    ensure!(store.balance() == 0, "balance changed to {}", store.balance());

    let flushed = store.send_clicks(None).await?;
    ensure!(flushed.is_none(), "flush without id answered {flushed:?}");
    ensure!(
        store.api().balance_calls() == 0 && store.api().add_calls() == 0,
        "network was called"
    );
    expect_counts(&store, ctx.clicks(), ctx.clicks())
}

fn click_counting(ctx: &ScenarioCtx) -> Result<()> {
    let store = ctx.store();
    let clicks = ctx.clicks();
    tap(&store, clicks);
    expect_counts(&store, clicks, clicks)?;
    ensure!(store.display_balance() == clicks, "display balance");

    store.reset_click_count();
    ensure!(store.click_count() == 0, "first reset");
    store.reset_click_count();
    ensure!(store.click_count() == 0, "second reset");
    ensure!(store.pending_clicks() == clicks, "reset touched the queue");
    Ok(())
}

async fn flush_success(ctx: &ScenarioCtx) -> Result<()> {
    let store = ctx.store();
    sign_in(&store)?;
    store.api().seed_balance(USER, 100);
    let clicks = ctx.clicks();
    tap(&store, clicks);

    let reply = store.send_clicks(Some(USER)).await?;
    ensure!(reply == Some(100 + clicks), "flush answered {reply:?}");
    ensure!(store.balance() == 100 + clicks, "balance {}", store.balance());
    ensure!(store.display_balance() == store.balance(), "display drifted");
    ensure!(store.api().clicks_received() == clicks, "server count");
    expect_counts(&store, 0, 0)
}

async fn failure_conservation(ctx: &ScenarioCtx) -> Result<()> {
    let store = ctx.store();
    sign_in(&store)?;
    tap(&store, 5);
    store.api().fail_writes(1);

    let (outcome, ()) = tokio::join!(store.send_clicks(Some(USER)), async {
        tokio::task::yield_now().await;
        tap(&store, 3);
    });
    ensure!(outcome.is_err(), "flush should have failed");
    expect_counts(&store, 8, 8)?;
    ensure!(store.display_balance() == 8, "display {}", store.display_balance());
    ensure!(store.error().is_none(), "flush failure set the error flag");
    ensure!(!store.is_flushing(), "flush still marked in flight");

    let reply = store.send_clicks(Some(USER)).await?;
    ensure!(reply == Some(8), "retry answered {reply:?}");
    expect_counts(&store, 0, 0)
}

async fn in_flight_clicks(ctx: &ScenarioCtx) -> Result<()> {
    let store = ctx.store();
    sign_in(&store)?;
    tap(&store, 5);

    let (outcome, ()) = tokio::join!(store.send_clicks(Some(USER)), async {
        tokio::task::yield_now().await;
        tap(&store, 3);
    });
    ensure!(outcome? == Some(5), "server saw more than the batch");
    ensure!(store.balance() == 5, "balance {}", store.balance());
    ensure!(store.display_balance() == 8, "display {}", store.display_balance());
    expect_counts(&store, 3, 3)
}

async fn overlapping_flush(ctx: &ScenarioCtx) -> Result<()> {
    let store = ctx.store();
    sign_in(&store)?;
    let clicks = ctx.clicks();
    tap(&store, clicks);

    let (first, second) = tokio::join!(
        store.send_clicks(Some(USER)),
        store.send_clicks(Some(USER))
    );
    ensure!(first? == Some(clicks), "first flush");
    ensure!(second?.is_none(), "second flush sent a duplicate batch");
    ensure!(store.api().add_calls() == 1, "{} requests", store.api().add_calls());
    ensure!(store.api().clicks_received() == clicks, "server count");
    expect_counts(&store, 0, 0)
}

async fn cancelled_flush(ctx: &ScenarioCtx) -> Result<()> {
    let slow = ScenarioCtx {
        latency: ctx.latency.max(Duration::from_millis(50)),
        ..*ctx
    };
    let store = slow.store();
    sign_in(&store)?;
    let clicks = ctx.clicks();
    tap(&store, clicks);

    let abandoned =
        tokio::time::timeout(Duration::from_millis(5), store.send_clicks(Some(USER))).await;
    ensure!(abandoned.is_err(), "slow flush finished early");
    ensure!(!store.is_flushing(), "abandoned flush still in flight");
    ensure!(store.api().clicks_received() == 0, "server recorded clicks");
    expect_counts(&store, clicks, clicks)?;

    let reply = store.send_clicks(Some(USER)).await?;
    ensure!(reply == Some(clicks), "resend answered {reply:?}");
    expect_counts(&store, 0, 0)
}

async fn reload_persistence(ctx: &ScenarioCtx) -> Result<()> {
    let storage = MemoryStorage::new();
    let clicks = ctx.clicks();
    {
        let store = ctx.store_with(storage.clone(), StoreOptions::default());
        sign_in(&store)?;
        store.api().seed_balance(USER, 20);
        store.fetch_balance(Some(USER)).await?;
        tap(&store, clicks);
    }

    let reloaded = ctx.store_with(storage, StoreOptions::default());
    ensure!(reloaded.hydrate()?, "nothing was saved");
    ensure!(reloaded.user_id().as_deref() == Some(USER), "user lost");
    ensure!(reloaded.balance() == 20, "balance {}", reloaded.balance());
    expect_counts(&reloaded, clicks, clicks)?;
    ensure!(reloaded.display_balance() == 20 + clicks, "display");

    reloaded.api().seed_balance(USER, 20);
    let reply = reloaded.send_clicks(Some(USER)).await?;
    ensure!(reply == Some(20 + clicks), "delivery after reload answered {reply:?}");
    expect_counts(&reloaded, 0, 0)
}

fn dev_mode_setter(ctx: &ScenarioCtx) -> Result<()> {
    let store = ctx.store();
    ensure!(
        store.set_balance(42) == Err(StoreError::ReadOnly),
        "setter accepted outside development mode"
    );
    ensure!(store.balance() == 0, "balance changed");

    let dev = ctx.store_with(
        MemoryStorage::new(),
        StoreOptions {
            dev_mode: true,
            ..StoreOptions::default()
        },
    );
    dev.set_balance(42)?;
    ensure!(dev.balance() == 42, "balance {}", dev.balance());
    Ok(())
}
