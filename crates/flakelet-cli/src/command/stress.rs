use anyhow::{Context, anyhow, bail};
use portable_atomic::{AtomicBool, Ordering};
use std::{
    collections::HashSet,
    sync::mpsc,
    thread,
    time::{Duration, Instant},
};

use crate::config::{GeneratorConfig, Mode, StressConfig};

// Values generated per thread between checks of the deadline.
const BATCH: usize = 1024;

#[derive(Debug, Default)]
struct Report {
    generated: u64,
    prunes: u64,
    duplicate: Option<u64>,
    elapsed: Duration,
}

pub fn run(config: &GeneratorConfig, stress: &StressConfig) -> anyhow::Result<()> {
    tracing::info!(
        threads = stress.threads,
        duration_secs = stress.duration.as_secs(),
        mode = ?stress.mode,
        "starting stress run"
    );

    let report = match stress.mode {
        Mode::Shared => {
            let generator = config
                .builder()
                .build_atomic()
                .context("failed to create generator")?;
            tracing::info!(
                discriminator = generator.discriminator().get(),
                "sharing one generator across threads"
            );
            hammer(stress, || generator.next_timestamp())?
        }
        Mode::ThreadLocal => {
            if config.discriminator.is_some() {
                tracing::warn!("--discriminator is ignored in thread-local mode");
            }
            hammer(stress, flakelet::next_timestamp)?
        }
    };

    let per_sec = report.generated as f64 / report.elapsed.as_secs_f64().max(f64::EPSILON);
    tracing::info!(
        generated = report.generated,
        prunes = report.prunes,
        elapsed_ms = report.elapsed.as_millis() as u64,
        "stress run finished"
    );
    println!(
        "generated {} snowflakes in {:.2?} ({:.0}/s)",
        report.generated, report.elapsed, per_sec
    );

    if let Some(raw) = report.duplicate {
        bail!(
            "duplicate snowflake: {raw} ({})",
            flakelet::token::encode(raw)
        );
    }
    Ok(())
}

/// Calls `next` from `stress.threads` threads until the deadline passes or a
/// duplicate is seen.
///
/// Workers ship batches to the calling thread, which owns the seen-set and
/// clears it whenever it grows past `stress.prune_threshold`.
fn hammer<F>(stress: &StressConfig, next: F) -> anyhow::Result<Report>
where
    F: Fn() -> flakelet::Result<u64> + Sync,
{
    let stop = AtomicBool::new(false);
    let start = Instant::now();
    let deadline = start + stress.duration;
    let (tx, rx) = mpsc::sync_channel::<Vec<u64>>(stress.threads * 4);

    thread::scope(|s| {
        let handles: Vec<_> = (0..stress.threads)
            .map(|_| {
                let tx = tx.clone();
                let (next, stop) = (&next, &stop);
                s.spawn(move || {
                    let result = worker(next, stop, deadline, &tx);
                    if result.is_err() {
                        stop.store(true, Ordering::Relaxed);
                    }
                    result
                })
            })
            .collect();
        drop(tx);

        let mut report = Report::default();
        let mut seen = HashSet::with_capacity(stress.prune_threshold.min(1 << 20));
        for batch in rx {
            for raw in batch {
                if !seen.insert(raw) && report.duplicate.is_none() {
                    tracing::error!(raw, "duplicate snowflake");
                    report.duplicate = Some(raw);
                    stop.store(true, Ordering::Relaxed);
                }
                if seen.len() > stress.prune_threshold {
                    seen.clear();
                    report.prunes += 1;
                    tracing::debug!(prunes = report.prunes, "pruned seen-set");
                }
            }
        }

        for handle in handles {
            let generated = handle
                .join()
                .map_err(|_| anyhow!("stress worker panicked"))??;
            report.generated += generated;
        }
        report.elapsed = start.elapsed();
        Ok(report)
    })
}

fn worker<F>(
    next: &F,
    stop: &AtomicBool,
    deadline: Instant,
    tx: &mpsc::SyncSender<Vec<u64>>,
) -> anyhow::Result<u64>
where
    F: Fn() -> flakelet::Result<u64>,
{
    let mut generated = 0;
    let mut last = None;
    while !stop.load(Ordering::Relaxed) && Instant::now() < deadline {
        let mut batch = Vec::with_capacity(BATCH);
        for _ in 0..BATCH {
            let raw = next()?;
            if last.is_some_and(|last| raw <= last) {
                bail!("snowflake {raw} did not increase past {last:?} on one thread");
            }
            last = Some(raw);
            batch.push(raw);
        }
        generated += BATCH as u64;
        if tx.send(batch).is_err() {
            break;
        }
    }
    Ok(generated)
}
