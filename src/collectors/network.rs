use crate::models::RawStatsSample;
use humansize::{format_size, BINARY};
use log::{debug, trace};
use std::collections::BTreeMap;
use std::future::Future;
use std::io;
use std::sync::Mutex;
use std::time::Instant;
use systemstat::{Network, Platform, System};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CollectError {
    #[error("network statistics unavailable: {0}")]
    Io(#[from] io::Error),

    #[error("no matching network interface (wanted: {0})")]
    NoInterfaces(String),

    #[error("stats provider failed: {0}")]
    Provider(String),
}

/// Source of network throughput samples.
pub trait StatsProvider: Send + Sync + 'static {
    fn sample(&self) -> impl Future<Output = Result<RawStatsSample, CollectError>> + Send;
}

#[derive(Debug, Clone, Copy)]
struct Baseline {
    rx_bytes: u64,
    tx_bytes: u64,
    taken_at: Instant,
}

/// Reads interface byte counters through `systemstat` and turns them into
/// per-second rates relative to the previous call.
///
/// The first call has nothing to compare against and reports NaN rates.
pub struct SystemStatProvider {
    sys: System,
    interfaces: Vec<String>,
    previous: Mutex<Option<Baseline>>,
}

impl SystemStatProvider {
    /// `interfaces` restricts which interfaces are summed; empty means every
    /// non-loopback interface.
    pub fn new(interfaces: Vec<String>) -> Self {
        Self {
            sys: System::new(),
            interfaces,
            previous: Mutex::new(None),
        }
    }

    fn read_counters(&self) -> Result<(u64, u64), CollectError> {
        let start = Instant::now();
        let networks = self.sys.networks()?;
        let selected = select_interfaces(&networks, &self.interfaces);
        if selected.is_empty() {
            return Err(CollectError::NoInterfaces(self.interfaces.join(",")));
        }

        let mut rx_bytes = 0u64;
        let mut tx_bytes = 0u64;
        for name in selected {
            match self.sys.network_stats(name) {
                Ok(stats) => {
                    rx_bytes = rx_bytes.saturating_add(stats.rx_bytes.as_u64());
                    tx_bytes = tx_bytes.saturating_add(stats.tx_bytes.as_u64());
                }
                Err(x) => debug!("Skipping interface {}: {}", name, x),
            }
        }

        debug!("read_counters took: {} ms", start.elapsed().as_millis());
        Ok((rx_bytes, tx_bytes))
    }
}

impl StatsProvider for SystemStatProvider {
    async fn sample(&self) -> Result<RawStatsSample, CollectError> {
        let (rx_bytes, tx_bytes) = self.read_counters()?;
        let current = Baseline {
            rx_bytes,
            tx_bytes,
            taken_at: Instant::now(),
        };

        let previous = self
            .previous
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .replace(current);

        let sample = match previous {
            Some(previous) => rates_between(&previous, &current),
            None => RawStatsSample::new(f64::NAN, f64::NAN),
        };
        trace!(
            "total rx {} tx {}, rate rx {:.0} B/s tx {:.0} B/s",
            format_size(rx_bytes, BINARY),
            format_size(tx_bytes, BINARY),
            sample.rx_sec,
            sample.tx_sec
        );
        Ok(sample)
    }
}

fn select_interfaces<'a>(networks: &'a BTreeMap<String, Network>, allowed: &[String]) -> Vec<&'a str> {
    networks
        .values()
        .map(|net| net.name.as_str())
        .filter(|name| {
            if allowed.is_empty() {
                !is_loopback(name)
            } else {
                allowed.iter().any(|a| a == name)
            }
        })
        .collect()
}

fn is_loopback(name: &str) -> bool {
    name == "lo" || name == "lo0"
}

// Counter resets yield a negative rate, which the display transform clamps.
fn rates_between(previous: &Baseline, current: &Baseline) -> RawStatsSample {
    let secs = current.taken_at.duration_since(previous.taken_at).as_secs_f64();
    if secs <= 0.0 {
        return RawStatsSample::new(f64::NAN, f64::NAN);
    }
    RawStatsSample::new(
        (current.rx_bytes as f64 - previous.rx_bytes as f64) / secs,
        (current.tx_bytes as f64 - previous.tx_bytes as f64) / secs,
    )
}
