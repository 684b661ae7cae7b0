use async_trait::async_trait;
use portsweep::config::RunConfig;
use portsweep::error::{ConfigError, ProbeError, ScanError};
use portsweep::scanner::{PortStatus, Prober, ScanOutcome, ScanReport, Scanner, Sleeper};
use portsweep::types::ScanUnit;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_test::assert_ok;

/// Accepts only the listed ports, answering with a fixed banner.
struct StubProber {
    open: HashSet<u16>,
    banner: Option<&'static str>,
    calls: AtomicUsize,
}

impl StubProber {
    fn new(open: &[u16], banner: Option<&'static str>) -> Self {
        Self {
            open: open.iter().copied().collect(),
            banner,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Prober for StubProber {
    async fn probe(&self, unit: &ScanUnit, _: Duration) -> Result<Option<String>, ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.open.contains(&unit.port.as_u16()) {
            Ok(self.banner.map(str::to_string))
        } else {
            Err(ProbeError::ConnectionRefused)
        }
    }
}

/// Counts sleeps without waiting.
#[derive(Default)]
struct InstantSleeper {
    sleeps: AtomicUsize,
}

#[async_trait]
impl Sleeper for InstantSleeper {
    async fn sleep(&self, _: Duration) {
        self.sleeps.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
    }
}

fn config(targets: &[&str], start: u16, end: u16, workers: usize) -> RunConfig {
    RunConfig::new(targets.iter().map(|t| t.to_string()).collect(), start, end)
        .with_workers(workers)
        .with_timeout(Duration::from_millis(100))
}

fn scanner(prober: Arc<StubProber>) -> Scanner {
    Scanner::new()
        .with_prober(prober)
        .with_sleeper(Arc::new(InstantSleeper::default()))
}

fn result_set(report: &ScanReport) -> HashSet<(String, u16, PortStatus, Option<String>)> {
    report
        .state()
        .results()
        .iter()
        .map(|o| (o.unit.host.clone(), o.unit.port.as_u16(), o.status, o.banner.clone()))
        .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn single_open_port_scenario() {
    let prober = Arc::new(StubProber::new(&[81], Some("ready")));
    let report = assert_ok!(scanner(prober).run(&config(&["127.0.0.1"], 80, 82, 2)).await);

    assert_eq!(report.total(), 3);
    assert_eq!(report.open_count(), 1);
    assert_eq!(report.closed_count(), 2);

    let results: Vec<&ScanOutcome> = report.sorted_results();
    let summary: Vec<(u16, PortStatus, Option<&str>)> = results
        .iter()
        .map(|o| (o.unit.port.as_u16(), o.status, o.banner.as_deref()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (80, PortStatus::Closed, None),
            (81, PortStatus::Open, Some("ready")),
            (82, PortStatus::Closed, None),
        ]
    );
    assert!(results.iter().all(|o| o.unit.host == "127.0.0.1"));
    assert_eq!(results[1].attempts, 1);
    assert_eq!(results[0].attempts, 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn totals_cover_every_target_and_port() {
    let prober = Arc::new(StubProber::new(&[22, 80], None));
    let targets = ["10.0.0.1", "10.0.0.2", "host.example"];
    let report = scanner(prober.clone())
        .run(&config(&targets, 1, 100, 16))
        .await
        .unwrap();

    let state = report.state();
    assert_eq!(state.total(), 300);
    assert_eq!(state.completed(), 300);
    assert_eq!(state.results().len(), 300);
    assert_eq!(state.open_count(), 6);
    assert_eq!(
        state.open_count(),
        state.results().iter().filter(|o| o.is_open()).count()
    );

    let units: HashSet<(String, u16)> = state
        .results()
        .iter()
        .map(|o| (o.unit.host.clone(), o.unit.port.as_u16()))
        .collect();
    assert_eq!(units.len(), 300, "no duplicated or missing units");

    // 6 opens take one call, the 294 closed take three
    assert_eq!(prober.calls.load(Ordering::SeqCst), 6 + 294 * 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn lossless_for_any_worker_count() {
    for workers in [1, 2, 7, 20, 40] {
        let prober = Arc::new(StubProber::new(&[5, 10, 15], None));
        let report = scanner(prober)
            .run(&config(&["127.0.0.1"], 1, 40, workers))
            .await
            .unwrap();

        assert_eq!(report.state().results().len(), 40, "workers = {}", workers);
        assert_eq!(report.open_count(), 3, "workers = {}", workers);
        assert!(report.state().is_complete());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn repeated_runs_are_deterministic() {
    let prober = Arc::new(StubProber::new(&[80], Some("HELLO")));
    let scanner = scanner(prober);
    let config = config(&["127.0.0.1", "::1"], 75, 85, 5);

    let first = scanner.run(&config).await.unwrap();
    let second = scanner.run(&config).await.unwrap();

    assert_eq!(first.open_count(), 2);
    assert_eq!(first.open_count(), second.open_count());
    assert_eq!(result_set(&first), result_set(&second));
    assert_eq!(first.records(), second.records());
}

#[tokio::test]
async fn single_port_range() {
    let prober = Arc::new(StubProber::new(&[443], None));
    let report = scanner(prober)
        .run(&config(&["10.0.0.1", "10.0.0.2"], 443, 443, 4))
        .await
        .unwrap();

    assert_eq!(report.total(), 2);
    assert_eq!(report.open_count(), 2);
}

#[tokio::test]
async fn more_workers_than_units() {
    let prober = Arc::new(StubProber::new(&[], None));
    let report = tokio::time::timeout(
        Duration::from_secs(10),
        scanner(prober).run(&config(&["10.0.0.1"], 1, 3, 100)),
    )
    .await
    .expect("scan must not deadlock")
    .unwrap();

    assert_eq!(report.total(), 3);
    assert_eq!(report.open_count(), 0);
}

#[tokio::test]
async fn queue_smaller_than_plan() {
    let prober = Arc::new(StubProber::new(&[1], None));
    let report = scanner(prober)
        .run(&config(&["10.0.0.1"], 1, 50, 3).with_queue_capacity(1))
        .await
        .unwrap();

    assert_eq!(report.state().completed(), 50);
}

#[tokio::test]
async fn fast_fail_skips_retries_for_refused() {
    let prober = Arc::new(StubProber::new(&[], None));
    let sleeper = Arc::new(InstantSleeper::default());
    let report = Scanner::new()
        .with_prober(prober.clone())
        .with_sleeper(sleeper.clone())
        .run(&config(&["10.0.0.1"], 1, 10, 2).with_fast_fail_refused(true))
        .await
        .unwrap();

    assert_eq!(report.closed_count(), 10);
    assert_eq!(prober.calls.load(Ordering::SeqCst), 10);
    assert_eq!(sleeper.sleeps.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn invalid_config_never_probes() {
    let cases = [
        (config(&["10.0.0.1"], 90, 80, 4), "range"),
        (config(&["10.0.0.1"], 1, 10, 0), "workers"),
        (config(&[], 1, 10, 4), "targets"),
    ];

    for (config, case) in cases {
        let prober = Arc::new(StubProber::new(&[], None));
        let err = scanner(prober.clone()).run(&config).await.unwrap_err();
        assert!(matches!(err, ScanError::Config(_)), "case {}", case);
        assert_eq!(prober.calls.load(Ordering::SeqCst), 0, "case {}", case);
    }

    let prober = Arc::new(StubProber::new(&[], None));
    let err = scanner(prober)
        .run(&config(&["10.0.0.1"], 1, 10, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, ScanError::Config(ConfigError::NoWorkers)));
}

/// Holds every connection for a fixed delay and tracks how many overlap.
struct SlowProber {
    delay: Duration,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl SlowProber {
    fn new(delay: Duration) -> Self {
        Self {
            delay,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Prober for SlowProber {
    async fn probe(&self, _: &ScanUnit, _: Duration) -> Result<Option<String>, ProbeError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(None)
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn workers_run_concurrently() {
    let prober = Arc::new(SlowProber::new(Duration::from_millis(200)));
    let report = Scanner::new()
        .with_prober(prober.clone())
        .run(&config(&["10.0.0.1"], 1, 8, 8))
        .await
        .unwrap();

    assert_eq!(report.open_count(), 8);
    assert!(prober.peak.load(Ordering::SeqCst) > 1);
    assert!(prober.peak.load(Ordering::SeqCst) <= 8);
    assert_eq!(prober.in_flight.load(Ordering::SeqCst), 0);
    assert!(report.duration() >= Duration::from_millis(200));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn in_flight_probes_never_exceed_workers() {
    let prober = Arc::new(SlowProber::new(Duration::from_millis(20)));
    let report = Scanner::new()
        .with_prober(prober.clone())
        .run(&config(&["10.0.0.1"], 1, 30, 3))
        .await
        .unwrap();

    assert_eq!(report.open_count(), 30);
    assert!(prober.peak.load(Ordering::SeqCst) <= 3);
}

#[tokio::test]
async fn real_tcp_listener_is_reported_open() {
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpListener;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        socket.write_all(b"220 ready\r\n").await.unwrap();
    });

    let report = Scanner::new()
        .run(&config(&["127.0.0.1"], port, port, 1).with_timeout(Duration::from_secs(2)))
        .await
        .unwrap();

    assert_eq!(report.open_count(), 1);
    let records = report.records();
    assert_eq!(records[0].port, port);
    assert_eq!(records[0].banner.as_deref(), Some("220 ready\r\n"));
}
