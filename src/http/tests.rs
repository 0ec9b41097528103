use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use super::test_server::{refused_url, spawn_stub_server};
use super::*;
use crate::args::TesterArgs;
use crate::config::LoadPlan;
use crate::error::{RequestError, RunError};
use crate::metrics::{StatsCollector, Summary};
use crate::shutdown_handlers::shutdown_channel;
use crate::template::Entropy;

const CANCEL_SETTLE: Duration = Duration::from_millis(200);
const SLOW_RESPONSE: Duration = Duration::from_millis(1500);

fn run_async_test<F>(future: F) -> Result<(), String>
where
    F: Future<Output = Result<(), String>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("Failed to build runtime: {}", err))?;
    runtime.block_on(future)
}

fn plan(argv: &[&str]) -> Result<Arc<LoadPlan>, String> {
    let args = TesterArgs::try_parse_from(argv).map_err(|err| format!("CLI parse failed: {}", err))?;
    LoadPlan::from_args_with_entropy(&args, &Arc::new(Entropy::seeded(3)))
        .map(Arc::new)
        .map_err(|err| format!("Plan failed: {}", err))
}

async fn run_to_summary(plan: Arc<LoadPlan>) -> Result<Summary, String> {
    let pool = LoadPool::new(plan).map_err(|err| err.to_string())?;
    let stats = Arc::new(StatsCollector::new(pool.plan().num_requests));
    let (_shutdown_tx, shutdown_rx) = shutdown_channel();
    pool.run(shutdown_rx, Arc::clone(&stats))
        .await
        .map_err(|err| format!("Unexpected run error: {}", err))?;
    Ok(stats.summary())
}

#[test]
fn pool_records_every_dispatched_request() -> Result<(), String> {
    run_async_test(async {
        let server = spawn_stub_server()?;
        let url = format!("{}/items/{{{{$sequence}}}}", server.base_url);
        let plan = plan(&["volley", "-u", url.as_str(), "-n", "37", "-c", "5"])?;
        let summary = run_to_summary(plan).await?;

        if summary.total_requests != 37 || summary.success_count != 37 {
            return Err(format!("Expected 37 successes, got {:?}", summary));
        }
        if summary.status_codes.get(&200) != Some(&37) {
            return Err(format!("Unexpected histogram: {:?}", summary.status_codes));
        }
        if summary.total_bytes != 74 {
            return Err(format!("Expected 2 bytes per response, got {}", summary.total_bytes));
        }

        let paths: BTreeSet<String> = server.seen().into_iter().map(|seen| seen.path).collect();
        let expected: BTreeSet<String> = (0..37).map(|index| format!("/items/{}", index)).collect();
        if paths != expected {
            return Err(format!("Each index must be requested once, saw {:?}", paths));
        }
        Ok(())
    })
}

#[test]
fn result_count_does_not_depend_on_concurrency() -> Result<(), String> {
    run_async_test(async {
        let server = spawn_stub_server()?;
        for concurrency in ["1", "3", "64"] {
            let plan = plan(&["volley", "-u", server.base_url.as_str(), "-n", "11", "-c", concurrency])?;
            let summary = run_to_summary(plan).await?;
            if summary.total_requests != 11 {
                return Err(format!(
                    "Concurrency {} recorded {} results",
                    concurrency, summary.total_requests
                ));
            }
        }
        Ok(())
    })
}

#[test]
fn non_success_status_is_recorded_data() -> Result<(), String> {
    run_async_test(async {
        let server = spawn_stub_server()?;
        let url = format!("{}/status/503", server.base_url);
        let summary = run_to_summary(plan(&["volley", "-u", url.as_str(), "-n", "4", "-c", "2"])?).await?;

        if summary.success_count != 4 || summary.fail_count != 0 {
            return Err(format!("503 must not count as a failure: {:?}", summary));
        }
        if summary.sorted_status_codes() != [(503, 4)] {
            return Err(format!("Unexpected histogram: {:?}", summary.status_codes));
        }
        Ok(())
    })
}

#[test]
fn connection_refused_is_an_error_without_status() -> Result<(), String> {
    run_async_test(async {
        let url = refused_url()?;
        let summary = run_to_summary(plan(&[
            "volley", "-u", url.as_str(), "-n", "3", "-c", "1", "--timeout", "2s",
        ])?)
        .await?;

        if summary.fail_count != 3 || summary.success_count != 0 {
            return Err(format!("Expected 3 failures, got {:?}", summary));
        }
        if !summary.status_codes.is_empty() {
            return Err(format!("Failures must not reach the histogram: {:?}", summary.status_codes));
        }
        if summary.errors.len() != 3 || summary.total_bytes != 0 {
            return Err(format!("Unexpected error sample: {:?}", summary.errors));
        }
        Ok(())
    })
}

#[test]
fn post_sends_rendered_body_and_headers() -> Result<(), String> {
    run_async_test(async {
        let server = spawn_stub_server()?;
        let plan = plan(&[
            "volley",
            "-u",
            server.base_url.as_str(),
            "-X",
            "post",
            "-n",
            "3",
            "-c",
            "1",
            "-H",
            "X-Run: smoke",
            "-H",
            "Content-Type: application/json",
            "-d",
            "{\"n\":{{$sequence(10)}}}",
        ])?;
        run_to_summary(plan).await?;

        let seen = server.seen();
        let bodies: BTreeSet<String> = seen.iter().map(|request| request.body.clone()).collect();
        let expected: BTreeSet<String> = ["{\"n\":10}", "{\"n\":11}", "{\"n\":12}"]
            .into_iter()
            .map(str::to_owned)
            .collect();
        if bodies != expected {
            return Err(format!("Unexpected bodies: {:?}", bodies));
        }
        for request in &seen {
            if request.method != "POST" {
                return Err(format!("Unexpected method: {}", request.method));
            }
            if request.header("x-run") != Some("smoke")
                || request.header("content-type") != Some("application/json")
            {
                return Err(format!("Missing custom headers: {:?}", request.headers));
            }
            if request.header("user-agent") != Some(DEFAULT_USER_AGENT) {
                return Err(format!("Unexpected user agent: {:?}", request.header("user-agent")));
            }
        }
        Ok(())
    })
}

#[test]
fn get_never_sends_a_body() -> Result<(), String> {
    run_async_test(async {
        let server = spawn_stub_server()?;
        let plan = plan(&["volley", "-u", server.base_url.as_str(), "-n", "2", "-d", "payload"])?;
        run_to_summary(plan).await?;

        for request in server.seen() {
            if request.method != "GET" || !request.body.is_empty() {
                return Err(format!("Unexpected request: {:?}", request));
            }
        }
        Ok(())
    })
}

#[test]
fn custom_user_agent_overrides_default() -> Result<(), String> {
    run_async_test(async {
        let server = spawn_stub_server()?;
        let plan = plan(&[
            "volley",
            "-u",
            server.base_url.as_str(),
            "-n",
            "1",
            "-H",
            "User-Agent: {{$randomUA}}",
        ])?;
        run_to_summary(plan).await?;

        let seen = server.seen();
        let agent = seen
            .first()
            .and_then(|request| request.header("user-agent"))
            .ok_or_else(|| "Missing request".to_owned())?;
        if agent != "{{$randomUA}}" {
            return Err(format!("Headers are sent verbatim, got {}", agent));
        }
        Ok(())
    })
}

#[test]
fn unbuildable_request_is_recorded_with_zero_duration() -> Result<(), String> {
    run_async_test(async {
        let server = spawn_stub_server()?;
        let plan = plan(&["volley", "-u", server.base_url.as_str(), "-n", "2", "-H", "X-Bad: a\nb"])?;
        let summary = run_to_summary(plan).await?;

        if summary.fail_count != 2 || !summary.max_duration.is_zero() {
            return Err(format!("Expected zero-duration failures, got {:?}", summary));
        }
        if !summary
            .errors
            .iter()
            .all(|message| message.starts_with("building request"))
        {
            return Err(format!("Unexpected errors: {:?}", summary.errors));
        }
        if !server.seen().is_empty() {
            return Err("Nothing should reach the server".to_owned());
        }
        Ok(())
    })
}

#[test]
fn request_timeout_is_reported() -> Result<(), String> {
    run_async_test(async {
        let server = spawn_stub_server()?;
        let url = format!("{}/slow", server.base_url);
        let summary = run_to_summary(plan(&["volley", "-u", url.as_str(), "-n", "1", "--timeout", "100ms"])?)
            .await?;

        let message = summary
            .errors
            .first()
            .ok_or_else(|| format!("Expected a timeout error, got {:?}", summary))?;
        if !message.starts_with("request timed out") {
            return Err(format!("Unexpected error: {}", message));
        }
        Ok(())
    })
}

#[test]
fn shutdown_before_dispatch_records_nothing() -> Result<(), String> {
    run_async_test(async {
        let server = spawn_stub_server()?;
        let pool = LoadPool::new(plan(&["volley", "-u", server.base_url.as_str(), "-n", "50"])?)
            .map_err(|err| err.to_string())?;
        let stats = Arc::new(StatsCollector::new(50));
        let (shutdown_tx, shutdown_rx) = shutdown_channel();
        shutdown_tx
            .send(())
            .map_err(|err| format!("send failed: {}", err))?;

        match pool.run(shutdown_rx, Arc::clone(&stats)).await {
            Err(RunError::Cancelled {
                dispatched: 0,
                requested: 50,
            }) => {}
            other => return Err(format!("Expected cancellation, got {:?}", other)),
        }
        let summary = stats.summary();
        if summary.total_requests != 0 {
            return Err(format!("Expected no results, got {}", summary.total_requests));
        }
        Ok(())
    })
}

#[test]
fn shutdown_mid_dispatch_records_every_dispatched_job() -> Result<(), String> {
    run_async_test(async {
        let server = spawn_stub_server()?;
        let url = format!("{}/slow", server.base_url);
        let pool = LoadPool::new(plan(&["volley", "-u", url.as_str(), "-n", "50", "-c", "1"])?)
            .map_err(|err| err.to_string())?;
        let stats = Arc::new(StatsCollector::new(50));
        let (shutdown_tx, shutdown_rx) = shutdown_channel();

        let started = tokio::time::Instant::now();
        let run = pool.run(shutdown_rx, Arc::clone(&stats));
        let trigger = async {
            tokio::time::sleep(CANCEL_SETTLE).await;
            drop(shutdown_tx.send(()));
        };
        let (outcome, ()) = tokio::join!(run, trigger);

        let dispatched = match outcome {
            Err(RunError::Cancelled {
                dispatched,
                requested: 50,
            }) => dispatched,
            other => return Err(format!("Expected cancellation, got {:?}", other)),
        };
        if dispatched == 0 || dispatched >= 50 {
            return Err(format!("Unexpected dispatch count: {}", dispatched));
        }
        let summary = stats.summary();
        if summary.total_requests != dispatched {
            return Err(format!(
                "Dispatched {} jobs but recorded {}",
                dispatched, summary.total_requests
            ));
        }
        if summary.fail_count != dispatched
            || summary
                .errors
                .iter()
                .any(|message| message != "request cancelled")
        {
            return Err(format!("Expected cancelled results, got {:?}", summary));
        }
        if started.elapsed() >= SLOW_RESPONSE {
            return Err("In-flight request was not aborted".to_owned());
        }
        Ok(())
    })
}

#[test]
fn shutdown_after_full_dispatch_aborts_in_flight_but_succeeds() -> Result<(), String> {
    run_async_test(async {
        let server = spawn_stub_server()?;
        let url = format!("{}/slow", server.base_url);
        let pool = LoadPool::new(plan(&["volley", "-u", url.as_str(), "-n", "4", "-c", "2"])?)
            .map_err(|err| err.to_string())?;
        let stats = Arc::new(StatsCollector::new(4));
        let (shutdown_tx, shutdown_rx) = shutdown_channel();

        let started = tokio::time::Instant::now();
        let run = pool.run(shutdown_rx, Arc::clone(&stats));
        let trigger = async {
            tokio::time::sleep(CANCEL_SETTLE).await;
            drop(shutdown_tx.send(()));
        };
        let (outcome, ()) = tokio::join!(run, trigger);

        outcome.map_err(|err| format!("Every index was dispatched, got {}", err))?;
        let summary = stats.summary();
        if summary.total_requests != 4 || summary.fail_count != 4 {
            return Err(format!("Expected 4 cancelled results, got {:?}", summary));
        }
        if started.elapsed() >= SLOW_RESPONSE {
            return Err("In-flight requests were not aborted".to_owned());
        }
        Ok(())
    })
}

#[test]
fn cancel_while_draining_body_records_cancelled_error() -> Result<(), String> {
    run_async_test(async {
        let server = spawn_stub_server()?;
        let url = format!("{}/stall-body", server.base_url);
        let plan = plan(&["volley", "-u", url.as_str(), "-n", "1"])?;
        let client = build_client(&plan).map_err(|err| err.to_string())?;
        let executor = RequestExecutor::new(client, plan);
        let (cancel_tx, mut cancel_rx) = tokio::sync::watch::channel(false);

        let started = tokio::time::Instant::now();
        let canceller = tokio::spawn(async move {
            tokio::time::sleep(CANCEL_SETTLE).await;
            cancel_tx.send_replace(true);
        });
        let result = executor.execute(0, &mut cancel_rx).await;
        canceller
            .await
            .map_err(|err| format!("Cancel task failed: {}", err))?;

        if !matches!(result.error, Some(RequestError::Cancelled)) || result.status_code != 0 {
            return Err(format!("Expected a cancelled result, got {:?}", result));
        }
        if result.bytes_read != 0 {
            return Err(format!("Cancelled drain reported {} bytes", result.bytes_read));
        }
        if started.elapsed() >= SLOW_RESPONSE {
            return Err(format!("Drain was not interrupted: {:?}", started.elapsed()));
        }
        if server.seen().len() != 1 {
            return Err("The request should reach the server".to_owned());
        }
        Ok(())
    })
}
