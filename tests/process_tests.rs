use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use cnippet::process::{
    ExecObserver, ExecOptions, ExecStatus, ProcessRunner, ToolCommand, FAILURE_SENTINEL,
};

fn sh(script: &str) -> ToolCommand {
    let mut cmd = ToolCommand::new("sh");
    cmd.args(["-c", script]);
    cmd
}

#[cfg(unix)]
#[test]
fn clean_exit_reports_code_zero() {
    let runner = ProcessRunner::new(ExecOptions::default());
    let status = runner.execute(&sh("exit 0"));

    assert_eq!(status, ExecStatus::Exited(0));
    assert!(status.success());
}

#[cfg(unix)]
#[test]
fn nonzero_exit_codes_pass_through_unmodified() {
    let runner = ProcessRunner::new(ExecOptions::default());
    let status = runner.execute(&sh("exit 7"));

    assert_eq!(status, ExecStatus::Exited(7));
    assert_eq!(status.code(), 7);
    assert!(!status.success());
}

#[test]
fn missing_executable_yields_spawn_failure_not_panic() {
    let runner = ProcessRunner::new(ExecOptions::default());
    let status = runner.execute(&ToolCommand::new("cnip-no-such-tool-on-any-path"));

    assert_eq!(status, ExecStatus::SpawnFailed);
    assert_eq!(status.code(), FAILURE_SENTINEL);
}

#[cfg(unix)]
#[test]
fn hung_process_is_killed_at_the_deadline() {
    let runner = ProcessRunner::new(ExecOptions {
        timeout: Some(Duration::from_millis(200)),
    });

    let start = Instant::now();
    let status = runner.execute(&sh("sleep 5"));
    let elapsed = start.elapsed();

    assert_eq!(status, ExecStatus::TimedOut);
    assert_eq!(status.code(), FAILURE_SENTINEL);
    assert!(
        elapsed < Duration::from_secs(3),
        "execute returned after {elapsed:?}, well past the 200ms deadline"
    );
}

#[cfg(unix)]
#[test]
fn timed_out_child_does_not_keep_running() {
    use std::fs;

    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let marker = dir.path().join("finished");
    let script = format!("sleep 1 && touch '{}'", marker.display());

    let runner = ProcessRunner::new(ExecOptions {
        timeout: Some(Duration::from_millis(200)),
    });
    let status = runner.execute(&sh(&script));
    assert_eq!(status, ExecStatus::TimedOut);

    // Had the child survived the kill, the marker would appear once its
    // sleep finished.
    std::thread::sleep(Duration::from_millis(1200));
    assert!(
        fs::metadata(&marker).is_err(),
        "child kept running past the timeout"
    );
}

#[cfg(unix)]
#[test]
fn unbounded_wait_completes_normally() {
    let runner = ProcessRunner::new(ExecOptions { timeout: None });
    let status = runner.execute(&sh("exit 0"));
    assert_eq!(status, ExecStatus::Exited(0));
}

#[derive(Default)]
struct RecordingObserver {
    events: Arc<Mutex<Vec<String>>>,
}

impl ExecObserver for RecordingObserver {
    fn before_exec(&self, cmd: &ToolCommand) {
        self.events.lock().unwrap().push(format!("before {cmd}"));
    }

    fn after_exec(&self, cmd: &ToolCommand, status: &ExecStatus) {
        self.events
            .lock()
            .unwrap()
            .push(format!("after {} {status}", cmd.program()));
    }
}

#[cfg(unix)]
#[test]
fn observer_sees_both_sides_of_an_execution() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let observer = RecordingObserver {
        events: Arc::clone(&events),
    };
    let runner = ProcessRunner::with_observer(ExecOptions::default(), Box::new(observer));

    let status = runner.execute(&sh("exit 3"));
    assert_eq!(status, ExecStatus::Exited(3));

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0], "before sh -c exit 3");
    assert_eq!(events[1], "after sh exited with 3");
}

#[test]
fn observer_is_invoked_even_when_spawning_fails() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let observer = RecordingObserver {
        events: Arc::clone(&events),
    };
    let runner = ProcessRunner::with_observer(ExecOptions::default(), Box::new(observer));

    runner.execute(&ToolCommand::new("cnip-no-such-tool-on-any-path"));

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 2);
    assert!(events[1].ends_with("failed to start"));
}
