use std::path::PathBuf;

use fisheye_cli::{
    cli::{Authentication, BasicCredentials, CommandName, ConnectionContext, Target},
    client::runtime::{run_with, CommandRegistry, RegistryEntry},
    commands::standard_registry,
};

use crate::common::{fixture, with_captured_logs, FailingHandler, RecordingCollaborator};

fn args(tail: &[&str]) -> Vec<String> {
    std::iter::once("fisheye")
        .chain(tail.iter().copied())
        .map(String::from)
        .collect()
}

#[test]
fn example_invocation_reaches_thread_dump_collaborator_once() {
    let collaborator = RecordingCollaborator::with_status(0);
    let registry = standard_registry(collaborator.clone());

    let exit = run_with(
        args(&[
            "host1",
            "9999",
            "myapp",
            "-S",
            "-U",
            "alice",
            "-P",
            "secret",
            "dump-threads",
        ]),
        &registry,
    );

    assert_eq!(exit.exit_code(), 0);
    let calls = collaborator.calls();
    assert_eq!(calls.len(), 1, "calls: {calls:?}");
    assert_eq!(calls[0].command, CommandName::DumpThreads);
    let Some(Target::Remote(remote)) = &calls[0].target else {
        panic!("expected remote target");
    };
    assert_eq!(
        remote.connection,
        ConnectionContext {
            host: "host1".into(),
            port: 9999,
            app: "myapp".into(),
        }
    );
    assert!(remote.transport.secure);
    assert_eq!(
        remote.authentication,
        Authentication::Basic(BasicCredentials::new("alice", "secret"))
    );
}

#[test]
fn non_zero_status_is_propagated_and_logged() {
    let collaborator = RecordingCollaborator::with_status(2);
    let registry = standard_registry(collaborator.clone());

    let (exit, logs) =
        with_captured_logs(|| run_with(args(&["--internal", "info"]), &registry));

    assert_eq!(exit.exit_code(), 2);
    assert_eq!(collaborator.calls().len(), 1);
    assert!(logs.contains("ERROR"), "logs: {logs}");
    assert!(
        logs.contains("Command exited with error exit code"),
        "logs: {logs}"
    );
}

#[test]
fn out_of_range_status_maps_to_one() {
    let collaborator = RecordingCollaborator::with_status(-9);
    let registry = standard_registry(collaborator.clone());

    let exit = run_with(args(&["--internal", "process"]), &registry);
    assert_eq!(exit.exit_code(), 1);
}

#[test]
fn handler_error_exits_one_and_logs() {
    let registry = CommandRegistry::new().register(RegistryEntry::new(
        CommandName::Profiler,
        FailingHandler::Error("agent connection refused"),
    ));

    let (exit, logs) =
        with_captured_logs(|| run_with(args(&["--internal", "profiler"]), &registry));

    assert_eq!(exit.exit_code(), 1);
    let err = exit.error().expect("execution error recorded");
    assert!(
        format!("{err:#}").contains("agent connection refused"),
        "error: {err:#}"
    );
    assert!(logs.contains("ERROR"), "logs: {logs}");
    assert!(
        logs.contains("Command execution failed with error"),
        "logs: {logs}"
    );
}

#[test]
fn handler_panic_exits_one() {
    let registry = CommandRegistry::new().register(RegistryEntry::new(
        CommandName::DumpHeap,
        FailingHandler::Panic("heap dump exploded"),
    ));

    let (exit, logs) =
        with_captured_logs(|| run_with(args(&["--internal", "dump-heap"]), &registry));

    assert_eq!(exit.exit_code(), 1);
    assert!(logs.contains("heap dump exploded"), "logs: {logs}");
}

#[test]
fn usage_errors_never_reach_the_collaborator() {
    let cases: &[&[&str]] = &[
        &["host1", "9999", "dump-heap"],
        &["host1", "dump-heap"],
        &["--internal", "host1", "9999", "myapp", "dump-heap"],
        &["host1", "9999", "myapp", "-O", "-U", "alice", "-P", "secret", "dump-heap"],
        &["host1", "9999", "myapp", "-U", "alice", "dump-heap"],
        &["host1", "9999", "myapp", "-P", "secret", "dump-heap"],
        &["host1", "9999", "myapp", "--socks", "proxy-without-port", "dump-heap"],
        &["--internal", "--bogus", "dump-heap"],
        &["dump-heap"],
    ];

    for case in cases {
        let collaborator = RecordingCollaborator::with_status(0);
        let registry = standard_registry(collaborator.clone());

        let exit = run_with(args(case), &registry);

        assert!(exit.is_usage_error(), "{case:?} should be a usage error");
        assert_eq!(exit.exit_code(), 2, "{case:?}");
        assert!(collaborator.calls().is_empty(), "{case:?} dispatched");
    }
}

#[test]
fn usage_error_is_logged() {
    let registry = standard_registry(RecordingCollaborator::with_status(0));
    let (exit, logs) = with_captured_logs(|| run_with(args(&["dump-heap"]), &registry));

    assert!(exit.is_usage_error());
    assert!(logs.contains("DEBUG"), "logs: {logs}");
    assert!(logs.contains("Invalid command line"), "logs: {logs}");
    assert!(logs.contains("requires either --internal"), "logs: {logs}");
    assert!(!logs.contains("ERROR"), "logs: {logs}");
}

#[test]
fn grammar_error_log_leaves_rendering_to_report() {
    let registry = standard_registry(RecordingCollaborator::with_status(0));
    let (exit, logs) = with_captured_logs(|| {
        run_with(
            args(&[
                "host1", "9999", "myapp", "-U", "alice", "-P", "secret", "-U", "bob", "info",
            ]),
            &registry,
        )
    });

    assert!(exit.is_usage_error());
    assert!(logs.contains("Invalid command line"), "logs: {logs}");
    assert!(!logs.contains("cannot be used multiple times"), "logs: {logs}");
    assert!(!logs.contains("Usage:"), "logs: {logs}");
}

#[test]
fn bare_invocation_log_does_not_embed_help() {
    let registry = standard_registry(RecordingCollaborator::with_status(0));
    let (exit, logs) = with_captured_logs(|| run_with(args(&[]), &registry));

    assert!(exit.is_usage_error());
    assert!(!logs.contains("Commands:"), "logs: {logs}");
}

#[test]
fn unregistered_command_is_a_usage_error() {
    let registry = CommandRegistry::new();
    let exit = run_with(args(&["--internal", "info"]), &registry);
    assert!(exit.is_usage_error());
}

#[test]
fn help_exits_zero_without_dispatch() {
    let collaborator = RecordingCollaborator::with_status(0);
    let registry = standard_registry(collaborator.clone());

    let exit = run_with(args(&["--help"]), &registry);

    assert_eq!(exit.exit_code(), 0);
    assert!(!exit.is_usage_error());
    assert!(collaborator.calls().is_empty());
}

#[test]
fn hidden_completion_command_runs_without_target() {
    let collaborator = RecordingCollaborator::with_status(0);
    let registry = standard_registry(collaborator.clone());

    let exit = run_with(args(&["generate-completion", "fish"]), &registry);

    assert_eq!(exit.exit_code(), 0);
    assert!(collaborator.calls().is_empty());
}

#[test]
fn config_file_is_bootstrapped_before_dispatch() {
    let collaborator = RecordingCollaborator::with_status(0);
    let registry = standard_registry(collaborator.clone());
    let config_path = fixture("config_valid.toml");

    let exit = run_with(
        args(&[
            "host1",
            "9999",
            "myapp",
            "--configFile",
            &config_path,
            "file-storage",
            "--list",
        ]),
        &registry,
    );

    assert_eq!(exit.exit_code(), 0);
    let calls = collaborator.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].config_path, Some(PathBuf::from(&config_path)));
    assert_eq!(calls[0].forwarded_args, vec!["--list".to_string()]);
}

#[test]
fn unreadable_config_file_fails_before_dispatch() {
    let collaborator = RecordingCollaborator::with_status(0);
    let registry = standard_registry(collaborator.clone());
    let missing = fixture("does_not_exist.toml");

    let (exit, logs) = with_captured_logs(|| {
        run_with(
            args(&["host1", "9999", "myapp", "--configFile", &missing, "info"]),
            &registry,
        )
    });

    assert_eq!(exit.exit_code(), 1);
    assert!(!exit.is_usage_error());
    assert!(collaborator.calls().is_empty());
    assert!(logs.contains("ERROR"), "logs: {logs}");
}

#[test]
fn registry_handlers_are_independent() {
    let collaborator = RecordingCollaborator::with_status(0);
    let registry = standard_registry(collaborator.clone()).register(RegistryEntry::new(
        CommandName::Test,
        FailingHandler::Error("replaced"),
    ));

    assert_eq!(run_with(args(&["--internal", "test"]), &registry).exit_code(), 1);
    assert_eq!(
        run_with(args(&["--internal", "log-configuration"]), &registry).exit_code(),
        0
    );
    let calls = collaborator.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].command, CommandName::LogConfiguration);
}
