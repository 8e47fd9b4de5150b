//! Executes external programs.

use std::{
    backtrace::Backtrace,
    ffi::OsString,
    process::Command,
};

use crate::{easycert_eprintln, error::CommandError};

/// Capability to run an external program to completion.
///
/// The pipeline only depends on this trait, so tests can swap in a runner
/// that neither touches real files nor starts real processes.
pub trait CommandRunner {
    /// Runs `program` with `args`, blocking until it exits. Returns the
    /// captured stdout on success.
    fn run(&self, program: &str, args: &[OsString]) -> Result<String, CommandError>;
}

/// Runs programs as child processes of this one.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[OsString]) -> Result<String, CommandError> {
        let result = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| CommandError::SpawnFailedError(program.to_owned(), e))
            .and_then(|output| {
                if output.status.success() {
                    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
                } else {
                    Err(CommandError::ExitFailureError(
                        program.to_owned(),
                        output.status.code(),
                        String::from_utf8_lossy(&output.stderr).into_owned(),
                    ))
                }
            });

        if let Err(e) = &result {
            report_failure(program, args, e);
        }
        result
    }
}

fn report_failure(program: &str, args: &[OsString], err: &CommandError) {
    easycert_eprintln!("command invocation failed!");
    easycert_eprintln!("  {} {}", program, join_args(args));
    easycert_eprintln!("  {}", err);
    if let CommandError::ExitFailureError(_, _, stderr) = err {
        for line in stderr.lines().filter(|l| !l.trim().is_empty()) {
            easycert_eprintln!("  | {}", line);
        }
    }
    easycert_eprintln!("{}", Backtrace::force_capture());
}

fn join_args(args: &[OsString]) -> String {
    args.iter()
        .map(|a| a.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use std::io::ErrorKind;

    use super::*;

    #[test]
    fn missing_program_fails_to_spawn() {
        let res = SystemRunner.run("easycert-no-such-program", &["genrsa".into()]);
        match res {
            Err(CommandError::SpawnFailedError(program, e)) => {
                assert_eq!(program, "easycert-no-such-program");
                assert_eq!(e.kind(), ErrorKind::NotFound);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn captures_stdout() {
        let out = SystemRunner.run("sh", &["-c".into(), "printf hello".into()]);
        assert_eq!(out, Ok("hello".to_owned()));
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_carries_code_and_stderr() {
        let res = SystemRunner.run("sh", &["-c".into(), "echo oops >&2; exit 3".into()]);
        assert_eq!(
            res,
            Err(CommandError::ExitFailureError(
                "sh".to_owned(),
                Some(3),
                "oops\n".to_owned()
            ))
        );
    }

    #[test]
    fn join_args_with_spaces() {
        assert_eq!(
            join_args(&["req".into(), "-new".into(), "-subj".into(), "/CN=x".into()]),
            "req -new -subj /CN=x"
        );
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;

    use super::*;

    /// Records invocations instead of running them. Optionally fails the
    /// call with the given index (0-based).
    #[derive(Default)]
    pub(crate) struct RecordingRunner {
        pub(crate) calls: RefCell<Vec<Vec<String>>>,
        pub(crate) fail_at: Option<usize>,
    }

    impl RecordingRunner {
        pub(crate) fn failing_at(index: usize) -> Self {
            Self {
                fail_at: Some(index),
                ..Self::default()
            }
        }

        pub(crate) fn subcommands(&self) -> Vec<String> {
            self.calls
                .borrow()
                .iter()
                .map(|c| c.get(1).cloned().unwrap_or_default())
                .collect()
        }
    }

    impl CommandRunner for RecordingRunner {
        fn run(&self, program: &str, args: &[OsString]) -> Result<String, CommandError> {
            let mut call = vec![program.to_owned()];
            call.extend(args.iter().map(|a| a.to_string_lossy().into_owned()));
            let mut calls = self.calls.borrow_mut();
            calls.push(call);
            if self.fail_at == Some(calls.len() - 1) {
                return Err(CommandError::ExitFailureError(
                    program.to_owned(),
                    Some(1),
                    String::new(),
                ));
            }
            Ok(String::new())
        }
    }
}
