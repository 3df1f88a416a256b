use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Captured result of one finished subprocess.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutput {
    pub success: bool,
    /// `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub elapsed: Duration,
}

impl CommandOutput {
    /// Stdout followed by stderr; variants may report timings on either stream.
    pub fn combined(&self) -> String {
        let mut out = String::with_capacity(self.stdout.len() + self.stderr.len() + 1);
        out.push_str(&self.stdout);
        if !self.stdout.is_empty() && !self.stdout.ends_with('\n') && !self.stderr.is_empty() {
            out.push('\n');
        }
        out.push_str(&self.stderr);
        out
    }
}

/// Runs a command line to completion. Every build and run goes through this seam.
pub trait Executor {
    fn execute(&mut self, command: &str) -> std::io::Result<CommandOutput>;
}

/// Executes command lines through the platform shell, one at a time.
#[derive(Debug, Clone, Default)]
pub struct ShellExecutor {
    workdir: Option<PathBuf>,
}

impl ShellExecutor {
    pub fn new(workdir: Option<PathBuf>) -> Self {
        ShellExecutor { workdir }
    }

    fn shell_command(command: &str) -> Command {
        if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", command]);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.args(["-c", command]);
            cmd
        }
    }
}

impl Executor for ShellExecutor {
    fn execute(&mut self, command: &str) -> std::io::Result<CommandOutput> {
        let mut cmd = Self::shell_command(command);
        if let Some(dir) = &self.workdir {
            cmd.current_dir(dir);
        }

        let start = Instant::now();
        let output = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()?;
        let elapsed = start.elapsed();

        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            elapsed,
        })
    }
}

/// Test double that replays canned outputs per command line and records every call.
#[cfg(test)]
pub(crate) mod scripted {
    use std::collections::{HashMap, VecDeque};
    use std::time::Duration;

    use super::{CommandOutput, Executor};

    #[derive(Default)]
    pub(crate) struct ScriptedExecutor {
        replies: HashMap<String, VecDeque<std::io::Result<CommandOutput>>>,
        pub(crate) calls: Vec<String>,
    }

    impl ScriptedExecutor {
        pub(crate) fn reply(mut self, command: &str, code: i32, stdout: &str) -> Self {
            self.replies
                .entry(command.to_string())
                .or_default()
                .push_back(Ok(CommandOutput {
                    success: code == 0,
                    code: Some(code),
                    stdout: stdout.to_string(),
                    stderr: String::new(),
                    elapsed: Duration::from_millis(5),
                }));
            self
        }

        pub(crate) fn reply_stderr(mut self, command: &str, code: i32, stderr: &str) -> Self {
            self.replies
                .entry(command.to_string())
                .or_default()
                .push_back(Ok(CommandOutput {
                    success: code == 0,
                    code: Some(code),
                    stdout: String::new(),
                    stderr: stderr.to_string(),
                    elapsed: Duration::from_millis(5),
                }));
            self
        }

        pub(crate) fn spawn_error(mut self, command: &str) -> Self {
            self.replies
                .entry(command.to_string())
                .or_default()
                .push_back(Err(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "no such file",
                )));
            self
        }
    }

    impl Executor for ScriptedExecutor {
        /// Replies are consumed in order; the final one repeats. Unscripted commands succeed silently.
        fn execute(&mut self, command: &str) -> std::io::Result<CommandOutput> {
            self.calls.push(command.to_string());
            let Some(queue) = self.replies.get_mut(command) else {
                return Ok(CommandOutput {
                    success: true,
                    code: Some(0),
                    stdout: String::new(),
                    stderr: String::new(),
                    elapsed: Duration::ZERO,
                });
            };
            if queue.len() > 1
                && let Some(reply) = queue.pop_front()
            {
                return reply;
            }
            match queue.front() {
                Some(Ok(out)) => Ok(out.clone()),
                Some(Err(e)) => Err(std::io::Error::new(e.kind(), e.to_string())),
                None => unreachable!("reply queues are never empty"),
            }
        }
    }
}
