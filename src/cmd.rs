use crate::context::Context;
use crate::error::Error;
use crate::result::Result;
use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Output};

fn display<S: AsRef<OsStr>>(program: &str, args: &[S]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(&arg.as_ref().to_string_lossy());
    }
    line
}

fn run(ctx: &Context, mut command: Command, program: &str, line: &str) -> Result<Output> {
    log::debug!("executing: {}", line);
    if ctx.verbose {
        cliclack::log::remark(format!("Executing: {}", line))?;
    }

    let output = command.output().map_err(|source| Error::CommandSpawn {
        program: program.to_string(),
        source,
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::CommandFailed(format!(
            "{} failed with exit code {}: {}",
            line,
            output
                .status
                .code()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "none".to_string()),
            stderr.trim()
        )));
    }

    Ok(output)
}

/// Execute a command and capture its standard output
pub fn execute_with_output<S: AsRef<OsStr>>(
    ctx: &Context,
    program: &str,
    args: &[S],
) -> Result<String> {
    let line = display(program, args);
    let mut command = Command::new(program);
    command.args(args);

    let output = run(ctx, command, program, &line)?;
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Execute a command with `dir` as the child's working directory
///
/// The parent process keeps its own working directory.
pub fn execute_in<S: AsRef<OsStr>>(
    ctx: &Context,
    dir: &Path,
    program: &str,
    args: &[S],
) -> Result<()> {
    let line = display(program, args);
    let mut command = Command::new(program);
    command.args(args).current_dir(dir);

    let output = run(ctx, command, program, &line)?;
    if ctx.verbose {
        for line in String::from_utf8_lossy(&output.stdout).lines() {
            cliclack::log::remark(line)?;
        }
    }
    Ok(())
}
