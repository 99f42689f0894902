//! Compiler invocation for `ftm check`.

use std::io;
use std::path::Path;
use std::process::Command;

use ftm_model::Implementation;

/// A preprocessor to run the individual tests through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compiler {
    pub program: String,
    /// Options that keep diagnostics to one line per problem.
    pub diagnostic_args: Vec<String>,
    /// The compiler prints its input file name as the first stderr line.
    pub echoes_file_name: bool,
}

impl Compiler {
    /// The implementation's own compiler driver.
    pub fn for_implementation(implementation: Implementation) -> Self {
        let (program, diagnostic_args, echoes_file_name): (_, &[&str], _) = match implementation {
            Implementation::Clang => ("clang", &["-fno-caret-diagnostics"], false),
            Implementation::Gcc => ("gcc", &["-fno-diagnostics-show-caret"], false),
            Implementation::Msvc => ("cl", &["-nologo", "-Zc:__cplusplus"], true),
        };
        Self {
            program: program.to_string(),
            diagnostic_args: diagnostic_args.iter().map(|arg| (*arg).to_string()).collect(),
            echoes_file_name,
        }
    }

    /// A user-supplied executable, run without extra options.
    pub fn custom(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            diagnostic_args: Vec::new(),
            echoes_file_name: false,
        }
    }

    pub fn resolve(implementation: Implementation, cc: Option<&str>) -> Self {
        match cc {
            Some(program) => Self::custom(program),
            None => Self::for_implementation(implementation),
        }
    }

    /// `[program, -E, diagnostic options, extra, options, file]`.
    pub fn command_line(&self, extra_args: &[String], options: &[String], file: &Path) -> Vec<String> {
        let mut command = vec![self.program.clone(), "-E".to_string()];
        command.extend(self.diagnostic_args.iter().cloned());
        command.extend(extra_args.iter().cloned());
        command.extend(options.iter().cloned());
        command.push(file.display().to_string());
        command
    }

    /// The diagnostics in `stderr`, trimmed, with any echoed file name removed.
    pub fn diagnostics<'a>(&self, stderr: &'a str) -> &'a str {
        let stderr = if self.echoes_file_name {
            stderr.split_once('\n').map_or("", |(_, rest)| rest)
        } else {
            stderr
        };
        stderr.trim()
    }
}

/// Captured output of one preprocessor run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Run a command line built by [`Compiler::command_line`].
pub fn run(command_line: &[String]) -> io::Result<RunOutput> {
    let Some((program, args)) = command_line.split_first() else {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "empty command line",
        ));
    };
    let output = Command::new(program).args(args).output()?;
    Ok(RunOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// The line of preprocessed output that starts at `probe`, if any.
pub fn probe_line<'a>(stdout: &'a str, probe: &str) -> Option<&'a str> {
    let start = stdout.find(probe)?;
    let rest = &stdout[start..];
    Some(rest.split('\n').next().unwrap_or(rest))
}

/// A command line as shown to the user.
pub fn display_command(command_line: &[String]) -> String {
    format!("+ {}", command_line.join(" "))
}
