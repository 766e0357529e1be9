use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for quadcam")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run fmt, clippy, tests and doc in order
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates with warnings denied
    Clippy,
    /// Run all tests
    Test,
    /// Build rustdoc for the workspace
    Doc,
    /// Build the entire workspace
    Build,
    /// Launch the desktop app, forwarding any extra arguments
    Run {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

/// One cargo invocation with a label for progress and failure messages.
struct Step {
    label: &'static str,
    args: Vec<String>,
}

impl Step {
    fn new(label: &'static str, args: &[&str]) -> Self {
        Self {
            label,
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    fn run(&self) -> Result<()> {
        println!("==> {}: cargo {}", self.label, self.args.join(" "));
        let status = Command::new("cargo").args(&self.args).status()?;
        if !status.success() {
            anyhow::bail!("{} failed ({status})", self.label);
        }
        Ok(())
    }
}

fn fmt() -> Step {
    Step::new("fmt", &["fmt", "--all", "--", "--check"])
}

fn clippy() -> Step {
    Step::new(
        "clippy",
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
    )
}

fn test() -> Step {
    Step::new("test", &["test", "--workspace"])
}

fn doc() -> Step {
    Step::new("doc", &["doc", "--workspace", "--no-deps"])
}

fn build() -> Step {
    Step::new("build", &["build", "--workspace"])
}

fn run_desktop(extra: &[String]) -> Step {
    let mut step = Step::new("run", &["run", "-p", "quadcam-desktop", "--"]);
    step.args.extend(extra.iter().cloned());
    step
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let steps = match cli.command {
        Commands::Check => vec![fmt(), clippy(), test(), doc()],
        Commands::Fmt => vec![fmt()],
        Commands::Clippy => vec![clippy()],
        Commands::Test => vec![test()],
        Commands::Doc => vec![doc()],
        Commands::Build => vec![build()],
        Commands::Run { args } => vec![run_desktop(&args)],
    };

    for step in &steps {
        step.run()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_forwards_arguments() {
        let step = run_desktop(&["--shape".into(), "triangle".into()]);
        assert_eq!(
            step.args,
            vec!["run", "-p", "quadcam-desktop", "--", "--shape", "triangle"]
        );
    }

    #[test]
    fn check_parses() {
        let cli = Cli::parse_from(["xtask", "check"]);
        assert!(matches!(cli.command, Commands::Check));
    }
}
