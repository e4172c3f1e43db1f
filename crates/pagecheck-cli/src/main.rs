use anyhow::{Context, Result};
use crossterm::tty::IsTty;
use pagecheck_config::Config;
use pagecheck_engine::{
    AssertOptions, Bounds, Palette, RawContent, Reporter, assert_content_contains,
    assert_content_equals, minimize,
};
use std::{
    env,
    io::{self, Read, Write},
    path::{Path, PathBuf},
    process,
};

const USAGE: &str = "\
Usage:
  pagecheck minimize [--keep-newlines] <file>
  pagecheck extract [--starts-after <text>] [--ends-before <text>] <file>
  pagecheck diff [--keep-newlines] [--color | --no-color] <expected-file> <actual-file>
  pagecheck contains [--keep-newlines] [--starts-after <text>] [--ends-before <text>] <file> <value>...

Use - as <file> to read from stdin.";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Minimize {
        input: PathBuf,
    },
    Extract {
        input: PathBuf,
    },
    Diff {
        expected: PathBuf,
        actual: PathBuf,
    },
    Contains {
        input: PathBuf,
        values: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Flags {
    keep_newlines: bool,
    color: Option<bool>,
    bounds: Bounds,
}

fn parse_args(args: &[String]) -> Result<(Command, Flags), String> {
    let (name, rest) = args
        .split_first()
        .ok_or_else(|| "missing command".to_string())?;

    let mut flags = Flags::default();
    let mut positional = Vec::new();
    let mut iter = rest.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--keep-newlines" => flags.keep_newlines = true,
            "--color" => flags.color = Some(true),
            "--no-color" => flags.color = Some(false),
            "--starts-after" | "--ends-before" => {
                let value = iter
                    .next()
                    .ok_or_else(|| format!("{arg} requires a value"))?
                    .clone();
                if arg == "--starts-after" {
                    flags.bounds.starts_after = Some(value);
                } else {
                    flags.bounds.ends_before = Some(value);
                }
            }
            "--" => positional.extend(iter.by_ref().cloned()),
            other if other.starts_with("--") => return Err(format!("unknown option {other}")),
            _ => positional.push(arg.clone()),
        }
    }

    let command = match (name.as_str(), positional.as_slice()) {
        ("minimize", [input]) => Command::Minimize {
            input: PathBuf::from(input),
        },
        ("extract", [input]) => Command::Extract {
            input: PathBuf::from(input),
        },
        ("diff", [expected, actual]) => Command::Diff {
            expected: PathBuf::from(expected),
            actual: PathBuf::from(actual),
        },
        ("contains", [input, values @ ..]) if !values.is_empty() => Command::Contains {
            input: PathBuf::from(input),
            values: values.to_vec(),
        },
        ("minimize" | "extract" | "diff" | "contains", _) => {
            return Err(format!("wrong number of arguments for {name}"));
        }
        (other, _) => return Err(format!("unknown command {other}")),
    };
    Ok((command, flags))
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut buf = Vec::new();
        io::stdin()
            .read_to_end(&mut buf)
            .context("Failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn read_text(path: &Path) -> Result<String> {
    let text = RawContent::from(read_input(path)?)
        .into_text()
        .with_context(|| format!("Failed to decode {}", path.display()))?;
    Ok(text.into_owned())
}

/// Runs a command, returning whether the check it performs passed.
fn run(command: Command, flags: Flags, config: &Config) -> Result<bool> {
    let strip_newlines = config.strip_newlines && !flags.keep_newlines;
    let color = flags
        .color
        .unwrap_or_else(|| config.color.resolve(io::stderr().is_tty()));
    let mut reporter = Reporter::stderr(Palette::from_enabled(color));
    let options = AssertOptions {
        strip_newlines,
        bounds: flags.bounds,
    };
    log::debug!("running {command:?} with {options:?}");

    let mut stdout = io::stdout().lock();
    match command {
        Command::Minimize { input } => {
            let text = read_text(&input)?;
            writeln!(stdout, "{}", minimize(&text, strip_newlines))?;
            Ok(true)
        }
        Command::Extract { input } => {
            let text = read_text(&input)?;
            let subsection = options.bounds.extract(&minimize(&text, strip_newlines))?;
            writeln!(stdout, "{}", subsection.content)?;
            Ok(true)
        }
        Command::Diff { expected, actual } => {
            let expected = read_input(&expected)?;
            let actual = read_input(&actual)?;
            let result = reporter.check(assert_content_equals(expected, actual, &options));
            Ok(result.is_ok())
        }
        Command::Contains { input, values } => {
            let content = read_input(&input)?;
            let result = reporter.check(assert_content_contains(content, values.as_slice(), &options));
            Ok(result.is_ok())
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let (command, flags) = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(message) => {
            eprintln!("Error: {message}");
            eprintln!("{USAGE}");
            process::exit(2);
        }
    };

    let config = match Config::load_or_default() {
        Ok(config) => {
            log::debug!("Using {config:?} (from {})", Config::config_path().display());
            config
        }
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(2);
        }
    };

    if !run(command, flags, &config)? {
        process::exit(1);
    }
    Ok(())
}
