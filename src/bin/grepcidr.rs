//! Thin CLI driver for `grepcidr`.
//!
//! Everything here (argument parsing, file/stdin selection, buffered
//! output, process exit codes) is deliberately out of scope for the
//! core crate; this binary just wires the core's public surface
//! ([`grepcidr::compile_pattern_sources`], [`grepcidr::line_matches`])
//! onto a command-line interface compatible with reference `grepcidr`.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use grepcidr::{compile_pattern_sources, line_matches, MatchOptions, PatternSource};

/// grepcidr-compatible IPv4/IPv6 CIDR/range line filter.
#[derive(Parser, Debug)]
#[command(
    name = "grepcidr",
    about = "Filter lines by embedded IPv4/IPv6 address against CIDR/range patterns",
    disable_version_flag = true
)]
struct Cli {
    /// Print version and exit with code 2 (matches reference `grepcidr -V`).
    #[arg(short = 'V')]
    version: bool,

    /// Count matching lines; suppress normal output.
    #[arg(short = 'c')]
    count: bool,

    /// Treat lines containing no address as matching.
    #[arg(short = 'i')]
    include_non_ip: bool,

    /// Require strict CIDR alignment (low bits must be zero).
    #[arg(short = 's')]
    strict: bool,

    /// Invert the match.
    #[arg(short = 'v')]
    invert: bool,

    /// Whole-line exact address match.
    #[arg(short = 'x')]
    exact: bool,

    /// Specify a pattern (repeatable).
    #[arg(short = 'e', value_name = "PATTERN")]
    patterns: Vec<String>,

    /// Load patterns from file (one per line, '#' starts a comment); repeatable.
    #[arg(short = 'f', value_name = "PATTERNFILE")]
    pattern_files: Vec<PathBuf>,

    /// `[PATTERN] [FILE...]`. If neither `-e` nor `-f` was given, the
    /// first positional argument is the pattern and the rest are input
    /// files; otherwise every positional argument is an input file.
    #[arg(value_name = "PATTERN|FILE")]
    positional: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.version {
        println!("grepcidr {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::from(2);
    }

    let (pattern_sources, files) = match split_positional(&cli) {
        Ok(v) => v,
        Err(msg) => {
            eprintln!("grepcidr: {msg}");
            return ExitCode::from(2);
        }
    };

    let mut sources: Vec<PatternSource> = cli
        .patterns
        .iter()
        .cloned()
        .map(PatternSource::Inline)
        .collect();
    for path in &cli.pattern_files {
        match std::fs::read_to_string(path) {
            Ok(contents) => sources.push(PatternSource::File(contents)),
            Err(e) => {
                eprintln!("grepcidr: {}: {e}", path.display());
                return ExitCode::from(2);
            }
        }
    }
    sources.extend(pattern_sources);

    let index = match compile_pattern_sources(sources, cli.strict) {
        Ok(idx) => idx,
        Err(e) => {
            eprintln!("grepcidr: {e}");
            return ExitCode::from(2);
        }
    };

    let opts = MatchOptions {
        invert: cli.invert,
        exact: cli.exact,
        include_non_ip: cli.include_non_ip,
    };

    match run(&index, &opts, cli.count, &files) {
        Ok(summary) => ExitCode::from(summary.exit_code() as u8),
        Err(e) => {
            eprintln!("grepcidr: {e}");
            ExitCode::from(2)
        }
    }
}

/// Decide whether the first positional argument is the bare pattern
/// (only when neither `-e` nor `-f` was supplied) and return `(extra
/// pattern sources, input files)`.
fn split_positional(cli: &Cli) -> Result<(Vec<PatternSource>, Vec<String>), String> {
    if cli.patterns.is_empty() && cli.pattern_files.is_empty() {
        let mut rest = cli.positional.clone();
        if rest.is_empty() {
            return Err("no pattern specified (use a positional PATTERN, -e, or -f)".to_string());
        }
        let pattern = rest.remove(0);
        Ok((vec![PatternSource::Inline(pattern)], rest))
    } else {
        Ok((Vec::new(), cli.positional.clone()))
    }
}

fn run(
    index: &grepcidr::PatternIndex,
    opts: &MatchOptions,
    count_mode: bool,
    files: &[String],
) -> grepcidr::Result<grepcidr::RunSummary> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut summary = grepcidr::RunSummary::default();

    if files.is_empty() {
        process_reader(io::stdin().lock(), index, opts, count_mode, &mut out, &mut summary)?;
    } else {
        for name in files {
            if name == "-" {
                process_reader(io::stdin().lock(), index, opts, count_mode, &mut out, &mut summary)?;
            } else {
                let file = File::open(name)?;
                process_reader(BufReader::new(file), index, opts, count_mode, &mut out, &mut summary)?;
            }
        }
    }

    if count_mode {
        writeln!(out, "{}", summary.matched_lines)?;
    }
    out.flush()?;
    Ok(summary)
}

/// Read `reader` line by line, preserving the original terminator
/// (`\n`, `\r\n`, or none on a final unterminated line) verbatim on
/// emission.
fn process_reader<R: BufRead>(
    mut buf_reader: R,
    index: &grepcidr::PatternIndex,
    opts: &MatchOptions,
    count_mode: bool,
    out: &mut impl Write,
    summary: &mut grepcidr::RunSummary,
) -> grepcidr::Result<()> {
    let mut raw = Vec::new();

    loop {
        raw.clear();
        let bytes_read = buf_reader.read_until(b'\n', &mut raw)?;
        if bytes_read == 0 {
            break;
        }

        let line = strip_terminator(&raw);
        if line_matches(index, opts, line) {
            summary.matched_lines += 1;
            if !count_mode {
                out.write_all(&raw)?;
            }
        }
    }

    Ok(())
}

/// Strip a trailing `\n` (and a preceding `\r`, if present) for the
/// purposes of address scanning only; `process_reader` still writes the
/// original `raw` bytes (terminator included) on a match.
fn strip_terminator(raw: &[u8]) -> &[u8] {
    let mut end = raw.len();
    if end > 0 && raw[end - 1] == b'\n' {
        end -= 1;
        if end > 0 && raw[end - 1] == b'\r' {
            end -= 1;
        }
    }
    &raw[..end]
}
