//! CLI parse tests.

use super::{Cli, CliCommand};
use clap::Parser;

fn parse(args: &[&str]) -> CliCommand {
    let cli = Cli::try_parse_from(args).unwrap();
    cli.command
}

#[test]
fn perf_minimal_args() {
    let cmd = parse(&[
        "snippets",
        "perf",
        "--input-path",
        "queries.jsonl",
        "--url",
        "http://localhost:8080/predict",
    ]);
    let CliCommand::Perf {
        input_path,
        url,
        workers,
        output,
        max_num,
        retries,
    } = cmd;
    assert_eq!(input_path, "queries.jsonl");
    assert_eq!(url, "http://localhost:8080/predict");
    assert_eq!(workers, None);
    assert_eq!(output, None);
    assert_eq!(max_num, None);
    assert_eq!(retries, None);
}

#[test]
fn perf_all_flags() {
    let cmd = parse(&[
        "snippets",
        "perf",
        "--input-path",
        "q.jsonl",
        "--url",
        "http://svc/api",
        "--workers",
        "8",
        "--output",
        "out.json",
        "--max-num",
        "100",
        "--retries",
        "3",
    ]);
    let CliCommand::Perf {
        workers,
        output,
        max_num,
        retries,
        ..
    } = cmd;
    assert_eq!(workers, Some(8));
    assert_eq!(output.as_deref(), Some("out.json"));
    assert_eq!(max_num, Some(100));
    assert_eq!(retries, Some(3));
}

#[test]
fn perf_requires_input_and_url() {
    assert!(Cli::try_parse_from(["snippets", "perf", "--url", "http://svc"]).is_err());
    assert!(Cli::try_parse_from(["snippets", "perf", "--input-path", "q.jsonl"]).is_err());
}
