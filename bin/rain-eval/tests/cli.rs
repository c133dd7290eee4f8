//! Tests for the rain-eval subcommands, driven through their clap parsers.

use std::{io::Write, path::Path};

use alloy_primitives::{hex, U256};
use clap::Parser;
use rain_eval::{
    common::{load_json, EvalCliError, StoreSnapshot},
    disasm, run, Cli, MainCmd,
};
use rain_interpreter::{
    context_operand, encode_source, memory_operand, EvalError, Instruction, IntegrityError,
    MemoryType, Opcode, Operand, StackItem,
};
use rstest::rstest;
use tempfile::{NamedTempFile, TempDir};

fn constant(index: u16) -> Instruction {
    Instruction::new(Opcode::ReadMemory, memory_operand(MemoryType::Constant, index).unwrap())
}

/// Writes an expression with two entrypoints:
/// 0: `set(7, arg0 + 1)` then push `get(7)`;
/// 1: `ensure(0)`.
fn write_expression(dir: &TempDir) -> std::path::PathBuf {
    let counter = encode_source([
        constant(0),
        Instruction::new(Opcode::Context, context_operand(1, 0)),
        constant(1),
        Instruction::new(Opcode::Add, Operand(2)),
        Instruction::new(Opcode::Set, Operand(0)),
        constant(0),
        Instruction::new(Opcode::Get, Operand(0)),
    ]);
    let failing = encode_source([constant(2), Instruction::new(Opcode::Ensure, Operand(1))]);
    let json = format!(
        r#"{{"sources": ["{}", "{}"], "constants": ["0x7", "0x1", "0x0"]}}"#,
        hex::encode_prefixed(counter),
        hex::encode_prefixed(failing),
    );
    let path = dir.path().join("expression.json");
    std::fs::write(&path, json).unwrap();
    path
}

fn parse_run(args: &[&str]) -> run::Cmd {
    let cli = Cli::try_parse_from([&["rain-eval", "run"][..], args].concat()).unwrap();
    match cli.cmd {
        MainCmd::Run(cmd) => cmd,
        other => panic!("unexpected command {other:?}"),
    }
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[rstest]
#[case::commit(false, 1)]
#[case::preview(true, 0)]
fn test_run_counter(#[case] preview: bool, #[case] stored: usize) {
    let dir = TempDir::new().unwrap();
    let expression = write_expression(&dir);
    let mut args = vec![path_str(&expression), "--arg", "41", "--namespace", "3"];
    if preview {
        args.push("--preview");
    }
    let report = parse_run(&args).evaluate().unwrap();
    assert_eq!(report.stack, vec![StackItem::Value(U256::from(42))]);
    assert_eq!(report.writes, vec![(U256::from(7), U256::from(42))]);
    assert_eq!(report.store.len(), stored);
    assert_eq!(report.context.len(), 2);
    assert_eq!(report.context[1], vec![U256::from(41)]);
}

#[test]
fn test_run_writes_and_reloads_store() {
    let dir = TempDir::new().unwrap();
    let expression = write_expression(&dir);
    let store_out = dir.path().join("store.json");
    parse_run(&[path_str(&expression), "--arg", "1", "--store.out", path_str(&store_out)])
        .run()
        .unwrap();
    let snapshot: StoreSnapshot = load_json(&store_out).unwrap();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].value, U256::from(2));

    // a preview on top of the saved store still sees the committed entry
    let report = parse_run(&[
        path_str(&expression),
        "--arg",
        "5",
        "--store",
        path_str(&store_out),
        "--preview",
    ])
    .evaluate()
    .unwrap();
    assert_eq!(report.store, snapshot);
}

#[rstest]
#[case::ensure(
    &["--entrypoint", "1"],
    |err: &EvalCliError| matches!(
        err,
        EvalCliError::Eval(EvalError::EnsureFailed { position: 1, input: 0 })
    )
)]
#[case::missing_entrypoint(
    &["--entrypoint", "2"],
    |err: &EvalCliError| matches!(
        err,
        EvalCliError::Eval(EvalError::EntrypointOutOfBounds { entrypoint: 2, sources: 2 })
    )
)]
#[case::too_many_outputs(
    &["--min-outputs", "2"],
    |err: &EvalCliError| matches!(
        err,
        EvalCliError::Integrity(IntegrityError::MinOutputs { source_index: 0, expected: 2, .. })
    )
)]
fn test_run_failures(#[case] extra: &[&str], #[case] expected: fn(&EvalCliError) -> bool) {
    let dir = TempDir::new().unwrap();
    let expression = write_expression(&dir);
    let args = [&[path_str(&expression)][..], extra].concat();
    let err = parse_run(&args).evaluate().unwrap_err();
    assert!(expected(&err), "unexpected error: {err:?}");
}

#[test]
fn test_run_rejects_v2_opcode_on_v1() {
    let dir = TempDir::new().unwrap();
    let source = encode_source([Instruction::new(Opcode::ContextRowLen, Operand(0))]);
    let path = dir.path().join("v2.json");
    std::fs::write(&path, format!(r#"{{"sources": ["{}"]}}"#, hex::encode_prefixed(source)))
        .unwrap();
    let err = parse_run(&[path_str(&path), "--spec", "V1"]).evaluate().unwrap_err();
    assert!(matches!(
        err,
        EvalCliError::Integrity(IntegrityError::OpcodeNotEnabled {
            opcode: Opcode::ContextRowLen,
            ..
        })
    ));
    assert!(parse_run(&[path_str(&path), "--spec", "V2"]).evaluate().is_ok());
}

#[test]
fn test_disasm() {
    let dir = TempDir::new().unwrap();
    let expression = write_expression(&dir);
    let cmd = disasm::Cmd::try_parse_from(["disasm", path_str(&expression), "--source", "1"])
        .unwrap();
    assert_eq!(
        cmd.render().unwrap(),
        "source 1:\n     0: read_memory<0x0005>\n     1: ensure<0x0001>\n"
    );

    let all = disasm::Cmd::try_parse_from(["disasm", path_str(&expression)]).unwrap();
    let listing = all.render().unwrap();
    assert!(listing.starts_with("source 0:\n"));
    assert!(listing.contains("constants:\n     0: 0x7\n"));

    let out_of_range =
        disasm::Cmd::try_parse_from(["disasm", path_str(&expression), "--source", "2"]).unwrap();
    assert!(out_of_range.render().is_err());
}

#[test]
fn test_invalid_json_reports_path() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"{not json").unwrap();
    let err = parse_run(&[path_str(file.path())]).evaluate().unwrap_err();
    assert!(err.to_string().contains(path_str(file.path())));
}
