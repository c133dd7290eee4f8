use std::path::PathBuf;

use alloy_primitives::{Address, U256};
use clap::Parser;
use rain_interpreter::{
    build_context, EvalInputs, EvalOutcome, Interpreter, InterpreterSpecId, MemoryStore,
    StackItem, StateNamespace, StoreEntry,
};
use serde::Serialize;
use tracing::info;

use crate::common::{
    load_json, to_json, ExpressionConfig, HostSnapshot, Result, SignedContexts, StoreSnapshot,
};

/// Evaluate one entrypoint of an expression
#[derive(Parser, Debug)]
pub struct Cmd {
    /// Expression JSON file: `{"sources": [hex], "constants": [word], "minOutputs": [n]}`
    #[arg(value_name = "EXPRESSION")]
    pub expression: PathBuf,

    /// The entrypoint to evaluate
    #[arg(long = "entrypoint", short = 'e', default_value = "0")]
    pub entrypoint: usize,

    /// Interpreter version
    #[arg(long = "spec", default_value = "V2")]
    pub spec: InterpreterSpecId,

    /// Overrides the minimum outputs declared in the expression file
    #[arg(long = "min-outputs", value_delimiter = ',')]
    pub min_outputs: Option<Vec<u16>>,

    /// The caller
    #[arg(long = "caller", default_value = "0x0000000000000000000000000000000000000000")]
    pub caller: Address,

    /// The calling contract, which owns the store namespace
    #[arg(long = "contract", default_value = "0x0000000000000000000000000000000000000000")]
    pub contract: Address,

    /// Caller-supplied context arguments
    #[arg(long = "arg", value_delimiter = ',')]
    pub args: Vec<U256>,

    /// JSON file holding a list of signed contexts
    #[arg(long = "signed-context")]
    pub signed_context: Option<PathBuf>,

    /// Store namespace chosen by the calling contract
    #[arg(long = "namespace", default_value = "0")]
    pub namespace: U256,

    /// Block number
    #[arg(long = "block.number", visible_aliases = ["block-number"], default_value = "0")]
    pub block_number: u64,

    /// Block timestamp
    #[arg(long = "block.timestamp", visible_aliases = ["block-timestamp"], default_value = "0")]
    pub block_timestamp: u64,

    /// JSON file holding the token state
    #[arg(long = "host")]
    pub host: Option<PathBuf>,

    /// JSON file holding the store snapshot to start from
    #[arg(long = "store")]
    pub store: Option<PathBuf>,

    /// Write the store snapshot after evaluation to this file
    #[arg(long = "store.out", visible_aliases = ["store-out"])]
    pub store_out: Option<PathBuf>,

    /// Do not commit store writes
    #[arg(long = "preview")]
    pub preview: bool,
}

/// The printed result of a run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    /// The final stack, bottom first.
    pub stack: Vec<StackItem>,
    /// The store writes, in first-write order.
    pub writes: Vec<(U256, U256)>,
    /// The store after evaluation. Unchanged in preview mode.
    pub store: Vec<StoreEntry>,
    /// The assembled context rows, signed rows included.
    pub context: Vec<Vec<U256>>,
}

impl Cmd {
    /// Execute the run command
    pub fn run(&self) -> Result<()> {
        let report = self.evaluate()?;
        println!("{}", to_json(&report)?);
        if let Some(path) = &self.store_out {
            std::fs::write(path, to_json(&report.store)?)?;
            info!(path = %path.display(), entries = report.store.len(), "Wrote store snapshot");
        }
        Ok(())
    }

    /// Evaluate without printing.
    pub fn evaluate(&self) -> Result<RunReport> {
        let mut config: ExpressionConfig = load_json(&self.expression)?;
        if let Some(min_outputs) = &self.min_outputs {
            config.min_outputs.clone_from(min_outputs);
        }
        let interpreter = Interpreter::new(self.spec);
        let expression = interpreter.deploy(config.into_expression()?)?;

        let signed: SignedContexts = match &self.signed_context {
            Some(path) => load_json(path)?,
            None => Vec::new(),
        };
        let context = build_context(self.caller, self.contract, self.args.clone(), &signed)?;

        let host: HostSnapshot = match &self.host {
            Some(path) => load_json(path)?,
            None => HostSnapshot::default(),
        };
        let host = host.into_host(self.block_number, self.block_timestamp);

        let snapshot: StoreSnapshot = match &self.store {
            Some(path) => load_json(path)?,
            None => Vec::new(),
        };
        let mut store: MemoryStore = snapshot.into_iter().collect();

        let inputs = EvalInputs::new(self.entrypoint, &context)
            .with_namespace(StateNamespace(self.namespace));
        let EvalOutcome { stack, writes, .. } = if self.preview {
            interpreter.preview_evaluate(&expression, inputs, &host, &store)?
        } else {
            interpreter.evaluate(&expression, inputs, &host, &mut store)?
        };
        info!(
            entrypoint = self.entrypoint,
            arguments = context.arguments().len(),
            signers = context.signers().len(),
            stack = stack.len(),
            writes = writes.len(),
            "Evaluated"
        );
        Ok(RunReport { stack, writes, store: store.snapshot(), context: context.into_rows() })
    }
}
