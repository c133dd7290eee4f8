//! Evaluation of deployed expressions.
//!
//! An evaluation runs one entrypoint of a [`DeployedExpression`] from an empty stack to the end
//! of its source. Store writes are staged for the whole run: [`Interpreter::evaluate`] applies
//! them to the store only once the run succeeded, [`Interpreter::preview_evaluate`] never does.

mod instructions;
mod machine;
mod table;

pub(crate) use machine::Machine;
use table::InstructionTable;

use alloy_primitives::U256;
use tracing::{debug, warn};

use crate::{
    Context, DeployedExpression, EvalError, Expression, FullyQualifiedNamespace, Host,
    IntegrityError, InterpreterSpecId, StackItem, StagedStore, StateNamespace, Store,
};

/// The per-call inputs of an evaluation.
#[derive(Clone, Copy, Debug)]
pub struct EvalInputs<'a> {
    /// The source to run.
    pub entrypoint: usize,
    /// The assembled context.
    pub context: &'a Context,
    /// The namespace chosen by the calling contract. It is qualified with the calling contract
    /// taken from the context.
    pub namespace: StateNamespace,
}

impl<'a> EvalInputs<'a> {
    /// Creates inputs for an entrypoint in the default namespace.
    pub fn new(entrypoint: usize, context: &'a Context) -> Self {
        Self { entrypoint, context, namespace: StateNamespace::default() }
    }

    /// Sets the namespace.
    pub fn with_namespace(mut self, namespace: impl Into<StateNamespace>) -> Self {
        self.namespace = namespace.into();
        self
    }
}

/// The result of a successful evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalOutcome {
    /// The final stack, bottom first.
    pub stack: Vec<StackItem>,
    /// The store writes of the evaluation, in first-write order.
    pub writes: Vec<(U256, U256)>,
    /// The namespace the writes belong to.
    pub namespace: FullyQualifiedNamespace,
}

impl EvalOutcome {
    /// The top `n` items of the final stack, bottom first. `None` if the stack is shorter.
    pub fn tail(&self, n: usize) -> Option<&[StackItem]> {
        let start = self.stack.len().checked_sub(n)?;
        Some(&self.stack[start..])
    }

    /// The final stack flattened to raw words, sentinels included.
    pub fn words(&self) -> Vec<U256> {
        self.stack.iter().map(|item| item.to_word()).collect()
    }
}

/// The interpreter, configured with the version of its opcode registry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Interpreter {
    spec: InterpreterSpecId,
}

impl Interpreter {
    /// Creates an interpreter for the given version.
    pub const fn new(spec: InterpreterSpecId) -> Self {
        Self { spec }
    }

    /// The version of the opcode registry.
    pub const fn spec(&self) -> InterpreterSpecId {
        self.spec
    }

    /// Deploys an expression against this interpreter's opcode registry.
    pub fn deploy(&self, expression: Expression) -> Result<DeployedExpression, IntegrityError> {
        expression.deploy(self.spec)
    }

    /// Evaluates an entrypoint and commits its store writes.
    ///
    /// On failure the store is left untouched.
    pub fn evaluate<H: Host, S: Store>(
        &self,
        expression: &DeployedExpression,
        inputs: EvalInputs<'_>,
        host: &H,
        store: &mut S,
    ) -> Result<EvalOutcome, EvalError> {
        let outcome = self.preview_evaluate(expression, inputs, host, &*store)?;
        if !outcome.writes.is_empty() {
            store.set(outcome.namespace, &outcome.writes);
            debug!(
                target: "rain::eval",
                namespace = %outcome.namespace,
                writes = outcome.writes.len(),
                "Committed store writes"
            );
        }
        Ok(outcome)
    }

    /// Evaluates an entrypoint without committing its store writes.
    ///
    /// An expression deployed against a version this interpreter does not enable is rejected
    /// before any instruction runs.
    pub fn preview_evaluate<H: Host, S: Store>(
        &self,
        expression: &DeployedExpression,
        inputs: EvalInputs<'_>,
        host: &H,
        store: &S,
    ) -> Result<EvalOutcome, EvalError> {
        if !self.spec.is_enabled(expression.spec()) {
            return Err(EvalError::SpecMismatch {
                expression: expression.spec(),
                interpreter: self.spec,
            });
        }
        let EvalInputs { entrypoint, context, namespace } = inputs;
        let source = expression.source(entrypoint)?;
        let heights = expression.heights(entrypoint)?;
        let namespace = namespace.qualify(context.this_address());
        debug!(
            target: "rain::eval",
            spec = %self.spec,
            entrypoint,
            instructions = source.len(),
            max_height = heights.max,
            "Evaluating expression"
        );

        let table = InstructionTable::<H, S>::new(self.spec);
        let machine = Machine::new(
            heights.max,
            expression.constants(),
            context,
            host,
            StagedStore::new(store, namespace),
        );
        let (stack, staged) = machine.run(&table, source).inspect_err(|err| {
            warn!(target: "rain::eval", entrypoint, %err, "Evaluation reverted");
        })?;

        let outcome =
            EvalOutcome { stack: stack.into_vec(), writes: staged.into_writes(), namespace };
        debug!(
            target: "rain::eval",
            entrypoint,
            stack = outcome.stack.len(),
            writes = outcome.writes.len(),
            "Evaluated expression"
        );
        Ok(outcome)
    }
}
