use std::path::PathBuf;

use clap::Parser;
use rain_interpreter::disassemble;

use crate::common::{load_json, EvalCliError, ExpressionConfig, Result};

/// Print the decoded instructions of an expression
#[derive(Parser, Debug)]
pub struct Cmd {
    /// Expression JSON file
    #[arg(value_name = "EXPRESSION")]
    pub expression: PathBuf,

    /// Only print this source
    #[arg(long = "source", short = 's')]
    pub source: Option<usize>,
}

impl Cmd {
    /// Execute the disasm command
    pub fn run(&self) -> Result<()> {
        print!("{}", self.render()?);
        Ok(())
    }

    /// Render the listing without printing it.
    ///
    /// Each source starts with a `source N:` header, followed by one `position: name<operand>`
    /// line per instruction. Constants are listed last.
    pub fn render(&self) -> Result<String> {
        let expression = load_json::<ExpressionConfig>(&self.expression)?.into_expression()?;
        let selected: Vec<usize> = match self.source {
            Some(index) if index < expression.sources.len() => vec![index],
            Some(index) => {
                return Err(EvalCliError::InvalidInput(format!(
                    "source {index} out of range, expression has {}",
                    expression.sources.len()
                )))
            }
            None => (0..expression.sources.len()).collect(),
        };

        let mut out = String::new();
        for index in selected {
            out.push_str(&format!("source {index}:\n"));
            for instruction in disassemble(index, &expression.sources[index])? {
                out.push_str(&format!("  {:>4}: {instruction}\n", instruction.position));
            }
        }
        if self.source.is_none() && !expression.constants.is_empty() {
            out.push_str("constants:\n");
            for (index, constant) in expression.constants.iter().enumerate() {
                out.push_str(&format!("  {index:>4}: {constant:#x}\n"));
            }
        }
        Ok(out)
    }
}
