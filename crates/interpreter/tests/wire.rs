//! Wire formats: bytecode layout, JSON inputs and revert data.

use alloy_primitives::U256;
use alloy_sol_types::SolError;
use rain_interpreter::{
    encode_revert,
    test_utils::{sign_context, test_signing_key, ExpressionBuilder},
    EvalError, Expression, IInterpreterErrors, InterpreterError, InterpreterSpecId, Opcode,
    SignedContextV1, StackItem,
};

#[test]
fn test_bytecode_layout() {
    let expression = ExpressionBuilder::default()
        .push(U256::from(1))
        .push(U256::from(2))
        .op(Opcode::Add, 2)
        .build();
    let expected = hex::decode("000000010000000300060002").unwrap();
    assert_eq!(expression.sources[0].to_vec(), expected);
}

#[test]
fn test_expression_json() {
    let json = r#"{"sources": ["0x0000000100000003"], "constants": ["0x1", "0x2"]}"#;
    let expression: Expression = serde_json::from_str(json).unwrap();
    assert!(expression.min_outputs.is_empty());
    let deployed = expression.clone().deploy(InterpreterSpecId::V1).unwrap();
    assert_eq!(deployed.heights(0).unwrap().outputs, 2);

    let encoded = serde_json::to_string(&expression).unwrap();
    assert_eq!(serde_json::from_str::<Expression>(&encoded).unwrap(), expression);
}

#[test]
fn test_signed_context_json() {
    let signed = sign_context(&test_signing_key(3), vec![U256::from(1), U256::MAX]);
    let json = serde_json::to_value(&signed).unwrap();
    assert!(json.get("signer").is_some());
    assert_eq!(json["signature"].as_str().unwrap().len(), 2 + 65 * 2);

    let decoded: SignedContextV1 = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, signed);
    assert!(decoded.verify(0).is_ok());
}

#[test]
fn test_stack_item_json() {
    assert_eq!(serde_json::to_string(&StackItem::Sentinel).unwrap(), r#""sentinel""#);
    let value = StackItem::Value(U256::from(255));
    let encoded = serde_json::to_string(&value).unwrap();
    assert_eq!(serde_json::from_str::<StackItem>(&encoded).unwrap(), value);
}

#[test]
fn test_ensure_revert_data() {
    let error = InterpreterError::Eval(EvalError::EnsureFailed { position: 3, input: 1 });
    let data = encode_revert(&error);
    let selector = IInterpreterErrors::EnsureFailed::SELECTOR;
    assert_eq!(hex::encode(&data[..4]), hex::encode(selector));
    // selector, then two words
    assert_eq!(data.len(), 4 + 64);
    assert_eq!(data[4 + 31], 3);
    assert_eq!(data[4 + 63], 1);
}
