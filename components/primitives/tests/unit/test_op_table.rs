//! Unit tests for the PrimitiveOp table

use core_types::{MappingRef, Value};
use primitives::{OpError, PrimitiveOp};

#[test]
fn test_every_op_rejects_too_few_arguments() {
    for op in PrimitiveOp::ALL {
        let (min, _) = op.arity();
        if min == 0 {
            continue;
        }
        let args = vec![Value::Null; min - 1];
        match op.apply(&args) {
            Err(OpError::InvalidArgument { op: name, .. }) => assert_eq!(name, op.name()),
            other => panic!("{} accepted {} argument(s): {:?}", op, min - 1, other),
        }
    }
}

#[test]
fn test_fixed_arity_rejects_extra_arguments() {
    let err = PrimitiveOp::Neg
        .apply(&[Value::Int(1), Value::Int(2)])
        .unwrap_err();
    assert!(err.to_string().contains("expects 1 argument(s), got 2"));
}

#[test]
fn test_metatable_ops_through_table() {
    let target = Value::mapping();
    let meta = Value::Mapping(MappingRef::new());
    PrimitiveOp::SetMetatable
        .apply(&[target.clone(), meta.clone()])
        .unwrap();
    let got = PrimitiveOp::GetMetatable.apply(&[target]).unwrap();
    assert!(got.same(&meta));

    let err = PrimitiveOp::SetMetatable
        .apply(&[Value::Float(1.5), meta])
        .unwrap_err();
    assert!(matches!(err, OpError::InvalidMetatableTarget { .. }));
}

#[test]
fn test_create_and_get_prototype() {
    let parent = Value::mapping();
    let child = PrimitiveOp::Create.apply(&[parent.clone()]).unwrap();
    assert!(PrimitiveOp::GetPrototype.apply(&[child]).unwrap().same(&parent));
    let orphan = PrimitiveOp::Create.apply(&[Value::Null]).unwrap();
    assert_eq!(PrimitiveOp::GetPrototype.apply(&[orphan]), Ok(Value::Null));
}

#[test]
fn test_json_round_trip_through_table() {
    let decoded = PrimitiveOp::JsonDecode
        .apply(&[Value::from("[1, \"two\", null]")])
        .unwrap();
    assert_eq!(
        PrimitiveOp::JsonEncode.apply(&[decoded]),
        Ok(Value::from("[1,\"two\",null]"))
    );
}

#[test]
fn test_bitwise_through_table() {
    assert_eq!(
        PrimitiveOp::BitXor.apply(&[Value::Int(6), Value::Int(3)]),
        Ok(Value::Int(5))
    );
    assert_eq!(PrimitiveOp::BitNot.apply(&[Value::Int(5)]), Ok(Value::Int(-6)));
}
