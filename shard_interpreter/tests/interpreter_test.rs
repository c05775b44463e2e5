//! End-to-end interpreter tests

use shard_interpreter::{Interpreter, RuntimeError, Value};
use shard_ir::codec::{deserialize, serialize};
use shard_ir::*;

/// One function per arithmetic operation over `ty`, each taking two
/// parameters and returning the result.
fn arithmetic_module(ty: Type) -> Module {
    let mut module = Module::new();
    for (name, op) in [
        ("add", BinaryOp::Add),
        ("sub", BinaryOp::Sub),
        ("mul", BinaryOp::Mul),
        ("div", BinaryOp::Div),
        ("rem", BinaryOp::Rem),
    ] {
        let f = module.create_function(name, Some(ty.clone()), vec![ty.clone(), ty.clone()]);
        let block = f.create_block();
        let result = f
            .binary(
                block,
                op,
                ty.clone(),
                Operand::Value(f.arg(0)),
                Operand::Value(f.arg(1)),
            )
            .unwrap();
        f.ret(block, ty.clone(), Operand::Value(result)).unwrap();
    }
    module
}

fn loaded(module: Module) -> Interpreter {
    let mut interpreter = Interpreter::new();
    interpreter.load(module);
    interpreter
}

#[test]
fn add_returns_the_sum_of_its_arguments() {
    let interpreter = loaded(arithmetic_module(Type::Int32));

    let result = interpreter
        .call("add", &[Value::Int32(2), Value::Int32(5)])
        .unwrap();
    assert_eq!(result, Some(Value::Int32(7)));

    let result = interpreter
        .call("add", &[Value::Int32(-3), Value::Int32(3)])
        .unwrap();
    assert_eq!(result, Some(Value::Int32(0)));
}

#[test]
fn arithmetic_matches_host_semantics_across_types() {
    macro_rules! check {
        ($ty:expr, $variant:ident, $a:expr, $b:expr) => {{
            let interpreter = loaded(arithmetic_module($ty));
            assert_eq!(
                interpreter.call("add", &[Value::$variant($a), Value::$variant($b)]),
                Ok(Some(Value::$variant($a + $b)))
            );
            assert_eq!(
                interpreter.call("sub", &[Value::$variant($a), Value::$variant($b)]),
                Ok(Some(Value::$variant($a - $b)))
            );
            assert_eq!(
                interpreter.call("mul", &[Value::$variant($a), Value::$variant($b)]),
                Ok(Some(Value::$variant($a * $b)))
            );
            assert_eq!(
                interpreter.call("div", &[Value::$variant($a), Value::$variant($b)]),
                Ok(Some(Value::$variant($a / $b)))
            );
            assert_eq!(
                interpreter.call("rem", &[Value::$variant($a), Value::$variant($b)]),
                Ok(Some(Value::$variant($a % $b)))
            );
        }};
    }

    check!(Type::Int8, Int8, 13i8, 5i8);
    check!(Type::Int16, Int16, -300i16, 7i16);
    check!(Type::Int32, Int32, 100_000i32, -17i32);
    check!(Type::Int64, Int64, -4_000_000_000i64, 3i64);
    check!(Type::Float32, Float32, 3.5f32, 0.5f32);
    check!(Type::Float64, Float64, -2.25f64, 1.5f64);
}

#[test]
fn mul_on_float32() {
    let interpreter = loaded(arithmetic_module(Type::Float32));
    let result = interpreter
        .call("mul", &[Value::Float32(3.0), Value::Float32(7.0)])
        .unwrap();
    assert_eq!(result, Some(Value::Float32(21.0)));
}

#[test]
fn division_by_zero_aborts_the_call() {
    let interpreter = loaded(arithmetic_module(Type::Int32));
    assert_eq!(
        interpreter.call("div", &[Value::Int32(1), Value::Int32(0)]),
        Err(RuntimeError::DivisionByZero)
    );
    assert_eq!(
        interpreter.call("rem", &[Value::Int32(1), Value::Int32(0)]),
        Err(RuntimeError::DivisionByZero)
    );
}

#[test]
fn store_then_load_round_trips_through_memory() {
    // main() -> int32: alloc, store 42, load, return.
    let mut module = Module::new();
    let main = module.create_function("main", Some(Type::Int32), vec![]);
    let block = main.create_block();
    let cell = main.alloc(block, Type::Int32, 1).unwrap();
    main.store(
        block,
        Operand::Value(cell),
        Operand::Const(Constant::Int32(42)),
        0,
    )
    .unwrap();
    let loaded_value = main.load(block, Operand::Value(cell), 0).unwrap();
    main.ret(block, Type::Int32, Operand::Value(loaded_value))
        .unwrap();

    let interpreter = loaded(module);
    assert_eq!(interpreter.call("main", &[]), Ok(Some(Value::Int32(42))));
}

#[test]
fn calls_resolve_by_name_and_propagate_results() {
    // inc(int32) = arg0 + 1; main() = inc(10).
    let mut module = Module::new();

    {
        let inc = module.create_function("inc", Some(Type::Int32), vec![Type::Int32]);
        let block = inc.create_block();
        let sum = inc
            .binary(
                block,
                BinaryOp::Add,
                Type::Int32,
                Operand::Value(inc.arg(0)),
                Operand::Const(Constant::Int32(1)),
            )
            .unwrap();
        inc.ret(block, Type::Int32, Operand::Value(sum)).unwrap();
    }

    {
        let main = module.create_function("main", Some(Type::Int32), vec![]);
        let block = main.create_block();
        let result = main
            .call(
                block,
                "inc",
                Some(Type::Int32),
                vec![Operand::Const(Constant::Int32(10))],
            )
            .unwrap()
            .unwrap();
        main.ret(block, Type::Int32, Operand::Value(result)).unwrap();
    }

    let interpreter = loaded(module);
    assert_eq!(interpreter.call("main", &[]), Ok(Some(Value::Int32(11))));
}

#[test]
fn deserialized_modules_execute_identically() {
    let module = arithmetic_module(Type::Int32);
    let mut bytes = Vec::new();
    serialize(&mut bytes, &module).unwrap();
    let restored = deserialize(&mut bytes.as_slice()).unwrap();

    let interpreter = loaded(restored);
    assert_eq!(
        interpreter.call("add", &[Value::Int32(2), Value::Int32(5)]),
        Ok(Some(Value::Int32(7)))
    );
}

#[test]
fn overloads_resolve_by_argument_types() {
    let mut module = Module::new();
    for ty in [Type::Int32, Type::Float32] {
        let f = module.create_function("add", Some(ty.clone()), vec![ty.clone(), ty.clone()]);
        let block = f.create_block();
        let sum = f
            .binary(
                block,
                BinaryOp::Add,
                ty.clone(),
                Operand::Value(f.arg(0)),
                Operand::Value(f.arg(1)),
            )
            .unwrap();
        f.ret(block, ty.clone(), Operand::Value(sum)).unwrap();
    }

    let interpreter = loaded(module);
    assert_eq!(
        interpreter.call("add", &[Value::Int32(1), Value::Int32(2)]),
        Ok(Some(Value::Int32(3)))
    );
    assert_eq!(
        interpreter.call("add", &[Value::Float32(1.5), Value::Float32(2.5)]),
        Ok(Some(Value::Float32(4.0)))
    );
}

#[test]
fn comparisons_and_branches_drive_control_flow() {
    // max(int32, int32): branch on a < b.
    let mut module = Module::new();
    let max = module.create_function("max", Some(Type::Int32), vec![Type::Int32, Type::Int32]);
    let entry = max.create_block();
    let take_b = max.create_block();
    let take_a = max.create_block();

    let is_less = max
        .cmp(
            entry,
            CmpOp::LessThan,
            Type::Int32,
            Operand::Value(max.arg(0)),
            Operand::Value(max.arg(1)),
        )
        .unwrap();
    max.branch_if(entry, Operand::Value(is_less), take_b, take_a)
        .unwrap();
    max.ret(take_b, Type::Int32, Operand::Value(max.arg(1))).unwrap();
    max.ret(take_a, Type::Int32, Operand::Value(max.arg(0))).unwrap();

    let interpreter = loaded(module);
    assert_eq!(
        interpreter.call("max", &[Value::Int32(3), Value::Int32(9)]),
        Ok(Some(Value::Int32(9)))
    );
    assert_eq!(
        interpreter.call("max", &[Value::Int32(5), Value::Int32(-5)]),
        Ok(Some(Value::Int32(5)))
    );
}

#[test]
fn loops_execute_block_graphs() {
    // sum(n): total = 0; i = 0; while (i < n) { total += i; i += 1 } return total
    let mut module = Module::new();
    let sum = module.create_function("sum", Some(Type::Int32), vec![Type::Int32]);
    let entry = sum.create_block();
    let head = sum.create_block();
    let body = sum.create_block();
    let exit = sum.create_block();

    let total = sum.alloc(entry, Type::Int32, 1).unwrap();
    let i = sum.alloc(entry, Type::Int32, 1).unwrap();
    sum.store(
        entry,
        Operand::Value(total),
        Operand::Const(Constant::Int32(0)),
        0,
    )
    .unwrap();
    sum.store(
        entry,
        Operand::Value(i),
        Operand::Const(Constant::Int32(0)),
        0,
    )
    .unwrap();
    sum.branch(entry, head).unwrap();

    let i_now = sum.load(head, Operand::Value(i), 0).unwrap();
    let keep_going = sum
        .cmp(
            head,
            CmpOp::LessThan,
            Type::Int32,
            Operand::Value(i_now),
            Operand::Value(sum.arg(0)),
        )
        .unwrap();
    sum.branch_if(head, Operand::Value(keep_going), body, exit)
        .unwrap();

    let total_now = sum.load(body, Operand::Value(total), 0).unwrap();
    let i_again = sum.load(body, Operand::Value(i), 0).unwrap();
    let new_total = sum
        .binary(
            body,
            BinaryOp::Add,
            Type::Int32,
            Operand::Value(total_now),
            Operand::Value(i_again),
        )
        .unwrap();
    let new_i = sum
        .binary(
            body,
            BinaryOp::Add,
            Type::Int32,
            Operand::Value(i_again),
            Operand::Const(Constant::Int32(1)),
        )
        .unwrap();
    sum.store(body, Operand::Value(total), Operand::Value(new_total), 0)
        .unwrap();
    sum.store(body, Operand::Value(i), Operand::Value(new_i), 0)
        .unwrap();
    sum.branch(body, head).unwrap();

    let result = sum.load(exit, Operand::Value(total), 0).unwrap();
    sum.ret(exit, Type::Int32, Operand::Value(result)).unwrap();

    let interpreter = loaded(module);
    // 0 + 1 + ... + 9
    assert_eq!(interpreter.call("sum", &[Value::Int32(10)]), Ok(Some(Value::Int32(45))));
    assert_eq!(interpreter.call("sum", &[Value::Int32(0)]), Ok(Some(Value::Int32(0))));
}

#[test]
fn unresolved_calls_are_runtime_errors() {
    let interpreter = loaded(Module::new());
    assert_eq!(
        interpreter.call("missing", &[]),
        Err(RuntimeError::UnresolvedCall("missing".into()))
    );
}

#[test]
fn extrinsics_are_consulted_after_module_lookup() {
    let mut module = Module::new();
    let main = module.create_function("main", Some(Type::Int32), vec![]);
    let block = main.create_block();
    let answer = main
        .call(block, "host_answer", Some(Type::Int32), vec![])
        .unwrap()
        .unwrap();
    main.ret(block, Type::Int32, Operand::Value(answer)).unwrap();

    let mut interpreter = Interpreter::new();
    interpreter.load(module);
    interpreter.register_extrinsic(
        "host_answer",
        Box::new(|_args| Ok(Some(Value::Int32(42)))),
    );

    assert_eq!(interpreter.call("main", &[]), Ok(Some(Value::Int32(42))));
}

#[test]
fn module_functions_shadow_extrinsics() {
    let mut module = Module::new();
    let f = module.create_function("answer", Some(Type::Int32), vec![]);
    let block = f.create_block();
    let value = f
        .binary(
            block,
            BinaryOp::Add,
            Type::Int32,
            Operand::Const(Constant::Int32(0)),
            Operand::Const(Constant::Int32(0)),
        )
        .unwrap();
    f.ret(block, Type::Int32, Operand::Value(value)).unwrap();

    let mut interpreter = Interpreter::new();
    interpreter.load(module);
    interpreter.register_extrinsic("answer", Box::new(|_| Ok(Some(Value::Int32(-1)))));

    assert_eq!(interpreter.call("answer", &[]), Ok(Some(Value::Int32(0))));
}

#[test]
fn wrong_argument_types_are_rejected() {
    let interpreter = loaded(arithmetic_module(Type::Int32));
    let err = interpreter
        .call("add", &[Value::Int32(1), Value::Int64(2)])
        .unwrap_err();
    assert!(matches!(err, RuntimeError::TypeMismatch(_)));
}

#[test]
fn elementwise_store_and_load_use_the_index() {
    let mut module = Module::new();
    let f = module.create_function("pick", Some(Type::Int32), vec![]);
    let block = f.create_block();
    let buf = f.alloc(block, Type::Int32, 3).unwrap();
    for (index, value) in [10, 20, 30].into_iter().enumerate() {
        f.store(
            block,
            Operand::Value(buf),
            Operand::Const(Constant::Int32(value)),
            index as u32,
        )
        .unwrap();
    }
    let middle = f.load(block, Operand::Value(buf), 1).unwrap();
    f.ret(block, Type::Int32, Operand::Value(middle)).unwrap();

    let interpreter = loaded(module);
    assert_eq!(interpreter.call("pick", &[]), Ok(Some(Value::Int32(20))));
}
