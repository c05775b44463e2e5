//! The built-in example module printed when no input file is given

use shard_ir::{BinaryOp, Constant, Module, Operand, Type};

/// An `add` function plus a `main` that stores two constants, loads them
/// back, adds them through a call and hands the result to host functions.
pub fn example_module() -> Module {
    let mut module = Module::new();

    let one = module.create_constant(Constant::Int32(1));
    let two = module.create_constant(Constant::Int32(2));
    let string_type = module.create_pointer_type(Type::Int8);

    {
        let add = module.create_function("add", Some(Type::Int32), vec![Type::Int32, Type::Int32]);
        let block = add.create_block();
        let sum = add
            .binary(
                block,
                BinaryOp::Add,
                Type::Int32,
                Operand::Value(add.arg(0)),
                Operand::Value(add.arg(1)),
            )
            .expect("example module is well-formed");
        add.ret(block, Type::Int32, Operand::Value(sum))
            .expect("example module is well-formed");
    }

    {
        let main = module.create_function("main", None, vec![]);
        let block = main.create_block();

        let cell1 = main
            .alloc(block, Type::Int32, 1)
            .expect("example module is well-formed");
        let cell2 = main
            .alloc(block, Type::Int32, 1)
            .expect("example module is well-formed");

        main.store(block, Operand::Value(cell1), Operand::Const(one), 0)
            .expect("example module is well-formed");
        main.store(block, Operand::Value(cell2), Operand::Const(two), 0)
            .expect("example module is well-formed");

        let value1 = main
            .load(block, Operand::Value(cell1), 0)
            .expect("example module is well-formed");
        let value2 = main
            .load(block, Operand::Value(cell2), 0)
            .expect("example module is well-formed");

        let sum = main
            .call(
                block,
                "add",
                Some(Type::Int32),
                vec![Operand::Value(value1), Operand::Value(value2)],
            )
            .expect("example module is well-formed")
            .expect("call returns a value");

        let text = main
            .call(
                block,
                "toString",
                Some(string_type),
                vec![Operand::Value(sum)],
            )
            .expect("example module is well-formed")
            .expect("call returns a value");

        main.call(block, "print", None, vec![Operand::Value(text)])
            .expect("example module is well-formed");
        main.call(block, "free", None, vec![Operand::Value(text)])
            .expect("example module is well-formed");

        main.ret_void(block).expect("example module is well-formed");
    }

    module
}
