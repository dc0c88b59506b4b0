//! Builtin classes and modules of the host object model.
//!
//! The table is built once per process. Method tables list the operations
//! capability checks care about; they are not meant to be exhaustive.

use std::sync::LazyLock;

use super::{Class, ClassRef};

const BASIC_OBJECT_METHODS: &[&str] = &[
    "!", "!=", "==", "__id__", "__send__", "equal?", "instance_eval", "instance_exec",
];

const KERNEL_METHODS: &[&str] = &[
    "===", "class", "dup", "clone", "eql?", "freeze", "frozen?", "hash", "inspect",
    "instance_of?", "instance_variables", "is_a?", "kind_of?", "method", "methods", "nil?",
    "object_id", "respond_to?", "send", "tap", "then", "to_s",
];

const COMPARABLE_METHODS: &[&str] = &["<", "<=", "==", ">", ">=", "between?", "clamp"];

const ENUMERABLE_METHODS: &[&str] = &[
    "all?", "any?", "count", "each_slice", "each_with_index", "each_with_object", "entries",
    "find", "first", "flat_map", "group_by", "include?", "inject", "map", "max", "min",
    "none?", "reduce", "reject", "select", "sort", "sort_by", "sum", "to_a", "zip",
];

const NUMERIC_METHODS: &[&str] = &[
    "%", "*", "+", "-", "-@", "/", "<=>", "abs", "ceil", "coerce", "divmod", "floor",
    "integer?", "negative?", "nonzero?", "positive?", "real?", "round", "step", "to_int",
    "truncate", "zero?",
];

const INTEGER_METHODS: &[&str] = &[
    "**", "&", "|", "^", "<<", ">>", "bit_length", "chr", "digits", "downto", "even?", "gcd",
    "lcm", "odd?", "pred", "succ", "times", "to_c", "to_f", "to_i", "to_r", "to_s", "upto",
];

const FLOAT_METHODS: &[&str] = &[
    "**", "finite?", "infinite?", "nan?", "next_float", "prev_float", "to_c", "to_f", "to_i",
    "to_r", "to_s",
];

const STRING_METHODS: &[&str] = &[
    "%", "*", "+", "<=>", "=~", "bytes", "capitalize", "chars", "downcase", "each_char",
    "empty?", "encoding", "end_with?", "gsub", "include?", "length", "lines", "match",
    "reverse", "size", "split", "start_with?", "strip", "sub", "to_f", "to_i", "to_r", "to_s",
    "to_str", "to_sym", "upcase",
];

const SYMBOL_METHODS: &[&str] = &[
    "<=>", "downcase", "empty?", "id2name", "length", "name", "size", "to_proc", "to_s",
    "to_sym", "upcase",
];

const ARRAY_METHODS: &[&str] = &[
    "&", "*", "+", "-", "<<", "[]", "[]=", "compact", "concat", "delete", "each", "empty?",
    "flatten", "index", "join", "last", "length", "pop", "push", "reverse", "shift", "size",
    "to_a", "to_ary", "to_h", "uniq", "unshift", "|",
];

const HASH_METHODS: &[&str] = &[
    "[]", "[]=", "delete", "dig", "each", "each_pair", "empty?", "fetch", "has_key?", "key?",
    "keys", "length", "merge", "size", "to_a", "to_h", "to_hash", "transform_values",
    "value?", "values",
];

const NIL_METHODS: &[&str] = &["&", "|", "to_a", "to_f", "to_h", "to_i", "to_s"];

const BOOLEAN_LITERAL_METHODS: &[&str] = &["&", "^", "|", "to_s"];

struct Builtins {
    basic_object: ClassRef,
    kernel: ClassRef,
    object: ClassRef,
    comparable: ClassRef,
    enumerable: ClassRef,
    boolean: ClassRef,
    numeric: ClassRef,
    integer: ClassRef,
    float: ClassRef,
    string: ClassRef,
    symbol: ClassRef,
    array: ClassRef,
    hash: ClassRef,
    nil_class: ClassRef,
    true_class: ClassRef,
    false_class: ClassRef,
}

impl Builtins {
    fn new() -> Self {
        let basic_object = Class::define("BasicObject")
            .methods(BASIC_OBJECT_METHODS.iter().copied())
            .build_root();
        let kernel = Class::module("Kernel")
            .methods(KERNEL_METHODS.iter().copied())
            .build();
        let object = Class::define("Object")
            .superclass(basic_object.clone())
            .include(kernel.clone())
            .build_root();

        // `build` would default the superclass through this table while it is
        // still initializing; builtin classes always go through `build_root`.
        let subclass = |name: &str, superclass: &ClassRef, modules: &[&ClassRef], methods: &[&str]| {
            modules
                .iter()
                .fold(
                    Class::define(name).superclass(superclass.clone()),
                    |builder, module| builder.include((*module).clone()),
                )
                .methods(methods.iter().copied())
                .build_root()
        };

        let comparable = Class::module("Comparable")
            .methods(COMPARABLE_METHODS.iter().copied())
            .build();
        let enumerable = Class::module("Enumerable")
            .methods(ENUMERABLE_METHODS.iter().copied())
            .build();
        let boolean = Class::module("Boolean").build();

        let numeric = subclass("Numeric", &object, &[&comparable], NUMERIC_METHODS);
        let integer = subclass("Integer", &numeric, &[], INTEGER_METHODS);
        let float = subclass("Float", &numeric, &[], FLOAT_METHODS);
        let string = subclass("String", &object, &[&comparable], STRING_METHODS);
        let symbol = subclass("Symbol", &object, &[&comparable], SYMBOL_METHODS);
        let array = subclass("Array", &object, &[&enumerable], ARRAY_METHODS);
        let hash = subclass("Hash", &object, &[&enumerable], HASH_METHODS);
        let nil_class = subclass("NilClass", &object, &[], NIL_METHODS);
        let true_class = subclass("TrueClass", &object, &[&boolean], BOOLEAN_LITERAL_METHODS);
        let false_class = subclass("FalseClass", &object, &[&boolean], BOOLEAN_LITERAL_METHODS);

        Self {
            basic_object,
            kernel,
            object,
            comparable,
            enumerable,
            boolean,
            numeric,
            integer,
            float,
            string,
            symbol,
            array,
            hash,
            nil_class,
            true_class,
            false_class,
        }
    }

    fn all(&self) -> [&ClassRef; 16] {
        [
            &self.basic_object,
            &self.kernel,
            &self.object,
            &self.comparable,
            &self.enumerable,
            &self.boolean,
            &self.numeric,
            &self.integer,
            &self.float,
            &self.string,
            &self.symbol,
            &self.array,
            &self.hash,
            &self.nil_class,
            &self.true_class,
            &self.false_class,
        ]
    }
}

static BUILTINS: LazyLock<Builtins> = LazyLock::new(Builtins::new);

/// Resolve a builtin class or module by name.
pub fn lookup(name: &str) -> Option<ClassRef> {
    BUILTINS
        .all()
        .into_iter()
        .find(|class| class.name() == name)
        .cloned()
}

/// Returns true if the given name is a builtin class or module.
pub fn is_builtin(name: &str) -> bool {
    BUILTINS.all().iter().any(|class| class.name() == name)
}

pub fn basic_object() -> ClassRef {
    BUILTINS.basic_object.clone()
}

pub fn kernel() -> ClassRef {
    BUILTINS.kernel.clone()
}

pub fn object() -> ClassRef {
    BUILTINS.object.clone()
}

pub fn comparable() -> ClassRef {
    BUILTINS.comparable.clone()
}

pub fn enumerable() -> ClassRef {
    BUILTINS.enumerable.clone()
}

/// Module included by `TrueClass` and `FalseClass`.
pub fn boolean() -> ClassRef {
    BUILTINS.boolean.clone()
}

pub fn numeric() -> ClassRef {
    BUILTINS.numeric.clone()
}

pub fn integer() -> ClassRef {
    BUILTINS.integer.clone()
}

pub fn float() -> ClassRef {
    BUILTINS.float.clone()
}

pub fn string() -> ClassRef {
    BUILTINS.string.clone()
}

pub fn symbol() -> ClassRef {
    BUILTINS.symbol.clone()
}

pub fn array() -> ClassRef {
    BUILTINS.array.clone()
}

pub fn hash() -> ClassRef {
    BUILTINS.hash.clone()
}

pub fn nil_class() -> ClassRef {
    BUILTINS.nil_class.clone()
}

pub fn true_class() -> ClassRef {
    BUILTINS.true_class.clone()
}

pub fn false_class() -> ClassRef {
    BUILTINS.false_class.clone()
}
