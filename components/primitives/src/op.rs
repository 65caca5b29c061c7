//! Operation ids.
//!
//! Profiles bind their method and builtin names to [`PrimitiveOp`] ids as
//! plain data, so the set of available operations is closed and named here
//! once. The serialized name of each id is the string used in profile
//! documents.

use core_types::Value;
use serde::{Deserialize, Serialize};

use crate::arith::Arithmetic;
use crate::bitwise::Bitwise;
use crate::compare::Comparison;
use crate::container::ContainerOps;
use crate::convert::Convert;
use crate::error::{OpError, OpResult};
use crate::json::JsonOps;
use crate::meta::MetaOps;
use crate::string::StringOps;

macro_rules! primitive_ops {
    (@max _) => { None };
    (@max $n:literal) => { Some($n) };
    ($($(#[$doc:meta])* $variant:ident = $name:literal, ($min:literal, $max:tt);)*) => {
        /// Identifier of a primitive operation
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum PrimitiveOp {
            $(
                $(#[$doc])*
                #[serde(rename = $name)]
                $variant,
            )*
        }

        impl PrimitiveOp {
            /// Every operation id
            pub const ALL: &'static [PrimitiveOp] = &[$(PrimitiveOp::$variant),*];

            /// Serialized name
            pub fn name(self) -> &'static str {
                match self {
                    $(PrimitiveOp::$variant => $name,)*
                }
            }

            /// Minimum and maximum argument counts (`None` = variadic)
            pub fn arity(self) -> (usize, Option<usize>) {
                match self {
                    $(PrimitiveOp::$variant => ($min, primitive_ops!(@max $max)),)*
                }
            }
        }
    };
}

primitive_ops! {
    /// a + b
    Add = "add", (2, 2);
    /// a - b
    Sub = "sub", (2, 2);
    /// a * b
    Mul = "mul", (2, 2);
    /// IEEE float division
    Div = "div", (2, 2);
    /// Float division rejecting zero
    CheckedDiv = "checked_div", (2, 2);
    /// Truncating integer division
    Quot = "quot", (2, 2);
    /// Floored division
    FloorDiv = "floor_div", (2, 2);
    /// Floored modulo
    Mod = "mod", (2, 2);
    /// Truncated remainder
    Rem = "rem", (2, 2);
    /// Exponentiation
    Pow = "pow", (2, 2);
    /// Negation
    Neg = "neg", (1, 1);
    /// Absolute value
    Abs = "abs", (1, 1);
    /// Floor
    Floor = "floor", (1, 1);
    /// Ceiling
    Ceil = "ceil", (1, 1);
    /// Square root
    Sqrt = "sqrt", (1, 1);
    /// Largest argument
    Max = "max", (1, _);
    /// Smallest argument
    Min = "min", (1, _);
    /// Strict equality
    Eq = "eq", (2, 2);
    /// Strict inequality
    Ne = "ne", (2, 2);
    /// Less than
    Lt = "lt", (2, 2);
    /// Less or equal
    Le = "le", (2, 2);
    /// Greater than
    Gt = "gt", (2, 2);
    /// Greater or equal
    Ge = "ge", (2, 2);
    /// Bitwise and
    BitAnd = "bit_and", (2, 2);
    /// Bitwise or
    BitOr = "bit_or", (2, 2);
    /// Bitwise xor
    BitXor = "bit_xor", (2, 2);
    /// Bitwise complement
    BitNot = "bit_not", (1, 1);
    /// Left shift
    Shl = "shl", (2, 2);
    /// Arithmetic right shift
    Shr = "shr", (2, 2);
    /// Uppercase
    Upper = "upper", (1, 1);
    /// Lowercase
    Lower = "lower", (1, 1);
    /// Trim whitespace
    Trim = "trim", (1, 1);
    /// Split into a sequence
    Split = "split", (1, 2);
    /// Join a sequence
    Join = "join", (1, 2);
    /// Replace every occurrence
    Replace = "replace", (3, 3);
    /// Replace the first occurrence
    ReplaceFirst = "replace_first", (3, 3);
    /// Prefix test
    StartsWith = "starts_with", (2, 2);
    /// Suffix test
    EndsWith = "ends_with", (2, 2);
    /// Repeat a string
    Repeat = "repeat", (2, 2);
    /// Substring position
    Find = "find", (2, 2);
    /// Regular expression matches
    StrMatch = "str_match", (2, 2);
    /// Concatenation
    Concat = "concat", (2, 2);
    /// Raw read
    Get = "get", (2, 2);
    /// Raw write
    Set = "set", (3, 3);
    /// Append elements
    Append = "append", (1, _);
    /// Remove last element
    Pop = "pop", (1, 1);
    /// Remove first element
    Shift = "shift", (1, 1);
    /// Insert at a slot
    Insert = "insert", (3, 3);
    /// Remove a slot or entry
    Remove = "remove", (2, 2);
    /// Reverse
    Reverse = "reverse", (1, 1);
    /// Membership test
    Contains = "contains", (2, 2);
    /// Element position
    IndexOf = "index_of", (2, 2);
    /// Keys
    Keys = "keys", (1, 1);
    /// Values
    Values = "values", (1, 1);
    /// Length
    Len = "len", (1, 1);
    /// Remove everything
    Clear = "clear", (1, 1);
    /// Slice
    Slice = "slice", (1, 3);
    /// Build a sequence
    NewSequence = "new_sequence", (0, _);
    /// Build a mapping from key/value pairs
    NewMapping = "new_mapping", (0, _);
    /// Build a mapping with a prototype
    Create = "create", (1, 1);
    /// Read a prototype link
    GetPrototype = "get_prototype", (1, 1);
    /// Attach a metatable
    SetMetatable = "set_metatable", (2, 2);
    /// Read a metatable
    GetMetatable = "get_metatable", (1, 1);
    /// Convert to integer
    ToInt = "to_int", (1, 1);
    /// Convert to float
    ToFloat = "to_float", (1, 1);
    /// Convert to string
    ToString = "to_string", (1, 1);
    /// Neutral truthiness
    ToBool = "to_bool", (1, 1);
    /// Type name
    TypeOf = "type_of", (1, 1);
    /// Encode JSON
    JsonEncode = "json_encode", (1, 1);
    /// Decode JSON
    JsonDecode = "json_decode", (1, 1);
}

impl PrimitiveOp {
    /// Look an operation up by its serialized name
    pub fn from_name(name: &str) -> Option<PrimitiveOp> {
        PrimitiveOp::ALL.iter().copied().find(|op| op.name() == name)
    }

    /// Run the operation on raw arguments.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_types::Value;
    /// use primitives::PrimitiveOp;
    ///
    /// let sum = PrimitiveOp::Add.apply(&[Value::Int(40), Value::Int(2)]).unwrap();
    /// assert_eq!(sum, Value::Int(42));
    ///
    /// assert!(PrimitiveOp::Upper.apply(&[]).is_err());
    /// ```
    pub fn apply(self, args: &[Value]) -> OpResult<Value> {
        let (min, max) = self.arity();
        if args.len() < min || max.map_or(false, |m| args.len() > m) {
            let expected = match max {
                Some(m) if m == min => format!("{}", min),
                Some(m) => format!("{} to {}", min, m),
                None => format!("at least {}", min),
            };
            return Err(OpError::invalid(
                self.name(),
                format!("expects {} argument(s), got {}", expected, args.len()),
            ));
        }
        let a = move |i: usize| &args[i];
        let opt = move |i: usize| args.get(i);
        match self {
            PrimitiveOp::Add => Arithmetic::add(a(0), a(1)),
            PrimitiveOp::Sub => Arithmetic::sub(a(0), a(1)),
            PrimitiveOp::Mul => Arithmetic::mul(a(0), a(1)),
            PrimitiveOp::Div => Arithmetic::div(a(0), a(1)),
            PrimitiveOp::CheckedDiv => Arithmetic::checked_div(a(0), a(1)),
            PrimitiveOp::Quot => Arithmetic::quot(a(0), a(1)),
            PrimitiveOp::FloorDiv => Arithmetic::floor_div(a(0), a(1)),
            PrimitiveOp::Mod => Arithmetic::modulo(a(0), a(1)),
            PrimitiveOp::Rem => Arithmetic::rem(a(0), a(1)),
            PrimitiveOp::Pow => Arithmetic::pow(a(0), a(1)),
            PrimitiveOp::Neg => Arithmetic::neg(a(0)),
            PrimitiveOp::Abs => Arithmetic::abs(a(0)),
            PrimitiveOp::Floor => Arithmetic::floor(a(0)),
            PrimitiveOp::Ceil => Arithmetic::ceil(a(0)),
            PrimitiveOp::Sqrt => Arithmetic::sqrt(a(0)),
            PrimitiveOp::Max => Arithmetic::max(args),
            PrimitiveOp::Min => Arithmetic::min(args),
            PrimitiveOp::Eq => Ok(Value::Boolean(Comparison::eq(a(0), a(1)))),
            PrimitiveOp::Ne => Ok(Value::Boolean(!Comparison::eq(a(0), a(1)))),
            PrimitiveOp::Lt => Comparison::lt(a(0), a(1)).map(Value::Boolean),
            PrimitiveOp::Le => Comparison::le(a(0), a(1)).map(Value::Boolean),
            PrimitiveOp::Gt => Comparison::gt(a(0), a(1)).map(Value::Boolean),
            PrimitiveOp::Ge => Comparison::ge(a(0), a(1)).map(Value::Boolean),
            PrimitiveOp::BitAnd => Bitwise::and(a(0), a(1)),
            PrimitiveOp::BitOr => Bitwise::or(a(0), a(1)),
            PrimitiveOp::BitXor => Bitwise::xor(a(0), a(1)),
            PrimitiveOp::BitNot => Bitwise::not(a(0)),
            PrimitiveOp::Shl => Bitwise::shl(a(0), a(1)),
            PrimitiveOp::Shr => Bitwise::shr(a(0), a(1)),
            PrimitiveOp::Upper => StringOps::upper(a(0)),
            PrimitiveOp::Lower => StringOps::lower(a(0)),
            PrimitiveOp::Trim => StringOps::trim(a(0)),
            PrimitiveOp::Split => StringOps::split(a(0), opt(1)),
            PrimitiveOp::Join => StringOps::join(a(0), opt(1)),
            PrimitiveOp::Replace => StringOps::replace(a(0), a(1), a(2)),
            PrimitiveOp::ReplaceFirst => StringOps::replace_first(a(0), a(1), a(2)),
            PrimitiveOp::StartsWith => StringOps::starts_with(a(0), a(1)),
            PrimitiveOp::EndsWith => StringOps::ends_with(a(0), a(1)),
            PrimitiveOp::Repeat => StringOps::repeat(a(0), a(1)),
            PrimitiveOp::Find => StringOps::find(a(0), a(1)),
            PrimitiveOp::StrMatch => StringOps::str_match(a(0), a(1)),
            PrimitiveOp::Concat => StringOps::concat(a(0), a(1)),
            PrimitiveOp::Get => ContainerOps::get(a(0), a(1)),
            PrimitiveOp::Set => ContainerOps::set(a(0), a(1), a(2).clone()),
            PrimitiveOp::Append => ContainerOps::append(a(0), &args[1..]),
            PrimitiveOp::Pop => ContainerOps::pop(a(0)),
            PrimitiveOp::Shift => ContainerOps::shift(a(0)),
            PrimitiveOp::Insert => ContainerOps::insert(a(0), a(1), a(2).clone()),
            PrimitiveOp::Remove => ContainerOps::remove(a(0), a(1)),
            PrimitiveOp::Reverse => ContainerOps::reverse(a(0)),
            PrimitiveOp::Contains => ContainerOps::contains(a(0), a(1)),
            PrimitiveOp::IndexOf => ContainerOps::index_of(a(0), a(1)),
            PrimitiveOp::Keys => ContainerOps::keys(a(0)),
            PrimitiveOp::Values => ContainerOps::values(a(0)),
            PrimitiveOp::Len => ContainerOps::len(a(0)),
            PrimitiveOp::Clear => ContainerOps::clear(a(0)),
            PrimitiveOp::Slice => ContainerOps::slice(a(0), opt(1), opt(2)),
            PrimitiveOp::NewSequence => Ok(ContainerOps::new_sequence(args)),
            PrimitiveOp::NewMapping => ContainerOps::new_mapping(args),
            PrimitiveOp::Create => ContainerOps::create(a(0)),
            PrimitiveOp::GetPrototype => ContainerOps::get_prototype(a(0)),
            PrimitiveOp::SetMetatable => MetaOps::set_metatable(a(0), a(1)),
            PrimitiveOp::GetMetatable => MetaOps::get_metatable(a(0)),
            PrimitiveOp::ToInt => Convert::to_int(a(0)),
            PrimitiveOp::ToFloat => Convert::to_float(a(0)),
            PrimitiveOp::ToString => Ok(Convert::to_string(a(0))),
            PrimitiveOp::ToBool => Ok(Value::Boolean(Convert::to_bool(a(0)))),
            PrimitiveOp::TypeOf => Ok(Convert::type_of(a(0))),
            PrimitiveOp::JsonEncode => JsonOps::encode(a(0)),
            PrimitiveOp::JsonDecode => JsonOps::decode(a(0)),
        }
    }
}

impl std::fmt::Display for PrimitiveOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
