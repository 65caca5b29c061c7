//! The runtime context.
//!
//! A [`Runtime`] owns one value store, one overlay per registered profile
//! and the registry of logic blocks. Every operation names the profile it
//! runs under; metatable overrides are consulted first, then the overlay's
//! default semantics.

use std::collections::HashMap;
use std::rc::Rc;

use core_types::{Callable, Key, LogicId, MappingRef, RuntimeError, RuntimeResult, Traversal, Value};
use primitives::MetaOps;
use tracing::{debug, warn};
use value_store::{GhostHook, Store, GLOBAL_SCOPE};

use crate::ast::Logic;
use crate::config::{ConfigError, RuntimeConfig};
use crate::dispatch::{Dispatcher, Operator, Override};
use crate::overlay::{lift, Overlay, Wrapped};
use crate::profile::ProfileSpec;
use crate::resolver::{ChainResolver, Environment, Resolver};

/// Polyglot runtime context
///
/// Owns all mutable state; there is no process-wide store. Dropping the
/// runtime releases every scope.
///
/// # Example
///
/// ```
/// use core_types::Value;
/// use interpreter::{Operator, Runtime};
///
/// let mut rt = Runtime::new().unwrap();
/// let seq = Value::sequence(vec![Value::from("a"), Value::from("b")]);
///
/// // One referent, two index conventions
/// assert_eq!(rt.index_get("lua", &seq, &Value::Int(1)).unwrap(), Value::from("a"));
/// assert_eq!(rt.index_get("js", &seq, &Value::Int(0)).unwrap(), Value::from("a"));
///
/// assert_eq!(
///     rt.binary("js", Operator::Add, &Value::from("1"), &Value::Int(1)).unwrap(),
///     Value::from("11")
/// );
/// ```
#[derive(Debug)]
pub struct Runtime {
    config: RuntimeConfig,
    store: Store,
    overlays: HashMap<String, Rc<Overlay>>,
    logics: Vec<Rc<Logic>>,
    depth: usize,
}

impl Runtime {
    /// Create a runtime with the default configuration (all bundled profiles)
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_config(RuntimeConfig::default())
    }

    /// Create a runtime loading the profiles named in `config`
    pub fn with_config(config: RuntimeConfig) -> Result<Self, ConfigError> {
        let mut runtime = Self {
            config,
            store: Store::new(),
            overlays: HashMap::new(),
            logics: Vec::new(),
            depth: 0,
        };
        for name in runtime.config.profiles.clone() {
            runtime.register_profile(ProfileSpec::load_bundled(&name)?)?;
        }
        debug!(profiles = runtime.overlays.len(), "runtime ready");
        Ok(runtime)
    }

    /// Active configuration
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Register (or replace) a profile
    pub fn register_profile(&mut self, spec: ProfileSpec) -> Result<(), ConfigError> {
        let overlay = Overlay::new(spec)?;
        debug!(profile = overlay.name(), builtins = overlay.builtin_names().len(), "profile registered");
        self.overlays.insert(overlay.name().to_string(), Rc::new(overlay));
        Ok(())
    }

    /// Parse, validate and register a profile document, returning its name
    pub fn register_profile_json(&mut self, text: &str) -> Result<String, ConfigError> {
        let spec = ProfileSpec::from_json(text)?;
        let name = spec.name.clone();
        self.register_profile(spec)?;
        Ok(name)
    }

    /// Sorted names of the registered profiles
    pub fn profile_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.overlays.keys().cloned().collect();
        names.sort();
        names
    }

    /// The overlay registered as `profile`
    pub fn overlay(&self, profile: &str) -> RuntimeResult<Rc<Overlay>> {
        self.overlays
            .get(profile)
            .cloned()
            .ok_or_else(|| RuntimeError::UnknownProfile(profile.to_string()))
    }

    /// Read-only view of the store
    pub fn store(&self) -> &Store {
        &self.store
    }

    // ------------------------------------------------------------------
    // Value store
    // ------------------------------------------------------------------

    /// Read a variable (advancing it if it is a ghost)
    pub fn get(&mut self, scope: &str, name: &str) -> Value {
        self.store.get(scope, name)
    }

    /// Read a variable without running ghost hooks
    pub fn peek(&self, scope: &str, name: &str) -> Value {
        self.store.peek(scope, name)
    }

    /// Write a variable.
    ///
    /// A name following the configured ghost convention becomes a ghost
    /// (incrementing on each read) when it is first created.
    pub fn set(&mut self, scope: &str, name: &str, value: Value) {
        if !self.store.contains(scope, name) && self.config.is_ghost_name(name) {
            self.store.set_ghost(scope, name, value, GhostHook::increment());
        } else {
            self.store.set(scope, name, value);
        }
    }

    /// Remove a variable
    pub fn delete(&mut self, scope: &str, name: &str) -> bool {
        self.store.delete(scope, name)
    }

    /// Store a ghost variable with an explicit hook
    pub fn set_ghost(&mut self, scope: &str, name: &str, initial: Value, hook: GhostHook) {
        self.store.set_ghost(scope, name, initial, hook);
    }

    /// Write to the scope shared by every profile
    pub fn set_shared(&mut self, name: &str, value: Value) {
        self.set(GLOBAL_SCOPE, name, value);
    }

    /// Read from the scope shared by every profile
    pub fn get_shared(&mut self, name: &str) -> Value {
        self.store.get(GLOBAL_SCOPE, name)
    }

    // ------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------

    /// Resolve `name` from `scope` with no outer environment
    pub fn resolve(&mut self, scope: &str, name: &str) -> RuntimeResult<Value> {
        self.resolve_with(scope, name, &())
    }

    /// Resolve `name` from `scope`, consulting `outer` last
    pub fn resolve_with(
        &mut self,
        scope: &str,
        name: &str,
        outer: &dyn Environment,
    ) -> RuntimeResult<Value> {
        ChainResolver::new(&mut self.store, &self.overlays, outer).resolve(scope, name)
    }

    // ------------------------------------------------------------------
    // Overlay-facing operations
    // ------------------------------------------------------------------

    /// Tag a value with a registered profile
    pub fn wrap(&self, profile: &str, value: Value) -> RuntimeResult<Wrapped> {
        self.overlay(profile)?;
        Ok(Wrapped::new(value, profile))
    }

    /// Truthiness under `profile`
    pub fn truthy(&self, profile: &str, value: &Value) -> RuntimeResult<bool> {
        Ok(self.overlay(profile)?.truthy(value))
    }

    /// Printed form under `profile`
    pub fn stringify(&self, profile: &str, value: &Value) -> RuntimeResult<String> {
        Ok(self.overlay(profile)?.stringify(value))
    }

    /// Apply a binary operator.
    ///
    /// # Arguments
    ///
    /// * `profile` - Profile whose defaults apply when no metatable answers
    /// * `op` - Operator; `Ne`, `Gt` and `Ge` are derived from `Eq`, `Lt`, `Le`
    /// * `a`, `b` - Operands
    ///
    /// # Returns
    ///
    /// The handler's result when either operand's metatable overrides `op`
    /// (comparisons are reduced to a boolean by the profile's truthiness),
    /// otherwise the overlay's result.
    pub fn binary(&mut self, profile: &str, op: Operator, a: &Value, b: &Value) -> RuntimeResult<Value> {
        let overlay = self.overlay(profile)?;
        match op {
            Operator::Ne => {
                let eq = self.binary(profile, Operator::Eq, a, b)?;
                return Ok(Value::Boolean(!overlay.truthy(&eq)));
            }
            Operator::Gt => return self.binary(profile, Operator::Lt, b, a),
            Operator::Ge => return self.binary(profile, Operator::Le, b, a),
            _ => {}
        }
        match Dispatcher::find_binary(op, a, b) {
            Some(found) => {
                let result = self.fire(profile, op, found)?;
                if op.is_comparison() {
                    Ok(Value::Boolean(overlay.truthy(&result)))
                } else {
                    Ok(result)
                }
            }
            None => overlay.binary(op, a, b),
        }
    }

    /// Apply a unary operator (`Neg`, `Length`, `BitNot`)
    pub fn unary(&mut self, profile: &str, op: Operator, a: &Value) -> RuntimeResult<Value> {
        let overlay = self.overlay(profile)?;
        match Dispatcher::find_unary(op, a) {
            Some(found) => self.fire(profile, op, found),
            None => overlay.unary(op, a),
        }
    }

    fn fire(&mut self, profile: &str, op: Operator, found: Override) -> RuntimeResult<Value> {
        debug!(profile, operator = op.name(), side = ?found.side, "metamethod");
        self.call(profile, &found.handler, &found.args)
    }

    /// Indexed read.
    ///
    /// A callable `index-get` handler answers outright. A table handler is
    /// only searched when the container's own contents (and prototype
    /// chain) have no entry for `key`.
    pub fn index_get(&mut self, profile: &str, container: &Value, key: &Value) -> RuntimeResult<Value> {
        let overlay = self.overlay(profile)?;
        let table = match Dispatcher::metamethod(container, Operator::IndexGet) {
            Some(handler) if !handler.is_referent() => {
                debug!(profile, operator = "index-get", "metamethod");
                return self.call(profile, &handler, &[container.clone(), key.clone()]);
            }
            table => table,
        };
        let own = overlay.index_get(container, key, self.config.max_prototype_depth)?;
        match table {
            Some(table) if own.is_absent() => {
                self.guarded(profile, |rt| rt.index_get(profile, &table, key))
            }
            _ => Ok(own),
        }
    }

    /// Indexed write; an `index-set` handler takes the write entirely
    pub fn index_set(
        &mut self,
        profile: &str,
        container: &Value,
        key: &Value,
        value: Value,
    ) -> RuntimeResult<()> {
        let overlay = self.overlay(profile)?;
        match Dispatcher::metamethod(container, Operator::IndexSet) {
            Some(table) if table.is_referent() => {
                self.guarded(profile, |rt| rt.index_set(profile, &table, key, value))
            }
            Some(handler) => {
                debug!(profile, operator = "index-set", "metamethod");
                self.call(profile, &handler, &[container.clone(), key.clone(), value])?;
                Ok(())
            }
            None => overlay.index_set(container, key, value),
        }
    }

    /// Member read: a callable `index-get` override, else method table, own
    /// property and prototype chain, then an `index-get` table on a miss.
    pub fn get_member(&mut self, profile: &str, receiver: &Value, name: &str) -> RuntimeResult<Value> {
        let overlay = self.overlay(profile)?;
        let key = Value::from(name);
        let table = match Dispatcher::metamethod(receiver, Operator::IndexGet) {
            Some(handler) if !handler.is_referent() => {
                debug!(profile, operator = "index-get", member = name, "metamethod");
                return self.call(profile, &handler, &[receiver.clone(), key]);
            }
            table => table,
        };
        match (overlay.member_get(receiver, name, self.config.max_prototype_depth), table) {
            (Err(RuntimeError::PropertyNotFound { scope, name }), Some(table)) => {
                let found = self.guarded(profile, |rt| rt.index_get(profile, &table, &key))?;
                if found.is_absent() {
                    Err(RuntimeError::PropertyNotFound { scope, name })
                } else {
                    Ok(found)
                }
            }
            (result, _) => result,
        }
    }

    /// Member write, honoring an `index-set` override
    pub fn set_member(
        &mut self,
        profile: &str,
        receiver: &Value,
        name: &str,
        value: Value,
    ) -> RuntimeResult<()> {
        if Dispatcher::metamethod(receiver, Operator::IndexSet).is_some() {
            return self.index_set(profile, receiver, &Value::from(name), value);
        }
        self.overlay(profile)?.member_set(receiver, name, value)
    }

    /// Remove an own property; returns whether one was removed
    pub fn delete_member(&self, receiver: &Value, name: &str) -> bool {
        match receiver {
            Value::Mapping(map) => map.remove(&Key::from(name)).is_some(),
            _ => false,
        }
    }

    /// Whether the receiver has the property, directly or by prototype
    pub fn has_member(&self, receiver: &Value, name: &str) -> bool {
        match receiver {
            Value::Mapping(map) => map
                .lookup(&Key::from(name), self.config.max_prototype_depth)
                .is_some(),
            _ => false,
        }
    }

    /// Invoke a value.
    ///
    /// Native functions run directly. A logic callable runs under its home
    /// profile when it has one, otherwise under `profile`. Traversals call
    /// their callback once per element under `profile`. Anything else is
    /// callable only through a `call` metamethod, which receives the callee
    /// first.
    pub fn call(&mut self, profile: &str, callee: &Value, args: &[Value]) -> RuntimeResult<Value> {
        match callee {
            Value::Function(Callable::Native(native)) => {
                let native = native.clone();
                self.guarded(profile, |_| native.invoke(args))
            }
            Value::Function(Callable::Logic { id, home }) => {
                let scope = home.as_deref().unwrap_or(profile).to_string();
                self.invoke_logic(&scope, *id, args)
            }
            Value::Function(Callable::Traverse { name, kind, callback }) => {
                let (name, kind, callback) = (name.clone(), *kind, *callback);
                self.guarded(profile, |rt| rt.traverse(profile, &name, kind, callback, args))
            }
            other => match Dispatcher::metamethod(other, Operator::Call) {
                Some(handler) => {
                    debug!(profile, operator = "call", "metamethod");
                    let mut full = Vec::with_capacity(args.len() + 1);
                    full.push(other.clone());
                    full.extend_from_slice(args);
                    self.guarded(profile, |rt| rt.call(profile, &handler, &full))
                }
                None => Err(RuntimeError::NotCallable {
                    scope: profile.to_string(),
                    type_name: other.type_name().to_string(),
                }),
            },
        }
    }

    /// Map or filter a sequence or mapping through a callback.
    ///
    /// The container is the argument not at `callback_at`. A missing or null
    /// callback maps each element to itself, so filtering keeps the truthy
    /// elements. Mappings keep their keys.
    fn traverse(
        &mut self,
        profile: &str,
        name: &str,
        kind: Traversal,
        callback_at: usize,
        args: &[Value],
    ) -> RuntimeResult<Value> {
        let arity = || RuntimeError::ArityMismatch {
            scope: profile.to_string(),
            name: name.to_string(),
            expected: 2,
            got: args.len(),
        };
        if args.len() > 2 {
            return Err(arity());
        }
        let container = args.get(1 - callback_at.min(1)).ok_or_else(arity)?;
        let callback = args.get(callback_at).cloned().unwrap_or(Value::Null);
        let entries: Vec<(Option<Key>, Value)> = match container {
            Value::Sequence(seq) => seq.to_vec().into_iter().map(|v| (None, v)).collect(),
            Value::Mapping(map) => map.entries().into_iter().map(|(k, v)| (Some(k), v)).collect(),
            other => return Err(RuntimeError::type_mismatch(profile, name, &[other])),
        };
        debug!(profile, builtin = name, elements = entries.len(), "traverse");

        let mut kept = Vec::with_capacity(entries.len());
        for (key, element) in entries {
            let result = if callback.is_nullish() {
                element.clone()
            } else {
                self.call(profile, &callback, std::slice::from_ref(&element))?
            };
            match kind {
                Traversal::Map => kept.push((key, result)),
                Traversal::Filter => {
                    if self.truthy(profile, &result)? {
                        kept.push((key, element));
                    }
                }
            }
        }

        Ok(match container {
            Value::Mapping(_) => {
                let out = MappingRef::new();
                for (key, value) in kept {
                    if let Some(key) = key {
                        out.set(key, value);
                    }
                }
                Value::Mapping(out)
            }
            _ => Value::sequence(kept.into_iter().map(|(_, v)| v).collect()),
        })
    }

    /// Look up a member and call it
    pub fn invoke_method(
        &mut self,
        profile: &str,
        receiver: &Value,
        name: &str,
        args: &[Value],
    ) -> RuntimeResult<Value> {
        let method = self.get_member(profile, receiver, name)?;
        self.call(profile, &method, args)
    }

    // ------------------------------------------------------------------
    // Metatables and prototypes
    // ------------------------------------------------------------------

    /// Attach a metatable (or detach with null); returns the target
    pub fn set_metatable(&self, profile: &str, target: &Value, table: &Value) -> RuntimeResult<Value> {
        self.overlay(profile)?;
        MetaOps::set_metatable(target, table).map_err(|err| lift(profile, "set_metatable", err))
    }

    /// The attached metatable, or null
    pub fn get_metatable(&self, profile: &str, target: &Value) -> RuntimeResult<Value> {
        self.overlay(profile)?;
        MetaOps::get_metatable(target).map_err(|err| lift(profile, "get_metatable", err))
    }

    /// Link `child`'s prototype to `proto` (a mapping) or unlink with null
    pub fn set_prototype(&self, profile: &str, child: &Value, proto: &Value) -> RuntimeResult<()> {
        let link = match proto {
            Value::Mapping(p) => Some(p.clone()),
            Value::Null | Value::Absent => None,
            other => return Err(RuntimeError::type_mismatch(profile, "set_prototype", &[child, other])),
        };
        match child {
            Value::Mapping(map) => map.set_prototype(link),
            other => Err(RuntimeError::type_mismatch(profile, "set_prototype", &[other, proto])),
        }
    }

    // ------------------------------------------------------------------
    // Logic registry
    // ------------------------------------------------------------------

    /// Register a logic block
    pub fn define_logic(&mut self, logic: Logic) -> LogicId {
        let id = LogicId(self.logics.len());
        debug!(logic = %logic.name, id = id.0, "logic defined");
        self.logics.push(Rc::new(logic));
        id
    }

    /// A registered logic block
    pub fn logic(&self, id: LogicId) -> RuntimeResult<Rc<Logic>> {
        self.logics
            .get(id.0)
            .cloned()
            .ok_or(RuntimeError::UnknownLogic(id.0))
    }

    /// A callable for a logic block, optionally bound to a home profile
    pub fn logic_value(&self, id: LogicId, home: Option<&str>) -> Value {
        Value::Function(Callable::logic(id, home))
    }

    /// Execute a logic block once under `profile` and tag the result.
    ///
    /// Free identifiers in the block resolve through `profile`'s scope for
    /// the duration of this call only.
    pub fn execute_under(&mut self, profile: &str, id: LogicId, args: &[Value]) -> RuntimeResult<Wrapped> {
        self.overlay(profile)?;
        let result = self.invoke_logic(profile, id, args)?;
        Ok(Wrapped::new(result, profile))
    }

    /// Same as [`Runtime::execute_under`], taking tagged inputs
    pub fn execute_wrapped(&mut self, profile: &str, id: LogicId, args: &[Wrapped]) -> RuntimeResult<Wrapped> {
        let raw: Vec<Value> = args.iter().map(|w| w.value().clone()).collect();
        self.execute_under(profile, id, &raw)
    }

    pub(crate) fn guarded<T>(
        &mut self,
        scope: &str,
        f: impl FnOnce(&mut Self) -> RuntimeResult<T>,
    ) -> RuntimeResult<T> {
        if self.depth >= self.config.max_call_depth {
            warn!(scope, limit = self.config.max_call_depth, "call depth exceeded");
            return Err(RuntimeError::CallDepthExceeded {
                scope: scope.to_string(),
                limit: self.config.max_call_depth,
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }
}

impl Resolver for Runtime {
    fn resolve(&mut self, scope: &str, name: &str) -> RuntimeResult<Value> {
        Runtime::resolve(self, scope, name)
    }
}
