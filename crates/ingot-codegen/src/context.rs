use indexmap::{IndexMap, IndexSet};
use ingot_go::{GoStmt, GoType};

/// Mutable transformer state. One context lives for the duration of a single
/// `transform` call; every table is an `IndexMap`/`IndexSet` so iteration is
/// insertion-ordered and two runs over equal input produce identical output.
#[derive(Debug, Default)]
pub struct TransformContext {
    /// Identifier → type, scoped to the current function/constructor body.
    pub variable_types: IndexMap<String, GoType>,
    /// Module-scope variables (singletons, module-level declarations); they
    /// survive function-scope resets.
    pub module_types: IndexMap<String, GoType>,
    /// Field name (original and Pascal-cased) → type, per class.
    pub struct_field_types: IndexMap<String, GoType>,
    /// Method name → return type, populated by pre-scan.
    pub method_return_types: IndexMap<String, GoType>,
    /// `methodName:index` → type inferred from call-site arguments.
    pub method_param_types: IndexMap<String, GoType>,
    /// `methodName:index` → declared type, for call-site assertions.
    pub method_declared_params: IndexMap<String, GoType>,
    /// `methodName:index` keys whose parameter is probed with `typeof` and
    /// must stay `interface{}` regardless of call-site evidence.
    pub polymorphic_params: IndexSet<String>,
    /// `Struct.Field` → renamed field when it collides with a method.
    pub renamed_fields: IndexMap<String, String>,
    /// Method names already emitted for the current struct.
    pub declared_method_names: IndexSet<String>,
    /// Packages the emitted file must import.
    pub imports: IndexSet<String>,

    // Stub accumulators.
    pub framework_classes: IndexSet<String>,
    pub helper_classes: IndexSet<String>,
    pub enums_used: IndexSet<String>,
    pub framework_functions: IndexSet<String>,

    // Positional context.
    pub current_struct: Option<String>,
    /// The embedded base struct of the class being lowered, for `super`
    /// selector access.
    pub current_base: Option<String>,
    pub current_func: Option<String>,
    pub current_function_return_type: Option<GoType>,
    pub receiver_name: Option<String>,
    pub algorithm_struct_name: Option<String>,
    /// True while lowering an object literal whose function values reference
    /// the enclosing `this`.
    pub in_map_self_ref_context: bool,

    /// Variables whose slice type came from the empty-array look-ahead, so a
    /// declared byte-slice return type may still override a `uint32` guess.
    pub prescan_empty_array: IndexSet<String>,
    /// Statements hoisted out of call arguments, drained by the statement
    /// dispatcher before the statement that produced them.
    pub pending_stmts: Vec<GoStmt>,

    tmp_counter: usize,
}

impl TransformContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next temporary index.
    pub fn tmp(&mut self) -> usize {
        let current = self.tmp_counter;
        self.tmp_counter += 1;
        current
    }

    /// Records a package import.
    pub fn import(&mut self, package: &str) {
        self.imports.insert(package.to_string());
    }

    /// Clears the per-class tables before lowering the next class.
    pub fn reset_class_state(&mut self) {
        self.struct_field_types.clear();
        self.declared_method_names.clear();
        self.prescan_empty_array.clear();
    }

    /// Clears the per-function variable scope, keeping module-level names.
    pub fn reset_function_scope(&mut self) {
        self.variable_types = self.module_types.clone();
    }

    /// Registers a module-scope variable, visible from every function.
    pub fn register_module_var(&mut self, name: &str, ty: GoType) {
        self.module_types.insert(name.to_string(), ty.clone());
        self.variable_types.insert(name.to_string(), ty);
    }

    /// Looks up a call-site-inferred or declared parameter type.
    pub fn param_type(&self, method: &str, index: usize) -> Option<&GoType> {
        let key = format!("{method}:{index}");
        self.method_param_types
            .get(&key)
            .or_else(|| self.method_declared_params.get(&key))
    }
}

#[cfg(test)]
mod tests {
    use ingot_go::GoType;
    use pretty_assertions::assert_eq;

    use super::TransformContext;

    #[test]
    fn test_tmp_counter_increments() {
        let mut ctx = TransformContext::new();
        assert_eq!(ctx.tmp(), 0);
        assert_eq!(ctx.tmp(), 1);
    }

    #[test]
    fn test_class_reset_keeps_method_tables() {
        let mut ctx = TransformContext::new();
        ctx.struct_field_types
            .insert("state".to_string(), GoType::bytes());
        ctx.method_return_types
            .insert("Result".to_string(), GoType::bytes());
        ctx.reset_class_state();
        assert!(ctx.struct_field_types.is_empty());
        assert_eq!(ctx.method_return_types.len(), 1);
    }

    #[test]
    fn test_param_type_prefers_call_site() {
        let mut ctx = TransformContext::new();
        ctx.method_declared_params
            .insert("encrypt:0".to_string(), GoType::Interface);
        ctx.method_param_types
            .insert("encrypt:0".to_string(), GoType::bytes());
        assert_eq!(ctx.param_type("encrypt", 0), Some(&GoType::bytes()));
    }
}
