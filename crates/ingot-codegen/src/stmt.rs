//! Statement lowering: loops, conditionals, declarations, assignment
//! semantics and the block-local pre-passes (empty-array look-ahead and
//! hoisted-ternary typing).

use ingot_go::{escape_builtin, BinaryOp, GoExpr, GoStmt, GoType, UnaryOp};
use ingot_il::{Destructure, IlKind, IlLiteral, IlNode};

use crate::engine::binary_op_of;
use crate::prescan::walk;
use crate::Transformer;

impl Transformer {
    /// Lowers a statement list, running the block-local pre-passes first and
    /// draining hoisted statements before each lowered statement.
    pub(crate) fn lower_block(&mut self, stmts: &[IlNode]) -> Vec<GoStmt> {
        self.block_prepass(stmts);
        let mut out = Vec::new();
        for stmt in stmts {
            let lowered = self.lower_stmt(stmt);
            out.extend(self.drain_pending());
            out.extend(lowered);
        }
        out
    }

    /// Lowers a single statement node (a block lowers to its statements).
    pub(crate) fn lower_body(&mut self, node: &IlNode) -> Vec<GoStmt> {
        match &node.kind {
            IlKind::BlockStatement { body } => self.lower_block(body),
            _ => self.lower_block(std::slice::from_ref(node)),
        }
    }

    /// Pass 6: a `let x = []` whose later siblings push into `x` gets its
    /// element type from the first pushed value. Pass 7: an uninitialized
    /// declaration immediately followed by an if/else that assigns it in
    /// both branches takes its type from the assigned value.
    fn block_prepass(&mut self, stmts: &[IlNode]) {
        for (index, stmt) in stmts.iter().enumerate() {
            let IlKind::VariableDeclaration { declarations, .. } = &stmt.kind else {
                continue;
            };
            for declarator in declarations {
                match &declarator.init {
                    Some(init)
                        if matches!(
                            &init.kind,
                            IlKind::ArrayExpression { elements, .. } if elements.is_empty()
                        ) =>
                    {
                        if let Some(element) =
                            self.lookahead_push_type(&declarator.name, &stmts[index + 1..])
                        {
                            let mut ty = GoType::slice(element);
                            // A declared byte-slice return overrides a
                            // look-ahead uint32 guess.
                            if ty == GoType::slice(GoType::Uint32)
                                && self.ctx.current_function_return_type
                                    == Some(GoType::bytes())
                            {
                                ty = GoType::bytes();
                            }
                            self.ctx
                                .variable_types
                                .insert(declarator.name.clone(), ty);
                            self.ctx
                                .prescan_empty_array
                                .insert(declarator.name.clone());
                        }
                    }
                    None => {
                        if let Some(ty) =
                            self.hoisted_ternary_type(&declarator.name, stmts.get(index + 1))
                        {
                            self.ctx.variable_types.insert(declarator.name.clone(), ty);
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    /// Finds the first push into `name` among the remaining statements and
    /// infers the slice element type from the pushed value.
    pub(crate) fn lookahead_push_type(&self, name: &str, rest: &[IlNode]) -> Option<GoType> {
        let mut element: Option<GoType> = None;
        for stmt in rest {
            walk(stmt, &mut |node| {
                if element.is_some() {
                    return;
                }
                let pushed = match &node.kind {
                    IlKind::CallExpression { callee, arguments } => {
                        let IlKind::MemberExpression {
                            object, property, ..
                        } = &callee.kind
                        else {
                            return;
                        };
                        let IlKind::Identifier { name: target } = &object.kind else {
                            return;
                        };
                        let IlKind::Identifier { name: method } = &property.kind else {
                            return;
                        };
                        if target != name || method != "push" {
                            return;
                        }
                        arguments.first()
                    }
                    IlKind::ArrayAppend { target, value } => {
                        let IlKind::Identifier { name: target } = &target.kind else {
                            return;
                        };
                        if target != name {
                            return;
                        }
                        Some(value.as_ref())
                    }
                    _ => return,
                };
                let Some(pushed) = pushed else { return };
                element = Some(match &pushed.kind {
                    IlKind::Literal {
                        value: IlLiteral::Int(n),
                        ..
                    } if (0..=255).contains(n) => GoType::Uint8,
                    _ => self.infer_type(pushed, None, None),
                });
            });
            if element.is_some() {
                break;
            }
        }
        element
    }

    fn hoisted_ternary_type(&self, name: &str, next: Option<&IlNode>) -> Option<GoType> {
        let IlKind::IfStatement {
            consequent,
            alternate: Some(alternate),
            ..
        } = &next?.kind
        else {
            return None;
        };
        let then_value = branch_assignment_value(consequent, name)?;
        branch_assignment_value(alternate, name)?;
        Some(self.infer_type(then_value, Some(name), None))
    }

    pub(crate) fn lower_stmt(&mut self, node: &IlNode) -> Vec<GoStmt> {
        match &node.kind {
            IlKind::VariableDeclaration { declarations, .. } => {
                let mut out = Vec::new();
                for declarator in declarations {
                    out.extend(self.lower_declarator(declarator));
                }
                out
            }
            IlKind::ExpressionStatement { expression } => self.lower_expr_stmt(expression),
            IlKind::ReturnStatement { argument } => vec![self.lower_return(argument.as_deref())],
            IlKind::IfStatement {
                test,
                consequent,
                alternate,
            } => {
                let cond = self.lower_condition(test);
                let then = self.lower_body(consequent);
                let els = alternate.as_ref().map(|alternate| self.lower_body(alternate));
                vec![GoStmt::If { cond, then, els }]
            }
            IlKind::ForStatement {
                init,
                test,
                update,
                body,
            } => self.lower_for(init.as_deref(), test.as_deref(), update.as_deref(), body),
            IlKind::ForOfStatement { left, right, body } => {
                let element = self
                    .infer_type(right, None, None)
                    .element_type()
                    .cloned()
                    .unwrap_or_else(|| self.widen());
                self.ctx.variable_types.insert(left.clone(), element);
                let expr = self.lower_expr(right, None);
                let body = self.lower_body(body);
                vec![GoStmt::Range {
                    key: "_".to_string(),
                    value: Some(escape_builtin(left).to_string()),
                    expr,
                    body,
                }]
            }
            IlKind::ForInStatement { left, right, body } => {
                self.ctx
                    .variable_types
                    .insert(left.clone(), GoType::String);
                let expr = self.lower_expr(right, None);
                let body = self.lower_body(body);
                vec![GoStmt::Range {
                    key: escape_builtin(left).to_string(),
                    value: None,
                    expr,
                    body,
                }]
            }
            IlKind::WhileStatement { test, body } => self.lower_while(test, body),
            IlKind::DoWhileStatement { body, test } => {
                let mut stmts = self.lower_body(body);
                let cond = self.lower_condition(test);
                stmts.push(GoStmt::If {
                    cond: negate(cond),
                    then: vec![GoStmt::Break],
                    els: None,
                });
                vec![GoStmt::loop_forever(stmts)]
            }
            IlKind::BreakStatement => vec![GoStmt::Break],
            IlKind::ContinueStatement => vec![GoStmt::Continue],
            IlKind::ThrowStatement { argument } => {
                let value = self.lower_expr(argument, None);
                vec![GoStmt::Expr(GoExpr::call_named("panic", vec![value]))]
            }
            IlKind::TryStatement { block, handler, .. } => {
                let mut stmts = vec![GoStmt::Comment(
                    "translated try/catch: failures panic instead of being caught".to_string(),
                )];
                stmts.extend(self.lower_block(block));
                if handler.is_some() {
                    stmts.push(GoStmt::Comment(
                        "catch handler dropped during translation".to_string(),
                    ));
                }
                vec![GoStmt::Block(stmts)]
            }
            IlKind::BlockStatement { body } => vec![GoStmt::Block(self.lower_block(body))],
            other => {
                self.diags
                    .warn(format!("unhandled IL statement kind: {}", other.name()));
                vec![GoStmt::Comment(format!(
                    "unhandled statement: {}",
                    other.name()
                ))]
            }
        }
    }

    fn lower_declarator(&mut self, declarator: &ingot_il::IlDeclarator) -> Vec<GoStmt> {
        let name = escape_builtin(&declarator.name).to_string();

        match &declarator.destructure {
            Some(Destructure::Temp) => {
                let Some(init) = &declarator.init else {
                    return vec![];
                };
                let ty = self.infer_type(init, Some(&declarator.name), None);
                let mut value = self.lower_expr(init, None);
                // A temp sourced from a generic helper needs an assertion
                // before it can be indexed.
                if ty.is_interface() && value.supports_assertion() {
                    value = GoExpr::assert(value, GoType::slice(self.widen()));
                    self.ctx.variable_types.insert(
                        declarator.name.clone(),
                        GoType::slice(self.widen()),
                    );
                } else {
                    self.ctx
                        .variable_types
                        .insert(declarator.name.clone(), ty);
                }
                return vec![GoStmt::decl_short(name, value)];
            }
            Some(Destructure::Element { source, index }) => {
                let source_ty = self
                    .ctx
                    .variable_types
                    .get(source)
                    .cloned()
                    .unwrap_or_else(|| self.widen());
                let element = source_ty
                    .element_type()
                    .cloned()
                    .unwrap_or_else(|| self.widen());
                self.ctx
                    .variable_types
                    .insert(declarator.name.clone(), element);
                let value = GoExpr::index(
                    GoExpr::ident(escape_builtin(source)),
                    GoExpr::Int(*index as i64),
                );
                return vec![GoStmt::decl_short(name, value)];
            }
            Some(Destructure::Property { source, key }) => {
                let value = GoExpr::index(
                    GoExpr::ident(escape_builtin(source)),
                    GoExpr::str(key.clone()),
                );
                self.ctx
                    .variable_types
                    .insert(declarator.name.clone(), self.widen());
                return vec![GoStmt::decl_short(name, value)];
            }
            None => {}
        }

        match &declarator.init {
            None => {
                // A hoisted-ternary pre-pass may have typed this declarator.
                let ty = self
                    .ctx
                    .variable_types
                    .get(&declarator.name)
                    .cloned()
                    .unwrap_or_else(|| self.widen());
                self.ctx
                    .variable_types
                    .insert(declarator.name.clone(), ty.clone());
                vec![GoStmt::DeclVar {
                    name,
                    ty: Some(ty),
                    value: None,
                }]
            }
            Some(init) => {
                let ty = match self.ctx.prescan_empty_array.contains(&declarator.name) {
                    true => self
                        .ctx
                        .variable_types
                        .get(&declarator.name)
                        .cloned()
                        .unwrap_or_else(|| self.widen()),
                    false => self.infer_type(init, Some(&declarator.name), None),
                };
                self.ctx
                    .variable_types
                    .insert(declarator.name.clone(), ty.clone());
                let value = self.coerce_value(&ty, init);
                vec![GoStmt::decl_short(name, value)]
            }
        }
    }

    fn lower_expr_stmt(&mut self, expression: &IlNode) -> Vec<GoStmt> {
        match &expression.kind {
            IlKind::AssignmentExpression { .. } => self.lower_assignment(expression),
            IlKind::UpdateExpression {
                operator, argument, ..
            } => {
                let target = self.lower_lvalue(argument);
                let op = if operator == "++" {
                    BinaryOp::Add
                } else {
                    BinaryOp::Sub
                };
                vec![GoStmt::OpAssign {
                    target,
                    op,
                    value: GoExpr::Int(1),
                }]
            }
            IlKind::CallExpression { callee, arguments } => {
                // A bare `super(...)` has no Go counterpart: the embedded
                // base struct starts zero-valued.
                if matches!(callee.kind, IlKind::SuperExpression) {
                    if arguments.is_empty() {
                        return vec![];
                    }
                    return vec![GoStmt::Comment(
                        "base constructor arguments dropped during translation".to_string(),
                    )];
                }
                if let Some(stmts) = self.lower_push_stmt(callee, arguments) {
                    return stmts;
                }
                if let Some(stmts) = self.lower_mutating_stmt(callee, arguments) {
                    return stmts;
                }
                let value = self.lower_expr(expression, None);
                vec![GoStmt::Expr(value)]
            }
            IlKind::ArrayAppend { target, value } => {
                let target_ty = self.infer_type(target, None, None);
                let element = target_ty
                    .element_type()
                    .cloned()
                    .unwrap_or_else(|| self.widen());
                let lowered_target = self.lower_lvalue(target);
                let lowered_value = self.coerce_value(&element, value);
                vec![GoStmt::push_append(
                    lowered_target,
                    vec![lowered_value],
                    false,
                )]
            }
            _ => {
                let value = self.lower_expr(expression, None);
                vec![GoStmt::Expr(value)]
            }
        }
    }

    /// `arr.push(v)` in statement position, with element conversion.
    fn lower_push_stmt(
        &mut self,
        callee: &IlNode,
        arguments: &[IlNode],
    ) -> Option<Vec<GoStmt>> {
        let IlKind::MemberExpression {
            object,
            property,
            computed: false,
        } = &callee.kind
        else {
            return None;
        };
        let IlKind::Identifier { name: method } = &property.kind else {
            return None;
        };
        if method != "push" {
            return None;
        }
        let target_ty = self.infer_type(object, None, None);
        if !target_ty.is_slice() {
            return None;
        }
        let element = target_ty
            .element_type()
            .cloned()
            .unwrap_or_else(|| self.widen());
        let target = self.lower_lvalue(object);
        let mut spread = false;
        let values: Vec<GoExpr> = arguments
            .iter()
            .map(|argument| match &argument.kind {
                IlKind::SpreadElement { argument } => {
                    spread = true;
                    self.lower_expr(argument, None)
                }
                _ => self.coerce_value(&element, argument),
            })
            .collect();
        Some(vec![GoStmt::push_append(target, values, spread)])
    }

    /// Assignment statements: chained assignments expand in reverse order,
    /// `.length` targets become reslices, compound assignments convert the
    /// right side to the left side's type.
    pub(crate) fn lower_assignment(&mut self, node: &IlNode) -> Vec<GoStmt> {
        let IlKind::AssignmentExpression {
            operator,
            left,
            right,
        } = &node.kind
        else {
            return vec![];
        };

        // a = b = c = v  →  c = v; b = c; a = b
        if operator == "=" {
            if let IlKind::AssignmentExpression { left: inner, .. } = &right.kind {
                let mut stmts = self.lower_assignment(right);
                let target_ty = self.infer_type(left, None, None);
                let target = self.lower_lvalue(left);
                let value_ty = self.infer_type(inner, None, None);
                let mut value = self.lower_lvalue(inner);
                if value_ty.is_interface() && !target_ty.is_interface()
                    && value.supports_assertion()
                {
                    value = GoExpr::assert(value, target_ty);
                }
                stmts.push(GoStmt::assign(target, value));
                return stmts;
            }
        }

        // `a.length = n` truncates the slice.
        if operator == "=" {
            if let IlKind::MemberExpression {
                object,
                property,
                computed: false,
            } = &left.kind
            {
                if matches!(&property.kind, IlKind::Identifier { name } if name == "length") {
                    let target = self.lower_lvalue(object);
                    let high = self.lower_expr(right, Some(&GoType::Int));
                    return vec![GoStmt::assign(
                        target.clone(),
                        GoExpr::SliceOf {
                            recv: Box::new(target),
                            low: None,
                            high: Some(Box::new(high)),
                        },
                    )];
                }
            }
        }

        let target_ty = self.infer_type(left, None, None);
        let target = self.lower_lvalue(left);

        if operator == "=" {
            let value = self.coerce_value(&target_ty, right);
            return vec![GoStmt::assign(target, value)];
        }

        // Compound assignment.
        let Some(op) = binary_op_of(operator.trim_end_matches('=')) else {
            self.diags
                .warn(format!("unhandled assignment operator: {operator}"));
            return vec![GoStmt::assign(target, self.lower_expr(right, None))];
        };
        // `x >>>= n` needs the unsigned-shift rewrite on the full value.
        if operator == ">>>=" && target_ty != GoType::Uint32 {
            let shifted = GoExpr::binary(
                GoExpr::convert(GoType::Uint32, target.clone()),
                BinaryOp::Shr,
                self.lower_expr(right, Some(&GoType::Int)),
            );
            let value = if target_ty.is_numeric() && target_ty != GoType::Uint32 {
                GoExpr::convert(target_ty, GoExpr::paren(shifted))
            } else {
                shifted
            };
            return vec![GoStmt::assign(target, value)];
        }
        let value = self.coerce_value(&target_ty, right);
        vec![GoStmt::OpAssign { target, op, value }]
    }

    fn lower_return(&mut self, argument: Option<&IlNode>) -> GoStmt {
        match argument {
            None => GoStmt::Return(None),
            Some(argument) => {
                let target = self.ctx.current_function_return_type.clone();
                let value = match &target {
                    Some(ty) if *ty != GoType::Nothing => self.coerce_value(ty, argument),
                    _ => self.lower_expr(argument, None),
                };
                GoStmt::Return(Some(value))
            }
        }
    }

    /// Lowers a loop condition to a Go boolean expression.
    pub(crate) fn lower_condition(&mut self, test: &IlNode) -> GoExpr {
        let ty = self.infer_type(test, None, None);
        let lowered = self.lower_expr(test, None);
        if ty == GoType::Bool {
            return lowered;
        }
        self.truthy(lowered, &ty)
    }

    fn lower_for(
        &mut self,
        init: Option<&IlNode>,
        test: Option<&IlNode>,
        update: Option<&IlNode>,
        body: &IlNode,
    ) -> Vec<GoStmt> {
        // A bare assignment as the loop test lowers to an infinite loop with
        // the assignment hoisted and an explicit break.
        if let Some(test_node) = test {
            if matches!(test_node.kind, IlKind::AssignmentExpression { .. }) {
                let mut stmts = Vec::new();
                if let Some(init) = init {
                    stmts.extend(self.lower_stmt(init));
                }
                let mut loop_body = self.lower_assignment(test_node);
                let IlKind::AssignmentExpression { left, .. } = &test_node.kind else {
                    unreachable!("checked above");
                };
                let assigned_ty = self.infer_type(left, None, None);
                let assigned = self.lower_lvalue(left);
                loop_body.push(GoStmt::If {
                    cond: negate(self.truthy(assigned, &assigned_ty)),
                    then: vec![GoStmt::Break],
                    els: None,
                });
                loop_body.extend(self.lower_body(body));
                if let Some(update) = update {
                    loop_body.extend(self.lower_update(update));
                }
                stmts.push(GoStmt::loop_forever(loop_body));
                return stmts;
            }
        }

        let init_stmt = init.and_then(|init| self.lower_loop_init(init));
        let cond = test.map(|test| self.lower_condition(test));
        let post = update.and_then(|update| self.lower_update(update).into_iter().next());
        let body = self.lower_body(body);
        vec![GoStmt::For {
            init: init_stmt.map(Box::new),
            cond,
            post: post.map(Box::new),
            body,
        }]
    }

    /// Loop init in header position: a single-declarator declaration or an
    /// assignment. Loop counters default to `int`.
    fn lower_loop_init(&mut self, init: &IlNode) -> Option<GoStmt> {
        match &init.kind {
            IlKind::VariableDeclaration { declarations, .. } => {
                let declarator = declarations.first()?;
                let init_value = declarator.init.as_ref()?;
                let ty = match &init_value.kind {
                    IlKind::Literal {
                        value: IlLiteral::Int(_),
                        ..
                    } => GoType::Int,
                    _ => self.infer_type(init_value, Some(&declarator.name), None),
                };
                self.ctx
                    .variable_types
                    .insert(declarator.name.clone(), ty.clone());
                let value = self.coerce_value(&ty, init_value);
                Some(GoStmt::decl_short(
                    escape_builtin(&declarator.name),
                    value,
                ))
            }
            IlKind::AssignmentExpression { .. } => self.lower_assignment(init).into_iter().next(),
            _ => {
                let value = self.lower_expr(init, None);
                Some(GoStmt::Expr(value))
            }
        }
    }

    fn lower_update(&mut self, update: &IlNode) -> Vec<GoStmt> {
        match &update.kind {
            IlKind::UpdateExpression {
                operator, argument, ..
            } => {
                let target = self.lower_lvalue(argument);
                let op = if operator == "++" {
                    BinaryOp::Add
                } else {
                    BinaryOp::Sub
                };
                vec![GoStmt::OpAssign {
                    target,
                    op,
                    value: GoExpr::Int(1),
                }]
            }
            IlKind::AssignmentExpression { .. } => self.lower_assignment(update),
            _ => vec![GoStmt::Expr(self.lower_expr(update, None))],
        }
    }

    fn lower_while(&mut self, test: &IlNode, body: &IlNode) -> Vec<GoStmt> {
        if matches!(test.kind, IlKind::AssignmentExpression { .. }) {
            return self.lower_for(None, Some(test), None, body);
        }
        let cond = self.lower_condition(test);
        let body = self.lower_body(body);
        vec![GoStmt::For {
            init: None,
            cond: Some(cond),
            post: None,
            body,
        }]
    }
}

/// Negates a lowered boolean expression, flipping comparisons in place.
pub(crate) fn negate(cond: GoExpr) -> GoExpr {
    match cond {
        GoExpr::Binary { op, left, right } => match op.negated() {
            Some(flipped) => GoExpr::Binary {
                op: flipped,
                left,
                right,
            },
            None => GoExpr::unary(
                UnaryOp::Not,
                GoExpr::paren(GoExpr::Binary { op, left, right }),
            ),
        },
        GoExpr::Unary {
            op: UnaryOp::Not,
            expr,
        } => *expr,
        other => GoExpr::unary(UnaryOp::Not, other),
    }
}

/// The assigned value when a branch consists of a single `name = value`
/// statement (possibly wrapped in a block).
fn branch_assignment_value<'a>(branch: &'a IlNode, name: &str) -> Option<&'a IlNode> {
    match &branch.kind {
        IlKind::BlockStatement { body } if body.len() == 1 => {
            branch_assignment_value(&body[0], name)
        }
        IlKind::ExpressionStatement { expression } => {
            let IlKind::AssignmentExpression {
                operator,
                left,
                right,
            } = &expression.kind
            else {
                return None;
            };
            if operator != "=" {
                return None;
            }
            match &left.kind {
                IlKind::Identifier { name: target } if target == name => Some(right),
                _ => None,
            }
        }
        _ => None,
    }
}
