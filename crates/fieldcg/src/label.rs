//! Pure, memoized function labeling. A label is only ever computed from
//! Decorator-pass attributes, so once rendered it never changes; the cache
//! on [`AnalysisContext`] exists purely to avoid re-deriving a
//! free-anonymous function's label through its chain of enclosing functions
//! every time it is asked for.

use crate::context::{AnalysisContext, Naming};
use crate::ids::FunctionId;

/// A callback argument whose call-site callee isn't a derivable name
/// (`foo()()`, a member access through a computed/non-identifier chain
/// deeper than the decorator's `describe_callee` can express) still gets a
/// stable, deterministic label rather than silently reusing another
/// function's free-anonymous slot.
const UNDERIVABLE_CALLEE: &str = "[anonymous]";

/// Renders `function`'s label, memoizing the result.
pub fn label(ctx: &mut AnalysisContext, function: FunctionId) -> String {
    if let Some(cached) = ctx.cached_label(function) {
        return cached.to_owned();
    }
    let naming = ctx.functions[function.index()].naming.clone();
    let rendered = match naming {
        Naming::Declared(name) | Naming::Assigned(name) => name,
        Naming::Callback { call, total_fn_args, position } => {
            let callee = ctx.calls[call.index()]
                .callee_label
                .clone()
                .unwrap_or_else(|| UNDERIVABLE_CALLEE.to_owned());
            if total_fn_args <= 1 {
                format!("clb({callee})")
            } else {
                format!("clb({callee})[{position}]")
            }
        }
        Naming::FreeAnonymous { index } => {
            let enclosing = ctx.functions[function.index()].enclosing_function;
            let scope_label = match enclosing {
                Some(enclosing) => label(ctx, enclosing),
                None => "global".to_owned(),
            };
            format!("{scope_label}:anon[{index}]")
        }
    };
    ctx.cache_label(function, rendered.clone());
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Span;
    use crate::context::CallKind;
    use crate::ids::{FileId, NodeId};

    fn new_file_ctx() -> (AnalysisContext, FileId) {
        let mut ctx = AnalysisContext::new();
        let file = ctx.add_file("a.js".to_owned(), crate::ast::Program {
            id: NodeId::new(0),
            span: Span::dummy(),
            body: Vec::new(),
        });
        (ctx, file)
    }

    #[test]
    fn declared_label_is_the_name() {
        let (mut ctx, file) = new_file_ctx();
        let f = ctx.register_function(
            NodeId::new(1),
            file,
            Span::dummy(),
            None,
            0,
            Vec::new(),
            false,
            Naming::Declared("f".to_owned()),
        );
        assert_eq!(label(&mut ctx, f), "f");
    }

    #[test]
    fn free_anonymous_label_includes_enclosing_scope() {
        let (mut ctx, file) = new_file_ctx();
        let outer = ctx.register_function(
            NodeId::new(1),
            file,
            Span::dummy(),
            None,
            0,
            Vec::new(),
            false,
            Naming::Declared("outer".to_owned()),
        );
        let inner = ctx.register_function(
            NodeId::new(2),
            file,
            Span::dummy(),
            Some(outer),
            0,
            Vec::new(),
            true,
            Naming::FreeAnonymous { index: 1 },
        );
        assert_eq!(label(&mut ctx, inner), "outer:anon[1]");
    }

    #[test]
    fn single_callback_label_has_no_index_suffix() {
        let (mut ctx, file) = new_file_ctx();
        let call = ctx.register_call(
            NodeId::new(1),
            file,
            Span::dummy(),
            None,
            CallKind::Call,
            1,
            1,
            Some("setTimeout".to_owned()),
            vec![NodeId::new(2)],
        );
        let f = ctx.register_function(
            NodeId::new(2),
            file,
            Span::dummy(),
            None,
            0,
            Vec::new(),
            true,
            Naming::Callback { call, total_fn_args: 1, position: 1 },
        );
        assert_eq!(label(&mut ctx, f), "clb(setTimeout)");
    }

    #[test]
    fn multiple_callbacks_get_position_suffix() {
        let (mut ctx, file) = new_file_ctx();
        let call = ctx.register_call(
            NodeId::new(1),
            file,
            Span::dummy(),
            None,
            CallKind::Call,
            2,
            2,
            Some("processData".to_owned()),
            vec![NodeId::new(2), NodeId::new(3)],
        );
        let second = ctx.register_function(
            NodeId::new(3),
            file,
            Span::dummy(),
            None,
            0,
            Vec::new(),
            true,
            Naming::Callback { call, total_fn_args: 2, position: 2 },
        );
        assert_eq!(label(&mut ctx, second), "clb(processData)[2]");
    }
}
