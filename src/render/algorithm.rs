//! # Statement/Algorithm Assembler
//!
//! Turns statements into pseudocode lines. Every compound statement is laid
//! out through a [`BlockStack`]: opening a block emits its header at the
//! current depth and pushes a frame; the body renders one level deeper;
//! closing pops the frame and emits the matching end keyword. A frame left
//! open, or closed with the wrong keyword, is an internal defect reported as
//! [`AlgotexError::UnbalancedBlockStructure`](crate::AlgotexError::UnbalancedBlockStructure).
//!
//! Two layouts share the same block logic:
//!
//! - [`Layout::Array`] produces a math-mode `\begin{array}{l} ... \end{array}`
//!   block whose lines are joined with ` \\ ` and indented with `\hspace`.
//! - [`Layout::Algpseudocode`] produces an `algorithmic` environment for the
//!   `algpseudocode` package, one command per line.

use log::trace;
use serde::{Deserialize, Serialize};

use crate::algotex_err;
use crate::ast::{Branch, FunctionDef, Node};
use crate::diagnostics::Result;
use crate::render::expression::escape_text;
use crate::render::{Plugin, RenderContext};

// ============================================================================
// LAYOUTS
// ============================================================================

/// Output layout of an algorithm block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    #[default]
    Array,
    Algpseudocode,
}

const EM_PER_INDENT: usize = 1;
const SPACES_PER_INDENT: usize = 4;

impl Layout {
    pub fn line_break(self) -> &'static str {
        match self {
            Layout::Array => r" \\ ",
            Layout::Algpseudocode => "\n",
        }
    }

    fn indent(self, depth: usize, line: &str) -> String {
        match self {
            Layout::Array if depth > 0 => {
                format!(r"\hspace{{{}em}} {}", depth * EM_PER_INDENT, line)
            }
            Layout::Array => line.to_string(),
            Layout::Algpseudocode => format!("{}{}", " ".repeat(depth * SPACES_PER_INDENT), line),
        }
    }

    fn statement(self, latex: &str) -> String {
        match self {
            Layout::Array => latex.to_string(),
            Layout::Algpseudocode => format!(r"\State ${latex}$"),
        }
    }

    fn begin_function(self, name_latex: &str, raw_name: &str, params: &str) -> String {
        match self {
            Layout::Array => format!(r"\mathbf{{function}} \ {name_latex}({params})"),
            Layout::Algpseudocode => {
                format!(r"\Function{{{}}}{{${}$}}", raw_name.replace('_', r"\_"), params)
            }
        }
    }

    fn end_function(self) -> &'static str {
        match self {
            Layout::Array => r"\mathbf{end\ function}",
            Layout::Algpseudocode => r"\EndFunction",
        }
    }

    fn description(self, text: &str) -> String {
        match self {
            Layout::Array => format!(r"\triangleright \ \textrm{{{text}}}"),
            Layout::Algpseudocode => format!(r"\State \Comment{{{text}}}"),
        }
    }

    fn begin_if(self, cond: &str) -> String {
        match self {
            Layout::Array => format!(r"\mathbf{{if}} \ {cond}"),
            Layout::Algpseudocode => format!(r"\If{{${cond}$}}"),
        }
    }

    fn else_if(self, cond: &str) -> String {
        match self {
            Layout::Array => format!(r"\mathbf{{else\ if}} \ {cond}"),
            Layout::Algpseudocode => format!(r"\ElsIf{{${cond}$}}"),
        }
    }

    fn else_(self) -> &'static str {
        match self {
            Layout::Array => r"\mathbf{else}",
            Layout::Algpseudocode => r"\Else",
        }
    }

    fn end_if(self) -> &'static str {
        match self {
            Layout::Array => r"\mathbf{end\ if}",
            Layout::Algpseudocode => r"\EndIf",
        }
    }

    fn begin_while(self, cond: &str) -> String {
        match self {
            Layout::Array => format!(r"\mathbf{{while}} \ {cond}"),
            Layout::Algpseudocode => format!(r"\While{{${cond}$}}"),
        }
    }

    fn end_while(self) -> &'static str {
        match self {
            Layout::Array => r"\mathbf{end\ while}",
            Layout::Algpseudocode => r"\EndWhile",
        }
    }

    fn begin_for(self, target: &str, iter: &str) -> String {
        match self {
            Layout::Array => format!(r"\mathbf{{for}} \ {target} \in {iter} \ \mathbf{{do}}"),
            Layout::Algpseudocode => format!(r"\For{{${target} \in {iter}$}}"),
        }
    }

    fn end_for(self) -> &'static str {
        match self {
            Layout::Array => r"\mathbf{end\ for}",
            Layout::Algpseudocode => r"\EndFor",
        }
    }

    fn ret(self, value: Option<&str>) -> String {
        match (self, value) {
            (Layout::Array, Some(v)) => format!(r"\mathbf{{return}} \ {v}"),
            (Layout::Array, None) => r"\mathbf{return}".to_string(),
            (Layout::Algpseudocode, Some(v)) => format!(r"\State \Return ${v}$"),
            (Layout::Algpseudocode, None) => r"\State \Return".to_string(),
        }
    }

    /// Depth at which a top-level function header is placed.
    fn top_depth(self) -> usize {
        match self {
            Layout::Array => 0,
            Layout::Algpseudocode => 1,
        }
    }

    /// Encloses the lines of a top-level function in the outer environment.
    fn enclose(self, mut lines: Vec<String>) -> Vec<String> {
        match self {
            Layout::Array => {
                if let Some(first) = lines.first_mut() {
                    first.insert_str(0, r"\begin{array}{l} ");
                }
                if let Some(last) = lines.last_mut() {
                    last.push_str(r" \end{array}");
                }
                lines
            }
            Layout::Algpseudocode => {
                lines.insert(0, r"\begin{algorithmic}".to_string());
                lines.push(r"\end{algorithmic}".to_string());
                lines
            }
        }
    }
}

// ============================================================================
// BLOCK STACK
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Function,
    If,
    While,
    For,
}

#[derive(Debug)]
struct OpenBlock {
    kind: BlockKind,
    /// Depth of the header line; the body sits one level deeper.
    depth: usize,
}

struct BlockStack<'a> {
    ctx: &'a RenderContext,
    layout: Layout,
    base: usize,
    frames: Vec<OpenBlock>,
    lines: Vec<String>,
}

impl<'a> BlockStack<'a> {
    fn new(ctx: &'a RenderContext, layout: Layout, base: usize) -> Self {
        Self {
            ctx,
            layout,
            base,
            frames: Vec::new(),
            lines: Vec::new(),
        }
    }

    fn depth(&self) -> usize {
        self.base + self.frames.len()
    }

    fn line(&mut self, text: &str) {
        let line = self.layout.indent(self.depth(), text);
        self.lines.push(line);
    }

    fn open(&mut self, kind: BlockKind, header: &str) {
        let depth = self.depth();
        self.line(header);
        self.frames.push(OpenBlock { kind, depth });
    }

    /// Emits an intermediate header (`else if`, `else`) of the innermost block.
    fn continue_block(&mut self, kind: BlockKind, header: &str) -> Result<()> {
        let depth = match self.frames.last() {
            Some(frame) if frame.kind == kind => frame.depth,
            Some(frame) => {
                return Err(algotex_err!(
                    UnbalancedBlockStructure,
                    "cannot continue a {:?} block inside an open {:?} block",
                    kind,
                    frame.kind
                ))
            }
            None => {
                return Err(algotex_err!(
                    UnbalancedBlockStructure,
                    "cannot continue a {:?} block with no open block",
                    kind
                ))
            }
        };
        self.lines.push(self.layout.indent(depth, header));
        Ok(())
    }

    fn body(&mut self, statements: &[Node]) -> Result<()> {
        let inner = self.ctx.at_depth(self.depth());
        for statement in statements {
            trace!("assembling {} at depth {}", statement.kind(), inner.depth());
            self.lines.push(inner.render(statement)?);
        }
        Ok(())
    }

    fn close(&mut self, kind: BlockKind, footer: &str) -> Result<()> {
        let frame = self.frames.pop().ok_or_else(|| {
            algotex_err!(UnbalancedBlockStructure, "closing {:?} with no open block", kind)
        })?;
        if frame.kind != kind {
            return Err(algotex_err!(
                UnbalancedBlockStructure,
                "closing {:?} while {:?} is open",
                kind,
                frame.kind
            ));
        }
        self.lines.push(self.layout.indent(frame.depth, footer));
        Ok(())
    }

    fn finish(self) -> Result<Vec<String>> {
        if let Some(frame) = self.frames.last() {
            return Err(algotex_err!(
                UnbalancedBlockStructure,
                "{} block(s) left open, innermost {:?}",
                self.frames.len(),
                frame.kind
            ));
        }
        Ok(self.lines)
    }
}

// ============================================================================
// PLUGIN
// ============================================================================

/// Built-in handler for statements.
///
/// `AugAssign` is not claimed: the normalizer expands it before rendering.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlgorithmAssembler {
    layout: Layout,
}

impl AlgorithmAssembler {
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    fn simple(&self, latex: &str, ctx: &RenderContext) -> String {
        self.layout.indent(ctx.depth(), &self.layout.statement(latex))
    }

    fn function(&self, def: &FunctionDef, ctx: &RenderContext) -> Result<String> {
        let top = ctx.depth() == 0;
        let base = if top { self.layout.top_depth() } else { ctx.depth() };
        let name = ctx.render(&Node::Name(def.name.clone()))?;
        let params = render_params(def, ctx)?;

        let mut stack = BlockStack::new(ctx, self.layout, base);
        stack.open(
            BlockKind::Function,
            &self.layout.begin_function(&name, &def.name, &params),
        );
        if ctx.options().show_descriptions {
            if let Some(text) = def.description.as_deref() {
                let text = escape_text(&text.split_whitespace().collect::<Vec<_>>().join(" "));
                stack.line(&self.layout.description(&text));
            }
        }
        stack.body(&def.body)?;
        stack.close(BlockKind::Function, self.layout.end_function())?;

        let lines = stack.finish()?;
        let lines = if top { self.layout.enclose(lines) } else { lines };
        Ok(lines.join(self.layout.line_break()))
    }

    fn conditional(&self, branches: &[Branch], orelse: &[Node], ctx: &RenderContext) -> Result<String> {
        let Some((first, rest)) = branches.split_first() else {
            return Err(algotex_err!(Unsupported, "conditional without any branch"));
        };
        let mut stack = BlockStack::new(ctx, self.layout, ctx.depth());
        stack.open(BlockKind::If, &self.layout.begin_if(&ctx.render(&first.test)?));
        stack.body(&first.body)?;
        for branch in rest {
            let header = self.layout.else_if(&ctx.render(&branch.test)?);
            stack.continue_block(BlockKind::If, &header)?;
            stack.body(&branch.body)?;
        }
        if !orelse.is_empty() {
            stack.continue_block(BlockKind::If, self.layout.else_())?;
            stack.body(orelse)?;
        }
        stack.close(BlockKind::If, self.layout.end_if())?;
        Ok(stack.finish()?.join(self.layout.line_break()))
    }

    fn loop_block(
        &self,
        kind: BlockKind,
        header: String,
        body: &[Node],
        ctx: &RenderContext,
    ) -> Result<String> {
        let footer = match kind {
            BlockKind::While => self.layout.end_while(),
            _ => self.layout.end_for(),
        };
        let mut stack = BlockStack::new(ctx, self.layout, ctx.depth());
        stack.open(kind, &header);
        stack.body(body)?;
        stack.close(kind, footer)?;
        Ok(stack.finish()?.join(self.layout.line_break()))
    }
}

impl Plugin for AlgorithmAssembler {
    fn name(&self) -> &str {
        "algorithm"
    }

    fn render(&self, node: &Node, ctx: &RenderContext) -> Result<Option<String>> {
        let latex = match node {
            Node::FunctionDef(def) => self.function(def, ctx)?,
            Node::If { branches, orelse } => self.conditional(branches, orelse, ctx)?,
            Node::While { test, body, orelse } => {
                if !orelse.is_empty() {
                    return Err(algotex_err!(
                        Unsupported,
                        "while statement with an else clause"
                    ));
                }
                let header = self.layout.begin_while(&ctx.render(test)?);
                self.loop_block(BlockKind::While, header, body, ctx)?
            }
            Node::For {
                target,
                iter,
                body,
                orelse,
            } => {
                if !orelse.is_empty() {
                    return Err(algotex_err!(Unsupported, "for statement with an else clause"));
                }
                let header = self.layout.begin_for(&ctx.render(target)?, &ctx.render(iter)?);
                self.loop_block(BlockKind::For, header, body, ctx)?
            }
            Node::Assign { targets, value } => {
                let mut parts = Vec::with_capacity(targets.len() + 1);
                for target in targets {
                    parts.push(ctx.render(target)?);
                }
                parts.push(ctx.render(value)?);
                self.simple(&parts.join(r" \gets "), ctx)
            }
            Node::AnnAssign {
                target,
                annotation,
                value,
            } => {
                let target = ctx.render(target)?;
                let latex = match value {
                    Some(value) => format!(r"{} \gets {}", target, ctx.render(value)?),
                    None => format!("{}: {}", target, ctx.render(annotation)?),
                };
                self.simple(&latex, ctx)
            }
            Node::Expr(value) => self.simple(&ctx.render(value)?, ctx),
            Node::Return(value) => {
                let value = value.as_deref().map(|v| ctx.render(v)).transpose()?;
                self.layout.indent(ctx.depth(), &self.layout.ret(value.as_deref()))
            }
            Node::Match { .. } => {
                return Err(algotex_err!(
                    Unsupported,
                    "match statements are only typeset in function style"
                ))
            }
            Node::Pass => self.simple(r"\mathbf{pass}", ctx),
            Node::Break => self.simple(r"\mathbf{break}", ctx),
            Node::Continue => self.simple(r"\mathbf{continue}", ctx),
            _ => return Ok(None),
        };
        Ok(Some(latex))
    }
}

/// `x, y: T` with each name rendered through the chain.
pub fn render_params(def: &FunctionDef, ctx: &RenderContext) -> Result<String> {
    let mut params = Vec::with_capacity(def.params.len());
    for param in &def.params {
        let name = ctx.render(&Node::Name(param.name.clone()))?;
        params.push(match &param.annotation {
            Some(annotation) => format!("{}: {}", name, ctx.render(annotation)?),
            None => name,
        });
    }
    Ok(params.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AlgotexError;

    fn ctx() -> RenderContext {
        crate::Translator::new(Default::default())
            .unwrap()
            .context()
            .clone()
    }

    #[test]
    fn test_stack_rejects_mismatched_close() {
        let ctx = ctx();
        let mut stack = BlockStack::new(&ctx, Layout::Array, 0);
        stack.open(BlockKind::While, r"\mathbf{while} \ x");
        let err = stack.close(BlockKind::If, r"\mathbf{end\ if}").unwrap_err();
        assert!(matches!(err, AlgotexError::UnbalancedBlockStructure { .. }));
        assert!(err.is_internal());
    }

    #[test]
    fn test_stack_rejects_open_frames() {
        let ctx = ctx();
        let mut stack = BlockStack::new(&ctx, Layout::Array, 0);
        stack.open(BlockKind::For, "header");
        let err = stack.finish().unwrap_err();
        assert!(matches!(err, AlgotexError::UnbalancedBlockStructure { .. }));
    }

    #[test]
    fn test_stack_rejects_stray_continuation() {
        let ctx = ctx();
        let mut stack = BlockStack::new(&ctx, Layout::Array, 0);
        assert!(stack.continue_block(BlockKind::If, r"\mathbf{else}").is_err());
        stack.open(BlockKind::While, "header");
        assert!(stack.continue_block(BlockKind::If, r"\mathbf{else}").is_err());
    }

    #[test]
    fn test_indentation() {
        assert_eq!(Layout::Array.indent(0, "x"), "x");
        assert_eq!(Layout::Array.indent(2, "x"), r"\hspace{2em} x");
        assert_eq!(Layout::Algpseudocode.indent(2, "x"), "        x");
    }
}
