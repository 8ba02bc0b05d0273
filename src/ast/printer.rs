//! Source and outline renderings of the AST.
//!
//! `Display` on a node prints canonical source: parsing that text again
//! yields the same tree (modulo spans). `Program::tree` prints an
//! indented outline, one node per line, used by the `--tree` dump.

use std::fmt::{Display, Formatter, Result as FmtResult, Write};

use super::{
    ast::{Declaration, Param, Program},
    expressions::Expr,
    statements::{Assign, Block, ForInit, Stmt, VarDecl},
};

const INDENT: &str = "    ";

fn escape_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Floats always keep a decimal point so they lex back as floats.
fn format_float(value: f64) -> String {
    let text = value.to_string();
    if text.contains('.') {
        text
    } else {
        format!("{}.0", text)
    }
}

fn write_params(f: &mut Formatter<'_>, params: &[Param]) -> FmtResult {
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{} {}", param.ty, param.name)?;
    }
    Ok(())
}

fn write_block(f: &mut Formatter<'_>, block: &Block, depth: usize) -> FmtResult {
    writeln!(f, "{{")?;
    for stmt in block.iter() {
        write_stmt(f, stmt, depth + 1)?;
    }
    write!(f, "{}}}", INDENT.repeat(depth))
}

fn write_var_decl(f: &mut Formatter<'_>, decl: &VarDecl) -> FmtResult {
    write!(f, "{} {}", decl.ty, decl.name)?;
    if let Some(init) = &decl.init {
        write!(f, " = {}", init)?;
    }
    Ok(())
}

fn write_assign(f: &mut Formatter<'_>, assign: &Assign) -> FmtResult {
    write!(f, "{} = {}", assign.name, assign.value)
}

fn write_stmt(f: &mut Formatter<'_>, stmt: &Stmt, depth: usize) -> FmtResult {
    write!(f, "{}", INDENT.repeat(depth))?;

    match stmt {
        Stmt::VarDecl(decl) => {
            write_var_decl(f, decl)?;
            write!(f, ";")?;
        }
        Stmt::Assign(assign) => {
            write_assign(f, assign)?;
            write!(f, ";")?;
        }
        Stmt::If {
            cond,
            then_block,
            else_block,
            ..
        } => {
            write!(f, "if ({}) ", cond)?;
            write_block(f, then_block, depth)?;
            if let Some(else_block) = else_block {
                write!(f, " else ")?;
                write_block(f, else_block, depth)?;
            }
        }
        Stmt::While { cond, block, .. } => {
            write!(f, "while ({}) ", cond)?;
            write_block(f, block, depth)?;
        }
        Stmt::For {
            init,
            cond,
            update,
            block,
            ..
        } => {
            write!(f, "for (")?;
            match init {
                ForInit::Decl(decl) => write_var_decl(f, decl)?,
                ForInit::Assign(assign) => write_assign(f, assign)?,
            }
            write!(f, "; {}; ", cond)?;
            write_assign(f, update)?;
            write!(f, ") ")?;
            write_block(f, block, depth)?;
        }
        Stmt::Return { value, .. } => match value {
            Some(value) => write!(f, "return {};", value)?,
            None => write!(f, "return;")?,
        },
        Stmt::Print { expr, .. } => write!(f, "print({});", expr)?,
        Stmt::ExprStmt { expr, .. } => write!(f, "{};", expr)?,
    }

    writeln!(f)
}

/// Writes `expr`, parenthesised when it binds looser than its context.
fn write_operand(f: &mut Formatter<'_>, expr: &Expr, min_precedence: u8) -> FmtResult {
    match expr {
        Expr::BinOp { op, .. } if op.precedence() < min_precedence => write!(f, "({})", expr),
        _ => write!(f, "{}", expr),
    }
}

/// Writes a left-nested run of binary operators, looping over its left
/// spine. Left associative: an equal-precedence right operand needs
/// parentheses, a left operand only when it binds looser.
fn write_operator_chain(f: &mut Formatter<'_>, expr: &Expr) -> FmtResult {
    // Outermost operator first; each entry's left operand is the next one.
    let mut spine = vec![];
    let mut current = expr;
    while let Expr::BinOp {
        op, left, right, ..
    } = current
    {
        spine.push((*op, right.as_ref()));
        current = left.as_ref();
    }

    let grouped = |i: usize| i > 0 && spine[i].0.precedence() < spine[i - 1].0.precedence();

    for i in 0..spine.len() {
        if grouped(i) {
            write!(f, "(")?;
        }
    }
    write!(f, "{}", current)?;
    for i in (0..spine.len()).rev() {
        let (op, right) = spine[i];
        write!(f, " {} ", op.symbol())?;
        write_operand(f, right, op.precedence() + 1)?;
        if grouped(i) {
            write!(f, ")")?;
        }
    }
    Ok(())
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Expr::IntLit { value, .. } => write!(f, "{}", value),
            Expr::FloatLit { value, .. } => write!(f, "{}", format_float(*value)),
            Expr::StringLit { value, .. } => write!(f, "\"{}\"", escape_string(value)),
            Expr::BoolLit { value, .. } => write!(f, "{}", value),
            Expr::Id { name, .. } => write!(f, "{}", name),
            Expr::Call { name, args, .. } => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            Expr::BinOp { .. } => write_operator_chain(f, self),
            Expr::UnaryOp { op, operand, .. } => match operand.as_ref() {
                Expr::BinOp { .. } => write!(f, "{}({})", op.symbol(), operand),
                _ => write!(f, "{}{}", op.symbol(), operand),
            },
        }
    }
}

impl Display for Stmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write_stmt(f, self, 0)
    }
}

impl Display for Block {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write_block(f, self, 0)
    }
}

impl Display for Declaration {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Declaration::Function {
                return_type, name, ..
            } => write!(f, "{} {}(", return_type, name)?,
            Declaration::MainFunction { .. } => write!(f, "void main(")?,
        }
        write_params(f, self.params())?;
        write!(f, ") ")?;
        write_block(f, self.body(), 0)
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for (i, declaration) in self.declarations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{}", declaration)?;
        }
        Ok(())
    }
}

struct TreeWriter {
    out: String,
    depth: usize,
}

impl TreeWriter {
    fn line(&mut self, text: &str) {
        // Writing into a String cannot fail.
        let _ = writeln!(self.out, "{}{}", "  ".repeat(self.depth), text);
    }

    fn nested(&mut self, text: &str, body: impl FnOnce(&mut TreeWriter)) {
        self.line(text);
        self.depth += 1;
        body(self);
        self.depth -= 1;
    }

    fn block(&mut self, label: &str, block: &Block) {
        self.nested(label, |tree| {
            for stmt in block.iter() {
                tree.stmt(stmt);
            }
        });
    }

    fn var_decl(&mut self, decl: &VarDecl) {
        self.nested(&format!("VarDecl {} {}", decl.ty, decl.name), |tree| {
            if let Some(init) = &decl.init {
                tree.expr(init);
            }
        });
    }

    fn assign(&mut self, assign: &Assign) {
        self.nested(&format!("Assign {}", assign.name), |tree| {
            tree.expr(&assign.value)
        });
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::VarDecl(decl) => self.var_decl(decl),
            Stmt::Assign(assign) => self.assign(assign),
            Stmt::If {
                cond,
                then_block,
                else_block,
                ..
            } => self.nested("If", |tree| {
                tree.expr(cond);
                tree.block("Then", then_block);
                if let Some(else_block) = else_block {
                    tree.block("Else", else_block);
                }
            }),
            Stmt::While { cond, block, .. } => self.nested("While", |tree| {
                tree.expr(cond);
                tree.block("Block", block);
            }),
            Stmt::For {
                init,
                cond,
                update,
                block,
                ..
            } => self.nested("For", |tree| {
                match init {
                    ForInit::Decl(decl) => tree.var_decl(decl),
                    ForInit::Assign(assign) => tree.assign(assign),
                }
                tree.expr(cond);
                tree.assign(update);
                tree.block("Block", block);
            }),
            Stmt::Return { value, .. } => self.nested("Return", |tree| {
                if let Some(value) = value {
                    tree.expr(value);
                }
            }),
            Stmt::Print { expr, .. } => self.nested("Print", |tree| tree.expr(expr)),
            Stmt::ExprStmt { expr, .. } => self.nested("ExprStmt", |tree| tree.expr(expr)),
        }
    }

    fn expr(&mut self, expr: &Expr) {
        // Work stack instead of recursion: operator chains nest as deep as
        // they are long.
        let base = self.depth;
        let mut pending = vec![(expr, base)];

        while let Some((expr, depth)) = pending.pop() {
            self.depth = depth;
            match expr {
                Expr::IntLit { value, .. } => self.line(&format!("IntLit {}", value)),
                Expr::FloatLit { value, .. } => {
                    self.line(&format!("FloatLit {}", format_float(*value)))
                }
                Expr::StringLit { value, .. } => self.line(&format!("StringLit {:?}", value)),
                Expr::BoolLit { value, .. } => self.line(&format!("BoolLit {}", value)),
                Expr::Id { name, .. } => self.line(&format!("Id {}", name)),
                Expr::Call { name, args, .. } => {
                    self.line(&format!("Call {}", name));
                    pending.extend(args.iter().rev().map(|arg| (arg, depth + 1)));
                }
                Expr::BinOp {
                    op, left, right, ..
                } => {
                    self.line(&format!("BinOp {}", op.name()));
                    pending.push((right.as_ref(), depth + 1));
                    pending.push((left.as_ref(), depth + 1));
                }
                Expr::UnaryOp { op, operand, .. } => {
                    self.line(&format!("UnaryOp {}", op.name()));
                    pending.push((operand.as_ref(), depth + 1));
                }
            }
        }

        self.depth = base;
    }
}

impl Program {
    /// Indented outline of the tree.
    pub fn tree(&self) -> String {
        let mut tree = TreeWriter {
            out: String::from("Program\n"),
            depth: 1,
        };

        for declaration in &self.declarations {
            let label = match declaration {
                Declaration::Function {
                    return_type, name, ..
                } => format!("Function {} {}", return_type, name),
                Declaration::MainFunction { .. } => String::from("MainFunction"),
            };

            tree.nested(&label, |tree| {
                for param in declaration.params() {
                    tree.line(&format!("Param {} {}", param.ty, param.name));
                }
                tree.block("Block", declaration.body());
            });
        }

        tree.out
    }
}
