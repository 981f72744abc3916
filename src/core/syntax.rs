// abstract statements and expressions produced by the synthesizer
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Materialization {
    Array,
    List,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expr {
    Identifier(String),
    //the implicit receiver of the member being generated
    This,
    MemberAccess { target: Box<Expr>, member: String },
    Invocation { callee: Box<Expr>, args: Vec<Expr> },
    ObjectCreation { type_name: String, args: Vec<Expr> },
    Cast { type_name: String, operand: Box<Expr> },
    /// Element-wise projection `source.Select(parameter => { body })`.
    Projection { source: Box<Expr>, parameter: String, body: Vec<Stmt> },
    Materialize { source: Box<Expr>, into: Materialization },
    AsReadOnly(Box<Expr>),
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Identifier(name.into())
    }

    pub fn member(target: Expr, member: impl Into<String>) -> Self {
        Expr::MemberAccess { target: Box::new(target), member: member.into() }
    }

    pub fn invoke(callee: Expr, args: Vec<Expr>) -> Self {
        Expr::Invocation { callee: Box::new(callee), args }
    }

    pub fn new_object(type_name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::ObjectCreation { type_name: type_name.into(), args }
    }

    pub fn cast(type_name: impl Into<String>, operand: Expr) -> Self {
        Expr::Cast { type_name: type_name.into(), operand: Box::new(operand) }
    }

    pub fn is_this(&self) -> bool {
        matches!(self, Expr::This)
    }

    /// Names of every identifier read by this expression.
    pub fn identifiers(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.walk(&mut |e| {
            if let Expr::Identifier(name) = e {
                names.push(name.clone());
            }
        });
        names
    }

    /// Every expression nested in this one, itself included, depth first.
    /// Projection bodies are walked too.
    pub fn walk(&self, visit: &mut dyn FnMut(&Expr)) {
        visit(self);
        match self {
            Expr::Identifier(_) | Expr::This => {}
            Expr::MemberAccess { target, .. } => target.walk(visit),
            Expr::Invocation { callee, args } => {
                callee.walk(visit);
                args.iter().for_each(|a| a.walk(visit));
            }
            Expr::ObjectCreation { args, .. } => args.iter().for_each(|a| a.walk(visit)),
            Expr::Cast { operand, .. } => operand.walk(visit),
            Expr::Projection { source, body, .. } => {
                source.walk(visit);
                body.iter().for_each(|s| s.walk(visit));
            }
            Expr::Materialize { source, .. } => source.walk(visit),
            Expr::AsReadOnly(inner) => inner.walk(visit),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReturnStyle {
    #[default]
    Return,
    //inside an iterator-producing method
    YieldReturn,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stmt {
    Declare { name: String, init: Expr },
    Assign { target: Expr, value: Expr },
    Return { value: Expr, style: ReturnStyle },
}

impl Stmt {
    pub fn declare(name: impl Into<String>, init: Expr) -> Self {
        Stmt::Declare { name: name.into(), init }
    }

    pub fn assign(target: Expr, value: Expr) -> Self {
        Stmt::Assign { target, value }
    }

    pub fn ret(value: Expr, style: ReturnStyle) -> Self {
        Stmt::Return { value, style }
    }

    pub fn walk(&self, visit: &mut dyn FnMut(&Expr)) {
        match self {
            Stmt::Declare { init, .. } => init.walk(visit),
            Stmt::Assign { target, value } => {
                target.walk(visit);
                value.walk(visit);
            }
            Stmt::Return { value, .. } => value.walk(visit),
        }
    }
}

fn comma_separated(f: &mut fmt::Formatter<'_>, items: &[Expr]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Identifier(name) => f.write_str(name),
            Expr::This => f.write_str("this"),
            Expr::MemberAccess { target, member } => write!(f, "{target}.{member}"),
            Expr::Invocation { callee, args } => {
                write!(f, "{callee}(")?;
                comma_separated(f, args)?;
                f.write_str(")")
            }
            Expr::ObjectCreation { type_name, args } => {
                write!(f, "new {type_name}(")?;
                comma_separated(f, args)?;
                f.write_str(")")
            }
            Expr::Cast { type_name, operand } => write!(f, "({type_name}){operand}"),
            Expr::Projection { source, parameter, body } => {
                write!(f, "{source}.Select({parameter} => {{")?;
                for stmt in body {
                    write!(f, " {stmt}")?;
                }
                f.write_str(" })")
            }
            Expr::Materialize { source, into: Materialization::Array } => write!(f, "{source}.ToArray()"),
            Expr::Materialize { source, into: Materialization::List } => write!(f, "{source}.ToList()"),
            Expr::AsReadOnly(inner) => write!(f, "{inner}.AsReadOnly()"),
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Declare { name, init } => write!(f, "var {name} = {init};"),
            Stmt::Assign { target, value } => write!(f, "{target} = {value};"),
            Stmt::Return { value, style: ReturnStyle::Return } => write!(f, "return {value};"),
            Stmt::Return { value, style: ReturnStyle::YieldReturn } => write!(f, "yield return {value};"),
        }
    }
}
