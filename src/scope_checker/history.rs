use std::fmt::Write;

use crate::ast::types::Type;

/// State of the open scopes right after one symbol table mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeSnapshot {
    /// 1-based, strictly increasing.
    pub step: usize,
    pub action: String,
    /// Open scopes, global first, each with its bindings in declaration order.
    pub scopes: Vec<Vec<(String, Type)>>,
    pub functions: Vec<String>,
}

/// Append-only log of scope snapshots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScopeHistory {
    snapshots: Vec<ScopeSnapshot>,
}

impl ScopeHistory {
    pub fn record(
        &mut self,
        action: &str,
        scopes: Vec<Vec<(String, Type)>>,
        functions: Vec<String>,
    ) {
        let step = self.snapshots.len() + 1;
        self.snapshots.push(ScopeSnapshot {
            step,
            action: action.to_string(),
            scopes,
            functions,
        });
    }

    pub fn snapshots(&self) -> &[ScopeSnapshot] {
        &self.snapshots
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn report(&self) -> String {
        let mut out = String::from("=== SCOPE HISTORY ===\n");

        for snapshot in &self.snapshots {
            let _ = writeln!(out, "\nStep {}: {}", snapshot.step, snapshot.action);

            for (depth, scope) in snapshot.scopes.iter().enumerate() {
                let name = if depth == 0 {
                    String::from("Global")
                } else {
                    format!("Local {}", depth)
                };

                if scope.is_empty() {
                    let _ = writeln!(out, "  {}: (empty)", name);
                } else {
                    let bindings: Vec<String> = scope
                        .iter()
                        .map(|(variable, ty)| format!("{}: {}", variable, ty))
                        .collect();
                    let _ = writeln!(out, "  {}: {}", name, bindings.join(", "));
                }
            }

            if !snapshot.functions.is_empty() {
                let _ = writeln!(out, "  Functions: {}", snapshot.functions.join(", "));
            }
        }

        out
    }
}
