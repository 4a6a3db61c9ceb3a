//! `cf-java --list` — print the operation catalog.

use crate::domain::catalog::CATALOG;
use crate::output::OutputContext;

pub fn run(ctx: &OutputContext) {
    let width = CATALOG.iter().map(|op| op.name.len()).max().unwrap_or(0);
    ctx.header("Operations:");
    for op in CATALOG.iter() {
        ctx.kv(op.name, &op.summary(), width);
    }
}
