mod eval;
mod share;

pub use eval::{EvalOptions, cmd_eval};
pub use share::cmd_share;
