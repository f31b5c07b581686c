// PDF rendering: the external compilation contract, a pre-compile heuristic,
// and the HTTP handlers that merge and compile.

pub mod compiler;
pub mod handlers;
pub mod precheck;

pub use compiler::{CompileError, LatexOnlineCompiler, PdfCompiler};
pub use precheck::check_brace_balance;
