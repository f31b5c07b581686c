/// Rough brace-balance heuristic run before compilation.
///
/// Not a LaTeX check: escaped braces (`\{`, `\}`) are skipped, everything
/// else is counted, comments included. An imbalance only produces a warning;
/// the document is still sent to the compiler.
pub fn check_brace_balance(latex: &str) -> Option<String> {
    let mut open = 0usize;
    let mut close = 0usize;
    let mut escaped = false;

    for c in latex.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '{' => open += 1,
            '}' => close += 1,
            _ => {}
        }
    }

    (open != close).then(|| format!("Unbalanced braces in LaTeX code ({open} '{{' vs {close} '}}')"))
}
