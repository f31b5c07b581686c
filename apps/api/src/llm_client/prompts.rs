// Shared prompt fragments used by every LLM-backed service.

/// Appended to system prompts of calls that must answer in JSON.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Reminds the model that its output is pasted verbatim into a LaTeX document.
pub const LATEX_FRAGMENT_INSTRUCTION: &str = "\
    Every value you return is inserted verbatim into an existing LaTeX document \
    between comment markers. Return LaTeX fragments only: do NOT include \
    \\documentclass, \\begin{document} or \\end{document}, and escape LaTeX \
    special characters (%, &, $, #, _) in plain text.";
