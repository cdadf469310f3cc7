//! Fixed pattern tables for the safety linter.
//!
//! All matching is case-insensitive substring containment, not word-boundary
//! aware. The fraud table is deliberately broad and errs toward refusing:
//! the bare phrase "employment gaps" triggers even in benign questions.
//! Tightening these to word-boundary or regex matching would silently change
//! which queries are refused; keep the tables and matching rule together.

/// Determinative or guaranteeing phrases forbidden in any answer shown to a user.
pub const FORBIDDEN_PHRASES: &[&str] = &[
    "you are eligible",
    "you will be approved",
    "you are approved",
    "you definitely qualify",
    "guaranteed",
    "i guarantee",
    "i can guarantee",
    "you qualify",
    "you will get",
    "you will receive your visa",
    "your application will succeed",
    "i certify",
    "i confirm you are eligible",
    "definitely eligible",
    "100% eligible",
    "100% approved",
];

/// Substrings of user input that signal a request to fabricate, forge,
/// falsify, or conceal information.
pub const FRAUD_PATTERNS: &[&str] = &[
    "fake payslip",
    "fake letter",
    "forged document",
    "forge a",
    "forge my",
    "forge the",
    "fabricate evidence",
    "fabricate a",
    "hide gaps",
    "hide the", // catches "hide the employment gaps"
    "conceal gaps",
    "hide my history",
    "conceal my history",
    "hide from the department",
    "avoid detection",
    "bypass the character test",
    "bypass character check",
    "employment gaps", // any query about hiding employment gaps
    "cover up",
    "falsify",
];

/// Fixed refusal shown when a fraud/evasion request is detected. The caller
/// must show this text and suppress any other output entirely.
pub const FRAUD_REFUSAL: &str =
    "This assistant cannot help with requests to create false, misleading, or fabricated \
     documents or information. Supplying false information to an immigration authority is a \
     serious offence and grounds for visa refusal or cancellation. If you are concerned about \
     gaps or inconsistencies in your history, we recommend consulting a registered migration \
     agent who can help you present your circumstances honestly and accurately.";
